//
// Copyright (c) 2016 KAMADA Ken'ichi.
// All rights reserved.
//
// Redistribution and use in source and binary forms, with or without
// modification, are permitted provided that the following conditions
// are met:
// 1. Redistributions of source code must retain the above copyright
//    notice, this list of conditions and the following disclaimer.
// 2. Redistributions in binary form must reproduce the above copyright
//    notice, this list of conditions and the following disclaimer in the
//    documentation and/or other materials provided with the distribution.
//
// THIS SOFTWARE IS PROVIDED BY THE AUTHOR AND CONTRIBUTORS ``AS IS'' AND
// ANY EXPRESS OR IMPLIED WARRANTIES, INCLUDING, BUT NOT LIMITED TO, THE
// IMPLIED WARRANTIES OF MERCHANTABILITY AND FITNESS FOR A PARTICULAR PURPOSE
// ARE DISCLAIMED.  IN NO EVENT SHALL THE AUTHOR OR CONTRIBUTORS BE LIABLE
// FOR ANY DIRECT, INDIRECT, INCIDENTAL, SPECIAL, EXEMPLARY, OR CONSEQUENTIAL
// DAMAGES (INCLUDING, BUT NOT LIMITED TO, PROCUREMENT OF SUBSTITUTE GOODS
// OR SERVICES; LOSS OF USE, DATA, OR PROFITS; OR BUSINESS INTERRUPTION)
// HOWEVER CAUSED AND ON ANY THEORY OF LIABILITY, WHETHER IN CONTRACT, STRICT
// LIABILITY, OR TORT (INCLUDING NEGLIGENCE OR OTHERWISE) ARISING IN ANY WAY
// OUT OF THE USE OF THIS SOFTWARE, EVEN IF ADVISED OF THE POSSIBILITY OF
// SUCH DAMAGE.
//

//! This is a pure-Rust library to parse and write TIFF containers,
//! the envelope of TIFF files and of the Exif data in JPEG images.
//!
//! A container is the byte order, the magic number 42, and the offset
//! of the 0th IFD.  The IFDs themselves are handled by a `Directory`,
//! which is `Ifd` unless another implementation is plugged in.
//!
//! # Examples
//!
//! ```
//! use exif_tiff::{ByteOrder, Ifd, Tiff, Value};
//!
//! let mut ifd = Ifd::new();
//! ifd.push(0x0100, Value::Short(vec![17]));
//! let tiff = Tiff::new(ByteOrder::BigEndian, Some(ifd));
//!
//! // Re-encode in the other byte order and read it back.
//! let data = tiff.serialize(ByteOrder::LittleEndian)?;
//! assert!(exif_tiff::is_tiff(&data));
//! let parsed: Tiff = Tiff::parse(&data)?;
//! assert_eq!(parsed.byte_order(), ByteOrder::LittleEndian);
//! assert_eq!(parsed.root(), tiff.root());
//! println!("{}", parsed);
//! # Ok::<(), exif_tiff::Error>(())
//! ```

pub use endian::ByteOrder;
pub use error::{Error, StructuralError};
pub use ifd::{Directory, Entry, Ifd, Limits};
pub use reader::Reader;
pub use tiff::{is_tiff, Header, Tiff, HEADER_SIZE};
pub use value::{FieldType, Rational, SRational, Value};
pub use window::Window;

#[cfg(test)]
#[macro_use]
mod tmacro;

mod endian;
mod error;
pub mod exif;
mod ifd;
mod reader;
mod tiff;
mod value;
mod window;
