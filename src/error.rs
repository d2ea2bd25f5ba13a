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

use std::io;

use thiserror::Error;

/// An error returned when parsing or writing a TIFF container.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    /// The window is too short to hold the 8-byte TIFF header.
    #[error("Truncated TIFF header: need 8 bytes, got {actual}")]
    TruncatedData { actual: usize },
    /// The first two bytes are neither "II" nor "MM".
    #[error("Unknown TIFF byte order: 0x{0:02x} 0x{1:02x}")]
    UnknownByteOrder(u8, u8),
    /// The value after the byte order marker is not 42.
    #[error("Missing TIFF magic value 42 (found {0})")]
    MissingMagicValue(u16),
    /// The directory tree is malformed.
    #[error("Malformed TIFF structure: {0}")]
    Structural(#[from] StructuralError),
    /// An APP1 payload does not start with the Exif identifier.
    #[error("Missing Exif identifier")]
    MissingExifHeader,
    /// Writing the serialized container failed.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

/// An error raised by the directory tree while it resolves offsets.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum StructuralError {
    /// A read crossed the end of the window.
    #[error("{len} bytes at offset {offset} exceed the window of {size} bytes")]
    OutOfBounds { offset: usize, len: usize, size: usize },
    /// An IFD offset points back into an already visited directory.
    #[error("IFD at offset {0} is referenced more than once")]
    CyclicOffset(u32),
    /// The next-IFD chain is longer than allowed.
    #[error("Limit the IFD count to {0}")]
    TooManyIfds(usize),
    /// Sub-IFDs are nested deeper than allowed.
    #[error("Limit the sub-IFD depth to {0}")]
    TooDeep(usize),
    /// The entry values add up to more bytes than allowed.
    #[error("Limit the total size of values to {0} bytes")]
    TooMuchValueData(usize),
    /// The byte length of an entry value does not fit in memory.
    #[error("Invalid count {count} for tag 0x{tag:04x}")]
    InvalidCount { tag: u16, count: u32 },
    /// An IFD holds more entries than its 16-bit count can express.
    #[error("Too many entries in an IFD: {0}")]
    TooManyEntries(usize),
    /// The serialized layout does not fit 32-bit offsets.
    #[error("Serialized data exceeds the 32-bit offset space")]
    OffsetOverflow,
}
