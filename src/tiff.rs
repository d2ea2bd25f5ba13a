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

use std::fmt;
use std::io;

use byteorder::ByteOrder as _;
use byteorder::{BigEndian, LittleEndian};

use crate::endian::ByteOrder;
use crate::error::Error;
use crate::ifd::{Directory, Ifd};
use crate::reader::Reader;
use crate::window::Window;

// TIFF header magic number [EXIF23 4.5.2].
const TIFF_FORTY_TWO: u16 = 0x002a;

/// Size of the TIFF header.  When a container is serialized, its root
/// IFD starts right after it.
pub const HEADER_SIZE: usize = 8;

/// The 8-byte TIFF header.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Header {
    pub byte_order: ByteOrder,
    /// Offset of the 0th IFD, relative to the start of the header.
    /// Zero means that there is no IFD.
    pub first_ifd_offset: u32,
}

impl Header {
    /// Detects the byte order, checks the magic number, and decodes
    /// the first IFD offset.  Only the first 8 bytes of `data` are
    /// looked at.
    pub fn read(data: &[u8]) -> Result<Header, Error> {
        if data.len() < HEADER_SIZE {
            return Err(Error::TruncatedData { actual: data.len() });
        }
        let window = Window::new(&data[..HEADER_SIZE]);
        let byte_order = ByteOrder::from_marker([data[0], data[1]])
            .ok_or(Error::UnknownByteOrder(data[0], data[1]))?;
        let magic = window.read_u16(2, byte_order)?;
        if magic != TIFF_FORTY_TWO {
            return Err(Error::MissingMagicValue(magic));
        }
        Ok(Header {
            byte_order,
            first_ifd_offset: window.read_u32(4, byte_order)?,
        })
    }

    /// Encodes the header.
    pub fn to_bytes(&self) -> [u8; HEADER_SIZE] {
        let mut buf = [0; HEADER_SIZE];
        buf[..2].copy_from_slice(&self.byte_order.marker());
        match self.byte_order {
            ByteOrder::LittleEndian => {
                LittleEndian::write_u16(&mut buf[2..4], TIFF_FORTY_TWO);
                LittleEndian::write_u32(&mut buf[4..], self.first_ifd_offset);
            }
            ByteOrder::BigEndian => {
                BigEndian::write_u16(&mut buf[2..4], TIFF_FORTY_TWO);
                BigEndian::write_u32(&mut buf[4..], self.first_ifd_offset);
            }
        }
        buf
    }
}

/// Returns true if `buf` starts with a valid TIFF header.
///
/// This is a cheap check of the first 8 bytes.  The IFDs are not
/// looked at, so `Tiff::parse` may still fail on the same data.
///
/// # Examples
/// ```
/// use exif_tiff::is_tiff;
/// assert!(is_tiff(b"MM\0\x2a\0\0\0\0"));
/// assert!(!is_tiff(b"MM\x2a\0\0\0\0\0"));
/// assert!(!is_tiff(b"MM\0\x2a"));
/// ```
pub fn is_tiff(buf: &[u8]) -> bool {
    Header::read(buf).is_ok()
}

/// A TIFF container: the byte order and the optional root directory.
///
/// # Examples
/// ```
/// use exif_tiff::{ByteOrder, Tiff};
/// let data = b"MM\0\x2a\0\0\0\0";
/// let tiff: Tiff = Tiff::parse(data)?;
/// assert_eq!(tiff.byte_order(), ByteOrder::BigEndian);
/// assert!(tiff.root().is_none());
/// assert_eq!(tiff.serialize(ByteOrder::BigEndian)?, data);
/// # Ok::<(), exif_tiff::Error>(())
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Tiff<D = Ifd> {
    byte_order: ByteOrder,
    root: Option<D>,
}

impl<D> Tiff<D>
where
    D: Directory,
{
    /// Builds a container to be serialized later.
    pub fn new(byte_order: ByteOrder, root: Option<D>) -> Self {
        Self { byte_order, root }
    }

    /// Parses a TIFF container with the default limits.
    /// See `Reader` to change them.
    pub fn parse(data: &[u8]) -> Result<Self, Error> {
        Reader::new().read_raw(data)
    }

    /// Returns the byte order detected by `parse` or given to `new`.
    #[inline]
    pub fn byte_order(&self) -> ByteOrder {
        self.byte_order
    }

    #[inline]
    pub fn root(&self) -> Option<&D> {
        self.root.as_ref()
    }

    #[inline]
    pub fn root_mut(&mut self) -> Option<&mut D> {
        self.root.as_mut()
    }

    #[inline]
    pub fn into_root(self) -> Option<D> {
        self.root
    }

    /// Encodes the container in `order`, which need not be the order
    /// it was parsed with.
    ///
    /// The root IFD, if any, is placed right after the header, so the
    /// first IFD offset is always 8.  Without a root the result is the
    /// 8-byte header with a zero offset.
    pub fn serialize(&self, order: ByteOrder) -> Result<Vec<u8>, Error> {
        let header = Header {
            byte_order: order,
            first_ifd_offset: match self.root {
                Some(_) => HEADER_SIZE as u32,
                None => 0,
            },
        };
        let mut out = header.to_bytes().to_vec();
        if let Some(ref root) = self.root {
            out.extend(root.serialize_at(HEADER_SIZE as u32, order)?);
        }
        Ok(out)
    }

    /// Encodes the container in `order` and writes it into `w`.
    pub fn write<W>(&self, w: &mut W, order: ByteOrder) -> Result<(), Error>
    where
        W: io::Write,
    {
        w.write_all(&self.serialize(order)?)?;
        w.flush()?;
        Ok(())
    }
}

impl<D> fmt::Display for Tiff<D>
where
    D: fmt::Display,
{
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(f, "TIFF container")?;
        match self.root {
            Some(ref root) => write!(f, "{}", root),
            None => Ok(()),
        }
    }
}
