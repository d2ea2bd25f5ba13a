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

use byteorder::ByteOrder as _;
use byteorder::{BigEndian, LittleEndian};

use crate::endian::ByteOrder;
use crate::error::StructuralError;

/// A bounded, read-only view of the bytes of one TIFF container.
///
/// All offsets are relative to the start of the window.  Reads that
/// would cross its end fail with `StructuralError::OutOfBounds`.
#[derive(Debug, Copy, Clone)]
pub struct Window<'a> {
    data: &'a [u8],
}

impl<'a> Window<'a> {
    #[inline]
    pub fn new(data: &'a [u8]) -> Self {
        Self { data }
    }

    /// Returns the size of the window in bytes.
    #[inline]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    #[inline]
    pub fn as_bytes(&self) -> &'a [u8] {
        self.data
    }

    /// Returns `len` bytes starting at `offset`.
    pub fn bytes(&self, offset: usize, len: usize) -> Result<&'a [u8], StructuralError> {
        // (offset + len) is checked so that a crafted offset cannot wrap.
        offset
            .checked_add(len)
            .and_then(|end| self.data.get(offset..end))
            .ok_or(StructuralError::OutOfBounds {
                offset,
                len,
                size: self.data.len(),
            })
    }

    /// Returns true if the bytes at `offset` equal `expected`.
    /// A range outside the window never matches.
    #[inline]
    pub fn matches(&self, offset: usize, expected: &[u8]) -> bool {
        self.bytes(offset, expected.len())
            .map_or(false, |b| b == expected)
    }

    #[inline]
    pub fn read_u8(&self, offset: usize) -> Result<u8, StructuralError> {
        Ok(self.bytes(offset, 1)?[0])
    }

    pub fn read_u16(&self, offset: usize, order: ByteOrder) -> Result<u16, StructuralError> {
        let buf = self.bytes(offset, 2)?;
        Ok(match order {
            ByteOrder::LittleEndian => LittleEndian::read_u16(buf),
            ByteOrder::BigEndian => BigEndian::read_u16(buf),
        })
    }

    pub fn read_u32(&self, offset: usize, order: ByteOrder) -> Result<u32, StructuralError> {
        let buf = self.bytes(offset, 4)?;
        Ok(match order {
            ByteOrder::LittleEndian => LittleEndian::read_u32(buf),
            ByteOrder::BigEndian => BigEndian::read_u32(buf),
        })
    }
}

impl<'a> From<&'a [u8]> for Window<'a> {
    fn from(data: &'a [u8]) -> Self {
        Window::new(data)
    }
}
