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

use log::debug;

use crate::error::Error;
use crate::exif;
use crate::ifd::{Directory, Limits};
use crate::tiff::{Header, Tiff};
use crate::window::Window;

/// A struct to parse TIFF containers with configurable limits.
///
/// # Examples
/// ```
/// use exif_tiff::{Reader, Tiff};
/// let data = b"II\x2a\0\x08\0\0\0\0\0\0\0\0\0";
/// let tiff: Tiff = Reader::new()
///     .max_chained_ifds(2)
///     .max_depth(1)
///     .read_raw(data)?;
/// assert!(tiff.root().is_some());
/// # Ok::<(), exif_tiff::Error>(())
/// ```
#[derive(Debug, Clone, Default)]
pub struct Reader {
    limits: Limits,
}

impl Reader {
    /// Constructs a new `Reader` with the default limits.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the maximum number of IFDs in one next-IFD chain.
    pub fn max_chained_ifds(mut self, n: usize) -> Self {
        self.limits.max_chained_ifds = n;
        self
    }

    /// Sets the maximum nesting of sub-IFDs.
    pub fn max_depth(mut self, n: usize) -> Self {
        self.limits.max_depth = n;
        self
    }

    /// Sets the maximum total size in bytes of the decoded values.
    pub fn max_value_bytes(mut self, n: usize) -> Self {
        self.limits.max_value_bytes = Some(n);
        self
    }

    #[inline]
    pub fn limits(&self) -> &Limits {
        &self.limits
    }

    /// Parses a TIFF container from raw TIFF data.
    /// If an error occurred, `exif_tiff::Error` is returned.
    pub fn read_raw<D>(&self, data: &[u8]) -> Result<Tiff<D>, Error>
    where
        D: Directory,
    {
        let header = Header::read(data)?;
        debug!("Detected byte order: {}", header.byte_order);
        let root = match header.first_ifd_offset {
            0 => {
                debug!("TIFF container has no IFD");
                None
            }
            offset => {
                debug!("First IFD at offset {}", offset);
                Some(D::parse_at(
                    Window::new(data),
                    offset,
                    header.byte_order,
                    &self.limits,
                )?)
            }
        };
        Ok(Tiff::new(header.byte_order, root))
    }

    /// Parses a TIFF container from the payload of a JPEG APP1 segment,
    /// which starts with the Exif identifier.
    pub fn read_exif<D>(&self, app1: &[u8]) -> Result<Tiff<D>, Error>
    where
        D: Directory,
    {
        self.read_raw(exif::tiff_payload(app1)?)
    }
}
