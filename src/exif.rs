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

//! Exif data as carried in a JPEG APP1 segment [EXIF23 4.5.4].
//!
//! The segment payload is the Exif identifier followed by a TIFF
//! container.  Offsets inside the container count from its own header,
//! not from the start of the segment.

use crate::endian::ByteOrder;
use crate::error::Error;
use crate::ifd::Directory;
use crate::reader::Reader;
use crate::tiff::{is_tiff, Tiff};
use crate::window::Window;

/// The identifier that precedes the TIFF data in an APP1 segment.
pub const EXIF_ID: [u8; 6] = *b"Exif\0\0";

/// Returns the TIFF container embedded in an APP1 payload.
pub fn tiff_payload(app1: &[u8]) -> Result<&[u8], Error> {
    if !Window::new(app1).matches(0, &EXIF_ID) {
        return Err(Error::MissingExifHeader);
    }
    Ok(&app1[EXIF_ID.len()..])
}

/// Returns true if `app1` is an Exif payload with a valid TIFF header.
pub fn is_exif(app1: &[u8]) -> bool {
    tiff_payload(app1).map_or(false, is_tiff)
}

/// Parses the TIFF container of an APP1 payload with the default limits.
pub fn parse_app1<D>(app1: &[u8]) -> Result<Tiff<D>, Error>
where
    D: Directory,
{
    Reader::new().read_exif(app1)
}

/// Encodes `tiff` in `order` as an APP1 payload.
pub fn to_app1<D>(tiff: &Tiff<D>, order: ByteOrder) -> Result<Vec<u8>, Error>
where
    D: Directory,
{
    let mut out = EXIF_ID.to_vec();
    out.extend(tiff.serialize(order)?);
    Ok(out)
}
