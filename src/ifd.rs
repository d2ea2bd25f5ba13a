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

use std::collections::HashSet;
use std::fmt;

use byteorder::{BigEndian, ByteOrder as Endian, LittleEndian};
use log::{trace, warn};

use crate::endian::ByteOrder;
use crate::error::StructuralError;
use crate::value::{FieldType, Value};
use crate::window::Window;

/// Resource limits applied while a directory tree is parsed.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Limits {
    /// The maximum number of IFDs linked by next-IFD offsets
    /// in one chain.
    pub max_chained_ifds: usize,
    /// The maximum nesting of sub-IFDs below the root.
    pub max_depth: usize,
    /// The maximum total size in bytes of the values decoded from one
    /// tree.  `None` allows `VALUE_BYTES_PER_BYTE` times the size of
    /// the window, so that entries sharing one large value cannot
    /// blow up the memory use.
    pub max_value_bytes: Option<usize>,
}

/// The default budget of decoded value bytes per byte of input.
pub const VALUE_BYTES_PER_BYTE: usize = 4;

impl Default for Limits {
    fn default() -> Self {
        Self {
            max_chained_ifds: 8,
            max_depth: 4,
            max_value_bytes: None,
        }
    }
}

impl Limits {
    // Returns the value budget for a window of `len` bytes.
    fn value_bytes_for(&self, len: usize) -> usize {
        self.max_value_bytes
            .unwrap_or_else(|| len.saturating_mul(VALUE_BYTES_PER_BYTE))
    }
}

/// A directory tree that a TIFF container can own.
///
/// The container hands the tree its window and the header offset,
/// and asks it to lay itself out after the 8-byte header when
/// serialized.  `Display` gives the diagnostic dump.
pub trait Directory: Sized + fmt::Display {
    /// Parses the directory at `offset` and everything it references.
    fn parse_at(
        window: Window<'_>,
        offset: u32,
        order: ByteOrder,
        limits: &Limits,
    ) -> Result<Self, StructuralError>;

    /// Encodes the tree as if the returned bytes were placed at `base`
    /// in the container.  All offsets written are relative to the
    /// start of the container.
    ///
    /// A tree that `parse_at` would reject under the default limits
    /// must be rejected here too, so that serialized data always
    /// parses back.
    fn serialize_at(&self, base: u32, order: ByteOrder) -> Result<Vec<u8>, StructuralError>;
}

// Tags whose LONG value is the offset of a child IFD.
#[derive(Debug, Copy, Clone, PartialEq, enumn::N)]
#[repr(u16)]
enum PointerTag {
    SubIfds = 0x014a,
    ExifIfd = 0x8769,
    GpsInfoIfd = 0x8825,
    InteropIfd = 0xa005,
}

/// One IFD entry.
#[derive(Debug, Clone, PartialEq)]
pub struct Entry {
    /// The tag number.
    pub tag: u16,
    pub value: Value,
}

/// An Image File Directory together with its sub-IFDs and the IFDs
/// linked after it.
///
/// In Exif data the first linked IFD is the thumbnail IFD.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Ifd {
    pub entries: Vec<Entry>,
    pub next: Option<Box<Ifd>>,
}

impl Ifd {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends an entry.  Entries are sorted by tag when written.
    pub fn push(&mut self, tag: u16, value: Value) {
        self.entries.push(Entry { tag, value });
    }

    /// Returns the value of the first entry with `tag`.
    pub fn get(&self, tag: u16) -> Option<&Value> {
        self.entries
            .iter()
            .find(|e| e.tag == tag)
            .map(|e| &e.value)
    }

    /// Returns this IFD and the IFDs linked after it, in order.
    pub fn chain(&self) -> impl Iterator<Item = &Ifd> {
        std::iter::successors(Some(self), |ifd| ifd.next.as_deref())
    }

    fn fmt_at(&self, f: &mut fmt::Formatter, depth: usize) -> fmt::Result {
        let w = depth * 2;
        writeln!(f, "{:w$}IFD ({} entries)", "", self.entries.len(), w = w)?;
        for e in &self.entries {
            write!(f, "{:w$}  0x{:04x} ", "", e.tag, w = w)?;
            if let Some(typ) = FieldType::from_number(written_type(e)) {
                write!(f, "{} ", typ)?;
            }
            writeln!(f, "{}", e.value)?;
            if let Value::SubIfds(ref children) = e.value {
                for child in children {
                    child.fmt_at(f, depth + 2)?;
                }
            }
        }
        if let Some(ref next) = self.next {
            writeln!(f, "{:w$}next:", "", w = w)?;
            next.fmt_at(f, depth)?;
        }
        Ok(())
    }
}

impl fmt::Display for Ifd {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        self.fmt_at(f, 0)
    }
}

impl Directory for Ifd {
    fn parse_at(
        window: Window<'_>,
        offset: u32,
        order: ByteOrder,
        limits: &Limits,
    ) -> Result<Self, StructuralError> {
        let value_limit = limits.value_bytes_for(window.len());
        let mut parser = IfdParser {
            window,
            order,
            limits,
            visited: HashSet::new(),
            value_limit,
            value_budget: value_limit,
        };
        parser.parse_chain(offset, 0, 0)
    }

    fn serialize_at(&self, base: u32, order: ByteOrder) -> Result<Vec<u8>, StructuralError> {
        trace!("Writing IFD tree at offset {} ({})", base, order);
        self.check_limits(&Limits::default(), 0)?;
        let mut out = Vec::new();
        match order {
            ByteOrder::LittleEndian => self.write_ifd::<LittleEndian>(&mut out, base)?,
            ByteOrder::BigEndian => self.write_ifd::<BigEndian>(&mut out, base)?,
        }
        Ok(out)
    }
}

// Type number that goes to the file for an entry.
fn written_type(e: &Entry) -> u16 {
    match e.value {
        Value::SubIfds(_) if PointerTag::n(e.tag).is_none() => FieldType::Ifd.number(),
        _ => e.value.type_number(),
    }
}

struct IfdParser<'a, 'l> {
    window: Window<'a>,
    order: ByteOrder,
    limits: &'l Limits,
    // Offsets of the IFDs seen so far, to reject loops.
    visited: HashSet<u32>,
    value_limit: usize,
    // Bytes of values that may still be decoded.
    value_budget: usize,
}

impl<'a, 'l> IfdParser<'a, 'l> {
    // Parses the IFD at `offset` and the IFDs linked after it.
    // `index` is the position of this IFD in its chain.
    fn parse_chain(
        &mut self,
        offset: u32,
        depth: usize,
        index: usize,
    ) -> Result<Ifd, StructuralError> {
        if index >= self.limits.max_chained_ifds {
            return Err(StructuralError::TooManyIfds(self.limits.max_chained_ifds));
        }
        let (mut ifd, next) = self.parse_ifd(offset, depth)?;
        if next != 0 {
            ifd.next = Some(Box::new(self.parse_chain(next, depth, index + 1)?));
        }
        Ok(ifd)
    }

    // Parses one IFD [EXIF23 4.6.2] and returns it with the offset
    // of the next IFD.
    fn parse_ifd(&mut self, offset: u32, depth: usize) -> Result<(Ifd, u32), StructuralError> {
        if !self.visited.insert(offset) {
            return Err(StructuralError::CyclicOffset(offset));
        }
        trace!("Parsing IFD at offset {} (depth {})", offset, depth);
        let offset = offset as usize;
        let count = self.window.read_u16(offset, self.order)? as usize;
        // The entries and the next IFD offset must be in the window
        // before any of them is looked at.
        self.window.bytes(offset + 2, count * 12 + 4)?;

        let mut entries = Vec::with_capacity(count);
        for i in 0..count {
            entries.push(self.parse_entry(offset + 2 + i * 12, depth)?);
        }
        let next = self.window.read_u32(offset + 2 + count * 12, self.order)?;
        Ok((Ifd { entries, next: None }, next))
    }

    fn parse_entry(&mut self, at: usize, depth: usize) -> Result<Entry, StructuralError> {
        let tag = self.window.read_u16(at, self.order)?;
        let typ = self.window.read_u16(at + 2, self.order)?;
        let cnt = self.window.read_u32(at + 4, self.order)?;
        let valofs_at = at + 8;

        let typ = match FieldType::from_number(typ) {
            Some(t) => t,
            None => {
                let mut raw = [0; 4];
                raw.copy_from_slice(self.window.bytes(valofs_at, 4)?);
                return Ok(Entry {
                    tag,
                    value: Value::Unknown(typ, cnt, raw),
                });
            }
        };
        let vallen = typ
            .unit_size()
            .checked_mul(cnt as usize)
            .ok_or(StructuralError::InvalidCount { tag, count: cnt })?;
        let buf = if vallen <= 4 {
            self.window.bytes(valofs_at, vallen)?
        } else {
            let ofs = self.window.read_u32(valofs_at, self.order)? as usize;
            self.window.bytes(ofs, vallen)?
        };
        self.value_budget = self
            .value_budget
            .checked_sub(vallen)
            .ok_or(StructuralError::TooMuchValueData(self.value_limit))?;
        let value = Value::decode(typ, buf, self.order);

        let is_pointer = match typ {
            FieldType::Ifd => true,
            FieldType::Long => PointerTag::n(tag).is_some(),
            _ => false,
        };
        let value = match value {
            Value::Long(offsets) if is_pointer => self.parse_children(&offsets, depth)?,
            v => v,
        };
        Ok(Entry { tag, value })
    }

    fn parse_children(&mut self, offsets: &[u32], depth: usize) -> Result<Value, StructuralError> {
        if depth >= self.limits.max_depth {
            return Err(StructuralError::TooDeep(self.limits.max_depth));
        }
        let children = offsets
            .iter()
            .map(|&ofs| self.parse_chain(ofs, depth + 1, 0))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Value::SubIfds(children))
    }
}

impl Ifd {
    // Applies the chain and depth limits of the parser to a tree
    // about to be written.
    fn check_limits(&self, limits: &Limits, depth: usize) -> Result<(), StructuralError> {
        for (index, ifd) in self.chain().enumerate() {
            if index >= limits.max_chained_ifds {
                return Err(StructuralError::TooManyIfds(limits.max_chained_ifds));
            }
            for e in &ifd.entries {
                if let Value::SubIfds(ref children) = e.value {
                    if depth >= limits.max_depth {
                        return Err(StructuralError::TooDeep(limits.max_depth));
                    }
                    for child in children {
                        child.check_limits(limits, depth + 1)?;
                    }
                }
            }
        }
        Ok(())
    }
}

// Where the offsets of child IFDs are to be patched in.
enum Slot {
    Block(usize),
    Data(usize),
}

// Returns the offset in the container of the next byte appended to
// `out`, whose first byte is at `start`.
fn offset_of(start: u32, out: &[u8]) -> Result<u32, StructuralError> {
    u32::try_from(out.len())
        .ok()
        .and_then(|len| start.checked_add(len))
        .ok_or(StructuralError::OffsetOverflow)
}

fn put_u16<E: Endian>(out: &mut Vec<u8>, n: u16) {
    let mut buf = [0; 2];
    E::write_u16(&mut buf, n);
    out.extend_from_slice(&buf);
}

fn put_u32<E: Endian>(out: &mut Vec<u8>, n: u32) {
    let mut buf = [0; 4];
    E::write_u32(&mut buf, n);
    out.extend_from_slice(&buf);
}

impl Ifd {
    // Writes this IFD, the values that do not fit in the entries, the
    // sub-IFDs, and finally the IFDs linked after it.
    fn write_ifd<E>(&self, out: &mut Vec<u8>, start: u32) -> Result<(), StructuralError>
    where
        E: Endian,
    {
        let here = offset_of(start, out)?;
        let count = u16::try_from(self.entries.len())
            .map_err(|_| StructuralError::TooManyEntries(self.entries.len()))?;
        let mut entries: Vec<&Entry> = self.entries.iter().collect();
        entries.sort_by_key(|e| e.tag);

        let ifd_pos = out.len();
        let block_len = 2 + 12 * count as u32 + 4;
        let data_at = here
            .checked_add(block_len)
            .ok_or(StructuralError::OffsetOverflow)?;
        let mut data = Vec::new();
        let mut patches = Vec::new();

        put_u16::<E>(out, count);
        for e in entries {
            let cnt = u32::try_from(e.value.count())
                .map_err(|_| StructuralError::OffsetOverflow)?;
            put_u16::<E>(out, e.tag);
            put_u16::<E>(out, written_type(e));
            put_u32::<E>(out, cnt);

            let len = e.value.byte_len();
            if let Value::Unknown(typ, cnt, _) = e.value {
                // Units of an unknown type may be any size, so the four
                // bytes can be an offset that no longer points anywhere.
                if cnt > 4 {
                    warn!(
                        "Tag 0x{:04x} of unknown type {} copied with its original offset",
                        e.tag, typ
                    );
                }
            }
            let mut encoded = Vec::with_capacity(len);
            e.value.encode::<E>(&mut encoded);
            // Sub-IFD offsets are zero until the children are placed.
            encoded.resize(len, 0);
            if len <= 4 {
                if let Value::SubIfds(ref children) = e.value {
                    patches.push((Slot::Block(out.len()), children));
                }
                encoded.resize(4, 0);
                out.extend_from_slice(&encoded);
            } else {
                put_u32::<E>(out, offset_of(data_at, &data)?);
                if let Value::SubIfds(ref children) = e.value {
                    patches.push((Slot::Data(data.len()), children));
                }
                data.extend_from_slice(&encoded);
                // Keep the next value at a word boundary.
                if len % 2 != 0 {
                    data.push(0);
                }
            }
        }
        let next_pos = out.len();
        put_u32::<E>(out, 0);
        let data_pos = out.len();
        out.extend_from_slice(&data);

        for (slot, children) in patches {
            let pos = match slot {
                Slot::Block(pos) => pos,
                Slot::Data(pos) => data_pos + pos,
            };
            for (i, child) in children.iter().enumerate() {
                let child_at = offset_of(start, out)?;
                child.write_ifd::<E>(out, start)?;
                E::write_u32(&mut out[pos + i * 4..pos + i * 4 + 4], child_at);
            }
        }

        if let Some(ref next) = self.next {
            let next_at = offset_of(start, out)?;
            next.write_ifd::<E>(out, start)?;
            E::write_u32(&mut out[next_pos..next_pos + 4], next_at);
        }
        debug_assert_eq!(ifd_pos + block_len as usize, data_pos);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(data: &[u8], offset: u32, order: ByteOrder) -> Result<Ifd, StructuralError> {
        Ifd::parse_at(Window::new(data), offset, order, &Limits::default())
    }

    // One IFD at 8 with ImageWidth (SHORT 20) and no next IFD.
    const SIMPLE_BE: &[u8] = b"MM\0\x2a\0\0\0\x08\
                               \0\x01\x01\0\0\x03\0\0\0\x01\0\x14\0\0\0\0\0\0";

    #[test]
    fn parse_simple() {
        let ifd = parse(SIMPLE_BE, 8, ByteOrder::BigEndian).unwrap();
        assert_eq!(ifd.entries.len(), 1);
        assert_eq!(ifd.get(0x0100), Some(&Value::Short(vec![20])));
        assert!(ifd.next.is_none());
    }

    #[test]
    fn truncated() {
        let mut data = SIMPLE_BE.to_vec();
        parse(&data, 8, ByteOrder::BigEndian).unwrap();
        while data.pop().is_some() {
            assert_err_pat!(
                parse(&data, 8, ByteOrder::BigEndian),
                StructuralError::OutOfBounds { .. }
            );
        }
    }

    #[test]
    fn out_of_line_value() {
        // ASCII "Test\0" does not fit in 4 bytes and lives at 0x1a.
        let data = b"II\x2a\0\x08\0\0\0\
                     \x01\0\x0e\x01\x02\0\x05\0\0\0\x1a\0\0\0\0\0\0\0\
                     Test\0";
        let ifd = parse(data, 8, ByteOrder::LittleEndian).unwrap();
        assert_eq!(ifd.get(0x010e), Some(&Value::Ascii(b"Test\0".to_vec())));

        let short = &data[..data.len() - 1];
        assert_err_pat!(
            parse(short, 8, ByteOrder::LittleEndian),
            StructuralError::OutOfBounds { offset: 0x1a, len: 5, .. }
        );
    }

    #[test]
    fn unknown_field() {
        let data = b"MM\0\x2a\0\0\0\x08\
                     \0\x01\x01\0\xff\xff\0\0\0\x01\0\x14\0\0\0\0\0\0";
        let ifd = parse(data, 8, ByteOrder::BigEndian).unwrap();
        assert_eq!(
            ifd.get(0x0100),
            Some(&Value::Unknown(0xffff, 1, *b"\0\x14\0\0"))
        );
    }

    #[test]
    fn invalid_count() {
        let data = b"MM\0\x2a\0\0\0\x08\
                     \0\x01\x01\0\0\x05\xff\xff\xff\xff\0\0\0\0\0\0\0\0";
        let r = parse(data, 8, ByteOrder::BigEndian);
        if usize::BITS == 32 {
            assert_err_pat!(r, StructuralError::InvalidCount { tag: 0x0100, .. });
        } else {
            assert_err_pat!(r, StructuralError::OutOfBounds { .. });
        }
    }

    #[test]
    fn inf_loop_by_next() {
        let data = b"MM\0\x2a\0\0\0\x08\
                     \0\x01\x01\0\0\x03\0\0\0\x01\0\x14\0\0\0\0\0\x08";
        assert_err_pat!(
            parse(data, 8, ByteOrder::BigEndian),
            StructuralError::CyclicOffset(8)
        );
    }

    #[test]
    fn inf_loop_by_exif_pointer() {
        // The Exif IFD at 0x1a points back to IFD0.
        let data = b"MM\x00\x2a\x00\x00\x00\x08\
                     \x00\x01\x87\x69\x00\x04\x00\x00\x00\x01\x00\x00\x00\x1a\
                     \x00\x00\x00\x00\
                     \x00\x01\x87\x69\x00\x04\x00\x00\x00\x01\x00\x00\x00\x08\
                     \x00\x00\x00\x00";
        assert_err_pat!(
            parse(data, 8, ByteOrder::BigEndian),
            StructuralError::CyclicOffset(8)
        );
    }

    #[test]
    fn exif_pointer() {
        let data = b"MM\x00\x2a\x00\x00\x00\x08\
                     \x00\x01\x87\x69\x00\x04\x00\x00\x00\x01\x00\x00\x00\x1a\
                     \x00\x00\x00\x00\
                     \x00\x01\x90\x00\x00\x07\x00\x00\x00\x040231\
                     \x00\x00\x00\x00";
        let ifd = parse(data, 8, ByteOrder::BigEndian).unwrap();
        match ifd.get(0x8769) {
            Some(Value::SubIfds(children)) => {
                assert_eq!(children.len(), 1);
                assert_eq!(
                    children[0].get(0x9000),
                    Some(&Value::Undefined(b"0231".to_vec()))
                );
            }
            v => panic!("wrong value {:?}", v),
        }
    }

    // A chain of IFDs with no entries, each pointing to the next.
    fn empty_chain(len: usize) -> Vec<u8> {
        let mut data = b"II\x2a\0\x08\0\0\0".to_vec();
        for i in 0..len {
            let next = if i + 1 == len { 0 } else { 8 + 6 * (i as u32 + 1) };
            data.extend_from_slice(&[0, 0]);
            data.extend_from_slice(&next.to_le_bytes());
        }
        data
    }

    #[test]
    fn chain_limit() {
        let limits = Limits::default();
        let data = empty_chain(8);
        let ifd = parse(&data, 8, ByteOrder::LittleEndian).unwrap();
        assert_eq!(ifd.chain().count(), 8);

        let data = empty_chain(9);
        assert_err_pat!(
            parse(&data, 8, ByteOrder::LittleEndian),
            StructuralError::TooManyIfds(8)
        );
        let relaxed = Limits {
            max_chained_ifds: 9,
            ..limits
        };
        let ifd = Ifd::parse_at(Window::new(&data), 8, ByteOrder::LittleEndian, &relaxed).unwrap();
        assert_eq!(ifd.chain().count(), 9);
    }

    #[test]
    fn depth_limit() {
        // Each IFD holds a single Exif pointer to the one after it.
        let mut ifd = Ifd::new();
        for _ in 0..3 {
            let mut parent = Ifd::new();
            parent.push(0x8769, Value::SubIfds(vec![ifd]));
            ifd = parent;
        }
        let mut data = b"II\x2a\0\x08\0\0\0".to_vec();
        data.extend(ifd.serialize_at(8, ByteOrder::LittleEndian).unwrap());

        let limits = Limits {
            max_depth: 3,
            ..Limits::default()
        };
        let parsed = Ifd::parse_at(Window::new(&data), 8, ByteOrder::LittleEndian, &limits).unwrap();
        assert_eq!(parsed, ifd);
        let limits = Limits {
            max_depth: 2,
            ..limits
        };
        assert_err_pat!(
            Ifd::parse_at(Window::new(&data), 8, ByteOrder::LittleEndian, &limits),
            StructuralError::TooDeep(2)
        );
    }

    // An IFD with `levels` Exif pointers nested below it.
    fn nested(levels: usize) -> Ifd {
        let mut ifd = Ifd::new();
        for _ in 0..levels {
            let mut parent = Ifd::new();
            parent.push(0x8769, Value::SubIfds(vec![ifd]));
            ifd = parent;
        }
        ifd
    }

    #[test]
    fn write_applies_depth_limit() {
        let ifd = nested(4);
        let mut data = b"MM\0\x2a\0\0\0\x08".to_vec();
        data.extend(ifd.serialize_at(8, ByteOrder::BigEndian).unwrap());
        assert_eq!(parse(&data, 8, ByteOrder::BigEndian).unwrap(), ifd);

        assert_err_pat!(
            nested(5).serialize_at(8, ByteOrder::BigEndian),
            StructuralError::TooDeep(4)
        );
    }

    // IFD0 with `n` UNDEFINED entries that all share one value of `len`
    // bytes placed after the IFD.
    fn shared_value(n: u16, len: u32) -> Vec<u8> {
        let mut data = b"II\x2a\0\x08\0\0\0".to_vec();
        let value_at = 8 + 2 + 12 * n as u32 + 4;
        data.extend_from_slice(&n.to_le_bytes());
        for i in 0..n {
            data.extend_from_slice(&(0x1000 + i).to_le_bytes());
            data.extend_from_slice(&7u16.to_le_bytes());
            data.extend_from_slice(&len.to_le_bytes());
            data.extend_from_slice(&value_at.to_le_bytes());
        }
        data.extend_from_slice(&[0; 4]);
        data.resize(data.len() + len as usize, 0xaa);
        data
    }

    #[test]
    fn value_budget() {
        let data = shared_value(1, 1000);
        let ifd = parse(&data, 8, ByteOrder::LittleEndian).unwrap();
        assert_eq!(ifd.get(0x1000), Some(&Value::Undefined(vec![0xaa; 1000])));

        // 100 copies of 1000 bytes out of a 2214-byte window.
        let data = shared_value(100, 1000);
        assert_eq!(data.len(), 2214);
        assert_err_pat!(
            parse(&data, 8, ByteOrder::LittleEndian),
            StructuralError::TooMuchValueData(8856)
        );
        let limits = Limits {
            max_value_bytes: Some(100_000),
            ..Limits::default()
        };
        let ifd = Ifd::parse_at(Window::new(&data), 8, ByteOrder::LittleEndian, &limits).unwrap();
        assert_eq!(ifd.entries.len(), 100);
        let limits = Limits {
            max_value_bytes: Some(99_999),
            ..limits
        };
        assert_err_pat!(
            Ifd::parse_at(Window::new(&data), 8, ByteOrder::LittleEndian, &limits),
            StructuralError::TooMuchValueData(99_999)
        );
    }

    #[test]
    fn unknown_type_written_verbatim() {
        // Eight units of an unknown type: the four bytes are the
        // original offset and are copied as they are.
        let mut ifd = Ifd::new();
        ifd.push(0x9999, Value::Unknown(0x20, 8, *b"\0\0\x01\0"));
        let body = ifd.serialize_at(8, ByteOrder::BigEndian).unwrap();
        assert_eq!(
            body,
            b"\0\x01\x99\x99\0\x20\0\0\0\x08\0\0\x01\0\0\0\0\0"
        );
        let mut data = b"MM\0\x2a\0\0\0\x08".to_vec();
        data.extend(body);
        assert_eq!(parse(&data, 8, ByteOrder::BigEndian).unwrap(), ifd);
    }

    fn sample() -> Ifd {
        let mut exif = Ifd::new();
        exif.push(0x9000, Value::Undefined(b"0231".to_vec()));
        exif.push(0x829a, Value::Rational(vec![(1, 125).into()]));

        let mut thumbnail = Ifd::new();
        thumbnail.push(0x0103, Value::Short(vec![6]));

        let mut ifd0 = Ifd::new();
        ifd0.push(0x8769, Value::SubIfds(vec![exif]));
        ifd0.push(0x010e, Value::Ascii(b"Test image\0".to_vec()));
        ifd0.push(0x0100, Value::Short(vec![17]));
        ifd0.push(0x0101, Value::Long(vec![15]));
        ifd0.push(0x011a, Value::Rational(vec![(72, 1).into()]));
        ifd0.push(0xfde8, Value::Float(vec![f32::MIN]));
        ifd0.push(0xfde9, Value::Double(vec![f64::MIN]));
        ifd0.push(0x014a, Value::SubIfds(vec![Ifd::new(), Ifd::new()]));
        ifd0.next = Some(Box::new(thumbnail));
        ifd0
    }

    fn sorted(mut ifd: Ifd) -> Ifd {
        ifd.entries.sort_by_key(|e| e.tag);
        for e in &mut ifd.entries {
            if let Value::SubIfds(ref mut children) = e.value {
                *children = std::mem::take(children).into_iter().map(sorted).collect();
            }
        }
        ifd.next = ifd.next.map(|n| Box::new(sorted(*n)));
        ifd
    }

    #[test]
    fn write_then_parse() {
        for order in [ByteOrder::LittleEndian, ByteOrder::BigEndian] {
            let ifd = sample();
            let mut data = order.marker().to_vec();
            data.extend_from_slice(&[0; 6]);
            let body = ifd.serialize_at(8, order).unwrap();
            data.extend_from_slice(&body);
            let parsed = parse(&data, 8, order).unwrap();
            assert_eq!(parsed, sorted(ifd));
        }
    }

    #[test]
    fn write_layout() {
        let mut ifd = Ifd::new();
        ifd.push(0x0101, Value::Short(vec![2]));
        ifd.push(0x0100, Value::Short(vec![1]));
        ifd.push(0x010e, Value::Ascii(b"abc\0d".to_vec()));
        let body = ifd.serialize_at(8, ByteOrder::BigEndian).unwrap();
        // 2 + 3 * 12 + 4 = 42 bytes of IFD, then 5 + 1 bytes of value.
        assert_eq!(
            body,
            b"\0\x03\
              \x01\x00\0\x03\0\0\0\x01\0\x01\0\0\
              \x01\x01\0\x03\0\0\0\x01\0\x02\0\0\
              \x01\x0e\0\x02\0\0\0\x05\0\0\0\x32\
              \0\0\0\0\
              abc\0d\0"
        );
    }

    #[test]
    fn sub_ifd_types() {
        let mut ifd = Ifd::new();
        ifd.push(0x8769, Value::SubIfds(vec![Ifd::new()]));
        ifd.push(0xc000, Value::SubIfds(vec![Ifd::new()]));
        let body = ifd.serialize_at(8, ByteOrder::BigEndian).unwrap();
        // Known pointer tags are written as LONG, others as IFD.
        assert_eq!(&body[4..6], b"\0\x04");
        assert_eq!(&body[16..18], b"\0\x0d");
    }

    #[test]
    fn display() {
        let mut exif = Ifd::new();
        exif.push(0x9000, Value::Undefined(b"0231".to_vec()));
        let mut ifd = Ifd::new();
        ifd.push(0x0100, Value::Short(vec![17]));
        ifd.push(0x8769, Value::SubIfds(vec![exif]));
        ifd.next = Some(Box::new(Ifd::new()));
        assert_eq!(
            ifd.to_string(),
            "IFD (2 entries)\n\
             \x20 0x0100 SHORT [17]\n\
             \x20 0x8769 LONG 1 sub-IFD(s)\n\
             \x20   IFD (1 entries)\n\
             \x20     0x9000 UNDEFINED 4 bytes\n\
             next:\n\
             IFD (0 entries)\n"
        );
    }
}
