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

use byteorder::{BigEndian, ByteOrder as Endian, LittleEndian};
use num_derive::FromPrimitive;
use num_traits::FromPrimitive as _;

use crate::endian::ByteOrder;
use crate::ifd::Ifd;

/// TIFF field types [TIFF6 Section 2, EXIF23 4.6.2].
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, FromPrimitive)]
#[repr(u16)]
pub enum FieldType {
    Byte = 1,
    Ascii = 2,
    Short = 3,
    Long = 4,
    Rational = 5,
    SByte = 6,
    Undefined = 7,
    SShort = 8,
    SLong = 9,
    SRational = 10,
    Float = 11,
    Double = 12,
    /// A LONG that holds the offset of a child IFD [TIFF Tech Note 1].
    Ifd = 13,
}

impl FieldType {
    /// Looks up a type by its number.  Unknown numbers yield `None`.
    #[inline]
    pub fn from_number(n: u16) -> Option<FieldType> {
        FieldType::from_u16(n)
    }

    #[inline]
    pub fn number(self) -> u16 {
        self as u16
    }

    /// Returns the size in bytes of one element of this type.
    pub fn unit_size(self) -> usize {
        match self {
            FieldType::Byte | FieldType::Ascii | FieldType::SByte | FieldType::Undefined => 1,
            FieldType::Short | FieldType::SShort => 2,
            FieldType::Long | FieldType::SLong | FieldType::Float | FieldType::Ifd => 4,
            FieldType::Rational | FieldType::SRational | FieldType::Double => 8,
        }
    }

    fn name(self) -> &'static str {
        match self {
            FieldType::Byte => "BYTE",
            FieldType::Ascii => "ASCII",
            FieldType::Short => "SHORT",
            FieldType::Long => "LONG",
            FieldType::Rational => "RATIONAL",
            FieldType::SByte => "SBYTE",
            FieldType::Undefined => "UNDEFINED",
            FieldType::SShort => "SSHORT",
            FieldType::SLong => "SLONG",
            FieldType::SRational => "SRATIONAL",
            FieldType::Float => "FLOAT",
            FieldType::Double => "DOUBLE",
            FieldType::Ifd => "IFD",
        }
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.pad(self.name())
    }
}

/// An unsigned rational number, which is the pair of the numerator
/// and the denominator.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct Rational {
    pub num: u32,
    pub denom: u32,
}

impl From<(u32, u32)> for Rational {
    fn from(t: (u32, u32)) -> Rational {
        Rational { num: t.0, denom: t.1 }
    }
}

impl fmt::Display for Rational {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}/{}", self.num, self.denom)
    }
}

/// A signed rational number, which is the pair of the numerator
/// and the denominator.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct SRational {
    pub num: i32,
    pub denom: i32,
}

impl From<(i32, i32)> for SRational {
    fn from(t: (i32, i32)) -> SRational {
        SRational { num: t.0, denom: t.1 }
    }
}

impl fmt::Display for SRational {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}/{}", self.num, self.denom)
    }
}

/// The value of an IFD entry.
///
/// Values of known types are held in native form so that they can be
/// written back in either byte order.  Tag semantics are not
/// interpreted; an ASCII value keeps its NUL terminators as is.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Byte(Vec<u8>),
    Ascii(Vec<u8>),
    Short(Vec<u16>),
    Long(Vec<u32>),
    Rational(Vec<Rational>),
    SByte(Vec<i8>),
    Undefined(Vec<u8>),
    SShort(Vec<i16>),
    SLong(Vec<i32>),
    SRational(Vec<SRational>),
    Float(Vec<f32>),
    Double(Vec<f64>),
    /// Child directories referenced by a pointer entry.
    /// Their offsets are recomputed when written.
    SubIfds(Vec<Ifd>),
    /// A value of an unknown type.  The type number, the count, and the
    /// four bytes of the value/offset element are kept verbatim.
    /// When those bytes are an offset, it is written back unchanged
    /// and may no longer point at the payload.
    Unknown(u16, u32, [u8; 4]),
}

impl Value {
    /// Decodes `count` elements of type `typ` from `buf`, whose length
    /// must be `typ.unit_size() * count`.
    ///
    /// An IFD-typed value is decoded as `Value::Long`; resolving the
    /// offsets into directories is up to the caller.
    pub fn decode(typ: FieldType, buf: &[u8], order: ByteOrder) -> Value {
        match order {
            ByteOrder::LittleEndian => Self::decode_sub::<LittleEndian>(typ, buf),
            ByteOrder::BigEndian => Self::decode_sub::<BigEndian>(typ, buf),
        }
    }

    fn decode_sub<E>(typ: FieldType, buf: &[u8]) -> Value
    where
        E: Endian,
    {
        match typ {
            FieldType::Byte => Value::Byte(buf.to_vec()),
            FieldType::Ascii => Value::Ascii(buf.to_vec()),
            FieldType::Undefined => Value::Undefined(buf.to_vec()),
            FieldType::SByte => Value::SByte(buf.iter().map(|&b| b as i8).collect()),
            FieldType::Short => Value::Short(buf.chunks_exact(2).map(E::read_u16).collect()),
            FieldType::SShort => Value::SShort(buf.chunks_exact(2).map(E::read_i16).collect()),
            FieldType::Long | FieldType::Ifd => {
                Value::Long(buf.chunks_exact(4).map(E::read_u32).collect())
            }
            FieldType::SLong => Value::SLong(buf.chunks_exact(4).map(E::read_i32).collect()),
            FieldType::Float => Value::Float(buf.chunks_exact(4).map(E::read_f32).collect()),
            FieldType::Double => Value::Double(buf.chunks_exact(8).map(E::read_f64).collect()),
            FieldType::Rational => Value::Rational(
                buf.chunks_exact(8)
                    .map(|c| (E::read_u32(&c[..4]), E::read_u32(&c[4..])).into())
                    .collect(),
            ),
            FieldType::SRational => Value::SRational(
                buf.chunks_exact(8)
                    .map(|c| (E::read_i32(&c[..4]), E::read_i32(&c[4..])).into())
                    .collect(),
            ),
        }
    }

    /// Returns the field type number written for this value.
    /// Sub-IFD lists are reported as LONG.
    pub fn type_number(&self) -> u16 {
        let typ = match *self {
            Value::Byte(_) => FieldType::Byte,
            Value::Ascii(_) => FieldType::Ascii,
            Value::Short(_) => FieldType::Short,
            Value::Long(_) | Value::SubIfds(_) => FieldType::Long,
            Value::Rational(_) => FieldType::Rational,
            Value::SByte(_) => FieldType::SByte,
            Value::Undefined(_) => FieldType::Undefined,
            Value::SShort(_) => FieldType::SShort,
            Value::SLong(_) => FieldType::SLong,
            Value::SRational(_) => FieldType::SRational,
            Value::Float(_) => FieldType::Float,
            Value::Double(_) => FieldType::Double,
            Value::Unknown(typ, _, _) => return typ,
        };
        typ.number()
    }

    /// Returns the number of elements (the TIFF "count").
    pub fn count(&self) -> usize {
        match *self {
            Value::Byte(ref v) | Value::Ascii(ref v) | Value::Undefined(ref v) => v.len(),
            Value::Short(ref v) => v.len(),
            Value::Long(ref v) => v.len(),
            Value::Rational(ref v) => v.len(),
            Value::SByte(ref v) => v.len(),
            Value::SShort(ref v) => v.len(),
            Value::SLong(ref v) => v.len(),
            Value::SRational(ref v) => v.len(),
            Value::Float(ref v) => v.len(),
            Value::Double(ref v) => v.len(),
            Value::SubIfds(ref v) => v.len(),
            Value::Unknown(_, cnt, _) => cnt as usize,
        }
    }

    /// Returns the encoded size in bytes.  Values of an unknown type
    /// always occupy the four-byte value/offset element.
    pub fn byte_len(&self) -> usize {
        match *self {
            Value::Unknown(..) => 4,
            Value::SubIfds(ref v) => v.len() * 4,
            _ => {
                let unit = FieldType::from_number(self.type_number()).map_or(0, FieldType::unit_size);
                unit * self.count()
            }
        }
    }

    /// Appends the encoded bytes of this value to `out`.
    ///
    /// `Value::SubIfds` has no encoding of its own, because the offsets
    /// of the children are known only to the directory writer.
    pub fn encode<E>(&self, out: &mut Vec<u8>)
    where
        E: Endian,
    {
        if let Value::SubIfds(_) = *self {
            return;
        }
        let start = out.len();
        out.resize(start + self.byte_len(), 0);
        let buf = &mut out[start..];
        match *self {
            Value::Byte(ref v) | Value::Ascii(ref v) | Value::Undefined(ref v) => {
                buf.copy_from_slice(v)
            }
            Value::SByte(ref v) => {
                for (d, &s) in buf.iter_mut().zip(v) {
                    *d = s as u8;
                }
            }
            Value::Short(ref v) => E::write_u16_into(v, buf),
            Value::SShort(ref v) => E::write_i16_into(v, buf),
            Value::Long(ref v) => E::write_u32_into(v, buf),
            Value::SLong(ref v) => E::write_i32_into(v, buf),
            Value::Float(ref v) => E::write_f32_into(v, buf),
            Value::Double(ref v) => E::write_f64_into(v, buf),
            Value::Rational(ref v) => {
                for (c, r) in buf.chunks_exact_mut(8).zip(v) {
                    E::write_u32(&mut c[..4], r.num);
                    E::write_u32(&mut c[4..], r.denom);
                }
            }
            Value::SRational(ref v) => {
                for (c, r) in buf.chunks_exact_mut(8).zip(v) {
                    E::write_i32(&mut c[..4], r.num);
                    E::write_i32(&mut c[4..], r.denom);
                }
            }
            Value::Unknown(_, _, ref raw) => buf.copy_from_slice(raw),
            Value::SubIfds(_) => {}
        }
    }
}

// Long arrays are cut short in the dump.
const MAX_DISPLAYED: usize = 16;

fn fmt_list<T>(f: &mut fmt::Formatter, v: &[T]) -> fmt::Result
where
    T: fmt::Display,
{
    f.write_str("[")?;
    for (i, x) in v.iter().take(MAX_DISPLAYED).enumerate() {
        if i > 0 {
            f.write_str(", ")?;
        }
        write!(f, "{}", x)?;
    }
    if v.len() > MAX_DISPLAYED {
        write!(f, ", ... ({} total)", v.len())?;
    }
    f.write_str("]")
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            Value::Byte(ref v) => fmt_list(f, v),
            Value::Ascii(ref v) => {
                let s = v.strip_suffix(b"\0").unwrap_or(&v[..]);
                write!(f, "\"{}\"", s.escape_ascii())
            }
            Value::Short(ref v) => fmt_list(f, v),
            Value::Long(ref v) => fmt_list(f, v),
            Value::Rational(ref v) => fmt_list(f, v),
            Value::SByte(ref v) => fmt_list(f, v),
            Value::Undefined(ref v) => write!(f, "{} bytes", v.len()),
            Value::SShort(ref v) => fmt_list(f, v),
            Value::SLong(ref v) => fmt_list(f, v),
            Value::SRational(ref v) => fmt_list(f, v),
            Value::Float(ref v) => fmt_list(f, v),
            Value::Double(ref v) => fmt_list(f, v),
            Value::SubIfds(ref v) => write!(f, "{} sub-IFD(s)", v.len()),
            Value::Unknown(typ, cnt, raw) => {
                write!(f, "unknown type {} x {} ({:02x?})", typ, cnt, raw)
            }
        }
    }
}
