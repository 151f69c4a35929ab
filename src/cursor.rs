use std::fmt;
use std::str;

use bytes::Buf;

use crate::error::{DecodeError, Result};
use crate::tag::ByteTag;

/// A decoded MessagePack scalar, or a map of scalars one level deep.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value {
    UInt(u64),
    Str(String),
    Bin(Vec<u8>),
    Map(Vec<(String, Value)>),
}

impl Value {
    pub fn kind(&self) -> ValueKind {
        match self {
            Value::UInt(_) => ValueKind::UInt,
            Value::Str(_) => ValueKind::String,
            Value::Bin(_) => ValueKind::Bytes,
            Value::Map(_) => ValueKind::Map,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueKind {
    UInt,
    String,
    Bytes,
    Map,
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ValueKind::UInt => "unsigned integer",
            ValueKind::String => "string",
            ValueKind::Bytes => "byte string",
            ValueKind::Map => "map",
        })
    }
}

/// Sequential reader over an immutable MessagePack buffer.
///
/// Reads advance the position; only `peek_tag` looks ahead without consuming. The cursor owns no
/// state besides its position, so each decode call gets its own.
#[derive(Debug, Clone)]
pub struct Cursor<'a> {
    buf: &'a [u8],
    pos: usize,
}

impl<'a> Cursor<'a> {
    pub fn new(buf: &'a [u8]) -> Self {
        Cursor { buf, pos: 0 }
    }

    pub fn position(&self) -> usize {
        self.pos
    }

    pub fn remaining(&self) -> usize {
        self.buf.len() - self.pos
    }

    /// Classifies the byte at the current position without consuming it.
    pub fn peek_tag(&self) -> Result<ByteTag> {
        match self.buf.get(self.pos) {
            Some(&byte) => Ok(ByteTag::classify(byte)),
            None => Err(DecodeError::TruncatedInput {
                position: self.pos,
                needed: 1,
                available: 0,
            }),
        }
    }

    /// Consumes an array tag and returns the declared element count.
    pub fn read_array_len(&mut self) -> Result<u32> {
        let position = self.pos;
        match self.read_tag()? {
            ByteTag::FixedArray(len) => Ok(u32::from(len)),
            ByteTag::Array(width) => self.read_be(width).map(|len| len as u32),
            found => Err(unexpected(position, "array", found)),
        }
    }

    /// Consumes a map tag and returns the declared entry count.
    pub fn read_map_len(&mut self) -> Result<u32> {
        let position = self.pos;
        match self.read_tag()? {
            ByteTag::FixedMap(len) => Ok(u32::from(len)),
            ByteTag::Map(width) => self.read_be(width).map(|len| len as u32),
            found => Err(unexpected(position, "map", found)),
        }
    }

    pub fn read_u64(&mut self) -> Result<u64> {
        let position = self.pos;
        match self.read_tag()? {
            ByteTag::FixedUInt(val) => Ok(u64::from(val)),
            ByteTag::UInt(width) => self.read_be(width),
            found => Err(unexpected(position, "unsigned integer", found)),
        }
    }

    /// Reads an unsigned integer of any encoded width that fits in 32 bits.
    pub fn read_u32(&mut self) -> Result<u32> {
        let position = self.pos;
        let value = self.read_u64()?;
        if value > u64::from(u32::MAX) {
            return Err(DecodeError::IntegerOutOfRange { position, value });
        }
        Ok(value as u32)
    }

    pub fn read_string(&mut self) -> Result<String> {
        let position = self.pos;
        let len = match self.read_tag()? {
            ByteTag::FixedString(len) => usize::from(len),
            ByteTag::Str(width) => self.read_be(width)? as usize,
            found => return Err(unexpected(position, "string", found)),
        };

        let start = self.pos;
        let bytes = self.take(len)?;
        str::from_utf8(bytes)
            .map(String::from)
            .map_err(|source| DecodeError::InvalidEncoding {
                position: start,
                source,
            })
    }

    pub fn read_bytes(&mut self) -> Result<Vec<u8>> {
        let position = self.pos;
        let len = match self.read_tag()? {
            ByteTag::RawBinary(width) => self.read_be(width)? as usize,
            found => return Err(unexpected(position, "byte string", found)),
        };

        self.take(len).map(<[u8]>::to_vec)
    }

    /// Reads a scalar (unsigned integer, string or byte string), or a map of scalars.
    pub fn read_value(&mut self) -> Result<Value> {
        self.read_value_nested(true)
    }

    /// Consumes a map and returns its entries in encounter order.
    ///
    /// Keys must be strings. Values are scalars or maps of scalars.
    pub fn read_map_entries(&mut self) -> Result<Vec<(String, Value)>> {
        self.read_entries(true)
    }

    fn read_entries(&mut self, allow_nested: bool) -> Result<Vec<(String, Value)>> {
        let len = self.read_map_len()? as usize;
        // every entry needs at least a key byte and a value byte
        let mut entries = Vec::with_capacity(len.min(self.remaining() / 2));
        for _ in 0..len {
            let key = self.read_string()?;
            let value = self.read_value_nested(allow_nested)?;
            entries.push((key, value));
        }
        Ok(entries)
    }

    fn read_value_nested(&mut self, allow_map: bool) -> Result<Value> {
        let position = self.pos;
        match self.peek_tag()? {
            ByteTag::FixedUInt(_) | ByteTag::UInt(_) => self.read_u64().map(Value::UInt),
            ByteTag::FixedString(_) | ByteTag::Str(_) => self.read_string().map(Value::Str),
            ByteTag::RawBinary(_) => self.read_bytes().map(Value::Bin),
            ByteTag::FixedMap(_) | ByteTag::Map(_) if allow_map => {
                self.read_entries(false).map(Value::Map)
            }
            found if allow_map => Err(unexpected(position, "scalar or map", found)),
            found => Err(unexpected(position, "scalar", found)),
        }
    }

    fn read_tag(&mut self) -> Result<ByteTag> {
        let tag = self.peek_tag()?;
        self.pos += 1;
        Ok(tag)
    }

    /// Reads a big-endian field of `width` bytes (1, 2, 4 or 8).
    fn read_be(&mut self, width: u8) -> Result<u64> {
        let mut field = self.take(usize::from(width))?;
        Ok(match width {
            1 => u64::from(field.get_u8()),
            2 => u64::from(field.get_u16()),
            4 => u64::from(field.get_u32()),
            _ => field.get_u64(),
        })
    }

    fn take(&mut self, len: usize) -> Result<&'a [u8]> {
        let available = self.remaining();
        if len > available {
            return Err(DecodeError::TruncatedInput {
                position: self.pos,
                needed: len,
                available,
            });
        }

        let bytes = &self.buf[self.pos..self.pos + len];
        self.pos += len;
        Ok(bytes)
    }
}

fn unexpected(position: usize, expected: &'static str, found: ByteTag) -> DecodeError {
    DecodeError::UnexpectedTag {
        position,
        expected,
        found,
    }
}
