use std::fmt;

use rmp::Marker;

/// Classification of a single MessagePack type byte.
///
/// The fixed forms carry the count (or value) packed into the tag byte itself. The wider forms carry
/// the byte width of the explicit length (or value) field that follows the tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ByteTag {
    FixedArray(u8),
    FixedMap(u8),
    FixedString(u8),
    FixedUInt(u8),
    Array(u8),
    Map(u8),
    Str(u8),
    UInt(u8),
    RawBinary(u8),
    Other(u8),
}

impl ByteTag {
    /// Classifies a tag byte. Never fails; anything outside the supported subset is `Other`.
    pub fn classify(byte: u8) -> ByteTag {
        match Marker::from_u8(byte) {
            Marker::FixArray(len) => ByteTag::FixedArray(len),
            Marker::FixMap(len) => ByteTag::FixedMap(len),
            Marker::FixStr(len) => ByteTag::FixedString(len),
            Marker::FixPos(val) => ByteTag::FixedUInt(val),
            Marker::Array16 => ByteTag::Array(2),
            Marker::Array32 => ByteTag::Array(4),
            Marker::Map16 => ByteTag::Map(2),
            Marker::Map32 => ByteTag::Map(4),
            Marker::Str8 => ByteTag::Str(1),
            Marker::Str16 => ByteTag::Str(2),
            Marker::Str32 => ByteTag::Str(4),
            Marker::U8 => ByteTag::UInt(1),
            Marker::U16 => ByteTag::UInt(2),
            Marker::U32 => ByteTag::UInt(4),
            Marker::U64 => ByteTag::UInt(8),
            Marker::Bin8 => ByteTag::RawBinary(1),
            Marker::Bin16 => ByteTag::RawBinary(2),
            Marker::Bin32 => ByteTag::RawBinary(4),
            _ => ByteTag::Other(byte),
        }
    }
}

impl fmt::Display for ByteTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            ByteTag::FixedArray(len) => write!(f, "fixarray({})", len),
            ByteTag::FixedMap(len) => write!(f, "fixmap({})", len),
            ByteTag::FixedString(len) => write!(f, "fixstr({})", len),
            ByteTag::FixedUInt(val) => write!(f, "positive fixint({})", val),
            ByteTag::Array(width) => write!(f, "array{}", width * 8),
            ByteTag::Map(width) => write!(f, "map{}", width * 8),
            ByteTag::Str(width) => write!(f, "str{}", width * 8),
            ByteTag::UInt(width) => write!(f, "uint{}", width * 8),
            ByteTag::RawBinary(width) => write!(f, "bin{}", width * 8),
            ByteTag::Other(byte) => write!(f, "unsupported tag {:#04x}", byte),
        }
    }
}
