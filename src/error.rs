use std::str::Utf8Error;

use crate::cursor::ValueKind;
use crate::tag::ByteTag;

/// Errors produced while decoding a request envelope.
///
/// Every variant is terminal for the decode call that produced it.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DecodeError {
    /// The buffer ended before a required byte sequence was available.
    #[error("truncated input at offset {position}: needed {needed} bytes, {available} available")]
    TruncatedInput {
        position: usize,
        needed: usize,
        available: usize,
    },

    /// The tag at `position` is not the one the current decode step requires.
    #[error("unexpected tag at offset {position}: expected {expected}, found {found}")]
    UnexpectedTag {
        position: usize,
        expected: &'static str,
        found: ByteTag,
    },

    #[error("string at offset {position} is not valid UTF-8")]
    InvalidEncoding {
        position: usize,
        #[source]
        source: Utf8Error,
    },

    #[error("integer {value} at offset {position} does not fit in 32 bits")]
    IntegerOutOfRange { position: usize, value: u64 },

    /// The outer value was not a 4-element fixed array.
    #[error("malformed envelope: expected fixarray(4), found {found}")]
    MalformedEnvelope { found: ByteTag },

    #[error("unsupported message kind {0}")]
    UnsupportedMessageKind(u64),

    #[error("unknown method {0:?}")]
    UnknownMethod(String),

    #[error("missing field {0:?}")]
    MissingField(&'static str),

    #[error("field {name:?}: expected {expected}, found {actual}")]
    FieldTypeMismatch {
        name: &'static str,
        expected: ValueKind,
        actual: ValueKind,
    },

    #[error("{remaining} trailing bytes after envelope")]
    TrailingBytes { remaining: usize },
}

pub type Result<T> = std::result::Result<T, DecodeError>;
