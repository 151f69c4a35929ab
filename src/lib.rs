//! Decodes MessagePack-RPC request envelopes into typed requests.
//!
//! An envelope is a 4-element array `[kind, id, method, params]`. Only requests (kind 0) are
//! decoded; the params map is checked against the schema registered for `method` and becomes the
//! matching `Params` variant.

mod cursor;
mod dispatch;
mod envelope;
mod error;
mod message;
mod msgpack;
pub mod schema;
mod tag;

pub use cursor::{Cursor, Value, ValueKind};
pub use dispatch::dispatch;
pub use envelope::{decode_request, decode_request_prefix, read_envelope, Envelope};
pub use error::{DecodeError, Result};
pub use message::{MessageKind, Params, Request, Response, Results};
pub use msgpack::{MessagePackDecoder as Decoder, DEFAULT_MAX_MESSAGE_SIZE};
pub use tag::ByteTag;
