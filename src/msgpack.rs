use bytes::{Buf, BytesMut};
use tokio::io;
use tokio_util::codec::Decoder;

use crate::envelope::decode_request_prefix;
use crate::error::DecodeError;
use crate::message::Request;

/// Default limit on the bytes buffered for a single envelope: 8 MiB.
pub const DEFAULT_MAX_MESSAGE_SIZE: usize = 8 * 1024 * 1024;

/// Decodes a stream of back-to-back request envelopes.
#[derive(Debug)]
pub struct MessagePackDecoder {
    max_message_size: usize,
}

impl MessagePackDecoder {
    pub fn with_max_message_size(max_message_size: usize) -> Self {
        MessagePackDecoder { max_message_size }
    }
}

impl Default for MessagePackDecoder {
    fn default() -> Self {
        MessagePackDecoder::with_max_message_size(DEFAULT_MAX_MESSAGE_SIZE)
    }
}

impl Decoder for MessagePackDecoder {
    type Item = Request;
    type Error = io::Error;

    fn decode(&mut self, src: &mut BytesMut) -> Result<Option<Self::Item>, Self::Error> {
        if src.is_empty() {
            return Ok(None);
        }

        match decode_request_prefix(&src[..]) {
            Ok((request, consumed)) => {
                src.advance(consumed);
                Ok(Some(request))
            }
            Err(DecodeError::TruncatedInput { .. }) if src.len() < self.max_message_size => {
                Ok(None)
            }
            Err(DecodeError::TruncatedInput { .. }) => Err(io::Error::new(
                io::ErrorKind::InvalidData,
                format!(
                    "envelope exceeds the maximum message size of {} bytes",
                    self.max_message_size
                ),
            )),
            Err(err) => Err(io::Error::new(io::ErrorKind::InvalidData, err)),
        }
    }
}
