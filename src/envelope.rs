use log::{debug, trace};

use crate::cursor::Cursor;
use crate::dispatch::dispatch;
use crate::error::{DecodeError, Result};
use crate::message::{MessageKind, Request};
use crate::tag::ByteTag;

/// Number of elements in a request envelope: kind, id, method, params.
pub const ENVELOPE_LEN: u8 = 4;

/// The header of a request envelope, before its params are dispatched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Envelope {
    pub kind: MessageKind,
    pub id: u32,
    pub method: String,
}

/// Reads the envelope header, leaving the cursor at the params map.
pub fn read_envelope(cursor: &mut Cursor<'_>) -> Result<Envelope> {
    let found = cursor.peek_tag()?;
    trace!("envelope tag {} at offset {}", found, cursor.position());
    if found != ByteTag::FixedArray(ENVELOPE_LEN) {
        return Err(DecodeError::MalformedEnvelope { found });
    }
    cursor.read_array_len()?;

    let kind = cursor.read_u64()?;
    let kind = match MessageKind::from_u64(kind) {
        Some(MessageKind::Request) => MessageKind::Request,
        _ => return Err(DecodeError::UnsupportedMessageKind(kind)),
    };

    let id = cursor.read_u32()?;
    let method = cursor.read_string()?;
    debug!("decoded envelope header: id={} method={:?}", id, method);

    Ok(Envelope { kind, id, method })
}

/// Decodes one request from the front of `buf`, returning it with the number of bytes consumed.
pub fn decode_request_prefix(buf: &[u8]) -> Result<(Request, usize)> {
    let mut cursor = Cursor::new(buf);
    let envelope = read_envelope(&mut cursor)?;
    let request = dispatch(envelope.id, &envelope.method, &mut cursor)?;
    Ok((request, cursor.position()))
}

/// Decodes a buffer holding exactly one request envelope.
pub fn decode_request(buf: &[u8]) -> Result<Request> {
    let (request, consumed) = decode_request_prefix(buf)?;
    match buf.len() - consumed {
        0 => Ok(request),
        remaining => Err(DecodeError::TrailingBytes { remaining }),
    }
}

#[cfg(test)]
mod tests {
    use rmp::encode;

    use super::{decode_request, decode_request_prefix};
    use crate::cursor::ValueKind;
    use crate::error::DecodeError;
    use crate::message::Params;
    use crate::schema::{LoginWithPassword, LoginWithToken};
    use crate::tag::ByteTag;

    enum Field<'a> {
        Str(&'a str),
        Bin(&'a [u8]),
        UInt(u64),
    }

    fn envelope(kind: u64, id: u64, method: &str, params: &[(&str, Field<'_>)]) -> Vec<u8> {
        let mut buf = Vec::new();
        encode::write_array_len(&mut buf, 4).unwrap();
        encode::write_uint(&mut buf, kind).unwrap();
        encode::write_uint(&mut buf, id).unwrap();
        encode::write_str(&mut buf, method).unwrap();
        encode::write_map_len(&mut buf, params.len() as u32).unwrap();
        for (key, value) in params {
            encode::write_str(&mut buf, key).unwrap();
            match value {
                Field::Str(s) => encode::write_str(&mut buf, s).unwrap(),
                Field::Bin(b) => encode::write_bin(&mut buf, b).unwrap(),
                Field::UInt(n) => {
                    encode::write_uint(&mut buf, *n).unwrap();
                }
            }
        }
        buf
    }

    fn login(kind: u64, method: &str) -> Vec<u8> {
        envelope(
            kind,
            42,
            method,
            &[
                ("username", Field::Str("alice")),
                ("password", Field::Str("s3cr3t")),
                ("bytes", Field::Bin(&[0x01, 0x02])),
            ],
        )
    }

    fn alice() -> Params {
        Params::LoginWithPassword(LoginWithPassword {
            username: "alice".to_string(),
            password: "s3cr3t".to_string(),
            bytes: vec![0x01, 0x02],
        })
    }

    #[test]
    fn login_with_password() {
        let request = decode_request(&login(0, "Profile.LoginWithPassword")).unwrap();

        assert_eq!(request.id(), 42);
        assert_eq!(request.method(), "Profile.LoginWithPassword");
        assert_eq!(request.params(), &alice());
    }

    #[test]
    fn login_with_token() {
        let buf = envelope(
            0,
            548,
            "Profile.LoginWithToken",
            &[("token", Field::Str("alrighty"))],
        );

        let request = decode_request(&buf).unwrap();
        assert_eq!(request.id(), 548);
        assert_eq!(
            request.into_params(),
            Params::LoginWithToken(LoginWithToken {
                token: "alrighty".to_string()
            })
        );
    }

    #[test]
    fn header_round_trips_across_id_widths() {
        for &id in &[0, 127, 128, 255, 65_535, 65_536, u64::from(u32::MAX)] {
            let buf = envelope(0, id, "Profile.LoginWithToken", &[("token", Field::Str("t"))]);
            let request = decode_request(&buf).unwrap();
            assert_eq!(u64::from(request.id()), id);
            assert_eq!(request.method(), "Profile.LoginWithToken");
        }
    }

    #[test]
    fn decoding_is_repeatable() {
        let buf = login(0, "Profile.LoginWithPassword");
        assert_eq!(decode_request(&buf), decode_request(&buf));
    }

    #[test]
    fn unknown_method() {
        assert_eq!(
            decode_request(&login(0, "Profile.Logout")),
            Err(DecodeError::UnknownMethod("Profile.Logout".to_string()))
        );
    }

    #[test]
    fn empty_method_is_unknown() {
        assert_eq!(
            decode_request(&login(0, "")),
            Err(DecodeError::UnknownMethod(String::new()))
        );
    }

    #[test]
    fn non_request_kinds_are_rejected() {
        for &kind in &[1, 2, 3, 200] {
            assert_eq!(
                decode_request(&login(kind, "Profile.LoginWithPassword")),
                Err(DecodeError::UnsupportedMessageKind(kind))
            );
        }
    }

    #[test]
    fn wide_kind_is_still_unsupported() {
        let mut buf = Vec::new();
        encode::write_array_len(&mut buf, 4).unwrap();
        encode::write_u64(&mut buf, 1 << 40).unwrap();
        encode::write_uint(&mut buf, 42).unwrap();
        encode::write_str(&mut buf, "Profile.LoginWithToken").unwrap();
        encode::write_map_len(&mut buf, 1).unwrap();
        encode::write_str(&mut buf, "token").unwrap();
        encode::write_str(&mut buf, "t").unwrap();

        assert_eq!(
            decode_request(&buf),
            Err(DecodeError::UnsupportedMessageKind(1 << 40))
        );
    }

    #[test]
    fn outer_array_must_have_four_elements() {
        for &len in &[0, 3, 5] {
            let mut buf = Vec::new();
            encode::write_array_len(&mut buf, len).unwrap();
            for _ in 0..len {
                encode::write_uint(&mut buf, 0).unwrap();
            }

            assert_eq!(
                decode_request(&buf),
                Err(DecodeError::MalformedEnvelope {
                    found: ByteTag::FixedArray(len as u8)
                })
            );
        }
    }

    #[test]
    fn outer_value_must_be_an_array() {
        let mut buf = Vec::new();
        encode::write_map_len(&mut buf, 0).unwrap();

        assert_eq!(
            decode_request(&buf),
            Err(DecodeError::MalformedEnvelope {
                found: ByteTag::FixedMap(0)
            })
        );
    }

    #[test]
    fn wide_array_with_four_elements_is_malformed() {
        // array16 holding 4 elements; only the fixarray form is a valid envelope
        let mut buf = vec![0xdc, 0x00, 0x04];
        buf.extend_from_slice(&login(0, "Profile.LoginWithPassword")[1..]);

        assert_eq!(
            decode_request(&buf),
            Err(DecodeError::MalformedEnvelope {
                found: ByteTag::Array(2)
            })
        );
    }

    #[test]
    fn missing_field_then_present() {
        let without = envelope(
            0,
            42,
            "Profile.LoginWithPassword",
            &[
                ("username", Field::Str("alice")),
                ("bytes", Field::Bin(&[0x01, 0x02])),
            ],
        );
        assert_eq!(
            decode_request(&without),
            Err(DecodeError::MissingField("password"))
        );

        let with = envelope(
            0,
            42,
            "Profile.LoginWithPassword",
            &[
                ("username", Field::Str("alice")),
                ("bytes", Field::Bin(&[0x01, 0x02])),
                ("password", Field::Str("s3cr3t")),
            ],
        );
        assert_eq!(decode_request(&with).unwrap().params(), &alice());
    }

    #[test]
    fn extra_fields_are_ignored() {
        let buf = envelope(
            0,
            42,
            "Profile.LoginWithPassword",
            &[
                ("username", Field::Str("alice")),
                ("attempt", Field::UInt(3)),
                ("password", Field::Str("s3cr3t")),
                ("bytes", Field::Bin(&[0x01, 0x02])),
            ],
        );

        assert_eq!(decode_request(&buf).unwrap().params(), &alice());
    }

    #[test]
    fn field_type_mismatch() {
        let buf = envelope(
            0,
            42,
            "Profile.LoginWithPassword",
            &[
                ("username", Field::UInt(7)),
                ("password", Field::Str("s3cr3t")),
                ("bytes", Field::Bin(&[0x01, 0x02])),
            ],
        );

        assert_eq!(
            decode_request(&buf),
            Err(DecodeError::FieldTypeMismatch {
                name: "username",
                expected: ValueKind::String,
                actual: ValueKind::UInt,
            })
        );
    }

    #[test]
    fn every_truncation_is_reported() {
        let buf = login(0, "Profile.LoginWithPassword");
        for end in 0..buf.len() {
            assert!(
                matches!(
                    decode_request(&buf[..end]),
                    Err(DecodeError::TruncatedInput { .. })
                ),
                "prefix of {} bytes",
                end
            );
        }
    }

    #[test]
    fn trailing_bytes() {
        let mut buf = login(0, "Profile.LoginWithPassword");
        let len = buf.len();
        buf.extend_from_slice(&[0x00, 0x00]);

        assert_eq!(
            decode_request(&buf),
            Err(DecodeError::TrailingBytes { remaining: 2 })
        );

        let (request, consumed) = decode_request_prefix(&buf).unwrap();
        assert_eq!(consumed, len);
        assert_eq!(request.params(), &alice());
    }
}
