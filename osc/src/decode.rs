//! Bounded decoding of received bundles.
//!
//! The encoder side never parses anything; this path exists for the
//! inspection tooling and for tests that assert on what a receiver would
//! observe.

use crate::arg::{OscArg, TAG_FLOAT, TAG_INT, TAG_STRING};
use crate::bundle::{padded_str_size, BUNDLE_HEADER_SIZE};
use crate::error::{DecodeError, DecodeResult, LimitKind};
use crate::limits::DecodeLimits;

/// A decoded message element.
#[derive(Debug, Clone, PartialEq)]
pub struct OscMessage<'a> {
    pub address: &'a str,
    pub args: Vec<OscArg<'a>>,
}

/// A decoded bundle: time tag plus its ordered message elements.
#[derive(Debug, Clone, PartialEq)]
pub struct OscBundle<'a> {
    pub time_tag: u64,
    pub messages: Vec<OscMessage<'a>>,
}

/// Decodes one datagram into a bundle.
///
/// Message order is preserved; a receiver interprets bundles positionally.
pub fn decode_bundle<'a>(buf: &'a [u8], limits: &DecodeLimits) -> DecodeResult<OscBundle<'a>> {
    if buf.len() > limits.max_datagram_bytes {
        return Err(DecodeError::LimitsExceeded {
            kind: LimitKind::DatagramBytes,
            limit: limits.max_datagram_bytes,
            actual: buf.len(),
        });
    }
    if buf.len() < BUNDLE_HEADER_SIZE {
        return Err(DecodeError::Truncated {
            needed: BUNDLE_HEADER_SIZE,
            available: buf.len(),
        });
    }
    if &buf[0..8] != b"#bundle\0" {
        return Err(DecodeError::NotABundle);
    }
    if buf.len() % 4 != 0 {
        return Err(DecodeError::Misaligned { length: buf.len() });
    }

    let time_tag = u64::from_be_bytes(buf[8..16].try_into().unwrap());

    let mut offset = BUNDLE_HEADER_SIZE;
    let mut messages = Vec::new();
    while offset < buf.len() {
        if messages.len() >= limits.max_messages {
            return Err(DecodeError::LimitsExceeded {
                kind: LimitKind::Messages,
                limit: limits.max_messages,
                actual: messages.len() + 1,
            });
        }
        if offset + 4 > buf.len() {
            return Err(DecodeError::Truncated {
                needed: offset + 4,
                available: buf.len(),
            });
        }
        let size = u32::from_be_bytes(buf[offset..offset + 4].try_into().unwrap()) as usize;
        offset += 4;
        if size % 4 != 0 {
            return Err(DecodeError::Misaligned { length: size });
        }
        if offset + size > buf.len() {
            return Err(DecodeError::Truncated {
                needed: offset + size,
                available: buf.len(),
            });
        }
        messages.push(decode_message(&buf[offset..offset + size], limits)?);
        offset += size;
    }

    Ok(OscBundle { time_tag, messages })
}

fn decode_message<'a>(element: &'a [u8], limits: &DecodeLimits) -> DecodeResult<OscMessage<'a>> {
    let (address, rest) = read_padded_str(element)?;
    if rest.is_empty() {
        return Err(DecodeError::MissingTypeTags);
    }
    let (tag_str, mut rest) = read_padded_str(rest)?;
    let Some(tags) = tag_str.strip_prefix(',') else {
        return Err(DecodeError::MissingTypeTags);
    };
    if tags.len() > limits.max_args {
        return Err(DecodeError::LimitsExceeded {
            kind: LimitKind::Args,
            limit: limits.max_args,
            actual: tags.len(),
        });
    }

    let mut args = Vec::with_capacity(tags.len());
    for tag in tags.bytes() {
        match tag {
            TAG_INT => {
                let (word, tail) = read_word(rest)?;
                args.push(OscArg::Int(i32::from_be_bytes(word)));
                rest = tail;
            }
            TAG_FLOAT => {
                let (word, tail) = read_word(rest)?;
                args.push(OscArg::Float(f32::from_be_bytes(word)));
                rest = tail;
            }
            TAG_STRING => {
                let (s, tail) = read_padded_str(rest)?;
                args.push(OscArg::Str(s));
                rest = tail;
            }
            other => return Err(DecodeError::UnknownTypeTag { tag: other }),
        }
    }
    if !rest.is_empty() {
        return Err(DecodeError::TrailingBytes {
            remaining: rest.len(),
        });
    }

    Ok(OscMessage { address, args })
}

fn read_word(buf: &[u8]) -> DecodeResult<([u8; 4], &[u8])> {
    if buf.len() < 4 {
        return Err(DecodeError::Truncated {
            needed: 4,
            available: buf.len(),
        });
    }
    let word = buf[0..4].try_into().unwrap();
    Ok((word, &buf[4..]))
}

fn read_padded_str(buf: &[u8]) -> DecodeResult<(&str, &[u8])> {
    let nul = buf
        .iter()
        .position(|&b| b == 0)
        .ok_or(DecodeError::StringUnterminated)?;
    let s = std::str::from_utf8(&buf[..nul]).map_err(|_| DecodeError::InvalidUtf8)?;
    let consumed = padded_str_size(nul);
    if consumed > buf.len() {
        return Err(DecodeError::Truncated {
            needed: consumed,
            available: buf.len(),
        });
    }
    Ok((s, &buf[consumed..]))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bundle::BundleWriter;

    fn encode(messages: &[(&str, &[OscArg<'_>])]) -> Vec<u8> {
        let mut writer = BundleWriter::new();
        for (address, args) in messages {
            writer.append_message(address, args).unwrap();
        }
        writer.take()
    }

    #[test]
    fn decode_empty_bundle() {
        let bytes = encode(&[]);
        let bundle = decode_bundle(&bytes, &DecodeLimits::default()).unwrap();
        assert_eq!(bundle.time_tag, crate::TIME_TAG_IMMEDIATE);
        assert!(bundle.messages.is_empty());
    }

    #[test]
    fn decode_preserves_message_order() {
        let bytes = encode(&[
            ("/probe", &[OscArg::Str("fseq"), OscArg::Int(1)]),
            ("/probe", &[OscArg::Str("alive"), OscArg::Int(4), OscArg::Int(2)]),
        ]);
        let bundle = decode_bundle(&bytes, &DecodeLimits::default()).unwrap();
        assert_eq!(bundle.messages.len(), 2);
        assert_eq!(bundle.messages[0].args[0], OscArg::Str("fseq"));
        assert_eq!(
            bundle.messages[1].args,
            vec![OscArg::Str("alive"), OscArg::Int(4), OscArg::Int(2)]
        );
    }

    #[test]
    fn decode_rejects_non_bundle() {
        let err = decode_bundle(b"/probe\0\0,i\0\0\0\0\0\x07", &DecodeLimits::default());
        assert_eq!(err.unwrap_err(), DecodeError::NotABundle);
    }

    #[test]
    fn decode_rejects_short_buffer() {
        let err = decode_bundle(b"#bun", &DecodeLimits::default()).unwrap_err();
        assert!(matches!(err, DecodeError::Truncated { .. }));
    }

    #[test]
    fn decode_rejects_misaligned_datagram() {
        let mut bytes = encode(&[]);
        bytes.push(0);
        let err = decode_bundle(&bytes, &DecodeLimits::default()).unwrap_err();
        assert!(matches!(err, DecodeError::Misaligned { .. }));
    }

    #[test]
    fn decode_rejects_element_overrunning_buffer() {
        let mut bytes = encode(&[("/probe", &[OscArg::Int(1)])]);
        // Inflate the element size prefix past the end of the buffer.
        let len = bytes.len();
        bytes[16..20].copy_from_slice(&u32::try_from(len).unwrap().to_be_bytes());
        let err = decode_bundle(&bytes, &DecodeLimits::default()).unwrap_err();
        assert!(matches!(err, DecodeError::Truncated { .. }));
    }

    #[test]
    fn decode_rejects_unknown_type_tag() {
        let mut bytes = encode(&[("/probe", &[OscArg::Int(1)])]);
        // Patch the ",i" tag string to ",b" (blob, unsupported).
        let pos = bytes
            .windows(2)
            .position(|w| w == b",i")
            .expect("tag string present");
        bytes[pos + 1] = b'b';
        let err = decode_bundle(&bytes, &DecodeLimits::default()).unwrap_err();
        assert_eq!(err, DecodeError::UnknownTypeTag { tag: b'b' });
    }

    #[test]
    fn decode_rejects_trailing_bytes_in_element() {
        let mut bytes = encode(&[("/probe", &[OscArg::Int(1)])]);
        // Claim the message has no arguments; the int payload becomes trailing.
        let pos = bytes
            .windows(2)
            .position(|w| w == b",i")
            .expect("tag string present");
        bytes[pos + 1] = 0;
        let err = decode_bundle(&bytes, &DecodeLimits::default()).unwrap_err();
        assert_eq!(err, DecodeError::TrailingBytes { remaining: 4 });
    }

    #[test]
    fn decode_enforces_message_limit() {
        let bytes = encode(&[
            ("/probe", &[OscArg::Int(1)]),
            ("/probe", &[OscArg::Int(2)]),
        ]);
        let limits = DecodeLimits {
            max_messages: 1,
            ..DecodeLimits::for_testing()
        };
        let err = decode_bundle(&bytes, &limits).unwrap_err();
        assert!(matches!(
            err,
            DecodeError::LimitsExceeded {
                kind: LimitKind::Messages,
                ..
            }
        ));
    }

    #[test]
    fn decode_enforces_arg_limit() {
        let args = vec![OscArg::Int(0); 17];
        let bytes = encode(&[("/probe", &args)]);
        let err = decode_bundle(&bytes, &DecodeLimits::for_testing()).unwrap_err();
        assert!(matches!(
            err,
            DecodeError::LimitsExceeded {
                kind: LimitKind::Args,
                ..
            }
        ));
    }

    #[test]
    fn decode_enforces_datagram_limit() {
        let bytes = encode(&[]);
        let limits = DecodeLimits {
            max_datagram_bytes: 8,
            ..DecodeLimits::for_testing()
        };
        let err = decode_bundle(&bytes, &limits).unwrap_err();
        assert!(matches!(
            err,
            DecodeError::LimitsExceeded {
                kind: LimitKind::DatagramBytes,
                ..
            }
        ));
    }

    #[test]
    fn float_args_roundtrip_bit_exact() {
        let bytes = encode(&[("/probe", &[OscArg::Float(0.25), OscArg::Float(-1.5)])]);
        let bundle = decode_bundle(&bytes, &DecodeLimits::default()).unwrap();
        assert_eq!(
            bundle.messages[0].args,
            vec![OscArg::Float(0.25), OscArg::Float(-1.5)]
        );
    }
}
