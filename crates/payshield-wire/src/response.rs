//! Reply parsing for the key encrypt/decrypt family.

use crate::error::{WireError, WireResult};

/// Offset of the payload length byte.
pub const PAYLOAD_LENGTH_OFFSET: usize = 26;

/// Offset of the first payload byte.
pub const PAYLOAD_OFFSET: usize = PAYLOAD_LENGTH_OFFSET + 1;

/// Slice the payload out of a structured reply.
///
/// The byte at [`PAYLOAD_LENGTH_OFFSET`] is read as an unsigned length `n`
/// and `reply[27..27 + n]` is returned. A reply shorter than 27 bytes is
/// [`WireError::ShortResponse`]; a length byte that points past the end of
/// the reply is [`WireError::TruncatedPayload`].
pub fn extract_payload(reply: &[u8]) -> WireResult<&[u8]> {
    if reply.len() < PAYLOAD_OFFSET {
        return Err(WireError::ShortResponse {
            len: reply.len(),
            min: PAYLOAD_OFFSET,
        });
    }

    let declared = usize::from(reply[PAYLOAD_LENGTH_OFFSET]);
    let available = reply.len() - PAYLOAD_OFFSET;
    if declared > available {
        return Err(WireError::TruncatedPayload {
            declared,
            available,
        });
    }

    Ok(&reply[PAYLOAD_OFFSET..PAYLOAD_OFFSET + declared])
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reply_with(len_byte: u8, total: usize) -> Vec<u8> {
        let mut reply: Vec<u8> = (0..total).map(|i| i as u8).collect();
        reply[PAYLOAD_LENGTH_OFFSET] = len_byte;
        reply
    }

    #[test]
    fn test_extracts_declared_slice() {
        let reply = reply_with(5, 40);
        assert_eq!(extract_payload(&reply).unwrap(), &reply[27..32]);
    }

    #[test]
    fn test_short_reply() {
        let reply = vec![0u8; 20];
        assert_eq!(
            extract_payload(&reply),
            Err(WireError::ShortResponse { len: 20, min: 27 })
        );
    }

    #[test]
    fn test_zero_length_payload() {
        let reply = reply_with(0, 27);
        assert_eq!(extract_payload(&reply).unwrap(), &[] as &[u8]);
    }

    #[test]
    fn test_exactly_filled_payload() {
        let reply = reply_with(16, 27 + 16);
        assert_eq!(extract_payload(&reply).unwrap().len(), 16);
    }

    #[test]
    fn test_truncated_payload() {
        let reply = reply_with(16, 30);
        assert_eq!(
            extract_payload(&reply),
            Err(WireError::TruncatedPayload {
                declared: 16,
                available: 3
            })
        );
    }

    #[test]
    fn test_length_byte_is_unsigned() {
        let reply = reply_with(0xC8, 27 + 0xC8);
        assert_eq!(extract_payload(&reply).unwrap().len(), 200);
    }
}
