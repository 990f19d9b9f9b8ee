//! Hexadecimal conversion between raw bytes and the protocol's ASCII digits.

use crate::error::{WireError, WireResult};

/// Encode bytes as uppercase hex, high nibble first.
pub fn to_hex(bytes: &[u8]) -> String {
    hex::encode_upper(bytes)
}

/// Decode an even-length string of hex digits (either case) into bytes.
///
/// Odd-length input and non-hex characters are rejected rather than decoded
/// into garbage.
pub fn from_hex(digits: &str) -> WireResult<Vec<u8>> {
    if digits.len() % 2 != 0 {
        return Err(WireError::MalformedHex {
            reason: format!("odd number of digits ({})", digits.len()),
        });
    }
    Ok(hex::decode(digits)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_hex_is_uppercase() {
        assert_eq!(to_hex(&[0x00, 0x0f, 0xab, 0xff]), "000FABFF");
        assert_eq!(to_hex(&[]), "");
    }

    #[test]
    fn test_from_hex_accepts_mixed_case() {
        assert_eq!(from_hex("abCD01").unwrap(), vec![0xAB, 0xCD, 0x01]);
    }

    #[test]
    fn test_from_hex_rejects_odd_length() {
        assert!(matches!(
            from_hex("ABC"),
            Err(WireError::MalformedHex { .. })
        ));
    }

    #[test]
    fn test_from_hex_rejects_non_hex() {
        assert!(matches!(
            from_hex("0Z"),
            Err(WireError::MalformedHex { .. })
        ));
        assert!(matches!(
            from_hex("%01"),
            Err(WireError::MalformedHex { .. })
        ));
    }
}
