//! Property-based tests for the wire format
//!
//! Uses proptest to verify invariants of:
//! - Hex encoding and decoding
//! - Frame length prefixes
//! - Payload extraction offsets

use payshield_wire::{
    CommandFrame, PAYLOAD_LENGTH_OFFSET, PAYLOAD_OFFSET, WireError, extract_payload, from_hex,
    to_hex,
};
use proptest::prelude::*;

fn dpk_strategy() -> impl Strategy<Value = String> {
    "[A-Z0-9]{1,40}"
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    /// Property: decoding an encoding gives back the input bytes
    #[test]
    fn prop_hex_roundtrip(bytes in prop::collection::vec(any::<u8>(), 0..256)) {
        let encoded = to_hex(&bytes);
        prop_assert_eq!(encoded.len(), bytes.len() * 2);
        prop_assert_eq!(from_hex(&encoded).unwrap(), bytes);
    }

    /// Property: odd-length input never decodes
    #[test]
    fn prop_odd_length_rejected(digits in "[0-9A-F]{1,63}") {
        prop_assume!(digits.len() % 2 == 1);
        let rejected = matches!(from_hex(&digits), Err(WireError::MalformedHex { .. }));
        prop_assert!(rejected);
    }

    /// Property: the length prefix is always half the hex body, in hex
    #[test]
    fn prop_prefix_matches_body(
        dpk in dpk_strategy(),
        key in prop::collection::vec(any::<u8>(), 1..=255),
    ) {
        let frame = CommandFrame::key_encrypt(&dpk, &key).unwrap();
        let hex_body = frame.hex_body();
        prop_assert_eq!(frame.length_prefix(), format!("{:04X}", hex_body.len() / 2));
        prop_assert_eq!(frame.to_bytes(), from_hex(&frame.wire_hex()).unwrap());
    }

    /// Property: decrypt frames carry the ciphertext verbatim at the end of the body
    #[test]
    fn prop_decrypt_frame_carries_field(
        dpk in dpk_strategy(),
        ciphertext in prop::collection::vec(any::<u8>(), 1..64),
    ) {
        let field = to_hex(&ciphertext);
        let frame = CommandFrame::key_decrypt(&dpk, &field).unwrap();
        let expected_tail = format!("{:02X}{}", ciphertext.len(), field);
        prop_assert!(frame.body().ends_with(&expected_tail));
        prop_assert!(frame.body().contains("EE0809"));
    }

    /// Property: extraction never reads past the end of the reply
    #[test]
    fn prop_extract_is_bounded(reply in prop::collection::vec(any::<u8>(), 0..300)) {
        match extract_payload(&reply) {
            Ok(payload) => {
                prop_assert_eq!(payload.len(), usize::from(reply[PAYLOAD_LENGTH_OFFSET]));
                prop_assert_eq!(payload, &reply[PAYLOAD_OFFSET..PAYLOAD_OFFSET + payload.len()]);
            }
            Err(WireError::ShortResponse { len, .. }) => {
                prop_assert!(len < PAYLOAD_OFFSET);
            }
            Err(WireError::TruncatedPayload { declared, available }) => {
                prop_assert!(declared > available);
            }
            Err(other) => {
                prop_assert!(false, "unexpected error {}", other);
            }
        }
    }
}

#[test]
fn test_scenario_frame_for_zero_key() {
    let frame = CommandFrame::key_encrypt("S1009621AN00S0001", &[0u8; 16]).unwrap();
    assert!(frame.body().contains("EE0808"));

    let wire_hex = frame.wire_hex();
    let prefix = &wire_hex[2..6];
    let length = usize::from_str_radix(prefix, 16).unwrap();
    assert_eq!(length, to_hex(frame.body().as_bytes()).len() / 2);
}
