//! Property tests for the local cipher

use payshield::{BLOCK_SIZE, CipherContext, CipherError, KeyMaterial};
use proptest::prelude::*;

fn aligned_data() -> impl Strategy<Value = Vec<u8>> {
    (0usize..8).prop_flat_map(|blocks| prop::collection::vec(any::<u8>(), blocks * BLOCK_SIZE))
}

proptest! {
    #[test]
    fn prop_decrypt_inverts_encrypt(key in any::<[u8; 16]>(), plaintext in aligned_data()) {
        let cipher = CipherContext::new(&KeyMaterial::from(key));
        let ciphertext = cipher.encrypt(&plaintext).unwrap();
        prop_assert_eq!(ciphertext.len(), plaintext.len());
        prop_assert_eq!(cipher.decrypt(&ciphertext).unwrap(), plaintext);
    }

    #[test]
    fn prop_encrypt_is_deterministic(key in any::<[u8; 16]>(), plaintext in aligned_data()) {
        let first = CipherContext::new(&KeyMaterial::from(key));
        let second = CipherContext::new(&KeyMaterial::from(key));
        prop_assert_eq!(first.encrypt(&plaintext).unwrap(), second.encrypt(&plaintext).unwrap());
    }

    #[test]
    fn prop_unaligned_input_is_rejected(
        key in any::<[u8; 16]>(),
        data in prop::collection::vec(any::<u8>(), 0..100)
            .prop_filter("unaligned", |d| d.len() % BLOCK_SIZE != 0),
    ) {
        let cipher = CipherContext::new(&KeyMaterial::from(key));
        let expected = Err(CipherError::BlockAlignment { len: data.len() });
        prop_assert_eq!(cipher.encrypt(&data), expected.clone());
        prop_assert_eq!(cipher.decrypt(&data), expected);
    }

    #[test]
    fn prop_wrong_key_length_is_rejected(key in prop::collection::vec(any::<u8>(), 0..40)) {
        prop_assume!(key.len() != 16);
        let is_invalid_key = matches!(
            CipherContext::from_slice(&key),
            Err(CipherError::InvalidKey { len }) if len == key.len()
        );
        prop_assert!(is_invalid_key);
    }
}

#[test]
fn test_fifteen_and_seventeen_bytes() {
    let cipher = CipherContext::new(&KeyMaterial::from([0u8; 16]));
    for len in [15, 17] {
        assert_eq!(
            cipher.encrypt(&vec![0u8; len]),
            Err(CipherError::BlockAlignment { len })
        );
    }
}
