//! AES-128 in ECB mode without padding, keyed by material unwrapped by the HSM.
//!
//! The HSM only ever hands back a key; bulk data (card numbers and the like)
//! is transformed locally with a [`CipherContext`] built from that key.

use std::fmt;

use aes::cipher::generic_array::GenericArray;
use aes::cipher::{BlockDecrypt, BlockEncrypt, KeyInit};
use aes::{Aes128Dec, Aes128Enc};
use payshield_wire::{WireError, from_hex, to_hex};
use thiserror::Error;
use zeroize::{Zeroize, ZeroizeOnDrop};

/// AES block size in bytes.
pub const BLOCK_SIZE: usize = 16;

/// AES-128 key size in bytes.
pub const KEY_SIZE: usize = 16;

/// A specialized `Result` type for cipher operations.
pub type CipherResult<T> = std::result::Result<T, CipherError>;

/// Errors raised by [`KeyMaterial`] and [`CipherContext`].
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum CipherError {
    /// Key material is not exactly one AES-128 key long.
    #[error("Invalid key: expected {KEY_SIZE} bytes, got {len}")]
    InvalidKey {
        /// Length of the rejected key
        len: usize,
    },

    /// Input is not a whole number of blocks.
    #[error("Block alignment: {len} bytes is not a multiple of {BLOCK_SIZE}")]
    BlockAlignment {
        /// Length of the rejected input
        len: usize,
    },

    /// Decrypted bytes are not valid UTF-8.
    #[error("Decrypted data is not valid UTF-8")]
    InvalidUtf8,

    /// Hex input could not be decoded.
    #[error(transparent)]
    Wire(#[from] WireError),
}

/// Exactly one AES-128 key, wiped from memory on drop.
///
/// Produced by a successful decrypt round trip; `Debug` never shows the bytes.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct KeyMaterial([u8; KEY_SIZE]);

impl KeyMaterial {
    /// Wrap a 16-byte slice.
    pub fn from_slice(bytes: &[u8]) -> CipherResult<Self> {
        let key: [u8; KEY_SIZE] = bytes
            .try_into()
            .map_err(|_| CipherError::InvalidKey { len: bytes.len() })?;
        Ok(Self(key))
    }

    /// Decode 32 hex digits.
    pub fn from_hex(digits: &str) -> CipherResult<Self> {
        let mut bytes = from_hex(digits)?;
        let key = Self::from_slice(&bytes);
        bytes.zeroize();
        key
    }

    /// The raw key bytes.
    pub fn as_bytes(&self) -> &[u8; KEY_SIZE] {
        &self.0
    }

    /// The key as uppercase hex.
    pub fn to_hex(&self) -> String {
        to_hex(&self.0)
    }
}

impl From<[u8; KEY_SIZE]> for KeyMaterial {
    fn from(key: [u8; KEY_SIZE]) -> Self {
        Self(key)
    }
}

impl TryFrom<&[u8]> for KeyMaterial {
    type Error = CipherError;

    fn try_from(bytes: &[u8]) -> CipherResult<Self> {
        Self::from_slice(bytes)
    }
}

impl fmt::Debug for KeyMaterial {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("KeyMaterial([REDACTED])")
    }
}

/// A reusable AES/ECB/NoPadding encryptor and decryptor bound to one key.
///
/// ECB keeps no state between blocks, so one context can serve any number
/// of calls from any number of threads.
#[derive(Clone)]
pub struct CipherContext {
    encryptor: Aes128Enc,
    decryptor: Aes128Dec,
}

impl fmt::Debug for CipherContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CipherContext")
            .field("mode", &"AES-128/ECB/NoPadding")
            .finish_non_exhaustive()
    }
}

impl CipherContext {
    /// Bind both directions to `key`.
    pub fn new(key: &KeyMaterial) -> Self {
        Self {
            encryptor: Aes128Enc::new(key.as_bytes().into()),
            decryptor: Aes128Dec::new(key.as_bytes().into()),
        }
    }

    /// Build a context from raw bytes, which must be exactly 16 long.
    pub fn from_slice(key: &[u8]) -> CipherResult<Self> {
        Ok(Self::new(&KeyMaterial::from_slice(key)?))
    }

    /// Build a context from a key given as text; its UTF-8 bytes are the key.
    pub fn from_utf8_key(key: &str) -> CipherResult<Self> {
        Self::from_slice(key.as_bytes())
    }

    /// Encrypt whole blocks; no padding is added.
    pub fn encrypt(&self, plaintext: &[u8]) -> CipherResult<Vec<u8>> {
        check_alignment(plaintext.len())?;
        let mut output = plaintext.to_vec();
        for block in output.chunks_exact_mut(BLOCK_SIZE) {
            self.encryptor
                .encrypt_block(GenericArray::from_mut_slice(block));
        }
        Ok(output)
    }

    /// Encrypt the UTF-8 bytes of `plaintext`.
    pub fn encrypt_str(&self, plaintext: &str) -> CipherResult<Vec<u8>> {
        self.encrypt(plaintext.as_bytes())
    }

    /// Decrypt whole blocks; nothing is stripped from the result.
    pub fn decrypt(&self, ciphertext: &[u8]) -> CipherResult<Vec<u8>> {
        check_alignment(ciphertext.len())?;
        let mut output = ciphertext.to_vec();
        for block in output.chunks_exact_mut(BLOCK_SIZE) {
            self.decryptor
                .decrypt_block(GenericArray::from_mut_slice(block));
        }
        Ok(output)
    }

    /// Decrypt ciphertext given as hex digits.
    pub fn decrypt_hex(&self, ciphertext_hex: &str) -> CipherResult<Vec<u8>> {
        self.decrypt(&from_hex(ciphertext_hex)?)
    }

    /// Decrypt and interpret the result as UTF-8 text.
    pub fn decrypt_to_string(&self, ciphertext: &[u8]) -> CipherResult<String> {
        String::from_utf8(self.decrypt(ciphertext)?).map_err(|_| CipherError::InvalidUtf8)
    }

    /// Decrypt hex ciphertext and interpret the result as UTF-8 text.
    pub fn decrypt_hex_to_string(&self, ciphertext_hex: &str) -> CipherResult<String> {
        self.decrypt_to_string(&from_hex(ciphertext_hex)?)
    }
}

fn check_alignment(len: usize) -> CipherResult<()> {
    if len % BLOCK_SIZE != 0 {
        return Err(CipherError::BlockAlignment { len });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    // FIPS-197 appendix C.1
    const FIPS_KEY: &str = "000102030405060708090A0B0C0D0E0F";
    const FIPS_PLAINTEXT: &str = "00112233445566778899AABBCCDDEEFF";
    const FIPS_CIPHERTEXT: &str = "69C4E0D86A7B0430D8CDB78070B4C55A";

    fn fips_context() -> CipherContext {
        CipherContext::new(&KeyMaterial::from_hex(FIPS_KEY).unwrap())
    }

    #[test]
    fn test_known_answer() {
        let cipher = fips_context();
        let ciphertext = cipher.encrypt(&from_hex(FIPS_PLAINTEXT).unwrap()).unwrap();
        assert_eq!(to_hex(&ciphertext), FIPS_CIPHERTEXT);
        assert_eq!(
            to_hex(&cipher.decrypt_hex(FIPS_CIPHERTEXT).unwrap()),
            FIPS_PLAINTEXT
        );
    }

    #[test]
    fn test_ecb_blocks_are_independent() {
        let cipher = fips_context();
        let block = from_hex(FIPS_PLAINTEXT).unwrap();
        let two_blocks = [block.as_slice(), block.as_slice()].concat();
        let ciphertext = cipher.encrypt(&two_blocks).unwrap();
        assert_eq!(ciphertext[..16], ciphertext[16..]);
        assert_eq!(to_hex(&ciphertext[..16]), FIPS_CIPHERTEXT);
    }

    #[test]
    fn test_rejects_unaligned_input() {
        let cipher = fips_context();
        for len in [1, 15, 17, 31] {
            let data = vec![0u8; len];
            assert_eq!(
                cipher.encrypt(&data),
                Err(CipherError::BlockAlignment { len })
            );
            assert_eq!(
                cipher.decrypt(&data),
                Err(CipherError::BlockAlignment { len })
            );
        }
    }

    #[test]
    fn test_empty_input_is_aligned() {
        assert_eq!(fips_context().encrypt(&[]).unwrap(), Vec::<u8>::new());
    }

    #[test]
    fn test_rejects_wrong_key_length() {
        for len in [0, 15, 17, 24, 32] {
            assert!(matches!(
                CipherContext::from_slice(&vec![0u8; len]),
                Err(CipherError::InvalidKey { len: l }) if l == len
            ));
        }
    }

    #[test]
    fn test_utf8_key_and_text() {
        let cipher = CipherContext::from_utf8_key("0123456789abcdef").unwrap();
        let ciphertext = cipher.encrypt_str("4111111111111111").unwrap();
        assert_eq!(
            cipher.decrypt_to_string(&ciphertext).unwrap(),
            "4111111111111111"
        );
        assert_eq!(
            cipher.decrypt_hex_to_string(&to_hex(&ciphertext)).unwrap(),
            "4111111111111111"
        );
    }

    #[test]
    fn test_invalid_utf8() {
        let cipher = fips_context();
        let ciphertext = cipher.encrypt(&[0xFF; 16]).unwrap();
        assert_eq!(
            cipher.decrypt_to_string(&ciphertext),
            Err(CipherError::InvalidUtf8)
        );
    }

    #[test]
    fn test_key_material_debug_is_redacted() {
        let key = KeyMaterial::from([0x42; KEY_SIZE]);
        assert_eq!(format!("{key:?}"), "KeyMaterial([REDACTED])");
        assert!(!format!("{:?}", CipherContext::new(&key)).contains("42"));
        assert_eq!(key.to_hex(), "42".repeat(16));
    }

    #[test]
    fn test_key_material_from_bad_hex() {
        assert!(matches!(
            KeyMaterial::from_hex("00"),
            Err(CipherError::InvalidKey { len: 1 })
        ));
        assert!(matches!(
            KeyMaterial::from_hex("XYZ"),
            Err(CipherError::Wire(_))
        ));
    }
}
