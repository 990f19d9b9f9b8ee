//! Fixed protocol constants, one profile per command family.

/// Constant fields of the key encrypt/decrypt command family.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyCommandProfile {
    /// Message header (12 characters)
    pub header: &'static str,
    /// Function code (6 characters)
    pub function: &'static str,
    /// Format flags (2 characters)
    pub format: &'static str,
    /// Cipher mode (2 characters)
    pub cipher_mode: &'static str,
    /// Initial check value (32 characters)
    pub icv: &'static str,
}

impl KeyCommandProfile {
    /// Encrypt a key under the referenced DPK.
    pub const ENCRYPT: Self = Self {
        header: "01010000003F",
        function: "EE0808",
        format: "00",
        cipher_mode: "00",
        icv: "00000000000000000000000000000000",
    };

    /// Decrypt a key under the referenced DPK.
    pub const DECRYPT: Self = Self {
        header: "01010000003F",
        function: "EE0809",
        format: "00",
        cipher_mode: "00",
        icv: "00000000000000000000000000000000",
    };
}

/// Fields of the legacy `M2` key-translation command.
///
/// The key under LMK is site specific and has no default; everything else is
/// fixed by the device's configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LegacyTranslateProfile {
    /// Message header (30 characters)
    pub header: &'static str,
    /// Command code
    pub command: &'static str,
    /// Mode flag
    pub mode: &'static str,
    /// Input format flag
    pub input_format: &'static str,
    /// Output format flag
    pub output_format: &'static str,
    /// Key type
    pub key_type: &'static str,
    /// Key block header
    pub key_header: String,
    /// Message length field, sent verbatim
    pub message_length: &'static str,
    /// LMK identifier suffix
    pub lmk_id: String,
}

impl LegacyTranslateProfile {
    /// Default key block header.
    pub const DEFAULT_KEY_HEADER: &'static str = "S1009621AN00S0001";

    /// Default LMK identifier.
    pub const DEFAULT_LMK_ID: &'static str = "%01";

    /// Expected reply command code.
    pub const REPLY_COMMAND: &'static str = "M3";

    /// Build a profile with the given key block header and LMK identifier.
    pub fn new(key_header: impl Into<String>, lmk_id: impl Into<String>) -> Self {
        Self {
            header: "000000000000000000000000000000",
            command: "M2",
            mode: "00",
            input_format: "1",
            output_format: "1",
            key_type: "FFF",
            key_header: key_header.into(),
            message_length: "0020",
            lmk_id: lmk_id.into(),
        }
    }
}

impl Default for LegacyTranslateProfile {
    fn default() -> Self {
        Self::new(Self::DEFAULT_KEY_HEADER, Self::DEFAULT_LMK_ID)
    }
}
