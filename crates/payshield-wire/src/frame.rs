//! Request frame construction.

use std::fmt;

use crate::codec::{from_hex, to_hex};
use crate::error::{WireError, WireResult};
use crate::profile::{KeyCommandProfile, LegacyTranslateProfile};

/// Command-class prefix placed ahead of the length on every frame.
pub const COMMAND_CLASS: &str = "00";

/// Largest variable field the 2-digit length field can describe, in bytes.
const MAX_FIELD_BYTES: usize = 0xFF;

/// The command families this client can build frames for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CommandFamily {
    /// `EE0808`: encrypt a key under a DPK
    KeyEncrypt,
    /// `EE0809`: decrypt a key under a DPK
    KeyDecrypt,
    /// `M2`: legacy key translation
    LegacyTranslate,
}

impl CommandFamily {
    /// Number of hex digits used to render the body length.
    ///
    /// The legacy command keeps the single length byte its devices expect.
    pub const fn length_digits(self) -> usize {
        match self {
            Self::KeyEncrypt | Self::KeyDecrypt => 4,
            Self::LegacyTranslate => 2,
        }
    }

    /// Largest body, in bytes, whose length fits the prefix.
    pub const fn max_body_len(self) -> usize {
        match self.length_digits() {
            2 => 0xFF,
            _ => 0xFFFF,
        }
    }

    /// Short name used in logs.
    pub const fn name(self) -> &'static str {
        match self {
            Self::KeyEncrypt => "key-encrypt",
            Self::KeyDecrypt => "key-decrypt",
            Self::LegacyTranslate => "legacy-translate",
        }
    }
}

impl fmt::Display for CommandFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// One request, held as its ASCII command body.
///
/// Frames are immutable once built. The body contains key material, so the
/// `Debug` output only shows the family and the body length.
#[derive(Clone, PartialEq, Eq)]
pub struct CommandFrame {
    family: CommandFamily,
    body: String,
}

impl fmt::Debug for CommandFrame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CommandFrame")
            .field("family", &self.family)
            .field("body_len", &self.body.len())
            .finish()
    }
}

impl CommandFrame {
    /// Build an `EE0808` frame that asks the HSM to encrypt `key` under `dpk`.
    pub fn key_encrypt(dpk: &str, key: &[u8]) -> WireResult<Self> {
        if key.is_empty() {
            return Err(WireError::InvalidArgument("key material is empty".into()));
        }
        Self::key_command(CommandFamily::KeyEncrypt, dpk, &to_hex(key))
    }

    /// Build an `EE0808` frame for a key already rendered as hex digits.
    pub fn key_encrypt_hex(dpk: &str, key_hex: &str) -> WireResult<Self> {
        Self::key_command(CommandFamily::KeyEncrypt, dpk, key_hex)
    }

    /// Build an `EE0809` frame that asks the HSM to decrypt `ciphertext_hex`.
    pub fn key_decrypt(dpk: &str, ciphertext_hex: &str) -> WireResult<Self> {
        Self::key_command(CommandFamily::KeyDecrypt, dpk, ciphertext_hex)
    }

    /// Build an `M2` key-translation frame.
    ///
    /// `key_under_lmk` is the encrypted key the device should use and
    /// `ciphertext_hex` the data to translate; the latter is upper-cased
    /// before it is placed in the frame.
    pub fn legacy_translate(
        profile: &LegacyTranslateProfile,
        key_under_lmk: &str,
        ciphertext_hex: &str,
    ) -> WireResult<Self> {
        require_field("key under LMK", key_under_lmk)?;
        require_field("ciphertext", ciphertext_hex)?;
        require_field("key header", &profile.key_header)?;
        require_ascii("LMK identifier", &profile.lmk_id)?;
        from_hex(ciphertext_hex)?;

        let ciphertext = ciphertext_hex.to_ascii_uppercase();
        let body = [
            profile.header,
            profile.command,
            profile.mode,
            profile.input_format,
            profile.output_format,
            profile.key_type,
            profile.key_header.as_str(),
            key_under_lmk,
            profile.message_length,
            ciphertext.as_str(),
            profile.lmk_id.as_str(),
        ]
        .concat();

        Self::from_body(CommandFamily::LegacyTranslate, body)
    }

    fn key_command(family: CommandFamily, dpk: &str, field_hex: &str) -> WireResult<Self> {
        require_field("DPK reference", dpk)?;
        if field_hex.is_empty() {
            return Err(WireError::InvalidArgument(format!(
                "{family} requires a non-empty payload"
            )));
        }

        let field_len = from_hex(field_hex)?.len();
        if field_len > MAX_FIELD_BYTES {
            return Err(WireError::InvalidArgument(format!(
                "payload of {field_len} bytes exceeds the {MAX_FIELD_BYTES}-byte length field"
            )));
        }

        let profile = match family {
            CommandFamily::KeyDecrypt => KeyCommandProfile::DECRYPT,
            _ => KeyCommandProfile::ENCRYPT,
        };
        let length_field = format!("{field_len:02X}");

        let body = [
            profile.header,
            profile.function,
            profile.format,
            dpk,
            profile.cipher_mode,
            profile.icv,
            length_field.as_str(),
            field_hex,
        ]
        .concat();

        Self::from_body(family, body)
    }

    fn from_body(family: CommandFamily, body: String) -> WireResult<Self> {
        if body.len() > family.max_body_len() {
            return Err(WireError::InvalidArgument(format!(
                "{family} body of {} bytes does not fit a {}-digit length prefix",
                body.len(),
                family.length_digits()
            )));
        }
        Ok(Self { family, body })
    }

    /// The command family this frame belongs to.
    pub fn family(&self) -> CommandFamily {
        self.family
    }

    /// The ASCII command body.
    pub fn body(&self) -> &str {
        &self.body
    }

    /// The body hex encoded, as carried after the prefix.
    pub fn hex_body(&self) -> String {
        to_hex(self.body.as_bytes())
    }

    /// Length carried in the prefix: half the hex body, i.e. the body's byte count.
    pub fn declared_length(&self) -> usize {
        self.body.len()
    }

    /// The length prefix digits, excluding the command class.
    pub fn length_prefix(&self) -> String {
        format!(
            "{:0width$X}",
            self.declared_length(),
            width = self.family.length_digits()
        )
    }

    /// The full frame as hex digits: class, length, hex body.
    pub fn wire_hex(&self) -> String {
        [COMMAND_CLASS, &self.length_prefix(), &self.hex_body()].concat()
    }

    /// The bytes written to the socket, equal to `from_hex(&self.wire_hex())`.
    pub fn to_bytes(&self) -> Vec<u8> {
        let len = self.declared_length();
        let mut bytes = Vec::with_capacity(3 + len);
        bytes.push(0x00);
        match self.family.length_digits() {
            2 => bytes.push(len as u8),
            _ => bytes.extend_from_slice(&(len as u16).to_be_bytes()),
        }
        bytes.extend_from_slice(self.body.as_bytes());
        bytes
    }
}

fn require_field(name: &str, value: &str) -> WireResult<()> {
    if value.is_empty() {
        return Err(WireError::InvalidArgument(format!("{name} is empty")));
    }
    require_ascii(name, value)
}

fn require_ascii(name: &str, value: &str) -> WireResult<()> {
    if !value.is_ascii() {
        return Err(WireError::InvalidArgument(format!(
            "{name} contains non-ASCII characters"
        )));
    }
    Ok(())
}
