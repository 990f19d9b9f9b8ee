//! Reply decoding for the legacy `M2` command.
//!
//! The device answers in ASCII behind the same single-byte length prefix it
//! was sent: a two-byte prefix, the 30-character header echo, the reply
//! command code, a two-digit error code, a four-hex-digit message length and
//! the message itself. The clear key therefore starts at byte 40.

use std::fmt;

use crate::error::{WireError, WireResult};
use crate::profile::LegacyTranslateProfile;

const PREFIX_LEN: usize = 2;
const HEADER_LEN: usize = 30;
const CODE_OFFSET: usize = PREFIX_LEN + HEADER_LEN;
const ERROR_OFFSET: usize = CODE_OFFSET + 2;
const LENGTH_OFFSET: usize = ERROR_OFFSET + 2;

/// Offset of the message (the translated key) in a successful reply.
pub const LEGACY_KEY_OFFSET: usize = LENGTH_OFFSET + 4;

/// A decoded `M3` reply.
#[derive(Clone, PartialEq, Eq)]
pub struct LegacyReply {
    response_code: String,
    error_code: String,
    message: String,
}

impl fmt::Debug for LegacyReply {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LegacyReply")
            .field("response_code", &self.response_code)
            .field("error_code", &self.error_code)
            .field("message_len", &self.message.len())
            .finish()
    }
}

impl LegacyReply {
    /// Decode a raw reply buffer.
    ///
    /// Bytes after the declared message (zero fill from a fixed read buffer)
    /// are ignored. A non-`00` error code is decoded successfully with an
    /// empty message; see [`LegacyReply::is_success`].
    pub fn parse(reply: &[u8]) -> WireResult<Self> {
        if reply.len() < LENGTH_OFFSET {
            return Err(WireError::ShortResponse {
                len: reply.len(),
                min: LENGTH_OFFSET,
            });
        }

        let response_code = ascii_field(&reply[CODE_OFFSET..ERROR_OFFSET], "reply code")?;
        if response_code != LegacyTranslateProfile::REPLY_COMMAND {
            return Err(WireError::MalformedReply(format!(
                "unexpected reply code {response_code:?}"
            )));
        }

        let error_code = ascii_field(&reply[ERROR_OFFSET..LENGTH_OFFSET], "error code")?;
        if error_code != "00" {
            return Ok(Self {
                response_code,
                error_code,
                message: String::new(),
            });
        }

        if reply.len() < LEGACY_KEY_OFFSET {
            return Err(WireError::ShortResponse {
                len: reply.len(),
                min: LEGACY_KEY_OFFSET,
            });
        }
        let length_field = ascii_field(&reply[LENGTH_OFFSET..LEGACY_KEY_OFFSET], "message length")?;
        let declared = usize::from_str_radix(&length_field, 16).map_err(|_| {
            WireError::MalformedReply(format!("message length {length_field:?} is not hex"))
        })?;

        let available = reply.len() - LEGACY_KEY_OFFSET;
        if declared > available {
            return Err(WireError::TruncatedPayload {
                declared,
                available,
            });
        }
        let message = ascii_field(
            &reply[LEGACY_KEY_OFFSET..LEGACY_KEY_OFFSET + declared],
            "message",
        )?;

        Ok(Self {
            response_code,
            error_code,
            message,
        })
    }

    /// The reply command code, always `M3` for a decoded reply.
    pub fn response_code(&self) -> &str {
        &self.response_code
    }

    /// The two-digit error code; `00` means success.
    pub fn error_code(&self) -> &str {
        &self.error_code
    }

    /// Whether the device reported success.
    pub fn is_success(&self) -> bool {
        self.error_code == "00"
    }

    /// The returned message, empty unless the device reported success.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Consume the reply and take the message.
    pub fn into_message(self) -> String {
        self.message
    }
}

fn ascii_field(bytes: &[u8], name: &str) -> WireResult<String> {
    if !bytes.is_ascii() {
        return Err(WireError::MalformedReply(format!("{name} is not ASCII")));
    }
    Ok(bytes.iter().map(|&b| char::from(b)).collect())
}
