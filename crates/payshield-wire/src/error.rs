//! Wire format error types.

use thiserror::Error;

/// A specialized `Result` type for frame building and reply parsing.
pub type WireResult<T> = std::result::Result<T, WireError>;

/// Errors raised while building request frames or parsing replies.
///
/// None of the variants carry field contents, so they are safe to log even
/// when the input was key material.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum WireError {
    /// Input that should be hexadecimal was not.
    #[error("Malformed hex: {reason}")]
    MalformedHex {
        /// What was wrong with the input
        reason: String,
    },

    /// A caller-supplied field is unusable for this command.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// The reply is too small to contain the payload length byte.
    #[error("Short response: got {len} bytes, need at least {min}")]
    ShortResponse {
        /// Number of bytes received
        len: usize,
        /// Minimum number of bytes required
        min: usize,
    },

    /// The reply declares a payload longer than the bytes that arrived.
    #[error(
        "Truncated payload: length byte declares {declared} bytes but only {available} follow"
    )]
    TruncatedPayload {
        /// Payload length declared by the reply
        declared: usize,
        /// Bytes actually available after the length byte
        available: usize,
    },

    /// A legacy reply is not laid out as expected.
    #[error("Malformed legacy reply: {0}")]
    MalformedReply(String),
}

impl From<hex::FromHexError> for WireError {
    fn from(err: hex::FromHexError) -> Self {
        let reason = match err {
            hex::FromHexError::InvalidHexCharacter { index, .. } => {
                format!("non-hex character at position {index}")
            }
            hex::FromHexError::OddLength => "odd number of digits".to_string(),
            hex::FromHexError::InvalidStringLength => "unexpected length".to_string(),
        };
        Self::MalformedHex { reason }
    }
}
