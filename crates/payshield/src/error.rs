//! Unified error type for HSM client operations.
//!
//! Every lower layer keeps its own error enum; [`HsmError`] wraps them so
//! callers handle one type, and [`ErrorKind`] gives a flat classification
//! for programmatic handling.
//!
//! ```rust
//! use payshield::{ErrorKind, HsmError, from_hex};
//!
//! let err: HsmError = from_hex("ABC").unwrap_err().into();
//! assert_eq!(err.kind(), ErrorKind::MalformedHex);
//! ```

use payshield_tcp::TransportError;
use payshield_wire::WireError;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::cipher::CipherError;

/// Result type alias for client operations
pub type HsmResult<T> = std::result::Result<T, HsmError>;

/// Error returned by [`HsmClient`](crate::HsmClient) and the helpers around it.
///
/// Messages carry lengths, offsets, hosts and ports only; key material, DPK
/// values and payload bytes never appear in them.
#[derive(Error, Debug, Clone, PartialEq)]
#[non_exhaustive]
pub enum HsmError {
    /// Frame building or reply parsing failed.
    #[error(transparent)]
    Wire(#[from] WireError),

    /// The HSM could not be reached or did not answer in time.
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// Local AES processing failed.
    #[error(transparent)]
    Cipher(#[from] CipherError),

    /// A caller-supplied value was rejected before anything was sent.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Configuration could not be loaded or failed validation.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// The HSM reset the connection instead of replying.
    #[error("Connection closed by HSM before it replied")]
    ConnectionClosed,

    /// The HSM answered with a non-success error code.
    #[error("HSM returned error code {code}")]
    Device {
        /// Two-character error code from the reply
        code: String,
    },
}

/// Error classification for programmatic handling
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    // === Input errors ===
    /// Bad port, empty key material or another rejected argument
    InvalidArgument,
    /// Odd-length or non-hex input
    MalformedHex,

    // === Transport errors ===
    /// DNS resolution or connection failure
    Network,
    /// No response within the configured timeout
    Timeout,
    /// Peer reset the connection before replying
    ConnectionClosed,

    // === Reply errors ===
    /// Reply too small to hold the fixed-offset layout
    ShortResponse,
    /// Declared payload runs past the end of the reply
    TruncatedPayload,
    /// Reply has the wrong shape for the command that was sent
    Protocol,
    /// HSM reported a failure code
    Device,

    // === Cipher errors ===
    /// Key material is not exactly one AES-128 key
    InvalidKey,
    /// Cipher input is not a whole number of blocks
    BlockAlignment,
    /// Decrypted data is not valid text
    Encoding,

    // === Setup ===
    /// Configuration error
    Configuration,
}

impl HsmError {
    /// Create an invalid-argument error
    #[must_use]
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::InvalidArgument(message.into())
    }

    /// Create a configuration error
    #[must_use]
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration(message.into())
    }

    /// Classify this error.
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Wire(err) => wire_kind(err),
            Self::Transport(err) => transport_kind(err),
            Self::Cipher(err) => match err {
                CipherError::InvalidKey { .. } => ErrorKind::InvalidKey,
                CipherError::BlockAlignment { .. } => ErrorKind::BlockAlignment,
                CipherError::InvalidUtf8 => ErrorKind::Encoding,
                CipherError::Wire(err) => wire_kind(err),
            },
            Self::InvalidArgument(_) => ErrorKind::InvalidArgument,
            Self::Configuration(_) => ErrorKind::Configuration,
            Self::ConnectionClosed => ErrorKind::ConnectionClosed,
            Self::Device { .. } => ErrorKind::Device,
        }
    }

    /// Whether the HSM could not be reached, as opposed to answering badly.
    #[must_use]
    pub fn is_unreachable(&self) -> bool {
        matches!(self, Self::Transport(err) if err.is_unreachable())
    }
}

fn wire_kind(err: &WireError) -> ErrorKind {
    match err {
        WireError::MalformedHex { .. } => ErrorKind::MalformedHex,
        WireError::InvalidArgument(_) => ErrorKind::InvalidArgument,
        WireError::ShortResponse { .. } => ErrorKind::ShortResponse,
        WireError::TruncatedPayload { .. } => ErrorKind::TruncatedPayload,
        _ => ErrorKind::Protocol,
    }
}

fn transport_kind(err: &TransportError) -> ErrorKind {
    match err {
        TransportError::Timeout { .. } => ErrorKind::Timeout,
        TransportError::ConnectionClosed(_) => ErrorKind::ConnectionClosed,
        TransportError::InvalidArgument(_) => ErrorKind::InvalidArgument,
        TransportError::ConfigurationError(_) => ErrorKind::Configuration,
        _ => ErrorKind::Network,
    }
}

impl From<config::ConfigError> for HsmError {
    fn from(err: config::ConfigError) -> Self {
        Self::Configuration(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_wire_kinds() {
        let err: HsmError = WireError::ShortResponse { len: 20, min: 27 }.into();
        assert_eq!(err.kind(), ErrorKind::ShortResponse);

        let err: HsmError = WireError::TruncatedPayload {
            declared: 40,
            available: 3,
        }
        .into();
        assert_eq!(err.kind(), ErrorKind::TruncatedPayload);

        let err: HsmError = WireError::MalformedReply("bad".into()).into();
        assert_eq!(err.kind(), ErrorKind::Protocol);
    }

    #[test]
    fn test_transport_kinds() {
        let timeout: HsmError = TransportError::Timeout {
            operation: "read",
            timeout: Duration::from_secs(1),
        }
        .into();
        assert_eq!(timeout.kind(), ErrorKind::Timeout);
        assert!(!timeout.is_unreachable());

        let refused: HsmError = TransportError::ConnectionRefused {
            addr: "127.0.0.1:1500".into(),
        }
        .into();
        assert_eq!(refused.kind(), ErrorKind::Network);
        assert!(refused.is_unreachable());
    }

    #[test]
    fn test_builder_bad_port_is_invalid_argument() {
        let err = HsmError::from(
            payshield_tcp::EndpointBuilder::new("hsm.local", 70000)
                .build()
                .unwrap_err(),
        );
        assert_eq!(err.kind(), ErrorKind::InvalidArgument);

        let err = HsmError::from(
            payshield_tcp::EndpointBuilder::new("hsm.local", 1500)
                .timeout(Duration::ZERO)
                .build()
                .unwrap_err(),
        );
        assert_eq!(err.kind(), ErrorKind::Configuration);
    }

    #[test]
    fn test_cipher_kinds() {
        let err: HsmError = CipherError::InvalidKey { len: 15 }.into();
        assert_eq!(err.kind(), ErrorKind::InvalidKey);
        let err: HsmError = CipherError::BlockAlignment { len: 17 }.into();
        assert_eq!(err.kind(), ErrorKind::BlockAlignment);
        assert_eq!(err.to_string(), "Block alignment: 17 bytes is not a multiple of 16");
    }

    #[test]
    fn test_kind_serializes_snake_case() {
        assert_eq!(
            serde_json::to_string(&ErrorKind::TruncatedPayload).unwrap(),
            "\"truncated_payload\""
        );
    }
}
