//! Error types for CLI operations

use std::fmt;

use payshield::{ErrorKind, HsmError};
use thiserror::Error;

/// Result alias for CLI operations
pub type CliResult<T> = std::result::Result<T, CliError>;

/// CLI-specific errors
#[derive(Error, Debug)]
pub enum CliError {
    /// Client, transport or cipher failure
    #[error(transparent)]
    Hsm(#[from] HsmError),

    /// The HSM was reachable but gave no usable answer
    #[error("No usable reply from HSM for {operation}")]
    NoReply {
        /// Subcommand that got no reply
        operation: &'static str,
    },

    /// JSON encoding error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Logging could not be set up
    #[error("Logging setup failed: {0}")]
    Logging(String),
}

impl CliError {
    /// Get user-friendly suggestions for resolving the error
    pub fn suggestions(&self) -> Vec<&'static str> {
        match self.category() {
            ErrorCategory::Connection => vec![
                "Check that the HSM host and port are correct",
                "Run `payshield check` to test connectivity",
            ],
            ErrorCategory::Timeout => vec![
                "Increase the timeout with --timeout-ms",
                "Check that the HSM is not overloaded",
            ],
            ErrorCategory::Config => vec![
                "Pass --config or set PAYSHIELD_HOST, PAYSHIELD_PORT and PAYSHIELD_DPK",
            ],
            ErrorCategory::User => vec!["Check that hex arguments have an even number of digits"],
            ErrorCategory::Device => vec![
                "Check the DPK and key-under-LMK values match the HSM's key slots",
            ],
            _ => vec![],
        }
    }

    /// Get the error category
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::Hsm(err) => match err.kind() {
                ErrorKind::Network | ErrorKind::ConnectionClosed => ErrorCategory::Connection,
                ErrorKind::Timeout => ErrorCategory::Timeout,
                ErrorKind::Configuration => ErrorCategory::Config,
                ErrorKind::InvalidArgument
                | ErrorKind::MalformedHex
                | ErrorKind::InvalidKey
                | ErrorKind::BlockAlignment => ErrorCategory::User,
                ErrorKind::Device
                | ErrorKind::ShortResponse
                | ErrorKind::TruncatedPayload
                | ErrorKind::Protocol => ErrorCategory::Device,
                ErrorKind::Encoding => ErrorCategory::Other,
            },
            Self::NoReply { .. } => ErrorCategory::Device,
            Self::Json(_) | Self::Logging(_) => ErrorCategory::Other,
        }
    }

    /// Process exit code for this error.
    pub fn exit_code(&self) -> u8 {
        match self.category() {
            ErrorCategory::User => 2,
            ErrorCategory::Config => 3,
            ErrorCategory::Connection | ErrorCategory::Timeout => 4,
            ErrorCategory::Device => 5,
            ErrorCategory::Other => 1,
        }
    }
}

/// Error categories for display
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// HSM unreachable or connection dropped
    Connection,
    /// HSM too slow to answer
    Timeout,
    /// Missing or invalid configuration
    Config,
    /// Bad input from the user
    User,
    /// HSM answered, but not usefully
    Device,
    /// Anything else
    Other,
}

impl fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Connection => write!(f, "Connection"),
            Self::Timeout => write!(f, "Timeout"),
            Self::Config => write!(f, "Config"),
            Self::User => write!(f, "User"),
            Self::Device => write!(f, "Device"),
            Self::Other => write!(f, "Error"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_categories() {
        let err = CliError::from(HsmError::invalid_argument("bad"));
        assert_eq!(err.category(), ErrorCategory::User);
        assert_eq!(err.exit_code(), 2);

        let err = CliError::from(HsmError::Device { code: "15".into() });
        assert_eq!(err.category(), ErrorCategory::Device);
        assert!(!err.suggestions().is_empty());

        let err = CliError::NoReply { operation: "raw" };
        assert_eq!(err.to_string(), "No usable reply from HSM for raw");
        assert_eq!(err.exit_code(), 5);
    }

    #[test]
    fn test_config_suggestions() {
        let err = CliError::from(HsmError::configuration("missing field `dpk`"));
        assert_eq!(err.exit_code(), 3);
        assert!(err.suggestions()[0].contains("PAYSHIELD_DPK"));
    }
}
