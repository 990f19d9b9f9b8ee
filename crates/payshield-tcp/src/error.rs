//! Transport error types.

use std::io;
use std::time::Duration;
use thiserror::Error;

/// A specialized `Result` type for transport operations.
pub type TransportResult<T> = std::result::Result<T, TransportError>;

/// Represents errors that can occur while talking to the HSM.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum TransportError {
    /// The host name could not be resolved to an address.
    #[error("Could not resolve {host}: {reason}")]
    Resolve {
        /// Host that failed to resolve
        host: String,
        /// Resolver message
        reason: String,
    },

    /// The HSM actively refused the connection.
    #[error("Connection refused by {addr}")]
    ConnectionRefused {
        /// Address that refused
        addr: String,
    },

    /// Failed to establish a connection for another reason.
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    /// The HSM did not answer within the configured timeout.
    #[error("{operation} timed out after {timeout:?}")]
    Timeout {
        /// The operation that timed out (`connect`, `write` or `read`)
        operation: &'static str,
        /// The timeout that was exceeded
        timeout: Duration,
    },

    /// The HSM dropped the connection before answering.
    #[error("Connection closed by peer: {0}")]
    ConnectionClosed(String),

    /// A caller-supplied host or port is unusable.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// The endpoint was configured with invalid parameters.
    #[error("Configuration error: {0}")]
    ConfigurationError(String),

    /// An underlying I/O error occurred.
    #[error("IO error: {0}")]
    Io(String),
}

impl TransportError {
    /// Whether this error means the HSM could not be reached at all.
    pub fn is_unreachable(&self) -> bool {
        matches!(
            self,
            Self::Resolve { .. } | Self::ConnectionRefused { .. } | Self::ConnectionFailed(_)
        )
    }

    /// Whether this error is a timeout.
    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Timeout { .. })
    }

    /// Classify an I/O error raised during `operation`.
    pub(crate) fn from_io(err: &io::Error, operation: &'static str, timeout: Duration) -> Self {
        match err.kind() {
            io::ErrorKind::WouldBlock | io::ErrorKind::TimedOut => {
                Self::Timeout { operation, timeout }
            }
            io::ErrorKind::ConnectionReset
            | io::ErrorKind::ConnectionAborted
            | io::ErrorKind::BrokenPipe => Self::ConnectionClosed(format!("{operation}: {err}")),
            _ => Self::Io(format!("{operation}: {err}")),
        }
    }
}

impl From<io::Error> for TransportError {
    fn from(err: io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timeout_classification() {
        let timeout = Duration::from_millis(250);
        for kind in [io::ErrorKind::WouldBlock, io::ErrorKind::TimedOut] {
            let err = TransportError::from_io(&io::Error::from(kind), "read", timeout);
            assert_eq!(
                err,
                TransportError::Timeout {
                    operation: "read",
                    timeout
                }
            );
            assert!(err.is_timeout());
        }
    }

    #[test]
    fn test_reset_is_connection_closed() {
        let err = TransportError::from_io(
            &io::Error::from(io::ErrorKind::ConnectionReset),
            "read",
            Duration::from_secs(1),
        );
        assert!(matches!(err, TransportError::ConnectionClosed(_)));
        assert!(!err.is_unreachable());
    }

    #[test]
    fn test_unreachable_kinds() {
        assert!(
            TransportError::ConnectionRefused {
                addr: "127.0.0.1:1".into()
            }
            .is_unreachable()
        );
        assert!(
            TransportError::Resolve {
                host: "nowhere".into(),
                reason: "not found".into()
            }
            .is_unreachable()
        );
    }
}
