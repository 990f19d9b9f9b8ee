//! The outcome of a single read.

use bytes::Bytes;

/// What came back from the HSM on one round trip.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    /// The bytes delivered by the read, never empty.
    Payload(Bytes),
    /// The HSM closed the stream in order without sending anything.
    Empty,
    /// The HSM reset or aborted the connection instead of answering.
    ConnectionClosed,
}

impl Reply {
    /// The received bytes; empty for the non-payload variants.
    pub fn bytes(&self) -> &[u8] {
        match self {
            Self::Payload(bytes) => bytes,
            Self::Empty | Self::ConnectionClosed => &[],
        }
    }

    /// Number of bytes received.
    pub fn len(&self) -> usize {
        self.bytes().len()
    }

    /// Whether no bytes were received.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Short name used in logs.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Payload(_) => "payload",
            Self::Empty => "empty",
            Self::ConnectionClosed => "connection-closed",
        }
    }
}
