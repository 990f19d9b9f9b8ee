//! HSM endpoint description.

use std::fmt;
use std::time::Duration;

use crate::error::{TransportError, TransportResult};

/// Timeout applied when none is configured.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Read buffer size applied when none is configured.
pub const DEFAULT_READ_BUFFER_SIZE: usize = 1024;

/// Where an HSM lives and how long to wait for it.
///
/// Immutable after construction; build one with [`EndpointBuilder`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoint {
    host: String,
    port: u16,
    timeout: Duration,
    read_buffer_size: usize,
}

impl Endpoint {
    /// Host name or address.
    pub fn host(&self) -> &str {
        &self.host
    }

    /// TCP port.
    pub fn port(&self) -> u16 {
        self.port
    }

    /// Timeout for connect, write and read.
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Size of the single read performed per call.
    pub fn read_buffer_size(&self) -> usize {
        self.read_buffer_size
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "tcp://{}:{}", self.host, self.port)
    }
}

/// Builder for [`Endpoint`].
#[derive(Debug, Clone)]
pub struct EndpointBuilder {
    host: String,
    port: i64,
    timeout: Duration,
    read_buffer_size: usize,
}

impl EndpointBuilder {
    /// Start a builder for `host:port` with default timeout and buffer size.
    ///
    /// The port is range-checked by [`EndpointBuilder::build`], so values read
    /// from configuration can be passed through unchanged.
    pub fn new(host: impl Into<String>, port: impl Into<i64>) -> Self {
        Self {
            host: host.into(),
            port: port.into(),
            timeout: DEFAULT_TIMEOUT,
            read_buffer_size: DEFAULT_READ_BUFFER_SIZE,
        }
    }

    /// Set the per-call timeout.
    #[must_use]
    pub const fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the read buffer size.
    #[must_use]
    pub const fn read_buffer_size(mut self, size: usize) -> Self {
        self.read_buffer_size = size;
        self
    }

    /// Validate and build the endpoint.
    pub fn build(self) -> TransportResult<Endpoint> {
        if self.host.trim().is_empty() {
            return Err(TransportError::InvalidArgument("host is empty".into()));
        }
        let port = u16::try_from(self.port).map_err(|_| {
            TransportError::InvalidArgument(format!("port {} is outside 0..=65535", self.port))
        })?;
        if self.timeout.is_zero() {
            return Err(TransportError::ConfigurationError(
                "timeout must be non-zero".into(),
            ));
        }
        if self.read_buffer_size == 0 {
            return Err(TransportError::ConfigurationError(
                "read buffer size must be non-zero".into(),
            ));
        }

        Ok(Endpoint {
            host: self.host,
            port,
            timeout: self.timeout,
            read_buffer_size: self.read_buffer_size,
        })
    }
}
