//! TCP transport implementation for PayShield-style HSMs

use bytes::Bytes;
use std::io::{self, Read, Write};
use std::net::{SocketAddr, TcpStream, ToSocketAddrs};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, trace, warn};

use crate::endpoint::Endpoint;
use crate::error::{TransportError, TransportResult};
use crate::metrics::{AtomicMetrics, TransportMetrics};
use crate::reply::Reply;

/// A request/response channel to an HSM.
///
/// Implementations own no connection between calls: each round trip is
/// independent, so callers may issue them from any number of threads.
pub trait HsmTransport: Send + Sync + std::fmt::Debug {
    /// Send `request` and return what a single read produced.
    fn round_trip(&self, request: &[u8]) -> TransportResult<Reply>;

    /// Returns `true` if a connection can be opened right now.
    ///
    /// Never fails: every I/O error is reported as `false`.
    fn check_availability(&self) -> bool;

    /// Returns the endpoint address for this transport, if applicable.
    fn endpoint(&self) -> Option<String> {
        None
    }

    /// Returns a snapshot of the transport's counters.
    fn metrics(&self) -> TransportMetrics {
        TransportMetrics::default()
    }
}

/// Blocking TCP transport that opens one connection per round trip.
#[derive(Debug, Clone)]
pub struct TcpTransport {
    endpoint: Endpoint,
    /// Shared across clones (lock-free atomic)
    metrics: Arc<AtomicMetrics>,
}

impl TcpTransport {
    /// Create a transport for `endpoint`.
    #[must_use]
    pub fn new(endpoint: Endpoint) -> Self {
        Self {
            endpoint,
            metrics: Arc::new(AtomicMetrics::default()),
        }
    }

    /// The endpoint this transport talks to.
    pub fn target(&self) -> &Endpoint {
        &self.endpoint
    }

    fn resolve(&self) -> TransportResult<Vec<SocketAddr>> {
        let host = self.endpoint.host();
        let addrs: Vec<SocketAddr> = (host, self.endpoint.port())
            .to_socket_addrs()
            .map_err(|e| TransportError::Resolve {
                host: host.to_string(),
                reason: e.to_string(),
            })?
            .collect();

        if addrs.is_empty() {
            return Err(TransportError::Resolve {
                host: host.to_string(),
                reason: "no addresses returned".into(),
            });
        }
        Ok(addrs)
    }

    /// Connect to the first resolved address that accepts.
    fn connect(&self) -> TransportResult<TcpStream> {
        let timeout = self.endpoint.timeout();
        let mut last_error = None;

        for addr in self.resolve()? {
            trace!("Connecting to HSM at {}", addr);
            match TcpStream::connect_timeout(&addr, timeout) {
                Ok(stream) => return Ok(stream),
                Err(e) => {
                    let err = match e.kind() {
                        io::ErrorKind::ConnectionRefused => TransportError::ConnectionRefused {
                            addr: addr.to_string(),
                        },
                        io::ErrorKind::TimedOut | io::ErrorKind::WouldBlock => {
                            TransportError::Timeout {
                                operation: "connect",
                                timeout,
                            }
                        }
                        _ => TransportError::ConnectionFailed(format!("{addr}: {e}")),
                    };
                    debug!("Connection attempt to {} failed: {}", addr, err);
                    last_error = Some(err);
                }
            }
        }

        Err(last_error.unwrap_or_else(|| {
            TransportError::ConnectionFailed(format!("no address of {} accepted", self.endpoint))
        }))
    }

    /// Connect, write, read once. The stream is dropped, and so closed, on
    /// every path out of this function.
    fn exchange(&self, request: &[u8]) -> TransportResult<Reply> {
        let timeout = self.endpoint.timeout();
        let mut stream = self.connect()?;
        stream.set_read_timeout(Some(timeout))?;
        stream.set_write_timeout(Some(timeout))?;

        stream
            .write_all(request)
            .and_then(|()| stream.flush())
            .map_err(|e| TransportError::from_io(&e, "write", timeout))?;

        let mut buffer = vec![0u8; self.endpoint.read_buffer_size()];
        loop {
            match stream.read(&mut buffer) {
                Ok(0) => return Ok(Reply::Empty),
                Ok(n) => {
                    buffer.truncate(n);
                    return Ok(Reply::Payload(Bytes::from(buffer)));
                }
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e)
                    if matches!(
                        e.kind(),
                        io::ErrorKind::ConnectionReset | io::ErrorKind::ConnectionAborted
                    ) =>
                {
                    return Ok(Reply::ConnectionClosed);
                }
                Err(e) => return Err(TransportError::from_io(&e, "read", timeout)),
            }
        }
    }
}

impl HsmTransport for TcpTransport {
    fn round_trip(&self, request: &[u8]) -> TransportResult<Reply> {
        let started = Instant::now();
        self.metrics.record_request(request.len());
        debug!("Sending {} bytes to {}", request.len(), self.endpoint);

        match self.exchange(request) {
            Ok(reply) => {
                let elapsed = started.elapsed();
                self.metrics
                    .record_reply(reply.len(), elapsed.as_micros() as u64);
                debug!(
                    "Received {} reply ({} bytes) from {} in {:?}",
                    reply.kind(),
                    reply.len(),
                    self.endpoint,
                    elapsed
                );
                Ok(reply)
            }
            Err(err) => {
                self.metrics.record_failure(err.is_timeout());
                warn!("Round trip to {} failed: {}", self.endpoint, err);
                Err(err)
            }
        }
    }

    fn check_availability(&self) -> bool {
        match self.connect() {
            Ok(_stream) => {
                debug!("HSM at {} is reachable", self.endpoint);
                true
            }
            Err(err) => {
                debug!("HSM at {} is unavailable: {}", self.endpoint, err);
                false
            }
        }
    }

    fn endpoint(&self) -> Option<String> {
        Some(self.endpoint.to_string())
    }

    fn metrics(&self) -> TransportMetrics {
        self.metrics.snapshot()
    }
}
