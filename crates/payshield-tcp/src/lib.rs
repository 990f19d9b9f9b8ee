//! # PayShield TCP Transport
//!
//! Blocking TCP transport for HSMs that answer one request per connection.
//!
//! ## Features
//!
//! - **One connection per call**: every round trip connects, writes, reads
//!   once and closes, so no socket outlives the call that opened it
//! - **Per-call timeouts**: connect, write and read are bounded by the
//!   endpoint's timeout
//! - **Explicit replies**: data, an orderly empty close and an aborted
//!   connection are distinct [`Reply`] variants
//! - **Distinct failures**: name resolution, refusal and timeouts are
//!   separate [`TransportError`] variants; nothing is retried here
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use payshield_tcp::{EndpointBuilder, HsmTransport, TcpTransport};
//! use std::time::Duration;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let endpoint = EndpointBuilder::new("10.0.0.5", 1500)
//!         .timeout(Duration::from_secs(5))
//!         .build()?;
//!     let transport = TcpTransport::new(endpoint);
//!
//!     if transport.check_availability() {
//!         let reply = transport.round_trip(b"\x00\x02HI")?;
//!         println!("{} bytes", reply.len());
//!     }
//!     Ok(())
//! }
//! ```

#![warn(
    missing_docs,
    missing_debug_implementations,
    rust_2018_idioms,
    unreachable_pub,
    clippy::all
)]
#![deny(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![allow(
    clippy::module_name_repetitions,
    clippy::missing_errors_doc,
    clippy::must_use_candidate
)]

mod endpoint;
mod error;
mod metrics;
mod reply;
mod transport;

pub use endpoint::{DEFAULT_READ_BUFFER_SIZE, DEFAULT_TIMEOUT, Endpoint, EndpointBuilder};
pub use error::{TransportError, TransportResult};
pub use metrics::{AtomicMetrics, TransportMetrics};
pub use reply::Reply;
pub use transport::{HsmTransport, TcpTransport};
