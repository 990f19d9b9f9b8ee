//! # PayShield
//!
//! Client for Hardware Security Modules that speak the PayShield-style
//! fixed-field ASCII-hex command protocol.
//!
//! The HSM performs key encryption and decryption inside its tamper-resistant
//! boundary; this crate builds the byte-exact frames, sends them over a
//! blocking TCP connection, extracts the result from the fixed-offset reply,
//! and turns an unwrapped key into a local AES-128/ECB cipher for bulk data
//! such as card numbers.
//!
//! ## Architecture
//!
//! - [`payshield_wire`]: hex codec, command frames, reply parsing
//! - [`payshield_tcp`]: one-connection-per-call TCP transport
//! - this crate: [`HsmClient`], [`CipherContext`], configuration and errors
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use payshield::prelude::*;
//!
//! fn main() -> HsmResult<()> {
//!     let config = HsmConfig::load(Some(std::path::Path::new("hsm.toml")))?;
//!     let client = HsmClient::from_config(&config)?;
//!
//!     match client.cipher_for("9A1B...")? {
//!         Some(cipher) => {
//!             let card = cipher.decrypt_hex_to_string("3AD7...")?;
//!             println!("{}", mask_card_number(&card, "%%%%%%******%%%%", '*')?);
//!         }
//!         None => eprintln!("HSM gave no usable answer"),
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Key handling
//!
//! [`KeyMaterial`] and the cipher state are wiped on drop. No error message
//! or log line carries key bytes, DPK values or payloads.

#![deny(missing_docs)]
#![warn(
    missing_debug_implementations,
    rust_2018_idioms,
    unreachable_pub,
    clippy::all
)]
#![deny(unsafe_code)]
#![allow(
    clippy::module_name_repetitions,
    clippy::must_use_candidate,
    clippy::missing_errors_doc,
    clippy::return_self_not_must_use
)]

mod card;
mod cipher;
mod client;
mod dpk;
mod error;
mod settings;

pub use card::{COPY_DIGIT, DEFAULT_MASK_CHAR, mask_card_number, pad_left_zeros};
pub use cipher::{BLOCK_SIZE, CipherContext, CipherError, CipherResult, KEY_SIZE, KeyMaterial};
pub use client::HsmClient;
pub use dpk::Dpk;
pub use error::{ErrorKind, HsmError, HsmResult};
pub use settings::{ConfigLoader, ENV_PREFIX, HsmConfig, LegacyConfig};

pub use payshield_tcp;
pub use payshield_wire;

pub use payshield_tcp::{Endpoint, EndpointBuilder, HsmTransport, Reply, TcpTransport};
pub use payshield_wire::{CommandFrame, LegacyTranslateProfile, from_hex, to_hex};

/// Commonly used types in one import.
pub mod prelude {
    pub use super::{
        CipherContext, Dpk, EndpointBuilder, ErrorKind, HsmClient, HsmConfig, HsmError,
        HsmResult, KeyMaterial, mask_card_number, pad_left_zeros,
    };
}
