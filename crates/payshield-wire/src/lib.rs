//! # PayShield Wire Format
//!
//! Byte-exact request frames and reply parsing for HSMs that speak the
//! fixed-field ASCII-hex command protocol.
//!
//! ## Layout
//!
//! A request frame is an ASCII command body built from fixed-width fields.
//! Before it reaches the socket the body is hex encoded and prefixed with a
//! command-class byte and a big-endian length, then the whole hex string is
//! decoded back into the bytes that are written:
//!
//! ```text
//! [class "00"][length][hex(ASCII body)]  --from_hex-->  wire bytes
//! ```
//!
//! Replies for the key encrypt/decrypt family carry the payload length at
//! offset 26 and the payload itself from offset 27.
//!
//! ## Usage
//!
//! ```rust
//! use payshield_wire::{CommandFrame, extract_payload};
//!
//! let frame = CommandFrame::key_encrypt("S1009621AN00S0001", &[0u8; 16]).unwrap();
//! assert!(frame.body().contains("EE0808"));
//! assert_eq!(frame.declared_length(), frame.body().len());
//!
//! let mut reply = vec![0u8; 27];
//! reply[26] = 2;
//! reply.extend_from_slice(&[0xAB, 0xCD]);
//! assert_eq!(extract_payload(&reply).unwrap(), &[0xAB, 0xCD]);
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

mod codec;
mod error;
mod frame;
mod legacy;
mod profile;
mod response;

pub use codec::{from_hex, to_hex};
pub use error::{WireError, WireResult};
pub use frame::{COMMAND_CLASS, CommandFamily, CommandFrame};
pub use legacy::{LEGACY_KEY_OFFSET, LegacyReply};
pub use profile::{KeyCommandProfile, LegacyTranslateProfile};
pub use response::{PAYLOAD_LENGTH_OFFSET, PAYLOAD_OFFSET, extract_payload};
