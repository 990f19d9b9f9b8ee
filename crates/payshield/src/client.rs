//! The HSM client: frames in, payloads out.

use payshield_tcp::{Endpoint, HsmTransport, Reply, TcpTransport, TransportMetrics};
use payshield_wire::{
    CommandFrame, LegacyReply, LegacyTranslateProfile, PAYLOAD_OFFSET, extract_payload, to_hex,
};
use std::fmt;
use tracing::{debug, info, warn};
use zeroize::Zeroize;

use crate::cipher::{CipherContext, KeyMaterial};
use crate::dpk::Dpk;
use crate::error::{HsmError, HsmResult};
use crate::settings::HsmConfig;

/// Legacy translation settings bound to a client.
#[derive(Clone)]
struct LegacySettings {
    profile: LegacyTranslateProfile,
    key_under_lmk: String,
}

impl fmt::Debug for LegacySettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LegacySettings")
            .field("profile", &self.profile)
            .field("key_under_lmk", &"[REDACTED]")
            .finish()
    }
}

/// Client for a PayShield-style HSM.
///
/// Every operation is one independent round trip on its own connection, so
/// a client can be shared across threads without locking.
///
/// Key operations return `Ok(None)` when the device was reachable but gave
/// no usable answer: it closed the stream without data, or sent fewer bytes
/// than the fixed reply layout needs. Unreachable devices, timeouts and
/// malformed input are errors.
///
/// ```rust,no_run
/// use payshield::{Dpk, EndpointBuilder, HsmClient};
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let endpoint = EndpointBuilder::new("10.0.0.5", 1500).build()?;
/// let client = HsmClient::new(endpoint, Dpk::new("S1009621AN00S0001")?);
///
/// if let Some(cipher) = client.cipher_for("8F0C...")? {
///     let card = cipher.decrypt_hex_to_string("3AD7...")?;
///     println!("{card}");
/// }
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct HsmClient<T: HsmTransport = TcpTransport> {
    transport: T,
    dpk: Dpk,
    legacy: Option<LegacySettings>,
}

impl HsmClient<TcpTransport> {
    /// Client talking TCP to `endpoint`.
    pub fn new(endpoint: Endpoint, dpk: Dpk) -> Self {
        Self::with_transport(TcpTransport::new(endpoint), dpk)
    }

    /// Client built from validated configuration, including the legacy
    /// section when present.
    pub fn from_config(config: &HsmConfig) -> HsmResult<Self> {
        let client = Self::new(config.endpoint()?, config.dpk.clone());
        Ok(match &config.legacy {
            Some(legacy) => client.with_legacy(legacy.profile(), legacy.key_under_lmk.clone()),
            None => client,
        })
    }
}

impl<T: HsmTransport> HsmClient<T> {
    /// Client over any transport.
    pub fn with_transport(transport: T, dpk: Dpk) -> Self {
        Self {
            transport,
            dpk,
            legacy: None,
        }
    }

    /// Enable [`legacy_translate`](Self::legacy_translate) with the given
    /// frame constants and encrypted working key.
    pub fn with_legacy(
        mut self,
        profile: LegacyTranslateProfile,
        key_under_lmk: impl Into<String>,
    ) -> Self {
        self.legacy = Some(LegacySettings {
            profile,
            key_under_lmk: key_under_lmk.into(),
        });
        self
    }

    /// The underlying transport.
    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Where this client sends requests, if the transport has an address.
    pub fn endpoint(&self) -> Option<String> {
        self.transport.endpoint()
    }

    /// Transport counters.
    pub fn metrics(&self) -> TransportMetrics {
        self.transport.metrics()
    }

    /// Whether a connection to the HSM can be opened right now. Never fails.
    pub fn check_availability(&self) -> bool {
        self.transport.check_availability()
    }

    /// Have the HSM encrypt `key` under the DPK; returns the result as hex.
    pub fn encrypt_key_to_hex(&self, key: &[u8]) -> HsmResult<Option<String>> {
        let frame = CommandFrame::key_encrypt(self.dpk.as_str(), key)?;
        Ok(self.structured_call(&frame)?.map(|payload| to_hex(&payload)))
    }

    /// As [`encrypt_key_to_hex`](Self::encrypt_key_to_hex) with the key given as hex.
    pub fn encrypt_hex_key_to_hex(&self, key_hex: &str) -> HsmResult<Option<String>> {
        let frame = CommandFrame::key_encrypt_hex(self.dpk.as_str(), key_hex)?;
        Ok(self.structured_call(&frame)?.map(|payload| to_hex(&payload)))
    }

    /// Have the HSM decrypt `ciphertext_hex`; returns the clear result as hex.
    pub fn decrypt_key_to_hex(&self, ciphertext_hex: &str) -> HsmResult<Option<String>> {
        Ok(self.decrypt_key_to_bytes(ciphertext_hex)?.map(|mut clear| {
            let hex = to_hex(&clear);
            clear.zeroize();
            hex
        }))
    }

    /// Have the HSM decrypt `ciphertext_hex`; returns the clear bytes.
    pub fn decrypt_key_to_bytes(&self, ciphertext_hex: &str) -> HsmResult<Option<Vec<u8>>> {
        let frame = CommandFrame::key_decrypt(self.dpk.as_str(), ciphertext_hex)?;
        self.structured_call(&frame)
    }

    /// Decrypt and check the result is exactly one AES-128 key.
    pub fn decrypt_key(&self, ciphertext_hex: &str) -> HsmResult<Option<KeyMaterial>> {
        let Some(mut clear) = self.decrypt_key_to_bytes(ciphertext_hex)? else {
            return Ok(None);
        };
        let key = KeyMaterial::from_slice(&clear);
        clear.zeroize();
        Ok(Some(key?))
    }

    /// Decrypt a wrapped key and bind a [`CipherContext`] to it.
    pub fn cipher_for(&self, ciphertext_hex: &str) -> HsmResult<Option<CipherContext>> {
        Ok(self
            .decrypt_key(ciphertext_hex)?
            .map(|key| CipherContext::new(&key)))
    }

    /// Send an `M2` translation and return the reply bytes as hex, unparsed.
    ///
    /// # Errors
    ///
    /// Returns [`HsmError::Configuration`] if the client was built without
    /// legacy settings.
    pub fn legacy_translate(&self, ciphertext_hex: &str) -> HsmResult<Option<String>> {
        Ok(self
            .legacy_call(ciphertext_hex)?
            .map(|reply| to_hex(&reply)))
    }

    /// Send an `M2` translation and return the message field of the reply.
    ///
    /// # Errors
    ///
    /// Returns [`HsmError::Device`] if the HSM answered with a non-`00`
    /// error code, and a wire error if the reply is malformed.
    pub fn legacy_translate_key(&self, ciphertext_hex: &str) -> HsmResult<Option<String>> {
        let Some(reply) = self.legacy_call(ciphertext_hex)? else {
            return Ok(None);
        };
        let parsed = LegacyReply::parse(&reply)?;
        if !parsed.is_success() {
            warn!(code = parsed.error_code(), "HSM rejected M2 translation");
            return Err(HsmError::Device {
                code: parsed.error_code().to_string(),
            });
        }
        Ok(Some(parsed.into_message()))
    }

    /// Write `request` as is and return whatever one read produced.
    ///
    /// An orderly close without data yields an empty vector.
    pub fn raw_request(&self, request: &[u8]) -> HsmResult<Vec<u8>> {
        if request.is_empty() {
            return Err(HsmError::invalid_argument("request must not be empty"));
        }
        match self.transport.round_trip(request)? {
            Reply::Payload(bytes) => Ok(bytes.to_vec()),
            Reply::Empty => Ok(Vec::new()),
            Reply::ConnectionClosed => Err(HsmError::ConnectionClosed),
        }
    }

    /// Round-trip a key encrypt/decrypt frame and extract its payload.
    fn structured_call(&self, frame: &CommandFrame) -> HsmResult<Option<Vec<u8>>> {
        let family = frame.family();
        let request = frame.to_bytes();
        debug!(%family, request_len = request.len(), "Sending HSM command");

        match self.transport.round_trip(&request)? {
            Reply::Payload(bytes) if bytes.len() < PAYLOAD_OFFSET => {
                warn!(
                    %family,
                    reply_len = bytes.len(),
                    "HSM reply too short to carry a payload"
                );
                Ok(None)
            }
            Reply::Payload(bytes) => {
                let payload = extract_payload(&bytes)?;
                info!(%family, payload_len = payload.len(), "HSM command completed");
                Ok(Some(payload.to_vec()))
            }
            Reply::Empty => {
                warn!(%family, "HSM closed the connection without replying");
                Ok(None)
            }
            Reply::ConnectionClosed => Err(HsmError::ConnectionClosed),
        }
    }

    fn legacy_call(&self, ciphertext_hex: &str) -> HsmResult<Option<Vec<u8>>> {
        let legacy = self
            .legacy
            .as_ref()
            .ok_or_else(|| HsmError::configuration("legacy translation is not configured"))?;
        let frame =
            CommandFrame::legacy_translate(&legacy.profile, &legacy.key_under_lmk, ciphertext_hex)?;
        let request = frame.to_bytes();
        debug!(family = %frame.family(), request_len = request.len(), "Sending HSM command");

        match self.transport.round_trip(&request)? {
            Reply::Payload(bytes) => {
                info!(reply_len = bytes.len(), "M2 translation answered");
                Ok(Some(bytes.to_vec()))
            }
            Reply::Empty => {
                warn!("HSM closed the connection without replying");
                Ok(None)
            }
            Reply::ConnectionClosed => Err(HsmError::ConnectionClosed),
        }
    }
}
