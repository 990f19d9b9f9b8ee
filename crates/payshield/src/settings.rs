//! Client configuration.
//!
//! Values come from an optional file (TOML, YAML or JSON, picked by
//! extension) overlaid by `PAYSHIELD_*` environment variables, with `__`
//! separating nested keys:
//!
//! ```text
//! PAYSHIELD_HOST=10.0.0.12
//! PAYSHIELD_PORT=1500
//! PAYSHIELD_DPK=S1009621AN00S0001
//! PAYSHIELD_LEGACY__KEY_UNDER_LMK=...
//! ```
//!
//! Explicit overrides (for example from command-line flags) win over both.

use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;

use config::{Config, Environment, File, FileFormat, Value};
use payshield_tcp::{DEFAULT_READ_BUFFER_SIZE, DEFAULT_TIMEOUT, Endpoint, EndpointBuilder};
use payshield_wire::LegacyTranslateProfile;
use serde::{Deserialize, Serialize};

use crate::dpk::Dpk;
use crate::error::{HsmError, HsmResult};

/// Default environment variable prefix.
pub const ENV_PREFIX: &str = "PAYSHIELD";

/// Everything needed to build an [`HsmClient`](crate::HsmClient).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HsmConfig {
    /// HSM host name or address
    pub host: String,

    /// HSM port; kept wide so out-of-range values are reported, not truncated
    pub port: i64,

    /// Per-call connect/read/write timeout in milliseconds
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,

    /// Upper bound on the single read of each reply
    #[serde(default = "default_read_buffer_size")]
    pub read_buffer_size: usize,

    /// Key-slot reference placed in key encrypt/decrypt frames
    pub dpk: Dpk,

    /// Settings for `M2` key translation, if used
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub legacy: Option<LegacyConfig>,
}

/// Settings for the legacy `M2` key-translation command.
#[derive(Clone, PartialEq, Serialize, Deserialize)]
pub struct LegacyConfig {
    /// Encrypted key the device uses, as held under its LMK
    pub key_under_lmk: String,

    /// Key block header
    #[serde(default = "default_key_header")]
    pub key_header: String,

    /// LMK identifier suffix
    #[serde(default = "default_lmk_id")]
    pub lmk_id: String,
}

impl fmt::Debug for LegacyConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LegacyConfig")
            .field("key_under_lmk", &"[REDACTED]")
            .field("key_header", &self.key_header)
            .field("lmk_id", &self.lmk_id)
            .finish()
    }
}

impl LegacyConfig {
    /// Frame constants for this configuration.
    pub fn profile(&self) -> LegacyTranslateProfile {
        LegacyTranslateProfile::new(self.key_header.clone(), self.lmk_id.clone())
    }
}

fn default_timeout_ms() -> u64 {
    DEFAULT_TIMEOUT.as_millis() as u64
}

fn default_read_buffer_size() -> usize {
    DEFAULT_READ_BUFFER_SIZE
}

fn default_key_header() -> String {
    LegacyTranslateProfile::DEFAULT_KEY_HEADER.to_string()
}

fn default_lmk_id() -> String {
    LegacyTranslateProfile::DEFAULT_LMK_ID.to_string()
}

impl HsmConfig {
    /// Configuration for `host:port` with default timeout and buffer size.
    pub fn new(host: impl Into<String>, port: i64, dpk: Dpk) -> Self {
        Self {
            host: host.into(),
            port,
            timeout_ms: default_timeout_ms(),
            read_buffer_size: default_read_buffer_size(),
            dpk,
            legacy: None,
        }
    }

    /// Load from `path` (if given) and the process environment.
    ///
    /// # Errors
    ///
    /// Returns [`HsmError::Configuration`] if the file is missing or
    /// unreadable, a required value is absent, or validation fails.
    pub fn load(path: Option<&Path>) -> HsmResult<Self> {
        let mut loader = ConfigLoader::new();
        if let Some(path) = path {
            loader = loader.file(path);
        }
        loader.load()
    }

    /// Check every value an [`Endpoint`] and the frames depend on.
    pub fn validate(&self) -> HsmResult<()> {
        if self.host.trim().is_empty() {
            return Err(HsmError::invalid_argument("host must not be empty"));
        }
        if !(0..=i64::from(u16::MAX)).contains(&self.port) {
            return Err(HsmError::invalid_argument(format!(
                "port {} is outside 0..=65535",
                self.port
            )));
        }
        if self.timeout_ms == 0 {
            return Err(HsmError::configuration("timeout_ms must be greater than zero"));
        }
        if self.read_buffer_size == 0 {
            return Err(HsmError::configuration(
                "read_buffer_size must be greater than zero",
            ));
        }
        if let Some(legacy) = &self.legacy {
            if legacy.key_under_lmk.trim().is_empty() {
                return Err(HsmError::configuration(
                    "legacy.key_under_lmk must not be empty",
                ));
            }
            if legacy.key_header.trim().is_empty() {
                return Err(HsmError::configuration(
                    "legacy.key_header must not be empty",
                ));
            }
        }
        Ok(())
    }

    /// Per-call timeout.
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// Build the validated [`Endpoint`].
    pub fn endpoint(&self) -> HsmResult<Endpoint> {
        self.validate()?;
        Ok(EndpointBuilder::new(self.host.clone(), self.port)
            .timeout(self.timeout())
            .read_buffer_size(self.read_buffer_size)
            .build()?)
    }
}

/// Layered configuration builder: file, then environment, then overrides.
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    file: Option<PathBuf>,
    env_prefix: String,
    env_source: Option<HashMap<String, String>>,
    overrides: Vec<(String, Value)>,
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigLoader {
    /// Loader reading the process environment under [`ENV_PREFIX`].
    pub fn new() -> Self {
        Self {
            file: None,
            env_prefix: ENV_PREFIX.to_string(),
            env_source: None,
            overrides: Vec::new(),
        }
    }

    /// Read this file first.
    pub fn file(mut self, path: impl Into<PathBuf>) -> Self {
        self.file = Some(path.into());
        self
    }

    /// Use a different environment variable prefix.
    pub fn env_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.env_prefix = prefix.into();
        self
    }

    /// Read variables from `vars` instead of the process environment.
    pub fn env_source(mut self, vars: HashMap<String, String>) -> Self {
        self.env_source = Some(vars);
        self
    }

    /// Force `key` to `value`, above file and environment.
    pub fn set(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.overrides.push((key.into(), value.into()));
        self
    }

    /// Merge every layer, deserialize and validate.
    ///
    /// # Errors
    ///
    /// Returns [`HsmError::Configuration`] if a layer cannot be read or
    /// required values are missing, and whatever [`HsmConfig::validate`]
    /// reports.
    pub fn load(self) -> HsmResult<HsmConfig> {
        let mut builder = Config::builder();

        if let Some(path) = &self.file {
            builder = builder.add_source(File::new(path_str(path)?, file_format(path)?));
        }

        // No type guessing: DPKs and keys may be all digits.
        builder = builder.add_source(
            Environment::with_prefix(&self.env_prefix)
                .prefix_separator("_")
                .separator("__")
                .source(self.env_source),
        );

        for (key, value) in self.overrides {
            builder = builder.set_override(key, value)?;
        }

        let config: HsmConfig = builder.build()?.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }
}

fn path_str(path: &Path) -> HsmResult<&str> {
    if !path.exists() {
        return Err(HsmError::configuration(format!(
            "configuration file not found: {}",
            path.display()
        )));
    }
    path.to_str().ok_or_else(|| {
        HsmError::configuration(format!("path is not valid UTF-8: {}", path.display()))
    })
}

fn file_format(path: &Path) -> HsmResult<FileFormat> {
    match path.extension().and_then(|ext| ext.to_str()) {
        Some("toml") => Ok(FileFormat::Toml),
        Some("yaml" | "yml") => Ok(FileFormat::Yaml),
        Some("json") => Ok(FileFormat::Json),
        _ => Err(HsmError::configuration(format!(
            "unsupported configuration format: {}",
            path.display()
        ))),
    }
}
