//! The key-slot reference every key command carries.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{HsmError, HsmResult};

/// Derived Protection Key reference: an opaque identifier of a key slot
/// inside the HSM.
///
/// The value is never parsed, only placed verbatim into command frames.
/// There is no default; it must come from the caller or from configuration.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Dpk(String);

impl Dpk {
    /// Wrap a DPK value, rejecting an empty one.
    pub fn new(value: impl Into<String>) -> HsmResult<Self> {
        let value = value.into();
        if value.trim().is_empty() {
            return Err(HsmError::invalid_argument("DPK must not be empty"));
        }
        Ok(Self(value))
    }

    /// The value as placed in frames.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for Dpk {
    type Error = HsmError;

    fn try_from(value: String) -> HsmResult<Self> {
        Self::new(value)
    }
}

impl From<Dpk> for String {
    fn from(dpk: Dpk) -> Self {
        dpk.0
    }
}

impl fmt::Debug for Dpk {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Dpk([REDACTED])")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_empty() {
        assert!(Dpk::new("").is_err());
        assert!(Dpk::new("   ").is_err());
        assert_eq!(Dpk::new("S1009621AN00S0001").unwrap().as_str(), "S1009621AN00S0001");
    }

    #[test]
    fn test_debug_is_redacted() {
        let dpk = Dpk::new("S1009621AN00S0001").unwrap();
        assert_eq!(format!("{dpk:?}"), "Dpk([REDACTED])");
    }
}
