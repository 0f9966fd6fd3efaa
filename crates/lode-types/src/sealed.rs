use std::fmt;

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use serde::{Deserialize, Serialize};

use crate::error::TypeError;

/// Prefix marking a sealed scalar. Anything without it is rejected.
const SEALED_PREFIX: &str = "sealed:";

/// The front end's placeholder sealing: `sealed:` + base64 of the
/// decimal value.
///
/// This is deliberately NOT encryption. It is a visibly-marked encoding
/// that stands in for a real ciphertext in the record store, so the
/// display path can be exercised without the compute service. Real
/// confidentiality only exists behind [`crate::CiphertextHandle`]s.
#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SealedScalar(String);

impl SealedScalar {
    /// Seal a value with the placeholder encoding.
    pub fn seal(value: u32) -> Self {
        Self(format!(
            "{SEALED_PREFIX}{}",
            BASE64.encode(value.to_string())
        ))
    }

    /// Recover the value from the placeholder encoding.
    pub fn unseal(&self) -> Result<u32, TypeError> {
        let encoded = self
            .0
            .strip_prefix(SEALED_PREFIX)
            .ok_or_else(|| TypeError::InvalidSealed("missing sealed: prefix".into()))?;
        let bytes = BASE64
            .decode(encoded)
            .map_err(|e| TypeError::InvalidSealed(e.to_string()))?;
        let text = String::from_utf8(bytes)
            .map_err(|e| TypeError::InvalidSealed(e.to_string()))?;
        text.parse::<u32>()
            .map_err(|e| TypeError::InvalidSealed(e.to_string()))
    }

    /// Returns `true` if the string carries the sealed prefix.
    pub fn is_sealed(&self) -> bool {
        self.0.starts_with(SEALED_PREFIX)
    }

    /// Wrap an existing opaque string (e.g. read back from a blob).
    pub fn from_opaque(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    /// The opaque string form as stored in record blobs.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for SealedScalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SealedScalar({})", self.0)
    }
}

impl fmt::Display for SealedScalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
