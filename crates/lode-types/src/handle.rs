use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::TypeError;

/// Opaque reference to an encrypted value held by the compute service.
///
/// A `CiphertextHandle` is the BLAKE3 hash of the ciphertext bytes the
/// service stored. The ledger never sees plaintext — it only passes
/// handles around and mixes them into state digests.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CiphertextHandle([u8; 32]);

impl CiphertextHandle {
    /// Compute a handle from ciphertext bytes.
    pub fn from_ciphertext(data: &[u8]) -> Self {
        let mut hasher = blake3::Hasher::new();
        hasher.update(b"lode-handle-v1:");
        hasher.update(data);
        Self(*hasher.finalize().as_bytes())
    }

    /// Create a handle from a pre-computed hash.
    pub fn from_hash(hash: [u8; 32]) -> Self {
        Self(hash)
    }

    /// The null handle (all zeros). Represents "no value".
    pub const fn null() -> Self {
        Self([0u8; 32])
    }

    /// Returns `true` if this is the null handle.
    pub fn is_null(&self) -> bool {
        self.0 == [0u8; 32]
    }

    /// The raw 32-byte hash.
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Hex-encoded string representation.
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    /// Short hex representation (first 8 characters).
    pub fn short_hex(&self) -> String {
        hex::encode(&self.0[..4])
    }

    /// Parse from a hex string.
    pub fn from_hex(s: &str) -> Result<Self, TypeError> {
        let bytes = hex::decode(s).map_err(|e| TypeError::InvalidHex(e.to_string()))?;
        if bytes.len() != 32 {
            return Err(TypeError::InvalidLength {
                expected: 32,
                actual: bytes.len(),
            });
        }
        let mut arr = [0u8; 32];
        arr.copy_from_slice(&bytes);
        Ok(Self(arr))
    }
}

impl fmt::Debug for CiphertextHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "CiphertextHandle({})", self.short_hex())
    }
}

impl fmt::Display for CiphertextHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}
