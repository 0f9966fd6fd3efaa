use lode_types::{Address, CiphertextHandle};

/// Domain-separated BLAKE3 content hasher.
///
/// Each hasher carries a domain tag (e.g. `"lode-state-v1"`) that is
/// prepended to every hash computation, so identical bytes hashed under
/// different domains never collide.
pub struct ContentHasher {
    domain: &'static str,
}

impl ContentHasher {
    /// Hasher for decryption-request state digests.
    pub const STATE: Self = Self {
        domain: "lode-state-v1",
    };
    /// Hasher for ledger events.
    pub const EVENT: Self = Self {
        domain: "lode-event-v1",
    };
    /// Hasher for proof messages.
    pub const PROOF: Self = Self {
        domain: "lode-proof-v1",
    };

    /// Create a hasher with a custom domain tag.
    pub const fn new(domain: &'static str) -> Self {
        Self { domain }
    }

    /// Hash raw bytes with domain separation.
    pub fn hash(&self, data: &[u8]) -> [u8; 32] {
        let mut hasher = blake3::Hasher::new();
        hasher.update(self.domain.as_bytes());
        hasher.update(b":");
        hasher.update(data);
        *hasher.finalize().as_bytes()
    }

    /// Hash a serializable value as JSON with domain separation.
    pub fn hash_json<T: serde::Serialize>(&self, value: &T) -> Result<[u8; 32], HasherError> {
        let data =
            serde_json::to_vec(value).map_err(|e| HasherError::Serialization(e.to_string()))?;
        Ok(self.hash(&data))
    }

    /// Verify that data produces the expected digest.
    pub fn verify(&self, data: &[u8], expected: &[u8; 32]) -> bool {
        self.hash(data) == *expected
    }

    /// Raw BLAKE3 hash without domain separation (for low-level use).
    pub fn raw_hash(data: &[u8]) -> [u8; 32] {
        *blake3::hash(data).as_bytes()
    }

    /// The domain tag used by this hasher.
    pub fn domain(&self) -> &str {
        self.domain
    }
}

/// Digest over the ciphertext handles of a player entry plus the
/// ledger's own address.
///
/// Stored when a decryption request is made and recomputed when the
/// callback arrives; a mismatch means the underlying ciphertexts changed
/// between request and callback and the callback must be rejected.
pub fn state_digest(handles: &[CiphertextHandle], ledger: &Address) -> [u8; 32] {
    let mut hasher = blake3::Hasher::new();
    hasher.update(ContentHasher::STATE.domain().as_bytes());
    hasher.update(b":");
    for handle in handles {
        hasher.update(handle.as_bytes());
    }
    hasher.update(ledger.as_bytes());
    *hasher.finalize().as_bytes()
}

/// Errors from hashing operations.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum HasherError {
    #[error("serialization error: {0}")]
    Serialization(String),
}
