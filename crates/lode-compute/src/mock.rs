use std::collections::HashMap;
use std::sync::RwLock;

use tracing::debug;

use lode_crypto::{SigningKey, VerifyingKey};
use lode_types::{CiphertextHandle, RequestId};

use crate::error::{ComputeError, ComputeResult};
use crate::oracle::DecryptionOracle;
use crate::proof::{proof_message, DecryptionProof};

/// In-process compute service for tests and demos.
///
/// Stores plaintext values keyed by the handle of a fake ciphertext
/// (value bytes plus a random nonce, so equal values still get distinct
/// handles), tracks pending decryption requests, and fulfills them on
/// demand with little-endian cleartext and a signed proof.
///
/// Fulfilled requests are kept around: the real service may deliver a
/// callback more than once, and the ledger's replay guard is what must
/// reject the duplicate.
pub struct MockComputeService {
    key: SigningKey,
    inner: RwLock<MockState>,
}

#[derive(Default)]
struct MockState {
    values: HashMap<CiphertextHandle, u32>,
    pending: HashMap<RequestId, Vec<CiphertextHandle>>,
}

impl MockComputeService {
    /// Create a service with a fresh signing key.
    pub fn new() -> Self {
        Self {
            key: SigningKey::generate(),
            inner: RwLock::new(MockState::default()),
        }
    }

    /// The service's public key (proofs verify against this).
    pub fn verifying_key(&self) -> VerifyingKey {
        self.key.verifying_key()
    }

    /// Produce the callback payload for a pending request: the
    /// little-endian cleartext for every handle in submission order,
    /// plus a proof signed by the service.
    pub fn fulfill(&self, request: &RequestId) -> ComputeResult<(Vec<u8>, DecryptionProof)> {
        let state = self.inner.read().map_err(|_| ComputeError::LockPoisoned)?;
        let handles = state
            .pending
            .get(request)
            .ok_or(ComputeError::UnknownRequest(*request))?;

        let mut cleartext = Vec::with_capacity(handles.len() * 4);
        for handle in handles {
            let value = state
                .values
                .get(handle)
                .ok_or(ComputeError::UnknownHandle(*handle))?;
            cleartext.extend_from_slice(&value.to_le_bytes());
        }

        let signature = self.key.sign(&proof_message(request, &cleartext));
        debug!(request = %request.short_id(), bytes = cleartext.len(), "fulfilled decryption request");
        Ok((cleartext, DecryptionProof { signature }))
    }

    /// Sign an arbitrary (cleartext, request) pair. Test helper for
    /// building proofs over tampered payloads.
    pub fn sign_payload(&self, request: &RequestId, cleartext: &[u8]) -> DecryptionProof {
        DecryptionProof {
            signature: self.key.sign(&proof_message(request, cleartext)),
        }
    }

    /// Number of requests ever submitted.
    pub fn request_count(&self) -> usize {
        self.inner.read().expect("lock poisoned").pending.len()
    }
}

impl Default for MockComputeService {
    fn default() -> Self {
        Self::new()
    }
}

impl DecryptionOracle for MockComputeService {
    fn encrypt(&self, value: u32) -> ComputeResult<CiphertextHandle> {
        let mut nonce = [0u8; 16];
        rand::Rng::fill(&mut rand::thread_rng(), &mut nonce);

        let mut ciphertext = Vec::with_capacity(4 + nonce.len());
        ciphertext.extend_from_slice(&value.to_le_bytes());
        ciphertext.extend_from_slice(&nonce);
        let handle = CiphertextHandle::from_ciphertext(&ciphertext);

        let mut state = self.inner.write().map_err(|_| ComputeError::LockPoisoned)?;
        state.values.insert(handle, value);
        Ok(handle)
    }

    fn request_decryption(&self, handles: &[CiphertextHandle]) -> ComputeResult<RequestId> {
        let mut state = self.inner.write().map_err(|_| ComputeError::LockPoisoned)?;
        for handle in handles {
            if !state.values.contains_key(handle) {
                return Err(ComputeError::UnknownHandle(*handle));
            }
        }
        let request = RequestId::new();
        state.pending.insert(request, handles.to_vec());
        debug!(request = %request.short_id(), handles = handles.len(), "queued decryption request");
        Ok(request)
    }

    fn verify_proof(
        &self,
        request: &RequestId,
        cleartext: &[u8],
        proof: &DecryptionProof,
    ) -> ComputeResult<()> {
        self.key
            .verifying_key()
            .verify(&proof_message(request, cleartext), &proof.signature)
            .map_err(|_| ComputeError::InvalidProof)
    }
}

impl std::fmt::Debug for MockComputeService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MockComputeService")
            .field("request_count", &self.request_count())
            .finish()
    }
}
