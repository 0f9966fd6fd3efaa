use lode_types::{CiphertextHandle, RequestId};

use crate::error::ComputeResult;
use crate::proof::DecryptionProof;

/// The opaque external confidential-compute service.
///
/// All implementations must satisfy these invariants:
/// - `encrypt` never returns the same handle for different stored values
///   (handles are content-derived from the ciphertext).
/// - `request_decryption` assigns a fresh request id per call, even for
///   identical handle lists.
/// - `verify_proof` is a pure check: it never mutates service state, so
///   the ledger may call it on every callback including replays.
pub trait DecryptionOracle: Send + Sync {
    /// Encrypt a value and return the opaque handle to its ciphertext.
    fn encrypt(&self, value: u32) -> ComputeResult<CiphertextHandle>;

    /// Submit a list of ciphertext handles for threshold decryption.
    ///
    /// Returns the request id that will be echoed in the asynchronous
    /// callback. The callback itself arrives out of band, after an
    /// arbitrary service-determined delay — or never.
    fn request_decryption(&self, handles: &[CiphertextHandle]) -> ComputeResult<RequestId>;

    /// The signature-check entry point: verify that `proof` binds
    /// `cleartext` to `request` under the service's key.
    fn verify_proof(
        &self,
        request: &RequestId,
        cleartext: &[u8],
        proof: &DecryptionProof,
    ) -> ComputeResult<()>;
}
