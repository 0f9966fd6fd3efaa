use lode_types::{CiphertextHandle, RequestId};

/// Errors from the compute service.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ComputeError {
    /// A handle was submitted that the service never issued.
    #[error("unknown ciphertext handle: {0}")]
    UnknownHandle(CiphertextHandle),

    /// A request id the service has no record of.
    #[error("unknown request: {0}")]
    UnknownRequest(RequestId),

    /// The proof did not verify against the service's key.
    #[error("invalid decryption proof")]
    InvalidProof,

    /// Interior lock poisoned.
    #[error("compute service lock poisoned")]
    LockPoisoned,
}

/// Result alias for compute operations.
pub type ComputeResult<T> = Result<T, ComputeError>;
