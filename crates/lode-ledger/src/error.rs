use lode_compute::ComputeError;
use lode_types::RequestId;

/// Discrete failure conditions for ledger calls.
///
/// Every error aborts the call atomically — no partial state change.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum LedgerError {
    /// Caller is not the ledger owner.
    #[error("caller is not the owner")]
    NotOwner,

    /// Caller is not on the provider allow-list.
    #[error("caller is not an allow-listed provider")]
    NotProvider,

    /// The global pause flag is set.
    #[error("ledger is paused")]
    Paused,

    /// The caller acted within the cooldown window.
    #[error("cooldown active: {remaining_ms}ms remaining")]
    CooldownActive { remaining_ms: u64 },

    /// A malformed or inapplicable argument.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// No batch is currently open for submissions.
    #[error("batch is not open")]
    BatchNotOpen,

    /// Callback for a request id the ledger never issued a context for.
    #[error("unknown decryption request: {0}")]
    UnknownRequest(RequestId),

    /// Callback for a context that was already consumed.
    #[error("replay attempt: request already processed")]
    ReplayAttempt,

    /// The stored handles changed between request and callback.
    #[error("state mismatch: stored ciphertexts changed since request")]
    StateMismatch,

    /// The decryption proof failed the signature check.
    #[error("invalid decryption proof")]
    InvalidProof,

    /// The compute service rejected a request.
    #[error("compute service error: {0}")]
    Compute(#[from] ComputeError),

    /// Interior lock poisoned.
    #[error("ledger lock poisoned")]
    LockPoisoned,
}

/// Result alias for ledger calls.
pub type LedgerResult<T> = Result<T, LedgerError>;
