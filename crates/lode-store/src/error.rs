/// Errors from record store operations.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Serialization or deserialization failure.
    #[error("serialization error: {0}")]
    Serialization(String),

    /// A blob was present but empty.
    #[error("empty blob for key {0}")]
    EmptyBlob(String),

    /// The store's interior lock was poisoned.
    #[error("store lock poisoned")]
    LockPoisoned,

    /// I/O error from the underlying backend.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result alias for store operations.
pub type StoreResult<T> = Result<T, StoreError>;
