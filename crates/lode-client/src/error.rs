use thiserror::Error;

/// Errors surfaced by the front-end flows.
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("store error: {0}")]
    Store(#[from] lode_store::StoreError),

    #[error("ledger error: {0}")]
    Ledger(#[from] lode_ledger::LedgerError),

    #[error("compute error: {0}")]
    Compute(#[from] lode_compute::ComputeError),
}

pub type ClientResult<T> = Result<T, ClientError>;
