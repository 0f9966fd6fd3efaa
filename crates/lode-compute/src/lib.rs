//! Decryption oracle interface for the Lode ledger.
//!
//! The confidential-compute runtime that actually performs encrypted
//! arithmetic and threshold decryption is an external collaborator. The
//! ledger reaches it through exactly two calls — submit a list of
//! ciphertext handles for decryption, and verify the proof attached to
//! the asynchronous callback — captured here as the [`DecryptionOracle`]
//! trait. [`MockComputeService`] is the in-process stand-in used by tests
//! and demos.

pub mod error;
pub mod mock;
pub mod oracle;
pub mod proof;

pub use error::{ComputeError, ComputeResult};
pub use mock::MockComputeService;
pub use oracle::DecryptionOracle;
pub use proof::DecryptionProof;
