//! Foundation types for the Lode ledger.
//!
//! This crate provides the identity, temporal, and record types used
//! throughout the Lode workspace. Every other Lode crate depends on
//! `lode-types`.
//!
//! # Key Types
//!
//! - [`Address`] — Persistent identity derived from key material
//! - [`BatchId`] — Incrementing identifier for submission windows
//! - [`RequestId`] — UUID v7 decryption request identifier
//! - [`CiphertextHandle`] — Opaque reference to an encrypted value
//! - [`Timestamp`] — Wall-clock milliseconds for cooldown bookkeeping
//! - [`SealedScalar`] — The placeholder front-end sealing (NOT encryption)
//! - [`SiteRecord`] — A resource site record stored as an opaque blob

pub mod batch;
pub mod error;
pub mod handle;
pub mod identity;
pub mod record;
pub mod request;
pub mod sealed;
pub mod temporal;

pub use batch::BatchId;
pub use error::TypeError;
pub use handle::CiphertextHandle;
pub use identity::{Address, IdentityMaterial};
pub use record::{Category, SiteRecord, SiteStatus};
pub use request::RequestId;
pub use sealed::SealedScalar;
pub use temporal::Timestamp;
