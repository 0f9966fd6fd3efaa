//! Record storage for the Lode ledger.
//!
//! A [`RecordStore`] is a persistent mapping from string keys to opaque
//! byte blobs, plus a side index listing every key ever written. The
//! front end uses it to list and create resource site records.
//!
//! Blob contents are JSON-encoded [`lode_types::SiteRecord`]s; the codec
//! lives in [`codec`]. Reading tolerates damage: empty or malformed blobs
//! are logged and skipped, never surfaced as a typed failure.

pub mod codec;
pub mod error;
pub mod memory;
pub mod traits;

pub use codec::{decode_record, encode_record, load_records};
pub use error::{StoreError, StoreResult};
pub use memory::InMemoryRecordStore;
pub use traits::RecordStore;
