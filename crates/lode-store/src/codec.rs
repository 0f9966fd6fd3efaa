use tracing::warn;

use lode_types::SiteRecord;

use crate::error::{StoreError, StoreResult};
use crate::traits::RecordStore;

/// Encode a record as a JSON blob for storage.
pub fn encode_record(record: &SiteRecord) -> StoreResult<Vec<u8>> {
    serde_json::to_vec(record).map_err(|e| StoreError::Serialization(e.to_string()))
}

/// Decode a record from a stored blob.
pub fn decode_record(key: &str, blob: &[u8]) -> StoreResult<SiteRecord> {
    if blob.is_empty() {
        return Err(StoreError::EmptyBlob(key.to_string()));
    }
    serde_json::from_slice(blob).map_err(|e| StoreError::Serialization(e.to_string()))
}

/// Load every indexed record from the store.
///
/// Missing, empty, and malformed blobs are logged and skipped — the
/// listing degrades to fewer rows rather than failing. Only index/backend
/// errors propagate.
pub fn load_records(store: &dyn RecordStore) -> StoreResult<Vec<SiteRecord>> {
    let keys = store.list_keys()?;
    let mut records = Vec::with_capacity(keys.len());
    for key in keys {
        let Some(blob) = store.get(&key)? else {
            warn!(key = %key, "indexed key has no blob, skipping");
            continue;
        };
        match decode_record(&key, &blob) {
            Ok(record) => records.push(record),
            Err(err) => {
                warn!(key = %key, error = %err, "skipping undecodable record blob");
            }
        }
    }
    Ok(records)
}
