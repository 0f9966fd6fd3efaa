use crate::error::StoreResult;

/// Keyed blob store with a side index of record keys.
///
/// All implementations must satisfy these invariants:
/// - `put` is last-write-wins: writing an existing key replaces the blob
///   but does not duplicate the key in the index.
/// - The index preserves first-write order, so listings are stable.
/// - The store never interprets blob contents — it is a pure key-value
///   store. Decoding belongs to the codec layer.
/// - No pagination and no conflict resolution beyond what the backing
///   ledger already provides to any blob store.
pub trait RecordStore: Send + Sync {
    /// All record keys, in first-write order.
    fn list_keys(&self) -> StoreResult<Vec<String>>;

    /// Fetch a blob by key. Returns `Ok(None)` if the key was never written.
    fn get(&self, key: &str) -> StoreResult<Option<Vec<u8>>>;

    /// Write a blob under a key, replacing any previous blob.
    fn put(&self, key: &str, blob: &[u8]) -> StoreResult<()>;

    /// Check whether a key exists in the store.
    fn exists(&self, key: &str) -> StoreResult<bool>;
}
