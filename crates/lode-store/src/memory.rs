use std::collections::HashMap;
use std::sync::RwLock;

use crate::error::{StoreError, StoreResult};
use crate::traits::RecordStore;

/// In-memory, HashMap-based record store.
///
/// Intended for tests, demos, and embedding. Blobs are held in memory
/// behind a `RwLock` for safe concurrent access and cloned on read. The
/// key index is kept separately so listings preserve first-write order.
pub struct InMemoryRecordStore {
    inner: RwLock<StoreState>,
}

#[derive(Default)]
struct StoreState {
    blobs: HashMap<String, Vec<u8>>,
    // First-write order; no duplicates.
    index: Vec<String>,
}

impl InMemoryRecordStore {
    /// Create a new empty store.
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(StoreState::default()),
        }
    }

    /// Number of records currently stored.
    pub fn len(&self) -> usize {
        self.inner.read().expect("lock poisoned").blobs.len()
    }

    /// Returns `true` if the store is empty.
    pub fn is_empty(&self) -> bool {
        self.inner.read().expect("lock poisoned").blobs.is_empty()
    }

    /// Total bytes across all stored blobs.
    pub fn total_bytes(&self) -> u64 {
        self.inner
            .read()
            .expect("lock poisoned")
            .blobs
            .values()
            .map(|b| b.len() as u64)
            .sum()
    }

    /// Remove all records from the store.
    pub fn clear(&self) {
        let mut state = self.inner.write().expect("lock poisoned");
        state.blobs.clear();
        state.index.clear();
    }
}

impl Default for InMemoryRecordStore {
    fn default() -> Self {
        Self::new()
    }
}

impl RecordStore for InMemoryRecordStore {
    fn list_keys(&self) -> StoreResult<Vec<String>> {
        let state = self.inner.read().map_err(|_| StoreError::LockPoisoned)?;
        Ok(state.index.clone())
    }

    fn get(&self, key: &str) -> StoreResult<Option<Vec<u8>>> {
        let state = self.inner.read().map_err(|_| StoreError::LockPoisoned)?;
        Ok(state.blobs.get(key).cloned())
    }

    fn put(&self, key: &str, blob: &[u8]) -> StoreResult<()> {
        let mut state = self.inner.write().map_err(|_| StoreError::LockPoisoned)?;
        if state.blobs.insert(key.to_string(), blob.to_vec()).is_none() {
            state.index.push(key.to_string());
        }
        Ok(())
    }

    fn exists(&self, key: &str) -> StoreResult<bool> {
        let state = self.inner.read().map_err(|_| StoreError::LockPoisoned)?;
        Ok(state.blobs.contains_key(key))
    }
}

impl std::fmt::Debug for InMemoryRecordStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InMemoryRecordStore")
            .field("record_count", &self.len())
            .finish()
    }
}
