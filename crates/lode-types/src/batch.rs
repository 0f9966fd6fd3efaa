use std::fmt;

use serde::{Deserialize, Serialize};

/// Identifier for a submission batch.
///
/// Batches are numbered from 1; the owner opens a new batch by
/// incrementing the counter. Batch 0 means "no batch has been opened".
#[derive(
    Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct BatchId(u64);

impl BatchId {
    /// The zero batch: no batch has been opened yet.
    pub const fn none() -> Self {
        Self(0)
    }

    /// Create a batch id from a raw counter value.
    pub const fn from_raw(value: u64) -> Self {
        Self(value)
    }

    /// The next batch id in sequence.
    pub const fn next(self) -> Self {
        Self(self.0 + 1)
    }

    /// Returns `true` if this is the "no batch yet" sentinel.
    pub const fn is_none(self) -> bool {
        self.0 == 0
    }

    /// The raw counter value.
    pub const fn value(self) -> u64 {
        self.0
    }
}

impl fmt::Debug for BatchId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "BatchId({})", self.0)
    }
}

impl fmt::Display for BatchId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "batch#{}", self.0)
    }
}
