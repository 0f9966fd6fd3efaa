use std::fmt;
use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};

/// Wall-clock timestamp in milliseconds since the UNIX epoch.
///
/// The ledger's execution model is single-writer and serialized, so a
/// plain wall-clock value is enough for cooldown bookkeeping and record
/// creation times — no causal-ordering machinery is needed here.
#[derive(
    Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct Timestamp {
    /// Milliseconds since UNIX epoch.
    pub millis: u64,
}

impl Timestamp {
    /// Create a timestamp from an explicit millisecond value.
    pub const fn from_millis(millis: u64) -> Self {
        Self { millis }
    }

    /// The current wall-clock time.
    pub fn now() -> Self {
        let millis = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_millis() as u64;
        Self { millis }
    }

    /// The zero timestamp (epoch).
    pub const fn zero() -> Self {
        Self { millis: 0 }
    }

    /// Milliseconds elapsed from `earlier` to `self`, saturating at zero.
    pub fn millis_since(&self, earlier: Timestamp) -> u64 {
        self.millis.saturating_sub(earlier.millis)
    }
}

impl fmt::Debug for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Timestamp({}ms)", self.millis)
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}ms", self.millis)
    }
}
