/// Configuration for a [`crate::BatchLedger`].
#[derive(Clone, Debug)]
pub struct LedgerConfig {
    /// Minimum milliseconds between gated calls from the same sender.
    pub cooldown_ms: u64,
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            cooldown_ms: 30_000,
        }
    }
}

impl LedgerConfig {
    /// A config with no cooldown, for tests that exercise other guards.
    pub fn without_cooldown() -> Self {
        Self { cooldown_ms: 0 }
    }
}
