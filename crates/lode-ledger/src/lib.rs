//! The Lode batch ledger.
//!
//! A single contract-style state machine: per-batch, per-player storage
//! of two encrypted-value handles behind a set of guard conditions
//! (owner, provider allow-list, pause flag, per-sender cooldown,
//! batch-open flag), plus the decryption-request/callback protocol.
//!
//! The execution model mirrors a ledger contract: every call is atomic
//! and serialized, and a failed guard aborts the call with no partial
//! state change. The one cross-call ordering concern is the
//! request/callback pair, which is guarded by a stored state digest and
//! a processed flag — there is deliberately no timeout path, so a
//! request whose callback never arrives stays unprocessed forever.

pub mod clock;
pub mod config;
pub mod error;
pub mod event;
pub mod ledger;

pub use clock::{Clock, ManualClock, SystemClock};
pub use config::LedgerConfig;
pub use error::{LedgerError, LedgerResult};
pub use event::{EventId, EventKind, EventPayload, LedgerEvent};
pub use ledger::{BatchLedger, DecryptionContext, PairEntry};
