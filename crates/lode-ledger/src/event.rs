use serde::{Deserialize, Serialize};

use lode_crypto::ContentHasher;
use lode_types::{Address, BatchId, RequestId, Timestamp};

/// Unique identifier for a ledger event: the BLAKE3 hash of the event
/// content, making events content-addressable.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EventId {
    pub hash: [u8; 32],
}

impl EventId {
    /// Create an `EventId` from a raw hash.
    pub fn from_hash(hash: [u8; 32]) -> Self {
        Self { hash }
    }

    /// Short hex representation (first 8 hex chars).
    pub fn short_hex(&self) -> String {
        hex::encode(&self.hash[..4])
    }

    /// Full hex representation.
    pub fn to_hex(&self) -> String {
        hex::encode(self.hash)
    }
}

impl std::fmt::Display for EventId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "evt:{}", self.short_hex())
    }
}

/// Classification of ledger events.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EventKind {
    /// A new batch has been opened.
    BatchOpened,
    /// The current batch has been closed.
    BatchClosed,
    /// The global pause flag was set.
    Paused,
    /// The global pause flag was cleared.
    Resumed,
    /// An address was added to the provider allow-list.
    ProviderAdded,
    /// An address was removed from the provider allow-list.
    ProviderRemoved,
    /// A player's encrypted pair was stored or overwritten.
    PairSubmitted,
    /// Decryption of a player's pair was requested.
    DecryptionRequested,
    /// A decryption callback settled and the cleartext pair was emitted.
    PairRevealed,
}

impl std::fmt::Display for EventKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::BatchOpened => "BatchOpened",
            Self::BatchClosed => "BatchClosed",
            Self::Paused => "Paused",
            Self::Resumed => "Resumed",
            Self::ProviderAdded => "ProviderAdded",
            Self::ProviderRemoved => "ProviderRemoved",
            Self::PairSubmitted => "PairSubmitted",
            Self::DecryptionRequested => "DecryptionRequested",
            Self::PairRevealed => "PairRevealed",
        };
        write!(f, "{s}")
    }
}

/// Payload data carried by a ledger event.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum EventPayload {
    /// Empty payload (event kind is self-describing).
    Empty,
    /// Batch lifecycle payload.
    Batch { batch: BatchId },
    /// Provider allow-list payload.
    Provider { provider: Address },
    /// Submission payload.
    Submission {
        batch: BatchId,
        player: Address,
        provider: Address,
    },
    /// Decryption request payload.
    Request {
        request: RequestId,
        batch: BatchId,
        player: Address,
    },
    /// Revealed cleartext pair.
    Reveal {
        request: RequestId,
        batch: BatchId,
        player: Address,
        first: u32,
        second: u32,
    },
}

/// A single event recorded by the ledger.
///
/// Carries a content-addressed ID, the ledger time at which it was
/// emitted, a classification kind, a payload, and a BLAKE3 integrity
/// hash computed over the serialized (kind, payload, timestamp).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerEvent {
    /// Unique event identifier (content-addressed).
    pub id: EventId,
    /// Ledger time when the event was emitted.
    pub timestamp: Timestamp,
    /// Classification of this event.
    pub kind: EventKind,
    /// Event-specific payload data.
    pub payload: EventPayload,
    /// BLAKE3 integrity hash over (kind, payload, timestamp).
    pub integrity_hash: [u8; 32],
}

impl LedgerEvent {
    /// Build a new event, computing its integrity hash and ID.
    pub fn new(timestamp: Timestamp, kind: EventKind, payload: EventPayload) -> Self {
        let integrity_hash = Self::compute_integrity(&timestamp, &kind, &payload);
        Self {
            id: EventId::from_hash(integrity_hash),
            timestamp,
            kind,
            payload,
            integrity_hash,
        }
    }

    /// Verify the event's integrity hash matches its content.
    pub fn verify_integrity(&self) -> bool {
        let expected = Self::compute_integrity(&self.timestamp, &self.kind, &self.payload);
        self.integrity_hash == expected
    }

    fn compute_integrity(
        timestamp: &Timestamp,
        kind: &EventKind,
        payload: &EventPayload,
    ) -> [u8; 32] {
        let mut data = Vec::new();
        data.extend_from_slice(&timestamp.millis.to_le_bytes());

        if let Ok(kind_bytes) = bincode::serialize(kind) {
            data.extend_from_slice(&kind_bytes);
        }
        if let Ok(payload_bytes) = bincode::serialize(payload) {
            data.extend_from_slice(&payload_bytes);
        }

        ContentHasher::EVENT.hash(&data)
    }
}
