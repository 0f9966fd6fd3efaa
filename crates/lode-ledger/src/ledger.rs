use std::collections::{HashMap, HashSet};
use std::sync::{Arc, RwLock};

use tracing::{debug, info};

use lode_compute::DecryptionOracle;
use lode_crypto::{state_digest, ContentHasher};
use lode_types::identity::IdentityMaterial;
use lode_types::{Address, BatchId, CiphertextHandle, RequestId, Timestamp};

use crate::clock::{Clock, SystemClock};
use crate::config::LedgerConfig;
use crate::error::{LedgerError, LedgerResult};
use crate::event::{EventKind, EventPayload, LedgerEvent};

/// A player's stored encrypted pair for one batch.
///
/// At most one entry exists per (batch, player); a repeat submission
/// overwrites it (last write wins).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PairEntry {
    pub first: CiphertextHandle,
    pub second: CiphertextHandle,
    pub submitted_at: Timestamp,
}

/// Per-request context for the decryption protocol.
///
/// Created on request, mutated exactly once (`processed` = true) by the
/// callback, never deleted. The player address is captured at request
/// time so the callback does not depend on who delivers it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DecryptionContext {
    pub batch: BatchId,
    pub player: Address,
    pub digest: [u8; 32],
    pub processed: bool,
}

#[derive(Default)]
struct LedgerState {
    paused: bool,
    providers: HashSet<Address>,
    current_batch: BatchId,
    batch_open: bool,
    entries: HashMap<(BatchId, Address), PairEntry>,
    last_action: HashMap<Address, Timestamp>,
    contexts: HashMap<RequestId, DecryptionContext>,
    events: Vec<LedgerEvent>,
}

/// The batch ledger contract.
///
/// Owns per-batch, per-player encrypted pairs behind guard conditions
/// and runs the decryption-request/callback protocol against an injected
/// [`DecryptionOracle`]. Each method is one atomic "transaction": a
/// failed guard returns early with no state change.
pub struct BatchLedger {
    address: Address,
    owner: Address,
    config: LedgerConfig,
    clock: Arc<dyn Clock>,
    oracle: Arc<dyn DecryptionOracle>,
    inner: RwLock<LedgerState>,
}

impl BatchLedger {
    /// Deploy a ledger with the system clock.
    pub fn new(owner: Address, config: LedgerConfig, oracle: Arc<dyn DecryptionOracle>) -> Self {
        Self::with_clock(owner, config, oracle, Arc::new(SystemClock))
    }

    /// Deploy a ledger with an explicit clock (tests).
    pub fn with_clock(
        owner: Address,
        config: LedgerConfig,
        oracle: Arc<dyn DecryptionOracle>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        // The ledger's own address: deterministic per owner, mixed into
        // every state digest so digests from different deployments never
        // collide.
        let address = Address::derive(&IdentityMaterial::Contract {
            code_hash: ContentHasher::raw_hash(b"lode-batch-ledger-v1"),
            label: owner.to_hex(),
        });
        info!(ledger = %address, owner = %owner, "deployed batch ledger");
        Self {
            address,
            owner,
            config,
            clock,
            oracle,
            inner: RwLock::new(LedgerState::default()),
        }
    }

    /// The ledger's own address.
    pub fn address(&self) -> Address {
        self.address
    }

    /// The owner address.
    pub fn owner(&self) -> Address {
        self.owner
    }

    // -- owner operations ---------------------------------------------------

    /// Open a new batch: increments the batch id and marks it open.
    pub fn open_batch(&self, caller: Address) -> LedgerResult<BatchId> {
        self.ensure_owner(caller)?;
        let mut state = self.write()?;
        state.current_batch = state.current_batch.next();
        state.batch_open = true;
        let batch = state.current_batch;
        self.emit(&mut state, EventKind::BatchOpened, EventPayload::Batch { batch });
        info!(batch = %batch, "batch opened");
        Ok(batch)
    }

    /// Close the current batch. Submissions stop; decryption requests
    /// for stored entries remain possible.
    pub fn close_batch(&self, caller: Address) -> LedgerResult<()> {
        self.ensure_owner(caller)?;
        let mut state = self.write()?;
        if !state.batch_open {
            return Err(LedgerError::BatchNotOpen);
        }
        state.batch_open = false;
        let batch = state.current_batch;
        self.emit(&mut state, EventKind::BatchClosed, EventPayload::Batch { batch });
        info!(batch = %batch, "batch closed");
        Ok(())
    }

    /// Set the global pause flag. All gated operations fail while set.
    pub fn pause(&self, caller: Address) -> LedgerResult<()> {
        self.ensure_owner(caller)?;
        let mut state = self.write()?;
        state.paused = true;
        self.emit(&mut state, EventKind::Paused, EventPayload::Empty);
        Ok(())
    }

    /// Clear the global pause flag.
    pub fn resume(&self, caller: Address) -> LedgerResult<()> {
        self.ensure_owner(caller)?;
        let mut state = self.write()?;
        state.paused = false;
        self.emit(&mut state, EventKind::Resumed, EventPayload::Empty);
        Ok(())
    }

    /// Add an address to the provider allow-list.
    pub fn add_provider(&self, caller: Address, provider: Address) -> LedgerResult<()> {
        self.ensure_owner(caller)?;
        let mut state = self.write()?;
        if state.providers.insert(provider) {
            self.emit(
                &mut state,
                EventKind::ProviderAdded,
                EventPayload::Provider { provider },
            );
        }
        Ok(())
    }

    /// Remove an address from the provider allow-list.
    pub fn remove_provider(&self, caller: Address, provider: Address) -> LedgerResult<()> {
        self.ensure_owner(caller)?;
        let mut state = self.write()?;
        if state.providers.remove(&provider) {
            self.emit(
                &mut state,
                EventKind::ProviderRemoved,
                EventPayload::Provider { provider },
            );
        }
        Ok(())
    }

    // -- provider operations ------------------------------------------------

    /// Store (or overwrite) a player's encrypted pair in the current
    /// batch.
    ///
    /// Guards, in order: pause flag, provider allow-list, per-sender
    /// cooldown, batch open.
    pub fn submit_pair(
        &self,
        caller: Address,
        player: Address,
        first: CiphertextHandle,
        second: CiphertextHandle,
    ) -> LedgerResult<()> {
        let now = self.clock.now();
        let mut state = self.write()?;
        Self::ensure_not_paused(&state)?;
        Self::ensure_provider(&state, caller)?;
        self.ensure_cooldown(&state, caller, now)?;
        if !state.batch_open {
            return Err(LedgerError::BatchNotOpen);
        }
        if first.is_null() || second.is_null() {
            return Err(LedgerError::InvalidArgument(
                "ciphertext handles must be non-null".into(),
            ));
        }

        let batch = state.current_batch;
        state.entries.insert(
            (batch, player),
            PairEntry {
                first,
                second,
                submitted_at: now,
            },
        );
        state.last_action.insert(caller, now);
        self.emit(
            &mut state,
            EventKind::PairSubmitted,
            EventPayload::Submission {
                batch,
                player,
                provider: caller,
            },
        );
        debug!(batch = %batch, player = %player, "pair submitted");
        Ok(())
    }

    /// Request decryption of a player's stored pair in the current batch.
    ///
    /// Stores a [`DecryptionContext`] holding the batch id, the player
    /// address, and a digest over the stored handles plus the ledger's
    /// own address. The oracle's callback later settles it through
    /// [`Self::handle_decryption`].
    pub fn request_decryption(
        &self,
        caller: Address,
        player: Address,
    ) -> LedgerResult<RequestId> {
        let now = self.clock.now();
        let mut state = self.write()?;
        Self::ensure_not_paused(&state)?;
        Self::ensure_provider(&state, caller)?;
        self.ensure_cooldown(&state, caller, now)?;

        let batch = state.current_batch;
        let entry = state.entries.get(&(batch, player)).copied().ok_or_else(|| {
            LedgerError::InvalidArgument(format!("no entry for {player} in {batch}"))
        })?;

        let digest = state_digest(&[entry.first, entry.second], &self.address);
        let request = self.oracle.request_decryption(&[entry.first, entry.second])?;

        state.contexts.insert(
            request,
            DecryptionContext {
                batch,
                player,
                digest,
                processed: false,
            },
        );
        state.last_action.insert(caller, now);
        self.emit(
            &mut state,
            EventKind::DecryptionRequested,
            EventPayload::Request {
                request,
                batch,
                player,
            },
        );
        info!(request = %request.short_id(), batch = %batch, player = %player, "decryption requested");
        Ok(request)
    }

    /// Settle a decryption callback from the compute service.
    ///
    /// Recomputes the state digest over the re-fetched stored handles
    /// and rejects with `StateMismatch` if the ciphertexts changed since
    /// the request; verifies the proof via the oracle's signature-check
    /// entry point; rejects a second callback for the same request with
    /// `ReplayAttempt`; decodes two little-endian `u32`s; marks the
    /// context processed before emitting the revealed pair.
    pub fn handle_decryption(
        &self,
        request: RequestId,
        cleartext: &[u8],
        proof: &lode_compute::DecryptionProof,
    ) -> LedgerResult<(u32, u32)> {
        let mut state = self.write()?;
        let context = *state
            .contexts
            .get(&request)
            .ok_or(LedgerError::UnknownRequest(request))?;

        let entry = state
            .entries
            .get(&(context.batch, context.player))
            .copied()
            .ok_or(LedgerError::StateMismatch)?;
        let digest = state_digest(&[entry.first, entry.second], &self.address);
        if digest != context.digest {
            return Err(LedgerError::StateMismatch);
        }

        self.oracle
            .verify_proof(&request, cleartext, proof)
            .map_err(|_| LedgerError::InvalidProof)?;

        if context.processed {
            return Err(LedgerError::ReplayAttempt);
        }

        if cleartext.len() != 8 {
            return Err(LedgerError::InvalidArgument(format!(
                "expected 8 cleartext bytes, got {}",
                cleartext.len()
            )));
        }
        let first = u32::from_le_bytes(cleartext[..4].try_into().expect("length checked"));
        let second = u32::from_le_bytes(cleartext[4..].try_into().expect("length checked"));

        if let Some(ctx) = state.contexts.get_mut(&request) {
            ctx.processed = true;
        }
        self.emit(
            &mut state,
            EventKind::PairRevealed,
            EventPayload::Reveal {
                request,
                batch: context.batch,
                player: context.player,
                first,
                second,
            },
        );
        info!(request = %request.short_id(), first, second, "pair revealed");
        Ok((first, second))
    }

    // -- queries ------------------------------------------------------------

    /// The current batch id (`BatchId::none()` before the first open).
    pub fn current_batch(&self) -> LedgerResult<BatchId> {
        Ok(self.read()?.current_batch)
    }

    /// Whether the current batch accepts submissions.
    pub fn is_batch_open(&self) -> LedgerResult<bool> {
        Ok(self.read()?.batch_open)
    }

    /// Whether the global pause flag is set.
    pub fn is_paused(&self) -> LedgerResult<bool> {
        Ok(self.read()?.paused)
    }

    /// Whether an address is on the provider allow-list.
    pub fn is_provider(&self, address: Address) -> LedgerResult<bool> {
        Ok(self.read()?.providers.contains(&address))
    }

    /// A player's stored entry for a batch, if any.
    pub fn entry(&self, batch: BatchId, player: Address) -> LedgerResult<Option<PairEntry>> {
        Ok(self.read()?.entries.get(&(batch, player)).copied())
    }

    /// The context for a decryption request, if any.
    pub fn context(&self, request: RequestId) -> LedgerResult<Option<DecryptionContext>> {
        Ok(self.read()?.contexts.get(&request).copied())
    }

    /// All events emitted so far, in order.
    pub fn events(&self) -> LedgerResult<Vec<LedgerEvent>> {
        Ok(self.read()?.events.clone())
    }

    /// Drain and return all events emitted so far.
    pub fn take_events(&self) -> LedgerResult<Vec<LedgerEvent>> {
        Ok(std::mem::take(&mut self.write()?.events))
    }

    // -- guards -------------------------------------------------------------

    fn ensure_owner(&self, caller: Address) -> LedgerResult<()> {
        if caller != self.owner {
            return Err(LedgerError::NotOwner);
        }
        Ok(())
    }

    fn ensure_not_paused(state: &LedgerState) -> LedgerResult<()> {
        if state.paused {
            return Err(LedgerError::Paused);
        }
        Ok(())
    }

    fn ensure_provider(state: &LedgerState, caller: Address) -> LedgerResult<()> {
        if !state.providers.contains(&caller) {
            return Err(LedgerError::NotProvider);
        }
        Ok(())
    }

    fn ensure_cooldown(
        &self,
        state: &LedgerState,
        caller: Address,
        now: Timestamp,
    ) -> LedgerResult<()> {
        if let Some(&last) = state.last_action.get(&caller) {
            let elapsed = now.millis_since(last);
            if elapsed < self.config.cooldown_ms {
                return Err(LedgerError::CooldownActive {
                    remaining_ms: self.config.cooldown_ms - elapsed,
                });
            }
        }
        Ok(())
    }

    // -- plumbing -----------------------------------------------------------

    fn emit(&self, state: &mut LedgerState, kind: EventKind, payload: EventPayload) {
        state
            .events
            .push(LedgerEvent::new(self.clock.now(), kind, payload));
    }

    fn read(&self) -> LedgerResult<std::sync::RwLockReadGuard<'_, LedgerState>> {
        self.inner.read().map_err(|_| LedgerError::LockPoisoned)
    }

    fn write(&self) -> LedgerResult<std::sync::RwLockWriteGuard<'_, LedgerState>> {
        self.inner.write().map_err(|_| LedgerError::LockPoisoned)
    }
}

impl std::fmt::Debug for BatchLedger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BatchLedger")
            .field("address", &self.address)
            .field("owner", &self.owner)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use lode_compute::MockComputeService;

    struct Fixture {
        ledger: BatchLedger,
        oracle: Arc<MockComputeService>,
        clock: ManualClock,
        owner: Address,
        provider: Address,
        player: Address,
    }

    fn fixture(config: LedgerConfig) -> Fixture {
        let oracle = Arc::new(MockComputeService::new());
        let clock = ManualClock::starting_at(1_000_000);
        let owner = Address::ephemeral();
        let provider = Address::ephemeral();
        let player = Address::ephemeral();

        let ledger = BatchLedger::with_clock(
            owner,
            config,
            Arc::clone(&oracle) as Arc<dyn DecryptionOracle>,
            Arc::new(clock.clone()),
        );
        ledger.add_provider(owner, provider).unwrap();

        Fixture {
            ledger,
            oracle,
            clock,
            owner,
            provider,
            player,
        }
    }

    fn submit(f: &Fixture) -> (CiphertextHandle, CiphertextHandle) {
        let first = f.oracle.encrypt(11).unwrap();
        let second = f.oracle.encrypt(22).unwrap();
        f.ledger
            .submit_pair(f.provider, f.player, first, second)
            .unwrap();
        (first, second)
    }

    // -- batch lifecycle ----------------------------------------------------

    #[test]
    fn open_batch_increments_and_opens() {
        let f = fixture(LedgerConfig::without_cooldown());
        assert!(f.ledger.current_batch().unwrap().is_none());

        let b1 = f.ledger.open_batch(f.owner).unwrap();
        assert_eq!(b1, BatchId::from_raw(1));
        assert!(f.ledger.is_batch_open().unwrap());

        let b2 = f.ledger.open_batch(f.owner).unwrap();
        assert_eq!(b2, BatchId::from_raw(2));
    }

    #[test]
    fn close_batch_stops_submissions() {
        let f = fixture(LedgerConfig::without_cooldown());
        f.ledger.open_batch(f.owner).unwrap();
        f.ledger.close_batch(f.owner).unwrap();

        let first = f.oracle.encrypt(1).unwrap();
        let second = f.oracle.encrypt(2).unwrap();
        let err = f
            .ledger
            .submit_pair(f.provider, f.player, first, second)
            .unwrap_err();
        assert_eq!(err, LedgerError::BatchNotOpen);
    }

    #[test]
    fn close_without_open_batch_fails() {
        let f = fixture(LedgerConfig::without_cooldown());
        assert_eq!(
            f.ledger.close_batch(f.owner).unwrap_err(),
            LedgerError::BatchNotOpen
        );
    }

    #[test]
    fn only_owner_controls_lifecycle() {
        let f = fixture(LedgerConfig::without_cooldown());
        let stranger = Address::ephemeral();
        assert_eq!(f.ledger.open_batch(stranger).unwrap_err(), LedgerError::NotOwner);
        assert_eq!(f.ledger.pause(stranger).unwrap_err(), LedgerError::NotOwner);
        assert_eq!(
            f.ledger.add_provider(stranger, stranger).unwrap_err(),
            LedgerError::NotOwner
        );
    }

    // -- provider allow-list ------------------------------------------------

    #[test]
    fn non_provider_cannot_submit_or_request() {
        let f = fixture(LedgerConfig::without_cooldown());
        f.ledger.open_batch(f.owner).unwrap();
        let stranger = Address::ephemeral();
        let first = f.oracle.encrypt(1).unwrap();
        let second = f.oracle.encrypt(2).unwrap();

        assert_eq!(
            f.ledger
                .submit_pair(stranger, f.player, first, second)
                .unwrap_err(),
            LedgerError::NotProvider
        );
        assert_eq!(
            f.ledger.request_decryption(stranger, f.player).unwrap_err(),
            LedgerError::NotProvider
        );
    }

    #[test]
    fn removed_provider_loses_access() {
        let f = fixture(LedgerConfig::without_cooldown());
        f.ledger.open_batch(f.owner).unwrap();
        assert!(f.ledger.is_provider(f.provider).unwrap());
        f.ledger.remove_provider(f.owner, f.provider).unwrap();
        assert!(!f.ledger.is_provider(f.provider).unwrap());

        let first = f.oracle.encrypt(1).unwrap();
        let second = f.oracle.encrypt(2).unwrap();
        assert_eq!(
            f.ledger
                .submit_pair(f.provider, f.player, first, second)
                .unwrap_err(),
            LedgerError::NotProvider
        );
    }

    // -- pause flag ---------------------------------------------------------

    #[test]
    fn pause_short_circuits_gated_operations() {
        let f = fixture(LedgerConfig::without_cooldown());
        f.ledger.open_batch(f.owner).unwrap();
        f.ledger.pause(f.owner).unwrap();

        let first = f.oracle.encrypt(1).unwrap();
        let second = f.oracle.encrypt(2).unwrap();
        assert_eq!(
            f.ledger
                .submit_pair(f.provider, f.player, first, second)
                .unwrap_err(),
            LedgerError::Paused
        );
        assert_eq!(
            f.ledger.request_decryption(f.provider, f.player).unwrap_err(),
            LedgerError::Paused
        );

        f.ledger.resume(f.owner).unwrap();
        f.ledger
            .submit_pair(f.provider, f.player, first, second)
            .unwrap();
    }

    // -- cooldown -----------------------------------------------------------

    #[test]
    fn cooldown_blocks_rapid_repeat_calls() {
        let f = fixture(LedgerConfig { cooldown_ms: 5_000 });
        f.ledger.open_batch(f.owner).unwrap();
        submit(&f);

        // Immediately again: blocked with the remaining window reported.
        let first = f.oracle.encrypt(3).unwrap();
        let second = f.oracle.encrypt(4).unwrap();
        let err = f
            .ledger
            .submit_pair(f.provider, f.player, first, second)
            .unwrap_err();
        assert_eq!(err, LedgerError::CooldownActive { remaining_ms: 5_000 });

        // Partway through the window: still blocked.
        f.clock.advance(4_999);
        let err = f
            .ledger
            .submit_pair(f.provider, f.player, first, second)
            .unwrap_err();
        assert_eq!(err, LedgerError::CooldownActive { remaining_ms: 1 });

        // After the window: allowed.
        f.clock.advance(1);
        f.ledger
            .submit_pair(f.provider, f.player, first, second)
            .unwrap();
    }

    #[test]
    fn cooldown_applies_to_decryption_requests_too() {
        let f = fixture(LedgerConfig { cooldown_ms: 5_000 });
        f.ledger.open_batch(f.owner).unwrap();
        submit(&f);

        let err = f.ledger.request_decryption(f.provider, f.player).unwrap_err();
        assert!(matches!(err, LedgerError::CooldownActive { .. }));

        f.clock.advance(5_000);
        f.ledger.request_decryption(f.provider, f.player).unwrap();
    }

    #[test]
    fn cooldown_is_per_sender() {
        let f = fixture(LedgerConfig { cooldown_ms: 5_000 });
        f.ledger.open_batch(f.owner).unwrap();
        let other_provider = Address::ephemeral();
        f.ledger.add_provider(f.owner, other_provider).unwrap();
        submit(&f);

        // A different provider is not affected by the first one's window.
        let first = f.oracle.encrypt(5).unwrap();
        let second = f.oracle.encrypt(6).unwrap();
        f.ledger
            .submit_pair(other_provider, f.player, first, second)
            .unwrap();
    }

    // -- submissions --------------------------------------------------------

    #[test]
    fn submission_overwrites_previous_entry() {
        let f = fixture(LedgerConfig::without_cooldown());
        let batch = f.ledger.open_batch(f.owner).unwrap();
        let (first, _) = submit(&f);

        let new_first = f.oracle.encrypt(33).unwrap();
        let new_second = f.oracle.encrypt(44).unwrap();
        f.ledger
            .submit_pair(f.provider, f.player, new_first, new_second)
            .unwrap();

        let entry = f.ledger.entry(batch, f.player).unwrap().unwrap();
        assert_eq!(entry.first, new_first);
        assert_ne!(entry.first, first);
    }

    #[test]
    fn null_handles_are_rejected() {
        let f = fixture(LedgerConfig::without_cooldown());
        f.ledger.open_batch(f.owner).unwrap();
        let good = f.oracle.encrypt(1).unwrap();
        let err = f
            .ledger
            .submit_pair(f.provider, f.player, CiphertextHandle::null(), good)
            .unwrap_err();
        assert!(matches!(err, LedgerError::InvalidArgument(_)));
    }

    #[test]
    fn entries_are_scoped_to_their_batch() {
        let f = fixture(LedgerConfig::without_cooldown());
        let b1 = f.ledger.open_batch(f.owner).unwrap();
        submit(&f);
        let b2 = f.ledger.open_batch(f.owner).unwrap();

        assert!(f.ledger.entry(b1, f.player).unwrap().is_some());
        assert!(f.ledger.entry(b2, f.player).unwrap().is_none());
    }

    // -- decryption protocol ------------------------------------------------

    #[test]
    fn full_request_callback_roundtrip() {
        let f = fixture(LedgerConfig::without_cooldown());
        f.ledger.open_batch(f.owner).unwrap();
        submit(&f);

        let request = f.ledger.request_decryption(f.provider, f.player).unwrap();
        let context = f.ledger.context(request).unwrap().unwrap();
        assert!(!context.processed);
        assert_eq!(context.player, f.player);

        let (cleartext, proof) = f.oracle.fulfill(&request).unwrap();
        let (first, second) = f.ledger.handle_decryption(request, &cleartext, &proof).unwrap();
        assert_eq!((first, second), (11, 22));

        let context = f.ledger.context(request).unwrap().unwrap();
        assert!(context.processed);
    }

    #[test]
    fn second_callback_is_a_replay() {
        let f = fixture(LedgerConfig::without_cooldown());
        f.ledger.open_batch(f.owner).unwrap();
        submit(&f);

        let request = f.ledger.request_decryption(f.provider, f.player).unwrap();
        let (cleartext, proof) = f.oracle.fulfill(&request).unwrap();
        f.ledger.handle_decryption(request, &cleartext, &proof).unwrap();

        let err = f
            .ledger
            .handle_decryption(request, &cleartext, &proof)
            .unwrap_err();
        assert_eq!(err, LedgerError::ReplayAttempt);

        // The context stays processed; no second reveal event.
        let reveals = f
            .ledger
            .events()
            .unwrap()
            .into_iter()
            .filter(|e| e.kind == EventKind::PairRevealed)
            .count();
        assert_eq!(reveals, 1);
    }

    #[test]
    fn callback_after_resubmission_is_a_state_mismatch() {
        let f = fixture(LedgerConfig::without_cooldown());
        f.ledger.open_batch(f.owner).unwrap();
        submit(&f);

        let request = f.ledger.request_decryption(f.provider, f.player).unwrap();
        let (cleartext, proof) = f.oracle.fulfill(&request).unwrap();

        // The player's entry is overwritten between request and callback.
        let new_first = f.oracle.encrypt(77).unwrap();
        let new_second = f.oracle.encrypt(88).unwrap();
        f.ledger
            .submit_pair(f.provider, f.player, new_first, new_second)
            .unwrap();

        let err = f
            .ledger
            .handle_decryption(request, &cleartext, &proof)
            .unwrap_err();
        assert_eq!(err, LedgerError::StateMismatch);

        // The context was not consumed by the rejected callback.
        assert!(!f.ledger.context(request).unwrap().unwrap().processed);
    }

    #[test]
    fn callback_with_unknown_request_fails() {
        let f = fixture(LedgerConfig::without_cooldown());
        let request = RequestId::new();
        let proof = f.oracle.sign_payload(&request, b"whatever");
        let err = f
            .ledger
            .handle_decryption(request, b"whatever", &proof)
            .unwrap_err();
        assert_eq!(err, LedgerError::UnknownRequest(request));
    }

    #[test]
    fn callback_with_bad_proof_fails() {
        let f = fixture(LedgerConfig::without_cooldown());
        f.ledger.open_batch(f.owner).unwrap();
        submit(&f);

        let request = f.ledger.request_decryption(f.provider, f.player).unwrap();
        let (cleartext, _) = f.oracle.fulfill(&request).unwrap();

        let foreign = MockComputeService::new();
        let forged = foreign.sign_payload(&request, &cleartext);
        let err = f
            .ledger
            .handle_decryption(request, &cleartext, &forged)
            .unwrap_err();
        assert_eq!(err, LedgerError::InvalidProof);
        assert!(!f.ledger.context(request).unwrap().unwrap().processed);
    }

    #[test]
    fn callback_with_wrong_length_cleartext_fails() {
        let f = fixture(LedgerConfig::without_cooldown());
        f.ledger.open_batch(f.owner).unwrap();
        submit(&f);

        let request = f.ledger.request_decryption(f.provider, f.player).unwrap();
        let short = [0u8; 5];
        let proof = f.oracle.sign_payload(&request, &short);
        let err = f.ledger.handle_decryption(request, &short, &proof).unwrap_err();
        assert!(matches!(err, LedgerError::InvalidArgument(_)));
        // A rejected decode does not consume the context.
        assert!(!f.ledger.context(request).unwrap().unwrap().processed);
    }

    #[test]
    fn request_without_entry_fails() {
        let f = fixture(LedgerConfig::without_cooldown());
        f.ledger.open_batch(f.owner).unwrap();
        let err = f.ledger.request_decryption(f.provider, f.player).unwrap_err();
        assert!(matches!(err, LedgerError::InvalidArgument(_)));
    }

    #[test]
    fn decryption_remains_possible_after_batch_closes() {
        let f = fixture(LedgerConfig::without_cooldown());
        f.ledger.open_batch(f.owner).unwrap();
        submit(&f);
        f.ledger.close_batch(f.owner).unwrap();

        let request = f.ledger.request_decryption(f.provider, f.player).unwrap();
        let (cleartext, proof) = f.oracle.fulfill(&request).unwrap();
        let pair = f.ledger.handle_decryption(request, &cleartext, &proof).unwrap();
        assert_eq!(pair, (11, 22));
    }

    #[test]
    fn unfulfilled_context_stays_unprocessed() {
        let f = fixture(LedgerConfig::without_cooldown());
        f.ledger.open_batch(f.owner).unwrap();
        submit(&f);

        let request = f.ledger.request_decryption(f.provider, f.player).unwrap();
        f.clock.advance(1_000_000_000);
        // No timeout path exists: the context is simply still pending.
        let context = f.ledger.context(request).unwrap().unwrap();
        assert!(!context.processed);
    }

    // -- events -------------------------------------------------------------

    #[test]
    fn events_record_the_full_history() {
        let f = fixture(LedgerConfig::without_cooldown());
        f.ledger.open_batch(f.owner).unwrap();
        submit(&f);
        let request = f.ledger.request_decryption(f.provider, f.player).unwrap();
        let (cleartext, proof) = f.oracle.fulfill(&request).unwrap();
        f.ledger.handle_decryption(request, &cleartext, &proof).unwrap();

        let kinds: Vec<EventKind> = f.ledger.events().unwrap().iter().map(|e| e.kind).collect();
        assert_eq!(
            kinds,
            vec![
                EventKind::ProviderAdded,
                EventKind::BatchOpened,
                EventKind::PairSubmitted,
                EventKind::DecryptionRequested,
                EventKind::PairRevealed,
            ]
        );
        assert!(f.ledger.events().unwrap().iter().all(LedgerEvent::verify_integrity));
    }

    #[test]
    fn take_events_drains() {
        let f = fixture(LedgerConfig::without_cooldown());
        f.ledger.open_batch(f.owner).unwrap();
        assert!(!f.ledger.take_events().unwrap().is_empty());
        assert!(f.ledger.events().unwrap().is_empty());
    }

    #[test]
    fn reveal_event_carries_the_cleartext_pair() {
        let f = fixture(LedgerConfig::without_cooldown());
        f.ledger.open_batch(f.owner).unwrap();
        submit(&f);
        let request = f.ledger.request_decryption(f.provider, f.player).unwrap();
        let (cleartext, proof) = f.oracle.fulfill(&request).unwrap();
        f.ledger.handle_decryption(request, &cleartext, &proof).unwrap();

        let reveal = f
            .ledger
            .events()
            .unwrap()
            .into_iter()
            .find(|e| e.kind == EventKind::PairRevealed)
            .unwrap();
        match reveal.payload {
            EventPayload::Reveal {
                first,
                second,
                player,
                ..
            } => {
                assert_eq!((first, second), (11, 22));
                assert_eq!(player, f.player);
            }
            other => panic!("unexpected payload: {other:?}"),
        }
    }

    // -- ledger identity ----------------------------------------------------

    #[test]
    fn ledger_address_is_deterministic_per_owner() {
        let oracle = Arc::new(MockComputeService::new());
        let owner = Address::ephemeral();
        let l1 = BatchLedger::new(
            owner,
            LedgerConfig::default(),
            Arc::clone(&oracle) as Arc<dyn DecryptionOracle>,
        );
        let l2 = BatchLedger::new(
            owner,
            LedgerConfig::default(),
            oracle as Arc<dyn DecryptionOracle>,
        );
        assert_eq!(l1.address(), l2.address());
        assert_ne!(l1.address(), owner);
    }

    #[test]
    fn invalid_proof_type_is_distinct_from_replay() {
        // Guard ordering: a bad proof on an already-processed request
        // reports InvalidProof, not ReplayAttempt — the proof check runs
        // first, matching the callback's verification order.
        let f = fixture(LedgerConfig::without_cooldown());
        f.ledger.open_batch(f.owner).unwrap();
        submit(&f);
        let request = f.ledger.request_decryption(f.provider, f.player).unwrap();
        let (cleartext, proof) = f.oracle.fulfill(&request).unwrap();
        f.ledger.handle_decryption(request, &cleartext, &proof).unwrap();

        let foreign = MockComputeService::new();
        let forged = foreign.sign_payload(&request, &cleartext);
        let err = f
            .ledger
            .handle_decryption(request, &cleartext, &forged)
            .unwrap_err();
        assert_eq!(err, LedgerError::InvalidProof);
    }
}
