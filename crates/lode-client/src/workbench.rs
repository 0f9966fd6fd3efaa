use std::sync::Arc;

use tracing::{info, warn};

use lode_compute::{DecryptionOracle, DecryptionProof};
use lode_ledger::BatchLedger;
use lode_store::{encode_record, load_records, RecordStore};
use lode_types::{Address, Category, RequestId, SiteRecord, Timestamp};

use crate::banner::StatusBanner;
use crate::error::ClientResult;
use crate::wallet::Wallet;

/// Glue for the two demo flows: the public record store on one side,
/// the batch ledger and its decryption oracle on the other.
///
/// The banner always reflects the outcome of the most recent flow; a
/// UI polls it after each call.
pub struct Workbench {
    store: Arc<dyn RecordStore>,
    ledger: Arc<BatchLedger>,
    oracle: Arc<dyn DecryptionOracle>,
    banner: StatusBanner,
}

impl Workbench {
    pub fn new(
        store: Arc<dyn RecordStore>,
        ledger: Arc<BatchLedger>,
        oracle: Arc<dyn DecryptionOracle>,
    ) -> Self {
        Self {
            store,
            ledger,
            oracle,
            banner: StatusBanner::Idle,
        }
    }

    /// The current banner state.
    pub fn banner(&self) -> &StatusBanner {
        &self.banner
    }

    /// All readable site records, skipping any blob that fails to
    /// decode.
    pub fn list_sites(&self) -> ClientResult<Vec<SiteRecord>> {
        Ok(load_records(&*self.store)?)
    }

    /// Create a site record with both scalars placeholder-sealed and
    /// write it to the store under a generated key.
    pub fn create_site(
        &mut self,
        wallet: &Wallet,
        category: Category,
        grade: u32,
        yield_estimate: u32,
    ) -> ClientResult<SiteRecord> {
        let id = format!("site-{}", uuid::Uuid::now_v7().simple());
        let record = SiteRecord::new(
            &id,
            wallet.address(),
            category,
            grade,
            yield_estimate,
            Timestamp::now(),
        );

        let blob = match encode_record(&record) {
            Ok(blob) => blob,
            Err(err) => {
                self.banner = StatusBanner::failed(format!("could not encode record: {err}"));
                return Err(err.into());
            }
        };
        if let Err(err) = self.store.put(&id, &blob) {
            self.banner = StatusBanner::failed(format!("could not store record: {err}"));
            return Err(err.into());
        }

        info!(id = %id, owner = %wallet.address(), "created site record");
        self.banner = StatusBanner::success(format!("created {id}"));
        Ok(record)
    }

    /// Encrypt two values through the oracle and submit the pair to the
    /// current batch under the wallet's own address.
    pub fn submit_pair(&mut self, wallet: &Wallet, first: u32, second: u32) -> ClientResult<()> {
        self.banner = StatusBanner::pending("submitting pair".to_string());

        let result = self
            .oracle
            .encrypt(first)
            .and_then(|h1| self.oracle.encrypt(second).map(|h2| (h1, h2)));
        let (h1, h2) = match result {
            Ok(handles) => handles,
            Err(err) => {
                warn!(error = %err, "pair encryption failed");
                self.banner = StatusBanner::failed(format!("encryption failed: {err}"));
                return Err(err.into());
            }
        };

        match self
            .ledger
            .submit_pair(wallet.address(), wallet.address(), h1, h2)
        {
            Ok(()) => {
                self.banner = StatusBanner::success("pair submitted".to_string());
                Ok(())
            }
            Err(err) => {
                warn!(error = %err, "pair submission rejected");
                self.banner = StatusBanner::failed(format!("submission rejected: {err}"));
                Err(err.into())
            }
        }
    }

    /// Sign the reveal intent and request decryption of a player's
    /// stored pair. Fulfillment arrives out of band; the banner stays
    /// pending until [`Self::settle`] runs.
    pub fn reveal_pair(&mut self, wallet: &Wallet, player: Address) -> ClientResult<RequestId> {
        let batch = self.ledger.current_batch()?;
        let intent = format!("lode: reveal pair for {} in {}", player.short_id(), batch);
        let signature = wallet.sign_message(intent.as_bytes());
        info!(player = %player, signature = ?signature, "signed reveal intent");

        match self.ledger.request_decryption(wallet.address(), player) {
            Ok(request) => {
                self.banner =
                    StatusBanner::pending(format!("awaiting decryption {}", request.short_id()));
                Ok(request)
            }
            Err(err) => {
                warn!(error = %err, "decryption request rejected");
                self.banner = StatusBanner::failed(format!("reveal rejected: {err}"));
                Err(err.into())
            }
        }
    }

    /// Deliver a decryption callback to the ledger and surface the
    /// revealed pair in the banner.
    pub fn settle(
        &mut self,
        request: RequestId,
        cleartext: &[u8],
        proof: &DecryptionProof,
    ) -> ClientResult<(u32, u32)> {
        match self.ledger.handle_decryption(request, cleartext, proof) {
            Ok((first, second)) => {
                self.banner = StatusBanner::success(format!("revealed pair ({first}, {second})"));
                Ok((first, second))
            }
            Err(err) => {
                warn!(error = %err, request = %request.short_id(), "callback rejected");
                self.banner = StatusBanner::failed(format!("callback rejected: {err}"));
                Err(err.into())
            }
        }
    }
}
