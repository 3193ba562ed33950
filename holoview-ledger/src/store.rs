//! The process-wide ledger store.
//!
//! Holds the ledger and the last-synced version token behind one write lock.
//! Constructed once at process start and passed by handle into every
//! handler; tests construct isolated instances against their own backends.

use crate::activation::apply_purchase;
use crate::codec;
use crate::record::{canonical_serial, Ledger, LicenseRecord};
use chrono::Utc;
use holoview_catalog::FeatureId;
use holoview_remote::{RemoteError, RemoteLocator, RemoteStore, VersionToken};
use std::collections::BTreeSet;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

#[derive(Debug, Default)]
struct LedgerState {
    ledger: Ledger,
    version: Option<VersionToken>,
}

/// The in-memory ledger plus its remote durability mirror.
pub struct LedgerStore {
    remote: Arc<dyn RemoteStore>,
    locator: RemoteLocator,
    state: Arc<RwLock<LedgerState>>,
}

impl LedgerStore {
    /// Creates an empty store backed by the given remote object.
    pub fn new(remote: Arc<dyn RemoteStore>, locator: RemoteLocator) -> Self {
        Self {
            remote,
            locator,
            state: Arc::new(RwLock::new(LedgerState::default())),
        }
    }

    /// Loads the ledger from the remote object.
    ///
    /// Fail-open: an absent object or a transport failure leaves the store
    /// empty and the service available. Never returns an error.
    pub async fn load(&self) {
        match self.remote.fetch(&self.locator).await {
            Ok(Some(blob)) => {
                let text = String::from_utf8_lossy(&blob.content);
                let ledger = codec::decode(&text);
                info!(
                    "Loaded {} license records from {} (version {})",
                    ledger.len(),
                    self.locator,
                    blob.version
                );
                let mut state = self.state.write().await;
                state.ledger = ledger;
                state.version = Some(blob.version);
            }
            Ok(None) => {
                info!("No ledger object at {}, starting empty", self.locator);
            }
            Err(e) => {
                warn!("Failed to fetch ledger from {}, starting empty: {e}", self.locator);
            }
        }
    }

    /// Looks up a serial, case-insensitively. Returns a consistent snapshot
    /// of the record.
    pub async fn query(&self, serial: &str) -> Option<LicenseRecord> {
        let canonical = canonical_serial(serial);
        self.state.read().await.ledger.get(&canonical).cloned()
    }

    /// Returns the number of records currently held.
    pub async fn record_count(&self) -> usize {
        self.state.read().await.ledger.len()
    }

    /// Returns the version token of the last successful load or commit.
    pub async fn last_version(&self) -> Option<VersionToken> {
        self.state.read().await.version.clone()
    }

    /// Applies a completed purchase: marks the serial `Valid`, refreshes its
    /// dates, unions in the purchased features, then mirrors the ledger to
    /// the remote object.
    ///
    /// An empty serial is acknowledged but changes nothing — the event is
    /// unrecoverable and redelivery would not help. The returned record
    /// reflects the applied in-memory state regardless of whether the remote
    /// commit succeeds.
    pub async fn activate(
        &self,
        serial: &str,
        features: &BTreeSet<FeatureId>,
    ) -> Option<LicenseRecord> {
        if canonical_serial(serial).is_empty() {
            debug!("Ignoring activation with empty serial");
            return None;
        }

        let today = Utc::now().date_naive();
        let serial = serial.to_string();
        let features = features.clone();
        self.apply_and_persist(move |ledger| {
            let canonical = canonical_serial(&serial);
            let updated = apply_purchase(ledger.get(&canonical), &serial, &features, today)?;
            ledger.insert(canonical, updated.clone());
            Some(updated)
        })
        .await
    }

    /// Applies a mutation to the in-memory ledger, then mirrors the result
    /// to the remote object.
    ///
    /// The mutation runs under the write lock; the commit does not — the new
    /// state is visible to readers before (and regardless of whether) it is
    /// durable. A commit that loses the version race or hits a transport
    /// failure is logged and dropped: the next successful commit re-encodes
    /// the whole ledger and corrects the mirror.
    pub async fn apply_and_persist<R>(&self, mutation: impl FnOnce(&mut Ledger) -> R) -> R {
        let result = {
            let mut state = self.state.write().await;
            mutation(&mut state.ledger)
        };
        self.persist().await;
        result
    }

    async fn persist(&self) {
        let (snapshot, expected) = {
            let state = self.state.read().await;
            (state.ledger.clone(), state.version.clone())
        };

        let content = codec::encode(&snapshot);
        let message = format!("Update license ledger ({} serials)", snapshot.len());

        match self
            .remote
            .commit(&self.locator, content.as_bytes(), &message, expected.as_ref())
            .await
        {
            Ok(version) => {
                debug!("Committed ledger to {} at version {version}", self.locator);
                self.state.write().await.version = Some(version);
            }
            Err(RemoteError::Conflict(msg)) => {
                warn!("Ledger commit conflict, keeping local state: {msg}");
            }
            Err(e) => {
                warn!("Ledger commit to {} failed: {e}", self.locator);
            }
        }
    }
}
