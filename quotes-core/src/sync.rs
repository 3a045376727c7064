/// Local/remote reconciliation.
///
/// One pass:
///   Fetch the remote set (no locks held while waiting).
///   Under the store write lock: re-read the persisted local set, merge with
///   remote-wins, persist the merged set, replace the in-memory store.
///   Emit one Conflict event per differing shared key, then Succeeded.
///
/// Any failure emits Failed (tagged FetchFailed or PersistFailed) and leaves
/// both stores untouched. Only one pass
/// runs at a time; a pass requested while another is in flight is skipped.
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::sync::{broadcast, watch};
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

use crate::merge::{merge_remote_wins, Conflict};
use crate::persistence::PersistenceAdapter;
use crate::storage::PersistenceError;
use crate::store::SharedStore;
use crate::types::Quote;

const EVENT_CHANNEL_CAPACITY: usize = 256;

#[derive(Debug, thiserror::Error)]
pub enum SyncError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("Malformed remote response: {0}")]
    Parse(String),

    #[error("Persistence error: {0}")]
    Persistence(#[from] PersistenceError),
}

/// Where remote quotes come from and where new local quotes are published.
#[async_trait]
pub trait RemoteSource: Send + Sync {
    async fn fetch_quotes(&self) -> Result<Vec<Quote>, SyncError>;

    /// Publish a newly added quote. Callers only log the outcome.
    async fn push_quote(&self, quote: &Quote) -> Result<(), SyncError>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SyncState {
    Idle,
    Fetching,
    Merging,
    Persisted,
    /// Fetching or parsing the remote set failed.
    FetchFailed,
    /// The merged set could not be read or written locally.
    PersistFailed,
}

/// Status events for the UI collaborator.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type")]
pub enum SyncEvent {
    Conflict(Conflict),
    Succeeded {
        timestamp: DateTime<Utc>,
        categories: Vec<String>,
        quote_count: usize,
        conflicts: usize,
    },
    Failed {
        timestamp: DateTime<Utc>,
        /// `FetchFailed` or `PersistFailed`.
        state: SyncState,
        error: String,
    },
}

#[derive(Debug, Clone, Serialize)]
pub struct SyncReport {
    pub quote_count: usize,
    pub categories: Vec<String>,
    pub conflicts: Vec<Conflict>,
    pub finished_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub enum SyncOutcome {
    Completed(SyncReport),
    /// Another reconciliation was already in flight.
    Skipped,
}

/// Clears the in-flight flag when the pass ends, however it ends.
struct InFlightGuard<'a>(&'a AtomicBool);

impl<'a> InFlightGuard<'a> {
    fn acquire(flag: &'a AtomicBool) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| Self(flag))
    }
}

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

pub struct SyncEngine {
    remote: Arc<dyn RemoteSource>,
    persistence: Arc<PersistenceAdapter>,
    store: SharedStore,
    state: Mutex<SyncState>,
    in_flight: AtomicBool,
    event_tx: broadcast::Sender<SyncEvent>,
}

impl SyncEngine {
    pub fn new(
        remote: Arc<dyn RemoteSource>,
        persistence: Arc<PersistenceAdapter>,
        store: SharedStore,
    ) -> Self {
        let (event_tx, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        Self {
            remote,
            persistence,
            store,
            state: Mutex::new(SyncState::Idle),
            in_flight: AtomicBool::new(false),
            event_tx,
        }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<SyncEvent> {
        self.event_tx.subscribe()
    }

    pub fn state(&self) -> SyncState {
        *self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    pub fn is_in_flight(&self) -> bool {
        self.in_flight.load(Ordering::Acquire)
    }

    pub fn remote(&self) -> Arc<dyn RemoteSource> {
        self.remote.clone()
    }

    fn set_state(&self, next: SyncState) {
        let mut state = self.state.lock().unwrap_or_else(|e| e.into_inner());
        log::debug!(target: "quotes.sync", "{:?} -> {:?}", *state, next);
        *state = next;
    }

    fn emit(&self, event: SyncEvent) {
        // No subscribers is fine
        let _ = self.event_tx.send(event);
    }

    pub async fn reconcile(&self) -> Result<SyncOutcome, SyncError> {
        let Some(_guard) = InFlightGuard::acquire(&self.in_flight) else {
            log::debug!(target: "quotes.sync", "Reconciliation already in flight, skipping");
            return Ok(SyncOutcome::Skipped);
        };

        match self.run_pass().await {
            Ok(report) => {
                for conflict in &report.conflicts {
                    log::warn!(
                        target: "quotes.sync",
                        "Conflict on {:?}: server version replaces local one",
                        conflict.server_quote.key()
                    );
                    self.emit(SyncEvent::Conflict(conflict.clone()));
                }
                log::info!(
                    target: "quotes.sync",
                    "Synced with server: {} quotes, {} conflicts",
                    report.quote_count,
                    report.conflicts.len()
                );
                self.emit(SyncEvent::Succeeded {
                    timestamp: report.finished_at,
                    categories: report.categories.clone(),
                    quote_count: report.quote_count,
                    conflicts: report.conflicts.len(),
                });
                self.set_state(SyncState::Idle);
                Ok(SyncOutcome::Completed(report))
            }
            Err(e) => {
                let failed = match e {
                    SyncError::Persistence(_) => SyncState::PersistFailed,
                    SyncError::Network(_) | SyncError::Parse(_) => SyncState::FetchFailed,
                };
                self.set_state(failed);
                log::warn!(target: "quotes.sync", "Sync failed: {}", e);
                self.emit(SyncEvent::Failed {
                    timestamp: Utc::now(),
                    state: failed,
                    error: e.to_string(),
                });
                self.set_state(SyncState::Idle);
                Err(e)
            }
        }
    }

    async fn run_pass(&self) -> Result<SyncReport, SyncError> {
        self.set_state(SyncState::Fetching);
        let remote = self.remote.fetch_quotes().await?;

        self.set_state(SyncState::Merging);
        let (merged, categories) = {
            // Held through persist + replace so an add_quote cannot slip in
            // between the fresh read and the overwrite.
            let mut store = self.store.write().unwrap_or_else(|e| e.into_inner());
            let local = self.persistence.load_quotes()?;
            let merged = merge_remote_wins(&local, &remote);
            self.persistence.save_quotes(&merged.quotes)?;
            store.replace_all(merged.quotes.clone());
            (merged, store.categories())
        };
        self.set_state(SyncState::Persisted);

        Ok(SyncReport {
            quote_count: merged.quotes.len(),
            categories,
            conflicts: merged.conflicts,
            finished_at: Utc::now(),
        })
    }

    /// Reconcile now, then on every tick until `shutdown` becomes true.
    /// Each pass runs on its own task; ticks landing mid-pass are skipped.
    pub fn spawn_periodic(
        self: Arc<Self>,
        interval: Duration,
        mut shutdown: watch::Receiver<bool>,
    ) -> JoinHandle<()> {
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
            log::info!(target: "quotes.sync", "Periodic sync every {:?}", interval);

            loop {
                tokio::select! {
                    _ = ticker.tick() => {
                        let engine = self.clone();
                        tokio::spawn(async move {
                            // Failures are already logged and emitted
                            let _ = engine.reconcile().await;
                        });
                    }
                    changed = shutdown.changed() => {
                        if changed.is_err() || *shutdown.borrow() {
                            log::info!(target: "quotes.sync", "Periodic sync stopped");
                            break;
                        }
                    }
                }
            }
        })
    }
}
