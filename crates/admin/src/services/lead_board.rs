//! Versioned in-memory snapshot of the lead table.
//!
//! The dashboard renders, filters and exports from a [`LeadSnapshot`] rather
//! than hitting the store on every read. Versions come from a single
//! monotonically increasing counter:
//!
//! - a fetch takes a ticket before calling the store and installs its result
//!   only if the ticket is newer than the installed version, so a slow fetch
//!   can never overwrite a newer snapshot;
//! - a mutation remembers the version it started from; on success it patches
//!   the snapshot in place (under a fresh version) if nothing was installed
//!   meanwhile, otherwise it refetches;
//! - a failed store call leaves the snapshot untouched.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use chrono::{DateTime, Utc};
use nextrade_baas::{LeadStore, StoreError};
use nextrade_core::leads::LeadStats;
use nextrade_core::{Lead, LeadId, LeadStatus};
use thiserror::Error;
use tokio::sync::RwLock;

/// One installed view of the lead table, newest first.
#[derive(Debug, Clone)]
pub struct LeadSnapshot {
    /// 0 until the first successful fetch.
    pub version: u64,
    pub fetched_at: DateTime<Utc>,
    pub leads: Vec<Lead>,
    pub stats: LeadStats,
}

impl LeadSnapshot {
    fn new(version: u64, leads: Vec<Lead>) -> Self {
        let fetched_at = Utc::now();
        let stats = LeadStats::compute(&leads, fetched_at);
        Self {
            version,
            fetched_at,
            leads,
            stats,
        }
    }

    /// Whether any fetch has succeeded yet.
    #[must_use]
    pub const fn is_loaded(&self) -> bool {
        self.version > 0
    }

    #[must_use]
    pub fn get(&self, id: LeadId) -> Option<&Lead> {
        self.leads.iter().find(|l| l.id == id)
    }
}

/// Errors from board operations. The snapshot is unchanged when one occurs.
#[derive(Debug, Error)]
pub enum BoardError {
    #[error("failed to load leads: {0}")]
    Fetch(#[source] StoreError),

    #[error("failed to delete lead {id}: {source}")]
    Delete {
        id: LeadId,
        #[source]
        source: StoreError,
    },

    #[error("failed to update lead {id}: {source}")]
    Update {
        id: LeadId,
        #[source]
        source: StoreError,
    },
}

/// How the snapshot was brought up to date after a successful mutation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MutationOutcome {
    /// The snapshot was patched in place.
    Patched,
    /// Another install raced the mutation; the snapshot was refetched.
    Refetched,
    /// The mutation succeeded but the follow-up fetch failed.
    Stale,
}

/// Shared lead snapshot with version-guarded refresh and mutation.
pub struct LeadBoard {
    store: Arc<dyn LeadStore>,
    snapshot: RwLock<Arc<LeadSnapshot>>,
    versions: AtomicU64,
}

impl std::fmt::Debug for LeadBoard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LeadBoard")
            .field("versions", &self.versions.load(Ordering::Relaxed))
            .finish_non_exhaustive()
    }
}

impl LeadBoard {
    #[must_use]
    pub fn new(store: Arc<dyn LeadStore>) -> Self {
        Self {
            store,
            snapshot: RwLock::new(Arc::new(LeadSnapshot::new(0, Vec::new()))),
            versions: AtomicU64::new(0),
        }
    }

    fn next_version(&self) -> u64 {
        self.versions.fetch_add(1, Ordering::SeqCst) + 1
    }

    /// The installed snapshot. Never blocks on the store.
    pub async fn snapshot(&self) -> Arc<LeadSnapshot> {
        Arc::clone(&*self.snapshot.read().await)
    }

    /// The installed snapshot, fetching first if nothing has been loaded.
    ///
    /// # Errors
    ///
    /// Returns [`BoardError::Fetch`] if the initial fetch fails.
    pub async fn loaded_snapshot(&self) -> Result<Arc<LeadSnapshot>, BoardError> {
        let current = self.snapshot().await;
        if current.is_loaded() {
            Ok(current)
        } else {
            self.refresh().await
        }
    }

    /// Fetch the table and install it unless a newer snapshot arrived first.
    ///
    /// Returns whatever snapshot is installed afterwards.
    ///
    /// # Errors
    ///
    /// Returns [`BoardError::Fetch`] if the store call fails.
    pub async fn refresh(&self) -> Result<Arc<LeadSnapshot>, BoardError> {
        let ticket = self.next_version();
        let leads = self
            .store
            .list_newest_first()
            .await
            .map_err(BoardError::Fetch)?;

        let mut installed = self.snapshot.write().await;
        if ticket > installed.version {
            *installed = Arc::new(LeadSnapshot::new(ticket, leads));
            tracing::debug!(version = ticket, leads = installed.leads.len(), "Snapshot installed");
        } else {
            tracing::debug!(
                ticket,
                installed = installed.version,
                "Discarded fetch older than installed snapshot"
            );
        }
        Ok(Arc::clone(&installed))
    }

    /// Delete one lead.
    ///
    /// # Errors
    ///
    /// Returns [`BoardError::Delete`] if the store rejects the delete.
    pub async fn delete(&self, id: LeadId) -> Result<MutationOutcome, BoardError> {
        let observed = self.snapshot().await.version;

        self.store
            .delete(id)
            .await
            .map_err(|source| BoardError::Delete { id, source })?;
        tracing::info!(lead_id = %id, "Lead deleted");

        self.apply(observed, |leads| {
            let before = leads.len();
            leads.retain(|l| l.id != id);
            leads.len() < before
        })
        .await
    }

    /// Change one lead's status.
    ///
    /// # Errors
    ///
    /// Returns [`BoardError::Update`] if the store rejects the update.
    pub async fn update_status(
        &self,
        id: LeadId,
        status: LeadStatus,
    ) -> Result<MutationOutcome, BoardError> {
        let observed = self.snapshot().await.version;

        let updated = self
            .store
            .update_status(id, status)
            .await
            .map_err(|source| BoardError::Update { id, source })?;
        tracing::info!(lead_id = %id, status = %status, "Lead status updated");

        self.apply(observed, move |leads| {
            leads
                .iter_mut()
                .find(|l| l.id == id)
                .map(|row| *row = updated)
                .is_some()
        })
        .await
    }

    /// Patch the snapshot if it is still at `observed`, otherwise refetch.
    ///
    /// `patch` returns false when the row it targets is missing, which also
    /// forces a refetch.
    async fn apply<F>(&self, observed: u64, patch: F) -> Result<MutationOutcome, BoardError>
    where
        F: FnOnce(&mut Vec<Lead>) -> bool,
    {
        {
            let mut installed = self.snapshot.write().await;
            if installed.version == observed && installed.is_loaded() {
                let mut leads = installed.leads.clone();
                if patch(&mut leads) {
                    *installed = Arc::new(LeadSnapshot::new(self.next_version(), leads));
                    return Ok(MutationOutcome::Patched);
                }
            }
        }

        match self.refresh().await {
            Ok(_) => Ok(MutationOutcome::Refetched),
            Err(e) => {
                tracing::warn!(error = %e, "Refetch after mutation failed; snapshot is stale");
                Ok(MutationOutcome::Stale)
            }
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use async_trait::async_trait;
    use chrono::TimeDelta;
    use nextrade_baas::{InsertOutcome, MemoryLeadStore};
    use nextrade_core::NewLead;
    use tokio::sync::{Mutex, oneshot};

    use super::*;

    fn lead(id: i64, name: &str, status: LeadStatus, age_days: i64) -> Lead {
        Lead {
            id: LeadId::new(id),
            name: name.to_owned(),
            email: format!("{}@example.com", name.to_lowercase()),
            phone: "5551234567".into(),
            interest: Some("Forex".into()),
            company: None,
            source: None,
            message: "Interested in margin trading".into(),
            status,
            created_at: Utc::now() - TimeDelta::days(age_days),
            idempotency_key: None,
        }
    }

    async fn seeded() -> MemoryLeadStore {
        let store = MemoryLeadStore::new();
        store.seed(lead(1, "Ada", LeadStatus::New, 2)).await;
        store.seed(lead(2, "Grace", LeadStatus::Qualified, 10)).await;
        store.seed(lead(3, "Linus", LeadStatus::Closed, 40)).await;
        store
    }

    /// Signals when a call reaches the gate, then waits to be released.
    struct Gate {
        entered: oneshot::Sender<()>,
        release: oneshot::Receiver<()>,
    }

    impl Gate {
        fn new() -> (Self, oneshot::Receiver<()>, oneshot::Sender<()>) {
            let (entered_tx, entered_rx) = oneshot::channel();
            let (release_tx, release_rx) = oneshot::channel();
            (
                Self {
                    entered: entered_tx,
                    release: release_rx,
                },
                entered_rx,
                release_tx,
            )
        }

        async fn pass(slot: &Mutex<Option<Self>>) {
            let gate = slot.lock().await.take();
            if let Some(gate) = gate {
                let _ = gate.entered.send(());
                let _ = gate.release.await;
            }
        }
    }

    /// Store that can hold one list or delete call after the inner store
    /// has answered, to stage out-of-order completions.
    struct GatedStore {
        inner: MemoryLeadStore,
        list_gate: Mutex<Option<Gate>>,
        delete_gate: Mutex<Option<Gate>>,
    }

    impl GatedStore {
        fn new(inner: MemoryLeadStore) -> Self {
            Self {
                inner,
                list_gate: Mutex::new(None),
                delete_gate: Mutex::new(None),
            }
        }
    }

    #[async_trait]
    impl LeadStore for GatedStore {
        async fn insert(&self, lead: NewLead) -> Result<InsertOutcome, StoreError> {
            self.inner.insert(lead).await
        }

        async fn list_newest_first(&self) -> Result<Vec<Lead>, StoreError> {
            let rows = self.inner.list_newest_first().await;
            Gate::pass(&self.list_gate).await;
            rows
        }

        async fn update_status(&self, id: LeadId, status: LeadStatus) -> Result<Lead, StoreError> {
            self.inner.update_status(id, status).await
        }

        async fn delete(&self, id: LeadId) -> Result<(), StoreError> {
            let result = self.inner.delete(id).await;
            Gate::pass(&self.delete_gate).await;
            result
        }

        async fn ping(&self) -> Result<(), StoreError> {
            self.inner.ping().await
        }
    }

    fn names(snapshot: &LeadSnapshot) -> Vec<&str> {
        snapshot.leads.iter().map(|l| l.name.as_str()).collect()
    }

    #[tokio::test]
    async fn refresh_installs_newest_first_with_stats() {
        let board = LeadBoard::new(Arc::new(seeded().await));
        assert!(!board.snapshot().await.is_loaded());

        let snapshot = board.refresh().await.unwrap();
        assert_eq!(names(&snapshot), ["Ada", "Grace", "Linus"]);
        assert_eq!(snapshot.stats.total, 3);
        assert_eq!(snapshot.stats.this_week, 1);
        assert_eq!(snapshot.stats.this_month, 2);
        assert_eq!(snapshot.stats.conversion_rate, 67);
    }

    #[tokio::test]
    async fn repeated_refresh_without_mutation_yields_same_rows() {
        let board = LeadBoard::new(Arc::new(seeded().await));

        let first = board.refresh().await.unwrap();
        let second = board.refresh().await.unwrap();

        assert!(second.version > first.version);
        assert_eq!(first.leads, second.leads);
        assert_eq!(first.stats, second.stats);
    }

    #[tokio::test]
    async fn delete_patches_snapshot_and_stats() {
        let store = seeded().await;
        let board = LeadBoard::new(Arc::new(store.clone()));
        let before = board.refresh().await.unwrap();

        let outcome = board.delete(LeadId::new(2)).await.unwrap();
        let after = board.snapshot().await;

        assert_eq!(outcome, MutationOutcome::Patched);
        assert!(after.version > before.version);
        assert_eq!(names(&after), ["Ada", "Linus"]);
        assert_eq!(after.stats.total, 2);
        assert_eq!(after.stats.conversion_rate, 50);
        assert_eq!(store.len().await, 2);
    }

    #[tokio::test]
    async fn status_update_patches_row() {
        let board = LeadBoard::new(Arc::new(seeded().await));
        board.refresh().await.unwrap();

        let outcome = board
            .update_status(LeadId::new(1), LeadStatus::Closed)
            .await
            .unwrap();
        let after = board.snapshot().await;

        assert_eq!(outcome, MutationOutcome::Patched);
        assert_eq!(after.get(LeadId::new(1)).unwrap().status, LeadStatus::Closed);
        assert_eq!(after.stats.conversion_rate, 100);
    }

    #[tokio::test]
    async fn failed_delete_leaves_snapshot_untouched() {
        let store = seeded().await;
        let board = LeadBoard::new(Arc::new(store.clone()));
        let before = board.refresh().await.unwrap();

        store.set_unavailable(true);
        let err = board.delete(LeadId::new(1)).await.unwrap_err();
        let after = board.snapshot().await;

        assert!(matches!(err, BoardError::Delete { .. }));
        assert!(Arc::ptr_eq(&before, &after));
    }

    #[tokio::test]
    async fn failed_update_leaves_snapshot_untouched() {
        let store = seeded().await;
        let board = LeadBoard::new(Arc::new(store.clone()));
        let before = board.refresh().await.unwrap();

        store.set_unavailable(true);
        let err = board
            .update_status(LeadId::new(1), LeadStatus::Contacted)
            .await
            .unwrap_err();

        assert!(matches!(err, BoardError::Update { .. }));
        assert!(Arc::ptr_eq(&before, &board.snapshot().await));
    }

    #[tokio::test]
    async fn failed_refresh_keeps_previous_snapshot() {
        let store = seeded().await;
        let board = LeadBoard::new(Arc::new(store.clone()));
        let before = board.refresh().await.unwrap();

        store.set_unavailable(true);
        assert!(matches!(board.refresh().await, Err(BoardError::Fetch(_))));
        assert!(Arc::ptr_eq(&before, &board.snapshot().await));
    }

    #[tokio::test]
    async fn older_fetch_never_replaces_newer_snapshot() {
        let inner = seeded().await;
        let store = Arc::new(GatedStore::new(inner.clone()));
        let board = Arc::new(LeadBoard::new(store.clone()));

        let (gate, entered, release) = Gate::new();
        *store.list_gate.lock().await = Some(gate);

        // First fetch reads three rows, then stalls.
        let slow = tokio::spawn({
            let board = Arc::clone(&board);
            async move { board.refresh().await }
        });
        entered.await.unwrap();

        // A newer fetch sees the row added meanwhile and lands first.
        inner.seed(lead(4, "Barbara", LeadStatus::New, 0)).await;
        let fresh = board.refresh().await.unwrap();
        assert_eq!(fresh.leads.len(), 4);

        release.send(()).unwrap();
        let returned = slow.await.unwrap().unwrap();

        let installed = board.snapshot().await;
        assert_eq!(installed.leads.len(), 4);
        assert_eq!(installed.version, fresh.version);
        assert!(Arc::ptr_eq(&returned, &installed));
    }

    #[tokio::test]
    async fn mutation_racing_a_refresh_refetches() {
        let inner = seeded().await;
        let store = Arc::new(GatedStore::new(inner.clone()));
        let board = Arc::new(LeadBoard::new(store.clone()));
        board.refresh().await.unwrap();

        let (gate, entered, release) = Gate::new();
        *store.delete_gate.lock().await = Some(gate);

        let delete = tokio::spawn({
            let board = Arc::clone(&board);
            async move { board.delete(LeadId::new(1)).await }
        });
        entered.await.unwrap();

        // The row is already gone in the store; a refresh installs a new version.
        inner.seed(lead(5, "Katherine", LeadStatus::Contacted, 1)).await;
        board.refresh().await.unwrap();

        release.send(()).unwrap();
        let outcome = delete.await.unwrap().unwrap();

        assert_eq!(outcome, MutationOutcome::Refetched);
        let installed = board.snapshot().await;
        assert!(installed.get(LeadId::new(1)).is_none());
        assert!(installed.get(LeadId::new(5)).is_some());
    }

    #[tokio::test]
    async fn loaded_snapshot_fetches_once() {
        let store = seeded().await;
        let board = LeadBoard::new(Arc::new(store.clone()));

        let first = board.loaded_snapshot().await.unwrap();
        let second = board.loaded_snapshot().await.unwrap();

        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(store.calls(), 1);
    }
}
