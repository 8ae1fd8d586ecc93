//! At-most-once lead intake.
//!
//! Each submission attempt carries an [`IdempotencyKey`]. Receipts for keys
//! seen in the last 24 hours are kept in a `moka` cache; concurrent attempts
//! with the same key are coalesced so only one reaches the store. The store
//! also ignores a duplicate key, which covers restarts and multiple replicas.
//!
//! A failed insert caches nothing, so the visitor can retry with the same key.

use std::sync::Arc;
use std::time::Duration;

use moka::future::Cache;
use nextrade_baas::{InsertOutcome, LeadStore, StoreError};
use nextrade_core::{IdempotencyKey, LeadId, NewLead};
use thiserror::Error;

/// How long a key is remembered in-process.
const RECEIPT_TTL: Duration = Duration::from_secs(24 * 60 * 60);

/// Upper bound on remembered keys.
const MAX_RECEIPTS: u64 = 50_000;

/// Errors from [`LeadIntake::submit`].
#[derive(Debug, Clone, Error)]
pub enum IntakeError {
    /// The insert failed. Shared between coalesced callers.
    #[error("store error: {0}")]
    Store(Arc<StoreError>),
}

impl From<StoreError> for IntakeError {
    fn from(err: StoreError) -> Self {
        Self::Store(Arc::new(err))
    }
}

/// What happened to a submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IntakeOutcome {
    /// A new row was written.
    Created(LeadId),
    /// The store took the row without reporting its id.
    Accepted,
    /// The key was already used; nothing was written.
    Duplicate,
}

/// Cached result of the first successful attempt for a key.
#[derive(Debug, Clone, Copy)]
enum Receipt {
    Created(LeadId),
    Accepted,
    AlreadyStored,
}

impl From<InsertOutcome> for Receipt {
    fn from(outcome: InsertOutcome) -> Self {
        match outcome {
            InsertOutcome::Created(row) => Self::Created(row.id),
            InsertOutcome::Accepted => Self::Accepted,
            InsertOutcome::Duplicate => Self::AlreadyStored,
        }
    }
}

/// Forwards new leads to the store, deduplicating by idempotency key.
#[derive(Clone)]
pub struct LeadIntake {
    store: Arc<dyn LeadStore>,
    receipts: Cache<IdempotencyKey, Receipt>,
}

impl std::fmt::Debug for LeadIntake {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LeadIntake")
            .field("receipts", &self.receipts.entry_count())
            .finish_non_exhaustive()
    }
}

impl LeadIntake {
    #[must_use]
    pub fn new(store: Arc<dyn LeadStore>) -> Self {
        let receipts = Cache::builder()
            .max_capacity(MAX_RECEIPTS)
            .time_to_live(RECEIPT_TTL)
            .build();
        Self { store, receipts }
    }

    /// Insert `lead` unless its key has already produced a row.
    ///
    /// Leads without a key are inserted unconditionally.
    ///
    /// # Errors
    ///
    /// Returns [`IntakeError::Store`] if the insert fails.
    pub async fn submit(&self, lead: NewLead) -> Result<IntakeOutcome, IntakeError> {
        let Some(key) = lead.idempotency_key else {
            return Ok(match Receipt::from(self.store.insert(lead).await?) {
                Receipt::Created(id) => IntakeOutcome::Created(id),
                Receipt::Accepted => IntakeOutcome::Accepted,
                Receipt::AlreadyStored => IntakeOutcome::Duplicate,
            });
        };

        let store = Arc::clone(&self.store);
        let entry = self
            .receipts
            .entry(key)
            .or_try_insert_with(async move {
                store.insert(lead).await.map(Receipt::from)
            })
            .await
            .map_err(IntakeError::Store)?;

        match (entry.is_fresh(), entry.into_value()) {
            (true, Receipt::Created(id)) => {
                tracing::info!(lead_id = %id, idempotency_key = %key, "Lead stored");
                Ok(IntakeOutcome::Created(id))
            }
            (true, Receipt::Accepted) => {
                tracing::info!(idempotency_key = %key, "Lead accepted by store");
                Ok(IntakeOutcome::Accepted)
            }
            (true, Receipt::AlreadyStored) => {
                tracing::info!(idempotency_key = %key, "Store already holds this submission");
                Ok(IntakeOutcome::Duplicate)
            }
            (false, _) => {
                tracing::info!(idempotency_key = %key, "Duplicate submission ignored");
                Ok(IntakeOutcome::Duplicate)
            }
        }
    }

    /// The store this intake writes to.
    #[must_use]
    pub fn store(&self) -> &Arc<dyn LeadStore> {
        &self.store
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use async_trait::async_trait;
    use nextrade_baas::MemoryLeadStore;
    use nextrade_core::{Lead, LeadStatus};

    use super::*;

    fn lead(key: Option<IdempotencyKey>) -> NewLead {
        NewLead {
            name: "Jane Doe".into(),
            email: "jane@x.com".into(),
            phone: "5551234567".into(),
            interest: "stocks".into(),
            message: "I want to learn more".into(),
            company: None,
            source: None,
            idempotency_key: key,
        }
    }

    fn intake() -> (MemoryLeadStore, LeadIntake) {
        let store = MemoryLeadStore::new();
        let intake = LeadIntake::new(Arc::new(store.clone()));
        (store, intake)
    }

    #[tokio::test]
    async fn same_key_inserts_once() {
        let (store, intake) = intake();
        let key = Some(IdempotencyKey::generate());

        let first = intake.submit(lead(key)).await.unwrap();
        let second = intake.submit(lead(key)).await.unwrap();

        assert!(matches!(first, IntakeOutcome::Created(_)));
        assert_eq!(second, IntakeOutcome::Duplicate);
        assert_eq!(store.len().await, 1);
        // The second attempt never reached the store.
        assert_eq!(store.calls(), 1);
    }

    #[tokio::test]
    async fn concurrent_attempts_are_coalesced() {
        let (store, intake) = intake();
        let key = Some(IdempotencyKey::generate());

        let (a, b) = tokio::join!(intake.submit(lead(key)), intake.submit(lead(key)));
        let outcomes = [a.unwrap(), b.unwrap()];

        let created = outcomes
            .iter()
            .filter(|o| matches!(o, IntakeOutcome::Created(_)))
            .count();
        assert_eq!(created, 1);
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn failed_insert_can_be_retried_with_same_key() {
        let (store, intake) = intake();
        let key = Some(IdempotencyKey::generate());

        store.set_unavailable(true);
        assert!(intake.submit(lead(key)).await.is_err());
        assert!(store.is_empty().await);

        store.set_unavailable(false);
        let outcome = intake.submit(lead(key)).await.unwrap();
        assert!(matches!(outcome, IntakeOutcome::Created(_)));
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn key_known_only_to_store_is_duplicate() {
        let (store, intake) = intake();
        let key = Some(IdempotencyKey::generate());
        store.insert(lead(key)).await.unwrap();

        let outcome = intake.submit(lead(key)).await.unwrap();
        assert_eq!(outcome, IntakeOutcome::Duplicate);
        assert_eq!(store.len().await, 1);
    }

    /// Store that writes rows but never returns them, like the REST client.
    struct WriteOnlyStore(MemoryLeadStore);

    #[async_trait]
    impl LeadStore for WriteOnlyStore {
        async fn insert(&self, lead: NewLead) -> Result<InsertOutcome, StoreError> {
            self.0.insert(lead).await.map(|_| InsertOutcome::Accepted)
        }
        async fn list_newest_first(&self) -> Result<Vec<Lead>, StoreError> {
            self.0.list_newest_first().await
        }
        async fn update_status(&self, id: LeadId, status: LeadStatus) -> Result<Lead, StoreError> {
            self.0.update_status(id, status).await
        }
        async fn delete(&self, id: LeadId) -> Result<(), StoreError> {
            self.0.delete(id).await
        }
        async fn ping(&self) -> Result<(), StoreError> {
            self.0.ping().await
        }
    }

    #[tokio::test]
    async fn write_only_store_still_deduplicates_by_key() {
        let store = MemoryLeadStore::new();
        let intake = LeadIntake::new(Arc::new(WriteOnlyStore(store.clone())));
        let key = Some(IdempotencyKey::generate());

        let first = intake.submit(lead(key)).await.unwrap();
        let second = intake.submit(lead(key)).await.unwrap();

        assert_eq!(first, IntakeOutcome::Accepted);
        assert_eq!(second, IntakeOutcome::Duplicate);
        assert_eq!(store.len().await, 1);
        assert_eq!(store.calls(), 1);
    }

    #[tokio::test]
    async fn leads_without_key_are_not_deduplicated() {
        let (store, intake) = intake();
        intake.submit(lead(None)).await.unwrap();
        intake.submit(lead(None)).await.unwrap();
        assert_eq!(store.len().await, 2);
    }
}
