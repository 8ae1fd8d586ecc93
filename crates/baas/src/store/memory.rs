//! In-memory lead store for testing.
//!
//! Behaves like the hosted table for everything the apps rely on: ids are
//! assigned in insertion order, `created_at` is stamped on insert, the
//! idempotency key is unique, and listing is newest first. Calls can be made
//! to fail with [`MemoryLeadStore::set_unavailable`].

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use async_trait::async_trait;
use chrono::Utc;
use nextrade_core::{Lead, LeadId, LeadStatus, NewLead};
use tokio::sync::RwLock;

use super::{InsertOutcome, LeadStore, StoreError};

#[derive(Debug, Default)]
struct Table {
    rows: Vec<Lead>,
    next_id: i64,
}

/// A [`LeadStore`] backed by a `Vec` behind a `RwLock`.
#[derive(Debug, Clone, Default)]
pub struct MemoryLeadStore {
    table: Arc<RwLock<Table>>,
    unavailable: Arc<AtomicBool>,
    calls: Arc<AtomicUsize>,
}

impl MemoryLeadStore {
    /// Create a new empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a fully-formed row, keeping its id and `created_at`.
    pub async fn seed(&self, lead: Lead) {
        let mut table = self.table.write().await;
        table.next_id = table.next_id.max(lead.id.as_i64());
        table.rows.push(lead);
    }

    /// Make every subsequent call fail (or succeed again).
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    /// Number of trait calls made so far, including failed ones.
    #[must_use]
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Number of rows currently stored.
    pub async fn len(&self) -> usize {
        self.table.read().await.rows.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    fn enter(&self) -> Result<(), StoreError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable("memory store disabled".to_owned()));
        }
        Ok(())
    }
}

#[async_trait]
impl LeadStore for MemoryLeadStore {
    async fn insert(&self, lead: NewLead) -> Result<InsertOutcome, StoreError> {
        self.enter()?;
        let mut table = self.table.write().await;

        if let Some(key) = lead.idempotency_key
            && table.rows.iter().any(|r| r.idempotency_key == Some(key))
        {
            return Ok(InsertOutcome::Duplicate);
        }

        table.next_id += 1;
        let row = Lead {
            id: LeadId::new(table.next_id),
            name: lead.name,
            email: lead.email,
            phone: lead.phone,
            interest: Some(lead.interest),
            company: lead.company,
            source: lead.source.map(|s| s.as_str().to_owned()),
            message: lead.message,
            status: LeadStatus::default(),
            created_at: Utc::now(),
            idempotency_key: lead.idempotency_key,
        };
        table.rows.push(row.clone());
        Ok(InsertOutcome::Created(row))
    }

    async fn list_newest_first(&self) -> Result<Vec<Lead>, StoreError> {
        self.enter()?;
        let mut rows = self.table.read().await.rows.clone();
        rows.sort_by(|a, b| {
            b.created_at
                .cmp(&a.created_at)
                .then_with(|| b.id.cmp(&a.id))
        });
        Ok(rows)
    }

    async fn update_status(&self, id: LeadId, status: LeadStatus) -> Result<Lead, StoreError> {
        self.enter()?;
        let mut table = self.table.write().await;
        let row = table
            .rows
            .iter_mut()
            .find(|r| r.id == id)
            .ok_or(StoreError::NotFound(id))?;
        row.status = status;
        Ok(row.clone())
    }

    async fn delete(&self, id: LeadId) -> Result<(), StoreError> {
        self.enter()?;
        let mut table = self.table.write().await;
        let before = table.rows.len();
        table.rows.retain(|r| r.id != id);
        if table.rows.len() == before {
            return Err(StoreError::NotFound(id));
        }
        Ok(())
    }

    async fn ping(&self) -> Result<(), StoreError> {
        self.enter()
    }
}
