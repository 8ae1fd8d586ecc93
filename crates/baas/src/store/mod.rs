//! Lead table access.
//!
//! [`LeadStore`] is the only seam between the web apps and the hosted table.
//! Every method is a single round trip; nothing here retries or batches.

mod memory;
mod postgrest;

use async_trait::async_trait;
use nextrade_core::{Lead, LeadId, LeadStatus, NewLead};
use thiserror::Error;

pub use memory::MemoryLeadStore;
pub use postgrest::PostgrestLeadStore;

use crate::config::BaasConfigError;

/// Errors returned by a [`LeadStore`].
#[derive(Debug, Error)]
pub enum StoreError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// API returned an error response.
    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },

    /// No row with this id.
    #[error("Lead not found: {0}")]
    NotFound(LeadId),

    /// Failed to parse response.
    #[error("Parse error: {0}")]
    Parse(String),

    /// Client could not be configured.
    #[error("Configuration error: {0}")]
    Config(#[from] BaasConfigError),

    /// Backend refused the call without reaching the table.
    #[error("Store unavailable: {0}")]
    Unavailable(String),
}

/// Result of an insert.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InsertOutcome {
    /// A new row was written and returned by the store.
    Created(Lead),
    /// The store accepted the write without returning the row. A keyed
    /// insert whose key already existed is also reported this way.
    Accepted,
    /// A row with the same idempotency key already exists; nothing was written.
    Duplicate,
}

/// Operations on the `leads` table.
#[async_trait]
pub trait LeadStore: Send + Sync + 'static {
    /// Insert one lead. Rows carrying an idempotency key that is already
    /// present are ignored and never written twice.
    async fn insert(&self, lead: NewLead) -> Result<InsertOutcome, StoreError>;

    /// Every row, newest `created_at` first.
    async fn list_newest_first(&self) -> Result<Vec<Lead>, StoreError>;

    /// Set the status of one row and return the updated row.
    async fn update_status(&self, id: LeadId, status: LeadStatus) -> Result<Lead, StoreError>;

    /// Delete one row.
    async fn delete(&self, id: LeadId) -> Result<(), StoreError>;

    /// Cheap reachability check for readiness probes.
    async fn ping(&self) -> Result<(), StoreError>;
}
