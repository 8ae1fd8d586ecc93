//! The `Lead` entity and everything derived from a list of leads.
//!
//! - [`intake`] - Contact-form and endpoint payload validation
//! - [`stats`] - Dashboard counters
//! - [`filter`] - Search and status filtering
//! - [`export`] - CSV export

pub mod export;
pub mod filter;
pub mod intake;
pub mod stats;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

pub use export::{CSV_HEADER, export_csv, export_filename};
pub use filter::LeadFilter;
pub use intake::{
    ContactField, ContactForm, FieldError, LeadSubmission, MissingFields, ValidationErrors,
};
pub use stats::LeadStats;

use crate::types::{IdempotencyKey, LeadId, LeadStatus};

/// Label shown for leads that carry no `source`.
pub const DIRECT_SOURCE: &str = "Direct";

/// A captured contact-form submission, as stored in the `leads` table.
///
/// `id` and `created_at` are assigned by the store; only `status` changes
/// after creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Lead {
    pub id: LeadId,
    pub name: String,
    pub email: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub phone: String,
    #[serde(default)]
    pub interest: Option<String>,
    #[serde(default)]
    pub company: Option<String>,
    #[serde(default)]
    pub source: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub message: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub status: LeadStatus,
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub idempotency_key: Option<IdempotencyKey>,
}

impl Lead {
    /// Source label for display, falling back to [`DIRECT_SOURCE`].
    #[must_use]
    pub fn source_label(&self) -> &str {
        self.source
            .as_deref()
            .filter(|s| !s.trim().is_empty())
            .unwrap_or(DIRECT_SOURCE)
    }
}

/// Where a new lead came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LeadSource {
    /// The server-rendered contact page.
    ContactForm,
    /// A direct JSON call to the submission endpoint.
    Api,
}

impl LeadSource {
    /// Value written to the `source` column.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::ContactForm => "contact_form",
            Self::Api => "api",
        }
    }
}

/// Insert payload for a new lead. The store assigns everything else.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewLead {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub interest: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub company: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<LeadSource>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub idempotency_key: Option<IdempotencyKey>,
}

impl NewLead {
    #[must_use]
    pub const fn with_idempotency_key(mut self, key: Option<IdempotencyKey>) -> Self {
        self.idempotency_key = key;
        self
    }

    #[must_use]
    pub const fn with_source(mut self, source: LeadSource) -> Self {
        self.source = Some(source);
        self
    }
}

/// Treat an explicit JSON `null` the same as a missing field.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
