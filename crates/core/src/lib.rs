//! Nextrade Core - Shared lead types and pure lead-management logic.
//!
//! This crate provides the domain model used across all Nextrade components:
//! - `site` - Public marketing site and lead intake endpoint
//! - `admin` - Password-protected lead dashboard
//! - `cli` - Operator tooling (admin provisioning, lead export)
//!
//! # Architecture
//!
//! The core crate contains only types and pure functions - no I/O, no HTTP
//! clients. Everything the dashboard derives from a list of leads (stats,
//! filtering, CSV export) lives here so both the admin app and the CLI agree.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for IDs, emails, statuses, roles and idempotency keys
//! - [`leads`] - The `Lead` entity, contact-form validation, stats, filters and export

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod leads;
pub mod types;

pub use leads::{Lead, NewLead};
pub use types::*;
