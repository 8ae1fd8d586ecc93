//! Core types for Nextrade.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod email;
pub mod id;
pub mod idempotency;
pub mod role;
pub mod status;

pub use email::{Email, EmailError};
pub use id::*;
pub use idempotency::{IdempotencyKey, IdempotencyKeyError};
pub use role::Role;
pub use status::{LeadStatus, ParseLeadStatusError};
