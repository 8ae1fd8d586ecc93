//! Nextrade BaaS - clients for the hosted backend.
//!
//! All persistence and authentication is delegated to a hosted
//! backend-as-a-service exposing a PostgREST table API and a GoTrue identity
//! API. This crate wraps both behind small async traits so the web apps can be
//! driven against in-memory implementations in tests.
//!
//! # Modules
//!
//! - [`config`] - Project URL, API key and table name
//! - [`store`] - [`LeadStore`] with REST and in-memory implementations
//! - [`identity`] - [`IdentityProvider`] with REST and in-memory implementations

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod identity;
pub mod store;

pub use config::{BaasConfig, BaasConfigError, DEFAULT_LEADS_TABLE};
pub use identity::{
    AuthError, AuthUser, GoTrueClient, IdentityProvider, MemoryIdentityProvider, NewIdentity,
};
pub use store::{InsertOutcome, LeadStore, MemoryLeadStore, PostgrestLeadStore, StoreError};
