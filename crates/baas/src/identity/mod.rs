//! Hosted identity provider.
//!
//! Admins sign in with email and password; the provider returns the user
//! along with a `role` claim in its metadata. Provisioning new admins is an
//! operator task and only needs the service-role key.

mod gotrue;
mod memory;

use async_trait::async_trait;
use nextrade_core::{Email, Role};
use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use gotrue::GoTrueClient;
pub use memory::MemoryIdentityProvider;

use crate::config::BaasConfigError;

/// Errors returned by an [`IdentityProvider`].
#[derive(Debug, Error)]
pub enum AuthError {
    /// Email/password pair rejected.
    #[error("Invalid credentials")]
    InvalidCredentials,

    /// Provisioning refused because the address is taken.
    #[error("User already exists: {0}")]
    AlreadyExists(Email),

    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// API returned an error response.
    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },

    /// Failed to parse response.
    #[error("Parse error: {0}")]
    Parse(String),

    /// Client could not be configured.
    #[error("Configuration error: {0}")]
    Config(#[from] BaasConfigError),
}

/// A signed-in (or freshly provisioned) user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthUser {
    pub id: String,
    pub email: Email,
    pub name: Option<String>,
    pub role: Role,
}

/// Input for provisioning an identity.
#[derive(Debug, Clone)]
pub struct NewIdentity {
    pub email: Email,
    pub name: String,
    pub password: SecretString,
    pub role: Role,
}

/// Credential sign-in against the hosted provider.
#[async_trait]
pub trait IdentityProvider: Send + Sync + 'static {
    /// Exchange an email and password for the user record.
    async fn sign_in(&self, email: &Email, password: &SecretString)
    -> Result<AuthUser, AuthError>;
}
