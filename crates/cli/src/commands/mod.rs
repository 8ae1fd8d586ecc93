//! CLI command implementations.
//!
//! # Environment Variables
//!
//! - `SUPABASE_URL` - Hosted backend project URL
//! - `SUPABASE_SERVICE_ROLE_KEY` - Service key (provisioning and lead reads)
//! - `LEADS_TABLE` - Lead table name (default: leads)

pub mod admin;
pub mod leads;

use nextrade_baas::{AuthError, BaasConfig, BaasConfigError, DEFAULT_LEADS_TABLE, StoreError};
use secrecy::SecretString;
use thiserror::Error;

/// Errors that can occur while running a command.
#[derive(Debug, Error)]
pub enum CommandError {
    /// Required environment variable is missing.
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(&'static str),

    /// Backend URL or table name rejected.
    #[error("Invalid backend configuration: {0}")]
    Config(#[from] BaasConfigError),

    /// Invalid email.
    #[error("Invalid email: {0}")]
    InvalidEmail(String),

    /// Password too short to hand to the identity provider.
    #[error("Password must be at least {0} characters")]
    WeakPassword(usize),

    /// Identity provider call failed.
    #[error("Identity provider error: {0}")]
    Auth(#[from] AuthError),

    /// Lead table call failed.
    #[error("Lead store error: {0}")]
    Store(#[from] StoreError),

    /// Writing output failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Backend connection using the service-role key.
fn service_config() -> Result<BaasConfig, CommandError> {
    dotenvy::dotenv().ok();

    let url = std::env::var("SUPABASE_URL").map_err(|_| CommandError::MissingEnvVar("SUPABASE_URL"))?;
    let key = std::env::var("SUPABASE_SERVICE_ROLE_KEY")
        .map_err(|_| CommandError::MissingEnvVar("SUPABASE_SERVICE_ROLE_KEY"))?;
    let table = std::env::var("LEADS_TABLE").unwrap_or_else(|_| DEFAULT_LEADS_TABLE.to_owned());

    Ok(BaasConfig::new(&url, SecretString::from(key))?.with_leads_table(&table)?)
}
