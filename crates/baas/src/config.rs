//! Connection settings for the hosted backend.

use secrecy::SecretString;
use thiserror::Error;
use url::Url;

/// Table that holds contact-form submissions unless overridden.
pub const DEFAULT_LEADS_TABLE: &str = "leads";

/// Errors building a [`BaasConfig`] or one of its endpoint URLs.
#[derive(Debug, Error)]
pub enum BaasConfigError {
    #[error("invalid project URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
    #[error("project URL cannot be a base: {0}")]
    NotABase(String),
    #[error("invalid table name: {0:?}")]
    InvalidTable(String),
}

/// Project URL, API key and lead table name.
///
/// The key is whichever one the caller is entitled to: the public (anon) key
/// for the site, the service-role key for admin tooling.
///
/// Implements `Debug` manually to redact the key.
#[derive(Clone)]
pub struct BaasConfig {
    pub url: Url,
    pub api_key: SecretString,
    pub leads_table: String,
}

impl std::fmt::Debug for BaasConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BaasConfig")
            .field("url", &self.url.as_str())
            .field("api_key", &"[REDACTED]")
            .field("leads_table", &self.leads_table)
            .finish()
    }
}

impl BaasConfig {
    /// # Errors
    ///
    /// Returns an error if `url` does not parse or cannot carry a path.
    pub fn new(url: &str, api_key: SecretString) -> Result<Self, BaasConfigError> {
        let url = Url::parse(url)?;
        if url.cannot_be_a_base() {
            return Err(BaasConfigError::NotABase(url.to_string()));
        }
        Ok(Self {
            url,
            api_key,
            leads_table: DEFAULT_LEADS_TABLE.to_owned(),
        })
    }

    /// Use a different lead table (e.g. `nextrade_leads`).
    ///
    /// # Errors
    ///
    /// Returns an error unless the name is a plain identifier.
    pub fn with_leads_table(mut self, table: &str) -> Result<Self, BaasConfigError> {
        let valid = !table.is_empty()
            && table
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_');
        if !valid {
            return Err(BaasConfigError::InvalidTable(table.to_owned()));
        }
        table.clone_into(&mut self.leads_table);
        Ok(self)
    }

    /// `{url}/rest/v1/{table}`
    ///
    /// # Errors
    ///
    /// Returns an error if the project URL cannot carry a path.
    pub fn table_url(&self) -> Result<Url, BaasConfigError> {
        self.endpoint(&["rest", "v1", &self.leads_table])
    }

    /// `{url}/auth/v1/{path...}`
    ///
    /// # Errors
    ///
    /// Returns an error if the project URL cannot carry a path.
    pub fn auth_url(&self, path: &[&str]) -> Result<Url, BaasConfigError> {
        let mut segments = vec!["auth", "v1"];
        segments.extend_from_slice(path);
        self.endpoint(&segments)
    }

    fn endpoint(&self, segments: &[&str]) -> Result<Url, BaasConfigError> {
        let mut url = self.url.clone();
        url.path_segments_mut()
            .map_err(|()| BaasConfigError::NotABase(self.url.to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }
}
