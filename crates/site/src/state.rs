//! Application state shared across handlers.

use std::sync::Arc;

use nextrade_baas::{LeadStore, PostgrestLeadStore, StoreError};

use crate::config::SiteConfig;
use crate::services::LeadIntake;

/// Application state shared across all handlers.
///
/// Cheaply cloneable via `Arc`.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: SiteConfig,
    intake: LeadIntake,
}

impl AppState {
    /// Create state around an existing store.
    #[must_use]
    pub fn new(config: SiteConfig, store: Arc<dyn LeadStore>) -> Self {
        Self {
            inner: Arc::new(AppStateInner {
                config,
                intake: LeadIntake::new(store),
            }),
        }
    }

    /// Create state backed by the hosted table API.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn from_config(config: SiteConfig) -> Result<Self, StoreError> {
        let store = PostgrestLeadStore::new(&config.baas)?;
        Ok(Self::new(config, Arc::new(store)))
    }

    #[must_use]
    pub fn config(&self) -> &SiteConfig {
        &self.inner.config
    }

    /// The idempotent intake service.
    #[must_use]
    pub fn intake(&self) -> &LeadIntake {
        &self.inner.intake
    }

    #[must_use]
    pub fn store(&self) -> &Arc<dyn LeadStore> {
        self.inner.intake.store()
    }
}
