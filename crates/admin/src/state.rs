//! Application state shared across handlers.

use std::sync::Arc;

use nextrade_baas::{
    AuthError, GoTrueClient, IdentityProvider, LeadStore, PostgrestLeadStore, StoreError,
};
use thiserror::Error;

use crate::config::AdminConfig;
use crate::services::LeadBoard;

/// Errors building the backend clients at startup.
#[derive(Debug, Error)]
pub enum StateError {
    #[error("lead store: {0}")]
    Store(#[from] StoreError),
    #[error("identity provider: {0}")]
    Identity(#[from] AuthError),
}

/// Application state shared across all handlers.
///
/// Cheaply cloneable via `Arc`.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: AdminConfig,
    store: Arc<dyn LeadStore>,
    identity: Arc<dyn IdentityProvider>,
    board: LeadBoard,
}

impl AppState {
    /// Create state around existing collaborators.
    #[must_use]
    pub fn new(
        config: AdminConfig,
        store: Arc<dyn LeadStore>,
        identity: Arc<dyn IdentityProvider>,
    ) -> Self {
        Self {
            inner: Arc::new(AppStateInner {
                config,
                board: LeadBoard::new(Arc::clone(&store)),
                store,
                identity,
            }),
        }
    }

    /// Create state backed by the hosted table and identity APIs.
    ///
    /// # Errors
    ///
    /// Returns an error if either HTTP client cannot be built.
    pub fn from_config(config: AdminConfig) -> Result<Self, StateError> {
        let store = PostgrestLeadStore::new(&config.store)?;
        let identity = GoTrueClient::new(&config.identity)?;
        Ok(Self::new(config, Arc::new(store), Arc::new(identity)))
    }

    #[must_use]
    pub fn config(&self) -> &AdminConfig {
        &self.inner.config
    }

    #[must_use]
    pub fn store(&self) -> &Arc<dyn LeadStore> {
        &self.inner.store
    }

    #[must_use]
    pub fn identity(&self) -> &dyn IdentityProvider {
        self.inner.identity.as_ref()
    }

    /// The shared lead snapshot.
    #[must_use]
    pub fn board(&self) -> &LeadBoard {
        &self.inner.board
    }
}
