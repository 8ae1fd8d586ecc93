//! In-memory identity provider for testing.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use nextrade_core::{Email, Role};
use secrecy::{ExposeSecret, SecretString};
use tokio::sync::RwLock;

use super::{AuthError, AuthUser, IdentityProvider, NewIdentity};

#[derive(Debug)]
struct Account {
    user: AuthUser,
    password: SecretString,
}

/// An [`IdentityProvider`] that keeps accounts in a `HashMap`.
#[derive(Debug, Clone, Default)]
pub struct MemoryIdentityProvider {
    accounts: Arc<RwLock<HashMap<Email, Account>>>,
}

impl MemoryIdentityProvider {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an account.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::AlreadyExists`] if the email is taken.
    pub async fn create_user(&self, identity: NewIdentity) -> Result<AuthUser, AuthError> {
        let mut accounts = self.accounts.write().await;
        if accounts.contains_key(&identity.email) {
            return Err(AuthError::AlreadyExists(identity.email));
        }
        let user = AuthUser {
            id: format!("user-{}", accounts.len() + 1),
            email: identity.email.clone(),
            name: Some(identity.name),
            role: identity.role,
        };
        accounts.insert(
            identity.email,
            Account {
                user: user.clone(),
                password: identity.password,
            },
        );
        Ok(user)
    }

    /// Shorthand for [`Self::create_user`] in tests.
    ///
    /// # Errors
    ///
    /// Returns an error if the email does not parse or is taken.
    pub async fn add_user(
        &self,
        email: &str,
        password: &str,
        role: Role,
    ) -> Result<AuthUser, AuthError> {
        let email = Email::parse(email).map_err(|e| AuthError::Parse(e.to_string()))?;
        let name = email.as_str().split('@').next().unwrap_or_default().to_owned();
        self.create_user(NewIdentity {
            email,
            name,
            password: SecretString::from(password.to_owned()),
            role,
        })
        .await
    }
}

#[async_trait]
impl IdentityProvider for MemoryIdentityProvider {
    async fn sign_in(
        &self,
        email: &Email,
        password: &SecretString,
    ) -> Result<AuthUser, AuthError> {
        let accounts = self.accounts.read().await;
        match accounts.get(email) {
            Some(account) if account.password.expose_secret() == password.expose_secret() => {
                Ok(account.user.clone())
            }
            _ => Err(AuthError::InvalidCredentials),
        }
    }
}
