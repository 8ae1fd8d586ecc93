//! REST client for the hosted identity provider.

use async_trait::async_trait;
use nextrade_core::{Email, Role};
use reqwest::StatusCode;
use reqwest::header::{AUTHORIZATION, HeaderMap, HeaderValue};
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use url::Url;

use super::{AuthError, AuthUser, IdentityProvider, NewIdentity};
use crate::config::BaasConfig;

/// GoTrue-backed [`IdentityProvider`].
///
/// Sign-in works with the public key; [`GoTrueClient::create_user`] needs the
/// service-role key.
#[derive(Clone)]
pub struct GoTrueClient {
    client: reqwest::Client,
    token_url: Url,
    admin_users_url: Url,
}

impl std::fmt::Debug for GoTrueClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GoTrueClient")
            .field("token_url", &self.token_url.as_str())
            .finish_non_exhaustive()
    }
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    user: UserRecord,
}

#[derive(Debug, Deserialize)]
struct UserRecord {
    id: String,
    email: String,
    #[serde(default)]
    user_metadata: UserMetadata,
}

#[derive(Debug, Default, Deserialize)]
struct UserMetadata {
    name: Option<String>,
    role: Option<String>,
}

impl TryFrom<UserRecord> for AuthUser {
    type Error = AuthError;

    fn try_from(record: UserRecord) -> Result<Self, Self::Error> {
        let email = Email::parse(&record.email)
            .map_err(|e| AuthError::Parse(format!("provider returned bad email: {e}")))?;
        Ok(Self {
            id: record.id,
            email,
            name: record.user_metadata.name,
            role: Role::from_claim(record.user_metadata.role.as_deref()),
        })
    }
}

impl GoTrueClient {
    /// Create a client for the configured project.
    ///
    /// # Errors
    ///
    /// Returns error if the key is not a valid header value or the HTTP
    /// client fails to build.
    pub fn new(config: &BaasConfig) -> Result<Self, AuthError> {
        let key = config.api_key.expose_secret();
        let mut headers = HeaderMap::new();

        let mut api_key = HeaderValue::from_str(key)
            .map_err(|e| AuthError::Parse(format!("Invalid API key format: {e}")))?;
        api_key.set_sensitive(true);
        headers.insert("apikey", api_key);

        let mut bearer = HeaderValue::from_str(&format!("Bearer {key}"))
            .map_err(|e| AuthError::Parse(format!("Invalid API key format: {e}")))?;
        bearer.set_sensitive(true);
        headers.insert(AUTHORIZATION, bearer);

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .build()?;

        let mut token_url = config.auth_url(&["token"])?;
        token_url
            .query_pairs_mut()
            .append_pair("grant_type", "password");

        Ok(Self {
            client,
            token_url,
            admin_users_url: config.auth_url(&["admin", "users"])?,
        })
    }

    /// Provision a confirmed user with a role claim.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::AlreadyExists`] if the address is registered, or
    /// an API error if the key lacks admin rights.
    pub async fn create_user(&self, identity: &NewIdentity) -> Result<AuthUser, AuthError> {
        let body = serde_json::json!({
            "email": identity.email,
            "password": identity.password.expose_secret(),
            "email_confirm": true,
            "user_metadata": {
                "name": identity.name,
                "role": identity.role,
            },
        });

        let response = self
            .client
            .post(self.admin_users_url.clone())
            .json(&body)
            .send()
            .await?;
        let status = response.status();

        if status == StatusCode::UNPROCESSABLE_ENTITY || status == StatusCode::CONFLICT {
            return Err(AuthError::AlreadyExists(identity.email.clone()));
        }
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(AuthError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let record: UserRecord = response
            .json()
            .await
            .map_err(|e| AuthError::Parse(e.to_string()))?;
        record.try_into()
    }
}

#[async_trait]
impl IdentityProvider for GoTrueClient {
    async fn sign_in(
        &self,
        email: &Email,
        password: &SecretString,
    ) -> Result<AuthUser, AuthError> {
        let body = serde_json::json!({
            "email": email,
            "password": password.expose_secret(),
        });

        let response = self
            .client
            .post(self.token_url.clone())
            .json(&body)
            .send()
            .await?;
        let status = response.status();

        if status == StatusCode::BAD_REQUEST || status == StatusCode::UNAUTHORIZED {
            return Err(AuthError::InvalidCredentials);
        }
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(AuthError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let token: TokenResponse = response
            .json()
            .await
            .map_err(|e| AuthError::Parse(e.to_string()))?;
        token.user.try_into()
    }
}
