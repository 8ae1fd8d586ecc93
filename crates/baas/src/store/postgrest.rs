//! REST client for the hosted `leads` table.

use async_trait::async_trait;
use nextrade_core::{Lead, LeadId, LeadStatus, NewLead};
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderValue};
use reqwest::{Response, StatusCode};
use secrecy::ExposeSecret;
use url::Url;

use super::{InsertOutcome, LeadStore, StoreError};
use crate::config::BaasConfig;

const PREFER: &str = "Prefer";
const RETURN_ROWS: &str = "return=representation";

/// Inserts never ask for the row back, so the public key only needs INSERT
/// on the table.
const INSERT_MINIMAL: &str = "return=minimal";
const INSERT_IGNORE_DUPLICATES: &str = "resolution=ignore-duplicates,return=minimal";

/// PostgREST-backed [`LeadStore`].
#[derive(Clone)]
pub struct PostgrestLeadStore {
    client: reqwest::Client,
    table_url: Url,
}

impl std::fmt::Debug for PostgrestLeadStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PostgrestLeadStore")
            .field("table_url", &self.table_url.as_str())
            .finish_non_exhaustive()
    }
}

impl PostgrestLeadStore {
    /// Create a client for the configured table.
    ///
    /// # Errors
    ///
    /// Returns error if the key is not a valid header value or the HTTP
    /// client fails to build.
    pub fn new(config: &BaasConfig) -> Result<Self, StoreError> {
        let key = config.api_key.expose_secret();
        let mut headers = HeaderMap::new();

        let mut api_key = HeaderValue::from_str(key)
            .map_err(|e| StoreError::Parse(format!("Invalid API key format: {e}")))?;
        api_key.set_sensitive(true);
        headers.insert("apikey", api_key);

        let mut bearer = HeaderValue::from_str(&format!("Bearer {key}"))
            .map_err(|e| StoreError::Parse(format!("Invalid API key format: {e}")))?;
        bearer.set_sensitive(true);
        headers.insert(AUTHORIZATION, bearer);

        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .build()?;

        Ok(Self {
            client,
            table_url: config.table_url()?,
        })
    }

    fn url_with(&self, pairs: &[(&str, &str)]) -> Url {
        let mut url = self.table_url.clone();
        url.query_pairs_mut().extend_pairs(pairs);
        url
    }

    /// Insert URL and `Prefer` header. Keyed rows are upserted with
    /// `ON CONFLICT DO NOTHING` on the unique key.
    fn insert_target(&self, keyed: bool) -> (Url, &'static str) {
        if keyed {
            (
                self.url_with(&[("on_conflict", "idempotency_key")]),
                INSERT_IGNORE_DUPLICATES,
            )
        } else {
            (self.table_url.clone(), INSERT_MINIMAL)
        }
    }

    fn id_url(&self, id: LeadId) -> Url {
        let filter = format!("eq.{id}");
        self.url_with(&[("id", filter.as_str())])
    }
}

/// Fail with [`StoreError::Api`] on a non-2xx response.
async fn check(response: Response) -> Result<Response, StoreError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let message = response.text().await.unwrap_or_default();
    Err(StoreError::Api {
        status: status.as_u16(),
        message,
    })
}

async fn rows(response: Response) -> Result<Vec<Lead>, StoreError> {
    check(response)
        .await?
        .json()
        .await
        .map_err(|e| StoreError::Parse(e.to_string()))
}

#[async_trait]
impl LeadStore for PostgrestLeadStore {
    async fn insert(&self, lead: NewLead) -> Result<InsertOutcome, StoreError> {
        let (url, prefer) = self.insert_target(lead.idempotency_key.is_some());

        // PostgREST bulk-insert semantics: the body is an array of rows.
        let response = self
            .client
            .post(url)
            .header(PREFER, prefer)
            .json(&[&lead])
            .send()
            .await?;
        check(response).await?;

        Ok(InsertOutcome::Accepted)
    }

    async fn list_newest_first(&self) -> Result<Vec<Lead>, StoreError> {
        let url = self.url_with(&[("select", "*"), ("order", "created_at.desc,id.desc")]);
        let response = self.client.get(url).send().await?;
        rows(response).await
    }

    async fn update_status(&self, id: LeadId, status: LeadStatus) -> Result<Lead, StoreError> {
        let response = self
            .client
            .patch(self.id_url(id))
            .header(PREFER, RETURN_ROWS)
            .json(&serde_json::json!({ "status": status }))
            .send()
            .await?;

        rows(response)
            .await?
            .pop()
            .ok_or(StoreError::NotFound(id))
    }

    async fn delete(&self, id: LeadId) -> Result<(), StoreError> {
        let response = self
            .client
            .delete(self.id_url(id))
            .header(PREFER, RETURN_ROWS)
            .send()
            .await?;

        if rows(response).await?.is_empty() {
            return Err(StoreError::NotFound(id));
        }
        Ok(())
    }

    async fn ping(&self) -> Result<(), StoreError> {
        let url = self.url_with(&[("select", "id"), ("limit", "1")]);
        let response = self.client.get(url).send().await?;
        if response.status() == StatusCode::NOT_FOUND {
            return Err(StoreError::Unavailable(format!(
                "table not found at {}",
                self.table_url
            )));
        }
        check(response).await.map(|_| ())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use secrecy::SecretString;

    use super::*;

    fn store() -> PostgrestLeadStore {
        let config = BaasConfig::new("https://abc.supabase.co", SecretString::from("anon-key"))
            .unwrap();
        PostgrestLeadStore::new(&config).unwrap()
    }

    #[test]
    fn test_id_filter_url() {
        let url = store().id_url(LeadId::new(42));
        assert_eq!(url.as_str(), "https://abc.supabase.co/rest/v1/leads?id=eq.42");
    }

    #[test]
    fn test_list_url_orders_newest_first() {
        let url = store().url_with(&[("select", "*"), ("order", "created_at.desc,id.desc")]);
        assert_eq!(url.query(), Some("select=*&order=created_at.desc%2Cid.desc"));
    }

    #[test]
    fn test_insert_never_asks_for_rows_back() {
        let (url, prefer) = store().insert_target(false);
        assert_eq!(url.as_str(), "https://abc.supabase.co/rest/v1/leads");
        assert_eq!(prefer, "return=minimal");

        let (url, prefer) = store().insert_target(true);
        assert_eq!(url.query(), Some("on_conflict=idempotency_key"));
        assert_eq!(prefer, "resolution=ignore-duplicates,return=minimal");
        assert!(!prefer.contains("representation"));
    }

    #[test]
    fn test_debug_hides_client_headers() {
        let dbg = format!("{:?}", store());
        assert!(!dbg.contains("anon-key"));
    }
}
