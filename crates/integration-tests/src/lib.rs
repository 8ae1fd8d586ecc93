//! Integration tests for Nextrade.
//!
//! Both routers are driven in-process with `tower::ServiceExt::oneshot`
//! against the in-memory lead store and identity provider, so no backend or
//! network is needed.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p nextrade-integration-tests
//! ```
//!
//! # Test Categories
//!
//! - `site_intake` - Contact form and JSON submission endpoint
//! - `admin_dashboard` - Sign-in, lead list, delete, status and export
//! - `lead_round_trip` - Site submissions as seen by the admin board

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, Response, header};
use chrono::{DateTime, TimeDelta, Utc};
use http_body_util::BodyExt;
use nextrade_admin::config::AdminConfig;
use nextrade_baas::{BaasConfig, MemoryIdentityProvider, MemoryLeadStore};
use nextrade_core::{Lead, LeadId, LeadStatus};
use nextrade_site::config::SiteConfig;
use secrecy::SecretString;
use tower::ServiceExt;

fn baas() -> BaasConfig {
    BaasConfig::new(
        "http://127.0.0.1:54321",
        SecretString::from("test-key-not-used"),
    )
    .unwrap_or_else(|e| panic!("test backend config: {e}"))
}

/// Site configuration pointing at nothing; the store is injected.
#[must_use]
pub fn site_config() -> SiteConfig {
    SiteConfig {
        host: [127, 0, 0, 1].into(),
        port: 3000,
        base_url: "http://localhost:3000".to_string(),
        baas: baas(),
        whatsapp_number: None,
        sentry_dsn: None,
        sentry_environment: None,
        sentry_sample_rate: 1.0,
        sentry_traces_sample_rate: 1.0,
    }
}

/// Admin configuration pointing at nothing; collaborators are injected.
#[must_use]
pub fn admin_config() -> AdminConfig {
    AdminConfig {
        host: [127, 0, 0, 1].into(),
        port: 3001,
        base_url: "http://localhost:3001".to_string(),
        identity: baas(),
        store: baas(),
        sentry_dsn: None,
        sentry_environment: None,
        sentry_sample_rate: 1.0,
        sentry_traces_sample_rate: 1.0,
    }
}

/// Public site router over `store`.
#[must_use]
pub fn site_app(store: &MemoryLeadStore) -> Router {
    let state = nextrade_site::state::AppState::new(site_config(), Arc::new(store.clone()));
    nextrade_site::app(state)
}

/// Admin router over `store` and `identity`.
#[must_use]
pub fn admin_app(store: &MemoryLeadStore, identity: MemoryIdentityProvider) -> Router {
    let state = nextrade_admin::state::AppState::new(
        admin_config(),
        Arc::new(store.clone()),
        Arc::new(identity),
    );
    nextrade_admin::app(state)
}

/// A stored lead created `age` ago.
#[must_use]
pub fn lead(id: i64, name: &str, status: LeadStatus, age: TimeDelta) -> Lead {
    Lead {
        id: LeadId::new(id),
        name: name.to_owned(),
        email: format!("{}@example.com", name.split(' ').next().unwrap_or(name).to_lowercase()),
        phone: "5551234567".into(),
        interest: Some("Bitcoin".into()),
        company: None,
        source: None,
        message: "Please call me about margin accounts".into(),
        status,
        created_at: now_minus(age),
        idempotency_key: None,
    }
}

fn now_minus(age: TimeDelta) -> DateTime<Utc> {
    Utc::now() - age
}

/// Send one request through a clone of `app`.
pub async fn send(app: &Router, request: Request<Body>) -> Response<Body> {
    app.clone()
        .oneshot(request)
        .await
        .unwrap_or_else(|e| match e {})
}

/// Collect a response body as UTF-8.
pub async fn body_text(response: Response<Body>) -> String {
    let bytes = response
        .into_body()
        .collect()
        .await
        .map(http_body_util::Collected::to_bytes)
        .unwrap_or_default();
    String::from_utf8_lossy(&bytes).into_owned()
}

/// `Location` header of a redirect, or empty.
#[must_use]
pub fn location<B>(response: &Response<B>) -> String {
    response
        .headers()
        .get(header::LOCATION)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_owned()
}

/// `name=value` of the first `Set-Cookie` header, or empty.
#[must_use]
pub fn session_cookie<B>(response: &Response<B>) -> String {
    response
        .headers()
        .get(header::SET_COOKIE)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(';').next())
        .unwrap_or_default()
        .to_owned()
}

/// Form-encoded POST.
#[must_use]
pub fn form_post(uri: &str, body: &str, cookie: Option<&str>) -> Request<Body> {
    let mut builder = Request::post(uri)
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .header("x-forwarded-for", "203.0.113.10");
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    builder
        .body(Body::from(body.to_owned()))
        .unwrap_or_else(|e| panic!("request: {e}"))
}

/// Plain GET, optionally with a session cookie.
#[must_use]
pub fn get(uri: &str, cookie: Option<&str>) -> Request<Body> {
    let mut builder = Request::get(uri);
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    builder
        .body(Body::empty())
        .unwrap_or_else(|e| panic!("request: {e}"))
}
