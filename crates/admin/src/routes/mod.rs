//! HTTP route handlers for admin.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health                     - Liveness
//! GET  /health/ready               - Readiness (lead table reachable)
//! GET  /                           - Redirect to /leads
//!
//! # Auth (email + password via the identity provider)
//! GET  /auth/login                 - Login page (?error=)
//! POST /auth/login                 - Sign in
//! POST /auth/logout                - Sign out
//!
//! # Leads (admin role required)
//! GET  /leads                      - List, stats and filters (?q=&status=&notice=)
//! GET  /leads/export               - CSV of the filtered list
//! GET  /leads/{id}                 - Detail
//! GET  /leads/{id}/delete          - Delete confirmation
//! POST /leads/{id}/delete          - Confirm delete
//! POST /leads/{id}/delete/cancel   - Cancel delete
//! POST /leads/{id}/status          - Update status
//! ```

pub mod auth;
pub mod health;
pub mod leads;

use axum::{
    Router,
    response::Redirect,
    routing::{get, post},
};

use crate::state::AppState;

/// Build the admin router (without middleware).
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(|| async { Redirect::to("/leads") }))
        .route("/health", get(health::health))
        .route("/health/ready", get(health::readiness))
        .route("/auth/login", get(auth::login_page).post(auth::login))
        .route("/auth/logout", post(auth::logout))
        .route("/leads", get(leads::index))
        .route("/leads/export", get(leads::export))
        .route("/leads/{id}", get(leads::show))
        .route(
            "/leads/{id}/delete",
            get(leads::confirm_delete).post(leads::delete),
        )
        .route("/leads/{id}/delete/cancel", post(leads::cancel_delete))
        .route("/leads/{id}/status", post(leads::update_status))
}
