//! HTTP route handlers for the site.
//!
//! # Route Structure
//!
//! ```text
//! GET  /                  - Landing page
//! GET  /contact           - Contact page with form
//! POST /contact           - Contact form submission (rate limited)
//! POST /api/submit-lead   - JSON lead submission (rate limited)
//! GET  /health            - Liveness
//! GET  /health/ready      - Readiness (store reachable)
//! ```

pub mod api;
pub mod contact;
pub mod health;
pub mod home;

use axum::{
    Router,
    routing::{get, post},
};

use crate::middleware::intake_rate_limiter;
use crate::state::AppState;

/// Routes that write to the lead table, behind a per-IP limiter.
pub fn intake_routes() -> Router<AppState> {
    Router::new()
        .route("/contact", post(contact::submit))
        .route("/api/submit-lead", post(api::submit_lead))
        .route_layer(intake_rate_limiter())
}

/// Create the main routes router.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(home::index))
        .route("/contact", get(contact::show))
        .merge(intake_routes())
        .route("/health", get(health::health))
        .route("/health/ready", get(health::readiness))
}
