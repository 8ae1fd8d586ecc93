//! Admin flow: sign-in, lead list, delete confirmation, status and export.

#![allow(clippy::unwrap_used)]

use axum::http::{StatusCode, header};
use axum::Router;
use chrono::TimeDelta;
use nextrade_baas::{LeadStore, MemoryIdentityProvider, MemoryLeadStore};
use nextrade_core::{LeadId, LeadStatus, Role};
use nextrade_integration_tests::{
    admin_app, body_text, form_post, get, lead, location, send, session_cookie,
};

const ADMIN_EMAIL: &str = "ops@nextrade.com";
const ADMIN_PASSWORD: &str = "correct horse battery staple";

async fn seeded_store() -> MemoryLeadStore {
    let store = MemoryLeadStore::new();
    store
        .seed(lead(1, "Ada Lovelace", LeadStatus::New, TimeDelta::days(2)))
        .await;
    store
        .seed(lead(2, "Grace Hopper", LeadStatus::Qualified, TimeDelta::days(12)))
        .await;
    store
        .seed(lead(3, "Alan Turing", LeadStatus::Closed, TimeDelta::days(45)))
        .await;
    store
}

async fn identity() -> MemoryIdentityProvider {
    let identity = MemoryIdentityProvider::new();
    identity
        .add_user(ADMIN_EMAIL, ADMIN_PASSWORD, Role::Admin)
        .await
        .unwrap();
    identity
        .add_user("member@nextrade.com", ADMIN_PASSWORD, Role::Member)
        .await
        .unwrap();
    identity
}

/// Sign in and return the session cookie.
async fn sign_in(app: &Router) -> String {
    let body = format!(
        "email={}&password={}",
        ADMIN_EMAIL.replace('@', "%40"),
        ADMIN_PASSWORD.replace(' ', "+")
    );
    let response = send(app, form_post("/auth/login", &body, None)).await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/leads");
    let cookie = session_cookie(&response);
    assert!(cookie.starts_with("nextrade_admin_session="));
    cookie
}

// =============================================================================
// Authentication
// =============================================================================

#[tokio::test]
async fn test_leads_require_sign_in() {
    let store = seeded_store().await;
    let app = admin_app(&store, identity().await);

    for uri in ["/leads", "/leads/export", "/leads/1", "/leads/1/delete"] {
        let response = send(&app, get(uri, None)).await;
        assert_eq!(response.status(), StatusCode::SEE_OTHER, "{uri}");
        assert_eq!(location(&response), "/auth/login", "{uri}");
    }
    assert_eq!(store.calls(), 0);
}

#[tokio::test]
async fn test_wrong_password_shows_invalid_credentials() {
    let store = seeded_store().await;
    let app = admin_app(&store, identity().await);

    let response = send(
        &app,
        form_post("/auth/login", "email=ops%40nextrade.com&password=wrong", None),
    )
    .await;

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    let target = location(&response);
    assert!(target.starts_with("/auth/login?error=invalid"));

    let page = send(&app, get(&target, None)).await;
    let html = body_text(page).await;
    assert!(html.contains("Invalid credentials"));
    assert!(html.contains("value=\"ops@nextrade.com\""));
}

#[tokio::test]
async fn test_non_admin_role_cannot_sign_in() {
    let store = seeded_store().await;
    let app = admin_app(&store, identity().await);
    let body = format!(
        "email=member%40nextrade.com&password={}",
        ADMIN_PASSWORD.replace(' ', "+")
    );

    let response = send(&app, form_post("/auth/login", &body, None)).await;

    assert!(location(&response).starts_with("/auth/login?error=forbidden"));
    assert!(session_cookie(&response).is_empty());
}

#[tokio::test]
async fn test_logout_ends_session() {
    let store = seeded_store().await;
    let app = admin_app(&store, identity().await);
    let cookie = sign_in(&app).await;

    let response = send(&app, form_post("/auth/logout", "", Some(&cookie))).await;
    assert_eq!(location(&response), "/auth/login");

    let after = send(&app, get("/leads", Some(&cookie))).await;
    assert_eq!(location(&after), "/auth/login");
}

// =============================================================================
// List, stats and filters
// =============================================================================

#[tokio::test]
async fn test_dashboard_lists_newest_first_with_stats() {
    let store = seeded_store().await;
    let app = admin_app(&store, identity().await);
    let cookie = sign_in(&app).await;

    let response = send(&app, get("/leads", Some(&cookie))).await;

    assert_eq!(response.status(), StatusCode::OK);
    let html = body_text(response).await;
    assert!(html.contains("Welcome, ops@nextrade.com"));

    let ada = html.find("Ada Lovelace").unwrap();
    let grace = html.find("Grace Hopper").unwrap();
    let alan = html.find("Alan Turing").unwrap();
    assert!(ada < grace && grace < alan);

    // total 3, one this week, two this month, 2 of 3 converted
    assert!(html.contains("<span class=\"stat-value\">3</span>"));
    assert!(html.contains("<span class=\"stat-value\">1</span>"));
    assert!(html.contains("<span class=\"stat-value\">2</span>"));
    assert!(html.contains("<span class=\"stat-value\">67%</span>"));
}

#[tokio::test]
async fn test_search_and_status_filter_are_anded() {
    let store = seeded_store().await;
    let app = admin_app(&store, identity().await);
    let cookie = sign_in(&app).await;

    let response = send(&app, get("/leads?q=a&status=closed", Some(&cookie))).await;
    let html = body_text(response).await;

    assert!(html.contains("Alan Turing"));
    assert!(!html.contains("Ada Lovelace"));
    assert!(!html.contains("Grace Hopper"));
    assert!(html.contains("/leads/export?q=a&#38;status=closed"));
}

#[tokio::test]
async fn test_failed_load_shows_notice() {
    let store = seeded_store().await;
    let app = admin_app(&store, identity().await);
    let cookie = sign_in(&app).await;

    store.set_unavailable(true);
    let response = send(&app, get("/leads", Some(&cookie))).await;

    assert_eq!(response.status(), StatusCode::OK);
    assert!(body_text(response).await.contains("Failed to load leads."));
}

#[tokio::test]
async fn test_detail_view_falls_back_to_direct_source() {
    let store = seeded_store().await;
    let app = admin_app(&store, identity().await);
    let cookie = sign_in(&app).await;

    let response = send(&app, get("/leads/2", Some(&cookie))).await;
    let html = body_text(response).await;

    assert!(html.contains("Grace Hopper"));
    assert!(html.contains("Direct"));

    let missing = send(&app, get("/leads/99", Some(&cookie))).await;
    assert_eq!(location(&missing), "/leads?notice=not_found");
}

// =============================================================================
// Delete
// =============================================================================

#[tokio::test]
async fn test_confirmed_delete_removes_row() {
    let store = seeded_store().await;
    let app = admin_app(&store, identity().await);
    let cookie = sign_in(&app).await;

    let confirm = send(&app, get("/leads/1/delete", Some(&cookie))).await;
    assert_eq!(confirm.status(), StatusCode::OK);
    assert!(body_text(confirm).await.contains("Delete this lead?"));

    let response = send(&app, form_post("/leads/1/delete", "", Some(&cookie))).await;
    assert_eq!(location(&response), "/leads?notice=deleted");
    assert_eq!(store.len().await, 2);

    let page = send(&app, get("/leads?notice=deleted", Some(&cookie))).await;
    let html = body_text(page).await;
    assert!(html.contains("Lead deleted."));
    assert!(!html.contains("Ada Lovelace"));
}

#[tokio::test]
async fn test_delete_without_confirmation_makes_no_store_call() {
    let store = seeded_store().await;
    let app = admin_app(&store, identity().await);
    let cookie = sign_in(&app).await;

    // Confirmation opened for lead 2, but the post targets lead 1
    send(&app, get("/leads/2/delete", Some(&cookie))).await;
    let calls_before = store.calls();

    let response = send(&app, form_post("/leads/1/delete", "", Some(&cookie))).await;

    assert_eq!(location(&response), "/leads?notice=delete_unconfirmed");
    assert_eq!(store.calls(), calls_before);
    assert_eq!(store.len().await, 3);
}

#[tokio::test]
async fn test_cancelled_delete_discards_candidate() {
    let store = seeded_store().await;
    let app = admin_app(&store, identity().await);
    let cookie = sign_in(&app).await;

    send(&app, get("/leads/1/delete", Some(&cookie))).await;
    let cancel = send(&app, form_post("/leads/1/delete/cancel", "", Some(&cookie))).await;
    assert_eq!(location(&cancel), "/leads");

    let response = send(&app, form_post("/leads/1/delete", "", Some(&cookie))).await;
    assert_eq!(location(&response), "/leads?notice=delete_unconfirmed");
    assert_eq!(store.len().await, 3);
}

#[tokio::test]
async fn test_failed_delete_shows_notice_and_keeps_row() {
    let store = seeded_store().await;
    let app = admin_app(&store, identity().await);
    let cookie = sign_in(&app).await;

    send(&app, get("/leads/1/delete", Some(&cookie))).await;
    store.set_unavailable(true);
    let response = send(&app, form_post("/leads/1/delete", "", Some(&cookie))).await;
    assert_eq!(location(&response), "/leads?notice=delete_failed");

    store.set_unavailable(false);
    let page = send(&app, get("/leads?notice=delete_failed", Some(&cookie))).await;
    let html = body_text(page).await;
    assert!(html.contains("Failed to delete the lead."));
    assert!(html.contains("Ada Lovelace"));
}

// =============================================================================
// Status update
// =============================================================================

#[tokio::test]
async fn test_status_update_changes_row_and_conversion() {
    let store = seeded_store().await;
    let app = admin_app(&store, identity().await);
    let cookie = sign_in(&app).await;
    send(&app, get("/leads", Some(&cookie))).await;

    let response = send(
        &app,
        form_post("/leads/1/status", "status=qualified", Some(&cookie)),
    )
    .await;
    assert_eq!(location(&response), "/leads?notice=status_updated");

    let rows = store.list_newest_first().await.unwrap();
    let ada = rows.iter().find(|l| l.id == LeadId::new(1)).unwrap();
    assert_eq!(ada.status, LeadStatus::Qualified);

    let page = send(&app, get("/leads", Some(&cookie))).await;
    assert!(body_text(page).await.contains("<span class=\"stat-value\">100%</span>"));
}

#[tokio::test]
async fn test_unknown_status_is_rejected_without_store_call() {
    let store = seeded_store().await;
    let app = admin_app(&store, identity().await);
    let cookie = sign_in(&app).await;
    let calls_before = store.calls();

    let response = send(
        &app,
        form_post("/leads/1/status", "status=archived", Some(&cookie)),
    )
    .await;

    assert_eq!(location(&response), "/leads?notice=invalid_status");
    assert_eq!(store.calls(), calls_before);
}

#[tokio::test]
async fn test_failed_status_update_shows_notice() {
    let store = seeded_store().await;
    let app = admin_app(&store, identity().await);
    let cookie = sign_in(&app).await;

    store.set_unavailable(true);
    let response = send(
        &app,
        form_post("/leads/1/status", "status=closed", Some(&cookie)),
    )
    .await;

    assert_eq!(location(&response), "/leads?notice=update_failed");
}

// =============================================================================
// Export
// =============================================================================

#[tokio::test]
async fn test_export_has_header_plus_one_line_per_filtered_lead() {
    let store = seeded_store().await;
    let app = admin_app(&store, identity().await);
    let cookie = sign_in(&app).await;

    let all = send(&app, get("/leads/export", Some(&cookie))).await;
    assert_eq!(all.status(), StatusCode::OK);
    let disposition = all
        .headers()
        .get(header::CONTENT_DISPOSITION)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_owned();
    assert!(disposition.starts_with("attachment; filename=\"nextrade-leads-"));
    assert!(disposition.ends_with(".csv\""));

    let csv = body_text(all).await;
    let lines: Vec<&str> = csv.lines().collect();
    assert_eq!(lines.len(), 4);
    assert_eq!(lines[0], "Name,Email,Phone,Message,Created At");
    assert!(lines[1].starts_with("Ada Lovelace,ada@example.com,5551234567,"));

    let filtered = send(&app, get("/leads/export?status=qualified", Some(&cookie))).await;
    assert_eq!(body_text(filtered).await.lines().count(), 2);
}

#[tokio::test]
async fn test_admin_responses_carry_security_headers() {
    let store = seeded_store().await;
    let app = admin_app(&store, identity().await);

    let response = send(&app, get("/auth/login", None)).await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers().get(header::X_FRAME_OPTIONS).unwrap(),
        "DENY"
    );
    assert!(response.headers().contains_key(header::CONTENT_SECURITY_POLICY));
    assert!(response.headers().contains_key("x-request-id"));
}
