//! Lead dashboard: list, detail, delete, status and export.
//!
//! Every page renders from the shared [`LeadSnapshot`]. The list page
//! refreshes it; the other reads use whatever is installed (fetching once if
//! nothing is). Mutations go through the board and come back to the list
//! with a `?notice=` code, so store failures are always visible.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Path, Query, State},
    http::header::{CONTENT_DISPOSITION, CONTENT_TYPE},
    response::{IntoResponse, Redirect, Response},
};
use chrono::Utc;
use nextrade_core::leads::{LeadFilter, LeadStats, export_csv, export_filename};
use nextrade_core::{Lead, LeadId, LeadStatus};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use crate::error::Result;
use crate::filters;
use crate::middleware::RequireAdminAuth;
use crate::models::{DashboardNotice, session_keys};
use crate::services::{BoardError, LeadSnapshot};
use crate::state::AppState;

// =============================================================================
// Templates
// =============================================================================

/// Lead list with stats and filters.
#[derive(Template, WebTemplate)]
#[template(path = "leads/index.html")]
pub struct LeadsTemplate {
    pub admin_email: String,
    pub notice: Option<DashboardNotice>,
    pub stats: LeadStats,
    pub leads: Vec<Lead>,
    pub filter: LeadFilter,
    pub statuses: [LeadStatus; 4],
    pub export_href: String,
    pub fetched_at: String,
    pub loaded: bool,
}

impl LeadsTemplate {
    fn new(
        admin_email: String,
        snapshot: &LeadSnapshot,
        filter: LeadFilter,
        notice: Option<DashboardNotice>,
    ) -> Self {
        let leads = filter.apply(&snapshot.leads).into_iter().cloned().collect();
        Self {
            admin_email,
            notice,
            stats: snapshot.stats,
            leads,
            export_href: export_href(&filter),
            filter,
            statuses: LeadStatus::ALL,
            fetched_at: snapshot.fetched_at.format("%-I:%M:%S %p UTC").to_string(),
            loaded: snapshot.is_loaded(),
        }
    }

    /// Whether `value` is the status currently filtered on.
    #[must_use]
    pub fn status_selected(&self, value: &str) -> bool {
        self.filter.status.is_some_and(|s| s.as_str() == value)
    }
}

/// One lead with every field.
#[derive(Template, WebTemplate)]
#[template(path = "leads/show.html")]
pub struct LeadTemplate {
    pub admin_email: String,
    pub lead: Lead,
    pub statuses: [LeadStatus; 4],
}

/// Delete confirmation step.
#[derive(Template, WebTemplate)]
#[template(path = "leads/confirm_delete.html")]
pub struct ConfirmDeleteTemplate {
    pub admin_email: String,
    pub lead: Lead,
}

// =============================================================================
// Request types
// =============================================================================

#[derive(Debug, Default, Deserialize)]
pub struct NoticeQuery {
    #[serde(default)]
    pub notice: String,
}

#[derive(Debug, Deserialize)]
pub struct StatusForm {
    #[serde(default)]
    pub status: String,
}

// =============================================================================
// Handlers
// =============================================================================

/// GET /leads
#[instrument(skip(state, admin))]
pub async fn index(
    State(state): State<AppState>,
    RequireAdminAuth(admin): RequireAdminAuth,
    Query(filter): Query<LeadFilter>,
    Query(query): Query<NoticeQuery>,
) -> Response {
    let mut notice = DashboardNotice::from_code(&query.notice);

    let snapshot = match state.board().refresh().await {
        Ok(snapshot) => snapshot,
        Err(e) => {
            report(&e);
            notice = Some(DashboardNotice::LoadFailed);
            state.board().snapshot().await
        }
    };

    LeadsTemplate::new(admin.email.into_inner(), &snapshot, filter, notice).into_response()
}

/// GET /leads/export
#[instrument(skip(state, _admin))]
pub async fn export(
    State(state): State<AppState>,
    RequireAdminAuth(_admin): RequireAdminAuth,
    Query(filter): Query<LeadFilter>,
) -> Response {
    let snapshot = match state.board().loaded_snapshot().await {
        Ok(snapshot) => snapshot,
        Err(e) => return failed(&e, DashboardNotice::LoadFailed),
    };

    let rows = filter.apply(&snapshot.leads);
    tracing::info!(rows = rows.len(), "Leads exported");

    let filename = export_filename(Utc::now().date_naive());
    (
        [
            (CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
            (
                CONTENT_DISPOSITION,
                format!("attachment; filename=\"{filename}\""),
            ),
        ],
        export_csv(rows),
    )
        .into_response()
}

/// GET /leads/{id}
#[instrument(skip(state, admin))]
pub async fn show(
    State(state): State<AppState>,
    RequireAdminAuth(admin): RequireAdminAuth,
    Path(id): Path<LeadId>,
) -> Response {
    let snapshot = match state.board().loaded_snapshot().await {
        Ok(snapshot) => snapshot,
        Err(e) => return failed(&e, DashboardNotice::LoadFailed),
    };

    match snapshot.get(id) {
        Some(lead) => LeadTemplate {
            admin_email: admin.email.into_inner(),
            lead: lead.clone(),
            statuses: LeadStatus::ALL,
        }
        .into_response(),
        None => Redirect::to(&DashboardNotice::NotFound.location()).into_response(),
    }
}

/// GET /leads/{id}/delete
///
/// Records `id` as the only lead the next confirm may delete.
#[instrument(skip(state, admin, session))]
pub async fn confirm_delete(
    State(state): State<AppState>,
    RequireAdminAuth(admin): RequireAdminAuth,
    session: Session,
    Path(id): Path<LeadId>,
) -> Result<Response> {
    let snapshot = match state.board().loaded_snapshot().await {
        Ok(snapshot) => snapshot,
        Err(e) => return Ok(failed(&e, DashboardNotice::LoadFailed)),
    };

    let Some(lead) = snapshot.get(id) else {
        return Ok(Redirect::to(&DashboardNotice::NotFound.location()).into_response());
    };

    session.insert(session_keys::PENDING_DELETE, id).await?;

    Ok(ConfirmDeleteTemplate {
        admin_email: admin.email.into_inner(),
        lead: lead.clone(),
    }
    .into_response())
}

/// POST /leads/{id}/delete
///
/// Deletes only when `id` matches the candidate recorded by the
/// confirmation page. The candidate is consumed either way.
#[instrument(skip(state, admin, session))]
pub async fn delete(
    State(state): State<AppState>,
    RequireAdminAuth(admin): RequireAdminAuth,
    session: Session,
    Path(id): Path<LeadId>,
) -> Result<Redirect> {
    let pending = session
        .remove::<LeadId>(session_keys::PENDING_DELETE)
        .await?;

    if pending != Some(id) {
        tracing::warn!(
            lead_id = %id,
            pending = ?pending,
            "Delete without matching confirmation"
        );
        return Ok(Redirect::to(&DashboardNotice::DeleteUnconfirmed.location()));
    }

    let notice = match state.board().delete(id).await {
        Ok(outcome) => {
            tracing::info!(lead_id = %id, admin_id = %admin.id, ?outcome, "Lead removed");
            DashboardNotice::Deleted
        }
        Err(e) => {
            report(&e);
            DashboardNotice::DeleteFailed
        }
    };

    Ok(Redirect::to(&notice.location()))
}

/// POST /leads/{id}/delete/cancel
#[instrument(skip(_admin, session))]
pub async fn cancel_delete(
    RequireAdminAuth(_admin): RequireAdminAuth,
    session: Session,
    Path(id): Path<LeadId>,
) -> Result<Redirect> {
    session
        .remove::<LeadId>(session_keys::PENDING_DELETE)
        .await?;
    tracing::debug!(lead_id = %id, "Delete cancelled");
    Ok(Redirect::to("/leads"))
}

/// POST /leads/{id}/status
#[instrument(skip(state, admin, form))]
pub async fn update_status(
    State(state): State<AppState>,
    RequireAdminAuth(admin): RequireAdminAuth,
    Path(id): Path<LeadId>,
    Form(form): Form<StatusForm>,
) -> Redirect {
    let Ok(status) = form.status.trim().parse::<LeadStatus>() else {
        return Redirect::to(&DashboardNotice::InvalidStatus.location());
    };

    let notice = match state.board().update_status(id, status).await {
        Ok(outcome) => {
            tracing::info!(lead_id = %id, admin_id = %admin.id, %status, ?outcome, "Lead reclassified");
            DashboardNotice::StatusUpdated
        }
        Err(e) => {
            report(&e);
            DashboardNotice::UpdateFailed
        }
    };

    Redirect::to(&notice.location())
}

// =============================================================================
// Helpers
// =============================================================================

/// Log a board failure and capture it to Sentry.
fn report(error: &BoardError) {
    let event_id = sentry::capture_error(error);
    tracing::error!(
        error = %error,
        sentry_event_id = %event_id,
        "Lead board operation failed"
    );
}

fn failed(error: &BoardError, notice: DashboardNotice) -> Response {
    report(error);
    Redirect::to(&notice.location()).into_response()
}

/// Export link that carries the active filter.
fn export_href(filter: &LeadFilter) -> String {
    let mut params = Vec::new();
    if !filter.search.trim().is_empty() {
        params.push(format!("q={}", urlencoding::encode(filter.search.trim())));
    }
    if let Some(status) = filter.status {
        params.push(format!("status={}", status.as_str()));
    }

    if params.is_empty() {
        "/leads/export".to_string()
    } else {
        format!("/leads/export?{}", params.join("&"))
    }
}
