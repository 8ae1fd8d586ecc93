//! JSON lead submission endpoint.
//!
//! ```text
//! POST /api/submit-lead
//! Idempotency-Key: <uuid>            (optional, wins over the body field)
//! {"name", "email", "phone", "interest", "message", "company"?, "idempotency_key"?}
//! ```

use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
    http::HeaderMap,
};
use nextrade_core::IdempotencyKey;
use nextrade_core::leads::LeadSubmission;
use serde::Serialize;
use tracing::instrument;

use crate::error::{AppError, Result};
use crate::services::IntakeOutcome;
use crate::state::AppState;

/// Header carrying the submission attempt's key.
pub const IDEMPOTENCY_KEY_HEADER: &str = "idempotency-key";

/// Body of a successful (or deduplicated) submission.
#[derive(Debug, Serialize)]
pub struct SubmitResponse {
    pub message: &'static str,
}

const SUCCESS_MESSAGE: &str = "Lead submitted successfully";

/// POST /api/submit-lead
///
/// Presence of the required fields is checked before the key, so a request
/// that is both incomplete and badly keyed reports the missing fields.
#[instrument(skip(state, headers, body))]
pub async fn submit_lead(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: std::result::Result<Json<LeadSubmission>, JsonRejection>,
) -> Result<Json<SubmitResponse>> {
    let Json(submission) = body.map_err(|e| AppError::InvalidBody(e.body_text()))?;

    let body_key = submission.idempotency_key.clone();
    let lead = submission.into_new_lead()?;

    let header_key = headers
        .get(IDEMPOTENCY_KEY_HEADER)
        .map(|v| v.to_str().map_err(|_| AppError::InvalidIdempotencyKey))
        .transpose()?;
    let key = select_key(header_key, body_key.as_deref())
        .map(|k| IdempotencyKey::parse(k).map_err(|_| AppError::InvalidIdempotencyKey))
        .transpose()?;

    match state.intake().submit(lead.with_idempotency_key(key)).await? {
        IntakeOutcome::Created(id) => tracing::info!(lead_id = %id, "Lead submitted via API"),
        IntakeOutcome::Accepted => tracing::info!("Lead submitted via API"),
        IntakeOutcome::Duplicate => tracing::info!("Duplicate API submission acknowledged"),
    }

    Ok(Json(SubmitResponse {
        message: SUCCESS_MESSAGE,
    }))
}

/// The non-blank header key, else the non-blank body key.
fn select_key<'a>(header: Option<&'a str>, body: Option<&'a str>) -> Option<&'a str> {
    let present = |k: Option<&'a str>| k.map(str::trim).filter(|k| !k.is_empty());
    present(header).or_else(|| present(body))
}

#[cfg(test)]
mod tests {
    use super::*;

    const KEY: &str = "6f1c1c8e-2f47-4c36-9a53-6c1f0e8f3b21";

    #[test]
    fn test_header_key_wins() {
        let other = "0d4f7a3e-8b1c-4e55-9f0a-2c6b7d8e9f10";
        assert_eq!(select_key(Some(KEY), Some(other)), Some(KEY));
    }

    #[test]
    fn test_blank_header_falls_back_to_body() {
        assert_eq!(select_key(Some("   "), Some(KEY)), Some(KEY));
        assert_eq!(select_key(Some(""), Some(KEY)), Some(KEY));
    }

    #[test]
    fn test_no_usable_key() {
        assert_eq!(select_key(Some(" "), Some("")), None);
        assert_eq!(select_key(None, None), None);
    }
}
