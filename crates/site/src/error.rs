//! Error handling for the JSON intake endpoint, with Sentry integration.
//!
//! Every error renders as `{"error": "..."}`. Store failures are captured to
//! Sentry and logged with the underlying cause; the client only ever sees the
//! generic message.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use nextrade_core::leads::MissingFields;
use serde::Serialize;
use thiserror::Error;

use crate::services::IntakeError;

/// Application-level error type for the site's API routes.
#[derive(Debug, Error)]
pub enum AppError {
    /// A required submission field was absent or blank.
    #[error("Missing required fields")]
    MissingFields(#[from] MissingFields),

    /// The body was not valid JSON for a submission.
    #[error("Invalid request body: {0}")]
    InvalidBody(String),

    /// The idempotency key was not a UUID.
    #[error("Invalid idempotency key")]
    InvalidIdempotencyKey,

    /// The insert failed.
    #[error("Intake error: {0}")]
    Intake(#[from] IntakeError),
}

#[derive(Serialize)]
struct ErrorBody<'a> {
    error: &'a str,
}

impl AppError {
    /// Message returned to the client.
    #[must_use]
    pub const fn public_message(&self) -> &'static str {
        match self {
            Self::MissingFields(_) => "Missing required fields",
            Self::InvalidBody(_) => "Invalid request body",
            Self::InvalidIdempotencyKey => "Invalid idempotency key",
            Self::Intake(_) => "Failed to insert lead",
        }
    }

    #[must_use]
    pub const fn status(&self) -> StatusCode {
        match self {
            Self::MissingFields(_) | Self::InvalidBody(_) | Self::InvalidIdempotencyKey => {
                StatusCode::BAD_REQUEST
            }
            Self::Intake(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // Capture server errors to Sentry
        if matches!(self, Self::Intake(_)) {
            let event_id = sentry::capture_error(&self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Request error"
            );
        }

        let body = ErrorBody {
            error: self.public_message(),
        };
        (self.status(), Json(body)).into_response()
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;
