//! Contact page and form handler.
//!
//! The form posts back to `/contact` and the response is the re-rendered page:
//!
//! - validation failure: 422, every invalid field flagged, the first one (in
//!   display order) as the page notice, values kept, no store call;
//! - store failure: 500, generic notice, values and idempotency token kept so a
//!   resubmission cannot insert twice;
//! - success: 200, success notice, empty form and a fresh token.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use nextrade_core::IdempotencyKey;
use nextrade_core::leads::{ContactField, ContactForm, ValidationErrors};
use serde::Deserialize;
use tracing::instrument;

use crate::content::INTEREST_OPTIONS;
use crate::filters;
use crate::services::IntakeOutcome;
use crate::state::AppState;

/// Shown after a lead is stored (or recognised as already stored).
pub const SUCCESS_NOTICE: &str =
    "Thank you! Your request has been received. Our team will contact you shortly.";

/// Shown when the store rejects the insert.
pub const FAILURE_NOTICE: &str = "We couldn't submit your request. Please try again.";

/// Posted form body: the contact fields plus the attempt's token.
#[derive(Debug, Deserialize)]
pub struct ContactSubmission {
    #[serde(flatten)]
    pub form: ContactForm,
    #[serde(default)]
    pub idempotency_key: String,
}

/// Banner above the form.
#[derive(Debug, Clone)]
pub struct Notice {
    pub success: bool,
    pub message: &'static str,
}

/// Per-field messages, one slot per input.
#[derive(Debug, Clone, Default)]
pub struct FieldMessages {
    pub first_name: Option<&'static str>,
    pub last_name: Option<&'static str>,
    pub email: Option<&'static str>,
    pub phone: Option<&'static str>,
    pub interest: Option<&'static str>,
    pub message: Option<&'static str>,
}

impl From<&ValidationErrors> for FieldMessages {
    fn from(errors: &ValidationErrors) -> Self {
        Self {
            first_name: errors.get(ContactField::FirstName),
            last_name: errors.get(ContactField::LastName),
            email: errors.get(ContactField::Email),
            phone: errors.get(ContactField::Phone),
            interest: errors.get(ContactField::Interest),
            message: errors.get(ContactField::Message),
        }
    }
}

/// Contact page template.
#[derive(Template, WebTemplate)]
#[template(path = "contact.html")]
pub struct ContactTemplate {
    pub form: ContactForm,
    pub errors: FieldMessages,
    pub notice: Option<Notice>,
    pub idempotency_key: IdempotencyKey,
    pub interests: &'static [&'static str],
    pub whatsapp_number: Option<String>,
}

impl ContactTemplate {
    fn new(state: &AppState) -> Self {
        Self {
            form: ContactForm::default(),
            errors: FieldMessages::default(),
            notice: None,
            idempotency_key: IdempotencyKey::generate(),
            interests: INTEREST_OPTIONS,
            whatsapp_number: state.config().whatsapp_number.clone(),
        }
    }

    /// Whether `option` is the currently selected interest.
    #[must_use]
    pub fn interest_selected(&self, option: impl AsRef<str>) -> bool {
        self.form.interest.trim() == option.as_ref()
    }
}

/// GET /contact
#[instrument(skip(state))]
pub async fn show(State(state): State<AppState>) -> impl IntoResponse {
    ContactTemplate::new(&state)
}

/// POST /contact
#[instrument(skip(state, submission))]
pub async fn submit(
    State(state): State<AppState>,
    Form(submission): Form<ContactSubmission>,
) -> Response {
    let ContactSubmission {
        form,
        idempotency_key,
    } = submission;

    let key = IdempotencyKey::parse(&idempotency_key).unwrap_or_else(|_| {
        tracing::debug!("Contact form posted without a usable token, minting one");
        IdempotencyKey::generate()
    });

    let lead = match form.validate() {
        Ok(lead) => lead.with_idempotency_key(Some(key)),
        Err(errors) => {
            let notice = errors.first().map(|e| Notice {
                success: false,
                message: e.message,
            });
            tracing::debug!(invalid_fields = errors.len(), "Contact form rejected");
            let page = ContactTemplate {
                errors: FieldMessages::from(&errors),
                notice,
                idempotency_key: key,
                form,
                ..ContactTemplate::new(&state)
            };
            return (StatusCode::UNPROCESSABLE_ENTITY, page).into_response();
        }
    };

    match state.intake().submit(lead).await {
        Ok(outcome) => {
            if let IntakeOutcome::Created(id) = outcome {
                tracing::info!(lead_id = %id, "Contact form lead stored");
            }
            ContactTemplate {
                notice: Some(Notice {
                    success: true,
                    message: SUCCESS_NOTICE,
                }),
                ..ContactTemplate::new(&state)
            }
            .into_response()
        }
        Err(e) => {
            let event_id = sentry::capture_error(&e);
            tracing::error!(
                error = %e,
                sentry_event_id = %event_id,
                "Failed to store contact form lead"
            );
            let page = ContactTemplate {
                notice: Some(Notice {
                    success: false,
                    message: FAILURE_NOTICE,
                }),
                idempotency_key: key,
                form,
                ..ContactTemplate::new(&state)
            };
            (StatusCode::INTERNAL_SERVER_ERROR, page).into_response()
        }
    }
}
