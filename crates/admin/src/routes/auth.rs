//! Sign-in and sign-out.
//!
//! Credentials go to the hosted identity provider; only accounts whose role
//! claim is `admin` get a session. Failures come back to the login page as
//! `?error=<code>`.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Query, State},
    response::{IntoResponse, Redirect, Response},
};
use nextrade_baas::AuthError;
use nextrade_core::Email;
use secrecy::SecretString;
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use crate::error::{Result, clear_sentry_user, set_sentry_user};
use crate::filters;
use crate::middleware::{OptionalAdminAuth, clear_current_admin, set_current_admin};
use crate::models::{CurrentAdmin, LoginError};
use crate::state::AppState;

/// Login page template.
#[derive(Template, WebTemplate)]
#[template(path = "auth/login.html")]
pub struct LoginTemplate {
    pub error: Option<&'static str>,
    pub email: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct LoginQuery {
    #[serde(default)]
    pub error: String,
    #[serde(default)]
    pub email: String,
}

/// Posted credentials.
#[derive(Deserialize)]
pub struct LoginForm {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

/// GET /auth/login
#[instrument(skip(admin, query))]
pub async fn login_page(
    OptionalAdminAuth(admin): OptionalAdminAuth,
    Query(query): Query<LoginQuery>,
) -> Response {
    if admin.is_some_and(|a| a.role.is_admin()) {
        return Redirect::to("/leads").into_response();
    }

    LoginTemplate {
        error: LoginError::from_code(&query.error).map(LoginError::message),
        email: query.email,
    }
    .into_response()
}

/// POST /auth/login
#[instrument(skip(state, session, form))]
pub async fn login(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<LoginForm>,
) -> Result<Redirect> {
    let Ok(email) = Email::parse(&form.email) else {
        return Ok(rejected(LoginError::Invalid, &form.email));
    };
    let password = SecretString::from(form.password);

    let user = match state.identity().sign_in(&email, &password).await {
        Ok(user) => user,
        Err(AuthError::InvalidCredentials) => {
            tracing::info!(email = %email, "Sign-in rejected");
            return Ok(rejected(LoginError::Invalid, email.as_str()));
        }
        Err(e) => {
            let event_id = sentry::capture_error(&e);
            tracing::error!(
                error = %e,
                sentry_event_id = %event_id,
                "Identity provider sign-in failed"
            );
            return Ok(rejected(LoginError::Unavailable, email.as_str()));
        }
    };

    if !user.role.is_admin() {
        tracing::warn!(user_id = %user.id, role = %user.role, "Sign-in without admin role");
        return Ok(rejected(LoginError::Forbidden, email.as_str()));
    }

    let admin = CurrentAdmin::from(user);

    // New session ID on privilege change
    session.cycle_id().await?;
    set_current_admin(&session, &admin).await?;
    set_sentry_user(&admin.id, admin.email.as_str());

    tracing::info!(admin_id = %admin.id, "Admin signed in");
    Ok(Redirect::to("/leads"))
}

/// Back to the login page with the error and the typed address.
fn rejected(error: LoginError, email: &str) -> Redirect {
    Redirect::to(&format!(
        "{}&email={}",
        error.location(),
        urlencoding::encode(email.trim())
    ))
}

/// POST /auth/logout
#[instrument(skip(session))]
pub async fn logout(session: Session) -> Result<Redirect> {
    clear_current_admin(&session).await?;
    clear_sentry_user();
    Ok(Redirect::to("/auth/login"))
}
