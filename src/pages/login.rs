//! Login and logout.

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
    Form,
};
use serde::Serialize;

use super::render_page;
use crate::auth::LOGIN_PATH;
use crate::errors::AppError;
use crate::forms::{FieldErrors, LoginForm};
use crate::AppState;

/// Message shown when the credentials do not match.
pub const INVALID_CREDENTIALS_MESSAGE: &str = "Invalid email or password";

#[derive(Debug, Default, Serialize)]
struct LoginPage<'a> {
    email: &'a str,
    errors: FieldErrors,
    login_error: Option<String>,
}

/// GET /login - Show the login form.
pub async fn login_page(State(state): State<AppState>) -> Result<Response, AppError> {
    if state.sessions.is_authenticated().await {
        return Ok(Redirect::to("/").into_response());
    }
    render_page(&state, StatusCode::OK, "login.html", LoginPage::default())
}

/// POST /login - Validate the form and attempt a login.
pub async fn login_submit(
    State(state): State<AppState>,
    Form(form): Form<LoginForm>,
) -> Result<Response, AppError> {
    let errors = form.validate();
    if !errors.is_empty() {
        let rejection = AppError::Validation(format!("{} field(s) need attention", errors.len()));
        tracing::debug!(code = rejection.error_code(), "{}", rejection.message());
        return render_page(
            &state,
            rejection.status_code(),
            "login.html",
            LoginPage {
                email: &form.email,
                errors,
                login_error: None,
            },
        );
    }

    if state.sessions.login(&form.email, &form.password).await? {
        return Ok(Redirect::to("/").into_response());
    }

    let rejection = AppError::Unauthorized(INVALID_CREDENTIALS_MESSAGE.to_string());
    render_page(
        &state,
        rejection.status_code(),
        "login.html",
        LoginPage {
            email: &form.email,
            errors: FieldErrors::new(),
            login_error: Some(rejection.user_message()),
        },
    )
}

/// POST /logout - End the session.
pub async fn logout(State(state): State<AppState>) -> Response {
    state.sessions.logout().await;
    Redirect::to(LOGIN_PATH).into_response()
}
