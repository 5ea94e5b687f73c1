//! Sign-up page. Submissions are validated and acknowledged, never stored.

use std::time::Instant;

use axum::{extract::State, http::StatusCode, response::Response, Form};
use serde::Serialize;

use super::{render_page, LOADING_REFRESH_SECS};
use crate::errors::AppError;
use crate::forms::{FieldErrors, SignupFlow, SignupForm, SignupPhase, SubmitOutcome};
use crate::AppState;

/// Fields echoed back into the form; passwords never are.
#[derive(Debug, Serialize)]
struct Draft<'a> {
    name: &'a str,
    email: &'a str,
}

#[derive(Debug, Serialize)]
struct SignupPage<'a> {
    phase: &'static str,
    form: Draft<'a>,
    errors: &'a FieldErrors,
    refresh_after: Option<u64>,
    refresh_url: &'static str,
}

impl<'a> SignupPage<'a> {
    fn new(flow: &'a SignupFlow, phase: SignupPhase) -> Self {
        let (name, refresh_after) = match phase {
            SignupPhase::Editing => ("editing", None),
            SignupPhase::Submitting => ("submitting", Some(LOADING_REFRESH_SECS)),
            // Reload once the confirmation has expired so the form comes back
            SignupPhase::Submitted { .. } => {
                ("submitted", Some(flow.reset_after().as_secs().max(1)))
            }
        };

        Self {
            phase: name,
            form: Draft {
                name: &flow.draft().name,
                email: &flow.draft().email,
            },
            errors: flow.errors(),
            refresh_after,
            refresh_url: "/signup",
        }
    }
}

/// GET /signup - Show the sign-up form or its confirmation.
pub async fn signup_page(State(state): State<AppState>) -> Result<Response, AppError> {
    let mut flow = state.signup.lock().await;
    let phase = flow.observe(Instant::now());
    render_page(
        &state,
        StatusCode::OK,
        "signup.html",
        SignupPage::new(&flow, phase),
    )
}

/// POST /signup - Validate and acknowledge a sign-up.
pub async fn signup_submit(
    State(state): State<AppState>,
    Form(form): Form<SignupForm>,
) -> Result<Response, AppError> {
    let outcome = state.signup.lock().await.submit(form, Instant::now());

    let status = match outcome {
        SubmitOutcome::Accepted { delay } => {
            tokio::time::sleep(delay).await;
            state.signup.lock().await.finish(Instant::now());
            StatusCode::OK
        }
        SubmitOutcome::Rejected => {
            AppError::Validation("Sign-up form has errors".to_string()).status_code()
        }
        SubmitOutcome::Busy => StatusCode::CONFLICT,
    };

    let mut flow = state.signup.lock().await;
    let phase = flow.observe(Instant::now());
    render_page(&state, status, "signup.html", SignupPage::new(&flow, phase))
}
