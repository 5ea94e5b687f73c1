//! Session-based access control.
//!
//! Credentials are checked through a [`CredentialVerifier`]; the default
//! verifier compares against the configured demo pair in constant time.

mod session;

pub use session::*;

use std::sync::Arc;

use axum::{
    extract::Request,
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use subtle::ConstantTimeEq;

/// Path unauthenticated visitors are sent to.
pub const LOGIN_PATH: &str = "/login";

/// Decides whether an email/password pair may log in.
pub trait CredentialVerifier: Send + Sync + 'static {
    fn verify(&self, email: &str, password: &str) -> bool;
}

/// Verifier backed by a single configured credential pair.
#[derive(Debug, Clone)]
pub struct ConfiguredCredentials {
    username: Option<String>,
    password: Option<String>,
}

impl ConfiguredCredentials {
    pub fn new(username: Option<String>, password: Option<String>) -> Self {
        Self { username, password }
    }

    /// Whether both halves of the pair are configured.
    pub fn is_configured(&self) -> bool {
        self.username.is_some() && self.password.is_some()
    }
}

impl CredentialVerifier for ConfiguredCredentials {
    fn verify(&self, email: &str, password: &str) -> bool {
        let (Some(expected_user), Some(expected_password)) = (&self.username, &self.password)
        else {
            return false;
        };

        // Both halves are always compared
        let user_ok = constant_time_compare(email, expected_user);
        let password_ok = constant_time_compare(password, expected_password);
        user_ok & password_ok
    }
}

/// Session gate layer function that takes the session store as a parameter.
///
/// Requests without a current session are redirected to the login page.
pub async fn session_gate(sessions: Arc<SessionStore>, request: Request, next: Next) -> Response {
    if sessions.is_authenticated().await {
        return next.run(request).await;
    }

    tracing::debug!(path = %request.uri().path(), "No session, redirecting to login");
    Redirect::to(LOGIN_PATH).into_response()
}

/// Perform constant-time string comparison.
fn constant_time_compare(a: &str, b: &str) -> bool {
    let a_bytes = a.as_bytes();
    let b_bytes = b.as_bytes();

    // Constant-time comparison
    a_bytes.ct_eq(b_bytes).into()
}
