//! Session model persisted under a single storage key.

use serde::{Deserialize, Serialize};

/// The logged-in user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub email: String,
    pub username: String,
}

impl Session {
    /// Build a session for `email`; the username is the part before the first `@`.
    pub fn for_email(email: &str) -> Self {
        let username = email.split('@').next().unwrap_or(email).to_string();
        Self {
            email: email.to_string(),
            username,
        }
    }
}
