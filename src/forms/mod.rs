//! Login and sign-up form validation.
//!
//! Each field reports at most one message: the first rule it breaks.

mod signup;

pub use signup::*;

use std::collections::BTreeMap;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Deserialize;

/// Minimum password length for both forms.
pub const MIN_PASSWORD_LENGTH: usize = 8;

static EMAIL_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("valid email pattern"));

/// Validation messages keyed by form field name.
pub type FieldErrors = BTreeMap<&'static str, String>;

/// Submitted login form.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LoginForm {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

impl LoginForm {
    pub fn validate(&self) -> FieldErrors {
        let mut errors = FieldErrors::new();

        if self.email.is_empty() {
            errors.insert("email", "Email is required".to_string());
        }

        if self.password.is_empty() {
            errors.insert("password", "Password is required".to_string());
        } else if self.password.chars().count() < MIN_PASSWORD_LENGTH {
            errors.insert(
                "password",
                format!("Password must be at least {} characters", MIN_PASSWORD_LENGTH),
            );
        }

        errors
    }
}

/// Submitted sign-up form.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SignupForm {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
    #[serde(default, rename = "confirmPassword")]
    pub confirm_password: String,
}

impl SignupForm {
    pub fn validate(&self) -> FieldErrors {
        let mut errors = FieldErrors::new();

        let name = self.name.trim();
        if name.is_empty() {
            errors.insert("name", "Name is required".to_string());
        } else if name.chars().count() < 2 {
            errors.insert("name", "Name must be at least 2 characters".to_string());
        }

        if self.email.trim().is_empty() {
            errors.insert("email", "Email is required".to_string());
        } else if !EMAIL_PATTERN.is_match(&self.email) {
            errors.insert("email", "Please enter a valid email address".to_string());
        }

        if let Some(message) = password_policy_violation(&self.password) {
            errors.insert("password", message);
        }

        if self.confirm_password.is_empty() {
            errors.insert("confirmPassword", "Please confirm your password".to_string());
        } else if self.password != self.confirm_password {
            errors.insert("confirmPassword", "Passwords do not match".to_string());
        }

        errors
    }
}

fn password_policy_violation(password: &str) -> Option<String> {
    if password.is_empty() {
        Some("Password is required".to_string())
    } else if password.chars().count() < MIN_PASSWORD_LENGTH {
        Some(format!(
            "Password must be at least {} characters",
            MIN_PASSWORD_LENGTH
        ))
    } else if !password.chars().any(|c| c.is_ascii_uppercase()) {
        Some("Password must contain at least one uppercase letter".to_string())
    } else if !password.chars().any(|c| c.is_ascii_digit()) {
        Some("Password must contain at least one number".to_string())
    } else {
        None
    }
}
