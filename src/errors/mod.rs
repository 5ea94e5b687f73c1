//! Error handling module for the MovieDB web app.
//!
//! Provides the central error type with mapping to HTTP status codes and the
//! user-facing messages rendered inline by the views.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};

/// Error codes as constants to avoid stringly-typed errors.
pub mod codes {
    pub const CONFIGURATION_ERROR: &str = "CONFIGURATION_ERROR";
    pub const VALIDATION_ERROR: &str = "VALIDATION_ERROR";
    pub const UNAUTHORIZED: &str = "UNAUTHORIZED";
    pub const NOT_FOUND: &str = "NOT_FOUND";
    pub const TRANSPORT_ERROR: &str = "TRANSPORT_ERROR";
    pub const API_ERROR: &str = "API_ERROR";
    pub const DATABASE_ERROR: &str = "DATABASE_ERROR";
    pub const INTERNAL_ERROR: &str = "INTERNAL_ERROR";
}

/// Message shown for failures whose details are not meant for the user.
pub const GENERIC_FAILURE_MESSAGE: &str = "Something went wrong. Please try again.";

/// Application error type.
#[derive(Debug)]
pub enum AppError {
    /// Required configuration is missing
    Configuration(String),
    /// Form input rejected before submission
    Validation(String),
    /// Credential mismatch
    Unauthorized(String),
    /// The catalog reported no matching data
    NotFound(String),
    /// Timeout or connectivity failure talking to the catalog
    Transport(String),
    /// The catalog answered with an error or an unreadable body
    Api(String),
    /// Database error
    Database(String),
    /// Internal server error
    Internal(String),
}

impl AppError {
    /// Get the HTTP status code for this error.
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::Configuration(_) => StatusCode::SERVICE_UNAVAILABLE,
            AppError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Transport(_) => StatusCode::GATEWAY_TIMEOUT,
            AppError::Api(_) => StatusCode::BAD_GATEWAY,
            AppError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get the error code for this error.
    pub fn error_code(&self) -> &'static str {
        match self {
            AppError::Configuration(_) => codes::CONFIGURATION_ERROR,
            AppError::Validation(_) => codes::VALIDATION_ERROR,
            AppError::Unauthorized(_) => codes::UNAUTHORIZED,
            AppError::NotFound(_) => codes::NOT_FOUND,
            AppError::Transport(_) => codes::TRANSPORT_ERROR,
            AppError::Api(_) => codes::API_ERROR,
            AppError::Database(_) => codes::DATABASE_ERROR,
            AppError::Internal(_) => codes::INTERNAL_ERROR,
        }
    }

    /// Get the error message.
    pub fn message(&self) -> String {
        match self {
            AppError::Configuration(msg) => msg.clone(),
            AppError::Validation(msg) => msg.clone(),
            AppError::Unauthorized(msg) => msg.clone(),
            AppError::NotFound(msg) => msg.clone(),
            AppError::Transport(msg) => msg.clone(),
            AppError::Api(msg) => msg.clone(),
            AppError::Database(msg) => msg.clone(),
            AppError::Internal(msg) => msg.clone(),
        }
    }

    /// Message safe to render in a page.
    ///
    /// Transport and infrastructure details stay in the logs; the user sees
    /// the generic fallback instead.
    pub fn user_message(&self) -> String {
        match self {
            AppError::Transport(_) | AppError::Database(_) | AppError::Internal(_) => {
                GENERIC_FAILURE_MESSAGE.to_string()
            }
            other => other.message(),
        }
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.error_code(), self.message())
    }
}

impl std::error::Error for AppError {}

impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        tracing::error!("Database error: {:?}", err);
        AppError::Database(format!("Database error: {}", err))
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        tracing::error!("JSON error: {:?}", err);
        AppError::Internal(format!("JSON error: {}", err))
    }
}

impl From<reqwest::Error> for AppError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            tracing::warn!("Catalog returned an unreadable body: {:?}", err);
            AppError::Api("Unexpected response from the movie catalog".to_string())
        } else {
            tracing::warn!("Catalog request failed: {:?}", err);
            AppError::Transport(format!("Catalog request failed: {}", err))
        }
    }
}

impl From<minijinja::Error> for AppError {
    fn from(err: minijinja::Error) -> Self {
        tracing::error!("Template error: {:?}", err);
        AppError::Internal(format!("Template error: {}", err))
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        (self.status_code(), self.user_message()).into_response()
    }
}
