//! OMDb catalog client.
//!
//! Both operations are GET requests against the same endpoint. The API reports
//! failure inside its JSON envelope (`"Response": "False"`) rather than through
//! the HTTP status, so every body is inspected before it is trusted.

use std::time::Duration;

use serde_json::Value;

use crate::errors::AppError;
use crate::models::{MovieDetail, MovieSummary};

/// Message used when a successful search carries no results.
pub const NO_RESULTS_MESSAGE: &str = "No movies found.";

/// Message used when a failed envelope carries no `Error` text.
const UNSPECIFIED_FAILURE_MESSAGE: &str = "Movie not found";

/// Message used when the API key is absent.
pub const MISSING_API_KEY_MESSAGE: &str =
    "API key is not configured. Please set MOVIEDB_OMDB_API_KEY.";

/// HTTP client bound to a single catalog endpoint.
#[derive(Clone)]
pub struct CatalogClient {
    http: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
}

impl CatalogClient {
    /// Create a client with the given request timeout.
    pub fn new(
        base_url: impl Into<String>,
        api_key: Option<String>,
        timeout: Duration,
    ) -> Result<Self, AppError> {
        let http = reqwest::Client::builder()
            .connect_timeout(timeout)
            .timeout(timeout)
            .build()
            .map_err(|e| AppError::Internal(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            http,
            base_url: base_url.into(),
            api_key: api_key.filter(|k| !k.trim().is_empty()),
        })
    }

    pub fn has_api_key(&self) -> bool {
        self.api_key.is_some()
    }

    /// Search the catalog by title.
    pub async fn search_by_title(&self, title: &str) -> Result<Vec<MovieSummary>, AppError> {
        let api_key = self.api_key()?;
        let body = self.fetch(&[("apikey", api_key), ("s", title)]).await?;
        let mut body = unwrap_envelope(body)?;

        let results: Vec<MovieSummary> = match body.get_mut("Search").map(Value::take) {
            Some(list) => serde_json::from_value(list).map_err(|e| {
                tracing::warn!("Unreadable search results: {}", e);
                AppError::Api("Unexpected response from the movie catalog".to_string())
            })?,
            None => Vec::new(),
        };

        if results.is_empty() {
            return Err(AppError::NotFound(NO_RESULTS_MESSAGE.to_string()));
        }

        tracing::debug!(title, count = results.len(), "Catalog search succeeded");
        Ok(results)
    }

    /// Fetch the full record for one catalog identifier.
    pub async fn get_by_id(&self, id: &str) -> Result<MovieDetail, AppError> {
        let api_key = self.api_key()?;
        let body = self
            .fetch(&[("apikey", api_key), ("i", id), ("plot", "full")])
            .await?;
        let body = unwrap_envelope(body)?;

        let detail: MovieDetail = serde_json::from_value(body).map_err(|e| {
            tracing::warn!(id, "Unreadable detail record: {}", e);
            AppError::Api("Unexpected response from the movie catalog".to_string())
        })?;

        tracing::debug!(id, title = %detail.summary.title, "Catalog lookup succeeded");
        Ok(detail)
    }

    fn api_key(&self) -> Result<&str, AppError> {
        self.api_key
            .as_deref()
            .ok_or_else(|| AppError::Configuration(MISSING_API_KEY_MESSAGE.to_string()))
    }

    async fn fetch(&self, params: &[(&str, &str)]) -> Result<Value, AppError> {
        let response = self.http.get(&self.base_url).query(params).send().await?;

        // Status is informational only; the envelope decides success.
        let status = response.status();
        if !status.is_success() {
            tracing::debug!(status = status.as_u16(), "Catalog answered with non-success status");
        }

        Ok(response.json::<Value>().await?)
    }
}

/// Check the `Response` indicator and turn a failed envelope into an error.
fn unwrap_envelope(body: Value) -> Result<Value, AppError> {
    match body.get("Response").and_then(Value::as_str) {
        Some(flag) if flag.eq_ignore_ascii_case("true") => Ok(body),
        Some(_) => {
            let message = body
                .get("Error")
                .and_then(Value::as_str)
                .map(str::trim)
                .filter(|m| !m.is_empty())
                .unwrap_or(UNSPECIFIED_FAILURE_MESSAGE)
                .to_string();
            Err(classify_failure(message))
        }
        None => {
            tracing::warn!("Catalog response is missing the Response field");
            Err(AppError::Api(
                "Unexpected response from the movie catalog".to_string(),
            ))
        }
    }
}

/// Split catalog failures into "nothing matched" and everything else.
fn classify_failure(message: String) -> AppError {
    let lower = message.to_ascii_lowercase();
    let not_found = lower.contains("not found")
        || lower.contains("incorrect imdb id")
        || lower.contains("too many results");

    if not_found {
        AppError::NotFound(message)
    } else {
        AppError::Api(message)
    }
}
