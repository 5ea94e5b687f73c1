//! Configuration module for the MovieDB web app.
//!
//! All configuration is loaded from environment variables with sensible defaults.

use std::env;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

/// Default OMDb endpoint.
pub const DEFAULT_OMDB_BASE_URL: &str = "https://www.omdbapi.com/";

/// Default catalog request timeout in seconds.
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 8;

/// Query issued when the search page is first mounted.
pub const DEFAULT_SEED_QUERY: &str = "Batman";

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// OMDb API key; the catalog reports a configuration error when absent
    pub omdb_api_key: Option<String>,
    /// Base URL of the OMDb endpoint
    pub omdb_base_url: String,
    /// Timeout applied to every catalog request
    pub request_timeout: Duration,
    /// Demo login email
    pub auth_username: Option<String>,
    /// Demo login password
    pub auth_password: Option<String>,
    /// Search issued on first mount of the search page
    pub seed_query: String,
    /// Path to SQLite database file holding the persisted session
    pub db_path: PathBuf,
    /// Address to bind the server to
    pub bind_addr: SocketAddr,
    /// Log level (trace, debug, info, warn, error)
    pub log_level: String,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        let omdb_api_key = non_empty_var("MOVIEDB_OMDB_API_KEY");
        let auth_username = non_empty_var("MOVIEDB_AUTH_USERNAME");
        let auth_password = non_empty_var("MOVIEDB_AUTH_PASSWORD");

        let omdb_base_url = non_empty_var("MOVIEDB_OMDB_BASE_URL")
            .unwrap_or_else(|| DEFAULT_OMDB_BASE_URL.to_string());

        let request_timeout = env::var("MOVIEDB_REQUEST_TIMEOUT_SECS")
            .ok()
            .and_then(|v| v.trim().parse::<u64>().ok())
            .filter(|secs| *secs > 0)
            .map(Duration::from_secs)
            .unwrap_or(Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS));

        let seed_query = non_empty_var("MOVIEDB_SEED_QUERY")
            .unwrap_or_else(|| DEFAULT_SEED_QUERY.to_string());

        let db_path = env::var("MOVIEDB_DB_PATH")
            .unwrap_or_else(|_| "./data/moviedb.sqlite".to_string())
            .into();

        let bind_addr = env::var("MOVIEDB_BIND_ADDR")
            .unwrap_or_else(|_| "127.0.0.1:8080".to_string())
            .parse()
            .expect("Invalid MOVIEDB_BIND_ADDR format");

        let log_level = env::var("MOVIEDB_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        Self {
            omdb_api_key,
            omdb_base_url,
            request_timeout,
            auth_username,
            auth_password,
            seed_query,
            db_path,
            bind_addr,
            log_level,
        }
    }
}

/// Read an environment variable, treating blank values as unset.
fn non_empty_var(name: &str) -> Option<String> {
    env::var(name)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
