//! MovieDB Web
//!
//! A server-rendered movie search and detail browser backed by the OMDb API,
//! gated by a single configured demo login.

mod auth;
mod catalog;
mod config;
mod db;
mod errors;
mod forms;
mod models;
mod pages;
mod views;

use std::sync::Arc;

use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use tokio::sync::Mutex;
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use auth::{ConfiguredCredentials, SessionStore};
use catalog::CatalogClient;
use config::Config;
use db::Repository;
use errors::AppError;
use forms::SignupFlow;
use pages::Templates;
use views::{DetailView, SearchView};

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    pub sessions: Arc<SessionStore>,
    pub catalog: Arc<CatalogClient>,
    pub search_view: Arc<Mutex<SearchView>>,
    pub detail_view: Arc<Mutex<DetailView>>,
    pub signup: Arc<Mutex<SignupFlow>>,
    pub templates: Arc<Templates>,
    pub config: Arc<Config>,
}

impl AppState {
    /// Wire up all services and restore any persisted session.
    pub async fn build(config: Config, repo: Repository) -> Result<Self, AppError> {
        let credentials = ConfiguredCredentials::new(
            config.auth_username.clone(),
            config.auth_password.clone(),
        );
        if !credentials.is_configured() {
            tracing::warn!(
                "Login credentials are not configured (MOVIEDB_AUTH_USERNAME / MOVIEDB_AUTH_PASSWORD). Every login will fail!"
            );
        }

        let sessions = SessionStore::new(repo, Arc::new(credentials));
        sessions.restore().await?;

        let catalog = CatalogClient::new(
            config.omdb_base_url.clone(),
            config.omdb_api_key.clone(),
            config.request_timeout,
        )?;
        if !catalog.has_api_key() {
            tracing::warn!("No OMDb API key configured (MOVIEDB_OMDB_API_KEY). Searches will fail!");
        }

        Ok(Self {
            sessions: Arc::new(sessions),
            catalog: Arc::new(catalog),
            search_view: Arc::new(Mutex::new(SearchView::new())),
            detail_view: Arc::new(Mutex::new(DetailView::new())),
            signup: Arc::new(Mutex::new(SignupFlow::default())),
            templates: Arc::new(Templates::load()?),
            config: Arc::new(config),
        })
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load configuration
    let config = Config::from_env();

    // Initialize logging
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting MovieDB");
    tracing::info!("Database path: {:?}", config.db_path);
    tracing::info!("Catalog endpoint: {}", config.omdb_base_url);
    tracing::info!("Bind address: {}", config.bind_addr);

    // Initialize storage
    let pool = db::init_database(&config.db_path).await?;
    let repo = Repository::new(pool);

    let bind_addr = config.bind_addr;
    let state = AppState::build(config, repo).await?;

    // Build router
    let app = create_router(state);

    // Start server
    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    tracing::info!("Server listening on {}", bind_addr);

    axum::serve(listener, app).await?;

    Ok(())
}

/// Create the application router with all routes.
pub fn create_router(state: AppState) -> Router {
    let sessions = state.sessions.clone();

    // Pages that require a session
    let protected_routes = Router::new()
        .route("/", get(pages::search_page))
        .route("/movie/{id}", get(pages::detail_page))
        .route_layer(middleware::from_fn(move |req, next| {
            auth::session_gate(sessions.clone(), req, next)
        }));

    let public_routes = Router::new()
        .route("/login", get(pages::login_page).post(pages::login_submit))
        .route("/logout", post(pages::logout))
        .route("/signup", get(pages::signup_page).post(pages::signup_submit))
        .route("/health", get(health_check));

    Router::new()
        .merge(protected_routes)
        .merge(public_routes)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Health check endpoint.
async fn health_check() -> &'static str {
    "OK"
}

#[cfg(test)]
mod tests;
