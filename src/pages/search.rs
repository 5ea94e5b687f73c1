//! Search page.

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::Response,
};
use serde::{Deserialize, Serialize};

use super::{render_page, LOADING_REFRESH_SECS};
use crate::errors::AppError;
use crate::models::MovieSummary;
use crate::views::{Phase, SearchView};
use crate::AppState;

/// Search query parameters.
#[derive(Debug, Deserialize)]
pub struct SearchParams {
    /// Submitted search text; absent on plain navigation.
    #[serde(default)]
    pub q: Option<String>,
}

/// One result card.
#[derive(Debug, Serialize)]
struct MovieCard<'a> {
    id: &'a str,
    title: &'a str,
    year: &'a str,
    media_type: &'a str,
    poster: Option<&'a str>,
}

impl<'a> From<&'a MovieSummary> for MovieCard<'a> {
    fn from(movie: &'a MovieSummary) -> Self {
        Self {
            id: &movie.id,
            title: &movie.title,
            year: &movie.year,
            media_type: &movie.media_type,
            poster: movie.poster(),
        }
    }
}

#[derive(Debug, Serialize)]
struct SearchPage<'a> {
    username: Option<String>,
    query: &'a str,
    state: &'static str,
    message: Option<&'a str>,
    movies: Vec<MovieCard<'a>>,
    refresh_after: Option<u64>,
    /// Reload without `q` so polling does not resubmit the search
    refresh_url: &'static str,
}

impl<'a> SearchPage<'a> {
    fn new(view: &'a SearchView, username: Option<String>) -> Self {
        let phase = view.phase();
        let movies = match phase {
            Phase::Success(results) => results.iter().map(MovieCard::from).collect(),
            _ => Vec::new(),
        };

        Self {
            username,
            query: view.query_text(),
            state: phase.name(),
            message: phase.message(),
            movies,
            refresh_after: phase.is_loading().then_some(LOADING_REFRESH_SECS),
            refresh_url: "/",
        }
    }
}

/// GET / - Search the catalog.
///
/// Without `q` the view is mounted (seed query on first visit). Blank `q`
/// leaves the current results untouched.
pub async fn search_page(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> Result<Response, AppError> {
    let ticket = {
        let mut view = state.search_view.lock().await;
        match params.q.as_deref() {
            Some(text) if !text.trim().is_empty() => view.submit(text),
            _ => view.mount(&state.config.seed_query),
        }
    };

    if let Some(ticket) = ticket {
        tracing::info!(query = ticket.key(), "Searching catalog");
        let outcome = state.catalog.search_by_title(ticket.key()).await;
        state.search_view.lock().await.complete(&ticket, outcome);
    }

    let username = state.sessions.current().await.map(|s| s.username);
    let view = state.search_view.lock().await;
    render_page(
        &state,
        StatusCode::OK,
        "search.html",
        SearchPage::new(&view, username),
    )
}
