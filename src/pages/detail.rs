//! Movie detail page.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Response,
};
use serde::Serialize;

use super::{render_page, LOADING_REFRESH_SECS};
use crate::errors::AppError;
use crate::models::{Fact, MovieDetail};
use crate::views::Phase;
use crate::AppState;

/// Present attributes of a detail record, ready for the template.
#[derive(Debug, Serialize)]
struct MovieSheet<'a> {
    id: &'a str,
    title: &'a str,
    poster: Option<&'a str>,
    badges: Vec<&'a str>,
    rating: Option<&'a str>,
    genres: Vec<&'a str>,
    plot: Option<&'a str>,
    facts: Vec<Fact<'a>>,
}

impl<'a> From<&'a MovieDetail> for MovieSheet<'a> {
    fn from(movie: &'a MovieDetail) -> Self {
        Self {
            id: &movie.summary.id,
            title: &movie.summary.title,
            poster: movie.summary.poster(),
            badges: movie.badges(),
            rating: movie.rating(),
            genres: movie.genres(),
            plot: movie.plot(),
            facts: movie.facts(),
        }
    }
}

#[derive(Debug, Serialize)]
struct DetailPage<'a> {
    username: Option<String>,
    id: Option<&'a str>,
    state: &'static str,
    message: Option<&'a str>,
    movie: Option<MovieSheet<'a>>,
    refresh_after: Option<u64>,
}

impl<'a> DetailPage<'a> {
    fn new(id: Option<&'a str>, phase: &'a Phase<MovieDetail>, username: Option<String>) -> Self {
        let movie = match phase {
            Phase::Success(detail) => Some(MovieSheet::from(detail)),
            _ => None,
        };

        Self {
            username,
            id,
            state: phase.name(),
            message: phase.message(),
            movie,
            refresh_after: phase.is_loading().then_some(LOADING_REFRESH_SECS),
        }
    }
}

/// GET /movie/{id} - Show one catalog record.
///
/// The page always describes the id in its own path. A request superseded by
/// another navigation shows its own outcome; one whose id is no longer in the
/// view shows Loading and polls.
pub async fn detail_page(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Response, AppError> {
    let requested = id.trim();
    let ticket = state.detail_view.lock().await.open(requested);

    let fetched = match ticket {
        Some(ticket) => {
            tracing::info!(id = ticket.key(), "Fetching catalog record");
            let outcome = state.catalog.get_by_id(ticket.key()).await;
            Some((ticket, outcome))
        }
        None => None,
    };

    let username = state.sessions.current().await.map(|s| s.username);
    let mut view = state.detail_view.lock().await;
    let stale = match fetched {
        Some((ticket, outcome)) => view.complete(&ticket, outcome).err(),
        None => None,
    };

    let loading = Phase::Loading;
    let page = match &stale {
        Some(phase) => DetailPage::new(Some(requested), phase, username),
        None if requested.is_empty() || view.id() == Some(requested) => {
            DetailPage::new(view.id(), view.phase(), username)
        }
        None => DetailPage::new(Some(requested), &loading, username),
    };
    render_page(&state, StatusCode::OK, "detail.html", page)
}
