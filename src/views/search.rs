//! Search view state machine.

use super::{Phase, RequestTicket, RequestTracker};
use crate::catalog::NO_RESULTS_MESSAGE;
use crate::errors::AppError;
use crate::models::MovieSummary;

/// Search text, results and request lifecycle of the search page.
#[derive(Debug)]
pub struct SearchView {
    query_text: String,
    phase: Phase<Vec<MovieSummary>>,
    tracker: RequestTracker,
}

impl Default for SearchView {
    fn default() -> Self {
        Self::new()
    }
}

impl SearchView {
    pub fn new() -> Self {
        Self {
            query_text: String::new(),
            phase: Phase::Idle,
            tracker: RequestTracker::default(),
        }
    }

    pub fn query_text(&self) -> &str {
        &self.query_text
    }

    pub fn phase(&self) -> &Phase<Vec<MovieSummary>> {
        &self.phase
    }

    /// Issue the seed query the first time the view is shown.
    pub fn mount(&mut self, seed: &str) -> Option<RequestTicket> {
        if !matches!(self.phase, Phase::Idle) {
            return None;
        }
        self.submit(seed)
    }

    /// Start a search. Blank text is ignored and leaves the view untouched.
    pub fn submit(&mut self, text: &str) -> Option<RequestTicket> {
        let query = text.trim();
        if query.is_empty() {
            return None;
        }

        self.query_text = query.to_string();
        self.phase = Phase::Loading;
        Some(self.tracker.issue(query))
    }

    /// Apply the outcome of a request. Returns `false` for a superseded ticket.
    pub fn complete(
        &mut self,
        ticket: &RequestTicket,
        outcome: Result<Vec<MovieSummary>, AppError>,
    ) -> bool {
        if !self.tracker.is_current(ticket) {
            tracing::debug!(
                query = ticket.key(),
                seq = ticket.seq(),
                "Discarding stale search response"
            );
            return false;
        }

        self.phase = match outcome {
            Ok(results) if results.is_empty() => Phase::Empty(NO_RESULTS_MESSAGE.to_string()),
            Ok(results) => Phase::Success(results),
            Err(AppError::NotFound(message)) => Phase::Empty(message),
            Err(e) => {
                tracing::warn!(query = ticket.key(), "Search failed: {}", e);
                Phase::Failed(e.user_message())
            }
        };
        true
    }
}
