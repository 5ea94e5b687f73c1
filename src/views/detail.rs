//! Detail view state machine keyed by the catalog identifier in the path.

use super::{Phase, RequestTicket, RequestTracker};
use crate::errors::AppError;
use crate::models::MovieDetail;

/// Message shown when the path carries no identifier.
pub const MISSING_ID_MESSAGE: &str = "Missing movie id";

#[derive(Debug)]
pub struct DetailView {
    id: Option<String>,
    phase: Phase<MovieDetail>,
    tracker: RequestTracker,
}

impl Default for DetailView {
    fn default() -> Self {
        Self::new()
    }
}

impl DetailView {
    pub fn new() -> Self {
        Self {
            id: None,
            phase: Phase::Idle,
            tracker: RequestTracker::default(),
        }
    }

    pub fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    pub fn phase(&self) -> &Phase<MovieDetail> {
        &self.phase
    }

    /// Navigate to `id`. Returns a ticket when a fetch should be issued.
    ///
    /// A blank id fails immediately, without a request. Any pending request
    /// for a previous id is superseded; a pending request for the same id is
    /// left to finish instead of being issued again.
    pub fn open(&mut self, id: &str) -> Option<RequestTicket> {
        let id = id.trim();
        if self.phase.is_loading() && self.id.as_deref() == Some(id) {
            return None;
        }

        // Invalidate whatever is in flight, even when no new request follows.
        let ticket = self.tracker.issue(id);

        if id.is_empty() {
            self.id = None;
            self.phase = Phase::Failed(MISSING_ID_MESSAGE.to_string());
            return None;
        }

        self.id = Some(id.to_string());
        self.phase = Phase::Loading;
        Some(ticket)
    }

    /// Apply the outcome of a request.
    ///
    /// A superseded ticket leaves the view untouched; the settled outcome is
    /// handed back as `Err` so the caller can still show it.
    pub fn complete(
        &mut self,
        ticket: &RequestTicket,
        outcome: Result<MovieDetail, AppError>,
    ) -> Result<(), Phase<MovieDetail>> {
        let phase = settle(ticket, outcome);
        if !self.tracker.is_current(ticket) {
            tracing::debug!(
                id = ticket.key(),
                seq = ticket.seq(),
                "Discarding stale detail response"
            );
            return Err(phase);
        }

        self.phase = phase;
        Ok(())
    }
}

fn settle(ticket: &RequestTicket, outcome: Result<MovieDetail, AppError>) -> Phase<MovieDetail> {
    match outcome {
        Ok(detail) => Phase::Success(detail),
        Err(e) => {
            tracing::warn!(id = ticket.key(), "Detail lookup failed: {}", e);
            Phase::Failed(e.user_message())
        }
    }
}
