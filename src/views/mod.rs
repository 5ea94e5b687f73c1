//! Request lifecycle shared by the search and detail views.
//!
//! A view enters `Loading` by issuing a [`RequestTicket`] and leaves it when
//! the matching outcome is applied. Tickets carry a per-view sequence number;
//! only the most recently issued ticket may change the view, so a slow
//! response cannot overwrite the result of a newer request.

mod detail;
mod search;

pub use detail::*;
pub use search::*;

/// Lifecycle of one view's data.
///
/// When not loading, exactly one of "results", "empty" or "failed" holds.
#[derive(Debug, Clone, PartialEq)]
pub enum Phase<T> {
    Idle,
    Loading,
    Success(T),
    Empty(String),
    Failed(String),
}

impl<T> Phase<T> {
    pub fn is_loading(&self) -> bool {
        matches!(self, Phase::Loading)
    }

    /// Lowercase name used by the page templates.
    pub fn name(&self) -> &'static str {
        match self {
            Phase::Idle => "idle",
            Phase::Loading => "loading",
            Phase::Success(_) => "success",
            Phase::Empty(_) => "empty",
            Phase::Failed(_) => "failed",
        }
    }

    /// Message to show inline, if the phase carries one.
    pub fn message(&self) -> Option<&str> {
        match self {
            Phase::Empty(msg) | Phase::Failed(msg) => Some(msg),
            _ => None,
        }
    }
}

/// Handle for one in-flight request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestTicket {
    seq: u64,
    key: String,
}

impl RequestTicket {
    /// The query text or identifier the request was issued for.
    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn seq(&self) -> u64 {
        self.seq
    }
}

/// Issues monotonically increasing tickets and remembers the latest one.
#[derive(Debug, Default)]
struct RequestTracker {
    latest: u64,
}

impl RequestTracker {
    fn issue(&mut self, key: &str) -> RequestTicket {
        self.latest += 1;
        RequestTicket {
            seq: self.latest,
            key: key.to_string(),
        }
    }

    fn is_current(&self, ticket: &RequestTicket) -> bool {
        ticket.seq == self.latest
    }
}
