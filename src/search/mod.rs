pub mod client;

pub use client::{
    CourseLocation, CourseSearchClient, DEFAULT_API_URL, GolfCourse, SearchError, TeeBox, TeeSets,
};

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Mutex;
use tracing::{debug, warn};

/// Message shown to the user when a search fails.
pub const SEARCH_FAILED_MESSAGE: &str = "Failed to search courses. Please try again.";

/// Identifies one issued search. Later searches get larger tickets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct SearchTicket(u64);

/// Search results as shown to the user, with last-request-wins ordering:
/// a result is only applied if no newer search was issued after it.
#[derive(Debug, Clone, Default)]
pub struct SearchSession {
    issued: u64,
    query: Option<String>,
    results: Vec<GolfCourse>,
    error: Option<String>,
}

impl SearchSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a new search. Blank queries are not searched.
    pub fn begin(&mut self, query: &str) -> Option<SearchTicket> {
        let query = query.trim();
        if query.is_empty() {
            return None;
        }
        self.issued += 1;
        self.query = Some(query.to_string());
        Some(SearchTicket(self.issued))
    }

    pub fn is_current(&self, ticket: SearchTicket) -> bool {
        ticket.0 == self.issued
    }

    /// Apply the outcome of a search. Returns false when the result was
    /// superseded and discarded. Failures keep the previous results.
    pub fn complete(
        &mut self,
        ticket: SearchTicket,
        outcome: Result<Vec<GolfCourse>, SearchError>,
    ) -> bool {
        if !self.is_current(ticket) {
            debug!(ticket = ticket.0, latest = self.issued, "Discarding stale search result");
            return false;
        }
        match outcome {
            Ok(courses) => {
                self.results = courses;
                self.error = None;
            }
            Err(e) => {
                warn!(error = %e, "Course search failed");
                self.error = Some(SEARCH_FAILED_MESSAGE.to_string());
            }
        }
        true
    }

    /// The most recently issued query.
    pub fn query(&self) -> Option<&str> {
        self.query.as_deref()
    }

    pub fn results(&self) -> &[GolfCourse] {
        &self.results
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }
}

/// Run a search after `delay`, unless another search was issued meanwhile.
///
/// Returns true when the result was applied to the session.
pub async fn debounced_search(
    client: &CourseSearchClient,
    session: &Arc<Mutex<SearchSession>>,
    query: &str,
    delay: Duration,
) -> bool {
    let Some(ticket) = session.lock().await.begin(query) else {
        return false;
    };

    tokio::time::sleep(delay).await;
    if !session.lock().await.is_current(ticket) {
        return false;
    }

    let outcome = client.search_courses(query.trim()).await;
    session.lock().await.complete(ticket, outcome)
}
