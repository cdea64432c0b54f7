//! Mock source for testing purposes.

use async_trait::async_trait;
use std::sync::Mutex;

use crate::models::{PaperRecord, PaperRecordBuilder};
use crate::sources::{FetchError, PaperSource};

#[derive(Debug, Clone)]
enum Outcome {
    Papers(Vec<PaperRecord>),
    Status(u16),
    Parse(String),
}

/// A mock source that returns predefined responses.
#[derive(Debug)]
pub struct MockSource {
    outcome: Mutex<Outcome>,
    queries: Mutex<Vec<(String, usize)>>,
}

impl Default for MockSource {
    fn default() -> Self {
        Self::new()
    }
}

impl MockSource {
    /// Create a new mock source that returns no papers.
    pub fn new() -> Self {
        Self {
            outcome: Mutex::new(Outcome::Papers(Vec::new())),
            queries: Mutex::new(Vec::new()),
        }
    }

    /// Create a mock source that returns the given papers.
    pub fn with_papers(papers: Vec<PaperRecord>) -> Self {
        let source = Self::new();
        source.set_papers(papers);
        source
    }

    /// Set the papers to return.
    pub fn set_papers(&self, papers: Vec<PaperRecord>) {
        *self.outcome.lock().unwrap() = Outcome::Papers(papers);
    }

    /// Make every fetch fail with the given HTTP status.
    pub fn fail_with_status(&self, status: u16) {
        *self.outcome.lock().unwrap() = Outcome::Status(status);
    }

    /// Make every fetch fail as if the feed could not be parsed.
    pub fn fail_with_parse_error(&self, message: &str) {
        *self.outcome.lock().unwrap() = Outcome::Parse(message.to_string());
    }

    /// Queries received so far, with their result limits.
    pub fn queries(&self) -> Vec<(String, usize)> {
        self.queries.lock().unwrap().clone()
    }
}

#[async_trait]
impl PaperSource for MockSource {
    fn id(&self) -> &str {
        "mock"
    }

    fn name(&self) -> &str {
        "Mock Source"
    }

    async fn fetch_papers(
        &self,
        query: &str,
        max_results: usize,
    ) -> Result<Vec<PaperRecord>, FetchError> {
        self.queries
            .lock()
            .unwrap()
            .push((query.to_string(), max_results));

        let outcome = self.outcome.lock().unwrap().clone();
        match outcome {
            Outcome::Papers(mut papers) => {
                papers.truncate(max_results);
                Ok(papers)
            }
            Outcome::Status(status) => Err(FetchError::Status(status)),
            Outcome::Parse(message) => Err(FetchError::Parse(message)),
        }
    }
}

/// Helper function to create a mock paper for testing.
pub fn make_paper(title: &str, summary: &str) -> PaperRecord {
    PaperRecordBuilder::new(title)
        .author("Test Author")
        .published("2024-01-01T00:00:00Z")
        .summary(summary)
        .build()
}
