//! Paper sources.
//!
//! This module defines the [`PaperSource`] trait the assistant fetches papers
//! through. [`ArxivSource`] talks to the arXiv export API; [`MockSource`] returns
//! canned records for tests and demos.
//!
//! # Failure Reporting
//!
//! [`PaperSource::fetch_papers`] reports every failure as a [`FetchError`],
//! including a non-success HTTP status ([`FetchError::Status`]). Callers that
//! want the older contract, where a failed request is indistinguishable from an
//! empty result, use [`PaperSource::fetch_papers_or_empty`] instead. Parse
//! errors propagate from both.

mod arxiv;
pub mod mock;

pub use arxiv::{ArxivSource, ARXIV_API_URL};
pub use mock::MockSource;

use crate::models::PaperRecord;
use async_trait::async_trait;

/// A remote service that turns a topic into a list of papers.
///
/// Implementations are stateless between calls and safe to share across tasks.
#[async_trait]
pub trait PaperSource: Send + Sync + std::fmt::Debug {
    /// Unique identifier for this source (e.g., "arxiv")
    fn id(&self) -> &str;

    /// Human-readable name of this source
    fn name(&self) -> &str;

    /// Fetch at most `max_results` papers matching `query`, in feed order
    async fn fetch_papers(
        &self,
        query: &str,
        max_results: usize,
    ) -> Result<Vec<PaperRecord>, FetchError>;

    /// Like [`fetch_papers`](Self::fetch_papers), but a non-success HTTP status
    /// becomes an empty list
    async fn fetch_papers_or_empty(
        &self,
        query: &str,
        max_results: usize,
    ) -> Result<Vec<PaperRecord>, FetchError> {
        match self.fetch_papers(query, max_results).await {
            Err(FetchError::Status(status)) => {
                tracing::warn!(
                    source = self.id(),
                    status,
                    "Search request failed, returning no papers"
                );
                Ok(Vec::new())
            }
            other => other,
        }
    }
}

/// Errors that can occur when fetching papers
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    /// The service answered with a non-success HTTP status
    #[error("Fetch failed with HTTP status {0}")]
    Status(u16),

    /// Network or transport error
    #[error("Network error: {0}")]
    Network(String),

    /// The response body was not the expected feed
    #[error("Parse error: {0}")]
    Parse(String),

    /// Invalid request parameters
    #[error("Invalid request: {0}")]
    InvalidRequest(String),
}

impl From<reqwest::Error> for FetchError {
    fn from(err: reqwest::Error) -> Self {
        FetchError::Network(err.to_string())
    }
}

impl From<quick_xml::DeError> for FetchError {
    fn from(err: quick_xml::DeError) -> Self {
        FetchError::Parse(format!("XML: {}", err))
    }
}
