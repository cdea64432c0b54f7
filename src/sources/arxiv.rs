//! arXiv paper source implementation.

use async_trait::async_trait;
use quick_xml::de::from_str;
use serde::Deserialize;
use std::sync::Arc;
use std::time::Duration;

use crate::models::{PaperRecord, PaperRecordBuilder};
use crate::sources::{FetchError, PaperSource};
use crate::utils::HttpClient;

/// Base URL for arXiv API
pub const ARXIV_API_URL: &str = "http://export.arxiv.org/api/query";

/// arXiv paper source
///
/// Issues one unauthenticated GET per fetch against the export API and reads
/// the Atom feed it returns. There is no retry and no caching.
#[derive(Debug, Clone)]
pub struct ArxivSource {
    client: Arc<HttpClient>,
    base_url: String,
}

#[derive(Debug, Deserialize)]
struct Feed {
    #[serde(rename = "entry", default)]
    entries: Vec<Entry>,
}

#[derive(Debug, Deserialize)]
struct Entry {
    title: String,
    summary: String,
    published: String,
    #[serde(rename = "author", default)]
    authors: Vec<Author>,
}

#[derive(Debug, Deserialize)]
struct Author {
    #[serde(default)]
    name: String,
}

impl ArxivSource {
    /// Create a new arXiv source
    pub fn new() -> Result<Self, FetchError> {
        Ok(Self {
            client: Arc::new(HttpClient::new()?),
            base_url: ARXIV_API_URL.to_string(),
        })
    }

    /// Create a source against `base_url` with the given request timeout
    pub fn with_base_url(base_url: impl Into<String>, timeout: Duration) -> Result<Self, FetchError> {
        Ok(Self {
            client: Arc::new(HttpClient::with_timeout(timeout)?),
            base_url: base_url.into(),
        })
    }

    /// Create with a custom HTTP client (for testing)
    pub fn with_client(client: Arc<HttpClient>, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into(),
        }
    }

    /// Build the request URL for a query
    ///
    /// The query goes in verbatim after `all:`, percent-encoded and nothing more.
    pub fn build_url(&self, query: &str, max_results: usize) -> String {
        format!(
            "{}?search_query=all:{}&start=0&max_results={}",
            self.base_url,
            urlencoding::encode(query),
            max_results
        )
    }

    /// Parse an arXiv Atom feed into records, in document order
    pub fn parse_feed(xml: &str) -> Result<Vec<PaperRecord>, FetchError> {
        let feed: Feed = from_str(xml)?;

        Ok(feed
            .entries
            .into_iter()
            .map(|entry| {
                PaperRecordBuilder::new(entry.title)
                    .authors(entry.authors.into_iter().map(|a| a.name))
                    .published(entry.published)
                    .summary(entry.summary)
                    .build()
            })
            .collect())
    }
}

#[async_trait]
impl PaperSource for ArxivSource {
    fn id(&self) -> &str {
        "arxiv"
    }

    fn name(&self) -> &str {
        "arXiv"
    }

    async fn fetch_papers(
        &self,
        query: &str,
        max_results: usize,
    ) -> Result<Vec<PaperRecord>, FetchError> {
        if max_results == 0 {
            return Err(FetchError::InvalidRequest(
                "max_results must be at least 1".to_string(),
            ));
        }

        let url = self.build_url(query, max_results);
        tracing::debug!(%url, "Fetching arXiv feed");

        let response = self
            .client
            .get(&url)
            .header("Accept", "application/atom+xml")
            .send()
            .await
            .map_err(|e| FetchError::Network(format!("Failed to fetch arXiv results: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            tracing::debug!(status = status.as_u16(), "arXiv API returned an error status");
            return Err(FetchError::Status(status.as_u16()));
        }

        let body = response
            .text()
            .await
            .map_err(|e| FetchError::Network(format!("Failed to read response: {}", e)))?;

        let mut papers = Self::parse_feed(&body)?;
        if papers.len() > max_results {
            tracing::warn!(
                returned = papers.len(),
                requested = max_results,
                "arXiv returned more entries than requested, dropping the rest"
            );
            papers.truncate(max_results);
        }

        tracing::info!(count = papers.len(), query, "Fetched papers from arXiv");
        Ok(papers)
    }
}
