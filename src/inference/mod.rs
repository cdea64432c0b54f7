//! Summarization and extractive question answering.
//!
//! Both capabilities are opaque pretrained models as far as this crate is
//! concerned, so they sit behind two small traits. [`huggingface`] calls hosted
//! models over HTTP; [`local`] provides deterministic stand-ins that need no
//! network, used by tests and by `--offline`.
//!
//! Failures are returned to the caller as [`InferenceError`]; nothing here
//! retries.

pub mod huggingface;
pub mod local;

pub use huggingface::{HuggingFaceExtractor, HuggingFaceSummarizer};
pub use local::{LeadSummarizer, SentenceExtractor};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Turns free text into a shorter text
#[async_trait]
pub trait TextSummarizer: Send + Sync + std::fmt::Debug {
    /// Model identifier, for logs and diagnostics
    fn model(&self) -> &str;

    /// Summarize `text`
    async fn summarize(&self, text: &str) -> Result<String, InferenceError>;
}

/// Finds the answer to a question as a span of a context string
#[async_trait]
pub trait SpanExtractor: Send + Sync + std::fmt::Debug {
    /// Model identifier, for logs and diagnostics
    fn model(&self) -> &str;

    /// Answer `question` from `context`
    async fn extract(&self, question: &str, context: &str) -> Result<ExtractedSpan, InferenceError>;
}

/// Raw answer from a [`SpanExtractor`]
///
/// `start` and `end` are character offsets into the context.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtractedSpan {
    pub answer: String,
    pub start: usize,
    pub end: usize,
    #[serde(default)]
    pub score: Option<f64>,
}

/// Errors returned by inference backends
#[derive(Debug, thiserror::Error)]
pub enum InferenceError {
    /// Network or HTTP error
    #[error("Network error: {0}")]
    Network(String),

    /// The inference service answered with a non-success HTTP status
    #[error("Inference service returned status {status}: {message}")]
    Status { status: u16, message: String },

    /// The response did not have the expected shape
    #[error("Parse error: {0}")]
    Parse(String),

    /// The input was rejected before calling the model
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

impl From<reqwest::Error> for InferenceError {
    fn from(err: reqwest::Error) -> Self {
        InferenceError::Network(err.to_string())
    }
}

impl From<serde_json::Error> for InferenceError {
    fn from(err: serde_json::Error) -> Self {
        InferenceError::Parse(format!("JSON: {}", err))
    }
}
