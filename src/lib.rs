//! # Paper Assistant
//!
//! Fetches paper metadata from arXiv and offers model-backed summarization and
//! extractive question answering over the fetched abstracts, plus a keyword
//! classifier that buckets abstracts into contributions, methodologies and
//! conclusions.
//!
//! ## Architecture
//!
//! The library is organized into several modules:
//!
//! - [`models`]: Core data structures (PaperRecord, ClassificationResult, AnswerSpan)
//! - [`sources`]: The [`PaperSource`] trait and the arXiv implementation
//! - [`inference`]: Summarizer and span-extractor capabilities and their backends
//! - [`assistant`]: The four front-end operations and process-wide initialization
//! - [`mcp`]: MCP protocol server exposing the operations as tools
//! - [`utils`]: HTTP client, keyword classification and text helpers
//! - [`config`]: Configuration management
//! - [`ui`]: Terminal rendering

pub mod assistant;
pub mod config;
pub mod inference;
pub mod mcp;
pub mod models;
pub mod sources;
pub mod ui;
pub mod utils;

// Re-export commonly used types
pub use assistant::{AssistantError, ResearchAssistant};
pub use models::{AnswerSpan, ClassificationResult, PaperRecord};
pub use sources::{FetchError, PaperSource};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
