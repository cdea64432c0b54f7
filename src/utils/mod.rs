//! Utility modules supporting the assistant.
//!
//! - [`classify_papers`]: Bucket paper summaries into contributions, methodologies and conclusions
//! - [`HttpClient`]: Shared HTTP client with a configurable timeout
//! - [`char_prefix`] / [`char_slice`]: Character-offset text helpers
//!
//! # Classification
//!
//! ```rust
//! use paper_assistant::models::PaperRecord;
//! use paper_assistant::utils::classify_papers;
//!
//! let papers = vec![PaperRecord::new(
//!     "A paper",
//!     "2024-01-01T00:00:00Z",
//!     "We propose a new method and conclude that it works.",
//! )];
//! let buckets = classify_papers(&papers);
//! assert_eq!(buckets.contributions.len(), 1);
//! assert_eq!(buckets.methodologies.len(), 1);
//! assert_eq!(buckets.conclusions.len(), 1);
//! ```

mod classify;
mod http;
mod text;

pub use classify::{categories_for, classify_papers, matches_category};
pub use http::{HttpClient, DEFAULT_TIMEOUT_SECS};
pub use text::{char_prefix, char_slice};
