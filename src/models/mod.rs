//! Core data models for fetched papers and the results derived from them.

mod answer;
mod classification;
mod paper;

pub use answer::AnswerSpan;
pub use classification::{Category, ClassificationResult};
pub use paper::{PaperRecord, PaperRecordBuilder};
