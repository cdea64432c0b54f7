//! Answer returned by the question-answering boundary operation.

use serde::{Deserialize, Serialize};

/// A model answer together with the excerpt its offsets point at
///
/// `answer` is whatever the model returned; `exact_part` is cut from the context
/// using the reported character offsets. The two usually agree but are reported
/// independently.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnswerSpan {
    pub answer: String,
    pub exact_part: String,
    pub start: usize,
    pub end: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub score: Option<f64>,
}

impl AnswerSpan {
    /// Whether the model answer is the same text as the excerpt
    pub fn is_verbatim(&self) -> bool {
        self.answer == self.exact_part
    }
}
