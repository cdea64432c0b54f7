//! Keyword buckets produced by [`crate::utils::classify_papers`].

use serde::{Deserialize, Serialize};

/// One of the three keyword-defined buckets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Contributions,
    Methodologies,
    Conclusions,
}

impl Category {
    /// All categories in display order
    pub const ALL: [Category; 3] = [
        Category::Contributions,
        Category::Methodologies,
        Category::Conclusions,
    ];

    /// Substrings that place a summary in this bucket (matched against lowercased text)
    pub fn keywords(self) -> &'static [&'static str] {
        match self {
            Category::Contributions => &["contribution", "propose", "introduce"],
            Category::Methodologies => &["method", "approach"],
            Category::Conclusions => &["conclude", "result", "find"],
        }
    }

    /// Returns the display name of the category
    pub fn name(self) -> &'static str {
        match self {
            Category::Contributions => "Contributions",
            Category::Methodologies => "Methodologies",
            Category::Conclusions => "Conclusions",
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Full summary texts grouped by bucket, each in input order
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassificationResult {
    pub contributions: Vec<String>,
    pub methodologies: Vec<String>,
    pub conclusions: Vec<String>,
}

impl ClassificationResult {
    /// Summaries in the given bucket
    pub fn bucket(&self, category: Category) -> &[String] {
        match category {
            Category::Contributions => &self.contributions,
            Category::Methodologies => &self.methodologies,
            Category::Conclusions => &self.conclusions,
        }
    }

    pub(crate) fn bucket_mut(&mut self, category: Category) -> &mut Vec<String> {
        match category {
            Category::Contributions => &mut self.contributions,
            Category::Methodologies => &mut self.methodologies,
            Category::Conclusions => &mut self.conclusions,
        }
    }

    /// True when no summary landed in any bucket
    pub fn is_empty(&self) -> bool {
        Category::ALL.iter().all(|c| self.bucket(*c).is_empty())
    }
}
