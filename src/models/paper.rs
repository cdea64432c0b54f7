//! Paper model representing one entry of a search feed.

use serde::{Deserialize, Serialize};

/// A paper as returned by the search API
///
/// Records are built once per feed entry and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaperRecord {
    /// Paper title
    pub title: String,

    /// Author names, in document order
    #[serde(default)]
    pub authors: Vec<String>,

    /// Publication timestamp exactly as emitted by the API (not parsed)
    pub published: String,

    /// Abstract text
    pub summary: String,
}

impl PaperRecord {
    /// Create a new record with no authors
    pub fn new(title: impl Into<String>, published: impl Into<String>, summary: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            authors: Vec::new(),
            published: published.into(),
            summary: summary.into(),
        }
    }

    /// Author names joined for display
    pub fn author_line(&self) -> String {
        self.authors.join(", ")
    }

    /// The first `max_chars` characters of the summary
    pub fn summary_preview(&self, max_chars: usize) -> &str {
        crate::utils::char_prefix(&self.summary, max_chars)
    }

    /// Year part of the publication timestamp, if it looks like one
    pub fn year(&self) -> Option<&str> {
        let year = self.published.get(..4)?;
        year.chars().all(|c| c.is_ascii_digit()).then_some(year)
    }
}

/// Builder for constructing PaperRecord objects
#[derive(Debug, Clone)]
pub struct PaperRecordBuilder {
    record: PaperRecord,
}

impl PaperRecordBuilder {
    /// Create a new builder with the title set
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            record: PaperRecord::new(title, String::new(), String::new()),
        }
    }

    /// Append one author
    pub fn author(mut self, name: impl Into<String>) -> Self {
        self.record.authors.push(name.into());
        self
    }

    /// Replace the author list
    pub fn authors<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.record.authors = names.into_iter().map(Into::into).collect();
        self
    }

    /// Set publication timestamp
    pub fn published(mut self, published: impl Into<String>) -> Self {
        self.record.published = published.into();
        self
    }

    /// Set abstract
    pub fn summary(mut self, summary: impl Into<String>) -> Self {
        self.record.summary = summary.into();
        self
    }

    /// Build the PaperRecord
    pub fn build(self) -> PaperRecord {
        self.record
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_builder() {
        let paper = PaperRecordBuilder::new("Test Paper")
            .author("John Doe")
            .author("Jane Smith")
            .published("2023-01-15T10:00:00Z")
            .summary("This is a test abstract.")
            .build();

        assert_eq!(paper.title, "Test Paper");
        assert_eq!(paper.authors, vec!["John Doe", "Jane Smith"]);
        assert_eq!(paper.published, "2023-01-15T10:00:00Z");
        assert_eq!(paper.summary, "This is a test abstract.");
    }

    #[test]
    fn test_author_line() {
        let paper = PaperRecordBuilder::new("Test")
            .authors(["John Doe", "Jane Smith", "Bob Jones"])
            .build();
        assert_eq!(paper.author_line(), "John Doe, Jane Smith, Bob Jones");

        let anonymous = PaperRecord::new("Test", "", "");
        assert_eq!(anonymous.author_line(), "");
    }

    #[test]
    fn test_summary_preview_counts_chars() {
        let paper = PaperRecord::new("T", "", "Größe matters here");
        assert_eq!(paper.summary_preview(5), "Größe");
        assert_eq!(paper.summary_preview(500), "Größe matters here");
    }

    #[test]
    fn test_year() {
        let paper = PaperRecord::new("T", "2021-06-01T00:00:00Z", "");
        assert_eq!(paper.year(), Some("2021"));

        let undated = PaperRecord::new("T", "unknown", "");
        assert_eq!(undated.year(), None);
    }
}
