//! Keyword bucketing of paper summaries.
//!
//! Each summary is lowercased once and checked for plain substring matches
//! against the keyword set of every [`Category`]. There is no stemming and no
//! word-boundary check, so `"find"` also matches `"findings"`. A summary lands
//! in every bucket it matches, or in none.

use crate::models::{Category, ClassificationResult, PaperRecord};

/// Whether `lowered` contains any keyword of `category`
///
/// `lowered` must already be lowercase.
pub fn matches_category(lowered: &str, category: Category) -> bool {
    category.keywords().iter().any(|kw| lowered.contains(kw))
}

/// Categories a single summary belongs to, in display order
pub fn categories_for(summary: &str) -> Vec<Category> {
    let lowered = summary.to_lowercase();
    Category::ALL
        .into_iter()
        .filter(|c| matches_category(&lowered, *c))
        .collect()
}

/// Bucket the full summary text of every paper, preserving input order
pub fn classify_papers(papers: &[PaperRecord]) -> ClassificationResult {
    let mut result = ClassificationResult::default();

    for paper in papers {
        let lowered = paper.summary.to_lowercase();
        for category in Category::ALL {
            if matches_category(&lowered, category) {
                result.bucket_mut(category).push(paper.summary.clone());
            }
        }
    }

    tracing::debug!(
        papers = papers.len(),
        contributions = result.contributions.len(),
        methodologies = result.methodologies.len(),
        conclusions = result.conclusions.len(),
        "Classified paper summaries"
    );

    result
}
