//! Deterministic, network-free stand-ins for the hosted models.

use async_trait::async_trait;

use super::{ExtractedSpan, InferenceError, SpanExtractor, TextSummarizer};

/// Summarizes by keeping leading sentences up to a word budget
#[derive(Debug, Clone)]
pub struct LeadSummarizer {
    max_words: usize,
}

impl LeadSummarizer {
    pub fn new(max_words: usize) -> Self {
        Self {
            max_words: max_words.max(1),
        }
    }
}

impl Default for LeadSummarizer {
    fn default() -> Self {
        Self::new(130)
    }
}

#[async_trait]
impl TextSummarizer for LeadSummarizer {
    fn model(&self) -> &str {
        "lead-sentences"
    }

    async fn summarize(&self, text: &str) -> Result<String, InferenceError> {
        let words: Vec<&str> = text.split_whitespace().collect();
        if words.is_empty() {
            return Err(InferenceError::InvalidInput("nothing to summarize".to_string()));
        }

        let mut kept = 0;
        let mut cut = 0;
        for (i, word) in words.iter().enumerate() {
            if i >= self.max_words {
                break;
            }
            kept = i + 1;
            if ends_sentence(word) {
                cut = kept;
            }
        }
        // First sentence alone is over budget: hard cut at the budget
        if cut == 0 {
            cut = kept;
        }

        Ok(words[..cut].join(" "))
    }
}

fn ends_sentence(word: &str) -> bool {
    word.ends_with('.') || word.ends_with('!') || word.ends_with('?')
}

/// Answers with the sentence containing the most specific question word
///
/// Question words shorter than four characters and common interrogatives are
/// ignored; of the rest, the longest one found in the context (whole word,
/// case-insensitive) selects the sentence. Ties go to the word asked first.
#[derive(Debug, Clone, Default)]
pub struct SentenceExtractor;

const IGNORED: &[&str] = &[
    "what", "which", "does", "that", "this", "with", "from", "they", "their", "there", "when",
    "where", "about", "have", "were", "paper", "whom", "whose",
];

#[async_trait]
impl SpanExtractor for SentenceExtractor {
    fn model(&self) -> &str {
        "sentence-match"
    }

    async fn extract(&self, question: &str, context: &str) -> Result<ExtractedSpan, InferenceError> {
        let chars: Vec<char> = context.chars().collect();
        let asked: Vec<char> = question.chars().collect();

        let mut candidates: Vec<String> = words(&asked)
            .into_iter()
            .map(|(s, e)| asked[s..e].iter().collect::<String>().to_lowercase())
            .filter(|w| w.chars().count() >= 4 && !IGNORED.contains(&w.as_str()))
            .collect();
        // Stable sort keeps question order among equal lengths
        candidates.sort_by_key(|w| std::cmp::Reverse(w.chars().count()));

        let context_words: Vec<(usize, usize, String)> = words(&chars)
            .into_iter()
            .map(|(s, e)| (s, e, chars[s..e].iter().collect::<String>().to_lowercase()))
            .collect();

        for candidate in &candidates {
            if let Some((pos, _, _)) = context_words.iter().find(|(_, _, w)| w == candidate) {
                let (start, end) = sentence_bounds(&chars, *pos);
                return Ok(ExtractedSpan {
                    answer: chars[start..end].iter().collect(),
                    start,
                    end,
                    score: Some(1.0),
                });
            }
        }

        Ok(ExtractedSpan {
            answer: String::new(),
            start: 0,
            end: 0,
            score: Some(0.0),
        })
    }
}

/// Character ranges of alphanumeric runs
fn words(chars: &[char]) -> Vec<(usize, usize)> {
    let mut out = Vec::new();
    let mut start = None;
    for (i, c) in chars.iter().enumerate() {
        match (c.is_alphanumeric(), start) {
            (true, None) => start = Some(i),
            (false, Some(s)) => {
                out.push((s, i));
                start = None;
            }
            _ => {}
        }
    }
    if let Some(s) = start {
        out.push((s, chars.len()));
    }
    out
}

fn is_terminal(c: char) -> bool {
    matches!(c, '.' | '!' | '?')
}

/// Sentence around `pos`, without leading whitespace, including its final punctuation
fn sentence_bounds(chars: &[char], pos: usize) -> (usize, usize) {
    let mut start = pos;
    while start > 0 && !is_terminal(chars[start - 1]) {
        start -= 1;
    }
    while start < pos && chars[start].is_whitespace() {
        start += 1;
    }

    let mut end = pos;
    while end < chars.len() && !is_terminal(chars[end]) {
        end += 1;
    }
    if end < chars.len() {
        end += 1;
    }
    (start, end)
}
