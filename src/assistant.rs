//! The four operations a front end drives.
//!
//! [`ResearchAssistant`] wires a [`PaperSource`] to the two model capabilities
//! and the keyword classifier. Front ends (the CLI and the MCP server) only
//! talk to this type and only get plain data back.
//!
//! Model backends are built once per process. Call [`init`] at startup and
//! [`global`] afterwards; a second [`init`] is refused rather than silently
//! replacing the loaded backends.

use std::sync::{Arc, OnceLock};
use std::time::Duration;

use crate::config::Config;
use crate::inference::{
    HuggingFaceExtractor, HuggingFaceSummarizer, InferenceError, LeadSummarizer,
    SentenceExtractor, SpanExtractor, TextSummarizer,
};
use crate::models::{AnswerSpan, ClassificationResult, PaperRecord};
use crate::sources::{ArxivSource, FetchError, PaperSource};
use crate::utils::{char_slice, classify_papers, HttpClient};

static GLOBAL: OnceLock<Arc<ResearchAssistant>> = OnceLock::new();

/// Errors surfaced by [`ResearchAssistant`] operations
#[derive(Debug, thiserror::Error)]
pub enum AssistantError {
    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error(transparent)]
    Inference(#[from] InferenceError),

    /// The question was empty or only whitespace
    #[error("Please enter a question")]
    EmptyQuestion,

    #[error("Assistant is already initialized")]
    AlreadyInitialized,

    #[error("Assistant has not been initialized")]
    NotInitialized,
}

/// Paper fetching, summarization, question answering and classification
#[derive(Debug, Clone)]
pub struct ResearchAssistant {
    source: Arc<dyn PaperSource>,
    summarizer: Arc<dyn TextSummarizer>,
    extractor: Arc<dyn SpanExtractor>,
}

impl ResearchAssistant {
    /// Create from explicit collaborators
    pub fn new(
        source: Arc<dyn PaperSource>,
        summarizer: Arc<dyn TextSummarizer>,
        extractor: Arc<dyn SpanExtractor>,
    ) -> Self {
        Self {
            source,
            summarizer,
            extractor,
        }
    }

    /// arXiv plus hosted models, as configured
    pub fn from_config(config: &Config) -> Result<Self, AssistantError> {
        let timeout = Duration::from_secs(config.http.timeout_secs);
        let client = Arc::new(HttpClient::with_timeout(timeout).map_err(FetchError::from)?);

        tracing::debug!(
            summarizer = %config.inference.summarizer_model,
            qa = %config.inference.qa_model,
            "Initializing hosted model backends"
        );

        Ok(Self::new(
            Arc::new(ArxivSource::with_client(
                Arc::clone(&client),
                config.arxiv.base_url.clone(),
            )),
            Arc::new(HuggingFaceSummarizer::new(
                Arc::clone(&client),
                &config.inference,
            )),
            Arc::new(HuggingFaceExtractor::new(client, &config.inference)),
        ))
    }

    /// arXiv plus the local stand-in models
    pub fn offline(config: &Config) -> Result<Self, AssistantError> {
        let timeout = Duration::from_secs(config.http.timeout_secs);
        let source = ArxivSource::with_base_url(config.arxiv.base_url.clone(), timeout)?;

        Ok(Self::new(
            Arc::new(source),
            Arc::new(LeadSummarizer::new(config.inference.summary_max_length)),
            Arc::new(SentenceExtractor),
        ))
    }

    /// Fetch papers on `topic`; a failed request yields an empty list
    pub async fn fetch_papers(
        &self,
        topic: &str,
        max_results: usize,
    ) -> Result<Vec<PaperRecord>, AssistantError> {
        Ok(self.source.fetch_papers_or_empty(topic, max_results).await?)
    }

    /// Fetch papers on `topic`, reporting a failed request as [`FetchError`]
    pub async fn fetch_papers_strict(
        &self,
        topic: &str,
        max_results: usize,
    ) -> Result<Vec<PaperRecord>, AssistantError> {
        Ok(self.source.fetch_papers(topic, max_results).await?)
    }

    /// Summarize a paper's abstract
    pub async fn summarize_paper(&self, summary: &str) -> Result<String, AssistantError> {
        tracing::debug!(model = self.summarizer.model(), chars = summary.chars().count(), "Summarizing");
        Ok(self.summarizer.summarize(summary).await?)
    }

    /// Answer `question` from `context` and cut the matching excerpt out of the context
    pub async fn answer_question_with_span(
        &self,
        question: &str,
        context: &str,
    ) -> Result<AnswerSpan, AssistantError> {
        if question.trim().is_empty() {
            return Err(AssistantError::EmptyQuestion);
        }

        let span = self.extractor.extract(question, context).await?;
        let exact_part = char_slice(context, span.start, span.end).to_string();

        if exact_part != span.answer {
            tracing::debug!(
                answer = %span.answer,
                excerpt = %exact_part,
                "Model answer differs from the excerpt at its offsets"
            );
        }

        Ok(AnswerSpan {
            answer: span.answer,
            exact_part,
            start: span.start,
            end: span.end,
            score: span.score,
        })
    }

    /// Group the papers' abstracts into contributions, methodologies and conclusions
    pub fn extract_key_information(&self, papers: &[PaperRecord]) -> ClassificationResult {
        classify_papers(papers)
    }
}

/// Install the process-wide assistant
pub fn init(assistant: ResearchAssistant) -> Result<Arc<ResearchAssistant>, AssistantError> {
    GLOBAL
        .set(Arc::new(assistant))
        .map_err(|_| AssistantError::AlreadyInitialized)?;
    global()
}

/// The process-wide assistant installed by [`init`]
pub fn global() -> Result<Arc<ResearchAssistant>, AssistantError> {
    GLOBAL.get().cloned().ok_or(AssistantError::NotInitialized)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::inference::ExtractedSpan;
    use crate::sources::mock::make_paper;
    use crate::sources::MockSource;
    use async_trait::async_trait;

    /// Extractor that returns fixed offsets and a fixed (possibly paraphrased) answer
    #[derive(Debug)]
    struct FixedExtractor {
        answer: &'static str,
        start: usize,
        end: usize,
    }

    #[async_trait]
    impl SpanExtractor for FixedExtractor {
        fn model(&self) -> &str {
            "fixed"
        }

        async fn extract(&self, _q: &str, _c: &str) -> Result<ExtractedSpan, InferenceError> {
            Ok(ExtractedSpan {
                answer: self.answer.to_string(),
                start: self.start,
                end: self.end,
                score: None,
            })
        }
    }

    fn assistant_with(source: MockSource, extractor: Arc<dyn SpanExtractor>) -> ResearchAssistant {
        ResearchAssistant::new(
            Arc::new(source),
            Arc::new(LeadSummarizer::new(5)),
            extractor,
        )
    }

    #[tokio::test]
    async fn test_fetch_failure_is_empty_but_strict_reports_it() {
        let source = MockSource::new();
        source.fail_with_status(503);
        let assistant = assistant_with(source, Arc::new(SentenceExtractor));

        assert!(assistant.fetch_papers("topic", 5).await.unwrap().is_empty());
        assert!(matches!(
            assistant.fetch_papers_strict("topic", 5).await,
            Err(AssistantError::Fetch(FetchError::Status(503)))
        ));
    }

    #[tokio::test]
    async fn test_empty_question_never_reaches_model() {
        let assistant = assistant_with(MockSource::new(), Arc::new(SentenceExtractor));
        assert!(matches!(
            assistant.answer_question_with_span("   ", "context").await,
            Err(AssistantError::EmptyQuestion)
        ));
    }

    #[tokio::test]
    async fn test_excerpt_reported_independently_of_answer() {
        let extractor = FixedExtractor {
            answer: "ninety-one percent",
            start: 19,
            end: 22,
        };
        let assistant = assistant_with(MockSource::new(), Arc::new(extractor));

        let span = assistant
            .answer_question_with_span("How accurate?", "The model achieves 91% accuracy.")
            .await
            .unwrap();
        assert_eq!(span.answer, "ninety-one percent");
        assert_eq!(span.exact_part, "91%");
        assert!(!span.is_verbatim());
    }

    #[tokio::test]
    async fn test_excerpt_offsets_clamped() {
        let extractor = FixedExtractor {
            answer: "end",
            start: 4,
            end: 400,
        };
        let assistant = assistant_with(MockSource::new(), Arc::new(extractor));

        let span = assistant
            .answer_question_with_span("q?", "the end")
            .await
            .unwrap();
        assert_eq!(span.exact_part, "end");
        assert_eq!(span.end, 400);
    }

    #[tokio::test]
    async fn test_summarize_and_classify() {
        let papers = vec![
            make_paper("A", "We propose a method. It works well enough for us."),
            make_paper("B", "Unrelated text."),
        ];
        let source = Arc::new(MockSource::with_papers(papers.clone()));
        let assistant = ResearchAssistant::new(
            source.clone(),
            Arc::new(LeadSummarizer::new(5)),
            Arc::new(SentenceExtractor),
        );

        let fetched = assistant.fetch_papers("anything", 5).await.unwrap();
        assert_eq!(fetched, papers);
        assert_eq!(source.queries(), vec![("anything".to_string(), 5)]);

        let summary = assistant.summarize_paper(&fetched[0].summary).await.unwrap();
        assert_eq!(summary, "We propose a method.");

        let info = assistant.extract_key_information(&fetched);
        assert_eq!(info.contributions, vec![papers[0].summary.clone()]);
        assert_eq!(info.methodologies, vec![papers[0].summary.clone()]);
        assert!(info.conclusions.is_empty());
    }

    #[test]
    fn test_init_only_once() {
        let first = init(assistant_with(MockSource::new(), Arc::new(SentenceExtractor)));
        assert!(first.is_ok());
        assert!(global().is_ok());

        let second = init(assistant_with(MockSource::new(), Arc::new(SentenceExtractor)));
        assert!(matches!(second, Err(AssistantError::AlreadyInitialized)));
    }
}
