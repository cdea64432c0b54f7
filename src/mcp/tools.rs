//! Tool registry for MCP tools.
//!
//! Each tool maps one [`ResearchAssistant`] operation onto JSON in and JSON out.

use std::collections::HashMap;
use std::sync::Arc;

use serde::Deserialize;
use serde_json::{json, Value};

use crate::assistant::ResearchAssistant;
use crate::models::PaperRecord;

/// Papers fetched when a tool call does not say how many
const DEFAULT_MAX_RESULTS: usize = 5;

/// An MCP tool that can be called by the client
#[derive(Clone)]
pub struct Tool {
    /// Tool name (e.g., "fetch_papers")
    pub name: String,

    /// Human-readable description
    pub description: String,

    /// JSON Schema for input parameters
    pub input_schema: Value,

    /// Handler function to execute the tool
    pub handler: Arc<dyn ToolHandler>,
}

impl std::fmt::Debug for Tool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Tool")
            .field("name", &self.name)
            .field("description", &self.description)
            .field("input_schema", &self.input_schema)
            .finish()
    }
}

/// Handler for executing a tool
#[async_trait::async_trait]
pub trait ToolHandler: Send + Sync + std::fmt::Debug {
    /// Execute the tool with the given arguments
    async fn execute(&self, args: Value) -> Result<Value, String>;
}

/// Registry for all MCP tools
#[derive(Debug, Clone, Default)]
pub struct ToolRegistry {
    tools: HashMap<String, Tool>,
}

impl ToolRegistry {
    /// Create a registry holding the four assistant tools
    pub fn from_assistant(assistant: Arc<ResearchAssistant>) -> Self {
        let mut registry = Self::default();

        registry.register(Tool {
            name: "fetch_papers".to_string(),
            description: "Fetch paper metadata (title, authors, published, summary) from arXiv for a topic. A failed request returns an empty list.".to_string(),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "topic": {
                        "type": "string",
                        "description": "Research topic, used verbatim as the search term"
                    },
                    "max_results": {
                        "type": "integer",
                        "description": "Maximum number of papers",
                        "default": DEFAULT_MAX_RESULTS,
                        "minimum": 1
                    }
                },
                "required": ["topic"]
            }),
            handler: Arc::new(FetchPapersHandler {
                assistant: assistant.clone(),
            }),
        });

        registry.register(Tool {
            name: "summarize_paper".to_string(),
            description: "Summarize a paper abstract with a pretrained summarization model".to_string(),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "text": {
                        "type": "string",
                        "description": "Abstract or other text to summarize"
                    }
                },
                "required": ["text"]
            }),
            handler: Arc::new(SummarizePaperHandler {
                assistant: assistant.clone(),
            }),
        });

        registry.register(Tool {
            name: "answer_question_with_span".to_string(),
            description: "Answer a question from a context string and return the exact excerpt the answer was taken from".to_string(),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "question": {
                        "type": "string",
                        "description": "Question to answer"
                    },
                    "context": {
                        "type": "string",
                        "description": "Text to answer from, usually a paper summary"
                    }
                },
                "required": ["question", "context"]
            }),
            handler: Arc::new(AnswerQuestionHandler {
                assistant: assistant.clone(),
            }),
        });

        registry.register(Tool {
            name: "extract_key_information".to_string(),
            description: "Group paper summaries into contributions, methodologies and conclusions by keyword. Pass papers directly, or a topic to fetch them first.".to_string(),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "papers": {
                        "type": "array",
                        "description": "Papers as returned by fetch_papers",
                        "items": { "type": "object" }
                    },
                    "topic": {
                        "type": "string",
                        "description": "Topic to fetch papers for when no papers are given"
                    },
                    "max_results": {
                        "type": "integer",
                        "default": DEFAULT_MAX_RESULTS,
                        "minimum": 1
                    }
                }
            }),
            handler: Arc::new(ExtractKeyInformationHandler { assistant }),
        });

        registry
    }

    /// Register a tool
    pub fn register(&mut self, tool: Tool) {
        self.tools.insert(tool.name.clone(), tool);
    }

    /// Get a tool by name
    pub fn get(&self, name: &str) -> Option<&Tool> {
        self.tools.get(name)
    }

    /// Iterate over all tools
    pub fn all(&self) -> impl Iterator<Item = &Tool> {
        self.tools.values()
    }

    /// Number of registered tools
    pub fn len(&self) -> usize {
        self.tools.len()
    }

    /// Whether no tools are registered
    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }
}

fn parse_args<T: for<'de> Deserialize<'de>>(args: Value) -> Result<T, String> {
    serde_json::from_value(args).map_err(|e| format!("Invalid arguments: {}", e))
}

fn default_max_results() -> usize {
    DEFAULT_MAX_RESULTS
}

fn check_max_results(max_results: usize) -> Result<usize, String> {
    if max_results == 0 {
        Err("max_results must be at least 1".to_string())
    } else {
        Ok(max_results)
    }
}

#[derive(Debug)]
struct FetchPapersHandler {
    assistant: Arc<ResearchAssistant>,
}

#[derive(Debug, Deserialize)]
struct FetchArgs {
    topic: String,
    #[serde(default = "default_max_results")]
    max_results: usize,
}

#[async_trait::async_trait]
impl ToolHandler for FetchPapersHandler {
    async fn execute(&self, args: Value) -> Result<Value, String> {
        let args: FetchArgs = parse_args(args)?;
        let max_results = check_max_results(args.max_results)?;

        let papers = self
            .assistant
            .fetch_papers(&args.topic, max_results)
            .await
            .map_err(|e| e.to_string())?;

        Ok(json!({ "papers": papers, "count": papers.len() }))
    }
}

#[derive(Debug)]
struct SummarizePaperHandler {
    assistant: Arc<ResearchAssistant>,
}

#[derive(Debug, Deserialize)]
struct SummarizeArgs {
    text: String,
}

#[async_trait::async_trait]
impl ToolHandler for SummarizePaperHandler {
    async fn execute(&self, args: Value) -> Result<Value, String> {
        let args: SummarizeArgs = parse_args(args)?;
        let summary = self
            .assistant
            .summarize_paper(&args.text)
            .await
            .map_err(|e| e.to_string())?;

        Ok(json!({ "summary": summary }))
    }
}

#[derive(Debug)]
struct AnswerQuestionHandler {
    assistant: Arc<ResearchAssistant>,
}

#[derive(Debug, Deserialize)]
struct AnswerArgs {
    #[serde(default)]
    question: String,
    context: String,
}

#[async_trait::async_trait]
impl ToolHandler for AnswerQuestionHandler {
    async fn execute(&self, args: Value) -> Result<Value, String> {
        let args: AnswerArgs = parse_args(args)?;
        let span = self
            .assistant
            .answer_question_with_span(&args.question, &args.context)
            .await
            .map_err(|e| e.to_string())?;

        serde_json::to_value(span).map_err(|e| e.to_string())
    }
}

#[derive(Debug)]
struct ExtractKeyInformationHandler {
    assistant: Arc<ResearchAssistant>,
}

#[derive(Debug, Deserialize)]
struct ExtractArgs {
    #[serde(default)]
    papers: Option<Vec<PaperRecord>>,
    #[serde(default)]
    topic: Option<String>,
    #[serde(default = "default_max_results")]
    max_results: usize,
}

#[async_trait::async_trait]
impl ToolHandler for ExtractKeyInformationHandler {
    async fn execute(&self, args: Value) -> Result<Value, String> {
        let args: ExtractArgs = parse_args(args)?;

        let papers = match (args.papers, args.topic) {
            (Some(papers), _) => papers,
            (None, Some(topic)) => {
                let max_results = check_max_results(args.max_results)?;
                self.assistant
                    .fetch_papers(&topic, max_results)
                    .await
                    .map_err(|e| e.to_string())?
            }
            (None, None) => return Err("Either 'papers' or 'topic' is required".to_string()),
        };

        let result = self.assistant.extract_key_information(&papers);
        serde_json::to_value(result).map_err(|e| e.to_string())
    }
}
