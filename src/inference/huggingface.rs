//! Hosted inference through the Hugging Face Inference API.
//!
//! Requests go to `<base_url>/models/<model>` as JSON. A bearer token is sent
//! when configured.

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::Arc;

use super::{ExtractedSpan, InferenceError, SpanExtractor, TextSummarizer};
use crate::config::InferenceConfig;
use crate::utils::HttpClient;

/// Default Inference API endpoint
pub const HF_INFERENCE_URL: &str = "https://api-inference.huggingface.co";
/// Default summarization model
pub const DEFAULT_SUMMARIZER_MODEL: &str = "facebook/bart-large-cnn";
/// Default extractive question-answering model
pub const DEFAULT_QA_MODEL: &str = "deepset/bert-base-cased-squad2";

#[derive(Debug, Clone)]
struct Endpoint {
    client: Arc<HttpClient>,
    base_url: String,
    model: String,
    token: Option<String>,
}

impl Endpoint {
    fn url(&self) -> String {
        format!("{}/models/{}", self.base_url.trim_end_matches('/'), self.model)
    }

    async fn post(&self, payload: Value) -> Result<Value, InferenceError> {
        let url = self.url();
        tracing::debug!(%url, "Calling inference endpoint");

        let mut request = self.client.post(&url).json(&payload);
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }

        let response = request
            .send()
            .await
            .map_err(|e| InferenceError::Network(format!("Failed to reach {}: {}", self.model, e)))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| InferenceError::Network(format!("Failed to read response: {}", e)))?;

        if !status.is_success() {
            let message = serde_json::from_str::<Value>(&body)
                .ok()
                .and_then(|v| v.get("error").and_then(Value::as_str).map(str::to_string))
                .unwrap_or(body);
            return Err(InferenceError::Status {
                status: status.as_u16(),
                message,
            });
        }

        Ok(serde_json::from_str(&body)?)
    }
}

/// Summarizer backed by a hosted seq2seq model
///
/// Decoding is greedy (`do_sample: false`) and bounded by the configured
/// minimum and maximum lengths.
#[derive(Debug, Clone)]
pub struct HuggingFaceSummarizer {
    endpoint: Endpoint,
    max_length: usize,
    min_length: usize,
}

impl HuggingFaceSummarizer {
    /// Create from configuration
    pub fn new(client: Arc<HttpClient>, config: &InferenceConfig) -> Self {
        Self {
            endpoint: Endpoint {
                client,
                base_url: config.base_url.clone(),
                model: config.summarizer_model.clone(),
                token: config.token.clone(),
            },
            max_length: config.summary_max_length,
            min_length: config.summary_min_length,
        }
    }
}

#[derive(Debug, Deserialize)]
struct SummaryOutput {
    summary_text: String,
}

#[async_trait]
impl TextSummarizer for HuggingFaceSummarizer {
    fn model(&self) -> &str {
        &self.endpoint.model
    }

    async fn summarize(&self, text: &str) -> Result<String, InferenceError> {
        if text.trim().is_empty() {
            return Err(InferenceError::InvalidInput("nothing to summarize".to_string()));
        }

        let payload = json!({
            "inputs": text,
            "parameters": {
                "max_length": self.max_length,
                "min_length": self.min_length,
                "do_sample": false
            },
            "options": { "wait_for_model": true }
        });

        let value = self.endpoint.post(payload).await?;
        let mut outputs: Vec<SummaryOutput> = serde_json::from_value(value)?;
        if outputs.is_empty() {
            return Err(InferenceError::Parse("empty summarization output".to_string()));
        }
        Ok(outputs.swap_remove(0).summary_text)
    }
}

/// Extractive question answering backed by a hosted model
#[derive(Debug, Clone)]
pub struct HuggingFaceExtractor {
    endpoint: Endpoint,
}

impl HuggingFaceExtractor {
    /// Create from configuration
    pub fn new(client: Arc<HttpClient>, config: &InferenceConfig) -> Self {
        Self {
            endpoint: Endpoint {
                client,
                base_url: config.base_url.clone(),
                model: config.qa_model.clone(),
                token: config.token.clone(),
            },
        }
    }
}

#[async_trait]
impl SpanExtractor for HuggingFaceExtractor {
    fn model(&self) -> &str {
        &self.endpoint.model
    }

    async fn extract(&self, question: &str, context: &str) -> Result<ExtractedSpan, InferenceError> {
        let payload = json!({
            "inputs": { "question": question, "context": context },
            "options": { "wait_for_model": true }
        });

        let value = self.endpoint.post(payload).await?;
        // Some deployments wrap the single answer in a list
        let value = match value {
            Value::Array(mut items) if !items.is_empty() => items.swap_remove(0),
            other => other,
        };
        Ok(serde_json::from_value(value)?)
    }
}
