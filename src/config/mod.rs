//! Configuration management.
//!
//! Settings are layered: built-in defaults, then a TOML file, then
//! `PAPER_ASSISTANT_*` environment variables (nested keys use `__`, e.g.
//! `PAPER_ASSISTANT_HTTP__TIMEOUT_SECS=60`).

mod file_config;

pub use file_config::{ConfigFile, ConfigFileError};

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::inference::huggingface::{DEFAULT_QA_MODEL, DEFAULT_SUMMARIZER_MODEL, HF_INFERENCE_URL};
use crate::sources::ARXIV_API_URL;
use crate::utils::DEFAULT_TIMEOUT_SECS;

/// Prefix for environment variable overrides
pub const ENV_PREFIX: &str = "PAPER_ASSISTANT";

/// File name looked up in the working directory
pub const LOCAL_CONFIG_FILE: &str = "paper-assistant.toml";

/// Application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Paper search settings
    #[serde(default)]
    pub arxiv: ArxivConfig,

    /// Model settings
    #[serde(default)]
    pub inference: InferenceConfig,

    /// HTTP client settings
    #[serde(default)]
    pub http: HttpConfig,

    /// Logging settings
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// arXiv API settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArxivConfig {
    /// Query endpoint
    #[serde(default = "default_arxiv_url")]
    pub base_url: String,

    /// Number of papers fetched when none is given
    #[serde(default = "default_max_results")]
    pub default_max_results: usize,
}

impl Default for ArxivConfig {
    fn default() -> Self {
        Self {
            base_url: default_arxiv_url(),
            default_max_results: default_max_results(),
        }
    }
}

fn default_arxiv_url() -> String {
    ARXIV_API_URL.to_string()
}

fn default_max_results() -> usize {
    5
}

/// Hosted model settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InferenceConfig {
    /// Inference API endpoint
    #[serde(default = "default_inference_url")]
    pub base_url: String,

    /// API token (optional, defaults to `HF_TOKEN`)
    #[serde(default = "default_token")]
    pub token: Option<String>,

    /// Summarization model
    #[serde(default = "default_summarizer_model")]
    pub summarizer_model: String,

    /// Extractive question-answering model
    #[serde(default = "default_qa_model")]
    pub qa_model: String,

    /// Upper bound on summary length, in model tokens
    #[serde(default = "default_summary_max")]
    pub summary_max_length: usize,

    /// Lower bound on summary length, in model tokens
    #[serde(default = "default_summary_min")]
    pub summary_min_length: usize,
}

impl Default for InferenceConfig {
    fn default() -> Self {
        Self {
            base_url: default_inference_url(),
            token: default_token(),
            summarizer_model: default_summarizer_model(),
            qa_model: default_qa_model(),
            summary_max_length: default_summary_max(),
            summary_min_length: default_summary_min(),
        }
    }
}

fn default_inference_url() -> String {
    HF_INFERENCE_URL.to_string()
}

fn default_token() -> Option<String> {
    std::env::var("HF_TOKEN").ok().filter(|t| !t.is_empty())
}

fn default_summarizer_model() -> String {
    DEFAULT_SUMMARIZER_MODEL.to_string()
}

fn default_qa_model() -> String {
    DEFAULT_QA_MODEL.to_string()
}

fn default_summary_max() -> usize {
    130
}

fn default_summary_min() -> usize {
    30
}

/// HTTP client configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpConfig {
    /// Request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout_secs: default_timeout(),
        }
    }
}

fn default_timeout() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,

    /// `"json"` for JSON lines, anything else for the human format
    #[serde(default)]
    pub format: Option<String>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: None,
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

impl LoggingConfig {
    /// Whether JSON log lines were requested
    pub fn is_json(&self) -> bool {
        self.format
            .as_deref()
            .is_some_and(|f| f.eq_ignore_ascii_case("json"))
    }
}

/// Load configuration from an optional file, layered with environment variables
pub fn load_config(path: Option<&Path>) -> Result<Config, config::ConfigError> {
    load_config_with_env(path, None)
}

/// Like [`load_config`], reading overrides from `env` instead of the process
/// environment when given
fn load_config_with_env(
    path: Option<&Path>,
    env: Option<config::Map<String, String>>,
) -> Result<Config, config::ConfigError> {
    let mut builder = config::Config::builder();
    if let Some(path) = path {
        builder = builder.add_source(config::File::from(path));
    }

    let settings = builder
        .add_source(
            config::Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true)
                .source(env),
        )
        .build()?;

    settings.try_deserialize()
}

/// Find a configuration file in the default locations
///
/// Checks `./paper-assistant.toml`, then `<config dir>/paper-assistant/config.toml`.
pub fn find_config_file() -> Option<PathBuf> {
    let local = PathBuf::from(LOCAL_CONFIG_FILE);
    if local.is_file() {
        return Some(local);
    }

    default_config_path().filter(|p| p.is_file())
}

/// Per-user configuration file path
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("paper-assistant").join("config.toml"))
}

/// Get the default configuration (from env vars or defaults)
pub fn get_config() -> Config {
    load_config(None).unwrap_or_default()
}
