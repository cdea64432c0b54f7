//! Reading and writing the TOML configuration file.
//!
//! # Configuration File Format
//!
//! ```toml
//! [arxiv]
//! base_url = "http://export.arxiv.org/api/query"
//! default_max_results = 5
//!
//! [inference]
//! base_url = "https://api-inference.huggingface.co"
//! summarizer_model = "facebook/bart-large-cnn"
//! qa_model = "deepset/bert-base-cased-squad2"
//! summary_max_length = 130
//! summary_min_length = 30
//!
//! [http]
//! timeout_secs = 30
//!
//! [logging]
//! level = "info"
//! format = "json"
//! ```

use std::path::Path;

use super::Config;

/// A configuration read from, or destined for, a single TOML file
///
/// Unlike [`super::load_config`] this does not apply environment overrides.
#[derive(Debug, Default)]
pub struct ConfigFile {
    pub config: Config,
}

impl ConfigFile {
    /// Load configuration from a TOML file
    pub fn load(path: &Path) -> Result<Self, ConfigFileError> {
        let content =
            std::fs::read_to_string(path).map_err(|e| ConfigFileError::Io(e.to_string()))?;

        let config = toml::from_str(&content).map_err(|e| ConfigFileError::Parse(e.to_string()))?;
        Ok(Self { config })
    }

    /// Save configuration to a TOML file, creating parent directories
    pub fn save(&self, path: &Path) -> Result<(), ConfigFileError> {
        let content = self.to_toml()?;

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| ConfigFileError::Io(e.to_string()))?;
        }
        std::fs::write(path, content).map_err(|e| ConfigFileError::Io(e.to_string()))
    }

    /// Render as TOML with the API token redacted
    pub fn to_redacted_toml(&self) -> Result<String, ConfigFileError> {
        let mut config = self.config.clone();
        if config.inference.token.is_some() {
            config.inference.token = Some("********".to_string());
        }
        toml::to_string_pretty(&config).map_err(|e| ConfigFileError::Serialize(e.to_string()))
    }

    fn to_toml(&self) -> Result<String, ConfigFileError> {
        toml::to_string_pretty(&self.config).map_err(|e| ConfigFileError::Serialize(e.to_string()))
    }

    /// Create a file with default settings and no token
    pub fn create_default() -> Self {
        let mut config = Config::default();
        config.inference.token = None;
        Self { config }
    }
}

impl From<Config> for ConfigFile {
    fn from(config: Config) -> Self {
        Self { config }
    }
}

/// Configuration file errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigFileError {
    #[error("IO error: {0}")]
    Io(String),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Serialize error: {0}")]
    Serialize(String),
}
