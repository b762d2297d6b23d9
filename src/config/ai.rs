//! AI provider configuration

use serde::Deserialize;
use std::time::Duration;

use super::error::ValidationError;

/// AI provider configuration
#[derive(Debug, Clone, Deserialize)]
pub struct AiConfig {
    /// Which provider serves completions
    #[serde(default)]
    pub provider: AiProvider,

    /// OpenAI API key
    pub openai_api_key: Option<String>,

    /// Base URL of the OpenAI-compatible API
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Model used to propose sensitivity variables
    #[serde(default = "default_variables_model")]
    pub variables_model: String,

    /// Model used to write the long-form report
    #[serde(default = "default_report_model")]
    pub report_model: String,

    /// Request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,

    /// Maximum retries on transient failure
    #[serde(default)]
    pub max_retries: u32,
}

/// AI provider type
#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum AiProvider {
    #[default]
    OpenAI,
    /// Canned responses; no network access.
    Mock,
}

impl AiConfig {
    /// Get timeout as Duration
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Check if OpenAI is configured
    pub fn has_openai(&self) -> bool {
        self.openai_api_key.as_ref().is_some_and(|k| !k.is_empty())
    }

    /// Validate AI configuration
    pub fn validate(&self, production: bool) -> Result<(), ValidationError> {
        if self.variables_model.trim().is_empty() {
            return Err(ValidationError::EmptyModel("variables_model"));
        }
        if self.report_model.trim().is_empty() {
            return Err(ValidationError::EmptyModel("report_model"));
        }
        if self.timeout_secs == 0 {
            return Err(ValidationError::InvalidTimeout);
        }

        if self.provider == AiProvider::OpenAI {
            if !self.has_openai() {
                return Err(ValidationError::MissingRequired("OPENAI_API_KEY"));
            }
            if !self.base_url.starts_with("https://") && !self.base_url.starts_with("http://") {
                return Err(ValidationError::InvalidBaseUrl);
            }
            if production && !self.base_url.starts_with("https://") {
                return Err(ValidationError::BaseUrlMustBeHttps);
            }
        }

        Ok(())
    }
}

impl Default for AiConfig {
    fn default() -> Self {
        Self {
            provider: AiProvider::default(),
            openai_api_key: None,
            base_url: default_base_url(),
            variables_model: default_variables_model(),
            report_model: default_report_model(),
            timeout_secs: default_timeout(),
            max_retries: 0,
        }
    }
}

fn default_base_url() -> String {
    "https://api.openai.com/v1".to_string()
}

fn default_variables_model() -> String {
    "gpt-3.5-turbo".to_string()
}

fn default_report_model() -> String {
    "gpt-3.5-turbo-16k".to_string()
}

fn default_timeout() -> u64 {
    300
}
