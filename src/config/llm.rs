//! Language model provider configuration

use secrecy::{ExposeSecret, Secret};
use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;

use super::error::ValidationError;
use crate::adapters::ai::{retry_budget, MAX_GROQ_RETRIES};

/// Groq chat completion settings
#[derive(Debug, Clone, Deserialize)]
pub struct LlmConfig {
    /// Groq API key. Absence is not a startup failure; chat replies
    /// report the misconfiguration instead.
    pub api_key: Option<Secret<String>>,

    #[serde(default = "default_model")]
    pub model: String,

    #[serde(default = "default_base_url")]
    pub base_url: String,

    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,

    #[serde(default = "default_temperature")]
    pub temperature: f32,

    /// Request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,

    /// Maximum retries on transient failure
    #[serde(default = "default_retries")]
    pub max_retries: u32,

    /// File whose contents replace the built-in knowledge preamble
    pub knowledge_path: Option<PathBuf>,
}

impl LlmConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Worst-case duration of one completion including retries and waits.
    pub fn retry_budget(&self) -> Duration {
        retry_budget(self.timeout(), self.max_retries)
    }

    /// The API key, if one was supplied and is not blank.
    pub fn api_key(&self) -> Option<&str> {
        self.api_key
            .as_ref()
            .map(|k| k.expose_secret().as_str())
            .filter(|k| !k.trim().is_empty())
    }

    /// Validate LLM configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.model.trim().is_empty() {
            return Err(ValidationError::MissingRequired("LLM__MODEL"));
        }
        if !self.base_url.starts_with("http://") && !self.base_url.starts_with("https://") {
            return Err(ValidationError::InvalidBaseUrl);
        }
        if self.max_tokens == 0 {
            return Err(ValidationError::MustBePositive("llm.max_tokens"));
        }
        if !(0.0..=2.0).contains(&self.temperature) {
            return Err(ValidationError::InvalidTemperature);
        }
        if self.timeout_secs == 0 {
            return Err(ValidationError::MustBePositive("llm.timeout_secs"));
        }
        if self.max_retries > MAX_GROQ_RETRIES {
            return Err(ValidationError::TooManyRetries(MAX_GROQ_RETRIES));
        }
        Ok(())
    }
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            model: default_model(),
            base_url: default_base_url(),
            max_tokens: default_max_tokens(),
            temperature: default_temperature(),
            timeout_secs: default_timeout(),
            max_retries: default_retries(),
            knowledge_path: None,
        }
    }
}

fn default_model() -> String {
    crate::adapters::ai::DEFAULT_GROQ_MODEL.to_string()
}

fn default_base_url() -> String {
    crate::adapters::ai::DEFAULT_GROQ_BASE_URL.to_string()
}

fn default_max_tokens() -> u32 {
    500
}

fn default_temperature() -> f32 {
    0.7
}

fn default_timeout() -> u64 {
    30
}

fn default_retries() -> u32 {
    1
}
