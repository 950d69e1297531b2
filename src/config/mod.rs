//! Application configuration module
//!
//! Type-safe configuration loaded from environment variables using the
//! `config` and `dotenvy` crates. Variables carry the `SUPPORT_CHAT` prefix
//! and nested values are separated by double underscores.
//!
//! # Example
//!
//! ```no_run
//! use support_chat::config::AppConfig;
//!
//! let config = AppConfig::load().expect("Failed to load configuration");
//! config.validate().expect("Invalid configuration");
//!
//! println!("Server running on {}", config.server.bind_address());
//! ```

mod chat;
mod database;
mod error;
mod llm;
mod server;

pub use chat::ChatConfig;
pub use database::DatabaseConfig;
pub use error::{ConfigError, ValidationError};
pub use llm::LlmConfig;
pub use server::{LogFormat, ServerConfig};

use serde::Deserialize;

/// Root application configuration
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Server configuration (host, port, logging)
    #[serde(default)]
    pub server: ServerConfig,

    /// Database configuration (PostgreSQL connection)
    pub database: DatabaseConfig,

    /// Language model provider configuration (Groq)
    #[serde(default)]
    pub llm: LlmConfig,

    /// Chat exchange limits
    #[serde(default)]
    pub chat: ChatConfig,
}

impl AppConfig {
    /// Load configuration from environment variables
    ///
    /// 1. Loads `.env` file if present (for development)
    /// 2. Reads environment variables with `SUPPORT_CHAT` prefix
    /// 3. Uses `__` (double underscore) to separate nested values
    ///
    /// # Environment Variable Format
    ///
    /// - `SUPPORT_CHAT__SERVER__PORT=3001` -> `server.port = 3001`
    /// - `SUPPORT_CHAT__DATABASE__URL=...` -> `database.url = ...`
    /// - `SUPPORT_CHAT__LLM__API_KEY=...` -> `llm.api_key = ...`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing or values
    /// cannot be parsed into the expected types.
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let config = config::Config::builder()
            .add_source(
                config::Environment::default()
                    .prefix("SUPPORT_CHAT")
                    .separator("__"),
            )
            .build()?
            .try_deserialize()?;

        Ok(config)
    }

    /// Validate all configuration values
    ///
    /// A missing LLM API key is deliberately not a validation failure.
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.server.validate()?;
        self.database.validate()?;
        self.llm.validate()?;
        self.chat.validate()?;

        let llm_budget_secs = self.llm.retry_budget().as_secs();
        if self.server.request_timeout_secs <= llm_budget_secs {
            return Err(ValidationError::RequestTimeoutTooShort {
                request_timeout_secs: self.server.request_timeout_secs,
                llm_budget_secs,
            });
        }
        Ok(())
    }
}
