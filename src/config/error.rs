//! Configuration error types

use thiserror::Error;

/// Errors that can occur during configuration loading
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration loading failed: {0}")]
    LoadError(#[from] config::ConfigError),

    #[error("Validation failed: {0}")]
    ValidationFailed(#[from] ValidationError),
}

/// Errors that can occur during configuration validation
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Required configuration missing: {0}")]
    MissingRequired(&'static str),

    #[error("Invalid port number")]
    InvalidPort,

    #[error("Invalid request timeout")]
    InvalidTimeout,

    #[error("Invalid database URL format")]
    InvalidDatabaseUrl,

    #[error("Pool min_connections exceeds max_connections")]
    InvalidPoolSize,

    #[error("Pool size exceeds maximum allowed (100)")]
    PoolSizeTooLarge,

    #[error("LLM temperature must be between 0.0 and 2.0")]
    InvalidTemperature,

    #[error("Invalid LLM base URL")]
    InvalidBaseUrl,

    #[error("{0} must be greater than zero")]
    MustBePositive(&'static str),

    #[error("LLM max_retries must be at most {0}")]
    TooManyRetries(u32),

    #[error("Request timeout ({request_timeout_secs}s) must exceed the LLM retry budget ({llm_budget_secs}s)")]
    RequestTimeoutTooShort {
        request_timeout_secs: u64,
        llm_budget_secs: u64,
    },
}
