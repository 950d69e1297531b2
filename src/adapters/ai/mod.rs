//! AI Provider Adapters.
//!
//! Implementations of the AIProvider port.
//!
//! ## Available Adapters
//!
//! - `GroqProvider` - Groq-hosted chat completions
//! - `UnconfiguredProvider` - Stand-in when no API key is set
//! - `MockAIProvider` - Configurable mock for testing

mod groq_provider;
mod mock_provider;
mod unconfigured_provider;

pub use groq_provider::{
    retry_budget, GroqConfig, GroqProvider, DEFAULT_GROQ_BASE_URL, DEFAULT_GROQ_MODEL,
    MAX_GROQ_RETRIES,
};
pub use mock_provider::{MockAIProvider, MockError, MockResponse};
pub use unconfigured_provider::UnconfiguredProvider;
