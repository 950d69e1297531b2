//! Stand-in provider installed when no API key is configured.
//!
//! The service still starts and answers every chat message with the
//! configuration apology, so the widget can surface the problem.

use async_trait::async_trait;

use crate::ports::{AIError, AIProvider, CompletionRequest, CompletionResponse, ProviderInfo};

/// AIProvider that fails every request with `AIError::NotConfigured`.
#[derive(Debug, Clone)]
pub struct UnconfiguredProvider {
    reason: String,
}

impl UnconfiguredProvider {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

#[async_trait]
impl AIProvider for UnconfiguredProvider {
    async fn complete(&self, _request: CompletionRequest) -> Result<CompletionResponse, AIError> {
        Err(AIError::not_configured(self.reason.clone()))
    }

    fn provider_info(&self) -> ProviderInfo {
        ProviderInfo::new("unconfigured", "none")
    }
}
