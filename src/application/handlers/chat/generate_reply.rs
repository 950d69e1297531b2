//! Reply generation.
//!
//! Builds the prompt (knowledge preamble, windowed history, current message)
//! and asks the AI provider for one completion. Provider errors are logged
//! here and reduced to a `GenerationFailure`; raw errors never reach clients.

use std::sync::Arc;
use std::time::Duration;

use thiserror::Error;
use uuid::Uuid;

use crate::domain::conversation::{HistoryWindow, KnowledgePreamble, MessageContent, Sender};
use crate::domain::foundation::ConversationId;
use crate::ports::{AIError, AIProvider, CompletionRequest, MessageRole, RequestMetadata};

/// Returned when the model produces no text.
pub const FALLBACK_REPLY: &str =
    "I apologize, but I couldn't generate a response. Please try again.";

const CONFIGURATION_APOLOGY: &str =
    "AI service is not properly configured. Please check the API key.";

const TRANSIENT_APOLOGY: &str =
    "I'm having trouble connecting to the AI service right now. Please try again in a moment.";

/// Why a reply could not be generated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum GenerationFailure {
    /// The credential is missing or was rejected.
    #[error("AI provider is misconfigured")]
    Configuration,

    /// Any other provider or transport failure, including timeouts.
    #[error("AI provider is temporarily unavailable")]
    Transient,
}

impl GenerationFailure {
    /// Apology shown to the user and stored as the AI message.
    pub fn user_message(&self) -> &'static str {
        match self {
            GenerationFailure::Configuration => CONFIGURATION_APOLOGY,
            GenerationFailure::Transient => TRANSIENT_APOLOGY,
        }
    }
}

impl From<&AIError> for GenerationFailure {
    fn from(err: &AIError) -> Self {
        if err.is_configuration() {
            GenerationFailure::Configuration
        } else {
            GenerationFailure::Transient
        }
    }
}

/// Model invocation parameters.
#[derive(Debug, Clone, Copy)]
pub struct GenerationSettings {
    pub max_tokens: u32,
    pub temperature: f32,
    /// Upper bound on one provider call, retries included. Expiry is a
    /// transient failure.
    pub deadline: Option<Duration>,
}

impl Default for GenerationSettings {
    fn default() -> Self {
        Self {
            max_tokens: 500,
            temperature: 0.7,
            deadline: None,
        }
    }
}

/// Produces assistant replies through an `AIProvider`.
pub struct ReplyGenerator {
    provider: Arc<dyn AIProvider>,
    preamble: KnowledgePreamble,
    settings: GenerationSettings,
}

impl ReplyGenerator {
    pub fn new(provider: Arc<dyn AIProvider>, preamble: KnowledgePreamble) -> Self {
        Self {
            provider,
            preamble,
            settings: GenerationSettings::default(),
        }
    }

    pub fn with_settings(mut self, settings: GenerationSettings) -> Self {
        self.settings = settings;
        self
    }

    /// Generates a reply to `message` given the prior `history`.
    ///
    /// A blank completion yields [`FALLBACK_REPLY`] rather than an error.
    pub async fn generate(
        &self,
        conversation_id: ConversationId,
        history: &HistoryWindow,
        message: &MessageContent,
    ) -> Result<String, GenerationFailure> {
        let request = self.build_request(conversation_id, history, message);

        let outcome = match self.settings.deadline {
            Some(limit) => tokio::time::timeout(limit, self.provider.complete(request))
                .await
                .unwrap_or_else(|_| {
                    Err(AIError::Timeout {
                        timeout_secs: limit.as_secs() as u32,
                    })
                }),
            None => self.provider.complete(request).await,
        };

        if let Ok(response) = &outcome {
            tracing::debug!(
                conversation_id = %conversation_id,
                model = %response.model,
                finish_reason = ?response.finish_reason,
                prompt_tokens = response.usage.prompt_tokens,
                completion_tokens = response.usage.completion_tokens,
                "Completion received"
            );
        }

        match outcome {
            Ok(response) if response.content.trim().is_empty() => {
                tracing::debug!(
                    conversation_id = %conversation_id,
                    "Model returned no text, using fallback reply"
                );
                Ok(FALLBACK_REPLY.to_string())
            }
            Ok(response) => Ok(response.content),
            Err(err) => {
                let failure = GenerationFailure::from(&err);
                match failure {
                    GenerationFailure::Configuration => tracing::error!(
                        conversation_id = %conversation_id,
                        provider = %self.provider.provider_info().name,
                        error = %err,
                        "AI provider rejected or lacks credentials; check LLM API key"
                    ),
                    GenerationFailure::Transient => tracing::warn!(
                        conversation_id = %conversation_id,
                        provider = %self.provider.provider_info().name,
                        error = %err,
                        "AI provider request failed"
                    ),
                }
                Err(failure)
            }
        }
    }

    fn build_request(
        &self,
        conversation_id: ConversationId,
        history: &HistoryWindow,
        message: &MessageContent,
    ) -> CompletionRequest {
        let metadata = RequestMetadata::new(conversation_id, Uuid::new_v4().to_string());

        let request = history.entries().iter().fold(
            CompletionRequest::new(metadata).with_system_prompt(self.preamble.as_str()),
            |request, entry| {
                let role = match entry.sender {
                    Sender::User => MessageRole::User,
                    Sender::Ai => MessageRole::Assistant,
                };
                request.with_message(role, entry.content.as_str())
            },
        );

        request
            .with_message(MessageRole::User, message.as_str())
            .with_max_tokens(self.settings.max_tokens)
            .with_temperature(self.settings.temperature)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::ai::{MockAIProvider, MockError};
    use crate::domain::conversation::Message;

    fn generator(provider: &MockAIProvider) -> ReplyGenerator {
        ReplyGenerator::new(
            Arc::new(provider.clone()),
            KnowledgePreamble::new("You are the Cozy Cart assistant."),
        )
    }

    fn content(text: &str) -> MessageContent {
        MessageContent::new(text).unwrap()
    }

    fn history(texts: &[(Sender, &str)]) -> HistoryWindow {
        let id = ConversationId::new();
        let messages: Vec<Message> = texts
            .iter()
            .map(|(sender, text)| Message::new(id, *sender, content(text)))
            .collect();
        HistoryWindow::from_recent(&messages, None, 20)
    }

    #[tokio::test]
    async fn prompt_is_preamble_then_history_then_current() {
        let provider = MockAIProvider::new().with_response("Sure!");
        let window = history(&[(Sender::User, "Hi"), (Sender::Ai, "Hello, how can I help?")]);

        let reply = generator(&provider)
            .generate(ConversationId::new(), &window, &content("Do you ship abroad?"))
            .await
            .unwrap();

        assert_eq!(reply, "Sure!");
        let call = provider.last_call().unwrap();
        assert_eq!(
            call.system_prompt.as_deref(),
            Some("You are the Cozy Cart assistant.")
        );
        let turns: Vec<(MessageRole, &str)> = call
            .messages
            .iter()
            .map(|m| (m.role, m.content.as_str()))
            .collect();
        assert_eq!(
            turns,
            vec![
                (MessageRole::User, "Hi"),
                (MessageRole::Assistant, "Hello, how can I help?"),
                (MessageRole::User, "Do you ship abroad?"),
            ]
        );
    }

    #[tokio::test]
    async fn uses_configured_invocation_parameters() {
        let provider = MockAIProvider::new();
        let generator = generator(&provider).with_settings(GenerationSettings {
            max_tokens: 128,
            temperature: 0.1,
            deadline: None,
        });

        generator
            .generate(ConversationId::new(), &HistoryWindow::empty(), &content("hi"))
            .await
            .unwrap();

        let call = provider.last_call().unwrap();
        assert_eq!(call.max_tokens, Some(128));
        assert_eq!(call.temperature, Some(0.1));
    }

    #[tokio::test]
    async fn blank_completion_uses_fallback() {
        let provider = MockAIProvider::new().with_empty_response().with_response("  \n ");
        let generator = generator(&provider);

        for _ in 0..2 {
            let reply = generator
                .generate(ConversationId::new(), &HistoryWindow::empty(), &content("hi"))
                .await
                .unwrap();
            assert_eq!(reply, FALLBACK_REPLY);
        }
    }

    #[tokio::test]
    async fn credential_errors_are_configuration_failures() {
        let provider = MockAIProvider::new()
            .with_error(MockError::NotConfigured)
            .with_error(MockError::AuthenticationFailed);
        let generator = generator(&provider);

        for _ in 0..2 {
            let failure = generator
                .generate(ConversationId::new(), &HistoryWindow::empty(), &content("hi"))
                .await
                .unwrap_err();
            assert_eq!(failure, GenerationFailure::Configuration);
        }
    }

    #[tokio::test]
    async fn other_errors_are_transient_failures() {
        let provider = MockAIProvider::new()
            .with_error(MockError::Timeout { timeout_secs: 30 })
            .with_error(MockError::Unavailable {
                message: "503".into(),
            });
        let generator = generator(&provider);

        for _ in 0..2 {
            let failure = generator
                .generate(ConversationId::new(), &HistoryWindow::empty(), &content("hi"))
                .await
                .unwrap_err();
            assert_eq!(failure, GenerationFailure::Transient);
        }
    }

    #[tokio::test]
    async fn slow_provider_past_deadline_is_transient() {
        let provider = MockAIProvider::new()
            .with_response("too late")
            .with_delay(Duration::from_millis(300));
        let generator = generator(&provider).with_settings(GenerationSettings {
            deadline: Some(Duration::from_millis(50)),
            ..GenerationSettings::default()
        });

        let failure = generator
            .generate(ConversationId::new(), &HistoryWindow::empty(), &content("hi"))
            .await
            .unwrap_err();

        assert_eq!(failure, GenerationFailure::Transient);
        assert_eq!(provider.call_count(), 1);
    }

    #[tokio::test]
    async fn provider_within_deadline_replies() {
        let provider = MockAIProvider::new()
            .with_response("in time")
            .with_delay(Duration::from_millis(10));
        let generator = generator(&provider).with_settings(GenerationSettings {
            deadline: Some(Duration::from_secs(5)),
            ..GenerationSettings::default()
        });

        let reply = generator
            .generate(ConversationId::new(), &HistoryWindow::empty(), &content("hi"))
            .await
            .unwrap();

        assert_eq!(reply, "in time");
    }

    #[test]
    fn apologies_match_failure_kind() {
        assert!(GenerationFailure::Configuration
            .user_message()
            .contains("not properly configured"));
        assert!(GenerationFailure::Transient
            .user_message()
            .contains("try again in a moment"));
    }
}
