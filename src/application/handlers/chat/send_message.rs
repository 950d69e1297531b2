//! SendMessage command handler.
//!
//! Runs one chat exchange: validate, resolve the session, persist the user
//! message, load the history window, generate a reply, and persist the
//! reply (or the apology when generation fails).

use std::sync::Arc;

use thiserror::Error;

use super::generate_reply::{GenerationFailure, ReplyGenerator};
use super::load_history::HistoryLoader;
use super::resolve_session::SessionResolver;
use crate::domain::conversation::{Message, MessageContent, Sender, MAX_MESSAGE_CHARS};
use crate::domain::foundation::{ConversationId, ValidationError};
use crate::ports::{ConversationStore, StoreError};

/// Command to send a user message.
#[derive(Debug, Clone)]
pub struct SendMessageCommand {
    /// Raw message text as received.
    pub message: String,
    /// Client-supplied session token, if any.
    pub session_id: Option<String>,
}

impl SendMessageCommand {
    pub fn new(message: impl Into<String>, session_id: Option<String>) -> Self {
        Self {
            message: message.into(),
            session_id,
        }
    }
}

/// Result of a successful exchange.
#[derive(Debug, Clone)]
pub struct SendMessageResult {
    pub session_id: ConversationId,
    pub user_message: Message,
    pub ai_message: Message,
}

impl SendMessageResult {
    /// The reply text as stored.
    pub fn reply(&self) -> &str {
        self.ai_message.content.as_str()
    }
}

/// Errors that can occur when sending a message.
#[derive(Debug, Clone, Error)]
pub enum SendMessageError {
    /// Message failed validation. Nothing was written.
    #[error("Invalid message: {0}")]
    InvalidMessage(#[from] ValidationError),

    /// The model could not produce a reply. The apology has been stored.
    #[error("Reply generation failed for conversation {session_id}: {failure}")]
    Generation {
        session_id: ConversationId,
        failure: GenerationFailure,
    },

    /// Storage failed.
    #[error("Store error: {0}")]
    Store(#[from] StoreError),
}

/// Handler for chat messages.
pub struct SendMessageHandler {
    store: Arc<dyn ConversationStore>,
    resolver: SessionResolver,
    history: HistoryLoader,
    generator: ReplyGenerator,
    max_message_chars: usize,
}

impl SendMessageHandler {
    pub fn new(store: Arc<dyn ConversationStore>, generator: ReplyGenerator) -> Self {
        Self {
            resolver: SessionResolver::new(store.clone()),
            history: HistoryLoader::new(store.clone()),
            store,
            generator,
            max_message_chars: MAX_MESSAGE_CHARS,
        }
    }

    /// Overrides the history window size and the stored message length bound.
    pub fn with_limits(mut self, history_window: usize, max_message_chars: usize) -> Self {
        self.history = self.history.with_window(history_window);
        self.max_message_chars = max_message_chars;
        self
    }

    pub async fn handle(
        &self,
        cmd: SendMessageCommand,
    ) -> Result<SendMessageResult, SendMessageError> {
        let content = MessageContent::with_limit(&cmd.message, self.max_message_chars)?;

        let session = self.resolver.resolve(cmd.session_id.as_deref()).await?;
        let conversation_id = session.conversation.id();

        let user_message = self
            .store
            .append_message(&conversation_id, Sender::User, content)
            .await?;

        let window = self
            .history
            .load_window(&conversation_id, Some(user_message.id))
            .await?;

        match self
            .generator
            .generate(conversation_id, &window, &user_message.content)
            .await
        {
            Ok(reply) => {
                let reply = MessageContent::with_limit(&reply, self.max_message_chars)?;
                let ai_message = self
                    .store
                    .append_message(&conversation_id, Sender::Ai, reply)
                    .await?;

                tracing::debug!(
                    conversation_id = %conversation_id,
                    message_id = %ai_message.id,
                    "Stored AI reply"
                );

                Ok(SendMessageResult {
                    session_id: conversation_id,
                    user_message,
                    ai_message,
                })
            }
            Err(failure) => {
                let apology = MessageContent::with_limit(failure.user_message(), self.max_message_chars)?;
                self.store
                    .append_message(&conversation_id, Sender::Ai, apology)
                    .await?;

                Err(SendMessageError::Generation {
                    session_id: conversation_id,
                    failure,
                })
            }
        }
    }
}
