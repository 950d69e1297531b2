//! Conversation store port.
//!
//! Defines the contract for creating conversations and appending/reading
//! their messages. Implementations handle the actual persistence.
//!
//! # Design
//!
//! - **Append is atomic**: the message insert and the conversation's
//!   `updated_at` bump happen in one unit; no reader sees one without the other
//! - **Total order**: listings are oldest first, ties broken by insertion order
//! - **Lenient lookup**: a malformed identifier is reported as "not found"

use async_trait::async_trait;

use crate::domain::conversation::{Conversation, Message, MessageContent, Sender};
use crate::domain::foundation::ConversationId;

/// Errors surfaced by a conversation store.
#[derive(Debug, Clone, thiserror::Error)]
pub enum StoreError {
    /// Tried to append to a conversation that does not exist.
    #[error("conversation not found: {0}")]
    ConversationNotFound(ConversationId),

    /// Underlying storage failed.
    #[error("database error: {0}")]
    Database(String),

    /// Stored data could not be mapped back to domain types.
    #[error("serialization error: {0}")]
    Serialization(String),
}

/// Durable record of conversations and their messages.
#[async_trait]
pub trait ConversationStore: Send + Sync {
    /// Creates a new conversation with no messages.
    async fn create_conversation(&self) -> Result<Conversation, StoreError>;

    /// Looks a conversation up by id.
    ///
    /// Returns `None` if it does not exist.
    async fn find_conversation(
        &self,
        id: &ConversationId,
    ) -> Result<Option<Conversation>, StoreError>;

    /// Looks a conversation up by a raw client token.
    ///
    /// Tokens that are not valid identifiers are reported as `None`, never
    /// as an error.
    async fn find_by_token(&self, token: &str) -> Result<Option<Conversation>, StoreError> {
        match token.parse::<ConversationId>() {
            Ok(id) => self.find_conversation(&id).await,
            Err(_) => Ok(None),
        }
    }

    /// Appends a message and advances the conversation's update timestamp.
    ///
    /// # Errors
    ///
    /// - `ConversationNotFound` if the conversation doesn't exist
    /// - `Database` on persistence failure (nothing is written)
    async fn append_message(
        &self,
        conversation_id: &ConversationId,
        sender: Sender,
        content: MessageContent,
    ) -> Result<Message, StoreError>;

    /// Full history of a conversation, oldest first.
    async fn list_messages(&self, conversation_id: &ConversationId)
        -> Result<Vec<Message>, StoreError>;

    /// The `limit` most recent messages, still oldest first.
    async fn list_recent_messages(
        &self,
        conversation_id: &ConversationId,
        limit: usize,
    ) -> Result<Vec<Message>, StoreError>;
}
