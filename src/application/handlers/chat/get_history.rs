//! GetHistory query handler.

use std::sync::Arc;

use thiserror::Error;

use super::load_history::HistoryLoader;
use crate::domain::conversation::Message;
use crate::domain::foundation::ConversationId;
use crate::ports::{ConversationStore, StoreError};

/// A conversation's complete transcript.
#[derive(Debug, Clone)]
pub struct ConversationHistory {
    pub conversation_id: ConversationId,
    /// Oldest first.
    pub messages: Vec<Message>,
}

#[derive(Debug, Clone, Error)]
pub enum GetHistoryError {
    #[error("Session ID is required")]
    MissingSessionId,

    /// Unknown or malformed session id.
    #[error("Conversation not found")]
    NotFound,

    #[error("Store error: {0}")]
    Store(#[from] StoreError),
}

/// Handler for history retrieval.
pub struct GetHistoryHandler {
    store: Arc<dyn ConversationStore>,
    loader: HistoryLoader,
}

impl GetHistoryHandler {
    pub fn new(store: Arc<dyn ConversationStore>) -> Self {
        Self {
            loader: HistoryLoader::new(store.clone()),
            store,
        }
    }

    pub async fn handle(&self, session_id: &str) -> Result<ConversationHistory, GetHistoryError> {
        if session_id.trim().is_empty() {
            return Err(GetHistoryError::MissingSessionId);
        }

        let conversation = self
            .store
            .find_by_token(session_id)
            .await?
            .ok_or(GetHistoryError::NotFound)?;

        let messages = self.loader.load_all(&conversation.id()).await?;

        Ok(ConversationHistory {
            conversation_id: conversation.id(),
            messages,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::InMemoryConversationStore;
    use crate::domain::conversation::{MessageContent, Sender};

    fn setup() -> (Arc<InMemoryConversationStore>, GetHistoryHandler) {
        let store = Arc::new(InMemoryConversationStore::new());
        let handler = GetHistoryHandler::new(store.clone());
        (store, handler)
    }

    #[tokio::test]
    async fn returns_messages_oldest_first() {
        let (store, handler) = setup();
        let conversation = store.create_conversation().await.unwrap();
        for (sender, text) in [(Sender::User, "hi"), (Sender::Ai, "hello")] {
            store
                .append_message(&conversation.id(), sender, MessageContent::new(text).unwrap())
                .await
                .unwrap();
        }

        let history = handler.handle(&conversation.id().to_string()).await.unwrap();

        assert_eq!(history.conversation_id, conversation.id());
        let texts: Vec<&str> = history.messages.iter().map(|m| m.content.as_str()).collect();
        assert_eq!(texts, vec!["hi", "hello"]);
    }

    #[tokio::test]
    async fn empty_conversation_has_empty_history() {
        let (store, handler) = setup();
        let conversation = store.create_conversation().await.unwrap();

        let history = handler.handle(&conversation.id().to_string()).await.unwrap();

        assert!(history.messages.is_empty());
    }

    #[tokio::test]
    async fn blank_id_is_missing() {
        let (_, handler) = setup();
        assert!(matches!(
            handler.handle("  ").await,
            Err(GetHistoryError::MissingSessionId)
        ));
    }

    #[tokio::test]
    async fn unknown_and_malformed_ids_are_not_found() {
        let (_, handler) = setup();

        assert!(matches!(
            handler.handle(&ConversationId::new().to_string()).await,
            Err(GetHistoryError::NotFound)
        ));
        assert!(matches!(
            handler.handle("not-a-uuid").await,
            Err(GetHistoryError::NotFound)
        ));
    }

    #[tokio::test]
    async fn store_failure_is_reported() {
        let (store, handler) = setup();
        store.set_failing(true);

        assert!(matches!(
            handler.handle(&ConversationId::new().to_string()).await,
            Err(GetHistoryError::Store(_))
        ));
    }
}
