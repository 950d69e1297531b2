//! In-memory conversation store.
//!
//! Implements the `ConversationStore` port without a database. Used by the
//! HTTP integration tests and handy for local runs without PostgreSQL.
//! Does not persist data across restarts.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, MutexGuard};

use crate::domain::conversation::{Conversation, Message, MessageContent, Sender};
use crate::domain::foundation::ConversationId;
use crate::ports::{ConversationStore, StoreError};

#[derive(Default)]
struct State {
    conversations: HashMap<ConversationId, Conversation>,
    /// Messages per conversation, in insertion order.
    messages: HashMap<ConversationId, Vec<Message>>,
}

/// In-memory implementation of the ConversationStore port.
///
/// Thread-safe via internal `Mutex`. `set_failing(true)` makes every
/// operation return `StoreError::Database`, for exercising failure paths.
#[derive(Default)]
pub struct InMemoryConversationStore {
    state: Mutex<State>,
    failing: AtomicBool,
}

impl InMemoryConversationStore {
    /// Creates a new empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Toggles failure injection.
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    /// Number of conversations stored.
    pub fn conversation_count(&self) -> usize {
        self.lock().conversations.len()
    }

    /// Number of messages stored across all conversations.
    pub fn message_count(&self) -> usize {
        self.lock().messages.values().map(Vec::len).sum()
    }

    fn lock(&self) -> MutexGuard<'_, State> {
        self.state
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn check_failing(&self) -> Result<(), StoreError> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(StoreError::Database("injected failure".to_string()));
        }
        Ok(())
    }
}

#[async_trait]
impl ConversationStore for InMemoryConversationStore {
    async fn create_conversation(&self) -> Result<Conversation, StoreError> {
        self.check_failing()?;

        let conversation = Conversation::start();
        self.lock()
            .conversations
            .insert(conversation.id(), conversation.clone());
        Ok(conversation)
    }

    async fn find_conversation(
        &self,
        id: &ConversationId,
    ) -> Result<Option<Conversation>, StoreError> {
        self.check_failing()?;
        Ok(self.lock().conversations.get(id).cloned())
    }

    async fn append_message(
        &self,
        conversation_id: &ConversationId,
        sender: Sender,
        content: MessageContent,
    ) -> Result<Message, StoreError> {
        self.check_failing()?;

        let mut state = self.lock();
        let conversation = state
            .conversations
            .get_mut(conversation_id)
            .ok_or(StoreError::ConversationNotFound(*conversation_id))?;

        let message = Message::new(*conversation_id, sender, content);
        conversation.touch(message.created_at);

        state
            .messages
            .entry(*conversation_id)
            .or_default()
            .push(message.clone());

        Ok(message)
    }

    async fn list_messages(
        &self,
        conversation_id: &ConversationId,
    ) -> Result<Vec<Message>, StoreError> {
        self.check_failing()?;
        Ok(self
            .lock()
            .messages
            .get(conversation_id)
            .cloned()
            .unwrap_or_default())
    }

    async fn list_recent_messages(
        &self,
        conversation_id: &ConversationId,
        limit: usize,
    ) -> Result<Vec<Message>, StoreError> {
        self.check_failing()?;

        let state = self.lock();
        let messages = state
            .messages
            .get(conversation_id)
            .map(Vec::as_slice)
            .unwrap_or_default();
        let start = messages.len().saturating_sub(limit);
        Ok(messages[start..].to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn content(text: &str) -> MessageContent {
        MessageContent::new(text).unwrap()
    }

    #[tokio::test]
    async fn create_then_find() {
        let store = InMemoryConversationStore::new();

        let created = store.create_conversation().await.unwrap();
        let found = store.find_conversation(&created.id()).await.unwrap();

        assert_eq!(found, Some(created));
        assert_eq!(store.conversation_count(), 1);
    }

    #[tokio::test]
    async fn find_by_token_returns_none_for_garbage() {
        let store = InMemoryConversationStore::new();
        store.create_conversation().await.unwrap();

        assert!(store.find_by_token("nope").await.unwrap().is_none());
        assert!(store.find_by_token("").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn find_by_token_accepts_padded_id() {
        let store = InMemoryConversationStore::new();
        let created = store.create_conversation().await.unwrap();

        let found = store
            .find_by_token(&format!("  {}  ", created.id()))
            .await
            .unwrap();
        assert_eq!(found.map(|c| c.id()), Some(created.id()));
    }

    #[tokio::test]
    async fn append_touches_conversation() {
        let store = InMemoryConversationStore::new();
        let conversation = store.create_conversation().await.unwrap();

        let message = store
            .append_message(&conversation.id(), Sender::User, content("hi"))
            .await
            .unwrap();

        let reloaded = store
            .find_conversation(&conversation.id())
            .await
            .unwrap()
            .unwrap();
        assert!(!reloaded.updated_at().is_before(&message.created_at));
    }

    #[tokio::test]
    async fn append_to_unknown_conversation_fails() {
        let store = InMemoryConversationStore::new();
        let missing = ConversationId::new();

        let result = store
            .append_message(&missing, Sender::Ai, content("hi"))
            .await;

        assert!(matches!(result, Err(StoreError::ConversationNotFound(id)) if id == missing));
        assert_eq!(store.message_count(), 0);
    }

    #[tokio::test]
    async fn recent_messages_are_the_tail_oldest_first() {
        let store = InMemoryConversationStore::new();
        let conversation = store.create_conversation().await.unwrap();
        for i in 0..5 {
            store
                .append_message(&conversation.id(), Sender::User, content(&format!("m{}", i)))
                .await
                .unwrap();
        }

        let recent = store
            .list_recent_messages(&conversation.id(), 3)
            .await
            .unwrap();
        let texts: Vec<&str> = recent.iter().map(|m| m.content.as_str()).collect();
        assert_eq!(texts, vec!["m2", "m3", "m4"]);

        let all = store
            .list_recent_messages(&conversation.id(), 50)
            .await
            .unwrap();
        assert_eq!(all.len(), 5);
    }

    #[tokio::test]
    async fn unknown_conversation_has_no_messages() {
        let store = InMemoryConversationStore::new();
        let id = ConversationId::new();

        assert!(store.list_messages(&id).await.unwrap().is_empty());
        assert!(store.list_recent_messages(&id, 5).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn failure_injection_affects_every_operation() {
        let store = InMemoryConversationStore::new();
        let conversation = store.create_conversation().await.unwrap();
        store.set_failing(true);

        assert!(store.create_conversation().await.is_err());
        assert!(store.find_conversation(&conversation.id()).await.is_err());
        assert!(store.list_messages(&conversation.id()).await.is_err());
        assert!(store
            .append_message(&conversation.id(), Sender::User, content("x"))
            .await
            .is_err());

        store.set_failing(false);
        assert!(store.list_messages(&conversation.id()).await.is_ok());
    }
}
