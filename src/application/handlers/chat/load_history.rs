//! History loading.

use std::sync::Arc;

use crate::domain::conversation::{HistoryWindow, Message, DEFAULT_HISTORY_WINDOW};
use crate::domain::foundation::{ConversationId, MessageId};
use crate::ports::{ConversationStore, StoreError};

/// Reads conversation history for display and for prompting.
pub struct HistoryLoader {
    store: Arc<dyn ConversationStore>,
    window: usize,
}

impl HistoryLoader {
    pub fn new(store: Arc<dyn ConversationStore>) -> Self {
        Self {
            store,
            window: DEFAULT_HISTORY_WINDOW,
        }
    }

    /// Sets how many prior messages the window holds.
    pub fn with_window(mut self, window: usize) -> Self {
        self.window = window;
        self
    }

    /// Every message of the conversation, oldest first.
    pub async fn load_all(&self, conversation_id: &ConversationId) -> Result<Vec<Message>, StoreError> {
        self.store.list_messages(conversation_id).await
    }

    /// The most recent messages for prompting, without `exclude`.
    ///
    /// `exclude` is the just-persisted user message, which the reply
    /// generator receives separately as the current message.
    pub async fn load_window(
        &self,
        conversation_id: &ConversationId,
        exclude: Option<MessageId>,
    ) -> Result<HistoryWindow, StoreError> {
        let fetch = if exclude.is_some() {
            self.window + 1
        } else {
            self.window
        };

        let recent = self
            .store
            .list_recent_messages(conversation_id, fetch)
            .await?;
        let window = HistoryWindow::from_recent(&recent, exclude, self.window);

        tracing::debug!(
            conversation_id = %conversation_id,
            window_len = window.len(),
            "Loaded history window"
        );

        Ok(window)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::InMemoryConversationStore;
    use crate::domain::conversation::{MessageContent, Sender};

    async fn seeded(count: usize) -> (Arc<InMemoryConversationStore>, ConversationId, Vec<Message>) {
        let store = Arc::new(InMemoryConversationStore::new());
        let conversation = store.create_conversation().await.unwrap();
        let mut messages = Vec::new();
        for i in 0..count {
            let sender = if i % 2 == 0 { Sender::User } else { Sender::Ai };
            let message = store
                .append_message(
                    &conversation.id(),
                    sender,
                    MessageContent::new(&format!("message {}", i)).unwrap(),
                )
                .await
                .unwrap();
            messages.push(message);
        }
        (store, conversation.id(), messages)
    }

    #[tokio::test]
    async fn load_all_returns_everything_in_order() {
        let (store, id, messages) = seeded(30).await;
        let loader = HistoryLoader::new(store);

        let all = loader.load_all(&id).await.unwrap();

        assert_eq!(all, messages);
    }

    #[tokio::test]
    async fn window_excludes_current_message_and_keeps_twenty() {
        let (store, id, messages) = seeded(26).await;
        let loader = HistoryLoader::new(store);
        let current = messages.last().unwrap().id;

        let window = loader.load_window(&id, Some(current)).await.unwrap();

        assert_eq!(window.len(), 20);
        assert_eq!(window.entries()[0].content, "message 5");
        assert_eq!(window.entries()[19].content, "message 24");
    }

    #[tokio::test]
    async fn short_history_is_used_whole() {
        let (store, id, messages) = seeded(3).await;
        let loader = HistoryLoader::new(store);

        let window = loader
            .load_window(&id, Some(messages[2].id))
            .await
            .unwrap();

        assert_eq!(window.len(), 2);
    }

    #[tokio::test]
    async fn custom_window_size_is_respected() {
        let (store, id, _) = seeded(10).await;
        let loader = HistoryLoader::new(store).with_window(4);

        let window = loader.load_window(&id, None).await.unwrap();

        assert_eq!(window.len(), 4);
        assert_eq!(window.entries()[0].content, "message 6");
    }
}
