//! Session resolution.
//!
//! Maps the optional client-supplied session token to a conversation. A
//! token that is missing, blank, malformed, or unknown silently starts a new
//! conversation; the client cannot tell these cases apart.

use std::sync::Arc;

use crate::domain::conversation::Conversation;
use crate::ports::{ConversationStore, StoreError};

/// Outcome of resolving a session token.
#[derive(Debug, Clone)]
pub struct ResolvedSession {
    pub conversation: Conversation,
    /// True when a new conversation was created for this request.
    pub created: bool,
}

/// Resolves session tokens to conversations.
pub struct SessionResolver {
    store: Arc<dyn ConversationStore>,
}

impl SessionResolver {
    pub fn new(store: Arc<dyn ConversationStore>) -> Self {
        Self { store }
    }

    /// Returns the conversation named by `token`, creating one if needed.
    ///
    /// # Errors
    ///
    /// Only storage failures; an unusable token is never an error.
    pub async fn resolve(&self, token: Option<&str>) -> Result<ResolvedSession, StoreError> {
        if let Some(token) = token.map(str::trim).filter(|t| !t.is_empty()) {
            if let Some(conversation) = self.store.find_by_token(token).await? {
                return Ok(ResolvedSession {
                    conversation,
                    created: false,
                });
            }
            tracing::debug!("Session token did not match a conversation");
        }

        let conversation = self.store.create_conversation().await?;
        tracing::info!(conversation_id = %conversation.id(), "Started new conversation");

        Ok(ResolvedSession {
            conversation,
            created: true,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::InMemoryConversationStore;

    fn setup() -> (Arc<InMemoryConversationStore>, SessionResolver) {
        let store = Arc::new(InMemoryConversationStore::new());
        let resolver = SessionResolver::new(store.clone());
        (store, resolver)
    }

    #[tokio::test]
    async fn absent_token_creates_conversation() {
        let (store, resolver) = setup();

        let resolved = resolver.resolve(None).await.unwrap();

        assert!(resolved.created);
        assert_eq!(store.conversation_count(), 1);
    }

    #[tokio::test]
    async fn blank_token_creates_conversation() {
        let (_, resolver) = setup();

        let resolved = resolver.resolve(Some("   ")).await.unwrap();

        assert!(resolved.created);
    }

    #[tokio::test]
    async fn known_token_returns_existing_conversation() {
        let (store, resolver) = setup();
        let existing = store.create_conversation().await.unwrap();

        let resolved = resolver
            .resolve(Some(&existing.id().to_string()))
            .await
            .unwrap();

        assert!(!resolved.created);
        assert_eq!(resolved.conversation.id(), existing.id());
        assert_eq!(store.conversation_count(), 1);
    }

    #[tokio::test]
    async fn malformed_or_unknown_token_silently_creates() {
        let (store, resolver) = setup();

        let malformed = resolver.resolve(Some("not-a-session")).await.unwrap();
        let unknown = resolver
            .resolve(Some("00000000-0000-4000-8000-000000000000"))
            .await
            .unwrap();

        assert!(malformed.created);
        assert!(unknown.created);
        assert_ne!(malformed.conversation.id(), unknown.conversation.id());
        assert_eq!(store.conversation_count(), 2);
    }

    #[tokio::test]
    async fn storage_failure_propagates() {
        let (store, resolver) = setup();
        store.set_failing(true);

        assert!(resolver.resolve(None).await.is_err());
    }
}
