//! Conversation entity.
//!
//! A conversation is the container a client's `sessionId` names. It carries
//! no state of its own beyond timestamps; its messages live in the store and
//! are loaded on demand.

use serde::Serialize;

use crate::domain::foundation::{ConversationId, Timestamp};

/// A durable support conversation.
///
/// # Invariants
///
/// - `updated_at >= created_at`
/// - `updated_at` is at least the `created_at` of the newest message
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Conversation {
    id: ConversationId,
    created_at: Timestamp,
    updated_at: Timestamp,
}

impl Conversation {
    /// Starts a new, empty conversation.
    pub fn start() -> Self {
        let now = Timestamp::now();
        Self {
            id: ConversationId::new(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Reconstitutes a conversation from persisted state.
    pub fn reconstitute(id: ConversationId, created_at: Timestamp, updated_at: Timestamp) -> Self {
        Self {
            id,
            created_at,
            updated_at,
        }
    }

    pub fn id(&self) -> ConversationId {
        self.id
    }

    pub fn created_at(&self) -> Timestamp {
        self.created_at
    }

    pub fn updated_at(&self) -> Timestamp {
        self.updated_at
    }

    /// Advances the update timestamp to `at`; never moves it backwards.
    pub fn touch(&mut self, at: Timestamp) {
        if self.updated_at.is_before(&at) {
            self.updated_at = at;
        }
    }
}
