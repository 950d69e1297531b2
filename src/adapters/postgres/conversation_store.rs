//! PostgreSQL implementation of ConversationStore.
//!
//! Persists conversations and messages to the `conversations` / `messages`
//! tables (see `migrations/`).

use async_trait::async_trait;
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};

use crate::domain::conversation::{Conversation, Message, MessageContent, Sender};
use crate::domain::foundation::{ConversationId, MessageId, Timestamp};
use crate::ports::{ConversationStore, StoreError};

/// PostgreSQL implementation of ConversationStore.
#[derive(Clone)]
pub struct PostgresConversationStore {
    pool: PgPool,
}

impl PostgresConversationStore {
    /// Creates a new PostgresConversationStore.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ConversationStore for PostgresConversationStore {
    async fn create_conversation(&self) -> Result<Conversation, StoreError> {
        let conversation = Conversation::start();

        sqlx::query(
            r#"
            INSERT INTO conversations (id, created_at, updated_at)
            VALUES ($1, $2, $3)
            "#,
        )
        .bind(*conversation.id().as_uuid())
        .bind(*conversation.created_at().as_datetime())
        .bind(*conversation.updated_at().as_datetime())
        .execute(&self.pool)
        .await
        .map_err(|e| StoreError::Database(format!("Failed to insert conversation: {}", e)))?;

        Ok(conversation)
    }

    async fn find_conversation(
        &self,
        id: &ConversationId,
    ) -> Result<Option<Conversation>, StoreError> {
        let row = sqlx::query(
            r#"
            SELECT id, created_at, updated_at
            FROM conversations
            WHERE id = $1
            "#,
        )
        .bind(*id.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| StoreError::Database(format!("Failed to fetch conversation: {}", e)))?;

        Ok(row.map(|row| row_to_conversation(&row)))
    }

    async fn append_message(
        &self,
        conversation_id: &ConversationId,
        sender: Sender,
        content: MessageContent,
    ) -> Result<Message, StoreError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| StoreError::Database(format!("Failed to start transaction: {}", e)))?;

        // Row lock serializes appends to the same conversation, so message
        // timestamps follow commit order.
        let locked = sqlx::query("SELECT id FROM conversations WHERE id = $1 FOR UPDATE")
            .bind(*conversation_id.as_uuid())
            .fetch_optional(&mut *tx)
            .await
            .map_err(|e| StoreError::Database(format!("Failed to lock conversation: {}", e)))?;

        if locked.is_none() {
            return Err(StoreError::ConversationNotFound(*conversation_id));
        }

        let message = Message::new(*conversation_id, sender, content);

        sqlx::query(
            r#"
            INSERT INTO messages (id, conversation_id, sender, content, created_at)
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(*message.id.as_uuid())
        .bind(*conversation_id.as_uuid())
        .bind(message.sender.as_str())
        .bind(message.content.as_str())
        .bind(*message.created_at.as_datetime())
        .execute(&mut *tx)
        .await
        .map_err(|e| StoreError::Database(format!("Failed to insert message: {}", e)))?;

        sqlx::query(
            r#"
            UPDATE conversations SET updated_at = GREATEST(updated_at, $2)
            WHERE id = $1
            "#,
        )
        .bind(*conversation_id.as_uuid())
        .bind(*message.created_at.as_datetime())
        .execute(&mut *tx)
        .await
        .map_err(|e| {
            StoreError::Database(format!("Failed to update conversation timestamp: {}", e))
        })?;

        tx.commit()
            .await
            .map_err(|e| StoreError::Database(format!("Failed to commit transaction: {}", e)))?;

        Ok(message)
    }

    async fn list_messages(
        &self,
        conversation_id: &ConversationId,
    ) -> Result<Vec<Message>, StoreError> {
        let rows = sqlx::query(
            r#"
            SELECT id, conversation_id, sender, content, created_at
            FROM messages
            WHERE conversation_id = $1
            ORDER BY created_at ASC, id ASC
            "#,
        )
        .bind(*conversation_id.as_uuid())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| StoreError::Database(format!("Failed to fetch messages: {}", e)))?;

        rows.iter().map(row_to_message).collect()
    }

    async fn list_recent_messages(
        &self,
        conversation_id: &ConversationId,
        limit: usize,
    ) -> Result<Vec<Message>, StoreError> {
        let rows = sqlx::query(
            r#"
            SELECT id, conversation_id, sender, content, created_at
            FROM messages
            WHERE conversation_id = $1
            ORDER BY created_at DESC, id DESC
            LIMIT $2
            "#,
        )
        .bind(*conversation_id.as_uuid())
        .bind(i64::try_from(limit).unwrap_or(i64::MAX))
        .fetch_all(&self.pool)
        .await
        .map_err(|e| StoreError::Database(format!("Failed to fetch recent messages: {}", e)))?;

        let mut messages = rows
            .iter()
            .map(row_to_message)
            .collect::<Result<Vec<_>, _>>()?;
        messages.reverse();
        Ok(messages)
    }
}

// === Helper Functions ===

fn row_to_conversation(row: &PgRow) -> Conversation {
    let id: uuid::Uuid = row.get("id");
    let created_at: chrono::DateTime<chrono::Utc> = row.get("created_at");
    let updated_at: chrono::DateTime<chrono::Utc> = row.get("updated_at");

    Conversation::reconstitute(
        ConversationId::from_uuid(id),
        Timestamp::from_datetime(created_at),
        Timestamp::from_datetime(updated_at),
    )
}

fn row_to_message(row: &PgRow) -> Result<Message, StoreError> {
    let id: uuid::Uuid = row.get("id");
    let conversation_id: uuid::Uuid = row.get("conversation_id");
    let sender_str: &str = row.get("sender");
    let content: String = row.get("content");
    let created_at: chrono::DateTime<chrono::Utc> = row.get("created_at");

    let sender = sender_str
        .parse::<Sender>()
        .map_err(|e| StoreError::Serialization(e.to_string()))?;

    Ok(Message::reconstitute(
        MessageId::from_uuid(id),
        ConversationId::from_uuid(conversation_id),
        sender,
        content,
        Timestamp::from_datetime(created_at),
    ))
}
