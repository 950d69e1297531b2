//! HTTP DTOs for chat endpoints.
//!
//! These types decouple the HTTP API from domain types. All keys are
//! camelCase to match the chat widget.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::domain::conversation::{Message, Sender};

// ════════════════════════════════════════════════════════════════════════════════
// Request DTOs
// ════════════════════════════════════════════════════════════════════════════════

/// Body of `POST /chat/message`.
///
/// Fields are untyped so that missing or mistyped values reach the handler
/// and get the chat-specific 400 message instead of a generic rejection.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SendMessageRequest {
    #[serde(default)]
    pub message: Option<Value>,
    #[serde(default)]
    pub session_id: Option<Value>,
}

impl SendMessageRequest {
    /// The message, if it is a non-empty string.
    pub fn message_text(&self) -> Option<&str> {
        match &self.message {
            Some(Value::String(text)) if !text.is_empty() => Some(text.as_str()),
            _ => None,
        }
    }

    /// The session token, if it is a string. Other JSON types count as absent.
    pub fn session_token(&self) -> Option<String> {
        match &self.session_id {
            Some(Value::String(token)) => Some(token.clone()),
            _ => None,
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════════
// Response DTOs
// ════════════════════════════════════════════════════════════════════════════════

/// Successful reply to `POST /chat/message`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SendMessageResponse {
    pub reply: String,
    pub session_id: String,
}

/// Error body. `sessionId` is present only when a conversation was
/// involved, so the client can keep using it.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorResponse {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub session_id: Option<String>,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            session_id: None,
        }
    }

    pub fn with_session(mut self, session_id: impl Into<String>) -> Self {
        self.session_id = Some(session_id.into());
        self
    }
}

/// Body of `GET /chat/history/:session_id`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryResponse {
    pub session_id: String,
    pub messages: Vec<MessageView>,
}

/// One message in a history response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageView {
    pub id: String,
    pub sender: Sender,
    pub content: String,
    /// ISO-8601 with millisecond precision.
    pub timestamp: String,
}

impl From<&Message> for MessageView {
    fn from(message: &Message) -> Self {
        Self {
            id: message.id.to_string(),
            sender: message.sender,
            content: message.content.as_str().to_string(),
            timestamp: message.created_at.to_rfc3339(),
        }
    }
}
