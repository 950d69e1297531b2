//! Message entity for conversations.
//!
//! Messages are immutable records of one side of a support exchange.
//! Each message has a sender (user or ai), bounded content, and a timestamp.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::domain::foundation::{ConversationId, MessageId, Timestamp, ValidationError};

/// Maximum number of characters stored for a single message.
pub const MAX_MESSAGE_CHARS: usize = 2000;

/// Who produced a message.
///
/// Closed set: the persisted `sender` column only ever holds `user` or `ai`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sender {
    /// The customer typing into the widget.
    User,
    /// The language model, or an apology written on its behalf.
    Ai,
}

impl Sender {
    /// Returns the storage/wire representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Sender::User => "user",
            Sender::Ai => "ai",
        }
    }
}

impl fmt::Display for Sender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Sender {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "user" => Ok(Sender::User),
            "ai" => Ok(Sender::Ai),
            other => Err(ValidationError::invalid_format(
                "sender",
                format!("expected 'user' or 'ai', got '{}'", other),
            )),
        }
    }
}

/// Message text, trimmed and capped at [`MAX_MESSAGE_CHARS`].
///
/// # Invariants
///
/// - never empty after trimming
/// - at most `MAX_MESSAGE_CHARS` characters (Unicode scalar values)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct MessageContent(String);

impl MessageContent {
    /// Trims and truncates `raw` to the default bound.
    ///
    /// # Errors
    ///
    /// - `EmptyField` if nothing is left after trimming
    pub fn new(raw: &str) -> Result<Self, ValidationError> {
        Self::with_limit(raw, MAX_MESSAGE_CHARS)
    }

    /// Trims and truncates `raw` to `max_chars` characters.
    ///
    /// # Errors
    ///
    /// - `EmptyField` if nothing is left after trimming
    pub fn with_limit(raw: &str, max_chars: usize) -> Result<Self, ValidationError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(ValidationError::empty_field("message"));
        }

        let content = match trimmed.char_indices().nth(max_chars) {
            Some((cut, _)) => trimmed[..cut].to_string(),
            None => trimmed.to_string(),
        };
        Ok(Self(content))
    }

    /// Rebuilds content loaded from storage without re-validating it.
    pub(crate) fn from_stored(content: String) -> Self {
        Self(content)
    }

    /// Returns the text.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Number of characters.
    pub fn char_len(&self) -> usize {
        self.0.chars().count()
    }

    /// Consumes the content, returning the text.
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for MessageContent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// An immutable message within a conversation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Message {
    /// Unique identifier for this message.
    pub id: MessageId,
    /// Owning conversation.
    pub conversation_id: ConversationId,
    /// Who sent it.
    pub sender: Sender,
    /// Bounded text.
    pub content: MessageContent,
    /// When the message was created.
    pub created_at: Timestamp,
}

impl Message {
    /// Creates a new message stamped with a fresh id and the current time.
    pub fn new(conversation_id: ConversationId, sender: Sender, content: MessageContent) -> Self {
        Self {
            id: MessageId::new(),
            conversation_id,
            sender,
            content,
            created_at: Timestamp::now(),
        }
    }

    /// Reconstitutes a message from persisted state.
    pub fn reconstitute(
        id: MessageId,
        conversation_id: ConversationId,
        sender: Sender,
        content: String,
        created_at: Timestamp,
    ) -> Self {
        Self {
            id,
            conversation_id,
            sender,
            content: MessageContent::from_stored(content),
            created_at,
        }
    }
}
