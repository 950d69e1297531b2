//! Application handlers.
//!
//! Command and query handlers that orchestrate domain operations.

pub mod chat;

pub use chat::{
    ConversationHistory, GetHistoryError, GetHistoryHandler, SendMessageCommand, SendMessageError,
    SendMessageHandler, SendMessageResult,
};
