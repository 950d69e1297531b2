//! Conversation domain module.
//!
//! Conversations, their messages, the recency window handed to the model,
//! and the knowledge preamble that grounds every reply.

mod conversation;
mod history;
mod knowledge;
mod message;

pub use conversation::Conversation;
pub use history::{HistoryEntry, HistoryWindow, DEFAULT_HISTORY_WINDOW};
pub use knowledge::KnowledgePreamble;
pub use message::{Message, MessageContent, Sender, MAX_MESSAGE_CHARS};
