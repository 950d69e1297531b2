//! Recency window over a conversation's history.
//!
//! The language model only ever sees the most recent slice of a
//! conversation. `HistoryWindow` is the only way to hand history to the
//! reply generator, so the bound is enforced by construction.

use super::message::{Message, Sender};
use crate::domain::foundation::MessageId;

/// Default number of prior messages sent as context.
pub const DEFAULT_HISTORY_WINDOW: usize = 20;

/// A sender/content pair inside the window.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryEntry {
    pub sender: Sender,
    pub content: String,
}

impl From<&Message> for HistoryEntry {
    fn from(message: &Message) -> Self {
        Self {
            sender: message.sender,
            content: message.content.as_str().to_string(),
        }
    }
}

/// The most recent messages of a conversation, oldest first.
///
/// # Invariants
///
/// - `len() <= limit` where `limit` is the size it was built with
/// - entries keep the chronological order of the input
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HistoryWindow {
    entries: Vec<HistoryEntry>,
}

impl HistoryWindow {
    /// An empty window (first message of a conversation).
    pub fn empty() -> Self {
        Self::default()
    }

    /// Takes the last `limit` messages of `messages`, skipping `exclude`.
    ///
    /// `messages` must already be in chronological order.
    pub fn from_recent(messages: &[Message], exclude: Option<MessageId>, limit: usize) -> Self {
        let kept: Vec<&Message> = messages
            .iter()
            .filter(|m| Some(m.id) != exclude)
            .collect();
        let skip = kept.len().saturating_sub(limit);

        Self {
            entries: kept.into_iter().skip(skip).map(HistoryEntry::from).collect(),
        }
    }

    pub fn entries(&self) -> &[HistoryEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
