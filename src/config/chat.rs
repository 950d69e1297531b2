//! Chat orchestration limits

use serde::Deserialize;

use super::error::ValidationError;
use crate::domain::conversation::{DEFAULT_HISTORY_WINDOW, MAX_MESSAGE_CHARS};

/// Limits applied to each chat exchange
#[derive(Debug, Clone, Deserialize)]
pub struct ChatConfig {
    /// Prior messages sent to the model as context
    #[serde(default = "default_history_window")]
    pub history_window: usize,

    /// Stored messages are truncated to this many characters
    #[serde(default = "default_max_message_chars")]
    pub max_message_chars: usize,
}

impl ChatConfig {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.history_window == 0 {
            return Err(ValidationError::MustBePositive("chat.history_window"));
        }
        if self.max_message_chars == 0 {
            return Err(ValidationError::MustBePositive("chat.max_message_chars"));
        }
        Ok(())
    }
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            history_window: default_history_window(),
            max_message_chars: default_max_message_chars(),
        }
    }
}

fn default_history_window() -> usize {
    DEFAULT_HISTORY_WINDOW
}

fn default_max_message_chars() -> usize {
    MAX_MESSAGE_CHARS
}
