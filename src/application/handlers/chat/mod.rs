//! Chat handlers: the send-message command and the history query, plus the
//! orchestration pieces they share.

mod generate_reply;
mod get_history;
mod load_history;
mod resolve_session;
mod send_message;

pub use generate_reply::{GenerationFailure, GenerationSettings, ReplyGenerator, FALLBACK_REPLY};
pub use get_history::{ConversationHistory, GetHistoryError, GetHistoryHandler};
pub use load_history::HistoryLoader;
pub use resolve_session::{ResolvedSession, SessionResolver};
pub use send_message::{SendMessageCommand, SendMessageError, SendMessageHandler, SendMessageResult};
