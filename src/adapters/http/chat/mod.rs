//! HTTP adapter for the chat endpoints.

mod dto;
mod handlers;
mod routes;

pub use dto::{ErrorResponse, HistoryResponse, MessageView, SendMessageRequest, SendMessageResponse};
pub use handlers::{ChatApiError, ChatAppState};
pub use routes::{history_routes, message_routes};
