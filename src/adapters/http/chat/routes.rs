//! Axum routes for chat endpoints.

use axum::routing::{get, post};
use axum::Router;

use super::handlers::{get_history, missing_session_id, send_message, ChatAppState};

/// POST /chat/message - Send a message, receive a reply.
///
/// Kept apart from the other routes so the HTTP request timeout does not
/// cut an exchange short; the reply generator enforces its own deadline.
pub fn message_routes() -> Router<ChatAppState> {
    Router::new().route("/chat/message", post(send_message))
}

/// GET /chat/history/:session_id - Full transcript.
pub fn history_routes() -> Router<ChatAppState> {
    Router::new()
        .route("/chat/history", get(missing_session_id))
        .route("/chat/history/", get(missing_session_id))
        .route("/chat/history/:session_id", get(get_history))
}
