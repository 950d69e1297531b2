//! HTTP handlers for chat endpoints.
//!
//! These handlers connect Axum routes to the chat command and query handlers.

use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::extract::{Json, Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use crate::application::handlers::chat::{
    GenerationFailure, GetHistoryError, GetHistoryHandler, SendMessageCommand, SendMessageError,
    SendMessageHandler,
};
use crate::domain::foundation::ConversationId;

use super::dto::{ErrorResponse, HistoryResponse, MessageView, SendMessageRequest, SendMessageResponse};

const MESSAGE_REQUIRED: &str = "Message is required and must be a string";
const MESSAGE_EMPTY: &str = "Message cannot be empty";
const SESSION_REQUIRED: &str = "Session ID is required";
const CONVERSATION_NOT_FOUND: &str = "Conversation not found";
const HISTORY_FAILED: &str = "Failed to fetch conversation history";
const UNEXPECTED: &str = "An unexpected error occurred. Please try again.";

// ════════════════════════════════════════════════════════════════════════════════
// Application State
// ════════════════════════════════════════════════════════════════════════════════

/// Shared application state for chat handlers.
#[derive(Clone)]
pub struct ChatAppState {
    pub send_message: Arc<SendMessageHandler>,
    pub get_history: Arc<GetHistoryHandler>,
}

impl ChatAppState {
    pub fn new(send_message: SendMessageHandler, get_history: GetHistoryHandler) -> Self {
        Self {
            send_message: Arc::new(send_message),
            get_history: Arc::new(get_history),
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════════
// POST /chat/message
// ════════════════════════════════════════════════════════════════════════════════

/// POST /chat/message - Send a message and get the assistant's reply.
///
/// The exchange runs on its own task so that a client disconnect does not
/// abort persistence halfway through.
///
/// # Errors
/// - 400 Bad Request: body is not JSON, or `message` is missing, not a string, or blank
/// - 500 Internal Server Error: reply generation failed (`sessionId` included)
/// - 500 Internal Server Error: unexpected failure (no `sessionId`)
pub async fn send_message(
    State(state): State<ChatAppState>,
    payload: Result<Json<SendMessageRequest>, JsonRejection>,
) -> Result<Json<SendMessageResponse>, ChatApiError> {
    let Json(request) = payload.map_err(|rejection| {
        tracing::debug!(error = %rejection, "Rejected chat message body");
        ChatApiError::BadRequest(MESSAGE_REQUIRED)
    })?;

    let message = request
        .message_text()
        .ok_or(ChatApiError::BadRequest(MESSAGE_REQUIRED))?
        .to_string();
    let command = SendMessageCommand::new(message, request.session_token());

    let handler = state.send_message.clone();
    let result = tokio::spawn(async move { handler.handle(command).await })
        .await
        .map_err(|e| ChatApiError::Internal(format!("chat task failed: {}", e)))??;

    Ok(Json(SendMessageResponse {
        reply: result.reply().to_string(),
        session_id: result.session_id.to_string(),
    }))
}

// ════════════════════════════════════════════════════════════════════════════════
// GET /chat/history/:session_id
// ════════════════════════════════════════════════════════════════════════════════

/// GET /chat/history/:session_id - Full transcript, oldest first.
///
/// `sessionId` echoes the path token as received, so a client that stored
/// an upper-case id gets the same string back.
///
/// # Errors
/// - 400 Bad Request: blank session id
/// - 404 Not Found: unknown or malformed session id
/// - 500 Internal Server Error: storage failure
pub async fn get_history(
    State(state): State<ChatAppState>,
    Path(session_id): Path<String>,
) -> Result<Json<HistoryResponse>, ChatApiError> {
    let history = state.get_history.handle(&session_id).await?;

    Ok(Json(HistoryResponse {
        session_id,
        messages: history.messages.iter().map(MessageView::from).collect(),
    }))
}

/// GET /chat/history - The session id path segment is missing.
pub async fn missing_session_id() -> ChatApiError {
    ChatApiError::BadRequest(SESSION_REQUIRED)
}

// ════════════════════════════════════════════════════════════════════════════════
// Error Handling
// ════════════════════════════════════════════════════════════════════════════════

/// API error type that converts to HTTP responses.
#[derive(Debug)]
pub enum ChatApiError {
    BadRequest(&'static str),
    NotFound(&'static str),
    /// Reply generation failed; the apology was already stored.
    Generation {
        session_id: ConversationId,
        failure: GenerationFailure,
    },
    HistoryUnavailable(String),
    Internal(String),
}

impl From<SendMessageError> for ChatApiError {
    fn from(err: SendMessageError) -> Self {
        match err {
            SendMessageError::InvalidMessage(_) => ChatApiError::BadRequest(MESSAGE_EMPTY),
            SendMessageError::Generation {
                session_id,
                failure,
            } => ChatApiError::Generation {
                session_id,
                failure,
            },
            SendMessageError::Store(e) => ChatApiError::Internal(e.to_string()),
        }
    }
}

impl From<GetHistoryError> for ChatApiError {
    fn from(err: GetHistoryError) -> Self {
        match err {
            GetHistoryError::MissingSessionId => ChatApiError::BadRequest(SESSION_REQUIRED),
            GetHistoryError::NotFound => ChatApiError::NotFound(CONVERSATION_NOT_FOUND),
            GetHistoryError::Store(e) => ChatApiError::HistoryUnavailable(e.to_string()),
        }
    }
}

impl IntoResponse for ChatApiError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            ChatApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, ErrorResponse::new(msg)),
            ChatApiError::NotFound(msg) => (StatusCode::NOT_FOUND, ErrorResponse::new(msg)),
            ChatApiError::Generation {
                session_id,
                failure,
            } => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorResponse::new(failure.user_message()).with_session(session_id.to_string()),
            ),
            ChatApiError::HistoryUnavailable(msg) => {
                tracing::error!(error = %msg, "History retrieval failed");
                (StatusCode::INTERNAL_SERVER_ERROR, ErrorResponse::new(HISTORY_FAILED))
            }
            ChatApiError::Internal(msg) => {
                tracing::error!(error = %msg, "Chat request failed");
                (StatusCode::INTERNAL_SERVER_ERROR, ErrorResponse::new(UNEXPECTED))
            }
        };

        (status, Json(body)).into_response()
    }
}
