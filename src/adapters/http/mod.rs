//! HTTP adapters - REST API implementations.
//!
//! - `chat` - message and history endpoints under `/chat`
//! - `health` - `/health` and `/ping`
//! - `router` - assembles everything with the shared tower layers

pub mod chat;
mod health;
mod router;

pub use chat::{history_routes, message_routes, ChatApiError, ChatAppState};
pub use health::{health, health_routes, ping, HealthResponse};
pub use router::{build_router, RouterConfig};
