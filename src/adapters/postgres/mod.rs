//! PostgreSQL adapters - Database implementations for storage ports.
//!
//! - `PostgresConversationStore` - Conversations and messages
//! - `connect_pool` / `run_migrations` - Pool setup and schema

mod conversation_store;
mod pool;

pub use conversation_store::PostgresConversationStore;
pub use pool::{connect_pool, run_migrations};
