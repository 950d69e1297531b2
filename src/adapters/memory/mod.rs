//! In-memory adapters for tests and database-free local runs.

mod conversation_store;

pub use conversation_store::InMemoryConversationStore;
