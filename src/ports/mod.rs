//! Ports - Interfaces for external dependencies.
//!
//! Following hexagonal architecture, ports define the contracts between
//! the application and the outside world. Adapters implement these ports.
//!
//! - `ConversationStore` - Durable conversations and messages
//! - `AIProvider` - Hosted language model completions

mod ai_provider;
mod conversation_store;

pub use ai_provider::{
    AIError, AIProvider, CompletionRequest, CompletionResponse, FinishReason, Message,
    MessageRole, ProviderInfo, RequestMetadata, TokenUsage,
};
pub use conversation_store::{ConversationStore, StoreError};
