//! Adapters - Implementations of port interfaces.
//!
//! Adapters connect the domain to external systems:
//! - `ai` - Language model providers (Groq, mocks)
//! - `postgres` - Durable conversation store
//! - `memory` - In-process conversation store
//! - `http` - Axum REST endpoints

pub mod ai;
pub mod http;
pub mod memory;
pub mod postgres;
