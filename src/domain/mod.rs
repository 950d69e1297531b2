//! Domain layer - conversation model and shared primitives.

pub mod conversation;
pub mod foundation;
