//! Support Chat - Customer-support chat backend
//!
//! Accepts a shopper's message, keeps a bounded conversational context,
//! asks a hosted language model for a reply, and persists the exchange for
//! later retrieval by the chat widget.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
pub mod telemetry;
