//! Adapters - Implementations of port interfaces.
//!
//! Adapters connect the domain to external systems:
//! - `ai` - Language-model providers (OpenAI, mock)
//! - `storage` - Session storage (in-memory)
//! - `http` - REST API (axum)

pub mod ai;
pub mod http;
pub mod storage;
