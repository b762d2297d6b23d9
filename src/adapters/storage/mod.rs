//! Storage Adapters
//!
//! Implementations of the SessionStore port.
//!
//! ## Available Adapters
//!
//! - **InMemorySessionStore** - Process-lifetime session storage

mod in_memory_session_store;

pub use in_memory_session_store::InMemorySessionStore;
