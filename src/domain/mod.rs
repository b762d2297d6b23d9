//! Domain layer containing business logic and domain types.
//!
//! # Module Organization
//!
//! - `foundation` - Shared domain primitives (IDs, timestamps, errors)
//! - `variables` - Decoding and normalizing model-proposed variables
//! - `sensitivity` - Tornado chart ordering
//! - `session` - Analysis inputs and the per-user session
//! - `prompts` - Prompt templates for the language-model calls

pub mod foundation;
pub mod prompts;
pub mod sensitivity;
pub mod session;
pub mod variables;
