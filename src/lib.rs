//! TEA Sensitivity - Techno-economic analysis explorer
//!
//! A language model proposes the key variables of a business idea, each
//! with a plausible range. The crate turns the model's loosely formatted
//! answer into well-formed variables, charts slider values as a tornado
//! chart, and asks the model for a long-form TEA report.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
