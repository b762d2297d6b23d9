//! Prompt templates for the two language-model calls.
//!
//! Templates are deterministic: the same inputs always produce the same
//! prompt text. User text is substituted verbatim.

mod report;
mod variables;

pub use report::{format_variable_values, report_prompt, REPORT_SYSTEM_PROMPT};
pub use variables::{variables_prompt, VARIABLES_SYSTEM_PROMPT};
