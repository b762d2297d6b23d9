//! Analysis HTTP adapter module.
//!
//! REST endpoints for sessions, variable generation, charts and reports.

pub mod dto;
pub mod extract;
pub mod handlers;
pub mod routes;

pub use dto::ErrorResponse;
pub use extract::OptionalJson;
pub use handlers::{AnalysisAppState, ApiError, EMPTY_GENERATION_MESSAGE};
pub use routes::analysis_routes;
