//! Application handlers.
//!
//! Command and query handlers that orchestrate domain operations.
//!
//! ## Commands
//! - `CreateSession` - Validate inputs and start a session
//! - `DeleteSession` - End a session and discard its variables
//! - `GenerateVariables` - Generate (or return cached) sensitivity variables
//! - `GenerateReport` - Long-form TEA report for the current slider values
//!
//! ## Queries
//! - `GetSession` - Session snapshot
//! - `BuildChart` - Tornado chart for the current slider values

mod build_chart;
mod create_session;
mod delete_session;
mod generate_report;
mod generate_variables;
mod get_session;

pub use build_chart::{BuildChartHandler, BuildChartQuery};
pub use create_session::{CreateSessionCommand, CreateSessionHandler};
pub use delete_session::{DeleteSessionCommand, DeleteSessionHandler};
pub use generate_report::{
    GenerateReportCommand, GenerateReportHandler, GenerateReportResult, ReportGenerator,
};
pub use generate_variables::{
    GenerateVariablesCommand, GenerateVariablesHandler, GenerateVariablesResult, GenerationLocks,
    VariableGenerator,
};
pub use get_session::{GetSessionHandler, GetSessionQuery};
