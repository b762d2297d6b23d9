//! Application layer - Commands, Queries, and Handlers.
//!
//! This layer orchestrates domain operations and coordinates between ports.
//! Following CQRS, it separates command handlers (write) from query handlers (read).

mod errors;
pub mod handlers;

pub use errors::AnalysisError;
pub use handlers::{
    BuildChartHandler, BuildChartQuery, CreateSessionCommand, CreateSessionHandler,
    DeleteSessionCommand, DeleteSessionHandler, GenerateReportCommand, GenerateReportHandler,
    GenerateReportResult, GenerateVariablesCommand, GenerateVariablesHandler,
    GenerateVariablesResult, GenerationLocks, GetSessionHandler, GetSessionQuery, ReportGenerator,
    VariableGenerator,
};
