//! HTTP DTOs for analysis endpoints.

use serde::{Deserialize, Serialize};

use crate::domain::sensitivity::{ChartEntry, ChartSeries};
use crate::domain::session::{
    AnalysisInputs, AnalysisSession, UnitOfInterest, DEFAULT_EXAMPLE_TEAS,
};
use crate::domain::variables::Variable;

// ════════════════════════════════════════════════════════════════════════════════
// Request DTOs
// ════════════════════════════════════════════════════════════════════════════════

/// Body of `POST /api/sessions`.
///
/// Every field defaults so that a missing idea or location is reported as a
/// validation failure rather than a deserialization failure.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct CreateSessionRequest {
    pub business_idea: String,
    pub location: String,
    pub assumptions: String,
    pub example_teas: Option<String>,
    pub unit_of_interest: UnitOfInterest,
}

impl CreateSessionRequest {
    pub fn into_inputs(self) -> AnalysisInputs {
        AnalysisInputs::new(self.business_idea, self.location)
            .with_assumptions(self.assumptions)
            .with_example_teas(
                self.example_teas
                    .unwrap_or_else(|| DEFAULT_EXAMPLE_TEAS.to_string()),
            )
            .with_unit_of_interest(self.unit_of_interest)
    }
}

/// Body of `POST /api/sessions/:session_id/variables`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct GenerateVariablesRequest {
    #[serde(default)]
    pub regenerate: bool,
}

/// Body of the chart and report endpoints; omitted values mean defaults.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SliderValuesRequest {
    #[serde(default)]
    pub values: Option<Vec<f64>>,
}

/// Body of `POST /api/chart`.
#[derive(Debug, Clone, Deserialize)]
pub struct ChartRequest {
    pub names: Vec<String>,
    pub values: Vec<f64>,
}

// ════════════════════════════════════════════════════════════════════════════════
// Response DTOs
// ════════════════════════════════════════════════════════════════════════════════

/// Variables for a session.
#[derive(Debug, Clone, Serialize)]
pub struct VariablesResponse {
    pub session_id: String,
    pub variables: Vec<Variable>,
    pub cached: bool,
}

/// Tornado chart in build order plus largest-deviation-first order.
#[derive(Debug, Clone, Serialize)]
pub struct ChartResponse {
    pub entries: Vec<ChartEntry>,
    pub mean: f64,
    pub display_order: Vec<ChartEntry>,
}

impl From<ChartSeries> for ChartResponse {
    fn from(series: ChartSeries) -> Self {
        let display_order = series.display_order().cloned().collect();
        Self {
            entries: series.entries,
            mean: series.mean,
            display_order,
        }
    }
}

/// Generated report.
#[derive(Debug, Clone, Serialize)]
pub struct ReportResponse {
    pub report: String,
    pub values: Vec<f64>,
}

/// Session snapshot.
pub type SessionResponse = AnalysisSession;

/// Liveness and wiring information.
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub provider: String,
    pub variables_model: String,
    pub report_model: String,
    pub sessions: usize,
}

/// Standard error response.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    pub code: String,
    pub message: String,
}

impl ErrorResponse {
    fn new(code: &str, message: impl Into<String>) -> Self {
        Self {
            code: code.to_string(),
            message: message.into(),
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new("BAD_REQUEST", message)
    }

    pub fn input_mismatch(message: impl Into<String>) -> Self {
        Self::new("INPUT_MISMATCH", message)
    }

    pub fn not_found(resource_type: &str, id: &str) -> Self {
        Self::new("NOT_FOUND", format!("{} not found: {}", resource_type, id))
    }

    pub fn generation_failed(message: impl Into<String>) -> Self {
        Self::new("GENERATION_FAILED", message)
    }

    pub fn remote_service(message: impl Into<String>) -> Self {
        Self::new("REMOTE_SERVICE_ERROR", message)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new("INTERNAL_ERROR", message)
    }
}
