//! HTTP handlers for analysis endpoints.
//!
//! These handlers connect Axum routes to application layer handlers.

use std::sync::Arc;

use axum::extract::{Json, Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use tracing::{error, warn};

use crate::application::{
    AnalysisError, BuildChartHandler, BuildChartQuery, CreateSessionCommand, CreateSessionHandler,
    DeleteSessionCommand, DeleteSessionHandler, GenerateReportCommand, GenerateReportHandler,
    GenerateVariablesCommand, GenerateVariablesHandler, GenerationLocks, GetSessionHandler,
    GetSessionQuery, ReportGenerator, VariableGenerator,
};
use crate::domain::foundation::SessionId;
use crate::domain::sensitivity::TornadoChartBuilder;
use crate::ports::{AIProvider, SessionStore};

use super::dto::{
    ChartRequest, ChartResponse, CreateSessionRequest, ErrorResponse, GenerateVariablesRequest,
    HealthResponse, ReportResponse, SessionResponse, SliderValuesRequest, VariablesResponse,
};
use super::extract::OptionalJson;

/// Message returned when a generation produced no usable variables.
pub const EMPTY_GENERATION_MESSAGE: &str =
    "Failed to generate variables. Please try again or refine your business idea.";

// ════════════════════════════════════════════════════════════════════════════════
// Error Type
// ════════════════════════════════════════════════════════════════════════════════

/// Analysis API error that implements IntoResponse.
#[derive(Debug)]
pub enum ApiError {
    BadRequest(String),
    InputMismatch(String),
    NotFound(String),
    EmptyGeneration,
    RemoteService(String),
    Internal(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let (status, error) = match self {
            ApiError::BadRequest(msg) => {
                (StatusCode::BAD_REQUEST, ErrorResponse::bad_request(msg))
            }
            ApiError::InputMismatch(msg) => {
                (StatusCode::BAD_REQUEST, ErrorResponse::input_mismatch(msg))
            }
            ApiError::NotFound(id) => {
                (StatusCode::NOT_FOUND, ErrorResponse::not_found("Session", &id))
            }
            ApiError::EmptyGeneration => (
                StatusCode::UNPROCESSABLE_ENTITY,
                ErrorResponse::generation_failed(EMPTY_GENERATION_MESSAGE),
            ),
            ApiError::RemoteService(msg) => {
                (StatusCode::BAD_GATEWAY, ErrorResponse::remote_service(msg))
            }
            ApiError::Internal(msg) => {
                (StatusCode::INTERNAL_SERVER_ERROR, ErrorResponse::internal(msg))
            }
        };
        (status, Json(error)).into_response()
    }
}

impl From<AnalysisError> for ApiError {
    fn from(err: AnalysisError) -> Self {
        match err {
            AnalysisError::RemoteService(e) => {
                warn!(error = %e, "Language model call failed");
                ApiError::RemoteService(e.to_string())
            }
            AnalysisError::InputMismatch(e) => ApiError::InputMismatch(e.to_string()),
            AnalysisError::SessionNotFound(id) => ApiError::NotFound(id.to_string()),
            AnalysisError::InvalidInput(msg) => ApiError::BadRequest(msg),
            AnalysisError::Storage(msg) => {
                error!(error = %msg, "Session store failure");
                ApiError::Internal(msg)
            }
        }
    }
}

fn parse_session_id(raw: &str) -> Result<SessionId, ApiError> {
    raw.parse()
        .map_err(|_| ApiError::BadRequest("Invalid session ID format".to_string()))
}

// ════════════════════════════════════════════════════════════════════════════════
// Application State
// ════════════════════════════════════════════════════════════════════════════════

/// Shared application state containing analysis dependencies.
#[derive(Clone)]
pub struct AnalysisAppState {
    pub store: Arc<dyn SessionStore>,
    pub ai_provider: Arc<dyn AIProvider>,
    pub variable_generator: Arc<VariableGenerator>,
    pub report_generator: Arc<ReportGenerator>,
    pub generation_locks: Arc<GenerationLocks>,
}

impl AnalysisAppState {
    pub fn new(
        store: Arc<dyn SessionStore>,
        ai_provider: Arc<dyn AIProvider>,
        variables_model: impl Into<String>,
        report_model: impl Into<String>,
    ) -> Self {
        let variable_generator = VariableGenerator::new(ai_provider.clone(), variables_model);
        let report_generator = ReportGenerator::new(ai_provider.clone(), report_model);

        Self {
            variable_generator: Arc::new(variable_generator),
            report_generator: Arc::new(report_generator),
            generation_locks: Arc::new(GenerationLocks::new()),
            store,
            ai_provider,
        }
    }

    pub fn create_session_handler(&self) -> CreateSessionHandler {
        CreateSessionHandler::new(self.store.clone())
    }

    pub fn get_session_handler(&self) -> GetSessionHandler {
        GetSessionHandler::new(self.store.clone())
    }

    pub fn delete_session_handler(&self) -> DeleteSessionHandler {
        DeleteSessionHandler::new(self.store.clone())
    }

    pub fn generate_variables_handler(&self) -> GenerateVariablesHandler {
        GenerateVariablesHandler::new(
            self.store.clone(),
            self.variable_generator.clone(),
            self.generation_locks.clone(),
        )
    }

    pub fn build_chart_handler(&self) -> BuildChartHandler {
        BuildChartHandler::new(self.store.clone())
    }

    pub fn generate_report_handler(&self) -> GenerateReportHandler {
        GenerateReportHandler::new(self.store.clone(), self.report_generator.clone())
    }
}

// ════════════════════════════════════════════════════════════════════════════════
// Handlers
// ════════════════════════════════════════════════════════════════════════════════

/// POST /api/sessions
pub async fn create_session(
    State(state): State<AnalysisAppState>,
    Json(request): Json<CreateSessionRequest>,
) -> Result<(StatusCode, Json<SessionResponse>), ApiError> {
    let session = state
        .create_session_handler()
        .handle(CreateSessionCommand {
            inputs: request.into_inputs(),
        })
        .await?;

    Ok((StatusCode::CREATED, Json(session)))
}

/// GET /api/sessions/:session_id
pub async fn get_session(
    State(state): State<AnalysisAppState>,
    Path(session_id): Path<String>,
) -> Result<Json<SessionResponse>, ApiError> {
    let session_id = parse_session_id(&session_id)?;

    let session = state
        .get_session_handler()
        .handle(GetSessionQuery { session_id })
        .await?;

    Ok(Json(session))
}

/// DELETE /api/sessions/:session_id
pub async fn delete_session(
    State(state): State<AnalysisAppState>,
    Path(session_id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let session_id = parse_session_id(&session_id)?;

    state
        .delete_session_handler()
        .handle(DeleteSessionCommand { session_id })
        .await?;

    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/sessions/:session_id/variables
///
/// Returns the cached batch unless `regenerate` is set. An empty batch is
/// reported as 422.
pub async fn generate_variables(
    State(state): State<AnalysisAppState>,
    Path(session_id): Path<String>,
    body: OptionalJson<GenerateVariablesRequest>,
) -> Result<Json<VariablesResponse>, ApiError> {
    let session_id = parse_session_id(&session_id)?;
    let request = body.into_inner_or_default();

    let result = state
        .generate_variables_handler()
        .handle(GenerateVariablesCommand {
            session_id,
            regenerate: request.regenerate,
        })
        .await?;

    if result.session.variables().is_empty() {
        return Err(ApiError::EmptyGeneration);
    }

    Ok(Json(VariablesResponse {
        session_id: session_id.to_string(),
        variables: result.session.variables().to_vec(),
        cached: result.cached,
    }))
}

/// POST /api/sessions/:session_id/chart
///
/// An omitted body charts the session's defaults; a malformed one is a 400.
pub async fn session_chart(
    State(state): State<AnalysisAppState>,
    Path(session_id): Path<String>,
    body: OptionalJson<SliderValuesRequest>,
) -> Result<Json<ChartResponse>, ApiError> {
    let session_id = parse_session_id(&session_id)?;
    let request = body.into_inner_or_default();

    let series = state
        .build_chart_handler()
        .handle(BuildChartQuery {
            session_id,
            values: request.values,
        })
        .await?;

    Ok(Json(series.into()))
}

/// POST /api/sessions/:session_id/report
pub async fn session_report(
    State(state): State<AnalysisAppState>,
    Path(session_id): Path<String>,
    body: OptionalJson<SliderValuesRequest>,
) -> Result<Json<ReportResponse>, ApiError> {
    let session_id = parse_session_id(&session_id)?;
    let request = body.into_inner_or_default();

    let result = state
        .generate_report_handler()
        .handle(GenerateReportCommand {
            session_id,
            values: request.values,
        })
        .await?;

    Ok(Json(ReportResponse {
        report: result.report,
        values: result.values,
    }))
}

/// POST /api/chart
///
/// Stateless chart for arbitrary names and values.
pub async fn build_chart(
    Json(request): Json<ChartRequest>,
) -> Result<Json<ChartResponse>, ApiError> {
    let series = TornadoChartBuilder::build(&request.names, &request.values)
        .map_err(|e| ApiError::InputMismatch(e.to_string()))?;

    Ok(Json(series.into()))
}

/// GET /health
pub async fn health(
    State(state): State<AnalysisAppState>,
) -> Result<Json<HealthResponse>, ApiError> {
    let sessions = state
        .store
        .count()
        .await
        .map_err(|e| ApiError::Internal(e.to_string()))?;

    Ok(Json(HealthResponse {
        status: "ok",
        provider: state.ai_provider.provider_info().name,
        variables_model: state.variable_generator.model().to_string(),
        report_model: state.report_generator.model().to_string(),
        sessions,
    }))
}
