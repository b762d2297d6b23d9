//! HTTP routes for analysis endpoints.

use axum::routing::{get, post};
use axum::Router;

use super::handlers::{
    build_chart, create_session, delete_session, generate_variables, get_session, health,
    session_chart, session_report, AnalysisAppState,
};

/// Creates the analysis router with all routes.
pub fn analysis_routes(state: AnalysisAppState) -> Router {
    Router::new()
        .route("/health", get(health))
        // POST /api/sessions
        .route("/api/sessions", post(create_session))
        // GET, DELETE /api/sessions/:session_id
        .route(
            "/api/sessions/:session_id",
            get(get_session).delete(delete_session),
        )
        // POST /api/sessions/:session_id/variables
        .route("/api/sessions/:session_id/variables", post(generate_variables))
        // POST /api/sessions/:session_id/chart
        .route("/api/sessions/:session_id/chart", post(session_chart))
        // POST /api/sessions/:session_id/report
        .route("/api/sessions/:session_id/report", post(session_report))
        // POST /api/chart
        .route("/api/chart", post(build_chart))
        .with_state(state)
}
