//! Integration tests for the analysis HTTP API.
//!
//! The router is driven in-process with `tower::ServiceExt::oneshot` against
//! a scripted mock provider and the in-memory session store.

use std::sync::Arc;
use std::time::Duration;

use axum::body::{to_bytes, Body};
use axum::Router;
use http::{Method, Request, StatusCode};
use serde_json::{json, Value};
use tower::ServiceExt;

use tea_sensitivity::adapters::ai::{MockAIProvider, MockError};
use tea_sensitivity::adapters::http::{app_router, AnalysisAppState};
use tea_sensitivity::adapters::storage::InMemorySessionStore;

// =============================================================================
// Test Infrastructure
// =============================================================================

const VARIABLES: &str = r#"[
    {"name": "Feedstock Cost", "min": 20, "max": 80, "default": 45, "step": 5},
    {"name": "Plant Capacity", "min": 100, "max": 1000, "default": 500, "step": 50},
    {"name": "Product Price", "min": 1.5, "max": 4.5, "default": 2.8, "step": 0.1}
]"#;

fn app(provider: MockAIProvider) -> Router {
    let state = AnalysisAppState::new(
        Arc::new(InMemorySessionStore::new()),
        Arc::new(provider),
        "gpt-3.5-turbo",
        "gpt-3.5-turbo-16k",
    );
    app_router(state, &[])
}

async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(json) => builder
            .header("content-type", "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };
    (status, json)
}

async fn create_session(app: &Router) -> String {
    let (status, body) = send(
        app,
        Method::POST,
        "/api/sessions",
        Some(json!({
            "business_idea": "Algae biofuel",
            "location": "Texas",
            "assumptions": "Cheap land",
            "unit_of_interest": "Process"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    body["id"].as_str().unwrap().to_string()
}

// =============================================================================
// Sessions
// =============================================================================

#[tokio::test]
async fn health_reports_wiring() {
    let app = app(MockAIProvider::new());

    let (status, body) = send(&app, Method::GET, "/health", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert_eq!(body["provider"], "mock");
    assert_eq!(body["report_model"], "gpt-3.5-turbo-16k");
    assert_eq!(body["sessions"], 0);
}

#[tokio::test]
async fn create_and_fetch_session() {
    let app = app(MockAIProvider::new());
    let id = create_session(&app).await;

    let (status, body) = send(&app, Method::GET, &format!("/api/sessions/{}", id), None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["inputs"]["business_idea"], "Algae biofuel");
    assert_eq!(body["inputs"]["unit_of_interest"], "Process");
    assert_eq!(body["generated"], false);
    assert!(body["inputs"]["example_teas"].as_str().unwrap().contains("https://"));
}

#[tokio::test]
async fn blank_location_is_bad_request() {
    let app = app(MockAIProvider::new());

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/sessions",
        Some(json!({ "business_idea": "Algae biofuel", "location": "  " })),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "BAD_REQUEST");
}

#[tokio::test]
async fn unknown_session_is_not_found() {
    let app = app(MockAIProvider::new());
    let uri = format!("/api/sessions/{}", uuid::Uuid::new_v4());

    let (status, body) = send(&app, Method::GET, &uri, None).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], "NOT_FOUND");
}

#[tokio::test]
async fn malformed_session_id_is_bad_request() {
    let app = app(MockAIProvider::new());

    let (status, _) = send(&app, Method::GET, "/api/sessions/not-a-uuid", None).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
}

// =============================================================================
// Variables
// =============================================================================

#[tokio::test]
async fn generate_variables_then_serve_cached() {
    let provider = MockAIProvider::new().with_response(VARIABLES);
    let app = app(provider.clone());
    let id = create_session(&app).await;
    let uri = format!("/api/sessions/{}/variables", id);

    let (status, first) = send(&app, Method::POST, &uri, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(first["cached"], false);
    assert_eq!(first["variables"].as_array().unwrap().len(), 3);
    assert_eq!(first["variables"][0]["name"], "Feedstock Cost");

    let (status, second) = send(&app, Method::POST, &uri, Some(json!({}))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(second["cached"], true);
    assert_eq!(provider.call_count(), 1);
}

#[tokio::test]
async fn regenerate_calls_model_again() {
    let provider = MockAIProvider::new()
        .with_response(VARIABLES)
        .with_response(r#"[{"name":"Yield","min":1,"max":3,"default":2,"step":0.5}]"#);
    let app = app(provider.clone());
    let id = create_session(&app).await;
    let uri = format!("/api/sessions/{}/variables", id);

    send(&app, Method::POST, &uri, None).await;
    let (status, body) = send(&app, Method::POST, &uri, Some(json!({ "regenerate": true }))).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["variables"].as_array().unwrap().len(), 1);
    assert_eq!(provider.call_count(), 2);
}

#[tokio::test]
async fn empty_generation_is_unprocessable() {
    let app = app(MockAIProvider::new().with_response("Sorry, I can't help with that."));
    let id = create_session(&app).await;

    let (status, body) = send(
        &app,
        Method::POST,
        &format!("/api/sessions/{}/variables", id),
        None,
    )
    .await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(
        body["message"],
        "Failed to generate variables. Please try again or refine your business idea."
    );
}

#[tokio::test]
async fn remote_failure_is_bad_gateway() {
    let app = app(MockAIProvider::new().with_error(MockError::Unavailable {
        message: "upstream down".to_string(),
    }));
    let id = create_session(&app).await;

    let (status, body) = send(
        &app,
        Method::POST,
        &format!("/api/sessions/{}/variables", id),
        None,
    )
    .await;

    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(body["code"], "REMOTE_SERVICE_ERROR");
}

// =============================================================================
// Charts and reports
// =============================================================================

#[tokio::test]
async fn session_chart_uses_defaults_and_clamps() {
    let app = app(MockAIProvider::new().with_response(VARIABLES));
    let id = create_session(&app).await;
    send(&app, Method::POST, &format!("/api/sessions/{}/variables", id), None).await;
    let uri = format!("/api/sessions/{}/chart", id);

    let (status, defaults) = send(&app, Method::POST, &uri, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(defaults["entries"].as_array().unwrap().len(), 3);
    // Plant Capacity (500) is furthest from the mean of 45, 500, 2.8
    assert_eq!(defaults["display_order"][0]["name"], "Plant Capacity");

    let (status, clamped) = send(
        &app,
        Method::POST,
        &uri,
        Some(json!({ "values": [1000.0, 500.0, 2.8] })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let feedstock = clamped["entries"]
        .as_array()
        .unwrap()
        .iter()
        .find(|e| e["name"] == "Feedstock Cost")
        .unwrap();
    assert_eq!(feedstock["value"], 80.0);
}

#[tokio::test]
async fn session_chart_rejects_misaligned_values() {
    let app = app(MockAIProvider::new().with_response(VARIABLES));
    let id = create_session(&app).await;
    send(&app, Method::POST, &format!("/api/sessions/{}/variables", id), None).await;

    let (status, body) = send(
        &app,
        Method::POST,
        &format!("/api/sessions/{}/chart", id),
        Some(json!({ "values": [1.0] })),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "INPUT_MISMATCH");
}

#[tokio::test]
async fn report_returns_model_text() {
    let provider = MockAIProvider::new()
        .with_response(VARIABLES)
        .with_response("Executive Summary\n\nLooks promising.");
    let app = app(provider.clone());
    let id = create_session(&app).await;
    send(&app, Method::POST, &format!("/api/sessions/{}/variables", id), None).await;

    let uri = format!("/api/sessions/{}/report", id);
    let (status, body) = send(&app, Method::POST, &uri, None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["report"], "Executive Summary\n\nLooks promising.");
    assert_eq!(body["values"], json!([45.0, 500.0, 2.8]));

    let calls = provider.get_calls();
    assert_eq!(calls[1].model.as_deref(), Some("gpt-3.5-turbo-16k"));
    assert!(calls[1]
        .user_prompt()
        .unwrap()
        .contains("Feedstock Cost: 45.0, Plant Capacity: 500.0, Product Price: 2.8"));
}

#[tokio::test]
async fn malformed_slider_values_are_rejected_not_defaulted() {
    let provider = MockAIProvider::new()
        .with_response(VARIABLES)
        .with_response("REPORT");
    let app = app(provider.clone());
    let id = create_session(&app).await;
    send(&app, Method::POST, &format!("/api/sessions/{}/variables", id), None).await;

    let chart_uri = format!("/api/sessions/{}/chart", id);
    let (status, body) =
        send(&app, Method::POST, &chart_uri, Some(json!({ "values": "seventy" }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "BAD_REQUEST");

    let report_uri = format!("/api/sessions/{}/report", id);
    let (status, body) = send(
        &app,
        Method::POST,
        &report_uri,
        Some(json!({ "values": [30, "lots", 2.0] })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "BAD_REQUEST");

    // Only the generation call reached the model
    assert_eq!(provider.call_count(), 1);
}

#[tokio::test]
async fn malformed_generation_body_is_rejected() {
    let provider = MockAIProvider::new().with_response(VARIABLES);
    let app = app(provider.clone());
    let id = create_session(&app).await;

    let (status, body) = send(
        &app,
        Method::POST,
        &format!("/api/sessions/{}/variables", id),
        Some(json!({ "regenerate": "please" })),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "BAD_REQUEST");
    assert_eq!(provider.call_count(), 0);
}

#[tokio::test]
async fn unparseable_json_body_is_rejected() {
    let app = app(MockAIProvider::new().with_response(VARIABLES));
    let id = create_session(&app).await;
    send(&app, Method::POST, &format!("/api/sessions/{}/variables", id), None).await;

    let request = Request::builder()
        .method(Method::POST)
        .uri(format!("/api/sessions/{}/chart", id))
        .header("content-type", "application/json")
        .body(Body::from("{\"values\": [1.0,"))
        .unwrap();
    let response = app.clone().oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn empty_json_body_uses_defaults() {
    let app = app(MockAIProvider::new().with_response(VARIABLES));
    let id = create_session(&app).await;
    send(&app, Method::POST, &format!("/api/sessions/{}/variables", id), None).await;

    let (status, body) = send(
        &app,
        Method::POST,
        &format!("/api/sessions/{}/chart", id),
        Some(json!({})),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["entries"].as_array().unwrap().len(), 3);
}

#[tokio::test]
async fn report_before_generation_is_bad_request() {
    let app = app(MockAIProvider::new());
    let id = create_session(&app).await;

    let (status, _) = send(&app, Method::POST, &format!("/api/sessions/{}/report", id), None).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn stateless_chart_orders_by_deviation() {
    let app = app(MockAIProvider::new());

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/chart",
        Some(json!({ "names": ["A", "B", "C"], "values": [10, 12, 100] })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    let names: Vec<&str> = body["entries"]
        .as_array()
        .unwrap()
        .iter()
        .map(|e| e["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["B", "A", "C"]);
}

#[tokio::test]
async fn stateless_chart_rejects_mismatch() {
    let app = app(MockAIProvider::new());

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/chart",
        Some(json!({ "names": ["A", "B"], "values": [1] })),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Input mismatch: 2 names but 1 values");
}

// =============================================================================
// Session lifecycle
// =============================================================================

#[tokio::test]
async fn delete_session_discards_it() {
    let app = app(MockAIProvider::new().with_response(VARIABLES));
    let id = create_session(&app).await;
    let uri = format!("/api/sessions/{}", id);
    send(&app, Method::POST, &format!("{}/variables", uri), None).await;

    let (status, _) = send(&app, Method::DELETE, &uri, None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, _) = send(&app, Method::GET, &uri, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (_, health) = send(&app, Method::GET, "/health", None).await;
    assert_eq!(health["sessions"], 0);
}

#[tokio::test]
async fn delete_unknown_session_is_not_found() {
    let app = app(MockAIProvider::new());
    let uri = format!("/api/sessions/{}", uuid::Uuid::new_v4());

    let (status, body) = send(&app, Method::DELETE, &uri, None).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], "NOT_FOUND");
}

#[tokio::test]
async fn concurrent_generation_calls_model_once() {
    let provider = MockAIProvider::new()
        .with_response(VARIABLES)
        .with_response(VARIABLES)
        .with_delay(Duration::from_millis(50));
    let app = app(provider.clone());
    let id = create_session(&app).await;
    let uri = format!("/api/sessions/{}/variables", id);

    let ((first, a), (second, b)) = tokio::join!(
        send(&app, Method::POST, &uri, None),
        send(&app, Method::POST, &uri, None)
    );

    assert_eq!(first, StatusCode::OK);
    assert_eq!(second, StatusCode::OK);
    assert_eq!(provider.call_count(), 1);
    assert_ne!(a["cached"], b["cached"]);
    assert_eq!(a["variables"], b["variables"]);
}
