//! Integration tests for the cutfinder HTTP API.
//!
//! Uses axum-test to test the API handlers without starting a real server.

// Allow unwrap and panic in tests - these are standard for test code
// Allow holding MutexGuard across await - env-dependent tests are serialized
#![allow(clippy::unwrap_used, clippy::panic, clippy::await_holding_lock)]

use axum::body::Body;
use axum::http::{HeaderValue, Request, StatusCode};
use axum_test::TestServer;
use cutfinder::api::{AppState, CutsResponse, GatesResponse, HealthResponse, create_router};
use cutfinder_core::{CutKind, DeviceConstraints, OptimizationSettings};
use serde_json::{Value, json};
use std::sync::{Mutex, MutexGuard};
use tower::ServiceExt;

/// Serializes tests that read or write the CUTFINDER_* env vars.
static ENV_TEST_MUTEX: Mutex<()> = Mutex::new(());

// =============================================================================
// HELPER FUNCTIONS
// =============================================================================

/// Holds the env mutex and clears the env vars on drop.
struct TestGuard {
    _guard: MutexGuard<'static, ()>,
}

impl Drop for TestGuard {
    fn drop(&mut self) {
        // SAFETY: env access is serialized by ENV_TEST_MUTEX.
        unsafe {
            std::env::remove_var("CUTFINDER_API_KEY");
            std::env::remove_var("CUTFINDER_RATE_LIMIT");
        }
    }
}

/// Lock the env and set the security knobs for one test.
fn lock_env(api_key: Option<&str>, rate_limit: u32) -> TestGuard {
    let guard = ENV_TEST_MUTEX.lock().unwrap_or_else(|e| e.into_inner());
    // SAFETY: env access is serialized by ENV_TEST_MUTEX.
    unsafe {
        match api_key {
            Some(key) => std::env::set_var("CUTFINDER_API_KEY", key),
            None => std::env::remove_var("CUTFINDER_API_KEY"),
        }
        std::env::set_var("CUTFINDER_RATE_LIMIT", rate_limit.to_string());
    }
    TestGuard { _guard: guard }
}

/// Test server without auth or rate limiting and no default constraints.
fn create_test_server() -> (TestServer, TestGuard) {
    create_test_server_with(AppState::default())
}

fn create_test_server_with(state: AppState) -> (TestServer, TestGuard) {
    let guard = lock_env(None, 0);
    let server = TestServer::new(create_router(state)).unwrap();
    (server, guard)
}

fn create_auth_test_server(api_key: &str) -> (TestServer, TestGuard) {
    let guard = lock_env(Some(api_key), 0);
    let server = TestServer::new(create_router(AppState::default())).unwrap();
    (server, guard)
}

fn cx_chain_request() -> Value {
    json!({
        "circuit": {
            "instructions": [
                {"name": "cx", "qubits": ["a", "b"]},
                {"name": "cx", "qubits": ["b", "c"]}
            ]
        },
        "optimization": {"max_gamma": "inf", "max_backjumps": "none", "wire_lo": false},
        "constraints": {"qubits_per_subcircuit": 2}
    })
}

// =============================================================================
// HEALTH ENDPOINT TESTS
// =============================================================================

#[tokio::test]
async fn test_health_endpoint() {
    let (server, _guard) = create_test_server();

    let response = server.get("/health").await;

    response.assert_status_ok();
    let health: HealthResponse = response.json();
    assert_eq!(health.status, "ok");
    assert_eq!(health.version, env!("CARGO_PKG_VERSION"));
}

// =============================================================================
// GATES ENDPOINT TESTS
// =============================================================================

#[tokio::test]
async fn test_gates_table() {
    let (server, _guard) = create_test_server();

    let response = server.get("/gates").await;

    response.assert_status_ok();
    let table: GatesResponse = response.json();
    let cx = table.gates.iter().find(|g| g.name == "cx").unwrap();
    assert_eq!(cx.gamma, Some(3.0));
    let rzz = table.gates.iter().find(|g| g.name == "rzz").unwrap();
    assert_eq!(rzz.gamma, None);
    assert!(rzz.formula.is_some());
}

// =============================================================================
// CUTS ENDPOINT TESTS
// =============================================================================

#[tokio::test]
async fn test_cuts_exhaustive_gate_cut() {
    let (server, _guard) = create_test_server();

    let response = server.post("/cuts").json(&cx_chain_request()).await;

    response.assert_status_ok();
    let body: CutsResponse = response.json();
    assert!(body.success);
    assert!(body.error.is_none());
    let result = body.result.unwrap();
    assert!(result.metadata.minimum_reached);
    assert_eq!(result.metadata.sampling_overhead, 9.0);
    assert_eq!(result.metadata.cuts.len(), 1);
    assert_eq!(result.metadata.cuts[0].kind, CutKind::Gate);
    assert!(result.circuit.subcircuits.iter().all(|s| s.len() <= 2));
}

#[tokio::test]
async fn test_cuts_response_shape() {
    let (server, _guard) = create_test_server();

    let response = server.post("/cuts").json(&cx_chain_request()).await;
    let body: Value = response.json();

    assert_eq!(body["success"], true);
    assert!(body["error"].is_null());
    assert_eq!(body["result"]["metadata"]["minimum_reached"], true);
    assert_eq!(body["result"]["metadata"]["cuts"][0]["cut_type"], "LO");
    assert!(body["result"]["metadata"]["stats"]["states_visited"].is_u64());
    assert_eq!(body["result"]["circuit"]["num_wires"], 3);
}

#[tokio::test]
async fn test_cuts_uses_server_constraints() {
    let state = AppState::new(
        OptimizationSettings::default(),
        Some(DeviceConstraints::new(1).unwrap()),
    );
    let (server, _guard) = create_test_server_with(state);

    let response = server
        .post("/cuts")
        .json(&json!({
            "circuit": {"instructions": [{"name": "cx", "qubits": [0, 1]}]}
        }))
        .await;

    response.assert_status_ok();
    let body: CutsResponse = response.json();
    let result = body.result.unwrap();
    assert_eq!(result.circuit.subcircuit_labels.as_deref(), Some("AB"));
}

#[tokio::test]
async fn test_cuts_request_bounds_capped_by_server() {
    let ceiling = OptimizationSettings::new(1024.0, Some(0), Some(111)).unwrap();
    let (server, _guard) = create_test_server_with(AppState::new(ceiling, None));

    // Asks for an exhaustive search; the server allows no backjumps
    let response = server.post("/cuts").json(&cx_chain_request()).await;

    response.assert_status_ok();
    let body: CutsResponse = response.json();
    let metadata = body.result.unwrap().metadata;
    assert_eq!(metadata.stats.states_visited, 0);
    assert_eq!(metadata.stats.backjumps, 0);
    assert!(!metadata.minimum_reached);
    assert_eq!(metadata.sampling_overhead, 9.0);
}

#[tokio::test]
async fn test_cuts_missing_constraints() {
    let (server, _guard) = create_test_server();

    let response = server
        .post("/cuts")
        .json(&json!({
            "circuit": {"instructions": [{"name": "cx", "qubits": [0, 1]}]}
        }))
        .await;

    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    let body: CutsResponse = response.json();
    assert!(!body.success);
    assert!(body.result.is_none());
    assert!(body.error.unwrap().contains("qubits_per_subcircuit"));
}

#[tokio::test]
async fn test_cuts_no_solution_is_422() {
    let (server, _guard) = create_test_server();

    let response = server
        .post("/cuts")
        .json(&json!({
            "circuit": {"instructions": [{"name": "ccx", "qubits": ["a", "b", "c"]}]},
            "constraints": {"qubits_per_subcircuit": 2}
        }))
        .await;

    assert_eq!(response.status_code(), StatusCode::UNPROCESSABLE_ENTITY);
    let body: CutsResponse = response.json();
    assert!(!body.success);
}

#[tokio::test]
async fn test_cuts_invalid_circuit_is_400() {
    let (server, _guard) = create_test_server();

    let response = server
        .post("/cuts")
        .json(&json!({
            "circuit": {"instructions": [{"name": "cx", "qubits": ["a", "a"]}]},
            "constraints": {"qubits_per_subcircuit": 2}
        }))
        .await;

    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    let body: CutsResponse = response.json();
    assert!(body.error.unwrap().contains("Invalid circuit"));
}

#[tokio::test]
async fn test_cuts_invalid_settings_is_400() {
    let (server, _guard) = create_test_server();

    let response = server
        .post("/cuts")
        .json(&json!({
            "circuit": {"instructions": [{"name": "cx", "qubits": [0, 1]}]},
            "optimization": {"max_gamma": 0.5},
            "constraints": {"qubits_per_subcircuit": 2}
        }))
        .await;

    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_cuts_via_tower_oneshot() {
    let _guard = lock_env(None, 0);
    let router = create_router(AppState::default());

    let request = Request::builder()
        .method("POST")
        .uri("/cuts")
        .header("content-type", "application/json")
        .body(Body::from(cx_chain_request().to_string()))
        .unwrap();
    let response = router.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
}

// =============================================================================
// ERROR HANDLING TESTS
// =============================================================================

#[tokio::test]
async fn test_404_on_unknown_endpoint() {
    let (server, _guard) = create_test_server();

    let response = server.get("/unknown").await;
    response.assert_status_not_found();
}

#[tokio::test]
async fn test_method_not_allowed() {
    let (server, _guard) = create_test_server();

    let response = server.get("/cuts").await;
    assert_eq!(response.status_code().as_u16(), 405);
}

#[tokio::test]
async fn test_invalid_json_body() {
    let (server, _guard) = create_test_server();

    let response = server
        .post("/cuts")
        .bytes(bytes::Bytes::from("not valid json"))
        .content_type("application/json")
        .await;

    assert!(response.status_code().is_client_error());
}

// =============================================================================
// AUTHENTICATION MIDDLEWARE TESTS
// =============================================================================

#[tokio::test]
async fn test_auth_valid_bearer_token() {
    let api_key = "test-secret-key-12345";
    let (server, _guard) = create_auth_test_server(api_key);

    let response = server
        .get("/gates")
        .add_header(
            axum::http::header::AUTHORIZATION,
            format!("Bearer {}", api_key)
                .parse::<HeaderValue>()
                .unwrap(),
        )
        .await;

    response.assert_status_ok();
}

#[tokio::test]
async fn test_auth_invalid_token_rejected() {
    let (server, _guard) = create_auth_test_server("correct-key");

    let response = server
        .post("/cuts")
        .add_header(
            axum::http::header::AUTHORIZATION,
            "Bearer wrong-key".parse::<HeaderValue>().unwrap(),
        )
        .json(&cx_chain_request())
        .await;

    assert_eq!(response.status_code().as_u16(), 401);
}

#[tokio::test]
async fn test_auth_missing_header_rejected() {
    let (server, _guard) = create_auth_test_server("required-key");

    let response = server.get("/gates").await;

    assert_eq!(response.status_code().as_u16(), 401);
}

#[tokio::test]
async fn test_auth_bearer_prefix_only_rejected() {
    let (server, _guard) = create_auth_test_server("actual-key");

    let response = server
        .get("/gates")
        .add_header(
            axum::http::header::AUTHORIZATION,
            "Bearer ".parse::<HeaderValue>().unwrap(),
        )
        .await;

    assert_eq!(response.status_code().as_u16(), 401);
}

#[tokio::test]
async fn test_auth_health_endpoint_bypasses_auth() {
    let (server, _guard) = create_auth_test_server("secret-key-for-bypass-test");

    let response = server.get("/health").await;

    response.assert_status_ok();
}

// =============================================================================
// RATE LIMIT TESTS
// =============================================================================

#[tokio::test]
async fn test_rate_limit_rejects_burst() {
    let _guard = lock_env(None, 1);
    let server = TestServer::new(create_router(AppState::default())).unwrap();

    let first = server.get("/health").await;
    let second = server.get("/health").await;

    first.assert_status_ok();
    assert_eq!(second.status_code(), StatusCode::TOO_MANY_REQUESTS);
    let retry_after: u64 = second
        .header("retry-after")
        .to_str()
        .unwrap()
        .parse()
        .unwrap();
    assert!(retry_after >= 1);
}
