//! # API Endpoint Handlers
//!
//! This module implements the actual HTTP endpoint handlers.
//!
//! Searches are CPU-bound and run on tokio's blocking pool.

use super::{
    AppState,
    types::{CutsRequest, CutsResponse, GatesResponse, HealthResponse},
};
use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use cutfinder_core::{CutFinderError, find_cuts};

// =============================================================================
// HEALTH HANDLER
// =============================================================================

/// Health check endpoint.
pub async fn health_handler() -> impl IntoResponse {
    Json(HealthResponse::default())
}

// =============================================================================
// GATES HANDLER
// =============================================================================

/// Standard gate-cut gamma table.
pub async fn gates_handler() -> impl IntoResponse {
    Json(GatesResponse::default())
}

// =============================================================================
// CUTS HANDLER
// =============================================================================

/// HTTP status for a failed search.
///
/// Bad input is the caller's fault (400). A valid problem without a
/// feasible scheme is 422. Anything else is an internal inconsistency.
pub fn status_for_error(error: &CutFinderError) -> StatusCode {
    match error {
        CutFinderError::InvalidCircuit(_)
        | CutFinderError::InvalidSettings(_)
        | CutFinderError::SerializationError(_)
        | CutFinderError::ConfigError(_) => StatusCode::BAD_REQUEST,
        CutFinderError::NoSolution => StatusCode::UNPROCESSABLE_ENTITY,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

/// Search for a cut scheme.
///
/// Request bounds are capped by [`AppState::request_settings`].
pub async fn cuts_handler(
    State(state): State<AppState>,
    Json(request): Json<CutsRequest>,
) -> impl IntoResponse {
    let settings = state.request_settings(request.optimization);
    let Some(constraints) = request.constraints.or(state.constraints) else {
        return (
            StatusCode::BAD_REQUEST,
            Json(CutsResponse::error(
                "Missing constraints: qubits_per_subcircuit is not configured on the server",
            )),
        );
    };
    let circuit = request.circuit;

    let outcome =
        tokio::task::spawn_blocking(move || find_cuts(&circuit, &settings, &constraints)).await;

    match outcome {
        Ok(Ok(result)) => (StatusCode::OK, Json(CutsResponse::success(result))),
        Ok(Err(e)) => {
            let status = status_for_error(&e);
            if status.is_server_error() {
                tracing::error!(error = %e, "cut search failed");
            } else {
                tracing::debug!(error = %e, "cut search rejected");
            }
            (status, Json(CutsResponse::error(e.to_string())))
        }
        Err(e) => {
            tracing::error!(error = %e, "cut search task failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(CutsResponse::error("Search task failed")),
            )
        }
    }
}
