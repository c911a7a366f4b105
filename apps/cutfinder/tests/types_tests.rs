//! Unit tests for API types serialization/deserialization.

// Allow unwrap and panic in tests - these are standard for test code
#![allow(clippy::unwrap_used, clippy::panic)]

use axum::http::StatusCode;
use cutfinder::api::{
    CutsRequest, CutsResponse, GateInfo, GatesResponse, HealthResponse, status_for_error,
};
use cutfinder_core::{CutFinderError, GammaRule, STANDARD_GATES, SettingsError, WireName};

// =============================================================================
// HEALTH RESPONSE TESTS
// =============================================================================

#[test]
fn test_health_response_default() {
    let health = HealthResponse::default();
    assert_eq!(health.status, "ok");
    assert!(!health.version.is_empty());
}

#[test]
fn test_health_response_serialization() {
    let health = HealthResponse {
        status: "ok".to_string(),
        version: "0.4.0".to_string(),
    };

    let json = serde_json::to_string(&health).unwrap();
    assert!(json.contains("\"status\":\"ok\""));
    assert!(json.contains("\"version\":\"0.4.0\""));
}

// =============================================================================
// GATE TABLE TESTS
// =============================================================================

#[test]
fn test_gate_info_from_rules() {
    let fixed = GateInfo::from_rule("swap", GammaRule::Constant(7.0));
    assert_eq!(fixed.gamma, Some(7.0));
    assert!(fixed.formula.is_none());

    let rotation = GateInfo::from_rule("crx", GammaRule::ControlledRotation);
    assert!(rotation.gamma.is_none());
    assert_eq!(rotation.formula.as_deref(), Some("1 + 2|sin(theta/2)|"));
}

#[test]
fn test_gates_response_covers_standard_table() {
    let table = GatesResponse::default();
    assert_eq!(table.gates.len(), STANDARD_GATES.len());
    for (info, (name, _)) in table.gates.iter().zip(STANDARD_GATES) {
        assert_eq!(info.name, *name);
    }
}

#[test]
fn test_gate_info_serialization() {
    let json = serde_json::to_value(GateInfo::from_rule("cz", GammaRule::Constant(3.0))).unwrap();
    assert_eq!(json["name"], "cz");
    assert_eq!(json["gamma"], 3.0);
    assert!(json["formula"].is_null());
}

// =============================================================================
// CUTS REQUEST TESTS
// =============================================================================

#[test]
fn test_cuts_request_minimal() {
    let json = r#"{"circuit": {"instructions": [{"name": "cx", "qubits": [0, "q1"]}]}}"#;
    let request: CutsRequest = serde_json::from_str(json).unwrap();

    assert!(request.optimization.is_none());
    assert!(request.constraints.is_none());
    assert_eq!(request.circuit.len(), 1);
    assert!(request.circuit.qubits.is_empty());
}

#[test]
fn test_cuts_request_full() {
    let json = r#"{
        "circuit": {
            "qubits": ["a", "b"],
            "instructions": [
                {"name": "rzz", "params": [0.3], "qubits": ["a", "b"], "cuts": ["GateCut"]},
                "barrier"
            ]
        },
        "optimization": {"max_gamma": 100, "max_backjumps": "none", "seed": 5, "gate_lo": true, "wire_lo": false},
        "constraints": {"qubits_per_subcircuit": 1}
    }"#;
    let request: CutsRequest = serde_json::from_str(json).unwrap();

    let settings = request.optimization.unwrap();
    assert_eq!(settings.max_gamma, 100.0);
    assert_eq!(settings.max_backjumps, None);
    assert_eq!(settings.seed, Some(5));
    assert!(!settings.wire_lo);
    assert_eq!(request.constraints.unwrap().qubits_per_subcircuit, 1);
    assert_eq!(request.circuit.qubits, vec![WireName::label("a"), WireName::label("b")]);
    assert_eq!(request.circuit.len(), 2);
}

#[test]
fn test_cuts_request_missing_circuit_rejected() {
    let json = r#"{"constraints": {"qubits_per_subcircuit": 2}}"#;
    assert!(serde_json::from_str::<CutsRequest>(json).is_err());
}

// =============================================================================
// CUTS RESPONSE TESTS
// =============================================================================

#[test]
fn test_cuts_response_error() {
    let response = CutsResponse::error("No feasible cut scheme");
    let json = serde_json::to_value(&response).unwrap();

    assert_eq!(json["success"], false);
    assert!(json["result"].is_null());
    assert_eq!(json["error"], "No feasible cut scheme");
}

// =============================================================================
// ERROR STATUS MAPPING TESTS
// =============================================================================

#[test]
fn test_status_for_error() {
    assert_eq!(
        status_for_error(&CutFinderError::InvalidCircuit("x".to_string())),
        StatusCode::BAD_REQUEST
    );
    assert_eq!(
        status_for_error(&CutFinderError::InvalidSettings(SettingsError::QubitsPerSubcircuit)),
        StatusCode::BAD_REQUEST
    );
    assert_eq!(
        status_for_error(&CutFinderError::NoSolution),
        StatusCode::UNPROCESSABLE_ENTITY
    );
    assert_eq!(
        status_for_error(&CutFinderError::UnknownInstruction(4)),
        StatusCode::INTERNAL_SERVER_ERROR
    );
}
