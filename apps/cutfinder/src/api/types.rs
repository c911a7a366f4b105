//! # API Request/Response Types
//!
//! This module defines the JSON structures for the HTTP API.

use cutfinder_core::{
    Circuit, CutResult, DeviceConstraints, GammaRule, OptimizationSettings, STANDARD_GATES,
};
use serde::{Deserialize, Serialize};

// =============================================================================
// HEALTH RESPONSE
// =============================================================================

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

impl Default for HealthResponse {
    fn default() -> Self {
        Self {
            status: "ok".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}

// =============================================================================
// GATE TABLE
// =============================================================================

/// One entry of the standard gate-cut gamma table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GateInfo {
    pub name: String,
    /// Fixed gamma; absent for parametrized gates.
    pub gamma: Option<f64>,
    /// Gamma as a function of the gate angle; absent for fixed gammas.
    pub formula: Option<String>,
}

impl GateInfo {
    /// Describe one gamma rule.
    pub fn from_rule(name: &str, rule: GammaRule) -> Self {
        let (gamma, formula) = match rule {
            GammaRule::Constant(gamma) => (Some(gamma), None),
            GammaRule::PauliRotation => (None, Some("1 + 2|sin(theta)|")),
            GammaRule::ControlledRotation => (None, Some("1 + 2|sin(theta/2)|")),
        };
        Self {
            name: name.to_string(),
            gamma,
            formula: formula.map(str::to_string),
        }
    }

    /// The whole standard table, in table order.
    pub fn standard_table() -> Vec<Self> {
        STANDARD_GATES
            .iter()
            .map(|(name, rule)| Self::from_rule(name, *rule))
            .collect()
    }
}

/// Standard gate table response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GatesResponse {
    pub gates: Vec<GateInfo>,
}

impl Default for GatesResponse {
    fn default() -> Self {
        Self {
            gates: GateInfo::standard_table(),
        }
    }
}

// =============================================================================
// CUTS REQUEST/RESPONSE
// =============================================================================

/// Cut search request.
///
/// `optimization` and `constraints` fall back to the server configuration
/// when omitted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CutsRequest {
    pub circuit: Circuit,
    #[serde(default)]
    pub optimization: Option<OptimizationSettings>,
    #[serde(default)]
    pub constraints: Option<DeviceConstraints>,
}

/// Cut search response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CutsResponse {
    pub success: bool,
    pub result: Option<CutResult>,
    pub error: Option<String>,
}

impl CutsResponse {
    pub fn success(result: CutResult) -> Self {
        Self {
            success: true,
            result: Some(result),
            error: None,
        }
    }

    pub fn error(msg: impl Into<String>) -> Self {
        Self {
            success: false,
            result: None,
            error: Some(msg.into()),
        }
    }
}
