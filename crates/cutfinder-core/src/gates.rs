//! # Standard Gate Gammas
//!
//! LO gate-cut sampling overheads for common two-qubit gates.
//!
//! A gate without an entry here (and without an explicit `gamma` in the
//! input circuit) can still be separated by wire cuts, but is never gate-cut.

use std::f64::consts::SQRT_2;

/// How the gamma of a gate is computed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GammaRule {
    /// Fixed gamma, independent of parameters.
    Constant(f64),
    /// `1 + 2|sin(theta)|`, for two-qubit Pauli rotations.
    PauliRotation,
    /// `1 + 2|sin(theta / 2)|`, for controlled rotations and phases.
    ControlledRotation,
}

impl GammaRule {
    /// Evaluate the rule for the given gate parameters.
    ///
    /// Parametrized rules need exactly one parameter.
    #[must_use]
    pub fn evaluate(&self, params: &[f64]) -> Option<f64> {
        match (self, params) {
            (Self::Constant(gamma), _) => Some(*gamma),
            (Self::PauliRotation, [theta]) => Some(1.0 + 2.0 * theta.sin().abs()),
            (Self::ControlledRotation, [theta]) => Some(1.0 + 2.0 * (theta / 2.0).sin().abs()),
            _ => None,
        }
    }
}

/// Standard gates with a known LO gate-cut gamma.
pub const STANDARD_GATES: &[(&str, GammaRule)] = &[
    ("cx", GammaRule::Constant(3.0)),
    ("cy", GammaRule::Constant(3.0)),
    ("cz", GammaRule::Constant(3.0)),
    ("ch", GammaRule::Constant(3.0)),
    ("ecr", GammaRule::Constant(3.0)),
    ("cs", GammaRule::Constant(1.0 + SQRT_2)),
    ("csdg", GammaRule::Constant(1.0 + SQRT_2)),
    ("csx", GammaRule::Constant(1.0 + SQRT_2)),
    ("swap", GammaRule::Constant(7.0)),
    ("iswap", GammaRule::Constant(7.0)),
    ("dcx", GammaRule::Constant(7.0)),
    ("rxx", GammaRule::PauliRotation),
    ("ryy", GammaRule::PauliRotation),
    ("rzz", GammaRule::PauliRotation),
    ("rzx", GammaRule::PauliRotation),
    ("crx", GammaRule::ControlledRotation),
    ("cry", GammaRule::ControlledRotation),
    ("crz", GammaRule::ControlledRotation),
    ("cp", GammaRule::ControlledRotation),
    ("cu1", GammaRule::ControlledRotation),
];

/// Look up the gamma rule for a gate name (case-insensitive).
#[must_use]
pub fn gamma_rule(name: &str) -> Option<GammaRule> {
    STANDARD_GATES
        .iter()
        .find(|(gate, _)| gate.eq_ignore_ascii_case(name))
        .map(|(_, rule)| *rule)
}

/// Resolve the LO gate-cut gamma of a standard gate.
///
/// Returns `None` for unknown gates, gates that do not act on two qubits,
/// and parametrized gates given the wrong number of parameters.
#[must_use]
pub fn standard_gamma(name: &str, params: &[f64], num_qubits: usize) -> Option<f64> {
    if num_qubits != 2 {
        return None;
    }
    gamma_rule(name)?.evaluate(params)
}

// =============================================================================
// TESTS
// =============================================================================
