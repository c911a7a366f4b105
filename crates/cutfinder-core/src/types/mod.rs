//! # Core Type Definitions
//!
//! This module contains the shared vocabulary of the cut-finding engine:
//! - Wire identifiers (`WireName`)
//! - Sampling-overhead values with a total order (`Gamma`)
//! - Cut kinds used when annotating a cut circuit (`CutType`, `CutChoice`)
//! - Error types (`CutFinderError`)
//!
//! ## Determinism Guarantees
//!
//! All types in this module:
//! - Implement `Ord` for deterministic ordering in `BTreeMap`/`BTreeSet`
//! - Compare floating-point values with `f64::total_cmp`, never with `partial_cmp`

use crate::settings::SettingsError;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use thiserror::Error;

// =============================================================================
// WIRE NAMES
// =============================================================================

/// Name of a qubit or wire.
///
/// Input circuits name qubits with integers or strings. Wire cuts introduce
/// new wires whose names wrap the name of the wire that was cut, so cutting
/// `q0` twice yields `cut(q0)` and `cut(cut(q0))`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum WireName {
    /// Integer qubit name.
    Index(u64),
    /// String qubit name.
    Label(String),
    /// Wire created by cutting the named wire.
    Cut {
        /// The wire that was cut.
        cut: Box<WireName>,
    },
}

impl WireName {
    /// Create a string-labelled wire name.
    #[must_use]
    pub fn label(s: impl Into<String>) -> Self {
        Self::Label(s.into())
    }

    /// Name of the wire created by cutting `wire`.
    #[must_use]
    pub fn cut_of(wire: WireName) -> Self {
        Self::Cut {
            cut: Box::new(wire),
        }
    }

    /// Number of cuts separating this wire from an input qubit.
    #[must_use]
    pub fn cut_depth(&self) -> usize {
        match self {
            Self::Cut { cut } => 1 + cut.cut_depth(),
            _ => 0,
        }
    }

    /// The input qubit this wire descends from.
    #[must_use]
    pub fn root(&self) -> &WireName {
        match self {
            Self::Cut { cut } => cut.root(),
            other => other,
        }
    }
}

impl From<u64> for WireName {
    fn from(value: u64) -> Self {
        Self::Index(value)
    }
}

impl From<&str> for WireName {
    fn from(value: &str) -> Self {
        Self::Label(value.to_string())
    }
}

impl fmt::Display for WireName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Index(i) => write!(f, "{}", i),
            Self::Label(s) => write!(f, "{}", s),
            Self::Cut { cut } => write!(f, "cut({})", cut),
        }
    }
}

// =============================================================================
// GAMMA
// =============================================================================

/// A sampling-overhead factor (gamma) with a total order.
///
/// Gammas multiply across independent cuts. Infinity is a valid value and
/// represents an unbounded limit.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Gamma(pub f64);

impl Gamma {
    /// Gamma of a circuit with no cuts.
    pub const ONE: Gamma = Gamma(1.0);

    /// Unbounded gamma.
    pub const INFINITE: Gamma = Gamma(f64::INFINITY);

    /// Get the raw value.
    #[must_use]
    pub const fn value(self) -> f64 {
        self.0
    }

    /// Check whether the value is finite.
    #[must_use]
    pub fn is_finite(self) -> bool {
        self.0.is_finite()
    }
}

impl PartialEq for Gamma {
    fn eq(&self, other: &Self) -> bool {
        self.0.total_cmp(&other.0) == Ordering::Equal
    }
}

impl Eq for Gamma {}

impl PartialOrd for Gamma {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Gamma {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.total_cmp(&other.0)
    }
}

impl fmt::Display for Gamma {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// =============================================================================
// CUT KINDS
// =============================================================================

/// How a cut is realized when the cut circuit is executed.
///
/// Only local operations (LO) are supported.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum CutType {
    /// Local operations, no classical communication.
    Lo,
}

impl fmt::Display for CutType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Lo => write!(f, "LO"),
        }
    }
}

/// A cutting decision that a gate may be restricted to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum CutChoice {
    /// Apply the gate without cutting it.
    NoCut,
    /// Cut the gate itself.
    GateCut,
    /// Cut one or both input wires of the gate.
    WireCut,
}

// =============================================================================
// ERROR TYPES
// =============================================================================

/// Errors that can occur in the cut-finding engine.
///
/// - No silent failures
/// - Use `Result<T, CutFinderError>` for fallible operations
/// - The engine never panics; inconsistent inputs surface here
#[derive(Debug, Error)]
pub enum CutFinderError {
    /// The input circuit failed validation.
    #[error("Invalid circuit: {0}")]
    InvalidCircuit(String),

    /// Optimization settings or device constraints are invalid.
    #[error(transparent)]
    InvalidSettings(#[from] SettingsError),

    /// A search action was applied to a gate with the wrong number of qubits.
    #[error("Action {action} requires a two-qubit gate, got {qubits} qubits")]
    UnsupportedGateArity {
        /// Name of the action.
        action: &'static str,
        /// Number of qubits of the offending gate.
        qubits: usize,
    },

    /// A wire cut referenced a wire that does not feed the gate input.
    #[error("Input wire {expected} of instruction {instruction} does not match cut source wire {found}")]
    WireMismatch {
        /// Instruction index in the input circuit.
        instruction: usize,
        /// Wire currently attached to the gate input.
        expected: usize,
        /// Wire given as the cut source.
        found: usize,
    },

    /// A wire id or wire name was assigned twice.
    #[error("Wire id conflict: {0}")]
    WireIdConflict(String),

    /// A gate position referenced by a cut does not exist.
    #[error("Instruction {0} is not a gate of the circuit")]
    UnknownInstruction(usize),

    /// The cut circuit has more subcircuits than can be labelled.
    #[error("Cannot label {0} subcircuits (maximum {1})")]
    TooManySubcircuits(usize, usize),

    /// No cut scheme satisfies the device constraints.
    #[error("No feasible cut scheme found within the given constraints")]
    NoSolution,

    /// A serialization or deserialization error occurred.
    #[error("Serialization error: {0}")]
    SerializationError(String),

    /// A configuration file could not be used.
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// An I/O error occurred.
    #[error("I/O error: {0}")]
    IoError(String),
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gamma_total_order() {
        let mut gammas = vec![Gamma(9.0), Gamma::INFINITE, Gamma::ONE, Gamma(3.0)];
        gammas.sort();
        assert_eq!(
            gammas,
            vec![Gamma::ONE, Gamma(3.0), Gamma(9.0), Gamma::INFINITE]
        );
    }

    #[test]
    fn wire_name_cut_depth() {
        let q = WireName::label("q0");
        let once = WireName::cut_of(q.clone());
        let twice = WireName::cut_of(once.clone());
        assert_eq!(q.cut_depth(), 0);
        assert_eq!(once.cut_depth(), 1);
        assert_eq!(twice.cut_depth(), 2);
        assert_eq!(twice.to_string(), "cut(cut(q0))");
    }

    #[test]
    fn wire_name_serde_shapes() {
        let names: Vec<WireName> =
            serde_json::from_str(r#"[0, "q1", {"cut": "q1"}]"#).expect("parse");
        assert_eq!(
            names,
            vec![
                WireName::Index(0),
                WireName::label("q1"),
                WireName::cut_of(WireName::label("q1")),
            ]
        );
        let json = serde_json::to_string(&names).expect("serialize");
        assert_eq!(json, r#"[0,"q1",{"cut":"q1"}]"#);
    }

    #[test]
    fn cut_type_display() {
        assert_eq!(CutType::Lo.to_string(), "LO");
        assert_eq!(serde_json::to_string(&CutType::Lo).expect("ser"), "\"LO\"");
    }
}
