//! # Circuit Model
//!
//! Input and output circuit representations.
//!
//! - `Circuit` is what callers hand to the engine: named qubits, gates and
//!   full-width barriers, optionally annotated with gammas and cut constraints.
//! - `Instruction<Q>` is the internal/exported form, generic over how qubits
//!   are referenced (`WireName` for input, `usize` wire ids internally).

use crate::types::{CutChoice, WireName};
use serde::de::{self, Deserializer, Visitor};
use serde::{Deserialize, Serialize, Serializer};
use std::fmt;

/// Gate name reserved for barriers.
pub const BARRIER: &str = "barrier";

// =============================================================================
// CIRCUIT ELEMENT
// =============================================================================

/// A gate acting on a list of qubits.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CircuitElement<Q> {
    /// Gate name, used to look up standard gammas.
    pub name: String,
    /// Gate parameters (rotation angles).
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub params: Vec<f64>,
    /// Qubits the gate acts on, in gate-input order.
    pub qubits: Vec<Q>,
    /// LO gate-cut gamma; `None` means the gate cannot be gate-cut.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gamma: Option<f64>,
    /// Cut choices allowed for this gate; `None` means unrestricted.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cuts: Option<Vec<CutChoice>>,
}

impl<Q> CircuitElement<Q> {
    /// Create a parameterless gate.
    #[must_use]
    pub fn new(name: impl Into<String>, qubits: Vec<Q>) -> Self {
        Self {
            name: name.into(),
            params: Vec::new(),
            qubits,
            gamma: None,
            cuts: None,
        }
    }

    /// Set the gate parameters.
    #[must_use]
    pub fn with_params(mut self, params: Vec<f64>) -> Self {
        self.params = params;
        self
    }

    /// Set an explicit gate-cut gamma.
    #[must_use]
    pub fn with_gamma(mut self, gamma: f64) -> Self {
        self.gamma = Some(gamma);
        self
    }

    /// Restrict the cut choices for this gate.
    #[must_use]
    pub fn with_cuts(mut self, cuts: Vec<CutChoice>) -> Self {
        self.cuts = Some(cuts);
        self
    }

    /// Whether the gate couples several qubits (partial barriers excluded).
    #[must_use]
    pub fn is_multi_qubit(&self) -> bool {
        self.qubits.len() > 1 && self.name != BARRIER
    }

    /// Convert qubit references with `f`.
    pub fn map_qubits<U>(&self, mut f: impl FnMut(&Q) -> U) -> CircuitElement<U> {
        CircuitElement {
            name: self.name.clone(),
            params: self.params.clone(),
            qubits: self.qubits.iter().map(&mut f).collect(),
            gamma: self.gamma,
            cuts: self.cuts.clone(),
        }
    }

    /// Convert qubit references with a fallible `f`.
    pub fn try_map_qubits<U, E>(
        &self,
        mut f: impl FnMut(&Q) -> Result<U, E>,
    ) -> Result<CircuitElement<U>, E> {
        let qubits = self
            .qubits
            .iter()
            .map(&mut f)
            .collect::<Result<Vec<U>, E>>()?;
        Ok(CircuitElement {
            name: self.name.clone(),
            params: self.params.clone(),
            qubits,
            gamma: self.gamma,
            cuts: self.cuts.clone(),
        })
    }
}

// =============================================================================
// INSTRUCTIONS
// =============================================================================

/// An instruction of a (possibly cut) circuit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Instruction<Q> {
    /// A gate.
    Gate(CircuitElement<Q>),
    /// A barrier across all qubits.
    Barrier,
    /// Move the state of `source` onto `destination` (inserted by wire cuts).
    Move {
        /// Wire being cut.
        source: Q,
        /// Fresh wire that continues the computation.
        destination: Q,
    },
}

impl<Q> Instruction<Q> {
    /// Convert wire references with `f`.
    pub fn map_wires<U>(&self, mut f: impl FnMut(&Q) -> U) -> Instruction<U> {
        match self {
            Self::Gate(gate) => Instruction::Gate(gate.map_qubits(f)),
            Self::Barrier => Instruction::Barrier,
            Self::Move {
                source,
                destination,
            } => Instruction::Move {
                source: f(source),
                destination: f(destination),
            },
        }
    }

    /// The gate, if this instruction is one.
    #[must_use]
    pub fn as_gate(&self) -> Option<&CircuitElement<Q>> {
        match self {
            Self::Gate(gate) => Some(gate),
            _ => None,
        }
    }

    /// Mutable access to every wire referenced by the instruction.
    pub fn wires_mut(&mut self) -> Vec<&mut Q> {
        match self {
            Self::Gate(gate) => gate.qubits.iter_mut().collect(),
            Self::Barrier => Vec::new(),
            Self::Move {
                source,
                destination,
            } => vec![source, destination],
        }
    }
}

// =============================================================================
// INPUT CIRCUIT
// =============================================================================

/// Marker for a full-width barrier, written as the bare string `"barrier"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FullBarrier;

impl Serialize for FullBarrier {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(BARRIER)
    }
}

impl<'de> Deserialize<'de> for FullBarrier {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct BarrierVisitor;

        impl Visitor<'_> for BarrierVisitor {
            type Value = FullBarrier;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "the string \"{}\"", BARRIER)
            }

            fn visit_str<E: de::Error>(self, v: &str) -> Result<FullBarrier, E> {
                if v == BARRIER {
                    Ok(FullBarrier)
                } else {
                    Err(E::invalid_value(de::Unexpected::Str(v), &self))
                }
            }
        }

        deserializer.deserialize_str(BarrierVisitor)
    }
}

/// One entry of an input circuit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CircuitEntry {
    /// A barrier across all qubits.
    Barrier(FullBarrier),
    /// A gate on named qubits.
    Gate(CircuitElement<WireName>),
}

/// A circuit as supplied by callers.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Circuit {
    /// Preferred qubit order; these names receive ids 0, 1, ... first.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub qubits: Vec<WireName>,
    /// Instructions in execution order.
    pub instructions: Vec<CircuitEntry>,
}

impl Circuit {
    /// Create an empty circuit.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty circuit with a preferred qubit order.
    #[must_use]
    pub fn with_qubit_order(qubits: Vec<WireName>) -> Self {
        Self {
            qubits,
            instructions: Vec::new(),
        }
    }

    /// Append a gate.
    pub fn push(&mut self, gate: CircuitElement<WireName>) -> &mut Self {
        self.instructions.push(CircuitEntry::Gate(gate));
        self
    }

    /// Append a full-width barrier.
    pub fn barrier(&mut self) -> &mut Self {
        self.instructions.push(CircuitEntry::Barrier(FullBarrier));
        self
    }

    /// Number of instructions.
    #[must_use]
    pub fn len(&self) -> usize {
        self.instructions.len()
    }

    /// Check whether the circuit has no instructions.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.instructions.is_empty()
    }
}

// =============================================================================
// TESTS
// =============================================================================
