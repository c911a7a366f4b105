//! # Ingestor Module
//!
//! Circuit validation and ingestion protocol for the cut-finding engine.
//!
//! - Validate circuits before any search state is built
//! - Reject malformed input
//! - Resolve gate-cut gammas (explicit value, then the standard table)
//! - No gate decomposition or rewriting

use crate::circuit::{BARRIER, Circuit, CircuitElement, CircuitEntry, Instruction};
use crate::gates::standard_gamma;
use crate::interface::SimpleGateList;
use crate::primitives::{MAX_CIRCUIT_LENGTH, MAX_GATE_NAME_LENGTH, MAX_QUBITS};
use crate::types::{CutFinderError, WireName};
use std::collections::BTreeSet;

/// The Ingestor handles circuit validation and conversion to a gate list.
///
/// The Ingestor:
/// - Accepts circuits from the CLI, the HTTP API or library callers
/// - Validates structure and limits
/// - Produces the `SimpleGateList` the optimizer works on
pub struct Ingestor;

impl Ingestor {
    /// Validate a circuit.
    ///
    /// A circuit is valid if:
    /// - It has at most `MAX_CIRCUIT_LENGTH` instructions
    /// - It uses at most `MAX_QUBITS` distinct qubits
    /// - Qubit names are integers or strings, and the preferred order has no duplicates
    /// - Every gate passes [`Ingestor::validate_gate`]
    ///
    /// Returns `CutFinderError::InvalidCircuit` if validation fails.
    pub fn validate(circuit: &Circuit) -> Result<(), CutFinderError> {
        if circuit.len() > MAX_CIRCUIT_LENGTH {
            return Err(CutFinderError::InvalidCircuit(format!(
                "{} instructions exceed the limit of {}",
                circuit.len(),
                MAX_CIRCUIT_LENGTH
            )));
        }

        let mut qubits: BTreeSet<&WireName> = BTreeSet::new();
        for name in &circuit.qubits {
            Self::validate_qubit_name(name)?;
            if !qubits.insert(name) {
                return Err(CutFinderError::InvalidCircuit(format!(
                    "qubit {} listed twice in the qubit order",
                    name
                )));
            }
        }

        for (index, entry) in circuit.instructions.iter().enumerate() {
            if let CircuitEntry::Gate(gate) = entry {
                Self::validate_gate(index, gate)?;
                qubits.extend(gate.qubits.iter());
            }
        }

        if qubits.len() > MAX_QUBITS {
            return Err(CutFinderError::InvalidCircuit(format!(
                "{} qubits exceed the limit of {}",
                qubits.len(),
                MAX_QUBITS
            )));
        }

        Ok(())
    }

    /// Validate a single gate at position `index`.
    ///
    /// A gate is valid if:
    /// - Its name is non-empty and within `MAX_GATE_NAME_LENGTH`
    /// - It acts on at least one qubit, with no qubit repeated
    /// - Its parameters are finite
    /// - An explicit gamma, if any, is finite and at least 1
    pub fn validate_gate(
        index: usize,
        gate: &CircuitElement<WireName>,
    ) -> Result<(), CutFinderError> {
        let invalid = |reason: String| {
            CutFinderError::InvalidCircuit(format!("instruction {}: {}", index, reason))
        };

        if gate.name.is_empty() {
            return Err(invalid("gate name is empty".to_string()));
        }
        if gate.name.len() > MAX_GATE_NAME_LENGTH {
            return Err(invalid(format!(
                "gate name longer than {} bytes",
                MAX_GATE_NAME_LENGTH
            )));
        }
        if gate.qubits.is_empty() {
            return Err(invalid(format!("gate {} acts on no qubits", gate.name)));
        }

        let mut seen = BTreeSet::new();
        for qubit in &gate.qubits {
            Self::validate_qubit_name(qubit).map_err(|_| invalid(format!("bad qubit {}", qubit)))?;
            if !seen.insert(qubit) {
                return Err(invalid(format!(
                    "gate {} uses qubit {} twice",
                    gate.name, qubit
                )));
            }
        }

        if gate.params.iter().any(|p| !p.is_finite()) {
            return Err(invalid(format!("gate {} has a non-finite parameter", gate.name)));
        }

        if let Some(gamma) = gate.gamma {
            if !gamma.is_finite() || gamma < 1.0 {
                return Err(invalid(format!(
                    "gate {} has gamma {}; gammas must be finite and at least 1",
                    gate.name, gamma
                )));
            }
        }

        Ok(())
    }

    /// Resolve the gate-cut gamma of a gate.
    ///
    /// An explicit gamma wins over the standard table. Barriers never have one.
    #[must_use]
    pub fn resolve_gamma<Q>(gate: &CircuitElement<Q>) -> Option<f64> {
        if gate.name == BARRIER {
            return None;
        }
        gate.gamma
            .or_else(|| standard_gamma(&gate.name, &gate.params, gate.qubits.len()))
    }

    /// Convert a validated circuit to instructions with resolved gammas.
    #[must_use]
    pub fn to_instructions(circuit: &Circuit) -> Vec<Instruction<WireName>> {
        circuit
            .instructions
            .iter()
            .map(|entry| match entry {
                CircuitEntry::Barrier(_) => Instruction::Barrier,
                CircuitEntry::Gate(gate) => {
                    let mut gate = gate.clone();
                    gate.gamma = Self::resolve_gamma(&gate);
                    Instruction::Gate(gate)
                }
            })
            .collect()
    }

    /// Validate a circuit and build its gate list.
    pub fn ingest(circuit: &Circuit) -> Result<SimpleGateList, CutFinderError> {
        Self::validate(circuit)?;
        Ok(SimpleGateList::new(
            &Self::to_instructions(circuit),
            &circuit.qubits,
        ))
    }

    fn validate_qubit_name(name: &WireName) -> Result<(), CutFinderError> {
        match name {
            WireName::Cut { .. } => Err(CutFinderError::InvalidCircuit(format!(
                "qubit name {} is reserved for cut wires",
                name
            ))),
            WireName::Label(label) if label.is_empty() => Err(CutFinderError::InvalidCircuit(
                "qubit name is empty".to_string(),
            )),
            _ => Ok(()),
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interface::CircuitInterface;

    fn gate(name: &str, qubits: &[&str]) -> CircuitElement<WireName> {
        CircuitElement::new(name, qubits.iter().map(|q| WireName::label(*q)).collect())
    }

    #[test]
    fn validate_accepts_simple_circuit() {
        let mut circuit = Circuit::new();
        circuit.push(gate("h", &["a"])).barrier().push(gate("cx", &["a", "b"]));
        assert!(Ingestor::validate(&circuit).is_ok());
    }

    #[test]
    fn validate_rejects_empty_name() {
        let mut circuit = Circuit::new();
        circuit.push(gate("", &["a"]));
        assert!(matches!(
            Ingestor::validate(&circuit),
            Err(CutFinderError::InvalidCircuit(_))
        ));
    }

    #[test]
    fn validate_rejects_repeated_qubit() {
        let mut circuit = Circuit::new();
        circuit.push(gate("cx", &["a", "a"]));
        assert!(Ingestor::validate(&circuit).is_err());
    }

    #[test]
    fn validate_rejects_gate_without_qubits() {
        let mut circuit = Circuit::new();
        circuit.push(gate("cx", &[]));
        assert!(Ingestor::validate(&circuit).is_err());
    }

    #[test]
    fn validate_rejects_bad_gamma_and_params() {
        let mut circuit = Circuit::new();
        circuit.push(gate("cx", &["a", "b"]).with_gamma(0.5));
        assert!(Ingestor::validate(&circuit).is_err());

        let mut circuit = Circuit::new();
        circuit.push(gate("rzz", &["a", "b"]).with_params(vec![f64::NAN]));
        assert!(Ingestor::validate(&circuit).is_err());
    }

    #[test]
    fn validate_rejects_cut_names_and_duplicate_order() {
        let mut circuit = Circuit::new();
        circuit.push(CircuitElement::new(
            "h",
            vec![WireName::cut_of(WireName::label("a"))],
        ));
        assert!(Ingestor::validate(&circuit).is_err());

        let circuit =
            Circuit::with_qubit_order(vec![WireName::label("a"), WireName::label("a")]);
        assert!(Ingestor::validate(&circuit).is_err());
    }

    #[test]
    fn explicit_gamma_wins() {
        assert_eq!(
            Ingestor::resolve_gamma(&gate("cx", &["a", "b"]).with_gamma(2.0)),
            Some(2.0)
        );
        assert_eq!(Ingestor::resolve_gamma(&gate("cx", &["a", "b"])), Some(3.0));
        assert_eq!(Ingestor::resolve_gamma(&gate("mystery", &["a", "b"])), None);
        assert_eq!(Ingestor::resolve_gamma(&gate(BARRIER, &["a", "b"])), None);
    }

    #[test]
    fn ingest_builds_gate_list() {
        let mut circuit = Circuit::new();
        circuit
            .push(gate("h", &["q1"]))
            .push(gate(BARRIER, &["q1"]))
            .push(gate("s", &["q0"]))
            .barrier()
            .push(gate("cx", &["q1", "q0"]));

        let list = Ingestor::ingest(&circuit).expect("ingest");
        assert_eq!(list.num_qubits(), 2);
        let gates = list.multi_qubit_gates();
        assert_eq!(gates.len(), 1);
        assert_eq!(gates[0].instruction_id, 4);
        assert_eq!(gates[0].gate.qubits, vec![0, 1]);
        assert_eq!(gates[0].gate.gamma, Some(3.0));
    }
}
