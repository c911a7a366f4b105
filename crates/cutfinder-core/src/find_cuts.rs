//! # find_cuts
//!
//! One-call entry point: circuit in, cut circuit and metadata out.
//!
//! The returned [`CutMetadata`] is built once per call and never updated
//! afterwards. `minimum_reached` is `true` only when the search proved that no
//! cheaper scheme exists under the cost model; a run stopped by
//! `max_backjumps` or `max_gamma` reports `false` even if its scheme happens to
//! be optimal.

use crate::circuit::{Circuit, Instruction};
use crate::ingestor::Ingestor;
use crate::interface::SimpleGateList;
use crate::optimizer::LoCutsOptimizer;
use crate::search::SearchStats;
use crate::settings::{DeviceConstraints, OptimizationSettings};
use crate::state::{CutArgs, DisjointSubcircuitsState};
use crate::types::{CutFinderError, CutType, WireName};
use serde::{Deserialize, Serialize};
use tracing::debug;

// =============================================================================
// RESULT TYPES
// =============================================================================

/// Whether a cut separates a gate or a wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CutKind {
    Gate,
    Wire,
}

/// One cut of the chosen scheme.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CutDescriptor {
    pub kind: CutKind,
    pub cut_type: CutType,
    /// Position of the gate in the input circuit.
    pub instruction_id: usize,
    pub gate_name: String,
    /// Input qubits of the gate.
    pub qubits: Vec<WireName>,
    /// Gate input (1-based) whose wire is cut; wire cuts only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub input: Option<usize>,
}

/// Outcome record of one search.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CutMetadata {
    pub cuts: Vec<CutDescriptor>,
    /// Square of the scheme's gamma.
    pub sampling_overhead: f64,
    pub minimum_reached: bool,
    pub stats: SearchStats,
}

/// An instruction of the cut circuit with its cut annotation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CutInstruction {
    #[serde(flatten)]
    pub instruction: Instruction<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cut: Option<CutType>,
}

/// Where an input qubit ends up in the cut circuit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputWire {
    pub qubit: WireName,
    pub wire: usize,
}

/// The cut circuit on numbered wires.
///
/// Cut wires are numbered right after the wire they were cut from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CutCircuit {
    pub num_wires: usize,
    /// Name of each wire.
    pub wire_names: Vec<WireName>,
    pub instructions: Vec<CutInstruction>,
    /// Wires of each subcircuit.
    pub subcircuits: Vec<Vec<usize>>,
    /// One letter per wire naming its subcircuit; absent past 52 subcircuits.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subcircuit_labels: Option<String>,
    pub output_wires: Vec<OutputWire>,
}

impl CutCircuit {
    /// Export the cut circuit held by a gate list.
    #[must_use]
    pub fn from_gate_list(list: &SimpleGateList) -> Self {
        let mapping = list.default_wire_mapping();
        let instructions = list
            .export_cut_circuit()
            .into_iter()
            .zip(list.cut_types())
            .map(|(instruction, cut)| CutInstruction {
                instruction,
                cut: *cut,
            })
            .collect();
        let subcircuits = list
            .subcircuits()
            .iter()
            .map(|wires| {
                let mut wires: Vec<usize> = wires.iter().map(|w| mapping[*w]).collect();
                wires.sort_unstable();
                wires
            })
            .collect();
        let output_wires = list
            .export_output_wires()
            .into_iter()
            .map(|(qubit, wire)| OutputWire { qubit, wire })
            .collect();

        Self {
            num_wires: list.num_wires(),
            wire_names: list.export_wire_names(),
            instructions,
            subcircuits,
            subcircuit_labels: list.export_subcircuits_as_string().ok(),
            output_wires,
        }
    }
}

/// Cut circuit plus metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CutResult {
    pub circuit: CutCircuit,
    pub metadata: CutMetadata,
}

// =============================================================================
// ENTRY POINT
// =============================================================================

/// Find a low-overhead cut scheme for `circuit`.
///
/// # Errors
/// - `InvalidCircuit` if the circuit fails validation
/// - `InvalidSettings` if the settings or constraints are out of range
/// - `NoSolution` if no scheme fits the device constraints
pub fn find_cuts(
    circuit: &Circuit,
    settings: &OptimizationSettings,
    constraints: &DeviceConstraints,
) -> Result<CutResult, CutFinderError> {
    let mut list = Ingestor::ingest(circuit)?;
    let mut optimizer = LoCutsOptimizer::new(*settings, *constraints);
    let best = optimizer
        .optimize(&mut list)?
        .ok_or(CutFinderError::NoSolution)?;

    let metadata = CutMetadata {
        cuts: cut_descriptors(&best, &list),
        sampling_overhead: best.upper_bound_gamma().powi(2),
        minimum_reached: optimizer.minimum_reached(),
        stats: optimizer.stats(false),
    };

    debug!(
        cuts = metadata.cuts.len(),
        sampling_overhead = metadata.sampling_overhead,
        minimum_reached = metadata.minimum_reached,
        "cut search complete"
    );

    Ok(CutResult {
        circuit: CutCircuit::from_gate_list(&list),
        metadata,
    })
}

/// Describe the cuts of a state in terms of the input circuit.
///
/// A cut of both input wires yields two descriptors.
#[must_use]
pub fn cut_descriptors(state: &DisjointSubcircuitsState, list: &SimpleGateList) -> Vec<CutDescriptor> {
    let mut cuts = Vec::new();
    for action in state.cut_actions() {
        let gate = &action.gate;
        let qubits: Vec<WireName> = gate
            .gate
            .qubits
            .iter()
            .map(|q| {
                list.wire_name(*q)
                    .cloned()
                    .unwrap_or(WireName::Index(*q as u64))
            })
            .collect();
        let describe = |kind, input| CutDescriptor {
            kind,
            cut_type: CutType::Lo,
            instruction_id: gate.instruction_id,
            gate_name: gate.gate.name.clone(),
            qubits: qubits.clone(),
            input,
        };
        match &action.args {
            CutArgs::Gate(_) => cuts.push(describe(CutKind::Gate, None)),
            CutArgs::Wires(wires) => {
                cuts.extend(wires.iter().map(|w| describe(CutKind::Wire, Some(w.input))));
            }
        }
    }
    cuts
}

// =============================================================================
// TESTS
// =============================================================================
