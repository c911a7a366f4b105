//! # Circuit Interface
//!
//! The boundary between circuit representations and the cut optimizer.
//!
//! The optimizer only needs to read the multi-qubit gates of a circuit and to
//! write its decisions back: gate cuts, wire cuts and the final partition into
//! subcircuits. `CircuitInterface` captures that contract; `SimpleGateList` is
//! the in-crate implementation over a flat list of instructions.

use crate::circuit::{CircuitElement, Instruction};
use crate::primitives::SUBCIRCUIT_ALPHABET;
use crate::types::{CutFinderError, CutType, WireName};
use std::collections::BTreeMap;

// =============================================================================
// NAME <-> ID MAP
// =============================================================================

/// Bidirectional map between wire names and numeric wire ids.
#[derive(Debug, Clone, Default)]
pub struct NameToIdMap {
    next_id: usize,
    ids: BTreeMap<WireName, usize>,
    names: BTreeMap<usize, WireName>,
}

impl NameToIdMap {
    /// Create a map that assigns ids 0, 1, ... to `initial` in order.
    #[must_use]
    pub fn new(initial: &[WireName]) -> Self {
        let mut map = Self::default();
        for name in initial {
            map.id(name);
        }
        map
    }

    /// Return the id of `name`, assigning the lowest free id on first sight.
    pub fn id(&mut self, name: &WireName) -> usize {
        if let Some(&id) = self.ids.get(name) {
            return id;
        }
        while self.names.contains_key(&self.next_id) {
            self.next_id += 1;
        }
        let id = self.next_id;
        self.ids.insert(name.clone(), id);
        self.names.insert(id, name.clone());
        self.next_id += 1;
        id
    }

    /// Return the id of `name` without assigning one.
    #[must_use]
    pub fn lookup(&self, name: &WireName) -> Option<usize> {
        self.ids.get(name).copied()
    }

    /// Assign a specific id to a name.
    ///
    /// Fails if the id or the name is already assigned.
    pub fn define_id(&mut self, id: usize, name: WireName) -> Result<(), CutFinderError> {
        if self.names.contains_key(&id) {
            return Err(CutFinderError::WireIdConflict(format!(
                "wire id {} already assigned",
                id
            )));
        }
        if self.ids.contains_key(&name) {
            return Err(CutFinderError::WireIdConflict(format!(
                "wire name {} already assigned",
                name
            )));
        }
        self.ids.insert(name.clone(), id);
        self.names.insert(id, name);
        Ok(())
    }

    /// Return the name assigned to `id`, if any.
    #[must_use]
    pub fn name(&self, id: usize) -> Option<&WireName> {
        self.names.get(&id)
    }

    /// Number of names assigned so far.
    #[must_use]
    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// Check whether no names have been assigned.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// One plus the largest assigned id, or zero when empty.
    ///
    /// This is the length of a vector indexed by wire id.
    #[must_use]
    pub fn array_size_needed(&self) -> usize {
        self.names.keys().next_back().map_or(0, |max| max + 1)
    }

    /// Assigned `(id, name)` pairs in id order.
    pub fn entries(&self) -> impl Iterator<Item = (usize, &WireName)> {
        self.names.iter().map(|(id, name)| (*id, name))
    }

    /// Assigned names, in id order.
    pub fn names(&self) -> impl Iterator<Item = &WireName> {
        self.names.values()
    }

    /// Assigned ids, ascending.
    pub fn ids(&self) -> impl Iterator<Item = usize> + '_ {
        self.names.keys().copied()
    }
}

// =============================================================================
// CIRCUIT INTERFACE
// =============================================================================

/// A multi-qubit gate as seen by the optimizer.
#[derive(Debug, Clone, PartialEq)]
pub struct MultiQubitGate {
    /// Position of the gate in the input circuit.
    pub instruction_id: usize,
    /// The gate with numeric qubit ids.
    pub gate: CircuitElement<usize>,
}

/// Access to a circuit for reading gates and writing back cut decisions.
///
/// Wire ids below `num_qubits()` are input qubits. Wire cuts introduce new
/// wires with ids starting at `num_qubits()`.
pub trait CircuitInterface {
    /// Number of qubits of the input circuit.
    fn num_qubits(&self) -> usize;

    /// The multi-qubit gates in circuit order.
    fn multi_qubit_gates(&self) -> Vec<MultiQubitGate>;

    /// Mark the gate at `instruction_id` as cut.
    fn insert_gate_cut(
        &mut self,
        instruction_id: usize,
        cut_type: CutType,
    ) -> Result<(), CutFinderError>;

    /// Cut the wire feeding gate input `input` (1-based) of the gate at
    /// `instruction_id`, moving `source_wire` onto `destination_wire` just
    /// before the gate.
    fn insert_wire_cut(
        &mut self,
        instruction_id: usize,
        input: usize,
        source_wire: usize,
        destination_wire: usize,
        cut_type: CutType,
    ) -> Result<(), CutFinderError>;

    /// Record the final partition of wires into subcircuits.
    fn define_subcircuits(&mut self, subcircuits: Vec<Vec<usize>>);
}

// =============================================================================
// SIMPLE GATE LIST
// =============================================================================

/// A flat instruction list implementing [`CircuitInterface`].
///
/// Keeps the input circuit unchanged and builds the cut circuit alongside it:
/// wire cuts insert `Move` instructions and rename downstream wires, gate cuts
/// annotate the gate with a cut type.
#[derive(Debug, Clone)]
pub struct SimpleGateList {
    wire_names: NameToIdMap,
    num_qubits: usize,
    circuit: Vec<Instruction<usize>>,
    new_circuit: Vec<Instruction<usize>>,
    cut_types: Vec<Option<CutType>>,
    new_positions: Vec<usize>,
    output_wires: Vec<usize>,
    subcircuits: Vec<Vec<usize>>,
}

impl SimpleGateList {
    /// Build a gate list from instructions on named qubits.
    ///
    /// `preferred_order` names receive the first ids, in order; other qubits
    /// are numbered as they are first encountered.
    #[must_use]
    pub fn new(instructions: &[Instruction<WireName>], preferred_order: &[WireName]) -> Self {
        let mut wire_names = NameToIdMap::new(preferred_order);
        let circuit: Vec<Instruction<usize>> = instructions
            .iter()
            .map(|inst| inst.map_wires(|name| wire_names.id(name)))
            .collect();
        let num_qubits = wire_names.array_size_needed();

        Self {
            wire_names,
            num_qubits,
            new_circuit: circuit.clone(),
            cut_types: vec![None; circuit.len()],
            new_positions: (0..circuit.len()).collect(),
            output_wires: (0..num_qubits).collect(),
            subcircuits: vec![(0..num_qubits).collect()],
            circuit,
        }
    }

    /// Number of wires in the cut circuit.
    #[must_use]
    pub fn num_wires(&self) -> usize {
        self.wire_names.len()
    }

    /// Names of all wires, in wire-id order.
    #[must_use]
    pub fn wire_names(&self) -> Vec<WireName> {
        self.wire_names.names().cloned().collect()
    }

    /// Name of an internal wire id.
    #[must_use]
    pub fn wire_name(&self, wire: usize) -> Option<&WireName> {
        self.wire_names.name(wire)
    }

    /// Names of the output wires, indexed by default wire number.
    #[must_use]
    pub fn export_wire_names(&self) -> Vec<WireName> {
        let mapping = self.default_wire_mapping();
        let mut by_position: Vec<(usize, &WireName)> = self
            .wire_names
            .entries()
            .map(|(id, name)| (mapping[id], name))
            .collect();
        by_position.sort_unstable_by_key(|(position, _)| *position);
        by_position.into_iter().map(|(_, name)| name.clone()).collect()
    }

    /// Cut annotations aligned with [`Self::export_cut_circuit`].
    #[must_use]
    pub fn cut_types(&self) -> &[Option<CutType>] {
        &self.cut_types
    }

    /// Subcircuits as lists of internal wire ids.
    #[must_use]
    pub fn subcircuits(&self) -> &[Vec<usize>] {
        &self.subcircuits
    }

    /// The cut circuit with wires renumbered by [`Self::default_wire_mapping`].
    #[must_use]
    pub fn export_cut_circuit(&self) -> Vec<Instruction<usize>> {
        let mapping = self.default_wire_mapping();
        self.new_circuit
            .iter()
            .map(|inst| inst.map_wires(|w| mapping[*w]))
            .collect()
    }

    /// The cut circuit on the original qubit names plus `cut(...)` wires.
    #[must_use]
    pub fn export_cut_circuit_named(&self) -> Vec<Instruction<WireName>> {
        self.new_circuit
            .iter()
            .map(|inst| {
                inst.map_wires(|w| {
                    self.wire_names
                        .name(*w)
                        .cloned()
                        .unwrap_or(WireName::Index(*w as u64))
                })
            })
            .collect()
    }

    /// Map each input qubit to the output wire carrying it at the end of the
    /// cut circuit, in default numbering.
    #[must_use]
    pub fn export_output_wires(&self) -> Vec<(WireName, usize)> {
        let mapping = self.default_wire_mapping();
        self.output_wires
            .iter()
            .enumerate()
            .filter_map(|(qubit, wire)| {
                self.wire_names
                    .name(qubit)
                    .map(|name| (name.clone(), mapping[*wire]))
            })
            .collect()
    }

    /// One letter per output wire naming its subcircuit (`A`-`Z`, `a`-`z`).
    ///
    /// Wires outside every subcircuit are shown as `-`.
    pub fn export_subcircuits_as_string(&self) -> Result<String, CutFinderError> {
        let labels: Vec<char> = SUBCIRCUIT_ALPHABET.chars().collect();
        if self.subcircuits.len() > labels.len() {
            return Err(CutFinderError::TooManySubcircuits(
                self.subcircuits.len(),
                labels.len(),
            ));
        }
        let mapping = self.default_wire_mapping();
        let mut out = vec!['-'; self.num_wires()];
        for (label, subcircuit) in labels.iter().zip(&self.subcircuits) {
            for wire in subcircuit {
                if let Some(slot) = mapping.get(*wire).and_then(|w| out.get_mut(*w)) {
                    *slot = *label;
                }
            }
        }
        Ok(out.into_iter().collect())
    }

    /// Numbering of output wires, indexed by internal wire id.
    ///
    /// Input qubits keep their relative order and every cut wire is placed
    /// right after the wire it was cut from, so each `Move` acts on adjacent
    /// wires.
    #[must_use]
    pub fn default_wire_mapping(&self) -> Vec<usize> {
        let mut order: Vec<(usize, usize, usize)> = self
            .wire_names
            .entries()
            .map(|(id, name)| {
                let root = self.wire_names.lookup(name.root()).unwrap_or(usize::MAX);
                (root, name.cut_depth(), id)
            })
            .collect();
        order.sort_unstable();

        let mut mapping = vec![0; self.wire_names.array_size_needed()];
        for (position, (_, _, id)) in order.into_iter().enumerate() {
            mapping[id] = position;
        }
        mapping
    }

    fn gate_position(&self, instruction_id: usize) -> Result<usize, CutFinderError> {
        self.new_positions
            .get(instruction_id)
            .copied()
            .ok_or(CutFinderError::UnknownInstruction(instruction_id))
    }
}

impl CircuitInterface for SimpleGateList {
    fn num_qubits(&self) -> usize {
        self.num_qubits
    }

    fn multi_qubit_gates(&self) -> Vec<MultiQubitGate> {
        self.circuit
            .iter()
            .enumerate()
            .filter_map(|(instruction_id, inst)| {
                inst.as_gate()
                    .filter(|gate| gate.is_multi_qubit())
                    .map(|gate| MultiQubitGate {
                        instruction_id,
                        gate: gate.clone(),
                    })
            })
            .collect()
    }

    fn insert_gate_cut(
        &mut self,
        instruction_id: usize,
        cut_type: CutType,
    ) -> Result<(), CutFinderError> {
        let position = self.gate_position(instruction_id)?;
        self.cut_types[position] = Some(cut_type);
        Ok(())
    }

    fn insert_wire_cut(
        &mut self,
        instruction_id: usize,
        input: usize,
        source_wire: usize,
        destination_wire: usize,
        cut_type: CutType,
    ) -> Result<(), CutFinderError> {
        let position = self.gate_position(instruction_id)?;
        let qubit_index = input
            .checked_sub(1)
            .ok_or(CutFinderError::UnknownInstruction(instruction_id))?;

        // Gate inputs are numbered from 1
        let current = self.new_circuit[position]
            .as_gate()
            .and_then(|gate| gate.qubits.get(qubit_index))
            .copied()
            .ok_or(CutFinderError::UnknownInstruction(instruction_id))?;
        if current != source_wire {
            return Err(CutFinderError::WireMismatch {
                instruction: instruction_id,
                expected: current,
                found: source_wire,
            });
        }

        if self.wire_names.name(destination_wire).is_none() {
            let source_name = self.wire_names.name(source_wire).cloned().ok_or_else(|| {
                CutFinderError::WireIdConflict(format!("wire id {} has no name", source_wire))
            })?;
            self.wire_names
                .define_id(destination_wire, WireName::cut_of(source_name))?;
        }

        // Everything from the cut point on continues on the new wire
        for inst in &mut self.new_circuit[position..] {
            for wire in inst.wires_mut() {
                if *wire == source_wire {
                    *wire = destination_wire;
                }
            }
        }

        self.new_circuit.insert(
            position,
            Instruction::Move {
                source: source_wire,
                destination: destination_wire,
            },
        );
        self.cut_types.insert(position, Some(cut_type));
        for pos in &mut self.new_positions[instruction_id..] {
            *pos += 1;
        }

        let qubit = self.circuit[instruction_id]
            .as_gate()
            .and_then(|gate| gate.qubits.get(qubit_index))
            .copied()
            .ok_or(CutFinderError::UnknownInstruction(instruction_id))?;
        self.output_wires[qubit] = destination_wire;

        Ok(())
    }

    fn define_subcircuits(&mut self, subcircuits: Vec<Vec<usize>>) {
        self.subcircuits = subcircuits;
    }
}

// =============================================================================
// TESTS
// =============================================================================
