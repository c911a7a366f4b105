//! # Search State
//!
//! `DisjointSubcircuitsState` is one node of the cut search: a partial cut
//! scheme covering the first `level` multi-qubit gates.
//!
//! Wires are grouped into subcircuits with a union-find forest (`uptree`).
//! The root of each tree is the smallest wire id in the subcircuit and holds
//! the subcircuit width. Wire cuts allocate fresh wires from a fixed budget of
//! `num_qubits + max_wire_cuts` slots.
//!
//! ## Gamma Bounds
//!
//! - `gamma_ub` multiplies the LO cost of every cut taken so far.
//! - `gamma_lb` multiplies the cost of gate cuts only; wire cuts contribute
//!   through Bell pairs in [`DisjointSubcircuitsState::lower_bound_gamma`].

use crate::actions::ActionKind;
use crate::interface::{CircuitInterface, MultiQubitGate};
use crate::primitives::BELL_PAIR_GAMMA;
use crate::types::{CutFinderError, CutType};
use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

// =============================================================================
// RECORDED ACTIONS
// =============================================================================

/// One wire cut: gate input `input` (1-based) moves from `source_wire` onto
/// the fresh `destination_wire`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WireCut {
    pub input: usize,
    pub source_wire: usize,
    pub destination_wire: usize,
}

/// Arguments of a recorded cut.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CutArgs {
    /// The gate was cut; `(input, wire)` for each gate input.
    Gate(Vec<(usize, usize)>),
    /// One or more input wires were cut.
    Wires(Vec<WireCut>),
}

/// A cut decision taken on the way to a state.
#[derive(Debug, Clone, PartialEq)]
pub struct AppliedAction {
    pub kind: ActionKind,
    pub gate: Arc<MultiQubitGate>,
    pub args: CutArgs,
}

// =============================================================================
// DISJOINT SUBCIRCUITS STATE
// =============================================================================

/// A partial cut scheme tracked as disjoint sets of wires.
#[derive(Debug, Clone, PartialEq)]
pub struct DisjointSubcircuitsState {
    wiremap: Vec<usize>,
    num_wires: usize,
    uptree: Vec<usize>,
    width: Vec<usize>,
    bell_pairs: Vec<(usize, usize)>,
    gamma_lb: f64,
    gamma_ub: f64,
    no_merge: Vec<(usize, usize)>,
    actions: Vec<AppliedAction>,
    level: usize,
}

impl DisjointSubcircuitsState {
    /// Start state: every qubit on its own wire, in its own subcircuit.
    #[must_use]
    pub fn new(num_qubits: usize, max_wire_cuts: usize) -> Self {
        let max_wires = num_qubits + max_wire_cuts;
        Self {
            wiremap: (0..num_qubits).collect(),
            num_wires: num_qubits,
            uptree: (0..max_wires).collect(),
            width: vec![1; max_wires],
            bell_pairs: Vec::new(),
            gamma_lb: 1.0,
            gamma_ub: 1.0,
            no_merge: Vec::new(),
            actions: Vec::new(),
            level: 0,
        }
    }

    // -------------------------------------------------------------------------
    // Accessors
    // -------------------------------------------------------------------------

    #[must_use]
    pub fn num_qubits(&self) -> usize {
        self.wiremap.len()
    }

    /// Number of wires allocated so far.
    #[must_use]
    pub fn num_wires(&self) -> usize {
        self.num_wires
    }

    /// Current wire of each qubit.
    #[must_use]
    pub fn wiremap(&self) -> &[usize] {
        &self.wiremap
    }

    #[must_use]
    pub fn uptree(&self) -> &[usize] {
        &self.uptree
    }

    /// Width per wire slot; meaningful at roots only.
    #[must_use]
    pub fn width(&self) -> &[usize] {
        &self.width
    }

    #[must_use]
    pub fn bell_pairs(&self) -> &[(usize, usize)] {
        &self.bell_pairs
    }

    /// Do-not-merge clauses as recorded (wire pairs, not roots).
    #[must_use]
    pub fn no_merge(&self) -> &[(usize, usize)] {
        &self.no_merge
    }

    /// Cut decisions in the order they were taken.
    #[must_use]
    pub fn cut_actions(&self) -> &[AppliedAction] {
        &self.actions
    }

    /// Search depth: the index of the next gate to process.
    #[must_use]
    pub fn search_level(&self) -> usize {
        self.level
    }

    /// Largest subcircuit width.
    #[must_use]
    pub fn max_width(&self) -> usize {
        self.width.iter().copied().max().unwrap_or(0)
    }

    /// Root wires of all subcircuits, ascending.
    #[must_use]
    pub fn subcircuit_indices(&self) -> Vec<usize> {
        (0..self.num_wires)
            .filter(|&wire| self.uptree[wire] == wire)
            .collect()
    }

    /// Root of every allocated wire.
    #[must_use]
    pub fn wire_root_mapping(&self) -> Vec<usize> {
        (0..self.num_wires)
            .map(|wire| self.find_wire_root(wire))
            .collect()
    }

    // -------------------------------------------------------------------------
    // Gamma bounds
    // -------------------------------------------------------------------------

    /// Roots of both ends of a Bell pair, smaller first.
    #[must_use]
    pub fn find_root_bell_pair(&self, pair: (usize, usize)) -> (usize, usize) {
        let r0 = self.find_wire_root(pair.0);
        let r1 = self.find_wire_root(pair.1);
        if r0 <= r1 { (r0, r1) } else { (r1, r0) }
    }

    /// Lower bound on the gamma of any completion of this state.
    ///
    /// Bell pairs joining the same two subcircuits can share one cut, so
    /// each distinct pair of roots contributes a single factor.
    #[must_use]
    pub fn lower_bound_gamma(&self) -> f64 {
        let root_pairs: BTreeSet<(usize, usize)> = self
            .bell_pairs
            .iter()
            .map(|pair| self.find_root_bell_pair(*pair))
            .collect();
        root_pairs
            .iter()
            .fold(self.gamma_lb, |gamma, _| gamma * BELL_PAIR_GAMMA)
    }

    /// Gamma of the cuts taken so far.
    #[must_use]
    pub fn upper_bound_gamma(&self) -> f64 {
        self.gamma_ub
    }

    /// Multiply both gamma bounds (gate cuts).
    pub fn scale_gamma(&mut self, factor: f64) {
        self.gamma_lb *= factor;
        self.gamma_ub *= factor;
    }

    /// Multiply only the upper bound (wire cuts).
    pub fn scale_gamma_upper_bound(&mut self, factor: f64) {
        self.gamma_ub *= factor;
    }

    /// Record a Bell pair between two wires.
    pub fn add_bell_pair(&mut self, wire1: usize, wire2: usize) {
        self.bell_pairs.push((wire1, wire2));
    }

    // -------------------------------------------------------------------------
    // Wires and subcircuits
    // -------------------------------------------------------------------------

    /// Whether `n` more wires fit in the wire budget.
    #[must_use]
    pub fn can_add_wires(&self, n: usize) -> bool {
        self.num_wires + n <= self.uptree.len()
    }

    /// Whether subcircuit `root` can grow by `n` wires within `max_width`.
    #[must_use]
    pub fn can_expand_subcircuit(&self, root: usize, n: usize, max_width: usize) -> bool {
        self.width[root] + n <= max_width
    }

    /// Move `qubit` onto a fresh wire and return the wire id.
    ///
    /// Callers check [`Self::can_add_wires`] first.
    pub fn new_wire(&mut self, qubit: usize) -> usize {
        debug_assert!(self.can_add_wires(1), "wire budget exhausted");
        let wire = self.num_wires;
        self.wiremap[qubit] = wire;
        self.num_wires += 1;
        wire
    }

    /// Current wire of `qubit`.
    #[must_use]
    pub fn wire(&self, qubit: usize) -> usize {
        self.wiremap[qubit]
    }

    #[must_use]
    pub fn find_wire_root(&self, wire: usize) -> usize {
        let mut wire = wire;
        while self.uptree[wire] != wire {
            wire = self.uptree[wire];
        }
        wire
    }

    /// Root of the subcircuit currently holding `qubit`.
    #[must_use]
    pub fn find_qubit_root(&self, qubit: usize) -> usize {
        self.find_wire_root(self.wiremap[qubit])
    }

    /// Whether some do-not-merge clause forbids joining roots `root1` and `root2`.
    #[must_use]
    pub fn check_do_not_merge_roots(&self, root1: usize, root2: usize) -> bool {
        debug_assert!(self.uptree[root1] == root1 && self.uptree[root2] == root2);
        self.no_merge.iter().any(|&(w1, w2)| {
            let r1 = self.find_wire_root(w1);
            let r2 = self.find_wire_root(w2);
            (r1 == root1 && r2 == root2) || (r1 == root2 && r2 == root1)
        })
    }

    /// Whether no do-not-merge clause has both wires in one subcircuit.
    #[must_use]
    pub fn verify_merge_constraints(&self) -> bool {
        self.no_merge
            .iter()
            .all(|&(w1, w2)| self.find_wire_root(w1) != self.find_wire_root(w2))
    }

    /// Forbid the subcircuits of `wire1` and `wire2` from ever merging.
    pub fn assert_do_not_merge_roots(&mut self, wire1: usize, wire2: usize) {
        self.no_merge.push((wire1, wire2));
    }

    /// Join two subcircuits; the smaller root id becomes the new root.
    pub fn merge_roots(&mut self, root1: usize, root2: usize) {
        debug_assert!(self.uptree[root1] == root1 && self.uptree[root2] == root2);
        debug_assert!(root1 != root2);
        let (keep, absorb) = if root1 < root2 {
            (root1, root2)
        } else {
            (root2, root1)
        };
        self.uptree[absorb] = keep;
        self.width[keep] += self.width[absorb];
    }

    // -------------------------------------------------------------------------
    // Actions and levels
    // -------------------------------------------------------------------------

    /// Record a cut decision.
    pub fn add_action(&mut self, kind: ActionKind, gate: Arc<MultiQubitGate>, args: CutArgs) {
        self.actions.push(AppliedAction { kind, gate, args });
    }

    /// Place this state one level below `parent`.
    pub fn set_next_level(&mut self, parent: &Self) {
        self.level = parent.level + 1;
    }

    // -------------------------------------------------------------------------
    // Export
    // -------------------------------------------------------------------------

    /// Replay the recorded cuts into `circuit` and define its subcircuits.
    ///
    /// Wire ids of the state are used as circuit wire ids: input qubits keep
    /// their ids and cut wires are numbered from `num_qubits` on.
    pub fn export_cuts<C: CircuitInterface + ?Sized>(
        &self,
        circuit: &mut C,
    ) -> Result<(), CutFinderError> {
        for action in &self.actions {
            let instruction_id = action.gate.instruction_id;
            match &action.args {
                CutArgs::Gate(_) => circuit.insert_gate_cut(instruction_id, CutType::Lo)?,
                CutArgs::Wires(cuts) => {
                    for cut in cuts {
                        circuit.insert_wire_cut(
                            instruction_id,
                            cut.input,
                            cut.source_wire,
                            cut.destination_wire,
                            CutType::Lo,
                        )?;
                    }
                }
            }
        }

        let mut subcircuits: BTreeMap<usize, Vec<usize>> = BTreeMap::new();
        for (wire, root) in self.wire_root_mapping().into_iter().enumerate() {
            subcircuits.entry(root).or_default().push(wire);
        }
        circuit.define_subcircuits(subcircuits.into_values().collect());
        Ok(())
    }
}

// =============================================================================
// TESTS
// =============================================================================
