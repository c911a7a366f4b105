//! # Cutting Actions
//!
//! The moves of the cut search. Each action takes a state and the next
//! multi-qubit gate and yields zero or more child states.
//!
//! | Action | Effect | gamma_lb | gamma_ub |
//! |--------|--------|----------|----------|
//! | `ApplyGate` | merge the subcircuits of all gate qubits | - | - |
//! | `CutTwoQubitGate` | cut the gate | x gamma | x gamma |
//! | `CutLeftWire` | move input 1 to a new wire in input 2's subcircuit | Bell pair | x 4 |
//! | `CutRightWire` | move input 2 to a new wire in input 1's subcircuit | Bell pair | x 4 |
//! | `CutBothWires` | move both inputs to a new shared subcircuit | 2 Bell pairs | x 16 |
//!
//! An action that is infeasible for a state returns no children. Every child
//! sits one search level below its parent.

use crate::interface::MultiQubitGate;
use crate::primitives::LO_WIRE_CUT_GAMMA;
use crate::state::{CutArgs, DisjointSubcircuitsState, WireCut};
use crate::types::{CutChoice, CutFinderError};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

// =============================================================================
// ACTION GROUPS
// =============================================================================

/// Tags used to select actions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ActionGroup {
    /// Leaves the gate uncut.
    NoCut,
    /// Cuts the gate.
    GateCut,
    /// Cuts gate input wires.
    WireCut,
    /// Applies to two-qubit gates.
    TwoQubitGates,
    /// Applies to gates on more than two qubits.
    MultiqubitGates,
}

// =============================================================================
// ACTION KINDS
// =============================================================================

/// A search action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ActionKind {
    ApplyGate,
    CutTwoQubitGate,
    CutLeftWire,
    CutRightWire,
    CutBothWires,
}

impl ActionKind {
    /// All actions in registry order.
    pub const ALL: [ActionKind; 5] = [
        Self::ApplyGate,
        Self::CutTwoQubitGate,
        Self::CutLeftWire,
        Self::CutRightWire,
        Self::CutBothWires,
    ];

    /// Name recorded with cut decisions; `ApplyGate` is not recorded.
    #[must_use]
    pub fn name(self) -> Option<&'static str> {
        match self {
            Self::ApplyGate => None,
            Self::CutTwoQubitGate => Some("CutTwoQubitGate"),
            Self::CutLeftWire => Some("CutLeftWire"),
            Self::CutRightWire => Some("CutRightWire"),
            Self::CutBothWires => Some("CutBothWires"),
        }
    }

    #[must_use]
    pub fn groups(self) -> &'static [ActionGroup] {
        match self {
            Self::ApplyGate => &[
                ActionGroup::NoCut,
                ActionGroup::TwoQubitGates,
                ActionGroup::MultiqubitGates,
            ],
            Self::CutTwoQubitGate => &[ActionGroup::GateCut, ActionGroup::TwoQubitGates],
            Self::CutLeftWire | Self::CutRightWire | Self::CutBothWires => {
                &[ActionGroup::WireCut, ActionGroup::TwoQubitGates]
            }
        }
    }

    /// The per-gate cut choice this action realizes.
    #[must_use]
    pub fn cut_choice(self) -> CutChoice {
        match self {
            Self::ApplyGate => CutChoice::NoCut,
            Self::CutTwoQubitGate => CutChoice::GateCut,
            Self::CutLeftWire | Self::CutRightWire | Self::CutBothWires => CutChoice::WireCut,
        }
    }

    /// Child states of `state` after taking this action on `gate`.
    ///
    /// Returns an error only when a two-qubit action meets a gate of a
    /// different arity.
    pub fn next_states(
        self,
        state: &DisjointSubcircuitsState,
        gate: &Arc<MultiQubitGate>,
        max_width: usize,
    ) -> Result<Vec<DisjointSubcircuitsState>, CutFinderError> {
        let mut children = match self {
            Self::ApplyGate => apply_gate(state, gate, max_width),
            Self::CutTwoQubitGate => cut_two_qubit_gate(state, gate)?,
            Self::CutLeftWire => cut_one_wire(self, state, gate, max_width, Side::Left)?,
            Self::CutRightWire => cut_one_wire(self, state, gate, max_width, Side::Right)?,
            Self::CutBothWires => cut_both_wires(state, gate, max_width)?,
        };
        for child in &mut children {
            child.set_next_level(state);
        }
        Ok(children)
    }
}

fn two_qubits(action: ActionKind, gate: &MultiQubitGate) -> Result<(usize, usize), CutFinderError> {
    match gate.gate.qubits.as_slice() {
        [q1, q2] => Ok((*q1, *q2)),
        other => Err(CutFinderError::UnsupportedGateArity {
            action: action.name().unwrap_or("ApplyGate"),
            qubits: other.len(),
        }),
    }
}

fn apply_gate(
    state: &DisjointSubcircuitsState,
    gate: &MultiQubitGate,
    max_width: usize,
) -> Vec<DisjointSubcircuitsState> {
    let mut roots: Vec<usize> = gate
        .gate
        .qubits
        .iter()
        .map(|&q| state.find_qubit_root(q))
        .collect();
    roots.sort_unstable();
    roots.dedup();

    let Some((&base, others)) = roots.split_first() else {
        return vec![state.clone()];
    };
    if others.is_empty() {
        return vec![state.clone()];
    }

    let merged_width: usize = roots.iter().map(|&r| state.width()[r]).sum();
    if merged_width > max_width {
        return Vec::new();
    }
    for (i, &r1) in roots.iter().enumerate() {
        if roots[i + 1..]
            .iter()
            .any(|&r2| state.check_do_not_merge_roots(r1, r2))
        {
            return Vec::new();
        }
    }

    let mut child = state.clone();
    for &root in others {
        child.merge_roots(base, root);
    }
    vec![child]
}

fn cut_two_qubit_gate(
    state: &DisjointSubcircuitsState,
    gate: &Arc<MultiQubitGate>,
) -> Result<Vec<DisjointSubcircuitsState>, CutFinderError> {
    let (q1, q2) = two_qubits(ActionKind::CutTwoQubitGate, gate)?;
    let Some(gamma) = gate.gate.gamma else {
        return Ok(Vec::new());
    };

    let w1 = state.wire(q1);
    let w2 = state.wire(q2);
    let r1 = state.find_wire_root(w1);
    let r2 = state.find_wire_root(w2);
    if r1 == r2 {
        return Ok(Vec::new());
    }

    let mut child = state.clone();
    child.assert_do_not_merge_roots(r1, r2);
    child.scale_gamma(gamma);
    child.add_action(
        ActionKind::CutTwoQubitGate,
        Arc::clone(gate),
        CutArgs::Gate(vec![(1, w1), (2, w2)]),
    );
    Ok(vec![child])
}

#[derive(Debug, Clone, Copy)]
enum Side {
    Left,
    Right,
}

fn cut_one_wire(
    action: ActionKind,
    state: &DisjointSubcircuitsState,
    gate: &Arc<MultiQubitGate>,
    max_width: usize,
    side: Side,
) -> Result<Vec<DisjointSubcircuitsState>, CutFinderError> {
    let (q1, q2) = two_qubits(action, gate)?;
    if !state.can_add_wires(1) {
        return Ok(Vec::new());
    }

    let r1 = state.find_qubit_root(q1);
    let r2 = state.find_qubit_root(q2);
    if r1 == r2 {
        return Ok(Vec::new());
    }

    // The cut qubit joins the subcircuit of the other input
    let (input, cut_qubit, target_root) = match side {
        Side::Left => (1, q1, r2),
        Side::Right => (2, q2, r1),
    };
    if !state.can_expand_subcircuit(target_root, 1, max_width) {
        return Ok(Vec::new());
    }

    let mut child = state.clone();
    let source_wire = child.wire(cut_qubit);
    let new_wire = child.new_wire(cut_qubit);
    child.merge_roots(target_root, new_wire);
    child.assert_do_not_merge_roots(r1, r2);
    child.add_bell_pair(r1, r2);
    child.scale_gamma_upper_bound(LO_WIRE_CUT_GAMMA);
    child.add_action(
        action,
        Arc::clone(gate),
        CutArgs::Wires(vec![WireCut {
            input,
            source_wire,
            destination_wire: new_wire,
        }]),
    );
    Ok(vec![child])
}

fn cut_both_wires(
    state: &DisjointSubcircuitsState,
    gate: &Arc<MultiQubitGate>,
    max_width: usize,
) -> Result<Vec<DisjointSubcircuitsState>, CutFinderError> {
    let (q1, q2) = two_qubits(ActionKind::CutBothWires, gate)?;
    if !state.can_add_wires(2) || max_width < 2 {
        return Ok(Vec::new());
    }

    let w1 = state.wire(q1);
    let w2 = state.wire(q2);
    let r1 = state.find_wire_root(w1);
    let r2 = state.find_wire_root(w2);

    let mut child = state.clone();
    let new1 = child.new_wire(q1);
    let new2 = child.new_wire(q2);
    child.merge_roots(new1, new2);
    child.assert_do_not_merge_roots(r1, new1);
    child.assert_do_not_merge_roots(r2, new2);
    child.add_bell_pair(r1, new1);
    child.add_bell_pair(r2, new2);
    child.scale_gamma_upper_bound(LO_WIRE_CUT_GAMMA * LO_WIRE_CUT_GAMMA);
    child.add_action(
        ActionKind::CutBothWires,
        Arc::clone(gate),
        CutArgs::Wires(vec![
            WireCut {
                input: 1,
                source_wire: w1,
                destination_wire: new1,
            },
            WireCut {
                input: 2,
                source_wire: w2,
                destination_wire: new2,
            },
        ]),
    );
    Ok(vec![child])
}

// =============================================================================
// ACTION SET
// =============================================================================

/// An ordered collection of actions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionSet {
    actions: Vec<ActionKind>,
}

impl Default for ActionSet {
    fn default() -> Self {
        Self::all()
    }
}

impl ActionSet {
    /// Every action, in registry order.
    #[must_use]
    pub fn all() -> Self {
        Self {
            actions: ActionKind::ALL.to_vec(),
        }
    }

    /// Actions that belong to at least one of `groups`.
    #[must_use]
    pub fn restricted_to(&self, groups: &[ActionGroup]) -> Self {
        Self {
            actions: self
                .actions
                .iter()
                .copied()
                .filter(|a| a.groups().iter().any(|g| groups.contains(g)))
                .collect(),
        }
    }

    /// Actions in group `group`.
    #[must_use]
    pub fn group(&self, group: ActionGroup) -> Self {
        self.restricted_to(&[group])
    }

    /// Actions allowed by a gate's cut constraints.
    ///
    /// `None` allows everything; an empty list only allows leaving the gate
    /// uncut.
    #[must_use]
    pub fn subset_for(&self, constraints: Option<&[CutChoice]>) -> Self {
        let allowed: &[CutChoice] = match constraints {
            None => return self.clone(),
            Some([]) => &[CutChoice::NoCut],
            Some(choices) => choices,
        };
        Self {
            actions: self
                .actions
                .iter()
                .copied()
                .filter(|a| allowed.contains(&a.cut_choice()))
                .collect(),
        }
    }

    /// Actions eligible for a gate, by arity and constraints.
    #[must_use]
    pub fn for_gate(&self, gate: &MultiQubitGate) -> Self {
        let arity = if gate.gate.qubits.len() == 2 {
            ActionGroup::TwoQubitGates
        } else {
            ActionGroup::MultiqubitGates
        };
        self.group(arity).subset_for(gate.gate.cuts.as_deref())
    }

    pub fn iter(&self) -> impl Iterator<Item = ActionKind> + '_ {
        self.actions.iter().copied()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.actions.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::circuit::CircuitElement;

    fn cx(qubits: Vec<usize>) -> Arc<MultiQubitGate> {
        Arc::new(MultiQubitGate {
            instruction_id: 4,
            gate: CircuitElement::new("cx", qubits).with_gamma(3.0),
        })
    }

    fn only(children: Vec<DisjointSubcircuitsState>) -> DisjointSubcircuitsState {
        assert_eq!(children.len(), 1);
        children.into_iter().next().expect("one child")
    }

    #[test]
    fn registry_groups() {
        let set = ActionSet::all();
        assert_eq!(set.len(), 5);
        assert_eq!(
            set.group(ActionGroup::MultiqubitGates).iter().collect::<Vec<_>>(),
            vec![ActionKind::ApplyGate]
        );
        let no_wires = set.restricted_to(&[ActionGroup::NoCut, ActionGroup::GateCut]);
        assert_eq!(
            no_wires.iter().collect::<Vec<_>>(),
            vec![ActionKind::ApplyGate, ActionKind::CutTwoQubitGate]
        );
    }

    #[test]
    fn constraints_filter_actions() {
        let set = ActionSet::all();
        assert_eq!(set.subset_for(None), set);
        assert_eq!(
            set.subset_for(Some(&[])).iter().collect::<Vec<_>>(),
            vec![ActionKind::ApplyGate]
        );
        assert_eq!(
            set.subset_for(Some(&[CutChoice::WireCut]))
                .iter()
                .collect::<Vec<_>>(),
            vec![
                ActionKind::CutLeftWire,
                ActionKind::CutRightWire,
                ActionKind::CutBothWires
            ]
        );
    }

    #[test]
    fn apply_gate_merges() {
        let state = DisjointSubcircuitsState::new(2, 2);
        let child = only(
            ActionKind::ApplyGate
                .next_states(&state, &cx(vec![0, 1]), 2)
                .expect("apply"),
        );
        assert_eq!(child.uptree(), &[0, 0, 2, 3]);
        assert_eq!(child.width(), &[2, 1, 1, 1]);
        assert_eq!(child.search_level(), 1);
        assert!(child.cut_actions().is_empty());
    }

    #[test]
    fn apply_gate_respects_width() {
        let state = DisjointSubcircuitsState::new(2, 0);
        let children = ActionKind::ApplyGate
            .next_states(&state, &cx(vec![0, 1]), 1)
            .expect("apply");
        assert!(children.is_empty());
    }

    #[test]
    fn apply_gate_within_subcircuit_copies() {
        let state = DisjointSubcircuitsState::new(2, 0);
        let merged = only(
            ActionKind::ApplyGate
                .next_states(&state, &cx(vec![0, 1]), 2)
                .expect("apply"),
        );
        // Already together: width limit no longer matters
        let again = only(
            ActionKind::ApplyGate
                .next_states(&merged, &cx(vec![1, 0]), 1)
                .expect("apply"),
        );
        assert_eq!(again.uptree(), merged.uptree());
        assert_eq!(again.search_level(), 2);
    }

    #[test]
    fn multiqubit_apply_merges_all_roots() {
        let state = DisjointSubcircuitsState::new(3, 0);
        let gate = Arc::new(MultiQubitGate {
            instruction_id: 0,
            gate: CircuitElement::new("ccx", vec![2, 0, 1]),
        });
        let child = only(
            ActionKind::ApplyGate
                .next_states(&state, &gate, 3)
                .expect("apply"),
        );
        assert_eq!(child.subcircuit_indices(), vec![0]);
        assert_eq!(child.width()[0], 3);
    }

    #[test]
    fn gate_cut_requires_gamma() {
        let state = DisjointSubcircuitsState::new(2, 0);
        let gate = Arc::new(MultiQubitGate {
            instruction_id: 0,
            gate: CircuitElement::new("custom", vec![0, 1]),
        });
        let children = ActionKind::CutTwoQubitGate
            .next_states(&state, &gate, 2)
            .expect("cut");
        assert!(children.is_empty());
    }

    #[test]
    fn gate_cut_records_action() {
        let state = DisjointSubcircuitsState::new(2, 0);
        let child = only(
            ActionKind::CutTwoQubitGate
                .next_states(&state, &cx(vec![0, 1]), 2)
                .expect("cut"),
        );
        assert_eq!(child.no_merge(), &[(0, 1)]);
        assert_eq!(child.lower_bound_gamma(), 3.0);
        assert_eq!(child.upper_bound_gamma(), 3.0);
        let action = &child.cut_actions()[0];
        assert_eq!(action.kind, ActionKind::CutTwoQubitGate);
        assert_eq!(action.gate.instruction_id, 4);
        assert_eq!(action.args, CutArgs::Gate(vec![(1, 0), (2, 1)]));
    }

    #[test]
    fn wire_cuts_need_budget() {
        let state = DisjointSubcircuitsState::new(2, 0);
        for action in [
            ActionKind::CutLeftWire,
            ActionKind::CutRightWire,
            ActionKind::CutBothWires,
        ] {
            let children = action
                .next_states(&state, &cx(vec![0, 1]), 4)
                .expect("cut");
            assert!(children.is_empty());
        }
    }

    #[test]
    fn two_qubit_actions_reject_other_arities() {
        let state = DisjointSubcircuitsState::new(3, 2);
        let gate = Arc::new(MultiQubitGate {
            instruction_id: 0,
            gate: CircuitElement::new("ccx", vec![0, 1, 2]).with_gamma(3.0),
        });
        let err = ActionKind::CutLeftWire.next_states(&state, &gate, 3);
        assert!(matches!(
            err,
            Err(CutFinderError::UnsupportedGateArity { qubits: 3, .. })
        ));
    }
}
