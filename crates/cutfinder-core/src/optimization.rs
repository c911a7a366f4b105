//! # Cut Optimization
//!
//! Binds the generic best-first search to the cut-finding problem.
//!
//! ## Cost Model
//!
//! States are ranked by `(lower_bound_gamma, max_width)`. A goal bounds the
//! rest of the search by `(upper_bound_gamma, Unbounded)`, so any state whose
//! gamma lower bound already matches the goal's gamma is still explored if it
//! could fit in fewer qubits. Optimality is decided on gamma alone: once the
//! cheapest frontier lower bound reaches the best goal's gamma, the goal is
//! minimal whatever its width.
//!
//! ## Pass Structure
//!
//! 1. A greedy descent finds a first goal, which caps the wire-cut budget and
//!    seeds the upper bound.
//! 2. Best-first passes then return further goals. Goals arrive in lower
//!    bound order, so the caller keeps the one with the lowest upper bound.
//! 3. If the first best-first pass finds nothing, the greedy goal is returned
//!    in its place.

use crate::actions::ActionSet;
use crate::interface::{CircuitInterface, MultiQubitGate};
use crate::search::{BestFirstSearch, SearchSpace, SearchStats, greedy_best_first_search};
use crate::settings::{DeviceConstraints, OptimizationSettings};
use crate::state::DisjointSubcircuitsState;
use crate::types::{CutFinderError, Gamma};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::debug;

// =============================================================================
// COST
// =============================================================================

/// A width that may be unbounded; `Unbounded` orders after every finite width.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum WidthBound {
    Finite(usize),
    Unbounded,
}

/// Rank of a search state: gamma first, then subcircuit width.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CutCost {
    pub gamma: Gamma,
    pub max_width: WidthBound,
}

// =============================================================================
// WIRE-CUT BUDGET
// =============================================================================

/// Wire cuts needed to isolate every input of every multi-qubit gate.
#[must_use]
pub fn max_wire_cuts_circuit(gates: &[Arc<MultiQubitGate>]) -> usize {
    gates.iter().map(|g| g.gate.qubits.len()).sum()
}

/// Most wire cuts that fit under a gamma budget; `None` when unbounded.
///
/// `k` LO wire cuts cost at least `2^(k+1) - 1`.
#[must_use]
pub fn max_wire_cuts_gamma(max_gamma: f64) -> Option<usize> {
    if !max_gamma.is_finite() {
        return None;
    }
    let cuts = ((max_gamma + 1.0).log2() - 1.0).ceil();
    Some(cuts.max(0.0) as usize)
}

// =============================================================================
// SEARCH SPACE
// =============================================================================

/// The cut-finding problem for one circuit.
#[derive(Debug, Clone)]
pub struct CutSearchSpace {
    gates: Vec<Arc<MultiQubitGate>>,
    actions: ActionSet,
    max_gamma: f64,
    qpu_width: usize,
}

impl CutSearchSpace {
    #[must_use]
    pub fn new(
        gates: Vec<Arc<MultiQubitGate>>,
        settings: &OptimizationSettings,
        constraints: &DeviceConstraints,
    ) -> Self {
        Self {
            gates,
            actions: ActionSet::all().restricted_to(&settings.cut_search_groups()),
            max_gamma: settings.max_gamma,
            qpu_width: constraints.qpu_width(),
        }
    }

    #[must_use]
    pub fn gates(&self) -> &[Arc<MultiQubitGate>] {
        &self.gates
    }
}

impl SearchSpace for CutSearchSpace {
    type State = DisjointSubcircuitsState;
    type Cost = CutCost;

    fn cost(&self, state: &DisjointSubcircuitsState) -> CutCost {
        CutCost {
            gamma: Gamma(state.lower_bound_gamma()),
            max_width: WidthBound::Finite(state.max_width()),
        }
    }

    fn next_states(
        &self,
        state: &DisjointSubcircuitsState,
    ) -> Result<Vec<DisjointSubcircuitsState>, CutFinderError> {
        let Some(gate) = self.gates.get(state.search_level()) else {
            return Ok(Vec::new());
        };
        let mut children = Vec::new();
        for action in self.actions.for_gate(gate).iter() {
            children.extend(action.next_states(state, gate, self.qpu_width)?);
        }
        Ok(children)
    }

    fn is_goal(&self, state: &DisjointSubcircuitsState) -> bool {
        state.search_level() >= self.gates.len()
    }

    fn upper_bound_cost(&self, goal: &DisjointSubcircuitsState) -> CutCost {
        CutCost {
            gamma: Gamma(goal.upper_bound_gamma()),
            max_width: WidthBound::Unbounded,
        }
    }

    fn min_cost_bound(&self) -> Option<CutCost> {
        self.max_gamma.is_finite().then_some(CutCost {
            gamma: Gamma(self.max_gamma),
            max_width: WidthBound::Unbounded,
        })
    }

    /// Only gamma decides optimality; width merely orders the frontier.
    fn bound_is_tight(&self, upper: &CutCost, frontier: &CutCost) -> bool {
        upper.gamma <= frontier.gamma
    }
}

// =============================================================================
// CUT OPTIMIZATION
// =============================================================================

/// Greedy seeding plus resumable best-first passes over a [`CutSearchSpace`].
pub struct CutOptimization {
    space: CutSearchSpace,
    search: BestFirstSearch<CutSearchSpace>,
    greedy_goal: Option<DisjointSubcircuitsState>,
    goal_state_returned: bool,
    max_wire_cuts: usize,
}

impl CutOptimization {
    /// Prepare the search for `circuit`.
    pub fn new<C: CircuitInterface + ?Sized>(
        circuit: &C,
        settings: &OptimizationSettings,
        constraints: &DeviceConstraints,
    ) -> Result<Self, CutFinderError> {
        settings.validate()?;
        constraints.validate()?;

        let gates: Vec<Arc<MultiQubitGate>> = circuit
            .multi_qubit_gates()
            .into_iter()
            .map(Arc::new)
            .collect();
        let num_qubits = circuit.num_qubits();
        let circuit_cuts = max_wire_cuts_circuit(&gates);
        let space = CutSearchSpace::new(gates, settings, constraints);

        let greedy_goal = greedy_best_first_search(
            &space,
            DisjointSubcircuitsState::new(num_qubits, circuit_cuts),
        )?;

        let gamma_cuts = match &greedy_goal {
            Some(goal) => max_wire_cuts_gamma(goal.upper_bound_gamma()),
            None => max_wire_cuts_gamma(settings.max_gamma),
        };
        let max_wire_cuts = gamma_cuts.map_or(circuit_cuts, |cuts| cuts.min(circuit_cuts));

        let mut search = BestFirstSearch::new(settings.max_backjumps, settings.seed, false);
        search.initialize(
            &space,
            vec![DisjointSubcircuitsState::new(num_qubits, max_wire_cuts)],
        );
        if let Some(goal) = &greedy_goal {
            search.update_upper_bound_goal_state(&space, goal);
        }

        debug!(
            gates = space.gates().len(),
            num_qubits,
            max_wire_cuts,
            greedy_gamma = greedy_goal.as_ref().map(|g| g.upper_bound_gamma()),
            "cut search initialized"
        );

        Ok(Self {
            space,
            search,
            greedy_goal,
            goal_state_returned: false,
            max_wire_cuts,
        })
    }

    /// Return the next goal, or `None` when the search is over.
    pub fn optimization_pass(
        &mut self,
    ) -> Result<Option<(DisjointSubcircuitsState, CutCost)>, CutFinderError> {
        let mut result = self.search.optimization_pass(&self.space)?;
        if result.is_none() && !self.goal_state_returned {
            result = self
                .greedy_goal
                .as_ref()
                .map(|goal| (goal.clone(), self.space.cost(goal)));
        }
        self.goal_state_returned = true;

        if let Some((state, cost)) = &result {
            debug!(
                gamma_lb = %cost.gamma,
                gamma_ub = state.upper_bound_gamma(),
                cuts = state.cut_actions().len(),
                "optimization pass found a goal"
            );
        }
        Ok(result)
    }

    #[must_use]
    pub fn minimum_reached(&self) -> bool {
        self.search.minimum_reached()
    }

    #[must_use]
    pub fn stats(&self, penultimate: bool) -> SearchStats {
        self.search.stats(penultimate)
    }

    #[must_use]
    pub fn upper_bound_cost(&self) -> Option<&CutCost> {
        self.search.upper_bound_cost()
    }

    pub fn update_upper_bound_cost(&mut self, bound: CutCost) {
        self.search.update_upper_bound_cost(bound);
    }

    /// Wire-cut budget of the best-first states.
    #[must_use]
    pub fn max_wire_cuts(&self) -> usize {
        self.max_wire_cuts
    }

    #[must_use]
    pub fn greedy_goal(&self) -> Option<&DisjointSubcircuitsState> {
        self.greedy_goal.as_ref()
    }
}

// =============================================================================
// TESTS
// =============================================================================
