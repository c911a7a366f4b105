//! # LO Cuts Optimizer
//!
//! Runs a [`CutOptimization`] to completion and writes the cheapest scheme
//! back into the circuit.

use crate::interface::CircuitInterface;
use crate::optimization::{CutCost, CutOptimization, WidthBound};
use crate::search::SearchStats;
use crate::settings::{DeviceConstraints, OptimizationSettings};
use crate::state::DisjointSubcircuitsState;
use crate::types::{CutFinderError, Gamma};
use tracing::debug;

/// Finds LO gate and wire cuts for a circuit.
pub struct LoCutsOptimizer {
    settings: OptimizationSettings,
    constraints: DeviceConstraints,
    search: Option<CutOptimization>,
    best_result: Option<DisjointSubcircuitsState>,
}

impl LoCutsOptimizer {
    #[must_use]
    pub fn new(settings: OptimizationSettings, constraints: DeviceConstraints) -> Self {
        Self {
            settings,
            constraints,
            search: None,
            best_result: None,
        }
    }

    /// Search for the cheapest cut scheme and export it into `circuit`.
    ///
    /// Goals produced by the optimization passes are ranked by their real
    /// gamma (`upper_bound_gamma`), then by width; the first of several
    /// equally cheap goals is kept. Returns `None` when no scheme satisfies
    /// the constraints, leaving `circuit` untouched.
    pub fn optimize<C: CircuitInterface + ?Sized>(
        &mut self,
        circuit: &mut C,
    ) -> Result<Option<DisjointSubcircuitsState>, CutFinderError> {
        let mut search = CutOptimization::new(&*circuit, &self.settings, &self.constraints)?;

        let mut best: Option<(DisjointSubcircuitsState, CutCost)> = None;
        let mut passes = 0u64;
        while let Some((state, _)) = search.optimization_pass()? {
            passes += 1;
            let cost = scheme_cost(&state);
            if best.as_ref().is_none_or(|(_, best_cost)| cost < *best_cost) {
                best = Some((state, cost));
            }
        }

        self.best_result = best.map(|(state, _)| state);
        if let Some(state) = &self.best_result {
            state.export_cuts(circuit)?;
        }

        debug!(
            passes,
            found = self.best_result.is_some(),
            minimum_reached = search.minimum_reached(),
            "cut optimization finished"
        );
        self.search = Some(search);
        Ok(self.best_result.clone())
    }

    /// Best state of the last [`Self::optimize`] call.
    #[must_use]
    pub fn best_result(&self) -> Option<&DisjointSubcircuitsState> {
        self.best_result.as_ref()
    }

    /// Whether the last search proved its result minimal.
    #[must_use]
    pub fn minimum_reached(&self) -> bool {
        self.search
            .as_ref()
            .is_some_and(CutOptimization::minimum_reached)
    }

    /// Search counters of the last run; zero before the first run.
    #[must_use]
    pub fn stats(&self, penultimate: bool) -> SearchStats {
        self.search
            .as_ref()
            .map(|search| search.stats(penultimate))
            .unwrap_or_default()
    }

    #[must_use]
    pub fn settings(&self) -> &OptimizationSettings {
        &self.settings
    }

    #[must_use]
    pub fn constraints(&self) -> &DeviceConstraints {
        &self.constraints
    }
}

/// Cost of a finished scheme: the gamma it actually incurs, then its width.
fn scheme_cost(goal: &DisjointSubcircuitsState) -> CutCost {
    CutCost {
        gamma: Gamma(goal.upper_bound_gamma()),
        max_width: WidthBound::Finite(goal.max_width()),
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::circuit::{CircuitElement, Instruction};
    use crate::interface::SimpleGateList;
    use crate::types::{CutType, WireName};

    fn cx(a: u64, b: u64) -> Instruction<WireName> {
        Instruction::Gate(
            CircuitElement::new("cx", vec![WireName::Index(a), WireName::Index(b)])
                .with_gamma(3.0),
        )
    }

    #[test]
    fn no_cut_needed_when_circuit_fits() {
        let mut list = SimpleGateList::new(&[cx(0, 1)], &[]);
        let mut optimizer = LoCutsOptimizer::new(
            OptimizationSettings::default(),
            DeviceConstraints::new(2).expect("constraints"),
        );
        let best = optimizer.optimize(&mut list).expect("optimize").expect("result");
        assert!(best.cut_actions().is_empty());
        assert_eq!(best.upper_bound_gamma(), 1.0);
        assert!(optimizer.minimum_reached());
        assert_eq!(list.subcircuits(), &[vec![0, 1]]);
    }

    #[test]
    fn single_gate_cut_splits_two_qubits() {
        let mut list = SimpleGateList::new(&[cx(0, 1)], &[]);
        let mut optimizer = LoCutsOptimizer::new(
            OptimizationSettings::default(),
            DeviceConstraints::new(1).expect("constraints"),
        );
        let best = optimizer.optimize(&mut list).expect("optimize").expect("result");
        assert_eq!(best.upper_bound_gamma(), 3.0);
        assert_eq!(list.cut_types()[0], Some(CutType::Lo));
        assert_eq!(list.subcircuits(), &[vec![0], vec![1]]);
        assert!(optimizer.minimum_reached());
    }

    #[test]
    fn gate_cut_beats_equally_bounded_wire_cut() {
        // Both schemes have lower bound 3; the wire cut really costs 4.
        for seed in 0..64 {
            let mut list = SimpleGateList::new(&[cx(0, 1), cx(0, 2)], &[]);
            let settings = OptimizationSettings {
                seed: Some(seed),
                ..OptimizationSettings::exhaustive()
            };
            let mut optimizer =
                LoCutsOptimizer::new(settings, DeviceConstraints::new(2).expect("constraints"));
            let best = optimizer.optimize(&mut list).expect("optimize").expect("result");
            assert_eq!(best.upper_bound_gamma(), 3.0, "seed {seed}");
            assert!(optimizer.minimum_reached(), "seed {seed}");
        }
    }

    #[test]
    fn infeasible_without_gate_cuts() {
        let mut list = SimpleGateList::new(&[cx(0, 1)], &[]);
        let settings = OptimizationSettings::default().with_gate_cuts(false);
        let mut optimizer =
            LoCutsOptimizer::new(settings, DeviceConstraints::new(1).expect("constraints"));
        assert!(optimizer.optimize(&mut list).expect("optimize").is_none());
        assert!(optimizer.best_result().is_none());
    }
}
