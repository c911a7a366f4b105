//! # Best-First Search
//!
//! A generic best-first search with backjump accounting, used by the cut
//! optimizer but independent of circuits.
//!
//! ## Ordering
//!
//! The frontier is a min-heap keyed on `(cost, -depth, tiebreak, seq)`:
//! cheapest first, deeper states before shallower ones at equal cost, then a
//! seeded random draw, then insertion order. With a fixed seed the pop order
//! is fully deterministic.
//!
//! ## Termination
//!
//! A pass stops when it reaches a goal, when the frontier is empty, when the
//! backjump budget is spent, or when the cheapest state exceeds the min-cost
//! bound. A state that exceeds the bound stays on the frontier unexpanded.
//! `minimum_reached` is set only when the frontier proves that nothing
//! cheaper than the best goal remains; a state past the min-cost bound never
//! counts as such proof.

use crate::types::CutFinderError;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::BinaryHeap;
use std::fmt::Debug;
use tracing::trace;

// =============================================================================
// SEARCH SPACE
// =============================================================================

/// The problem a [`BestFirstSearch`] explores.
pub trait SearchSpace {
    type State: Clone;
    type Cost: Ord + Clone + Debug;

    /// Cost of a state; must not decrease along a path for the search to be
    /// exact.
    fn cost(&self, state: &Self::State) -> Self::Cost;

    /// Children of a state.
    fn next_states(&self, state: &Self::State) -> Result<Vec<Self::State>, CutFinderError>;

    fn is_goal(&self, state: &Self::State) -> bool;

    /// Bound that a goal imposes on all further states.
    fn upper_bound_cost(&self, goal: &Self::State) -> Self::Cost {
        self.cost(goal)
    }

    /// States costing more than this are never expanded; `None` is unbounded.
    fn min_cost_bound(&self) -> Option<Self::Cost> {
        None
    }

    /// Whether a frontier whose cheapest state costs `frontier` can no longer
    /// improve on a goal bounded by `upper`.
    fn bound_is_tight(&self, upper: &Self::Cost, frontier: &Self::Cost) -> bool {
        upper <= frontier
    }
}

// =============================================================================
// STATISTICS
// =============================================================================

/// Counters accumulated by a search.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchStats {
    /// States popped from the frontier.
    pub states_visited: u64,
    /// Children generated.
    pub next_states: u64,
    /// Children that survived pruning.
    pub enqueues: u64,
    /// Pops that did not go deeper than the previous pop.
    pub backjumps: u64,
}

// =============================================================================
// PRIORITY QUEUE
// =============================================================================

struct QueueEntry<C, T> {
    cost: C,
    depth: usize,
    tiebreak: f64,
    seq: u64,
    state: T,
}

impl<C: Ord, T> Ord for QueueEntry<C, T> {
    // Reversed so that `BinaryHeap` pops the smallest key
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .cost
            .cmp(&self.cost)
            .then_with(|| self.depth.cmp(&other.depth))
            .then_with(|| other.tiebreak.total_cmp(&self.tiebreak))
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

impl<C: Ord, T> PartialOrd for QueueEntry<C, T> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<C: Ord, T> PartialEq for QueueEntry<C, T> {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl<C: Ord, T> Eq for QueueEntry<C, T> {}

/// Frontier of a best-first search.
pub struct BestFirstPriorityQueue<C, T> {
    rng: StdRng,
    heap: BinaryHeap<QueueEntry<C, T>>,
    seq: u64,
}

impl<C: Ord, T> BestFirstPriorityQueue<C, T> {
    /// Create an empty queue; `None` seeds the tiebreak from the OS.
    #[must_use]
    pub fn new(seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        Self {
            rng,
            heap: BinaryHeap::new(),
            seq: 0,
        }
    }

    pub fn put(&mut self, state: T, depth: usize, cost: C) {
        self.seq += 1;
        let tiebreak = self.rng.random::<f64>();
        self.heap.push(QueueEntry {
            cost,
            depth,
            tiebreak,
            seq: self.seq,
            state,
        });
    }

    /// Pop the best entry as `(state, depth, cost)`.
    pub fn get(&mut self) -> Option<(T, usize, C)> {
        self.heap
            .pop()
            .map(|entry| (entry.state, entry.depth, entry.cost))
    }

    /// Cost of the best entry.
    #[must_use]
    pub fn peek_cost(&self) -> Option<&C> {
        self.heap.peek().map(|entry| &entry.cost)
    }

    /// Remove all entries. The tiebreak stream continues.
    pub fn clear(&mut self) {
        self.heap.clear();
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.heap.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }
}

// =============================================================================
// BEST-FIRST SEARCH
// =============================================================================

/// Best-first search over a [`SearchSpace`].
///
/// Each call to [`BestFirstSearch::optimization_pass`] resumes from the
/// current frontier and returns the next goal found, if any.
pub struct BestFirstSearch<S: SearchSpace> {
    max_backjumps: Option<u64>,
    stop_at_first_min: bool,
    queue: BestFirstPriorityQueue<S::Cost, S::State>,
    upper_bound: Option<S::Cost>,
    min_cost_bound: Option<S::Cost>,
    min_reached: bool,
    prev_depth: Option<usize>,
    stats: SearchStats,
    penultimate_stats: SearchStats,
}

impl<S: SearchSpace> BestFirstSearch<S> {
    /// Create an idle search. Call [`Self::initialize`] before the first pass.
    #[must_use]
    pub fn new(max_backjumps: Option<u64>, seed: Option<u64>, stop_at_first_min: bool) -> Self {
        Self {
            max_backjumps,
            stop_at_first_min,
            queue: BestFirstPriorityQueue::new(seed),
            upper_bound: None,
            min_cost_bound: None,
            min_reached: false,
            prev_depth: None,
            stats: SearchStats::default(),
            penultimate_stats: SearchStats::default(),
        }
    }

    /// Reset the search and seed the frontier with `states` at depth zero.
    pub fn initialize(&mut self, space: &S, states: Vec<S::State>) {
        self.queue.clear();
        self.upper_bound = None;
        self.min_cost_bound = None;
        self.min_reached = false;
        self.prev_depth = None;
        self.stats = SearchStats::default();
        self.penultimate_stats = SearchStats::default();
        self.put(space, states, 0);
    }

    /// Run until the next goal is found or the search stops.
    pub fn optimization_pass(
        &mut self,
        space: &S,
    ) -> Result<Option<(S::State, S::Cost)>, CutFinderError> {
        self.min_cost_bound = space.min_cost_bound();

        while !self.queue.is_empty()
            && !(self.stop_at_first_min && self.min_reached)
            && self.within_backjump_limit()
        {
            let Some((state, depth, cost)) = self.queue.get() else {
                break;
            };

            if self
                .min_cost_bound
                .as_ref()
                .is_some_and(|bound| cost > *bound)
            {
                trace!(?cost, "cheapest state exceeds the min-cost bound");
                // Keep it on the frontier so later passes see the same bound
                self.queue.put(state, depth, cost);
                return Ok(None);
            }

            self.update_minimum_reached(space, &cost);

            self.stats.states_visited += 1;
            if self.prev_depth.is_some_and(|prev| depth <= prev) {
                self.stats.backjumps += 1;
                trace!(depth, backjumps = self.stats.backjumps, "backjump");
            }
            self.prev_depth = Some(depth);

            if space.is_goal(&state) {
                self.penultimate_stats = self.stats;
                self.update_upper_bound_goal_state(space, &state);
                self.update_minimum_reached(space, &cost);
                return Ok(Some((state, cost)));
            }

            let children = space.next_states(&state)?;
            self.put(space, children, depth + 1);
        }

        if self.queue.is_empty() {
            self.min_reached = true;
        } else if let (Some(upper), Some(best)) = (&self.upper_bound, self.queue.peek_cost()) {
            // Stopped on a bound: optimal only if nothing cheaper is left
            if space.bound_is_tight(upper, best) {
                self.min_reached = true;
            }
        }
        Ok(None)
    }

    /// Whether the best goal found so far is proven minimal.
    #[must_use]
    pub fn minimum_reached(&self) -> bool {
        self.min_reached
    }

    /// Counters of the search; `penultimate` gives them as of the last goal.
    #[must_use]
    pub fn stats(&self, penultimate: bool) -> SearchStats {
        if penultimate {
            self.penultimate_stats
        } else {
            self.stats
        }
    }

    #[must_use]
    pub fn upper_bound_cost(&self) -> Option<&S::Cost> {
        self.upper_bound.as_ref()
    }

    /// Tighten the upper bound; looser bounds are ignored.
    pub fn update_upper_bound_cost(&mut self, bound: S::Cost) {
        if self.upper_bound.as_ref().is_none_or(|current| bound < *current) {
            self.upper_bound = Some(bound);
        }
    }

    /// Tighten the upper bound with the bound implied by a goal state.
    pub fn update_upper_bound_goal_state(&mut self, space: &S, goal: &S::State) {
        self.update_upper_bound_cost(space.upper_bound_cost(goal));
    }

    fn within_backjump_limit(&self) -> bool {
        self.max_backjumps
            .is_none_or(|limit| self.stats.backjumps < limit)
    }

    fn update_minimum_reached(&mut self, space: &S, cost: &S::Cost) {
        if self
            .upper_bound
            .as_ref()
            .is_some_and(|upper| space.bound_is_tight(upper, cost))
        {
            self.min_reached = true;
        }
    }

    fn put(&mut self, space: &S, states: Vec<S::State>, depth: usize) {
        self.stats.next_states += states.len() as u64;
        for state in states {
            let cost = space.cost(&state);
            if self.upper_bound.as_ref().is_none_or(|upper| cost <= *upper) {
                self.stats.enqueues += 1;
                self.queue.put(state, depth, cost);
            }
        }
    }
}

// =============================================================================
// GREEDY SEARCH
// =============================================================================

/// Descend from `start`, always taking the cheapest child (first on ties).
///
/// Returns `None` if a non-goal state has no children.
pub fn greedy_best_first_search<S: SearchSpace>(
    space: &S,
    start: S::State,
) -> Result<Option<S::State>, CutFinderError> {
    let mut state = start;
    loop {
        if space.is_goal(&state) {
            return Ok(Some(state));
        }
        let children = space.next_states(&state)?;
        match children.into_iter().min_by_key(|child| space.cost(child)) {
            Some(child) => state = child,
            None => return Ok(None),
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================
