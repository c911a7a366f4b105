//! # cutfinder-core
//!
//! The deterministic cut-finding engine for cutfinder.
//!
//! This crate searches for LO gate cuts and wire cuts that split a quantum
//! circuit into subcircuits no wider than a device limit, while keeping the
//! sampling overhead low. It reports whether the returned scheme was proven
//! minimal.
//!
//! ## Layers
//!
//! - `circuit`, `gates`, `ingestor` → input model, gamma table, validation
//! - `interface` → the circuit boundary the optimizer reads and writes
//! - `state`, `actions` → search states and the moves between them
//! - `search` → generic best-first search
//! - `optimization`, `optimizer` → the cut problem and its driver
//! - `find_cuts` → one-call entry point with result metadata
//!
//! ## Architectural Constraints
//!
//! - Pure Rust: no async, no network, no file I/O
//! - Deterministic for a fixed seed: `BTreeMap` only, seeded tie-breaking
//! - Bounded: every search is limited by `max_backjumps` and `max_gamma`

// =============================================================================
// MODULES
// =============================================================================

pub mod actions;
pub mod circuit;
pub mod find_cuts;
pub mod gates;
pub mod ingestor;
pub mod interface;
pub mod optimization;
pub mod optimizer;
pub mod primitives;
pub mod search;
pub mod settings;
pub mod state;
pub mod types;

// =============================================================================
// RE-EXPORTS: Core Types (from types module)
// =============================================================================

pub use types::{CutChoice, CutFinderError, CutType, Gamma, WireName};

// =============================================================================
// RE-EXPORTS: Circuit Model
// =============================================================================

pub use circuit::{BARRIER, Circuit, CircuitElement, CircuitEntry, FullBarrier, Instruction};
pub use gates::{GammaRule, STANDARD_GATES, gamma_rule, standard_gamma};
pub use ingestor::Ingestor;
pub use interface::{CircuitInterface, MultiQubitGate, NameToIdMap, SimpleGateList};

// =============================================================================
// RE-EXPORTS: Search Engine
// =============================================================================

pub use actions::{ActionGroup, ActionKind, ActionSet};
pub use optimization::{
    CutCost, CutOptimization, CutSearchSpace, WidthBound, max_wire_cuts_circuit,
    max_wire_cuts_gamma,
};
pub use optimizer::LoCutsOptimizer;
pub use search::{
    BestFirstPriorityQueue, BestFirstSearch, SearchSpace, SearchStats, greedy_best_first_search,
};
pub use settings::{DeviceConstraints, OptimizationSettings, SettingsError};
pub use state::{AppliedAction, CutArgs, DisjointSubcircuitsState, WireCut};

// =============================================================================
// RE-EXPORTS: Entry Point
// =============================================================================

pub use find_cuts::{
    CutCircuit, CutDescriptor, CutInstruction, CutKind, CutMetadata, CutResult, OutputWire,
    cut_descriptors, find_cuts,
};
