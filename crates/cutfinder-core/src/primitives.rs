//! # Engine Primitives
//!
//! Hardcoded constants for the cut-finding engine.
//!
//! These values are compiled into the binary and are immutable at runtime.
//!
//! ## Primitives
//!
//! 1. **Search Defaults**: bounds applied when settings are not given.
//! 2. **Cut Costs**: gamma factors of LO wire cuts and virtual Bell pairs.
//! 3. **Validation Limits**: caps on ingested circuits.

// =============================================================================
// SEARCH DEFAULTS
// =============================================================================

/// Default upper limit on the gamma of any cut scheme considered.
pub const DEFAULT_MAX_GAMMA: f64 = 1024.0;

/// Default number of backjumps before best-first search gives up.
pub const DEFAULT_MAX_BACKJUMPS: u64 = 10_000;

/// Default seed for tie-breaking among equally ranked search states.
///
/// A fixed seed makes repeated runs on the same circuit return the same cuts.
pub const DEFAULT_SEED: u64 = 111;

// =============================================================================
// CUT COSTS
// =============================================================================

/// Upper-bound gamma of cutting one wire with local operations.
pub const LO_WIRE_CUT_GAMMA: f64 = 4.0;

/// Lower-bound gamma contributed by each distinct pair of subcircuits joined
/// by virtual Bell pairs.
pub const BELL_PAIR_GAMMA: f64 = 3.0;

// =============================================================================
// EXPORT
// =============================================================================

/// Labels assigned to subcircuits when exporting a cut circuit as a string.
pub const SUBCIRCUIT_ALPHABET: &str = "ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz";

// =============================================================================
// INPUT VALIDATION LIMITS
// =============================================================================

/// Maximum number of instructions in an ingested circuit.
///
/// Circuits longer than this will be rejected by the Ingestor.
pub const MAX_CIRCUIT_LENGTH: usize = 100_000;

/// Maximum number of distinct qubits in an ingested circuit.
pub const MAX_QUBITS: usize = 4096;

/// Maximum length for gate names.
pub const MAX_GATE_NAME_LENGTH: usize = 64;
