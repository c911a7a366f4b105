//! # Optimization Settings
//!
//! Search bounds and device constraints for the cut optimizer.
//!
//! `max_gamma` and `max_backjumps` trade exhaustiveness for runtime. Either may
//! be unbounded: an infinite `max_gamma` disables the gamma cutoff, and
//! `max_backjumps = None` lets best-first search run to completion.

use crate::actions::ActionGroup;
use crate::primitives::{DEFAULT_MAX_BACKJUMPS, DEFAULT_MAX_GAMMA, DEFAULT_SEED};
use serde::de::Deserializer;
use serde::{Deserialize, Serialize, Serializer};
use thiserror::Error;

/// Errors that can occur when validating settings or constraints.
#[derive(Debug, Error, Clone, Copy, PartialEq)]
pub enum SettingsError {
    #[error("max_gamma must be at least 1, got {0}")]
    MaxGamma(f64),

    #[error("qubits_per_subcircuit must be at least 1")]
    QubitsPerSubcircuit,
}

// =============================================================================
// OPTIMIZATION SETTINGS
// =============================================================================

/// Settings that steer the cut search.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OptimizationSettings {
    /// Largest gamma a cut scheme may have; infinite means unbounded.
    #[serde(
        serialize_with = "serialize_gamma_limit",
        deserialize_with = "deserialize_gamma_limit"
    )]
    pub max_gamma: f64,
    /// Backjumps allowed before the search stops; `None` means unbounded.
    #[serde(deserialize_with = "deserialize_backjump_limit")]
    pub max_backjumps: Option<u64>,
    /// Seed for tie-breaking; `None` draws one from the OS.
    pub seed: Option<u64>,
    /// Consider LO gate cuts.
    pub gate_lo: bool,
    /// Consider LO wire cuts.
    pub wire_lo: bool,
}

impl Default for OptimizationSettings {
    fn default() -> Self {
        Self {
            max_gamma: DEFAULT_MAX_GAMMA,
            max_backjumps: Some(DEFAULT_MAX_BACKJUMPS),
            seed: Some(DEFAULT_SEED),
            gate_lo: true,
            wire_lo: true,
        }
    }
}

impl OptimizationSettings {
    /// Create validated settings with the given bounds and default cut types.
    pub fn new(
        max_gamma: f64,
        max_backjumps: Option<u64>,
        seed: Option<u64>,
    ) -> Result<Self, SettingsError> {
        let settings = Self {
            max_gamma,
            max_backjumps,
            seed,
            ..Self::default()
        };
        settings.validate()?;
        Ok(settings)
    }

    /// Settings with no gamma or backjump limit, for exhaustive search.
    #[must_use]
    pub fn exhaustive() -> Self {
        Self {
            max_gamma: f64::INFINITY,
            max_backjumps: None,
            ..Self::default()
        }
    }

    /// Check the invariants of the settings.
    pub fn validate(&self) -> Result<(), SettingsError> {
        if self.max_gamma.is_nan() || self.max_gamma < 1.0 {
            return Err(SettingsError::MaxGamma(self.max_gamma));
        }
        Ok(())
    }

    /// Enable or disable LO gate cuts.
    #[must_use]
    pub fn with_gate_cuts(mut self, enabled: bool) -> Self {
        self.gate_lo = enabled;
        self
    }

    /// Enable or disable LO wire cuts.
    #[must_use]
    pub fn with_wire_cuts(mut self, enabled: bool) -> Self {
        self.wire_lo = enabled;
        self
    }

    /// Action groups the search may draw from.
    #[must_use]
    pub fn cut_search_groups(&self) -> Vec<ActionGroup> {
        let mut groups = vec![ActionGroup::NoCut];
        if self.gate_lo {
            groups.push(ActionGroup::GateCut);
        }
        if self.wire_lo {
            groups.push(ActionGroup::WireCut);
        }
        groups
    }
}

// =============================================================================
// DEVICE CONSTRAINTS
// =============================================================================

/// Hardware limits the cut circuit must respect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceConstraints {
    /// Maximum number of wires in any subcircuit.
    pub qubits_per_subcircuit: usize,
}

impl DeviceConstraints {
    /// Create validated constraints.
    pub fn new(qubits_per_subcircuit: usize) -> Result<Self, SettingsError> {
        let constraints = Self {
            qubits_per_subcircuit,
        };
        constraints.validate()?;
        Ok(constraints)
    }

    /// Check the invariants of the constraints.
    pub fn validate(&self) -> Result<(), SettingsError> {
        if self.qubits_per_subcircuit < 1 {
            return Err(SettingsError::QubitsPerSubcircuit);
        }
        Ok(())
    }

    /// Width limit applied to subcircuits during the search.
    #[must_use]
    pub fn qpu_width(&self) -> usize {
        self.qubits_per_subcircuit
    }
}

// =============================================================================
// SERDE HELPERS
// =============================================================================

/// A limit as written in JSON or TOML: a number, or a keyword for "no limit".
#[derive(Deserialize)]
#[serde(untagged)]
enum RawLimit<T> {
    Value(T),
    Keyword(String),
}

fn is_unbounded_keyword(keyword: &str) -> bool {
    matches!(
        keyword.to_ascii_lowercase().as_str(),
        "inf" | "infinity" | "unbounded" | "none"
    )
}

fn serialize_gamma_limit<S: Serializer>(value: &f64, serializer: S) -> Result<S::Ok, S::Error> {
    if value.is_finite() {
        serializer.serialize_f64(*value)
    } else {
        serializer.serialize_none()
    }
}

fn deserialize_gamma_limit<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
    match Option::<RawLimit<f64>>::deserialize(deserializer)? {
        None => Ok(f64::INFINITY),
        Some(RawLimit::Value(v)) => Ok(v),
        Some(RawLimit::Keyword(k)) if is_unbounded_keyword(&k) => Ok(f64::INFINITY),
        Some(RawLimit::Keyword(k)) => Err(serde::de::Error::custom(format!(
            "invalid max_gamma '{}': expected a number or \"inf\"",
            k
        ))),
    }
}

fn deserialize_backjump_limit<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Option<u64>, D::Error> {
    match Option::<RawLimit<u64>>::deserialize(deserializer)? {
        None => Ok(None),
        Some(RawLimit::Value(v)) => Ok(Some(v)),
        Some(RawLimit::Keyword(k)) if is_unbounded_keyword(&k) => Ok(None),
        Some(RawLimit::Keyword(k)) => Err(serde::de::Error::custom(format!(
            "invalid max_backjumps '{}': expected an integer or \"none\"",
            k
        ))),
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_documented_values() {
        let settings = OptimizationSettings::default();
        assert_eq!(settings.max_gamma, 1024.0);
        assert_eq!(settings.max_backjumps, Some(10_000));
        assert_eq!(settings.seed, Some(111));
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn max_gamma_below_one_rejected() {
        assert_eq!(
            OptimizationSettings::new(0.5, None, None),
            Err(SettingsError::MaxGamma(0.5))
        );
        assert!(OptimizationSettings::new(f64::NAN, None, None).is_err());
        assert!(OptimizationSettings::new(f64::INFINITY, None, None).is_ok());
    }

    #[test]
    fn zero_width_rejected() {
        assert_eq!(
            DeviceConstraints::new(0),
            Err(SettingsError::QubitsPerSubcircuit)
        );
        assert_eq!(DeviceConstraints::new(4).map(|c| c.qpu_width()), Ok(4));
    }

    #[test]
    fn search_groups_follow_cut_types() {
        let settings = OptimizationSettings::default().with_wire_cuts(false);
        assert_eq!(
            settings.cut_search_groups(),
            vec![ActionGroup::NoCut, ActionGroup::GateCut]
        );
    }

    #[test]
    fn unbounded_limits_round_trip_through_null() {
        let json = serde_json::to_string(&OptimizationSettings::exhaustive()).expect("ser");
        assert!(json.contains("\"max_gamma\":null"));
        assert!(json.contains("\"max_backjumps\":null"));
        let back: OptimizationSettings = serde_json::from_str(&json).expect("de");
        assert_eq!(back.max_gamma, f64::INFINITY);
        assert_eq!(back.max_backjumps, None);
    }

    #[test]
    fn keywords_and_missing_fields() {
        let settings: OptimizationSettings =
            serde_json::from_str(r#"{"max_gamma": "inf", "max_backjumps": "none"}"#).expect("de");
        assert_eq!(settings.max_gamma, f64::INFINITY);
        assert_eq!(settings.max_backjumps, None);
        assert_eq!(settings.seed, Some(111));

        let settings: OptimizationSettings = serde_json::from_str("{}").expect("de");
        assert_eq!(settings, OptimizationSettings::default());

        assert!(serde_json::from_str::<OptimizationSettings>(r#"{"max_gamma": "lots"}"#).is_err());
    }
}
