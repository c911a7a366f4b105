//! # Configuration Module
//!
//! TOML configuration for the cutfinder binary.
//!
//! ## File Layout
//!
//! ```toml
//! [optimization]
//! max_gamma = 1024.0
//! max_backjumps = 10000   # or "none"
//! seed = 111
//! gate_lo = true
//! wire_lo = true
//!
//! [constraints]
//! qubits_per_subcircuit = 4
//!
//! [server]
//! host = "127.0.0.1"
//! port = 8080
//! ```
//!
//! Every section is optional. Command-line flags override the file.

use cutfinder_core::{Circuit, CutFinderError, DeviceConstraints, OptimizationSettings};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Config file picked up from the working directory when `--config` is absent.
pub const DEFAULT_CONFIG_FILE: &str = "cutfinder.toml";

/// Maximum size of a config or circuit file (16 MB).
pub const MAX_INPUT_FILE_SIZE: u64 = 16 * 1024 * 1024;

// =============================================================================
// CONFIG TYPES
// =============================================================================

/// HTTP server settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8080,
        }
    }
}

/// The whole configuration file.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AppConfig {
    pub optimization: OptimizationSettings,
    /// Device limits; absent means every request must supply them.
    pub constraints: Option<DeviceConstraints>,
    pub server: ServerConfig,
}

impl AppConfig {
    /// Parse and validate a configuration from TOML text.
    pub fn from_toml(text: &str) -> Result<Self, CutFinderError> {
        let config: Self = toml::from_str(text)
            .map_err(|e| CutFinderError::ConfigError(format!("Invalid config: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Check the sections that carry invariants.
    pub fn validate(&self) -> Result<(), CutFinderError> {
        self.optimization.validate()?;
        if let Some(constraints) = &self.constraints {
            constraints.validate()?;
        }
        Ok(())
    }

    /// Load the configuration.
    ///
    /// An explicit path must exist. Without one, `cutfinder.toml` in the
    /// working directory is used if present, otherwise the defaults.
    pub fn load(path: Option<&Path>) -> Result<Self, CutFinderError> {
        let path = match path {
            Some(path) => path.to_path_buf(),
            None => {
                let fallback = PathBuf::from(DEFAULT_CONFIG_FILE);
                if !fallback.is_file() {
                    return Ok(Self::default());
                }
                fallback
            }
        };

        let text = read_input_file(&path)?;
        let config = Self::from_toml(&text)?;
        tracing::debug!(path = %path.display(), "configuration loaded");
        Ok(config)
    }
}

// =============================================================================
// FILE INPUT
// =============================================================================

/// Read a config or circuit file after checking its path and size.
pub fn read_input_file(path: &Path) -> Result<String, CutFinderError> {
    let canonical = path.canonicalize().map_err(|e| {
        CutFinderError::IoError(format!("Invalid file path '{}': {}", path.display(), e))
    })?;
    if !canonical.is_file() {
        return Err(CutFinderError::IoError(format!(
            "Path '{}' is not a regular file",
            path.display()
        )));
    }

    let metadata = std::fs::metadata(&canonical)
        .map_err(|e| CutFinderError::IoError(format!("Cannot read file metadata: {}", e)))?;
    if metadata.len() > MAX_INPUT_FILE_SIZE {
        return Err(CutFinderError::IoError(format!(
            "File size {} bytes exceeds maximum allowed {} bytes",
            metadata.len(),
            MAX_INPUT_FILE_SIZE
        )));
    }

    std::fs::read_to_string(&canonical)
        .map_err(|e| CutFinderError::IoError(format!("Cannot read '{}': {}", path.display(), e)))
}

/// Load a circuit from a `.toml` or JSON file.
pub fn load_circuit(path: &Path) -> Result<Circuit, CutFinderError> {
    let text = read_input_file(path)?;
    let is_toml = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("toml"));

    if is_toml {
        toml::from_str(&text)
            .map_err(|e| CutFinderError::SerializationError(format!("Invalid circuit: {}", e)))
    } else {
        serde_json::from_str(&text)
            .map_err(|e| CutFinderError::SerializationError(format!("Invalid circuit: {}", e)))
    }
}

// =============================================================================
// TESTS
// =============================================================================
