//! # cutfinder CLI Module
//!
//! This module implements the CLI interface for cutfinder.
//!
//! ## Available Commands
//!
//! - `find` - Search for a cut scheme for a circuit file
//! - `check` - Validate a circuit file and list its multi-qubit gates
//! - `gates` - Show the standard gate-cut gamma table
//! - `server` - Start the HTTP server

mod commands;

use crate::config::AppConfig;
use clap::{Args, CommandFactory, Parser, Subcommand};
use cutfinder_core::{CutFinderError, DeviceConstraints, OptimizationSettings};
use std::path::PathBuf;

pub use commands::*;

// =============================================================================
// CLI STRUCTURE
// =============================================================================

/// cutfinder - automated circuit cutting
///
/// Finds LO gate and wire cuts that split a quantum circuit into subcircuits
/// that fit a device, and reports whether the scheme was proven minimal.
#[derive(Parser, Debug)]
#[command(name = "cutfinder")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress banner output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Path to a TOML configuration file (default: ./cutfinder.toml if present)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Output in JSON format (for programmatic access)
    #[arg(long, global = true)]
    pub json_mode: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available CLI commands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Search for a cut scheme
    Find {
        /// Path to the circuit file (JSON, or TOML by extension)
        #[arg(short, long)]
        file: PathBuf,

        #[command(flatten)]
        search: SearchArgs,
    },

    /// Validate a circuit and list its multi-qubit gates
    Check {
        /// Path to the circuit file (JSON, or TOML by extension)
        #[arg(short, long)]
        file: PathBuf,
    },

    /// Show the standard gate-cut gamma table
    Gates,

    /// Start HTTP server
    Server {
        /// Host to bind to (overrides [server].host)
        #[arg(short = 'H', long)]
        host: Option<String>,

        /// Port to bind to (overrides [server].port)
        #[arg(short, long)]
        port: Option<u16>,
    },
}

/// Search flags that override the `[optimization]` and `[constraints]`
/// sections of the configuration.
#[derive(Args, Debug, Clone, Default)]
pub struct SearchArgs {
    /// Largest acceptable gamma ("inf" for no limit)
    #[arg(long)]
    pub max_gamma: Option<f64>,

    /// Backjumps before the search stops ("none" for no limit)
    #[arg(long, value_parser = parse_backjump_limit)]
    pub max_backjumps: Option<BackjumpLimit>,

    /// Seed for tie-breaking between equal-cost states
    #[arg(long)]
    pub seed: Option<u64>,

    /// Maximum number of qubits in any subcircuit
    #[arg(short = 'w', long)]
    pub qubits_per_subcircuit: Option<usize>,

    /// Do not consider gate cuts
    #[arg(long)]
    pub no_gate_cuts: bool,

    /// Do not consider wire cuts
    #[arg(long)]
    pub no_wire_cuts: bool,
}

/// A parsed `--max-backjumps` value; `None` means unbounded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BackjumpLimit(pub Option<u64>);

/// Parse `--max-backjumps`: an integer, or "none" for no limit.
pub fn parse_backjump_limit(s: &str) -> Result<BackjumpLimit, String> {
    if s.eq_ignore_ascii_case("none") || s.eq_ignore_ascii_case("unbounded") {
        return Ok(BackjumpLimit(None));
    }
    s.parse::<u64>()
        .map(|n| BackjumpLimit(Some(n)))
        .map_err(|e| format!("expected an integer or \"none\": {}", e))
}

impl SearchArgs {
    /// Merge these flags over the configuration.
    ///
    /// # Errors
    /// - `InvalidSettings` if the merged values are out of range
    /// - `ConfigError` if no subcircuit width is given anywhere
    pub fn resolve(
        &self,
        config: &AppConfig,
    ) -> Result<(OptimizationSettings, DeviceConstraints), CutFinderError> {
        let mut settings = config.optimization;
        if let Some(max_gamma) = self.max_gamma {
            settings.max_gamma = max_gamma;
        }
        if let Some(BackjumpLimit(limit)) = self.max_backjumps {
            settings.max_backjumps = limit;
        }
        if let Some(seed) = self.seed {
            settings.seed = Some(seed);
        }
        if self.no_gate_cuts {
            settings.gate_lo = false;
        }
        if self.no_wire_cuts {
            settings.wire_lo = false;
        }
        settings.validate()?;

        let constraints = match (self.qubits_per_subcircuit, config.constraints) {
            (Some(width), _) => DeviceConstraints::new(width)?,
            (None, Some(constraints)) => constraints,
            (None, None) => {
                return Err(CutFinderError::ConfigError(
                    "qubits_per_subcircuit is required (flag -w or [constraints] in config)"
                        .to_string(),
                ));
            }
        };

        Ok((settings, constraints))
    }
}

// =============================================================================
// COMMAND EXECUTION
// =============================================================================

/// Execute the CLI with parsed arguments.
pub async fn execute(cli: Cli) -> Result<(), CutFinderError> {
    let config = AppConfig::load(cli.config.as_deref())?;
    let json_mode = cli.json_mode;

    match cli.command {
        Some(Commands::Find { file, search }) => {
            let (settings, constraints) = search.resolve(&config)?;
            cmd_find(&file, &settings, &constraints, json_mode, cli.verbose)
        }
        Some(Commands::Check { file }) => cmd_check(&file, json_mode),
        Some(Commands::Gates) => cmd_gates(json_mode),
        Some(Commands::Server { host, port }) => {
            let host = host.unwrap_or_else(|| config.server.host.clone());
            let port = port.unwrap_or(config.server.port);
            cmd_server(&config, &host, port).await
        }
        None => Cli::command()
            .print_help()
            .map_err(|e| CutFinderError::IoError(format!("Cannot print help: {}", e))),
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn find_flags_parse() {
        let cli = Cli::try_parse_from([
            "cutfinder",
            "--json-mode",
            "find",
            "-f",
            "circuit.json",
            "--max-gamma",
            "inf",
            "--max-backjumps",
            "none",
            "-w",
            "3",
            "--no-wire-cuts",
        ])
        .expect("parse");

        assert!(cli.json_mode);
        let Some(Commands::Find { file, search }) = cli.command else {
            unreachable!("find subcommand parsed");
        };
        assert_eq!(file, PathBuf::from("circuit.json"));
        assert_eq!(search.max_gamma, Some(f64::INFINITY));
        assert_eq!(search.max_backjumps, Some(BackjumpLimit(None)));
        assert_eq!(search.qubits_per_subcircuit, Some(3));
        assert!(search.no_wire_cuts);
        assert!(!search.no_gate_cuts);
    }

    #[test]
    fn bad_backjump_limit_is_rejected() {
        assert_eq!(parse_backjump_limit("25"), Ok(BackjumpLimit(Some(25))));
        assert_eq!(parse_backjump_limit("None"), Ok(BackjumpLimit(None)));
        assert!(parse_backjump_limit("-1").is_err());
        assert!(parse_backjump_limit("lots").is_err());
    }

    #[test]
    fn flags_override_config() {
        let config = AppConfig::from_toml(
            "[optimization]\nmax_gamma = 50.0\nseed = 3\n[constraints]\nqubits_per_subcircuit = 4\n",
        )
        .expect("config");
        let args = SearchArgs {
            seed: Some(9),
            qubits_per_subcircuit: Some(2),
            no_gate_cuts: true,
            ..SearchArgs::default()
        };

        let (settings, constraints) = args.resolve(&config).expect("resolve");
        assert_eq!(settings.max_gamma, 50.0);
        assert_eq!(settings.seed, Some(9));
        assert!(!settings.gate_lo);
        assert!(settings.wire_lo);
        assert_eq!(constraints.qubits_per_subcircuit, 2);
    }

    #[test]
    fn width_falls_back_to_config_then_errors() {
        let config = AppConfig::from_toml("[constraints]\nqubits_per_subcircuit = 4\n")
            .expect("config");
        let (_, constraints) = SearchArgs::default().resolve(&config).expect("resolve");
        assert_eq!(constraints.qubits_per_subcircuit, 4);

        let result = SearchArgs::default().resolve(&AppConfig::default());
        assert!(matches!(result, Err(CutFinderError::ConfigError(_))));
    }

    #[test]
    fn out_of_range_flags_are_rejected() {
        let args = SearchArgs {
            max_gamma: Some(0.5),
            qubits_per_subcircuit: Some(2),
            ..SearchArgs::default()
        };
        assert!(matches!(
            args.resolve(&AppConfig::default()),
            Err(CutFinderError::InvalidSettings(_))
        ));

        let args = SearchArgs {
            qubits_per_subcircuit: Some(0),
            ..SearchArgs::default()
        };
        assert!(matches!(
            args.resolve(&AppConfig::default()),
            Err(CutFinderError::InvalidSettings(_))
        ));
    }
}
