//! # cutfinder
//!
//! The main binary for the cutfinder circuit-cutting engine.
//!
//! This application provides:
//! - CLI interface for cut searches
//! - HTTP REST API server (axum-based)
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────┐
//! │            apps/cutfinder (THE BINARY)       │
//! │                                              │
//! │   ┌─────────────┐        ┌─────────────┐     │
//! │   │    CLI      │        │  HTTP API   │     │
//! │   │   (clap)    │        │   (axum)    │     │
//! │   └──────┬──────┘        └──────┬──────┘     │
//! │          └───────────┬──────────┘            │
//! │                      ▼                       │
//! │             ┌────────────────┐               │
//! │             │ cutfinder-core │               │
//! │             │  (THE SEARCH)  │               │
//! │             └────────────────┘               │
//! └──────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```bash
//! # Find cuts for a circuit on a 4-qubit device
//! cutfinder find -f circuit.json -w 4
//!
//! # Exhaustive search, JSON output
//! cutfinder --json-mode find -f circuit.toml -w 4 --max-gamma inf --max-backjumps none
//!
//! # Start the HTTP server
//! cutfinder server --host 0.0.0.0 --port 8080
//! ```

use clap::Parser;
use cutfinder::cli;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

// =============================================================================
// APPLICATION ENTRY POINT
// =============================================================================

#[tokio::main]
async fn main() {
    // CUTFINDER_LOG_FORMAT=json switches to JSON lines.
    let log_format = std::env::var("CUTFINDER_LOG_FORMAT").unwrap_or_else(|_| "text".to_string());

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "cutfinder=info,tower_http=debug".into());

    match log_format.as_str() {
        "json" => {
            tracing_subscriber::registry()
                .with(filter)
                .with(
                    tracing_subscriber::fmt::layer()
                        .json()
                        .with_writer(std::io::stderr),
                )
                .init();
        }
        _ => {
            tracing_subscriber::registry()
                .with(filter)
                .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
                .init();
        }
    }

    let cli = cli::Cli::parse();

    // Logs go to stderr; stdout carries results only.
    if !cli.quiet && !cli.json_mode {
        print_banner();
    }

    if let Err(e) = cli::execute(cli).await {
        tracing::error!("Error: {}", e);
        std::process::exit(1);
    }
}

/// Print the cutfinder startup banner.
fn print_banner() {
    println!(
        r#"
   ┌─┐┬ ┬┌┬┐┌─┐┬┌┐┌┌┬┐┌─┐┬─┐
   │  │ │ │ ├┤ ││││ ││├┤ ├┬┘
   └─┘└─┘ ┴ └  ┴┘└┘─┴┘└─┘┴└─

  Circuit cut finder v{}
"#,
        env!("CARGO_PKG_VERSION")
    );
}
