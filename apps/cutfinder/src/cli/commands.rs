//! # CLI Command Implementations
//!
//! This module contains the actual implementations of CLI commands.

use crate::api::{self, AppState, GateInfo};
use crate::config::{AppConfig, load_circuit};
use cutfinder_core::{
    CircuitInterface, CutFinderError, CutKind, CutResult, DeviceConstraints, Ingestor,
    OptimizationSettings, WireName, find_cuts,
};
use std::path::Path;

/// Print a value as pretty JSON.
fn print_json<T: serde::Serialize>(value: &T) -> Result<(), CutFinderError> {
    let text = serde_json::to_string_pretty(value)
        .map_err(|e| CutFinderError::SerializationError(e.to_string()))?;
    println!("{}", text);
    Ok(())
}

fn join_names(names: &[WireName]) -> String {
    names
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

// =============================================================================
// FIND COMMAND
// =============================================================================

/// Search for a cut scheme and print it.
pub fn cmd_find(
    file: &Path,
    settings: &OptimizationSettings,
    constraints: &DeviceConstraints,
    json_mode: bool,
    verbose: bool,
) -> Result<(), CutFinderError> {
    let circuit = load_circuit(file)?;
    tracing::info!(
        file = %file.display(),
        instructions = circuit.len(),
        qubits_per_subcircuit = constraints.qubits_per_subcircuit,
        "searching for cuts"
    );

    let result = find_cuts(&circuit, settings, constraints)?;

    if json_mode {
        return print_json(&result);
    }

    print_result(&result, file, constraints, verbose);
    Ok(())
}

fn print_result(result: &CutResult, file: &Path, constraints: &DeviceConstraints, verbose: bool) {
    let metadata = &result.metadata;

    println!("cutfinder Cut Search");
    println!("====================");
    println!("Circuit:           {}", file.display());
    println!("Subcircuit width:  {}", constraints.qubits_per_subcircuit);
    println!();
    println!("Sampling overhead: {}", metadata.sampling_overhead);
    println!(
        "Minimum reached:   {}",
        if metadata.minimum_reached { "yes" } else { "no" }
    );
    println!("Cuts:              {}", metadata.cuts.len());

    for cut in &metadata.cuts {
        let gate = format!("{}({})", cut.gate_name, join_names(&cut.qubits));
        match (cut.kind, cut.input) {
            (CutKind::Wire, Some(input)) => println!(
                "  [{} wire] instruction {}: {} input {}",
                cut.cut_type, cut.instruction_id, gate, input
            ),
            _ => println!(
                "  [{} gate] instruction {}: {}",
                cut.cut_type, cut.instruction_id, gate
            ),
        }
    }

    println!();
    println!("Wires:             {}", result.circuit.num_wires);
    match &result.circuit.subcircuit_labels {
        Some(labels) => println!("Subcircuits:       {}", labels),
        None => println!("Subcircuits:       {}", result.circuit.subcircuits.len()),
    }

    if verbose {
        println!();
        println!("Search statistics:");
        println!("  States visited:  {}", metadata.stats.states_visited);
        println!("  Next states:     {}", metadata.stats.next_states);
        println!("  Enqueues:        {}", metadata.stats.enqueues);
        println!("  Backjumps:       {}", metadata.stats.backjumps);
        println!();
        for (index, wires) in result.circuit.subcircuits.iter().enumerate() {
            let names: Vec<WireName> = wires
                .iter()
                .filter_map(|w| result.circuit.wire_names.get(*w).cloned())
                .collect();
            println!("  Subcircuit {}: {}", index, join_names(&names));
        }
    }
}

// =============================================================================
// CHECK COMMAND
// =============================================================================

/// Validate a circuit and list its multi-qubit gates with resolved gammas.
pub fn cmd_check(file: &Path, json_mode: bool) -> Result<(), CutFinderError> {
    let circuit = load_circuit(file)?;
    let list = Ingestor::ingest(&circuit)?;
    let gates = list.multi_qubit_gates();

    let name_of = |q: &usize| {
        list.wire_name(*q)
            .cloned()
            .unwrap_or(WireName::Index(*q as u64))
    };

    if json_mode {
        let entries: Vec<serde_json::Value> = gates
            .iter()
            .map(|g| {
                serde_json::json!({
                    "instruction_id": g.instruction_id,
                    "name": g.gate.name,
                    "qubits": g.gate.qubits.iter().map(name_of).collect::<Vec<_>>(),
                    "gamma": g.gate.gamma,
                    "cuts": g.gate.cuts,
                })
            })
            .collect();
        return print_json(&serde_json::json!({
            "valid": true,
            "instructions": circuit.len(),
            "qubits": list.num_qubits(),
            "multi_qubit_gates": entries,
        }));
    }

    println!("Circuit OK: {}", file.display());
    println!("Instructions:      {}", circuit.len());
    println!("Qubits:            {}", list.num_qubits());
    println!("Multi-qubit gates: {}", gates.len());
    for g in &gates {
        let qubits: Vec<WireName> = g.gate.qubits.iter().map(name_of).collect();
        let gamma = g
            .gate
            .gamma
            .map_or_else(|| "no gate cut".to_string(), |v| format!("gamma {:.4}", v));
        println!(
            "  #{:<5} {}({}) {}",
            g.instruction_id,
            g.gate.name,
            join_names(&qubits),
            gamma
        );
    }

    Ok(())
}

// =============================================================================
// GATES COMMAND
// =============================================================================

/// Show the standard gate-cut gamma table.
pub fn cmd_gates(json_mode: bool) -> Result<(), CutFinderError> {
    let table = GateInfo::standard_table();

    if json_mode {
        return print_json(&table);
    }

    println!("Standard LO gate-cut gammas");
    println!("===========================");
    for gate in &table {
        match (&gate.gamma, &gate.formula) {
            (Some(gamma), _) => println!("  {:<6} {:.4}", gate.name, gamma),
            (None, Some(formula)) => println!("  {:<6} {}", gate.name, formula),
            (None, None) => println!("  {:<6} -", gate.name),
        }
    }

    Ok(())
}

// =============================================================================
// SERVER COMMAND
// =============================================================================

/// Start the HTTP server.
pub async fn cmd_server(config: &AppConfig, host: &str, port: u16) -> Result<(), CutFinderError> {
    println!("cutfinder Server Starting...");
    println!();
    println!("Configuration:");
    println!("  Host:          {}", host);
    println!("  Port:          {}", port);
    println!("  Max gamma:     {}", config.optimization.max_gamma);
    match config.optimization.max_backjumps {
        Some(limit) => println!("  Max backjumps: {}", limit),
        None => println!("  Max backjumps: none"),
    }
    match config.constraints {
        Some(c) => println!("  Width:         {}", c.qubits_per_subcircuit),
        None => println!("  Width:         per request"),
    }
    println!();
    println!("Endpoints:");
    println!("  POST /cuts   - Search for a cut scheme");
    println!("  GET  /gates  - Standard gamma table");
    println!("  GET  /health - Health check");
    println!();
    println!("Press Ctrl+C to stop");
    println!();

    let addr = format!("{}:{}", host, port);
    api::run_server(&addr, AppState::from_config(config)).await
}
