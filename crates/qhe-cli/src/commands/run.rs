//! Run command implementation.
//!
//! compile → build → simulate → decrypt, on the local simulator.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use serde::Serialize;
use tracing::info;

use qhe_adapter_sim::SimulatorBackend;
use qhe_compile::{AncillaPlacement, CompileOptions, CompileStats, compile};
use qhe_hal::{Counts, run_circuit};
use qhe_ir::{Circuit, QubitId};
use qhe_protocol::{
    AncillaPolicy, HomomorphicBuilder, ProtocolLayout, counts_to_probability_distribution,
    decrypt_counts,
};

use super::common::{load_circuit, oracle_capability, print_counts};

/// Arguments of the run command.
#[derive(Debug, Clone)]
pub struct RunArgs {
    pub init: Option<PathBuf>,
    pub main: PathBuf,
    pub measure: Vec<u32>,
    pub shots: u32,
    pub policy: AncillaPolicy,
    pub seed: Option<u64>,
    pub json: bool,
    pub gridsynth: Option<PathBuf>,
}

/// Machine-readable result of a run.
#[derive(Debug, Serialize)]
pub struct RunReport {
    pub policy: AncillaPolicy,
    pub shots: u32,
    pub num_qubits: usize,
    pub compile: CompileStats,
    pub layout: ProtocolLayout,
    pub counts: Counts,
    pub distribution: Vec<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub execution_time_ms: Option<u64>,
}

/// Parse a `--policy` value.
pub fn parse_policy(s: &str) -> Result<AncillaPolicy, String> {
    AncillaPolicy::parse(s).ok_or_else(|| format!("unknown policy '{s}' (expected shared or fresh)"))
}

/// Execute the run command.
pub async fn execute(args: &RunArgs) -> Result<()> {
    if !args.json {
        println!(
            "{} Running {} under the {} policy ({} shots)",
            style("→").cyan().bold(),
            style(args.main.display()).green(),
            style(args.policy).yellow(),
            args.shots
        );
    }

    let report = protocol_run(args).await?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    println!(
        "  Encrypted circuit: {} qubits, {} T gate(s)",
        report.num_qubits, report.layout.t_count
    );
    println!(
        "\n{} Decrypted results ({} shots):",
        style("✓").green().bold(),
        report.shots
    );
    print_counts(&report.counts);

    println!("\n  Distribution:");
    let width = report.layout.measured_positions.len();
    for (index, p) in report.distribution.iter().enumerate() {
        println!("    {index:0width$b}: {p:.4}");
    }

    Ok(())
}

/// Compile, encrypt, simulate and decrypt.
pub async fn protocol_run(args: &RunArgs) -> Result<RunReport> {
    if args.measure.is_empty() {
        anyhow::bail!("--measure needs at least one qubit");
    }

    let main = load_circuit(&args.main)?;
    let init = match &args.init {
        Some(path) => load_circuit(path)?,
        None => main.empty_like(),
    };

    // Bottom placement keeps the server's qubit indices stable.
    let options = CompileOptions::new()
        .with_ancilla_placement(AncillaPlacement::Bottom)
        .with_oracle(oracle_capability(args.gridsynth.as_deref()));
    let compiled = compile(&main, &options)?;
    if compiled.stats.rotations > 0 {
        let reasons: Vec<String> = compiled.diagnostics.iter().map(ToString::to_string).collect();
        anyhow::bail!(
            "{} rotation(s) could not be synthesized: {}",
            compiled.stats.rotations,
            reasons.join("; ")
        );
    }

    let measured = measured_qubits(&compiled.circuit, &args.measure)?;
    let built = HomomorphicBuilder::new(args.policy)
        .build(&init, &compiled.circuit, Some(&measured))
        .context("Failed to build the encrypted circuit")?;
    info!(
        "encrypted circuit: {} qubits, {} ops",
        built.circuit.num_qubits(),
        built.circuit.num_ops()
    );

    let mut backend = SimulatorBackend::new();
    if let Some(seed) = args.seed {
        backend = backend.with_seed(seed);
    }

    let spinner = if args.json {
        ProgressBar::hidden()
    } else {
        ProgressBar::new_spinner()
    };
    spinner.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.cyan} {msg}")
            .context("Invalid spinner template")?,
    );
    spinner.set_message("Simulating...");
    spinner.enable_steady_tick(Duration::from_millis(100));
    let started = std::time::Instant::now();
    let raw = run_circuit(&backend, &built.circuit, args.shots, true).await;
    spinner.finish_and_clear();
    let raw = raw?;

    let counts = decrypt_counts(&raw, &built.layout)?;
    let distribution = counts_to_probability_distribution(&counts)?;

    Ok(RunReport {
        policy: args.policy,
        shots: args.shots,
        num_qubits: built.circuit.num_qubits(),
        compile: compiled.stats,
        layout: built.layout,
        counts,
        distribution,
        execution_time_ms: u64::try_from(started.elapsed().as_millis()).ok(),
    })
}

fn measured_qubits(circuit: &Circuit, indices: &[u32]) -> Result<Vec<QubitId>> {
    indices
        .iter()
        .map(|&i| {
            if (i as usize) < circuit.num_qubits() {
                Ok(QubitId(i))
            } else {
                anyhow::bail!(
                    "Cannot measure qubit {i}: the circuit has {} qubits",
                    circuit.num_qubits()
                )
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::commands::common::save_circuit;

    #[test]
    fn test_parse_policy() {
        assert_eq!(parse_policy("fresh"), Ok(AncillaPolicy::Fresh));
        assert_eq!(parse_policy("Shared"), Ok(AncillaPolicy::Shared));
        assert!(parse_policy("pooled").is_err());
    }

    #[test]
    fn test_measured_qubits_bounds() {
        let circuit = Circuit::with_size("c", 2, 0);
        assert_eq!(
            measured_qubits(&circuit, &[1, 0]).unwrap(),
            vec![QubitId(1), QubitId(0)]
        );
        assert!(measured_qubits(&circuit, &[2]).is_err());
    }

    fn write(dir: &std::path::Path, name: &str, circuit: &Circuit) -> PathBuf {
        let path = dir.join(name);
        save_circuit(circuit, &path).unwrap();
        path
    }

    #[tokio::test]
    async fn test_protocol_run_toffoli() {
        let dir = tempfile::tempdir().unwrap();
        let q: Vec<_> = (0..3).map(QubitId).collect();

        let mut init = Circuit::with_size("init", 3, 0);
        init.x(q[0]).unwrap().x(q[1]).unwrap();
        let mut main = Circuit::with_size("toffoli", 3, 0);
        main.ccx(q[0], q[1], q[2]).unwrap();

        let args = RunArgs {
            init: Some(write(dir.path(), "init.json", &init)),
            main: write(dir.path(), "main.json", &main),
            measure: vec![0, 1, 2],
            shots: 32,
            policy: AncillaPolicy::Shared,
            seed: Some(5),
            json: true,
            gridsynth: Some(PathBuf::from("/nonexistent/gridsynth")),
        };

        let report = protocol_run(&args).await.unwrap();
        assert_eq!(report.counts.get("111"), 32);
        assert_eq!(report.distribution[7], 1.0);
        assert_eq!(report.layout.t_count, 7);
        assert_eq!(report.compile.t_count, 7);
    }

    #[tokio::test]
    async fn test_protocol_run_rejects_unsynthesized_rotation() {
        let dir = tempfile::tempdir().unwrap();
        let mut main = Circuit::with_size("rot", 1, 0);
        main.rz(0.3, QubitId(0)).unwrap();

        let args = RunArgs {
            init: None,
            main: write(dir.path(), "main.json", &main),
            measure: vec![0],
            shots: 8,
            policy: AncillaPolicy::Fresh,
            seed: Some(1),
            json: true,
            gridsynth: Some(PathBuf::from("/nonexistent/gridsynth")),
        };

        let err = protocol_run(&args).await.unwrap_err();
        assert!(err.to_string().contains("could not be synthesized"));
    }
}
