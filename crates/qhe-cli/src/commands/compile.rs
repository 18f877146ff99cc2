//! Compile command implementation.

use std::path::PathBuf;

use anyhow::Result;
use console::style;

use qhe_compile::{
    AncillaPlacement, CompileOptions, Compiled, ErrorBudget, SynthesisOptions, compile,
};

use super::common::{default_output_path, load_circuit, oracle_capability, save_circuit};

/// Arguments of the compile command.
#[derive(Debug, Clone)]
pub struct CompileArgs {
    pub input: PathBuf,
    pub output: Option<PathBuf>,
    pub error_circuit: Option<f64>,
    pub error_gate: Option<f64>,
    pub ancilla_top: bool,
    pub no_rotations: bool,
    pub seed: u64,
    pub gridsynth: Option<PathBuf>,
}

impl CompileArgs {
    /// Translate the flags into compiler options.
    pub fn options(&self) -> Result<CompileOptions> {
        let budget = ErrorBudget::from_options(self.error_circuit, self.error_gate)?;
        let placement = if self.ancilla_top {
            AncillaPlacement::Top
        } else {
            AncillaPlacement::Bottom
        };

        let mut options = CompileOptions::new()
            .with_error_budget(budget)
            .with_ancilla_placement(placement)
            .with_synthesize_rotations(!self.no_rotations)
            .with_synthesis(SynthesisOptions::default().with_seed(Some(self.seed)));
        if !self.no_rotations {
            options = options.with_oracle(oracle_capability(self.gridsynth.as_deref()));
        }
        Ok(options)
    }
}

/// Execute the compile command.
pub fn execute(args: &CompileArgs) -> Result<()> {
    println!(
        "{} Compiling {}",
        style("→").cyan().bold(),
        style(args.input.display()).green()
    );

    let circuit = load_circuit(&args.input)?;
    println!(
        "  Loaded: {} qubits, depth {}",
        circuit.num_qubits(),
        circuit.depth()
    );

    let compiled = compile(&circuit, &args.options()?)?;
    println!("{} Compilation complete", style("✓").green().bold());
    print_stats(&compiled);

    let output = args
        .output
        .clone()
        .unwrap_or_else(|| default_output_path(&args.input));
    save_circuit(&compiled.circuit, &output)?;
    println!("  Output: {}", style(output.display()).green());

    Ok(())
}

/// Print gate statistics and diagnostics of a compilation.
pub fn print_stats(compiled: &Compiled) {
    let stats = &compiled.stats;
    println!(
        "  Result: {} qubits, depth {}, {} ops",
        stats.num_qubits, stats.depth, stats.num_ops
    );
    println!(
        "  T count: {}, CNOTs: {}, ancillas: {}",
        style(stats.t_count).yellow(),
        stats.cx_count,
        stats.ancillas
    );
    if stats.synthesized > 0 {
        println!(
            "  Synthesized {} rotation(s), max error {:.3e}",
            stats.synthesized, stats.max_synthesis_error
        );
    }
    if stats.rotations > 0 {
        println!("  Rotations left: {}", style(stats.rotations).red());
    }
    for diagnostic in &compiled.diagnostics {
        println!("  {} {}", style("!").yellow().bold(), diagnostic);
    }
}
