//! Synth command implementation.

use std::path::Path;

use anyhow::Result;
use console::style;

use qhe_compile::synthesis::{GateSequence, collapse_phases, normalize_angle};

use super::common::oracle_capability;

/// Execute the synth command.
pub fn execute(
    angle: f64,
    tolerance: Option<f64>,
    seed: u64,
    collapse: bool,
    gridsynth: Option<&Path>,
) -> Result<()> {
    if !angle.is_finite() {
        anyhow::bail!("Angle must be finite, got {angle}");
    }

    let capability = oracle_capability(gridsynth);
    let Some(oracle) = capability.oracle() else {
        anyhow::bail!("No rotation oracle found. Run `qhe oracle install` or set QHE_GRIDSYNTH");
    };

    println!(
        "{} Synthesizing Rz({}) with {}",
        style("→").cyan().bold(),
        style(angle).yellow(),
        oracle.name()
    );

    let raw = oracle.synthesize(normalize_angle(angle), tolerance, Some(seed))?;
    let word = if collapse {
        collapse_phases(&raw)
    } else {
        raw.clone()
    };
    let sequence = GateSequence::parse(&word)?;

    println!("  Oracle:   {}", style(&raw).dim());
    println!("  Word:     {}", style(sequence.word()).green());
    println!(
        "  Gates:    {}",
        sequence
            .gates()
            .iter()
            .map(|g| g.name())
            .collect::<Vec<_>>()
            .join(" ")
    );
    println!(
        "  T count:  {}, length {}",
        style(sequence.t_count()).yellow(),
        sequence.len()
    );
    println!("  Error:    {:.3e}", sequence.error_for(angle));

    Ok(())
}
