//! Shared helpers for CLI commands.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use console::style;

use qhe_compile::OracleCapability;
use qhe_hal::Counts;
use qhe_ir::Circuit;

/// Load a circuit from a JSON file.
pub fn load_circuit(path: &Path) -> Result<Circuit> {
    if !path.exists() {
        anyhow::bail!("File not found: {}", path.display());
    }

    let source = fs::read_to_string(path)
        .with_context(|| format!("Failed to read file: {}", path.display()))?;
    Circuit::from_json(&source).with_context(|| format!("Invalid circuit in {}", path.display()))
}

/// Write a circuit as JSON.
pub fn save_circuit(circuit: &Circuit, path: &Path) -> Result<()> {
    let json = circuit.to_json()?;
    fs::write(path, json).with_context(|| format!("Failed to write file: {}", path.display()))
}

/// `<stem>_compiled.json` next to `input`.
pub fn default_output_path(input: &Path) -> PathBuf {
    let stem = input.file_stem().unwrap_or_default().to_string_lossy();
    input.with_file_name(format!("{stem}_compiled.json"))
}

/// Probe the oracle at `path`, or at the default install location.
pub fn oracle_capability(path: Option<&Path>) -> OracleCapability {
    match path {
        Some(path) => OracleCapability::detect_at(path),
        None => OracleCapability::detect(),
    }
}

/// Print a histogram as a table, most frequent first.
pub fn print_counts(counts: &Counts) {
    let total = counts.total() as f64;
    let mut sorted: Vec<_> = counts.iter().collect();
    sorted.sort_by(|a, b| b.1.cmp(a.1).then_with(|| a.0.cmp(b.0)));

    for (bitstring, count) in sorted.iter().take(16) {
        let prob = **count as f64 / total * 100.0;
        let bar_len = (prob / 2.0).round() as usize;
        let bar: String = "█".repeat(bar_len);

        println!(
            "  {}: {:>6} ({:>5.2}%) {}",
            style(bitstring).cyan(),
            count,
            prob,
            style(bar).green()
        );
    }

    if sorted.len() > 16 {
        println!("  ... and {} more outcomes", sorted.len() - 16);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use qhe_ir::QubitId;

    #[test]
    fn test_default_output_path() {
        assert_eq!(
            default_output_path(Path::new("circuits/toffoli.json")),
            PathBuf::from("circuits/toffoli_compiled.json")
        );
    }

    #[test]
    fn test_save_and_load_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bell.json");

        let mut circuit = Circuit::with_size("bell", 2, 0);
        circuit.h(QubitId(0)).unwrap().cx(QubitId(0), QubitId(1)).unwrap();
        save_circuit(&circuit, &path).unwrap();

        let loaded = load_circuit(&path).unwrap();
        assert_eq!(loaded.name(), "bell");
        assert_eq!(loaded.num_ops(), 2);
    }

    #[test]
    fn test_load_missing_file() {
        let err = load_circuit(Path::new("/nonexistent/circuit.json")).unwrap_err();
        assert!(err.to_string().contains("File not found"));
    }

    #[test]
    fn test_explicit_oracle_path_is_probed() {
        assert!(!oracle_capability(Some(Path::new("/nonexistent/gridsynth"))).is_available());
    }
}
