//! One-call entry point for the Clifford+T pipeline.

use serde::{Deserialize, Serialize};

use qhe_ir::{Circuit, InstructionKind};

use crate::error::CompileResult;
use crate::manager::PassManagerBuilder;
use crate::passes::ANCILLA_REGISTER;
use crate::property::{AncillaPlacement, Diagnostic, ErrorBudget, SynthesisReport};
use crate::synthesis::{OracleCapability, SynthesisOptions};

/// Options for [`compile`].
#[derive(Debug, Clone)]
pub struct CompileOptions {
    /// Rotation synthesis precision.
    pub error_budget: ErrorBudget,
    /// Where the `anc` register goes.
    pub ancilla_placement: AncillaPlacement,
    /// Replace `rz`/`p` with Clifford+T sequences.
    pub synthesize_rotations: bool,
    /// Seed and phase-collapsing options.
    pub synthesis: SynthesisOptions,
    /// Oracle to use; `None` probes the default gridsynth location.
    pub oracle: Option<OracleCapability>,
}

impl Default for CompileOptions {
    fn default() -> Self {
        Self {
            error_budget: ErrorBudget::Default,
            ancilla_placement: AncillaPlacement::Bottom,
            synthesize_rotations: true,
            synthesis: SynthesisOptions::default(),
            oracle: None,
        }
    }
}

impl CompileOptions {
    /// Default options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the error budget.
    #[must_use]
    pub fn with_error_budget(mut self, budget: ErrorBudget) -> Self {
        self.error_budget = budget;
        self
    }

    /// Set the ancilla placement.
    #[must_use]
    pub fn with_ancilla_placement(mut self, placement: AncillaPlacement) -> Self {
        self.ancilla_placement = placement;
        self
    }

    /// Enable or disable rotation synthesis.
    #[must_use]
    pub fn with_synthesize_rotations(mut self, enabled: bool) -> Self {
        self.synthesize_rotations = enabled;
        self
    }

    /// Set synthesis options.
    #[must_use]
    pub fn with_synthesis(mut self, options: SynthesisOptions) -> Self {
        self.synthesis = options;
        self
    }

    /// Use a specific oracle.
    #[must_use]
    pub fn with_oracle(mut self, oracle: OracleCapability) -> Self {
        self.oracle = Some(oracle);
        self
    }
}

/// Gate statistics of a compiled circuit.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CompileStats {
    /// Number of T and T† gates.
    pub t_count: usize,
    /// Number of CNOTs.
    pub cx_count: usize,
    /// `rz`/`p` gates still present.
    pub rotations: usize,
    /// Size of the `anc` register.
    pub ancillas: u32,
    /// Total qubits, ancillas included.
    pub num_qubits: usize,
    /// Gate and non-gate instruction count.
    pub num_ops: usize,
    /// Circuit depth.
    pub depth: usize,
    /// Rotations synthesized.
    pub synthesized: usize,
    /// Worst synthesis error.
    pub max_synthesis_error: f64,
}

impl CompileStats {
    fn collect(circuit: &Circuit, report: Option<SynthesisReport>) -> Self {
        let rotations = circuit
            .instructions()
            .iter()
            .filter(|inst| match &inst.kind {
                InstructionKind::Gate(g) => g.as_standard().is_some_and(|s| s.is_rotation()),
                _ => false,
            })
            .count();
        let report = report.unwrap_or_default();

        Self {
            t_count: circuit.count_t(),
            cx_count: circuit.count_gates(&["cx"]),
            rotations,
            ancillas: circuit.qreg(ANCILLA_REGISTER).map_or(0, |r| r.size),
            num_qubits: circuit.num_qubits(),
            num_ops: circuit.num_ops(),
            depth: circuit.depth(),
            synthesized: report.synthesized,
            max_synthesis_error: report.max_error,
        }
    }
}

/// A circuit in the fixed basis, with what the compiler noticed on the way.
#[derive(Debug, Clone)]
pub struct Compiled {
    /// The compiled circuit.
    pub circuit: Circuit,
    /// Non-fatal findings.
    pub diagnostics: Vec<Diagnostic>,
    /// Gate statistics.
    pub stats: CompileStats,
}

/// Compile a circuit into {x, z, h, s, sdg, t, tdg, cx} plus measure,
/// reset and barrier.
///
/// When no rotation oracle is available the output still contains `rz`/`p`
/// gates and [`Compiled::diagnostics`] says so.
///
/// # Examples
///
/// ```
/// use qhe_compile::{CompileOptions, compile};
/// use qhe_ir::{Circuit, QubitId};
///
/// let mut circuit = Circuit::with_size("swap", 2, 0);
/// circuit.swap(QubitId(0), QubitId(1)).unwrap();
///
/// let compiled = compile(&circuit, &CompileOptions::new().with_synthesize_rotations(false)).unwrap();
/// assert_eq!(compiled.stats.cx_count, 3);
/// assert!(compiled.diagnostics.is_empty());
/// ```
pub fn compile(circuit: &Circuit, options: &CompileOptions) -> CompileResult<Compiled> {
    let mut builder = PassManagerBuilder::new()
        .with_error_budget(options.error_budget)
        .with_ancilla_placement(options.ancilla_placement)
        .with_synthesis_options(options.synthesis)
        .with_rotations(options.synthesize_rotations);
    if let Some(oracle) = &options.oracle {
        builder = builder.with_oracle(oracle.clone());
    }
    let (pm, mut properties) = builder.build();

    let mut out = circuit.clone();
    pm.run(&mut out, &mut properties)?;

    let stats = CompileStats::collect(&out, properties.get::<SynthesisReport>().copied());
    Ok(Compiled {
        circuit: out,
        diagnostics: properties.diagnostics,
        stats,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use qhe_ir::{CustomGate, QubitId};

    use crate::error::CompileError;

    #[test]
    fn test_compile_reports_missing_oracle() {
        let mut circuit = Circuit::with_size("rx", 1, 0);
        circuit.rx(0.4, QubitId(0)).unwrap();

        let options = CompileOptions::new().with_oracle(OracleCapability::detect_at("/nonexistent"));
        let compiled = compile(&circuit, &options).unwrap();

        assert_eq!(compiled.stats.rotations, 1);
        assert_eq!(compiled.diagnostics.len(), 1);
        assert_eq!(compiled.circuit.count_gates(&["h"]), 2);
    }

    #[test]
    fn test_compile_counts_toffoli() {
        let mut circuit = Circuit::with_size("ccx", 3, 0);
        circuit.ccx(QubitId(0), QubitId(1), QubitId(2)).unwrap();

        let compiled = compile(&circuit, &CompileOptions::new().with_synthesize_rotations(false)).unwrap();
        assert_eq!(compiled.stats.t_count, 7);
        assert_eq!(compiled.stats.cx_count, 6);
        assert_eq!(compiled.stats.ancillas, 0);
        assert!(compiled.circuit.qreg(ANCILLA_REGISTER).is_none());
    }

    #[test]
    fn test_compile_rejects_custom_gate() {
        let mut circuit = Circuit::with_size("custom", 1, 0);
        circuit.gate(CustomGate::new("sx", 1), [QubitId(0)]).unwrap();

        let err = compile(&circuit, &CompileOptions::new()).unwrap_err();
        assert!(matches!(err, CompileError::UnsupportedGate { .. }));
    }
}
