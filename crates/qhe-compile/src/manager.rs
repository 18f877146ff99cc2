//! Pass manager for orchestrating compilation.

use tracing::{debug, info, instrument};

use qhe_ir::Circuit;

use crate::error::CompileResult;
use crate::pass::Pass;
use crate::passes::{AncillaAnalysis, BasisTranslation, RotationCounter, RotationSynthesis};
use crate::property::{AncillaPlacement, ErrorBudget, PropertySet};
use crate::synthesis::{OracleCapability, SynthesisOptions};

/// Manages and executes a sequence of compilation passes.
pub struct PassManager {
    /// The passes to execute, in order.
    passes: Vec<Box<dyn Pass>>,
}

impl PassManager {
    /// Create a new empty pass manager.
    pub fn new() -> Self {
        Self { passes: vec![] }
    }

    /// Add a pass to the manager.
    pub fn add_pass(&mut self, pass: impl Pass + 'static) {
        self.passes.push(Box::new(pass));
    }

    /// Run all passes on the given circuit.
    #[instrument(skip(self, circuit, properties), fields(circuit = %circuit.name()))]
    pub fn run(&self, circuit: &mut Circuit, properties: &mut PropertySet) -> CompileResult<()> {
        info!(
            "Running pass manager with {} passes on circuit with {} qubits",
            self.passes.len(),
            circuit.num_qubits()
        );

        for pass in &self.passes {
            if pass.should_run(circuit, properties) {
                debug!("Running pass: {}", pass.name());
                pass.run(circuit, properties)?;
                debug!("Pass {} completed, ops: {}", pass.name(), circuit.num_ops());
            } else {
                debug!("Skipping pass: {}", pass.name());
            }
        }

        info!(
            "Pass manager completed, final depth: {}, ops: {}",
            circuit.depth(),
            circuit.num_ops()
        );

        Ok(())
    }

    /// Get the number of passes.
    pub fn len(&self) -> usize {
        self.passes.len()
    }

    /// Check if the manager has no passes.
    pub fn is_empty(&self) -> bool {
        self.passes.is_empty()
    }

    /// Pass names in execution order.
    pub fn pass_names(&self) -> Vec<&str> {
        self.passes.iter().map(|p| p.name()).collect()
    }
}

impl Default for PassManager {
    fn default() -> Self {
        Self::new()
    }
}

/// Builder for the Clifford+T pipeline.
///
/// Ancilla analysis and basis translation always run. Rotation counting and
/// synthesis are added unless disabled with
/// [`with_rotations(false)`](Self::with_rotations).
pub struct PassManagerBuilder {
    properties: PropertySet,
    oracle: Option<OracleCapability>,
    synthesis: SynthesisOptions,
    rotations: bool,
}

impl PassManagerBuilder {
    /// Create a new builder with default settings.
    pub fn new() -> Self {
        Self {
            properties: PropertySet::new(),
            oracle: None,
            synthesis: SynthesisOptions::default(),
            rotations: true,
        }
    }

    /// Set the synthesis error budget.
    #[must_use]
    pub fn with_error_budget(mut self, budget: ErrorBudget) -> Self {
        self.properties.error_budget = budget;
        self
    }

    /// Set where the `anc` register goes.
    #[must_use]
    pub fn with_ancilla_placement(mut self, placement: AncillaPlacement) -> Self {
        self.properties.ancilla_placement = placement;
        self
    }

    /// Use a specific oracle instead of probing the default location.
    #[must_use]
    pub fn with_oracle(mut self, oracle: OracleCapability) -> Self {
        self.oracle = Some(oracle);
        self
    }

    /// Set seed and phase-collapsing options for synthesis.
    #[must_use]
    pub fn with_synthesis_options(mut self, options: SynthesisOptions) -> Self {
        self.synthesis = options;
        self
    }

    /// Enable or disable rotation synthesis.
    #[must_use]
    pub fn with_rotations(mut self, enabled: bool) -> Self {
        self.rotations = enabled;
        self
    }

    /// Build the pass manager and return it with the properties.
    pub fn build(self) -> (PassManager, PropertySet) {
        let mut pm = PassManager::new();

        pm.add_pass(AncillaAnalysis);
        pm.add_pass(BasisTranslation);

        if self.rotations {
            let oracle = self.oracle.unwrap_or_else(OracleCapability::detect);
            pm.add_pass(RotationCounter);
            pm.add_pass(RotationSynthesis::new(oracle, self.synthesis));
        }

        (pm, self.properties)
    }
}

impl Default for PassManagerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use qhe_ir::QubitId;

    #[test]
    fn test_empty_pass_manager() {
        let pm = PassManager::new();
        assert!(pm.is_empty());
        assert_eq!(pm.len(), 0);
    }

    #[test]
    fn test_pass_manager_run() {
        let pm = PassManager::new();
        let mut props = PropertySet::new();

        let mut circuit = Circuit::with_size("test", 2, 0);
        circuit.h(QubitId(0)).unwrap();
        circuit.cx(QubitId(0), QubitId(1)).unwrap();

        pm.run(&mut circuit, &mut props).unwrap();
        assert_eq!(circuit.num_ops(), 2);
    }

    #[test]
    fn test_pass_manager_builder() {
        let (pm, props) = PassManagerBuilder::new()
            .with_error_budget(ErrorBudget::PerGate(1e-3))
            .with_ancilla_placement(AncillaPlacement::Top)
            .with_oracle(OracleCapability::detect_at("/nonexistent"))
            .build();

        assert_eq!(
            pm.pass_names(),
            vec![
                "AncillaAnalysis",
                "BasisTranslation",
                "RotationCounter",
                "RotationSynthesis"
            ]
        );
        assert_eq!(props.error_budget, ErrorBudget::PerGate(1e-3));
        assert_eq!(props.ancilla_placement, AncillaPlacement::Top);
    }

    #[test]
    fn test_builder_without_rotations() {
        let (pm, _) = PassManagerBuilder::new().with_rotations(false).build();
        assert_eq!(pm.len(), 2);
    }
}
