//! Rotation counting and oracle-backed rotation synthesis.

use rustc_hash::FxHashMap;
use tracing::{debug, info, warn};

use qhe_ir::{Circuit, Gate, Instruction, InstructionKind, StandardGate};

use crate::error::CompileResult;
use crate::pass::{Pass, PassKind};
use crate::property::{Diagnostic, PropertySet, RotationCount, SynthesisReport};
use crate::synthesis::{
    GateSequence, OracleCapability, SynthesisOptions, normalize_angle, synthesize_rz,
};

/// Angle of an `rz` or `p` gate.
fn rotation_angle(inst: &Instruction) -> Option<f64> {
    match &inst.kind {
        InstructionKind::Gate(gate) => match gate.as_standard()? {
            StandardGate::Rz(theta) | StandardGate::P(theta) => Some(*theta),
            _ => None,
        },
        _ => None,
    }
}

/// Counts the rotations that share the circuit error budget.
pub struct RotationCounter;

impl RotationCounter {
    /// Number of `rz` and `p` gates.
    pub fn count(circuit: &Circuit) -> usize {
        circuit
            .instructions()
            .iter()
            .filter(|inst| rotation_angle(inst).is_some())
            .count()
    }
}

impl Pass for RotationCounter {
    fn name(&self) -> &'static str {
        "RotationCounter"
    }

    fn kind(&self) -> PassKind {
        PassKind::Analysis
    }

    fn run(&self, circuit: &mut Circuit, properties: &mut PropertySet) -> CompileResult<()> {
        properties.insert(RotationCount(Self::count(circuit)));
        Ok(())
    }
}

/// Replaces every `rz`/`p` with a Clifford+T sequence from the oracle.
///
/// `p(θ)` equals `rz(θ)` up to global phase and is synthesized the same
/// way. Conditions on the rotation carry over to every emitted gate.
/// Without an oracle the circuit is left untouched and a
/// [`Diagnostic::OracleUnavailable`] is recorded.
pub struct RotationSynthesis {
    capability: OracleCapability,
    options: SynthesisOptions,
}

impl RotationSynthesis {
    /// Create the pass.
    pub fn new(capability: OracleCapability, options: SynthesisOptions) -> Self {
        Self {
            capability,
            options,
        }
    }
}

impl Pass for RotationSynthesis {
    fn name(&self) -> &'static str {
        "RotationSynthesis"
    }

    fn kind(&self) -> PassKind {
        PassKind::Transformation
    }

    fn should_run(&self, circuit: &Circuit, properties: &PropertySet) -> bool {
        properties
            .get::<RotationCount>()
            .map_or_else(|| RotationCounter::count(circuit), |c| c.0)
            > 0
    }

    fn run(&self, circuit: &mut Circuit, properties: &mut PropertySet) -> CompileResult<()> {
        let rotations = RotationCounter::count(circuit);

        let oracle = match &self.capability {
            OracleCapability::Available(oracle) => oracle,
            OracleCapability::Unavailable { path } => {
                warn!(
                    "rotation oracle not found at {}; {rotations} rotation(s) left unsynthesized",
                    path.display()
                );
                properties.diagnostics.push(Diagnostic::OracleUnavailable {
                    path: path.clone(),
                    rotations,
                });
                return Ok(());
            }
        };

        let options = SynthesisOptions {
            tolerance: properties.error_budget.per_gate(rotations),
            ..self.options
        };
        debug!(
            "synthesizing {rotations} rotation(s) with {} (tolerance {:?})",
            oracle.name(),
            options.tolerance
        );

        let mut cache: FxHashMap<u64, GateSequence> = FxHashMap::default();
        let mut report = SynthesisReport::default();
        let mut out = circuit.empty_like();

        for inst in circuit.instructions() {
            let Some(theta) = rotation_angle(inst) else {
                out.push(inst.clone())?;
                continue;
            };

            let key = normalize_angle(theta).to_bits();
            if !cache.contains_key(&key) {
                let seq = synthesize_rz(&**oracle, theta, &options)?;
                report.oracle_calls += 1;
                let error = seq.error_for(theta);
                debug!("rz({theta}) -> {} (error {error:.3e})", seq.word());
                report.max_error = report.max_error.max(error);
                cache.insert(key, seq);
            }
            let sequence = &cache[&key];

            let condition = inst.condition();
            for g in sequence.gates() {
                let mut gate = Gate::standard(g.clone());
                gate.condition = condition;
                out.push(Instruction::gate(gate, inst.qubits.iter().copied()))?;
            }
            report.synthesized += 1;
        }

        info!(
            "synthesized {} rotation(s) with {} oracle call(s), max error {:.3e}",
            report.synthesized, report.oracle_calls, report.max_error
        );

        properties.insert(report);
        *circuit = out;
        Ok(())
    }
}
