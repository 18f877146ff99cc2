//! Ancilla demand analysis for multi-controlled X gates.

use qhe_ir::{Circuit, InstructionKind, StandardGate};

use crate::error::CompileResult;
use crate::pass::{Pass, PassKind};
use crate::property::{AncillaRequirement, PropertySet};

/// Name of the register holding staircase ancillas.
pub const ANCILLA_REGISTER: &str = "anc";

/// Records the largest `mcx` control count and the resulting `anc` size.
///
/// A k-control `mcx` with k ≥ 3 is lowered to a Toffoli staircase over
/// k − 2 ancillas; one register sized for the widest gate serves all of
/// them because every staircase is unwound after use.
pub struct AncillaAnalysis;

impl AncillaAnalysis {
    /// Compute the requirement without a property set.
    pub fn requirement(circuit: &Circuit) -> AncillaRequirement {
        let max_controls = circuit
            .instructions()
            .iter()
            .filter_map(|inst| match &inst.kind {
                InstructionKind::Gate(gate) => match gate.as_standard() {
                    Some(StandardGate::Mcx { controls }) => Some(*controls),
                    _ => None,
                },
                _ => None,
            })
            .max()
            .unwrap_or(0);

        AncillaRequirement {
            max_controls,
            ancillas: max_controls.saturating_sub(2),
        }
    }
}

impl Pass for AncillaAnalysis {
    fn name(&self) -> &'static str {
        "AncillaAnalysis"
    }

    fn kind(&self) -> PassKind {
        PassKind::Analysis
    }

    fn run(&self, circuit: &mut Circuit, properties: &mut PropertySet) -> CompileResult<()> {
        properties.insert(Self::requirement(circuit));
        Ok(())
    }
}
