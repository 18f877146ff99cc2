//! Circuit instructions combining gates with operands.

use serde::{Deserialize, Serialize};

use crate::gate::{ClassicalCondition, Gate, StandardGate};
use crate::qubit::{ClbitId, QubitId};

/// The kind of instruction in a circuit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum InstructionKind {
    /// A quantum gate operation.
    Gate(Gate),
    /// Measurement, pairing `qubits[i]` with `clbits[i]`.
    Measure,
    /// Reset qubit to |0⟩.
    Reset,
    /// Barrier (synchronization point).
    Barrier,
}

/// A complete instruction with operands.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Instruction {
    /// The kind of instruction.
    pub kind: InstructionKind,
    /// Qubits this instruction operates on.
    pub qubits: Vec<QubitId>,
    /// Classical bits this instruction writes (measure only).
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub clbits: Vec<ClbitId>,
}

impl Instruction {
    /// Create a gate instruction.
    pub fn gate(gate: impl Into<Gate>, qubits: impl IntoIterator<Item = QubitId>) -> Self {
        Self {
            kind: InstructionKind::Gate(gate.into()),
            qubits: qubits.into_iter().collect(),
            clbits: vec![],
        }
    }

    /// Create a single-qubit gate instruction.
    pub fn single_qubit_gate(gate: StandardGate, qubit: QubitId) -> Self {
        Self::gate(gate, [qubit])
    }

    /// Create a two-qubit gate instruction.
    pub fn two_qubit_gate(gate: StandardGate, q1: QubitId, q2: QubitId) -> Self {
        Self::gate(gate, [q1, q2])
    }

    /// Create a gate instruction that fires only when `clbit` reads 1.
    pub fn conditional(
        gate: StandardGate,
        qubits: impl IntoIterator<Item = QubitId>,
        clbit: ClbitId,
    ) -> Self {
        Self::gate(
            Gate::standard(gate).with_condition(ClassicalCondition::new(clbit)),
            qubits,
        )
    }

    /// Create a measurement instruction.
    pub fn measure(qubit: QubitId, clbit: ClbitId) -> Self {
        Self {
            kind: InstructionKind::Measure,
            qubits: vec![qubit],
            clbits: vec![clbit],
        }
    }

    /// Create a multi-qubit measurement instruction.
    ///
    /// Returns an error if the number of qubits and classical bits do not match.
    pub fn measure_many(
        qubits: impl IntoIterator<Item = QubitId>,
        clbits: impl IntoIterator<Item = ClbitId>,
    ) -> crate::error::IrResult<Self> {
        let qubits: Vec<_> = qubits.into_iter().collect();
        let clbits: Vec<_> = clbits.into_iter().collect();
        if qubits.len() != clbits.len() {
            return Err(crate::error::IrError::MeasureArity {
                qubits: qubits.len(),
                clbits: clbits.len(),
            });
        }
        Ok(Self {
            kind: InstructionKind::Measure,
            qubits,
            clbits,
        })
    }

    /// Create a reset instruction.
    pub fn reset(qubit: QubitId) -> Self {
        Self {
            kind: InstructionKind::Reset,
            qubits: vec![qubit],
            clbits: vec![],
        }
    }

    /// Create a barrier instruction.
    pub fn barrier(qubits: impl IntoIterator<Item = QubitId>) -> Self {
        Self {
            kind: InstructionKind::Barrier,
            qubits: qubits.into_iter().collect(),
            clbits: vec![],
        }
    }

    /// Check if this is a gate instruction.
    pub fn is_gate(&self) -> bool {
        matches!(self.kind, InstructionKind::Gate(_))
    }

    /// Check if this is a measurement.
    pub fn is_measure(&self) -> bool {
        matches!(self.kind, InstructionKind::Measure)
    }

    /// Check if this is a reset.
    pub fn is_reset(&self) -> bool {
        matches!(self.kind, InstructionKind::Reset)
    }

    /// Check if this is a barrier.
    pub fn is_barrier(&self) -> bool {
        matches!(self.kind, InstructionKind::Barrier)
    }

    /// Get the gate if this is a gate instruction.
    pub fn as_gate(&self) -> Option<&Gate> {
        match &self.kind {
            InstructionKind::Gate(g) => Some(g),
            _ => None,
        }
    }

    /// Get mutable reference to the gate.
    pub fn gate_mut(&mut self) -> Option<&mut Gate> {
        match &mut self.kind {
            InstructionKind::Gate(g) => Some(g),
            _ => None,
        }
    }

    /// The classical condition guarding this instruction, if any.
    pub fn condition(&self) -> Option<ClassicalCondition> {
        self.as_gate().and_then(|g| g.condition)
    }

    /// Get the name of the instruction.
    pub fn name(&self) -> &str {
        match &self.kind {
            InstructionKind::Gate(g) => g.name(),
            InstructionKind::Measure => "measure",
            InstructionKind::Reset => "reset",
            InstructionKind::Barrier => "barrier",
        }
    }

    /// Rewrite every operand through the given maps.
    ///
    /// Condition bits are remapped with `clbit_map` as well.
    #[must_use]
    pub fn remap(
        &self,
        qubit_map: impl Fn(QubitId) -> QubitId,
        clbit_map: impl Fn(ClbitId) -> ClbitId,
    ) -> Self {
        let mut kind = self.kind.clone();
        if let InstructionKind::Gate(gate) = &mut kind {
            if let Some(cond) = &mut gate.condition {
                cond.clbit = clbit_map(cond.clbit);
            }
        }
        Self {
            kind,
            qubits: self.qubits.iter().map(|&q| qubit_map(q)).collect(),
            clbits: self.clbits.iter().map(|&c| clbit_map(c)).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gate_instruction() {
        let inst = Instruction::single_qubit_gate(StandardGate::H, QubitId(0));
        assert!(inst.is_gate());
        assert_eq!(inst.qubits.len(), 1);
        assert_eq!(inst.name(), "h");
        assert!(inst.condition().is_none());
    }

    #[test]
    fn test_measure_instruction() {
        let inst = Instruction::measure(QubitId(0), ClbitId(0));
        assert!(inst.is_measure());
        assert_eq!(inst.clbits, vec![ClbitId(0)]);
        assert_eq!(inst.name(), "measure");
    }

    #[test]
    fn test_measure_many_arity() {
        assert!(Instruction::measure_many([QubitId(0), QubitId(1)], [ClbitId(0)]).is_err());
        let inst = Instruction::measure_many([QubitId(0), QubitId(1)], [ClbitId(1), ClbitId(0)])
            .unwrap();
        assert_eq!(inst.qubits.len(), 2);
    }

    #[test]
    fn test_conditional_instruction() {
        let inst = Instruction::conditional(StandardGate::X, [QubitId(1)], ClbitId(4));
        assert_eq!(inst.condition().map(|c| c.clbit), Some(ClbitId(4)));
    }

    #[test]
    fn test_remap_moves_operands_and_condition() {
        let inst = Instruction::conditional(StandardGate::CX, [QubitId(0), QubitId(1)], ClbitId(0));
        let moved = inst.remap(|q| QubitId(q.0 + 3), |c| ClbitId(c.0 + 10));
        assert_eq!(moved.qubits, vec![QubitId(3), QubitId(4)]);
        assert_eq!(moved.condition().map(|c| c.clbit), Some(ClbitId(10)));

        let meas = Instruction::measure(QubitId(2), ClbitId(1)).remap(|q| q, |c| ClbitId(c.0 * 2));
        assert_eq!(meas.clbits, vec![ClbitId(2)]);
    }
}
