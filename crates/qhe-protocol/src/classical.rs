//! Classical bit operations emulated with quantum scratch qubits.
//!
//! The circuit model only lets classical bits steer gates and receive
//! measurement results, so every bit operation is routed through a pair of
//! scratch qubits: load the bits with conditioned `x` gates, then measure the
//! scratch back into the destination. Scratch qubits are reset on entry and
//! carry no state between calls.

use qhe_ir::{Circuit, ClbitId, Instruction, IrResult, QubitId, StandardGate};

/// Destination for emitted instructions.
///
/// Implemented by [`Circuit`], which validates every instruction, and by
/// `Vec<Instruction>`, which buffers instructions for later emission.
pub trait InstructionSink {
    /// Append one instruction.
    fn emit(&mut self, instruction: Instruction) -> IrResult<()>;
}

impl InstructionSink for Circuit {
    fn emit(&mut self, instruction: Instruction) -> IrResult<()> {
        self.push(instruction)?;
        Ok(())
    }
}

impl InstructionSink for Vec<Instruction> {
    fn emit(&mut self, instruction: Instruction) -> IrResult<()> {
        self.push(instruction);
        Ok(())
    }
}

/// Two qubits used as classical scratch space.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScratchPair {
    /// First scratch qubit.
    pub s0: QubitId,
    /// Second scratch qubit.
    pub s1: QubitId,
}

impl ScratchPair {
    /// Create a scratch pair.
    pub fn new(s0: QubitId, s1: QubitId) -> Self {
        Self { s0, s1 }
    }

    /// Both qubits, in order.
    pub fn qubits(self) -> [QubitId; 2] {
        [self.s0, self.s1]
    }
}

/// Exchange the values of two bits.
pub fn classical_swap(
    out: &mut impl InstructionSink,
    b1: ClbitId,
    b2: ClbitId,
    scratch: ScratchPair,
) -> IrResult<()> {
    out.emit(Instruction::reset(scratch.s0))?;
    out.emit(Instruction::reset(scratch.s1))?;
    out.emit(Instruction::conditional(StandardGate::X, [scratch.s0], b1))?;
    out.emit(Instruction::conditional(StandardGate::X, [scratch.s1], b2))?;
    out.emit(Instruction::measure(scratch.s1, b1))?;
    out.emit(Instruction::measure(scratch.s0, b2))
}

/// `target ^= control`.
pub fn classical_cnot(
    out: &mut impl InstructionSink,
    control: ClbitId,
    target: ClbitId,
    scratch: ScratchPair,
) -> IrResult<()> {
    out.emit(Instruction::reset(scratch.s0))?;
    out.emit(Instruction::conditional(StandardGate::X, [scratch.s0], target))?;
    out.emit(Instruction::conditional(StandardGate::X, [scratch.s0], control))?;
    out.emit(Instruction::measure(scratch.s0, target))
}

/// `bit = 0`.
pub fn classical_reset(
    out: &mut impl InstructionSink,
    bit: ClbitId,
    scratch: ScratchPair,
) -> IrResult<()> {
    out.emit(Instruction::reset(scratch.s0))?;
    out.emit(Instruction::measure(scratch.s0, bit))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scratch() -> ScratchPair {
        ScratchPair::new(QubitId(0), QubitId(1))
    }

    #[test]
    fn test_cnot_shape() {
        let mut out: Vec<Instruction> = vec![];
        classical_cnot(&mut out, ClbitId(0), ClbitId(1), scratch()).unwrap();

        let names: Vec<_> = out.iter().map(Instruction::name).collect();
        assert_eq!(names, ["reset", "x", "x", "measure"]);
        assert_eq!(out[1].condition().unwrap().clbit, ClbitId(1));
        assert_eq!(out[2].condition().unwrap().clbit, ClbitId(0));
        assert_eq!(out[3].clbits, vec![ClbitId(1)]);
    }

    #[test]
    fn test_swap_crosses_measurements() {
        let mut out: Vec<Instruction> = vec![];
        classical_swap(&mut out, ClbitId(3), ClbitId(5), scratch()).unwrap();

        assert_eq!(out.len(), 6);
        assert_eq!(out[4].qubits, vec![QubitId(1)]);
        assert_eq!(out[4].clbits, vec![ClbitId(3)]);
        assert_eq!(out[5].qubits, vec![QubitId(0)]);
        assert_eq!(out[5].clbits, vec![ClbitId(5)]);
    }

    #[test]
    fn test_reset_into_circuit() {
        let mut circuit = Circuit::with_size("scratch", 2, 1);
        classical_reset(&mut circuit, ClbitId(0), scratch()).unwrap();
        assert_eq!(circuit.num_ops(), 2);
    }

    #[test]
    fn test_circuit_sink_validates() {
        let mut circuit = Circuit::with_size("scratch", 2, 1);
        let err = classical_cnot(&mut circuit, ClbitId(0), ClbitId(9), scratch());
        assert!(err.is_err());
    }
}
