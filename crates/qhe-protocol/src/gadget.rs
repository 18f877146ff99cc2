//! T-gate teleportation gadget.
//!
//! T does not map Paulis to Paulis: `T X T† = e^{-iπ/4} S X`, so
//! a padded qubit picks up a stray S whenever its X key is set. The gadget
//! teleports the qubit through a Bell pair and lets the client apply the
//! S correction as a gate conditioned on the live X key. The pair's
//! measurement outcomes become new pad bits.
//!
//! The gadget has three parts:
//!
//! 1. server part: apply T/T†, entangle the pair, swap the data qubit in;
//! 2. correction part: conditional S, Bell-basis measurement into `rb`/`ra`;
//! 3. key part: fold the outcomes into the live keys.

use qhe_ir::{ClbitId, Instruction, IrResult, QubitId, StandardGate};

use crate::classical::{InstructionSink, ScratchPair, classical_cnot};
use crate::keys::KeyRegisters;
use crate::rules::KeyEffect;

/// One T or T† occurrence bound to its pair and transcript slot.
#[derive(Debug, Clone)]
pub struct TGadget {
    /// Data qubit the gate acts on.
    pub qubit: QubitId,
    /// Key position of the data qubit.
    pub position: usize,
    /// Bell pair `(a0, a1)` consumed by this occurrence.
    pub pair: ScratchPair,
    /// Transcript bit measured from `a1`.
    pub ra: ClbitId,
    /// Transcript bit measured from `a0`.
    pub rb: ClbitId,
    /// T† instead of T.
    pub dagger: bool,
    /// Reset the pair before entangling it.
    pub reset_pair: bool,
    /// The correction follows the server part directly, so the server
    /// part's closing barrier already fences it.
    pub inline_correction: bool,
}

impl TGadget {
    /// The gate being teleported.
    pub fn gate(&self) -> StandardGate {
        if self.dagger {
            StandardGate::Tdg
        } else {
            StandardGate::T
        }
    }

    /// Key effect of the gate itself, before transcript bits are folded in.
    pub fn effect(&self) -> KeyEffect {
        KeyEffect::Teleport {
            qubit: self.position,
            dagger: self.dagger,
        }
    }

    /// Server part, fenced by barriers over `fence`.
    pub fn server_part(&self, fence: &[QubitId], out: &mut impl InstructionSink) -> IrResult<()> {
        let ScratchPair { s0: a0, s1: a1 } = self.pair;

        out.emit(Instruction::barrier(fence.iter().copied()))?;
        out.emit(Instruction::single_qubit_gate(self.gate(), self.qubit))?;
        if self.reset_pair {
            out.emit(Instruction::reset(a0))?;
            out.emit(Instruction::reset(a1))?;
        }
        out.emit(Instruction::single_qubit_gate(StandardGate::H, a0))?;
        out.emit(Instruction::two_qubit_gate(StandardGate::CX, a0, a1))?;
        out.emit(Instruction::two_qubit_gate(StandardGate::Swap, self.qubit, a0))?;
        out.emit(Instruction::barrier(fence.iter().copied()))
    }

    /// Correction part: S on `a0` if the live X key is set, then a
    /// Bell-basis measurement of the pair.
    pub fn correction_part(
        &self,
        fence: &[QubitId],
        keys: &KeyRegisters,
        out: &mut impl InstructionSink,
    ) -> IrResult<()> {
        let ScratchPair { s0: a0, s1: a1 } = self.pair;

        if !self.inline_correction {
            out.emit(Instruction::barrier(fence.iter().copied()))?;
        }
        out.emit(Instruction::conditional(
            StandardGate::S,
            [a0],
            keys.x[self.position],
        ))?;
        out.emit(Instruction::two_qubit_gate(StandardGate::CX, a0, a1))?;
        out.emit(Instruction::single_qubit_gate(StandardGate::H, a0))?;
        out.emit(Instruction::measure_many([a0, a1], [self.rb, self.ra])?)
    }

    /// Key part: `z ^= x` for T only, then `z ^= rb` and `x ^= ra`.
    pub fn key_part(
        &self,
        fence: &[QubitId],
        keys: &KeyRegisters,
        scratch: ScratchPair,
        out: &mut impl InstructionSink,
    ) -> IrResult<()> {
        self.effect().lower(keys, scratch, out)?;
        classical_cnot(out, self.rb, keys.z[self.position], scratch)?;
        classical_cnot(out, self.ra, keys.x[self.position], scratch)?;
        out.emit(Instruction::barrier(fence.iter().copied()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn keys() -> KeyRegisters {
        KeyRegisters {
            x_init: vec![ClbitId(0)],
            z_init: vec![ClbitId(1)],
            x: vec![ClbitId(2)],
            z: vec![ClbitId(3)],
        }
    }

    fn gadget(dagger: bool, shared: bool) -> TGadget {
        TGadget {
            qubit: QubitId(0),
            position: 0,
            pair: ScratchPair::new(QubitId(1), QubitId(2)),
            ra: ClbitId(4),
            rb: ClbitId(5),
            dagger,
            reset_pair: shared,
            inline_correction: shared,
        }
    }

    fn names(out: &[Instruction]) -> Vec<&str> {
        out.iter().map(Instruction::name).collect()
    }

    #[test]
    fn test_server_part() {
        let fence = [QubitId(0), QubitId(1), QubitId(2)];

        let mut fresh: Vec<Instruction> = vec![];
        gadget(false, false).server_part(&fence, &mut fresh).unwrap();
        assert_eq!(
            names(&fresh),
            ["barrier", "t", "h", "cx", "swap", "barrier"]
        );

        let mut shared: Vec<Instruction> = vec![];
        gadget(true, true).server_part(&fence, &mut shared).unwrap();
        assert_eq!(
            names(&shared),
            ["barrier", "tdg", "reset", "reset", "h", "cx", "swap", "barrier"]
        );
    }

    #[test]
    fn test_correction_measures_pair_into_transcript() {
        let mut out: Vec<Instruction> = vec![];
        gadget(false, false)
            .correction_part(&[], &keys(), &mut out)
            .unwrap();

        assert_eq!(names(&out), ["barrier", "s", "cx", "h", "measure"]);
        assert_eq!(out[1].condition().unwrap().clbit, ClbitId(2));
        assert_eq!(out[4].qubits, vec![QubitId(1), QubitId(2)]);
        assert_eq!(out[4].clbits, vec![ClbitId(5), ClbitId(4)]);
    }

    #[test]
    fn test_inline_correction_has_single_fence() {
        let fence = [QubitId(0), QubitId(1), QubitId(2)];
        let g = gadget(false, true);

        let mut out: Vec<Instruction> = vec![];
        g.server_part(&fence, &mut out).unwrap();
        g.correction_part(&fence, &keys(), &mut out).unwrap();

        let doubled = out
            .windows(2)
            .filter(|w| w[0].name() == "barrier" && w[1].name() == "barrier")
            .count();
        assert_eq!(doubled, 0);
        assert_eq!(
            names(&out[out.len() - 5..]),
            ["barrier", "s", "cx", "h", "measure"]
        );
    }

    #[test]
    fn test_t_and_tdg_key_parts_differ() {
        let scratch = ScratchPair::new(QubitId(3), QubitId(4));

        let mut t: Vec<Instruction> = vec![];
        gadget(false, false)
            .key_part(&[], &keys(), scratch, &mut t)
            .unwrap();
        let mut tdg: Vec<Instruction> = vec![];
        gadget(true, false)
            .key_part(&[], &keys(), scratch, &mut tdg)
            .unwrap();

        // Three classical CNOTs for T, two for T†, each four instructions.
        assert_eq!(t.len(), 3 * 4 + 1);
        assert_eq!(tdg.len(), 2 * 4 + 1);
        // T starts with z ^= x, T† goes straight to z ^= rb.
        assert_eq!(t[2].condition().unwrap().clbit, ClbitId(2));
        assert_eq!(tdg[2].condition().unwrap().clbit, ClbitId(5));
        assert_eq!(&t[4..], &tdg[..]);
    }
}
