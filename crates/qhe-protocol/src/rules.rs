//! Pauli-key update rules.
//!
//! Every fixed-basis instruction conjugates the pad into another Pauli (or,
//! for T/T†, into a Pauli after teleportation). [`KeyEffect`] names that
//! transformation in terms of key positions, and [`KeyEffect::lower`] turns
//! it into classical bit operations on the live key registers.
//!
//! | Instruction | Effect |
//! |-------------|--------|
//! | x, z, barrier | none |
//! | h | swap `x[q]`, `z[q]` |
//! | s, sdg | `z[q] ^= x[q]` |
//! | cx(c, t) | `x[t] ^= x[c]`, `z[c] ^= z[t]` |
//! | measure | `z[q] = 0` |
//! | reset | `x[q] = 0`, `z[q] = 0` |
//! | t | teleport, then `z[q] ^= x[q]` |
//! | tdg | teleport |

use rustc_hash::FxHashMap;

use qhe_ir::{ClbitId, Instruction, InstructionKind, IrError, IrResult, QubitId, StandardGate};

use crate::allocator::BellAllocation;
use crate::classical::{
    InstructionSink, ScratchPair, classical_cnot, classical_reset, classical_swap,
};
use crate::error::{ProtocolError, ProtocolResult};
use crate::gadget::TGadget;
use crate::keys::{DataQubits, KeyRegisters};

/// How one instruction transforms the live keys. Indices are key positions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyEffect {
    /// Keys unchanged.
    None,
    /// Swap `x[qubit]` and `z[qubit]`.
    Swap {
        /// Key position.
        qubit: usize,
    },
    /// `z[qubit] ^= x[qubit]`.
    PhaseXor {
        /// Key position.
        qubit: usize,
    },
    /// `x[target] ^= x[control]` and `z[control] ^= z[target]`.
    Cnot {
        /// Control key position.
        control: usize,
        /// Target key position.
        target: usize,
    },
    /// `z[q] = 0` for each measured qubit.
    ClearZ {
        /// Key positions.
        qubits: Vec<usize>,
    },
    /// `x[q] = 0` and `z[q] = 0` for each reset qubit.
    ClearBoth {
        /// Key positions.
        qubits: Vec<usize>,
    },
    /// T or T† through the teleportation gadget.
    Teleport {
        /// Key position.
        qubit: usize,
        /// T† instead of T.
        dagger: bool,
    },
}

fn unsupported(name: &str) -> ProtocolError {
    ProtocolError::UnsupportedGate {
        name: name.to_string(),
    }
}

impl KeyEffect {
    /// Classify an instruction of the server circuit.
    ///
    /// Conditioned gates and anything outside {x, z, h, s, sdg, t, tdg, cx}
    /// are rejected with [`ProtocolError::UnsupportedGate`].
    pub fn of(inst: &Instruction, data: &DataQubits) -> ProtocolResult<Self> {
        let positions = || -> ProtocolResult<Vec<usize>> {
            inst.qubits.iter().map(|&q| data.position(q)).collect()
        };

        let gate = match &inst.kind {
            InstructionKind::Barrier => {
                positions()?;
                return Ok(Self::None);
            }
            InstructionKind::Measure => {
                return Ok(Self::ClearZ {
                    qubits: positions()?,
                });
            }
            InstructionKind::Reset => {
                return Ok(Self::ClearBoth {
                    qubits: positions()?,
                });
            }
            InstructionKind::Gate(gate) => gate,
        };

        if gate.condition.is_some() {
            return Err(unsupported(&format!("{} (classically conditioned)", gate.name())));
        }
        let Some(standard) = gate.as_standard() else {
            return Err(unsupported(gate.name()));
        };
        let q = positions()?;

        match standard {
            StandardGate::X | StandardGate::Z => Ok(Self::None),
            StandardGate::H => Ok(Self::Swap { qubit: q[0] }),
            StandardGate::S | StandardGate::Sdg => Ok(Self::PhaseXor { qubit: q[0] }),
            StandardGate::CX => Ok(Self::Cnot {
                control: q[0],
                target: q[1],
            }),
            StandardGate::T => Ok(Self::Teleport {
                qubit: q[0],
                dagger: false,
            }),
            StandardGate::Tdg => Ok(Self::Teleport {
                qubit: q[0],
                dagger: true,
            }),
            StandardGate::Y
            | StandardGate::Rx(_)
            | StandardGate::Ry(_)
            | StandardGate::Rz(_)
            | StandardGate::P(_)
            | StandardGate::U(_, _, _)
            | StandardGate::CY
            | StandardGate::CZ
            | StandardGate::CH
            | StandardGate::Swap
            | StandardGate::CRx(_)
            | StandardGate::CRy(_)
            | StandardGate::CRz(_)
            | StandardGate::CP(_)
            | StandardGate::CCX
            | StandardGate::Mcx { .. } => Err(unsupported(standard.name())),
        }
    }

    /// Whether this effect needs a Bell pair.
    pub fn is_teleport(&self) -> bool {
        matches!(self, Self::Teleport { .. })
    }

    /// Emit the classical operations that apply this effect to the live keys.
    ///
    /// For [`KeyEffect::Teleport`] this is only the gate's own contribution
    /// (`z ^= x` for T, nothing for T†); the transcript bits are folded in by
    /// [`TGadget::key_part`].
    pub fn lower(
        &self,
        keys: &KeyRegisters,
        scratch: ScratchPair,
        out: &mut impl InstructionSink,
    ) -> IrResult<()> {
        match self {
            Self::None => Ok(()),
            Self::Swap { qubit } => classical_swap(out, keys.x[*qubit], keys.z[*qubit], scratch),
            Self::PhaseXor { qubit } => {
                classical_cnot(out, keys.x[*qubit], keys.z[*qubit], scratch)
            }
            Self::Cnot { control, target } => {
                classical_cnot(out, keys.x[*control], keys.x[*target], scratch)?;
                classical_cnot(out, keys.z[*target], keys.z[*control], scratch)
            }
            Self::ClearZ { qubits } => {
                for &q in qubits {
                    classical_reset(out, keys.z[q], scratch)?;
                }
                Ok(())
            }
            Self::ClearBoth { qubits } => {
                for &q in qubits {
                    classical_reset(out, keys.x[q], scratch)?;
                    classical_reset(out, keys.z[q], scratch)?;
                }
                Ok(())
            }
            Self::Teleport { qubit, dagger } => {
                if *dagger {
                    Ok(())
                } else {
                    classical_cnot(out, keys.x[*qubit], keys.z[*qubit], scratch)
                }
            }
        }
    }
}

/// One server instruction rewritten for the homomorphic circuit.
#[derive(Debug, Clone)]
pub struct GateTranslation {
    /// Instructions the server runs on the padded data.
    pub server: Vec<Instruction>,
    /// The key update this instruction implies.
    pub effect: KeyEffect,
    /// Client-side corrections and key updates, to run after `server`.
    pub correction: Vec<Instruction>,
}

/// Everything [`translate_gate`] needs to place instructions.
#[derive(Debug)]
pub struct TranslationContext<'a> {
    data: &'a DataQubits,
    keys: &'a KeyRegisters,
    bells: &'a BellAllocation,
    clbits: FxHashMap<ClbitId, ClbitId>,
    fence: Vec<QubitId>,
    next_slot: usize,
}

impl<'a> TranslationContext<'a> {
    /// Create a context.
    ///
    /// `clbits` maps server circuit bits to homomorphic circuit bits, and
    /// `fence` is the qubit set gadget barriers span.
    pub fn new(
        data: &'a DataQubits,
        keys: &'a KeyRegisters,
        bells: &'a BellAllocation,
        clbits: FxHashMap<ClbitId, ClbitId>,
        fence: Vec<QubitId>,
    ) -> Self {
        Self {
            data,
            keys,
            bells,
            clbits,
            fence,
            next_slot: 0,
        }
    }

    /// Gadget slots consumed so far.
    pub fn slots_used(&self) -> usize {
        self.next_slot
    }

    fn clbit(&self, clbit: ClbitId, name: &str) -> IrResult<ClbitId> {
        self.clbits
            .get(&clbit)
            .copied()
            .ok_or_else(|| IrError::ClbitNotFound {
                clbit,
                gate_name: Some(name.to_string()),
            })
    }
}

/// Rewrite one server instruction into its server and correction parts.
///
/// T/T† occurrences take the next gadget slot, in source order.
pub fn translate_gate(
    inst: &Instruction,
    ctx: &mut TranslationContext<'_>,
) -> ProtocolResult<GateTranslation> {
    let effect = KeyEffect::of(inst, ctx.data)?;
    let mut server = vec![];
    let mut correction = vec![];
    let scratch = ctx.bells.scratch();

    if let KeyEffect::Teleport { qubit, dagger } = effect {
        let slot = ctx.next_slot;
        let (ra, rb) = ctx.bells.transcript(slot)?;
        let gadget = TGadget {
            qubit: ctx.data.qubits()[qubit],
            position: qubit,
            pair: ctx.bells.pair(slot)?,
            ra,
            rb,
            dagger,
            reset_pair: ctx.bells.resets_pairs(),
            inline_correction: ctx.bells.interleaves_corrections(),
        };
        ctx.next_slot += 1;

        gadget.server_part(&ctx.fence, &mut server)?;
        gadget.correction_part(&ctx.fence, ctx.keys, &mut correction)?;
        gadget.key_part(&ctx.fence, ctx.keys, scratch, &mut correction)?;
    } else {
        let qubits = inst
            .qubits
            .iter()
            .map(|&q| ctx.data.resolve(q))
            .collect::<ProtocolResult<Vec<_>>>()?;
        let clbits = inst
            .clbits
            .iter()
            .map(|&c| ctx.clbit(c, inst.name()))
            .collect::<IrResult<Vec<_>>>()?;
        server.push(Instruction {
            kind: inst.kind.clone(),
            qubits,
            clbits,
        });
        effect.lower(ctx.keys, scratch, &mut correction)?;
    }

    Ok(GateTranslation {
        server,
        effect,
        correction,
    })
}
