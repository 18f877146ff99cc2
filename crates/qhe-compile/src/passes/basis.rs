//! Translation into the fixed Clifford+T basis.
//!
//! Output vocabulary: x, z, h, s, sdg, t, tdg, cx, plus rz and p which are
//! left for [`RotationSynthesis`](super::RotationSynthesis), and the
//! non-gate instructions measure, reset and barrier.

use qhe_ir::{
    Circuit, ClassicalCondition, Gate, GateKind, Instruction, InstructionKind, QubitId,
    StandardGate,
};
use tracing::debug;

use crate::error::{CompileError, CompileResult};
use crate::pass::{Pass, PassKind};
use crate::passes::ancilla::{ANCILLA_REGISTER, AncillaAnalysis};
use crate::property::{AncillaPlacement, AncillaRequirement, PropertySet};

/// Rewrites every instruction into the fixed basis, in program order.
///
/// The circuit is rebuilt from scratch. When the ancilla analysis asks for
/// helper qubits an `anc` register is declared before or after the
/// circuit's own quantum registers, and every operand is remapped by
/// register name and offset.
pub struct BasisTranslation;

impl Pass for BasisTranslation {
    fn name(&self) -> &'static str {
        "BasisTranslation"
    }

    fn kind(&self) -> PassKind {
        PassKind::Transformation
    }

    fn run(&self, circuit: &mut Circuit, properties: &mut PropertySet) -> CompileResult<()> {
        let requirement = properties
            .get::<AncillaRequirement>()
            .copied()
            .unwrap_or_else(|| AncillaAnalysis::requirement(circuit));

        let (mut out, qubit_map) =
            allocate_registers(circuit, requirement.ancillas, properties.ancilla_placement)?;
        let ancillas = if requirement.ancillas > 0 {
            out.qreg_qubits(ANCILLA_REGISTER)?
        } else {
            vec![]
        };

        for inst in circuit.instructions() {
            let moved = inst.remap(|q| qubit_map[q.index()], |c| c);
            out.extend(translate_instruction(&moved, &ancillas)?)?;
        }

        debug!(
            "basis translation: {} -> {} instructions, {} ancilla(s)",
            circuit.num_ops(),
            out.num_ops(),
            ancillas.len()
        );

        *circuit = out;
        Ok(())
    }
}

/// Declare the output registers and map old qubits onto them.
fn allocate_registers(
    circuit: &Circuit,
    ancillas: u32,
    placement: AncillaPlacement,
) -> CompileResult<(Circuit, Vec<QubitId>)> {
    let mut out = Circuit::new(circuit.name());
    if ancillas > 0 && placement == AncillaPlacement::Top {
        out.add_qreg(ANCILLA_REGISTER, ancillas)?;
    }
    for reg in circuit.qregs() {
        out.add_qreg(reg.name.clone(), reg.size)?;
    }
    if ancillas > 0 && placement == AncillaPlacement::Bottom {
        out.add_qreg(ANCILLA_REGISTER, ancillas)?;
    }
    for reg in circuit.cregs() {
        out.add_creg(reg.name.clone(), reg.size)?;
    }

    let qubit_map = circuit
        .qubits()
        .iter()
        .map(|q| out.qubit_in(&q.register, q.index))
        .collect::<Result<Vec<_>, _>>()?;

    Ok((out, qubit_map))
}

/// Collects rewritten gates, stamping each with the source condition.
struct Emitter {
    condition: Option<ClassicalCondition>,
    out: Vec<Instruction>,
}

impl Emitter {
    fn new(condition: Option<ClassicalCondition>) -> Self {
        Self {
            condition,
            out: Vec::new(),
        }
    }

    fn gate(&mut self, gate: StandardGate, qubits: &[QubitId]) {
        let mut g = Gate::standard(gate);
        g.condition = self.condition;
        self.out.push(Instruction::gate(g, qubits.iter().copied()));
    }

    fn g1(&mut self, gate: StandardGate, q: QubitId) {
        self.gate(gate, &[q]);
    }

    fn cx(&mut self, control: QubitId, target: QubitId) {
        self.gate(StandardGate::CX, &[control, target]);
    }

    /// cx, rz(−θ/2), cx, rz(θ/2) on the target.
    fn crz(&mut self, theta: f64, control: QubitId, target: QubitId) {
        self.cx(control, target);
        self.g1(StandardGate::Rz(-theta / 2.0), target);
        self.cx(control, target);
        self.g1(StandardGate::Rz(theta / 2.0), target);
    }

    /// Exact 15-gate Toffoli over {H, CX, T, T†}.
    fn toffoli(&mut self, a: QubitId, b: QubitId, c: QubitId) {
        self.g1(StandardGate::H, c);
        self.cx(b, c);
        self.g1(StandardGate::Tdg, c);
        self.cx(a, c);
        self.g1(StandardGate::T, c);
        self.cx(b, c);
        self.g1(StandardGate::Tdg, c);
        self.cx(a, c);
        self.g1(StandardGate::T, b);
        self.g1(StandardGate::T, c);
        self.cx(a, b);
        self.g1(StandardGate::H, c);
        self.g1(StandardGate::T, a);
        self.g1(StandardGate::Tdg, b);
        self.cx(a, b);
    }

    /// Toffoli staircase computing the AND of all controls into `target`.
    ///
    /// Uses `ancillas[0..k-2]`, which start and end in |0⟩.
    fn mcx(&mut self, controls: &[QubitId], target: QubitId, ancillas: &[QubitId]) -> CompileResult<()> {
        match controls {
            [] => self.g1(StandardGate::X, target),
            [c] => self.cx(*c, target),
            [a, b] => self.toffoli(*a, *b, target),
            _ => {
                let k = controls.len();
                let nanc = k - 2;
                if ancillas.len() < nanc {
                    return Err(CompileError::PassFailed {
                        name: "BasisTranslation".into(),
                        reason: format!(
                            "mcx with {k} controls needs {nanc} ancillas, {} allocated",
                            ancillas.len()
                        ),
                    });
                }
                let anc = &ancillas[..nanc];

                self.toffoli(controls[0], controls[1], anc[0]);
                for i in 1..nanc {
                    self.toffoli(controls[1 + i], anc[i - 1], anc[i]);
                }
                self.toffoli(controls[k - 1], anc[nanc - 1], target);
                for i in (1..nanc).rev() {
                    self.toffoli(controls[1 + i], anc[i - 1], anc[i]);
                }
                self.toffoli(controls[0], controls[1], anc[0]);
            }
        }
        Ok(())
    }

    fn finish(self) -> Vec<Instruction> {
        self.out
    }
}

/// Rewrite one instruction into the fixed basis.
///
/// `ancillas` are the qubits of the `anc` register; they are only touched
/// by `mcx` gates with three or more controls.
pub fn translate_instruction(
    inst: &Instruction,
    ancillas: &[QubitId],
) -> CompileResult<Vec<Instruction>> {
    let gate = match &inst.kind {
        InstructionKind::Measure | InstructionKind::Reset | InstructionKind::Barrier => {
            return Ok(vec![inst.clone()]);
        }
        InstructionKind::Gate(gate) => gate,
    };

    let standard = match &gate.kind {
        GateKind::Standard(g) => g,
        GateKind::Custom(c) => {
            return Err(CompileError::UnsupportedGate {
                name: c.name.clone(),
            });
        }
    };

    let q = &inst.qubits;
    let mut e = Emitter::new(gate.condition);

    match standard {
        StandardGate::X
        | StandardGate::Z
        | StandardGate::H
        | StandardGate::S
        | StandardGate::Sdg
        | StandardGate::T
        | StandardGate::Tdg
        | StandardGate::Rz(_)
        | StandardGate::P(_) => e.g1(standard.clone(), q[0]),

        StandardGate::CX => e.cx(q[0], q[1]),

        // Y = iXZ; the global phase is dropped.
        StandardGate::Y => {
            e.g1(StandardGate::X, q[0]);
            e.g1(StandardGate::Z, q[0]);
        }

        StandardGate::Rx(theta) => {
            e.g1(StandardGate::H, q[0]);
            e.g1(StandardGate::Rz(*theta), q[0]);
            e.g1(StandardGate::H, q[0]);
        }

        StandardGate::Ry(theta) => {
            e.g1(StandardGate::Sdg, q[0]);
            e.g1(StandardGate::H, q[0]);
            e.g1(StandardGate::Rz(*theta), q[0]);
            e.g1(StandardGate::H, q[0]);
            e.g1(StandardGate::S, q[0]);
        }

        StandardGate::U(theta, phi, lambda) => {
            e.g1(StandardGate::Rz(*lambda), q[0]);
            e.g1(StandardGate::H, q[0]);
            e.g1(StandardGate::S, q[0]);
            e.g1(StandardGate::H, q[0]);
            e.g1(StandardGate::Rz(*theta), q[0]);
            e.g1(StandardGate::H, q[0]);
            e.g1(StandardGate::Sdg, q[0]);
            e.g1(StandardGate::H, q[0]);
            e.g1(StandardGate::Rz(*phi), q[0]);
        }

        StandardGate::CY => {
            e.g1(StandardGate::Sdg, q[1]);
            e.cx(q[0], q[1]);
            e.g1(StandardGate::S, q[1]);
        }

        StandardGate::CZ => {
            e.g1(StandardGate::H, q[1]);
            e.cx(q[0], q[1]);
            e.g1(StandardGate::H, q[1]);
        }

        StandardGate::CH => {
            for g in [
                StandardGate::Sdg,
                StandardGate::H,
                StandardGate::Tdg,
                StandardGate::H,
                StandardGate::S,
                StandardGate::H,
            ] {
                e.g1(g, q[1]);
            }
            e.cx(q[0], q[1]);
            for g in [
                StandardGate::H,
                StandardGate::Sdg,
                StandardGate::H,
                StandardGate::T,
                StandardGate::H,
                StandardGate::S,
            ] {
                e.g1(g, q[1]);
            }
        }

        StandardGate::Swap => {
            e.cx(q[0], q[1]);
            e.cx(q[1], q[0]);
            e.cx(q[0], q[1]);
        }

        StandardGate::CRz(theta) => e.crz(*theta, q[0], q[1]),

        StandardGate::CRx(theta) => {
            e.g1(StandardGate::H, q[1]);
            e.crz(*theta, q[0], q[1]);
            e.g1(StandardGate::H, q[1]);
        }

        StandardGate::CRy(theta) => {
            e.g1(StandardGate::Sdg, q[1]);
            e.g1(StandardGate::H, q[1]);
            e.crz(*theta, q[0], q[1]);
            e.g1(StandardGate::H, q[1]);
            e.g1(StandardGate::S, q[1]);
        }

        StandardGate::CP(theta) => {
            e.g1(StandardGate::P(theta / 2.0), q[0]);
            e.crz(*theta, q[0], q[1]);
        }

        StandardGate::CCX => e.toffoli(q[0], q[1], q[2]),

        StandardGate::Mcx { controls } => {
            let k = *controls as usize;
            e.mcx(&q[..k], q[k], ancillas)?;
        }
    }

    Ok(e.finish())
}
