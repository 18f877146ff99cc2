//! Every gate lowers into the fixed basis and keeps its meaning.

use std::collections::BTreeSet;

use proptest::prelude::*;

use qhe_adapter_sim::{SimulatorBackend, Statevector};
use qhe_compile::{
    CompileOptions, CompileResult, OracleCapability, RotationOracle, compile,
    translate_instruction,
};
use qhe_ir::{Circuit, ClbitId, Instruction, InstructionKind, QubitId, StandardGate};

const BASIS: &[&str] = &[
    "x", "z", "h", "s", "sdg", "t", "tdg", "cx", "rz", "p", "measure", "reset", "barrier",
];

/// Answers a fixed Clifford+T word for every angle.
#[derive(Debug)]
struct WordOracle;

impl RotationOracle for WordOracle {
    fn name(&self) -> &str {
        "word"
    }

    fn synthesize(&self, _: f64, _: Option<f64>, _: Option<u64>) -> CompileResult<String> {
        Ok("HTSSSHTX".to_string())
    }
}

/// Drive `n` qubits into a generic entangled state.
fn scrambled(n: usize, active: usize) -> Statevector {
    let mut sv = Statevector::new(n);
    for q in 0..active {
        let k = q as f64;
        sv.apply_gate(&StandardGate::Ry(0.4 + 0.7 * k), &[q]);
        sv.apply_gate(&StandardGate::Rz(0.3 + 0.5 * k), &[q]);
    }
    for q in 1..active {
        sv.apply_gate(&StandardGate::CX, &[q - 1, q]);
        sv.apply_gate(&StandardGate::Ry(0.2 * q as f64), &[q]);
    }
    sv
}

fn apply_all(sv: &mut Statevector, insts: &[Instruction]) {
    for inst in insts {
        let InstructionKind::Gate(gate) = &inst.kind else {
            panic!("unexpected non-gate {}", inst.name());
        };
        let g = gate.as_standard().expect("standard gate");
        let qubits: Vec<_> = inst.qubits.iter().map(|q| q.index()).collect();
        sv.apply_gate(g, &qubits);
    }
}

/// Compare a gate with its translation on a scrambled input.
fn assert_equivalent(gate: StandardGate, operands: usize, ancillas: usize) {
    let n = operands + ancillas;
    let qubits: Vec<_> = (0..operands as u32).map(QubitId).collect();
    let anc: Vec<_> = (operands as u32..n as u32).map(QubitId).collect();
    let inst = Instruction::gate(gate.clone(), qubits.iter().copied());

    let translated = translate_instruction(&inst, &anc).unwrap();
    for t in &translated {
        assert!(BASIS.contains(&t.name()), "{} produced {}", gate.name(), t.name());
    }

    let mut expected = scrambled(n, operands);
    expected.apply_gate(&gate, &(0..operands).collect::<Vec<_>>());

    let mut actual = scrambled(n, operands);
    apply_all(&mut actual, &translated);

    let fidelity = expected.fidelity(&actual);
    assert!(
        (fidelity - 1.0).abs() < 1e-9,
        "{} translation has fidelity {fidelity}",
        gate.name()
    );
}

// ---------------------------------------------------------------------------
// Decomposition identities
// ---------------------------------------------------------------------------

#[test]
fn test_fixed_gates_are_equivalent() {
    for gate in [
        StandardGate::X,
        StandardGate::Y,
        StandardGate::Z,
        StandardGate::H,
        StandardGate::S,
        StandardGate::Sdg,
        StandardGate::T,
        StandardGate::Tdg,
    ] {
        assert_equivalent(gate, 1, 0);
    }
    for gate in [
        StandardGate::CX,
        StandardGate::CY,
        StandardGate::CZ,
        StandardGate::CH,
        StandardGate::Swap,
    ] {
        assert_equivalent(gate, 2, 0);
    }
    assert_equivalent(StandardGate::CCX, 3, 0);
}

#[test]
fn test_mcx_staircases_are_equivalent() {
    assert_equivalent(StandardGate::Mcx { controls: 0 }, 1, 0);
    assert_equivalent(StandardGate::Mcx { controls: 1 }, 2, 0);
    assert_equivalent(StandardGate::Mcx { controls: 2 }, 3, 0);
    assert_equivalent(StandardGate::Mcx { controls: 3 }, 4, 1);
    assert_equivalent(StandardGate::Mcx { controls: 4 }, 5, 2);
    // Spare ancillas stay untouched.
    assert_equivalent(StandardGate::Mcx { controls: 3 }, 4, 3);
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn test_rotations_are_equivalent(
        theta in -7.0f64..7.0,
        phi in -7.0f64..7.0,
        lambda in -7.0f64..7.0,
    ) {
        assert_equivalent(StandardGate::Rx(theta), 1, 0);
        assert_equivalent(StandardGate::Ry(theta), 1, 0);
        assert_equivalent(StandardGate::U(theta, phi, lambda), 1, 0);
        assert_equivalent(StandardGate::CRx(theta), 2, 0);
        assert_equivalent(StandardGate::CRy(theta), 2, 0);
        assert_equivalent(StandardGate::CRz(theta), 2, 0);
        assert_equivalent(StandardGate::CP(theta), 2, 0);
    }
}

// ---------------------------------------------------------------------------
// Whole-circuit closure
// ---------------------------------------------------------------------------

fn every_gate() -> Circuit {
    let mut c = Circuit::new("all");
    let q = c.add_qreg("q", 5).unwrap();
    let m = c.add_creg("m", 2).unwrap();
    c.x(q[0]).unwrap().y(q[1]).unwrap().z(q[2]).unwrap();
    c.h(q[0]).unwrap().s(q[1]).unwrap().sdg(q[2]).unwrap();
    c.t(q[0]).unwrap().tdg(q[1]).unwrap();
    c.rx(0.1, q[0]).unwrap().ry(0.2, q[1]).unwrap().rz(0.3, q[2]).unwrap();
    c.p(0.4, q[3]).unwrap().u(0.5, 0.6, 0.7, q[4]).unwrap();
    c.cx(q[0], q[1]).unwrap().cy(q[1], q[2]).unwrap().cz(q[2], q[3]).unwrap();
    c.ch(q[3], q[4]).unwrap().swap(q[0], q[4]).unwrap();
    c.crx(0.8, q[0], q[1]).unwrap().cry(0.9, q[1], q[2]).unwrap();
    c.crz(1.0, q[2], q[3]).unwrap().cp(1.1, q[3], q[4]).unwrap();
    c.ccx(q[0], q[1], q[2]).unwrap();
    c.mcx(&q[..4], q[4]).unwrap();
    c.measure(q[0], m[0]).unwrap();
    c.gate_if(StandardGate::CY, [q[1], q[2]], m[0]).unwrap();
    c.reset(q[0]).unwrap();
    c.barrier(q.iter().copied()).unwrap();
    c.measure(q[1], m[1]).unwrap();
    c
}

#[test]
fn test_compiled_circuit_is_closed_over_basis() {
    let options = CompileOptions::new().with_oracle(OracleCapability::available(WordOracle));
    let compiled = compile(&every_gate(), &options).unwrap();

    let names: BTreeSet<_> = compiled.circuit.count_ops().into_keys().collect();
    for name in &names {
        assert!(BASIS.contains(&name.as_str()), "unexpected {name}");
    }
    assert!(!names.contains("rz") && !names.contains("p"));
    assert!(compiled.diagnostics.is_empty());
    assert_eq!(compiled.stats.rotations, 0);
    assert_eq!(compiled.stats.ancillas, 2);
    assert!(compiled.stats.synthesized > 0);
}

#[test]
fn test_conditioned_composite_stays_conditioned() {
    let options = CompileOptions::new().with_synthesize_rotations(false);
    let compiled = compile(&every_gate(), &options).unwrap();

    let conditioned: Vec<_> = compiled
        .circuit
        .instructions()
        .iter()
        .filter(|i| i.condition().is_some())
        .collect();
    assert_eq!(conditioned.len(), 3);
    assert!(conditioned
        .iter()
        .all(|i| i.condition().map(|c| c.clbit) == Some(ClbitId(0))));
}

#[test]
fn test_without_oracle_rotations_survive() {
    let options = CompileOptions::new().with_oracle(OracleCapability::detect_at("/nonexistent"));
    let compiled = compile(&every_gate(), &options).unwrap();
    assert!(compiled.stats.rotations > 0);
    assert_eq!(compiled.diagnostics.len(), 1);
}

// ---------------------------------------------------------------------------
// Execution
// ---------------------------------------------------------------------------

#[test]
fn test_compiled_toffoli_truth_table() {
    let backend = SimulatorBackend::new().with_seed(11);
    for input in 0u32..8 {
        let mut c = Circuit::with_size("ccx", 3, 3);
        for bit in 0..3 {
            if input >> bit & 1 == 1 {
                c.x(QubitId(bit)).unwrap();
            }
        }
        c.ccx(QubitId(0), QubitId(1), QubitId(2)).unwrap();
        for bit in 0..3 {
            c.measure(QubitId(bit), ClbitId(bit)).unwrap();
        }

        let compiled = compile(&c, &CompileOptions::new().with_synthesize_rotations(false)).unwrap();
        let counts = backend.run(&compiled.circuit, 16).unwrap().counts;

        let expected = if input & 0b11 == 0b11 { input ^ 0b100 } else { input };
        assert_eq!(counts.get(&format!("{expected:03b}")), 16, "input {input:03b}");
    }
}

#[test]
fn test_compiled_mcx_resets_ancillas() {
    let mut c = Circuit::new("mcx");
    let q = c.add_qreg("q", 5).unwrap();
    let out = c.add_creg("out", 5).unwrap();
    for &qb in &q[..4] {
        c.x(qb).unwrap();
    }
    c.mcx(&q[..4], q[4]).unwrap();
    c.measure_many(q.iter().copied(), out.iter().copied()).unwrap();

    let compiled = compile(&c, &CompileOptions::new().with_synthesize_rotations(false)).unwrap();
    let anc = compiled.circuit.qreg_qubits("anc").unwrap();
    assert_eq!(anc.len(), 2);

    let mut check = compiled.circuit.clone();
    let anc_bits = check.add_creg("anc_out", 2).unwrap();
    check.measure_many(anc, anc_bits).unwrap();

    let counts = SimulatorBackend::new().with_seed(5).run(&check, 16).unwrap().counts;
    assert_eq!(counts.get("00 11111"), 16);
}
