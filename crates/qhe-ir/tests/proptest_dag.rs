//! Property-based tests for circuit/DAG consistency.

use proptest::prelude::*;
use qhe_ir::{Circuit, ClbitId, QubitId, StandardGate};

/// Operations a random circuit is built from.
#[derive(Debug, Clone)]
enum Op {
    H(u32),
    T(u32),
    CX(u32, u32),
    Measure(u32, u32),
    XIf(u32, u32),
    Reset(u32),
}

impl Op {
    fn apply(self, circuit: &mut Circuit) {
        let _ = match self {
            Op::H(q) => circuit.h(QubitId(q)),
            Op::T(q) => circuit.t(QubitId(q)),
            Op::CX(a, b) => circuit.cx(QubitId(a), QubitId(b)),
            Op::Measure(q, c) => circuit.measure(QubitId(q), ClbitId(c)),
            Op::XIf(q, c) => circuit.gate_if(StandardGate::X, [QubitId(q)], ClbitId(c)),
            Op::Reset(q) => circuit.reset(QubitId(q)),
        };
    }
}

fn arb_op(n: u32) -> impl Strategy<Value = Op> {
    prop_oneof![
        (0..n).prop_map(Op::H),
        (0..n).prop_map(Op::T),
        (0..n, 0..n).prop_map(|(a, b)| Op::CX(a, b)),
        (0..n, 0..n).prop_map(|(q, c)| Op::Measure(q, c)),
        (0..n, 0..n).prop_map(|(q, c)| Op::XIf(q, c)),
        (0..n).prop_map(Op::Reset),
    ]
}

fn arb_circuit() -> impl Strategy<Value = Circuit> {
    (1_u32..=5).prop_flat_map(|n| {
        prop::collection::vec(arb_op(n), 0..=30).prop_map(move |ops| {
            let mut circuit = Circuit::with_size("prop", n, n);
            for op in ops {
                op.apply(&mut circuit);
            }
            circuit
        })
    })
}

proptest! {
    #[test]
    fn dag_tracks_every_instruction(circuit in arb_circuit()) {
        prop_assert_eq!(circuit.dag().num_ops(), circuit.num_ops());
        prop_assert!(circuit.depth() <= circuit.num_ops());
        prop_assert!(circuit.dag().verify_integrity().is_ok());
    }

    #[test]
    fn topological_order_covers_all_ops(circuit in arb_circuit()) {
        let order = circuit.dag().topological_ops().unwrap();
        prop_assert_eq!(order.len(), circuit.num_ops());
    }

    #[test]
    fn json_reparse_preserves_program(circuit in arb_circuit()) {
        let parsed = Circuit::from_json(&circuit.to_json().unwrap()).unwrap();
        prop_assert_eq!(parsed.instructions(), circuit.instructions());
        prop_assert_eq!(parsed.depth(), circuit.depth());
    }
}
