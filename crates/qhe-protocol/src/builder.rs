//! Homomorphic circuit assembly.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument};

use qhe_ir::{Circuit, ClbitId, Instruction, QubitId};

use crate::allocator::{AncillaArena, AncillaPolicy};
use crate::error::{ProtocolError, ProtocolResult};
use crate::keys::{DataQubits, KeyRegisters, X_KEY};
use crate::rules::{KeyEffect, TranslationContext, translate_gate};

/// Register receiving the final measurement of the requested qubits.
pub const CIRC_REGISTER: &str = "circ";

/// Where the decoder finds things in a homomorphic circuit's outcomes.
///
/// Field indices count classical registers in declaration order, skipping
/// empty registers, which matches a histogram key split on spaces after
/// [`reverse_counts`](qhe_hal::reverse_counts).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProtocolLayout {
    /// Policy the circuit was built with.
    pub policy: AncillaPolicy,
    /// Number of data qubits, which is the key length.
    pub data_qubits: usize,
    /// T/T† occurrences in the server circuit.
    pub t_count: usize,
    /// Non-empty classical registers in declaration order.
    pub fields: Vec<String>,
    /// Field index of `x_key`.
    pub x_key_field: usize,
    /// Field index of `circ`, when a final measurement was requested.
    pub circ_field: Option<usize>,
    /// Key position of each measured qubit, in `circ` bit order.
    pub measured_positions: Vec<usize>,
}

/// A built homomorphic circuit and its decoding layout.
#[derive(Debug, Clone)]
pub struct HomomorphicCircuit {
    /// The circuit to run.
    pub circuit: Circuit,
    /// How to read its outcomes.
    pub layout: ProtocolLayout,
}

/// Builds the circuit that runs a server computation on padded client data.
///
/// The result contains, in order:
///
/// 1. random pad generation into the four key registers;
/// 2. the client's preparation circuit;
/// 3. the pad itself;
/// 4. the server circuit with key updates and T gadgets;
/// 5. an optional final measurement into `circ`.
///
/// # Example
///
/// ```rust
/// use qhe_ir::{Circuit, QubitId};
/// use qhe_protocol::{AncillaPolicy, HomomorphicBuilder};
///
/// let mut init = Circuit::with_size("init", 1, 0);
/// init.h(QubitId(0)).unwrap();
///
/// let mut main = Circuit::with_size("main", 1, 0);
/// main.t(QubitId(0)).unwrap().h(QubitId(0)).unwrap();
///
/// let built = HomomorphicBuilder::new(AncillaPolicy::Fresh)
///     .build(&init, &main, Some(&[QubitId(0)]))
///     .unwrap();
///
/// assert_eq!(built.layout.t_count, 1);
/// assert!(built.circuit.qreg("bell_0").is_some());
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct HomomorphicBuilder {
    policy: AncillaPolicy,
}

impl HomomorphicBuilder {
    /// Create a builder with the given Bell-pair policy.
    pub fn new(policy: AncillaPolicy) -> Self {
        Self { policy }
    }

    /// The Bell-pair policy.
    pub fn policy(&self) -> AncillaPolicy {
        self.policy
    }

    /// Assemble the homomorphic circuit.
    ///
    /// `main` must already be in the fixed basis. `init` may only use
    /// registers that `main` declares. `measured_qubits` are qubits of
    /// `main`; when given, they are measured into `circ` at the end.
    #[instrument(skip_all, fields(policy = %self.policy, server = %main.name()))]
    pub fn build(
        &self,
        init: &Circuit,
        main: &Circuit,
        measured_qubits: Option<&[QubitId]>,
    ) -> ProtocolResult<HomomorphicCircuit> {
        if main.num_qubits() == 0 {
            return Err(ProtocolError::EmptyCircuit);
        }

        let mut circuit = Circuit::new(format!("{}_qhe", main.name()));
        for reg in main.qregs() {
            circuit.add_qreg(reg.name.clone(), reg.size)?;
        }
        let data = DataQubits::new(main, &circuit)?;

        let effects = main
            .instructions()
            .iter()
            .map(|inst| KeyEffect::of(inst, &data))
            .collect::<ProtocolResult<Vec<_>>>()?;
        let t_count = effects.iter().filter(|e| e.is_teleport()).count();

        let keys = KeyRegisters::allocate(&mut circuit, &data)?;
        let bells = AncillaArena::new(self.policy).allocate(&mut circuit, t_count)?;
        for reg in main.cregs() {
            circuit.add_creg(reg.name.clone(), reg.size)?;
        }

        let mut clbits = FxHashMap::default();
        for bit in main.clbits() {
            clbits.insert(bit.id, circuit.clbit_in(&bit.register, bit.index)?);
        }
        let fence: Vec<QubitId> = circuit.qubits().iter().map(|q| q.id).collect();

        info!(
            "building homomorphic circuit: {} data qubit(s), {} instruction(s), {t_count} T gate(s)",
            data.len(),
            main.num_ops()
        );

        keys.initialize(&mut circuit, &data)?;

        splice(&mut circuit, init, main)?;
        circuit.barrier_all()?;

        keys.encrypt(&mut circuit, &data)?;
        circuit.barrier_all()?;

        let mut ctx = TranslationContext::new(&data, &keys, &bells, clbits, fence);
        let mut deferred: Vec<Instruction> = vec![];
        for inst in main.instructions() {
            let translation = translate_gate(inst, &mut ctx)?;
            circuit.extend(translation.server)?;
            match self.policy {
                AncillaPolicy::Shared => circuit.extend(translation.correction)?,
                AncillaPolicy::Fresh => deferred.extend(translation.correction),
            }
        }
        debug!(
            "replayed server circuit, {} gadget slot(s) used, {} deferred instruction(s)",
            ctx.slots_used(),
            deferred.len()
        );

        let mut measured_positions = vec![];
        if let Some(qubits) = measured_qubits.filter(|q| !q.is_empty()) {
            let targets = qubits
                .iter()
                .map(|&q| data.resolve(q))
                .collect::<ProtocolResult<Vec<_>>>()?;
            measured_positions = qubits
                .iter()
                .map(|&q| data.position(q))
                .collect::<ProtocolResult<Vec<_>>>()?;

            let bits = circuit.add_creg(CIRC_REGISTER, qubits.len() as u32)?;
            circuit.barrier_all()?;
            circuit.measure_many(targets, bits)?;
        }

        circuit.extend(deferred)?;

        let layout = layout_of(&circuit, self.policy, data.len(), t_count, measured_positions)?;
        info!(
            "homomorphic circuit ready: {} qubit(s), {} clbit(s), {} op(s)",
            circuit.num_qubits(),
            circuit.num_clbits(),
            circuit.num_ops()
        );

        Ok(HomomorphicCircuit { circuit, layout })
    }
}

/// Copy `init` into `circuit`, resolving operands by register name and offset.
fn splice(circuit: &mut Circuit, init: &Circuit, main: &Circuit) -> ProtocolResult<()> {
    let mut qubits: FxHashMap<QubitId, QubitId> = FxHashMap::default();
    for q in init.qubits() {
        if main.qreg(&q.register).is_none() {
            return Err(ProtocolError::UnknownRegister(q.register.clone()));
        }
        qubits.insert(q.id, circuit.qubit_in(&q.register, q.index)?);
    }
    let mut clbits: FxHashMap<ClbitId, ClbitId> = FxHashMap::default();
    for c in init.clbits() {
        if main.creg(&c.register).is_none() {
            return Err(ProtocolError::UnknownRegister(c.register.clone()));
        }
        clbits.insert(c.id, circuit.clbit_in(&c.register, c.index)?);
    }

    for inst in init.instructions() {
        circuit.push(inst.remap(|q| qubits[&q], |c| clbits[&c]))?;
    }
    Ok(())
}

fn layout_of(
    circuit: &Circuit,
    policy: AncillaPolicy,
    data_qubits: usize,
    t_count: usize,
    measured_positions: Vec<usize>,
) -> ProtocolResult<ProtocolLayout> {
    let fields: Vec<String> = circuit
        .cregs()
        .iter()
        .filter(|r| !r.is_empty())
        .map(|r| r.name.clone())
        .collect();
    let field = |name: &str| {
        fields
            .iter()
            .position(|f| f == name)
            .ok_or_else(|| ProtocolError::UnknownRegister(name.to_string()))
    };

    let x_key_field = field(X_KEY)?;
    let circ_field = if measured_positions.is_empty() {
        None
    } else {
        Some(field(CIRC_REGISTER)?)
    };

    Ok(ProtocolLayout {
        policy,
        data_qubits,
        t_count,
        x_key_field,
        circ_field,
        measured_positions,
        fields,
    })
}
