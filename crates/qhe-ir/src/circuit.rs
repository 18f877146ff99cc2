//! High-level circuit builder API.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::dag::CircuitDag;
use crate::error::{IrError, IrResult};
use crate::gate::{Gate, StandardGate};
use crate::instruction::Instruction;
use crate::qubit::{Clbit, ClbitId, Qubit, QubitId};
use crate::register::{Register, RegisterDecl};

/// A quantum circuit over named registers.
///
/// Instructions are kept in program order alongside a [`CircuitDag`] that
/// validates every appended instruction and answers dependency and depth
/// queries. Qubits and classical bits are addressed either by flat id or by
/// register name plus offset.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(try_from = "CircuitRepr", into = "CircuitRepr")]
pub struct Circuit {
    name: String,
    qubits: Vec<Qubit>,
    clbits: Vec<Clbit>,
    qregs: Vec<Register>,
    cregs: Vec<Register>,
    instructions: Vec<Instruction>,
    dag: CircuitDag,
}

impl Circuit {
    /// Create a new empty circuit.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            qubits: vec![],
            clbits: vec![],
            qregs: vec![],
            cregs: vec![],
            instructions: vec![],
            dag: CircuitDag::new(),
        }
    }

    /// Create a circuit with a quantum register `q` and a classical register `c`.
    ///
    /// Zero-sized registers are not declared.
    pub fn with_size(name: impl Into<String>, num_qubits: u32, num_clbits: u32) -> Self {
        let mut circuit = Self::new(name);
        if num_qubits > 0 {
            circuit.push_qreg("q", num_qubits);
        }
        if num_clbits > 0 {
            circuit.push_creg("c", num_clbits);
        }
        circuit
    }

    fn push_qreg(&mut self, name: &str, size: u32) -> Vec<QubitId> {
        let start = self.qubits.len() as u32;
        let ids: Vec<_> = (0..size).map(|i| QubitId(start + i)).collect();
        for (i, &id) in ids.iter().enumerate() {
            self.qubits.push(Qubit::new(id, name, i as u32));
            self.dag.add_qubit(id);
        }
        self.qregs.push(Register::new(name, start, size));
        ids
    }

    fn push_creg(&mut self, name: &str, size: u32) -> Vec<ClbitId> {
        let start = self.clbits.len() as u32;
        let ids: Vec<_> = (0..size).map(|i| ClbitId(start + i)).collect();
        for (i, &id) in ids.iter().enumerate() {
            self.clbits.push(Clbit::new(id, name, i as u32));
            self.dag.add_clbit(id);
        }
        self.cregs.push(Register::new(name, start, size));
        ids
    }

    /// Add a quantum register. Names must be unique among quantum registers.
    pub fn add_qreg(&mut self, name: impl Into<String>, size: u32) -> IrResult<Vec<QubitId>> {
        let name = name.into();
        if self.qreg(&name).is_some() {
            return Err(IrError::DuplicateRegister(name));
        }
        Ok(self.push_qreg(&name, size))
    }

    /// Add a classical register. Names must be unique among classical registers.
    pub fn add_creg(&mut self, name: impl Into<String>, size: u32) -> IrResult<Vec<ClbitId>> {
        let name = name.into();
        if self.creg(&name).is_some() {
            return Err(IrError::DuplicateRegister(name));
        }
        Ok(self.push_creg(&name, size))
    }

    // =========================================================================
    // Register addressing
    // =========================================================================

    /// Look up a quantum register by name.
    pub fn qreg(&self, name: &str) -> Option<&Register> {
        self.qregs.iter().find(|r| r.name == name)
    }

    /// Look up a classical register by name.
    pub fn creg(&self, name: &str) -> Option<&Register> {
        self.cregs.iter().find(|r| r.name == name)
    }

    /// Quantum registers in declaration order.
    pub fn qregs(&self) -> &[Register] {
        &self.qregs
    }

    /// Classical registers in declaration order.
    pub fn cregs(&self) -> &[Register] {
        &self.cregs
    }

    /// Resolve `name[index]` to a qubit.
    pub fn qubit_in(&self, name: &str, index: u32) -> IrResult<QubitId> {
        let reg = self
            .qreg(name)
            .ok_or_else(|| IrError::RegisterNotFound(name.to_string()))?;
        reg.at(index)
            .map(QubitId)
            .ok_or_else(|| IrError::IndexOutOfRange {
                register: name.to_string(),
                index,
                size: reg.size,
            })
    }

    /// Resolve `name[index]` to a classical bit.
    pub fn clbit_in(&self, name: &str, index: u32) -> IrResult<ClbitId> {
        let reg = self
            .creg(name)
            .ok_or_else(|| IrError::RegisterNotFound(name.to_string()))?;
        reg.at(index)
            .map(ClbitId)
            .ok_or_else(|| IrError::IndexOutOfRange {
                register: name.to_string(),
                index,
                size: reg.size,
            })
    }

    /// All qubits of the named register.
    pub fn qreg_qubits(&self, name: &str) -> IrResult<Vec<QubitId>> {
        self.qreg(name)
            .map(|r| r.ids().map(QubitId).collect())
            .ok_or_else(|| IrError::RegisterNotFound(name.to_string()))
    }

    /// All bits of the named classical register.
    pub fn creg_clbits(&self, name: &str) -> IrResult<Vec<ClbitId>> {
        self.creg(name)
            .map(|r| r.ids().map(ClbitId).collect())
            .ok_or_else(|| IrError::RegisterNotFound(name.to_string()))
    }

    /// Register membership of a qubit.
    pub fn qubit(&self, id: QubitId) -> Option<&Qubit> {
        self.qubits.get(id.index())
    }

    /// Register membership of a classical bit.
    pub fn clbit(&self, id: ClbitId) -> Option<&Clbit> {
        self.clbits.get(id.index())
    }

    // =========================================================================
    // Appending
    // =========================================================================

    /// Append an instruction after validating it against the circuit's wires.
    pub fn push(&mut self, instruction: Instruction) -> IrResult<&mut Self> {
        self.dag.apply(instruction.clone())?;
        self.instructions.push(instruction);
        Ok(self)
    }

    /// Append a sequence of instructions, stopping at the first invalid one.
    pub fn extend(&mut self, instructions: impl IntoIterator<Item = Instruction>) -> IrResult<()> {
        for inst in instructions {
            self.push(inst)?;
        }
        Ok(())
    }

    fn apply1(&mut self, gate: StandardGate, qubit: QubitId) -> IrResult<&mut Self> {
        self.push(Instruction::single_qubit_gate(gate, qubit))
    }

    fn apply2(&mut self, gate: StandardGate, a: QubitId, b: QubitId) -> IrResult<&mut Self> {
        self.push(Instruction::two_qubit_gate(gate, a, b))
    }

    // =========================================================================
    // Single-qubit gates
    // =========================================================================

    /// Apply Hadamard gate.
    pub fn h(&mut self, qubit: QubitId) -> IrResult<&mut Self> {
        self.apply1(StandardGate::H, qubit)
    }

    /// Apply Pauli-X gate.
    pub fn x(&mut self, qubit: QubitId) -> IrResult<&mut Self> {
        self.apply1(StandardGate::X, qubit)
    }

    /// Apply Pauli-Y gate.
    pub fn y(&mut self, qubit: QubitId) -> IrResult<&mut Self> {
        self.apply1(StandardGate::Y, qubit)
    }

    /// Apply Pauli-Z gate.
    pub fn z(&mut self, qubit: QubitId) -> IrResult<&mut Self> {
        self.apply1(StandardGate::Z, qubit)
    }

    /// Apply S gate.
    pub fn s(&mut self, qubit: QubitId) -> IrResult<&mut Self> {
        self.apply1(StandardGate::S, qubit)
    }

    /// Apply S-dagger gate.
    pub fn sdg(&mut self, qubit: QubitId) -> IrResult<&mut Self> {
        self.apply1(StandardGate::Sdg, qubit)
    }

    /// Apply T gate.
    pub fn t(&mut self, qubit: QubitId) -> IrResult<&mut Self> {
        self.apply1(StandardGate::T, qubit)
    }

    /// Apply T-dagger gate.
    pub fn tdg(&mut self, qubit: QubitId) -> IrResult<&mut Self> {
        self.apply1(StandardGate::Tdg, qubit)
    }

    /// Apply Rx rotation gate.
    pub fn rx(&mut self, theta: f64, qubit: QubitId) -> IrResult<&mut Self> {
        self.apply1(StandardGate::Rx(theta), qubit)
    }

    /// Apply Ry rotation gate.
    pub fn ry(&mut self, theta: f64, qubit: QubitId) -> IrResult<&mut Self> {
        self.apply1(StandardGate::Ry(theta), qubit)
    }

    /// Apply Rz rotation gate.
    pub fn rz(&mut self, theta: f64, qubit: QubitId) -> IrResult<&mut Self> {
        self.apply1(StandardGate::Rz(theta), qubit)
    }

    /// Apply phase gate.
    pub fn p(&mut self, theta: f64, qubit: QubitId) -> IrResult<&mut Self> {
        self.apply1(StandardGate::P(theta), qubit)
    }

    /// Apply U(θ, φ, λ) gate.
    pub fn u(&mut self, theta: f64, phi: f64, lambda: f64, qubit: QubitId) -> IrResult<&mut Self> {
        self.apply1(StandardGate::U(theta, phi, lambda), qubit)
    }

    // =========================================================================
    // Multi-qubit gates
    // =========================================================================

    /// Apply CNOT gate.
    pub fn cx(&mut self, control: QubitId, target: QubitId) -> IrResult<&mut Self> {
        self.apply2(StandardGate::CX, control, target)
    }

    /// Apply controlled-Y gate.
    pub fn cy(&mut self, control: QubitId, target: QubitId) -> IrResult<&mut Self> {
        self.apply2(StandardGate::CY, control, target)
    }

    /// Apply controlled-Z gate.
    pub fn cz(&mut self, control: QubitId, target: QubitId) -> IrResult<&mut Self> {
        self.apply2(StandardGate::CZ, control, target)
    }

    /// Apply controlled-Hadamard gate.
    pub fn ch(&mut self, control: QubitId, target: QubitId) -> IrResult<&mut Self> {
        self.apply2(StandardGate::CH, control, target)
    }

    /// Apply SWAP gate.
    pub fn swap(&mut self, q1: QubitId, q2: QubitId) -> IrResult<&mut Self> {
        self.apply2(StandardGate::Swap, q1, q2)
    }

    /// Apply controlled-Rx gate.
    pub fn crx(&mut self, theta: f64, control: QubitId, target: QubitId) -> IrResult<&mut Self> {
        self.apply2(StandardGate::CRx(theta), control, target)
    }

    /// Apply controlled-Ry gate.
    pub fn cry(&mut self, theta: f64, control: QubitId, target: QubitId) -> IrResult<&mut Self> {
        self.apply2(StandardGate::CRy(theta), control, target)
    }

    /// Apply controlled-Rz gate.
    pub fn crz(&mut self, theta: f64, control: QubitId, target: QubitId) -> IrResult<&mut Self> {
        self.apply2(StandardGate::CRz(theta), control, target)
    }

    /// Apply controlled-phase gate.
    pub fn cp(&mut self, theta: f64, control: QubitId, target: QubitId) -> IrResult<&mut Self> {
        self.apply2(StandardGate::CP(theta), control, target)
    }

    /// Apply Toffoli gate.
    pub fn ccx(&mut self, c1: QubitId, c2: QubitId, target: QubitId) -> IrResult<&mut Self> {
        self.push(Instruction::gate(StandardGate::CCX, [c1, c2, target]))
    }

    /// Apply multi-controlled X gate.
    #[allow(clippy::cast_possible_truncation)]
    pub fn mcx(&mut self, controls: &[QubitId], target: QubitId) -> IrResult<&mut Self> {
        let gate = StandardGate::Mcx {
            controls: controls.len() as u32,
        };
        let qubits = controls.iter().copied().chain(std::iter::once(target));
        self.push(Instruction::gate(gate, qubits))
    }

    // =========================================================================
    // Other operations
    // =========================================================================

    /// Apply an arbitrary gate.
    pub fn gate(
        &mut self,
        gate: impl Into<Gate>,
        qubits: impl IntoIterator<Item = QubitId>,
    ) -> IrResult<&mut Self> {
        self.push(Instruction::gate(gate, qubits))
    }

    /// Apply a standard gate only when `clbit` reads 1.
    pub fn gate_if(
        &mut self,
        gate: StandardGate,
        qubits: impl IntoIterator<Item = QubitId>,
        clbit: ClbitId,
    ) -> IrResult<&mut Self> {
        self.push(Instruction::conditional(gate, qubits, clbit))
    }

    /// Measure a qubit to a classical bit.
    pub fn measure(&mut self, qubit: QubitId, clbit: ClbitId) -> IrResult<&mut Self> {
        self.push(Instruction::measure(qubit, clbit))
    }

    /// Measure qubits pairwise into classical bits.
    pub fn measure_many(
        &mut self,
        qubits: impl IntoIterator<Item = QubitId>,
        clbits: impl IntoIterator<Item = ClbitId>,
    ) -> IrResult<&mut Self> {
        self.push(Instruction::measure_many(qubits, clbits)?)
    }

    /// Measure every qubit into a new `meas` register.
    pub fn measure_all(&mut self) -> IrResult<&mut Self> {
        let qubits: Vec<_> = self.qubits.iter().map(|q| q.id).collect();
        let clbits = self.add_creg("meas", qubits.len() as u32)?;
        self.barrier(qubits.iter().copied())?;
        self.measure_many(qubits, clbits)
    }

    /// Reset a qubit to |0⟩.
    pub fn reset(&mut self, qubit: QubitId) -> IrResult<&mut Self> {
        self.push(Instruction::reset(qubit))
    }

    /// Apply a barrier to specified qubits.
    pub fn barrier(&mut self, qubits: impl IntoIterator<Item = QubitId>) -> IrResult<&mut Self> {
        self.push(Instruction::barrier(qubits))
    }

    /// Apply a barrier to all qubits.
    pub fn barrier_all(&mut self) -> IrResult<&mut Self> {
        let qubits: Vec<_> = self.qubits.iter().map(|q| q.id).collect();
        self.barrier(qubits)
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    /// Get the circuit name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Rename the circuit.
    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    /// Get the number of qubits.
    pub fn num_qubits(&self) -> usize {
        self.qubits.len()
    }

    /// Get the number of classical bits.
    pub fn num_clbits(&self) -> usize {
        self.clbits.len()
    }

    /// Get the number of instructions.
    pub fn num_ops(&self) -> usize {
        self.instructions.len()
    }

    /// Whether the circuit has no instructions.
    pub fn is_empty(&self) -> bool {
        self.instructions.is_empty()
    }

    /// Get the circuit depth.
    pub fn depth(&self) -> usize {
        self.dag.depth()
    }

    /// Instructions in program order.
    pub fn instructions(&self) -> &[Instruction] {
        &self.instructions
    }

    /// Get a reference to the dependency DAG.
    pub fn dag(&self) -> &CircuitDag {
        &self.dag
    }

    /// Get the qubits in the circuit.
    pub fn qubits(&self) -> &[Qubit] {
        &self.qubits
    }

    /// Get the classical bits in the circuit.
    pub fn clbits(&self) -> &[Clbit] {
        &self.clbits
    }

    /// A circuit with the same registers and no instructions.
    pub fn empty_like(&self) -> Self {
        let mut out = Self::new(self.name.clone());
        for reg in &self.qregs {
            out.push_qreg(&reg.name, reg.size);
        }
        for reg in &self.cregs {
            out.push_creg(&reg.name, reg.size);
        }
        out
    }

    /// Instruction counts keyed by name.
    pub fn count_ops(&self) -> BTreeMap<String, usize> {
        let mut counts = BTreeMap::new();
        for inst in &self.instructions {
            *counts.entry(inst.name().to_string()).or_insert(0) += 1;
        }
        counts
    }

    /// Number of instructions whose name is in `names`.
    pub fn count_gates(&self, names: &[&str]) -> usize {
        self.instructions
            .iter()
            .filter(|inst| names.contains(&inst.name()))
            .count()
    }

    /// Number of T and T† gates.
    pub fn count_t(&self) -> usize {
        self.count_gates(&["t", "tdg"])
    }

    /// Parse a circuit from its JSON form.
    pub fn from_json(json: &str) -> IrResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Serialize the circuit to pretty-printed JSON.
    pub fn to_json(&self) -> IrResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    // =========================================================================
    // Pre-built circuits
    // =========================================================================

    /// Create a Bell state circuit.
    pub fn bell() -> IrResult<Self> {
        let mut circuit = Self::with_size("bell", 2, 2);
        let q0 = QubitId(0);
        let q1 = QubitId(1);

        circuit
            .h(q0)?
            .cx(q0, q1)?
            .measure(q0, ClbitId(0))?
            .measure(q1, ClbitId(1))?;

        Ok(circuit)
    }

    /// Create a GHZ state circuit.
    pub fn ghz(n: u32) -> IrResult<Self> {
        if n == 0 {
            return Ok(Self::new("ghz_0"));
        }

        let mut circuit = Self::with_size("ghz", n, n);
        circuit.h(QubitId(0))?;
        for i in 0..n - 1 {
            circuit.cx(QubitId(i), QubitId(i + 1))?;
        }
        for i in 0..n {
            circuit.measure(QubitId(i), ClbitId(i))?;
        }

        Ok(circuit)
    }
}

/// Serialized form of a [`Circuit`].
#[derive(Debug, Clone, Serialize, Deserialize)]
struct CircuitRepr {
    name: String,
    #[serde(default)]
    qregs: Vec<RegisterDecl>,
    #[serde(default)]
    cregs: Vec<RegisterDecl>,
    #[serde(default)]
    instructions: Vec<Instruction>,
}

impl From<Circuit> for CircuitRepr {
    fn from(circuit: Circuit) -> Self {
        Self {
            qregs: circuit.qregs.iter().map(RegisterDecl::from).collect(),
            cregs: circuit.cregs.iter().map(RegisterDecl::from).collect(),
            name: circuit.name,
            instructions: circuit.instructions,
        }
    }
}

impl TryFrom<CircuitRepr> for Circuit {
    type Error = IrError;

    fn try_from(repr: CircuitRepr) -> IrResult<Self> {
        let mut circuit = Circuit::new(repr.name);
        for reg in repr.qregs {
            circuit.add_qreg(reg.name, reg.size)?;
        }
        for reg in repr.cregs {
            circuit.add_creg(reg.name, reg.size)?;
        }
        circuit.extend(repr.instructions)?;
        Ok(circuit)
    }
}
