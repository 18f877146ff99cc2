//! Pauli keys and the data qubits they pad.

use rustc_hash::FxHashMap;

use qhe_ir::{Circuit, ClbitId, Instruction, IrResult, QubitId, StandardGate};

use crate::classical::InstructionSink;
use crate::error::{ProtocolError, ProtocolResult};

/// Revealed copy of the initial X pad.
pub const X_INIT_KEY: &str = "x_init_key";
/// Revealed copy of the initial Z pad.
pub const Z_INIT_KEY: &str = "z_init_key";
/// Live X key, updated as the server circuit runs.
pub const X_KEY: &str = "x_key";
/// Live Z key, updated as the server circuit runs.
pub const Z_KEY: &str = "z_key";

/// The server circuit's qubits, in key order.
///
/// Key bit `i` pads the `i`-th qubit of the server circuit. The map from
/// server qubit to key position is built once and shared by every stage.
#[derive(Debug, Clone)]
pub struct DataQubits {
    /// Qubits in the homomorphic circuit, indexed by key position.
    qubits: Vec<QubitId>,
    /// Server circuit qubit to key position.
    positions: FxHashMap<QubitId, usize>,
}

impl DataQubits {
    /// Resolve every qubit of `server` in `target` by register name and offset.
    pub fn new(server: &Circuit, target: &Circuit) -> IrResult<Self> {
        let mut qubits = Vec::with_capacity(server.num_qubits());
        let mut positions = FxHashMap::default();
        for (position, qubit) in server.qubits().iter().enumerate() {
            qubits.push(target.qubit_in(&qubit.register, qubit.index)?);
            positions.insert(qubit.id, position);
        }
        Ok(Self { qubits, positions })
    }

    /// Number of data qubits, which is also the key length.
    pub fn len(&self) -> usize {
        self.qubits.len()
    }

    /// Whether there are no data qubits.
    pub fn is_empty(&self) -> bool {
        self.qubits.is_empty()
    }

    /// Data qubits in the homomorphic circuit, in key order.
    pub fn qubits(&self) -> &[QubitId] {
        &self.qubits
    }

    /// Key position of a server circuit qubit.
    pub fn position(&self, server_qubit: QubitId) -> ProtocolResult<usize> {
        self.positions
            .get(&server_qubit)
            .copied()
            .ok_or(ProtocolError::NotADataQubit(server_qubit.0))
    }

    /// The homomorphic circuit qubit standing for a server circuit qubit.
    pub fn resolve(&self, server_qubit: QubitId) -> ProtocolResult<QubitId> {
        Ok(self.qubits[self.position(server_qubit)?])
    }
}

/// The four key registers: revealed initial pads and live keys.
#[derive(Debug, Clone)]
pub struct KeyRegisters {
    /// `x_init_key` bits.
    pub x_init: Vec<ClbitId>,
    /// `z_init_key` bits.
    pub z_init: Vec<ClbitId>,
    /// `x_key` bits.
    pub x: Vec<ClbitId>,
    /// `z_key` bits.
    pub z: Vec<ClbitId>,
}

impl KeyRegisters {
    /// Declare the key registers, each sized to the data qubit count.
    pub fn allocate(circuit: &mut Circuit, data: &DataQubits) -> IrResult<Self> {
        let n = data.len() as u32;
        Ok(Self {
            x_init: circuit.add_creg(X_INIT_KEY, n)?,
            z_init: circuit.add_creg(Z_INIT_KEY, n)?,
            x: circuit.add_creg(X_KEY, n)?,
            z: circuit.add_creg(Z_KEY, n)?,
        })
    }

    /// Key length.
    pub fn len(&self) -> usize {
        self.x.len()
    }

    /// Whether the key is empty.
    pub fn is_empty(&self) -> bool {
        self.x.is_empty()
    }

    /// Draw a uniformly random pad by measuring `|+⟩` on every data qubit.
    ///
    /// Each pad is written to both its revealed and its live copy, and the
    /// data qubits are returned to `|0⟩` afterwards.
    pub fn initialize(&self, circuit: &mut Circuit, data: &DataQubits) -> IrResult<()> {
        self.draw(circuit, data, &self.x_init, &self.x)?;
        self.draw(circuit, data, &self.z_init, &self.z)
    }

    fn draw(
        &self,
        circuit: &mut Circuit,
        data: &DataQubits,
        revealed: &[ClbitId],
        live: &[ClbitId],
    ) -> IrResult<()> {
        for &q in data.qubits() {
            circuit.h(q)?;
        }
        circuit.measure_many(data.qubits().iter().copied(), revealed.iter().copied())?;
        circuit.measure_many(data.qubits().iter().copied(), live.iter().copied())?;
        for &q in data.qubits() {
            circuit.reset(q)?;
        }
        circuit.barrier_all()?;
        Ok(())
    }

    /// Apply the one-time pad: `x` then `z` on each data qubit, each
    /// conditioned on its revealed key bit.
    pub fn encrypt(&self, out: &mut impl InstructionSink, data: &DataQubits) -> IrResult<()> {
        for (i, &q) in data.qubits().iter().enumerate() {
            out.emit(Instruction::conditional(StandardGate::X, [q], self.x_init[i]))?;
            out.emit(Instruction::conditional(StandardGate::Z, [q], self.z_init[i]))?;
        }
        Ok(())
    }
}
