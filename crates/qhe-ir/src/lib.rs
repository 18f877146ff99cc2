//! QHE Circuit Intermediate Representation
//!
//! This crate provides the circuit data structures shared by the compiler,
//! the homomorphic builder and the simulator backend.
//!
//! # Overview
//!
//! A [`Circuit`] is an ordered list of [`Instruction`]s over named quantum
//! and classical [`Register`]s. Every appended instruction is validated
//! against a [`CircuitDag`] that also tracks wire dependencies and depth.
//! Classically conditioned gates carry a single-bit [`ClassicalCondition`];
//! the DAG treats the condition bit as one of the gate's wires.
//!
//! # Core Components
//!
//! - **Qubits and Classical Bits**: [`QubitId`], [`ClbitId`], assigned in
//!   register declaration order
//! - **Registers**: [`Register`] for `name[offset]` addressing
//! - **Gates**: [`StandardGate`], a closed vocabulary, and [`CustomGate`] for
//!   opaque operations
//! - **Instructions**: [`Instruction`] combining gates with their operands
//! - **DAG**: [`CircuitDag`] for dependency and depth queries
//!
//! # Example: Building a Bell State
//!
//! ```rust
//! use qhe_ir::{Circuit, QubitId};
//!
//! let mut circuit = Circuit::with_size("bell_state", 2, 2);
//! circuit.h(QubitId(0)).unwrap();
//! circuit.cx(QubitId(0), QubitId(1)).unwrap();
//! circuit.measure_all().unwrap();
//!
//! assert_eq!(circuit.num_qubits(), 2);
//! assert!(circuit.depth() >= 2);
//! ```
//!
//! # Supported Gates
//!
//! | Gate | Qubits | Description |
//! |------|--------|-------------|
//! | `X`, `Y`, `Z` | 1 | Pauli gates |
//! | `H`, `S`, `Sdg`, `T`, `Tdg` | 1 | Clifford+T gates |
//! | `Rx`, `Ry`, `Rz`, `P`, `U` | 1 | Rotation gates |
//! | `CX`, `CY`, `CZ`, `CH`, `Swap` | 2 | Two-qubit gates |
//! | `CRx`, `CRy`, `CRz`, `CP` | 2 | Controlled rotations |
//! | `CCX` | 3 | Toffoli gate |
//! | `Mcx` | n+1 | Multi-controlled X |

pub mod circuit;
pub mod dag;
pub mod error;
pub mod gate;
pub mod instruction;
pub mod qubit;
pub mod register;

pub use circuit::Circuit;
pub use dag::{CircuitDag, DagEdge, DagNode, NodeIndex, WireId};
pub use error::{IrError, IrResult};
pub use gate::{ClassicalCondition, CustomGate, Gate, GateKind, StandardGate};
pub use instruction::{Instruction, InstructionKind};
pub use qubit::{Clbit, ClbitId, Qubit, QubitId};
pub use register::{Register, RegisterDecl};
