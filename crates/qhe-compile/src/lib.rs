//! QHE Clifford+T Compiler
//!
//! This crate lowers circuits written over the full [`qhe_ir::StandardGate`]
//! vocabulary into the fixed basis the homomorphic protocol can track:
//! `x, z, h, s, sdg, t, tdg, cx`, plus `measure`, `reset` and `barrier`.
//!
//! # Architecture
//!
//! ```text
//! Input Circuit
//!       │
//!       ▼
//! ┌─────────────┐
//! │ PassManager │ ◄── PropertySet (error budget, ancilla placement)
//! └─────────────┘
//!       │
//!       ├── AncillaAnalysis      (widest mcx → size of `anc`)
//!       ├── BasisTranslation     (published identities, Toffoli staircase)
//!       ├── RotationCounter      (splits the circuit error budget)
//!       └── RotationSynthesis    (rz/p → Clifford+T via gridsynth)
//!       │
//!       ▼
//! Compiled { circuit, diagnostics, stats }
//! ```
//!
//! Rotation synthesis needs an external oracle. [`OracleCapability::detect`]
//! probes `~/.cqc_qhe/bin/gridsynth`; when it is missing the rotations are
//! left in place and a [`Diagnostic::OracleUnavailable`] is returned.
//!
//! # Example
//!
//! ```rust
//! use qhe_compile::{AncillaPlacement, CompileOptions, compile};
//! use qhe_ir::{Circuit, QubitId};
//!
//! let mut circuit = Circuit::with_size("mcx", 5, 0);
//! let q: Vec<_> = (0..5).map(QubitId).collect();
//! circuit.mcx(&q[..4], q[4]).unwrap();
//!
//! let options = CompileOptions::new()
//!     .with_ancilla_placement(AncillaPlacement::Top)
//!     .with_synthesize_rotations(false);
//! let compiled = compile(&circuit, &options).unwrap();
//!
//! assert_eq!(compiled.stats.ancillas, 2);
//! assert_eq!(compiled.circuit.qregs()[0].name, "anc");
//! ```
//!
//! # Custom Passes
//!
//! ```rust
//! use qhe_compile::{CompileResult, Pass, PassKind, PropertySet};
//! use qhe_ir::Circuit;
//!
//! struct CountOnly;
//!
//! impl Pass for CountOnly {
//!     fn name(&self) -> &str { "count_only" }
//!     fn kind(&self) -> PassKind { PassKind::Analysis }
//!
//!     fn run(&self, circuit: &mut Circuit, props: &mut PropertySet) -> CompileResult<()> {
//!         props.insert(circuit.count_t());
//!         Ok(())
//!     }
//! }
//! ```

pub mod compile;
pub mod error;
pub mod manager;
pub mod pass;
pub mod property;
pub mod synthesis;
pub mod unitary;

// Built-in passes
pub mod passes;

pub use compile::{CompileOptions, CompileStats, Compiled, compile};
pub use error::{CompileError, CompileResult};
pub use manager::{PassManager, PassManagerBuilder};
pub use pass::{Pass, PassKind};
pub use passes::{
    ANCILLA_REGISTER, AncillaAnalysis, BasisTranslation, RotationCounter, RotationSynthesis,
    translate_instruction,
};
pub use property::{
    AncillaPlacement, AncillaRequirement, Diagnostic, ErrorBudget, PropertySet, RotationCount,
    SynthesisReport,
};
pub use synthesis::{
    GateSequence, GridsynthOracle, OracleCapability, RotationOracle, SynthesisOptions,
};
pub use unitary::Unitary2x2;
