//! QHE Protocol
//!
//! Builds the circuit a quantum homomorphic encryption run executes: the
//! client pads its data with a random Pauli one-time pad, the server runs
//! a fixed-basis circuit on the padded data, and classical key updates keep
//! track of how the pad evolves. T and T† go through a teleportation gadget
//! that consumes a Bell pair and adds transcript bits to the key.
//!
//! # Pipeline
//!
//! ```text
//! init circuit ─┐
//!               ├─► HomomorphicBuilder ─► HomomorphicCircuit ─► Backend
//! main circuit ─┘     (keys, rules,          { circuit,            │
//! (fixed basis)        gadget, arena)          layout }            ▼
//!                                                              Counts
//!                                                                  │
//!                             decrypt_counts(layout) ◄─────────────┘
//! ```
//!
//! The server circuit must use only `x, z, h, s, sdg, t, tdg, cx`, plus
//! `measure`, `reset` and `barrier`. Run it through `qhe_compile::compile`
//! first.
//!
//! # Policies
//!
//! [`AncillaPolicy::Shared`] reuses one Bell pair and applies each correction
//! right after its gate. [`AncillaPolicy::Fresh`] takes a new pair per T gate
//! and defers all corrections until after the final measurement.
//!
//! # Example
//!
//! ```rust
//! use qhe_hal::Counts;
//! use qhe_ir::{Circuit, QubitId};
//! use qhe_protocol::{AncillaPolicy, HomomorphicBuilder, decrypt_counts};
//!
//! let mut main = Circuit::with_size("bell", 2, 0);
//! main.h(QubitId(0)).unwrap().cx(QubitId(0), QubitId(1)).unwrap();
//!
//! let built = HomomorphicBuilder::new(AncillaPolicy::Shared)
//!     .build(&Circuit::new("init"), &main, Some(&[QubitId(0), QubitId(1)]))
//!     .unwrap();
//! assert_eq!(built.layout.x_key_field, 2);
//!
//! // One declaration-ordered outcome: x_key = 11 flips both measured bits.
//! let counts: Counts = [("00 00 11 01 00".to_string(), 1)].into_iter().collect();
//! let plain = decrypt_counts(&counts, &built.layout).unwrap();
//! assert_eq!(plain.get("11"), 1);
//! ```

pub mod allocator;
pub mod builder;
pub mod classical;
pub mod decode;
pub mod error;
pub mod gadget;
pub mod keys;
pub mod rules;

pub use allocator::{AncillaArena, AncillaPolicy, BellAllocation};
pub use builder::{CIRC_REGISTER, HomomorphicBuilder, HomomorphicCircuit, ProtocolLayout};
pub use classical::{
    InstructionSink, ScratchPair, classical_cnot, classical_reset, classical_swap,
};
pub use decode::{MAX_DISTRIBUTION_WIDTH, counts_to_probability_distribution, decrypt_counts};
pub use error::{ProtocolError, ProtocolResult};
pub use gadget::TGadget;
pub use keys::{DataQubits, KeyRegisters};
pub use rules::{GateTranslation, KeyEffect, TranslationContext, translate_gate};
