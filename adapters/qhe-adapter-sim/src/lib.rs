//! QHE Local Statevector Simulator
//!
//! A shot-by-shot statevector backend for running homomorphic circuits
//! locally. Unlike a sample-at-the-end simulator it replays every shot, so
//! dynamic circuits work:
//!
//! - projective mid-circuit measurement into classical memory
//! - reset
//! - gates conditioned on a classical bit
//! - every gate of the `qhe-ir` vocabulary, composites included
//!
//! Instructions before the first measurement, reset or conditioned gate
//! are simulated once and shared by every shot.
//!
//! # Performance
//!
//! | Qubits | Memory |
//! |--------|--------|
//! | 10 | ~16 KB |
//! | 16 | ~1 MB |
//! | 20 | ~16 MB |
//! | 24 | ~256 MB |
//!
//! # Example
//!
//! ```
//! use qhe_adapter_sim::SimulatorBackend;
//! use qhe_ir::Circuit;
//!
//! let backend = SimulatorBackend::new().with_seed(7);
//! let result = backend.run(&Circuit::ghz(3).unwrap(), 100).unwrap();
//! assert_eq!(result.counts.get("000") + result.counts.get("111"), 100);
//! ```

mod simulator;
mod statevector;

pub use simulator::{DEFAULT_MAX_QUBITS, SimulatorBackend};
pub use statevector::Statevector;
