//! QHE Hardware Abstraction Layer
//!
//! A small execution contract shared by the protocol crate, the CLI and the
//! simulator adapter:
//! - the async [`Backend`] trait for submitting circuits and collecting
//!   results
//! - [`Capabilities`] describing what a backend runs
//! - [`Counts`] and [`ExecutionResult`] for measured histograms
//! - the [`bitstring`] helpers that put keys into declaration order
//!
//! # Example
//!
//! ```ignore
//! use qhe_adapter_sim::SimulatorBackend;
//! use qhe_hal::run_circuit;
//! use qhe_ir::Circuit;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let backend = SimulatorBackend::new().with_seed(7);
//!     let circuit = Circuit::bell()?;
//!
//!     // Keys in declaration order, bit 0 first.
//!     let counts = run_circuit(&backend, &circuit, 1000, true).await?;
//!     println!("{counts:?}");
//!     Ok(())
//! }
//! ```

pub mod backend;
pub mod bitstring;
pub mod capability;
pub mod error;
pub mod job;
pub mod result;

pub use backend::{Backend, ValidationResult};
pub use bitstring::{last_register_counts, reverse_counts, run_circuit};
pub use capability::{Capabilities, GateSet};
pub use error::{HalError, HalResult};
pub use job::{Job, JobId, JobStatus};
pub use result::{Counts, ExecutionResult};
