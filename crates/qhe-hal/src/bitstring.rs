//! Bit-string conventions for measured histograms.
//!
//! Backends report keys Qiskit-style: one space-separated field per
//! classical register, registers in reverse declaration order, each field
//! most significant bit first. Reversing the whole key gives declaration
//! order with bit 0 of each register first, which is what the decoder
//! reads.

use tracing::debug;

use qhe_ir::Circuit;

use crate::backend::Backend;
use crate::error::HalResult;
use crate::result::Counts;

/// Reverse every key character by character.
///
/// Counts of keys that become equal are merged.
pub fn reverse_counts(counts: &Counts) -> Counts {
    counts.map_keys(|k| k.chars().rev().collect())
}

/// Keep only the last space-separated field of every key.
pub fn last_register_counts(counts: &Counts) -> Counts {
    counts.map_keys(|k| k.rsplit(' ').next().unwrap_or(k).to_string())
}

/// Submit `circuit`, wait for it and return its histogram.
///
/// With `reverse` the keys are flipped into declaration order.
pub async fn run_circuit(
    backend: &dyn Backend,
    circuit: &Circuit,
    shots: u32,
    reverse: bool,
) -> HalResult<Counts> {
    let job_id = backend.submit(circuit, shots).await?;
    debug!("{}: job {job_id} for {}", backend.name(), circuit.name());
    let result = backend.wait(&job_id).await?;

    Ok(if reverse {
        reverse_counts(&result.counts)
    } else {
        result.counts
    })
}
