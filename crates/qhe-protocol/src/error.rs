//! Error types for the protocol crate.

use qhe_ir::IrError;
use thiserror::Error;

/// Errors that can occur while building or decoding a homomorphic circuit.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ProtocolError {
    /// The server circuit holds a gate the key rules cannot track.
    #[error("Gate '{name}' is not supported by the homomorphic protocol; compile the circuit first")]
    UnsupportedGate {
        /// Name of the offending gate.
        name: String,
    },

    /// The server circuit has no qubits.
    #[error("Server circuit has no qubits")]
    EmptyCircuit,

    /// A register the operation relies on is missing, such as an init
    /// register the server circuit lacks.
    #[error("Register '{0}' does not exist in the target circuit")]
    UnknownRegister(String),

    /// A qubit outside the server circuit was named.
    #[error("Qubit {0} is not a data qubit of the server circuit")]
    NotADataQubit(u32),

    /// A counts key does not match the circuit layout.
    #[error("Malformed outcome '{outcome}': {reason}")]
    MalformedOutcome {
        /// The counts key as received.
        outcome: String,
        /// What is wrong with it.
        reason: String,
    },

    /// Decrypted distribution requested for no outcomes.
    #[error("Cannot build a probability distribution from empty counts")]
    EmptyCounts,

    /// IR invariant violated.
    #[error("IR error: {0}")]
    Ir(#[from] IrError),
}

/// Result type for protocol operations.
pub type ProtocolResult<T> = Result<T, ProtocolError>;

impl ProtocolError {
    pub(crate) fn malformed(outcome: &str, reason: impl Into<String>) -> Self {
        Self::MalformedOutcome {
            outcome: outcome.to_string(),
            reason: reason.into(),
        }
    }
}
