//! Error types for the IR crate.

use crate::qubit::{ClbitId, QubitId};
use thiserror::Error;

/// Errors that can occur in IR operations.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum IrError {
    /// Qubit not found in circuit.
    #[error("Qubit {qubit} not found in circuit{}", format_gate_context(.gate_name))]
    QubitNotFound {
        /// The qubit that was not found.
        qubit: QubitId,
        /// Optional gate name for context.
        gate_name: Option<String>,
    },

    /// Classical bit not found in circuit.
    #[error("Classical bit {clbit} not found in circuit{}", format_gate_context(.gate_name))]
    ClbitNotFound {
        /// The classical bit that was not found.
        clbit: ClbitId,
        /// Optional gate name for context.
        gate_name: Option<String>,
    },

    /// Invalid DAG structure.
    #[error("Invalid DAG structure: {0}")]
    InvalidDag(String),

    /// Gate requires different number of qubits.
    #[error("Gate '{gate_name}' requires {expected} qubits, got {got}")]
    QubitCountMismatch {
        /// Name of the gate.
        gate_name: String,
        /// Expected number of qubits.
        expected: u32,
        /// Actual number of qubits provided.
        got: u32,
    },

    /// Duplicate qubit in operation.
    #[error("Duplicate qubit {qubit} in operation{}", format_gate_context(.gate_name))]
    DuplicateQubit {
        /// The duplicate qubit.
        qubit: QubitId,
        /// Optional gate name for context.
        gate_name: Option<String>,
    },

    /// Duplicate classical bit in operation.
    #[error("Duplicate classical bit {clbit} in operation{}", format_gate_context(.gate_name))]
    DuplicateClbit {
        /// The duplicate bit.
        clbit: ClbitId,
        /// Optional gate name for context.
        gate_name: Option<String>,
    },

    /// Measurement with mismatched operand lists.
    #[error("Measurement pairs {qubits} qubits with {clbits} classical bits")]
    MeasureArity {
        /// Number of qubits.
        qubits: usize,
        /// Number of classical bits.
        clbits: usize,
    },

    /// A register with this name already exists.
    #[error("Register '{0}' already exists")]
    DuplicateRegister(String),

    /// No register with this name.
    #[error("Register '{0}' not found")]
    RegisterNotFound(String),

    /// Offset past the end of a register.
    #[error("Index {index} out of range for register '{register}' of size {size}")]
    IndexOutOfRange {
        /// Register name.
        register: String,
        /// Requested offset.
        index: u32,
        /// Register size.
        size: u32,
    },

    /// JSON (de)serialization failure.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Helper function to format optional gate context.
#[allow(clippy::ref_option)]
fn format_gate_context(gate_name: &Option<String>) -> String {
    match gate_name {
        Some(name) => format!(" (gate: {name})"),
        None => String::new(),
    }
}

/// Result type for IR operations.
pub type IrResult<T> = Result<T, IrError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gate_context_in_message() {
        let err = IrError::QubitNotFound {
            qubit: QubitId(7),
            gate_name: Some("cx".into()),
        };
        assert_eq!(err.to_string(), "Qubit q7 not found in circuit (gate: cx)");

        let err = IrError::ClbitNotFound {
            clbit: ClbitId(1),
            gate_name: None,
        };
        assert_eq!(err.to_string(), "Classical bit c1 not found in circuit");
    }
}
