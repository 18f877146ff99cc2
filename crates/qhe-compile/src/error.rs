//! Error types for the compilation crate.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur during compilation.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum CompileError {
    /// Error from the IR crate.
    #[error("IR error: {0}")]
    Ir(#[from] qhe_ir::IrError),

    /// Gate outside the translatable vocabulary.
    #[error("Wrong gate in the circuit: {name}")]
    UnsupportedGate {
        /// Name of the offending gate.
        name: String,
    },

    /// Both a circuit-level and a per-gate error budget were given.
    #[error("The declaration of both error_circuit and error_gate is ambiguous. Use only one.")]
    AmbiguousErrorBudget,

    /// Error budget that is not a positive finite number.
    #[error("Invalid error budget: {0}")]
    InvalidErrorBudget(f64),

    /// Oracle output contains a symbol outside {H, S, T, X, Z, I}.
    #[error("Wrong gate in the Rz decomposition: '{symbol}' in \"{output}\"")]
    OracleDecode {
        /// The unexpected symbol.
        symbol: char,
        /// Full oracle output.
        output: String,
    },

    /// The oracle process could not be run or exited with failure.
    #[error("Rotation oracle failed: {0}")]
    OracleFailed(String),

    /// No oracle binary at the expected location.
    #[error("Rotation oracle not installed at {}", .0.display())]
    OracleUnavailable(PathBuf),

    /// Pass execution failed.
    #[error("Pass '{name}' failed: {reason}")]
    PassFailed {
        /// Pass name.
        name: String,
        /// Failure description.
        reason: String,
    },
}

/// Result type for compilation operations.
pub type CompileResult<T> = Result<T, CompileError>;
