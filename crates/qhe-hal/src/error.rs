//! Errors returned by backends and the job-wait loop.

use thiserror::Error;

/// Errors raised while validating, running or waiting on a job.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum HalError {
    /// The job reached the failed state.
    #[error("Job failed: {0}")]
    JobFailed(String),

    /// The job was cancelled before it finished.
    #[error("Job cancelled")]
    JobCancelled,

    /// No job with this id is known to the backend.
    #[error("Job not found: {0}")]
    JobNotFound(String),

    /// The backend cannot execute an instruction of the circuit.
    #[error("Invalid circuit: {0}")]
    InvalidCircuit(String),

    /// `wait` gave up before the job reached a terminal state.
    #[error("Timeout waiting for job {0}")]
    Timeout(String),

    /// The circuit needs more qubits than the backend has.
    #[error("Circuit exceeds backend capabilities: {0}")]
    CircuitTooLarge(String),

    /// Zero or otherwise unusable shot count.
    #[error("Invalid shots: {0}")]
    InvalidShots(String),
}

/// Result type for HAL operations.
pub type HalResult<T> = Result<T, HalError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_name_the_job() {
        assert_eq!(
            HalError::Timeout("job-7".into()).to_string(),
            "Timeout waiting for job job-7"
        );
        assert_eq!(
            HalError::JobNotFound("job-7".into()).to_string(),
            "Job not found: job-7"
        );
    }
}
