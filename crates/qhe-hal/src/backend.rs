//! Backend trait.
//!
//! ```text
//!   capabilities() ──→ validate() ──→ submit() ──→ status() ──→ result()
//!    (sync, &ref)       (async)       (async)      (async)      (async)
//! ```

use std::time::Duration;

use async_trait::async_trait;

use qhe_ir::Circuit;

use crate::capability::Capabilities;
use crate::error::{HalError, HalResult};
use crate::job::{JobId, JobStatus};
use crate::result::ExecutionResult;

/// Trait for execution backends.
///
/// - `capabilities()` is synchronous and infallible; implementations cache
///   it at construction time.
/// - `submit()` returns a job that starts in `Queued` (or later) status.
/// - `result()` is only meaningful once `status()` is `Completed`.
/// - `wait()` polls every 50 ms for up to five minutes.
#[async_trait]
pub trait Backend: Send + Sync {
    /// Get the name of this backend.
    fn name(&self) -> &str;

    /// Get the capabilities of this backend.
    fn capabilities(&self) -> &Capabilities;

    /// Check a circuit against the backend's limits.
    async fn validate(&self, circuit: &Circuit) -> HalResult<ValidationResult>;

    /// Submit a circuit for `shots` executions.
    async fn submit(&self, circuit: &Circuit, shots: u32) -> HalResult<JobId>;

    /// Get the status of a job.
    async fn status(&self, job_id: &JobId) -> HalResult<JobStatus>;

    /// Get the result of a completed job.
    async fn result(&self, job_id: &JobId) -> HalResult<ExecutionResult>;

    /// Cancel a job that has not finished.
    async fn cancel(&self, job_id: &JobId) -> HalResult<()>;

    /// Wait for a job to complete and return its result.
    async fn wait(&self, job_id: &JobId) -> HalResult<ExecutionResult> {
        let poll_interval = Duration::from_millis(50);
        let max_polls = 6_000;

        for _ in 0..max_polls {
            match self.status(job_id).await? {
                JobStatus::Completed => return self.result(job_id).await,
                JobStatus::Failed(msg) => return Err(HalError::JobFailed(msg)),
                JobStatus::Cancelled => return Err(HalError::JobCancelled),
                JobStatus::Queued | JobStatus::Running => {
                    tokio::time::sleep(poll_interval).await;
                }
            }
        }

        Err(HalError::Timeout(job_id.0.clone()))
    }
}

/// Result of circuit validation against backend constraints.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationResult {
    /// Circuit can be submitted as-is.
    Valid,
    /// Circuit cannot run on this backend.
    Invalid {
        /// Reasons the circuit is invalid.
        reasons: Vec<String>,
    },
}

impl ValidationResult {
    /// Check if the circuit is valid.
    pub fn is_valid(&self) -> bool {
        matches!(self, ValidationResult::Valid)
    }
}
