//! Job lifecycle types.
//!
//! ```text
//!   submit() ──→ Queued ──→ Running ──→ Completed
//!                  │           ├──→ Failed(reason)
//!                  └───────────┴──→ Cancelled
//! ```
//!
//! Terminal states are permanent; [`Job::transition`] ignores any move out
//! of them.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Unique identifier for a job.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct JobId(pub String);

impl JobId {
    /// Create a new job ID.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }
}

impl fmt::Display for JobId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for JobId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// Status of a job.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum JobStatus {
    /// Waiting to run.
    Queued,
    /// Executing.
    Running,
    /// Finished with results.
    Completed,
    /// Finished without results.
    Failed(String),
    /// Cancelled before completion.
    Cancelled,
}

impl JobStatus {
    /// Check if this is a terminal state.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            JobStatus::Completed | JobStatus::Failed(_) | JobStatus::Cancelled
        )
    }

    /// Check if the job completed successfully.
    pub fn is_success(&self) -> bool {
        matches!(self, JobStatus::Completed)
    }
}

impl fmt::Display for JobStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            JobStatus::Queued => write!(f, "Queued"),
            JobStatus::Running => write!(f, "Running"),
            JobStatus::Completed => write!(f, "Completed"),
            JobStatus::Failed(msg) => write!(f, "Failed: {msg}"),
            JobStatus::Cancelled => write!(f, "Cancelled"),
        }
    }
}

/// Bookkeeping for one submitted circuit.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Job {
    /// The job identifier.
    pub id: JobId,
    /// Current status.
    pub status: JobStatus,
    /// Number of shots requested.
    pub shots: u32,
    /// Backend the job was submitted to.
    pub backend: String,
    /// Submission time.
    pub submitted_at: DateTime<Utc>,
    /// Time a terminal state was reached.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub finished_at: Option<DateTime<Utc>>,
}

impl Job {
    /// A freshly queued job.
    pub fn new(id: JobId, shots: u32, backend: impl Into<String>) -> Self {
        Self {
            id,
            status: JobStatus::Queued,
            shots,
            backend: backend.into(),
            submitted_at: Utc::now(),
            finished_at: None,
        }
    }

    /// Move to `status` unless the job has already finished.
    ///
    /// Returns whether the status changed.
    pub fn transition(&mut self, status: JobStatus) -> bool {
        if self.status.is_terminal() {
            return false;
        }
        if status.is_terminal() {
            self.finished_at = Some(Utc::now());
        }
        self.status = status;
        true
    }
}
