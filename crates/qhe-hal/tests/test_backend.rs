//! Backend contract tests against a scripted backend.

use std::sync::Mutex;

use async_trait::async_trait;

use qhe_hal::{
    Backend, Capabilities, Counts, ExecutionResult, HalError, HalResult, JobId, JobStatus,
    ValidationResult, run_circuit,
};
use qhe_ir::Circuit;

/// Reports the scripted statuses in order, then stays on the last one.
struct ScriptedBackend {
    capabilities: Capabilities,
    script: Mutex<Vec<JobStatus>>,
}

impl ScriptedBackend {
    fn new(mut script: Vec<JobStatus>) -> Self {
        script.reverse();
        Self {
            capabilities: Capabilities::simulator(4),
            script: Mutex::new(script),
        }
    }
}

#[async_trait]
impl Backend for ScriptedBackend {
    fn name(&self) -> &str {
        "scripted"
    }

    fn capabilities(&self) -> &Capabilities {
        &self.capabilities
    }

    async fn validate(&self, _circuit: &Circuit) -> HalResult<ValidationResult> {
        Ok(ValidationResult::Valid)
    }

    async fn submit(&self, _circuit: &Circuit, _shots: u32) -> HalResult<JobId> {
        Ok(JobId::new("job-0"))
    }

    async fn status(&self, _job_id: &JobId) -> HalResult<JobStatus> {
        let mut script = self.script.lock().unwrap();
        if script.len() > 1 {
            Ok(script.pop().unwrap())
        } else {
            Ok(script[0].clone())
        }
    }

    async fn result(&self, _job_id: &JobId) -> HalResult<ExecutionResult> {
        let mut counts = Counts::new();
        counts.insert("10 011", 6);
        counts.insert("00 011", 4);
        Ok(ExecutionResult::new(counts, 10))
    }

    async fn cancel(&self, _job_id: &JobId) -> HalResult<()> {
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// wait()
// ---------------------------------------------------------------------------

#[tokio::test(start_paused = true)]
async fn test_wait_polls_until_completed() {
    let backend = ScriptedBackend::new(vec![
        JobStatus::Queued,
        JobStatus::Running,
        JobStatus::Completed,
    ]);
    let result = backend.wait(&JobId::new("job-0")).await.unwrap();
    assert_eq!(result.shots, 10);
}

#[tokio::test(start_paused = true)]
async fn test_wait_surfaces_failure() {
    let backend = ScriptedBackend::new(vec![JobStatus::Running, JobStatus::Failed("boom".into())]);
    let err = backend.wait(&JobId::new("job-0")).await.unwrap_err();
    assert!(matches!(err, HalError::JobFailed(msg) if msg == "boom"));
}

#[tokio::test(start_paused = true)]
async fn test_wait_surfaces_cancellation() {
    let backend = ScriptedBackend::new(vec![JobStatus::Cancelled]);
    let err = backend.wait(&JobId::new("job-0")).await.unwrap_err();
    assert!(matches!(err, HalError::JobCancelled));
}

// ---------------------------------------------------------------------------
// run_circuit()
// ---------------------------------------------------------------------------

#[tokio::test(start_paused = true)]
async fn test_run_circuit_reverses_on_request() {
    let backend = ScriptedBackend::new(vec![JobStatus::Completed]);
    let circuit = Circuit::bell().unwrap();

    let raw = run_circuit(&backend, &circuit, 10, false).await.unwrap();
    assert_eq!(raw.get("10 011"), 6);

    let reversed = run_circuit(&backend, &circuit, 10, true).await.unwrap();
    assert_eq!(reversed.get("110 01"), 6);
    assert_eq!(reversed.get("110 00"), 4);
}
