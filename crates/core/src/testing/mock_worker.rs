//! Mock worker for testing.

use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;

use crate::worker::{Worker, WorkerError, WorkerJob, WorkerOutcome};

/// Mock implementation of the Worker trait.
///
/// Records every job it receives. On success it creates the job's output
/// file (when one is requested) so the upload step has something to read.
pub struct MockWorker {
    /// Recorded run calls.
    jobs: Arc<RwLock<Vec<WorkerJob>>>,
    /// Exit code for subsequent runs; nonzero turns into an error.
    exit_code: Arc<RwLock<i32>>,
    /// Simulated run duration.
    run_duration: Arc<RwLock<Duration>>,
}

impl Default for MockWorker {
    fn default() -> Self {
        Self::new()
    }
}

impl MockWorker {
    /// Create a new mock worker that always succeeds instantly.
    pub fn new() -> Self {
        Self {
            jobs: Arc::new(RwLock::new(Vec::new())),
            exit_code: Arc::new(RwLock::new(0)),
            run_duration: Arc::new(RwLock::new(Duration::ZERO)),
        }
    }

    /// Set the exit code for subsequent runs.
    pub async fn set_exit_code(&self, code: i32) {
        *self.exit_code.write().await = code;
    }

    /// Set a simulated run duration.
    pub async fn set_run_duration(&self, duration: Duration) {
        *self.run_duration.write().await = duration;
    }

    /// Get all recorded run calls.
    pub async fn recorded_jobs(&self) -> Vec<WorkerJob> {
        self.jobs.read().await.clone()
    }
}

#[async_trait]
impl Worker for MockWorker {
    fn name(&self) -> &str {
        "mock"
    }

    async fn run(&self, job: WorkerJob) -> Result<WorkerOutcome, WorkerError> {
        self.jobs.write().await.push(job.clone());

        let duration = *self.run_duration.read().await;
        if !duration.is_zero() {
            tokio::time::sleep(duration).await;
        }

        let code = *self.exit_code.read().await;
        if code != 0 {
            return Err(WorkerError::NonZeroExit { code: Some(code) });
        }

        if let Some(ref output) = job.output {
            if let Some(parent) = output.parent() {
                tokio::fs::create_dir_all(parent).await?;
            }
            tokio::fs::write(output, b"mock composited output").await?;
        }

        Ok(WorkerOutcome {
            job_id: job.job_id,
            exit_code: 0,
            duration_ms: duration.as_millis() as u64,
        })
    }

    async fn validate(&self) -> Result<(), WorkerError> {
        Ok(())
    }
}
