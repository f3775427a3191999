//! Trait definitions for the worker module.

use async_trait::async_trait;

use super::error::WorkerError;
use super::types::{WorkerJob, WorkerOutcome};

/// An external processing step invoked on local files.
#[async_trait]
pub trait Worker: Send + Sync {
    /// Returns the name of this worker implementation.
    fn name(&self) -> &str;

    /// Run the worker on the job's inputs and await its exit.
    ///
    /// Exit code 0 resolves to an outcome; anything else is an error.
    async fn run(&self, job: WorkerJob) -> Result<WorkerOutcome, WorkerError>;

    /// Validates that the worker is properly configured and ready.
    async fn validate(&self) -> Result<(), WorkerError>;
}
