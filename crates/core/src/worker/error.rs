//! Error types for the worker module.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while running an external worker.
#[derive(Debug, Error)]
pub enum WorkerError {
    /// Worker executable not found.
    #[error("Worker executable not found: {path}")]
    ProgramNotFound { path: PathBuf },

    /// Worker exited with a nonzero status.
    #[error("Worker exited with code {code:?}")]
    NonZeroExit { code: Option<i32> },

    /// Worker exceeded the configured run time.
    #[error("Worker timed out after {timeout_secs} seconds")]
    Timeout { timeout_secs: u64 },

    /// I/O error while spawning or waiting on the worker.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl WorkerError {
    /// Whether rerunning the worker could succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Timeout { .. } | Self::Io(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = WorkerError::NonZeroExit { code: Some(2) };
        assert_eq!(err.to_string(), "Worker exited with code Some(2)");

        let err = WorkerError::Timeout { timeout_secs: 60 };
        assert_eq!(err.to_string(), "Worker timed out after 60 seconds");
    }

    #[test]
    fn test_retryable() {
        assert!(WorkerError::Timeout { timeout_secs: 1 }.is_retryable());
        assert!(!WorkerError::NonZeroExit { code: Some(1) }.is_retryable());
        assert!(!WorkerError::ProgramNotFound {
            path: PathBuf::from("missing")
        }
        .is_retryable());
    }
}
