//! Error types for the composite workflow.

use thiserror::Error;

use crate::remote_store::RemoteStoreError;
use crate::worker::WorkerError;

/// Terminal failures of one workflow invocation.
///
/// Individual download failures never appear here; they are absorbed
/// inside the workflow and only an empty downloaded set escalates.
#[derive(Debug, Error)]
pub enum WorkflowError {
    /// The request was malformed; nothing was touched.
    #[error("Invalid request: {0}")]
    InvalidInput(String),

    /// Every requested download failed.
    #[error("No inputs could be downloaded")]
    NoInputAvailable,

    /// The compositing worker failed.
    #[error("Compositing failed: {0}")]
    Processing(#[from] WorkerError),

    /// The result could not be uploaded.
    ///
    /// The local artifact is not preserved; cleanup runs regardless.
    #[error("Upload failed: {0}")]
    Upload(#[from] RemoteStoreError),

    /// Scratch space could not be prepared.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl WorkflowError {
    /// Metric label for the failure kind.
    pub fn as_label(&self) -> &'static str {
        match self {
            Self::InvalidInput(_) => "invalid_input",
            Self::NoInputAvailable => "no_input",
            Self::Processing(_) => "processing_failed",
            Self::Upload(_) => "upload_failed",
            Self::Io(_) => "io_error",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = WorkflowError::InvalidInput("expected a non-empty image list".to_string());
        assert_eq!(
            err.to_string(),
            "Invalid request: expected a non-empty image list"
        );
        assert_eq!(WorkflowError::NoInputAvailable.to_string(), "No inputs could be downloaded");
    }

    #[test]
    fn test_labels_are_distinct() {
        let labels = [
            WorkflowError::InvalidInput(String::new()).as_label(),
            WorkflowError::NoInputAvailable.as_label(),
            WorkflowError::Processing(WorkerError::NonZeroExit { code: Some(1) }).as_label(),
            WorkflowError::Upload(RemoteStoreError::Timeout).as_label(),
        ];
        let unique: std::collections::HashSet<_> = labels.iter().collect();
        assert_eq!(unique.len(), labels.len());
    }
}
