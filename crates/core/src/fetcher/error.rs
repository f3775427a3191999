//! Error types for the fetcher module.

use thiserror::Error;

use crate::remote_store::RemoteStoreError;

/// Errors that can occur while downloading a single item.
#[derive(Debug, Error)]
pub enum FetchError {
    /// The remote store refused or failed the read.
    #[error("Remote store error: {0}")]
    Store(#[from] RemoteStoreError),

    /// A direct URL request failed.
    #[error("Request failed for {url}: {reason}")]
    Request { url: String, reason: String },

    /// A direct URL request returned a non-success status.
    #[error("Unexpected status {status} for {url}")]
    Status { url: String, status: u16 },

    /// The item name cannot be used as a local file name.
    #[error("Invalid artifact name: {0}")]
    InvalidName(String),

    /// Writing the local file failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl FetchError {
    /// Whether retrying the download later could succeed.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Store(e) => e.is_retryable(),
            Self::Request { .. } | Self::Io(_) => true,
            Self::Status { status, .. } => *status >= 500,
            Self::InvalidName(_) => false,
        }
    }
}
