//! Types for state store operations.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors that can occur during state store operations.
#[derive(Debug, Error)]
pub enum StateStoreError {
    #[error("Document not found: {0}")]
    DocumentNotFound(String),

    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    #[error("Authentication failed: {0}")]
    AuthenticationFailed(String),

    #[error("API error (status {status}): {message}")]
    ApiError { status: u16, message: String },

    #[error("Invalid API response: {0}")]
    InvalidResponse(String),

    #[error("Request timeout")]
    Timeout,
}

/// Per-item flags tracked externally.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemFlags {
    /// Whether the detection step has run for this item.
    pub been_processed: bool,
    /// Whether a user marked the item as liked.
    pub liked: bool,
}

/// A partial flag update; unset fields are left untouched.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FlagPatch {
    pub been_processed: Option<bool>,
    pub liked: Option<bool>,
}

impl FlagPatch {
    /// Whether the patch changes anything at all.
    pub fn is_empty(&self) -> bool {
        self.been_processed.is_none() && self.liked.is_none()
    }

    /// Patch marking the item as processed.
    pub fn processed() -> Self {
        Self {
            been_processed: Some(true),
            liked: None,
        }
    }
}

/// Trait for external flag store backends.
#[async_trait]
pub trait StateStore: Send + Sync {
    /// Backend name for logging.
    fn name(&self) -> &str;

    /// Read the flags of an item.
    async fn get_flags(&self, item_id: &str) -> Result<ItemFlags, StateStoreError>;

    /// Apply a partial flag update to an item.
    async fn set_flags(&self, item_id: &str, patch: &FlagPatch) -> Result<(), StateStoreError>;

    /// Flip the liked flag, returning the new value.
    async fn toggle_liked(&self, item_id: &str) -> Result<bool, StateStoreError> {
        let flags = self.get_flags(item_id).await?;
        let liked = !flags.liked;
        self.set_flags(
            item_id,
            &FlagPatch {
                been_processed: None,
                liked: Some(liked),
            },
        )
        .await?;
        Ok(liked)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_patch_is_empty() {
        assert!(FlagPatch::default().is_empty());
        assert!(!FlagPatch::processed().is_empty());
    }

    #[test]
    fn test_flags_serialization() {
        let flags = ItemFlags {
            been_processed: true,
            liked: false,
        };
        let json = serde_json::to_string(&flags).unwrap();
        let parsed: ItemFlags = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, flags);
    }

    #[test]
    fn test_error_display() {
        let err = StateStoreError::DocumentNotFound("img-1".to_string());
        assert_eq!(err.to_string(), "Document not found: img-1");
    }
}
