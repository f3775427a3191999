//! Types for remote store operations.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use futures::stream::BoxStream;
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

/// Errors that can occur during remote store operations.
#[derive(Debug, Error)]
pub enum RemoteStoreError {
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    #[error("Authentication failed: {0}")]
    AuthenticationFailed(String),

    #[error("Item not found: {0}")]
    ItemNotFound(String),

    #[error("API error (status {status}): {message}")]
    ApiError { status: u16, message: String },

    #[error("Invalid API response: {0}")]
    InvalidResponse(String),

    #[error("Request timeout")]
    Timeout,

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl RemoteStoreError {
    /// Whether this error is retryable on a later cycle.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::ConnectionFailed(_) | Self::Timeout | Self::Io(_)
        )
    }
}

/// An addressable item in the remote store.
///
/// Items are immutable once listed; identity is the `id`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteItem {
    /// Opaque store-assigned identifier.
    pub id: String,
    /// Human-readable file name.
    pub name: String,
    /// When the item was created, if the store reports it.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

/// Ordering for folder listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ListOrder {
    /// Newest items first.
    #[default]
    CreatedDesc,
    /// Oldest items first.
    CreatedAsc,
}

/// Filters for listing a folder.
#[derive(Debug, Clone)]
pub struct ListQuery {
    /// Skip items the store marks as trashed.
    pub exclude_trashed: bool,
    /// Result ordering.
    pub order: ListOrder,
}

impl Default for ListQuery {
    fn default() -> Self {
        Self {
            exclude_trashed: true,
            order: ListOrder::CreatedDesc,
        }
    }
}

/// A stream of raw content chunks from the store.
pub type ByteStream = BoxStream<'static, Result<bytes::Bytes, RemoteStoreError>>;

/// Trait for remote object store backends.
#[async_trait]
pub trait RemoteStore: Send + Sync {
    /// Backend name for logging.
    fn name(&self) -> &str;

    /// List the items of a folder.
    async fn list(
        &self,
        folder_id: &str,
        query: &ListQuery,
    ) -> Result<Vec<RemoteItem>, RemoteStoreError>;

    /// Open a read stream for an item's content.
    async fn get(&self, item_id: &str) -> Result<ByteStream, RemoteStoreError>;

    /// Upload a local file into a folder, returning the stored item.
    async fn put(
        &self,
        name: &str,
        source: &Path,
        folder_id: &str,
    ) -> Result<RemoteItem, RemoteStoreError>;

    /// Whether an item with the given name already exists anywhere in the store.
    async fn exists(&self, name: &str) -> Result<bool, RemoteStoreError>;
}
