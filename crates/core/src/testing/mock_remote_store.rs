//! Mock remote store for testing.

use async_trait::async_trait;
use futures::StreamExt;
use std::collections::{HashMap, VecDeque};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::remote_store::{
    ByteStream, ListQuery, RemoteItem, RemoteStore, RemoteStoreError,
};

/// A recorded upload for test assertions.
#[derive(Debug, Clone)]
pub struct RecordedPut {
    pub name: String,
    pub source: PathBuf,
    pub folder_id: String,
}

/// Mock implementation of the RemoteStore trait.
///
/// Provides controllable behavior for testing:
/// - Script a sequence of list responses (consumed in order), with a
///   fixed fallback once the script is exhausted
/// - Serve item content from in-memory bytes
/// - Track uploads for assertions
/// - Simulate failures
pub struct MockRemoteStore {
    /// Scripted list responses, consumed front to back.
    scripted_lists: Arc<RwLock<VecDeque<Vec<RemoteItem>>>>,
    /// Fallback listing used when the script is empty.
    items: Arc<RwLock<Vec<RemoteItem>>>,
    /// Item content by id.
    objects: Arc<RwLock<HashMap<String, Vec<u8>>>>,
    /// Recorded put calls.
    puts: Arc<RwLock<Vec<RecordedPut>>>,
    /// If set, the next operation will fail with this error.
    next_error: Arc<RwLock<Option<RemoteStoreError>>>,
    /// Counter for generating upload ids.
    put_counter: Arc<RwLock<u32>>,
}

impl Default for MockRemoteStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MockRemoteStore {
    /// Create a new mock store.
    pub fn new() -> Self {
        Self {
            scripted_lists: Arc::new(RwLock::new(VecDeque::new())),
            items: Arc::new(RwLock::new(Vec::new())),
            objects: Arc::new(RwLock::new(HashMap::new())),
            puts: Arc::new(RwLock::new(Vec::new())),
            next_error: Arc::new(RwLock::new(None)),
            put_counter: Arc::new(RwLock::new(0)),
        }
    }

    /// Set the fixed listing returned once the script is exhausted.
    pub async fn set_items(&self, items: Vec<RemoteItem>) {
        *self.items.write().await = items;
    }

    /// Queue a one-shot list response.
    pub async fn push_list(&self, items: Vec<RemoteItem>) {
        self.scripted_lists.write().await.push_back(items);
    }

    /// Serve content for an item id.
    pub async fn set_object(&self, item_id: &str, content: &[u8]) {
        self.objects
            .write()
            .await
            .insert(item_id.to_string(), content.to_vec());
    }

    /// Get all recorded put calls.
    pub async fn recorded_puts(&self) -> Vec<RecordedPut> {
        self.puts.read().await.clone()
    }

    /// Configure the next operation to fail with the given error.
    pub async fn set_next_error(&self, error: RemoteStoreError) {
        *self.next_error.write().await = Some(error);
    }

    /// Take the next error if set.
    async fn take_error(&self) -> Option<RemoteStoreError> {
        self.next_error.write().await.take()
    }
}

#[async_trait]
impl RemoteStore for MockRemoteStore {
    fn name(&self) -> &str {
        "mock"
    }

    async fn list(
        &self,
        _folder_id: &str,
        _query: &ListQuery,
    ) -> Result<Vec<RemoteItem>, RemoteStoreError> {
        if let Some(err) = self.take_error().await {
            return Err(err);
        }

        if let Some(scripted) = self.scripted_lists.write().await.pop_front() {
            return Ok(scripted);
        }

        Ok(self.items.read().await.clone())
    }

    async fn get(&self, item_id: &str) -> Result<ByteStream, RemoteStoreError> {
        if let Some(err) = self.take_error().await {
            return Err(err);
        }

        let content = self
            .objects
            .read()
            .await
            .get(item_id)
            .cloned()
            .ok_or_else(|| RemoteStoreError::ItemNotFound(item_id.to_string()))?;

        let chunks: Vec<Result<bytes::Bytes, RemoteStoreError>> =
            vec![Ok(bytes::Bytes::from(content))];
        Ok(futures::stream::iter(chunks).boxed())
    }

    async fn put(
        &self,
        name: &str,
        source: &Path,
        folder_id: &str,
    ) -> Result<RemoteItem, RemoteStoreError> {
        if let Some(err) = self.take_error().await {
            return Err(err);
        }

        self.puts.write().await.push(RecordedPut {
            name: name.to_string(),
            source: source.to_path_buf(),
            folder_id: folder_id.to_string(),
        });

        let mut counter = self.put_counter.write().await;
        *counter += 1;

        Ok(RemoteItem {
            id: format!("uploaded-{:04}", *counter),
            name: name.to_string(),
            created_at: None,
        })
    }

    async fn exists(&self, name: &str) -> Result<bool, RemoteStoreError> {
        if let Some(err) = self.take_error().await {
            return Err(err);
        }

        Ok(self.items.read().await.iter().any(|i| i.name == name))
    }
}
