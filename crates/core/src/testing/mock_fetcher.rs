//! Mock fetcher for testing.

use async_trait::async_trait;
use std::collections::HashSet;
use std::path::Path;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::fetcher::{FetchError, Fetcher, LocalArtifact};
use crate::remote_store::RemoteItem;

/// Mock implementation of the Fetcher trait.
///
/// Writes a small placeholder file for every download so downstream code
/// sees a real path on disk. Individual names can be configured to fail.
pub struct MockFetcher {
    /// Names whose downloads fail.
    fail_names: Arc<RwLock<HashSet<String>>>,
    /// Recorded (source, name) pairs in call order.
    recorded: Arc<RwLock<Vec<(String, String)>>>,
}

impl Default for MockFetcher {
    fn default() -> Self {
        Self::new()
    }
}

impl MockFetcher {
    /// Create a new mock fetcher where every download succeeds.
    pub fn new() -> Self {
        Self {
            fail_names: Arc::new(RwLock::new(HashSet::new())),
            recorded: Arc::new(RwLock::new(Vec::new())),
        }
    }

    /// Make downloads of the given name fail.
    pub async fn fail_name(&self, name: &str) {
        self.fail_names.write().await.insert(name.to_string());
    }

    /// Get all recorded downloads as (source, name) pairs.
    pub async fn recorded_downloads(&self) -> Vec<(String, String)> {
        self.recorded.read().await.clone()
    }

    async fn fetch(
        &self,
        source: &str,
        name: &str,
        dest_dir: &Path,
    ) -> Result<LocalArtifact, FetchError> {
        self.recorded
            .write()
            .await
            .push((source.to_string(), name.to_string()));

        if self.fail_names.read().await.contains(name) {
            return Err(FetchError::Request {
                url: source.to_string(),
                reason: "simulated download failure".to_string(),
            });
        }

        let path = dest_dir.join(name);
        let content = format!("mock content for {}", name);
        tokio::fs::write(&path, &content).await?;

        Ok(LocalArtifact {
            source_id: source.to_string(),
            path,
            size_bytes: content.len() as u64,
        })
    }
}

#[async_trait]
impl Fetcher for MockFetcher {
    fn name(&self) -> &str {
        "mock"
    }

    async fn fetch_item(
        &self,
        item: &RemoteItem,
        dest_dir: &Path,
    ) -> Result<LocalArtifact, FetchError> {
        self.fetch(&item.id, &item.name, dest_dir).await
    }

    async fn fetch_url(
        &self,
        url: &str,
        name: &str,
        dest_dir: &Path,
    ) -> Result<LocalArtifact, FetchError> {
        self.fetch(url, name, dest_dir).await
    }
}
