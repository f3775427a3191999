//! Mock state store for testing.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::state_store::{FlagPatch, ItemFlags, StateStore, StateStoreError};

/// Mock implementation of the StateStore trait.
///
/// Keeps flags in memory and records every patch for assertions.
pub struct MockStateStore {
    flags: Arc<RwLock<HashMap<String, ItemFlags>>>,
    patches: Arc<RwLock<Vec<(String, FlagPatch)>>>,
    next_error: Arc<RwLock<Option<StateStoreError>>>,
}

impl Default for MockStateStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MockStateStore {
    /// Create a new empty mock store.
    pub fn new() -> Self {
        Self {
            flags: Arc::new(RwLock::new(HashMap::new())),
            patches: Arc::new(RwLock::new(Vec::new())),
            next_error: Arc::new(RwLock::new(None)),
        }
    }

    /// Pre-populate flags for an item.
    pub async fn insert(&self, item_id: &str, flags: ItemFlags) {
        self.flags.write().await.insert(item_id.to_string(), flags);
    }

    /// Current flags of an item, if it has any.
    pub async fn flags(&self, item_id: &str) -> Option<ItemFlags> {
        self.flags.read().await.get(item_id).copied()
    }

    /// Get all recorded patches in call order.
    pub async fn recorded_patches(&self) -> Vec<(String, FlagPatch)> {
        self.patches.read().await.clone()
    }

    /// Configure the next operation to fail with the given error.
    pub async fn set_next_error(&self, error: StateStoreError) {
        *self.next_error.write().await = Some(error);
    }

    async fn take_error(&self) -> Option<StateStoreError> {
        self.next_error.write().await.take()
    }
}

#[async_trait]
impl StateStore for MockStateStore {
    fn name(&self) -> &str {
        "mock"
    }

    async fn get_flags(&self, item_id: &str) -> Result<ItemFlags, StateStoreError> {
        if let Some(err) = self.take_error().await {
            return Err(err);
        }

        self.flags
            .read()
            .await
            .get(item_id)
            .copied()
            .ok_or_else(|| StateStoreError::DocumentNotFound(item_id.to_string()))
    }

    async fn set_flags(&self, item_id: &str, patch: &FlagPatch) -> Result<(), StateStoreError> {
        if let Some(err) = self.take_error().await {
            return Err(err);
        }

        self.patches
            .write()
            .await
            .push((item_id.to_string(), *patch));

        let mut flags = self.flags.write().await;
        let entry = flags.entry(item_id.to_string()).or_default();
        if let Some(processed) = patch.been_processed {
            entry.been_processed = processed;
        }
        if let Some(liked) = patch.liked {
            entry.liked = liked;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_patch_merges_fields() {
        let store = MockStateStore::new();

        store
            .set_flags("img-1", &FlagPatch::processed())
            .await
            .unwrap();
        store
            .set_flags(
                "img-1",
                &FlagPatch {
                    been_processed: None,
                    liked: Some(true),
                },
            )
            .await
            .unwrap();

        let flags = store.get_flags("img-1").await.unwrap();
        assert!(flags.been_processed);
        assert!(flags.liked);
        assert_eq!(store.recorded_patches().await.len(), 2);
    }

    #[tokio::test]
    async fn test_toggle_liked_flips() {
        let store = MockStateStore::new();
        store.insert("img-1", ItemFlags::default()).await;

        assert!(store.toggle_liked("img-1").await.unwrap());
        assert!(!store.toggle_liked("img-1").await.unwrap());
    }

    #[tokio::test]
    async fn test_missing_document() {
        let store = MockStateStore::new();
        let result = store.get_flags("missing").await;
        assert!(matches!(result, Err(StateStoreError::DocumentNotFound(_))));
    }
}
