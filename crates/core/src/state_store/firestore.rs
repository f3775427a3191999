//! Firestore REST backend for item flags.
//!
//! Documents carry the wire field names `beenParsed` and `isLiked`;
//! partial updates go through `updateMask.fieldPaths` so untouched
//! fields keep their stored values.

use async_trait::async_trait;
use reqwest::Client;
use serde_json::{json, Value};
use std::time::Duration;
use tracing::debug;

use crate::config::StateStoreConfig;

use super::types::{FlagPatch, ItemFlags, StateStore, StateStoreError};

/// Firestore-backed flag store.
pub struct FirestoreStateStore {
    client: Client,
    config: StateStoreConfig,
}

impl FirestoreStateStore {
    /// Create a new store with the given configuration.
    pub fn new(config: StateStoreConfig) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs as u64))
            .build()
            .expect("Failed to create HTTP client");

        Self { client, config }
    }

    fn document_url(&self, item_id: &str) -> String {
        format!(
            "{}/projects/{}/databases/(default)/documents/{}/{}",
            self.config.api_base.trim_end_matches('/'),
            self.config.project_id,
            self.config.collection,
            urlencoding::encode(item_id),
        )
    }

    fn map_request_error(e: reqwest::Error) -> StateStoreError {
        if e.is_timeout() {
            StateStoreError::Timeout
        } else if e.is_connect() {
            StateStoreError::ConnectionFailed(e.to_string())
        } else {
            StateStoreError::ApiError {
                status: e.status().map(|s| s.as_u16()).unwrap_or(0),
                message: e.to_string(),
            }
        }
    }

    async fn check_status(
        response: reqwest::Response,
        item_id: &str,
    ) -> Result<reqwest::Response, StateStoreError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        Err(match status.as_u16() {
            401 | 403 => StateStoreError::AuthenticationFailed(body),
            404 => StateStoreError::DocumentNotFound(item_id.to_string()),
            code => StateStoreError::ApiError {
                status: code,
                message: body,
            },
        })
    }

    /// Build the `fields` body for a patch.
    fn patch_to_fields(patch: &FlagPatch) -> Value {
        let mut fields = serde_json::Map::new();
        if let Some(processed) = patch.been_processed {
            fields.insert("beenParsed".to_string(), json!({ "booleanValue": processed }));
        }
        if let Some(liked) = patch.liked {
            fields.insert("isLiked".to_string(), json!({ "booleanValue": liked }));
        }
        json!({ "fields": Value::Object(fields) })
    }

    /// Field paths touched by a patch, for the update mask.
    fn patch_field_paths(patch: &FlagPatch) -> Vec<&'static str> {
        let mut paths = Vec::new();
        if patch.been_processed.is_some() {
            paths.push("beenParsed");
        }
        if patch.liked.is_some() {
            paths.push("isLiked");
        }
        paths
    }

    /// Extract flags from a Firestore document body.
    fn parse_flags(document: &Value) -> ItemFlags {
        let bool_field = |name: &str| {
            document
                .get("fields")
                .and_then(|f| f.get(name))
                .and_then(|f| f.get("booleanValue"))
                .and_then(Value::as_bool)
                .unwrap_or(false)
        };

        ItemFlags {
            been_processed: bool_field("beenParsed"),
            liked: bool_field("isLiked"),
        }
    }
}

#[async_trait]
impl StateStore for FirestoreStateStore {
    fn name(&self) -> &str {
        "firestore"
    }

    async fn get_flags(&self, item_id: &str) -> Result<ItemFlags, StateStoreError> {
        let url = self.document_url(item_id);
        debug!(item = item_id, "Reading item flags");

        let response = self
            .client
            .get(&url)
            .bearer_auth(&self.config.access_token)
            .send()
            .await
            .map_err(Self::map_request_error)?;

        let response = Self::check_status(response, item_id).await?;

        let document: Value = response
            .json()
            .await
            .map_err(|e| StateStoreError::InvalidResponse(e.to_string()))?;

        Ok(Self::parse_flags(&document))
    }

    async fn set_flags(&self, item_id: &str, patch: &FlagPatch) -> Result<(), StateStoreError> {
        if patch.is_empty() {
            return Ok(());
        }

        let mut url = self.document_url(item_id);
        for path in Self::patch_field_paths(patch) {
            url.push_str(if url.contains('?') { "&" } else { "?" });
            url.push_str("updateMask.fieldPaths=");
            url.push_str(path);
        }

        debug!(item = item_id, "Patching item flags");

        let response = self
            .client
            .patch(&url)
            .bearer_auth(&self.config.access_token)
            .json(&Self::patch_to_fields(patch))
            .send()
            .await
            .map_err(Self::map_request_error)?;

        Self::check_status(response, item_id).await?;
        Ok(())
    }
}
