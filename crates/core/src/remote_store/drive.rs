//! Google Drive REST backend implementation.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use futures::{StreamExt, TryStreamExt};
use reqwest::Client;
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;
use tracing::debug;

use crate::config::RemoteStoreConfig;

use super::types::{ByteStream, ListOrder, ListQuery, RemoteItem, RemoteStore, RemoteStoreError};

/// Google Drive v3 store backend.
pub struct DriveStore {
    client: Client,
    config: RemoteStoreConfig,
}

#[derive(Debug, Deserialize)]
struct DriveFileList {
    #[serde(default)]
    files: Vec<DriveFile>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct DriveFile {
    id: String,
    name: String,
    created_time: Option<String>,
}

impl DriveStore {
    /// Create a new Drive store with the given configuration.
    pub fn new(config: RemoteStoreConfig) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs as u64))
            .build()
            .expect("Failed to create HTTP client");

        Self { client, config }
    }

    /// Build the files.list URL for a folder query.
    fn build_list_url(&self, folder_id: &str, query: &ListQuery) -> String {
        let mut q = format!("'{}' in parents", folder_id);
        if query.exclude_trashed {
            q.push_str(" and trashed = false");
        }

        let order_by = match query.order {
            ListOrder::CreatedDesc => "createdTime desc",
            ListOrder::CreatedAsc => "createdTime",
        };

        format!(
            "{}/files?q={}&orderBy={}&fields={}&spaces=drive",
            self.config.api_base.trim_end_matches('/'),
            urlencoding::encode(&q),
            urlencoding::encode(order_by),
            urlencoding::encode("files(id,name,createdTime)"),
        )
    }

    /// Build a name-based existence query URL.
    fn build_exists_url(&self, name: &str) -> String {
        let q = format!("name = '{}' and trashed = false", name.replace('\'', "\\'"));
        format!(
            "{}/files?q={}&fields={}",
            self.config.api_base.trim_end_matches('/'),
            urlencoding::encode(&q),
            urlencoding::encode("files(id,name)"),
        )
    }

    fn map_request_error(e: reqwest::Error) -> RemoteStoreError {
        if e.is_timeout() {
            RemoteStoreError::Timeout
        } else if e.is_connect() {
            RemoteStoreError::ConnectionFailed(e.to_string())
        } else {
            RemoteStoreError::ApiError {
                status: e.status().map(|s| s.as_u16()).unwrap_or(0),
                message: e.to_string(),
            }
        }
    }

    async fn check_status(
        response: reqwest::Response,
        item_hint: &str,
    ) -> Result<reqwest::Response, RemoteStoreError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        Err(match status.as_u16() {
            401 | 403 => RemoteStoreError::AuthenticationFailed(body),
            404 => RemoteStoreError::ItemNotFound(item_hint.to_string()),
            code => RemoteStoreError::ApiError {
                status: code,
                message: body,
            },
        })
    }

    fn parse_created_time(raw: Option<String>) -> Option<DateTime<Utc>> {
        raw.as_deref()
            .and_then(|s| DateTime::parse_from_rfc3339(s).ok())
            .map(|dt| dt.with_timezone(&Utc))
    }
}

#[async_trait]
impl RemoteStore for DriveStore {
    fn name(&self) -> &str {
        "drive"
    }

    async fn list(
        &self,
        folder_id: &str,
        query: &ListQuery,
    ) -> Result<Vec<RemoteItem>, RemoteStoreError> {
        let url = self.build_list_url(folder_id, query);
        debug!(folder = folder_id, "Listing drive folder");

        let response = self
            .client
            .get(&url)
            .bearer_auth(&self.config.access_token)
            .send()
            .await
            .map_err(Self::map_request_error)?;

        let response = Self::check_status(response, folder_id).await?;

        let list: DriveFileList = response
            .json()
            .await
            .map_err(|e| RemoteStoreError::InvalidResponse(e.to_string()))?;

        Ok(list
            .files
            .into_iter()
            .map(|f| RemoteItem {
                id: f.id,
                name: f.name,
                created_at: Self::parse_created_time(f.created_time),
            })
            .collect())
    }

    async fn get(&self, item_id: &str) -> Result<ByteStream, RemoteStoreError> {
        let url = format!(
            "{}/files/{}?alt=media",
            self.config.api_base.trim_end_matches('/'),
            urlencoding::encode(item_id),
        );
        debug!(item = item_id, "Opening drive read stream");

        let response = self
            .client
            .get(&url)
            .bearer_auth(&self.config.access_token)
            .send()
            .await
            .map_err(Self::map_request_error)?;

        let response = Self::check_status(response, item_id).await?;

        Ok(response
            .bytes_stream()
            .map_err(Self::map_request_error)
            .boxed())
    }

    async fn put(
        &self,
        name: &str,
        source: &Path,
        folder_id: &str,
    ) -> Result<RemoteItem, RemoteStoreError> {
        let url = format!(
            "{}/files?uploadType=multipart&fields={}",
            self.config.upload_api_base.trim_end_matches('/'),
            urlencoding::encode("id,name"),
        );
        debug!(name = name, folder = folder_id, "Uploading to drive");

        let metadata = serde_json::json!({
            "name": name,
            "parents": [folder_id],
        });

        let content = tokio::fs::read(source).await?;

        let form = reqwest::multipart::Form::new()
            .part(
                "metadata",
                reqwest::multipart::Part::text(metadata.to_string())
                    .mime_str("application/json; charset=UTF-8")
                    .map_err(|e| RemoteStoreError::InvalidResponse(e.to_string()))?,
            )
            .part(
                "file",
                reqwest::multipart::Part::bytes(content).file_name(name.to_string()),
            );

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.config.access_token)
            .multipart(form)
            .send()
            .await
            .map_err(Self::map_request_error)?;

        let response = Self::check_status(response, name).await?;

        let file: DriveFile = response
            .json()
            .await
            .map_err(|e| RemoteStoreError::InvalidResponse(e.to_string()))?;

        Ok(RemoteItem {
            id: file.id,
            name: file.name,
            created_at: Self::parse_created_time(file.created_time),
        })
    }

    async fn exists(&self, name: &str) -> Result<bool, RemoteStoreError> {
        let url = self.build_exists_url(name);

        let response = self
            .client
            .get(&url)
            .bearer_auth(&self.config.access_token)
            .send()
            .await
            .map_err(Self::map_request_error)?;

        let response = Self::check_status(response, name).await?;

        let list: DriveFileList = response
            .json()
            .await
            .map_err(|e| RemoteStoreError::InvalidResponse(e.to_string()))?;

        Ok(!list.files.is_empty())
    }
}
