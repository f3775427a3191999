//! Streaming HTTP fetcher implementation.

use async_trait::async_trait;
use futures::StreamExt;
use reqwest::Client;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;
use tokio::fs::File;
use tokio::io::AsyncWriteExt;
use tracing::{debug, warn};

use crate::metrics;
use crate::remote_store::{ByteStream, RemoteItem, RemoteStore};

use super::error::FetchError;
use super::traits::Fetcher;
use super::types::LocalArtifact;

/// Fetcher backed by the remote store for items and reqwest for plain URLs.
pub struct HttpFetcher {
    store: Arc<dyn RemoteStore>,
    client: Client,
}

impl HttpFetcher {
    /// Create a new fetcher over the given store.
    pub fn new(store: Arc<dyn RemoteStore>) -> Self {
        Self {
            store,
            client: Client::new(),
        }
    }

    /// Reduce an item name to a safe local file name.
    ///
    /// Only the final path component is kept, so a hostile name cannot
    /// escape the scratch directory.
    fn local_name(name: &str) -> Result<String, FetchError> {
        let candidate = Path::new(name)
            .file_name()
            .and_then(|n| n.to_str())
            .map(|n| n.to_string());

        match candidate {
            Some(n) if !n.is_empty() && n != "." && n != ".." => Ok(n),
            _ => Err(FetchError::InvalidName(name.to_string())),
        }
    }

    /// Pipe a byte stream into `dest`, resolving only on a clean finish.
    async fn write_stream(
        mut stream: ByteStream,
        dest: &PathBuf,
    ) -> Result<u64, FetchError> {
        let result = async {
            let mut file = File::create(dest).await?;
            let mut written: u64 = 0;

            while let Some(chunk) = stream.next().await {
                let chunk = chunk?;
                file.write_all(&chunk).await?;
                written += chunk.len() as u64;
            }

            file.flush().await?;
            Ok::<u64, FetchError>(written)
        }
        .await;

        if result.is_err() {
            // The partial file must not survive a failed download.
            if let Err(e) = tokio::fs::remove_file(dest).await {
                if e.kind() != std::io::ErrorKind::NotFound {
                    warn!("Failed to remove partial file {:?}: {}", dest, e);
                }
            }
        }

        result
    }
}

#[async_trait]
impl Fetcher for HttpFetcher {
    fn name(&self) -> &str {
        "http"
    }

    async fn fetch_item(
        &self,
        item: &RemoteItem,
        dest_dir: &Path,
    ) -> Result<LocalArtifact, FetchError> {
        let start = Instant::now();
        let dest = dest_dir.join(Self::local_name(&item.name)?);
        debug!(item = %item.id, dest = ?dest, "Downloading item");

        let stream = self.store.get(&item.id).await?;
        let size_bytes = match Self::write_stream(stream, &dest).await {
            Ok(n) => n,
            Err(e) => {
                metrics::FETCHES_TOTAL.with_label_values(&["failed"]).inc();
                return Err(e);
            }
        };

        metrics::FETCHES_TOTAL.with_label_values(&["success"]).inc();
        metrics::FETCH_DURATION.observe(start.elapsed().as_secs_f64());

        Ok(LocalArtifact {
            source_id: item.id.clone(),
            path: dest,
            size_bytes,
        })
    }

    async fn fetch_url(
        &self,
        url: &str,
        name: &str,
        dest_dir: &Path,
    ) -> Result<LocalArtifact, FetchError> {
        let start = Instant::now();
        let dest = dest_dir.join(Self::local_name(name)?);
        debug!(url = url, dest = ?dest, "Downloading URL");

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| FetchError::Request {
                url: url.to_string(),
                reason: e.to_string(),
            })?;

        let status = response.status();
        if !status.is_success() {
            metrics::FETCHES_TOTAL.with_label_values(&["failed"]).inc();
            return Err(FetchError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let url_owned = url.to_string();
        let stream: ByteStream = response
            .bytes_stream()
            .map(move |chunk| {
                chunk.map_err(|e| {
                    crate::remote_store::RemoteStoreError::ConnectionFailed(format!(
                        "{}: {}",
                        url_owned, e
                    ))
                })
            })
            .boxed();

        let size_bytes = match Self::write_stream(stream, &dest).await {
            Ok(n) => n,
            Err(e) => {
                metrics::FETCHES_TOTAL.with_label_values(&["failed"]).inc();
                return Err(e);
            }
        };

        metrics::FETCHES_TOTAL.with_label_values(&["success"]).inc();
        metrics::FETCH_DURATION.observe(start.elapsed().as_secs_f64());

        Ok(LocalArtifact {
            source_id: url.to_string(),
            path: dest,
            size_bytes,
        })
    }
}
