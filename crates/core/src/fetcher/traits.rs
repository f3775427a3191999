//! Trait definitions for the fetcher module.

use async_trait::async_trait;
use std::path::Path;

use crate::remote_store::RemoteItem;

use super::error::FetchError;
use super::types::LocalArtifact;

/// A fetcher that downloads remote content into a local directory.
#[async_trait]
pub trait Fetcher: Send + Sync {
    /// Returns the name of this fetcher implementation.
    fn name(&self) -> &str;

    /// Download a store item into `dest_dir`, named after the item.
    ///
    /// Resolves only once the local file is fully written. On any stream
    /// error the partial file is removed and an error returned.
    async fn fetch_item(
        &self,
        item: &RemoteItem,
        dest_dir: &Path,
    ) -> Result<LocalArtifact, FetchError>;

    /// Download an arbitrary URL into `dest_dir` under the given name.
    ///
    /// Same completion guarantee as [`Fetcher::fetch_item`].
    async fn fetch_url(
        &self,
        url: &str,
        name: &str,
        dest_dir: &Path,
    ) -> Result<LocalArtifact, FetchError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    struct NoopFetcher;

    #[async_trait]
    impl Fetcher for NoopFetcher {
        fn name(&self) -> &str {
            "noop"
        }

        async fn fetch_item(
            &self,
            item: &RemoteItem,
            dest_dir: &Path,
        ) -> Result<LocalArtifact, FetchError> {
            Ok(LocalArtifact {
                source_id: item.id.clone(),
                path: dest_dir.join(&item.name),
                size_bytes: 0,
            })
        }

        async fn fetch_url(
            &self,
            url: &str,
            name: &str,
            dest_dir: &Path,
        ) -> Result<LocalArtifact, FetchError> {
            Ok(LocalArtifact {
                source_id: url.to_string(),
                path: dest_dir.join(name),
                size_bytes: 0,
            })
        }
    }

    #[tokio::test]
    async fn test_trait_is_object_safe() {
        let fetcher: Box<dyn Fetcher> = Box::new(NoopFetcher);
        let item = RemoteItem {
            id: "x".to_string(),
            name: "x.png".to_string(),
            created_at: None,
        };

        let artifact = fetcher
            .fetch_item(&item, &PathBuf::from("/tmp"))
            .await
            .unwrap();
        assert_eq!(artifact.source_id, "x");
    }
}
