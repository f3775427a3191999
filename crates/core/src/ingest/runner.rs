//! Ingest loop implementation.

use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{error, info, warn};

use crate::fetcher::Fetcher;
use crate::remote_store::RemoteItem;
use crate::state_store::{FlagPatch, StateStore};
use crate::worker::{Worker, WorkerJob};

use super::config::IngestConfig;

/// Drives detected items through download and the detection worker.
pub struct IngestPipeline<W: Worker + 'static> {
    config: IngestConfig,
    fetcher: Arc<dyn Fetcher>,
    worker: Arc<W>,
    state: Option<Arc<dyn StateStore>>,
}

impl<W: Worker + 'static> IngestPipeline<W> {
    /// Create a new pipeline.
    pub fn new(config: IngestConfig, fetcher: Arc<dyn Fetcher>, worker: Arc<W>) -> Self {
        Self {
            config,
            fetcher,
            worker,
            state: None,
        }
    }

    /// Sets the flag store updated after successful processing.
    pub fn with_state_store(mut self, state: Arc<dyn StateStore>) -> Self {
        self.state = Some(state);
        self
    }

    /// Spawn the consume loop over the watcher's event channel.
    ///
    /// Each item is processed in its own task, so a slow worker run never
    /// delays detection or later items.
    pub fn spawn(self: Arc<Self>, mut events_rx: mpsc::Receiver<RemoteItem>) -> JoinHandle<()> {
        tokio::spawn(async move {
            info!("Ingest loop started");
            while let Some(item) = events_rx.recv().await {
                let pipeline = Arc::clone(&self);
                tokio::spawn(async move {
                    pipeline.process_item(item).await;
                });
            }
            info!("Ingest loop stopped");
        })
    }

    /// Handle one detected item end to end.
    pub async fn process_item(&self, item: RemoteItem) {
        if let Err(e) = tokio::fs::create_dir_all(&self.config.scratch_dir).await {
            error!(
                "Failed to create scratch directory {:?}: {}",
                self.config.scratch_dir, e
            );
            return;
        }

        let artifact = match self
            .fetcher
            .fetch_item(&item, &self.config.scratch_dir)
            .await
        {
            Ok(artifact) => artifact,
            Err(e) => {
                warn!("Failed to download {} ({}): {}", item.name, item.id, e);
                return;
            }
        };

        info!(
            "Downloaded {} ({} bytes), running detection",
            item.name, artifact.size_bytes
        );

        let job = WorkerJob {
            job_id: item.id.clone(),
            inputs: vec![artifact.path.clone()],
            output: None,
        };

        match self.worker.run(job).await {
            Ok(outcome) => {
                info!(
                    "Processed {} in {} ms",
                    item.name, outcome.duration_ms
                );
                self.mark_processed(&item).await;
            }
            Err(e) => {
                warn!("Detection failed for {} ({}): {}", item.name, item.id, e);
            }
        }
    }

    /// Record the processed flag; the flag store stays authoritative, so a
    /// write failure is logged rather than failing the item.
    async fn mark_processed(&self, item: &RemoteItem) {
        let Some(ref state) = self.state else {
            return;
        };

        if let Err(e) = state.set_flags(&item.id, &FlagPatch::processed()).await {
            warn!("Failed to mark {} as processed: {}", item.id, e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{fixtures, MockFetcher, MockStateStore, MockWorker};

    fn pipeline(
        dir: &std::path::Path,
    ) -> (
        Arc<IngestPipeline<MockWorker>>,
        Arc<MockFetcher>,
        Arc<MockWorker>,
        Arc<MockStateStore>,
    ) {
        let fetcher = Arc::new(MockFetcher::new());
        let worker = Arc::new(MockWorker::new());
        let state = Arc::new(MockStateStore::new());

        let config = IngestConfig {
            scratch_dir: dir.to_path_buf(),
            worker: Default::default(),
        };

        let pipeline = Arc::new(
            IngestPipeline::new(
                config,
                Arc::clone(&fetcher) as Arc<dyn Fetcher>,
                Arc::clone(&worker),
            )
            .with_state_store(Arc::clone(&state) as Arc<dyn StateStore>),
        );

        (pipeline, fetcher, worker, state)
    }

    #[tokio::test]
    async fn test_process_item_marks_flag() {
        let dir = tempfile::tempdir().unwrap();
        let (pipeline, _fetcher, worker, state) = pipeline(dir.path());

        pipeline
            .process_item(fixtures::remote_item("item-1", "photo.png"))
            .await;

        let jobs = worker.recorded_jobs().await;
        assert_eq!(jobs.len(), 1);
        assert_eq!(jobs[0].job_id, "item-1");
        assert!(jobs[0].output.is_none());

        let flags = state.flags("item-1").await.unwrap();
        assert!(flags.been_processed);
    }

    #[tokio::test]
    async fn test_fetch_failure_skips_worker() {
        let dir = tempfile::tempdir().unwrap();
        let (pipeline, fetcher, worker, state) = pipeline(dir.path());

        fetcher.fail_name("photo.png").await;
        pipeline
            .process_item(fixtures::remote_item("item-1", "photo.png"))
            .await;

        assert!(worker.recorded_jobs().await.is_empty());
        assert!(state.flags("item-1").await.is_none());
    }

    #[tokio::test]
    async fn test_worker_failure_leaves_flag_unset() {
        let dir = tempfile::tempdir().unwrap();
        let (pipeline, _fetcher, worker, state) = pipeline(dir.path());

        worker.set_exit_code(1).await;
        pipeline
            .process_item(fixtures::remote_item("item-1", "photo.png"))
            .await;

        assert_eq!(worker.recorded_jobs().await.len(), 1);
        assert!(state.flags("item-1").await.is_none());
    }
}
