//! Composite workflow implementation.

use futures::future::join_all;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;
use tracing::{info, warn};

use crate::fetcher::{Fetcher, LocalArtifact};
use crate::metrics;
use crate::remote_store::RemoteStore;
use crate::worker::{Worker, WorkerJob};

use super::config::CompositeConfig;
use super::error::WorkflowError;
use super::types::{CompositeOutcome, CompositeRequest, ScratchDirs};

/// Create the scratch layout, tolerating directories that already exist.
pub async fn ensure_scratch_dirs(dirs: &ScratchDirs) -> std::io::Result<()> {
    tokio::fs::create_dir_all(&dirs.downloads).await?;
    tokio::fs::create_dir_all(&dirs.output).await?;
    Ok(())
}

/// Runs the batch workflow: download, composite, republish, clean up.
pub struct CompositeOrchestrator<W: Worker + 'static> {
    config: CompositeConfig,
    fetcher: Arc<dyn Fetcher>,
    worker: Arc<W>,
    store: Arc<dyn RemoteStore>,
}

impl<W: Worker + 'static> CompositeOrchestrator<W> {
    /// Create a new orchestrator.
    pub fn new(
        config: CompositeConfig,
        fetcher: Arc<dyn Fetcher>,
        worker: Arc<W>,
        store: Arc<dyn RemoteStore>,
    ) -> Self {
        Self {
            config,
            fetcher,
            worker,
            store,
        }
    }

    /// Handle one workflow invocation.
    ///
    /// Scratch space is removed before returning on every path that
    /// reaches step 2, including worker and upload failures.
    pub async fn handle(
        &self,
        request: CompositeRequest,
    ) -> Result<CompositeOutcome, WorkflowError> {
        if request.images.is_empty() {
            metrics::COMPOSITE_WORKFLOWS_TOTAL
                .with_label_values(&["invalid_input"])
                .inc();
            return Err(WorkflowError::InvalidInput(
                "expected a non-empty image list".to_string(),
            ));
        }
        if let Some(bad) = request.images.iter().find(|i| i.url.is_empty() || i.name.is_empty()) {
            metrics::COMPOSITE_WORKFLOWS_TOTAL
                .with_label_values(&["invalid_input"])
                .inc();
            return Err(WorkflowError::InvalidInput(format!(
                "image entry with empty url or name: {:?}",
                bad.name
            )));
        }

        let dirs = ScratchDirs::new(&self.config.scratch_dir);
        if let Err(e) = ensure_scratch_dirs(&dirs).await {
            metrics::COMPOSITE_WORKFLOWS_TOTAL
                .with_label_values(&["io_error"])
                .inc();
            return Err(WorkflowError::Io(e));
        }

        let result = self.run(&dirs, &request).await;

        // Cleanup is not optional; it runs on success and on every failure.
        if let Err(e) = tokio::fs::remove_dir_all(&dirs.root).await {
            warn!("Failed to remove scratch directory {:?}: {}", dirs.root, e);
        }

        match &result {
            Ok(outcome) => {
                metrics::COMPOSITE_WORKFLOWS_TOTAL
                    .with_label_values(&["success"])
                    .inc();
                info!(
                    "Workflow {} completed: uploaded {} ({} inputs, {} ms)",
                    dirs.id, outcome.item_id, outcome.inputs_used, outcome.duration_ms
                );
            }
            Err(e) => {
                metrics::COMPOSITE_WORKFLOWS_TOTAL
                    .with_label_values(&[e.as_label()])
                    .inc();
                warn!("Workflow {} failed: {}", dirs.id, e);
            }
        }

        result
    }

    async fn run(
        &self,
        dirs: &ScratchDirs,
        request: &CompositeRequest,
    ) -> Result<CompositeOutcome, WorkflowError> {
        let start = Instant::now();

        // Downloads run concurrently; join_all keeps caller order, so the
        // worker's argv is deterministic regardless of completion order.
        let downloads = join_all(request.images.iter().map(|image| async {
            match self
                .fetcher
                .fetch_url(&image.url, &image.name, &dirs.downloads)
                .await
            {
                Ok(artifact) => Some(artifact),
                Err(e) => {
                    warn!("Skipping {}: download failed: {}", image.name, e);
                    None
                }
            }
        }))
        .await;

        let downloaded: Vec<LocalArtifact> = downloads.into_iter().flatten().collect();

        if downloaded.is_empty() {
            return Err(WorkflowError::NoInputAvailable);
        }

        info!(
            "Downloaded {}/{} inputs for workflow {}",
            downloaded.len(),
            request.images.len(),
            dirs.id
        );

        let inputs: Vec<PathBuf> = downloaded
            .iter()
            .take(self.config.max_inputs)
            .map(|a| a.path.clone())
            .collect();
        let inputs_used = inputs.len();
        let output_path = dirs.output_file(&self.config.output_name);

        self.worker
            .run(WorkerJob {
                job_id: dirs.id.clone(),
                inputs,
                output: Some(output_path.clone()),
            })
            .await?;

        let item = self
            .store
            .put(
                &self.config.output_name,
                &output_path,
                &self.config.dest_folder_id,
            )
            .await
            .map_err(|e| {
                metrics::UPLOADS_TOTAL.with_label_values(&["failed"]).inc();
                e
            })?;

        metrics::UPLOADS_TOTAL.with_label_values(&["success"]).inc();

        Ok(CompositeOutcome {
            item_id: item.id,
            inputs_used,
            duration_ms: start.elapsed().as_millis() as u64,
        })
    }
}
