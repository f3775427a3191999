//! Ingest pipeline configuration.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::worker::WorkerConfig;

/// Configuration for the per-item ingestion pipeline.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IngestConfig {
    /// Directory downloaded items are written to.
    ///
    /// Items are kept after processing; only the batch workflow cleans up
    /// after itself.
    #[serde(default = "default_scratch_dir")]
    pub scratch_dir: PathBuf,

    /// Detection worker invoked on each downloaded item.
    #[serde(default)]
    pub worker: WorkerConfig,
}

fn default_scratch_dir() -> PathBuf {
    std::env::temp_dir().join("drobe-assets")
}

impl Default for IngestConfig {
    fn default() -> Self {
        Self {
            scratch_dir: default_scratch_dir(),
            worker: WorkerConfig::default(),
        }
    }
}
