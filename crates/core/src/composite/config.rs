//! Composite workflow configuration.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::worker::WorkerConfig;

/// Configuration for the batch compositing workflow.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompositeConfig {
    /// Base directory for per-invocation scratch space.
    #[serde(default = "default_scratch_dir")]
    pub scratch_dir: PathBuf,

    /// Id of the remote folder the result is uploaded to.
    #[serde(default)]
    pub dest_folder_id: String,

    /// File name of the composited output.
    #[serde(default = "default_output_name")]
    pub output_name: String,

    /// How many downloaded inputs the worker receives at most.
    /// Extra inputs are ignored, not an error.
    #[serde(default = "default_max_inputs")]
    pub max_inputs: usize,

    /// Compositing worker.
    #[serde(default)]
    pub worker: WorkerConfig,
}

fn default_scratch_dir() -> PathBuf {
    std::env::temp_dir().join("drobe-composite")
}

fn default_output_name() -> String {
    "stitched.png".to_string()
}

fn default_max_inputs() -> usize {
    4
}

impl Default for CompositeConfig {
    fn default() -> Self {
        Self {
            scratch_dir: default_scratch_dir(),
            dest_folder_id: String::new(),
            output_name: default_output_name(),
            max_inputs: default_max_inputs(),
            worker: WorkerConfig::default(),
        }
    }
}
