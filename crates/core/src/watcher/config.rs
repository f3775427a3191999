//! Watcher configuration.

use serde::{Deserialize, Serialize};

/// Configuration for the folder watcher.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WatcherConfig {
    /// Enable/disable the watcher.
    /// When disabled, only the batch workflow endpoint is active.
    #[serde(default)]
    pub enabled: bool,

    /// How often to list the watched folder (milliseconds).
    #[serde(default = "default_poll_interval")]
    pub poll_interval_ms: u64,

    /// Id of the remote folder to watch.
    #[serde(default)]
    pub folder_id: String,
}

fn default_poll_interval() -> u64 {
    1000 // 1 second
}

impl Default for WatcherConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            poll_interval_ms: default_poll_interval(),
            folder_id: String::new(),
        }
    }
}
