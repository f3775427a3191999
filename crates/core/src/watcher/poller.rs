//! Poller implementation.
//!
//! The cursor is owned by the poller instance and updated with a single
//! compare-and-assign inside one critical section, so overlapping cycles
//! can neither double-fire an item nor drop a new one. The cursor lives
//! in memory only; a restart re-detects the current head item as new.

use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::{broadcast, mpsc};
use tracing::{info, warn};

use crate::metrics;
use crate::remote_store::{ListQuery, RemoteItem, RemoteStore};

use super::config::WatcherConfig;

/// Current status of a poller.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PollerStatus {
    /// Whether the tick loop is scheduled.
    pub running: bool,
    /// Id of the last head item seen, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_seen_id: Option<String>,
}

/// Watches one remote folder and emits newly appearing items.
pub struct Poller {
    config: WatcherConfig,
    store: Arc<dyn RemoteStore>,
    events_tx: mpsc::Sender<RemoteItem>,
    last_seen: Arc<Mutex<Option<String>>>,

    // Runtime state
    running: Arc<AtomicBool>,
    shutdown_tx: broadcast::Sender<()>,
}

impl Poller {
    /// Create a new poller. Detected items are sent to `events_tx`.
    pub fn new(
        config: WatcherConfig,
        store: Arc<dyn RemoteStore>,
        events_tx: mpsc::Sender<RemoteItem>,
    ) -> Self {
        let (shutdown_tx, _) = broadcast::channel(1);

        Self {
            config,
            store,
            events_tx,
            last_seen: Arc::new(Mutex::new(None)),
            running: Arc::new(AtomicBool::new(false)),
            shutdown_tx,
        }
    }

    /// Start the tick loop (spawns a background task).
    pub fn start(&self) {
        if self.running.swap(true, Ordering::SeqCst) {
            warn!("Poller already running");
            return;
        }

        info!(
            folder = %self.config.folder_id,
            interval_ms = self.config.poll_interval_ms,
            "Starting folder watcher"
        );

        let running = Arc::clone(&self.running);
        let store = Arc::clone(&self.store);
        let last_seen = Arc::clone(&self.last_seen);
        let events_tx = self.events_tx.clone();
        let config = self.config.clone();
        let mut shutdown_rx = self.shutdown_tx.subscribe();

        tokio::spawn(async move {
            info!("Watcher loop started");
            loop {
                tokio::select! {
                    _ = shutdown_rx.recv() => {
                        info!("Watcher loop received shutdown signal");
                        break;
                    }
                    _ = tokio::time::sleep(Duration::from_millis(config.poll_interval_ms)) => {
                        if !running.load(Ordering::Relaxed) {
                            break;
                        }
                        Self::tick(&store, &config.folder_id, &last_seen, &events_tx).await;
                    }
                }
            }
            info!("Watcher loop stopped");
        });
    }

    /// Stop scheduling future ticks; an in-flight tick completes naturally.
    pub fn stop(&self) {
        if !self.running.swap(false, Ordering::SeqCst) {
            warn!("Poller not running");
            return;
        }

        info!("Stopping folder watcher");
        let _ = self.shutdown_tx.send(());
    }

    /// Get current poller status.
    pub fn status(&self) -> PollerStatus {
        let last_seen = match self.last_seen.lock() {
            Ok(guard) => guard.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        };

        PollerStatus {
            running: self.running.load(Ordering::Relaxed),
            last_seen_id: last_seen,
        }
    }

    /// Run a single detection cycle immediately.
    pub async fn check_once(&self) {
        Self::tick(
            &self.store,
            &self.config.folder_id,
            &self.last_seen,
            &self.events_tx,
        )
        .await;
    }

    /// One detection cycle: list, compare the head item, emit if new.
    async fn tick(
        store: &Arc<dyn RemoteStore>,
        folder_id: &str,
        last_seen: &Arc<Mutex<Option<String>>>,
        events_tx: &mpsc::Sender<RemoteItem>,
    ) {
        let items = match store.list(folder_id, &ListQuery::default()).await {
            Ok(items) => items,
            Err(e) => {
                // List failures are non-fatal; the next tick retries.
                warn!("Failed to list watched folder {}: {}", folder_id, e);
                return;
            }
        };

        let Some(head) = items.first() else {
            return;
        };

        // Compare-and-assign under the lock, with the cursor advanced
        // before any processing is triggered. A failure downstream must
        // not re-detect the same item.
        let is_new = {
            let mut cursor = match last_seen.lock() {
                Ok(guard) => guard,
                Err(poisoned) => poisoned.into_inner(),
            };
            if cursor.as_deref() != Some(head.id.as_str()) {
                *cursor = Some(head.id.clone());
                true
            } else {
                false
            }
        };

        if is_new {
            info!("New item detected: {} ({})", head.name, head.id);
            metrics::ITEMS_DETECTED.inc();

            if let Err(e) = events_tx.send(head.clone()).await {
                warn!("Failed to hand off item {}: {}", head.id, e);
            }
        }
    }
}
