//! Testing utilities and mock implementations for E2E tests.
//!
//! This module provides mock implementations of all external service traits,
//! allowing comprehensive E2E testing without real infrastructure.
//!
//! # Example
//!
//! ```rust,ignore
//! use drobe_core::testing::{MockFetcher, MockRemoteStore, MockWorker};
//!
//! let store = MockRemoteStore::new();
//! let fetcher = MockFetcher::new();
//! let worker = MockWorker::new();
//!
//! // Configure mock responses
//! store.set_items(vec![/* items */]).await;
//! fetcher.fail_name("broken.png").await;
//! worker.set_exit_code(1).await;
//! ```

mod mock_fetcher;
mod mock_remote_store;
mod mock_state_store;
mod mock_worker;

pub use mock_fetcher::MockFetcher;
pub use mock_remote_store::{MockRemoteStore, RecordedPut};
pub use mock_state_store::MockStateStore;
pub use mock_worker::MockWorker;

/// Test fixtures and helper functions.
pub mod fixtures {
    use chrono::{TimeZone, Utc};

    use crate::composite::ImageRef;
    use crate::remote_store::RemoteItem;

    /// Create a test remote item with a fixed timestamp.
    pub fn remote_item(id: &str, name: &str) -> RemoteItem {
        RemoteItem {
            id: id.to_string(),
            name: name.to_string(),
            created_at: Some(Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap()),
        }
    }

    /// Create a test remote item created `minutes_ago` minutes in the past.
    pub fn remote_item_aged(id: &str, name: &str, minutes_ago: i64) -> RemoteItem {
        RemoteItem {
            id: id.to_string(),
            name: name.to_string(),
            created_at: Some(Utc::now() - chrono::Duration::minutes(minutes_ago)),
        }
    }

    /// Create a test image reference.
    pub fn image_ref(name: &str) -> ImageRef {
        ImageRef {
            url: format!("https://images.example/{}", name),
            name: name.to_string(),
        }
    }
}
