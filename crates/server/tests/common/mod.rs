//! Common test utilities for E2E testing with mocks.
//!
//! Builds an in-process router with mock collaborators injected, so the
//! API surface can be exercised without a remote drive or real workers.

use std::sync::Arc;

use axum::Router;
use tempfile::TempDir;

use drobe_core::testing::{MockFetcher, MockRemoteStore, MockStateStore};
use drobe_core::{
    load_config_from_str, CompositeConfig, CompositeOrchestrator, Fetcher, ItemFlags,
    ProcessWorker, RemoteStore, StateStore, WorkerConfig,
};
use drobe_server::api::create_router;
use drobe_server::state::AppState;

/// Test fixture with an in-process router and controllable mocks.
pub struct TestServer {
    router: Router,
    pub fetcher: Arc<MockFetcher>,
    pub store: Arc<MockRemoteStore>,
    pub state_store: Option<Arc<MockStateStore>>,
    _temp_dir: TempDir,
}

impl TestServer {
    /// Create a fixture without a state store.
    pub fn new() -> Self {
        Self::build(None)
    }

    /// Create a fixture with an in-memory state store holding `img-1`.
    pub async fn with_state_store() -> Self {
        let state_store = Arc::new(MockStateStore::new());
        state_store.insert("img-1", ItemFlags::default()).await;
        Self::build(Some(state_store))
    }

    fn build(state_store: Option<Arc<MockStateStore>>) -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");

        let config = load_config_from_str(
            r#"
[remote_store]
access_token = "super-secret-token"
upload_folder_id = "upload-folder"

[composite]
dest_folder_id = "dest-folder"
"#,
        )
        .expect("test config is valid");

        let fetcher = Arc::new(MockFetcher::new());
        let store = Arc::new(MockRemoteStore::new());

        // A worker that exits cleanly; the mock store never reads the
        // output file, so no real compositing is needed.
        #[cfg(unix)]
        let worker_config = WorkerConfig {
            program: "/bin/sh".into(),
            base_args: vec!["-c".to_string(), "exit 0".to_string()],
            timeout_secs: None,
        };
        #[cfg(not(unix))]
        let worker_config = WorkerConfig::default();

        let composite_config = CompositeConfig {
            scratch_dir: temp_dir.path().join("composite"),
            dest_folder_id: "dest-folder".to_string(),
            worker: worker_config,
            ..Default::default()
        };

        let worker = Arc::new(ProcessWorker::new(composite_config.worker.clone()));
        let composite = Arc::new(CompositeOrchestrator::new(
            composite_config,
            Arc::clone(&fetcher) as Arc<dyn Fetcher>,
            worker,
            Arc::clone(&store) as Arc<dyn RemoteStore>,
        ));

        let state = Arc::new(AppState::new(
            config,
            Arc::clone(&store) as Arc<dyn RemoteStore>,
            composite,
            None,
            state_store.clone().map(|s| s as Arc<dyn StateStore>),
        ));

        Self {
            router: create_router(state),
            fetcher,
            store,
            state_store,
            _temp_dir: temp_dir,
        }
    }

    /// A clone of the router for a oneshot request.
    pub fn app(&self) -> Router {
        self.router.clone()
    }
}
