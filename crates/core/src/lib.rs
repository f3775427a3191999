pub mod composite;
pub mod config;
pub mod fetcher;
pub mod ingest;
pub mod metrics;
pub mod remote_store;
pub mod state_store;
pub mod testing;
pub mod watcher;
pub mod worker;

pub use composite::{
    CompositeConfig, CompositeOrchestrator, CompositeOutcome, CompositeRequest, ImageRef,
    WorkflowError,
};
pub use config::{
    load_config, load_config_from_str, validate_config, Config, ConfigError, RemoteStoreConfig,
    SanitizedConfig, ServerConfig, StateStoreConfig,
};
pub use fetcher::{FetchError, Fetcher, HttpFetcher, LocalArtifact};
pub use ingest::{IngestConfig, IngestPipeline};
pub use remote_store::{
    ByteStream, DriveStore, ListOrder, ListQuery, RemoteItem, RemoteStore, RemoteStoreError,
};
pub use state_store::{FirestoreStateStore, FlagPatch, ItemFlags, StateStore, StateStoreError};
pub use watcher::{Poller, PollerStatus, WatcherConfig};
pub use worker::{
    LogStream, ProcessWorker, Worker, WorkerConfig, WorkerError, WorkerJob, WorkerLogRecord,
    WorkerOutcome,
};
