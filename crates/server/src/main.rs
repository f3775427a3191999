use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use tokio::signal;
use tokio::sync::mpsc;
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use drobe_core::{
    load_config, validate_config, CompositeOrchestrator, DriveStore, Fetcher, FirestoreStateStore,
    HttpFetcher, IngestPipeline, LogStream, Poller, ProcessWorker, RemoteStore, StateStore,
    Worker, WorkerLogRecord,
};

use drobe_server::api::create_router;
use drobe_server::state::AppState;

/// Buffer size for the watcher's new-item channel
const EVENT_BUFFER_SIZE: usize = 16;

/// Buffer size for the worker log-record channel
const WORKER_LOG_BUFFER_SIZE: usize = 1024;

/// Spawn the task that drains worker output lines into the log.
fn spawn_worker_log_writer() -> tokio::sync::mpsc::Sender<WorkerLogRecord> {
    let (log_tx, mut log_rx) = mpsc::channel::<WorkerLogRecord>(WORKER_LOG_BUFFER_SIZE);

    tokio::spawn(async move {
        while let Some(record) = log_rx.recv().await {
            match record.stream {
                LogStream::Stdout => {
                    info!(job = %record.job_id, "worker: {}", record.line)
                }
                LogStream::Stderr => {
                    warn!(job = %record.job_id, "worker: {}", record.line)
                }
            }
        }
    });

    log_tx
}

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        error!("Fatal error: {}", e);
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Determine config path
    let config_path = std::env::var("DROBE_CONFIG")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("config.toml"));

    // Load configuration
    info!("Loading configuration from {:?}", config_path);
    let config = load_config(&config_path)
        .with_context(|| format!("Failed to load config from {:?}", config_path))?;

    // Validate configuration
    validate_config(&config).context("Configuration validation failed")?;

    info!("Configuration loaded successfully");
    info!("Watcher enabled: {}", config.watcher.enabled);

    // Create remote store and fetcher
    let store: Arc<dyn RemoteStore> = Arc::new(DriveStore::new(config.remote_store.clone()));
    let fetcher: Arc<dyn Fetcher> = Arc::new(HttpFetcher::new(Arc::clone(&store)));
    info!("Remote store initialized ({})", store.name());

    // Create state store if configured
    let state_store: Option<Arc<dyn StateStore>> = match &config.state_store {
        Some(state_config) => {
            info!(
                "Initializing state store (project: {}, collection: {})",
                state_config.project_id, state_config.collection
            );
            Some(Arc::new(FirestoreStateStore::new(state_config.clone())))
        }
        None => {
            info!("No state store configured");
            None
        }
    };

    // Worker stdout/stderr lines flow through one shared sink
    let worker_log_tx = spawn_worker_log_writer();

    // Create the compositing workflow
    let composite_worker = Arc::new(
        ProcessWorker::new(config.composite.worker.clone())
            .with_log_sink(worker_log_tx.clone()),
    );
    if let Err(e) = composite_worker.validate().await {
        warn!("Compositing worker validation failed: {}", e);
    }
    let composite = Arc::new(CompositeOrchestrator::new(
        config.composite.clone(),
        Arc::clone(&fetcher),
        Arc::clone(&composite_worker),
        Arc::clone(&store),
    ));
    info!("Composite workflow initialized");

    // Create watcher + ingest pipeline if enabled
    let poller = if config.watcher.enabled {
        let detect_worker = Arc::new(
            ProcessWorker::new(config.ingest.worker.clone())
                .with_log_sink(worker_log_tx.clone()),
        );
        if let Err(e) = detect_worker.validate().await {
            warn!("Detection worker validation failed: {}", e);
        }

        let (events_tx, events_rx) = mpsc::channel(EVENT_BUFFER_SIZE);

        let mut pipeline = IngestPipeline::new(
            config.ingest.clone(),
            Arc::clone(&fetcher),
            detect_worker,
        );
        if let Some(ref state_store) = state_store {
            pipeline = pipeline.with_state_store(Arc::clone(state_store));
        }
        Arc::new(pipeline).spawn(events_rx);

        let poller = Arc::new(Poller::new(
            config.watcher.clone(),
            Arc::clone(&store),
            events_tx,
        ));
        poller.start();
        info!("Folder watcher started");
        Some(poller)
    } else {
        info!("Watcher disabled in config");
        None
    };

    // Create app state
    let state = Arc::new(AppState::new(
        config.clone(),
        Arc::clone(&store),
        composite,
        poller.clone(),
        state_store,
    ));

    // Create router
    let app = create_router(state);

    // Start server
    let addr = SocketAddr::new(config.server.host, config.server.port);
    info!("Starting server on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind to {}", addr))?;

    // Run server with graceful shutdown
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    // Stop watcher if running
    if let Some(ref poller) = poller {
        info!("Stopping watcher...");
        poller.stop();
        info!("Watcher stopped");
    }

    info!("Server shutting down...");

    Ok(())
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM)
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
