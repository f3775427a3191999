//! External worker module.
//!
//! This module provides the `Worker` trait and the process-spawning
//! implementation used for both the per-item detection step and the
//! batch compositing step. A worker is a single logical unit: it either
//! exits zero or the run failed, nothing in between is interpreted.

mod config;
mod error;
mod process;
mod traits;
mod types;

pub use config::WorkerConfig;
pub use error::WorkerError;
pub use process::ProcessWorker;
pub use traits::Worker;
pub use types::{LogStream, WorkerJob, WorkerLogRecord, WorkerOutcome};
