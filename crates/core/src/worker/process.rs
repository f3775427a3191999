//! Process-spawning worker implementation.

use async_trait::async_trait;
use std::process::Stdio;
use std::time::Instant;
use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};
use tokio::process::Command;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{timeout, Duration};
use tracing::info;

use crate::metrics;

use super::config::WorkerConfig;
use super::error::WorkerError;
use super::traits::Worker;
use super::types::{LogStream, WorkerJob, WorkerLogRecord, WorkerOutcome};

/// Worker that spawns an out-of-process executable.
///
/// Communication is via argv only; stdout and stderr are consumed
/// line-buffered and forwarded to the configured log sink, or to
/// `tracing` when no sink is set.
pub struct ProcessWorker {
    config: WorkerConfig,
    log_tx: Option<mpsc::Sender<WorkerLogRecord>>,
}

impl ProcessWorker {
    /// Creates a new worker with the given configuration.
    pub fn new(config: WorkerConfig) -> Self {
        Self {
            config,
            log_tx: None,
        }
    }

    /// Sets a sink that receives every output line as a log record.
    pub fn with_log_sink(mut self, log_tx: mpsc::Sender<WorkerLogRecord>) -> Self {
        self.log_tx = Some(log_tx);
        self
    }

    /// Builds the argv tail: base args, then inputs, then the output path.
    fn build_args(&self, job: &WorkerJob) -> Vec<String> {
        let mut args: Vec<String> = self.config.base_args.clone();
        args.extend(
            job.inputs
                .iter()
                .map(|p| p.to_string_lossy().to_string()),
        );
        if let Some(ref output) = job.output {
            args.push(output.to_string_lossy().to_string());
        }
        args
    }

    /// Spawns a task that forwards one pipe to the log sink, line by line.
    fn forward_lines<R>(
        job_id: String,
        stream: LogStream,
        reader: R,
        log_tx: Option<mpsc::Sender<WorkerLogRecord>>,
    ) -> JoinHandle<()>
    where
        R: AsyncRead + Unpin + Send + 'static,
    {
        tokio::spawn(async move {
            let mut lines = BufReader::new(reader).lines();
            while let Ok(Some(line)) = lines.next_line().await {
                match log_tx {
                    Some(ref tx) => {
                        let record = WorkerLogRecord {
                            job_id: job_id.clone(),
                            stream,
                            line,
                        };
                        if tx.send(record).await.is_err() {
                            // Sink gone; keep draining so the child never blocks on a full pipe.
                            continue;
                        }
                    }
                    None => match stream {
                        LogStream::Stdout => {
                            info!(job = %job_id, stream = stream.as_str(), "worker: {}", line)
                        }
                        LogStream::Stderr => {
                            tracing::warn!(job = %job_id, stream = stream.as_str(), "worker: {}", line)
                        }
                    },
                }
            }
        })
    }
}

#[async_trait]
impl Worker for ProcessWorker {
    fn name(&self) -> &str {
        "process"
    }

    async fn run(&self, job: WorkerJob) -> Result<WorkerOutcome, WorkerError> {
        let start = Instant::now();
        let args = self.build_args(&job);

        let mut child = Command::new(&self.config.program)
            .args(&args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| {
                if e.kind() == std::io::ErrorKind::NotFound {
                    WorkerError::ProgramNotFound {
                        path: self.config.program.clone(),
                    }
                } else {
                    WorkerError::Io(e)
                }
            })?;

        let stdout = child.stdout.take().expect("stdout should be captured");
        let stderr = child.stderr.take().expect("stderr should be captured");

        let out_task = Self::forward_lines(
            job.job_id.clone(),
            LogStream::Stdout,
            stdout,
            self.log_tx.clone(),
        );
        let err_task = Self::forward_lines(
            job.job_id.clone(),
            LogStream::Stderr,
            stderr,
            self.log_tx.clone(),
        );

        let status = match self.config.timeout_secs {
            Some(secs) => match timeout(Duration::from_secs(secs), child.wait()).await {
                Ok(status) => status?,
                Err(_) => {
                    let _ = child.kill().await;
                    metrics::WORKER_RUNS_TOTAL
                        .with_label_values(&["timeout"])
                        .inc();
                    return Err(WorkerError::Timeout { timeout_secs: secs });
                }
            },
            // Baseline behavior: no deadline on the worker run.
            None => child.wait().await?,
        };

        // The pipes close with the child; drain whatever is buffered.
        let _ = out_task.await;
        let _ = err_task.await;

        let duration_ms = start.elapsed().as_millis() as u64;

        if !status.success() {
            metrics::WORKER_RUNS_TOTAL
                .with_label_values(&["failed"])
                .inc();
            return Err(WorkerError::NonZeroExit {
                code: status.code(),
            });
        }

        metrics::WORKER_RUNS_TOTAL
            .with_label_values(&["success"])
            .inc();
        metrics::WORKER_DURATION.observe(start.elapsed().as_secs_f64());

        info!(job = %job.job_id, duration_ms, "Worker finished");

        Ok(WorkerOutcome {
            job_id: job.job_id,
            exit_code: 0,
            duration_ms,
        })
    }

    async fn validate(&self) -> Result<(), WorkerError> {
        // A bare program name resolves through PATH at spawn time; only an
        // explicit path can be checked up front.
        if self.config.program.components().count() > 1 {
            tokio::fs::metadata(&self.config.program)
                .await
                .map_err(|_| WorkerError::ProgramNotFound {
                    path: self.config.program.clone(),
                })?;
        }
        Ok(())
    }
}
