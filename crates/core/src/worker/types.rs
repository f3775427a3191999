//! Types for worker operations.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// A single worker invocation.
#[derive(Debug, Clone)]
pub struct WorkerJob {
    /// Identifier carried through logs and metrics.
    pub job_id: String,
    /// Local input files, in the order they are passed on the command line.
    pub inputs: Vec<PathBuf>,
    /// Output path appended after the inputs, when the step produces one.
    pub output: Option<PathBuf>,
}

/// Result of a successful worker run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkerOutcome {
    /// Identifier of the job that ran.
    pub job_id: String,
    /// Exit code reported by the process (always 0 on success).
    pub exit_code: i32,
    /// Wall-clock run time.
    pub duration_ms: u64,
}

/// Which pipe a log line came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogStream {
    Stdout,
    Stderr,
}

impl LogStream {
    /// Returns the string representation for log fields.
    pub fn as_str(&self) -> &'static str {
        match self {
            LogStream::Stdout => "stdout",
            LogStream::Stderr => "stderr",
        }
    }
}

/// One line of worker output, forwarded to the configured sink.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkerLogRecord {
    pub job_id: String,
    pub stream: LogStream,
    pub line: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_stream_as_str() {
        assert_eq!(LogStream::Stdout.as_str(), "stdout");
        assert_eq!(LogStream::Stderr.as_str(), "stderr");
    }

    #[test]
    fn test_log_record_serialization() {
        let record = WorkerLogRecord {
            job_id: "job-1".to_string(),
            stream: LogStream::Stderr,
            line: "warning: low confidence".to_string(),
        };

        let json = serde_json::to_string(&record).unwrap();
        assert!(json.contains("\"stderr\""));

        let parsed: WorkerLogRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.stream, LogStream::Stderr);
    }

    #[test]
    fn test_outcome_serialization() {
        let outcome = WorkerOutcome {
            job_id: "job-1".to_string(),
            exit_code: 0,
            duration_ms: 1234,
        };

        let json = serde_json::to_string(&outcome).unwrap();
        let parsed: WorkerOutcome = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.exit_code, 0);
        assert_eq!(parsed.duration_ms, 1234);
    }
}
