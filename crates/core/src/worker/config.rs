//! Worker configuration.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Configuration for an external worker invocation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkerConfig {
    /// Path to the worker executable.
    #[serde(default = "default_program")]
    pub program: PathBuf,

    /// Arguments placed before the input paths.
    #[serde(default)]
    pub base_args: Vec<String>,

    /// Maximum run time in seconds.
    ///
    /// `None` (the default) waits for the worker indefinitely.
    #[serde(default)]
    pub timeout_secs: Option<u64>,
}

fn default_program() -> PathBuf {
    PathBuf::from("python3")
}

impl Default for WorkerConfig {
    fn default() -> Self {
        Self {
            program: default_program(),
            base_args: Vec::new(),
            timeout_secs: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = WorkerConfig::default();
        assert_eq!(config.program, PathBuf::from("python3"));
        assert!(config.base_args.is_empty());
        assert!(config.timeout_secs.is_none());
    }

    #[test]
    fn test_deserialize_minimal() {
        let config: WorkerConfig = toml::from_str("").unwrap();
        assert_eq!(config.program, PathBuf::from("python3"));
        assert!(config.timeout_secs.is_none());
    }

    #[test]
    fn test_deserialize_full() {
        let toml = r#"
            program = "/usr/bin/python3"
            base_args = ["scripts/detect.py", "--file_path"]
            timeout_secs = 600
        "#;
        let config: WorkerConfig = toml::from_str(toml).unwrap();
        assert_eq!(config.program, PathBuf::from("/usr/bin/python3"));
        assert_eq!(config.base_args.len(), 2);
        assert_eq!(config.timeout_secs, Some(600));
    }
}
