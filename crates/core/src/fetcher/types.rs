//! Types for the fetcher module.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// A fully written local copy of a remote item.
///
/// Constructed only after the local sink reported a clean finish; a failed
/// or truncated download never produces one.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LocalArtifact {
    /// Identifier of the source (item id or URL).
    pub source_id: String,
    /// Where the bytes landed.
    pub path: PathBuf,
    /// Size of the completed file.
    pub size_bytes: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_artifact_serialization() {
        let artifact = LocalArtifact {
            source_id: "item-1".to_string(),
            path: PathBuf::from("/tmp/scratch/photo.png"),
            size_bytes: 2048,
        };

        let json = serde_json::to_string(&artifact).unwrap();
        let parsed: LocalArtifact = serde_json::from_str(&json).unwrap();

        assert_eq!(parsed.source_id, "item-1");
        assert_eq!(parsed.size_bytes, 2048);
    }
}
