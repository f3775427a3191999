//! Types for the composite workflow.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use uuid::Uuid;

/// One requested input image.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImageRef {
    /// Where to download the image from.
    pub url: String,
    /// Local file name for the download.
    pub name: String,
}

/// A batch compositing request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompositeRequest {
    /// Requested inputs, in caller order.
    pub images: Vec<ImageRef>,
}

/// Result of a successful workflow run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompositeOutcome {
    /// Id of the uploaded result item.
    pub item_id: String,
    /// How many downloaded inputs the worker received.
    pub inputs_used: usize,
    /// Wall-clock workflow duration.
    pub duration_ms: u64,
}

/// Per-invocation scratch layout.
///
/// Each invocation gets its own root so concurrent workflows never share
/// directories; cleanup removes the whole root.
#[derive(Debug, Clone)]
pub struct ScratchDirs {
    /// Invocation id, also the root directory name.
    pub id: String,
    /// Root removed after the run.
    pub root: PathBuf,
    /// Where inputs are downloaded to.
    pub downloads: PathBuf,
    /// Where the worker writes its result.
    pub output: PathBuf,
}

impl ScratchDirs {
    /// Lay out scratch space under `base`.
    pub fn new(base: &std::path::Path) -> Self {
        let id = Uuid::new_v4().to_string();
        let root = base.join(&id);
        Self {
            downloads: root.join("downloads"),
            output: root.join("output"),
            root,
            id,
        }
    }

    /// Path of the output file inside the scratch space.
    pub fn output_file(&self, name: &str) -> PathBuf {
        self.output.join(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    #[test]
    fn test_request_deserialization() {
        let json = r#"{
            "images": [
                {"url": "https://images.example/a.png", "name": "a.png"},
                {"url": "https://images.example/b.png", "name": "b.png"}
            ]
        }"#;

        let request: CompositeRequest = serde_json::from_str(json).unwrap();
        assert_eq!(request.images.len(), 2);
        assert_eq!(request.images[0].name, "a.png");
    }

    #[test]
    fn test_scratch_dirs_layout() {
        let dirs = ScratchDirs::new(Path::new("/tmp/composite"));

        assert!(dirs.root.starts_with("/tmp/composite"));
        assert_eq!(dirs.downloads, dirs.root.join("downloads"));
        assert_eq!(dirs.output, dirs.root.join("output"));
        assert_eq!(
            dirs.output_file("stitched.png"),
            dirs.root.join("output").join("stitched.png")
        );
    }

    #[test]
    fn test_scratch_dirs_are_unique_per_invocation() {
        let a = ScratchDirs::new(Path::new("/tmp/composite"));
        let b = ScratchDirs::new(Path::new("/tmp/composite"));
        assert_ne!(a.root, b.root);
    }
}
