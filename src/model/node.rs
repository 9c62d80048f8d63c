use super::Language;
use crate::ids;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// One source file in the index. Immutable for the lifetime of the index.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileNode {
    pub path: PathBuf,
    pub language: Language,
    pub display_id: String,
}

impl FileNode {
    /// Build a node for an already normalized path.
    pub fn new(path: PathBuf) -> Self {
        let language = Language::from_path(&path);
        let display_id = ids::node_id(&path);
        Self {
            path,
            language,
            display_id,
        }
    }

    /// Base name of the file, used as the node label.
    pub fn label(&self) -> String {
        self.path
            .file_name()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_else(|| self.path.display().to_string())
    }
}
