mod graph;
mod index;
mod init;
mod serve;

pub use graph::cmd_graph;
pub use index::cmd_index;
pub use init::cmd_init;
pub use serve::cmd_serve;

use crate::api::{CanvasError, load_workspace};
use crate::config::Config;
use crate::style;
use std::path::{Path, PathBuf};

/// Shared context for command execution, reducing boilerplate across commands.
pub struct CommandContext {
    pub path: PathBuf,
    pub config: Config,
}

impl CommandContext {
    /// Resolve the workspace path and load its config.
    /// Returns Err(exit_code) if setup fails.
    pub fn new(path: &Path) -> Result<Self, i32> {
        match load_workspace(path) {
            Ok((path, config)) => Ok(Self { path, config }),
            Err(CanvasError::PathNotFound(p)) => {
                style::error(&format!("Could not resolve path: {}", style::path(&p)));
                Err(1)
            }
            Err(e) => {
                style::error(&e.to_string());
                style::hint("Fix or remove .codecanvas.toml, or run `codecanvas init` in a clean directory");
                Err(1)
            }
        }
    }

    /// `path` relative to the workspace root unless already absolute.
    pub fn absolutize(&self, path: &Path) -> PathBuf {
        if path.is_relative() {
            self.path.join(path)
        } else {
            path.to_path_buf()
        }
    }
}
