//! Library API for codecanvas.
//!
//! These functions resolve the workspace path, load `.codecanvas.toml` and run
//! the core against the real filesystem. Unlike the CLI commands they return
//! `Result`s instead of printing and exiting.
//!
//! # Example
//!
//! ```no_run
//! use codecanvas::{GraphOptions, graph};
//! use std::path::Path;
//!
//! let g = graph(Path::new("."), &["src/main.ts"], GraphOptions::default())?;
//! println!("{} files, {} imports", g.nodes.len(), g.edges.len());
//! # Ok::<(), codecanvas::CanvasError>(())
//! ```

use crate::config::{Config, ConfigError};
use crate::fs::{RealFs, default_fs};
use crate::index::{WorkspaceIndex, build_index};
use crate::model::RenderGraph;
use crate::path::normalize;
use crate::session::Session;
use crate::subgraph::{materialize, subgraph};
use crate::symbols::TreeSitterSymbols;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use thiserror::Error;

/// Errors that can occur during codecanvas operations.
#[derive(Debug, Error)]
pub enum CanvasError {
    /// The specified path could not be found or resolved.
    #[error("Path not found: {0}")]
    PathNotFound(PathBuf),

    /// Configuration file error.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// IO error outside the best-effort core.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Options for [`index_workspace`].
#[derive(Debug, Clone, Default)]
pub struct IndexOptions {
    /// Replaces the configured exclude globs when set.
    pub exclude: Option<Vec<String>>,
}

/// Options for [`graph`] and [`graph_enriched`].
#[derive(Debug, Clone, Default)]
pub struct GraphOptions {
    /// Node budget; the configured `max_nodes` when unset.
    pub max_nodes: Option<usize>,
    /// Replaces the configured exclude globs when set.
    pub exclude: Option<Vec<String>>,
}

/// Absolute, lexically normalized workspace root and its configuration.
pub fn load_workspace(path: &Path) -> Result<(PathBuf, Config), CanvasError> {
    // Lexical, not canonical: a root reached through a symlink keeps the
    // spelling the host uses for seeds and previews.
    let absolute =
        std::path::absolute(path).map_err(|_| CanvasError::PathNotFound(path.to_path_buf()))?;
    let root = normalize(&absolute);
    if !root.is_dir() {
        return Err(CanvasError::PathNotFound(path.to_path_buf()));
    }
    let config = Config::load(&root)?;
    Ok((root, config))
}

/// Build the import index of the workspace at `path`.
pub fn index_workspace(path: &Path, options: IndexOptions) -> Result<WorkspaceIndex, CanvasError> {
    let (root, config) = load_workspace(path)?;
    let exclude = options.exclude.unwrap_or(config.index.exclude_globs);
    Ok(build_index(default_fs(), &root, &exclude))
}

/// Bounded graph around `seeds`, without symbol anchors.
///
/// Relative seeds are taken relative to the workspace root. Seeds that are
/// not indexed files are ignored; if none remain the graph starts from the
/// first files of the workspace.
pub fn graph<S: AsRef<Path>>(
    path: &Path,
    seeds: &[S],
    options: GraphOptions,
) -> Result<RenderGraph, CanvasError> {
    let (index, seeds, max_nodes) = prepare(path, seeds, options)?;
    Ok(subgraph(&index, &seeds, max_nodes))
}

/// [`graph`] with edges anchored on declarations found by tree-sitter.
pub async fn graph_enriched<S: AsRef<Path>>(
    path: &Path,
    seeds: &[S],
    options: GraphOptions,
) -> Result<RenderGraph, CanvasError> {
    let (index, seeds, max_nodes) = prepare(path, seeds, options)?;
    let symbols = TreeSitterSymbols::new(Arc::new(RealFs));
    Ok(materialize(&index, &seeds, max_nodes, &symbols).await)
}

/// A session over the workspace at `path`, backed by the real filesystem
/// and tree-sitter symbols.
pub fn open_session(path: &Path) -> Result<Session, CanvasError> {
    let (root, config) = load_workspace(path)?;
    let fs = Arc::new(RealFs);
    let symbols = Arc::new(TreeSitterSymbols::new(fs.clone()));
    Ok(Session::new(Some(root), config, fs, symbols))
}

fn prepare<S: AsRef<Path>>(
    path: &Path,
    seeds: &[S],
    options: GraphOptions,
) -> Result<(WorkspaceIndex, Vec<PathBuf>, usize), CanvasError> {
    let (root, config) = load_workspace(path)?;
    let exclude = options.exclude.unwrap_or(config.index.exclude_globs);
    let max_nodes = options.max_nodes.unwrap_or(config.graph.max_nodes);

    let index = build_index(default_fs(), &root, &exclude);
    let seeds = seeds
        .iter()
        .map(|s| {
            let s = s.as_ref();
            if s.is_relative() { root.join(s) } else { s.to_path_buf() }
        })
        .collect();

    Ok((index, seeds, max_nodes))
}
