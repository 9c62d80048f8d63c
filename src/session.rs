//! Per-panel state: the workspace root, the lazily built index and what the
//! last graph was seeded with.
//!
//! Every request a panel can make maps to one method returning the
//! [`PanelMessage`] to send back. Methods returning `None` have nothing to
//! report (for example load-more before any graph was shown).

use crate::config::Config;
use crate::fs::FileSystem;
use crate::index::{WorkspaceIndex, build_index_async};
use crate::model::{CodeEntry, EmptyReason, PanelMessage};
use crate::path::{is_sub_path, normalize};
use crate::subgraph::materialize;
use crate::symbols::SymbolProvider;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Appended to previews cut at the byte limit.
pub const TRUNCATION_MARKER: &str = "\n// ... truncated ...";

pub struct Session {
    root: Option<PathBuf>,
    config: Config,
    fs: Arc<dyn FileSystem>,
    symbols: Arc<dyn SymbolProvider>,
    index: Option<Arc<WorkspaceIndex>>,
    last_seeds: Vec<PathBuf>,
    last_cap: usize,
}

impl Session {
    /// A session over `root`, or over no workspace at all.
    pub fn new(
        root: Option<PathBuf>,
        config: Config,
        fs: Arc<dyn FileSystem>,
        symbols: Arc<dyn SymbolProvider>,
    ) -> Self {
        Self {
            root: root.map(|r| normalize(&r)),
            config,
            fs,
            symbols,
            index: None,
            last_seeds: Vec::new(),
            last_cap: 0,
        }
    }

    pub fn root(&self) -> Option<&Path> {
        self.root.as_deref()
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Seeds and cap of the last seeded graph.
    pub fn last_request(&self) -> (&[PathBuf], usize) {
        (&self.last_seeds, self.last_cap)
    }

    /// The current index, building it on first use. `None` without a root.
    ///
    /// The returned `Arc` stays valid after a rescan; it simply keeps
    /// describing the workspace as it was when it was built.
    pub async fn index(&mut self) -> Option<Arc<WorkspaceIndex>> {
        let root = self.root.clone()?;
        if let Some(index) = &self.index {
            return Some(Arc::clone(index));
        }

        info!("indexing {}", root.display());
        let index = Arc::new(
            build_index_async(
                Arc::clone(&self.fs),
                root,
                self.config.index.exclude_globs.clone(),
            )
            .await,
        );
        self.index = Some(Arc::clone(&index));
        Some(index)
    }

    /// First graph for a panel, seeded with the files the user is looking
    /// at (active editor, changed files). Unknown seeds fall back to the
    /// first files of the workspace.
    pub async fn initial_graph(&mut self, seeds: &[PathBuf]) -> PanelMessage {
        let Some(index) = self.index().await else {
            return PanelMessage::Empty {
                reason: EmptyReason::NoWorkspace,
            };
        };

        let cap = self.config.graph.first_cap();
        self.remember(seeds.to_vec(), cap);

        let graph = materialize(&index, seeds, cap, self.symbols.as_ref()).await;
        if graph.is_empty() {
            PanelMessage::Empty {
                reason: EmptyReason::NoMatchedFiles,
            }
        } else {
            PanelMessage::Graph { graph }
        }
    }

    /// Neighborhood of the given nodes, up to the hard cap. Ids the index
    /// does not know are tried as paths.
    pub async fn expand(&mut self, ids: &[String]) -> Option<PanelMessage> {
        let index = self.index().await?;

        let seeds: Vec<PathBuf> = ids
            .iter()
            .map(|id| match index.node_by_id(id) {
                Some(node) => node.path.clone(),
                None => PathBuf::from(id),
            })
            .collect();

        let graph = materialize(
            &index,
            &seeds,
            self.config.graph.max_nodes,
            self.symbols.as_ref(),
        )
        .await;
        Some(PanelMessage::ExpandResult { graph })
    }

    /// Re-materialize the last seeds with one more page of nodes.
    pub async fn load_more(&mut self) -> Option<PanelMessage> {
        if self.last_seeds.is_empty() {
            return None;
        }
        let index = self.index().await?;

        let cap = self.config.graph.next_cap(self.last_cap);
        self.last_cap = cap;
        debug!("load more: cap now {}", cap);

        let graph = materialize(&index, &self.last_seeds, cap, self.symbols.as_ref()).await;
        Some(PanelMessage::Graph { graph })
    }

    /// Seed with every indexed file under `folder`.
    pub async fn seed_folder(&mut self, folder: &Path) -> PanelMessage {
        let Some(index) = self.index().await else {
            return PanelMessage::Empty {
                reason: EmptyReason::NoWorkspace,
            };
        };

        let folder = normalize(folder);
        let seeds: Vec<PathBuf> = index
            .nodes()
            .filter(|node| is_sub_path(&folder, &node.path))
            .map(|node| node.path.clone())
            .collect();
        if seeds.is_empty() {
            return PanelMessage::Empty {
                reason: EmptyReason::NoFilesInFolder,
            };
        }

        let cap = self.config.graph.first_cap();
        self.remember(seeds, cap);

        let graph = materialize(&index, &self.last_seeds, cap, self.symbols.as_ref()).await;
        PanelMessage::Graph { graph }
    }

    /// Drop the cached index; the next request rebuilds it.
    pub fn rescan(&mut self) {
        if self.index.take().is_some() {
            info!("index discarded, rebuilding on next request");
        }
    }

    pub fn read_code(&self, path: &Path) -> PanelMessage {
        PanelMessage::Code {
            path: path.to_string_lossy().to_string(),
            content: self.preview(path),
        }
    }

    pub fn read_code_many(&self, paths: &[PathBuf]) -> PanelMessage {
        let entries = paths
            .iter()
            .map(|path| CodeEntry {
                path: path.to_string_lossy().to_string(),
                content: self.preview(path),
            })
            .collect();
        PanelMessage::CodeMany { entries }
    }

    /// File content cut to the preview limit, or "" if it cannot be read.
    /// Only files below the workspace root are read.
    fn preview(&self, path: &Path) -> String {
        let path = normalize(path);
        let inside = self
            .root
            .as_deref()
            .is_some_and(|root| is_sub_path(root, &path));
        if !inside {
            warn!("refusing preview of {} outside the workspace", path.display());
            return String::new();
        }

        match self.fs.read_to_string(&path) {
            Ok(content) => truncate_preview(content, self.config.preview.max_preview_bytes),
            Err(e) => {
                debug!("no preview for {}: {}", path.display(), e);
                String::new()
            }
        }
    }

    fn remember(&mut self, seeds: Vec<PathBuf>, cap: usize) {
        self.last_seeds = seeds;
        self.last_cap = cap;
    }
}

/// Keep at most `limit` bytes of `content`, cut on a char boundary.
pub fn truncate_preview(mut content: String, limit: usize) -> String {
    if content.len() <= limit {
        return content;
    }
    let mut end = limit;
    while !content.is_char_boundary(end) {
        end -= 1;
    }
    content.truncate(end);
    content.push_str(TRUNCATION_MARKER);
    content
}
