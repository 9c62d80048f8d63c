//! The workspace-wide import graph.
//!
//! A [`WorkspaceIndex`] is built once per root by [`build_index`] and is
//! read-only afterwards, so any number of materializations can share it
//! behind an `Arc`. Rescanning builds a new index; it never mutates an old one.

mod builder;

pub use builder::{build_exclude_glob_set, build_index, build_index_async};

use crate::model::{FileNode, Language};
use crate::parser::Specifier;
use crate::path::normalize;
use petgraph::Direction;
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::EdgeRef;
use serde::Serialize;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// "File A imports file B", with every line of A that references B.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportEdge {
    /// Ascending, distinct, 0-based.
    pub lines: Vec<usize>,
}

impl ImportEdge {
    pub fn first_line(&self) -> usize {
        self.lines.first().copied().unwrap_or(0)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct IndexStats {
    pub files: usize,
    pub typescript: usize,
    pub javascript: usize,
    pub python: usize,
    pub other: usize,
    pub edges: usize,
    pub specifiers: usize,
    pub unresolved: usize,
}

#[derive(Debug, Clone)]
pub struct WorkspaceIndex {
    root: PathBuf,
    graph: DiGraph<FileNode, ImportEdge>,
    node_indices: HashMap<PathBuf, NodeIndex>,
    id_indices: HashMap<String, NodeIndex>,
    /// Raw specifiers per node, indexed by `NodeIndex::index()`.
    specifiers: Vec<Vec<Specifier>>,
    unresolved: usize,
}

impl WorkspaceIndex {
    /// An index with no files.
    pub fn empty(root: &Path) -> Self {
        Self {
            root: normalize(root),
            graph: DiGraph::new(),
            node_indices: HashMap::new(),
            id_indices: HashMap::new(),
            specifiers: Vec::new(),
            unresolved: 0,
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn len(&self) -> usize {
        self.graph.node_count()
    }

    pub fn is_empty(&self) -> bool {
        self.graph.node_count() == 0
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    pub fn contains(&self, path: &Path) -> bool {
        self.index_of(path).is_some()
    }

    pub fn node(&self, path: &Path) -> Option<&FileNode> {
        self.index_of(path).map(|idx| &self.graph[idx])
    }

    /// Look a node up by its wire id.
    pub fn node_by_id(&self, id: &str) -> Option<&FileNode> {
        self.id_indices.get(id).map(|idx| &self.graph[*idx])
    }

    pub fn language(&self, path: &Path) -> Option<Language> {
        self.node(path).map(|n| n.language)
    }

    /// All nodes in enumeration order (sorted by path).
    pub fn nodes(&self) -> impl Iterator<Item = &FileNode> {
        self.graph.node_weights()
    }

    /// Resolved imports of `path` with their source lines, in order of first
    /// appearance in the importing file.
    pub fn imports(&self, path: &Path) -> Vec<(&FileNode, &[usize])> {
        match self.index_of(path) {
            Some(idx) => self
                .outgoing(idx)
                .into_iter()
                .map(|(target, edge)| (&self.graph[target], edge.lines.as_slice()))
                .collect(),
            None => Vec::new(),
        }
    }

    /// Files that import `path`, in enumeration order.
    pub fn importers(&self, path: &Path) -> Vec<&FileNode> {
        match self.index_of(path) {
            Some(idx) => self
                .incoming(idx)
                .into_iter()
                .map(|source| &self.graph[source])
                .collect(),
            None => Vec::new(),
        }
    }

    /// Raw specifiers of `path` as parsed, resolved or not.
    pub fn specifiers(&self, path: &Path) -> &[Specifier] {
        self.index_of(path)
            .and_then(|idx| self.specifiers.get(idx.index()))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn stats(&self) -> IndexStats {
        let mut stats = IndexStats {
            files: self.len(),
            edges: self.edge_count(),
            specifiers: self.specifiers.iter().map(Vec::len).sum(),
            unresolved: self.unresolved,
            ..Default::default()
        };
        for node in self.nodes() {
            match node.language {
                Language::TypeScript => stats.typescript += 1,
                Language::JavaScript => stats.javascript += 1,
                Language::Python => stats.python += 1,
                Language::Other => stats.other += 1,
            }
        }
        stats
    }

    pub(crate) fn index_of(&self, path: &Path) -> Option<NodeIndex> {
        self.node_indices.get(&normalize(path)).copied()
    }

    pub(crate) fn file(&self, idx: NodeIndex) -> &FileNode {
        &self.graph[idx]
    }

    pub(crate) fn node_indices(&self) -> impl Iterator<Item = NodeIndex> {
        self.graph.node_indices()
    }

    /// Outgoing edges ordered by first source line, then target path.
    pub(crate) fn outgoing(&self, idx: NodeIndex) -> Vec<(NodeIndex, &ImportEdge)> {
        let mut edges: Vec<(NodeIndex, &ImportEdge)> = self
            .graph
            .edges_directed(idx, Direction::Outgoing)
            .map(|e| (e.target(), e.weight()))
            .collect();
        edges.sort_by(|a, b| {
            a.1.first_line()
                .cmp(&b.1.first_line())
                .then_with(|| self.graph[a.0].path.cmp(&self.graph[b.0].path))
        });
        edges
    }

    /// Importers of `idx`, ordered by node index. The graph keeps incoming
    /// adjacency, so this is proportional to the in-degree, not the file count.
    pub(crate) fn incoming(&self, idx: NodeIndex) -> Vec<NodeIndex> {
        let mut sources: Vec<NodeIndex> = self
            .graph
            .neighbors_directed(idx, Direction::Incoming)
            .collect();
        sources.sort();
        sources.dedup();
        sources
    }

    fn add_file(&mut self, node: FileNode) -> NodeIndex {
        let path = node.path.clone();
        let id = node.display_id.clone();
        let idx = self.graph.add_node(node);
        self.node_indices.insert(path, idx);
        self.id_indices.insert(id, idx);
        self.specifiers.push(Vec::new());
        idx
    }
}
