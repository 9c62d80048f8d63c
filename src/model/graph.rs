use super::{FileNode, Language};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// A bounded slice of the index, shaped for the presentation layer.
///
/// Plain data only: it serializes to the `graph` payload of a panel message.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RenderGraph {
    pub nodes: Vec<RenderNode>,
    pub edges: Vec<RenderEdge>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenderNode {
    pub id: String,
    pub label: String,
    pub path: String,
    #[serde(rename = "lang")]
    pub language: Language,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EdgeKind {
    Import,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderEdge {
    pub id: String,
    pub source: String,
    pub target: String,
    pub kind: EdgeKind,
    /// 0-based line in the importing file of the first import of `target`.
    pub source_line: usize,
    /// 0-based line in the target file the edge should point at. Best effort;
    /// 0 when nothing better is known.
    pub target_line: usize,
    pub target_line_alternatives: Vec<TargetLink>,
}

/// A candidate anchor in the target file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TargetLink {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub symbol_name: Option<String>,
    pub target_line: usize,
}

impl RenderNode {
    pub fn from_file(node: &FileNode) -> Self {
        Self {
            id: node.display_id.clone(),
            label: node.label(),
            path: node.path.to_string_lossy().to_string(),
            language: node.language,
        }
    }
}

impl RenderGraph {
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn node(&self, id: &str) -> Option<&RenderNode> {
        self.nodes.iter().find(|n| n.id == id)
    }

    /// Edges whose endpoints are not both present in `nodes`.
    pub fn dangling_edges(&self) -> Vec<&RenderEdge> {
        let ids: HashSet<&str> = self.nodes.iter().map(|n| n.id.as_str()).collect();
        self.edges
            .iter()
            .filter(|e| !ids.contains(e.source.as_str()) || !ids.contains(e.target.as_str()))
            .collect()
    }
}
