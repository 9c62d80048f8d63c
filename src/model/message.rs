use super::RenderGraph;
use serde::{Deserialize, Serialize};

/// Why a request produced no graph. Surfaced to the panel as an empty state,
/// never as an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EmptyReason {
    NoWorkspace,
    NoMatchedFiles,
    NoFilesInFolder,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CodeEntry {
    pub path: String,
    pub content: String,
}

/// Host-to-panel messages produced by a [`Session`](crate::session::Session).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum PanelMessage {
    Graph { graph: RenderGraph },
    ExpandResult { graph: RenderGraph },
    Empty { reason: EmptyReason },
    Code { path: String, content: String },
    CodeMany { entries: Vec<CodeEntry> },
}

impl PanelMessage {
    /// The graph carried by the message, if any.
    pub fn graph(&self) -> Option<&RenderGraph> {
        match self {
            PanelMessage::Graph { graph } | PanelMessage::ExpandResult { graph } => Some(graph),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_message_wire_shape() {
        let msg = PanelMessage::Empty {
            reason: EmptyReason::NoMatchedFiles,
        };
        assert_eq!(
            serde_json::to_value(&msg).unwrap(),
            json!({"type": "empty", "reason": "no-matched-files"})
        );

        let msg = PanelMessage::ExpandResult {
            graph: RenderGraph::default(),
        };
        assert_eq!(
            serde_json::to_value(&msg).unwrap(),
            json!({"type": "expandResult", "graph": {"nodes": [], "edges": []}})
        );
    }
}
