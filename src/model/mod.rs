mod graph;
mod language;
mod message;
mod node;

pub use graph::{EdgeKind, RenderEdge, RenderGraph, RenderNode, TargetLink};
pub use language::{ECMASCRIPT_EXTENSIONS, Language, PYTHON_EXTENSIONS, is_indexed_extension};
pub use message::{CodeEntry, EmptyReason, PanelMessage};
pub use node::FileNode;
