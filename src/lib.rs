pub mod api;
pub mod cli;
pub mod commands;
pub mod config;
pub mod fs;
pub mod ids;
pub mod index;
pub mod model;
pub mod parser;
pub mod path;
pub mod resolve;
pub mod server;
pub mod session;
pub mod style;
pub mod subgraph;
pub mod symbols;

pub use api::{
    CanvasError, GraphOptions, IndexOptions, graph, graph_enriched, index_workspace,
    load_workspace, open_session,
};
pub use cli::Cli;
pub use commands::{cmd_graph, cmd_index, cmd_init, cmd_serve};
pub use config::Config;
pub use index::{IndexStats, WorkspaceIndex, build_index};
pub use model::{PanelMessage, RenderEdge, RenderGraph, RenderNode};
pub use parser::{Specifier, parse_specifiers};
pub use path::normalize;
pub use resolve::resolve;
pub use session::Session;
pub use subgraph::{materialize, subgraph};
