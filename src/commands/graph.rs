use crate::cli::GraphArgs;
use crate::fs::{FileSystem, RealFs, default_fs};
use crate::index::build_index;
use crate::model::{EmptyReason, PanelMessage};
use crate::style;
use crate::subgraph::{Seeding, materialize, seeding, subgraph};
use crate::symbols::TreeSitterSymbols;
use std::path::PathBuf;
use std::sync::Arc;

use super::CommandContext;

pub fn cmd_graph(args: GraphArgs) -> i32 {
    let ctx = match CommandContext::new(&args.path) {
        Ok(ctx) => ctx,
        Err(code) => return code,
    };

    let index = build_index(default_fs(), &ctx.path, &ctx.config.index.exclude_globs);
    let seeds: Vec<PathBuf> = args.seeds.iter().map(|s| ctx.absolutize(s)).collect();
    let max_nodes = args.max_nodes.unwrap_or(ctx.config.graph.max_nodes);

    if !seeds.is_empty() && seeding(&index, &seeds) == Seeding::Fallback {
        style::warning("None of the seeds is an indexed file; starting from the first files instead");
    }

    let graph = if args.enrich {
        let rt = match tokio::runtime::Runtime::new() {
            Ok(rt) => rt,
            Err(e) => {
                style::error(&format!("Failed to start async runtime: {}", e));
                return 1;
            }
        };
        let symbols = TreeSitterSymbols::new(Arc::new(RealFs));
        rt.block_on(materialize(&index, &seeds, max_nodes, &symbols))
    } else {
        subgraph(&index, &seeds, max_nodes)
    };

    let message = if graph.is_empty() {
        PanelMessage::Empty {
            reason: EmptyReason::NoMatchedFiles,
        }
    } else {
        PanelMessage::Graph { graph }
    };

    let json = match serde_json::to_string_pretty(&message) {
        Ok(json) => json,
        Err(e) => {
            style::error(&format!("Failed to serialize graph: {}", e));
            return 1;
        }
    };

    match &args.output {
        Some(output_path) => {
            if let Err(e) = default_fs().write(output_path, &json) {
                style::error(&format!("Failed to write output file: {}", e));
                return 1;
            }
            if let Some(graph) = message.graph() {
                style::success(&format!(
                    "Wrote {} to {}",
                    style::graph_summary(graph),
                    style::path(output_path)
                ));
            }
        }
        None => println!("{}", json),
    }

    0
}
