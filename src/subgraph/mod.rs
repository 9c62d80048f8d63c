//! Bounded subgraph materialization.
//!
//! A breadth-first walk from the seeds that follows imports in both
//! directions until the node budget is spent. With a fixed index and seed
//! list the walk is deterministic, so raising the budget ("load more")
//! yields a graph whose node list extends the smaller one.

mod enrich;

pub use enrich::{MAX_ALTERNATIVES, SYMBOL_TIMEOUT, choose_anchor, enrich_edges};

use crate::ids;
use crate::index::WorkspaceIndex;
use crate::model::{EdgeKind, RenderEdge, RenderGraph, RenderNode};
use crate::symbols::SymbolProvider;
use petgraph::graph::NodeIndex;
use std::collections::{HashSet, VecDeque};
use std::path::Path;
use tracing::debug;

/// Frontier size used when no seed is part of the index.
pub const FALLBACK_SEEDS: usize = 10;

/// Where a traversal started.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Seeding {
    /// This many distinct seeds were found in the index.
    Seeds(usize),
    /// No seed was usable; the first files of the index were used instead.
    Fallback,
}

/// How the frontier for `seeds` will be chosen.
pub fn seeding<P: AsRef<Path>>(index: &WorkspaceIndex, seeds: &[P]) -> Seeding {
    match valid_seeds(index, seeds).len() {
        0 => Seeding::Fallback,
        n => Seeding::Seeds(n),
    }
}

/// Materialize at most `max_nodes` files around `seeds`, without edge
/// enrichment (every `target_line` is 0).
pub fn subgraph<P: AsRef<Path>>(
    index: &WorkspaceIndex,
    seeds: &[P],
    max_nodes: usize,
) -> RenderGraph {
    let frontier = match valid_seeds(index, seeds) {
        found if !found.is_empty() => found,
        _ => {
            debug!("no seed is part of the index, starting from the first files");
            index.node_indices().take(FALLBACK_SEEDS).collect()
        }
    };

    let visited = traverse(index, frontier, max_nodes);
    render(index, &visited)
}

/// [`subgraph`] followed by best-effort edge enrichment from `symbols`.
pub async fn materialize<P: AsRef<Path>>(
    index: &WorkspaceIndex,
    seeds: &[P],
    max_nodes: usize,
    symbols: &dyn SymbolProvider,
) -> RenderGraph {
    let mut graph = subgraph(index, seeds, max_nodes);
    enrich_edges(&mut graph, symbols).await;
    graph
}

/// Seeds present in the index, deduplicated, in the order given.
fn valid_seeds<P: AsRef<Path>>(index: &WorkspaceIndex, seeds: &[P]) -> Vec<NodeIndex> {
    let mut seen = HashSet::new();
    seeds
        .iter()
        .filter_map(|seed| index.index_of(seed.as_ref()))
        .filter(|idx| seen.insert(*idx))
        .collect()
}

fn traverse(index: &WorkspaceIndex, frontier: Vec<NodeIndex>, max_nodes: usize) -> Vec<NodeIndex> {
    let mut seen: HashSet<NodeIndex> = HashSet::new();
    let mut order: Vec<NodeIndex> = Vec::new();
    let mut queue: VecDeque<NodeIndex> = VecDeque::new();

    for idx in frontier {
        if order.len() >= max_nodes {
            break;
        }
        if seen.insert(idx) {
            order.push(idx);
            queue.push_back(idx);
        }
    }

    while order.len() < max_nodes {
        let Some(current) = queue.pop_front() else {
            break;
        };

        // Imports first, then importers.
        let forward = index.outgoing(current).into_iter().map(|(target, _)| target);
        let backward = index.incoming(current);

        for next in forward.chain(backward) {
            if order.len() >= max_nodes {
                break;
            }
            if seen.insert(next) {
                order.push(next);
                queue.push_back(next);
            }
        }
    }

    order
}

fn render(index: &WorkspaceIndex, visited: &[NodeIndex]) -> RenderGraph {
    let members: HashSet<NodeIndex> = visited.iter().copied().collect();

    let nodes = visited
        .iter()
        .map(|idx| RenderNode::from_file(index.file(*idx)))
        .collect();

    let mut edges = Vec::new();
    for &source_idx in visited {
        let source = index.file(source_idx);
        for (target_idx, edge) in index.outgoing(source_idx) {
            if !members.contains(&target_idx) {
                continue;
            }
            let target = index.file(target_idx);
            let source_line = edge.first_line();
            edges.push(RenderEdge {
                id: ids::edge_id(&source.path, &target.path, source_line),
                source: source.display_id.clone(),
                target: target.display_id.clone(),
                kind: EdgeKind::Import,
                source_line,
                target_line: 0,
                target_line_alternatives: Vec::new(),
            });
        }
    }

    RenderGraph { nodes, edges }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fs::mock::MockFs;
    use crate::index::build_index;
    use std::path::PathBuf;

    fn index_of(files: &[(&str, &str)]) -> WorkspaceIndex {
        let fs = MockFs::with_files(files.iter().map(|(p, c)| (Path::new(*p), *c)));
        build_index(&fs, Path::new("/ws"), &[])
    }

    fn scenario() -> WorkspaceIndex {
        index_of(&[
            ("/ws/a.ts", "import { b } from './b'\n"),
            ("/ws/b.ts", "import { c } from './c'\n"),
            ("/ws/c.ts", "export const c = 1\n"),
            ("/ws/pkg.ts", "import _ from 'lodash'\n"),
        ])
    }

    fn paths(graph: &RenderGraph) -> Vec<&str> {
        graph.nodes.iter().map(|n| n.path.as_str()).collect()
    }

    fn edge_pairs(graph: &RenderGraph) -> Vec<(String, String)> {
        let label = |id: &str| graph.node(id).map(|n| n.label.clone()).unwrap_or_default();
        graph
            .edges
            .iter()
            .map(|e| (label(&e.source), label(&e.target)))
            .collect()
    }

    /// hub.ts imported by many leaves, importing one util.
    fn star(leaves: usize) -> WorkspaceIndex {
        let mut files: Vec<(String, String)> = vec![
            ("/ws/hub.ts".into(), "import { u } from './util'\n".into()),
            ("/ws/util.ts".into(), "export const u = 1\n".into()),
        ];
        for i in 0..leaves {
            files.push((format!("/ws/leaf{i:02}.ts"), "import { h } from './hub'\n".into()));
        }
        let fs = MockFs::with_files(files);
        build_index(&fs, Path::new("/ws"), &[])
    }

    #[test]
    fn test_reachable_files_from_seed() {
        let index = scenario();
        let graph = subgraph(&index, &["/ws/a.ts"], 10);

        assert_eq!(paths(&graph), vec!["/ws/a.ts", "/ws/b.ts", "/ws/c.ts"]);
        assert_eq!(
            edge_pairs(&graph),
            vec![
                ("a.ts".to_string(), "b.ts".to_string()),
                ("b.ts".to_string(), "c.ts".to_string())
            ]
        );
        assert!(graph.edges.iter().all(|e| !e.target.contains("pkg") && !e.target.contains("lodash")));
    }

    #[test]
    fn test_backward_expansion_reaches_importers() {
        let index = scenario();
        let graph = subgraph(&index, &["/ws/c.ts"], 10);
        assert_eq!(paths(&graph), vec!["/ws/c.ts", "/ws/b.ts", "/ws/a.ts"]);
    }

    #[test]
    fn test_node_budget_is_respected() {
        let index = star(30);
        for cap in [0, 1, 2, 5, 17, 32, 100] {
            let graph = subgraph(&index, &["/ws/hub.ts"], cap);
            assert!(graph.nodes.len() <= cap, "cap {cap} exceeded");
            assert!(graph.dangling_edges().is_empty(), "dangling edge at cap {cap}");
        }
        assert_eq!(subgraph(&index, &["/ws/hub.ts"], 100).nodes.len(), 32);
    }

    #[test]
    fn test_oversized_seed_list_is_capped() {
        let index = star(30);
        let seeds: Vec<PathBuf> = index.nodes().map(|n| n.path.clone()).collect();
        let graph = subgraph(&index, &seeds, 4);
        assert_eq!(graph.nodes.len(), 4);
    }

    #[test]
    fn test_fallback_when_no_seed_is_valid() {
        let index = star(30);
        let none: [&str; 0] = [];

        let graph = subgraph(&index, &none, 5);
        assert_eq!(graph.nodes.len(), 5);

        let graph = subgraph(&index, &["/ws/missing.ts", "/elsewhere/x.py"], 300);
        assert!(!graph.is_empty());
        assert_eq!(seeding(&index, &["/ws/missing.ts"]), Seeding::Fallback);
        assert_eq!(seeding(&index, &["/ws/hub.ts", "/ws/./hub.ts"]), Seeding::Seeds(1));
    }

    #[test]
    fn test_fallback_on_small_index_uses_every_file() {
        let index = scenario();
        let none: [&str; 0] = [];
        let graph = subgraph(&index, &none, 300);
        assert_eq!(graph.nodes.len(), 4);
    }

    #[test]
    fn test_empty_index_gives_empty_graph() {
        let index = WorkspaceIndex::empty(Path::new("/ws"));
        let graph = subgraph(&index, &["/ws/a.ts"], 300);
        assert!(graph.is_empty());
        assert!(graph.edges.is_empty());
    }

    #[test]
    fn test_larger_budget_extends_smaller_result() {
        let index = star(20);
        let small = subgraph(&index, &["/ws/leaf03.ts"], 6);
        let large = subgraph(&index, &["/ws/leaf03.ts"], 15);

        assert_eq!(&large.nodes[..small.nodes.len()], small.nodes.as_slice());
    }

    #[test]
    fn test_ids_are_stable_across_runs() {
        let index = scenario();
        let first = subgraph(&index, &["/ws/a.ts"], 10);
        let second = subgraph(&index, &["/ws/a.ts"], 10);
        assert_eq!(first, second);

        let rebuilt = scenario();
        let third = subgraph(&rebuilt, &["/ws/a.ts"], 10);
        let ids = |g: &RenderGraph| g.edges.iter().map(|e| e.id.clone()).collect::<Vec<_>>();
        assert_eq!(ids(&first), ids(&third));
    }

    #[test]
    fn test_one_edge_per_target_with_first_line() {
        let index = index_of(&[
            ("/ws/main.ts", "// x\nimport { a } from './util'\nimport { b } from './util'\n"),
            ("/ws/util.ts", ""),
        ]);
        let graph = subgraph(&index, &["/ws/main.ts"], 10);

        assert_eq!(graph.edges.len(), 1);
        assert_eq!(graph.edges[0].source_line, 1);
        assert_eq!(graph.edges[0].target_line, 0);
        assert_eq!(graph.edges[0].kind, EdgeKind::Import);
    }

    #[test]
    fn test_cycles_terminate() {
        let index = index_of(&[
            ("/ws/x.ts", "import './y'\n"),
            ("/ws/y.ts", "import './x'\n"),
            ("/ws/self.ts", "import './self'\n"),
        ]);
        let graph = subgraph(&index, &["/ws/x.ts"], 10);
        assert_eq!(paths(&graph), vec!["/ws/x.ts", "/ws/y.ts"]);
        assert_eq!(graph.edges.len(), 2);

        let graph = subgraph(&index, &["/ws/self.ts"], 10);
        assert_eq!(graph.nodes.len(), 1);
        assert_eq!(graph.edges.len(), 1);
    }
}
