use crate::model::{RenderGraph, TargetLink};
use crate::symbols::{DocumentSymbol, SymbolProvider};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, warn};

/// Upper bound for one document-symbol lookup.
pub const SYMBOL_TIMEOUT: Duration = Duration::from_secs(2);

/// Alternative anchors reported per edge.
pub const MAX_ALTERNATIVES: usize = 8;

/// Point every edge at a symbol of its target file.
///
/// Each target is looked up at most once per call. Failures, timeouts and
/// files without symbols leave the edge at line 0 with no alternatives;
/// nothing here can fail the surrounding materialization.
pub async fn enrich_edges(graph: &mut RenderGraph, symbols: &dyn SymbolProvider) {
    let paths: HashMap<String, PathBuf> = graph
        .nodes
        .iter()
        .map(|n| (n.id.clone(), PathBuf::from(&n.path)))
        .collect();
    let mut cache: HashMap<String, (usize, Vec<TargetLink>)> = HashMap::new();

    for edge in &mut graph.edges {
        let Some(path) = paths.get(&edge.target) else {
            continue;
        };
        if !cache.contains_key(&edge.target) {
            let found = lookup(symbols, path).await;
            cache.insert(edge.target.clone(), choose_anchor(&found));
        }
        if let Some((line, alternatives)) = cache.get(&edge.target) {
            edge.target_line = *line;
            edge.target_line_alternatives = alternatives.clone();
        }
    }
}

async fn lookup(symbols: &dyn SymbolProvider, path: &Path) -> Vec<DocumentSymbol> {
    match tokio::time::timeout(SYMBOL_TIMEOUT, symbols.document_symbols(path)).await {
        Ok(Ok(found)) => found,
        Ok(Err(e)) => {
            debug!("no symbols for {}: {}", path.display(), e);
            Vec::new()
        }
        Err(_) => {
            warn!(
                "symbol lookup for {} timed out after {:?}",
                path.display(),
                SYMBOL_TIMEOUT
            );
            Vec::new()
        }
    }
}

/// Pick the line an edge should land on, plus other candidate anchors.
///
/// A lone symbol is the anchor. With several, the first class, function or
/// method wins (falling back to the first symbol), and the remaining
/// classes, functions and methods become alternatives.
pub fn choose_anchor(symbols: &[DocumentSymbol]) -> (usize, Vec<TargetLink>) {
    match symbols {
        [] => (0, Vec::new()),
        [only] => (only.start_line, Vec::new()),
        _ => {
            let chosen = symbols
                .iter()
                .position(|s| s.kind.is_anchor_kind())
                .unwrap_or(0);
            let alternatives = symbols
                .iter()
                .enumerate()
                .filter(|(i, s)| *i != chosen && s.kind.is_anchor_kind())
                .take(MAX_ALTERNATIVES)
                .map(|(_, s)| TargetLink {
                    symbol_name: Some(s.name.clone()),
                    target_line: s.start_line,
                })
                .collect();
            (symbols[chosen].start_line, alternatives)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fs::mock::MockFs;
    use crate::index::build_index;
    use crate::subgraph::{materialize, subgraph};
    use crate::symbols::{NoSymbols, SymbolError, SymbolKind};
    use async_trait::async_trait;
    use std::sync::Mutex;

    fn sym(name: &str, kind: SymbolKind, line: usize) -> DocumentSymbol {
        DocumentSymbol {
            name: name.to_string(),
            kind,
            start_line: line,
        }
    }

    /// Serves fixed symbols per file name and records every lookup.
    #[derive(Default)]
    struct ScriptedSymbols {
        by_name: HashMap<String, Vec<DocumentSymbol>>,
        calls: Mutex<Vec<PathBuf>>,
    }

    impl ScriptedSymbols {
        fn with(mut self, file: &str, symbols: Vec<DocumentSymbol>) -> Self {
            self.by_name.insert(file.to_string(), symbols);
            self
        }
    }

    #[async_trait]
    impl SymbolProvider for ScriptedSymbols {
        async fn document_symbols(&self, path: &Path) -> Result<Vec<DocumentSymbol>, SymbolError> {
            self.calls.lock().unwrap().push(path.to_path_buf());
            let name = path.file_name().unwrap().to_string_lossy().to_string();
            Ok(self.by_name.get(&name).cloned().unwrap_or_default())
        }
    }

    struct FailingSymbols;

    #[async_trait]
    impl SymbolProvider for FailingSymbols {
        async fn document_symbols(&self, _path: &Path) -> Result<Vec<DocumentSymbol>, SymbolError> {
            Err(SymbolError::Unavailable("language server not running".into()))
        }
    }

    /// Answers with a class, but only long after any reasonable deadline.
    struct StalledSymbols;

    #[async_trait]
    impl SymbolProvider for StalledSymbols {
        async fn document_symbols(&self, _path: &Path) -> Result<Vec<DocumentSymbol>, SymbolError> {
            tokio::time::sleep(SYMBOL_TIMEOUT * 30).await;
            Ok(vec![sym("Late", SymbolKind::Class, 7)])
        }
    }

    fn hub_workspace() -> crate::index::WorkspaceIndex {
        let fs = MockFs::with_files([
            ("/ws/a.ts", "import { Util } from './util'\n"),
            ("/ws/b.ts", "\n\nimport { helper } from './util'\n"),
            ("/ws/util.ts", "const x = 1\nexport class Util {}\nexport function helper() {}\n"),
        ]);
        build_index(&fs, Path::new("/ws"), &[])
    }

    #[test]
    fn test_no_symbols_means_line_zero() {
        assert_eq!(choose_anchor(&[]), (0, Vec::new()));
    }

    #[test]
    fn test_single_symbol_is_the_anchor() {
        let (line, alternatives) = choose_anchor(&[sym("CONFIG", SymbolKind::Variable, 4)]);
        assert_eq!(line, 4);
        assert!(alternatives.is_empty());
    }

    #[test]
    fn test_first_class_or_function_wins() {
        let symbols = vec![
            sym("x", SymbolKind::Variable, 0),
            sym("Util", SymbolKind::Class, 1),
            sym("Shape", SymbolKind::Interface, 5),
            sym("helper", SymbolKind::Function, 9),
        ];
        let (line, alternatives) = choose_anchor(&symbols);
        assert_eq!(line, 1);
        assert_eq!(
            alternatives,
            vec![TargetLink {
                symbol_name: Some("helper".to_string()),
                target_line: 9
            }]
        );
    }

    #[test]
    fn test_without_anchor_kinds_first_symbol_wins() {
        let symbols = vec![
            sym("A", SymbolKind::Variable, 2),
            sym("B", SymbolKind::TypeAlias, 7),
        ];
        assert_eq!(choose_anchor(&symbols), (2, Vec::new()));
    }

    #[test]
    fn test_alternatives_are_capped() {
        let symbols: Vec<DocumentSymbol> = (0..20)
            .map(|i| sym(&format!("f{i}"), SymbolKind::Function, i))
            .collect();
        let (line, alternatives) = choose_anchor(&symbols);
        assert_eq!(line, 0);
        assert_eq!(alternatives.len(), MAX_ALTERNATIVES);
        assert_eq!(alternatives[0].target_line, 1);
    }

    #[tokio::test]
    async fn test_each_target_is_looked_up_once() {
        let index = hub_workspace();
        let provider = ScriptedSymbols::default().with(
            "util.ts",
            vec![
                sym("x", SymbolKind::Variable, 0),
                sym("Util", SymbolKind::Class, 1),
                sym("helper", SymbolKind::Function, 2),
            ],
        );

        let graph = materialize(&index, &["/ws/util.ts"], 10, &provider).await;

        assert_eq!(graph.edges.len(), 2);
        for edge in &graph.edges {
            assert_eq!(edge.target_line, 1);
            assert_eq!(edge.target_line_alternatives.len(), 1);
        }
        let calls = provider.calls.lock().unwrap();
        assert_eq!(calls.as_slice(), &[PathBuf::from("/ws/util.ts")]);
    }

    #[tokio::test]
    async fn test_failing_provider_leaves_edges_unanchored() {
        let index = hub_workspace();
        let plain = subgraph(&index, &["/ws/util.ts"], 10);
        let graph = materialize(&index, &["/ws/util.ts"], 10, &FailingSymbols).await;

        assert_eq!(graph, plain);
        assert!(graph.edges.iter().all(|e| e.target_line == 0));
    }

    #[tokio::test(start_paused = true)]
    async fn test_stalled_provider_times_out() {
        let index = hub_workspace();
        let started = tokio::time::Instant::now();

        let graph = materialize(&index, &["/ws/util.ts"], 10, &StalledSymbols).await;

        // one distinct target, so exactly one deadline is spent
        let elapsed = started.elapsed();
        assert!(elapsed >= SYMBOL_TIMEOUT && elapsed < SYMBOL_TIMEOUT * 2);
        assert_eq!(graph, subgraph(&index, &["/ws/util.ts"], 10));
        assert!(
            graph
                .edges
                .iter()
                .all(|e| e.target_line == 0 && e.target_line_alternatives.is_empty())
        );
    }

    #[tokio::test]
    async fn test_no_symbols_provider_matches_plain_subgraph() {
        let index = hub_workspace();
        let graph = materialize(&index, &["/ws/a.ts"], 10, &NoSymbols).await;
        assert_eq!(graph, subgraph(&index, &["/ws/a.ts"], 10));
    }

    #[tokio::test]
    async fn test_enrichment_does_not_change_ids() {
        let index = hub_workspace();
        let provider =
            ScriptedSymbols::default().with("util.ts", vec![sym("Util", SymbolKind::Class, 1)]);

        let plain = subgraph(&index, &["/ws/a.ts"], 10);
        let enriched = materialize(&index, &["/ws/a.ts"], 10, &provider).await;

        let ids = |g: &RenderGraph| g.edges.iter().map(|e| e.id.clone()).collect::<Vec<_>>();
        assert_eq!(ids(&plain), ids(&enriched));
        assert_eq!(enriched.edges[0].target_line, 1);
    }
}
