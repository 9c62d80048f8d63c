use super::{ImportEdge, WorkspaceIndex};
use crate::fs::FileSystem;
use crate::model::{FileNode, is_indexed_extension};
use crate::parser::ParserRegistry;
use crate::path::normalize;
use crate::resolve::resolve;
use globset::{Glob, GlobSet, GlobSetBuilder};
use petgraph::graph::NodeIndex;
use std::collections::{BTreeSet, HashMap};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Build the import index for every JS/TS/Python file under `root`.
///
/// Never fails: unreadable files contribute no imports, unresolvable
/// specifiers are counted and dropped, and an inaccessible root produces an
/// empty index. Resolved targets outside the enumerated file set (for
/// example inside an excluded directory) are dropped as well.
pub fn build_index(fs: &dyn FileSystem, root: &Path, exclude_globs: &[String]) -> WorkspaceIndex {
    let root = normalize(root);
    let excludes = build_exclude_glob_set(exclude_globs);
    let registry = ParserRegistry::new();

    let files: BTreeSet<PathBuf> = fs
        .list_files(&root)
        .into_iter()
        .filter(|path| is_indexed_extension(path))
        .map(|path| normalize(&path))
        .filter(|path| !is_excluded(&excludes, &root, path))
        .collect();

    let mut index = WorkspaceIndex::empty(&root);
    for path in files {
        index.add_file(FileNode::new(path));
    }

    let all: Vec<NodeIndex> = index.node_indices().collect();
    for idx in all {
        let node = index.file(idx).clone();

        let source = match fs.read_to_string(&node.path) {
            Ok(source) => source,
            Err(e) => {
                debug!("treating {} as empty: {}", node.path.display(), e);
                String::new()
            }
        };
        let specifiers = registry.parse(&source, node.language);

        // target -> lines, in order of first reference
        let mut targets: Vec<(NodeIndex, Vec<usize>)> = Vec::new();
        let mut positions: HashMap<NodeIndex, usize> = HashMap::new();

        for spec in &specifiers {
            let Some(resolved) = resolve(fs, &root, &node.path, &spec.text, node.language) else {
                index.unresolved += 1;
                continue;
            };
            let Some(target) = index.index_of(&resolved) else {
                debug!(
                    "{} -> {} resolves outside the indexed files",
                    node.path.display(),
                    resolved.display()
                );
                index.unresolved += 1;
                continue;
            };

            let pos = *positions.entry(target).or_insert_with(|| {
                targets.push((target, Vec::new()));
                targets.len() - 1
            });
            let lines = &mut targets[pos].1;
            if lines.last() != Some(&spec.line) {
                lines.push(spec.line);
            }
        }

        for (target, lines) in targets {
            index.graph.add_edge(idx, target, ImportEdge { lines });
        }
        index.specifiers[idx.index()] = specifiers;
    }

    let stats = index.stats();
    info!(
        "indexed {} files under {} ({} import edges, {} of {} specifiers unresolved)",
        stats.files,
        root.display(),
        stats.edges,
        stats.unresolved,
        stats.specifiers
    );

    index
}

/// [`build_index`] on the blocking pool, for callers on an async runtime.
pub async fn build_index_async(
    fs: Arc<dyn FileSystem>,
    root: PathBuf,
    exclude_globs: Vec<String>,
) -> WorkspaceIndex {
    let fallback_root = root.clone();
    match tokio::task::spawn_blocking(move || build_index(fs.as_ref(), &root, &exclude_globs)).await
    {
        Ok(index) => index,
        Err(e) => {
            warn!("indexing {} aborted: {}", fallback_root.display(), e);
            WorkspaceIndex::empty(&fallback_root)
        }
    }
}

/// Build a glob set from exclude patterns. Invalid patterns are skipped.
pub fn build_exclude_glob_set(patterns: &[String]) -> GlobSet {
    let mut builder = GlobSetBuilder::new();
    for pattern in patterns {
        match Glob::new(pattern) {
            Ok(glob) => {
                builder.add(glob);
            }
            Err(e) => warn!("ignoring invalid exclude glob {:?}: {}", pattern, e),
        }
    }
    builder.build().unwrap_or_else(|e| {
        warn!("exclude globs unusable, indexing everything: {}", e);
        GlobSet::empty()
    })
}

/// Patterns are matched against the root-relative path with `/` separators,
/// and against the absolute path.
fn is_excluded(excludes: &GlobSet, root: &Path, path: &Path) -> bool {
    if excludes.is_empty() {
        return false;
    }
    let rel = path
        .strip_prefix(root)
        .unwrap_or(path)
        .to_string_lossy()
        .replace('\\', "/");
    excludes.is_match(&rel) || excludes.is_match(path)
}
