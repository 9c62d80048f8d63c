//! Path canonicalization for use as map keys.
//!
//! Every path stored in or looked up from a [`WorkspaceIndex`](crate::index::WorkspaceIndex)
//! goes through [`normalize`] first. The walker, the editor and user input all
//! spell the same file differently (`./a/../b.ts`, trailing separators, `C:` vs
//! `c:`); without a single canonical form the same file shows up as two nodes.
//!
//! Normalization is purely lexical: symlinks are not followed and the
//! filesystem is never consulted.

use std::ffi::OsString;
use std::path::{Component, Path, PathBuf, Prefix, PrefixComponent};

/// Canonicalize `path` lexically. Idempotent.
///
/// - `.` segments are dropped and `..` segments pop their parent; a `..` that
///   would climb above the root is discarded, one that climbs above a relative
///   start is kept.
/// - Repeated and trailing separators collapse; on Windows `/` becomes `\`.
/// - Drive designators are folded to lower case (`C:` -> `c:`), since the
///   volume letter is case-insensitive but arrives in both spellings.
pub fn normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();

    for component in path.components() {
        match component {
            Component::Prefix(prefix) => out.push(fold_prefix(prefix)),
            Component::RootDir => out.push(Component::RootDir.as_os_str()),
            Component::CurDir => {}
            Component::ParentDir => match out.components().next_back() {
                Some(Component::Normal(_)) => {
                    out.pop();
                }
                Some(Component::RootDir) | Some(Component::Prefix(_)) => {}
                Some(Component::ParentDir) | Some(Component::CurDir) | None => {
                    out.push(Component::ParentDir.as_os_str())
                }
            },
            Component::Normal(part) => out.push(part),
        }
    }

    out
}

/// True if `child` lies strictly below `parent`, after normalizing both.
/// On Windows the comparison ignores case.
pub fn is_sub_path(parent: &Path, child: &Path) -> bool {
    let parent = normalize(parent);
    let child = normalize(child);

    let (parent, child) = if cfg!(windows) {
        (
            PathBuf::from(parent.to_string_lossy().to_lowercase()),
            PathBuf::from(child.to_string_lossy().to_lowercase()),
        )
    } else {
        (parent, child)
    };

    child != parent && child.starts_with(&parent)
}

fn fold_prefix(prefix: PrefixComponent<'_>) -> OsString {
    match prefix.kind() {
        Prefix::Disk(letter) => format!("{}:", (letter as char).to_ascii_lowercase()).into(),
        Prefix::VerbatimDisk(letter) => {
            format!(r"\\?\{}:", (letter as char).to_ascii_lowercase()).into()
        }
        _ => prefix.as_os_str().to_os_string(),
    }
}
