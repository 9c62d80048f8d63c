//! Specifier to file resolution.
//!
//! Resolution is deliberately shallow: relative ECMAScript paths with a fixed
//! extension probe order, and root-relative dotted Python modules. Everything
//! else (packages, path aliases, relative Python imports, namespace packages)
//! is unresolved, which is the common case and not an error.

use crate::fs::FileSystem;
use crate::model::Language;
use crate::path::normalize;
use std::ffi::OsString;
use std::path::{Path, PathBuf};

/// Suffixes probed after the literal path, in priority order. TypeScript
/// sources win over compiled JavaScript sitting next to them.
pub const ECMASCRIPT_PROBES: &[&str] = &[
    "",
    ".ts",
    ".tsx",
    ".js",
    ".jsx",
    "/index.ts",
    "/index.tsx",
    "/index.js",
    "/index.jsx",
];

/// Resolve `specifier`, found in `from_file`, to an existing file.
///
/// The result is normalized. Only regular files resolve; a directory that
/// happens to match the literal specifier falls through to the index probes.
pub fn resolve(
    fs: &dyn FileSystem,
    root: &Path,
    from_file: &Path,
    specifier: &str,
    language: Language,
) -> Option<PathBuf> {
    match language {
        l if l.is_ecmascript() => resolve_ecmascript(fs, from_file, specifier),
        Language::Python => resolve_python(fs, root, specifier),
        _ => None,
    }
}

fn resolve_ecmascript(fs: &dyn FileSystem, from_file: &Path, specifier: &str) -> Option<PathBuf> {
    // Bare specifiers name packages; the graph stays first-party.
    if !specifier.starts_with('.') && !specifier.starts_with('/') {
        return None;
    }

    let dir = from_file.parent().unwrap_or(Path::new(""));
    let base = normalize(&dir.join(specifier));

    ECMASCRIPT_PROBES.iter().find_map(|suffix| {
        let mut candidate = OsString::from(base.as_os_str());
        candidate.push(suffix);
        let candidate = normalize(Path::new(&candidate));
        fs.is_file(&candidate).then_some(candidate)
    })
}

fn resolve_python(fs: &dyn FileSystem, root: &Path, specifier: &str) -> Option<PathBuf> {
    let parts: Vec<&str> = specifier.split('.').collect();
    // Leading or doubled dots mean a relative import, which is not supported.
    if parts.iter().any(|p| p.is_empty()) {
        return None;
    }

    let mut module = root.to_path_buf();
    module.extend(&parts);

    let mut as_file = module.clone().into_os_string();
    as_file.push(".py");

    [PathBuf::from(as_file), module.join("__init__.py")]
        .into_iter()
        .map(|candidate| normalize(&candidate))
        .find(|candidate| fs.is_file(candidate))
}
