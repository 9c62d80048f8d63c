//! Wire-safe identifiers for nodes and edges.
//!
//! Ids are pure functions of paths (and source lines for edges) so that
//! re-materializing an unchanged relationship produces the same id and the
//! client can merge graphs idempotently.

use sha2::{Digest, Sha256};
use std::path::Path;

/// Hex digits of the SHA-256 digest kept in an id.
const HASH_LEN: usize = 12;

/// Short hex digest of `input`.
pub fn short_hash(input: impl AsRef<[u8]>) -> String {
    let digest = Sha256::digest(input.as_ref());
    let mut hex = String::with_capacity(HASH_LEN);
    for byte in digest.iter().take(HASH_LEN / 2) {
        hex.push_str(&format!("{:02x}", byte));
    }
    hex
}

/// Node id for a file: a readable, sanitized form of the path plus a digest of
/// the raw path bytes. Sanitizing alone would collide (`a-b.ts` vs `a_b.ts`),
/// and so would a lossy decode of non-UTF-8 names; the digest keeps them apart.
pub fn node_id(path: &Path) -> String {
    let safe: String = path
        .to_string_lossy()
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '_' || c == '-' {
                c
            } else {
                '_'
            }
        })
        .collect();
    format!("n_{}_{}", safe, short_hash(path.as_os_str().as_encoded_bytes()))
}

/// Edge id, deterministic in `(source, target, source_line)`.
pub fn edge_id(source: &Path, target: &Path, source_line: usize) -> String {
    let mut key = source.as_os_str().as_encoded_bytes().to_vec();
    key.extend_from_slice(b"->");
    key.extend_from_slice(target.as_os_str().as_encoded_bytes());
    key.extend_from_slice(format!("#{}", source_line).as_bytes());
    format!("e_{}", short_hash(&key))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_node_id_is_wire_safe() {
        let id = node_id(Path::new("/ws/my app/src/(group)/page.tsx"));
        assert!(id.starts_with("n__ws_my_app_src__group__page_tsx_"));
        assert!(id.chars().all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-'));
    }

    #[test]
    fn test_node_id_distinguishes_paths_that_sanitize_alike() {
        assert_ne!(node_id(Path::new("/ws/a-b.ts")), node_id(Path::new("/ws/a.b.ts")));
        assert_ne!(node_id(Path::new("/ws/a b.ts")), node_id(Path::new("/ws/a_b.ts")));
    }

    #[test]
    fn test_edge_id_is_deterministic() {
        let a = Path::new("/ws/a.ts");
        let b = Path::new("/ws/b.ts");
        assert_eq!(edge_id(a, b, 3), edge_id(a, b, 3));
        assert_ne!(edge_id(a, b, 3), edge_id(a, b, 4));
        assert_ne!(edge_id(a, b, 3), edge_id(b, a, 3));
    }

    #[cfg(unix)]
    #[test]
    fn test_ids_distinguish_names_that_are_not_utf8() {
        use std::ffi::OsStr;
        use std::os::unix::ffi::OsStrExt;

        let a = Path::new(OsStr::from_bytes(b"/ws/\xff.ts"));
        let b = Path::new(OsStr::from_bytes(b"/ws/\xfe.ts"));
        assert_eq!(a.to_string_lossy(), b.to_string_lossy());

        assert_ne!(node_id(a), node_id(b));
        let c = Path::new("/ws/c.ts");
        assert_ne!(edge_id(a, c, 0), edge_id(b, c, 0));
        assert_ne!(edge_id(c, a, 0), edge_id(c, b, 0));
    }

    #[test]
    fn test_short_hash_length() {
        assert_eq!(short_hash("").len(), HASH_LEN);
        assert_eq!(short_hash("anything at all").len(), HASH_LEN);
    }
}
