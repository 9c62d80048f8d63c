use serde::{Deserialize, Serialize};
use std::path::Path;

/// Language tag of a file, derived from its extension alone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Language {
    #[serde(rename = "ts")]
    TypeScript,
    #[serde(rename = "js")]
    JavaScript,
    #[serde(rename = "py")]
    Python,
    #[serde(rename = "other")]
    Other,
}

/// Extensions enumerated for the ECMAScript-family group.
pub const ECMASCRIPT_EXTENSIONS: &[&str] = &["ts", "tsx", "js", "jsx"];

/// Extensions enumerated for the Python group.
pub const PYTHON_EXTENSIONS: &[&str] = &["py"];

impl Language {
    pub fn from_path(path: &Path) -> Self {
        let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("");
        match ext {
            "ts" | "tsx" | "mts" | "cts" => Language::TypeScript,
            "js" | "jsx" | "mjs" | "cjs" => Language::JavaScript,
            "py" => Language::Python,
            _ => Language::Other,
        }
    }

    /// ECMAScript-family languages share one parser rule set and one resolver.
    pub fn is_ecmascript(self) -> bool {
        matches!(self, Language::TypeScript | Language::JavaScript)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Language::TypeScript => "ts",
            Language::JavaScript => "js",
            Language::Python => "py",
            Language::Other => "other",
        }
    }
}

/// True if the file belongs to one of the enumerated extension groups.
pub fn is_indexed_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|ext| ECMASCRIPT_EXTENSIONS.contains(&ext) || PYTHON_EXTENSIONS.contains(&ext))
}
