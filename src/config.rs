use crate::fs::{FileSystem, default_fs};
use serde::Deserialize;
use std::path::Path;
use thiserror::Error;

/// File name looked up at the workspace root.
pub const CONFIG_FILE: &str = ".codecanvas.toml";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Config {
    pub index: IndexSettings,
    pub graph: GraphSettings,
    pub preview: PreviewSettings,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexSettings {
    pub exclude_globs: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GraphSettings {
    /// Hard cap for expand and load-more.
    pub max_nodes: usize,
    /// Cap for the first graph of a session.
    pub initial_cap: usize,
    /// Increment applied by load-more.
    pub page_size: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PreviewSettings {
    pub max_preview_bytes: usize,
}

#[derive(Debug, Deserialize)]
struct RawConfig {
    index: Option<RawIndex>,
    graph: Option<RawGraph>,
    preview: Option<RawPreview>,
}

#[derive(Debug, Deserialize)]
struct RawIndex {
    exclude_globs: Option<Vec<String>>,
}

#[derive(Debug, Deserialize)]
struct RawGraph {
    max_nodes: Option<usize>,
    initial_cap: Option<usize>,
    page_size: Option<usize>,
}

#[derive(Debug, Deserialize)]
struct RawPreview {
    max_preview_bytes: Option<usize>,
}

pub const DEFAULT_EXCLUDE_GLOBS: &[&str] = &[
    "**/node_modules/**",
    "**/.git/**",
    "**/dist/**",
    "**/out/**",
    "**/build/**",
    "**/__pycache__/**",
    "**/.venv/**",
];

impl Default for IndexSettings {
    fn default() -> Self {
        Self {
            exclude_globs: DEFAULT_EXCLUDE_GLOBS.iter().map(|g| g.to_string()).collect(),
        }
    }
}

impl Default for GraphSettings {
    fn default() -> Self {
        Self {
            max_nodes: 300,
            initial_cap: 25,
            page_size: 25,
        }
    }
}

impl Default for PreviewSettings {
    fn default() -> Self {
        Self {
            max_preview_bytes: 100_000,
        }
    }
}

impl GraphSettings {
    /// Cap used for the first graph of a session.
    pub fn first_cap(&self) -> usize {
        self.max_nodes.min(self.initial_cap)
    }

    /// Cap after one more load-more step from `current`.
    pub fn next_cap(&self, current: usize) -> usize {
        self.max_nodes.min(current.saturating_add(self.page_size))
    }
}

impl Config {
    pub fn load(project_path: &Path) -> Result<Self, ConfigError> {
        Self::load_with_fs(project_path, default_fs())
    }

    pub fn load_with_fs(project_path: &Path, fs: &dyn FileSystem) -> Result<Self, ConfigError> {
        let config_path = project_path.join(CONFIG_FILE);

        if !fs.is_file(&config_path) {
            return Ok(Self::default());
        }

        let content = fs.read_to_string(&config_path)?;
        Self::parse(&content)
    }

    /// Parse config text. Missing sections and keys take their defaults.
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        let raw: RawConfig = toml::from_str(content)?;

        let index = match raw.index {
            Some(i) => IndexSettings {
                exclude_globs: i
                    .exclude_globs
                    .unwrap_or_else(|| IndexSettings::default().exclude_globs),
            },
            None => IndexSettings::default(),
        };

        let defaults = GraphSettings::default();
        let graph = match raw.graph {
            Some(g) => GraphSettings {
                max_nodes: g.max_nodes.unwrap_or(defaults.max_nodes),
                initial_cap: g.initial_cap.unwrap_or(defaults.initial_cap),
                page_size: g.page_size.unwrap_or(defaults.page_size),
            },
            None => defaults,
        };

        let preview = match raw.preview {
            Some(p) => PreviewSettings {
                max_preview_bytes: p
                    .max_preview_bytes
                    .unwrap_or(PreviewSettings::default().max_preview_bytes),
            },
            None => PreviewSettings::default(),
        };

        Ok(Self {
            index,
            graph,
            preview,
        })
    }
}

/// Starter `.codecanvas.toml` written by `codecanvas init`.
pub fn generate_config_template() -> String {
    let globs = DEFAULT_EXCLUDE_GLOBS
        .iter()
        .map(|g| format!("    \"{}\",", g))
        .collect::<Vec<_>>()
        .join("\n");
    let graph = GraphSettings::default();
    let preview = PreviewSettings::default();

    format!(
        r#"# codecanvas configuration

[index]
# Files matching any of these globs are not indexed and never become edge targets.
# Patterns match the workspace-relative path with '/' separators.
exclude_globs = [
{globs}
]

[graph]
# Hard cap on nodes for expand and load-more
max_nodes = {max_nodes}
# Nodes in the first graph of a session
initial_cap = {initial_cap}
# Nodes added by each load-more
page_size = {page_size}

[preview]
# Code previews are truncated to this many bytes
max_preview_bytes = {max_preview_bytes}
"#,
        globs = globs,
        max_nodes = graph.max_nodes,
        initial_cap = graph.initial_cap,
        page_size = graph.page_size,
        max_preview_bytes = preview.max_preview_bytes,
    )
}
