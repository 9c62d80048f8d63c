//! Document-symbol lookup used to anchor edges on a line of the target file.
//!
//! Inside an editor the symbols come from the editor's language services;
//! [`SymbolProvider`] is the seam. [`TreeSitterSymbols`] is the stand-alone
//! implementation used by the CLI and the HTTP host.

mod common;
mod python;
mod typescript;

use crate::fs::FileSystem;
use crate::model::Language;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SymbolError {
    #[error("Failed to read file: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to parse: {0}")]
    Parse(String),
    #[error("No symbol support for file: {0}")]
    Unsupported(PathBuf),
    #[error("Symbol service unavailable: {0}")]
    Unavailable(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SymbolKind {
    Class,
    Function,
    Method,
    Interface,
    TypeAlias,
    Enum,
    Variable,
    Other,
}

impl SymbolKind {
    /// Kinds preferred as edge anchors when a file has several symbols.
    pub fn is_anchor_kind(self) -> bool {
        matches!(self, SymbolKind::Class | SymbolKind::Function | SymbolKind::Method)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentSymbol {
    pub name: String,
    pub kind: SymbolKind,
    /// 0-based.
    pub start_line: usize,
}

/// Flat, depth-first list of the symbols declared in a file.
#[async_trait]
pub trait SymbolProvider: Send + Sync {
    async fn document_symbols(&self, path: &Path) -> Result<Vec<DocumentSymbol>, SymbolError>;
}

/// Provider for hosts without symbol support: every file has no symbols.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoSymbols;

#[async_trait]
impl SymbolProvider for NoSymbols {
    async fn document_symbols(&self, _path: &Path) -> Result<Vec<DocumentSymbol>, SymbolError> {
        Ok(Vec::new())
    }
}

/// Reads the file and extracts declarations with tree-sitter.
#[derive(Clone)]
pub struct TreeSitterSymbols {
    fs: Arc<dyn FileSystem>,
}

impl TreeSitterSymbols {
    pub fn new(fs: Arc<dyn FileSystem>) -> Self {
        Self { fs }
    }

    /// Extract symbols from already loaded source text.
    pub fn extract(path: &Path, source: &str) -> Result<Vec<DocumentSymbol>, SymbolError> {
        match Language::from_path(path) {
            Language::TypeScript | Language::JavaScript => typescript::extract(path, source),
            Language::Python => python::extract(path, source),
            Language::Other => Err(SymbolError::Unsupported(path.to_path_buf())),
        }
    }
}

#[async_trait]
impl SymbolProvider for TreeSitterSymbols {
    async fn document_symbols(&self, path: &Path) -> Result<Vec<DocumentSymbol>, SymbolError> {
        let fs = Arc::clone(&self.fs);
        let path = path.to_path_buf();
        // Parsing is CPU-bound; keep it off the async workers.
        tokio::task::spawn_blocking(move || {
            let source = fs.read_to_string(&path)?;
            Self::extract(&path, &source)
        })
        .await
        .map_err(|e| SymbolError::Unavailable(e.to_string()))?
    }
}
