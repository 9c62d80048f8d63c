//! Import specifier extraction.
//!
//! This is a textual pattern scan, not a parser: it only has to find plausible
//! module specifiers and the line they appear on, and it must never fail on
//! code it does not understand.

mod ecmascript;
mod python;

use crate::model::Language;
use serde::{Deserialize, Serialize};

pub use ecmascript::EcmaScriptRules;
pub use python::PythonRules;

/// A raw module specifier as written in the source, before resolution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Specifier {
    pub text: String,
    /// 0-based line of the statement that contains the specifier.
    pub line: usize,
}

impl Specifier {
    pub fn new(text: impl Into<String>, line: usize) -> Self {
        Self {
            text: text.into(),
            line,
        }
    }
}

/// Pattern rules for one family of languages.
pub trait SpecifierRules: Send + Sync {
    fn languages(&self) -> &[Language];

    /// Specifiers in source order. Repeated imports of the same module on
    /// different lines are all reported.
    fn extract(&self, source: &str) -> Vec<Specifier>;
}

pub struct ParserRegistry {
    rules: Vec<Box<dyn SpecifierRules>>,
}

impl ParserRegistry {
    pub fn new() -> Self {
        Self {
            rules: vec![Box::new(EcmaScriptRules::new()), Box::new(PythonRules::new())],
        }
    }

    pub fn find_rules(&self, language: Language) -> Option<&dyn SpecifierRules> {
        self.rules
            .iter()
            .find(|r| r.languages().contains(&language))
            .map(|r| r.as_ref())
    }

    /// Extract specifiers from `source`. Languages without rules
    /// ([`Language::Other`]) yield nothing.
    pub fn parse(&self, source: &str, language: Language) -> Vec<Specifier> {
        match self.find_rules(language) {
            Some(rules) => rules.extract(source),
            None => Vec::new(),
        }
    }
}

impl Default for ParserRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// Convenience wrapper over a default [`ParserRegistry`].
pub fn parse_specifiers(source: &str, language: Language) -> Vec<Specifier> {
    ParserRegistry::new().parse(source, language)
}

/// Maps byte offsets to 0-based line numbers.
pub(crate) struct LineIndex {
    newlines: Vec<usize>,
}

impl LineIndex {
    pub(crate) fn new(source: &str) -> Self {
        Self {
            newlines: source.match_indices('\n').map(|(i, _)| i).collect(),
        }
    }

    /// Number of newline characters strictly before `offset`.
    pub(crate) fn line_of(&self, offset: usize) -> usize {
        self.newlines.partition_point(|&nl| nl < offset)
    }
}
