use super::{LineIndex, Specifier, SpecifierRules};
use crate::model::Language;
use regex::Regex;
use std::collections::BTreeMap;
use std::sync::OnceLock;

/// `import ... from "x"`, bare `import "x"` and `export ... from "x"`.
pub struct EcmaScriptRules;

impl EcmaScriptRules {
    pub fn new() -> Self {
        Self
    }
}

/// Statement shapes, each paired with the keyword that opens it.
fn patterns() -> &'static [(Regex, Regex)] {
    static RE: OnceLock<Vec<(Regex, Regex)>> = OnceLock::new();
    RE.get_or_init(|| {
        let import = Regex::new(r"\bimport\b").unwrap();
        let export = Regex::new(r"\bexport\b").unwrap();
        vec![
            (
                Regex::new(r#"\bimport\s+[^'"]+from\s*['"]([^'"\n]+)['"]"#).unwrap(),
                import.clone(),
            ),
            (
                Regex::new(r#"\bimport\s*['"]([^'"\n]+)['"]"#).unwrap(),
                import,
            ),
            (
                Regex::new(r#"\bexport\s+[^'"]*\bfrom\s*['"]([^'"\n]+)['"]"#).unwrap(),
                export,
            ),
        ]
    })
}

impl SpecifierRules for EcmaScriptRules {
    fn languages(&self) -> &[Language] {
        &[Language::TypeScript, Language::JavaScript]
    }

    fn extract(&self, source: &str) -> Vec<Specifier> {
        let lines = LineIndex::new(source);
        // Keyed by the specifier's byte offset: sorts into source order and
        // drops the same literal matched by two shapes.
        let mut found: BTreeMap<usize, Specifier> = BTreeMap::new();

        for (re, keyword) in patterns() {
            for caps in re.captures_iter(source) {
                let (Some(whole), Some(spec)) = (caps.get(0), caps.get(1)) else {
                    continue;
                };
                // The keyword-to-from span may run across several statements
                // (`export const a = 1 ... export * from "x"`); anchor on the
                // keyword nearest to the specifier. Identifiers such as
                // `importA` are not keywords.
                let prefix = &source[whole.start()..spec.start()];
                let start = whole.start()
                    + keyword
                        .find_iter(prefix)
                        .last()
                        .map(|m| m.start())
                        .unwrap_or(0);

                found
                    .entry(spec.start())
                    .or_insert_with(|| Specifier::new(spec.as_str(), lines.line_of(start)));
            }
        }

        found.into_values().collect()
    }
}

impl Default for EcmaScriptRules {
    fn default() -> Self {
        Self::new()
    }
}
