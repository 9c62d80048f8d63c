use super::{LineIndex, Specifier, SpecifierRules};
use crate::model::Language;
use regex::Regex;
use std::collections::BTreeMap;
use std::sync::OnceLock;

/// `import a.b.c` and `from a.b.c import ...` at the start of a line.
pub struct PythonRules;

impl PythonRules {
    pub fn new() -> Self {
        Self
    }
}

fn patterns() -> &'static [Regex] {
    static RE: OnceLock<Vec<Regex>> = OnceLock::new();
    RE.get_or_init(|| {
        vec![
            Regex::new(r"(?m)^[ \t]*import[ \t]+([\w.]+)").unwrap(),
            Regex::new(r"(?m)^[ \t]*from[ \t]+([\w.]+)[ \t]+import\b").unwrap(),
        ]
    })
}

impl SpecifierRules for PythonRules {
    fn languages(&self) -> &[Language] {
        &[Language::Python]
    }

    fn extract(&self, source: &str) -> Vec<Specifier> {
        let lines = LineIndex::new(source);
        let mut found: BTreeMap<usize, Specifier> = BTreeMap::new();

        for re in patterns() {
            for caps in re.captures_iter(source) {
                let (Some(whole), Some(module)) = (caps.get(0), caps.get(1)) else {
                    continue;
                };
                found
                    .entry(module.start())
                    .or_insert_with(|| Specifier::new(module.as_str(), lines.line_of(whole.start())));
            }
        }

        found.into_values().collect()
    }
}

impl Default for PythonRules {
    fn default() -> Self {
        Self::new()
    }
}
