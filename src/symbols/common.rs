use super::{DocumentSymbol, SymbolKind};
use tree_sitter::Node;

/// Push a symbol named by the node's `name` field.
pub(super) fn push_named(
    node: &Node,
    source: &[u8],
    kind: SymbolKind,
    symbols: &mut Vec<DocumentSymbol>,
) -> bool {
    let Some(name_node) = node.child_by_field_name("name") else {
        return false;
    };
    let Ok(name) = name_node.utf8_text(source) else {
        return false;
    };
    symbols.push(DocumentSymbol {
        name: name.to_string(),
        kind,
        start_line: node.start_position().row,
    });
    true
}

/// Macro to define a thread-local parser with a given language.
/// Usage: `define_parser!(PARSER_NAME, language_fn)`
#[macro_export]
macro_rules! define_parser {
    ($name:ident, $language:expr) => {
        thread_local! {
            static $name: std::cell::RefCell<tree_sitter::Parser> = std::cell::RefCell::new({
                let mut parser = tree_sitter::Parser::new();
                parser.set_language(&$language.into()).expect(concat!("Failed to set ", stringify!($name), " language"));
                parser
            });
        }
    };
}
