use super::common::push_named;
use super::{DocumentSymbol, SymbolError, SymbolKind};
use crate::define_parser;
use std::path::Path;
use tree_sitter::Node;

define_parser!(PYTHON_PARSER, tree_sitter_python::LANGUAGE);

/// Symbols of a Python module: top-level functions, classes with their
/// methods, and top-level assignments, flattened depth-first.
pub fn extract(path: &Path, source: &str) -> Result<Vec<DocumentSymbol>, SymbolError> {
    let tree = PYTHON_PARSER
        .with(|parser| parser.borrow_mut().parse(source, None))
        .ok_or_else(|| SymbolError::Parse(path.display().to_string()))?;

    let root = tree.root_node();
    let source_bytes = source.as_bytes();
    let mut symbols = Vec::new();

    let mut cursor = root.walk();
    for node in root.children(&mut cursor) {
        match node.kind() {
            "function_definition" => {
                push_named(&node, source_bytes, SymbolKind::Function, &mut symbols);
            }
            "class_definition" => handle_class(&node, source_bytes, &mut symbols),
            "decorated_definition" => {
                if let Some(def) = node.child_by_field_name("definition") {
                    match def.kind() {
                        "function_definition" => {
                            push_named(&def, source_bytes, SymbolKind::Function, &mut symbols);
                        }
                        "class_definition" => handle_class(&def, source_bytes, &mut symbols),
                        _ => {}
                    }
                }
            }
            "expression_statement" => handle_assignment(&node, source_bytes, &mut symbols),
            _ => {}
        }
    }

    Ok(symbols)
}

fn handle_class(node: &Node, source: &[u8], symbols: &mut Vec<DocumentSymbol>) {
    if !push_named(node, source, SymbolKind::Class, symbols) {
        return;
    }
    let Some(body) = node.child_by_field_name("body") else {
        return;
    };
    let mut cursor = body.walk();
    for member in body.children(&mut cursor) {
        let method = match member.kind() {
            "function_definition" => Some(member),
            "decorated_definition" => member
                .child_by_field_name("definition")
                .filter(|d| d.kind() == "function_definition"),
            _ => None,
        };
        if let Some(method) = method {
            push_named(&method, source, SymbolKind::Method, symbols);
        }
    }
}

/// `NAME = value` at module level.
fn handle_assignment(node: &Node, source: &[u8], symbols: &mut Vec<DocumentSymbol>) {
    let Some(assignment) = node.named_child(0).filter(|c| c.kind() == "assignment") else {
        return;
    };
    let Some(left) = assignment
        .child_by_field_name("left")
        .filter(|l| l.kind() == "identifier")
    else {
        return;
    };
    if let Ok(name) = left.utf8_text(source) {
        symbols.push(DocumentSymbol {
            name: name.to_string(),
            kind: SymbolKind::Variable,
            start_line: node.start_position().row,
        });
    }
}
