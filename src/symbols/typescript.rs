use super::common::push_named;
use super::{DocumentSymbol, SymbolError, SymbolKind};
use crate::define_parser;
use std::path::Path;
use tree_sitter::Node;

define_parser!(TS_PARSER, tree_sitter_typescript::LANGUAGE_TYPESCRIPT);
define_parser!(TSX_PARSER, tree_sitter_typescript::LANGUAGE_TSX);

/// Symbols of a TS/JS file: declarations at the top level (exported or not)
/// and the methods of top-level classes, flattened depth-first.
pub fn extract(path: &Path, source: &str) -> Result<Vec<DocumentSymbol>, SymbolError> {
    // JSX needs the TSX grammar; plain JS parses fine with the TS grammar.
    let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("");
    let tree = if ext == "tsx" || ext == "jsx" {
        TSX_PARSER.with(|parser| parser.borrow_mut().parse(source, None))
    } else {
        TS_PARSER.with(|parser| parser.borrow_mut().parse(source, None))
    }
    .ok_or_else(|| SymbolError::Parse(path.display().to_string()))?;

    let root = tree.root_node();
    let source_bytes = source.as_bytes();
    let mut symbols = Vec::new();

    let mut cursor = root.walk();
    for node in root.children(&mut cursor) {
        if node.kind() == "export_statement" {
            // export function f() {} / export default class X {}
            if let Some(decl) = node.child_by_field_name("declaration") {
                add_declaration(&decl, source_bytes, &mut symbols);
            }
        } else {
            add_declaration(&node, source_bytes, &mut symbols);
        }
    }

    Ok(symbols)
}

fn add_declaration(node: &Node, source: &[u8], symbols: &mut Vec<DocumentSymbol>) {
    match node.kind() {
        "function_declaration" | "generator_function_declaration" => {
            push_named(node, source, SymbolKind::Function, symbols);
        }
        "class_declaration" | "abstract_class_declaration" => {
            if push_named(node, source, SymbolKind::Class, symbols) {
                add_methods(node, source, symbols);
            }
        }
        "interface_declaration" => {
            push_named(node, source, SymbolKind::Interface, symbols);
        }
        "type_alias_declaration" => {
            push_named(node, source, SymbolKind::TypeAlias, symbols);
        }
        "enum_declaration" => {
            push_named(node, source, SymbolKind::Enum, symbols);
        }
        "lexical_declaration" | "variable_declaration" => {
            let mut cursor = node.walk();
            for child in node.children(&mut cursor) {
                if child.kind() != "variable_declarator" {
                    continue;
                }
                // const f = () => {} counts as a function
                let kind = match child.child_by_field_name("value").map(|v| v.kind()) {
                    Some("arrow_function") | Some("function_expression") | Some("function") => {
                        SymbolKind::Function
                    }
                    _ => SymbolKind::Variable,
                };
                if let Some(name_node) = child.child_by_field_name("name") {
                    if let Ok(name) = name_node.utf8_text(source) {
                        symbols.push(DocumentSymbol {
                            name: name.to_string(),
                            kind,
                            start_line: node.start_position().row,
                        });
                    }
                }
            }
        }
        _ => {}
    }
}

fn add_methods(class: &Node, source: &[u8], symbols: &mut Vec<DocumentSymbol>) {
    let Some(body) = class.child_by_field_name("body") else {
        return;
    };
    let mut cursor = body.walk();
    for member in body.children(&mut cursor) {
        if matches!(member.kind(), "method_definition" | "abstract_method_signature") {
            push_named(&member, source, SymbolKind::Method, symbols);
        }
    }
}
