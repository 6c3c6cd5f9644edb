//! Tree-sitter parser integration for Python stub modules

use crate::core::{Error, PythonAst, Result};
use std::path::Path;
use tree_sitter::{Node, Parser, Tree};

/// Parse Python source code into a tree-sitter AST.
///
/// Stub modules are hand-maintained, so any syntax error is fatal and
/// reported at the first error node.
pub fn parse_source(content: &str, path: &Path) -> Result<PythonAst> {
    let mut parser = Parser::new();
    parser
        .set_language(&tree_sitter_python::LANGUAGE.into())
        .map_err(|e| Error::parse(path, 0, 0, format!("Failed to set tree-sitter language: {}", e)))?;

    let tree = parser
        .parse(content, None)
        .ok_or_else(|| Error::parse(path, 0, 0, "Failed to parse source code"))?;

    if let Some(error) = first_error(&tree) {
        return Err(Error::parse(
            path,
            node_line(&error),
            node_column(&error),
            format!("unexpected syntax near {:?}", truncate(node_text(&error, content), 40)),
        ));
    }

    Ok(PythonAst {
        tree,
        path: path.to_path_buf(),
        source: content.to_string(),
    })
}

/// Check if a parse tree has errors
pub fn has_parse_errors(tree: &Tree) -> bool {
    tree.root_node().has_error()
}

/// Locate the first `ERROR` or missing node, depth first.
pub fn first_error(tree: &Tree) -> Option<Node<'_>> {
    if !has_parse_errors(tree) {
        return None;
    }
    find_error(tree.root_node())
}

fn find_error(node: Node<'_>) -> Option<Node<'_>> {
    if node.is_error() || node.is_missing() {
        return Some(node);
    }
    let mut cursor = node.walk();
    let children: Vec<Node<'_>> = node.children(&mut cursor).collect();
    children
        .into_iter()
        .filter(|child| child.has_error())
        .find_map(find_error)
        .or(Some(node))
}

/// Get text for a tree-sitter node
pub fn node_text<'a>(node: &Node, source: &'a str) -> &'a str {
    &source[node.start_byte()..node.end_byte()]
}

/// Get the line number for a tree-sitter node (1-indexed)
pub fn node_line(node: &Node) -> usize {
    node.start_position().row + 1
}

/// Get the column number for a tree-sitter node (1-indexed)
pub fn node_column(node: &Node) -> usize {
    node.start_position().column + 1
}

/// Named children of a node, skipping comments.
pub fn named_children<'t>(node: &Node<'t>) -> Vec<Node<'t>> {
    let mut cursor = node.walk();
    let children: Vec<Node<'t>> = node
        .named_children(&mut cursor)
        .filter(|child| child.kind() != "comment")
        .collect();
    children
}

fn truncate(text: &str, max: usize) -> &str {
    match text.char_indices().nth(max) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_parse_stub_module() {
        let source = "def square(x: array, /) -> array:\n    \"\"\"Squares.\"\"\"\n";
        let ast = parse_source(source, &PathBuf::from("elementwise_functions.py")).unwrap();
        assert!(!has_parse_errors(&ast.tree));
        assert_eq!(ast.tree.root_node().kind(), "module");
    }

    #[test]
    fn test_parse_error_is_located() {
        let source = "x = 1\ndef broken(:\n    pass\n";
        let err = parse_source(source, &PathBuf::from("broken.py")).unwrap_err();
        match err {
            Error::Parse { file, line, .. } => {
                assert_eq!(file, PathBuf::from("broken.py"));
                assert_eq!(line, 2);
            }
            other => panic!("expected parse error, got {other:?}"),
        }
    }

    #[test]
    fn test_node_text_and_line() {
        let source = "e = None\npi = None\n";
        let ast = parse_source(source, &PathBuf::from("constants.py")).unwrap();
        let root = ast.tree.root_node();
        assert_eq!(node_text(&root, &ast.source), source);

        let statements = named_children(&root);
        assert_eq!(statements.len(), 2);
        assert_eq!(node_line(&statements[1]), 2);
        assert_eq!(node_column(&statements[1]), 1);
    }
}
