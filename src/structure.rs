//! Structure items for the outline view
//!
//! Wraps function declarations into display labels and offsets for the
//! host's outline/navigator. Labels render as
//! `name(param1,param2,...) : ReturnType`, dropping the return-type suffix
//! when the declaration has no explicit return type annotation.

use tree_sitter::{Node, Tree};

use crate::resolve::{name_identifier, node_text};
use crate::schema::OutlineEntry;

/// Outline entry for one function declaration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FunctionStructureItem {
    label: String,
    sort_text: String,
    position: usize,
    end_position: usize,
    leaf: bool,
    nested: Vec<FunctionStructureItem>,
}

impl FunctionStructureItem {
    /// Build an item from a `function_declaration` node
    ///
    /// Malformed parameter lists render via the raw source text of each
    /// parameter node; a missing name renders as an empty prefix.
    pub fn new(function: &Node, source: &str, is_leaf: bool) -> Self {
        let name = name_identifier(function)
            .map(|n| node_text(&n, source).to_string())
            .unwrap_or_default();

        let mut label = String::new();
        label.push_str(&name);
        label.push('(');

        let parameters = value_parameters(function);
        if let Some(parameters) = &parameters {
            let mut cursor = parameters.walk();
            let rendered: Vec<&str> = parameters
                .named_children(&mut cursor)
                .map(|p| node_text(&p, source))
                .collect();
            label.push_str(&rendered.join(","));
        }
        label.push(')');

        if let Some(return_type) = return_type_node(function, &parameters) {
            label.push_str(" : ");
            label.push_str(node_text(&return_type, source));
        }

        Self {
            label,
            sort_text: name,
            position: function.start_byte(),
            end_position: function.end_byte(),
            leaf: is_leaf,
            nested: Vec::new(),
        }
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn sort_text(&self) -> &str {
        &self.sort_text
    }

    pub fn position(&self) -> usize {
        self.position
    }

    pub fn end_position(&self) -> usize {
        self.end_position
    }

    pub fn is_leaf(&self) -> bool {
        self.leaf
    }

    /// Nested items are never populated
    pub fn nested_items(&self) -> &[FunctionStructureItem] {
        &self.nested
    }

    pub fn to_entry(&self) -> OutlineEntry {
        OutlineEntry {
            label: self.label.clone(),
            start: self.position,
            end: self.end_position,
            leaf: self.leaf,
        }
    }
}

/// Collect an item for every function declaration in the file, in source
/// order
///
/// A function counts as a leaf when it contains no nested function
/// declarations.
pub fn scan_functions(tree: &Tree, source: &str) -> Vec<FunctionStructureItem> {
    let mut items = Vec::new();
    collect(&tree.root_node(), source, &mut items);
    items
}

fn collect(node: &Node, source: &str, items: &mut Vec<FunctionStructureItem>) {
    if node.kind() == "function_declaration" {
        let leaf = !contains_nested_function(node);
        items.push(FunctionStructureItem::new(node, source, leaf));
    }
    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        collect(&child, source, items);
    }
}

fn contains_nested_function(node: &Node) -> bool {
    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        if child.kind() == "function_declaration" || contains_nested_function(&child) {
            return true;
        }
    }
    false
}

fn value_parameters<'t>(function: &Node<'t>) -> Option<Node<'t>> {
    if let Some(parameters) = function.child_by_field_name("parameters") {
        return Some(parameters);
    }
    let mut cursor = function.walk();
    let found = function
        .children(&mut cursor)
        .find(|c| c.kind() == "function_value_parameters");
    found
}

/// The explicit return type is the first named node after the `:` token that
/// follows the parameter list
fn return_type_node<'t>(function: &Node<'t>, parameters: &Option<Node<'t>>) -> Option<Node<'t>> {
    let after = parameters
        .map(|p| p.end_byte())
        .or_else(|| name_identifier(function).map(|n| n.end_byte()))?;

    let mut colon_seen = false;
    let mut cursor = function.walk();
    for child in function.children(&mut cursor) {
        if child.start_byte() < after {
            continue;
        }
        if colon_seen && child.is_named() {
            return Some(child);
        }
        if child.kind() == ":" {
            colon_seen = true;
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lang::Lang;

    fn parse(source: &str) -> Tree {
        let mut parser = tree_sitter::Parser::new();
        parser
            .set_language(&Lang::Kotlin.tree_sitter_language())
            .unwrap();
        parser.parse(source, None).unwrap()
    }

    #[test]
    fn test_label_with_return_type() {
        let source = "fun add(a: Int, b: Int): Int = a + b\n";
        let tree = parse(source);
        let items = scan_functions(&tree, source);
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].label(), "add(a: Int,b: Int) : Int");
    }

    #[test]
    fn test_label_without_return_type() {
        let source = "fun log(msg: String) {\n}\n";
        let tree = parse(source);
        let items = scan_functions(&tree, source);
        assert_eq!(items[0].label(), "log(msg: String)");
    }

    #[test]
    fn test_label_without_parameters() {
        let source = "fun reset() {\n}\n";
        let tree = parse(source);
        let items = scan_functions(&tree, source);
        assert_eq!(items[0].label(), "reset()");
    }

    #[test]
    fn test_offsets_cover_the_declaration() {
        let source = "class C {\n    fun f() {}\n}\n";
        let tree = parse(source);
        let items = scan_functions(&tree, source);
        let start = source.find("fun f").unwrap();
        assert_eq!(items[0].position(), start);
        assert!(items[0].end_position() > start);
    }

    #[test]
    fn test_nested_items_stay_empty() {
        let source = "fun outer() {\n    fun inner() {}\n}\n";
        let tree = parse(source);
        let items = scan_functions(&tree, source);
        assert_eq!(items.len(), 2);
        assert!(!items[0].is_leaf());
        assert!(items[1].is_leaf());
        assert!(items[0].nested_items().is_empty());
        assert!(items[1].nested_items().is_empty());
    }

    #[test]
    fn test_sort_text_is_the_name() {
        let source = "fun add(a: Int, b: Int): Int = a + b\n";
        let tree = parse(source);
        let items = scan_functions(&tree, source);
        assert_eq!(items[0].sort_text(), "add");
    }
}
