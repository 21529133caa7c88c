//! Resolved-declaration model and the binding context consumed by the
//! semantic highlighter
//!
//! The highlighter never resolves anything itself; it reads a [`BindingContext`]
//! that maps syntax ranges to resolved targets. A context is normally produced
//! by [`FileBinder`], a best-effort single-file binder, but callers with a real
//! resolution engine can populate one through the public insert API instead.

use std::collections::HashMap;

use tracing::debug;
use tree_sitter::{Node, Tree};

use crate::schema::OffsetRange;

/// Kind of a resolved class-like declaration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ClassKind {
    Class,
    Interface,
    EnumClass,
    EnumEntry,
    AnnotationClass,
    Object,
}

/// What a syntax node resolved to
///
/// Closed variant set; the highlighter matches exhaustively over it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResolvedTarget {
    /// A class, interface, object, enum class, enum entry, or annotation class
    Class { kind: ClassKind },
    /// A constructor reference; the highlighter unwraps it to the owning class
    Constructor { of: ClassKind },
    /// A member or top-level property
    Property { mutable: bool, is_static: bool },
    /// A local `val`/`var` binding
    LocalVariable { mutable: bool },
    /// A function or constructor value parameter
    Parameter,
    /// A declared type parameter
    TypeParameter,
    /// A named function; produces no highlight at reference sites
    Function,
}

/// Lookup table from syntax ranges to resolved targets
///
/// Reference sites and declaration sites are kept in separate maps: a
/// reference is keyed by the identifier's own range, a declaration by the
/// range of the whole declaration node. Smart-cast renderings are keyed by
/// the reference range they narrow.
#[derive(Debug, Default, Clone)]
pub struct BindingContext {
    reference_targets: HashMap<OffsetRange, ResolvedTarget>,
    declarations: HashMap<OffsetRange, ResolvedTarget>,
    smart_casts: HashMap<OffsetRange, String>,
}

impl BindingContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_reference(&mut self, range: OffsetRange, target: ResolvedTarget) {
        self.reference_targets.insert(range, target);
    }

    pub fn reference_target(&self, range: &OffsetRange) -> Option<ResolvedTarget> {
        self.reference_targets.get(range).copied()
    }

    pub fn record_declaration(&mut self, range: OffsetRange, target: ResolvedTarget) {
        self.declarations.insert(range, target);
    }

    pub fn declaration(&self, range: &OffsetRange) -> Option<ResolvedTarget> {
        self.declarations.get(range).copied()
    }

    /// Attach a rendered narrowed type to a reference range
    pub fn record_smart_cast(&mut self, range: OffsetRange, rendered_type: String) {
        self.smart_casts.insert(range, rendered_type);
    }

    pub fn smart_cast(&self, range: &OffsetRange) -> Option<&str> {
        self.smart_casts.get(range).map(String::as_str)
    }

    pub fn reference_count(&self) -> usize {
        self.reference_targets.len()
    }

    pub fn declaration_count(&self) -> usize {
        self.declarations.len()
    }
}

/// Best-effort single-file binder
///
/// Produces a [`BindingContext`] from a parsed tree in two passes: first
/// collect every file-level declaration into a name table, then resolve
/// identifier references through a lexical scope stack falling back to that
/// table. Purely syntactic — no type checking, no cross-file resolution;
/// names that cannot be resolved are simply absent from the context.
pub struct FileBinder<'a> {
    source: &'a str,
    context: BindingContext,
    file_table: HashMap<String, ResolvedTarget>,
    scopes: Vec<HashMap<String, ResolvedTarget>>,
}

impl<'a> FileBinder<'a> {
    pub fn bind(tree: &Tree, source: &'a str) -> BindingContext {
        let mut binder = FileBinder {
            source,
            context: BindingContext::new(),
            file_table: HashMap::new(),
            scopes: Vec::new(),
        };

        binder.collect(tree.root_node());
        binder.resolve(tree.root_node());

        debug!(
            declarations = binder.context.declaration_count(),
            references = binder.context.reference_count(),
            "bound file"
        );
        binder.context
    }

    // ------------------------------------------------------------------
    // Pass 1: declaration collection
    // ------------------------------------------------------------------

    fn collect(&mut self, node: Node) {
        match node.kind() {
            "class_declaration" | "interface_declaration" | "enum_declaration"
            | "object_declaration" | "companion_object" => {
                if let Some(kind) = class_kind_of(&node, self.source) {
                    self.declare_named(&node, ResolvedTarget::Class { kind });
                }
            }
            "enum_entry" => {
                self.declare_named(
                    &node,
                    ResolvedTarget::Class {
                        kind: ClassKind::EnumEntry,
                    },
                );
            }
            "function_declaration" => {
                self.declare_named(&node, ResolvedTarget::Function);
            }
            "property_declaration" => {
                let target = property_target(&node, self.source);
                let range = OffsetRange::of_node(&node);
                self.context.record_declaration(range, target);
                // Locals are scoped; only members and top-level properties
                // are visible file-wide.
                if let ResolvedTarget::Property { .. } = target {
                    if let Some(name) = name_identifier(&node) {
                        self.file_table
                            .insert(node_text(&name, self.source).to_string(), target);
                    }
                }
            }
            "class_parameter" => {
                let target = class_parameter_target(&node, self.source);
                let range = OffsetRange::of_node(&node);
                self.context.record_declaration(range, target);
                if let ResolvedTarget::Property { .. } = target {
                    if let Some(name) = name_identifier(&node) {
                        self.file_table
                            .insert(node_text(&name, self.source).to_string(), target);
                    }
                }
            }
            "function_value_parameters" => {
                let mut cursor = node.walk();
                for child in node.named_children(&mut cursor) {
                    let range = OffsetRange::of_node(&child);
                    self.context
                        .record_declaration(range, ResolvedTarget::Parameter);
                }
            }
            "type_parameters" => {
                let mut cursor = node.walk();
                for child in node.named_children(&mut cursor) {
                    let range = OffsetRange::of_node(&child);
                    self.context
                        .record_declaration(range, ResolvedTarget::TypeParameter);
                }
            }
            _ => {}
        }

        let mut cursor = node.walk();
        for child in node.children(&mut cursor) {
            self.collect(child);
        }
    }

    fn declare_named(&mut self, node: &Node, target: ResolvedTarget) {
        let range = OffsetRange::of_node(node);
        self.context.record_declaration(range, target);
        if let Some(name) = name_identifier(node) {
            self.file_table
                .insert(node_text(&name, self.source).to_string(), target);
        }
    }

    // ------------------------------------------------------------------
    // Pass 2: reference resolution
    // ------------------------------------------------------------------

    fn resolve(&mut self, node: Node) {
        match node.kind() {
            // Import and package paths are not highlightable references.
            "import" | "package_header" => return,
            "identifier" => {
                self.resolve_identifier(node);
                return;
            }
            _ => {}
        }

        let scoped = matches!(
            node.kind(),
            "class_declaration"
                | "interface_declaration"
                | "enum_declaration"
                | "object_declaration"
                | "companion_object"
                | "function_declaration"
                | "secondary_constructor"
                | "function_body"
                | "lambda_literal"
        );

        if scoped {
            self.scopes.push(HashMap::new());
            self.seed_scope(&node);
        }

        let mut cursor = node.walk();
        for child in node.children(&mut cursor) {
            self.resolve(child);
        }
        drop(cursor);

        // A local binding becomes visible only after its declaration, so it
        // is inserted after the initializer has been resolved.
        if node.kind() == "property_declaration" {
            let target = property_target(&node, self.source);
            if let ResolvedTarget::LocalVariable { .. } = target {
                if let (Some(name), Some(scope)) =
                    (name_identifier(&node), self.scopes.last_mut())
                {
                    scope.insert(node_text(&name, self.source).to_string(), target);
                }
            }
        }

        if scoped {
            self.scopes.pop();
        }
    }

    /// Pre-populate a fresh scope with the parameters and type parameters
    /// declared by the scope-introducing node itself
    fn seed_scope(&mut self, node: &Node) {
        let mut cursor = node.walk();
        for child in node.children(&mut cursor) {
            match child.kind() {
                "type_parameters" => {
                    let mut inner = child.walk();
                    for tp in child.named_children(&mut inner) {
                        if let Some(name) = identifier_within(&tp) {
                            self.insert_scoped(&name, ResolvedTarget::TypeParameter);
                        }
                    }
                }
                "function_value_parameters" => {
                    let mut inner = child.walk();
                    for param in child.named_children(&mut inner) {
                        if let Some(name) = identifier_within(&param) {
                            self.insert_scoped(&name, ResolvedTarget::Parameter);
                        }
                    }
                }
                "primary_constructor" | "class_parameters" => {
                    self.seed_class_parameters(&child);
                }
                _ => {}
            }
        }
    }

    fn seed_class_parameters(&mut self, node: &Node) {
        let mut cursor = node.walk();
        for child in node.children(&mut cursor) {
            if child.kind() == "class_parameters" {
                self.seed_class_parameters(&child);
            } else if child.kind() == "class_parameter" {
                let target = class_parameter_target(&child, self.source);
                if let Some(name) = name_identifier(&child) {
                    self.insert_scoped(&name, target);
                }
            }
        }
    }

    fn insert_scoped(&mut self, name: &Node, target: ResolvedTarget) {
        let text = node_text(name, self.source).to_string();
        if let Some(scope) = self.scopes.last_mut() {
            scope.insert(text, target);
        }
    }

    fn resolve_identifier(&mut self, node: Node) {
        let range = OffsetRange::of_node(&node);

        // Declaration names are handled by the highlighter's declaration
        // rules, not as references.
        if self.context.declaration(&range).is_some() {
            return;
        }
        if let Some(parent) = node.parent() {
            if matches!(parent.kind(), "this_expression" | "super_expression") {
                return;
            }
            if self.is_declaration_name(&parent, &node) {
                return;
            }
            // Property names sit inside a variable_declaration wrapper.
            if parent.kind() == "variable_declaration" {
                if let Some(grandparent) = parent.parent() {
                    if self.is_declaration_name(&grandparent, &node) {
                        return;
                    }
                }
            }
        }

        let text = node_text(&node, self.source);
        if text == "this" || text == "super" {
            return;
        }

        let Some(target) = self.lookup(text) else {
            return;
        };

        // A class named in call position is a constructor reference.
        let target = match target {
            ResolvedTarget::Class { kind }
                if node
                    .parent()
                    .map(|p| p.kind() == "call_expression")
                    .unwrap_or(false) =>
            {
                ResolvedTarget::Constructor { of: kind }
            }
            other => other,
        };

        self.context.record_reference(range, target);
    }

    fn is_declaration_name(&self, declaration: &Node, identifier: &Node) -> bool {
        let declared = self
            .context
            .declaration(&OffsetRange::of_node(declaration))
            .is_some();
        declared
            && name_identifier(declaration)
                .map(|n| OffsetRange::of_node(&n) == OffsetRange::of_node(identifier))
                .unwrap_or(false)
    }

    fn lookup(&self, name: &str) -> Option<ResolvedTarget> {
        for scope in self.scopes.iter().rev() {
            if let Some(target) = scope.get(name) {
                return Some(*target);
            }
        }
        self.file_table.get(name).copied()
    }
}

// ----------------------------------------------------------------------
// Syntax helpers shared with the highlighter
// ----------------------------------------------------------------------

/// Get text content of a node
pub(crate) fn node_text<'s>(node: &Node, source: &'s str) -> &'s str {
    node.utf8_text(source.as_bytes()).unwrap_or("")
}

/// Find the name identifier of a declaration node
///
/// Tries the `name` field first, then direct identifier children, then the
/// identifier inside a `variable_declaration` wrapper (properties).
pub(crate) fn name_identifier<'t>(node: &Node<'t>) -> Option<Node<'t>> {
    if let Some(name) = node.child_by_field_name("name") {
        if name.kind() == "identifier" {
            return Some(name);
        }
    }

    // The wrapper check runs first: a property's initializer may be a bare
    // identifier sitting directly under the declaration node, which must not
    // be mistaken for the name.
    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        if matches!(child.kind(), "variable_declaration" | "multi_variable_declaration") {
            let mut inner = child.walk();
            for c in child.children(&mut inner) {
                if c.kind() == "identifier" {
                    return Some(c);
                }
            }
        }
    }
    drop(cursor);

    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        if child.kind() == "identifier" {
            return Some(child);
        }
    }
    None
}

/// Find the first identifier anywhere inside a node (the node itself counts)
fn identifier_within<'t>(node: &Node<'t>) -> Option<Node<'t>> {
    if node.kind() == "identifier" {
        return Some(*node);
    }
    name_identifier(node)
}

fn has_keyword_child(node: &Node, keyword: &str) -> bool {
    let mut cursor = node.walk();
    let found = node.children(&mut cursor).any(|c| c.kind() == keyword);
    found
}

fn has_modifier(node: &Node, source: &str, word: &str) -> bool {
    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        if child.kind() == "modifiers" {
            let mut inner = child.walk();
            for modifier in child.children(&mut inner) {
                if node_text(&modifier, source) == word {
                    return true;
                }
            }
        }
    }
    false
}

/// Classify a class-like declaration node
pub(crate) fn class_kind_of(node: &Node, source: &str) -> Option<ClassKind> {
    match node.kind() {
        "object_declaration" | "companion_object" => Some(ClassKind::Object),
        "interface_declaration" => Some(ClassKind::Interface),
        "enum_declaration" => Some(ClassKind::EnumClass),
        "enum_entry" => Some(ClassKind::EnumEntry),
        "class_declaration" => {
            if has_keyword_child(node, "interface") {
                Some(ClassKind::Interface)
            } else if has_modifier(node, source, "annotation") {
                Some(ClassKind::AnnotationClass)
            } else if has_modifier(node, source, "enum") || has_keyword_child(node, "enum") {
                Some(ClassKind::EnumClass)
            } else {
                Some(ClassKind::Class)
            }
        }
        _ => None,
    }
}

fn is_mutable(node: &Node, source: &str) -> bool {
    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        match child.kind() {
            "var" => return true,
            "val" => return false,
            "binding_pattern_kind" => return node_text(&child, source).trim() == "var",
            _ => {}
        }
    }
    false
}

/// Where a property declaration sits relative to class and function bodies
enum PropertyPosition {
    Local,
    Member { is_static: bool },
}

fn property_position(node: &Node) -> PropertyPosition {
    let mut current = node.parent();
    while let Some(parent) = current {
        match parent.kind() {
            "class_body" | "enum_class_body" => {
                let owner_is_object = parent
                    .parent()
                    .map(|owner| {
                        matches!(owner.kind(), "object_declaration" | "companion_object")
                    })
                    .unwrap_or(false);
                return PropertyPosition::Member {
                    is_static: owner_is_object,
                };
            }
            "function_declaration" | "secondary_constructor" | "anonymous_initializer"
            | "function_body" | "lambda_literal" | "getter" | "setter" => {
                return PropertyPosition::Local;
            }
            _ => {}
        }
        current = parent.parent();
    }
    // Top-level properties compile to static declarations.
    PropertyPosition::Member { is_static: true }
}

/// Resolve a `property_declaration` node to its target
pub(crate) fn property_target(node: &Node, source: &str) -> ResolvedTarget {
    let mutable = is_mutable(node, source);
    match property_position(node) {
        PropertyPosition::Local => ResolvedTarget::LocalVariable { mutable },
        PropertyPosition::Member { is_static } => ResolvedTarget::Property {
            mutable,
            is_static,
        },
    }
}

/// Resolve a `class_parameter` node: `val`/`var` promotes it to a property
pub(crate) fn class_parameter_target(node: &Node, source: &str) -> ResolvedTarget {
    let mut cursor = node.walk();
    let mut has_binding = false;
    let mut mutable = false;
    for child in node.children(&mut cursor) {
        match child.kind() {
            "val" => has_binding = true,
            "var" => {
                has_binding = true;
                mutable = true;
            }
            "binding_pattern_kind" => {
                has_binding = true;
                mutable = node_text(&child, source).trim() == "var";
            }
            _ => {}
        }
    }
    if has_binding {
        ResolvedTarget::Property {
            mutable,
            is_static: false,
        }
    } else {
        ResolvedTarget::Parameter
    }
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

    /// Byte range of the nth occurrence of `needle` (0-based)
    fn range_of(source: &str, needle: &str, occurrence: usize) -> OffsetRange {
        let mut found = source.find(needle).unwrap();
        for _ in 0..occurrence {
            let from = found + needle.len();
            found = from + source[from..].find(needle).unwrap();
        }
        OffsetRange::new(found, found + needle.len())
    }

    #[test]
    fn test_collects_class_declaration() {
        let source = "class Foo\n";
        let tree = parse(source);
        let bindings = FileBinder::bind(&tree, source);
        assert!(bindings.declaration_count() >= 1);
    }

    #[test]
    fn test_resolves_reference_to_class() {
        let source = "class Foo\nval x: Foo? = null\n";
        let tree = parse(source);
        let bindings = FileBinder::bind(&tree, source);

        let reference = range_of(source, "Foo", 1);
        assert_eq!(
            bindings.reference_target(&reference),
            Some(ResolvedTarget::Class {
                kind: ClassKind::Class
            })
        );
    }

    #[test]
    fn test_constructor_reference_wraps_class() {
        let source = "class Foo\nval x = Foo()\n";
        let tree = parse(source);
        let bindings = FileBinder::bind(&tree, source);

        let reference = range_of(source, "Foo", 1);
        assert_eq!(
            bindings.reference_target(&reference),
            Some(ResolvedTarget::Constructor {
                of: ClassKind::Class
            })
        );
    }

    #[test]
    fn test_declaration_name_is_not_a_reference() {
        let source = "class Foo\n";
        let tree = parse(source);
        let bindings = FileBinder::bind(&tree, source);

        let declaration_name = range_of(source, "Foo", 0);
        assert_eq!(bindings.reference_target(&declaration_name), None);
    }

    #[test]
    fn test_local_resolution_and_shadowing() {
        let source = "fun f(x: Int) {\n    val y = x\n    val x = 1\n    val z = x\n}\n";
        let tree = parse(source);
        let bindings = FileBinder::bind(&tree, source);

        // `x` in the initializer of `y` is still the parameter.
        let param_use = range_of(source, "x", 1);
        assert_eq!(
            bindings.reference_target(&param_use),
            Some(ResolvedTarget::Parameter)
        );

        // `x` in the initializer of `z` is the shadowing local.
        let local_use = range_of(source, "x", 3);
        assert_eq!(
            bindings.reference_target(&local_use),
            Some(ResolvedTarget::LocalVariable { mutable: false })
        );
    }

    #[test]
    fn test_import_paths_are_skipped() {
        let source = "import foo.bar.Baz\nclass Baz\n";
        let tree = parse(source);
        let bindings = FileBinder::bind(&tree, source);

        let imported = range_of(source, "Baz", 0);
        assert_eq!(bindings.reference_target(&imported), None);
    }

    #[test]
    fn test_member_property_is_not_local() {
        let source = "class C {\n    var count = 0\n}\n";
        let tree = parse(source);
        let bindings = FileBinder::bind(&tree, source);

        let root = tree.root_node();
        let mut found = None;
        visit(&root, &mut |n: &Node| {
            if n.kind() == "property_declaration" {
                found = bindings.declaration(&OffsetRange::of_node(n));
            }
        });
        assert_eq!(
            found,
            Some(ResolvedTarget::Property {
                mutable: true,
                is_static: false
            })
        );
    }

    #[test]
    fn test_object_property_is_static() {
        let source = "object Registry {\n    val name = \"r\"\n}\n";
        let tree = parse(source);
        let bindings = FileBinder::bind(&tree, source);

        let root = tree.root_node();
        let mut found = None;
        visit(&root, &mut |n: &Node| {
            if n.kind() == "property_declaration" {
                found = bindings.declaration(&OffsetRange::of_node(n));
            }
        });
        assert_eq!(
            found,
            Some(ResolvedTarget::Property {
                mutable: false,
                is_static: true
            })
        );
    }

    #[test]
    fn test_class_kind_detection_by_keyword() {
        let source = "interface Greeter\nenum class Color { RED }\nannotation class Marker\n";
        let tree = parse(source);

        let mut kinds = Vec::new();
        visit(&tree.root_node(), &mut |n: &Node| {
            if let Some(kind) = class_kind_of(n, source) {
                kinds.push(kind);
            }
        });

        assert!(kinds.contains(&ClassKind::Interface));
        assert!(kinds.contains(&ClassKind::EnumClass));
        assert!(kinds.contains(&ClassKind::AnnotationClass));
    }

    #[test]
    fn test_smart_cast_round_trip() {
        let mut context = BindingContext::new();
        let range = OffsetRange::new(4, 5);
        context.record_smart_cast(range, "kotlin.String".to_string());
        assert_eq!(context.smart_cast(&range), Some("kotlin.String"));
        assert_eq!(context.smart_cast(&OffsetRange::new(0, 1)), None);
    }

    fn visit<F: FnMut(&Node)>(node: &Node, f: &mut F) {
        f(node);
        let mut cursor = node.walk();
        for child in node.children(&mut cursor) {
            visit(&child, f);
        }
    }
}
