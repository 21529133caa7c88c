//! Semantic highlighting classifier
//!
//! Walks a parsed Kotlin tree depth-first and maps identifier-bearing ranges
//! to style tags using the resolution results in a [`BindingContext`]. The
//! pass is a pure function of (tree, bindings) aside from the cooperative
//! cancellation token: unresolved nodes are silently skipped and nothing is
//! ever logged or surfaced as an error.

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicBool, Ordering};

use tracing::trace;
use tree_sitter::Node;

use crate::resolve::{name_identifier, BindingContext, ClassKind, ResolvedTarget};
use crate::schema::{OffsetRange, StyleTag};

/// One classification pass over a single file
pub struct SemanticHighlighter<'a> {
    bindings: &'a BindingContext,
    cancel: &'a AtomicBool,
    positions: HashMap<OffsetRange, HashSet<StyleTag>>,
    smart_casts: HashMap<OffsetRange, String>,
}

impl<'a> SemanticHighlighter<'a> {
    pub fn new(bindings: &'a BindingContext, cancel: &'a AtomicBool) -> Self {
        Self {
            bindings,
            cancel,
            positions: HashMap::new(),
            smart_casts: HashMap::new(),
        }
    }

    /// Run the classifier from `root`, replacing any prior results
    ///
    /// Returns the freshly built highlight map. When the cancellation token
    /// is set mid-pass the traversal stops where it is; the partial map is
    /// discarded by the driver, never handed to the host.
    pub fn compute_highlighting_ranges(
        &mut self,
        root: Node,
    ) -> &HashMap<OffsetRange, HashSet<StyleTag>> {
        self.positions.clear();
        self.smart_casts.clear();
        self.visit(root);
        trace!(ranges = self.positions.len(), "highlighting pass complete");
        &self.positions
    }

    /// Smart-cast renderings collected during the last pass
    ///
    /// Kept separate from the highlight map: a narrowed type annotates a
    /// range, it does not restyle it.
    pub fn smart_casts(&self) -> &HashMap<OffsetRange, String> {
        &self.smart_casts
    }

    /// Consume the highlighter, yielding (highlight map, smart-cast map)
    pub fn into_results(
        self,
    ) -> (
        HashMap<OffsetRange, HashSet<StyleTag>>,
        HashMap<OffsetRange, String>,
    ) {
        (self.positions, self.smart_casts)
    }

    fn visit(&mut self, node: Node) {
        if self.cancel.load(Ordering::Relaxed) {
            return;
        }

        match node.kind() {
            "identifier" => {
                self.visit_simple_name(&node);
                return;
            }
            "type_parameters" => self.visit_type_parameters(&node),
            "class_declaration" | "interface_declaration" | "enum_declaration"
            | "object_declaration" | "companion_object" | "enum_entry" => {
                self.visit_class_or_object(&node);
            }
            "property_declaration" => self.visit_property(&node),
            "class_parameter" => self.visit_parameter(&node),
            "function_value_parameters" => self.visit_value_parameters(&node),
            "function_declaration" => self.visit_named_function(&node),
            _ => {}
        }

        let mut cursor = node.walk();
        for child in node.children(&mut cursor) {
            self.visit(child);
        }
    }

    /// Classify a simple name reference by its resolved target
    fn visit_simple_name(&mut self, node: &Node) {
        if let Some(parent) = node.parent() {
            // `this`/`super` are pseudo-references, never highlighted.
            if matches!(parent.kind(), "this_expression" | "super_expression") {
                return;
            }
        }

        let range = OffsetRange::of_node(node);
        let Some(target) = self.bindings.reference_target(&range) else {
            return;
        };

        // Constructor references highlight as their owning class.
        let target = match target {
            ResolvedTarget::Constructor { of } => ResolvedTarget::Class { kind: of },
            other => other,
        };

        let smart_cast = self.bindings.smart_cast(&range).map(str::to_owned);

        match target {
            ResolvedTarget::TypeParameter => {
                self.highlight(StyleTag::TypeParameter, range);
            }
            ResolvedTarget::Class { kind } => self.highlight_class(node, kind),
            ResolvedTarget::Property { mutable, is_static } => {
                self.highlight_property(range, mutable, is_static, smart_cast);
            }
            ResolvedTarget::LocalVariable { .. } | ResolvedTarget::Parameter => {
                self.highlight_variable(range, target, smart_cast);
            }
            // Plain function references carry no style of their own.
            ResolvedTarget::Function | ResolvedTarget::Constructor { .. } => {}
        }
    }

    /// Tag every declared type parameter name
    fn visit_type_parameters(&mut self, node: &Node) {
        let mut cursor = node.walk();
        for parameter in node.named_children(&mut cursor) {
            let name = if parameter.kind() == "identifier" {
                Some(parameter)
            } else {
                name_identifier(&parameter)
            };
            if let Some(name) = name {
                self.highlight(StyleTag::TypeParameter, OffsetRange::of_node(&name));
            }
        }
    }

    fn visit_class_or_object(&mut self, node: &Node) {
        let Some(name) = name_identifier(node) else {
            return;
        };
        let Some(ResolvedTarget::Class { kind }) =
            self.bindings.declaration(&OffsetRange::of_node(node))
        else {
            return;
        };
        self.highlight_class(&name, kind);
    }

    fn visit_property(&mut self, node: &Node) {
        let Some(name) = name_identifier(node) else {
            return;
        };
        let range = OffsetRange::of_node(&name);
        match self.bindings.declaration(&OffsetRange::of_node(node)) {
            Some(ResolvedTarget::Property { mutable, is_static }) => {
                self.highlight_property(range, mutable, is_static, None);
            }
            Some(target) => self.highlight_variable(range, target, None),
            None => {}
        }
    }

    /// A single constructor parameter: a `val`/`var` parameter is a property
    fn visit_parameter(&mut self, node: &Node) {
        let Some(name) = name_identifier(node) else {
            return;
        };
        let range = OffsetRange::of_node(&name);
        match self.bindings.declaration(&OffsetRange::of_node(node)) {
            Some(ResolvedTarget::Property { mutable, is_static }) => {
                self.highlight_property(range, mutable, is_static, None);
            }
            Some(target) => self.highlight_variable(range, target, None),
            None => self.highlight_variable(range, ResolvedTarget::Parameter, None),
        }
    }

    /// Function value parameters always classify through the variable rule
    fn visit_value_parameters(&mut self, node: &Node) {
        let mut cursor = node.walk();
        for parameter in node.named_children(&mut cursor) {
            let name = if parameter.kind() == "identifier" {
                Some(parameter)
            } else {
                name_identifier(&parameter)
            };
            let Some(name) = name else { continue };
            let range = OffsetRange::of_node(&name);
            let target = self
                .bindings
                .declaration(&OffsetRange::of_node(&parameter))
                .unwrap_or(ResolvedTarget::Parameter);
            match target {
                ResolvedTarget::Property { mutable, is_static } => {
                    self.highlight_property(range, mutable, is_static, None);
                }
                other => self.highlight_variable(range, other, None),
            }
        }
    }

    fn visit_named_function(&mut self, node: &Node) {
        if let Some(name) = name_identifier(node) {
            self.highlight(StyleTag::FunctionDeclaration, OffsetRange::of_node(&name));
        }
    }

    fn highlight_class(&mut self, element: &Node, kind: ClassKind) {
        let range = OffsetRange::of_node(element);
        match kind {
            ClassKind::Interface => self.highlight(StyleTag::Interface, range),
            ClassKind::AnnotationClass => self.highlight_annotation(element),
            ClassKind::EnumEntry => self.highlight(StyleTag::StaticFinalField, range),
            ClassKind::Class | ClassKind::Object => self.highlight(StyleTag::Class, range),
            // Enum class names get no tag of their own.
            ClassKind::EnumClass => {}
        }
    }

    /// Annotation references extend back to the `@` of the enclosing
    /// annotation node; the upward search stops at a value-argument list so
    /// an annotation class named inside another annotation's arguments only
    /// covers its own identifier.
    fn highlight_annotation(&mut self, element: &Node) {
        let mut range = OffsetRange::of_node(element);
        let mut current = element.parent();
        while let Some(parent) = current {
            match parent.kind() {
                "annotation" => {
                    range = OffsetRange::new(parent.start_byte(), element.end_byte());
                    break;
                }
                "value_arguments" => break,
                _ => {}
            }
            current = parent.parent();
        }
        self.highlight(StyleTag::Annotation, range);
    }

    fn highlight_property(
        &mut self,
        range: OffsetRange,
        mutable: bool,
        is_static: bool,
        smart_cast: Option<String>,
    ) {
        let tag = match (is_static, mutable) {
            (true, true) => StyleTag::StaticField,
            (true, false) => StyleTag::StaticFinalField,
            (false, true) => StyleTag::Field,
            (false, false) => StyleTag::FinalField,
        };
        if let Some(rendered) = smart_cast {
            self.note_smart_cast(range, rendered);
        }
        self.highlight(tag, range);
    }

    fn highlight_variable(
        &mut self,
        range: OffsetRange,
        target: ResolvedTarget,
        smart_cast: Option<String>,
    ) {
        let tag = match target {
            ResolvedTarget::LocalVariable { mutable: true } => StyleTag::LocalVariable,
            ResolvedTarget::LocalVariable { mutable: false } => StyleTag::LocalFinalVariable,
            ResolvedTarget::Parameter => StyleTag::ParameterVariable,
            _ => StyleTag::LocalVariable,
        };
        if let Some(rendered) = smart_cast {
            self.note_smart_cast(range, rendered);
        }
        self.highlight(tag, range);
    }

    fn highlight(&mut self, tag: StyleTag, range: OffsetRange) {
        self.positions.insert(range, HashSet::from([tag]));
    }

    fn note_smart_cast(&mut self, range: OffsetRange, rendered: String) {
        self.smart_casts.insert(range, rendered);
    }
}
