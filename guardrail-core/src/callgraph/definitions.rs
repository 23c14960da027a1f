//! Pass 1: definition collection.
//!
//! Walks every AST and populates the class hierarchy and the type
//! registry: parent links, used traits, implemented interfaces, method
//! definition sites, declared return types, and property types (declared,
//! constructor-promoted, static). Runs to completion before the call
//! analyzer looks at any call site, so forward references across files
//! resolve regardless of iteration order.

use tree_sitter::Node;

use crate::ast::{child_by_kind, named_children, node_text, type_child, variable_text};
use crate::hierarchy::ClassHierarchy;
use crate::names::NameContext;
use crate::parse::SourceUnit;
use crate::registry::TypeRegistry;

/// Collects declarations from parsed units into the shared tables.
pub struct DefinitionCollector<'a> {
    hierarchy: &'a mut ClassHierarchy,
    registry: &'a mut TypeRegistry,
    ctx: NameContext,
}

impl<'a> DefinitionCollector<'a> {
    pub fn new(hierarchy: &'a mut ClassHierarchy, registry: &'a mut TypeRegistry) -> Self {
        Self {
            hierarchy,
            registry,
            ctx: NameContext::new(),
        }
    }

    /// Collect every declaration in one unit.
    pub fn collect(&mut self, unit: &SourceUnit) {
        self.ctx.enter_file();
        self.walk_statements(&unit.root(), unit);
    }

    fn walk_statements(&mut self, node: &Node<'_>, unit: &SourceUnit) {
        for child in named_children(node) {
            self.walk_statement(&child, unit);
        }
    }

    fn walk_statement(&mut self, node: &Node<'_>, unit: &SourceUnit) {
        match node.kind() {
            "namespace_definition" => {
                let name = node
                    .child_by_field_name("name")
                    .map(|n| node_text(&n, &unit.source).to_string());
                if let Some(body) = child_by_kind(node, "compound_statement") {
                    self.ctx.push_scope(name);
                    self.walk_statements(&body, unit);
                    self.ctx.pop_scope();
                } else {
                    self.ctx.set_namespace(name);
                }
            }
            "namespace_use_declaration" => {
                self.ctx.record_use_declaration(node, &unit.source);
            }
            "class_declaration" => self.collect_class(node, unit),
            "trait_declaration" => self.collect_trait(node, unit),
            "interface_declaration" => self.collect_interface(node, unit),
            _ => {}
        }
    }

    fn collect_class(&mut self, node: &Node<'_>, unit: &SourceUnit) {
        let Some(name_node) = node.child_by_field_name("name") else {
            return;
        };
        let fqcn = self.ctx.qualify(node_text(&name_node, &unit.source));
        self.hierarchy.touch(&fqcn);
        self.hierarchy.set_file(&fqcn, &unit.path);

        if let Some(base) = child_by_kind(node, "base_clause") {
            if let Some(parent) = self.class_refs(&base, unit).into_iter().next() {
                self.hierarchy.set_parent(&fqcn, &parent);
            }
        }
        if let Some(clause) = child_by_kind(node, "class_interface_clause") {
            let interfaces = self.class_refs(&clause, unit);
            if !interfaces.is_empty() {
                self.hierarchy.set_interfaces(&fqcn, interfaces);
            }
        }

        self.ctx.set_current_class(Some(fqcn.clone()));
        if let Some(body) = node.child_by_field_name("body") {
            self.collect_members(&fqcn, &body, unit);
        }
        self.ctx.set_current_class(None);
    }

    fn collect_trait(&mut self, node: &Node<'_>, unit: &SourceUnit) {
        let Some(name_node) = node.child_by_field_name("name") else {
            return;
        };
        let fqcn = self.ctx.qualify(node_text(&name_node, &unit.source));
        self.hierarchy.mark_trait(&fqcn);
        self.hierarchy.set_file(&fqcn, &unit.path);

        self.ctx.set_current_class(Some(fqcn.clone()));
        if let Some(body) = node.child_by_field_name("body") {
            self.collect_members(&fqcn, &body, unit);
        }
        self.ctx.set_current_class(None);
    }

    fn collect_interface(&mut self, node: &Node<'_>, unit: &SourceUnit) {
        let Some(name_node) = node.child_by_field_name("name") else {
            return;
        };
        let fqcn = self.ctx.qualify(node_text(&name_node, &unit.source));
        self.hierarchy.mark_interface(&fqcn);
        self.hierarchy.set_file(&fqcn, &unit.path);

        self.ctx.set_current_class(Some(fqcn.clone()));
        if let Some(body) = node.child_by_field_name("body") {
            self.collect_members(&fqcn, &body, unit);
        }
        self.ctx.set_current_class(None);
    }

    /// Record methods, return types, trait uses, and property types from a
    /// class-like body.
    fn collect_members(&mut self, fqcn: &str, body: &Node<'_>, unit: &SourceUnit) {
        let mut used_traits = Vec::new();

        for member in named_children(body) {
            match member.kind() {
                "use_declaration" => {
                    used_traits.extend(self.class_refs(&member, unit));
                }
                "method_declaration" => self.collect_method(fqcn, &member, unit),
                "property_declaration" => self.collect_property(fqcn, &member, unit),
                _ => {}
            }
        }

        if !used_traits.is_empty() {
            self.hierarchy.set_traits(fqcn, used_traits);
        }
    }

    fn collect_method(&mut self, fqcn: &str, node: &Node<'_>, unit: &SourceUnit) {
        let Some(name_node) = node.child_by_field_name("name") else {
            return;
        };
        let method = node_text(&name_node, &unit.source);
        self.hierarchy.add_method_def(fqcn, method);

        if let Some(return_node) = type_child(node, "return_type") {
            if let Some(ty) = self.ctx.resolve_type_node(&return_node, &unit.source) {
                self.hierarchy.add_return_type(fqcn, method, &ty);
            }
        }

        // Constructor-promoted parameters declare typed properties.
        if let Some(params) = node.child_by_field_name("parameters") {
            for param in named_children(&params) {
                if param.kind() != "property_promotion_parameter" {
                    continue;
                }
                let Some(param_name) = param.child_by_field_name("name") else {
                    continue;
                };
                let Some(type_node) = type_child(&param, "type") else {
                    continue;
                };
                if let Some(ty) = self.ctx.resolve_type_node(&type_node, &unit.source) {
                    self.registry.add_property_type(
                        fqcn,
                        variable_text(&param_name, &unit.source),
                        &ty,
                    );
                }
            }
        }
    }

    fn collect_property(&mut self, fqcn: &str, node: &Node<'_>, unit: &SourceUnit) {
        let Some(type_node) = type_child(node, "type") else {
            return;
        };
        let Some(ty) = self.ctx.resolve_type_node(&type_node, &unit.source) else {
            return;
        };
        for element in named_children(node) {
            if element.kind() != "property_element" {
                continue;
            }
            if let Some(var) = child_by_kind(&element, "variable_name") {
                self.registry
                    .add_property_type(fqcn, variable_text(&var, &unit.source), &ty);
            }
        }
    }

    /// Resolved class references named directly under a clause node
    /// (extends/implements lists, trait uses).
    fn class_refs(&self, node: &Node<'_>, unit: &SourceUnit) -> Vec<String> {
        named_children(node)
            .into_iter()
            .filter(|c| matches!(c.kind(), "name" | "qualified_name"))
            .map(|c| self.ctx.resolve(node_text(&c, &unit.source)))
            .collect()
    }
}
