//! Pass 2: call analysis.
//!
//! Re-walks every AST after the definition collector has fully populated
//! the hierarchy and registry, infers receiver types from syntactic
//! evidence, and emits call-graph edges. Receiver typing covers `new`
//! expressions, typed and promoted properties, static properties, local
//! variable assignments, chained calls through declared return types,
//! ternary and null-coalescing fallbacks, `clone`, and null-safe chains.
//!
//! Everything is best-effort: an unresolvable receiver produces an edge
//! with an unknown callee class (kept for diagnostics, never traversed),
//! and an unresolvable expression simply yields no type.

use std::collections::HashMap;

use tree_sitter::Node;

use crate::ast::{child_by_kind, named_children, node_line, node_text, type_child, variable_text};
use crate::callgraph::graph::{CallGraph, MethodCall};
use crate::hierarchy::ClassHierarchy;
use crate::names::NameContext;
use crate::parse::SourceUnit;
use crate::registry::TypeRegistry;

/// Local variable types within one method body.
///
/// Seeded from typed parameters, updated by assignments, reset per method.
/// Reassignment overwrites; an unresolvable right-hand side leaves the
/// prior binding untouched.
#[derive(Debug, Default)]
pub struct MethodScope {
    vars: HashMap<String, String>,
}

impl MethodScope {
    pub fn reset(&mut self) {
        self.vars.clear();
    }

    pub fn bind(&mut self, var: &str, class: &str) {
        self.vars.insert(var.to_string(), class.to_string());
    }

    pub fn lookup(&self, var: &str) -> Option<&str> {
        self.vars.get(var).map(String::as_str)
    }
}

/// Emits call edges for one unit at a time.
pub struct CallAnalyzer<'a> {
    hierarchy: &'a ClassHierarchy,
    registry: &'a TypeRegistry,
    graph: &'a mut CallGraph,
    ctx: NameContext,
    scope: MethodScope,
    current_method: Option<String>,
}

impl<'a> CallAnalyzer<'a> {
    pub fn new(
        hierarchy: &'a ClassHierarchy,
        registry: &'a TypeRegistry,
        graph: &'a mut CallGraph,
    ) -> Self {
        Self {
            hierarchy,
            registry,
            graph,
            ctx: NameContext::new(),
            scope: MethodScope::default(),
            current_method: None,
        }
    }

    /// Analyze every call site in one unit.
    pub fn analyze(&mut self, unit: &SourceUnit) {
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
            // Interfaces carry no bodies; calls outside any class are
            // never entry points nor on a path from one, so top-level
            // statements are dropped entirely.
            "class_declaration" | "trait_declaration" => self.walk_class_like(node, unit),
            _ => {}
        }
    }

    fn walk_class_like(&mut self, node: &Node<'_>, unit: &SourceUnit) {
        let Some(name_node) = node.child_by_field_name("name") else {
            return;
        };
        let fqcn = self.ctx.qualify(node_text(&name_node, &unit.source));
        self.ctx.set_current_class(Some(fqcn));

        if let Some(body) = node.child_by_field_name("body") {
            for member in named_children(&body) {
                if member.kind() == "method_declaration" {
                    self.walk_method(&member, unit);
                }
            }
        }

        self.ctx.set_current_class(None);
    }

    fn walk_method(&mut self, node: &Node<'_>, unit: &SourceUnit) {
        let Some(name_node) = node.child_by_field_name("name") else {
            return;
        };
        self.current_method = Some(node_text(&name_node, &unit.source).to_string());
        self.scope.reset();

        // Typed parameters (plain and promoted) seed the local scope.
        if let Some(params) = node.child_by_field_name("parameters") {
            for param in named_children(&params) {
                if !matches!(
                    param.kind(),
                    "simple_parameter" | "property_promotion_parameter"
                ) {
                    continue;
                }
                let (Some(param_name), Some(type_node)) =
                    (param.child_by_field_name("name"), type_child(&param, "type"))
                else {
                    continue;
                };
                if let Some(ty) = self.ctx.resolve_type_node(&type_node, &unit.source) {
                    self.scope.bind(variable_text(&param_name, &unit.source), &ty);
                }
            }
        }

        if let Some(body) = node.child_by_field_name("body") {
            self.visit(&body, unit);
        }
        self.current_method = None;
    }

    /// Recursive source-order walk over a method body. Assignments update
    /// the scope before later statements are visited; call sites emit
    /// edges as they are encountered.
    fn visit(&mut self, node: &Node<'_>, unit: &SourceUnit) {
        match node.kind() {
            "assignment_expression" => {
                if let (Some(left), Some(right)) = (
                    node.child_by_field_name("left"),
                    node.child_by_field_name("right"),
                ) {
                    if left.kind() == "variable_name" {
                        if let Some(ty) = self.expr_type(&right, unit) {
                            self.scope.bind(variable_text(&left, &unit.source), &ty);
                        }
                    }
                }
            }
            "member_call_expression" | "nullsafe_member_call_expression" => {
                self.emit_instance_call(node, unit);
            }
            "scoped_call_expression" => {
                self.emit_static_call(node, unit);
            }
            "function_call_expression" => {
                self.emit_invocable_call(node, unit);
            }
            _ => {}
        }

        for child in named_children(node) {
            self.visit(&child, unit);
        }
    }

    /// `recv->m(...)` and `recv?->m(...)`.
    ///
    /// When the receiver resolves to the current class, the edge points at
    /// the method's true defining site (trait or ancestor) so reachability
    /// flows through inheritance.
    fn emit_instance_call(&mut self, node: &Node<'_>, unit: &SourceUnit) {
        let Some(name_node) = node.child_by_field_name("name") else {
            return;
        };
        if name_node.kind() != "name" {
            // dynamic method name: nothing usable to record
            return;
        }
        let method = node_text(&name_node, &unit.source).to_string();
        let Some(object) = node.child_by_field_name("object") else {
            return;
        };

        let callee_class = self.expr_type(&object, unit).map(|receiver| {
            if self.ctx.current_class() == Some(receiver.as_str()) {
                self.hierarchy
                    .resolve_method_class(&receiver, &method)
                    .unwrap_or(receiver)
            } else {
                receiver
            }
        });

        let receiver_label = node_text(&object, &unit.source).to_string();
        self.push_edge(
            callee_class,
            method,
            node_line(node),
            false,
            Some(receiver_label),
        );
    }

    /// `C::m(...)`, including `self::`, `static::`, and `parent::`.
    fn emit_static_call(&mut self, node: &Node<'_>, unit: &SourceUnit) {
        let Some(name_node) = node.child_by_field_name("name") else {
            return;
        };
        if name_node.kind() != "name" {
            return;
        }
        let method = node_text(&name_node, &unit.source).to_string();
        let Some(scope_node) = node.child_by_field_name("scope") else {
            return;
        };

        let callee_class = match scope_node.kind() {
            "relative_scope" => match node_text(&scope_node, &unit.source) {
                // parent:: resolves strictly through the parent chain,
                // bypassing the current class's traits
                "parent" => self
                    .ctx
                    .current_class()
                    .and_then(|class| self.hierarchy.parent_of(class))
                    .map(|parent| {
                        self.hierarchy
                            .resolve_method_class(parent, &method)
                            .unwrap_or_else(|| parent.to_string())
                    }),
                _ => self.ctx.current_class().map(|class| {
                    self.hierarchy
                        .resolve_method_class(class, &method)
                        .unwrap_or_else(|| class.to_string())
                }),
            },
            "name" | "qualified_name" => {
                Some(self.ctx.resolve(node_text(&scope_node, &unit.source)))
            }
            _ => None,
        };

        let receiver_label = node_text(&scope_node, &unit.source).to_string();
        self.push_edge(
            callee_class,
            method,
            node_line(node),
            true,
            Some(receiver_label),
        );
    }

    /// `$v(...)` and `($this->p)(...)`: call syntax on an object value
    /// dispatches to `__invoke` on its class. Plain named function calls
    /// emit nothing; the graph tracks method-to-method edges only.
    fn emit_invocable_call(&mut self, node: &Node<'_>, unit: &SourceUnit) {
        let Some(mut function) = node.child_by_field_name("function") else {
            return;
        };
        // ($this->p)() parses as a call on a parenthesized expression
        while function.kind() == "parenthesized_expression" {
            match named_children(&function).into_iter().next() {
                Some(inner) => function = inner,
                None => return,
            }
        }
        let receiver = match function.kind() {
            "variable_name"
            | "member_access_expression"
            | "nullsafe_member_access_expression"
            | "scoped_property_access_expression" => self.expr_type(&function, unit),
            _ => return,
        };
        // An untyped callee could be a plain closure; only a known class
        // yields an __invoke edge.
        let Some(receiver) = receiver else {
            return;
        };

        let receiver_label = node_text(&function, &unit.source).to_string();
        self.push_edge(
            Some(receiver),
            "__invoke".to_string(),
            node_line(node),
            false,
            Some(receiver_label),
        );
    }

    fn push_edge(
        &mut self,
        callee_class: Option<String>,
        callee_method: String,
        line: usize,
        is_static: bool,
        receiver: Option<String>,
    ) {
        let (Some(caller_class), Some(caller_method)) =
            (self.ctx.current_class(), self.current_method.as_deref())
        else {
            return;
        };
        self.graph.add(MethodCall {
            caller_class: caller_class.to_string(),
            caller_method: caller_method.to_string(),
            callee_class,
            callee_method,
            line,
            is_static,
            receiver,
        });
    }

    /// Best-effort class type of an expression. `None` means "not a class
    /// we can name", never an error.
    fn expr_type(&self, node: &Node<'_>, unit: &SourceUnit) -> Option<String> {
        let source = &unit.source;
        match node.kind() {
            "parenthesized_expression" => {
                let inner = named_children(node).into_iter().next()?;
                self.expr_type(&inner, unit)
            }
            "object_creation_expression" => named_children(node)
                .into_iter()
                .find(|c| matches!(c.kind(), "name" | "qualified_name"))
                .map(|c| self.ctx.resolve(node_text(&c, source))),
            "variable_name" => {
                let var = variable_text(node, source);
                if var == "this" {
                    return self.ctx.current_class().map(String::from);
                }
                self.scope.lookup(var).map(String::from)
            }
            "member_access_expression" | "nullsafe_member_access_expression" => {
                let object = node.child_by_field_name("object")?;
                let name_node = node.child_by_field_name("name")?;
                if name_node.kind() != "name" {
                    return None;
                }
                let owner = self.expr_type(&object, unit)?;
                self.registry.resolve_property_type(
                    self.hierarchy,
                    &owner,
                    node_text(&name_node, source),
                )
            }
            "scoped_property_access_expression" => {
                let scope_node = node.child_by_field_name("scope")?;
                let name_node = node.child_by_field_name("name")?;
                if name_node.kind() != "variable_name" {
                    return None;
                }
                if !matches!(
                    scope_node.kind(),
                    "name" | "qualified_name" | "relative_scope"
                ) {
                    return None;
                }
                let owner = self.ctx.resolve(node_text(&scope_node, source));
                self.registry.resolve_property_type(
                    self.hierarchy,
                    &owner,
                    variable_text(&name_node, source),
                )
            }
            "member_call_expression" | "nullsafe_member_call_expression" => {
                let object = node.child_by_field_name("object")?;
                let name_node = node.child_by_field_name("name")?;
                if name_node.kind() != "name" {
                    return None;
                }
                let receiver = self.expr_type(&object, unit)?;
                self.hierarchy
                    .resolve_method_return_type(&receiver, node_text(&name_node, source))
            }
            "scoped_call_expression" => {
                let scope_node = node.child_by_field_name("scope")?;
                let name_node = node.child_by_field_name("name")?;
                if name_node.kind() != "name" {
                    return None;
                }
                if !matches!(
                    scope_node.kind(),
                    "name" | "qualified_name" | "relative_scope"
                ) {
                    return None;
                }
                let owner = self.ctx.resolve(node_text(&scope_node, source));
                self.hierarchy
                    .resolve_method_return_type(&owner, node_text(&name_node, source))
            }
            "conditional_expression" => {
                // `a ? b : c` takes b's type, falling back to c;
                // `a ?: c` takes a's type, falling back to c
                let first = node
                    .child_by_field_name("body")
                    .or_else(|| node.child_by_field_name("condition"))?;
                let first_ty = self.expr_type(&first, unit);
                if first_ty.is_some() {
                    return first_ty;
                }
                let alternative = node.child_by_field_name("alternative")?;
                self.expr_type(&alternative, unit)
            }
            "binary_expression" => {
                let operator = node.child_by_field_name("operator")?;
                if node_text(&operator, source) != "??" {
                    return None;
                }
                let left = node.child_by_field_name("left")?;
                let left_ty = self.expr_type(&left, unit);
                if left_ty.is_some() {
                    return left_ty;
                }
                let right = node.child_by_field_name("right")?;
                self.expr_type(&right, unit)
            }
            "clone_expression" => {
                let inner = named_children(node).into_iter().next()?;
                self.expr_type(&inner, unit)
            }
            _ => None,
        }
    }
}
