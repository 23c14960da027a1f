//! Namespace- and import-aware name resolution.
//!
//! Both passes walk files with a [`NameContext`] tracking the current
//! namespace, the `use` import map, and the enclosing class-like
//! declaration. Resolution is purely lexical; nothing is validated against
//! the hierarchy here.
//!
//! Resolution rules for a name at a use site:
//! 1. Fully qualified (`\App\Foo`) - strip the leading separator.
//! 2. `self` / `static` - the enclosing class-like FQCN, else the literal.
//! 3. First segment matches an import - substitute and append the rest.
//! 4. Inside a namespace - prepend it.
//! 5. Otherwise - the name as given.

use std::collections::HashMap;
use tree_sitter::Node;

use crate::ast::{child_by_kind, children_by_kind, named_children, node_text};

/// Saved namespace/import state for braced namespace bodies.
struct NameScope {
    namespace: Option<String>,
    imports: HashMap<String, String>,
}

/// Lexical naming context maintained while walking one file.
#[derive(Default)]
pub struct NameContext {
    namespace: Option<String>,
    /// short name (or alias) -> FQCN
    imports: HashMap<String, String>,
    current_class: Option<String>,
    stack: Vec<NameScope>,
}

impl NameContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reset to a pristine state for the next file.
    pub fn enter_file(&mut self) {
        self.namespace = None;
        self.imports.clear();
        self.current_class = None;
        self.stack.clear();
    }

    pub fn namespace(&self) -> Option<&str> {
        self.namespace.as_deref()
    }

    pub fn current_class(&self) -> Option<&str> {
        self.current_class.as_deref()
    }

    pub fn set_current_class(&mut self, class: Option<String>) {
        self.current_class = class;
    }

    /// Enter an unbraced `namespace Foo;` declaration: applies to the rest
    /// of the file and starts a fresh import map.
    pub fn set_namespace(&mut self, namespace: Option<String>) {
        self.namespace = namespace;
        self.imports.clear();
    }

    /// Push state before walking a braced `namespace Foo { ... }` body.
    pub fn push_scope(&mut self, namespace: Option<String>) {
        self.stack.push(NameScope {
            namespace: self.namespace.take(),
            imports: std::mem::take(&mut self.imports),
        });
        self.namespace = namespace;
    }

    /// Pop state after a braced namespace body, restoring the outer scope.
    pub fn pop_scope(&mut self) {
        if let Some(scope) = self.stack.pop() {
            self.namespace = scope.namespace;
            self.imports = scope.imports;
        }
    }

    /// Record one import mapping.
    pub fn record_import(&mut self, short: impl Into<String>, fqcn: impl Into<String>) {
        let fqcn = fqcn.into();
        self.imports
            .insert(short.into(), fqcn.trim_start_matches('\\').to_string());
    }

    /// Record every mapping of a `use` declaration node, including aliases
    /// and group imports. Function and constant imports are ignored; they
    /// never name a class.
    pub fn record_use_declaration(&mut self, node: &Node<'_>, source: &str) {
        if crate::ast::has_child_kind(node, "function") || crate::ast::has_child_kind(node, "const")
        {
            return;
        }

        for clause in children_by_kind(node, "namespace_use_clause") {
            let Some(name_node) = named_children(&clause)
                .into_iter()
                .find(|c| matches!(c.kind(), "name" | "qualified_name"))
            else {
                continue;
            };
            let fqcn = node_text(&name_node, source).trim_start_matches('\\');
            let short = clause
                .children(&mut clause.walk())
                .find(|c| c.kind() == "namespace_aliasing_clause")
                .and_then(|alias| child_by_kind(&alias, "name"))
                .map(|n| node_text(&n, source).to_string())
                .unwrap_or_else(|| last_segment(fqcn).to_string());
            self.record_import(short, fqcn);
        }

        // Group form: use App\Service\{Mailer, Payments as Pay};
        if let Some(group) = child_by_kind(node, "namespace_use_group") {
            let prefix = child_by_kind(node, "namespace_name")
                .map(|n| node_text(&n, source).trim_start_matches('\\').to_string())
                .unwrap_or_default();
            for clause in children_by_kind(&group, "namespace_use_group_clause") {
                let Some(name_node) = named_children(&clause)
                    .into_iter()
                    .find(|c| matches!(c.kind(), "name" | "qualified_name" | "namespace_name"))
                else {
                    continue;
                };
                let tail = node_text(&name_node, source);
                let fqcn = if prefix.is_empty() {
                    tail.to_string()
                } else {
                    format!("{}\\{}", prefix, tail)
                };
                let short = clause
                    .children(&mut clause.walk())
                    .find(|c| c.kind() == "namespace_aliasing_clause")
                    .and_then(|alias| child_by_kind(&alias, "name"))
                    .map(|n| node_text(&n, source).to_string())
                    .unwrap_or_else(|| last_segment(&fqcn).to_string());
                self.record_import(short, fqcn);
            }
        }
    }

    /// Qualify a *declared* name (class/trait/interface headers) with the
    /// current namespace. Declarations never go through the import map.
    pub fn qualify(&self, name: &str) -> String {
        match &self.namespace {
            Some(ns) => format!("{}\\{}", ns, name),
            None => name.to_string(),
        }
    }

    /// Resolve a *referenced* name at a use site to an FQCN.
    pub fn resolve(&self, name: &str) -> String {
        if let Some(stripped) = name.strip_prefix('\\') {
            return stripped.to_string();
        }
        if name == "self" || name == "static" {
            return self
                .current_class
                .clone()
                .unwrap_or_else(|| name.to_string());
        }

        let (first, rest) = match name.split_once('\\') {
            Some((first, rest)) => (first, Some(rest)),
            None => (name, None),
        };
        if let Some(mapped) = self.imports.get(first) {
            return match rest {
                Some(rest) => format!("{}\\{}", mapped, rest),
                None => mapped.clone(),
            };
        }

        match &self.namespace {
            Some(ns) => format!("{}\\{}", ns, name),
            None => name.to_string(),
        }
    }

    /// Resolve a type expression node to a class FQCN, if it names one.
    ///
    /// `?T` resolves to `T`; union and intersection types collapse to their
    /// first concrete class-like member; primitive types are not classes.
    pub fn resolve_type_node(&self, node: &Node<'_>, source: &str) -> Option<String> {
        match node.kind() {
            "optional_type" => named_children(node)
                .into_iter()
                .find_map(|child| self.resolve_type_node(&child, source)),
            "union_type" | "intersection_type" => named_children(node)
                .into_iter()
                .find_map(|child| self.resolve_type_node(&child, source)),
            "named_type" => {
                let inner = named_children(node).into_iter().next()?;
                self.resolve_type_node(&inner, source)
            }
            "name" | "qualified_name" => Some(self.resolve(node_text(node, source))),
            _ => None,
        }
    }
}

fn last_segment(name: &str) -> &str {
    name.rsplit('\\').next().unwrap_or(name)
}
