//! Class hierarchy tables: parents, traits, interfaces, method definition
//! sites, and declared return types.
//!
//! Populated once by the definition collector (Pass 1), then read-only for
//! the call analyzer and the evaluator. Lookup order for methods matches
//! the language being modeled: an imported trait's method shadows an
//! inherited parent method of the same name.
//!
//! Parent links form a forest in well-formed code; cycles written by broken
//! code are tolerated via visited sets rather than rejected.

use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};

/// Write-once hierarchy tables keyed by FQCN.
#[derive(Debug, Default)]
pub struct ClassHierarchy {
    parents: HashMap<String, String>,
    traits_used: HashMap<String, Vec<String>>,
    interfaces: HashMap<String, Vec<String>>,
    /// class -> methods whose body lives in that class
    method_defs: HashMap<String, HashSet<String>>,
    /// class -> method -> declared return type
    return_types: HashMap<String, HashMap<String, String>>,
    trait_set: HashSet<String>,
    interface_set: HashSet<String>,
    files: HashMap<String, PathBuf>,
    /// classes in first-registration order; implementor/user scans must be
    /// deterministic across runs
    order: Vec<String>,
    known: HashSet<String>,
}

impl ClassHierarchy {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a class-like name, preserving first-seen order.
    pub fn touch(&mut self, class: &str) {
        if self.known.insert(class.to_string()) {
            self.order.push(class.to_string());
        }
    }

    pub fn set_parent(&mut self, class: &str, parent: &str) {
        self.touch(class);
        self.parents.insert(class.to_string(), parent.to_string());
    }

    pub fn set_traits(&mut self, class: &str, traits: Vec<String>) {
        self.touch(class);
        self.traits_used.insert(class.to_string(), traits);
    }

    pub fn set_interfaces(&mut self, class: &str, interfaces: Vec<String>) {
        self.touch(class);
        self.interfaces.insert(class.to_string(), interfaces);
    }

    pub fn mark_trait(&mut self, name: &str) {
        self.touch(name);
        self.trait_set.insert(name.to_string());
    }

    pub fn mark_interface(&mut self, name: &str) {
        self.touch(name);
        self.interface_set.insert(name.to_string());
    }

    pub fn add_method_def(&mut self, class: &str, method: &str) {
        self.touch(class);
        self.method_defs
            .entry(class.to_string())
            .or_default()
            .insert(method.to_string());
    }

    pub fn add_return_type(&mut self, class: &str, method: &str, ty: &str) {
        self.touch(class);
        self.return_types
            .entry(class.to_string())
            .or_default()
            .insert(method.to_string(), ty.to_string());
    }

    pub fn set_file(&mut self, class: &str, file: &Path) {
        self.touch(class);
        self.files.insert(class.to_string(), file.to_path_buf());
    }

    pub fn is_trait(&self, name: &str) -> bool {
        self.trait_set.contains(name)
    }

    pub fn is_interface(&self, name: &str) -> bool {
        self.interface_set.contains(name)
    }

    pub fn parent_of(&self, class: &str) -> Option<&str> {
        self.parents.get(class).map(String::as_str)
    }

    pub fn traits_of(&self, class: &str) -> &[String] {
        self.traits_used.get(class).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn interfaces_of(&self, class: &str) -> &[String] {
        self.interfaces.get(class).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Whether the method body lives in this exact class.
    pub fn defines(&self, class: &str, method: &str) -> bool {
        self.method_defs
            .get(class)
            .is_some_and(|methods| methods.contains(method))
    }

    pub fn file_of(&self, class: &str) -> Option<&Path> {
        self.files.get(class).map(PathBuf::as_path)
    }

    /// All class-like names in first-registration order.
    pub fn classes(&self) -> impl Iterator<Item = &str> {
        self.order.iter().map(String::as_str)
    }

    /// All (class, method) definition sites, unordered.
    pub fn method_definitions(&self) -> impl Iterator<Item = (&str, &str)> {
        self.method_defs.iter().flat_map(|(class, methods)| {
            methods
                .iter()
                .map(move |method| (class.as_str(), method.as_str()))
        })
    }

    /// Find the FQCN that lexically owns `method` when looked up from
    /// `class`: the class itself, then its traits in declaration order,
    /// then recursively the parent chain.
    pub fn resolve_method_class(&self, class: &str, method: &str) -> Option<String> {
        let mut visited = HashSet::new();
        self.resolve_method_class_inner(class, method, &mut visited)
    }

    fn resolve_method_class_inner(
        &self,
        class: &str,
        method: &str,
        visited: &mut HashSet<String>,
    ) -> Option<String> {
        if !visited.insert(class.to_string()) {
            return None;
        }
        if self.defines(class, method) {
            return Some(class.to_string());
        }
        for used in self.traits_of(class) {
            if self.defines(used, method) {
                return Some(used.clone());
            }
        }
        let parent = self.parent_of(class)?.to_string();
        self.resolve_method_class_inner(&parent, method, visited)
    }

    /// Same search order as [`Self::resolve_method_class`], over the
    /// declared-return-type table.
    pub fn resolve_method_return_type(&self, class: &str, method: &str) -> Option<String> {
        let mut visited = HashSet::new();
        self.resolve_method_return_type_inner(class, method, &mut visited)
    }

    fn resolve_method_return_type_inner(
        &self,
        class: &str,
        method: &str,
        visited: &mut HashSet<String>,
    ) -> Option<String> {
        if !visited.insert(class.to_string()) {
            return None;
        }
        if let Some(ty) = self
            .return_types
            .get(class)
            .and_then(|methods| methods.get(method))
        {
            return Some(ty.clone());
        }
        for used in self.traits_of(class) {
            if let Some(ty) = self
                .return_types
                .get(used.as_str())
                .and_then(|methods| methods.get(method))
            {
                return Some(ty.clone());
            }
        }
        let parent = self.parent_of(class)?.to_string();
        self.resolve_method_return_type_inner(&parent, method, visited)
    }

    /// Classes declaring `interface_name` in their implements list, in
    /// class-insertion order.
    pub fn find_classes_implementing(&self, interface_name: &str) -> Vec<&str> {
        self.order
            .iter()
            .filter(|class| {
                self.interfaces
                    .get(*class)
                    .is_some_and(|list| list.iter().any(|i| i == interface_name))
            })
            .map(String::as_str)
            .collect()
    }

    /// Classes using `trait_name`, in class-insertion order.
    pub fn find_classes_using_trait(&self, trait_name: &str) -> Vec<&str> {
        self.order
            .iter()
            .filter(|class| {
                self.traits_used
                    .get(*class)
                    .is_some_and(|list| list.iter().any(|t| t == trait_name))
            })
            .map(String::as_str)
            .collect()
    }

    /// Total number of registered class-like names.
    pub fn class_count(&self) -> usize {
        self.order.len()
    }

    /// Total number of method definition sites.
    pub fn method_count(&self) -> usize {
        self.method_defs.values().map(HashSet::len).sum()
    }
}
