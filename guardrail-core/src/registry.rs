//! Property type registry.
//!
//! Records declared property types: explicit property declarations,
//! constructor-promoted parameters, and static properties all land in the
//! same table. Resolution walks the hierarchy: a direct hit wins; a trait
//! falls back to the classes that use it (a trait body's `$this->p` is
//! typed by the consuming class); otherwise the parent chain is searched.

use std::collections::{HashMap, HashSet};

use crate::hierarchy::ClassHierarchy;

/// `(class, property) -> declared class type`, keyed by FQCN.
#[derive(Debug, Default)]
pub struct TypeRegistry {
    properties: HashMap<String, HashMap<String, String>>,
}

impl TypeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_property_type(&mut self, class: &str, property: &str, ty: &str) {
        self.properties
            .entry(class.to_string())
            .or_default()
            .insert(property.to_string(), ty.to_string());
    }

    /// Direct hit only; no hierarchy walk.
    pub fn declared_type(&self, class: &str, property: &str) -> Option<&str> {
        self.properties
            .get(class)
            .and_then(|props| props.get(property))
            .map(String::as_str)
    }

    /// Resolve a property's class type from the viewpoint of `class`.
    ///
    /// Order: (1) the class itself; (2) if the class is a trait, every
    /// class using it in insertion order; (3) the parent chain. Trait-user
    /// scans can loop back through the hierarchy, so the search carries a
    /// visited set.
    pub fn resolve_property_type(
        &self,
        hierarchy: &ClassHierarchy,
        class: &str,
        property: &str,
    ) -> Option<String> {
        let mut visited = HashSet::new();
        self.resolve_inner(hierarchy, class, property, &mut visited)
    }

    fn resolve_inner(
        &self,
        hierarchy: &ClassHierarchy,
        class: &str,
        property: &str,
        visited: &mut HashSet<String>,
    ) -> Option<String> {
        if !visited.insert(class.to_string()) {
            return None;
        }

        if let Some(ty) = self.declared_type(class, property) {
            return Some(ty.to_string());
        }

        if hierarchy.is_trait(class) {
            for user in hierarchy.find_classes_using_trait(class) {
                let user = user.to_string();
                if let Some(ty) = self.resolve_inner(hierarchy, &user, property, visited) {
                    return Some(ty);
                }
            }
            return None;
        }

        let parent = hierarchy.parent_of(class)?.to_string();
        self.resolve_inner(hierarchy, &parent, property, visited)
    }

    /// Number of recorded property types.
    pub fn property_count(&self) -> usize {
        self.properties.values().map(HashMap::len).sum()
    }
}
