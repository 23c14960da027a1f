//! Entry-point records and discovery.
//!
//! The engine does not prescribe how entry points are found; anything that
//! yields [`EntryPoint`] records works (route files, attribute scans, ...).
//! The built-in provider matches wildcard patterns against the method
//! definition sites Pass 1 recorded, which covers the common
//! "all controller actions" selection without framework knowledge.

use std::path::PathBuf;

use crate::hierarchy::ClassHierarchy;

/// A (class, method) pair at which reachability analysis begins.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryPoint {
    pub class: String,
    pub method: String,
    pub file: PathBuf,
    /// Route path, when discovered from a route table
    pub route: Option<String>,
    /// HTTP method, when discovered from a route table
    pub http_method: Option<String>,
    pub description: Option<String>,
}

impl EntryPoint {
    pub fn new(class: impl Into<String>, method: impl Into<String>, file: PathBuf) -> Self {
        Self {
            class: class.into(),
            method: method.into(),
            file,
            route: None,
            http_method: None,
            description: None,
        }
    }

    /// The graph identifier evaluation starts from.
    pub fn id(&self) -> String {
        format!("{}::{}", self.class, self.method)
    }
}

impl std::fmt::Display for EntryPoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}::{}", self.class, self.method)
    }
}

/// Anything that can enumerate entry points against the built hierarchy.
pub trait EntryPointProvider {
    fn entry_points(&self, hierarchy: &ClassHierarchy) -> Vec<EntryPoint>;
}

/// Selects entry points by `Class::method` wildcard patterns.
#[derive(Debug, Clone, Default)]
pub struct PatternEntryPoints {
    patterns: Vec<String>,
    excludes: Vec<String>,
}

impl PatternEntryPoints {
    pub fn new(patterns: Vec<String>) -> Self {
        Self {
            patterns,
            excludes: Vec::new(),
        }
    }

    pub fn with_excludes(mut self, excludes: Vec<String>) -> Self {
        self.excludes = excludes;
        self
    }

    fn selects(&self, id: &str) -> bool {
        self.patterns.iter().any(|p| wildcard_match(p, id))
            && !self.excludes.iter().any(|p| wildcard_match(p, id))
    }
}

impl EntryPointProvider for PatternEntryPoints {
    /// Matches against method *definition sites* only: an entry point is a
    /// method with a body somewhere. Results are sorted by identifier so
    /// evaluation order is reproducible.
    fn entry_points(&self, hierarchy: &ClassHierarchy) -> Vec<EntryPoint> {
        let mut matches: Vec<(String, String)> = hierarchy
            .method_definitions()
            .filter(|(class, _)| !hierarchy.is_interface(class))
            .map(|(class, method)| (class.to_string(), method.to_string()))
            .filter(|(class, method)| self.selects(&format!("{}::{}", class, method)))
            .collect();
        matches.sort();

        matches
            .into_iter()
            .map(|(class, method)| {
                let file = hierarchy
                    .file_of(&class)
                    .map(PathBuf::from)
                    .unwrap_or_default();
                EntryPoint::new(class, method, file)
            })
            .collect()
    }
}

/// Glob-lite matching: `*` matches any run of characters (including
/// namespace separators), everything else is literal.
pub fn wildcard_match(pattern: &str, text: &str) -> bool {
    let pattern: Vec<char> = pattern.chars().collect();
    let text: Vec<char> = text.chars().collect();

    let (mut p, mut t) = (0usize, 0usize);
    let mut star: Option<(usize, usize)> = None;

    while t < text.len() {
        if p < pattern.len() && pattern[p] == '*' {
            star = Some((p, t));
            p += 1;
        } else if p < pattern.len() && pattern[p] == text[t] {
            p += 1;
            t += 1;
        } else if let Some((star_p, star_t)) = star {
            // backtrack: let the last * absorb one more character
            p = star_p + 1;
            t = star_t + 1;
            star = Some((star_p, star_t + 1));
        } else {
            return false;
        }
    }
    while p < pattern.len() && pattern[p] == '*' {
        p += 1;
    }
    p == pattern.len()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    #[test]
    fn test_wildcard_literal() {
        assert!(wildcard_match("App\\A::run", "App\\A::run"));
        assert!(!wildcard_match("App\\A::run", "App\\A::walk"));
    }

    #[test]
    fn test_wildcard_star_spans_separators() {
        assert!(wildcard_match("App\\*::run", "App\\Http\\Ctrl::run"));
        assert!(wildcard_match("*::*", "Anything::atAll"));
        assert!(wildcard_match("App\\*Controller::*", "App\\HomeController::index"));
        assert!(!wildcard_match("App\\*Controller::*", "App\\HomeService::index"));
    }

    #[test]
    fn test_wildcard_suffix() {
        assert!(wildcard_match("*::handle*", "App\\Job::handleNow"));
        assert!(!wildcard_match("*::handle*", "App\\Job::run"));
    }

    #[test]
    fn test_provider_matches_definitions_sorted() {
        let mut h = ClassHierarchy::new();
        h.add_method_def("App\\ZCtrl", "run");
        h.add_method_def("App\\ACtrl", "run");
        h.add_method_def("App\\ACtrl", "helper");
        h.set_file("App\\ACtrl", Path::new("app/ACtrl.php"));

        let provider = PatternEntryPoints::new(vec!["App\\*::run".to_string()]);
        let entries = provider.entry_points(&h);

        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].id(), "App\\ACtrl::run");
        assert_eq!(entries[1].id(), "App\\ZCtrl::run");
        assert_eq!(entries[0].file, PathBuf::from("app/ACtrl.php"));
    }

    #[test]
    fn test_provider_excludes() {
        let mut h = ClassHierarchy::new();
        h.add_method_def("App\\Ctrl", "run");
        h.add_method_def("App\\Internal", "run");

        let provider = PatternEntryPoints::new(vec!["App\\*::run".to_string()])
            .with_excludes(vec!["App\\Internal::*".to_string()]);
        let entries = provider.entry_points(&h);

        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].class, "App\\Ctrl");
    }

    #[test]
    fn test_provider_skips_interfaces() {
        let mut h = ClassHierarchy::new();
        h.mark_interface("App\\Handler");
        h.add_method_def("App\\Handler", "run");
        h.add_method_def("App\\Concrete", "run");

        let provider = PatternEntryPoints::new(vec!["*::run".to_string()]);
        let entries = provider.entry_points(&h);

        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].class, "App\\Concrete");
    }

    #[test]
    fn test_provider_no_matches_is_empty() {
        let mut h = ClassHierarchy::new();
        h.add_method_def("App\\Ctrl", "run");
        let provider = PatternEntryPoints::new(vec!["Nope\\*::*".to_string()]);
        assert!(provider.entry_points(&h).is_empty());
    }
}
