//! Call graph construction and queries.
//!
//! A directed multigraph keyed by method identifier (`FQCN::method`):
//! - Nodes are methods, identified by string
//! - Edges are call sites carrying source metadata (A -> B means A calls B)
//!
//! Both adjacency maps preserve insertion order, which makes witness paths
//! reproducible for a fixed file order. Edges whose callee class could not
//! be resolved are recorded for diagnostics but never traversed.
//!
//! Performance characteristics:
//! - Edge insert: O(1) amortized
//! - `has_path` / `find_path`: O(|V| + |E|) depth-first with a per-search
//!   visited set

use std::collections::{HashMap, HashSet, VecDeque};
use std::fmt;

/// One call site: an edge from a caller method to a callee method.
///
/// Immutable once emitted. Synthetic edges (interface fan-out) carry
/// line 0.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MethodCall {
    /// FQCN of the class whose method contains the call site
    pub caller_class: String,
    /// Method containing the call site
    pub caller_method: String,
    /// FQCN of the resolved callee class; `None` when the receiver could
    /// not be resolved
    pub callee_class: Option<String>,
    /// Called method name
    pub callee_method: String,
    /// 1-indexed source line; 0 for synthesized edges
    pub line: usize,
    /// Whether the call site used static syntax (`C::m()`)
    pub is_static: bool,
    /// Receiver expression label for diagnostics (e.g. `$this->db`)
    pub receiver: Option<String>,
}

impl MethodCall {
    /// Identifier of the calling method.
    pub fn caller_id(&self) -> String {
        format!("{}::{}", self.caller_class, self.caller_method)
    }

    /// Identifier of the called method, when the callee class is known.
    pub fn callee_id(&self) -> Option<String> {
        self.callee_class
            .as_ref()
            .map(|class| format!("{}::{}", class, self.callee_method))
    }

    /// Whether the callee class was resolved.
    pub fn is_resolved(&self) -> bool {
        self.callee_class.is_some()
    }
}

impl fmt::Display for MethodCall {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let callee = match self.callee_id() {
            Some(id) => id,
            None => format!("?::{}", self.callee_method),
        };
        write!(f, "{} -> {}", self.caller_id(), callee)?;
        if self.line > 0 {
            write!(f, " (line {})", self.line)?;
        }
        Ok(())
    }
}

/// Directed multigraph of method calls.
#[derive(Debug, Default)]
pub struct CallGraph {
    /// caller id -> outgoing call sites, in insertion order
    outgoing: HashMap<String, Vec<MethodCall>>,
    /// callee id -> incoming call sites, in insertion order
    incoming: HashMap<String, Vec<MethodCall>>,
    edge_count: usize,
}

/// Statistics about a built call graph.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CallGraphStats {
    pub caller_count: usize,
    pub edge_count: usize,
    pub unresolved_count: usize,
    pub synthetic_count: usize,
}

impl CallGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an edge. The outgoing bucket is keyed by the caller; when
    /// the callee class is known the edge is mirrored into the incoming
    /// bucket under the callee identifier.
    pub fn add(&mut self, call: MethodCall) {
        if let Some(callee_id) = call.callee_id() {
            self.incoming
                .entry(callee_id)
                .or_default()
                .push(call.clone());
        }
        self.edge_count += 1;
        self.outgoing.entry(call.caller_id()).or_default().push(call);
    }

    /// Append an edge unless an identical `(caller, callee, line, static)`
    /// edge already exists. Used by the interface linker so repeated link
    /// passes stay idempotent.
    pub fn add_unique(&mut self, call: MethodCall) {
        if self.contains_edge(&call) {
            return;
        }
        self.add(call);
    }

    fn contains_edge(&self, call: &MethodCall) -> bool {
        self.outgoing
            .get(&call.caller_id())
            .is_some_and(|edges| {
                edges.iter().any(|e| {
                    e.callee_class == call.callee_class
                        && e.callee_method == call.callee_method
                        && e.line == call.line
                        && e.is_static == call.is_static
                })
            })
    }

    /// Outgoing call sites of a method, in insertion order.
    pub fn calls_from(&self, method_id: &str) -> &[MethodCall] {
        self.outgoing
            .get(method_id)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Incoming call sites of a method, in insertion order.
    pub fn calls_to(&self, method_id: &str) -> &[MethodCall] {
        self.incoming
            .get(method_id)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Every method identifier appearing as caller or resolved callee.
    pub fn method_ids(&self) -> Vec<String> {
        let mut ids: HashSet<&str> = HashSet::new();
        ids.extend(self.outgoing.keys().map(String::as_str));
        ids.extend(self.incoming.keys().map(String::as_str));
        let mut ids: Vec<String> = ids.into_iter().map(String::from).collect();
        ids.sort();
        ids
    }

    /// Whether any path of resolved edges leads from `from` to `to`.
    pub fn has_path(&self, from: &str, to: &str) -> bool {
        let mut visited = HashSet::new();
        self.dfs_has_path(from, to, &mut visited)
    }

    fn dfs_has_path(&self, current: &str, target: &str, visited: &mut HashSet<String>) -> bool {
        if !visited.insert(current.to_string()) {
            return false;
        }
        for edge in self.calls_from(current) {
            let Some(callee_id) = edge.callee_id() else {
                continue;
            };
            if callee_id == target || self.dfs_has_path(&callee_id, target, visited) {
                return true;
            }
        }
        false
    }

    /// First witness path from `from` to `to` in traversal order, or
    /// `None`. The witness is a chain of edges: the first edge leaves
    /// `from`, the last edge lands on `to`, and consecutive edges share
    /// the intermediate method identifier.
    pub fn find_path(&self, from: &str, to: &str) -> Option<Vec<MethodCall>> {
        let mut visited = HashSet::new();
        self.dfs_find_path(from, to, &mut visited)
    }

    fn dfs_find_path(
        &self,
        current: &str,
        target: &str,
        visited: &mut HashSet<String>,
    ) -> Option<Vec<MethodCall>> {
        if !visited.insert(current.to_string()) {
            return None;
        }
        for edge in self.calls_from(current) {
            let Some(callee_id) = edge.callee_id() else {
                continue;
            };
            if callee_id == target {
                return Some(vec![edge.clone()]);
            }
            if let Some(mut rest) = self.dfs_find_path(&callee_id, target, visited) {
                rest.insert(0, edge.clone());
                return Some(rest);
            }
        }
        None
    }

    /// All method identifiers reachable from the given entries, including
    /// the entries themselves.
    ///
    /// Multi-source BFS over resolved edges: O(|V| + |E|) regardless of the
    /// number of entries. Useful for consumers auditing coverage rather
    /// than single targets.
    pub fn reachable_from(&self, entries: impl IntoIterator<Item = String>) -> HashSet<String> {
        let mut visited = HashSet::new();
        let mut queue: VecDeque<String> = VecDeque::new();
        for entry in entries {
            if visited.insert(entry.clone()) {
                queue.push_back(entry);
            }
        }

        while let Some(current) = queue.pop_front() {
            for edge in self.calls_from(&current) {
                if let Some(callee) = edge.callee_id() {
                    if visited.insert(callee.clone()) {
                        queue.push_back(callee);
                    }
                }
            }
        }

        visited
    }

    /// Edges whose callee class could not be resolved, for diagnostics.
    pub fn unresolved_calls(&self) -> Vec<&MethodCall> {
        let mut callers: Vec<&String> = self.outgoing.keys().collect();
        callers.sort();
        callers
            .into_iter()
            .flat_map(|caller| self.outgoing[caller].iter().filter(|e| !e.is_resolved()))
            .collect()
    }

    pub fn edge_count(&self) -> usize {
        self.edge_count
    }

    pub fn stats(&self) -> CallGraphStats {
        let unresolved = self
            .outgoing
            .values()
            .flatten()
            .filter(|e| !e.is_resolved())
            .count();
        let synthetic = self
            .outgoing
            .values()
            .flatten()
            .filter(|e| e.line == 0)
            .count();
        CallGraphStats {
            caller_count: self.outgoing.len(),
            edge_count: self.edge_count,
            unresolved_count: unresolved,
            synthetic_count: synthetic,
        }
    }

    /// Export the graph to JSON for tooling.
    pub fn to_json(&self) -> serde_json::Value {
        let mut callers: Vec<&String> = self.outgoing.keys().collect();
        callers.sort();

        let edges: Vec<serde_json::Value> = callers
            .iter()
            .flat_map(|caller| self.outgoing[*caller].iter())
            .map(|e| {
                serde_json::json!({
                    "from": e.caller_id(),
                    "to": e.callee_id(),
                    "method": e.callee_method,
                    "line": e.line,
                    "static": e.is_static,
                    "receiver": e.receiver,
                })
            })
            .collect();

        let stats = self.stats();
        serde_json::json!({
            "edges": edges,
            "stats": {
                "callers": stats.caller_count,
                "edges": stats.edge_count,
                "unresolved": stats.unresolved_count,
                "synthetic": stats.synthetic_count,
            }
        })
    }

    /// Export the graph to DOT format for Graphviz.
    pub fn to_dot(&self) -> String {
        let mut dot = String::from("digraph CallGraph {\n");
        dot.push_str("    rankdir=LR;\n");
        dot.push_str("    node [shape=box, fontname=\"monospace\"];\n\n");

        let mut ids = self.method_ids();
        ids.sort();
        for id in &ids {
            dot.push_str(&format!(
                "    {} [label=\"{}\"];\n",
                dot_escape(id),
                id.replace('\\', "\\\\")
            ));
        }

        dot.push('\n');

        let mut callers: Vec<&String> = self.outgoing.keys().collect();
        callers.sort();
        for caller in callers {
            for edge in &self.outgoing[caller] {
                let Some(callee_id) = edge.callee_id() else {
                    continue;
                };
                let style = if edge.line == 0 { " [style=dashed]" } else { "" };
                dot.push_str(&format!(
                    "    {} -> {}{};\n",
                    dot_escape(&edge.caller_id()),
                    dot_escape(&callee_id),
                    style
                ));
            }
        }

        dot.push_str("}\n");
        dot
    }
}

fn dot_escape(id: &str) -> String {
    id.chars()
        .map(|c| if c.is_alphanumeric() { c } else { '_' })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn edge(caller: &str, callee: &str, line: usize) -> MethodCall {
        let (cc, cm) = caller.split_once("::").unwrap();
        let (ec, em) = callee.split_once("::").unwrap();
        MethodCall {
            caller_class: cc.to_string(),
            caller_method: cm.to_string(),
            callee_class: Some(ec.to_string()),
            callee_method: em.to_string(),
            line,
            is_static: false,
            receiver: None,
        }
    }

    fn unresolved_edge(caller: &str, method: &str, line: usize) -> MethodCall {
        let (cc, cm) = caller.split_once("::").unwrap();
        MethodCall {
            caller_class: cc.to_string(),
            caller_method: cm.to_string(),
            callee_class: None,
            callee_method: method.to_string(),
            line,
            is_static: false,
            receiver: Some("$unknown".to_string()),
        }
    }

    #[test]
    fn test_direct_path() {
        let mut g = CallGraph::new();
        g.add(edge("A::run", "B::auth", 3));

        assert!(g.has_path("A::run", "B::auth"));
        let path = g.find_path("A::run", "B::auth").unwrap();
        assert_eq!(path.len(), 1);
        assert_eq!(path[0].caller_id(), "A::run");
        assert_eq!(path[0].callee_id().as_deref(), Some("B::auth"));
    }

    #[test]
    fn test_two_hop_witness() {
        let mut g = CallGraph::new();
        g.add(edge("A::run", "H::with", 3));
        g.add(edge("H::with", "B::auth", 9));

        let path = g.find_path("A::run", "B::auth").unwrap();
        assert_eq!(path.len(), 2);
        assert_eq!(path[0].caller_id(), "A::run");
        assert_eq!(path[1].callee_id().as_deref(), Some("B::auth"));
        // consecutive edges share the intermediate identifier
        assert_eq!(path[0].callee_id().unwrap(), path[1].caller_id());
    }

    #[test]
    fn test_no_path() {
        let mut g = CallGraph::new();
        g.add(edge("A::run", "H::with", 3));
        assert!(!g.has_path("A::run", "B::auth"));
        assert!(g.find_path("A::run", "B::auth").is_none());
    }

    #[test]
    fn test_cycle_terminates() {
        let mut g = CallGraph::new();
        g.add(edge("A::a", "B::b", 1));
        g.add(edge("B::b", "A::a", 2));
        g.add(edge("B::b", "C::c", 3));

        assert!(g.has_path("A::a", "C::c"));
        assert!(!g.has_path("A::a", "D::d"));
        let path = g.find_path("A::a", "C::c").unwrap();
        assert_eq!(path.len(), 2);
    }

    #[test]
    fn test_self_recursion_terminates() {
        let mut g = CallGraph::new();
        g.add(edge("A::a", "A::a", 1));
        assert!(!g.has_path("A::a", "B::b"));
    }

    #[test]
    fn test_first_path_wins_by_insertion_order() {
        let mut g = CallGraph::new();
        g.add(edge("E::go", "First::hit", 1));
        g.add(edge("E::go", "Second::hit", 2));
        g.add(edge("First::hit", "T::target", 3));
        g.add(edge("Second::hit", "T::target", 4));

        let path = g.find_path("E::go", "T::target").unwrap();
        assert_eq!(path[0].callee_id().as_deref(), Some("First::hit"));
    }

    #[test]
    fn test_unresolved_edges_not_traversed() {
        let mut g = CallGraph::new();
        g.add(unresolved_edge("A::run", "auth", 4));
        assert!(!g.has_path("A::run", "B::auth"));
        assert_eq!(g.unresolved_calls().len(), 1);
        assert_eq!(g.stats().unresolved_count, 1);
    }

    #[test]
    fn test_add_unique_dedupes() {
        let mut g = CallGraph::new();
        let synth = MethodCall {
            caller_class: "I".to_string(),
            caller_method: "m".to_string(),
            callee_class: Some("X".to_string()),
            callee_method: "m".to_string(),
            line: 0,
            is_static: false,
            receiver: None,
        };
        g.add_unique(synth.clone());
        g.add_unique(synth);
        assert_eq!(g.edge_count(), 1);
    }

    #[test]
    fn test_parallel_edges_kept() {
        let mut g = CallGraph::new();
        g.add(edge("A::run", "B::auth", 3));
        g.add(edge("A::run", "B::auth", 7));
        assert_eq!(g.edge_count(), 2);
        assert_eq!(g.calls_from("A::run").len(), 2);
        assert_eq!(g.calls_to("B::auth").len(), 2);
    }

    #[test]
    fn test_stats_and_synthetic_count() {
        let mut g = CallGraph::new();
        g.add(edge("A::a", "B::b", 5));
        g.add(edge("I::m", "X::m", 0));
        let stats = g.stats();
        assert_eq!(stats.edge_count, 2);
        assert_eq!(stats.synthetic_count, 1);
    }

    #[test]
    fn test_to_dot_contains_edges() {
        let mut g = CallGraph::new();
        g.add(edge("App\\A::run", "App\\B::auth", 3));
        let dot = g.to_dot();
        assert!(dot.contains("digraph CallGraph"));
        assert!(dot.contains("->"));
    }

    #[test]
    fn test_to_json_shape() {
        let mut g = CallGraph::new();
        g.add(edge("A::a", "B::b", 1));
        let json = g.to_json();
        assert!(json["edges"].is_array());
        assert_eq!(json["stats"]["edges"].as_u64(), Some(1));
    }

    #[test]
    fn test_reachable_from_single_source() {
        let mut g = CallGraph::new();
        g.add(edge("A::a", "B::b", 1));
        g.add(edge("B::b", "C::c", 2));
        g.add(edge("D::d", "E::e", 3));

        let reachable = g.reachable_from(["A::a".to_string()]);
        assert!(reachable.contains("A::a"));
        assert!(reachable.contains("B::b"));
        assert!(reachable.contains("C::c"));
        assert!(!reachable.contains("D::d"));
        assert!(!reachable.contains("E::e"));
    }

    #[test]
    fn test_reachable_from_multi_source() {
        let mut g = CallGraph::new();
        g.add(edge("A::a", "B::b", 1));
        g.add(edge("D::d", "E::e", 2));

        let reachable = g.reachable_from(["A::a".to_string(), "D::d".to_string()]);
        assert_eq!(reachable.len(), 4);
    }

    #[test]
    fn test_reachable_from_tolerates_cycles_and_unresolved() {
        let mut g = CallGraph::new();
        g.add(edge("A::a", "B::b", 1));
        g.add(edge("B::b", "A::a", 2));
        g.add(unresolved_edge("B::b", "mystery", 3));

        let reachable = g.reachable_from(["A::a".to_string()]);
        assert_eq!(reachable.len(), 2);
    }

    #[test]
    fn test_display_formats() {
        let e = edge("A::run", "B::auth", 12);
        assert_eq!(e.to_string(), "A::run -> B::auth (line 12)");
        let s = edge("I::m", "X::m", 0);
        assert_eq!(s.to_string(), "I::m -> X::m");
    }
}
