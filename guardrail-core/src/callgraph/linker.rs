//! Pass 3: interface fan-out.
//!
//! Call sites through interface-typed receivers emit edges to `I::m`.
//! This pass links each such interface method to every statically known
//! implementor, letting reachability "dispatch" into implementations. The
//! over-approximation is deliberate: the tool hunts unreached obligations,
//! so reachability errs toward found.

use crate::callgraph::graph::{CallGraph, MethodCall};
use crate::hierarchy::ClassHierarchy;

/// Synthesize `I::m -> X::m` edges (line 0) for every interface method in
/// the graph and every implementing class that defines `m`.
///
/// Idempotent: identical synthetic edges are deduplicated, so a repeated
/// pass leaves the graph unchanged.
pub fn link_interfaces(hierarchy: &ClassHierarchy, graph: &mut CallGraph) {
    for method_id in graph.method_ids() {
        let Some((class, method)) = method_id.split_once("::") else {
            continue;
        };
        if !hierarchy.is_interface(class) {
            continue;
        }

        let implementors: Vec<String> = hierarchy
            .find_classes_implementing(class)
            .into_iter()
            .filter(|implementor| hierarchy.defines(implementor, method))
            .map(String::from)
            .collect();

        for implementor in implementors {
            graph.add_unique(MethodCall {
                caller_class: class.to_string(),
                caller_method: method.to_string(),
                callee_class: Some(implementor),
                callee_method: method.to_string(),
                line: 0,
                is_static: false,
                receiver: None,
            });
        }
    }
}
