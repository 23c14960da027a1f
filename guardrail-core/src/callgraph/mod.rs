//! Call graph construction: the two analysis passes over parsed units,
//! the interface fan-out pass, and the graph itself.

pub mod analyzer;
pub mod definitions;
pub mod graph;
pub mod linker;

pub use analyzer::{CallAnalyzer, MethodScope};
pub use definitions::DefinitionCollector;
pub use graph::{CallGraph, CallGraphStats, MethodCall};
pub use linker::link_interfaces;
