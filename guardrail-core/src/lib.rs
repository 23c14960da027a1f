//! guardrail-core: call-graph reachability analysis for PHP codebases.
//!
//! Verifies that every designated *entry point* method transitively
//! reaches at least one of a set of required target methods, and that
//! paired obligations hold: when a *trigger* call (say
//! `beginTransaction`) is reachable, at least one *completion* call
//! (`commit` or `rollback`) must be reachable too. Each check produces a
//! witness path through the call graph or a violation.
//!
//! # Pipeline
//!
//! 1. **Scan** - deterministic `.php` discovery ([`scan`])
//! 2. **Parse** - lenient tree-sitter frontend; broken files are skipped
//!    ([`parse`])
//! 3. **Pass 1** - collect hierarchies, method definitions, return types,
//!    and property types ([`callgraph::definitions`])
//! 4. **Pass 2** - infer receiver types and emit call edges
//!    ([`callgraph::analyzer`])
//! 5. **Pass 3** - fan interface methods out to implementors
//!    ([`callgraph::linker`])
//! 6. **Evaluate** - reachability per rule × entry point ([`evaluator`])
//!
//! Receiver typing works from syntactic evidence only: constructor-promoted
//! and typed properties, typed parameters, local assignments, declared
//! return types for chained calls, static and late-bound static calls,
//! invocable objects, and null-safe chains. There is no runtime, no
//! reflection, and no value-sensitive reasoning; the engine is sound for
//! *unreachability* up to those documented gaps.
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use guardrail_core::prelude::*;
//!
//! let report = Guardrail::new("/path/to/project").analyze()?;
//! for rule in &report.rules {
//!     for violation in rule.violations() {
//!         println!("{} never reaches {}", violation.entry_point, violation.required_call);
//!     }
//! }
//! ```
//!
//! Every run is fresh: the three tables (hierarchy, registry, call graph)
//! are built once, frozen before evaluation, and discarded at the end.

pub mod ast;
pub mod builder;
pub mod callgraph;
pub mod cancel;
pub mod config;
pub mod entry;
pub mod error;
pub mod evaluator;
pub mod hierarchy;
pub mod logging;
pub mod model;
pub mod names;
pub mod parse;
pub mod prelude;
pub mod registry;
pub mod report;
pub mod results;
pub mod rules;
pub mod scan;

// ============================================================================
// Explicit Re-exports (avoiding glob imports for clear API surface)
// ============================================================================

// Error types
pub use error::{GuardrailError, GuardrailResult, IoResultExt};

// Builder API
pub use builder::Guardrail;

// Cancellation
pub use cancel::CancellationToken;

// Configuration
pub use config::{load_config, load_config_file, GuardrailConfig, PairedCallConfig, RuleConfig};

// Program model
pub use callgraph::{
    link_interfaces, CallAnalyzer, CallGraph, CallGraphStats, DefinitionCollector, MethodCall,
    MethodScope,
};
pub use hierarchy::ClassHierarchy;
pub use model::ProgramModel;
pub use registry::TypeRegistry;

// Entry points and rules
pub use entry::{wildcard_match, EntryPoint, EntryPointProvider, PatternEntryPoints};
pub use rules::{MethodRef, PairedCallObligation, PathCondition, Rule};

// Evaluation and results
pub use evaluator::RuleEvaluator;
pub use results::{AnalysisReport, AnalysisResult, PairedCallViolation, RuleResult, RunStats};

// Logging
pub use logging::{init_structured_logging, log_error, log_info, log_warn};

// Parsing and scanning
pub use parse::{parse_file, parse_source, parse_units, parse_units_strict, ParseOutcome, SourceUnit};
pub use scan::{gather_php_files, gather_php_files_with_excludes};

// Reporting
pub use report::{render_json, render_plain, render_stats};

#[cfg(test)]
mod tests;
