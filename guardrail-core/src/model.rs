//! The program model: frozen output of the three construction passes.
//!
//! Pass 1 populates the hierarchy and registry from every unit, Pass 2
//! emits call edges using those tables, Pass 3 fans interface methods out
//! to implementors. The passes never interleave: receiver resolution at a
//! call site may depend on declarations later in file order, so Pass 1
//! runs to completion first.

use crate::callgraph::{link_interfaces, CallAnalyzer, CallGraph, DefinitionCollector};
use crate::cancel::CancellationToken;
use crate::error::GuardrailResult;
use crate::hierarchy::ClassHierarchy;
use crate::parse::SourceUnit;
use crate::registry::TypeRegistry;

/// Immutable analysis tables, built once per run and discarded at the end.
#[derive(Debug)]
pub struct ProgramModel {
    pub hierarchy: ClassHierarchy,
    pub registry: TypeRegistry,
    pub graph: CallGraph,
}

impl ProgramModel {
    /// Run all three passes over the given units, in order. The
    /// cancellation token is checked between files.
    pub fn build(units: &[SourceUnit], cancel: &CancellationToken) -> GuardrailResult<Self> {
        let mut hierarchy = ClassHierarchy::new();
        let mut registry = TypeRegistry::new();

        let mut collector = DefinitionCollector::new(&mut hierarchy, &mut registry);
        for unit in units {
            cancel.check()?;
            collector.collect(unit);
        }
        drop(collector);

        let mut graph = CallGraph::new();
        let mut analyzer = CallAnalyzer::new(&hierarchy, &registry, &mut graph);
        for unit in units {
            cancel.check()?;
            analyzer.analyze(unit);
        }
        drop(analyzer);

        cancel.check()?;
        link_interfaces(&hierarchy, &mut graph);

        Ok(Self {
            hierarchy,
            registry,
            graph,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse::{parse_source, ParseOutcome};
    use std::path::Path;

    fn units(sources: &[&str]) -> Vec<SourceUnit> {
        sources
            .iter()
            .enumerate()
            .map(|(i, code)| {
                let path = format!("model_test_{}.php", i);
                match parse_source(Path::new(&path), code.to_string()) {
                    ParseOutcome::Ok(u) => u,
                    ParseOutcome::Skipped(_, reason) => {
                        panic!("fixture failed to parse: {}", reason)
                    }
                }
            })
            .collect()
    }

    #[test]
    fn test_build_wires_all_passes() {
        let units = units(&[
            "<?php namespace App;\n\
             interface UC { public function execute(): void; }\n\
             class UCImpl implements UC {\n\
                 public function __construct(private B $b) {}\n\
                 public function execute(): void { $this->b->auth(); }\n\
             }",
            "<?php namespace App;\n\
             class B { public function auth(): void {} }\n\
             class Ctrl {\n\
                 public function __construct(private UC $uc) {}\n\
                 public function run(): void { $this->uc->execute(); }\n\
             }",
        ]);

        let model = ProgramModel::build(&units, &CancellationToken::new()).unwrap();
        // reachability crosses the synthetic interface edge
        assert!(model.graph.has_path("App\\Ctrl::run", "App\\B::auth"));
        let path = model
            .graph
            .find_path("App\\Ctrl::run", "App\\B::auth")
            .unwrap();
        assert!(path.iter().any(|e| e.line == 0));
    }

    #[test]
    fn test_forward_references_across_file_order() {
        // the callee's class is declared in a later unit than the call site
        let units = units(&[
            "<?php namespace App;\n\
             class A {\n\
                 public function __construct(private Late $late) {}\n\
                 public function run(): void { $this->late->fire(); }\n\
             }",
            "<?php namespace App;\n\
             class Late { public function fire(): void {} }",
        ]);

        let model = ProgramModel::build(&units, &CancellationToken::new()).unwrap();
        assert!(model.graph.has_path("App\\A::run", "App\\Late::fire"));
    }

    #[test]
    fn test_cancelled_build_aborts() {
        let units = units(&["<?php class A { public function x(): void {} }"]);
        let cancel = CancellationToken::new();
        cancel.cancel();
        assert!(ProgramModel::build(&units, &cancel).is_err());
    }

    #[test]
    fn test_empty_input_builds_empty_model() {
        let model = ProgramModel::build(&[], &CancellationToken::new()).unwrap();
        assert_eq!(model.graph.edge_count(), 0);
        assert_eq!(model.hierarchy.class_count(), 0);
        assert_eq!(model.registry.property_count(), 0);
    }
}
