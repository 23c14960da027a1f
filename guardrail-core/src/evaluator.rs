//! Rule evaluation: reachability queries per rule × entry point.
//!
//! Required calls use any-of semantics in declared order; the first target
//! with a path wins and carries its witness. Paired obligations are
//! vacuously satisfied when the trigger is unreachable; otherwise any
//! reachable completion satisfies, and a violation carries the trigger's
//! witness for diagnostics.

use crate::callgraph::CallGraph;
use crate::cancel::CancellationToken;
use crate::entry::EntryPoint;
use crate::error::GuardrailResult;
use crate::results::{AnalysisResult, PairedCallViolation, RuleResult};
use crate::rules::Rule;

/// Evaluates rules against a frozen call graph.
pub struct RuleEvaluator<'a> {
    graph: &'a CallGraph,
}

impl<'a> RuleEvaluator<'a> {
    pub fn new(graph: &'a CallGraph) -> Self {
        Self { graph }
    }

    /// Evaluate one rule over its entry points. The cancellation token is
    /// checked between entry points. Zero entry points yield a degenerate
    /// pass: zero results, zero violations.
    pub fn evaluate(
        &self,
        rule: &Rule,
        entries: &[EntryPoint],
        cancel: &CancellationToken,
    ) -> GuardrailResult<RuleResult> {
        let mut results = Vec::new();
        let mut paired_violations = Vec::new();

        for entry in entries {
            cancel.check()?;
            let entry_id = entry.id();

            if let Some(result) = self.check_required(rule, entry, &entry_id) {
                results.push(result);
            }
            self.check_obligations(rule, entry, &entry_id, &mut paired_violations);
        }

        Ok(RuleResult {
            rule: rule.clone(),
            results,
            paired_violations,
        })
    }

    /// First required target with a path wins; none hits means a
    /// violation carrying the rule's message and nominal required call.
    /// Rules without required calls produce no per-entry result.
    fn check_required(
        &self,
        rule: &Rule,
        entry: &EntryPoint,
        entry_id: &str,
    ) -> Option<AnalysisResult> {
        let nominal = rule.nominal_required_call()?;

        for target in &rule.required_calls {
            if let Some(witness) = self.graph.find_path(entry_id, &target.id()) {
                return Some(AnalysisResult {
                    entry_point: entry.clone(),
                    required_call: target.clone(),
                    found: true,
                    witness: Some(witness),
                    message: None,
                });
            }
        }

        Some(AnalysisResult {
            entry_point: entry.clone(),
            required_call: nominal.clone(),
            found: false,
            witness: None,
            message: rule.message.clone(),
        })
    }

    fn check_obligations(
        &self,
        rule: &Rule,
        entry: &EntryPoint,
        entry_id: &str,
        violations: &mut Vec<PairedCallViolation>,
    ) {
        for obligation in &rule.paired_calls {
            // Unreachable trigger: vacuously satisfied.
            let Some(trigger_witness) = self.graph.find_path(entry_id, &obligation.trigger.id())
            else {
                continue;
            };

            let completed = obligation
                .completions
                .iter()
                .any(|completion| self.graph.has_path(entry_id, &completion.id()));
            if completed {
                continue;
            }

            violations.push(PairedCallViolation {
                entry_point: entry.clone(),
                trigger: obligation.trigger.clone(),
                completions: obligation.completions.clone(),
                trigger_witness,
                message: obligation.message.clone(),
            });
        }
    }
}
