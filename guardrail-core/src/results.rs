//! Result model: what the evaluator produces.
//!
//! Violations are the *product* of the engine, not errors; nothing here
//! carries failure semantics.

use crate::callgraph::{CallGraphStats, MethodCall};
use crate::entry::EntryPoint;
use crate::rules::{MethodRef, Rule};

/// One entry point checked against one rule's required calls.
#[derive(Debug, Clone)]
pub struct AnalysisResult {
    pub entry_point: EntryPoint,
    /// The target that was found, or the rule's nominal required call on a
    /// violation
    pub required_call: MethodRef,
    pub found: bool,
    /// Witness path when found: ordered edges from entry to target
    pub witness: Option<Vec<MethodCall>>,
    /// The rule's human message, carried on violations
    pub message: Option<String>,
}

/// A reachable trigger whose completions were all unreachable.
#[derive(Debug, Clone)]
pub struct PairedCallViolation {
    pub entry_point: EntryPoint,
    pub trigger: MethodRef,
    pub completions: Vec<MethodRef>,
    /// Witness path from the entry to the trigger, for diagnostics
    pub trigger_witness: Vec<MethodCall>,
    pub message: Option<String>,
}

/// Aggregate outcome of one rule across its entry points.
#[derive(Debug, Clone)]
pub struct RuleResult {
    pub rule: Rule,
    pub results: Vec<AnalysisResult>,
    pub paired_violations: Vec<PairedCallViolation>,
}

impl RuleResult {
    /// Required-call results that did not find any target.
    pub fn violations(&self) -> impl Iterator<Item = &AnalysisResult> {
        self.results.iter().filter(|r| !r.found)
    }

    pub fn has_violations(&self) -> bool {
        self.results.iter().any(|r| !r.found) || !self.paired_violations.is_empty()
    }

    pub fn violation_count(&self) -> usize {
        self.violations().count() + self.paired_violations.len()
    }

    pub fn pass_count(&self) -> usize {
        self.results.iter().filter(|r| r.found).count()
    }
}

/// Counters for one complete run.
#[derive(Debug, Clone, Default)]
pub struct RunStats {
    pub files_scanned: usize,
    pub files_parsed: usize,
    pub classes: usize,
    pub methods: usize,
    pub property_types: usize,
    pub graph: CallGraphStats,
    pub entry_points_checked: usize,
}

/// Everything one `analyze()` call produces.
#[derive(Debug)]
pub struct AnalysisReport {
    pub rules: Vec<RuleResult>,
    pub stats: RunStats,
    /// Unresolved call sites (unknown callee class), for diagnostics
    pub unresolved_calls: Vec<MethodCall>,
}

impl AnalysisReport {
    pub fn has_violations(&self) -> bool {
        self.rules.iter().any(RuleResult::has_violations)
    }

    pub fn total_violations(&self) -> usize {
        self.rules.iter().map(RuleResult::violation_count).sum()
    }
}
