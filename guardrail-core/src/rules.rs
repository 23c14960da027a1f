//! Rule model: what must be reached from which entry points.
//!
//! Rules are validated at construction. An empty rule (no required calls
//! and no obligations) or an obligation without completions is a
//! configuration error, raised before any analysis runs.

use serde::Deserialize;
use std::fmt;

use crate::error::{GuardrailError, GuardrailResult};

/// A `Class::method` reference as written in configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MethodRef {
    pub class: String,
    pub method: String,
}

impl MethodRef {
    /// Parse `App\Db::commit` (a leading `\` is tolerated and stripped).
    pub fn parse(raw: &str) -> Option<Self> {
        let trimmed = raw.trim().trim_start_matches('\\');
        let (class, method) = trimmed.split_once("::")?;
        if class.is_empty() || method.is_empty() {
            return None;
        }
        Some(Self {
            class: class.to_string(),
            method: method.to_string(),
        })
    }

    /// The graph identifier this reference targets.
    pub fn id(&self) -> String {
        format!("{}::{}", self.class, self.method)
    }
}

impl fmt::Display for MethodRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}::{}", self.class, self.method)
    }
}

/// How required targets combine along paths. Only any-of reachability is
/// defined; the tag is kept on the rule for forward compatibility with
/// config files that spell it out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
pub enum PathCondition {
    #[default]
    #[serde(rename = "reaches-any")]
    ReachesAny,
}

/// A trigger call that obligates one of a set of completion calls.
#[derive(Debug, Clone)]
pub struct PairedCallObligation {
    pub trigger: MethodRef,
    /// Any-of semantics: one reachable completion satisfies the obligation
    pub completions: Vec<MethodRef>,
    pub message: Option<String>,
}

impl PairedCallObligation {
    pub fn new(
        trigger: MethodRef,
        completions: Vec<MethodRef>,
        message: Option<String>,
    ) -> GuardrailResult<Self> {
        if completions.is_empty() {
            return Err(GuardrailError::rule(
                trigger.to_string(),
                "paired-call obligation has no completion calls",
            ));
        }
        Ok(Self {
            trigger,
            completions,
            message,
        })
    }
}

/// One verification rule: entry-point selection plus targets.
#[derive(Debug, Clone)]
pub struct Rule {
    pub name: String,
    /// Wildcard patterns (`App\Ctrl\*::handle*`) selecting entry points
    pub entry_points: Vec<String>,
    /// Entry-point patterns to exclude from selection
    pub exclude_entry_points: Vec<String>,
    /// Required targets, any-of in declared order
    pub required_calls: Vec<MethodRef>,
    pub condition: PathCondition,
    pub paired_calls: Vec<PairedCallObligation>,
    pub message: Option<String>,
}

impl Rule {
    /// Validate and build a rule. A rule with an empty required-call list
    /// is legal provided it carries at least one obligation.
    pub fn new(
        name: impl Into<String>,
        entry_points: Vec<String>,
        required_calls: Vec<MethodRef>,
        paired_calls: Vec<PairedCallObligation>,
        message: Option<String>,
    ) -> GuardrailResult<Self> {
        let name = name.into();
        if name.is_empty() {
            return Err(GuardrailError::rule("<unnamed>", "rule has no name"));
        }
        if entry_points.is_empty() {
            return Err(GuardrailError::rule(&name, "rule selects no entry points"));
        }
        if required_calls.is_empty() && paired_calls.is_empty() {
            return Err(GuardrailError::rule(
                &name,
                "rule has neither required calls nor paired-call obligations",
            ));
        }
        Ok(Self {
            name,
            entry_points,
            exclude_entry_points: Vec::new(),
            required_calls,
            condition: PathCondition::ReachesAny,
            paired_calls,
            message,
        })
    }

    pub fn with_excludes(mut self, excludes: Vec<String>) -> Self {
        self.exclude_entry_points = excludes;
        self
    }

    /// The nominal required call reported on violations.
    pub fn nominal_required_call(&self) -> Option<&MethodRef> {
        self.required_calls.first()
    }
}
