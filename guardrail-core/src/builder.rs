//! Builder pattern API for running a complete analysis.
//!
//! ```rust,ignore
//! use guardrail_core::prelude::*;
//!
//! let report = Guardrail::new("/path/to/project")
//!     .with_rule_filter(["authorization"])
//!     .analyze()?;
//!
//! if report.has_violations() {
//!     println!("{}", guardrail_core::report::render_plain(&report));
//! }
//! ```

use std::path::PathBuf;

use anyhow::{Context, Result};

use crate::cancel::CancellationToken;
use crate::config::{load_config, load_config_file, GuardrailConfig};
use crate::entry::{EntryPointProvider, PatternEntryPoints};
use crate::evaluator::RuleEvaluator;
use crate::model::ProgramModel;
use crate::parse::parse_units;
use crate::results::{AnalysisReport, RunStats};
use crate::scan::gather_php_files_with_excludes;

/// Builder for configuring a guardrail run.
#[derive(Debug, Clone)]
pub struct Guardrail {
    /// Root path of the project to analyze
    root: PathBuf,

    /// Explicit config file path; defaults to guardrail.toml in the root
    config_path: Option<PathBuf>,

    /// Extra directory names to exclude from scanning
    excluded_dirs: Vec<String>,

    /// Restrict the run to rules with these names (empty = all)
    rule_filter: Vec<String>,

    /// Cooperative cancellation, checked between files and entry points
    cancel: CancellationToken,
}

impl Guardrail {
    /// Create a new analysis builder for the given project root.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            config_path: None,
            excluded_dirs: Vec::new(),
            rule_filter: Vec::new(),
            cancel: CancellationToken::new(),
        }
    }

    /// Use an explicit configuration file instead of the default lookup.
    pub fn with_config_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.config_path = Some(path.into());
        self
    }

    /// Add directories to exclude from scanning.
    pub fn exclude_dirs(mut self, dirs: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.excluded_dirs.extend(dirs.into_iter().map(Into::into));
        self
    }

    /// Evaluate only rules with the given names.
    pub fn with_rule_filter(
        mut self,
        names: impl IntoIterator<Item = impl Into<String>>,
    ) -> Self {
        self.rule_filter.extend(names.into_iter().map(Into::into));
        self
    }

    /// Attach a cancellation token.
    pub fn with_cancellation(mut self, cancel: CancellationToken) -> Self {
        self.cancel = cancel;
        self
    }

    /// Run the analysis and return the report.
    pub fn analyze(&self) -> Result<AnalysisReport> {
        self.analyze_full().map(|(report, _)| report)
    }

    /// Run the analysis, also returning the program model (for graph
    /// exports and further queries).
    pub fn analyze_full(&self) -> Result<(AnalysisReport, ProgramModel)> {
        // 1. Load config
        let config = match &self.config_path {
            Some(path) => load_config_file(path)
                .with_context(|| format!("Failed to load config: {}", path.display()))?,
            None => load_config(&self.root)
                .context("Failed to load guardrail.toml")?
                .unwrap_or_default(),
        };

        // 2. Build and filter rules (fatal on invalid rules)
        let mut rules = config.build_rules().context("Invalid rule configuration")?;
        if !self.rule_filter.is_empty() {
            rules.retain(|rule| self.rule_filter.iter().any(|name| name == &rule.name));
        }

        // 3. Scan source files
        let files = self.gather_files(&config)?;

        // 4. Parse (lenient: unreadable/unparseable files are skipped)
        let units = parse_units(&files);

        // 5. Build the frozen program model
        let model = ProgramModel::build(&units, &self.cancel)
            .context("Failed to build program model")?;

        // 6. Evaluate every rule over its entry points
        let evaluator = RuleEvaluator::new(&model.graph);
        let mut rule_results = Vec::with_capacity(rules.len());
        let mut entry_points_checked = 0usize;
        for rule in &rules {
            let provider = PatternEntryPoints::new(rule.entry_points.clone())
                .with_excludes(rule.exclude_entry_points.clone());
            let entries = provider.entry_points(&model.hierarchy);
            entry_points_checked += entries.len();
            let result = evaluator
                .evaluate(rule, &entries, &self.cancel)
                .with_context(|| format!("Failed evaluating rule '{}'", rule.name))?;
            rule_results.push(result);
        }

        // 7. Assemble the report
        let stats = RunStats {
            files_scanned: files.len(),
            files_parsed: units.len(),
            classes: model.hierarchy.class_count(),
            methods: model.hierarchy.method_count(),
            property_types: model.registry.property_count(),
            graph: model.graph.stats(),
            entry_points_checked,
        };
        let unresolved_calls = model
            .graph
            .unresolved_calls()
            .into_iter()
            .cloned()
            .collect();

        Ok((
            AnalysisReport {
                rules: rule_results,
                stats,
                unresolved_calls,
            },
            model,
        ))
    }

    fn gather_files(&self, config: &GuardrailConfig) -> Result<Vec<PathBuf>> {
        let mut excludes: Vec<&str> = self.excluded_dirs.iter().map(String::as_str).collect();
        if let Some(extra) = &config.excludes {
            excludes.extend(extra.iter().map(String::as_str));
        }

        let scan_roots: Vec<PathBuf> = match &config.paths {
            Some(paths) if !paths.is_empty() => {
                paths.iter().map(|p| self.root.join(p)).collect()
            }
            _ => vec![self.root.clone()],
        };

        let mut files = Vec::new();
        for scan_root in &scan_roots {
            files.extend(
                gather_php_files_with_excludes(scan_root, &excludes).with_context(|| {
                    format!("Failed to gather .php files from {}", scan_root.display())
                })?,
            );
        }
        files.sort();
        files.dedup();
        Ok(files)
    }
}
