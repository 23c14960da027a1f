//! Configuration loading from guardrail.toml.
//!
//! ```toml
//! paths = ["app", "src"]
//! excludes = ["tests"]
//!
//! [[rules]]
//! name = "authorization"
//! message = "admin actions must reach an authorization check"
//! entry_points = ["App\\Admin\\*Controller::*"]
//! required_calls = ["App\\Security\\Gate::authorize"]
//!
//! [[rules.paired_calls]]
//! trigger = "App\\Db\\Conn::beginTransaction"
//! completions = ["App\\Db\\Conn::commit", "App\\Db\\Conn::rollback"]
//! ```

use serde::Deserialize;
use std::{fs, path::Path};

use crate::error::{GuardrailError, GuardrailResult};
use crate::rules::{MethodRef, PairedCallObligation, PathCondition, Rule};

/// Name of the config file looked up in the analyzed root.
pub const CONFIG_FILE: &str = "guardrail.toml";

/// Main configuration structure for guardrail.toml.
#[derive(Debug, Deserialize, Default)]
pub struct GuardrailConfig {
    /// Subdirectories to scan, relative to the analyzed root. Defaults to
    /// the root itself.
    pub paths: Option<Vec<String>>,
    /// Directory names to exclude from scanning, on top of the defaults.
    pub excludes: Option<Vec<String>>,
    /// The rule list. May be empty; the run is then a no-op pass.
    #[serde(default)]
    pub rules: Vec<RuleConfig>,
}

/// One rule as written in TOML, before validation.
#[derive(Debug, Deserialize)]
pub struct RuleConfig {
    pub name: String,
    pub entry_points: Vec<String>,
    #[serde(default)]
    pub exclude_entry_points: Vec<String>,
    #[serde(default)]
    pub required_calls: Vec<String>,
    #[serde(default)]
    pub condition: PathCondition,
    #[serde(default)]
    pub paired_calls: Vec<PairedCallConfig>,
    pub message: Option<String>,
}

/// One paired-call obligation as written in TOML.
#[derive(Debug, Deserialize)]
pub struct PairedCallConfig {
    pub trigger: String,
    pub completions: Vec<String>,
    pub message: Option<String>,
}

/// Loads configuration from guardrail.toml in `root` if it exists.
pub fn load_config(root: &Path) -> GuardrailResult<Option<GuardrailConfig>> {
    let path = root.join(CONFIG_FILE);
    if !path.exists() {
        return Ok(None);
    }
    load_config_file(&path).map(Some)
}

/// Loads configuration from an explicit file path.
pub fn load_config_file(path: &Path) -> GuardrailResult<GuardrailConfig> {
    let content = fs::read_to_string(path).map_err(|e| GuardrailError::io(path, e))?;
    toml::from_str(&content).map_err(|e| GuardrailError::config(path, e.to_string()))
}

impl GuardrailConfig {
    /// Validate every rule and build the typed rule list. Raised here,
    /// before any analysis runs.
    pub fn build_rules(&self) -> GuardrailResult<Vec<Rule>> {
        self.rules.iter().map(build_rule).collect()
    }
}

fn build_rule(config: &RuleConfig) -> GuardrailResult<Rule> {
    let required_calls = config
        .required_calls
        .iter()
        .map(|raw| parse_ref(&config.name, raw))
        .collect::<GuardrailResult<Vec<_>>>()?;

    let paired_calls = config
        .paired_calls
        .iter()
        .map(|paired| {
            let trigger = parse_ref(&config.name, &paired.trigger)?;
            let completions = paired
                .completions
                .iter()
                .map(|raw| parse_ref(&config.name, raw))
                .collect::<GuardrailResult<Vec<_>>>()?;
            PairedCallObligation::new(trigger, completions, paired.message.clone())
        })
        .collect::<GuardrailResult<Vec<_>>>()?;

    let mut rule = Rule::new(
        config.name.clone(),
        config.entry_points.clone(),
        required_calls,
        paired_calls,
        config.message.clone(),
    )?
    .with_excludes(config.exclude_entry_points.clone());
    rule.condition = config.condition;
    Ok(rule)
}

fn parse_ref(rule: &str, raw: &str) -> GuardrailResult<MethodRef> {
    MethodRef::parse(raw).ok_or_else(|| {
        GuardrailError::rule(rule, format!("invalid method reference '{}'", raw))
    })
}
