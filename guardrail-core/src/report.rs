//! Output formatting - plaintext and JSON.
//!
//! Witness paths render edge by edge so a reviewer can follow the chain
//! from the entry point to the target without opening the tool again.

use serde_json::json;

use crate::callgraph::MethodCall;
use crate::results::{AnalysisReport, RuleResult};

/// Renders a report in plain text.
pub fn render_plain(report: &AnalysisReport) -> String {
    let mut out = String::new();

    for rule_result in &report.rules {
        out.push_str(&format!("=== Rule: {} ===\n", rule_result.rule.name));

        if rule_result.results.is_empty() && rule_result.paired_violations.is_empty() {
            out.push_str("No entry points matched.\n\n");
            continue;
        }

        for result in &rule_result.results {
            if result.found {
                out.push_str(&format!(
                    "PASS {} reaches {}\n",
                    result.entry_point, result.required_call
                ));
                if let Some(witness) = &result.witness {
                    render_witness(&mut out, witness);
                }
            } else {
                out.push_str(&format!(
                    "FAIL {} never reaches {}\n",
                    result.entry_point, result.required_call
                ));
                if let Some(message) = &result.message {
                    out.push_str(&format!("     {}\n", message));
                }
            }
        }

        for violation in &rule_result.paired_violations {
            out.push_str(&format!(
                "FAIL {} calls {} without reaching any of: {}\n",
                violation.entry_point,
                violation.trigger,
                violation
                    .completions
                    .iter()
                    .map(ToString::to_string)
                    .collect::<Vec<_>>()
                    .join(", ")
            ));
            if let Some(message) = &violation.message {
                out.push_str(&format!("     {}\n", message));
            }
            render_witness(&mut out, &violation.trigger_witness);
        }

        out.push('\n');
    }

    let total = report.total_violations();
    if total == 0 {
        out.push_str("No violations found.\n");
    } else {
        out.push_str(&format!("VIOLATIONS: {}\n", total));
    }
    out
}

fn render_witness(out: &mut String, witness: &[MethodCall]) {
    for edge in witness {
        out.push_str(&format!("       {}\n", edge));
    }
}

/// Renders run statistics in plain text (for `--stats`).
pub fn render_stats(report: &AnalysisReport) -> String {
    let stats = &report.stats;
    let mut out = String::new();
    out.push_str("=== Run Statistics ===\n");
    out.push_str(&format!("Files scanned:        {}\n", stats.files_scanned));
    out.push_str(&format!("Files parsed:         {}\n", stats.files_parsed));
    out.push_str(&format!("Classes:              {}\n", stats.classes));
    out.push_str(&format!("Methods:              {}\n", stats.methods));
    out.push_str(&format!("Property types:       {}\n", stats.property_types));
    out.push_str(&format!("Call edges:           {}\n", stats.graph.edge_count));
    out.push_str(&format!(
        "  - unresolved:       {}\n",
        stats.graph.unresolved_count
    ));
    out.push_str(&format!(
        "  - interface links:  {}\n",
        stats.graph.synthetic_count
    ));
    out.push_str(&format!(
        "Entry points checked: {}\n",
        stats.entry_points_checked
    ));

    if !report.unresolved_calls.is_empty() {
        out.push_str("\nUNRESOLVED CALLS:\n");
        for call in &report.unresolved_calls {
            let receiver = call.receiver.as_deref().unwrap_or("?");
            out.push_str(&format!(
                "  {}::{} calls {}->{}() at line {} (receiver type unknown)\n",
                call.caller_class, call.caller_method, receiver, call.callee_method, call.line
            ));
        }
    }
    out
}

/// Renders a report as JSON.
pub fn render_json(report: &AnalysisReport) -> serde_json::Value {
    json!({
        "rules": report.rules.iter().map(rule_result_json).collect::<Vec<_>>(),
        "stats": {
            "files_scanned": report.stats.files_scanned,
            "files_parsed": report.stats.files_parsed,
            "classes": report.stats.classes,
            "methods": report.stats.methods,
            "property_types": report.stats.property_types,
            "edges": report.stats.graph.edge_count,
            "unresolved_edges": report.stats.graph.unresolved_count,
            "interface_links": report.stats.graph.synthetic_count,
            "entry_points_checked": report.stats.entry_points_checked,
        },
        "violations": report.total_violations(),
    })
}

fn rule_result_json(rule_result: &RuleResult) -> serde_json::Value {
    json!({
        "rule": rule_result.rule.name,
        "results": rule_result.results.iter().map(|r| {
            json!({
                "entry_point": r.entry_point.id(),
                "file": r.entry_point.file.display().to_string(),
                "required_call": r.required_call.id(),
                "found": r.found,
                "witness": r.witness.as_ref().map(|w| witness_json(w)),
                "message": r.message,
            })
        }).collect::<Vec<_>>(),
        "paired_violations": rule_result.paired_violations.iter().map(|v| {
            json!({
                "entry_point": v.entry_point.id(),
                "trigger": v.trigger.id(),
                "completions": v.completions.iter().map(|c| c.id()).collect::<Vec<_>>(),
                "trigger_witness": witness_json(&v.trigger_witness),
                "message": v.message,
            })
        }).collect::<Vec<_>>(),
    })
}

fn witness_json(witness: &[MethodCall]) -> serde_json::Value {
    json!(witness
        .iter()
        .map(|edge| {
            json!({
                "from": edge.caller_id(),
                "to": edge.callee_id(),
                "line": edge.line,
                "static": edge.is_static,
            })
        })
        .collect::<Vec<_>>())
}
