//! guardrail CLI - call-graph reachability checks for PHP projects.
//!
//! Features:
//! - `check`: verify that configured entry points reach required calls
//! - Plain-text and JSON reports with witness paths
//! - Graphviz DOT export of the call graph
//! - CI-friendly exit codes: 0 clean, 1 violations, 2 fatal error

use anyhow::{anyhow, Context, Result};
use clap::{Parser, Subcommand};
use std::fs;
use std::path::{Path, PathBuf};

use guardrail_core::{
    init_structured_logging, render_json, render_plain, render_stats, Guardrail,
};

#[derive(Parser, Debug)]
#[command(author, version, about = "Verify PHP entry points reach required calls")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Analyze a project against its guardrail rules
    Check(CheckArgs),
}

#[derive(Parser, Debug)]
struct CheckArgs {
    /// Path to the root of the PHP project
    #[arg(default_value = ".")]
    path: String,

    /// Configuration file (default: guardrail.toml in the project root)
    #[arg(long)]
    config: Option<String>,

    /// Evaluate only rules with these names (repeatable)
    #[arg(long = "rule")]
    rules: Vec<String>,

    /// Output results in JSON format
    #[arg(long)]
    json: bool,

    /// Print run statistics and unresolved-call diagnostics
    #[arg(long)]
    stats: bool,

    /// Print the call graph in Graphviz DOT format instead of checking
    #[arg(long)]
    dot: bool,

    /// Write DOT output to a file instead of stdout
    #[arg(long)]
    dot_file: Option<String>,

    /// Directory names to exclude from scanning (repeatable)
    #[arg(long = "exclude")]
    excludes: Vec<String>,
}

/// Validates output file paths to prevent path traversal.
///
/// Rejects absolute paths, `..` components, and null bytes.
fn validate_output_path(path: &str) -> Result<PathBuf> {
    if path.contains('\0') {
        return Err(anyhow!("Output path contains null bytes"));
    }

    let p = PathBuf::from(path);
    if p.is_absolute() {
        return Err(anyhow!(
            "Output path must be relative, not absolute: {}",
            path
        ));
    }
    for component in p.components() {
        if matches!(component, std::path::Component::ParentDir) {
            return Err(anyhow!(
                "Path traversal (..) not allowed in output paths: {}",
                path
            ));
        }
    }
    Ok(p)
}

fn run_check(args: &CheckArgs) -> Result<i32> {
    let root = Path::new(&args.path)
        .canonicalize()
        .with_context(|| format!("Failed to canonicalize path: {}", args.path))?;

    let mut builder = Guardrail::new(&root);
    if let Some(config) = &args.config {
        builder = builder.with_config_path(config);
    }
    if !args.rules.is_empty() {
        builder = builder.with_rule_filter(args.rules.iter().cloned());
    }
    if !args.excludes.is_empty() {
        builder = builder.exclude_dirs(args.excludes.iter().cloned());
    }

    let (report, model) = builder.analyze_full()?;

    // Graph export mode: print the graph and stop.
    if args.dot || args.dot_file.is_some() {
        let dot = model.graph.to_dot();
        if let Some(file) = &args.dot_file {
            let safe_path = validate_output_path(file)
                .with_context(|| format!("Invalid output path: {}", file))?;
            fs::write(&safe_path, &dot)
                .with_context(|| format!("Failed to write DOT to {}", safe_path.display()))?;
            eprintln!("[guardrail] Call graph exported to {}", safe_path.display());
        } else {
            println!("{}", dot);
        }
        return Ok(0);
    }

    if args.json {
        println!("{}", serde_json::to_string_pretty(&render_json(&report))?);
    } else {
        print!("{}", render_plain(&report));
    }

    if args.stats {
        eprint!("{}", render_stats(&report));
    }

    Ok(if report.has_violations() { 1 } else { 0 })
}

fn main() {
    // Global panic guard: broken input must never take the process down
    // without a diagnosable message.
    std::panic::set_hook(Box::new(|info| {
        eprintln!("[PANIC] guardrail internal error: {}", info);
        eprintln!("[PANIC] The process will exit with code 2.");
    }));

    // Structured JSON logging to stderr, respects RUST_LOG
    init_structured_logging();

    let cli = Cli::parse();
    let outcome = match &cli.command {
        Command::Check(args) => run_check(args),
    };

    match outcome {
        Ok(code) => std::process::exit(code),
        Err(err) => {
            eprintln!("[ERROR] {:#}", err);
            std::process::exit(2);
        }
    }
}
