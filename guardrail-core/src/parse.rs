//! Parser frontend - mission critical.
//!
//! Wraps tree-sitter's PHP grammar behind a lenient batch API. A file
//! either contributes a fully parsed unit to every pass or is skipped
//! entirely; there is no partial state. Skips are logged at debug level
//! because real projects carry generated and vendor code that may not
//! parse.

use rayon::prelude::*;
use std::{
    fs,
    path::{Path, PathBuf},
};
use tracing::debug;
use tree_sitter::{Node, Parser, Tree};

use crate::error::{GuardrailError, GuardrailResult};

/// Maximum file size to parse (10 MB).
/// Files larger than this are skipped to prevent memory issues.
const MAX_FILE_SIZE: usize = 10_000_000;

/// A successfully parsed source file, the unit of work for all passes.
pub struct SourceUnit {
    /// Absolute path of the file
    pub path: PathBuf,
    /// Raw UTF-8 source
    pub source: String,
    /// Parsed syntax tree; retained so both passes walk the same AST
    pub tree: Tree,
}

impl SourceUnit {
    /// Root node of the unit's syntax tree.
    pub fn root(&self) -> Node<'_> {
        self.tree.root_node()
    }
}

impl std::fmt::Debug for SourceUnit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SourceUnit")
            .field("path", &self.path)
            .field("bytes", &self.source.len())
            .finish()
    }
}

/// Result of parsing a single file - used for granular control.
pub enum ParseOutcome {
    /// Successfully parsed unit
    Ok(SourceUnit),
    /// Parse failed (logged, can be skipped)
    Skipped(PathBuf, String),
}

fn php_parser() -> GuardrailResult<Parser> {
    let mut parser = Parser::new();
    parser
        .set_language(&tree_sitter_php::language_php())
        .map_err(|e| GuardrailError::internal(format!("PHP grammar rejected: {}", e)))?;
    Ok(parser)
}

/// Parses a single PHP file. This is the atomic unit of work for parallel
/// processing. Returns a `ParseOutcome` so the caller decides the error
/// handling strategy.
pub fn parse_file(path: &Path) -> ParseOutcome {
    let source = match fs::read_to_string(path) {
        Ok(s) => s,
        Err(e) => {
            return ParseOutcome::Skipped(path.to_path_buf(), format!("I/O error: {}", e));
        }
    };

    if source.len() > MAX_FILE_SIZE {
        return ParseOutcome::Skipped(
            path.to_path_buf(),
            format!(
                "File too large ({} bytes, max {})",
                source.len(),
                MAX_FILE_SIZE
            ),
        );
    }

    parse_source(path, source)
}

/// Parses in-memory source, attributed to `path`.
pub fn parse_source(path: &Path, source: String) -> ParseOutcome {
    let mut parser = match php_parser() {
        Ok(p) => p,
        Err(e) => return ParseOutcome::Skipped(path.to_path_buf(), e.to_string()),
    };

    let tree = match parser.parse(&source, None) {
        Some(t) => t,
        None => {
            return ParseOutcome::Skipped(path.to_path_buf(), "parser produced no tree".into());
        }
    };

    if tree.root_node().has_error() {
        return ParseOutcome::Skipped(path.to_path_buf(), "syntax error".into());
    }

    if tree.root_node().named_child_count() == 0 {
        return ParseOutcome::Skipped(path.to_path_buf(), "empty AST".into());
    }

    ParseOutcome::Ok(SourceUnit {
        path: path.to_path_buf(),
        source,
        tree,
    })
}

/// Parses all files in parallel, skipping malformed ones (lenient mode).
///
/// The input order is preserved in the output: callers pass the sorted
/// list from [`crate::scan::gather_php_files`], so downstream passes see
/// units in a reproducible order regardless of thread scheduling.
pub fn parse_units(files: &[PathBuf]) -> Vec<SourceUnit> {
    files
        .par_iter()
        .map(|file| parse_file(file))
        .collect::<Vec<_>>()
        .into_iter()
        .filter_map(|outcome| match outcome {
            ParseOutcome::Ok(unit) => Some(unit),
            ParseOutcome::Skipped(path, reason) => {
                debug!(file = %path.display(), %reason, "skipping file");
                None
            }
        })
        .collect()
}

/// Parses all files with strict error handling (fail-fast mode).
pub fn parse_units_strict(files: &[PathBuf]) -> GuardrailResult<Vec<SourceUnit>> {
    files
        .iter()
        .map(|file| match parse_file(file) {
            ParseOutcome::Ok(unit) => Ok(unit),
            ParseOutcome::Skipped(path, reason) => Err(GuardrailError::parse(path, reason)),
        })
        .collect()
}
