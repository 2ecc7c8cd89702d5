//! Task loading
//!
//! Maps a dotted task identity back to its directory (the inverse of the
//! resolver) and produces a strongly-typed handle to the entry script. The
//! script is only handed out after two checks: a static scan for a conforming
//! `execute()` definition, and a dry source in the configured shell to catch
//! syntax errors and failing top-level code.

use crate::error::{LoadError, LoadResult};
use crate::runner::identity::is_valid_segment;
use crate::runner::Context;
use regex::Regex;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use std::sync::OnceLock;

/// Handle to a loadable task entry script
#[derive(Debug, Clone)]
pub struct TaskModule {
    /// Dotted task identity this handle was loaded from
    pub dotted_name: String,

    /// Task directory holding the artifact pair
    pub dir: PathBuf,

    /// Path of the validated entry script
    pub entry_path: PathBuf,
}

fn execute_fn_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        // POSIX `execute() {` or the bash-ism `function execute {`
        Regex::new(r"(?m)^\s*(execute\s*\(\s*\)|function\s+execute\b)").unwrap()
    })
}

/// Load a task by its dotted identity
pub fn load(dotted_name: &str, ctx: &Context) -> LoadResult<TaskModule> {
    let segments: Vec<&str> = dotted_name.split('.').collect();
    // Identifier-safe tokens only; anything else could escape the tasks root
    if segments.is_empty() || segments.iter().any(|s| !is_valid_segment(s)) {
        return Err(LoadError::InvalidName(dotted_name.to_string()));
    }

    let mut dir = ctx.config.tasks_root.clone();
    for segment in &segments {
        dir.push(segment);
    }
    let entry_path = dir.join(&ctx.config.entry_file);

    if !entry_path.is_file() {
        return Err(LoadError::NotFound {
            name: dotted_name.to_string(),
            path: entry_path,
        });
    }

    let source = fs::read_to_string(&entry_path).map_err(|e| LoadError::SyntaxOrRuntime {
        name: dotted_name.to_string(),
        detail: format!("failed to read entry script: {}", e),
    })?;

    if !execute_fn_pattern().is_match(&source) {
        return Err(LoadError::Malformed {
            name: dotted_name.to_string(),
            reason: format!("no execute() function in {}", ctx.config.entry_file),
        });
    }

    dry_source(dotted_name, &entry_path, ctx)?;

    ctx.detail(&format!("Entry: {}", entry_path.display()));
    Ok(TaskModule {
        dotted_name: dotted_name.to_string(),
        dir,
        entry_path,
    })
}

/// Source the script without calling `execute`, surfacing syntax errors and
/// failing top-level code as `SyntaxOrRuntime`
fn dry_source(dotted_name: &str, entry_path: &Path, ctx: &Context) -> LoadResult<()> {
    let shell = &ctx.config.interpreter;
    let program = shell.first().map(String::as_str).unwrap_or("sh");
    let output = Command::new(program)
        .args(shell.iter().skip(1))
        .arg("-c")
        .arg(r#". "$1""#)
        .arg(program)
        .arg(entry_path)
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::piped())
        .output()
        .map_err(|e| LoadError::SyntaxOrRuntime {
            name: dotted_name.to_string(),
            detail: format!("failed to start {}: {}", program, e),
        })?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(LoadError::SyntaxOrRuntime {
            name: dotted_name.to_string(),
            detail: stderr.trim().to_string(),
        });
    }

    Ok(())
}
