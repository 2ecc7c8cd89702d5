//! Task execution
//!
//! Runs a loaded task's `execute` entry point in a child shell. The script is
//! sourced and `execute` is called with the cached document on stdin; stdout
//! becomes the task's return value, stderr and the exit code become the
//! failure cause. Running a task never mutates the artifact pair.

use crate::error::{Result, RunError, RunResult};
use crate::runner::load::{load, TaskModule};
use crate::runner::Context;
use std::process::{Command, Stdio};

/// Invoke the entry point of a loaded task
///
/// Reads the cached document co-located with the entry script and returns
/// whatever the entry point writes to stdout.
pub fn run_task(module: &TaskModule, ctx: &Context) -> RunResult<String> {
    let document_path = module.dir.join(&ctx.config.document_file);
    if !document_path.is_file() {
        return Err(RunError::MissingDocument(document_path));
    }

    let shell = &ctx.config.interpreter;
    let program = shell.first().map(String::as_str).unwrap_or("sh");

    ctx.step(&format!("Executing task: {}", module.dotted_name));
    // `execute` reads the cached document straight from the file, so there is
    // no stdin pipe to feed and no deadlock on large documents.
    let output = Command::new(program)
        .args(shell.iter().skip(1))
        .arg("-c")
        .arg(r#". "$1" && execute < "$2""#)
        .arg(program)
        .arg(&module.entry_path)
        .arg(&document_path)
        .current_dir(&module.dir)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .output()
        .map_err(|e| RunError::ExecutionFailed {
            name: module.dotted_name.clone(),
            cause: format!("failed to start {}: {}", program, e),
        })?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        let cause = match output.status.code() {
            Some(code) => format!("exit code {}: {}", code, stderr.trim()),
            None => format!("terminated by signal: {}", stderr.trim()),
        };
        ctx.error(&format!("Task '{}' failed ({})", module.dotted_name, cause));
        return Err(RunError::ExecutionFailed {
            name: module.dotted_name.clone(),
            cause,
        });
    }

    let value = String::from_utf8_lossy(&output.stdout).into_owned();
    ctx.step(&format!("Task finished: {}", module.dotted_name));
    ctx.detail(&format!("Output: {}", summarize(&value)));
    Ok(value)
}

/// Execute phase pipeline: load the task by dotted name, then run it
pub fn execute(dotted_name: &str, ctx: &Context) -> Result<String> {
    ctx.step(&format!("Loading task: {}", dotted_name));
    let module = load(dotted_name, ctx)?;
    let value = run_task(&module, ctx)?;
    Ok(value)
}

/// First line of the output, truncated, for the log
fn summarize(value: &str) -> String {
    const MAX: usize = 200;
    let first_line = value.lines().next().unwrap_or("");
    let mut summary: String = first_line.chars().take(MAX).collect();
    if summary.len() < first_line.len() || value.lines().count() > 1 {
        summary.push_str(" …");
    }
    if summary.is_empty() {
        summary.push_str("(empty)");
    }
    summary
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::error::LoadError;
    use crate::runner::Verbosity;
    use std::fs;
    use tempfile::TempDir;

    fn test_ctx(temp_dir: &TempDir) -> Context {
        let config = Config {
            tasks_root: temp_dir.path().join("tasks"),
            logs_root: temp_dir.path().join("logs"),
            ..Config::default()
        };
        Context::new(config).with_verbosity(Verbosity::Silent)
    }

    fn write_task(ctx: &Context, dotted: &str, script: &str, document: Option<&str>) {
        let mut dir = ctx.config.tasks_root.clone();
        for segment in dotted.split('.') {
            dir.push(segment);
        }
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join(&ctx.config.entry_file), script).unwrap();
        if let Some(text) = document {
            fs::write(dir.join(&ctx.config.document_file), text).unwrap();
        }
    }

    #[test]
    fn test_execute_pass_through_returns_document() {
        let temp_dir = TempDir::new().unwrap();
        let ctx = test_ctx(&temp_dir);
        write_task(
            &ctx,
            "com.example",
            "execute() {\n    cat\n}\n",
            Some("<html>cached</html>"),
        );

        let value = execute("com.example", &ctx).unwrap();
        assert_eq!(value, "<html>cached</html>");
    }

    #[test]
    fn test_execute_transforms_document() {
        let temp_dir = TempDir::new().unwrap();
        let ctx = test_ctx(&temp_dir);
        write_task(
            &ctx,
            "com.example",
            "execute() {\n    tr 'a-z' 'A-Z'\n}\n",
            Some("quiet"),
        );

        let value = execute("com.example", &ctx).unwrap();
        assert_eq!(value, "QUIET");
    }

    #[test]
    fn test_execute_missing_document() {
        let temp_dir = TempDir::new().unwrap();
        let ctx = test_ctx(&temp_dir);
        write_task(&ctx, "com.example", "execute() {\n    cat\n}\n", None);

        let module = load("com.example", &ctx).unwrap();
        let err = run_task(&module, &ctx).unwrap_err();
        assert!(matches!(err, RunError::MissingDocument(_)));
    }

    #[test]
    fn test_execute_failed_entry_point_preserves_cause() {
        let temp_dir = TempDir::new().unwrap();
        let ctx = test_ctx(&temp_dir);
        write_task(
            &ctx,
            "com.example",
            "execute() {\n    echo 'it broke' >&2\n    return 7\n}\n",
            Some("<html/>"),
        );

        let module = load("com.example", &ctx).unwrap();
        let err = run_task(&module, &ctx).unwrap_err();
        match err {
            RunError::ExecutionFailed { cause, .. } => {
                assert!(cause.contains("exit code 7"));
                assert!(cause.contains("it broke"));
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_execute_ungenerated_is_not_found() {
        let temp_dir = TempDir::new().unwrap();
        let ctx = test_ctx(&temp_dir);

        let err = execute("com.example.never", &ctx).unwrap_err();
        assert!(matches!(
            err,
            crate::PagetaskError::Load(LoadError::NotFound { .. })
        ));
    }

    #[test]
    fn test_summarize() {
        assert_eq!(summarize(""), "(empty)");
        assert_eq!(summarize("short"), "short");
        assert_eq!(summarize("line one\nline two"), "line one …");
        let long = "x".repeat(500);
        assert!(summarize(&long).len() < 500);
    }
}
