//! Task materialization
//!
//! Writes the task artifact pair (entry script + cached document) under the
//! tasks root. The pair is created together: both files are fully written to
//! temporaries first and only then renamed into place, entry script first,
//! so readers never observe a cached document without its entry script.

use crate::error::Result;
use crate::runner::fetch::{fetch, HtmlDocument};
use crate::runner::identity::TaskIdentity;
use crate::runner::Context;
use std::fs;
use std::path::PathBuf;
use std::time::Duration;

/// Built-in entry-script skeleton: a pass-through that echoes the cached
/// document, ready to be edited into a real extraction pipeline.
pub const DEFAULT_ENTRY_TEMPLATE: &str = "\
#!/bin/sh
# Task entry script. The cached page arrives on stdin of execute().
# Replace the body with your extraction pipeline, e.g.:
#   grep -o '<title>[^<]*</title>'

execute() {
    cat
}
";

/// What materialization did for this invocation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MaterializeOutcome {
    /// Artifact pair written for the first time
    Created,
    /// Artifact pair rewritten because force was requested
    Overwritten,
    /// Pair already present and force not requested; nothing written
    AlreadyExists,
}

/// Create or refresh the task artifact pair for an identity
///
/// Idempotence contract: if both artifacts exist and `force` is false this
/// is a logged no-op. With `force`, both files are rewritten unconditionally.
/// A half-present pair is treated as never generated and repaired.
pub fn materialize(
    identity: &TaskIdentity,
    document: &HtmlDocument,
    force: bool,
    ctx: &Context,
) -> Result<MaterializeOutcome> {
    let task_dir = identity.dir_path(&ctx.config.tasks_root);
    let entry_path = task_dir.join(&ctx.config.entry_file);
    let document_path = task_dir.join(&ctx.config.document_file);

    let pair_present = entry_path.exists() && document_path.exists();
    if pair_present && !force {
        ctx.step(&format!(
            "Task already exists: {} (use --force to overwrite)",
            task_dir.display()
        ));
        return Ok(MaterializeOutcome::AlreadyExists);
    }

    ctx.step("Creating task directory");
    fs::create_dir_all(&task_dir)?;
    ctx.detail(&format!("Dir: {}", task_dir.display()));

    let entry_content = entry_template(ctx);

    ctx.step(if pair_present {
        "Overwriting task files"
    } else {
        "Writing task files"
    });

    // Both temporaries are written in full before either rename. The entry
    // script lands first: a crash between the renames can leave an entry
    // script without a document, never a document without its entry script.
    let entry_tmp = task_dir.join(format!("{}.tmp", ctx.config.entry_file));
    let document_tmp = task_dir.join(format!("{}.tmp", ctx.config.document_file));
    fs::write(&entry_tmp, &entry_content)?;
    fs::write(&document_tmp, &document.text)?;
    fs::rename(&entry_tmp, &entry_path)?;
    fs::rename(&document_tmp, &document_path)?;

    ctx.detail(&format!("Entry: {}", entry_path.display()));
    ctx.detail(&format!("Document: {}", document_path.display()));

    Ok(if pair_present {
        MaterializeOutcome::Overwritten
    } else {
        MaterializeOutcome::Created
    })
}

/// Entry-script body: the configured template file when readable, otherwise
/// the built-in skeleton (mirroring the template fallback of the original
/// generator).
fn entry_template(ctx: &Context) -> String {
    match &ctx.config.entry_template {
        Some(path) => match fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) => {
                ctx.detail(&format!(
                    "Template load error ({}): {}",
                    path.display(),
                    e
                ));
                DEFAULT_ENTRY_TEMPLATE.to_string()
            }
        },
        None => DEFAULT_ENTRY_TEMPLATE.to_string(),
    }
}

/// Generate phase pipeline: resolve the identity, fetch the page, and
/// materialize the artifact pair. Returns the dotted task name.
pub fn generate(url: &str, force: bool, timeout: Duration, ctx: &Context) -> Result<String> {
    ctx.step("Resolving task identity");
    let identity = TaskIdentity::resolve(url, &ctx.config.ignored_subdomains)?;
    ctx.detail(&format!("Host segments: {}", identity.domain_segments.join(".")));
    ctx.detail(&format!("Path segments: {}", identity.path_segments.join(".")));

    ctx.step(&format!("Fetching page (timeout {}s)", timeout.as_secs()));
    let document = fetch(url, timeout)?;
    ctx.detail(&format!("Final URL: {}", document.final_url));
    if let Some(ct) = &document.content_type {
        ctx.detail(&format!("Content-Type: {}", ct));
    }

    materialize(&identity, &document, force, ctx)?;

    let dotted = identity.dotted_name();
    ctx.step(&format!("Task ready: {}", dotted));
    Ok(dotted)
}

/// Paths of the artifact pair for an identity, entry script first
pub fn artifact_paths(identity: &TaskIdentity, ctx: &Context) -> (PathBuf, PathBuf) {
    let task_dir = identity.dir_path(&ctx.config.tasks_root);
    (
        task_dir.join(&ctx.config.entry_file),
        task_dir.join(&ctx.config.document_file),
    )
}
