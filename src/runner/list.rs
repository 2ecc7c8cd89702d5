//! Task discovery
//!
//! Walks the tasks root for generated entry scripts and maps each one back
//! to its dotted identity.

use crate::error::Result;
use crate::runner::Context;
use glob::glob;
use std::path::Path;

/// Dotted names of all generated tasks, sorted
pub fn list_tasks(ctx: &Context) -> Result<Vec<String>> {
    let root = &ctx.config.tasks_root;
    if !root.is_dir() {
        return Ok(Vec::new());
    }

    let pattern = format!("{}/**/{}", root.display(), ctx.config.entry_file);
    let mut names = Vec::new();

    for entry in glob(&pattern).map_err(|e| {
        std::io::Error::new(std::io::ErrorKind::InvalidInput, e.to_string())
    })? {
        let path = entry.map_err(|e| e.into_error())?;
        if let Some(task_dir) = path.parent() {
            if let Some(name) = dotted_name_for(task_dir, root) {
                names.push(name);
            }
        }
    }

    names.sort();
    Ok(names)
}

/// Dotted identity of a task directory relative to the tasks root
fn dotted_name_for(task_dir: &Path, root: &Path) -> Option<String> {
    let relative = task_dir.strip_prefix(root).ok()?;
    let segments: Vec<&str> = relative
        .components()
        .filter_map(|c| c.as_os_str().to_str())
        .collect();
    if segments.is_empty() {
        None
    } else {
        Some(segments.join("."))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
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

    fn scaffold(ctx: &Context, dotted: &str) {
        let mut dir = ctx.config.tasks_root.clone();
        for segment in dotted.split('.') {
            dir.push(segment);
        }
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join(&ctx.config.entry_file), "execute() { cat; }\n").unwrap();
    }

    #[test]
    fn test_list_empty_root() {
        let temp_dir = TempDir::new().unwrap();
        let ctx = test_ctx(&temp_dir);
        assert!(list_tasks(&ctx).unwrap().is_empty());
    }

    #[test]
    fn test_list_returns_sorted_dotted_names() {
        let temp_dir = TempDir::new().unwrap();
        let ctx = test_ctx(&temp_dir);
        scaffold(&ctx, "org.rustlang.learn");
        scaffold(&ctx, "com.example");
        scaffold(&ctx, "com.example.news");

        let names = list_tasks(&ctx).unwrap();
        assert_eq!(
            names,
            vec!["com.example", "com.example.news", "org.rustlang.learn"]
        );
    }

    #[test]
    fn test_list_ignores_directories_without_entry_script() {
        let temp_dir = TempDir::new().unwrap();
        let ctx = test_ctx(&temp_dir);
        scaffold(&ctx, "com.example");
        fs::create_dir_all(ctx.config.tasks_root.join("com").join("empty")).unwrap();

        assert_eq!(list_tasks(&ctx).unwrap(), vec!["com.example"]);
    }
}
