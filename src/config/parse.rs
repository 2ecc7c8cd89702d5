//! Configuration file parsing and discovery

use crate::config::types::Config;
use crate::error::{ConfigError, ConfigResult, PagetaskError};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

/// Default configuration file names to search for
const CONFIG_FILE_NAMES: &[&str] = &["pagetask.yml", "pagetask.yaml"];

/// Find the configuration file by searching current and parent directories
pub fn find_config_file() -> ConfigResult<PathBuf> {
    find_config_file_from(env::current_dir().map_err(|e| {
        ConfigError::Invalid(format!("Failed to get current directory: {}", e))
    })?)
}

/// Find the configuration file starting from a specific directory
pub fn find_config_file_from(start_dir: PathBuf) -> ConfigResult<PathBuf> {
    let mut current_dir = start_dir;
    let mut searched_paths = Vec::new();

    loop {
        for file_name in CONFIG_FILE_NAMES {
            let config_path = current_dir.join(file_name);
            searched_paths.push(config_path.display().to_string());

            if config_path.exists() && config_path.is_file() {
                return Ok(config_path);
            }
        }

        // Try parent directory
        match current_dir.parent() {
            Some(parent) => current_dir = parent.to_path_buf(),
            None => {
                // Reached root without finding config
                return Err(ConfigError::NotFound(searched_paths.join(", ")));
            }
        }
    }
}

/// Parse a configuration file from a path
///
/// Relative roots in the file are resolved against the file's directory.
pub fn parse_config_file(path: &Path) -> Result<Config, PagetaskError> {
    let contents = fs::read_to_string(path)
        .map_err(|e| ConfigError::Invalid(format!("Failed to read file: {}", e)))?;

    let mut config = parse_config(&contents)?;
    let base_dir = path.parent().unwrap_or_else(|| Path::new("."));
    config.resolve_relative_to(base_dir);
    Ok(config)
}

/// Parse configuration from a string
pub fn parse_config(yaml: &str) -> Result<Config, PagetaskError> {
    let config: Config = serde_yaml::from_str(yaml)?;
    Ok(config)
}

/// Parse configuration with automatic file discovery
///
/// A missing config file is not an error: the standalone defaults apply, with
/// the tasks and logs roots under the platform data directory.
pub fn parse_config_auto() -> Result<(Config, Option<PathBuf>), PagetaskError> {
    match find_config_file() {
        Ok(config_path) => {
            let config = parse_config_file(&config_path)?;
            Ok((config, Some(config_path)))
        }
        Err(ConfigError::NotFound(_)) => Ok((Config::standalone(), None)),
        Err(e) => Err(e.into()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_parse_empty_config_uses_defaults() {
        let config = parse_config("{}").unwrap();
        assert_eq!(config.entry_file, "main.sh");
        assert_eq!(config.tasks_root, PathBuf::from("tasks"));
    }

    #[test]
    fn test_parse_overrides() {
        let yaml = r#"
tasks_root: /data/tasks
entry_file: run.sh
ignored_subdomains: []
timeout: 30
"#;
        let config = parse_config(yaml).unwrap();
        assert_eq!(config.tasks_root, PathBuf::from("/data/tasks"));
        assert_eq!(config.entry_file, "run.sh");
        assert!(config.ignored_subdomains.is_empty());
        assert_eq!(config.timeout, 30);
    }

    #[test]
    fn test_parse_rejects_unknown_keys() {
        let result = parse_config("task_root: tasks\n");
        assert!(result.is_err());
    }

    #[test]
    fn test_find_config_in_current_dir() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("pagetask.yml");
        fs::write(&config_path, "tasks_root: tasks\n").unwrap();

        let found = find_config_file_from(temp_dir.path().to_path_buf()).unwrap();
        assert_eq!(found, config_path);
    }

    #[test]
    fn test_find_config_in_parent_dir() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("pagetask.yaml");
        fs::write(&config_path, "logs_root: logs\n").unwrap();

        let nested = temp_dir.path().join("a").join("b");
        fs::create_dir_all(&nested).unwrap();

        let found = find_config_file_from(nested).unwrap();
        assert_eq!(found, config_path);
    }

    #[test]
    fn test_parse_config_file_resolves_roots() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("pagetask.yml");
        fs::write(&config_path, "tasks_root: tasks\nlogs_root: logs\n").unwrap();

        let config = parse_config_file(&config_path).unwrap();
        assert_eq!(config.tasks_root, temp_dir.path().join("tasks"));
        assert_eq!(config.logs_root, temp_dir.path().join("logs"));
    }
}
