//! Core configuration types
//!
//! This module defines the data structures that represent a pagetask.yml
//! configuration file. Every key is optional; defaults reproduce the stock
//! layout (tasks/ and logs/ next to the config file, `main.sh` entry script,
//! `index.html` cached document).

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Default fetch timeout in seconds
pub const DEFAULT_TIMEOUT_SECS: u64 = 5;

/// Top-level configuration structure
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Root directory for generated task directories
    #[serde(default = "default_tasks_root")]
    pub tasks_root: PathBuf,

    /// Root directory for per-command log files
    #[serde(default = "default_logs_root")]
    pub logs_root: PathBuf,

    /// File name of the generated entry script inside a task directory
    #[serde(default = "default_entry_file")]
    pub entry_file: String,

    /// File name of the cached document inside a task directory
    #[serde(default = "default_document_file")]
    pub document_file: String,

    /// Optional path to a custom entry-script template
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub entry_template: Option<PathBuf>,

    /// Shell used to check and run entry scripts (program + leading args)
    #[serde(default = "default_interpreter")]
    pub interpreter: Vec<String>,

    /// Host labels stripped during identity resolution
    #[serde(default = "default_ignored_subdomains")]
    pub ignored_subdomains: Vec<String>,

    /// Default fetch timeout in seconds (overridable with -t/--timeout)
    #[serde(default = "default_timeout")]
    pub timeout: u64,
}

fn default_tasks_root() -> PathBuf {
    PathBuf::from("tasks")
}

fn default_logs_root() -> PathBuf {
    PathBuf::from("logs")
}

fn default_entry_file() -> String {
    "main.sh".to_string()
}

fn default_document_file() -> String {
    "index.html".to_string()
}

fn default_interpreter() -> Vec<String> {
    vec!["sh".to_string()]
}

fn default_ignored_subdomains() -> Vec<String> {
    vec!["www".to_string()]
}

fn default_timeout() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

impl Default for Config {
    fn default() -> Self {
        Config {
            tasks_root: default_tasks_root(),
            logs_root: default_logs_root(),
            entry_file: default_entry_file(),
            document_file: default_document_file(),
            entry_template: None,
            interpreter: default_interpreter(),
            ignored_subdomains: default_ignored_subdomains(),
            timeout: default_timeout(),
        }
    }
}

impl Config {
    /// Configuration used when no config file exists anywhere up the tree:
    /// defaults, with the tasks/logs roots under the platform data directory.
    pub fn standalone() -> Self {
        let mut config = Config::default();
        if let Some(dirs) = ProjectDirs::from("", "", "pagetask") {
            config.tasks_root = dirs.data_dir().join("tasks");
            config.logs_root = dirs.data_dir().join("logs");
        }
        config
    }

    /// Resolve relative paths against the directory containing the config file
    pub fn resolve_relative_to(&mut self, base_dir: &Path) {
        if self.tasks_root.is_relative() {
            self.tasks_root = base_dir.join(&self.tasks_root);
        }
        if self.logs_root.is_relative() {
            self.logs_root = base_dir.join(&self.logs_root);
        }
        if let Some(template) = &self.entry_template {
            if template.is_relative() {
                self.entry_template = Some(base_dir.join(template));
            }
        }
    }
}
