//! Error types for Pagetask

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for Pagetask operations
pub type Result<T> = std::result::Result<T, PagetaskError>;

/// Main error type for Pagetask
#[derive(Error, Debug)]
pub enum PagetaskError {
    /// The input URL could not be parsed into a host and path
    #[error("Invalid URL '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },

    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Fetch-phase errors
    #[error("Fetch error: {0}")]
    Fetch(#[from] FetchError),

    /// Task loading errors
    #[error("Load error: {0}")]
    Load(#[from] LoadError),

    /// Task execution errors
    #[error("Run error: {0}")]
    Run(#[from] RunError),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// YAML parsing errors
    #[error("YAML parsing error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

/// Configuration parsing and validation errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to find config file (searched: {0})")]
    NotFound(String),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Errors from the single GET request of the generate phase
#[derive(Error, Debug)]
pub enum FetchError {
    #[error("Request to '{url}' timed out after {secs}s")]
    Timeout { url: String, secs: u64 },

    #[error("Network failure fetching '{url}': {cause}")]
    Network { url: String, cause: String },

    #[error("Server returned HTTP {code} for '{url}'")]
    HttpStatus { url: String, code: u16 },
}

/// Errors resolving a dotted task identity to a loadable entry script
#[derive(Error, Debug)]
pub enum LoadError {
    #[error("Invalid task name '{0}'")]
    InvalidName(String),

    #[error("Task '{name}' has not been generated (no entry script at {})", .path.display())]
    NotFound { name: String, path: PathBuf },

    #[error("Task '{name}' is malformed: {reason}")]
    Malformed { name: String, reason: String },

    #[error("Task '{name}' failed to load: {detail}")]
    SyntaxOrRuntime { name: String, detail: String },
}

/// Errors from running a loaded task's entry point
#[derive(Error, Debug)]
pub enum RunError {
    #[error("Cached document missing at {}", .0.display())]
    MissingDocument(PathBuf),

    #[error("Task '{name}' execution failed: {cause}")]
    ExecutionFailed { name: String, cause: String },
}

/// Specialized result type for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Specialized result type for fetch operations
pub type FetchResult<T> = std::result::Result<T, FetchError>;

/// Specialized result type for load operations
pub type LoadResult<T> = std::result::Result<T, LoadError>;

/// Specialized result type for run operations
pub type RunResult<T> = std::result::Result<T, RunError>;
