//! Pagetask - scaffold per-URL page tasks and run them against cached HTML
//!
//! Pagetask turns a URL into a task directory holding a generated shell entry
//! script and a locally cached copy of the page, and later runs that entry
//! script's `execute` function with the cached document as input.

// Public modules
pub mod cli;
pub mod config;
pub mod error;
pub mod runner;

// Re-export commonly used types
pub use error::{PagetaskError, Result};

/// Current version of Pagetask
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
