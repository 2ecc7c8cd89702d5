//! Configuration parsing and discovery
//!
//! This module handles parsing of pagetask.yml configuration files
//! and resolution of the tasks/logs roots.

pub mod parse;
pub mod types;

// Re-export main types
pub use parse::*;
pub use types::*;
