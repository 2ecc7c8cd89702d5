//! CLI interface and argument parsing
//!
//! This module handles command-line interface parsing and dispatch to the
//! generate and execute phases.

pub mod app;

// Re-export main types
pub use app::*;
