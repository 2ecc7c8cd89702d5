//! Task pipeline engine
//!
//! This module holds both phases of the pipeline: generate (identity
//! resolution, fetch, materialization) and execute (load, run), plus the
//! shared execution context.

pub mod context;
pub mod execute;
pub mod fetch;
pub mod identity;
pub mod list;
pub mod load;
pub mod materialize;

// Re-export main types
pub use context::*;
pub use execute::*;
pub use fetch::*;
pub use identity::*;
pub use list::*;
pub use load::*;
pub use materialize::*;
