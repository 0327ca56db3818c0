//! CLI interface and argument parsing
//!
//! This module turns a task file into a command line: one subcommand per
//! task, one flag per public option.

pub mod app;

// Re-export main types
pub use app::*;
