//! Configuration parsing and validation
//!
//! This module handles parsing of rusk.yml task files, decoding of option
//! declarations and validation of their structure.

pub mod parse;
pub mod schema;
pub mod types;

// Re-export main types
pub use parse::*;
pub use schema::*;
pub use types::*;
