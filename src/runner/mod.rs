//! Option resolution engine
//!
//! This module evaluates option declarations: guard conditions, default
//! candidates, command capture and ordering across a task's options.

pub mod command;
pub mod context;
pub mod option;
pub mod resolve;
pub mod task;
pub mod value;
pub mod when;

#[cfg(test)]
pub(crate) mod testing;

// Re-export main types
pub use command::*;
pub use context::*;
pub use option::*;
pub use resolve::*;
pub use task::*;
pub use value::*;
pub use when::*;
