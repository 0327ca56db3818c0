//! rusk-options - option resolution for the rusk task runner
//!
//! Given a task's option declarations, rusk-options computes the value each
//! option takes for one invocation: a passed value, then an environment
//! variable, then the first default whose `when` guard holds, checked against
//! the allowed values and falling back to the zero value of the option's type.

// Public modules
pub mod cli;
pub mod config;
pub mod error;
pub mod runner;

// Re-export commonly used types
pub use error::{Result, RuskError};

/// Current version of rusk-options
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
