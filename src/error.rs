//! Error types for rusk-options

use std::io;
use thiserror::Error;

/// Result type alias for rusk-options operations
pub type Result<T> = std::result::Result<T, RuskError>;

/// Main error type for rusk-options
#[derive(Error, Debug)]
pub enum RuskError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Option evaluation errors
    #[error("Execution error: {0}")]
    Execution(#[from] ExecutionError),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// YAML parsing errors
    #[error("YAML parsing error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

/// Configuration parsing and declaration errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Failed to find config file (searched: {0})")]
    NotFound(String),

    #[error("Invalid configuration: {0}")]
    Invalid(String),

    #[error("Invalid option declaration: {0}")]
    Declaration(String),

    #[error("Option short name '{0}' must be a single character")]
    ShortTooLong(String),

    #[error("Option fields '{0}' and '{1}' cannot both be defined")]
    ExclusiveFields(&'static str, &'static str),

    #[error("Task '{0}' is not defined")]
    TaskNotFound(String),

    #[error("Task '{task}' has no public option '{option}'")]
    UnknownOption { task: String, option: String },

    #[error("Circular dependency detected: {0}")]
    CircularDependency(String),
}

/// Option evaluation errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ExecutionError {
    #[error("Command '{command}' failed with exit code {code:?}: {stderr}")]
    CommandFailed {
        command: String,
        code: Option<i32>,
        stderr: String,
    },

    #[error("Option '{0}' is required but not provided")]
    MissingOption(String),

    #[error("Invalid option value for '{name}': {error}")]
    InvalidOption { name: String, error: String },

    #[error("Environment error: {0}")]
    Environment(String),
}

impl ConfigError {
    /// Whether this error rejects the shape or fields of an option declaration
    pub fn is_declaration(&self) -> bool {
        matches!(
            self,
            ConfigError::Declaration(_)
                | ConfigError::ShortTooLong(_)
                | ConfigError::ExclusiveFields(..)
        )
    }
}

/// Specialized result type for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Specialized result type for execution operations
pub type ExecutionResult<T> = std::result::Result<T, ExecutionError>;

/// Whether an error should be reported as a bad invocation rather than a bad task file
pub fn is_invocation_error(err: &RuskError) -> bool {
    matches!(
        err,
        RuskError::Execution(ExecutionError::MissingOption(_))
            | RuskError::Execution(ExecutionError::InvalidOption { .. })
            | RuskError::Config(ConfigError::UnknownOption { .. })
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invocation_errors() {
        let err: RuskError = ExecutionError::MissingOption("env".to_string()).into();
        assert!(is_invocation_error(&err));

        let err: RuskError = ConfigError::ShortTooLong("foo".to_string()).into();
        assert!(!is_invocation_error(&err));
    }

    #[test]
    fn test_declaration_errors() {
        assert!(ConfigError::ShortTooLong("foo".to_string()).is_declaration());
        assert!(ConfigError::ExclusiveFields("private", "required").is_declaration());
        assert!(ConfigError::Declaration("bad".to_string()).is_declaration());
        assert!(!ConfigError::CircularDependency("a -> a".to_string()).is_declaration());
    }

    #[test]
    fn test_command_failed_message() {
        let err = ExecutionError::CommandFailed {
            command: "false".to_string(),
            code: Some(1),
            stderr: "boom".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Command 'false' failed with exit code Some(1): boom"
        );
    }
}
