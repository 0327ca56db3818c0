//! Execution context for option resolution
//!
//! The context carries what the process-backed collaborators need: where
//! commands run and which interpreter runs them.

use crate::error::ExecutionResult;
use crate::runner::capture_command;
use std::env;
use std::path::PathBuf;

/// The outside world as seen by option evaluation
///
/// Evaluation reads environment variables and runs command defaults only
/// through this trait.
pub trait Host {
    /// Current value of an environment variable, if set
    fn env_var(&self, name: &str) -> Option<String>;

    /// Run a command and return its trimmed standard output
    fn capture(&self, command: &str) -> ExecutionResult<String>;
}

/// Process-backed execution context
#[derive(Debug, Clone)]
pub struct Context {
    /// Directory command defaults run in
    pub working_dir: PathBuf,

    /// Configuration file path
    pub config_path: Option<PathBuf>,

    /// Interpreter prefix (e.g., ["bash", "-c"])
    pub interpreter: Vec<String>,
}

impl Context {
    /// Create a new context with default settings
    pub fn new() -> Self {
        Context {
            working_dir: env::current_dir().unwrap_or_else(|_| PathBuf::from(".")),
            config_path: None,
            interpreter: vec!["sh".to_string(), "-c".to_string()],
        }
    }

    /// Create a context with a specific working directory
    pub fn with_working_dir(mut self, dir: PathBuf) -> Self {
        self.working_dir = dir;
        self
    }

    /// Set the configuration file path
    pub fn with_config_path(mut self, path: PathBuf) -> Self {
        self.config_path = Some(path);
        self
    }

    /// Set the interpreter
    pub fn with_interpreter(mut self, interpreter: Vec<String>) -> Self {
        self.interpreter = interpreter;
        self
    }

    /// Get the directory for the config file (or current dir)
    pub fn config_dir(&self) -> PathBuf {
        self.config_path
            .as_ref()
            .and_then(|p| p.parent())
            .filter(|p| !p.as_os_str().is_empty())
            .map(|p| p.to_path_buf())
            .unwrap_or_else(|| self.working_dir.clone())
    }
}

impl Default for Context {
    fn default() -> Self {
        Self::new()
    }
}

impl Host for Context {
    fn env_var(&self, name: &str) -> Option<String> {
        env::var(name).ok()
    }

    fn capture(&self, command: &str) -> ExecutionResult<String> {
        capture_command(command, self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    #[test]
    fn test_context_new() {
        let ctx = Context::new();
        assert_eq!(ctx.interpreter, vec!["sh", "-c"]);
        assert!(ctx.config_path.is_none());
    }

    #[test]
    fn test_with_interpreter() {
        let ctx = Context::new().with_interpreter(vec!["bash".to_string(), "-c".to_string()]);
        assert_eq!(ctx.interpreter, vec!["bash", "-c"]);
    }

    #[test]
    fn test_config_dir() {
        let ctx = Context::new().with_config_path(PathBuf::from("/project/rusk.yml"));
        assert_eq!(ctx.config_dir(), Path::new("/project"));

        let ctx = Context::new()
            .with_working_dir(PathBuf::from("/work"))
            .with_config_path(PathBuf::from("rusk.yml"));
        assert_eq!(ctx.config_dir(), Path::new("/work"));
    }

    #[test]
    fn test_capture_through_host() {
        let ctx = Context::new();
        let host: &dyn Host = &ctx;
        assert_eq!(host.capture("echo '  spaced  '").unwrap(), "spaced");
    }
}
