//! In-memory host for unit tests

use crate::error::{ExecutionError, ExecutionResult};
use crate::runner::Host;
use std::collections::HashMap;

/// Host with a fixed environment and canned command outputs
#[derive(Debug, Default)]
pub struct FakeHost {
    env: HashMap<String, String>,
    commands: HashMap<String, String>,
}

impl FakeHost {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_env(mut self, name: &str, value: &str) -> Self {
        self.env.insert(name.to_string(), value.to_string());
        self
    }

    pub fn with_command(mut self, command: &str, output: &str) -> Self {
        self.commands.insert(command.to_string(), output.to_string());
        self
    }
}

impl Host for FakeHost {
    fn env_var(&self, name: &str) -> Option<String> {
        self.env.get(name).cloned()
    }

    /// Unknown commands fail like a shell that cannot find them
    fn capture(&self, command: &str) -> ExecutionResult<String> {
        self.commands
            .get(command)
            .cloned()
            .ok_or_else(|| ExecutionError::CommandFailed {
                command: command.to_string(),
                code: Some(127),
                stderr: format!("{}: command not found", command),
            })
    }
}
