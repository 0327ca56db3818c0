//! Command execution
//!
//! This module runs command defaults and captures their output.

use crate::error::{ExecutionError, ExecutionResult};
use crate::runner::Context;
use log::debug;
use std::process::{Command as StdCommand, Stdio};

/// Run a command through the context's interpreter and capture its output
///
/// Standard output is returned trimmed. A launch failure or non-zero exit is
/// an error carrying the exit code and trimmed standard error.
pub fn capture_command(cmd: &str, ctx: &Context) -> ExecutionResult<String> {
    let (program, interpreter_args) = ctx.interpreter.split_first().ok_or_else(|| {
        ExecutionError::Environment("interpreter must name a program".to_string())
    })?;

    debug!(
        "Capturing output of '{}' in {}",
        cmd,
        ctx.working_dir.display()
    );

    let output = StdCommand::new(program)
        .args(interpreter_args)
        .arg(cmd)
        .current_dir(&ctx.working_dir)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .output()
        .map_err(|e| ExecutionError::CommandFailed {
            command: cmd.to_string(),
            code: None,
            stderr: e.to_string(),
        })?;

    if !output.status.success() {
        return Err(ExecutionError::CommandFailed {
            command: cmd.to_string(),
            code: output.status.code(),
            stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        });
    }

    Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
}
