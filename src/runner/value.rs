//! Default value resolution
//!
//! Candidates are tried in declared order; the first whose guard holds wins.

use crate::config::Value;
use crate::error::ExecutionResult;
use crate::runner::{evaluate_when_list, Host};
use log::debug;
use std::collections::HashMap;

/// Resolve the first matching candidate, or `None` when no guard holds
pub fn resolve_value_list(
    values: &[Value],
    vars: &HashMap<String, String>,
    host: &dyn Host,
) -> ExecutionResult<Option<String>> {
    match values
        .iter()
        .find(|candidate| evaluate_when_list(&candidate.when, vars))
    {
        Some(candidate) => resolve_value(candidate, host).map(Some),
        None => Ok(None),
    }
}

/// Produce a candidate's value, running its command when it has no literal
pub fn resolve_value(value: &Value, host: &dyn Host) -> ExecutionResult<String> {
    if let Some(literal) = value.value.as_deref().filter(|v| !v.is_empty()) {
        return Ok(literal.to_string());
    }

    match value.command.as_deref() {
        Some(command) => {
            debug!("Running default command '{}'", command);
            host.capture(command)
        }
        None => Ok(String::new()),
    }
}
