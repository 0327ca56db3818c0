//! Configuration validation
//!
//! This module provides validation logic for task files and option declarations,
//! and the dependency ordering shared by load-time validation and resolution.

use crate::config::types::{Config, OptionConfig, Task, Value};
use crate::error::{ConfigError, ConfigResult};
use crate::runner::when_dependencies;
use std::collections::{BTreeSet, HashMap};

/// Long flags the command line reserves for itself
pub const RESERVED_NAMES: &[&str] = &["file", "quiet", "verbose", "help", "version"];

/// Short flags the command line reserves for itself
pub const RESERVED_SHORTS: &[char] = &['f', 'q', 'v', 'h', 'V'];

/// Validate a complete configuration
pub fn validate_config(config: &Config) -> ConfigResult<()> {
    for (name, task) in &config.tasks {
        validate_task(name, task)?;
    }
    Ok(())
}

/// Validate a single task
pub fn validate_task(name: &str, task: &Task) -> ConfigResult<()> {
    let mut shorts: HashMap<char, &str> = HashMap::new();

    for (opt_name, option) in &task.options {
        validate_option(option)?;

        if opt_name.is_empty() {
            return Err(ConfigError::Invalid(format!(
                "task '{}' declares an option with an empty name",
                name
            )));
        }

        if RESERVED_NAMES.contains(&opt_name.as_str()) {
            return Err(ConfigError::Invalid(format!(
                "option '{}' in task '{}' uses a reserved name",
                opt_name, name
            )));
        }

        if let Some(short) = option.short.as_deref().and_then(|s| s.chars().next()) {
            if RESERVED_SHORTS.contains(&short) {
                return Err(ConfigError::Invalid(format!(
                    "short flag '-{}' of option '{}' is reserved",
                    short, opt_name
                )));
            }
            if let Some(other) = shorts.insert(short, opt_name) {
                return Err(ConfigError::Invalid(format!(
                    "short flag '-{}' is used by both '{}' and '{}' in task '{}'",
                    short, other, opt_name, name
                )));
            }
        }
    }

    // Defaults must not depend on each other in a loop
    let nodes: Vec<(String, BTreeSet<String>)> = task
        .options
        .iter()
        .map(|(opt_name, option)| (opt_name.clone(), default_dependencies(&option.default)))
        .collect();
    dependency_order(&nodes)?;

    Ok(())
}

/// Validate the structural invariants of one option declaration
pub fn validate_option(option: &OptionConfig) -> ConfigResult<()> {
    if let Some(short) = &option.short {
        if short.chars().count() > 1 {
            return Err(ConfigError::ShortTooLong(short.clone()));
        }
    }

    if option.private {
        if option.required {
            return Err(ConfigError::ExclusiveFields("private", "required"));
        }
        if option.environment.is_some() {
            return Err(ConfigError::ExclusiveFields("private", "environment"));
        }
        if !option.values.is_empty() {
            return Err(ConfigError::ExclusiveFields("private", "values"));
        }
    }

    if option.required && !option.default.is_empty() {
        return Err(ConfigError::ExclusiveFields("required", "default"));
    }

    Ok(())
}

/// Every variable referenced by a guard anywhere in a list of defaults
pub fn default_dependencies(values: &[Value]) -> BTreeSet<String> {
    values
        .iter()
        .flat_map(|value| when_dependencies(&value.when))
        .cloned()
        .collect()
}

/// Order nodes so each comes after the nodes it depends on
///
/// Returns indices into `nodes`. Dependencies naming no node are ignored.
/// Independent nodes keep their declared order.
pub fn dependency_order(nodes: &[(String, BTreeSet<String>)]) -> ConfigResult<Vec<usize>> {
    let index: HashMap<&str, usize> = nodes
        .iter()
        .enumerate()
        .map(|(i, (name, _))| (name.as_str(), i))
        .collect();

    let mut visited = vec![false; nodes.len()];
    let mut stack = Vec::new();
    let mut order = Vec::with_capacity(nodes.len());

    for i in 0..nodes.len() {
        visit(nodes, &index, i, &mut visited, &mut stack, &mut order)?;
    }

    Ok(order)
}

/// Depth-first visit that reports the first cycle it walks into
fn visit(
    nodes: &[(String, BTreeSet<String>)],
    index: &HashMap<&str, usize>,
    current: usize,
    visited: &mut [bool],
    stack: &mut Vec<usize>,
    order: &mut Vec<usize>,
) -> ConfigResult<()> {
    if let Some(start) = stack.iter().position(|&i| i == current) {
        let cycle: Vec<&str> = stack[start..]
            .iter()
            .chain(std::iter::once(&current))
            .map(|&i| nodes[i].0.as_str())
            .collect();
        return Err(ConfigError::CircularDependency(cycle.join(" -> ")));
    }

    if visited[current] {
        return Ok(());
    }

    stack.push(current);

    let mut deps: Vec<usize> = nodes[current]
        .1
        .iter()
        .filter_map(|dep| index.get(dep.as_str()).copied())
        .collect();
    deps.sort_unstable();

    for dep in deps {
        visit(nodes, index, dep, visited, stack, order)?;
    }

    stack.pop();
    visited[current] = true;
    order.push(current);

    Ok(())
}
