//! Runtime task representation
//!
//! A task owns its options in declaration order and resolves them together.

use crate::config;
use crate::error::{ConfigError, ConfigResult, Result};
use crate::runner::{resolve_options, Host, TaskOption};
use std::collections::{BTreeSet, HashMap};

/// Runtime task representation
///
/// This differs from config::Task by carrying invocation state for its options
#[derive(Debug, Clone)]
pub struct Task {
    /// Task name
    pub name: String,

    /// Usage description
    pub usage: Option<String>,

    /// Longer description
    pub description: Option<String>,

    /// Whether this task is private
    pub private: bool,

    /// Named options, in declaration order
    pub options: Vec<TaskOption>,
}

impl Task {
    /// Create a new task from configuration
    pub fn from_config(name: String, config: config::Task) -> ConfigResult<Self> {
        config::validate_task(&name, &config)?;

        let options = config
            .options
            .into_iter()
            .map(|(opt_name, option)| TaskOption::from_config(opt_name, option))
            .collect::<ConfigResult<Vec<_>>>()?;

        Ok(Task {
            name,
            usage: config.usage,
            description: config.description,
            private: config.private,
            options,
        })
    }

    /// Look up an option by name
    pub fn option(&self, name: &str) -> Option<&TaskOption> {
        self.options.iter().find(|option| option.name == name)
    }

    /// Record a value supplied by the invocation
    ///
    /// Private options cannot be set this way.
    pub fn set_passed(&mut self, name: &str, value: String) -> ConfigResult<()> {
        let task = &self.name;
        let option = self
            .options
            .iter_mut()
            .find(|option| option.name == name && !option.private)
            .ok_or_else(|| ConfigError::UnknownOption {
                task: task.clone(),
                option: name.to_string(),
            })?;
        option.passed = Some(value);
        Ok(())
    }

    /// Variables the options depend on that no option of this task provides
    pub fn dependencies(&self) -> BTreeSet<String> {
        self.options
            .iter()
            .flat_map(|option| option.dependencies())
            .filter(|dep| self.option(dep).is_none())
            .collect()
    }

    /// Resolve every option; `vars` supplies values for outside dependencies
    pub fn resolve(
        &self,
        vars: &HashMap<String, String>,
        host: &dyn Host,
    ) -> Result<Vec<(String, String)>> {
        resolve_options(&self.options, vars, host)
    }
}
