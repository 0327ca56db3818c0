//! Option evaluation
//!
//! An option's value comes from the first source that yields one, in order:
//! the passed value, its environment variable, then its conditional defaults.
//! The result is checked against the allowed values, and an option left
//! empty falls back to the zero value of its type.

use crate::config::{schema, OptionConfig, ValueList};
use crate::error::{ConfigResult, ExecutionError, ExecutionResult};
use crate::runner::{resolve_value_list, Context, Host};
use log::debug;
use std::collections::{BTreeSet, HashMap};

/// Option value types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OptionType {
    #[default]
    String,
    Bool,
    Integer,
    Float,
}

impl OptionType {
    /// Interpret a type hint; matching ignores case and unknown hints are strings
    pub fn parse(hint: &str) -> Self {
        match hint.to_lowercase().as_str() {
            "bool" | "boolean" => OptionType::Bool,
            "int" | "integer" => OptionType::Integer,
            "float" | "float64" | "double" => OptionType::Float,
            _ => OptionType::String,
        }
    }

    /// Value of an option of this type that nothing set
    pub fn zero_value(self) -> &'static str {
        match self {
            OptionType::Integer | OptionType::Float => "0",
            OptionType::Bool => "false",
            OptionType::String => "",
        }
    }
}

/// Runtime representation of an option
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TaskOption {
    pub name: String,
    pub usage: Option<String>,
    pub short: Option<char>,
    pub option_type: OptionType,
    pub private: bool,
    pub required: bool,
    pub environment: Option<String>,

    /// Value supplied by the invocation, set just before evaluation
    pub passed: Option<String>,

    pub default_values: ValueList,
    pub values_allowed: Vec<String>,
}

impl TaskOption {
    /// Build an option from its declaration and the key it was declared under
    pub fn from_config(name: String, config: OptionConfig) -> ConfigResult<Self> {
        schema::validate_option(&config)?;

        Ok(TaskOption {
            name,
            usage: config.usage,
            short: config.short.and_then(|s| s.chars().next()),
            option_type: OptionType::parse(&config.option_type),
            private: config.private,
            required: config.required,
            environment: config.environment,
            passed: None,
            default_values: config.default,
            values_allowed: config.values,
        })
    }

    /// Names of the variables this option's defaults are guarded on
    pub fn dependencies(&self) -> BTreeSet<String> {
        schema::default_dependencies(&self.default_values)
    }

    /// Evaluate against the real process environment
    pub fn evaluate(&self, vars: &HashMap<String, String>) -> ExecutionResult<String> {
        self.evaluate_with(vars, &Context::new())
    }

    /// Evaluate with `vars` holding the values of options resolved so far
    pub fn evaluate_with(
        &self,
        vars: &HashMap<String, String>,
        host: &dyn Host,
    ) -> ExecutionResult<String> {
        let value = self.source_value(vars, host)?;
        self.validate_allowed(&value)?;

        if value.is_empty() {
            return Ok(self.option_type.zero_value().to_string());
        }

        Ok(value)
    }

    /// The value of the highest-precedence source that produced one
    fn source_value(
        &self,
        vars: &HashMap<String, String>,
        host: &dyn Host,
    ) -> ExecutionResult<String> {
        if let Some(passed) = self.passed.as_deref().filter(|v| !v.is_empty()) {
            debug!("Option '{}' set from passed value", self.name);
            return Ok(passed.to_string());
        }

        if let Some(var) = self.environment.as_deref() {
            if let Some(value) = host.env_var(var).filter(|v| !v.is_empty()) {
                debug!("Option '{}' set from environment variable {}", self.name, var);
                return Ok(value);
            }
        }

        if self.required {
            return Err(ExecutionError::MissingOption(self.name.clone()));
        }

        match resolve_value_list(&self.default_values, vars, host)? {
            Some(value) => {
                debug!("Option '{}' set from default", self.name);
                Ok(value)
            }
            None => Ok(String::new()),
        }
    }

    /// Empty values are exempt: absence is not a violation
    fn validate_allowed(&self, value: &str) -> ExecutionResult<()> {
        if value.is_empty()
            || self.values_allowed.is_empty()
            || self.values_allowed.iter().any(|allowed| allowed == value)
        {
            return Ok(());
        }

        Err(ExecutionError::InvalidOption {
            name: self.name.clone(),
            error: format!(
                "value '{}' is not one of: {}",
                value,
                self.values_allowed.join(", ")
            ),
        })
    }
}

/// Evaluate an option that may not be declared at all
///
/// An absent option evaluates to the empty string.
pub fn evaluate_option(
    option: Option<&TaskOption>,
    vars: &HashMap<String, String>,
    host: &dyn Host,
) -> ExecutionResult<String> {
    match option {
        Some(option) => option.evaluate_with(vars, host),
        None => Ok(String::new()),
    }
}
