//! Core configuration types
//!
//! This module defines the data structures that represent a rusk.yml task file,
//! down to the option declarations and their conditional defaults.

use crate::config::schema::validate_option;
use crate::error::{ConfigError, ConfigResult};
use log::warn;
use serde::de::{DeserializeOwned, Error};
use serde::{Deserialize, Deserializer};
use serde_yaml::Value as Yaml;
use std::collections::BTreeMap;
use std::convert::TryFrom;

/// Top-level configuration structure
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    /// Application name (optional)
    #[serde(default)]
    pub name: Option<String>,

    /// Application usage description (optional)
    #[serde(default)]
    pub usage: Option<String>,

    /// Tasks in declaration order
    #[serde(default, deserialize_with = "deserialize_ordered")]
    pub tasks: Vec<(String, Task)>,

    /// Global interpreter used for command defaults (e.g., ["sh", "-c"])
    #[serde(default)]
    pub interpreter: Option<Vec<String>>,
}

impl Config {
    /// Look up a task by name
    pub fn task(&self, name: &str) -> Option<&Task> {
        self.tasks
            .iter()
            .find(|(task_name, _)| task_name == name)
            .map(|(_, task)| task)
    }
}

/// A task definition
///
/// Only the parts relevant to option resolution are decoded; other task keys
/// such as `run` are accepted and ignored.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Task {
    /// Usage description for help text
    #[serde(default)]
    pub usage: Option<String>,

    /// Longer description for help text
    #[serde(default)]
    pub description: Option<String>,

    /// Whether this task is private (hidden from help)
    #[serde(default)]
    pub private: bool,

    /// Named options (flags) for the task, in declaration order
    #[serde(default, deserialize_with = "deserialize_ordered")]
    pub options: Vec<(String, OptionConfig)>,
}

/// An option declaration
///
/// The option's name is not part of its body; it comes from the key the
/// declaration is stored under.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OptionConfig {
    /// Usage description for help text
    pub usage: Option<String>,

    /// Short flag (single character)
    pub short: Option<String>,

    /// Free-form type hint (string, bool, int, float, ...)
    pub option_type: String,

    /// Private option (not settable from the command line)
    pub private: bool,

    /// Value must come from the command line or the environment
    pub required: bool,

    /// Environment variable to read from
    pub environment: Option<String>,

    /// Conditional defaults, first match wins
    pub default: ValueList,

    /// Allowed values (empty means unconstrained)
    pub values: Vec<String>,
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct OptionFields {
    #[serde(default)]
    usage: Option<String>,

    #[serde(default, deserialize_with = "deserialize_optional_scalar")]
    short: Option<String>,

    #[serde(rename = "type", default)]
    option_type: String,

    #[serde(default)]
    private: bool,

    #[serde(default)]
    required: bool,

    #[serde(default)]
    environment: Option<String>,

    #[serde(default, deserialize_with = "deserialize_value_list")]
    default: ValueList,

    #[serde(default, deserialize_with = "deserialize_string_list")]
    values: Vec<String>,
}

impl TryFrom<OptionFields> for OptionConfig {
    type Error = ConfigError;

    fn try_from(fields: OptionFields) -> Result<Self, Self::Error> {
        let option = OptionConfig {
            usage: fields.usage,
            short: fields.short,
            option_type: fields.option_type,
            private: fields.private,
            required: fields.required,
            environment: fields.environment,
            default: fields.default,
            values: fields.values,
        };
        validate_option(&option)?;
        Ok(option)
    }
}

impl<'de> Deserialize<'de> for OptionConfig {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = Yaml::deserialize(deserializer)?;
        decode_option(raw).map_err(D::Error::custom)
    }
}

/// Decode one option body, keeping the kind of any violated invariant
pub fn decode_option(raw: Yaml) -> ConfigResult<OptionConfig> {
    if !raw.is_mapping() {
        return Err(ConfigError::Declaration(
            "option definition must be a mapping".to_string(),
        ));
    }

    let fields =
        OptionFields::deserialize(raw).map_err(|e| ConfigError::Declaration(e.to_string()))?;
    OptionConfig::try_from(fields)
}

/// Decode an options block, keeping declaration order
pub fn decode_options(raw: Yaml) -> ConfigResult<Vec<(String, OptionConfig)>> {
    match raw {
        Yaml::Mapping(map) => map
            .into_iter()
            .map(|(key, body)| {
                let name = scalar_string(&key).ok_or_else(|| {
                    ConfigError::Declaration("option names must be scalars".to_string())
                })?;
                Ok((name, decode_option(body)?))
            })
            .collect(),
        Yaml::Null => Ok(Vec::new()),
        _ => Err(ConfigError::Declaration(
            "options must be a mapping of names to definitions".to_string(),
        )),
    }
}

/// A single condition: every `equal` entry must match and no `not-equal` entry may
///
/// Each variable maps to a list of candidates; a scalar in YAML is a list of one.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct When {
    /// Variable must equal one of the listed values
    #[serde(default, deserialize_with = "deserialize_conditions")]
    pub equal: BTreeMap<String, Vec<String>>,

    /// Variable must equal none of the listed values
    #[serde(
        rename = "not-equal",
        alias = "not_equal",
        default,
        deserialize_with = "deserialize_conditions"
    )]
    pub not_equal: BTreeMap<String, Vec<String>>,
}

/// Conjunction of conditions; empty means unconditional
pub type WhenList = Vec<When>;

/// A candidate default value
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Value {
    /// Guard for this candidate
    pub when: WhenList,

    /// Literal value
    pub value: Option<String>,

    /// Command whose trimmed output is the value
    pub command: Option<String>,
}

impl Value {
    /// An unconditional literal
    pub fn literal(value: impl Into<String>) -> Self {
        Value {
            value: Some(value.into()),
            ..Value::default()
        }
    }

    /// An unconditional command default
    pub fn command(command: impl Into<String>) -> Self {
        Value {
            command: Some(command.into()),
            ..Value::default()
        }
    }

    /// Attach a guard
    pub fn with_when(mut self, when: WhenList) -> Self {
        self.when = when;
        self
    }

    /// The literal and command of an entry that defines both
    ///
    /// A non-empty literal shadows the command.
    pub fn conflict(&self) -> Option<(&str, &str)> {
        match (&self.value, &self.command) {
            (Some(value), Some(command)) => Some((value.as_str(), command.as_str())),
            _ => None,
        }
    }
}

/// Ordered candidates; evaluated top to bottom
pub type ValueList = Vec<Value>;

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct ValueFields {
    #[serde(default, deserialize_with = "deserialize_when_list")]
    when: WhenList,

    #[serde(default, deserialize_with = "deserialize_optional_scalar")]
    value: Option<String>,

    #[serde(default)]
    command: Option<String>,
}

impl<'de> Deserialize<'de> for Value {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = Yaml::deserialize(deserializer)?;

        // Bare scalar shorthand
        if let Some(literal) = scalar_string(&raw) {
            return Ok(Value::literal(literal));
        }

        if !raw.is_mapping() {
            return Err(D::Error::custom(
                "default entry must be a scalar or a mapping",
            ));
        }

        let fields = ValueFields::deserialize(raw).map_err(D::Error::custom)?;
        if fields.value.is_none() && fields.command.is_none() {
            return Err(D::Error::custom(
                "default entry must define `value` or `command`",
            ));
        }

        let entry = Value {
            when: fields.when,
            value: fields.value,
            command: fields.command,
        };
        if let Some((value, command)) = entry.conflict() {
            warn!(
                "default entry defines both value '{}' and command '{}'; a non-empty value takes precedence",
                value, command
            );
        }

        Ok(entry)
    }
}

/// String form of a YAML scalar, if it is one
pub(crate) fn scalar_string(value: &Yaml) -> Option<String> {
    match value {
        Yaml::String(s) => Some(s.clone()),
        Yaml::Bool(b) => Some(b.to_string()),
        Yaml::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Deserialize a mapping into (key, item) pairs, keeping the declared order
fn deserialize_ordered<'de, D, T>(deserializer: D) -> Result<Vec<(String, T)>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Yaml::deserialize(deserializer)?;

    match value {
        Yaml::Mapping(map) => map
            .into_iter()
            .map(|(key, item)| {
                let name = scalar_string(&key)
                    .ok_or_else(|| D::Error::custom("mapping keys must be scalars"))?;
                let parsed = T::deserialize(item)
                    .map_err(|e| D::Error::custom(format!("{}: {}", name, e)))?;
                Ok((name, parsed))
            })
            .collect(),
        // Null or not present
        Yaml::Null => Ok(Vec::new()),
        _ => Err(D::Error::custom("expected a mapping of names to definitions")),
    }
}

/// Custom deserializer for defaults that handles a single entry or a list of entries
fn deserialize_value_list<'de, D>(deserializer: D) -> Result<ValueList, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Yaml::deserialize(deserializer)?;

    match value {
        Yaml::Sequence(seq) => seq
            .into_iter()
            .map(|item| Value::deserialize(item).map_err(D::Error::custom))
            .collect(),
        Yaml::Null => Ok(Vec::new()),
        // Single scalar or mapping
        other => Ok(vec![Value::deserialize(other).map_err(D::Error::custom)?]),
    }
}

/// Custom deserializer for `when` that handles a single condition or a list
fn deserialize_when_list<'de, D>(deserializer: D) -> Result<WhenList, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Yaml::deserialize(deserializer)?;

    match value {
        Yaml::Mapping(_) => Ok(vec![When::deserialize(value).map_err(D::Error::custom)?]),
        Yaml::Sequence(seq) => seq
            .into_iter()
            .map(|item| When::deserialize(item).map_err(D::Error::custom))
            .collect(),
        Yaml::Null => Ok(Vec::new()),
        _ => Err(D::Error::custom("when must be a mapping or a list of mappings")),
    }
}

/// Custom deserializer for condition maps: variable -> scalar or list of scalars
fn deserialize_conditions<'de, D>(
    deserializer: D,
) -> Result<BTreeMap<String, Vec<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Yaml::deserialize(deserializer)?;

    match value {
        Yaml::Mapping(map) => {
            let mut conditions = BTreeMap::new();
            for (key, candidates) in map {
                let name = scalar_string(&key)
                    .ok_or_else(|| D::Error::custom("condition variables must be scalars"))?;
                conditions.insert(name, string_list(candidates).map_err(D::Error::custom)?);
            }
            Ok(conditions)
        }
        Yaml::Null => Ok(BTreeMap::new()),
        _ => Err(D::Error::custom("condition must be a mapping of variables to values")),
    }
}

/// Custom deserializer for a scalar or list of scalars
fn deserialize_string_list<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Yaml::deserialize(deserializer)?;
    string_list(value).map_err(D::Error::custom)
}

/// Custom deserializer for an optional scalar of any YAML type
fn deserialize_optional_scalar<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Yaml::deserialize(deserializer)?;

    match value {
        Yaml::Null => Ok(None),
        other => scalar_string(&other)
            .map(Some)
            .ok_or_else(|| D::Error::custom("expected a string, number, or boolean")),
    }
}

fn string_list(value: Yaml) -> Result<Vec<String>, String> {
    match value {
        Yaml::Sequence(seq) => seq
            .iter()
            .map(|item| {
                scalar_string(item).ok_or_else(|| "list items must be scalars".to_string())
            })
            .collect(),
        Yaml::Null => Ok(Vec::new()),
        other => scalar_string(&other)
            .map(|s| vec![s])
            .ok_or_else(|| "expected a scalar or a list of scalars".to_string()),
    }
}
