//! Configuration file parsing and discovery

use crate::config::types::{decode_option, decode_options, Config, OptionConfig};
use crate::error::{ConfigError, ConfigResult, RuskError};
use log::debug;
use serde::de::{self, DeserializeSeed, Deserializer, IgnoredAny, MapAccess, SeqAccess, Visitor};
use serde::Deserialize;
use serde_yaml::{Mapping, Value as Yaml};
use std::env;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

/// Default configuration file names to search for
const CONFIG_FILE_NAMES: &[&str] = &["rusk.yml", "rusk.yaml"];

/// Find the configuration file by searching current and parent directories
pub fn find_config_file() -> ConfigResult<PathBuf> {
    find_config_file_from(env::current_dir().map_err(|e| {
        ConfigError::Invalid(format!("Failed to get current directory: {}", e))
    })?)
}

/// Find the configuration file starting from a specific directory
pub fn find_config_file_from(start_dir: PathBuf) -> ConfigResult<PathBuf> {
    let mut current_dir = start_dir;
    let mut searched_paths = Vec::new();

    loop {
        for file_name in CONFIG_FILE_NAMES {
            let config_path = current_dir.join(file_name);
            searched_paths.push(config_path.display().to_string());

            if config_path.is_file() {
                debug!("Using config file {}", config_path.display());
                return Ok(config_path);
            }
        }

        match current_dir.parent() {
            Some(parent) => current_dir = parent.to_path_buf(),
            None => return Err(ConfigError::NotFound(searched_paths.join(", "))),
        }
    }
}

/// Parse a configuration file from a path
pub fn parse_config_file(path: &Path) -> Result<Config, RuskError> {
    let contents = fs::read_to_string(path)?;
    parse_config(&contents)
}

/// Parse configuration from a string
///
/// Option declarations are checked before the rest of the file so that a
/// violated invariant is reported with its own kind.
pub fn parse_config(yaml: &str) -> Result<Config, RuskError> {
    let raw = load_yaml(yaml)?;

    if let Some(Yaml::Mapping(tasks)) = raw.get("tasks") {
        for task in tasks.values() {
            if let Some(options) = task.get("options") {
                decode_options(options.clone())?;
            }
        }
    }

    Ok(Config::deserialize(raw)?)
}

/// Parse configuration with automatic file discovery
pub fn parse_config_auto() -> Result<(Config, PathBuf), RuskError> {
    let config_path = find_config_file()?;
    let config = parse_config_file(&config_path)?;
    Ok((config, config_path))
}

/// Decode a single option declaration
///
/// The body must be a mapping; its name is assigned by whoever owns the key.
pub fn parse_option(yaml: &str) -> ConfigResult<OptionConfig> {
    decode_option(load_yaml(yaml).map_err(|e| ConfigError::Declaration(e.to_string()))?)
}

/// Decode an options block, keeping declaration order
pub fn parse_options(yaml: &str) -> ConfigResult<Vec<(String, OptionConfig)>> {
    decode_options(load_yaml(yaml).map_err(|e| ConfigError::Declaration(e.to_string()))?)
}

/// Load a YAML document, keeping numeric scalars as they were written
///
/// Every option field is a string, so `1.10` must stay `1.10` rather than
/// becoming the float `1.1`. Documents without numbers are read once.
pub fn load_yaml(yaml: &str) -> Result<Yaml, serde_yaml::Error> {
    let shape: Yaml = serde_yaml::from_str(yaml)?;
    if !has_numbers(&shape) {
        return Ok(shape);
    }

    SourceText(&shape).deserialize(serde_yaml::Deserializer::from_str(yaml))
}

fn has_numbers(value: &Yaml) -> bool {
    match value {
        Yaml::Number(_) => true,
        Yaml::Sequence(items) => items.iter().any(has_numbers),
        Yaml::Mapping(map) => map.iter().any(|(k, v)| has_numbers(k) || has_numbers(v)),
        _ => false,
    }
}

/// Second pass over a document whose structure is already known
///
/// Numbers are read back as their source text; everything else is kept.
struct SourceText<'a>(&'a Yaml);

impl<'de> DeserializeSeed<'de> for SourceText<'_> {
    type Value = Yaml;

    fn deserialize<D>(self, deserializer: D) -> Result<Yaml, D::Error>
    where
        D: Deserializer<'de>,
    {
        match self.0 {
            Yaml::Number(_) => String::deserialize(deserializer).map(Yaml::String),
            Yaml::Sequence(items) => deserializer.deserialize_seq(SequenceText(items)),
            Yaml::Mapping(map) => deserializer.deserialize_map(MappingText(map)),
            other => {
                IgnoredAny::deserialize(deserializer)?;
                Ok(other.clone())
            }
        }
    }
}

struct SequenceText<'a>(&'a [Yaml]);

impl<'de> Visitor<'de> for SequenceText<'_> {
    type Value = Yaml;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "a sequence of {} items", self.0.len())
    }

    fn visit_seq<A>(self, mut seq: A) -> Result<Yaml, A::Error>
    where
        A: SeqAccess<'de>,
    {
        let mut items = Vec::with_capacity(self.0.len());
        for (i, shape) in self.0.iter().enumerate() {
            let item = seq
                .next_element_seed(SourceText(shape))?
                .ok_or_else(|| <A::Error as de::Error>::invalid_length(i, &self))?;
            items.push(item);
        }
        Ok(Yaml::Sequence(items))
    }
}

struct MappingText<'a>(&'a Mapping);

impl<'de> Visitor<'de> for MappingText<'_> {
    type Value = Yaml;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "a mapping of {} entries", self.0.len())
    }

    fn visit_map<A>(self, mut access: A) -> Result<Yaml, A::Error>
    where
        A: MapAccess<'de>,
    {
        let mut map = Mapping::with_capacity(self.0.len());
        for (key, value) in self.0 {
            let key = access
                .next_key_seed(SourceText(key))?
                .ok_or_else(|| <A::Error as de::Error>::invalid_length(map.len(), &self))?;
            let value = access.next_value_seed(SourceText(value))?;
            map.insert(key, value);
        }
        Ok(Yaml::Mapping(map))
    }
}
