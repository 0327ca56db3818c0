//! Resolution of a whole option set
//!
//! Options whose defaults are guarded on other options are evaluated after
//! them, and every resolved value is visible to the options that follow.

use crate::config::dependency_order;
use crate::error::{ConfigResult, Result};
use crate::runner::{Host, TaskOption};
use log::debug;
use std::collections::{BTreeSet, HashMap};

/// Indices of `options` in a safe evaluation order
pub fn evaluation_order(options: &[TaskOption]) -> ConfigResult<Vec<usize>> {
    let nodes: Vec<(String, BTreeSet<String>)> = options
        .iter()
        .map(|option| (option.name.clone(), option.dependencies()))
        .collect();
    dependency_order(&nodes)
}

/// Evaluate every option, returning `(name, value)` pairs in declaration order
///
/// `vars` seeds the values guards can see before any option is resolved.
pub fn resolve_options(
    options: &[TaskOption],
    vars: &HashMap<String, String>,
    host: &dyn Host,
) -> Result<Vec<(String, String)>> {
    let order = evaluation_order(options)?;
    debug!(
        "Resolving options in order: {}",
        order
            .iter()
            .map(|&i| options[i].name.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    );

    let mut known = vars.clone();
    let mut resolved: Vec<Option<String>> = vec![None; options.len()];

    for i in order {
        let option = &options[i];
        let value = option.evaluate_with(&known, host)?;
        known.insert(option.name.clone(), value.clone());
        resolved[i] = Some(value);
    }

    Ok(options
        .iter()
        .zip(resolved)
        .map(|(option, value)| (option.name.clone(), value.unwrap_or_default()))
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{Value, When};
    use crate::error::{ConfigError, ExecutionError, RuskError};
    use crate::runner::testing::FakeHost;

    fn when_equal(name: &str, value: &str) -> When {
        let mut when = When::default();
        when.equal.insert(name.to_string(), vec![value.to_string()]);
        when
    }

    fn option(name: &str, default_values: Vec<Value>) -> TaskOption {
        TaskOption {
            name: name.to_string(),
            default_values,
            ..TaskOption::default()
        }
    }

    #[test]
    fn test_dependent_option_sees_resolved_value() {
        // "profile" is declared first but depends on "env"
        let options = vec![
            option(
                "profile",
                vec![
                    Value::literal("release").with_when(vec![when_equal("env", "prod")]),
                    Value::literal("debug"),
                ],
            ),
            TaskOption {
                passed: Some("prod".to_string()),
                ..option("env", vec![Value::literal("dev")])
            },
        ];

        assert_eq!(evaluation_order(&options).unwrap(), vec![1, 0]);

        let resolved = resolve_options(&options, &HashMap::new(), &FakeHost::new()).unwrap();
        assert_eq!(
            resolved,
            vec![
                ("profile".to_string(), "release".to_string()),
                ("env".to_string(), "prod".to_string()),
            ]
        );
    }

    #[test]
    fn test_caller_vars_are_visible() {
        let options = vec![option(
            "greeting",
            vec![
                Value::literal("bonjour").with_when(vec![when_equal("lang", "fr")]),
                Value::literal("hello"),
            ],
        )];
        let vars: HashMap<String, String> =
            [("lang".to_string(), "fr".to_string())].into_iter().collect();

        let resolved = resolve_options(&options, &vars, &FakeHost::new()).unwrap();
        assert_eq!(resolved[0].1, "bonjour");
    }

    #[test]
    fn test_cycle_is_reported() {
        let options = vec![
            option("a", vec![Value::literal("x").with_when(vec![when_equal("b", "1")])]),
            option("b", vec![Value::literal("y").with_when(vec![when_equal("a", "1")])]),
        ];

        let result = resolve_options(&options, &HashMap::new(), &FakeHost::new());
        assert!(matches!(
            result,
            Err(RuskError::Config(ConfigError::CircularDependency(_)))
        ));
    }

    #[test]
    fn test_first_failure_aborts() {
        let options = vec![
            TaskOption {
                required: true,
                ..option("token", Vec::new())
            },
            option("other", vec![Value::literal("fine")]),
        ];

        let result = resolve_options(&options, &HashMap::new(), &FakeHost::new());
        assert!(matches!(
            result,
            Err(RuskError::Execution(ExecutionError::MissingOption(_)))
        ));
    }
}
