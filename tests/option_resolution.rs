//! Integration tests for option resolution against the real process

mod common;

use rusk_options::config::{parse_config, Value};
use rusk_options::error::{ExecutionError, RuskError};
use rusk_options::runner::{Context, Task, TaskOption};
use serial_test::serial;
use std::collections::HashMap;
use std::env;
use std::path::PathBuf;

fn task_from(yaml: &str, name: &str) -> Task {
    let config = parse_config(yaml).unwrap();
    Task::from_config(name.to_string(), config.task(name).unwrap().clone()).unwrap()
}

#[test]
#[serial]
fn test_environment_beats_defaults() {
    env::set_var("RUSK_OPTIONS_TEST_ENV", "from_env");

    let option = TaskOption {
        environment: Some("RUSK_OPTIONS_TEST_ENV".to_string()),
        default_values: vec![Value::literal("default")],
        ..TaskOption::default()
    };
    let result = option.evaluate(&HashMap::new());

    env::remove_var("RUSK_OPTIONS_TEST_ENV");
    assert_eq!(result.unwrap(), "from_env");
}

#[test]
#[serial]
fn test_passed_beats_environment() {
    env::set_var("RUSK_OPTIONS_TEST_ENV", "from_env");

    let option = TaskOption {
        environment: Some("RUSK_OPTIONS_TEST_ENV".to_string()),
        passed: Some("passed".to_string()),
        ..TaskOption::default()
    };
    let result = option.evaluate(&HashMap::new());

    env::remove_var("RUSK_OPTIONS_TEST_ENV");
    assert_eq!(result.unwrap(), "passed");
}

#[test]
#[serial]
fn test_required_satisfied_by_environment() {
    env::set_var("RUSK_OPTIONS_TEST_TOKEN", "secret");

    let option = TaskOption {
        name: "token".to_string(),
        required: true,
        environment: Some("RUSK_OPTIONS_TEST_TOKEN".to_string()),
        ..TaskOption::default()
    };
    let result = option.evaluate(&HashMap::new());

    env::remove_var("RUSK_OPTIONS_TEST_TOKEN");
    assert_eq!(result.unwrap(), "secret");
}

#[test]
#[serial]
fn test_required_missing() {
    env::remove_var("RUSK_OPTIONS_TEST_TOKEN");

    let option = TaskOption {
        name: "token".to_string(),
        required: true,
        environment: Some("RUSK_OPTIONS_TEST_TOKEN".to_string()),
        ..TaskOption::default()
    };
    assert_eq!(
        option.evaluate(&HashMap::new()),
        Err(ExecutionError::MissingOption("token".to_string()))
    );
}

#[test]
fn test_command_default_runs_in_config_dir() {
    let (dir, config_path) = common::create_test_config("tasks: {}\n");
    std::fs::write(dir.path().join("VERSION"), "1.2.3\n").unwrap();

    let option = TaskOption {
        default_values: vec![Value::command("cat VERSION")],
        ..TaskOption::default()
    };
    let ctx = Context::new()
        .with_config_path(config_path)
        .with_working_dir(PathBuf::from(dir.path()));

    assert_eq!(option.evaluate_with(&HashMap::new(), &ctx).unwrap(), "1.2.3");
}

#[test]
fn test_command_failure_aborts_resolution() {
    let task = task_from(
        r#"
tasks:
  fail:
    options:
      broken:
        default:
          command: "echo nope >&2; exit 4"
"#,
        "fail",
    );

    let result = task.resolve(&HashMap::new(), &Context::new());
    match result {
        Err(RuskError::Execution(ExecutionError::CommandFailed { code, stderr, .. })) => {
            assert_eq!(code, Some(4));
            assert_eq!(stderr, "nope");
        }
        other => panic!("expected command failure, got {:?}", other),
    }
}

#[test]
fn test_task_resolution_with_dependencies() {
    let mut task = task_from(
        r#"
tasks:
  build:
    options:
      profile:
        values: [debug, release]
        default:
          - when:
              equal: {release: "true"}
            value: release
          - debug
      release:
        type: bool
      jobs:
        type: integer
      arch:
        default:
          command: echo x86_64
"#,
        "build",
    );

    let resolved = task.resolve(&HashMap::new(), &Context::new()).unwrap();
    assert_eq!(
        resolved,
        vec![
            ("profile".to_string(), "debug".to_string()),
            ("release".to_string(), "false".to_string()),
            ("jobs".to_string(), "0".to_string()),
            ("arch".to_string(), "x86_64".to_string()),
        ]
    );

    task.set_passed("release", "true".to_string()).unwrap();
    let resolved = task.resolve(&HashMap::new(), &Context::new()).unwrap();
    assert_eq!(resolved[0], ("profile".to_string(), "release".to_string()));
}
