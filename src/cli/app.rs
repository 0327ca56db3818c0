//! Main CLI application

use crate::config::{parse_config_auto, parse_config_file, validate_config, Config};
use crate::error::{ConfigError, ConfigResult, RuskError};
use crate::runner::{Context, OptionType, Task, TaskOption};
use anyhow::Context as _;
use clap::{Arg, ArgAction, ArgMatches, Command};
use log::LevelFilter;
use std::collections::HashMap;
use std::io::{self, Write};
use std::path::PathBuf;

/// CLI application
pub struct App {
    /// The clap command
    command: Command,
    /// Parsed configuration
    config: Config,
    /// Tasks built from the configuration, in declaration order
    tasks: Vec<Task>,
    /// Config file path
    config_path: PathBuf,
}

/// Verbosity levels for output
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Verbosity {
    Quiet,
    Normal,
    Verbose,
}

impl Verbosity {
    /// Log level used when `RUST_LOG` does not say otherwise
    pub fn level_filter(self) -> LevelFilter {
        match self {
            Verbosity::Quiet => LevelFilter::Error,
            Verbosity::Normal => LevelFilter::Warn,
            Verbosity::Verbose => LevelFilter::Debug,
        }
    }
}

impl App {
    /// Create a new app from configuration file
    pub fn new() -> Result<Self, RuskError> {
        let (config, config_path) = parse_config_auto()?;
        Self::from_config(config, config_path)
    }

    /// Create app with a specific config file
    pub fn with_config_file(path: PathBuf) -> Result<Self, RuskError> {
        let config = parse_config_file(&path)?;
        Self::from_config(config, path)
    }

    fn from_config(config: Config, config_path: PathBuf) -> Result<Self, RuskError> {
        validate_config(&config)?;

        let tasks = config
            .tasks
            .iter()
            .map(|(name, task)| Task::from_config(name.clone(), task.clone()))
            .collect::<ConfigResult<Vec<_>>>()?;
        let command = build_command(&config, &tasks);

        Ok(App {
            command,
            config,
            tasks,
            config_path,
        })
    }

    /// Resolve the selected task's options and print them
    pub fn run(self, args: &[String]) -> Result<(), RuskError> {
        let mut command = self.command.clone();
        let matches = command.clone().get_matches_from(args);

        let (task_name, task_matches) = match matches.subcommand() {
            Some((name, sub_matches)) => (name.to_string(), sub_matches),
            None => {
                // No task specified, show help
                command.print_help()?;
                println!();
                return Ok(());
            }
        };

        let mut task = self
            .tasks
            .iter()
            .find(|task| task.name == task_name)
            .cloned()
            .ok_or_else(|| ConfigError::TaskNotFound(task_name.clone()))?;

        for (name, value) in passed_values(&task, task_matches) {
            task.set_passed(&name, value)?;
        }

        // Command defaults run next to the task file
        let mut ctx = Context::new().with_config_path(self.config_path.clone());
        let config_dir = ctx.config_dir();
        ctx = ctx.with_working_dir(config_dir);

        if let Some(interpreter) = &self.config.interpreter {
            ctx = ctx.with_interpreter(interpreter.clone());
        }

        let resolved = task.resolve(&HashMap::new(), &ctx)?;

        let stdout = io::stdout();
        let mut out = stdout.lock();
        for (name, value) in resolved {
            writeln!(out, "{}={}", name, value)?;
        }

        Ok(())
    }
}

/// Build the clap command from configuration
fn build_command(config: &Config, tasks: &[Task]) -> Command {
    let mut cmd = Command::new(
        config
            .name
            .clone()
            .unwrap_or_else(|| env!("CARGO_PKG_NAME").to_string()),
    )
    .version(env!("CARGO_PKG_VERSION"))
    .about(
        config
            .usage
            .clone()
            .unwrap_or_else(|| "Resolve task options from a rusk.yml file".to_string()),
    )
    .arg(
        Arg::new("file")
            .short('f')
            .long("file")
            .value_name("FILE")
            .help("Path to rusk.yml config file")
            .global(true),
    )
    .arg(
        Arg::new("quiet")
            .short('q')
            .long("quiet")
            .help("Only print errors")
            .action(ArgAction::SetTrue)
            .global(true),
    )
    .arg(
        Arg::new("verbose")
            .short('v')
            .long("verbose")
            .help("Print debug output")
            .action(ArgAction::SetTrue)
            .global(true),
    );

    // Add subcommands for each task, in declaration order
    for task in tasks.iter().filter(|task| !task.private) {
        let mut task_cmd =
            Command::new(task.name.clone()).about(task.usage.clone().unwrap_or_default());

        if let Some(desc) = &task.description {
            task_cmd = task_cmd.long_about(desc.clone());
        }

        for option in task.options.iter().filter(|option| !option.private) {
            task_cmd = task_cmd.arg(option_arg(option));
        }

        cmd = cmd.subcommand(task_cmd);
    }

    cmd
}

/// The flag for one public option
fn option_arg(option: &TaskOption) -> Arg {
    let mut help = option
        .usage
        .clone()
        .unwrap_or_else(|| format!("Option: {}", option.name));
    if !option.values_allowed.is_empty() {
        help = format!("{} [values: {}]", help, option.values_allowed.join(", "));
    }
    if let Some(env_var) = &option.environment {
        help = format!("{} [env: {}]", help, env_var);
    }

    let mut arg = Arg::new(option.name.clone())
        .long(option.name.clone())
        .help(help);

    if let Some(short) = option.short {
        arg = arg.short(short);
    }

    // Defaults and required checks belong to the resolver, not clap
    match option.option_type {
        OptionType::Bool => arg.action(ArgAction::SetTrue),
        _ => arg
            .value_name(option.name.to_uppercase())
            .action(ArgAction::Set),
    }
}

/// Values given on the command line for a task's public options
fn passed_values(task: &Task, matches: &ArgMatches) -> Vec<(String, String)> {
    let mut passed = Vec::new();

    for option in task.options.iter().filter(|o| !o.private) {
        match option.option_type {
            OptionType::Bool => {
                if matches.get_flag(&option.name) {
                    passed.push((option.name.clone(), "true".to_string()));
                }
            }
            _ => {
                if let Some(value) = matches.get_one::<String>(&option.name) {
                    passed.push((option.name.clone(), value.clone()));
                }
            }
        }
    }

    passed
}

/// Arguments before a `--` terminator, the only ones clap reads as flags
fn flag_args(args: &[String]) -> &[String] {
    let end = args.iter().position(|arg| arg == "--").unwrap_or(args.len());
    &args[..end]
}

/// Verbosity requested on the command line, before clap has parsed it
fn extract_verbosity(args: &[String]) -> Verbosity {
    let mut verbosity = Verbosity::Normal;
    for arg in flag_args(args).iter().skip(1) {
        match arg.as_str() {
            "-q" | "--quiet" => verbosity = Verbosity::Quiet,
            "-v" | "--verbose" => verbosity = Verbosity::Verbose,
            _ => {}
        }
    }
    verbosity
}

/// Extract --file argument before clap parsing
fn extract_file_arg(args: &[String]) -> Option<PathBuf> {
    flag_args(args)
        .windows(2)
        .find(|pair| pair[0] == "--file" || pair[0] == "-f")
        .map(|pair| PathBuf::from(&pair[1]))
}

fn init_logging(verbosity: Verbosity) {
    // A logger may already be installed when embedded
    let _ = env_logger::Builder::new()
        .filter_level(verbosity.level_filter())
        .parse_default_env()
        .format_timestamp(None)
        .try_init();
}

/// Run the CLI application with the process arguments
pub fn run() -> anyhow::Result<()> {
    let args: Vec<String> = std::env::args().collect();
    run_with_args(&args)
}

/// Run the CLI application with provided arguments
pub fn run_with_args(args: &[String]) -> anyhow::Result<()> {
    init_logging(extract_verbosity(args));

    let app = match extract_file_arg(args) {
        Some(path) => App::with_config_file(path.clone())
            .with_context(|| format!("Failed to load {}", path.display()))?,
        None => App::new()?,
    };

    app.run(args)?;
    Ok(())
}
