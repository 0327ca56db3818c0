use colored::Colorize;
use rusk_options::error::{is_invocation_error, RuskError};
use std::process;

fn main() {
    if let Err(e) = rusk_options::cli::run() {
        eprintln!("{} {:#}", "Error:".red().bold(), e);
        if e.downcast_ref::<RuskError>().is_some_and(is_invocation_error) {
            eprintln!("Run with --help to see the task's options.");
        }
        process::exit(1);
    }
}
