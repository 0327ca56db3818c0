//! When condition evaluation
//!
//! Guards compare other options' resolved values. A variable missing from the
//! map compares as the empty string.

use crate::config::When;
use std::collections::HashMap;

/// Evaluate a list of when conditions (all must be true - AND logic)
pub fn evaluate_when_list(when_list: &[When], vars: &HashMap<String, String>) -> bool {
    when_list.iter().all(|when| evaluate_when(when, vars))
}

/// Evaluate a single when condition
pub fn evaluate_when(when: &When, vars: &HashMap<String, String>) -> bool {
    let lookup = |name: &str| vars.get(name).map(String::as_str).unwrap_or("");

    let equal = when
        .equal
        .iter()
        .all(|(name, expected)| expected.iter().any(|e| e == lookup(name)));

    let not_equal = when
        .not_equal
        .iter()
        .all(|(name, forbidden)| forbidden.iter().all(|f| f != lookup(name)));

    equal && not_equal
}

/// Variables a guard reads
pub fn when_dependencies(when_list: &[When]) -> impl Iterator<Item = &String> {
    when_list
        .iter()
        .flat_map(|when| when.equal.keys().chain(when.not_equal.keys()))
}
