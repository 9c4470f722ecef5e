//! `conductor check`: load the manifest and validate every task.
//!
//! Building the registry already rejects bad options, dangling references
//! and template errors. On top of that, every registered name is expanded so
//! cycles show up without having to run the task that reaches them.

use anyhow::{bail, Result};
use clap::Args;
use colored::Colorize;

use conductor_core::Registry;
use conductor_runner::{expand, RunError};

use super::load_project;
use crate::GlobalArgs;

/// Arguments for `conductor check`.
#[derive(Args, Debug)]
pub struct CheckArgs {}

impl CheckArgs {
    pub fn run(self, global: &GlobalArgs) -> Result<()> {
        let project = load_project(global)?;
        let problems = expansion_problems(&project.registry);

        if problems.is_empty() {
            if !global.quiet {
                println!(
                    "{} {} tasks OK ({})",
                    "✓".green().bold(),
                    project.registry.len(),
                    project.root().display()
                );
            }
            return Ok(());
        }

        for (name, err) in &problems {
            eprintln!("{} {}: {}", "✗".red().bold(), name, err);
        }
        bail!("{} task(s) cannot be planned", problems.len());
    }
}

/// Names whose expansion fails, with the error. An error already reported
/// under an earlier name (in sorted order) is not repeated.
fn expansion_problems(registry: &Registry) -> Vec<(String, RunError)> {
    let mut problems: Vec<(String, RunError)> = Vec::new();
    for name in registry.names() {
        let Err(err) = expand(registry, name.as_str()) else {
            continue;
        };
        let duplicate = problems
            .iter()
            .any(|(_, seen)| seen.to_string() == err.to_string());
        if !duplicate {
            problems.push((name.to_string(), err));
        }
    }
    problems
}

#[cfg(test)]
mod tests {
    use super::*;
    use conductor_core::{from_fn, Task};

    #[test]
    fn healthy_registry_has_no_problems() {
        let mut reg = Registry::new();
        reg.register("lint", Task::action(from_fn(|_| Ok(())))).expect("lint");
        reg.register("default", Task::alias(["lint"])).expect("default");
        assert!(expansion_problems(&reg).is_empty());
    }

    #[test]
    fn identical_cycle_reported_once() {
        let mut reg = Registry::new();
        reg.register("a", Task::alias(["b"])).expect("a");
        reg.register("b", Task::alias(["a"])).expect("b");
        reg.register("c", Task::alias(["a"])).expect("c");

        let problems = expansion_problems(&reg);
        let names: Vec<&str> = problems.iter().map(|(n, _)| n.as_str()).collect();
        // a: a -> b -> a, b: b -> a -> b, c: a -> b -> a (same as a)
        assert_eq!(names, ["a", "b"]);
        assert!(matches!(problems[0].1, RunError::Cycle { .. }));
    }
}
