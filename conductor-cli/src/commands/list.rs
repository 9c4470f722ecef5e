//! `conductor list`: registered tasks.

use anyhow::{Context, Result};
use clap::Args;
use serde::Serialize;
use tabled::{settings::Style, Table, Tabled};

use conductor_core::{Registry, Task};

use super::load_project;
use crate::GlobalArgs;

/// Arguments for `conductor list`.
#[derive(Args, Debug)]
pub struct ListArgs {
    /// Emit machine-readable JSON.
    #[arg(long)]
    pub json: bool,
}

#[derive(Serialize)]
struct TaskJson<'a> {
    name: &'a str,
    kind: &'a str,
    alias: bool,
    references: Vec<&'a str>,
    description: Option<&'a str>,
}

#[derive(Tabled)]
struct TaskRow {
    #[tabled(rename = "task")]
    name: String,
    #[tabled(rename = "kind")]
    kind: String,
    #[tabled(rename = "runs")]
    references: String,
    #[tabled(rename = "description")]
    description: String,
}

impl ListArgs {
    pub fn run(self, global: &GlobalArgs) -> Result<()> {
        let project = load_project(global)?;

        if self.json {
            println!(
                "{}",
                serde_json::to_string_pretty(&to_json(&project.registry))
                    .context("failed to serialize task list JSON")?
            );
            return Ok(());
        }

        if project.registry.is_empty() {
            println!("No tasks defined in {}.", project.root().display());
            return Ok(());
        }
        let mut table = Table::new(to_rows(&project.registry));
        table.with(Style::rounded());
        println!("{table}");
        Ok(())
    }
}

fn to_json(registry: &Registry) -> Vec<TaskJson<'_>> {
    registry
        .iter()
        .map(|(name, task)| TaskJson {
            name: name.as_str(),
            kind: task.kind(),
            alias: task.is_alias(),
            references: task.references().iter().map(|r| r.as_str()).collect(),
            description: task.description(),
        })
        .collect()
}

fn to_rows(registry: &Registry) -> Vec<TaskRow> {
    registry
        .iter()
        .map(|(name, task)| TaskRow {
            name: name.to_string(),
            kind: task.kind().to_string(),
            references: references_label(task),
            description: task.description().unwrap_or_default().to_string(),
        })
        .collect()
}

fn references_label(task: &Task) -> String {
    let names: Vec<&str> = task.references().iter().map(|r| r.as_str()).collect();
    match task {
        Task::Alias { .. } => names.join(", "),
        Task::Concrete { .. } if names.is_empty() => String::new(),
        Task::Concrete { .. } => format!("after {}", names.join(", ")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use conductor_core::from_fn;

    fn registry() -> Registry {
        let mut reg = Registry::new();
        reg.register("lint", Task::action(from_fn(|_| Ok(())))).expect("lint");
        reg.register("build", Task::action(from_fn(|_| Ok(()))).with_deps(["lint"]))
            .expect("build");
        reg.register("default", Task::alias(["build"]).with_description("Everything"))
            .expect("default");
        reg
    }

    #[test]
    fn rows_are_sorted_and_labelled() {
        let rows = to_rows(&registry());
        let names: Vec<&str> = rows.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, ["build", "default", "lint"]);
        assert_eq!(rows[0].references, "after lint");
        assert_eq!(rows[1].references, "build");
        assert_eq!(rows[1].description, "Everything");
        assert_eq!(rows[2].references, "");
    }

    #[test]
    fn json_marks_aliases() {
        let reg = registry();
        let json = serde_json::to_value(to_json(&reg)).expect("json");
        assert_eq!(json[1]["name"], "default");
        assert_eq!(json[1]["alias"], true);
        assert_eq!(json[0]["references"][0], "lint");
    }
}
