//! `conductor plan`: print what a run would execute.

use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;

use conductor_runner::Runner;

use super::{load_project, DEFAULT_TASK};
use crate::GlobalArgs;

/// Arguments for `conductor plan`.
#[derive(Args, Debug)]
pub struct PlanArgs {
    /// Task to expand.
    #[arg(default_value = DEFAULT_TASK)]
    pub task: String,

    /// Emit machine-readable JSON.
    #[arg(long)]
    pub json: bool,
}

impl PlanArgs {
    pub fn run(self, global: &GlobalArgs) -> Result<()> {
        let project = load_project(global)?;
        let plan = Runner::new(&project.registry, project.root()).plan(&self.task)?;

        if self.json {
            println!(
                "{}",
                serde_json::to_string_pretty(&plan).context("failed to serialize plan JSON")?
            );
            return Ok(());
        }

        if plan.is_empty() {
            println!("'{}' expands to no tasks.", plan.target);
            return Ok(());
        }
        println!("{} ({} tasks)", plan.target.as_str().bold(), plan.len());
        for (i, step) in plan.iter().enumerate() {
            let kind = project
                .registry
                .resolve(step.as_str())
                .map(|task| task.kind().to_string())
                .unwrap_or_default();
            println!("  {:>2}. {} {}", i + 1, step, kind.bright_black());
        }
        Ok(())
    }
}
