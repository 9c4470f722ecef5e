//! `conductor run`: execute a task.

use std::time::Duration;

use anyhow::Result;
use clap::Args;
use colored::Colorize;

use conductor_runner::{RunError, RunEvent, RunOptions, Runner};

use super::{load_project, DEFAULT_TASK};
use crate::GlobalArgs;

/// Arguments for `conductor run`.
#[derive(Args, Debug)]
pub struct RunArgs {
    /// Task to run.
    #[arg(default_value = DEFAULT_TASK)]
    pub task: String,

    /// Expand and validate the plan, print it, execute nothing.
    #[arg(long)]
    pub dry_run: bool,
}

impl RunArgs {
    pub fn run(self, global: &GlobalArgs) -> Result<()> {
        let project = load_project(global)?;
        let runner = Runner::new(&project.registry, project.root());
        let options = RunOptions {
            dry_run: self.dry_run,
        };
        let quiet = global.quiet;
        let prefix = if self.dry_run { "[dry-run] " } else { "" };

        let result = runner.run_with(&self.task, options, &mut |event| {
            if !quiet {
                print_event(prefix, event);
            }
        });

        match result {
            Ok(report) => {
                if !quiet {
                    println!(
                        "{prefix}{} '{}' ({} tasks, {})",
                        "✓".green().bold(),
                        report.target,
                        report.steps.len(),
                        format_elapsed(report.total_elapsed()),
                    );
                }
                Ok(())
            }
            Err(err) => {
                if let RunError::TaskExecution { task, remaining, .. } = &err {
                    eprintln!("{} '{}' failed", "✗".red().bold(), task);
                    if !remaining.is_empty() {
                        let names: Vec<&str> = remaining.iter().map(|n| n.as_str()).collect();
                        eprintln!("  not run: {}", names.join(", "));
                    }
                }
                Err(err.into())
            }
        }
    }
}

fn print_event(prefix: &str, event: RunEvent<'_>) {
    match event {
        RunEvent::Started {
            task,
            position,
            total,
        } => println!("{prefix}{} {} ({}/{})", "▸".cyan(), task.as_str().bold(), position + 1, total),
        RunEvent::Finished { task, elapsed } => {
            println!("{prefix}  {} {} {}", "✓".green(), task, format_elapsed(elapsed).bright_black())
        }
        RunEvent::Failed { task, elapsed } => {
            println!("{prefix}  {} {} {}", "✗".red(), task, format_elapsed(elapsed).bright_black())
        }
        RunEvent::Skipped { task } => println!("{prefix}{} {}", "~".yellow(), task),
    }
}

fn format_elapsed(elapsed: Duration) -> String {
    if elapsed.as_secs() >= 1 {
        format!("{:.2}s", elapsed.as_secs_f64())
    } else {
        format!("{}ms", elapsed.as_millis())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn elapsed_switches_units_at_one_second() {
        assert_eq!(format_elapsed(Duration::from_millis(250)), "250ms");
        assert_eq!(format_elapsed(Duration::from_millis(1500)), "1.50s");
    }
}
