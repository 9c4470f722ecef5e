//! Sequential execution of an [`ExecutionPlan`].
//!
//! The plan is computed and validated before the first action starts, so an
//! unknown name or a cycle never leaves a half-finished run behind. Once
//! running, the first failing action ends the run; later steps are reported
//! as remaining and never started.

use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use serde::Serialize;

use conductor_core::{ActionContext, Registry, Task, TaskName};

use crate::error::RunError;
use crate::plan::{self, ExecutionPlan};

/// Per-run switches.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunOptions {
    /// Expand and validate, log each step, execute nothing.
    pub dry_run: bool,
}

/// Progress notifications, in order, for callers that print as they go.
#[derive(Debug, Clone, Copy)]
pub enum RunEvent<'a> {
    Started {
        task: &'a TaskName,
        position: usize,
        total: usize,
    },
    Finished {
        task: &'a TaskName,
        elapsed: Duration,
    },
    Failed {
        task: &'a TaskName,
        elapsed: Duration,
    },
    /// Dry-run only: `task` would have been executed.
    Skipped { task: &'a TaskName },
}

/// One executed step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StepRecord {
    pub task: TaskName,
    #[serde(serialize_with = "as_millis")]
    pub elapsed: Duration,
}

/// Result of a successful run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RunReport {
    pub target: TaskName,
    pub dry_run: bool,
    /// Executed steps in order; in a dry run, the steps that would run.
    pub steps: Vec<StepRecord>,
}

impl RunReport {
    pub fn executed(&self) -> Vec<&TaskName> {
        self.steps.iter().map(|s| &s.task).collect()
    }

    pub fn total_elapsed(&self) -> Duration {
        self.steps.iter().map(|s| s.elapsed).sum()
    }
}

fn millis(d: Duration) -> u64 {
    u64::try_from(d.as_millis()).unwrap_or(u64::MAX)
}

fn as_millis<S: serde::Serializer>(d: &Duration, s: S) -> Result<S::Ok, S::Error> {
    s.serialize_u64(millis(*d))
}

// ---------------------------------------------------------------------------
// Runner
// ---------------------------------------------------------------------------

/// Executes registry tasks for a project rooted at `root`.
///
/// The registry is borrowed read-only for the runner's lifetime.
pub struct Runner<'r> {
    registry: &'r Registry,
    root: PathBuf,
}

impl<'r> Runner<'r> {
    pub fn new(registry: &'r Registry, root: impl Into<PathBuf>) -> Self {
        Runner {
            registry,
            root: root.into(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Expand `name` without running anything.
    pub fn plan(&self, name: &str) -> Result<ExecutionPlan, RunError> {
        plan::expand(self.registry, name)
    }

    /// Plan and execute `name`.
    pub fn run(&self, name: &str) -> Result<RunReport, RunError> {
        self.run_with(name, RunOptions::default(), &mut |_| {})
    }

    /// Plan and execute `name`, reporting progress to `on_event`.
    pub fn run_with(
        &self,
        name: &str,
        options: RunOptions,
        on_event: &mut dyn FnMut(RunEvent<'_>),
    ) -> Result<RunReport, RunError> {
        let plan = self.plan(name)?;
        self.execute(&plan, options, on_event)
    }

    /// Execute an already-expanded plan.
    pub fn execute(
        &self,
        plan: &ExecutionPlan,
        options: RunOptions,
        on_event: &mut dyn FnMut(RunEvent<'_>),
    ) -> Result<RunReport, RunError> {
        let total = plan.len();
        let mut steps = Vec::with_capacity(total);
        tracing::info!(target = %plan.target, steps = total, dry_run = options.dry_run, "starting run");

        for (position, task_name) in plan.iter().enumerate() {
            if options.dry_run {
                tracing::info!(task = %task_name, step = position + 1, total, "[dry-run] would run");
                on_event(RunEvent::Skipped { task: task_name });
                steps.push(StepRecord {
                    task: task_name.clone(),
                    elapsed: Duration::ZERO,
                });
                continue;
            }

            let action = match self.registry.resolve(task_name.as_str()) {
                Ok(Task::Concrete { action, .. }) => action,
                // Only reachable for a plan expanded against another registry.
                _ => {
                    return Err(RunError::UnknownTask {
                        name: task_name.clone(),
                        referenced_by: Some(plan.target.clone()),
                    })
                }
            };

            tracing::info!(task = %task_name, step = position + 1, total, "running task");
            on_event(RunEvent::Started {
                task: task_name,
                position,
                total,
            });

            let started = Instant::now();
            let ctx = ActionContext {
                task: task_name,
                root: &self.root,
            };
            match action.execute(&ctx) {
                Ok(()) => {
                    let elapsed = started.elapsed();
                    tracing::info!(task = %task_name, elapsed_ms = millis(elapsed), "task finished");
                    on_event(RunEvent::Finished {
                        task: task_name,
                        elapsed,
                    });
                    steps.push(StepRecord {
                        task: task_name.clone(),
                        elapsed,
                    });
                }
                Err(source) => {
                    let elapsed = started.elapsed();
                    tracing::error!(task = %task_name, error = %source, step = position + 1, total, "task failed; halting run");
                    on_event(RunEvent::Failed {
                        task: task_name,
                        elapsed,
                    });
                    return Err(RunError::TaskExecution {
                        task: task_name.clone(),
                        position,
                        total,
                        remaining: plan.steps()[position + 1..].to_vec(),
                        source,
                    });
                }
            }
        }

        tracing::info!(target = %plan.target, executed = steps.len(), "run succeeded");
        Ok(RunReport {
            target: plan.target.clone(),
            dry_run: options.dry_run,
            steps,
        })
    }
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use conductor_core::{from_fn, ActionError};
    use std::sync::{Arc, Mutex};

    fn recording(log: &Arc<Mutex<Vec<String>>>, fail: bool) -> Task {
        let log = Arc::clone(log);
        Task::action(from_fn(move |ctx| {
            log.lock().expect("lock").push(ctx.task.to_string());
            if fail {
                Err(ActionError::Failed(format!("{} broke", ctx.task)))
            } else {
                Ok(())
            }
        }))
    }

    #[test]
    fn run_reports_executed_names_in_order() {
        let log = Arc::new(Mutex::new(vec![]));
        let mut reg = Registry::new();
        reg.register("compass", recording(&log, false)).expect("compass");
        reg.register("csslint", recording(&log, false).with_deps(["compass"])).expect("csslint");
        reg.register("dist", Task::alias(["csslint", "compass"])).expect("dist");

        let report = Runner::new(&reg, ".").run("dist").expect("run");
        let executed: Vec<&str> = report.executed().into_iter().map(TaskName::as_str).collect();
        assert_eq!(executed, ["compass", "csslint"]);
        assert_eq!(*log.lock().expect("lock"), ["compass", "csslint"]);
        assert!(!report.dry_run);
    }

    #[test]
    fn dry_run_executes_nothing() {
        let log = Arc::new(Mutex::new(vec![]));
        let mut reg = Registry::new();
        reg.register("compass", recording(&log, true)).expect("compass");

        let mut skipped = vec![];
        let report = Runner::new(&reg, ".")
            .run_with("compass", RunOptions { dry_run: true }, &mut |event| {
                if let RunEvent::Skipped { task } = event {
                    skipped.push(task.to_string());
                }
            })
            .expect("dry run");
        assert!(log.lock().expect("lock").is_empty());
        assert_eq!(skipped, ["compass"]);
        assert!(report.dry_run);
        assert_eq!(report.executed().len(), 1);
    }

    #[test]
    fn failure_message_has_position() {
        let log = Arc::new(Mutex::new(vec![]));
        let mut reg = Registry::new();
        reg.register("a", recording(&log, false)).expect("a");
        reg.register("b", recording(&log, true)).expect("b");
        reg.register("all", Task::alias(["a", "b"])).expect("all");

        let err = Runner::new(&reg, ".").run("all").unwrap_err();
        assert_eq!(err.to_string(), "task 'b' failed (step 2 of 2): b broke");
        assert_eq!(err.task().map(TaskName::as_str), Some("b"));
    }

    #[test]
    fn millis_saturates() {
        assert_eq!(millis(Duration::from_millis(1500)), 1500);
        assert_eq!(millis(Duration::MAX), u64::MAX);
    }

    #[test]
    fn plan_from_another_registry_names_the_step() {
        let mut other = Registry::new();
        other.register("lint", Task::action(from_fn(|_| Ok(())))).expect("lint");
        let plan = Runner::new(&other, ".").plan("lint").expect("plan");

        let mut reg = Registry::new();
        reg.register("lint", Task::alias(Vec::<TaskName>::new())).expect("lint");
        let err = Runner::new(&reg, ".")
            .execute(&plan, RunOptions::default(), &mut |_| {})
            .unwrap_err();
        assert_eq!(err.task().map(TaskName::as_str), Some("lint"));
    }

    #[test]
    fn report_serializes_elapsed_as_millis() {
        let report = RunReport {
            target: TaskName::from("dist"),
            dry_run: false,
            steps: vec![StepRecord {
                task: TaskName::from("compass"),
                elapsed: Duration::from_millis(1500),
            }],
        };
        let json = serde_json::to_value(&report).expect("json");
        assert_eq!(json["steps"][0]["elapsed"], 1500);
        assert_eq!(json["target"], "dist");
    }
}
