//! Error types for conductor-runner.

use thiserror::Error;

use conductor_core::{ActionError, TaskName};

/// Everything that can stop a run. All variants are terminal: nothing is
/// retried and already-executed tasks are not undone.
#[derive(Debug, Error)]
pub enum RunError {
    /// A name reached during expansion is not registered.
    #[error("unknown task '{name}'{}", referenced_by_suffix(.referenced_by))]
    UnknownTask {
        name: TaskName,
        /// The task whose alias list or prerequisites named it, if any.
        referenced_by: Option<TaskName>,
    },

    /// Expansion reached a task that is already being expanded.
    #[error("dependency cycle: {}", join_path(.path))]
    Cycle {
        /// The cycle, first and last entries equal (`a -> b -> a`).
        path: Vec<TaskName>,
    },

    /// A concrete task's action failed; later tasks were not started.
    #[error("task '{task}' failed (step {} of {total}): {source}", .position + 1)]
    TaskExecution {
        task: TaskName,
        /// Zero-based index of `task` in the plan.
        position: usize,
        total: usize,
        /// Plan entries after `task` that never ran.
        remaining: Vec<TaskName>,
        #[source]
        source: ActionError,
    },
}

impl RunError {
    /// The task a user should look at first.
    pub fn task(&self) -> Option<&TaskName> {
        match self {
            RunError::UnknownTask { name, .. } => Some(name),
            RunError::Cycle { path } => path.first(),
            RunError::TaskExecution { task, .. } => Some(task),
        }
    }
}

fn referenced_by_suffix(parent: &Option<TaskName>) -> String {
    match parent {
        Some(parent) => format!(" (referenced by '{parent}')"),
        None => String::new(),
    }
}

fn join_path(path: &[TaskName]) -> String {
    path.iter()
        .map(TaskName::as_str)
        .collect::<Vec<_>>()
        .join(" -> ")
}
