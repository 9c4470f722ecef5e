//! Plan expansion.
//!
//! `expand` walks the registry depth-first from the requested name:
//!
//! - an alias visits its members in declared order and emits nothing itself;
//! - a concrete task visits its prerequisites, then emits its own name;
//! - a name that was already expanded during this walk is skipped, so the
//!   first occurrence wins.
//!
//! A name met again while it is still on the walk stack is a cycle. Unknown
//! names and cycles are reported before anything runs.

use std::collections::HashSet;

use serde::Serialize;

use conductor_core::{Registry, TaskName};

use crate::error::RunError;

/// The ordered concrete tasks a run of `target` executes.
///
/// Only [`expand`] builds plans, so every step is a concrete task of the
/// registry it was expanded against.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExecutionPlan {
    pub target: TaskName,
    steps: Vec<TaskName>,
}

impl ExecutionPlan {
    pub fn steps(&self) -> &[TaskName] {
        &self.steps
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &TaskName> {
        self.steps.iter()
    }
}

/// Expand `target` into an [`ExecutionPlan`].
pub fn expand(registry: &Registry, target: &str) -> Result<ExecutionPlan, RunError> {
    let target = TaskName::from(target);
    let mut walk = Walk {
        registry,
        stack: Vec::new(),
        expanded: HashSet::new(),
        steps: Vec::new(),
    };
    walk.visit(&target, None)?;
    tracing::debug!(target = %target, steps = walk.steps.len(), "expanded plan");
    Ok(ExecutionPlan {
        target,
        steps: walk.steps,
    })
}

struct Walk<'r> {
    registry: &'r Registry,
    stack: Vec<TaskName>,
    expanded: HashSet<TaskName>,
    steps: Vec<TaskName>,
}

impl Walk<'_> {
    fn visit(&mut self, name: &TaskName, parent: Option<&TaskName>) -> Result<(), RunError> {
        if let Some(start) = self.stack.iter().position(|n| n == name) {
            let mut path = self.stack[start..].to_vec();
            path.push(name.clone());
            return Err(RunError::Cycle { path });
        }
        if self.expanded.contains(name) {
            return Ok(());
        }

        let registry = self.registry;
        let task = registry
            .resolve(name.as_str())
            .map_err(|_| RunError::UnknownTask {
                name: name.clone(),
                referenced_by: parent.cloned(),
            })?;

        self.stack.push(name.clone());
        for reference in task.references() {
            self.visit(reference, Some(name))?;
        }
        self.stack.pop();

        self.expanded.insert(name.clone());
        if !task.is_alias() {
            self.steps.push(name.clone());
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use conductor_core::{from_fn, Task};

    fn noop() -> Task {
        Task::action(from_fn(|_| Ok(())))
    }

    fn names(plan: &ExecutionPlan) -> Vec<&str> {
        plan.iter().map(TaskName::as_str).collect()
    }

    #[test]
    fn alias_over_alias_dedupes_to_first_occurrence() {
        let mut reg = Registry::new();
        reg.register("lint", noop()).expect("lint");
        reg.register("build", Task::alias(["lint"])).expect("build");
        reg.register("test", Task::alias(["build", "lint"])).expect("test");

        let plan = expand(&reg, "test").expect("plan");
        assert_eq!(names(&plan), ["lint"]);
        assert_eq!(plan.target.as_str(), "test");
    }

    #[test]
    fn prerequisites_run_before_the_task() {
        let mut reg = Registry::new();
        reg.register("lint", noop()).expect("lint");
        reg.register("build", noop().with_deps(["lint"])).expect("build");
        reg.register("test", Task::alias(["build", "lint"])).expect("test");

        assert_eq!(names(&expand(&reg, "test").expect("plan")), ["lint", "build"]);
    }

    #[test]
    fn concrete_target_alone() {
        let mut reg = Registry::new();
        reg.register("lint", noop()).expect("lint");
        assert_eq!(names(&expand(&reg, "lint").expect("plan")), ["lint"]);
    }

    #[test]
    fn self_reference_is_a_cycle() {
        let mut reg = Registry::new();
        reg.register("loop", Task::alias(["loop"])).expect("loop");
        let err = expand(&reg, "loop").unwrap_err();
        assert_eq!(err.to_string(), "dependency cycle: loop -> loop");
    }

    #[test]
    fn unknown_root_has_no_parent() {
        let reg = Registry::new();
        let err = expand(&reg, "default").unwrap_err();
        assert_eq!(err.to_string(), "unknown task 'default'");
    }
}
