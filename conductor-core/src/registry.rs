//! In-memory task registry.
//!
//! Populated once at startup (usually by `conductor_tasks::build_registry`)
//! and only read afterwards. Names are kept in a `BTreeMap` so every
//! enumeration is sorted and reproducible.

use std::collections::BTreeMap;
use std::fmt;

use crate::action::Action;
use crate::error::RegistryError;
use crate::types::TaskName;

// ---------------------------------------------------------------------------
// Task
// ---------------------------------------------------------------------------

/// A registered task: an alias over other names, or a concrete action.
pub enum Task {
    /// No action of its own; expands to `members` in declared order.
    Alias {
        members: Vec<TaskName>,
        description: Option<String>,
    },
    /// Runs `action` after every name in `deps` has run.
    Concrete {
        action: Box<dyn Action>,
        deps: Vec<TaskName>,
        description: Option<String>,
    },
}

impl Task {
    /// Alias over `members`.
    pub fn alias<I, N>(members: I) -> Self
    where
        I: IntoIterator<Item = N>,
        N: Into<TaskName>,
    {
        Task::Alias {
            members: members.into_iter().map(Into::into).collect(),
            description: None,
        }
    }

    /// Concrete task with no prerequisites.
    pub fn action(action: impl Action + 'static) -> Self {
        Task::Concrete {
            action: Box::new(action),
            deps: vec![],
            description: None,
        }
    }

    /// Replace the prerequisite list of a concrete task; no-op for aliases.
    pub fn with_deps<I, N>(mut self, new_deps: I) -> Self
    where
        I: IntoIterator<Item = N>,
        N: Into<TaskName>,
    {
        if let Task::Concrete { deps, .. } = &mut self {
            *deps = new_deps.into_iter().map(Into::into).collect();
        }
        self
    }

    pub fn with_description(mut self, text: impl Into<String>) -> Self {
        match &mut self {
            Task::Alias { description, .. } | Task::Concrete { description, .. } => {
                *description = Some(text.into());
            }
        }
        self
    }

    pub fn is_alias(&self) -> bool {
        matches!(self, Task::Alias { .. })
    }

    pub fn description(&self) -> Option<&str> {
        match self {
            Task::Alias { description, .. } | Task::Concrete { description, .. } => {
                description.as_deref()
            }
        }
    }

    /// Every name this task refers to: alias members, or prerequisites.
    pub fn references(&self) -> &[TaskName] {
        match self {
            Task::Alias { members, .. } => members,
            Task::Concrete { deps, .. } => deps,
        }
    }

    /// Kind label for listings: `alias`, or the action's own kind.
    pub fn kind(&self) -> &str {
        match self {
            Task::Alias { .. } => "alias",
            Task::Concrete { action, .. } => action.kind(),
        }
    }
}

impl fmt::Debug for Task {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Task::Alias { members, .. } => f.debug_struct("Alias").field("members", members).finish(),
            Task::Concrete { action, deps, .. } => f
                .debug_struct("Concrete")
                .field("action", &action.describe())
                .field("deps", deps)
                .finish(),
        }
    }
}

// ---------------------------------------------------------------------------
// Registry
// ---------------------------------------------------------------------------

/// Mapping from task name to [`Task`].
#[derive(Debug, Default)]
pub struct Registry {
    tasks: BTreeMap<TaskName, Task>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `task` under `name`.
    ///
    /// Returns [`RegistryError::DuplicateTask`] if `name` is taken; the
    /// existing entry is left untouched.
    pub fn register(&mut self, name: impl Into<TaskName>, task: Task) -> Result<(), RegistryError> {
        let name = name.into();
        if self.tasks.contains_key(&name) {
            return Err(RegistryError::DuplicateTask { name });
        }
        tracing::debug!(task = %name, kind = task.kind(), "registered task");
        self.tasks.insert(name, task);
        Ok(())
    }

    /// Look up `name`, failing with [`RegistryError::UnknownTask`].
    pub fn resolve(&self, name: &str) -> Result<&Task, RegistryError> {
        self.tasks.get(name).ok_or_else(|| RegistryError::UnknownTask {
            name: TaskName::from(name),
        })
    }

    pub fn contains(&self, name: &str) -> bool {
        self.tasks.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Sorted registered names.
    pub fn names(&self) -> impl Iterator<Item = &TaskName> {
        self.tasks.keys()
    }

    /// Sorted `(name, task)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (&TaskName, &Task)> {
        self.tasks.iter()
    }

    /// Check that every alias member and prerequisite is registered.
    ///
    /// Reports the first missing reference in name order.
    pub fn validate(&self) -> Result<(), RegistryError> {
        for (name, task) in &self.tasks {
            if let Some(missing) = task.references().iter().find(|r| !self.contains(r.as_str())) {
                return Err(RegistryError::MissingReference {
                    task: name.clone(),
                    missing: missing.clone(),
                });
            }
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
