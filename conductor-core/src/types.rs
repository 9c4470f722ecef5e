//! Domain types shared by the manifest, the registry and the runner.

use std::borrow::Borrow;
use std::fmt;

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Newtypes
// ---------------------------------------------------------------------------

/// A strongly-typed task name.
///
/// Target-qualified names use `task:target` (e.g. `csslint:strict`); bare
/// names in a manifest must not contain the separator.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskName(pub String);

impl TaskName {
    /// Separator between a task and one of its targets.
    pub const TARGET_SEPARATOR: char = ':';

    /// `task:target`.
    pub fn qualified(task: &TaskName, target: &str) -> Self {
        Self(format!("{}{}{}", task.0, Self::TARGET_SEPARATOR, target))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// `true` for `task:target` names.
    pub fn is_qualified(&self) -> bool {
        self.0.contains(Self::TARGET_SEPARATOR)
    }
}

impl fmt::Display for TaskName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<String> for TaskName {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for TaskName {
    fn from(s: &str) -> Self {
        Self(s.to_owned())
    }
}

impl From<&TaskName> for TaskName {
    fn from(n: &TaskName) -> Self {
        n.clone()
    }
}

impl Borrow<str> for TaskName {
    fn borrow(&self) -> &str {
        &self.0
    }
}

// ---------------------------------------------------------------------------
// Enums
// ---------------------------------------------------------------------------

/// The external tool a concrete manifest task delegates to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActionKind {
    /// Arbitrary program with arguments.
    Command,
    /// Sass → CSS through `compass compile`.
    Compass,
    /// CSS lint.
    Csslint,
    /// JavaScript lint.
    Jshint,
    /// API documentation.
    Yuidoc,
    /// RequireJS optimizer (`r.js -o`).
    Requirejs,
}

impl fmt::Display for ActionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ActionKind::Command => write!(f, "command"),
            ActionKind::Compass => write!(f, "compass"),
            ActionKind::Csslint => write!(f, "csslint"),
            ActionKind::Jshint => write!(f, "jshint"),
            ActionKind::Yuidoc => write!(f, "yuidoc"),
            ActionKind::Requirejs => write!(f, "requirejs"),
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
