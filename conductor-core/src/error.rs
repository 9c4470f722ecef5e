//! Error types for conductor-core.

use std::path::PathBuf;

use thiserror::Error;

use crate::types::TaskName;

/// Errors raised while populating or querying a [`Registry`](crate::Registry).
#[derive(Debug, Error)]
pub enum RegistryError {
    /// A task with this name is already registered.
    #[error("task '{name}' is already registered")]
    DuplicateTask { name: TaskName },

    /// The requested task is not registered.
    #[error("unknown task '{name}'")]
    UnknownTask { name: TaskName },

    /// A registered task references a name that was never registered.
    #[error("task '{task}' references unknown task '{missing}'")]
    MissingReference { task: TaskName, missing: TaskName },
}

/// All errors that can arise while locating or loading a manifest.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Underlying I/O failure, with the path being read.
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// YAML parse error on load; includes file path and line context from serde_yaml.
    #[error("failed to parse manifest at {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    /// The `package` metadata file is not valid JSON.
    #[error("failed to parse package metadata at {path}: {source}")]
    Package {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// No manifest was found walking up from `start`.
    #[error("no {file} found in {start} or any parent directory")]
    ManifestNotFound { file: &'static str, start: PathBuf },

    /// A manifest task entry is structurally invalid.
    #[error("invalid task '{task}': {reason}")]
    InvalidTask { task: TaskName, reason: String },
}

/// Failure of a single concrete task's action.
#[derive(Debug, Error)]
pub enum ActionError {
    /// Filesystem failure while preparing the action.
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The external tool is not installed or not on `PATH`.
    #[error("tool '{program}' not found on PATH")]
    ToolNotFound { program: String },

    /// The external tool could not be started.
    #[error("failed to start '{program}': {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    /// The external tool ran and reported failure.
    #[error("'{program}' exited with {}", describe_code(.code))]
    ExitStatus { program: String, code: Option<i32> },

    /// Writing a generated tool config file failed to serialize.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// A file pattern could not be parsed or walked.
    #[error("bad file pattern '{pattern}': {message}")]
    Pattern { pattern: String, message: String },

    /// Free-form failure from a custom action.
    #[error("{0}")]
    Failed(String),
}

fn describe_code(code: &Option<i32>) -> String {
    match code {
        Some(code) => format!("status {code}"),
        None => "no status (terminated by signal)".to_string(),
    }
}

/// Convenience constructor for [`ActionError::Io`].
pub fn action_io_err(path: impl Into<PathBuf>, source: std::io::Error) -> ActionError {
    ActionError::Io {
        path: path.into(),
        source,
    }
}

pub(crate) fn io_err(path: impl Into<PathBuf>, source: std::io::Error) -> ConfigError {
    ConfigError::Io {
        path: path.into(),
        source,
    }
}
