//! Error types for conductor-tasks.

use thiserror::Error;

use conductor_core::{ActionKind, ConfigError, RegistryError, TaskName};
use conductor_template::TemplateError;

/// All errors that can arise while turning a manifest into a registry.
#[derive(Debug, Error)]
pub enum BuildError {
    /// The manifest entry itself is malformed.
    #[error("manifest error: {0}")]
    Config(#[from] ConfigError),

    /// An option template failed to render.
    #[error("template error: {0}")]
    Template(#[from] TemplateError),

    /// Options did not match the typed schema for `kind`.
    #[error("invalid {kind} options for task '{task}': {source}")]
    Options {
        task: TaskName,
        kind: ActionKind,
        #[source]
        source: serde_yaml::Error,
    },

    /// Duplicate or dangling task names.
    #[error("registry error: {0}")]
    Registry(#[from] RegistryError),
}
