//! Typed options and [`Action`] implementations, one module per tool.
//!
//! Every options struct uses `deny_unknown_fields`: a misspelled key in the
//! manifest fails at load time instead of being silently ignored.

pub mod command;
pub mod compass;
pub mod csslint;
pub mod jshint;
pub mod requirejs;
pub mod yuidoc;

use serde::de::DeserializeOwned;
use serde_yaml::{Mapping, Value};

use conductor_core::{Action, ActionKind, TaskName};

use crate::error::BuildError;

pub use command::CommandAction;
pub use compass::CompassAction;
pub use csslint::CsslintAction;
pub use jshint::JshintAction;
pub use requirejs::RequirejsAction;
pub use yuidoc::YuidocAction;

/// Decode `options` (already template-rendered) into the action for `kind`.
pub fn decode(kind: ActionKind, task: &TaskName, options: Mapping) -> Result<Box<dyn Action>, BuildError> {
    Ok(match kind {
        ActionKind::Command => Box::new(CommandAction::new(typed(kind, task, options)?)),
        ActionKind::Compass => Box::new(CompassAction::new(typed(kind, task, options)?)),
        ActionKind::Csslint => Box::new(CsslintAction::new(typed(kind, task, options)?)),
        ActionKind::Jshint => Box::new(JshintAction::new(typed(kind, task, options)?)),
        ActionKind::Yuidoc => Box::new(YuidocAction::new(typed(kind, task, options)?)),
        ActionKind::Requirejs => Box::new(RequirejsAction::new(typed(kind, task, options)?)),
    })
}

fn typed<T: DeserializeOwned>(kind: ActionKind, task: &TaskName, options: Mapping) -> Result<T, BuildError> {
    serde_yaml::from_value(Value::Mapping(options)).map_err(|source| BuildError::Options {
        task: task.clone(),
        kind,
        source,
    })
}
