//! Conductor core library: task names, the registry and manifest loading.
//!
//! - [`types`]: newtypes and enums
//! - [`action`]: the [`Action`] trait every concrete task runs through
//! - [`registry`]: [`Registry`] and [`Task`]
//! - [`config`]: manifest parsing and discovery
//! - [`error`]: [`RegistryError`], [`ConfigError`], [`ActionError`]

pub mod action;
pub mod config;
pub mod error;
pub mod registry;
pub mod types;

pub use action::{from_fn, Action, ActionContext, FnAction};
pub use config::{Config, Manifest, TaskEntry};
pub use error::{ActionError, ConfigError, RegistryError};
pub use registry::{Registry, Task};
pub use types::{ActionKind, TaskName};
