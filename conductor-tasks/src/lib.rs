//! # conductor-tasks
//!
//! Typed task kinds and the manifest → registry builder.
//!
//! Call [`build_registry`] once at startup with the loaded
//! [`Config`](conductor_core::Config); the returned registry is what the
//! runner executes against.

pub mod builder;
pub mod error;
pub mod files;
pub mod kinds;
pub mod process;

pub use builder::{build_registry, build_registry_with};
pub use error::BuildError;
pub use process::ToolCommand;
