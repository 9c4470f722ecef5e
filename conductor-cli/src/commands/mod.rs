pub mod check;
pub mod list;
pub mod plan;
pub mod run;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use conductor_core::{config, Config, Registry};

use crate::GlobalArgs;

/// Task run when none is named on the command line.
pub const DEFAULT_TASK: &str = "default";

/// A loaded manifest and the registry built from it.
pub struct Project {
    pub config: Config,
    pub registry: Registry,
}

impl Project {
    pub fn root(&self) -> &Path {
        &self.config.root
    }
}

/// `--config`/`CONDUCTOR_CONFIG` if given, otherwise search upward from the
/// current directory.
pub fn manifest_path(global: &GlobalArgs) -> Result<PathBuf> {
    if let Some(path) = &global.config {
        return Ok(path.clone());
    }
    let cwd = std::env::current_dir().context("could not determine current directory")?;
    Ok(config::discover_from(&cwd)?)
}

pub fn load_config(global: &GlobalArgs) -> Result<Config> {
    let path = manifest_path(global)?;
    tracing::debug!(path = %path.display(), "using manifest");
    Config::load_at(&path).with_context(|| format!("failed to load {}", path.display()))
}

pub fn load_project(global: &GlobalArgs) -> Result<Project> {
    let config = load_config(global)?;
    let registry = conductor_tasks::build_registry(&config).context("failed to build task registry")?;
    Ok(Project { config, registry })
}
