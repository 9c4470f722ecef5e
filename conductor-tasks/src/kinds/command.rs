//! `kind: command`: run an arbitrary program.

use std::collections::BTreeMap;
use std::path::PathBuf;

use serde::Deserialize;

use conductor_core::{Action, ActionContext, ActionError};

use crate::process::ToolCommand;

/// Options for `kind: command`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CommandOptions {
    pub program: String,
    #[serde(default)]
    pub args: Vec<String>,
    /// Working directory relative to the project root.
    #[serde(default)]
    pub cwd: Option<PathBuf>,
    #[serde(default)]
    pub env: BTreeMap<String, String>,
}

#[derive(Debug)]
pub struct CommandAction {
    options: CommandOptions,
}

impl CommandAction {
    pub fn new(options: CommandOptions) -> Self {
        CommandAction { options }
    }

    pub fn command(&self) -> ToolCommand {
        let mut cmd = ToolCommand::new(&self.options.program).args(&self.options.args);
        cmd.cwd = self.options.cwd.clone();
        cmd.env = self
            .options
            .env
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect();
        cmd
    }
}

impl Action for CommandAction {
    fn execute(&self, ctx: &ActionContext<'_>) -> Result<(), ActionError> {
        self.command().run(ctx.root)
    }

    fn kind(&self) -> &str {
        "command"
    }

    fn describe(&self) -> String {
        self.command().display()
    }
}
