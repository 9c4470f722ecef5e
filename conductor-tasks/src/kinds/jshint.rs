//! `kind: jshint`: lint JavaScript.
//!
//! Enforcement flags and globals are written to a generated `.jshintrc` and
//! passed with `--config`.

use std::collections::BTreeMap;
use std::path::PathBuf;

use serde::Deserialize;

use conductor_core::{Action, ActionContext, ActionError};

use crate::files;
use crate::process::{write_temp_config, ToolCommand};

/// Options for `kind: jshint`.
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct JshintOptions {
    #[serde(default)]
    pub bin: Option<String>,
    /// File patterns to lint.
    #[serde(default)]
    pub files: Vec<String>,
    /// JSHint enforcement options (`curly: true`, `latedef: true`, …).
    #[serde(default, alias = "options")]
    pub flags: BTreeMap<String, serde_json::Value>,
    /// Predefined globals; `true` allows reassignment.
    #[serde(default)]
    pub globals: BTreeMap<String, bool>,
}

#[derive(Debug)]
pub struct JshintAction {
    options: JshintOptions,
}

impl JshintAction {
    pub fn new(options: JshintOptions) -> Self {
        JshintAction { options }
    }

    /// Contents of the generated `.jshintrc`.
    pub fn jshintrc(&self) -> Result<String, ActionError> {
        let mut rc = serde_json::Map::new();
        for (flag, value) in &self.options.flags {
            rc.insert(flag.clone(), value.clone());
        }
        if !self.options.globals.is_empty() {
            rc.insert("globals".to_string(), serde_json::to_value(&self.options.globals)?);
        }
        Ok(serde_json::to_string_pretty(&serde_json::Value::Object(rc))?)
    }

    pub fn command(&self, config: PathBuf, files: &[PathBuf]) -> ToolCommand {
        ToolCommand::new(self.options.bin.as_deref().unwrap_or("jshint"))
            .opt("--config", Some(config))
            .args(files)
    }
}

impl Action for JshintAction {
    fn execute(&self, ctx: &ActionContext<'_>) -> Result<(), ActionError> {
        let files = files::expand(ctx.root, &self.options.files)?;
        if files.is_empty() {
            tracing::warn!(task = %ctx.task, "no JavaScript files matched; nothing to lint");
            return Ok(());
        }
        let rc = write_temp_config(ctx.root, ".conductor-jshintrc-", ".json", &self.jshintrc()?)?;
        tracing::info!(task = %ctx.task, files = files.len(), "linting JavaScript");
        self.command(rc.path().to_path_buf(), &files).run(ctx.root)
    }

    fn kind(&self) -> &str {
        "jshint"
    }

    fn describe(&self) -> String {
        format!("jshint {}", self.options.files.join(" "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn options_alias_and_globals_end_up_in_jshintrc() {
        let options: JshintOptions = serde_yaml::from_str(
            r#"
files: ["www/app/*.js"]
options:
  curly: true
  eqeqeq: true
  maxlen: 120
globals:
  jQuery: true
  define: true
"#,
        )
        .expect("options");
        let rc: serde_json::Value =
            serde_json::from_str(&JshintAction::new(options).jshintrc().expect("rc")).expect("json");
        assert_eq!(rc["curly"], true);
        assert_eq!(rc["maxlen"], 120);
        assert_eq!(rc["globals"]["jQuery"], true);
    }

    #[test]
    fn command_passes_config_then_files() {
        let action = JshintAction::new(JshintOptions::default());
        let cmd = action.command(PathBuf::from(".rc.json"), &[PathBuf::from("www/app/main.js")]);
        assert_eq!(cmd.display(), "jshint --config .rc.json www/app/main.js");
    }
}
