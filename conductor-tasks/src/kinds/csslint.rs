//! `kind: csslint`: lint CSS files.
//!
//! Rule levels come from an optional `csslintrc` JSON file plus inline
//! `rules`, inline winning:
//!
//! | Value          | Level   | Flag          |
//! |----------------|---------|---------------|
//! | `false` / `0`  | ignore  | `--ignore=`   |
//! | `true` / `1`   | warning | `--warnings=` |
//! | `2`            | error   | `--errors=`   |

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use conductor_core::error::action_io_err;
use conductor_core::{Action, ActionContext, ActionError};

use crate::files;
use crate::process::ToolCommand;

/// How strictly a single CSSLint rule is applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuleLevel {
    Ignore,
    Warning,
    Error,
}

impl RuleLevel {
    fn from_json(rule: &str, value: &serde_json::Value) -> Result<Self, String> {
        match value {
            serde_json::Value::Bool(false) => Ok(RuleLevel::Ignore),
            serde_json::Value::Bool(true) => Ok(RuleLevel::Warning),
            serde_json::Value::Number(n) => match n.as_u64() {
                Some(0) => Ok(RuleLevel::Ignore),
                Some(1) => Ok(RuleLevel::Warning),
                Some(2) => Ok(RuleLevel::Error),
                _ => Err(format!("rule '{rule}' has level {n}; expected 0, 1 or 2")),
            },
            other => Err(format!("rule '{rule}' has unsupported value {other}")),
        }
    }
}

/// Options for `kind: csslint`.
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CsslintOptions {
    #[serde(default)]
    pub bin: Option<String>,
    /// JSON rules file, relative to the project root.
    #[serde(default)]
    pub csslintrc: Option<PathBuf>,
    #[serde(default)]
    pub rules: BTreeMap<String, serde_json::Value>,
    /// File patterns to lint.
    #[serde(default)]
    pub src: Vec<String>,
}

#[derive(Debug)]
pub struct CsslintAction {
    options: CsslintOptions,
}

impl CsslintAction {
    pub fn new(options: CsslintOptions) -> Self {
        CsslintAction { options }
    }

    /// Merged rule levels: `csslintrc` first, inline `rules` on top.
    pub fn rule_levels(&self, root: &Path) -> Result<BTreeMap<String, RuleLevel>, ActionError> {
        let mut raw: BTreeMap<String, serde_json::Value> = BTreeMap::new();
        if let Some(rc) = &self.options.csslintrc {
            let path = root.join(rc);
            let contents = std::fs::read_to_string(&path).map_err(|e| action_io_err(&path, e))?;
            let from_file: BTreeMap<String, serde_json::Value> = serde_json::from_str(&contents)?;
            raw.extend(from_file);
        }
        raw.extend(self.options.rules.clone());

        raw.iter()
            .map(|(rule, value)| {
                RuleLevel::from_json(rule, value)
                    .map(|level| (rule.clone(), level))
                    .map_err(ActionError::Failed)
            })
            .collect()
    }

    pub fn command(&self, levels: &BTreeMap<String, RuleLevel>, files: &[PathBuf]) -> ToolCommand {
        let joined = |wanted: RuleLevel| {
            let names: Vec<&str> = levels
                .iter()
                .filter(|(_, level)| **level == wanted)
                .map(|(rule, _)| rule.as_str())
                .collect();
            (!names.is_empty()).then(|| names.join(","))
        };

        let mut cmd = ToolCommand::new(self.options.bin.as_deref().unwrap_or("csslint"))
            .arg("--format=compact");
        for (flag, level) in [
            ("--errors=", RuleLevel::Error),
            ("--warnings=", RuleLevel::Warning),
            ("--ignore=", RuleLevel::Ignore),
        ] {
            if let Some(list) = joined(level) {
                cmd = cmd.arg(format!("{flag}{list}"));
            }
        }
        cmd.args(files)
    }
}

impl Action for CsslintAction {
    fn execute(&self, ctx: &ActionContext<'_>) -> Result<(), ActionError> {
        let files = files::expand(ctx.root, &self.options.src)?;
        if files.is_empty() {
            tracing::warn!(task = %ctx.task, "no CSS files matched; nothing to lint");
            return Ok(());
        }
        let levels = self.rule_levels(ctx.root)?;
        tracing::info!(task = %ctx.task, files = files.len(), "linting CSS");
        self.command(&levels, &files).run(ctx.root)
    }

    fn kind(&self) -> &str {
        "csslint"
    }

    fn describe(&self) -> String {
        format!("csslint {}", self.options.src.join(" "))
    }
}
