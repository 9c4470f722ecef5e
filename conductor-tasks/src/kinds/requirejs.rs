//! `kind: requirejs`: optimize a RequireJS project with `r.js -o`.
//!
//! Options are written as a build profile next to the project, since r.js
//! resolves `appDir`, `dir` and `mainConfigFile` relative to the profile.

use serde::{Deserialize, Serialize};

use conductor_core::{Action, ActionContext, ActionError};

use crate::process::{write_temp_config, ToolCommand};

/// One optimized layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ModuleLayer {
    pub name: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub include: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub exclude: Vec<String>,
}

/// Options for `kind: requirejs`, in manifest (snake_case) spelling.
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RequirejsOptions {
    #[serde(default)]
    pub bin: Option<String>,
    #[serde(default)]
    pub base_url: Option<String>,
    #[serde(default)]
    pub app_dir: Option<String>,
    #[serde(default)]
    pub dir: Option<String>,
    #[serde(default)]
    pub main_config_file: Option<String>,
    /// `uglify`, `uglify2`, `closure`, `none`.
    #[serde(default)]
    pub optimize: Option<String>,
    #[serde(default)]
    pub skip_dir_optimize: Option<bool>,
    /// `standard`, `standard.keepLines`, `none`, …
    #[serde(default)]
    pub optimize_css: Option<String>,
    /// Regular expression source; matching files and dirs are not copied.
    #[serde(default)]
    pub file_exclusion_reg_exp: Option<String>,
    #[serde(default)]
    pub modules: Vec<ModuleLayer>,
}

/// The same options in r.js (camelCase) spelling.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct BuildProfile<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    base_url: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    app_dir: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    dir: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    main_config_file: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    optimize: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    skip_dir_optimize: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    optimize_css: Option<&'a str>,
    #[serde(rename = "fileExclusionRegExp", skip_serializing_if = "Option::is_none")]
    file_exclusion_reg_exp: Option<&'a str>,
    #[serde(skip_serializing_if = "<[ModuleLayer]>::is_empty")]
    modules: &'a [ModuleLayer],
}

#[derive(Debug)]
pub struct RequirejsAction {
    options: RequirejsOptions,
}

impl RequirejsAction {
    pub fn new(options: RequirejsOptions) -> Self {
        RequirejsAction { options }
    }

    /// Build profile source: a parenthesised object literal, as r.js expects.
    pub fn profile(&self) -> Result<String, ActionError> {
        let o = &self.options;
        let profile = BuildProfile {
            base_url: o.base_url.as_deref(),
            app_dir: o.app_dir.as_deref(),
            dir: o.dir.as_deref(),
            main_config_file: o.main_config_file.as_deref(),
            optimize: o.optimize.as_deref(),
            skip_dir_optimize: o.skip_dir_optimize,
            optimize_css: o.optimize_css.as_deref(),
            file_exclusion_reg_exp: o.file_exclusion_reg_exp.as_deref(),
            modules: &o.modules,
        };
        Ok(format!("({})\n", serde_json::to_string_pretty(&profile)?))
    }

    fn bin(&self) -> &str {
        self.options.bin.as_deref().unwrap_or("r.js")
    }
}

impl Action for RequirejsAction {
    fn execute(&self, ctx: &ActionContext<'_>) -> Result<(), ActionError> {
        let profile = write_temp_config(ctx.root, ".conductor-build-", ".js", &self.profile()?)?;
        tracing::info!(task = %ctx.task, layers = self.options.modules.len(), "optimizing RequireJS project");
        ToolCommand::new(self.bin())
            .arg("-o")
            .arg(profile.path())
            .run(ctx.root)
    }

    fn kind(&self) -> &str {
        "requirejs"
    }

    fn describe(&self) -> String {
        let modules: Vec<&str> = self.options.modules.iter().map(|m| m.name.as_str()).collect();
        format!("{} -o <profile> [{}]", self.bin(), modules.join(", "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn boilerplate() -> RequirejsOptions {
        serde_yaml::from_str(
            r#"
base_url: js
app_dir: www
dir: www-built
main_config_file: www/js/config.js
optimize: uglify
skip_dir_optimize: true
optimize_css: standard
file_exclusion_reg_exp: "^\\.|scss$"
modules:
  - name: config
    include: [module_1]
  - name: app/mainpage
    exclude: [config]
"#,
        )
        .expect("options")
    }

    #[test]
    fn profile_uses_rjs_spelling() {
        let src = RequirejsAction::new(boilerplate()).profile().expect("profile");
        assert!(src.starts_with('(') && src.trim_end().ends_with(')'));
        let json: serde_json::Value =
            serde_json::from_str(src.trim().trim_start_matches('(').trim_end_matches(')')).expect("json");
        assert_eq!(json["baseUrl"], "js");
        assert_eq!(json["mainConfigFile"], "www/js/config.js");
        assert_eq!(json["skipDirOptimize"], true);
        assert_eq!(json["fileExclusionRegExp"], "^\\.|scss$");
        assert_eq!(json["modules"][0]["include"][0], "module_1");
        assert!(json["modules"][1].get("include").is_none());
        assert_eq!(json["modules"][1]["exclude"][0], "config");
    }

    #[test]
    fn unset_options_are_omitted() {
        let src = RequirejsAction::new(RequirejsOptions::default()).profile().expect("profile");
        assert_eq!(src.trim(), "({})");
    }

    #[test]
    fn describe_lists_layers() {
        let action = RequirejsAction::new(boilerplate());
        assert_eq!(action.describe(), "r.js -o <profile> [config, app/mainpage]");
    }
}
