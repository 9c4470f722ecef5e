//! `kind: yuidoc`: generate API documentation.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use conductor_core::{Action, ActionContext, ActionError};

use crate::process::{write_temp_config, ToolCommand};

/// Options for `kind: yuidoc`. `name`, `description` and `version` are
/// usually templated from package metadata.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct YuidocOptions {
    #[serde(default)]
    pub bin: Option<String>,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub version: Option<String>,
    /// Source directories to scan.
    pub paths: Vec<PathBuf>,
    pub outdir: PathBuf,
}

#[derive(Serialize)]
struct YuidocJson<'a> {
    name: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    description: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    version: Option<&'a str>,
    options: YuidocJsonOptions,
}

#[derive(Serialize)]
struct YuidocJsonOptions {
    paths: Vec<PathBuf>,
    outdir: PathBuf,
}

#[derive(Debug)]
pub struct YuidocAction {
    options: YuidocOptions,
}

impl YuidocAction {
    pub fn new(options: YuidocOptions) -> Self {
        YuidocAction { options }
    }

    /// `yuidoc.json` contents, with paths made absolute against `root`.
    pub fn config_json(&self, root: &Path) -> Result<String, ActionError> {
        let o = &self.options;
        let doc = YuidocJson {
            name: &o.name,
            description: o.description.as_deref(),
            version: o.version.as_deref(),
            options: YuidocJsonOptions {
                paths: o.paths.iter().map(|p| root.join(p)).collect(),
                outdir: root.join(&o.outdir),
            },
        };
        Ok(serde_json::to_string_pretty(&doc)?)
    }

    pub fn command(&self, config: PathBuf) -> ToolCommand {
        ToolCommand::new(self.options.bin.as_deref().unwrap_or("yuidoc")).opt("--configfile", Some(config))
    }
}

impl Action for YuidocAction {
    fn execute(&self, ctx: &ActionContext<'_>) -> Result<(), ActionError> {
        let config = write_temp_config(ctx.root, ".conductor-yuidoc-", ".json", &self.config_json(ctx.root)?)?;
        self.command(config.path().to_path_buf()).run(ctx.root)
    }

    fn kind(&self) -> &str {
        "yuidoc"
    }

    fn describe(&self) -> String {
        format!(
            "yuidoc {} -> {}",
            self.options
                .paths
                .iter()
                .map(|p| p.display().to_string())
                .collect::<Vec<_>>()
                .join(" "),
            self.options.outdir.display()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[cfg(unix)]
    #[test]
    fn config_json_has_absolute_paths() {
        let options: YuidocOptions = serde_yaml::from_str(
            "name: multipage\nversion: 0.3.0\npaths: [www/js/app/]\noutdir: www-built/docs/\n",
        )
        .expect("options");
        let json: serde_json::Value = serde_json::from_str(
            &YuidocAction::new(options).config_json(Path::new("/project")).expect("json"),
        )
        .expect("parse");
        assert_eq!(json["name"], "multipage");
        assert_eq!(json["version"], "0.3.0");
        assert!(json.get("description").is_none());
        assert_eq!(json["options"]["outdir"], "/project/www-built/docs/");
        assert_eq!(json["options"]["paths"][0], "/project/www/js/app/");
    }

    #[test]
    fn name_is_required() {
        let err = serde_yaml::from_str::<YuidocOptions>("paths: []\noutdir: docs\n").unwrap_err();
        assert!(err.to_string().contains("name"), "got: {err}");
    }
}
