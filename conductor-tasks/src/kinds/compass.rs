//! `kind: compass`: compile Sass with `compass compile`.

use std::path::PathBuf;

use serde::Deserialize;

use conductor_core::{Action, ActionContext, ActionError};

use crate::process::{write_temp_config, ToolCommand};

/// CSS output style accepted by `--output-style`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputStyle {
    Nested,
    Expanded,
    Compact,
    Compressed,
}

impl OutputStyle {
    fn as_str(self) -> &'static str {
        match self {
            OutputStyle::Nested => "nested",
            OutputStyle::Expanded => "expanded",
            OutputStyle::Compact => "compact",
            OutputStyle::Compressed => "compressed",
        }
    }
}

/// Options for `kind: compass`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CompassOptions {
    #[serde(default)]
    pub bin: Option<String>,
    #[serde(default)]
    pub http_path: Option<String>,
    #[serde(default)]
    pub css_dir: Option<PathBuf>,
    #[serde(default)]
    pub sass_dir: Option<PathBuf>,
    #[serde(default)]
    pub images_dir: Option<PathBuf>,
    #[serde(default)]
    pub javascripts_dir: Option<PathBuf>,
    #[serde(default)]
    pub output_style: Option<OutputStyle>,
    #[serde(default)]
    pub relative_assets: bool,
    #[serde(default)]
    pub no_line_comments: bool,
    #[serde(default)]
    pub force: bool,
    /// Ruby config appended verbatim through a generated `--config` file,
    /// for settings compass has no flag for.
    #[serde(default)]
    pub raw: Option<String>,
}

#[derive(Debug)]
pub struct CompassAction {
    options: CompassOptions,
}

impl CompassAction {
    pub fn new(options: CompassOptions) -> Self {
        CompassAction { options }
    }

    /// The `compass compile` invocation, with `config` as the `--config` file.
    pub fn command(&self, config: Option<PathBuf>) -> ToolCommand {
        let o = &self.options;
        ToolCommand::new(o.bin.as_deref().unwrap_or("compass"))
            .arg("compile")
            .opt("--config", config)
            .opt("--http-path", o.http_path.as_ref())
            .opt("--css-dir", o.css_dir.as_ref())
            .opt("--sass-dir", o.sass_dir.as_ref())
            .opt("--images-dir", o.images_dir.as_ref())
            .opt("--javascripts-dir", o.javascripts_dir.as_ref())
            .opt("--output-style", o.output_style.map(OutputStyle::as_str))
            .flag(o.relative_assets, "--relative-assets")
            .flag(o.no_line_comments, "--no-line-comments")
            .flag(o.force, "--force")
    }
}

impl Action for CompassAction {
    fn execute(&self, ctx: &ActionContext<'_>) -> Result<(), ActionError> {
        // The temp file must outlive the compass process.
        let raw_config = match &self.options.raw {
            Some(raw) => Some(write_temp_config(ctx.root, ".conductor-compass-", ".rb", raw)?),
            None => None,
        };
        let cmd = self.command(raw_config.as_ref().map(|f| f.path().to_path_buf()));
        cmd.run(ctx.root)
    }

    fn kind(&self) -> &str {
        "compass"
    }

    fn describe(&self) -> String {
        self.command(None).display()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn boilerplate_options_map_to_flags() {
        let options: CompassOptions = serde_yaml::from_str(
            r#"
http_path: "/"
css_dir: www/css
sass_dir: www/scss
images_dir: www/img
javascripts_dir: www/js
output_style: expanded
relative_assets: true
no_line_comments: false
force: true
raw: "Sass::Script::Number.precision = 15\n"
"#,
        )
        .expect("options");
        let cmd = CompassAction::new(options).command(None);
        assert_eq!(
            cmd.display(),
            "compass compile --http-path / --css-dir www/css --sass-dir www/scss \
             --images-dir www/img --javascripts-dir www/js --output-style expanded \
             --relative-assets --force"
        );
    }

    #[test]
    fn config_file_goes_first() {
        let cmd = CompassAction::new(CompassOptions::default()).command(Some(PathBuf::from("c.rb")));
        assert_eq!(cmd.display(), "compass compile --config c.rb");
    }

    #[test]
    fn unknown_output_style_is_rejected() {
        let err = serde_yaml::from_str::<CompassOptions>("output_style: tiny\n").unwrap_err();
        assert!(err.to_string().contains("tiny"), "got: {err}");
    }
}
