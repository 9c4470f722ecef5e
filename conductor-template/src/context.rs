//! Template context: the values option templates may reference.

use chrono::{Datelike, Local, NaiveDate};
use serde::{Deserialize, Serialize};

use conductor_core::Config;

use crate::error::TemplateError;

/// Rendering payload.
///
/// | Variable | Value                                             |
/// |----------|---------------------------------------------------|
/// | `pkg`    | parsed `package` JSON, or `{}`                    |
/// | `today`  | build date, `YYYY-MM-DD`                          |
/// | `year`   | build year                                        |
/// | `banner` | the manifest banner, itself rendered, or `""`     |
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TemplateContext {
    pub pkg: serde_json::Value,
    pub today: String,
    pub year: i32,
    pub banner: String,
}

impl TemplateContext {
    /// Context for `pkg` on `date`, with an empty banner.
    pub fn new(pkg: Option<serde_json::Value>, date: NaiveDate) -> Self {
        TemplateContext {
            pkg: pkg.unwrap_or_else(|| serde_json::Value::Object(Default::default())),
            today: date.format("%Y-%m-%d").to_string(),
            year: date.year(),
            banner: String::new(),
        }
    }

    /// Context for a loaded [`Config`], dated today (local time).
    ///
    /// The banner is rendered against the other variables before being stored.
    pub fn from_config(config: &Config) -> Result<Self, TemplateError> {
        Self::from_config_on(config, Local::now().date_naive())
    }

    /// Like [`from_config`](Self::from_config) with a fixed date.
    pub fn from_config_on(config: &Config, date: NaiveDate) -> Result<Self, TemplateError> {
        let mut ctx = Self::new(config.package.clone(), date);
        if let Some(banner) = &config.manifest.banner {
            let rendered = crate::engine::TemplateEngine::new(&ctx)?.render_str("banner", banner)?;
            ctx.banner = rendered;
        }
        Ok(ctx)
    }

    /// Convert into a [`tera::Context`] for rendering.
    pub fn to_tera_context(&self) -> Result<tera::Context, TemplateError> {
        tera::Context::from_serialize(self).map_err(TemplateError::from)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2013, 4, 1).expect("date")
    }

    #[test]
    fn missing_package_is_empty_object() {
        let ctx = TemplateContext::new(None, date());
        assert!(ctx.pkg.as_object().expect("object").is_empty());
        assert_eq!(ctx.today, "2013-04-01");
        assert_eq!(ctx.year, 2013);
    }

    #[test]
    fn banner_is_rendered_from_config() {
        let mut config = Config::parse("/p", "tasks: {}\n").expect("config");
        config.manifest.banner = Some("/*! {{ pkg.name }} - {{ today }} */".to_string());
        config.package = Some(serde_json::json!({ "name": "multipage" }));

        let ctx = TemplateContext::from_config_on(&config, date()).expect("context");
        assert_eq!(ctx.banner, "/*! multipage - 2013-04-01 */");
    }

    #[test]
    fn to_tera_context_succeeds() {
        let ctx = TemplateContext::new(None, date());
        let tera_ctx = ctx.to_tera_context().expect("context conversion");
        assert!(tera_ctx.contains_key("pkg"));
    }
}
