//! Tera rendering of option values.
//!
//! Only strings that contain `{{` or `{%` go through Tera; everything else
//! (numbers, booleans, plain strings) is passed through untouched, so option
//! maps without templates cost nothing.

use serde_yaml::{Mapping, Value};
use tera::Tera;

use crate::context::TemplateContext;
use crate::error::TemplateError;

/// Renders templated strings against a fixed [`TemplateContext`].
///
/// Build once per run and reuse for every task's options.
pub struct TemplateEngine {
    ctx: tera::Context,
}

impl TemplateEngine {
    pub fn new(ctx: &TemplateContext) -> Result<Self, TemplateError> {
        Ok(TemplateEngine {
            ctx: ctx.to_tera_context()?,
        })
    }

    /// Render a single string. `key` only labels errors.
    pub fn render_str(&self, key: &str, template: &str) -> Result<String, TemplateError> {
        if !is_template(template) {
            return Ok(template.to_string());
        }
        Tera::one_off(template, &self.ctx, false).map_err(|source| TemplateError::Render {
            key: key.to_string(),
            source,
        })
    }

    /// Render every templated string inside `options`, recursively.
    pub fn render_options(&self, key: &str, options: &Mapping) -> Result<Mapping, TemplateError> {
        let mut out = Mapping::with_capacity(options.len());
        for (k, v) in options {
            let child = match k.as_str() {
                Some(name) => format!("{key}.{name}"),
                None => key.to_string(),
            };
            out.insert(k.clone(), self.render_value(&child, v)?);
        }
        Ok(out)
    }

    fn render_value(&self, key: &str, value: &Value) -> Result<Value, TemplateError> {
        Ok(match value {
            Value::String(s) => Value::String(self.render_str(key, s)?),
            Value::Sequence(items) => Value::Sequence(
                items
                    .iter()
                    .enumerate()
                    .map(|(i, item)| self.render_value(&format!("{key}[{i}]"), item))
                    .collect::<Result<_, _>>()?,
            ),
            Value::Mapping(map) => Value::Mapping(self.render_options(key, map)?),
            other => other.clone(),
        })
    }
}

fn is_template(s: &str) -> bool {
    s.contains("{{") || s.contains("{%")
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn engine() -> TemplateEngine {
        let pkg = serde_json::json!({ "name": "multipage", "version": "0.3.0" });
        let date = NaiveDate::from_ymd_opt(2013, 4, 1).expect("date");
        TemplateEngine::new(&TemplateContext::new(Some(pkg), date)).expect("engine")
    }

    #[test]
    fn plain_strings_pass_through() {
        assert_eq!(engine().render_str("k", "www/css").expect("render"), "www/css");
    }

    #[test]
    fn nested_values_are_rendered() {
        let options: Mapping = serde_yaml::from_str(
            "name: \"{{ pkg.name }}\"\npaths: [\"docs/{{ year }}\"]\nforce: true\n",
        )
        .expect("yaml");
        let out = engine().render_options("yuidoc", &options).expect("render");
        assert_eq!(out["name"], Value::from("multipage"));
        assert_eq!(out["paths"][0], Value::from("docs/2013"));
        assert_eq!(out["force"], Value::from(true));
    }

    #[test]
    fn error_names_the_option_key() {
        let options: Mapping = serde_yaml::from_str("modules:\n  - name: \"{{ nope.x }}\"\n").expect("yaml");
        let err = engine().render_options("requirejs", &options).unwrap_err();
        assert!(
            err.to_string().contains("requirejs.modules[0].name"),
            "got: {err}"
        );
    }
}
