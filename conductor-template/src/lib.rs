//! # conductor-template
//!
//! Renders Tera expressions embedded in manifest option strings, so task
//! options can refer to package metadata and the build date:
//!
//! ```rust
//! use conductor_template::{TemplateContext, TemplateEngine};
//!
//! let pkg = serde_json::json!({ "name": "multipage", "version": "0.3.0" });
//! let ctx = TemplateContext::new(Some(pkg), chrono::NaiveDate::from_ymd_opt(2013, 4, 1).unwrap());
//! let engine = TemplateEngine::new(&ctx).unwrap();
//! let out = engine.render_str("yuidoc.version", "v{{ pkg.version }}").unwrap();
//! assert_eq!(out, "v0.3.0");
//! ```

pub mod context;
pub mod engine;
pub mod error;

pub use context::TemplateContext;
pub use engine::TemplateEngine;
pub use error::TemplateError;
