//! Error types for conductor-template.

use thiserror::Error;

/// All errors that can arise while rendering option templates.
#[derive(Debug, Error)]
pub enum TemplateError {
    /// Tera rejected or failed to render the template stored under `key`.
    #[error("failed to render template in '{key}': {source}")]
    Render {
        key: String,
        #[source]
        source: tera::Error,
    },

    /// Context serialization error (building the tera context).
    #[error("context serialization error: {0}")]
    Context(#[from] tera::Error),
}
