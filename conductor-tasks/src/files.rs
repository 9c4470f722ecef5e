//! File pattern expansion (`www/css/*.css`).

use std::path::{Path, PathBuf};

use conductor_core::ActionError;

/// Expand `patterns` against `root`, in pattern order, dropping duplicates.
///
/// Returned paths are relative to `root` when the pattern was, so tool
/// output stays readable. Patterns that match nothing contribute nothing.
pub fn expand(root: &Path, patterns: &[String]) -> Result<Vec<PathBuf>, ActionError> {
    let mut out: Vec<PathBuf> = Vec::new();
    for pattern in patterns {
        let absolute = Path::new(pattern).is_absolute();
        let full = if absolute {
            pattern.clone()
        } else {
            root.join(pattern).to_string_lossy().into_owned()
        };
        let paths = glob::glob(&full).map_err(|e| ActionError::Pattern {
            pattern: pattern.clone(),
            message: e.to_string(),
        })?;

        let mut matched: Vec<PathBuf> = Vec::new();
        for entry in paths {
            let path = entry.map_err(|e| ActionError::Pattern {
                pattern: pattern.clone(),
                message: e.to_string(),
            })?;
            if !path.is_file() {
                continue;
            }
            let path = if absolute {
                path
            } else {
                path.strip_prefix(root).map(Path::to_path_buf).unwrap_or(path)
            };
            matched.push(path);
        }
        matched.sort();
        if matched.is_empty() {
            tracing::debug!(pattern = %pattern, "pattern matched no files");
        }
        for path in matched {
            if !out.contains(&path) {
                out.push(path);
            }
        }
    }
    Ok(out)
}
