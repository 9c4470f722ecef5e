//! Spawning external tools.
//!
//! Tools are looked up in `<root>/node_modules/.bin` first, then on `PATH`.
//! Programs given as paths (`./bin/lint`, `tools/r.js`) are taken relative to
//! the project root and not searched. stdout/stderr are inherited so the
//! tool's own output reaches the terminal unchanged.

use std::ffi::{OsStr, OsString};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::Command;

use tempfile::NamedTempFile;

use conductor_core::error::action_io_err;
use conductor_core::ActionError;

/// A fully-built invocation of an external program.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolCommand {
    pub program: String,
    pub args: Vec<OsString>,
    /// Working directory; `None` means the project root.
    pub cwd: Option<PathBuf>,
    pub env: Vec<(String, String)>,
}

impl ToolCommand {
    pub fn new(program: impl Into<String>) -> Self {
        ToolCommand {
            program: program.into(),
            args: vec![],
            cwd: None,
            env: vec![],
        }
    }

    pub fn arg(mut self, arg: impl AsRef<OsStr>) -> Self {
        self.args.push(arg.as_ref().to_os_string());
        self
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<OsStr>,
    {
        self.args
            .extend(args.into_iter().map(|a| a.as_ref().to_os_string()));
        self
    }

    /// `--flag` when `on`.
    pub fn flag(self, on: bool, flag: &str) -> Self {
        if on {
            self.arg(flag)
        } else {
            self
        }
    }

    /// `--flag value` when `value` is set.
    pub fn opt(self, flag: &str, value: Option<impl AsRef<OsStr>>) -> Self {
        match value {
            Some(v) => self.arg(flag).arg(v),
            None => self,
        }
    }

    /// Argument list as display text, for logs and dry-run output.
    pub fn display(&self) -> String {
        let mut out = self.program.clone();
        for arg in &self.args {
            out.push(' ');
            out.push_str(&arg.to_string_lossy());
        }
        out
    }

    /// Resolve the program, run it to completion, and map failure to
    /// [`ActionError`].
    pub fn run(&self, root: &Path) -> Result<(), ActionError> {
        let resolved = resolve_program(&self.program, root)?;
        let cwd = match &self.cwd {
            Some(dir) => root.join(dir),
            None => root.to_path_buf(),
        };
        tracing::debug!(command = %self.display(), cwd = %cwd.display(), "spawning tool");

        let status = Command::new(&resolved)
            .args(&self.args)
            .current_dir(&cwd)
            .envs(self.env.iter().map(|(k, v)| (k.as_str(), v.as_str())))
            .status()
            .map_err(|source| ActionError::Spawn {
                program: self.program.clone(),
                source,
            })?;

        if status.success() {
            Ok(())
        } else {
            Err(ActionError::ExitStatus {
                program: self.program.clone(),
                code: status.code(),
            })
        }
    }
}

/// Locate `program` for a project rooted at `root`.
pub fn resolve_program(program: &str, root: &Path) -> Result<PathBuf, ActionError> {
    let not_found = || ActionError::ToolNotFound {
        program: program.to_string(),
    };

    if program.contains('/') || program.contains(std::path::MAIN_SEPARATOR) {
        let candidate = root.join(program);
        return if candidate.is_file() {
            Ok(candidate)
        } else {
            Err(not_found())
        };
    }

    let mut dirs = vec![root.join("node_modules").join(".bin")];
    if let Some(path) = std::env::var_os("PATH") {
        dirs.extend(std::env::split_paths(&path));
    }
    let search = std::env::join_paths(dirs).map_err(|_| not_found())?;
    which::which_in(program, Some(search), root).map_err(|_| not_found())
}

/// Write `contents` to a fresh hidden file inside `dir`.
///
/// Tools such as `r.js` resolve paths relative to their config file, so
/// generated configs live next to the project rather than in the system
/// temp dir. The file is deleted when the handle drops.
pub fn write_temp_config(
    dir: &Path,
    prefix: &str,
    suffix: &str,
    contents: &str,
) -> Result<NamedTempFile, ActionError> {
    let mut file = tempfile::Builder::new()
        .prefix(prefix)
        .suffix(suffix)
        .tempfile_in(dir)
        .map_err(|e| action_io_err(dir, e))?;
    let path = file.path().to_path_buf();
    file.write_all(contents.as_bytes())
        .map_err(|e| action_io_err(&path, e))?;
    file.flush().map_err(|e| action_io_err(&path, e))?;
    Ok(file)
}
