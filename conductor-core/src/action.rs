//! The uniform interface every concrete task's work goes through.

use std::path::Path;

use crate::error::ActionError;
use crate::types::TaskName;

/// What the runner hands an action when it is invoked.
#[derive(Debug, Clone, Copy)]
pub struct ActionContext<'a> {
    /// Name of the concrete task being executed (target-qualified if any).
    pub task: &'a TaskName,
    /// Directory relative paths in options resolve against.
    pub root: &'a Path,
}

/// A unit of work owned by a concrete task.
///
/// Actions are synchronous: `execute` returns once the work is finished,
/// however long that takes.
pub trait Action: Send + Sync {
    /// Perform the work.
    fn execute(&self, ctx: &ActionContext<'_>) -> Result<(), ActionError>;

    /// Short kind label for listings (`compass`, `command`, …).
    fn kind(&self) -> &str {
        "custom"
    }

    /// One-line human summary of what `execute` will do.
    fn describe(&self) -> String {
        self.kind().to_string()
    }
}

/// [`Action`] backed by a closure; see [`from_fn`].
pub struct FnAction<F> {
    f: F,
}

/// Wrap a closure as an [`Action`].
pub fn from_fn<F>(f: F) -> FnAction<F>
where
    F: Fn(&ActionContext<'_>) -> Result<(), ActionError> + Send + Sync,
{
    FnAction { f }
}

impl<F> Action for FnAction<F>
where
    F: Fn(&ActionContext<'_>) -> Result<(), ActionError> + Send + Sync,
{
    fn execute(&self, ctx: &ActionContext<'_>) -> Result<(), ActionError> {
        (self.f)(ctx)
    }

    fn kind(&self) -> &str {
        "fn"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn closures_are_actions() {
        let action = from_fn(|ctx| {
            if ctx.task.as_str() == "fail" {
                Err(ActionError::Failed("boom".into()))
            } else {
                Ok(())
            }
        });
        let root = Path::new(".");
        let ok = TaskName::from("lint");
        let bad = TaskName::from("fail");
        assert!(action.execute(&ActionContext { task: &ok, root }).is_ok());
        let err = action
            .execute(&ActionContext { task: &bad, root })
            .unwrap_err();
        assert_eq!(err.to_string(), "boom");
        assert_eq!(action.kind(), "fn");
    }

    #[test]
    fn exit_status_message_mentions_code() {
        let err = ActionError::ExitStatus {
            program: "csslint".into(),
            code: Some(2),
        };
        assert_eq!(err.to_string(), "'csslint' exited with status 2");
    }
}
