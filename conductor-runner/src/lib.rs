//! # conductor-runner
//!
//! Plan expansion and sequential execution.
//!
//! Call [`expand`] (or [`Runner::plan`]) to see what a task name resolves to,
//! and [`Runner::run`] to execute it. Execution halts at the first failing
//! task.

pub mod error;
pub mod plan;
pub mod runner;

pub use error::RunError;
pub use plan::{expand, ExecutionPlan};
pub use runner::{RunEvent, RunOptions, RunReport, Runner, StepRecord};
