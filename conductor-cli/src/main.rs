//! Conductor: named-task build orchestrator.
//!
//! # Usage
//!
//! ```text
//! conductor run [TASK] [--dry-run]
//! conductor plan [TASK] [--json]
//! conductor list [--json]
//! conductor check
//! ```
//!
//! Global flags: `--config PATH` (or `CONDUCTOR_CONFIG`), `-v` (repeatable),
//! `-q`.

mod commands;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Args, Parser, Subcommand};

use commands::{check::CheckArgs, list::ListArgs, plan::PlanArgs, run::RunArgs};

// ---------------------------------------------------------------------------
// CLI entry point
// ---------------------------------------------------------------------------

#[derive(Parser, Debug)]
#[command(
    name = "conductor",
    version,
    about = "Run named build tasks declared in conductor.yaml",
    long_about = None,
)]
struct Cli {
    #[command(flatten)]
    global: GlobalArgs,

    #[command(subcommand)]
    command: Commands,
}

/// Flags accepted by every subcommand.
#[derive(Args, Debug, Clone)]
pub struct GlobalArgs {
    /// Manifest to load instead of searching upward for conductor.yaml.
    #[arg(long, global = true, env = conductor_core::config::CONFIG_ENV, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Log more (-v info, -vv debug, -vvv trace).
    #[arg(short, long, global = true, action = clap::ArgAction::Count, conflicts_with = "quiet")]
    pub verbose: u8,

    /// Only print errors.
    #[arg(short, long, global = true)]
    pub quiet: bool,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Execute a task and everything it expands to.
    Run(RunArgs),

    /// Show the ordered tasks a run would execute.
    Plan(PlanArgs),

    /// List registered tasks.
    List(ListArgs),

    /// Load the manifest and validate every task.
    Check(CheckArgs),
}

// ---------------------------------------------------------------------------
// Main
// ---------------------------------------------------------------------------

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(&cli.global);
    match cli.command {
        Commands::Run(args) => args.run(&cli.global),
        Commands::Plan(args) => args.run(&cli.global),
        Commands::List(args) => args.run(&cli.global),
        Commands::Check(args) => args.run(&cli.global),
    }
}

/// `CONDUCTOR_LOG` wins unless `-v`/`-q` were given; the fallback is `warn`.
fn init_tracing(global: &GlobalArgs) {
    use tracing_subscriber::{fmt, EnvFilter};

    let level = match (global.quiet, global.verbose) {
        (true, _) => Some("error"),
        (false, 0) => None,
        (false, 1) => Some("info"),
        (false, 2) => Some("debug"),
        (false, _) => Some("trace"),
    };
    let filter = match level {
        Some(level) => EnvFilter::new(level),
        None => EnvFilter::try_from_env("CONDUCTOR_LOG").unwrap_or_else(|_| EnvFilter::new("warn")),
    };
    let _ = fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}
