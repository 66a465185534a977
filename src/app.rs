//! Top-level application orchestration.
//!
//! `src/main.rs` is intentionally tiny; this module is the "real main" that:
//! - parses CLI arguments
//! - opens the query executor (lifecycle scoped to the invocation)
//! - builds the panel plan and the open-transit listing, in that order
//! - prints reports or hands off to the TUI

use clap::Parser;

use crate::cli::{Command, DbArgs, RunArgs, StatsArgs};
use crate::data::SqliteExecutor;
use crate::domain::{Dimension, RunConfig};
use crate::error::AppError;

pub mod pipeline;

/// Entry point for the `laudos` binary.
pub fn run() -> Result<(), AppError> {
    // We want `laudos` and `laudos --db x.db` to behave like `laudos dash ...`.
    //
    // Clap requires a subcommand name, so we do a small, explicit rewrite of the
    // argv list before parsing. This preserves a clean clap structure while
    // retaining the requested UX.
    let argv = rewrite_args(std::env::args().collect());
    let cli = crate::cli::Cli::parse_from(argv);

    match cli.command {
        Command::Dash(args) => crate::tui::run(args),
        Command::Stats(args) => handle_stats(args),
        Command::Abertos(args) => handle_abertos(args),
    }
}

/// Open the executor from `--db` or the environment.
pub fn executor_from(db: &DbArgs) -> Result<SqliteExecutor, AppError> {
    match &db.db {
        Some(path) => SqliteExecutor::open(path),
        None => SqliteExecutor::from_env(),
    }
}

/// Resolve the panel catalog and policy from CLI flags.
pub fn run_config_from_args(args: &RunArgs) -> RunConfig {
    RunConfig {
        catalog: args
            .panels
            .clone()
            .unwrap_or_else(|| Dimension::TODAS.to_vec()),
        year_policy: args.year_policy,
    }
}

fn handle_stats(args: StatsArgs) -> Result<(), AppError> {
    let exec = executor_from(&args.run.db)?;
    let config = run_config_from_args(&args.run);

    // Artifact 1: the panel summaries. Data-quality notices don't stop the
    // open-transit listing below.
    match pipeline::run_panels(&exec, &config) {
        Ok(run) => {
            println!("{}", crate::report::format_resumo_paineis(&run.plan, run.total_laudos));
            if let Some(path) = &args.export {
                crate::io::export::write_stats_json(path, &run.plan, run.total_laudos)?;
            }
        }
        Err(err) if err.is_data_quality() => eprintln!("{err}"),
        Err(err) => return Err(err),
    }

    // Artifact 2: the open-transit listing.
    let listing = pipeline::run_abertos(&exec)?;
    println!("{}", crate::report::format_abertos(&listing));

    Ok(())
}

fn handle_abertos(args: DbArgs) -> Result<(), AppError> {
    let exec = executor_from(&args)?;
    let listing = pipeline::run_abertos(&exec)?;
    println!("{}", crate::report::format_abertos(&listing));
    Ok(())
}

/// Rewrite argv so `laudos` defaults to `laudos dash`.
///
/// Rules:
/// - `laudos`                      -> `laudos dash`
/// - `laudos --db x.db ...`        -> `laudos dash --db x.db ...`
/// - `laudos --help/--version/-h`  -> unchanged (show top-level help/version)
fn rewrite_args(mut argv: Vec<String>) -> Vec<String> {
    let Some(arg1) = argv.get(1).cloned() else {
        argv.push("dash".to_string());
        return argv;
    };

    let is_top_level_help_or_version =
        matches!(arg1.as_str(), "-h" | "--help" | "-V" | "--version" | "help");
    if is_top_level_help_or_version {
        return argv;
    }

    let is_subcommand = matches!(arg1.as_str(), "dash" | "stats" | "abertos");
    if is_subcommand {
        return argv;
    }

    // If the first token is a flag, treat it as "dash flags".
    if arg1.starts_with('-') {
        argv.insert(1, "dash".to_string());
        return argv;
    }

    // Otherwise, leave as-is.
    argv
}
