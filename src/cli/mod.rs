//! Command-line parsing for the statistics dashboard.
//!
//! The goal of this module is to keep **argument parsing** and **command dispatch**
//! separate from the aggregation/rendering code.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::domain::{Dimension, YearPolicy};

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(name = "laudos", version, about = "Estatísticas e tramitação de laudos de balística")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Launch the interactive dashboard (panel grid + open-transit table).
    Dash(RunArgs),
    /// Print the panel summaries and then the open-transit listing.
    Stats(StatsArgs),
    /// Print only the open-transit listing.
    Abertos(DbArgs),
}

/// Options shared by every command that touches the database.
#[derive(Debug, Parser, Clone)]
pub struct DbArgs {
    /// SQLite database path (defaults to the LAUDOS_DB environment variable).
    #[arg(long, value_name = "PATH")]
    pub db: Option<PathBuf>,
}

/// Common options for panel generation.
#[derive(Debug, Parser, Clone)]
pub struct RunArgs {
    #[command(flatten)]
    pub db: DbArgs,

    /// Policy for non-numeric values in the 'ano' column.
    #[arg(long, value_enum, default_value_t = YearPolicy::AbortAll)]
    pub year_policy: YearPolicy,

    /// Panel dimensions in slot order (at most 6); defaults to the full catalog.
    #[arg(long, value_enum, value_delimiter = ',', num_args = 1..)]
    pub panels: Option<Vec<Dimension>>,
}

/// Options for the plain-text statistics report.
#[derive(Debug, Parser, Clone)]
pub struct StatsArgs {
    #[command(flatten)]
    pub run: RunArgs,

    /// Export the aggregated series to a JSON file.
    #[arg(long, value_name = "JSON")]
    pub export: Option<PathBuf>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_stats_with_panel_catalog() {
        let cli = Cli::parse_from([
            "laudos",
            "stats",
            "--panels",
            "opm,ano,perito,marca",
            "--year-policy",
            "partial",
        ]);
        let Command::Stats(args) = cli.command else {
            panic!("expected stats");
        };
        assert_eq!(
            args.run.panels,
            Some(vec![
                Dimension::Opm,
                Dimension::Ano,
                Dimension::PeritoRelator,
                Dimension::MarcaArma,
            ])
        );
        assert_eq!(args.run.year_policy, YearPolicy::Partial);
    }

    #[test]
    fn parses_abertos_with_db_override() {
        let cli = Cli::parse_from(["laudos", "abertos", "--db", "/tmp/laudos.db"]);
        let Command::Abertos(args) = cli.command else {
            panic!("expected abertos");
        };
        assert_eq!(args.db, Some(PathBuf::from("/tmp/laudos.db")));
    }
}
