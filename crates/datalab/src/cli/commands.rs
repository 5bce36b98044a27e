//! CLI command definitions.
//!
//! This module defines the structure of all CLI subcommands.

use std::num::NonZeroUsize;
use std::path::PathBuf;

use clap::{Args, Subcommand, ValueEnum};

/// Anomaly flagging arguments.
#[derive(Debug, Args)]
pub struct AnomaliesCommand {
    /// Identifier whose last three digits seed the sample (e.g. a student ID)
    #[arg(short, long)]
    pub id: String,

    /// Readings to check
    #[arg(allow_negative_numbers = true)]
    pub readings: Vec<i64>,

    /// Use the built-in repayment ledger instead of explicit readings
    #[arg(long, conflicts_with = "readings")]
    pub demo: bool,

    /// Print the sample statistics along with the flagged readings
    #[arg(short, long)]
    pub explain: bool,

    /// Output format
    #[arg(short, long, value_enum, default_value = "plain")]
    pub format: OutputFormat,
}

/// Synthetic sales arguments.
#[derive(Debug, Args)]
pub struct SalesCommand {
    /// Number of records (defaults to configuration)
    #[arg(short, long)]
    pub rows: Option<NonZeroUsize>,

    /// Generator seed (defaults to configuration)
    #[arg(short, long)]
    pub seed: Option<u64>,

    /// Output CSV path (defaults to configuration)
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,
}

/// Employee database commands.
#[derive(Debug, Subcommand)]
pub enum EmployeesCommand {
    /// Print INSERT statements for fake employees
    Sql {
        /// Number of employees (defaults to configuration)
        #[arg(short = 'n', long)]
        count: Option<NonZeroUsize>,

        /// Generator seed; random when omitted
        #[arg(short, long)]
        seed: Option<u64>,

        /// Also execute the statements against the employee database
        #[arg(long)]
        apply: bool,
    },

    /// Average salary by position and start year
    Report {
        /// Chart output path (defaults to configuration)
        #[arg(long, value_name = "FILE")]
        chart: Option<PathBuf>,

        /// Skip rendering the chart
        #[arg(long, conflicts_with = "chart")]
        no_chart: bool,

        /// Output format
        #[arg(short, long, value_enum, default_value = "plain")]
        format: OutputFormat,
    },
}

/// Price binning arguments.
#[derive(Debug, Args)]
pub struct BinCommand {
    /// Number of simulated prices (defaults to configuration)
    #[arg(short = 'n', long)]
    pub samples: Option<NonZeroUsize>,

    /// Generator seed (defaults to configuration)
    #[arg(short, long)]
    pub seed: Option<u64>,

    /// Chart output path (defaults to configuration)
    #[arg(long, value_name = "FILE")]
    pub chart: Option<PathBuf>,

    /// Skip rendering the chart
    #[arg(long, conflicts_with = "chart")]
    pub no_chart: bool,
}

/// Configuration commands.
#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Show current configuration
    Show {
        /// Output as JSON
        #[arg(short, long)]
        json: bool,
    },

    /// Show the configuration file path
    Path,

    /// Validate configuration
    Validate {
        /// Path to configuration file to validate
        #[arg(short, long)]
        file: Option<PathBuf>,
    },
}

/// Output format for commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// Plain text output
    #[default]
    Plain,
    /// JSON output
    Json,
}
