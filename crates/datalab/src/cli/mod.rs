//! Command-line interface for datalab.
//!
//! This module provides the CLI structure for the `datalab` binary.

mod commands;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

pub use commands::{
    AnomaliesCommand, BinCommand, ConfigCommand, EmployeesCommand, OutputFormat, SalesCommand,
};

/// datalab - Data-analysis coursework tasks
///
/// Flag anomalies in a sample, synthesize sales data, generate and report on
/// fake employee records, and bin continuous values.
#[derive(Debug, Parser)]
#[command(name = "datalab")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to custom configuration file
    #[arg(short, long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Increase verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// The command to execute
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Flag readings far from the mean of a seeded sample
    Anomalies(AnomaliesCommand),

    /// Write a CSV of synthetic sales records
    Sales(SalesCommand),

    /// Generate fake employees or report on stored ones
    #[command(subcommand)]
    Employees(EmployeesCommand),

    /// Bin simulated house prices into Low / Medium / High
    Bin(BinCommand),

    /// View or validate configuration
    #[command(subcommand)]
    Config(ConfigCommand),
}

impl Cli {
    /// Get the verbosity level based on flags.
    #[must_use]
    pub fn verbosity(&self) -> crate::logging::Verbosity {
        crate::logging::Verbosity::from_flags(self.quiet, self.verbose)
    }
}
