//! `datalab` - CLI for the coursework tasks
//!
//! Each subcommand runs one task from the library and prints its result.

#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

use std::num::NonZeroUsize;

use anyhow::Context;
use clap::Parser;
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::info;

use datalab::binning::{normal_prices, Bins};
use datalab::chart::{draw_bin_counts, draw_salary_chart};
use datalab::cli::{
    AnomaliesCommand, BinCommand, Cli, Command, ConfigCommand, EmployeesCommand, OutputFormat,
    SalesCommand,
};
use datalab::employees::{generate_employees, insert_script, summarize_salaries};
use datalab::sales::{generate_sales, write_csv};
use datalab::{analyze, init_logging, Config, EmployeeStore};

/// Repayment ledger used by `anomalies --demo`.
const DEMO_LEDGER: [i64; 12] = [102, 98, 97, 99, 101, 100, 250, 97, 95, 420, 101, 99];

/// Rows shown by the binning preview.
const PREVIEW_ROWS: usize = 5;

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbosity());

    let config = Config::load_from(cli.config.clone()).context("loading configuration")?;

    match cli.command {
        Command::Anomalies(cmd) => handle_anomalies(&config, &cmd),
        Command::Sales(cmd) => handle_sales(&config, &cmd),
        Command::Employees(cmd) => handle_employees(&config, cmd),
        Command::Bin(cmd) => handle_bin(&config, &cmd),
        Command::Config(cmd) => handle_config(&config, cmd),
    }
}

fn handle_anomalies(config: &Config, cmd: &AnomaliesCommand) -> anyhow::Result<()> {
    let readings: &[i64] = if cmd.demo { &DEMO_LEDGER } else { &cmd.readings };
    let report = analyze(readings, &cmd.id, config.anomaly)?;

    match cmd.format {
        OutputFormat::Json if cmd.explain => {
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
        OutputFormat::Json => println!("{}", serde_json::to_string(&report.flagged)?),
        OutputFormat::Plain => {
            if cmd.explain {
                println!("Seed:       {}", report.seed);
                println!("Sample:     {:?}", report.sample);
                println!("Mean:       {:.4}", report.mean);
                println!("Std dev:    {:.4}", report.std_dev);
                println!("Threshold:  {:.4}", report.threshold);
                println!();
            }
            println!("{:?}", report.flagged);
        }
    }
    Ok(())
}

fn handle_sales(config: &Config, cmd: &SalesCommand) -> anyhow::Result<()> {
    let rows = cmd.rows.map_or(config.sales.rows, NonZeroUsize::get);
    let seed = cmd.seed.unwrap_or(config.sales.seed);
    let path = cmd.output.as_ref().unwrap_or(&config.sales.output_path);

    let records = generate_sales(rows, seed);
    write_csv(&records, path)
        .with_context(|| format!("writing sales to {}", path.display()))?;
    println!("Wrote {} sales records to {}", records.len(), path.display());
    Ok(())
}

fn handle_employees(config: &Config, cmd: EmployeesCommand) -> anyhow::Result<()> {
    match cmd {
        EmployeesCommand::Sql { count, seed, apply } => {
            let count = count.map_or(config.employees.count, NonZeroUsize::get);
            let mut rng = seed.map_or_else(StdRng::from_entropy, StdRng::seed_from_u64);
            let employees = generate_employees(count, &mut rng);
            let script = insert_script(&employees);
            println!("{script}");

            if apply {
                let store = EmployeeStore::open(config.database_path())?;
                let added = store.apply_script(&script)?;
                info!("Inserted {} employees into {}", added, store.path().display());
            }
        }
        EmployeesCommand::Report {
            chart,
            no_chart,
            format,
        } => {
            let store = EmployeeStore::open(config.database_path())?;
            let employees = store.fetch_employees()?;
            let summary = summarize_salaries(&employees).with_context(|| {
                format!(
                    "no employees in {}; run `datalab employees sql --apply` first",
                    store.path().display()
                )
            })?;

            match format {
                OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&summary)?),
                OutputFormat::Plain => {
                    println!("Grouped Data:");
                    println!("{:<22} {:>10} {:>12}", "position", "start_year", "salary");
                    for g in &summary.groups {
                        println!(
                            "{:<22} {:>10} {:>12.2}",
                            g.position, g.start_year, g.average_salary
                        );
                    }
                    println!();
                    println!(
                        "Highest Average: {} {} {:.2}",
                        summary.highest.position,
                        summary.highest.start_year,
                        summary.highest.average_salary
                    );
                    println!(
                        "Lowest Average: {} {} {:.2}",
                        summary.lowest.position,
                        summary.lowest.start_year,
                        summary.lowest.average_salary
                    );
                }
            }

            if !no_chart {
                let path = chart.unwrap_or_else(|| config.employees.chart_path.clone());
                draw_salary_chart(&summary, &path)?;
            }
        }
    }
    Ok(())
}

fn handle_bin(config: &Config, cmd: &BinCommand) -> anyhow::Result<()> {
    let samples = cmd.samples.map_or(config.binning.samples, NonZeroUsize::get);
    let seed = cmd.seed.unwrap_or(config.binning.seed);
    let prices = normal_prices(samples, config.binning.mean, config.binning.std_dev, seed)?;

    let bins = Bins::price_categories();
    let assignments = bins.cut(&prices);

    println!("Original Data Sample:");
    for (i, price) in prices.iter().take(PREVIEW_ROWS).enumerate() {
        println!("{i:<4} {price:.6}");
    }
    println!();
    println!("Binned Data Sample:");
    for (i, bin) in assignments.iter().take(PREVIEW_ROWS).enumerate() {
        let label = bin.map_or("NaN", |idx| bins.labels()[idx].as_str());
        println!("{i:<4} {label}");
    }
    println!();
    println!("Bin Counts:");
    let counts = bins.value_counts(&assignments);
    for c in &counts {
        println!("{:<8} {}", c.label, c.count);
    }
    let unbinned = assignments.iter().filter(|a| a.is_none()).count();
    if unbinned > 0 {
        println!("{:<8} {unbinned}", "(none)");
    }

    if !cmd.no_chart {
        let path = cmd
            .chart
            .clone()
            .unwrap_or_else(|| config.binning.chart_path.clone());
        draw_bin_counts(&counts, &path)?;
    }
    Ok(())
}

fn handle_config(config: &Config, cmd: ConfigCommand) -> anyhow::Result<()> {
    match cmd {
        ConfigCommand::Show { json } => {
            if json {
                println!("{}", serde_json::to_string_pretty(config)?);
            } else {
                println!("Current Configuration");
                println!("=====================");
                println!();
                println!("[Anomaly]");
                println!(
                    "  Threshold multiplier: {}",
                    config.anomaly.threshold_multiplier
                );
                println!("  Sample divisor:       {}", config.anomaly.sample_divisor);
                println!();
                println!("[Sales]");
                println!("  Rows:                 {}", config.sales.rows);
                println!("  Seed:                 {}", config.sales.seed);
                println!(
                    "  Output path:          {}",
                    config.sales.output_path.display()
                );
                println!();
                println!("[Employees]");
                println!("  Count:                {}", config.employees.count);
                println!(
                    "  Database path:        {}",
                    config.database_path().display()
                );
                println!(
                    "  Chart path:           {}",
                    config.employees.chart_path.display()
                );
                println!();
                println!("[Binning]");
                println!("  Samples:              {}", config.binning.samples);
                println!(
                    "  Mean / std dev:       {} / {}",
                    config.binning.mean, config.binning.std_dev
                );
                println!("  Seed:                 {}", config.binning.seed);
                println!(
                    "  Chart path:           {}",
                    config.binning.chart_path.display()
                );
            }
        }
        ConfigCommand::Path => {
            println!("{}", Config::default_config_path().display());
        }
        ConfigCommand::Validate { file } => {
            let path = file.unwrap_or_else(Config::default_config_path);
            println!("Validating configuration: {}", path.display());
            match Config::load_from(Some(path)) {
                Ok(_) => println!("Configuration is valid."),
                Err(e) => println!("Configuration error: {e}"),
            }
        }
    }
    Ok(())
}
