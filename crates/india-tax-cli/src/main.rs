mod commands;
mod input;
mod output;

use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use std::process;
use tracing_subscriber::EnvFilter;


use commands::advance_tax::AdvanceTaxArgs;
use commands::assessment::AssessArgs;
use commands::capital_gains::CapitalGainsArgs;
use commands::deductions::DeductionsArgs;
use commands::income_tax::{CompareArgs, RegularTaxArgs};
use commands::planning::PlanArgs;

/// Indian income tax calculations
#[derive(Parser)]
#[command(
    name = "itax",
    version,
    about = "Indian income tax, capital gains and advance tax calculations",
    long_about = "A CLI for computing Indian personal income tax with decimal precision. \
                  Supports new and old regime tax, regime comparison, quarter-wise \
                  capital gains, advance tax schedules, deduction caps and tax planning."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output format
    #[arg(long, default_value = "json", global = true)]
    output: OutputFormat,

    /// Path to a JSON tax configuration (overrides --fiscal-year)
    #[arg(long, global = true)]
    config: Option<String>,

    /// Built-in fiscal year tables to use, e.g. "2024-25"
    #[arg(long, global = true)]
    fiscal_year: Option<String>,

    /// Log computation steps to stderr
    #[arg(long, short, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Income tax on regular income under one regime
    RegularTax(RegularTaxArgs),
    /// Compare new and old regimes and recommend the cheaper one
    Compare(CompareArgs),
    /// Capital gains tax with quarter-wise allocation
    CapitalGains(CapitalGainsArgs),
    /// Advance tax installment schedule
    AdvanceTax(AdvanceTaxArgs),
    /// Apply statutory caps to claimed deductions
    Deductions(DeductionsArgs),
    /// Find unused deduction headroom and the tax it would save
    Plan(PlanArgs),
    /// Full assessment: both regimes, capital gains and advance tax
    Assess(AssessArgs),
    /// Print the active tax configuration
    Config,
    /// Print version information
    Version,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    Json,
    Table,
    Csv,
    Minimal,
}

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("india_tax_core=debug,india_tax_cli=debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Run one subcommand. `Ok(None)` means it printed its own output.
fn dispatch(
    command: Commands,
    config: Option<&str>,
    fiscal_year: Option<&str>,
) -> Result<Option<serde_json::Value>, Box<dyn std::error::Error>> {
    let engine = || commands::load_engine(config, fiscal_year);
    let value = match command {
        Commands::RegularTax(args) => commands::income_tax::run_regular_tax(args, &engine()?)?,
        Commands::Compare(args) => commands::income_tax::run_compare(args, &engine()?)?,
        Commands::CapitalGains(args) => {
            commands::capital_gains::run_capital_gains(args, &engine()?)?
        }
        Commands::AdvanceTax(args) => commands::advance_tax::run_advance_tax(args, &engine()?)?,
        Commands::Deductions(args) => commands::deductions::run_deductions(args, &engine()?)?,
        Commands::Plan(args) => commands::planning::run_plan(args, &engine()?)?,
        Commands::Assess(args) => commands::assessment::run_assess(args, &engine()?)?,
        Commands::Config => serde_json::to_value(engine()?.config())?,
        Commands::Version => {
            println!("itax {}", env!("CARGO_PKG_VERSION"));
            return Ok(None);
        }
    };
    Ok(Some(value))
}

fn main() {
    let Cli {
        command,
        output: output_format,
        config,
        fiscal_year,
        verbose,
    } = Cli::parse();
    init_tracing(verbose);

    match dispatch(command, config.as_deref(), fiscal_year.as_deref()) {
        Ok(Some(value)) => {
            output::format_output(&output_format, &value);
            process::exit(0);
        }
        Ok(None) => {}
        Err(e) => {
            eprintln!("{}: {}", "error".red().bold(), e);
            process::exit(1);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_needs_no_engine() {
        // An unknown fiscal year would fail engine construction
        let out = dispatch(Commands::Version, None, Some("1999-00")).unwrap();
        assert!(out.is_none());
    }

    #[test]
    fn test_config_prints_selected_year() {
        let out = dispatch(Commands::Config, None, Some("2023-24"))
            .unwrap()
            .unwrap();
        assert_eq!(out["fiscal_year"], "2023-24");

        assert!(dispatch(Commands::Config, None, Some("1999-00")).is_err());
    }
}
