use clap::Args;
use rust_decimal::Decimal;
use serde_json::Value;

use india_tax_core::engine::TaxEngine;
use india_tax_core::income_tax::comparison::ComparisonInput;
use india_tax_core::income_tax::regular::RegularTaxInput;

use super::RegimeArg;
use crate::input;

/// Arguments for regular income tax under one regime
#[derive(Args)]
pub struct RegularTaxArgs {
    /// Path to JSON input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,

    /// Tax regime
    #[arg(long, value_enum, default_value = "new")]
    pub regime: RegimeArg,

    /// Gross annual income
    #[arg(long)]
    pub income: Option<Decimal>,

    /// Total Chapter VI-A deductions (old regime only)
    #[arg(long)]
    pub deductions: Option<Decimal>,
}

pub fn run_regular_tax(
    args: RegularTaxArgs,
    engine: &TaxEngine,
) -> Result<Value, Box<dyn std::error::Error>> {
    let tax_input: RegularTaxInput = match input::read_input(args.input.as_deref())? {
        Some(parsed) => parsed,
        None => RegularTaxInput {
            regime: args.regime.into(),
            annual_income: args
                .income
                .ok_or("--income is required (or provide --input)")?,
            deductions: args.deductions.unwrap_or_default(),
        },
    };

    let result = engine.regular_tax(&tax_input)?;
    Ok(serde_json::to_value(result)?)
}

/// Arguments for new vs old regime comparison
#[derive(Args)]
pub struct CompareArgs {
    /// Path to JSON input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,

    /// Gross annual income
    #[arg(long)]
    pub income: Option<Decimal>,

    /// Total deductions claimed under the old regime
    #[arg(long)]
    pub deductions: Option<Decimal>,
}

pub fn run_compare(args: CompareArgs, engine: &TaxEngine) -> Result<Value, Box<dyn std::error::Error>> {
    let comparison_input: ComparisonInput = match input::read_input(args.input.as_deref())? {
        Some(parsed) => parsed,
        None => ComparisonInput {
            annual_income: args
                .income
                .ok_or("--income is required (or provide --input)")?,
            deductions: args.deductions.unwrap_or_default(),
        },
    };

    let result = engine.compare(&comparison_input)?;
    Ok(serde_json::to_value(result)?)
}
