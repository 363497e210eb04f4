use clap::Args;
use rust_decimal::Decimal;
use serde_json::Value;

use india_tax_core::advance_tax::AdvanceTaxInput;
use india_tax_core::engine::TaxEngine;

use super::quarterly;
use crate::input;

/// Arguments for the advance tax installment schedule
#[derive(Args)]
pub struct AdvanceTaxArgs {
    /// Path to JSON input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,

    /// Total annual tax, including capital gains tax
    #[arg(long)]
    pub total_tax: Option<Decimal>,

    /// Capital gains tax per quarter (comma-separated Q1..Q4)
    #[arg(long, value_delimiter = ',')]
    pub cg_tax: Option<Vec<Decimal>>,
}

pub fn run_advance_tax(
    args: AdvanceTaxArgs,
    engine: &TaxEngine,
) -> Result<Value, Box<dyn std::error::Error>> {
    let schedule_input: AdvanceTaxInput = match input::read_input(args.input.as_deref())? {
        Some(parsed) => parsed,
        None => AdvanceTaxInput {
            total_annual_tax: args
                .total_tax
                .ok_or("--total-tax is required (or provide --input)")?,
            cg_tax_by_quarter: quarterly("cg-tax", args.cg_tax)?,
        },
    };

    let result = engine.advance_tax(&schedule_input)?;
    Ok(serde_json::to_value(result)?)
}
