use clap::Args;
use rust_decimal::Decimal;
use serde_json::Value;

use india_tax_core::capital_gains::CapitalGainsInput;
use india_tax_core::engine::TaxEngine;

use super::quarterly;
use crate::input;

/// Arguments for quarter-wise capital gains tax
#[derive(Args)]
pub struct CapitalGainsArgs {
    /// Path to JSON input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,

    /// Long-term gains per quarter (comma-separated Q1..Q4, e.g. "100000,100000,0,0")
    #[arg(long, value_delimiter = ',')]
    pub ltcg: Option<Vec<Decimal>>,

    /// Short-term gains per quarter (comma-separated Q1..Q4)
    #[arg(long, value_delimiter = ',')]
    pub stcg: Option<Vec<Decimal>>,
}

pub fn run_capital_gains(
    args: CapitalGainsArgs,
    engine: &TaxEngine,
) -> Result<Value, Box<dyn std::error::Error>> {
    let cg_input: CapitalGainsInput = match input::read_input(args.input.as_deref())? {
        Some(parsed) => parsed,
        None => {
            if args.ltcg.is_none() && args.stcg.is_none() {
                return Err("--ltcg and/or --stcg is required (or provide --input)".into());
            }
            CapitalGainsInput {
                ltcg_by_quarter: quarterly("ltcg", args.ltcg)?,
                stcg_by_quarter: quarterly("stcg", args.stcg)?,
            }
        }
    };

    let result = engine.capital_gains(&cg_input)?;
    Ok(serde_json::to_value(result)?)
}
