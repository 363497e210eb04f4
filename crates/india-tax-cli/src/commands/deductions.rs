use clap::Args;
use serde_json::Value;

use india_tax_core::deductions::DeductionInput;
use india_tax_core::engine::TaxEngine;

use super::DeductionFlags;
use crate::input;

/// Arguments for capping claimed deductions
#[derive(Args)]
pub struct DeductionsArgs {
    /// Path to JSON input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,

    /// Taxpayer age in years (raises the 80D cap for senior citizens)
    #[arg(long)]
    pub age: Option<u32>,

    #[command(flatten)]
    pub claims: DeductionFlags,
}

pub fn run_deductions(
    args: DeductionsArgs,
    engine: &TaxEngine,
) -> Result<Value, Box<dyn std::error::Error>> {
    let deduction_input: DeductionInput = match input::read_input(args.input.as_deref())? {
        Some(parsed) => parsed,
        None => DeductionInput {
            age: args.age,
            deductions: args.claims.breakdown(),
        },
    };

    let result = engine.deductions(&deduction_input)?;
    Ok(serde_json::to_value(result)?)
}
