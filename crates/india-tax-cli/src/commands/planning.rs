use clap::Args;
use rust_decimal::Decimal;
use serde_json::Value;

use india_tax_core::engine::TaxEngine;
use india_tax_core::planning::PlanningInput;

use super::DeductionFlags;
use crate::input;

/// Arguments for deduction headroom planning
#[derive(Args)]
pub struct PlanArgs {
    /// Path to JSON input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,

    /// Gross annual income
    #[arg(long)]
    pub income: Option<Decimal>,

    /// Taxpayer age in years
    #[arg(long)]
    pub age: Option<u32>,

    #[command(flatten)]
    pub claims: DeductionFlags,
}

pub fn run_plan(args: PlanArgs, engine: &TaxEngine) -> Result<Value, Box<dyn std::error::Error>> {
    let plan_input: PlanningInput = match input::read_input(args.input.as_deref())? {
        Some(parsed) => parsed,
        None => PlanningInput {
            annual_income: args
                .income
                .ok_or("--income is required (or provide --input)")?,
            age: args.age,
            deductions: args.claims.breakdown(),
        },
    };

    let result = engine.plan(&plan_input)?;
    Ok(serde_json::to_value(result)?)
}
