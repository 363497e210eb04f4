use clap::Args;
use rust_decimal::Decimal;
use serde_json::Value;

use india_tax_core::assessment::AssessmentInput;
use india_tax_core::engine::TaxEngine;

use super::{quarterly, DeductionFlags, RegimeArg};
use crate::input;

/// Arguments for a full assessment
#[derive(Args)]
pub struct AssessArgs {
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

    /// Long-term gains per quarter (comma-separated Q1..Q4)
    #[arg(long, value_delimiter = ',')]
    pub ltcg: Option<Vec<Decimal>>,

    /// Short-term gains per quarter (comma-separated Q1..Q4)
    #[arg(long, value_delimiter = ',')]
    pub stcg: Option<Vec<Decimal>>,

    /// Schedule advance tax for this regime instead of the recommended one
    #[arg(long, value_enum)]
    pub schedule_regime: Option<RegimeArg>,
}

pub fn run_assess(args: AssessArgs, engine: &TaxEngine) -> Result<Value, Box<dyn std::error::Error>> {
    let assessment_input: AssessmentInput = match input::read_input(args.input.as_deref())? {
        Some(parsed) => parsed,
        None => AssessmentInput {
            annual_income: args
                .income
                .ok_or("--income is required (or provide --input)")?,
            age: args.age,
            deductions: args.claims.breakdown(),
            ltcg_by_quarter: quarterly("ltcg", args.ltcg)?,
            stcg_by_quarter: quarterly("stcg", args.stcg)?,
            schedule_regime: args.schedule_regime.map(Into::into),
        },
    };

    let result = engine.assess(&assessment_input)?;
    Ok(serde_json::to_value(result)?)
}
