//! End-to-end assessment: deductions, both regimes, capital gains,
//! recommendation and the advance tax schedule, in dependency order.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::time::Instant;
use tracing::{debug, warn};

use crate::advance_tax::{advance_tax_schedule, AdvanceTaxSchedule};
use crate::capital_gains::{capital_gains_tax, CapitalGainsInput, CapitalGainsResult};
use crate::config::TaxConfig;
use crate::deductions::{allowed_deductions, AllowedDeductions, DeductionBreakdown};
use crate::income_tax::comparison::recommend;
use crate::income_tax::regular::{regular_tax, TaxResult};
use crate::types::{
    with_metadata, zero_quarters, ComputationOutput, Money, QuarterlyAmounts, Regime,
};
use crate::IndiaTaxResult;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssessmentInput {
    pub annual_income: Money,
    #[serde(default)]
    pub age: Option<u32>,
    #[serde(default)]
    pub deductions: DeductionBreakdown,
    #[serde(default = "zero_quarters")]
    pub ltcg_by_quarter: QuarterlyAmounts,
    #[serde(default = "zero_quarters")]
    pub stcg_by_quarter: QuarterlyAmounts,
    /// Regime to schedule advance tax for; the recommended one when absent.
    #[serde(default)]
    pub schedule_regime: Option<Regime>,
}

/// One regime's regular tax plus the capital gains tax common to both.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegimeLiability {
    pub income_tax: TaxResult,
    pub capital_gains_tax: Money,
    pub total_liability: Money,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Recommendation {
    pub regime: Regime,
    pub savings: Money,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssessmentOutput {
    pub deductions: AllowedDeductions,
    pub new_regime: RegimeLiability,
    pub old_regime: RegimeLiability,
    pub capital_gains: CapitalGainsResult,
    pub recommendation: Recommendation,
    pub schedule_regime: Regime,
    pub advance_tax: AdvanceTaxSchedule,
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Run the whole engine for one taxpayer.
pub fn assess(
    config: &TaxConfig,
    input: &AssessmentInput,
) -> IndiaTaxResult<ComputationOutput<AssessmentOutput>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    let deductions = allowed_deductions(config, input.age, &input.deductions, &mut warnings)?;

    let new_tax = regular_tax(
        config,
        Regime::New,
        input.annual_income,
        Decimal::ZERO,
        &mut warnings,
    )?;
    let old_tax = regular_tax(
        config,
        Regime::Old,
        input.annual_income,
        deductions.total,
        &mut warnings,
    )?;

    let capital_gains = capital_gains_tax(
        config,
        &CapitalGainsInput {
            ltcg_by_quarter: input.ltcg_by_quarter.clone(),
            stcg_by_quarter: input.stcg_by_quarter.clone(),
        },
        &mut warnings,
    )?;

    let new_regime = liability(new_tax, capital_gains.total_cg_tax);
    let old_regime = liability(old_tax, capital_gains.total_cg_tax);

    let recommended = recommend(new_regime.total_liability, old_regime.total_liability);
    let recommendation = Recommendation {
        regime: recommended,
        savings: (new_regime.total_liability - old_regime.total_liability).abs(),
    };

    let schedule_regime = input.schedule_regime.unwrap_or(recommended);
    if schedule_regime != recommended {
        warn!(%schedule_regime, %recommended, "advance tax scheduled for the costlier regime");
        warnings.push(format!(
            "Advance tax is scheduled for the {schedule_regime} regime, \
             which costs {} more than the recommended {recommended} regime.",
            recommendation.savings
        ));
    }

    let scheduled_total = match schedule_regime {
        Regime::New => new_regime.total_liability,
        Regime::Old => old_regime.total_liability,
    };
    let advance_tax =
        advance_tax_schedule(config, scheduled_total, &capital_gains.tax_by_quarter())?;

    debug!(
        %recommended,
        new_total = %new_regime.total_liability,
        old_total = %old_regime.total_liability,
        "assessment complete"
    );

    let result = AssessmentOutput {
        deductions,
        new_regime,
        old_regime,
        capital_gains,
        recommendation,
        schedule_regime,
        advance_tax,
    };

    let assumptions = serde_json::json!({
        "annual_income": input.annual_income.to_string(),
        "age": input.age,
        "claimed_deductions": input.deductions.claimed_total().to_string(),
        "schedule_regime": schedule_regime,
        "assessment_year": config.assessment_year,
    });

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Deduction caps, new and old regime income tax, quarter-wise capital gains tax, \
         regime recommendation and cumulative advance tax schedule",
        &config.fiscal_year,
        &assumptions,
        warnings,
        elapsed,
        result,
    ))
}

fn liability(income_tax: TaxResult, capital_gains_tax: Money) -> RegimeLiability {
    let total_liability = income_tax.total_tax + capital_gains_tax;
    RegimeLiability {
        income_tax,
        capital_gains_tax,
        total_liability,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Quarter;
    use rust_decimal_macros::dec;

    fn salaried(income: Money) -> AssessmentInput {
        AssessmentInput {
            annual_income: income,
            age: Some(35),
            deductions: DeductionBreakdown::default(),
            ltcg_by_quarter: zero_quarters(),
            stcg_by_quarter: zero_quarters(),
            schedule_regime: None,
        }
    }

    #[test]
    fn test_salary_only_recommends_new() {
        let out = assess(&TaxConfig::default(), &salaried(dec!(1_000_000))).unwrap();
        let r = &out.result;
        assert_eq!(r.new_regime.total_liability, dec!(50_700));
        assert_eq!(r.old_regime.total_liability, dec!(117_000));
        assert_eq!(r.recommendation.regime, Regime::New);
        assert_eq!(r.recommendation.savings, dec!(66_300));
        assert_eq!(r.schedule_regime, Regime::New);
        assert_eq!(r.advance_tax.regular_tax, dec!(50_700));
    }

    #[test]
    fn test_capital_gains_flow_into_schedule() {
        let mut input = salaried(dec!(1_000_000));
        input.ltcg_by_quarter.insert(Quarter::Q1, dec!(100_000));
        input.ltcg_by_quarter.insert(Quarter::Q2, dec!(100_000));
        input.stcg_by_quarter.insert(Quarter::Q3, dec!(10_000));

        let r = assess(&TaxConfig::default(), &input).unwrap().result;
        // 9,375 LTCG + 2,000 STCG
        assert_eq!(r.capital_gains.total_cg_tax, dec!(11_375));
        assert_eq!(r.new_regime.total_liability, dec!(62_075));
        assert_eq!(r.advance_tax.regular_tax, dec!(50_700));
        assert_eq!(r.advance_tax.capital_gains_tax, dec!(11_375));

        let q1 = &r.advance_tax.installments[0];
        assert_eq!(q1.regular_tax_due, dec!(7_605));
        assert_eq!(q1.capital_gains_tax_due, dec!(4_687.5));
        let q3 = &r.advance_tax.installments[2];
        assert_eq!(q3.capital_gains_tax_due, dec!(2_000));
    }

    #[test]
    fn test_explicit_schedule_regime_warns() {
        let mut input = salaried(dec!(1_000_000));
        input.schedule_regime = Some(Regime::Old);
        let out = assess(&TaxConfig::default(), &input).unwrap();
        assert_eq!(out.result.schedule_regime, Regime::Old);
        assert_eq!(out.result.advance_tax.regular_tax, dec!(117_000));
        assert!(out.warnings.iter().any(|w| w.contains("Old regime")));
    }

    #[test]
    fn test_heavy_deductions_recommend_old() {
        let mut input = salaried(dec!(1_000_000));
        input.deductions = DeductionBreakdown {
            section_80c: dec!(150_000),
            section_80d: dec!(25_000),
            section_80ccd: dec!(50_000),
            other: dec!(200_000),
        };
        let r = assess(&TaxConfig::default(), &input).unwrap().result;
        assert_eq!(r.deductions.total, dec!(425_000));
        assert_eq!(r.recommendation.regime, Regime::Old);
    }
}
