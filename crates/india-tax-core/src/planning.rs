//! Tax planning: unused deduction headroom and what it would save.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::config::TaxConfig;
use crate::deductions::{allowed_deductions, DeductionBreakdown};
use crate::income_tax::regular::regular_tax;
use crate::types::{with_metadata, ComputationOutput, Money, Rate, Regime};
use crate::IndiaTaxResult;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlanningInput {
    pub annual_income: Money,
    #[serde(default)]
    pub age: Option<u32>,
    #[serde(default)]
    pub deductions: DeductionBreakdown,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaxSavingOpportunity {
    pub section: String,
    pub limit: Money,
    pub claimed: Money,
    pub headroom: Money,
    /// Old-regime tax saved if the full headroom were used.
    pub estimated_tax_saving: Money,
    pub suggestion: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaxPlan {
    pub current_old_regime_tax: Money,
    pub old_regime_marginal_rate: Rate,
    pub opportunities: Vec<TaxSavingOpportunity>,
    /// Saving if every headroom were used together.
    pub combined_tax_saving: Money,
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// List capped deduction sections with unused headroom, priced against the
/// old regime, which is the only regime that honours them.
pub fn find_tax_saving_opportunities(
    config: &TaxConfig,
    input: &PlanningInput,
) -> IndiaTaxResult<ComputationOutput<TaxPlan>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    let allowed = allowed_deductions(config, input.age, &input.deductions, &mut warnings)?;
    let current = regular_tax(
        config,
        Regime::Old,
        input.annual_income,
        allowed.total,
        &mut warnings,
    )?;

    let caps = &config.deduction_caps;
    let sections: [(&str, Money, Money, &str); 3] = [
        (
            "80C",
            caps.section_80c,
            allowed.section_80c,
            "Invest in EPF, PPF, ELSS or life insurance premium",
        ),
        (
            "80D",
            caps.section_80d_for_age(input.age),
            allowed.section_80d,
            "Pay health insurance premium for self and family",
        ),
        (
            "80CCD(1B)",
            caps.section_80ccd,
            allowed.section_80ccd,
            "Make an additional NPS contribution",
        ),
    ];

    // Scratch sink for the what-if runs; their warnings repeat the current run's.
    let mut scratch: Vec<String> = Vec::new();
    let mut opportunities: Vec<TaxSavingOpportunity> = Vec::new();
    let mut total_headroom = Decimal::ZERO;

    for (section, limit, claimed, suggestion) in sections {
        let headroom = limit - claimed;
        if headroom <= Decimal::ZERO {
            continue;
        }
        total_headroom += headroom;

        let with_headroom = regular_tax(
            config,
            Regime::Old,
            input.annual_income,
            allowed.total + headroom,
            &mut scratch,
        )?;

        opportunities.push(TaxSavingOpportunity {
            section: section.to_string(),
            limit,
            claimed,
            headroom,
            estimated_tax_saving: current.total_tax - with_headroom.total_tax,
            suggestion: format!("{suggestion}: up to {headroom} more under section {section}."),
        });
    }

    let combined_tax_saving = if total_headroom > Decimal::ZERO {
        let all_used = regular_tax(
            config,
            Regime::Old,
            input.annual_income,
            allowed.total + total_headroom,
            &mut scratch,
        )?;
        current.total_tax - all_used.total_tax
    } else {
        Decimal::ZERO
    };

    if opportunities.is_empty() {
        warnings.push("All capped deduction sections are fully used.".to_string());
    }

    let result = TaxPlan {
        current_old_regime_tax: current.total_tax,
        old_regime_marginal_rate: current.marginal_rate,
        opportunities,
        combined_tax_saving,
    };

    let assumptions = serde_json::json!({
        "annual_income": input.annual_income.to_string(),
        "age": input.age,
        "regime": Regime::Old,
    });

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Unused deduction headroom per section, priced as the old-regime tax difference",
        &config.fiscal_year,
        &assumptions,
        warnings,
        elapsed,
        result,
    ))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn plan(income: Money, age: Option<u32>, deductions: DeductionBreakdown) -> TaxPlan {
        let input = PlanningInput {
            annual_income: income,
            age,
            deductions,
        };
        find_tax_saving_opportunities(&TaxConfig::default(), &input)
            .unwrap()
            .result
    }

    #[test]
    fn test_all_sections_open() {
        let p = plan(dec!(1_500_000), Some(35), DeductionBreakdown::default());
        assert_eq!(p.opportunities.len(), 3);
        assert_eq!(p.old_regime_marginal_rate, dec!(0.30));

        // Entirely inside the 30% band: 150,000 * 30% * 1.04
        let c80 = &p.opportunities[0];
        assert_eq!(c80.section, "80C");
        assert_eq!(c80.headroom, dec!(150_000));
        assert_eq!(c80.estimated_tax_saving, dec!(46_800));

        // 225,000 total headroom, still inside the 30% band
        assert_eq!(p.combined_tax_saving, dec!(70_200));
    }

    #[test]
    fn test_partially_used_80c() {
        let p = plan(
            dec!(1_500_000),
            Some(35),
            DeductionBreakdown {
                section_80c: dec!(100_000),
                ..Default::default()
            },
        );
        let c80 = p.opportunities.iter().find(|o| o.section == "80C").unwrap();
        assert_eq!(c80.headroom, dec!(50_000));
        assert!(c80.suggestion.contains("50000"));
    }

    #[test]
    fn test_senior_gets_larger_80d_headroom() {
        let p = plan(dec!(1_500_000), Some(70), DeductionBreakdown::default());
        let d = p.opportunities.iter().find(|o| o.section == "80D").unwrap();
        assert_eq!(d.headroom, dec!(50_000));
    }

    #[test]
    fn test_no_saving_below_exemption() {
        let p = plan(dec!(200_000), None, DeductionBreakdown::default());
        assert!(p
            .opportunities
            .iter()
            .all(|o| o.estimated_tax_saving.is_zero()));
        assert_eq!(p.current_old_regime_tax, dec!(0));
    }

    #[test]
    fn test_fully_used_sections() {
        let input = PlanningInput {
            annual_income: dec!(2_000_000),
            age: Some(30),
            deductions: DeductionBreakdown {
                section_80c: dec!(150_000),
                section_80d: dec!(25_000),
                section_80ccd: dec!(50_000),
                other: dec!(0),
            },
        };
        let out = find_tax_saving_opportunities(&TaxConfig::default(), &input).unwrap();
        assert!(out.result.opportunities.is_empty());
        assert_eq!(out.result.combined_tax_saving, dec!(0));
        assert_eq!(out.warnings.len(), 1);
    }
}
