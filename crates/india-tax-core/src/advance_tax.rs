use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::time::Instant;
use tracing::debug;

use crate::capital_gains::validate_quarters;
use crate::config::TaxConfig;
use crate::error::IndiaTaxError;
use crate::types::{with_metadata, ComputationOutput, Money, Percentage, Quarter, QuarterlyAmounts};
use crate::IndiaTaxResult;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdvanceTaxInput {
    /// Annual liability including capital gains tax.
    pub total_annual_tax: Money,
    pub cg_tax_by_quarter: QuarterlyAmounts,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdvanceTaxInstallment {
    pub quarter: Quarter,
    /// Months whose capital gains fall due in this installment.
    pub gains_period: String,
    pub due_date: NaiveDate,
    pub cumulative_percentage: Percentage,
    pub installment_percentage: Percentage,
    pub regular_tax_due: Money,
    pub capital_gains_tax_due: Money,
    pub total_amount_due: Money,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdvanceTaxSchedule {
    pub regular_tax: Money,
    pub capital_gains_tax: Money,
    pub installments: Vec<AdvanceTaxInstallment>,
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Four cumulative advance tax installments.
///
/// Regular tax is spread on the statutory cumulative percentages; each
/// quarter's capital gains tax is due in full with that quarter's installment.
pub fn compute_advance_tax_schedule(
    config: &TaxConfig,
    input: &AdvanceTaxInput,
) -> IndiaTaxResult<ComputationOutput<AdvanceTaxSchedule>> {
    let start = Instant::now();
    let warnings: Vec<String> = Vec::new();

    let result = advance_tax_schedule(config, input.total_annual_tax, &input.cg_tax_by_quarter)?;

    let assumptions = serde_json::json!({
        "total_annual_tax": input.total_annual_tax.to_string(),
        "due_dates": config.advance_tax_due_dates,
        "rounding": "Q1..Q3 cumulative targets rounded to paise; final installment settles the remainder",
    });

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Cumulative advance tax: regular tax on statutory percentages, \
         capital gains tax in the quarter realised",
        &config.fiscal_year,
        &assumptions,
        warnings,
        elapsed,
        result,
    ))
}

pub(crate) fn advance_tax_schedule(
    config: &TaxConfig,
    total_annual_tax: Money,
    cg_tax_by_quarter: &QuarterlyAmounts,
) -> IndiaTaxResult<AdvanceTaxSchedule> {
    if total_annual_tax < Decimal::ZERO {
        return Err(IndiaTaxError::InvalidInput {
            field: "total_annual_tax".into(),
            reason: "Total annual tax cannot be negative".into(),
        });
    }
    validate_quarters("cg_tax_by_quarter", cg_tax_by_quarter)?;

    let capital_gains_tax: Money = cg_tax_by_quarter.values().copied().sum();
    let regular_tax = total_annual_tax - capital_gains_tax;
    if regular_tax < Decimal::ZERO {
        return Err(IndiaTaxError::InvalidInput {
            field: "cg_tax_by_quarter".into(),
            reason: format!(
                "Capital gains tax of {capital_gains_tax} exceeds total annual tax of {total_annual_tax}"
            ),
        });
    }

    let hundred = Decimal::ONE_HUNDRED;
    let mut cumulative_regular = Decimal::ZERO;
    let mut previous_pct = Decimal::ZERO;
    let mut installments: Vec<AdvanceTaxInstallment> =
        Vec::with_capacity(config.advance_tax_due_dates.len());

    let last = config.advance_tax_due_dates.len().saturating_sub(1);
    for (i, due) in config.advance_tax_due_dates.iter().enumerate() {
        // The final installment settles whatever is left, sub-paise included.
        let regular_tax_due = if i == last {
            regular_tax - cumulative_regular
        } else {
            (regular_tax * due.cumulative_percentage / hundred).round_dp(2) - cumulative_regular
        };
        let capital_gains_tax_due = cg_tax_by_quarter
            .get(&due.quarter)
            .copied()
            .unwrap_or(Decimal::ZERO);

        installments.push(AdvanceTaxInstallment {
            quarter: due.quarter,
            gains_period: due.quarter.months().to_string(),
            due_date: due.due_date,
            cumulative_percentage: due.cumulative_percentage,
            installment_percentage: due.cumulative_percentage - previous_pct,
            regular_tax_due,
            capital_gains_tax_due,
            total_amount_due: regular_tax_due + capital_gains_tax_due,
        });

        cumulative_regular += regular_tax_due;
        previous_pct = due.cumulative_percentage;
    }

    debug!(
        %regular_tax,
        %capital_gains_tax,
        installments = installments.len(),
        "built advance tax schedule"
    );

    Ok(AdvanceTaxSchedule {
        regular_tax,
        capital_gains_tax,
        installments,
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::zero_quarters;
    use rust_decimal_macros::dec;

    fn run(total: Money, cg: QuarterlyAmounts) -> AdvanceTaxSchedule {
        let input = AdvanceTaxInput {
            total_annual_tax: total,
            cg_tax_by_quarter: cg,
        };
        compute_advance_tax_schedule(&TaxConfig::default(), &input)
            .unwrap()
            .result
    }

    #[test]
    fn test_regular_tax_only() {
        let s = run(dec!(100_000), zero_quarters());
        let due: Vec<Money> = s.installments.iter().map(|i| i.regular_tax_due).collect();
        assert_eq!(due, vec![dec!(15_000), dec!(30_000), dec!(30_000), dec!(25_000)]);
        let pct: Vec<Percentage> = s
            .installments
            .iter()
            .map(|i| i.installment_percentage)
            .collect();
        assert_eq!(pct, vec![dec!(15), dec!(30), dec!(30), dec!(25)]);
    }

    #[test]
    fn test_capital_gains_due_in_quarter_realised() {
        let mut cg = zero_quarters();
        cg.insert(Quarter::Q2, dec!(20_000));
        let s = run(dec!(120_000), cg);
        assert_eq!(s.regular_tax, dec!(100_000));
        assert_eq!(s.installments[1].capital_gains_tax_due, dec!(20_000));
        assert_eq!(s.installments[1].total_amount_due, dec!(50_000));
        assert_eq!(s.installments[0].capital_gains_tax_due, dec!(0));
        assert_eq!(s.installments[1].gains_period, "Jul-Sep");
    }

    #[test]
    fn test_installments_sum_to_regular_tax() {
        let mut cg = zero_quarters();
        cg.insert(Quarter::Q1, dec!(1_234.56));
        cg.insert(Quarter::Q4, dec!(999.99));
        let s = run(dec!(50_700.33), cg);
        let sum: Money = s.installments.iter().map(|i| i.regular_tax_due).sum();
        assert_eq!(sum, s.regular_tax);
        let total: Money = s.installments.iter().map(|i| i.total_amount_due).sum();
        assert_eq!(total, dec!(50_700.33));
    }

    #[test]
    fn test_sub_paise_tax_settled_by_final_installment() {
        // 10,00,001 under the new regime
        let s = run(dec!(50_700.156), zero_quarters());
        let due: Vec<Money> = s.installments.iter().map(|i| i.regular_tax_due).collect();
        assert_eq!(
            due,
            vec![dec!(7_605.02), dec!(15_210.05), dec!(15_210.05), dec!(12_675.036)]
        );
        let sum: Money = due.iter().copied().sum();
        assert_eq!(sum, dec!(50_700.156));
    }

    #[test]
    fn test_due_dates_in_order() {
        let s = run(dec!(10_000), zero_quarters());
        assert_eq!(
            s.installments[0].due_date,
            NaiveDate::from_ymd_opt(2024, 6, 15).unwrap()
        );
        assert_eq!(
            s.installments[3].due_date,
            NaiveDate::from_ymd_opt(2025, 3, 15).unwrap()
        );
        assert!(s
            .installments
            .windows(2)
            .all(|w| w[0].due_date < w[1].due_date));
    }

    #[test]
    fn test_capital_gains_exceeding_total_rejected() {
        let mut cg = zero_quarters();
        cg.insert(Quarter::Q3, dec!(10_001));
        let input = AdvanceTaxInput {
            total_annual_tax: dec!(10_000),
            cg_tax_by_quarter: cg,
        };
        match compute_advance_tax_schedule(&TaxConfig::default(), &input).unwrap_err() {
            IndiaTaxError::InvalidInput { field, .. } => assert_eq!(field, "cg_tax_by_quarter"),
            other => panic!("Expected InvalidInput, got {:?}", other),
        }
    }

    #[test]
    fn test_zero_tax_schedule() {
        let s = run(dec!(0), zero_quarters());
        assert!(s.installments.iter().all(|i| i.total_amount_due.is_zero()));
    }
}
