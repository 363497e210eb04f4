//! Capital gains tax with quarter-wise attribution.
//!
//! LTCG enjoys one annual exemption, evaluated against the yearly total only.
//! The resulting annual LTCG tax is then attributed back to the quarters in
//! proportion to each quarter's share of total LTCG, so advance tax can be
//! scheduled in the quarter the gain was realised. STCG is flat-rate and
//! therefore quarter-local.

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::time::Instant;
use tracing::debug;

use crate::config::TaxConfig;
use crate::error::IndiaTaxError;
use crate::types::{
    with_metadata, zero_quarters, ComputationOutput, Money, Quarter, QuarterlyAmounts,
};
use crate::IndiaTaxResult;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CapitalGainsInput {
    pub ltcg_by_quarter: QuarterlyAmounts,
    pub stcg_by_quarter: QuarterlyAmounts,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuarterTax {
    pub ltcg_tax: Money,
    pub stcg_tax: Money,
    pub total: Money,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CapitalGainsResult {
    pub total_ltcg: Money,
    pub total_stcg: Money,
    pub ltcg_exemption: Money,
    pub taxable_ltcg: Money,
    pub ltcg_tax: Money,
    pub stcg_tax: Money,
    pub total_cg_tax: Money,
    pub quarterly_tax: BTreeMap<Quarter, QuarterTax>,
}

impl CapitalGainsResult {
    /// Total capital gains tax per quarter, the shape the advance tax
    /// scheduler consumes.
    pub fn tax_by_quarter(&self) -> QuarterlyAmounts {
        self.quarterly_tax
            .iter()
            .map(|(q, t)| (*q, t.total))
            .collect()
    }
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Annual LTCG and STCG tax with a per-quarter breakdown whose totals add up
/// exactly to the annual figures.
pub fn compute_capital_gains_tax(
    config: &TaxConfig,
    input: &CapitalGainsInput,
) -> IndiaTaxResult<ComputationOutput<CapitalGainsResult>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    let result = capital_gains_tax(config, input, &mut warnings)?;

    let assumptions = serde_json::json!({
        "ltcg_exemption": config.ltcg_exemption.to_string(),
        "ltcg_rate": config.ltcg_rate.to_string(),
        "stcg_rate": config.stcg_rate.to_string(),
        "allocation": "pro-rata by quarter LTCG share, rounded to paise, \
                       last quarter with LTCG absorbs the remainder",
    });

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Annual LTCG (after exemption) and STCG tax with quarter-wise attribution",
        &config.fiscal_year,
        &assumptions,
        warnings,
        elapsed,
        result,
    ))
}

pub(crate) fn capital_gains_tax(
    config: &TaxConfig,
    input: &CapitalGainsInput,
    warnings: &mut Vec<String>,
) -> IndiaTaxResult<CapitalGainsResult> {
    validate_quarters("ltcg_by_quarter", &input.ltcg_by_quarter)?;
    validate_quarters("stcg_by_quarter", &input.stcg_by_quarter)?;

    let total_ltcg: Money = input.ltcg_by_quarter.values().copied().sum();
    let total_stcg: Money = input.stcg_by_quarter.values().copied().sum();

    let taxable_ltcg = (total_ltcg - config.ltcg_exemption).max(Decimal::ZERO);
    let ltcg_tax = taxable_ltcg * config.ltcg_rate;
    let stcg_tax = total_stcg * config.stcg_rate;

    if total_ltcg > Decimal::ZERO && taxable_ltcg.is_zero() {
        warnings.push(format!(
            "Total LTCG of {total_ltcg} is within the annual exemption of {}; no LTCG tax due.",
            config.ltcg_exemption
        ));
    }

    let ltcg_shares = allocate_ltcg_tax(&input.ltcg_by_quarter, total_ltcg, ltcg_tax);

    let quarterly_tax: BTreeMap<Quarter, QuarterTax> = Quarter::ALL
        .iter()
        .map(|q| {
            let q_ltcg_tax = ltcg_shares.get(q).copied().unwrap_or(Decimal::ZERO);
            let q_stcg = input.stcg_by_quarter.get(q).copied().unwrap_or(Decimal::ZERO);
            let q_stcg_tax = q_stcg * config.stcg_rate;
            (
                *q,
                QuarterTax {
                    ltcg_tax: q_ltcg_tax,
                    stcg_tax: q_stcg_tax,
                    total: q_ltcg_tax + q_stcg_tax,
                },
            )
        })
        .collect();

    let total_cg_tax = ltcg_tax + stcg_tax;

    debug!(
        %total_ltcg,
        %taxable_ltcg,
        %ltcg_tax,
        %total_stcg,
        %stcg_tax,
        "computed capital gains tax"
    );

    Ok(CapitalGainsResult {
        total_ltcg,
        total_stcg,
        ltcg_exemption: config.ltcg_exemption,
        taxable_ltcg,
        ltcg_tax,
        stcg_tax,
        total_cg_tax,
        quarterly_tax,
    })
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Every quarter present, every amount non-negative.
pub(crate) fn validate_quarters(field: &str, amounts: &QuarterlyAmounts) -> IndiaTaxResult<()> {
    for q in Quarter::ALL {
        match amounts.get(&q) {
            None => {
                return Err(IndiaTaxError::InvalidInput {
                    field: format!("{field}.{q}"),
                    reason: "All four quarters are required (use 0 for none)".into(),
                });
            }
            Some(v) if *v < Decimal::ZERO => {
                return Err(IndiaTaxError::InvalidInput {
                    field: format!("{field}.{q}"),
                    reason: "Amount cannot be negative".into(),
                });
            }
            Some(_) => {}
        }
    }
    Ok(())
}

/// Split annual LTCG tax across quarters pro rata to quarter LTCG.
///
/// Earlier shares are truncated to paise; the last quarter with any LTCG
/// takes the remainder so the shares sum to `ltcg_tax` exactly. Truncation
/// keeps that remainder at or above the quarter's exact share, never negative.
fn allocate_ltcg_tax(
    ltcg_by_quarter: &QuarterlyAmounts,
    total_ltcg: Money,
    ltcg_tax: Money,
) -> QuarterlyAmounts {
    let mut shares = zero_quarters();

    if total_ltcg.is_zero() || ltcg_tax.is_zero() {
        return shares;
    }

    let last_with_gains = Quarter::ALL
        .iter()
        .rev()
        .find(|q| ltcg_by_quarter.get(q).is_some_and(|v| !v.is_zero()))
        .copied();

    let mut allocated = Decimal::ZERO;
    for q in Quarter::ALL {
        let gain = ltcg_by_quarter.get(&q).copied().unwrap_or(Decimal::ZERO);
        let share = if Some(q) == last_with_gains {
            ltcg_tax - allocated
        } else {
            (gain / total_ltcg * ltcg_tax).round_dp_with_strategy(2, RoundingStrategy::ToZero)
        };
        allocated += share;
        shares.insert(q, share);
        if Some(q) == last_with_gains {
            break;
        }
    }
    shares
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn quarters(q1: Money, q2: Money, q3: Money, q4: Money) -> QuarterlyAmounts {
        [
            (Quarter::Q1, q1),
            (Quarter::Q2, q2),
            (Quarter::Q3, q3),
            (Quarter::Q4, q4),
        ]
        .into_iter()
        .collect()
    }

    fn run(ltcg: QuarterlyAmounts, stcg: QuarterlyAmounts) -> CapitalGainsResult {
        let input = CapitalGainsInput {
            ltcg_by_quarter: ltcg,
            stcg_by_quarter: stcg,
        };
        compute_capital_gains_tax(&TaxConfig::default(), &input)
            .unwrap()
            .result
    }

    fn zeros() -> QuarterlyAmounts {
        zero_quarters()
    }

    #[test]
    fn test_exemption_boundary() {
        let at = run(quarters(dec!(125_000), dec!(0), dec!(0), dec!(0)), zeros());
        assert_eq!(at.ltcg_tax, dec!(0));
        assert_eq!(at.quarterly_tax[&Quarter::Q1].ltcg_tax, dec!(0));

        let above = run(quarters(dec!(125_001), dec!(0), dec!(0), dec!(0)), zeros());
        assert_eq!(above.taxable_ltcg, dec!(1));
        assert_eq!(above.ltcg_tax, dec!(0.125));
        assert_eq!(above.quarterly_tax[&Quarter::Q1].ltcg_tax, dec!(0.125));
    }

    #[test]
    fn test_proportional_allocation() {
        let r = run(
            quarters(dec!(100_000), dec!(100_000), dec!(0), dec!(0)),
            zeros(),
        );
        assert_eq!(r.taxable_ltcg, dec!(75_000));
        assert_eq!(r.ltcg_tax, dec!(9_375));
        assert_eq!(r.quarterly_tax[&Quarter::Q1].ltcg_tax, dec!(4_687.5));
        assert_eq!(r.quarterly_tax[&Quarter::Q2].ltcg_tax, dec!(4_687.5));
        assert_eq!(r.quarterly_tax[&Quarter::Q3].ltcg_tax, dec!(0));
        assert_eq!(r.quarterly_tax[&Quarter::Q4].ltcg_tax, dec!(0));
    }

    #[test]
    fn test_exemption_is_annual_not_per_quarter() {
        // Each quarter alone is below the exemption, the year is not
        let r = run(
            quarters(dec!(100_000), dec!(100_000), dec!(100_000), dec!(0)),
            zeros(),
        );
        assert_eq!(r.ltcg_tax, dec!(21_875));
        let sum: Money = r.quarterly_tax.values().map(|t| t.ltcg_tax).sum();
        assert_eq!(sum, r.ltcg_tax);
    }

    #[test]
    fn test_large_single_quarter_within_exemption() {
        let r = run(quarters(dec!(0), dec!(0), dec!(120_000), dec!(0)), zeros());
        assert_eq!(r.total_cg_tax, dec!(0));
        assert!(r.quarterly_tax.values().all(|t| t.total.is_zero()));
    }

    #[test]
    fn test_reconciliation_absorbs_rounding_remainder() {
        // Thirds do not divide evenly into paise
        let r = run(
            quarters(dec!(100_000), dec!(100_000), dec!(100_001), dec!(0)),
            zeros(),
        );
        let sum: Money = r.quarterly_tax.values().map(|t| t.ltcg_tax).sum();
        assert_eq!(sum, r.ltcg_tax);
        assert_eq!(r.quarterly_tax[&Quarter::Q4].ltcg_tax, dec!(0));
        for q in [Quarter::Q1, Quarter::Q2] {
            let share = r.quarterly_tax[&q].ltcg_tax;
            assert_eq!(share, share.round_dp(2));
        }
    }

    #[test]
    fn test_tiny_final_quarter_gain_stays_non_negative() {
        let r = run(
            quarters(dec!(100_000), dec!(100_003), dec!(100_001), dec!(0.01)),
            zeros(),
        );
        assert_eq!(r.ltcg_tax, dec!(21_875.50125));
        assert_eq!(r.quarterly_tax[&Quarter::Q1].ltcg_tax, dec!(7_291.73));
        assert_eq!(r.quarterly_tax[&Quarter::Q4].ltcg_tax, dec!(0.02125));
        assert!(r.quarterly_tax.values().all(|t| t.ltcg_tax >= Decimal::ZERO));
        let sum: Money = r.quarterly_tax.values().map(|t| t.ltcg_tax).sum();
        assert_eq!(sum, r.ltcg_tax);
    }

    #[test]
    fn test_stcg_is_quarter_local() {
        let r = run(
            zeros(),
            quarters(dec!(10_000), dec!(0), dec!(50_000), dec!(0)),
        );
        assert_eq!(r.stcg_tax, dec!(12_000));
        assert_eq!(r.quarterly_tax[&Quarter::Q1].stcg_tax, dec!(2_000));
        assert_eq!(r.quarterly_tax[&Quarter::Q3].stcg_tax, dec!(10_000));
        assert_eq!(r.total_cg_tax, dec!(12_000));
    }

    #[test]
    fn test_quarterly_totals_sum_to_annual() {
        let r = run(
            quarters(dec!(80_000), dec!(33_333), dec!(0), dec!(91_111)),
            quarters(dec!(7_777), dec!(0), dec!(12_345), dec!(1)),
        );
        let sum: Money = r.quarterly_tax.values().map(|t| t.total).sum();
        assert_eq!(sum, r.total_cg_tax);
        assert_eq!(r.tax_by_quarter().len(), 4);
    }

    #[test]
    fn test_missing_quarter_rejected() {
        let mut ltcg = zeros();
        ltcg.remove(&Quarter::Q3);
        let input = CapitalGainsInput {
            ltcg_by_quarter: ltcg,
            stcg_by_quarter: zeros(),
        };
        match compute_capital_gains_tax(&TaxConfig::default(), &input).unwrap_err() {
            IndiaTaxError::InvalidInput { field, .. } => assert_eq!(field, "ltcg_by_quarter.Q3"),
            other => panic!("Expected InvalidInput, got {:?}", other),
        }
    }

    #[test]
    fn test_negative_gain_rejected() {
        let input = CapitalGainsInput {
            ltcg_by_quarter: zeros(),
            stcg_by_quarter: quarters(dec!(0), dec!(-1), dec!(0), dec!(0)),
        };
        assert!(compute_capital_gains_tax(&TaxConfig::default(), &input).is_err());
    }

    #[test]
    fn test_exempt_ltcg_warning() {
        let input = CapitalGainsInput {
            ltcg_by_quarter: quarters(dec!(50_000), dec!(0), dec!(0), dec!(0)),
            stcg_by_quarter: zeros(),
        };
        let out = compute_capital_gains_tax(&TaxConfig::default(), &input).unwrap();
        assert_eq!(out.warnings.len(), 1);
    }
}
