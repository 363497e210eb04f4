use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::time::Instant;
use tracing::debug;

use super::regular::{regular_tax, TaxResult};
use crate::config::TaxConfig;
use crate::error::IndiaTaxError;
use crate::types::{with_metadata, ComputationOutput, Money, Regime};
use crate::IndiaTaxResult;

const BREAKEVEN_TOLERANCE: Decimal = dec!(0.01);
const MAX_BISECTION_ITERATIONS: u32 = 128;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComparisonInput {
    pub annual_income: Money,
    #[serde(default)]
    pub deductions: Money,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegimeComparison {
    pub new_regime: TaxResult,
    pub old_regime: TaxResult,
    pub recommended: Regime,
    pub savings: Money,
    /// Smallest old-regime deduction total at which the old regime costs no
    /// more than the new regime.
    pub breakeven_deductions: Money,
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// The cheaper regime for the given totals. Ties go to the old regime.
pub fn recommend(new_regime_total: Money, old_regime_total: Money) -> Regime {
    if new_regime_total < old_regime_total {
        Regime::New
    } else {
        Regime::Old
    }
}

/// Compute both regimes for the same income and deductions and recommend the
/// cheaper one, together with the deduction amount where the choice flips.
pub fn compare_regimes(
    config: &TaxConfig,
    input: &ComparisonInput,
) -> IndiaTaxResult<ComputationOutput<RegimeComparison>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    let new_regime = regular_tax(
        config,
        Regime::New,
        input.annual_income,
        Decimal::ZERO,
        &mut warnings,
    )?;
    let old_regime = regular_tax(
        config,
        Regime::Old,
        input.annual_income,
        input.deductions,
        &mut warnings,
    )?;

    let recommended = recommend(new_regime.total_tax, old_regime.total_tax);
    let savings = (new_regime.total_tax - old_regime.total_tax).abs();
    let breakeven_deductions =
        breakeven_deductions(config, input.annual_income, new_regime.total_tax)?;

    if recommended == Regime::New && breakeven_deductions > input.deductions {
        warnings.push(format!(
            "Old regime becomes at least as cheap once deductions reach {}.",
            breakeven_deductions.round_dp(2)
        ));
    }

    let result = RegimeComparison {
        new_regime,
        old_regime,
        recommended,
        savings,
        breakeven_deductions,
    };

    let assumptions = serde_json::json!({
        "annual_income": input.annual_income.to_string(),
        "deductions": input.deductions.to_string(),
        "tie_break": "Old",
    });

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Side-by-side new and old regime liability with bisection break-even on deductions",
        &config.fiscal_year,
        &assumptions,
        warnings,
        elapsed,
        result,
    ))
}

/// Bisect on deductions in `[0, annual_income]` until the interval is below
/// one paisa. Old-regime tax is non-increasing in deductions, so the search
/// has a single crossing.
pub(crate) fn breakeven_deductions(
    config: &TaxConfig,
    annual_income: Money,
    new_regime_total: Money,
) -> IndiaTaxResult<Money> {
    let mut scratch: Vec<String> = Vec::new();
    let mut old_total = |deductions: Money| -> IndiaTaxResult<Money> {
        Ok(regular_tax(config, Regime::Old, annual_income, deductions, &mut scratch)?.total_tax)
    };

    if old_total(Decimal::ZERO)? <= new_regime_total {
        return Ok(Decimal::ZERO);
    }

    // At deductions == income the old regime owes nothing.
    let mut lo = Decimal::ZERO;
    let mut hi = annual_income;

    for iteration in 0..MAX_BISECTION_ITERATIONS {
        if hi - lo <= BREAKEVEN_TOLERANCE {
            debug!(iteration, breakeven = %hi, "breakeven deductions converged");
            return Ok(hi);
        }
        let mid = ((lo + hi) / dec!(2)).round_dp(2);
        if mid <= lo || mid >= hi {
            return Ok(hi);
        }
        if old_total(mid)? <= new_regime_total {
            hi = mid;
        } else {
            lo = mid;
        }
    }

    Err(IndiaTaxError::ConvergenceFailure {
        function: "breakeven_deductions".into(),
        iterations: MAX_BISECTION_ITERATIONS,
        last_delta: hi - lo,
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn compare(income: Money, deductions: Money) -> RegimeComparison {
        let input = ComparisonInput {
            annual_income: income,
            deductions,
        };
        compare_regimes(&TaxConfig::default(), &input)
            .unwrap()
            .result
    }

    #[test]
    fn test_new_regime_wins_without_deductions() {
        let c = compare(dec!(1_000_000), dec!(0));
        // Old: 12,500 + 100,000 = 112,500 * 1.04 = 117,000
        assert_eq!(c.old_regime.total_tax, dec!(117_000));
        assert_eq!(c.new_regime.total_tax, dec!(50_700));
        assert_eq!(c.recommended, Regime::New);
        assert_eq!(c.savings, dec!(66_300));
    }

    #[test]
    fn test_tie_recommends_old() {
        assert_eq!(recommend(dec!(100), dec!(100)), Regime::Old);
        assert_eq!(recommend(dec!(99), dec!(100)), Regime::New);
    }

    #[test]
    fn test_low_income_breakeven_is_zero() {
        // Both regimes owe nothing
        let c = compare(dec!(250_000), dec!(0));
        assert_eq!(c.breakeven_deductions, dec!(0));
        assert_eq!(c.recommended, Regime::Old);
    }

    #[test]
    fn test_recommendation_flips_at_breakeven() {
        let income = dec!(1_000_000);
        let breakeven = compare(income, dec!(0)).breakeven_deductions;
        assert!(breakeven > dec!(0) && breakeven < income);

        let at = compare(income, breakeven);
        assert_eq!(at.recommended, Regime::Old);

        let below = compare(income, breakeven - dec!(0.01));
        assert_eq!(below.recommended, Regime::New);
    }

    #[test]
    fn test_breakeven_value_ten_lakh() {
        // New regime total 50,700 => old base tax 48,750
        // => 12,500 + (taxable - 500,000) * 20% = 48,750 => taxable 681,250
        let breakeven = compare(dec!(1_000_000), dec!(0)).breakeven_deductions;
        assert_eq!(breakeven, dec!(318_750));
    }
}
