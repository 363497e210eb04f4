use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::time::Instant;
use tracing::debug;

use crate::config::TaxConfig;
use crate::error::IndiaTaxError;
use crate::types::{with_metadata, ComputationOutput, Money, Rate, Regime};
use crate::IndiaTaxResult;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegularTaxInput {
    pub regime: Regime,
    pub annual_income: Money,
    /// Total Chapter VI-A deductions. Only the old regime uses them.
    #[serde(default)]
    pub deductions: Money,
}

/// Full breakdown of income tax on regular (non capital gains) income.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaxResult {
    pub regime: Regime,
    pub gross_income: Money,
    pub deductions_applied: Money,
    pub taxable_income: Money,
    pub base_tax: Money,
    pub surcharge_rate: Rate,
    pub surcharge: Money,
    pub cess: Money,
    pub total_tax: Money,
    pub marginal_rate: Rate,
    pub effective_rate: Rate,
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Compute regular income tax under one regime: slab tax, then surcharge on
/// the whole base tax, then cess on base tax plus surcharge.
pub fn compute_regular_tax(
    config: &TaxConfig,
    input: &RegularTaxInput,
) -> IndiaTaxResult<ComputationOutput<TaxResult>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    let result = regular_tax(
        config,
        input.regime,
        input.annual_income,
        input.deductions,
        &mut warnings,
    )?;

    let assumptions = serde_json::json!({
        "regime": input.regime,
        "annual_income": input.annual_income.to_string(),
        "deductions": input.deductions.to_string(),
        "standard_deduction": config.standard_deduction.to_string(),
        "cess_rate": config.cess_rate.to_string(),
    });

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Progressive slab tax, banded surcharge on base tax, health and education cess",
        &config.fiscal_year,
        &assumptions,
        warnings,
        elapsed,
        result,
    ))
}

/// Envelope-free computation shared by the comparison and assessment paths.
pub(crate) fn regular_tax(
    config: &TaxConfig,
    regime: Regime,
    annual_income: Money,
    deductions: Money,
    warnings: &mut Vec<String>,
) -> IndiaTaxResult<TaxResult> {
    if annual_income < Decimal::ZERO {
        return Err(IndiaTaxError::InvalidInput {
            field: "annual_income".into(),
            reason: "Annual income cannot be negative".into(),
        });
    }
    if deductions < Decimal::ZERO {
        return Err(IndiaTaxError::InvalidInput {
            field: "deductions".into(),
            reason: "Deductions cannot be negative".into(),
        });
    }

    let deductions_applied = match regime {
        Regime::New => {
            if deductions > Decimal::ZERO {
                warnings.push(format!(
                    "New regime ignores claimed deductions of {deductions}; \
                     only the standard deduction of {} applies.",
                    config.standard_deduction
                ));
            }
            config.standard_deduction
        }
        Regime::Old => deductions,
    };

    let mut taxable_income = annual_income - deductions_applied;
    if taxable_income < Decimal::ZERO {
        warnings.push(format!(
            "Deductions of {deductions_applied} exceed income of {annual_income}; \
             taxable income treated as zero."
        ));
        taxable_income = Decimal::ZERO;
    }

    let regime_config = config.regime(regime);
    let slab = regime_config.slabs.evaluate(taxable_income);
    let base_tax = slab.tax;

    let surcharge_rate = regime_config.surcharge.rate_for(taxable_income);
    let surcharge = base_tax * surcharge_rate;
    let cess = (base_tax + surcharge) * config.cess_rate;
    let total_tax = base_tax + surcharge + cess;

    let effective_rate = if annual_income > Decimal::ZERO {
        total_tax / annual_income
    } else {
        Decimal::ZERO
    };

    debug!(
        %regime,
        %taxable_income,
        %base_tax,
        %surcharge,
        %total_tax,
        "computed regular income tax"
    );

    Ok(TaxResult {
        regime,
        gross_income: annual_income,
        deductions_applied,
        taxable_income,
        base_tax,
        surcharge_rate,
        surcharge,
        cess,
        total_tax,
        marginal_rate: slab.marginal_rate,
        effective_rate,
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
