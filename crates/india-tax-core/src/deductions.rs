use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::config::TaxConfig;
use crate::error::IndiaTaxError;
use crate::types::{with_metadata, ComputationOutput, Money};
use crate::IndiaTaxResult;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// Deductions as claimed by the taxpayer, before statutory caps.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DeductionBreakdown {
    /// EPF, PPF, ELSS, life insurance premium, etc.
    #[serde(default)]
    pub section_80c: Money,
    /// Health insurance premium.
    #[serde(default)]
    pub section_80d: Money,
    /// Additional NPS contribution, 80CCD(1B).
    #[serde(default)]
    pub section_80ccd: Money,
    /// Anything else, taken at face value.
    #[serde(default)]
    pub other: Money,
}

impl DeductionBreakdown {
    pub fn claimed_total(&self) -> Money {
        self.section_80c + self.section_80d + self.section_80ccd + self.other
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeductionInput {
    #[serde(default)]
    pub age: Option<u32>,
    pub deductions: DeductionBreakdown,
}

/// Deductions after statutory caps.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AllowedDeductions {
    pub section_80c: Money,
    pub section_80d: Money,
    pub section_80ccd: Money,
    pub other: Money,
    pub total: Money,
    pub disallowed_excess: Money,
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Cap each claimed section at its statutory limit and total what remains.
pub fn aggregate_deductions(
    config: &TaxConfig,
    input: &DeductionInput,
) -> IndiaTaxResult<ComputationOutput<AllowedDeductions>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    let result = allowed_deductions(config, input.age, &input.deductions, &mut warnings)?;

    let caps = &config.deduction_caps;
    let assumptions = serde_json::json!({
        "age": input.age,
        "cap_80c": caps.section_80c.to_string(),
        "cap_80d": caps.section_80d_for_age(input.age).to_string(),
        "cap_80ccd": caps.section_80ccd.to_string(),
    });

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Chapter VI-A deductions capped per section (80C, 80D, 80CCD(1B))",
        &config.fiscal_year,
        &assumptions,
        warnings,
        elapsed,
        result,
    ))
}

pub(crate) fn allowed_deductions(
    config: &TaxConfig,
    age: Option<u32>,
    claimed: &DeductionBreakdown,
    warnings: &mut Vec<String>,
) -> IndiaTaxResult<AllowedDeductions> {
    for (field, amount) in [
        ("deductions.section_80c", claimed.section_80c),
        ("deductions.section_80d", claimed.section_80d),
        ("deductions.section_80ccd", claimed.section_80ccd),
        ("deductions.other", claimed.other),
    ] {
        if amount < Decimal::ZERO {
            return Err(IndiaTaxError::InvalidInput {
                field: field.into(),
                reason: "Deduction cannot be negative".into(),
            });
        }
    }

    let caps = &config.deduction_caps;
    let section_80c = cap("80C", claimed.section_80c, caps.section_80c, warnings);
    let section_80d = cap(
        "80D",
        claimed.section_80d,
        caps.section_80d_for_age(age),
        warnings,
    );
    let section_80ccd = cap("80CCD(1B)", claimed.section_80ccd, caps.section_80ccd, warnings);

    let total = section_80c + section_80d + section_80ccd + claimed.other;
    Ok(AllowedDeductions {
        section_80c,
        section_80d,
        section_80ccd,
        other: claimed.other,
        total,
        disallowed_excess: claimed.claimed_total() - total,
    })
}

fn cap(section: &str, claimed: Money, limit: Money, warnings: &mut Vec<String>) -> Money {
    if claimed > limit {
        warnings.push(format!(
            "Section {section} claim of {claimed} capped at the limit of {limit}."
        ));
        limit
    } else {
        claimed
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
