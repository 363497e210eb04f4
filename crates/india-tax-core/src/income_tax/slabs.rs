//! Table-driven slab and surcharge evaluation shared by both regimes.
//!
//! A regime is nothing more than data: one [`SlabTable`] and one
//! [`SurchargeTable`]. The evaluators here never branch on the regime.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::IndiaTaxError;
use crate::types::{Money, Rate};
use crate::IndiaTaxResult;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// One progressive band. The band starts where the previous one ended (or at
/// zero for the first band) and runs up to `upper_bound` inclusive; `None`
/// marks the open-ended top band.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SlabBand {
    pub upper_bound: Option<Money>,
    pub rate: Rate,
}

/// Ordered progressive slab schedule covering `[0, +∞)`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SlabTable {
    pub bands: Vec<SlabBand>,
}

/// One surcharge band: applies when taxable income is strictly above `threshold`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SurchargeBand {
    pub threshold: Money,
    pub rate: Rate,
}

/// Surcharge bands ordered highest threshold first. Bands are mutually
/// exclusive: the first match wins and its rate applies to the whole base tax.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SurchargeTable {
    pub bands: Vec<SurchargeBand>,
}

/// Result of running taxable income through a [`SlabTable`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SlabEvaluation {
    pub tax: Money,
    pub marginal_rate: Rate,
}

// ---------------------------------------------------------------------------
// Slab table
// ---------------------------------------------------------------------------

impl SlabTable {
    pub fn new(bands: Vec<SlabBand>) -> Self {
        Self { bands }
    }

    /// Build a table from `(upper_bound, rate)` pairs.
    pub fn from_pairs(pairs: &[(Option<Money>, Rate)]) -> Self {
        Self::new(
            pairs
                .iter()
                .map(|(upper_bound, rate)| SlabBand {
                    upper_bound: *upper_bound,
                    rate: *rate,
                })
                .collect(),
        )
    }

    /// Piecewise-linear progressive tax on `taxable_income`.
    ///
    /// Every fully passed band contributes `width * rate`; the band holding
    /// `taxable_income` contributes the partial amount above its lower bound.
    /// Zero or negative income owes nothing and has a zero marginal rate.
    pub fn evaluate(&self, taxable_income: Money) -> SlabEvaluation {
        let mut tax = Decimal::ZERO;
        let mut marginal_rate = Decimal::ZERO;
        let mut lower = Decimal::ZERO;

        for band in &self.bands {
            if taxable_income <= lower {
                break;
            }
            let portion = match band.upper_bound {
                Some(upper) => taxable_income.min(upper) - lower,
                None => taxable_income - lower,
            };
            tax += portion * band.rate;
            marginal_rate = band.rate;

            match band.upper_bound {
                Some(upper) => lower = upper,
                None => break,
            }
        }

        SlabEvaluation { tax, marginal_rate }
    }

    /// Check the table covers `[0, +∞)` with strictly increasing bounds.
    pub fn validate(&self, field: &str) -> IndiaTaxResult<()> {
        if self.bands.is_empty() {
            return Err(IndiaTaxError::InvalidConfig {
                field: field.into(),
                reason: "Slab table must contain at least one band".into(),
            });
        }

        let last = self.bands.len() - 1;
        let mut previous = Decimal::ZERO;
        for (i, band) in self.bands.iter().enumerate() {
            validate_rate(&format!("{field}[{i}].rate"), band.rate)?;
            match band.upper_bound {
                Some(upper) => {
                    if i == last {
                        return Err(IndiaTaxError::InvalidConfig {
                            field: format!("{field}[{i}].upper_bound"),
                            reason: "Last band must be unbounded".into(),
                        });
                    }
                    if upper <= previous {
                        return Err(IndiaTaxError::InvalidConfig {
                            field: format!("{field}[{i}].upper_bound"),
                            reason: format!(
                                "Upper bounds must be strictly increasing ({upper} <= {previous})"
                            ),
                        });
                    }
                    previous = upper;
                }
                None if i != last => {
                    return Err(IndiaTaxError::InvalidConfig {
                        field: format!("{field}[{i}].upper_bound"),
                        reason: "Only the last band may be unbounded".into(),
                    });
                }
                None => {}
            }
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Surcharge table
// ---------------------------------------------------------------------------

impl SurchargeTable {
    pub fn new(bands: Vec<SurchargeBand>) -> Self {
        Self { bands }
    }

    /// Build a table from `(threshold, rate)` pairs, highest threshold first.
    pub fn from_pairs(pairs: &[(Money, Rate)]) -> Self {
        Self::new(
            pairs
                .iter()
                .map(|(threshold, rate)| SurchargeBand {
                    threshold: *threshold,
                    rate: *rate,
                })
                .collect(),
        )
    }

    /// Rate of the first (highest) band whose threshold `taxable_income` exceeds.
    pub fn rate_for(&self, taxable_income: Money) -> Rate {
        self.bands
            .iter()
            .find(|band| taxable_income > band.threshold)
            .map(|band| band.rate)
            .unwrap_or(Decimal::ZERO)
    }

    pub fn validate(&self, field: &str) -> IndiaTaxResult<()> {
        for (i, band) in self.bands.iter().enumerate() {
            validate_rate(&format!("{field}[{i}].rate"), band.rate)?;
            if band.threshold < Decimal::ZERO {
                return Err(IndiaTaxError::InvalidConfig {
                    field: format!("{field}[{i}].threshold"),
                    reason: "Surcharge threshold cannot be negative".into(),
                });
            }
        }
        for (i, pair) in self.bands.windows(2).enumerate() {
            if pair[1].threshold >= pair[0].threshold {
                return Err(IndiaTaxError::InvalidConfig {
                    field: format!("{field}[{}].threshold", i + 1),
                    reason: "Surcharge thresholds must be strictly descending".into(),
                });
            }
        }
        Ok(())
    }
}

fn validate_rate(field: &str, rate: Rate) -> IndiaTaxResult<()> {
    if rate < Decimal::ZERO || rate >= Decimal::ONE {
        return Err(IndiaTaxError::InvalidConfig {
            field: field.into(),
            reason: "Rate must be in [0, 1)".into(),
        });
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
