//! Fiscal-year tax configuration.
//!
//! Every statutory number the engine uses (slabs, surcharge bands, cess,
//! exemptions, deduction caps, advance-tax dates) lives in a [`TaxConfig`]
//! value. Built-in tables are provided per fiscal year; custom tables can be
//! loaded from JSON and are validated before use.

mod fiscal_years;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::IndiaTaxError;
use crate::income_tax::slabs::{SlabTable, SurchargeTable};
use crate::types::{Money, Percentage, Quarter, Rate, Regime};
use crate::IndiaTaxResult;

/// Fiscal years with built-in tables, newest first.
pub const SUPPORTED_FISCAL_YEARS: [&str; 2] = ["2024-25", "2023-24"];

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegimeConfig {
    pub slabs: SlabTable,
    pub surcharge: SurchargeTable,
}

/// Statutory caps on Chapter VI-A deductions claimed under the old regime.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeductionCaps {
    pub section_80c: Money,
    pub section_80d: Money,
    pub section_80d_senior: Money,
    pub section_80ccd: Money,
    pub senior_citizen_age: u32,
}

impl DeductionCaps {
    /// 80D cap for a taxpayer of the given age.
    pub fn section_80d_for_age(&self, age: Option<u32>) -> Money {
        match age {
            Some(a) if a >= self.senior_citizen_age => self.section_80d_senior,
            _ => self.section_80d,
        }
    }
}

/// One advance-tax installment date with the cumulative share due by then.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdvanceTaxDueDate {
    pub quarter: Quarter,
    pub due_date: NaiveDate,
    pub cumulative_percentage: Percentage,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaxConfig {
    pub fiscal_year: String,
    pub assessment_year: String,
    pub new_regime: RegimeConfig,
    pub old_regime: RegimeConfig,
    pub cess_rate: Rate,
    pub standard_deduction: Money,
    pub ltcg_exemption: Money,
    pub ltcg_rate: Rate,
    pub stcg_rate: Rate,
    pub deduction_caps: DeductionCaps,
    pub advance_tax_due_dates: Vec<AdvanceTaxDueDate>,
}

impl Default for TaxConfig {
    fn default() -> Self {
        fiscal_years::fy_2024_25()
    }
}

// ---------------------------------------------------------------------------
// Construction
// ---------------------------------------------------------------------------

impl TaxConfig {
    /// Built-in tables for FY 2024-25 (AY 2025-26).
    pub fn fy_2024_25() -> Self {
        fiscal_years::fy_2024_25()
    }

    /// Built-in tables for FY 2023-24 (AY 2024-25).
    pub fn fy_2023_24() -> Self {
        fiscal_years::fy_2023_24()
    }

    /// Look up built-in tables by fiscal year label ("2024-25" or "FY 2024-25").
    pub fn for_fiscal_year(label: &str) -> IndiaTaxResult<Self> {
        let normalised = label.trim().trim_start_matches("FY").trim();
        match normalised {
            "2024-25" => Ok(Self::fy_2024_25()),
            "2023-24" => Ok(Self::fy_2023_24()),
            _ => Err(IndiaTaxError::UnsupportedFiscalYear(format!(
                "{label} (supported: {})",
                SUPPORTED_FISCAL_YEARS.join(", ")
            ))),
        }
    }

    /// Parse and validate a configuration from JSON.
    pub fn from_json(json: &str) -> IndiaTaxResult<Self> {
        let config: TaxConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn regime(&self, regime: Regime) -> &RegimeConfig {
        match regime {
            Regime::New => &self.new_regime,
            Regime::Old => &self.old_regime,
        }
    }

    /// Due-date entry for a quarter, if configured.
    pub fn due_date_for(&self, quarter: Quarter) -> Option<&AdvanceTaxDueDate> {
        self.advance_tax_due_dates
            .iter()
            .find(|d| d.quarter == quarter)
    }
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

impl TaxConfig {
    pub fn validate(&self) -> IndiaTaxResult<()> {
        if self.fiscal_year.trim().is_empty() {
            return Err(invalid("fiscal_year", "Fiscal year label is required"));
        }

        self.new_regime.slabs.validate("new_regime.slabs")?;
        self.new_regime.surcharge.validate("new_regime.surcharge")?;
        self.old_regime.slabs.validate("old_regime.slabs")?;
        self.old_regime.surcharge.validate("old_regime.surcharge")?;

        for (field, rate) in [
            ("cess_rate", self.cess_rate),
            ("ltcg_rate", self.ltcg_rate),
            ("stcg_rate", self.stcg_rate),
        ] {
            if rate < Decimal::ZERO || rate >= Decimal::ONE {
                return Err(invalid(field, "Rate must be in [0, 1)"));
            }
        }

        for (field, amount) in [
            ("standard_deduction", self.standard_deduction),
            ("ltcg_exemption", self.ltcg_exemption),
            ("deduction_caps.section_80c", self.deduction_caps.section_80c),
            ("deduction_caps.section_80d", self.deduction_caps.section_80d),
            (
                "deduction_caps.section_80d_senior",
                self.deduction_caps.section_80d_senior,
            ),
            ("deduction_caps.section_80ccd", self.deduction_caps.section_80ccd),
        ] {
            if amount < Decimal::ZERO {
                return Err(invalid(field, "Amount cannot be negative"));
            }
        }

        self.validate_due_dates()
    }

    fn validate_due_dates(&self) -> IndiaTaxResult<()> {
        let dates = &self.advance_tax_due_dates;
        if dates.len() != Quarter::ALL.len() {
            return Err(invalid(
                "advance_tax_due_dates",
                "Exactly four installments (Q1..Q4) are required",
            ));
        }

        let mut previous_pct = Decimal::ZERO;
        let mut previous_date: Option<NaiveDate> = None;
        for (i, (entry, expected)) in dates.iter().zip(Quarter::ALL.iter()).enumerate() {
            let field = format!("advance_tax_due_dates[{i}]");
            if entry.quarter != *expected {
                return Err(invalid(
                    &field,
                    &format!("Expected {expected}, found {}", entry.quarter),
                ));
            }
            if entry.cumulative_percentage <= previous_pct {
                return Err(invalid(
                    &field,
                    "Cumulative percentages must be strictly increasing",
                ));
            }
            if let Some(prev) = previous_date {
                if entry.due_date <= prev {
                    return Err(invalid(&field, "Due dates must be strictly increasing"));
                }
            }
            previous_pct = entry.cumulative_percentage;
            previous_date = Some(entry.due_date);
        }

        if previous_pct != Decimal::ONE_HUNDRED {
            return Err(invalid(
                "advance_tax_due_dates",
                "Final installment must bring the cumulative percentage to 100",
            ));
        }
        Ok(())
    }
}

fn invalid(field: &str, reason: &str) -> IndiaTaxError {
    IndiaTaxError::InvalidConfig {
        field: field.into(),
        reason: reason.into(),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_builtin_tables_validate() {
        for fy in SUPPORTED_FISCAL_YEARS {
            let config = TaxConfig::for_fiscal_year(fy).unwrap();
            assert_eq!(config.fiscal_year, fy);
            config.validate().unwrap();
        }
    }

    #[test]
    fn test_default_is_fy_2024_25() {
        let config = TaxConfig::default();
        assert_eq!(config.fiscal_year, "2024-25");
        assert_eq!(config.assessment_year, "2025-26");
        assert_eq!(config.standard_deduction, dec!(75_000));
        assert_eq!(config.ltcg_exemption, dec!(125_000));
        assert_eq!(config.cess_rate, dec!(0.04));
    }

    #[test]
    fn test_fiscal_year_label_with_prefix() {
        let config = TaxConfig::for_fiscal_year("FY 2023-24").unwrap();
        assert_eq!(config.standard_deduction, dec!(50_000));
    }

    #[test]
    fn test_unknown_fiscal_year() {
        match TaxConfig::for_fiscal_year("1999-00").unwrap_err() {
            IndiaTaxError::UnsupportedFiscalYear(msg) => assert!(msg.contains("1999-00")),
            other => panic!("Expected UnsupportedFiscalYear, got {:?}", other),
        }
    }

    #[test]
    fn test_json_round_trip_preserves_tables() {
        let config = TaxConfig::default();
        let json = serde_json::to_string(&config).unwrap();
        let parsed = TaxConfig::from_json(&json).unwrap();
        assert_eq!(parsed, config);
    }

    #[test]
    fn test_rejects_percentages_not_ending_at_100() {
        let mut config = TaxConfig::default();
        config.advance_tax_due_dates[3].cumulative_percentage = dec!(90);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_rejects_out_of_order_quarters() {
        let mut config = TaxConfig::default();
        config.advance_tax_due_dates.swap(0, 1);
        match config.validate().unwrap_err() {
            IndiaTaxError::InvalidConfig { field, .. } => {
                assert_eq!(field, "advance_tax_due_dates[0]")
            }
            other => panic!("Expected InvalidConfig, got {:?}", other),
        }
    }

    #[test]
    fn test_rejects_cess_rate_out_of_range() {
        let mut config = TaxConfig::default();
        config.cess_rate = dec!(-0.01);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_senior_80d_cap() {
        let caps = TaxConfig::default().deduction_caps;
        assert_eq!(caps.section_80d_for_age(Some(35)), dec!(25_000));
        assert_eq!(caps.section_80d_for_age(Some(60)), dec!(50_000));
        assert_eq!(caps.section_80d_for_age(None), dec!(25_000));
    }
}
