//! Built-in statutory tables, one constructor per fiscal year.

use chrono::NaiveDate;
use rust_decimal_macros::dec;

use super::{AdvanceTaxDueDate, DeductionCaps, RegimeConfig, TaxConfig};
use crate::income_tax::slabs::{SlabTable, SurchargeTable};
use crate::types::{Percentage, Quarter};

/// FY 2024-25 (AY 2025-26).
pub(super) fn fy_2024_25() -> TaxConfig {
    TaxConfig {
        fiscal_year: "2024-25".into(),
        assessment_year: "2025-26".into(),
        new_regime: RegimeConfig {
            slabs: SlabTable::from_pairs(&[
                (Some(dec!(300_000)), dec!(0)),
                (Some(dec!(600_000)), dec!(0.05)),
                (Some(dec!(900_000)), dec!(0.10)),
                (Some(dec!(1_200_000)), dec!(0.15)),
                (Some(dec!(1_500_000)), dec!(0.20)),
                (None, dec!(0.30)),
            ]),
            surcharge: SurchargeTable::from_pairs(&[
                (dec!(50_000_000), dec!(0.25)),
                (dec!(20_000_000), dec!(0.15)),
                (dec!(10_000_000), dec!(0.10)),
            ]),
        },
        old_regime: old_regime(),
        cess_rate: dec!(0.04),
        standard_deduction: dec!(75_000),
        ltcg_exemption: dec!(125_000),
        ltcg_rate: dec!(0.125),
        stcg_rate: dec!(0.20),
        deduction_caps: deduction_caps(),
        advance_tax_due_dates: due_dates(2024),
    }
}

/// FY 2023-24 (AY 2024-25), before the July 2024 capital gains changes.
pub(super) fn fy_2023_24() -> TaxConfig {
    TaxConfig {
        fiscal_year: "2023-24".into(),
        assessment_year: "2024-25".into(),
        new_regime: RegimeConfig {
            slabs: SlabTable::from_pairs(&[
                (Some(dec!(300_000)), dec!(0)),
                (Some(dec!(600_000)), dec!(0.05)),
                (Some(dec!(900_000)), dec!(0.10)),
                (Some(dec!(1_200_000)), dec!(0.15)),
                (Some(dec!(1_500_000)), dec!(0.20)),
                (None, dec!(0.30)),
            ]),
            surcharge: SurchargeTable::from_pairs(&[
                (dec!(20_000_000), dec!(0.25)),
                (dec!(10_000_000), dec!(0.15)),
            ]),
        },
        old_regime: old_regime(),
        cess_rate: dec!(0.04),
        standard_deduction: dec!(50_000),
        ltcg_exemption: dec!(100_000),
        ltcg_rate: dec!(0.10),
        stcg_rate: dec!(0.15),
        deduction_caps: deduction_caps(),
        advance_tax_due_dates: due_dates(2023),
    }
}

fn old_regime() -> RegimeConfig {
    RegimeConfig {
        slabs: SlabTable::from_pairs(&[
            (Some(dec!(250_000)), dec!(0)),
            (Some(dec!(500_000)), dec!(0.05)),
            (Some(dec!(1_000_000)), dec!(0.20)),
            (None, dec!(0.30)),
        ]),
        surcharge: SurchargeTable::from_pairs(&[
            (dec!(50_000_000), dec!(0.37)),
            (dec!(20_000_000), dec!(0.25)),
            (dec!(10_000_000), dec!(0.15)),
        ]),
    }
}

fn deduction_caps() -> DeductionCaps {
    DeductionCaps {
        section_80c: dec!(150_000),
        section_80d: dec!(25_000),
        section_80d_senior: dec!(50_000),
        section_80ccd: dec!(50_000),
        senior_citizen_age: 60,
    }
}

/// 15 Jun / 15 Sep / 15 Dec of `start_year`, 15 Mar of the following year.
fn due_dates(start_year: i32) -> Vec<AdvanceTaxDueDate> {
    let schedule: [(Quarter, i32, u32, Percentage); 4] = [
        (Quarter::Q1, start_year, 6, dec!(15)),
        (Quarter::Q2, start_year, 9, dec!(45)),
        (Quarter::Q3, start_year, 12, dec!(75)),
        (Quarter::Q4, start_year + 1, 3, dec!(100)),
    ];
    schedule
        .iter()
        .map(|(quarter, year, month, pct)| AdvanceTaxDueDate {
            quarter: *quarter,
            // Fixed calendar dates; MIN would be rejected by validation.
            due_date: NaiveDate::from_ymd_opt(*year, *month, 15).unwrap_or(NaiveDate::MIN),
            cumulative_percentage: *pct,
        })
        .collect()
}
