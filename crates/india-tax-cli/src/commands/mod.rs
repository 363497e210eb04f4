pub mod advance_tax;
pub mod assessment;
pub mod capital_gains;
pub mod deductions;
pub mod income_tax;
pub mod planning;

use clap::{Args, ValueEnum};
use rust_decimal::Decimal;
use tracing::debug;

use india_tax_core::config::TaxConfig;
use india_tax_core::deductions::DeductionBreakdown;
use india_tax_core::engine::TaxEngine;
use india_tax_core::{zero_quarters, Quarter, QuarterlyAmounts, Regime};

use crate::input;

/// Build the engine from `--config`, else `--fiscal-year`, else the current year.
pub fn load_engine(
    config_path: Option<&str>,
    fiscal_year: Option<&str>,
) -> Result<TaxEngine, Box<dyn std::error::Error>> {
    let engine = match (config_path, fiscal_year) {
        (Some(path), _) => {
            let config: TaxConfig = input::file::read_json("tax config", path)?;
            TaxEngine::new(config)?
        }
        (None, Some(label)) => TaxEngine::for_fiscal_year(label)?,
        (None, None) => TaxEngine::default(),
    };
    debug!(fiscal_year = %engine.config().fiscal_year, "tax engine ready");
    Ok(engine)
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum RegimeArg {
    New,
    Old,
}

impl From<RegimeArg> for Regime {
    fn from(arg: RegimeArg) -> Self {
        match arg {
            RegimeArg::New => Regime::New,
            RegimeArg::Old => Regime::Old,
        }
    }
}

/// Per-section deduction claims shared by several subcommands
#[derive(Args)]
pub struct DeductionFlags {
    /// Section 80C claim (PF, ELSS, life insurance, ...)
    #[arg(long)]
    pub section_80c: Option<Decimal>,

    /// Section 80D claim (health insurance)
    #[arg(long)]
    pub section_80d: Option<Decimal>,

    /// Section 80CCD(1B) claim (NPS)
    #[arg(long)]
    pub section_80ccd: Option<Decimal>,

    /// Other uncapped deductions
    #[arg(long)]
    pub other_deductions: Option<Decimal>,
}

impl DeductionFlags {
    pub fn breakdown(&self) -> DeductionBreakdown {
        DeductionBreakdown {
            section_80c: self.section_80c.unwrap_or_default(),
            section_80d: self.section_80d.unwrap_or_default(),
            section_80ccd: self.section_80ccd.unwrap_or_default(),
            other: self.other_deductions.unwrap_or_default(),
        }
    }
}

/// Turn a comma-separated Q1..Q4 flag into a quarter map; absent means all zero.
pub fn quarterly(
    flag: &str,
    values: Option<Vec<Decimal>>,
) -> Result<QuarterlyAmounts, Box<dyn std::error::Error>> {
    match values {
        None => Ok(zero_quarters()),
        Some(v) if v.len() == Quarter::ALL.len() => Ok(Quarter::ALL.into_iter().zip(v).collect()),
        Some(v) => Err(format!(
            "--{flag} needs four comma-separated values (Q1,Q2,Q3,Q4), got {}",
            v.len()
        )
        .into()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quarterly_flag() {
        let v = vec![Decimal::from(1), Decimal::from(2), Decimal::ZERO, Decimal::from(4)];
        let q = quarterly("ltcg", Some(v)).unwrap();
        assert_eq!(q[&Quarter::Q2], Decimal::from(2));
        assert_eq!(q[&Quarter::Q4], Decimal::from(4));

        assert_eq!(quarterly("ltcg", None).unwrap(), zero_quarters());

        let err = quarterly("stcg", Some(vec![Decimal::ONE])).unwrap_err();
        assert!(err.to_string().contains("--stcg"));
    }

    #[test]
    fn test_engine_selection() {
        let engine = load_engine(None, Some("FY 2023-24")).unwrap();
        assert_eq!(engine.config().fiscal_year, "2023-24");
        assert!(load_engine(None, Some("2010-11")).is_err());
        assert!(load_engine(Some("/nonexistent/config.json"), None).is_err());
    }
}
