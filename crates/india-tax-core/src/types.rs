use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// All monetary values, in Indian Rupees. Wraps Decimal to prevent accidental f64 usage.
pub type Money = Decimal;

/// Rates expressed as decimals (0.05 = 5%). Never as percentages.
pub type Rate = Decimal;

/// Whole-number percentages (15 = 15%). Only used where the statute speaks in percentages.
pub type Percentage = Decimal;

/// Amounts keyed by fiscal-year quarter. Always iterated Q1 to Q4.
pub type QuarterlyAmounts = BTreeMap<Quarter, Money>;

/// The two mutually exclusive personal income tax regimes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Regime {
    New,
    Old,
}

impl Regime {
    pub const ALL: [Regime; 2] = [Regime::New, Regime::Old];
}

impl fmt::Display for Regime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Regime::New => write!(f, "New"),
            Regime::Old => write!(f, "Old"),
        }
    }
}

/// Quarter of the Indian fiscal year (April to March).
///
/// Variant order is the fiscal order, so ordered maps keyed by `Quarter`
/// iterate Q1, Q2, Q3, Q4.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Quarter {
    Q1,
    Q2,
    Q3,
    Q4,
}

impl Quarter {
    pub const ALL: [Quarter; 4] = [Quarter::Q1, Quarter::Q2, Quarter::Q3, Quarter::Q4];

    /// Months covered by the quarter, e.g. "Apr-Jun".
    pub fn months(&self) -> &'static str {
        match self {
            Quarter::Q1 => "Apr-Jun",
            Quarter::Q2 => "Jul-Sep",
            Quarter::Q3 => "Oct-Dec",
            Quarter::Q4 => "Jan-Mar",
        }
    }
}

impl fmt::Display for Quarter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Quarter::Q1 => write!(f, "Q1"),
            Quarter::Q2 => write!(f, "Q2"),
            Quarter::Q3 => write!(f, "Q3"),
            Quarter::Q4 => write!(f, "Q4"),
        }
    }
}

/// Build a complete quarterly map with every quarter set to zero.
pub fn zero_quarters() -> QuarterlyAmounts {
    Quarter::ALL.iter().map(|q| (*q, Decimal::ZERO)).collect()
}

/// Standard computation output envelope
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComputationOutput<T: Serialize> {
    pub result: T,
    pub methodology: String,
    pub assumptions: serde_json::Value,
    pub warnings: Vec<String>,
    pub metadata: ComputationMetadata,
}

/// Metadata for every computation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComputationMetadata {
    pub version: String,
    pub fiscal_year: String,
    pub computation_time_us: u64,
    pub precision: String,
}

/// Helper to wrap computation results with metadata
pub fn with_metadata<T: Serialize>(
    methodology: &str,
    fiscal_year: &str,
    assumptions: &impl Serialize,
    warnings: Vec<String>,
    elapsed_us: u64,
    result: T,
) -> ComputationOutput<T> {
    ComputationOutput {
        result,
        methodology: methodology.to_string(),
        assumptions: serde_json::to_value(assumptions).unwrap_or_default(),
        warnings,
        metadata: ComputationMetadata {
            version: env!("CARGO_PKG_VERSION").to_string(),
            fiscal_year: fiscal_year.to_string(),
            computation_time_us: elapsed_us,
            precision: "rust_decimal_128bit".to_string(),
        },
    }
}
