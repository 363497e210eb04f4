//! Compute Indian personal income tax under the new and old regimes.
//!
//! # Overview
//!
//! - **Regular income tax**: progressive slabs, a banded surcharge on the base
//!   tax and a 4% health and education cess, for either regime.
//! - **Regime comparison**: both regimes side by side, the cheaper one
//!   recommended, and the old-regime deductions at which they break even.
//! - **Capital gains**: long-term gains taxed annually above an exemption with
//!   the tax allocated back to the quarters in which gains arose; short-term
//!   gains taxed in the quarter realised.
//! - **Advance tax**: the four cumulative installments, with capital gains
//!   tax due in the quarter it arose.
//!
//! Slabs, surcharge bands, rates and due dates live in a [`config::TaxConfig`]
//! value, so a new fiscal year is a new table rather than new code.
//!
//! # Supported fiscal years
//!
//! | Fiscal year | Constructor |
//! |-------------|-------------|
//! | 2024-25 | [`config::TaxConfig::fy_2024_25`] (default) |
//! | 2023-24 | [`config::TaxConfig::fy_2023_24`] |
//!
//! # Examples
//!
//! ```
//! use india_tax_core::engine::TaxEngine;
//! use india_tax_core::income_tax::regular::RegularTaxInput;
//! use india_tax_core::Regime;
//! use rust_decimal_macros::dec;
//!
//! let engine = TaxEngine::default();
//! let out = engine
//!     .regular_tax(&RegularTaxInput {
//!         regime: Regime::New,
//!         annual_income: dec!(1000000),
//!         deductions: dec!(0),
//!     })
//!     .unwrap();
//! assert_eq!(out.result.taxable_income, dec!(925000));
//! assert_eq!(out.result.total_tax, dec!(50700));
//! ```

pub mod advance_tax;
pub mod assessment;
pub mod capital_gains;
pub mod config;
pub mod deductions;
pub mod engine;
pub mod error;
pub mod income_tax;
pub mod types;

#[cfg(feature = "planning")]
pub mod planning;

pub use error::IndiaTaxError;
pub use types::*;

/// Standard result type for all india-tax operations
pub type IndiaTaxResult<T> = Result<T, IndiaTaxError>;
