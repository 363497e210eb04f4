use napi::Result as NapiResult;
use napi_derive::napi;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::str::FromStr;

use rust_decimal::Decimal;

use india_tax_core::config::TaxConfig;
use india_tax_core::engine::TaxEngine;
use india_tax_core::income_tax::comparison::ComparisonInput;
use india_tax_core::IndiaTaxResult;

/// Convert any Display error into a napi::Error.
fn to_napi_error(e: impl std::fmt::Display) -> napi::Error {
    napi::Error::from_reason(e.to_string())
}

/// Engine from an optional JSON tax configuration; FY 2024-25 when absent.
fn engine(config_json: Option<String>) -> NapiResult<TaxEngine> {
    match config_json {
        Some(json) => {
            let config = TaxConfig::from_json(&json).map_err(to_napi_error)?;
            TaxEngine::new(config).map_err(to_napi_error)
        }
        None => Ok(TaxEngine::default()),
    }
}

/// Parse the input, run one engine operation and serialise its output.
fn run<I, O>(
    input_json: &str,
    config_json: Option<String>,
    op: impl FnOnce(&TaxEngine, &I) -> IndiaTaxResult<O>,
) -> NapiResult<String>
where
    I: DeserializeOwned,
    O: Serialize,
{
    let input: I = serde_json::from_str(input_json).map_err(to_napi_error)?;
    let output = op(&engine(config_json)?, &input).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// Income tax
// ---------------------------------------------------------------------------

#[napi]
pub fn compute_regular_tax(input_json: String, config_json: Option<String>) -> NapiResult<String> {
    run(&input_json, config_json, TaxEngine::regular_tax)
}

#[napi]
pub fn compare_regimes(input_json: String, config_json: Option<String>) -> NapiResult<String> {
    run(&input_json, config_json, TaxEngine::compare)
}

/// Regime comparison from plain amount strings, e.g. `("1000000", "150000")`.
#[napi]
pub fn compare_for_income(
    annual_income: String,
    deductions: Option<String>,
    config_json: Option<String>,
) -> NapiResult<String> {
    let input = ComparisonInput {
        annual_income: parse_amount("annual_income", &annual_income)?,
        deductions: match deductions {
            Some(d) => parse_amount("deductions", &d)?,
            None => Decimal::ZERO,
        },
    };
    let output = engine(config_json)?.compare(&input).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

fn parse_amount(field: &str, raw: &str) -> NapiResult<Decimal> {
    Decimal::from_str(raw.trim())
        .map_err(|e| to_napi_error(format!("Invalid {field} '{raw}': {e}")))
}

// ---------------------------------------------------------------------------
// Capital gains and advance tax
// ---------------------------------------------------------------------------

#[napi]
pub fn compute_capital_gains_tax(
    input_json: String,
    config_json: Option<String>,
) -> NapiResult<String> {
    run(&input_json, config_json, TaxEngine::capital_gains)
}

#[napi]
pub fn compute_advance_tax_schedule(
    input_json: String,
    config_json: Option<String>,
) -> NapiResult<String> {
    run(&input_json, config_json, TaxEngine::advance_tax)
}

// ---------------------------------------------------------------------------
// Deductions and planning
// ---------------------------------------------------------------------------

#[napi]
pub fn aggregate_deductions(input_json: String, config_json: Option<String>) -> NapiResult<String> {
    run(&input_json, config_json, TaxEngine::deductions)
}

#[napi]
pub fn find_tax_saving_opportunities(
    input_json: String,
    config_json: Option<String>,
) -> NapiResult<String> {
    run(&input_json, config_json, TaxEngine::plan)
}

// ---------------------------------------------------------------------------
// Assessment and configuration
// ---------------------------------------------------------------------------

#[napi]
pub fn assess(input_json: String, config_json: Option<String>) -> NapiResult<String> {
    run(&input_json, config_json, TaxEngine::assess)
}

/// Built-in configuration for a fiscal year, as JSON callers can edit and pass back.
#[napi]
pub fn tax_config(fiscal_year: Option<String>) -> NapiResult<String> {
    let config = match fiscal_year {
        Some(label) => TaxConfig::for_fiscal_year(&label).map_err(to_napi_error)?,
        None => TaxConfig::default(),
    };
    serde_json::to_string(&config).map_err(to_napi_error)
}
