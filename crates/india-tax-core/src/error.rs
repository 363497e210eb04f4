use rust_decimal::Decimal;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum IndiaTaxError {
    #[error("Invalid input: {field} — {reason}")]
    InvalidInput { field: String, reason: String },

    #[error("Invalid configuration: {field} — {reason}")]
    InvalidConfig { field: String, reason: String },

    #[error("Unsupported fiscal year: {0}")]
    UnsupportedFiscalYear(String),

    #[error("Convergence failure: {function} did not converge after {iterations} iterations (delta: {last_delta})")]
    ConvergenceFailure {
        function: String,
        iterations: u32,
        last_delta: Decimal,
    },

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

impl From<serde_json::Error> for IndiaTaxError {
    fn from(e: serde_json::Error) -> Self {
        IndiaTaxError::SerializationError(e.to_string())
    }
}
