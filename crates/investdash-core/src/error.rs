use rust_decimal::Decimal;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum InvestDashError {
    #[error("Invalid input: {field} — {reason}")]
    InvalidInput { field: String, reason: String },

    #[error("Convergence failure: {function} did not converge after {iterations} iterations (delta: {last_delta})")]
    ConvergenceFailure {
        function: String,
        iterations: u32,
        last_delta: Decimal,
    },

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),

    #[error("Missing credential: {0}")]
    MissingCredential(String),

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Insight service returned {status}: {message}")]
    Service { status: u16, message: String },
}

impl From<serde_json::Error> for InvestDashError {
    fn from(e: serde_json::Error) -> Self {
        InvestDashError::SerializationError(e.to_string())
    }
}

impl From<std::io::Error> for InvestDashError {
    fn from(e: std::io::Error) -> Self {
        InvestDashError::Storage(e.to_string())
    }
}

#[cfg(feature = "insight")]
impl From<reqwest::Error> for InvestDashError {
    fn from(e: reqwest::Error) -> Self {
        InvestDashError::Transport(e.to_string())
    }
}
