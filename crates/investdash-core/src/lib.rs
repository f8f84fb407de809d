pub mod currency;
pub mod dashboard;
pub mod error;
pub mod metrics;
pub mod record;
pub mod time_value;
pub mod types;
pub mod validation;

#[cfg(feature = "storage")]
pub mod storage;

#[cfg(feature = "insight")]
pub mod insight;

pub use error::InvestDashError;
pub use types::*;

/// Standard result type for all investdash operations
pub type InvestDashResult<T> = Result<T, InvestDashError>;
