pub mod config;
pub mod error;
pub mod types;

pub mod affordability;
pub mod amortization;
pub mod recommendation;
pub mod risk;
pub mod stress_testing;

#[cfg(feature = "forecast")]
pub mod forecast;

pub use config::EngineConfig;
pub use error::MortgageRiskError;
pub use types::*;

/// Standard result type for all mortgage-risk operations
pub type MortgageRiskResult<T> = Result<T, MortgageRiskError>;
