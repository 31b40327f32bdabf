use thiserror::Error;

#[derive(Debug, Error)]
pub enum MortgageRiskError {
    #[error("Invalid input: {field} — {reason}")]
    InvalidInput { field: String, reason: String },

    #[error("Division by zero in {context}")]
    DivisionByZero { context: String },

    #[error("Undefined ratio: {ratio} — {reason}")]
    UndefinedRatio { ratio: String, reason: String },

    #[error("No feasible loan structure among {evaluated} candidates: {reason}")]
    NoFeasibleCandidate { evaluated: usize, reason: String },

    #[error("Financial impossibility: {0}")]
    FinancialImpossibility(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

impl From<serde_json::Error> for MortgageRiskError {
    fn from(e: serde_json::Error) -> Self {
        MortgageRiskError::SerializationError(e.to_string())
    }
}
