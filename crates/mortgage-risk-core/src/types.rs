use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::MortgageRiskError;
use crate::MortgageRiskResult;

/// All monetary values. Wraps Decimal to prevent accidental f64 usage.
pub type Money = Decimal;

/// Percentages expressed in percent points (4.5 = 4.5%), matching how loan
/// rates and DTI/LTV ratios are quoted to borrowers.
pub type Percent = Decimal;

/// Risk points on the 0-100 composite scale
pub type Points = Decimal;

/// Terms of a fixed-rate loan
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoanParameters {
    pub principal: Money,
    /// Annual nominal rate in percent
    pub annual_rate: Percent,
    pub term_years: u32,
}

impl LoanParameters {
    pub fn new(principal: Money, annual_rate: Percent, term_years: u32) -> Self {
        Self {
            principal,
            annual_rate,
            term_years,
        }
    }

    /// Number of monthly payments over the life of the loan
    pub fn num_payments(&self) -> u32 {
        self.term_years.saturating_mul(12)
    }
}

/// Monthly financial position of the borrower
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BorrowerProfile {
    /// Gross monthly income
    pub monthly_income: Money,
    /// Existing monthly debt obligations, excluding the proposed loan
    pub monthly_debt: Money,
    /// Liquid assets available for a down payment or emergency fund
    #[serde(default)]
    pub assets: Money,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub credit_score: Option<u32>,
}

impl BorrowerProfile {
    pub fn validate(&self) -> MortgageRiskResult<()> {
        if self.monthly_income < Decimal::ZERO {
            return Err(MortgageRiskError::InvalidInput {
                field: "monthly_income".into(),
                reason: "Monthly income cannot be negative".into(),
            });
        }
        if self.monthly_debt < Decimal::ZERO {
            return Err(MortgageRiskError::InvalidInput {
                field: "monthly_debt".into(),
                reason: "Monthly debt cannot be negative".into(),
            });
        }
        if self.assets < Decimal::ZERO {
            return Err(MortgageRiskError::InvalidInput {
                field: "assets".into(),
                reason: "Assets cannot be negative".into(),
            });
        }
        Ok(())
    }
}

/// A planned renovation on the property
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Renovation {
    pub year: i32,
    pub cost: Money,
    #[serde(rename = "type")]
    pub kind: String,
}

/// The property securing the loan
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PropertyProfile {
    /// Appraised value
    pub value: Money,
    /// Monthly maintenance / association fee
    #[serde(default)]
    pub maintenance_fee: Money,
    #[serde(default)]
    pub renovations: Vec<Renovation>,
}

impl PropertyProfile {
    pub fn with_value(value: Money) -> Self {
        Self {
            value,
            maintenance_fee: Decimal::ZERO,
            renovations: Vec::new(),
        }
    }

    pub fn validate(&self) -> MortgageRiskResult<()> {
        if self.value <= Decimal::ZERO {
            return Err(MortgageRiskError::InvalidInput {
                field: "property.value".into(),
                reason: "Property value must be positive".into(),
            });
        }
        if self.maintenance_fee < Decimal::ZERO {
            return Err(MortgageRiskError::InvalidInput {
                field: "property.maintenance_fee".into(),
                reason: "Maintenance fee cannot be negative".into(),
            });
        }
        if let Some(r) = self.renovations.iter().find(|r| r.cost < Decimal::ZERO) {
            return Err(MortgageRiskError::InvalidInput {
                field: "property.renovations".into(),
                reason: format!("Renovation '{}' has a negative cost", r.kind),
            });
        }
        Ok(())
    }

    /// Total cost of all planned renovations
    pub fn total_renovation_cost(&self) -> Money {
        self.renovations.iter().map(|r| r.cost).sum()
    }
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
    pub computation_time_us: u64,
    pub precision: String,
}

/// Helper to wrap computation results with metadata
pub fn with_metadata<T: Serialize>(
    methodology: &str,
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
            computation_time_us: elapsed_us,
            precision: "rust_decimal_128bit".to_string(),
        },
    }
}
