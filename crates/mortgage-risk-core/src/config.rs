//! Engine-wide constants that shape affordability and risk decisions.
//!
//! Every analysis input carries an optional `config` that defaults to the
//! reference values below, so callers only override what they need.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::amortization::MAX_TERM_YEARS;
use crate::error::MortgageRiskError;
use crate::risk::interpolation::RiskTables;
use crate::types::Percent;
use crate::MortgageRiskResult;

/// Upper bounds of the Low, Medium and High tiers; anything above the last
/// bound is Very High. Bounds are inclusive.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TierThresholds {
    pub low: Percent,
    pub medium: Percent,
    pub high: Percent,
}

impl TierThresholds {
    fn validate(&self, field: &str) -> MortgageRiskResult<()> {
        if !(self.low < self.medium && self.medium < self.high) {
            return Err(MortgageRiskError::InvalidInput {
                field: field.into(),
                reason: "Tier thresholds must be strictly increasing".into(),
            });
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Years over which planned renovation costs are reserved for
    pub renovation_horizon_years: u32,
    /// Estimated annual property tax as a percent of property value
    pub property_tax_rate: Percent,
    /// Estimated annual homeowner's insurance as a percent of property value
    pub insurance_rate: Percent,
    pub risk_tables: RiskTables,
    pub dti_tiers: TierThresholds,
    pub ltv_tiers: TierThresholds,
    /// Housing-cost-to-income limits: below the first is Low, below the
    /// second is Medium, otherwise High.
    pub housing_limits: [Percent; 2],
    /// Months of housing cost for the minimum, recommended and strong
    /// emergency fund targets
    pub emergency_fund_months: [u32; 3],
    /// Hard LTV cap for recommended loan structures
    pub max_ltv: Percent,
    pub max_term_years: u32,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            renovation_horizon_years: 10,
            property_tax_rate: dec!(1.0),
            insurance_rate: dec!(0.35),
            risk_tables: RiskTables::default(),
            dti_tiers: TierThresholds {
                low: dec!(28),
                medium: dec!(36),
                high: dec!(43),
            },
            ltv_tiers: TierThresholds {
                low: dec!(80),
                medium: dec!(90),
                high: dec!(95),
            },
            housing_limits: [dec!(28), dec!(36)],
            emergency_fund_months: [3, 6, 12],
            max_ltv: dec!(95),
            max_term_years: 50,
        }
    }
}

impl EngineConfig {
    pub fn validate(&self) -> MortgageRiskResult<()> {
        if self.renovation_horizon_years == 0 {
            return Err(MortgageRiskError::InvalidInput {
                field: "renovation_horizon_years".into(),
                reason: "Renovation horizon must be at least one year".into(),
            });
        }
        if self.property_tax_rate < Decimal::ZERO || self.insurance_rate < Decimal::ZERO {
            return Err(MortgageRiskError::InvalidInput {
                field: "property_tax_rate / insurance_rate".into(),
                reason: "Cost rates cannot be negative".into(),
            });
        }
        if self.housing_limits[0] >= self.housing_limits[1] {
            return Err(MortgageRiskError::InvalidInput {
                field: "housing_limits".into(),
                reason: "Housing limits must be strictly increasing".into(),
            });
        }
        let [min, rec, strong] = self.emergency_fund_months;
        if !(min <= rec && rec <= strong) || rec == 0 {
            return Err(MortgageRiskError::InvalidInput {
                field: "emergency_fund_months".into(),
                reason: "Emergency fund months must be non-decreasing with a non-zero target".into(),
            });
        }
        if self.max_ltv <= Decimal::ZERO {
            return Err(MortgageRiskError::InvalidInput {
                field: "max_ltv".into(),
                reason: "LTV cap must be positive".into(),
            });
        }
        if self.max_term_years == 0 || self.max_term_years > MAX_TERM_YEARS {
            return Err(MortgageRiskError::InvalidInput {
                field: "max_term_years".into(),
                reason: format!("Maximum term must be between 1 and {MAX_TERM_YEARS} years"),
            });
        }
        self.dti_tiers.validate("dti_tiers")?;
        self.ltv_tiers.validate("ltv_tiers")?;
        self.risk_tables.validate()
    }
}
