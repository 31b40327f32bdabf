use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::config::TierThresholds;
use crate::error::MortgageRiskError;
use crate::types::{Money, Percent};
use crate::MortgageRiskResult;

/// Qualitative tier of a single affordability ratio. Independent of the
/// composite [`crate::risk::RiskCategory`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum RatioTier {
    Low,
    Medium,
    High,
    VeryHigh,
}

impl std::fmt::Display for RatioTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RatioTier::Low => write!(f, "Low"),
            RatioTier::Medium => write!(f, "Medium"),
            RatioTier::High => write!(f, "High"),
            RatioTier::VeryHigh => write!(f, "Very High"),
        }
    }
}

/// `numerator / denominator * 100`, refusing zero or negative denominators.
fn percent_of(
    ratio: &str,
    numerator: Money,
    denominator: Money,
    denominator_name: &str,
) -> MortgageRiskResult<Percent> {
    if denominator.is_zero() {
        return Err(MortgageRiskError::DivisionByZero {
            context: format!("{ratio} ({denominator_name} is zero)"),
        });
    }
    if denominator < Decimal::ZERO {
        return Err(MortgageRiskError::UndefinedRatio {
            ratio: ratio.into(),
            reason: format!("{denominator_name} is negative ({denominator})"),
        });
    }
    numerator
        .checked_div(denominator)
        .and_then(|q| q.checked_mul(Decimal::ONE_HUNDRED))
        .ok_or_else(|| MortgageRiskError::UndefinedRatio {
            ratio: ratio.into(),
            reason: "result exceeds representable range".into(),
        })
}

/// Debt-to-income: all monthly debt including the proposed payment, as a
/// percent of gross monthly income.
pub fn dti(
    monthly_income: Money,
    monthly_debt: Money,
    proposed_payment: Money,
) -> MortgageRiskResult<Percent> {
    percent_of(
        "DTI",
        monthly_debt + proposed_payment,
        monthly_income,
        "monthly income",
    )
}

/// Loan-to-value: loan amount as a percent of property value.
pub fn ltv(loan_amount: Money, property_value: Money) -> MortgageRiskResult<Percent> {
    percent_of("LTV", loan_amount, property_value, "property value")
}

/// Front-end ratio: total housing cost as a percent of gross monthly income.
pub fn housing_ratio(monthly_income: Money, housing_cost: Money) -> MortgageRiskResult<Percent> {
    percent_of("housing ratio", housing_cost, monthly_income, "monthly income")
}

fn tier(value: Percent, thresholds: &TierThresholds) -> RatioTier {
    if value <= thresholds.low {
        RatioTier::Low
    } else if value <= thresholds.medium {
        RatioTier::Medium
    } else if value <= thresholds.high {
        RatioTier::High
    } else {
        RatioTier::VeryHigh
    }
}

pub fn dti_tier(dti: Percent, thresholds: &TierThresholds) -> RatioTier {
    tier(dti, thresholds)
}

pub fn ltv_tier(ltv: Percent, thresholds: &TierThresholds) -> RatioTier {
    tier(ltv, thresholds)
}

/// Housing ratio tier; limits are exclusive and there is no Very High tier.
pub fn housing_tier(ratio: Percent, limits: &[Percent; 2]) -> RatioTier {
    if ratio < limits[0] {
        RatioTier::Low
    } else if ratio < limits[1] {
        RatioTier::Medium
    } else {
        RatioTier::High
    }
}
