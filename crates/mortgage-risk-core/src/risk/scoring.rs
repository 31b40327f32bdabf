//! Composite 0-100 loan risk score.
//!
//! Each factor (DTI, LTV, rate, term and, when known, credit score) is mapped
//! through its point table; the sum is clamped to [0, 100] and bucketed into
//! a [`RiskCategory`]. Lower is better.

use log::debug;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use super::interpolation::RiskTables;
use crate::affordability::ratios::{self, RatioTier};
use crate::amortization::loan_payment;
use crate::config::EngineConfig;
use crate::types::{
    with_metadata, BorrowerProfile, ComputationOutput, LoanParameters, Money, Percent, Points,
};
use crate::MortgageRiskResult;

const MAX_SCORE: Decimal = dec!(100);

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum RiskCategory {
    Low,
    #[serde(rename = "Medium-Low")]
    MediumLow,
    #[serde(rename = "Medium-High")]
    MediumHigh,
    High,
}

impl std::fmt::Display for RiskCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RiskCategory::Low => write!(f, "Low"),
            RiskCategory::MediumLow => write!(f, "Medium-Low"),
            RiskCategory::MediumHigh => write!(f, "Medium-High"),
            RiskCategory::High => write!(f, "High"),
        }
    }
}

/// Point contribution of each risk factor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskComponents {
    pub dti_points: Points,
    pub ltv_points: Points,
    pub rate_points: Points,
    pub term_points: Points,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub credit_points: Option<Points>,
}

impl RiskComponents {
    pub fn total(&self) -> Points {
        self.dti_points
            + self.ltv_points
            + self.rate_points
            + self.term_points
            + self.credit_points.unwrap_or(Decimal::ZERO)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RiskAssessment {
    pub monthly_payment: Money,
    pub dti_ratio: Percent,
    pub ltv_ratio: Percent,
    pub components: RiskComponents,
    pub score: Points,
    pub category: RiskCategory,
    /// Ratio tiers are a separate scheme from the composite category
    pub dti_tier: RatioTier,
    pub ltv_tier: RatioTier,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RiskInput {
    pub loan: LoanParameters,
    pub borrower: BorrowerProfile,
    pub property_value: Money,
    #[serde(default)]
    pub config: EngineConfig,
}

/// Step function over the clamped score.
pub fn risk_category(score: Points) -> RiskCategory {
    if score < dec!(25) {
        RiskCategory::Low
    } else if score < dec!(50) {
        RiskCategory::MediumLow
    } else if score < dec!(75) {
        RiskCategory::MediumHigh
    } else {
        RiskCategory::High
    }
}

/// Map already-computed ratios and loan terms to component points.
pub fn score_components(
    dti: Percent,
    ltv: Percent,
    annual_rate: Percent,
    term_years: u32,
    credit_score: Option<u32>,
    tables: &RiskTables,
) -> MortgageRiskResult<RiskComponents> {
    tables.validate()?;
    Ok(RiskComponents {
        dti_points: tables.dti.interpolate(dti)?,
        ltv_points: tables.ltv.interpolate(ltv)?,
        rate_points: tables.rate.interpolate(annual_rate)?,
        term_points: tables.term.interpolate(Decimal::from(term_years))?,
        credit_points: credit_score
            .map(|cs| tables.credit_score.interpolate(Decimal::from(cs)))
            .transpose()?,
    })
}

/// Sum of components clamped to [0, 100].
pub fn clamp_score(components: &RiskComponents) -> Points {
    components.total().clamp(Decimal::ZERO, MAX_SCORE)
}

/// Score a loan against a borrower and property value.
///
/// DTI uses the loan's level monthly payment; LTV uses the loan principal.
/// Ratio failures (zero income or property value) propagate to the caller.
pub fn score(
    loan: &LoanParameters,
    property_value: Money,
    borrower: &BorrowerProfile,
    config: &EngineConfig,
) -> MortgageRiskResult<RiskAssessment> {
    let payment = loan_payment(loan)?;
    let dti = ratios::dti(borrower.monthly_income, borrower.monthly_debt, payment)?;
    let ltv = ratios::ltv(loan.principal, property_value)?;

    let components = score_components(
        dti,
        ltv,
        loan.annual_rate,
        loan.term_years,
        borrower.credit_score,
        &config.risk_tables,
    )?;
    let total = clamp_score(&components);

    Ok(RiskAssessment {
        monthly_payment: payment,
        dti_ratio: dti,
        ltv_ratio: ltv,
        components,
        score: total,
        category: risk_category(total),
        dti_tier: ratios::dti_tier(dti, &config.dti_tiers),
        ltv_tier: ratios::ltv_tier(ltv, &config.ltv_tiers),
    })
}

pub fn assess_risk(input: &RiskInput) -> MortgageRiskResult<ComputationOutput<RiskAssessment>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    input.config.validate()?;
    input.borrower.validate()?;

    let assessment = score(
        &input.loan,
        input.property_value,
        &input.borrower,
        &input.config,
    )?;
    debug!(
        "risk score {} ({}) for DTI {} / LTV {}",
        assessment.score, assessment.category, assessment.dti_ratio, assessment.ltv_ratio
    );

    if assessment.components.total() > MAX_SCORE {
        warnings.push(format!(
            "Raw component total {} exceeds 100 and was capped",
            assessment.components.total()
        ));
    }
    if input.borrower.credit_score.is_none() {
        warnings.push("No credit score supplied; credit factor excluded".into());
    }

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Piecewise-Linear Composite Risk Score (DTI, LTV, Rate, Term, Credit)",
        &input.config.risk_tables,
        warnings,
        elapsed,
        assessment,
    ))
}
