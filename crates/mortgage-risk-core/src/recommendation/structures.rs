//! Loan-structure recommender.
//!
//! Derives three fixed structures from the requested loan, filters them by
//! the borrower's constraints and picks one. The pick is a documented
//! heuristic, not an optimisation:
//!
//! 1. `payment_priority >= 4` -- lowest monthly payment wins.
//! 2. `payment_priority <= 2` -- lowest total interest wins.
//! 3. otherwise -- index `risk_tolerance - 1` into the feasible list (in
//!    Conservative, Balanced, Growth-Focused order), clamped to its length.
//!
//! Rules 1 and 2 take precedence over rule 3.

use log::{debug, warn};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::affordability::ratios;
use crate::amortization::loan_payment;
use crate::config::EngineConfig;
use crate::error::MortgageRiskError;
use crate::types::{
    with_metadata, BorrowerProfile, ComputationOutput, LoanParameters, Money, Percent,
    PropertyProfile,
};
use crate::MortgageRiskResult;

/// Floor applied to discounted candidate rates.
const RATE_FLOOR: Decimal = dec!(2.8);
const MIN_CONSERVATIVE_TERM: u32 = 15;
const GROWTH_TERM: u32 = 30;
const DOWN_PAYMENT_STEP: Decimal = dec!(20_000);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StructureClass {
    Conservative,
    Balanced,
    #[serde(rename = "Growth-Focused")]
    GrowthFocused,
}

impl std::fmt::Display for StructureClass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StructureClass::Conservative => write!(f, "Conservative"),
            StructureClass::Balanced => write!(f, "Balanced"),
            StructureClass::GrowthFocused => write!(f, "Growth-Focused"),
        }
    }
}

/// Estimated lender acceptance likelihood. A fixed property of each
/// structure class rather than a live lender decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ApprovalTier {
    VeryHigh,
    High,
    Moderate,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TargetApproval {
    VeryHigh,
    High,
    Moderate,
    Flexible,
}

impl TargetApproval {
    pub fn accepts(self, tier: ApprovalTier) -> bool {
        match self {
            TargetApproval::Flexible => true,
            TargetApproval::VeryHigh => tier == ApprovalTier::VeryHigh,
            TargetApproval::High => tier == ApprovalTier::High,
            TargetApproval::Moderate => tier == ApprovalTier::Moderate,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Preferences {
    /// 1 (most cautious) to 5
    pub risk_tolerance: u8,
    /// 1 (minimise lifetime interest) to 5 (minimise monthly payment)
    pub payment_priority: u8,
    pub max_monthly_payment: Money,
    pub target_approval: TargetApproval,
}

impl Preferences {
    pub fn validate(&self) -> MortgageRiskResult<()> {
        if !(1..=5).contains(&self.risk_tolerance) {
            return Err(MortgageRiskError::InvalidInput {
                field: "risk_tolerance".into(),
                reason: "Risk tolerance must be between 1 and 5".into(),
            });
        }
        if !(1..=5).contains(&self.payment_priority) {
            return Err(MortgageRiskError::InvalidInput {
                field: "payment_priority".into(),
                reason: "Payment priority must be between 1 and 5".into(),
            });
        }
        if self.max_monthly_payment <= Decimal::ZERO {
            return Err(MortgageRiskError::InvalidInput {
                field: "max_monthly_payment".into(),
                reason: "Maximum monthly payment must be positive".into(),
            });
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SelectionRule {
    LowestPayment,
    LowestTotalInterest,
    RiskTolerance,
}

impl SelectionRule {
    pub fn for_priority(payment_priority: u8) -> Self {
        match payment_priority {
            4..=u8::MAX => SelectionRule::LowestPayment,
            0..=2 => SelectionRule::LowestTotalInterest,
            _ => SelectionRule::RiskTolerance,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoanCandidate {
    pub structure: StructureClass,
    pub loan: LoanParameters,
    pub down_payment: Money,
    pub monthly_payment: Money,
    pub total_interest: Money,
    pub ltv_ratio: Percent,
    pub dti_ratio: Percent,
    pub approval_tier: ApprovalTier,
    pub benefits: Vec<String>,
    pub considerations: Vec<String>,
    /// Why the candidate failed the borrower's constraints; empty if feasible
    pub rejection_reasons: Vec<String>,
}

impl LoanCandidate {
    pub fn is_feasible(&self) -> bool {
        self.rejection_reasons.is_empty()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Recommendation {
    pub selected: LoanCandidate,
    pub selection_rule: SelectionRule,
    /// Every generated candidate, feasible or not, in generation order
    pub candidates: Vec<LoanCandidate>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecommendationInput {
    pub borrower: BorrowerProfile,
    pub loan: LoanParameters,
    pub property: PropertyProfile,
    pub preferences: Preferences,
    #[serde(default)]
    pub config: EngineConfig,
}

struct Structure {
    class: StructureClass,
    down_payment: Money,
    term_years: u32,
    annual_rate: Percent,
    tier: ApprovalTier,
    benefits: &'static [&'static str],
    considerations: &'static [&'static str],
}

fn structures(baseline: &LoanParameters, property_value: Money) -> [Structure; 3] {
    let base_dp = (property_value - baseline.principal).max(Decimal::ZERO);
    let pct_of_value = |p: Decimal| property_value * p;

    [
        Structure {
            class: StructureClass::Conservative,
            down_payment: (base_dp + DOWN_PAYMENT_STEP).max(pct_of_value(dec!(0.25))),
            term_years: baseline
                .term_years
                .saturating_sub(5)
                .max(MIN_CONSERVATIVE_TERM),
            annual_rate: (baseline.annual_rate - dec!(0.3)).max(RATE_FLOOR),
            tier: ApprovalTier::VeryHigh,
            benefits: &[
                "Lowest lifetime interest cost",
                "Strong equity position from day one",
                "Shorter payoff horizon",
            ],
            considerations: &["Requires the largest down payment"],
        },
        Structure {
            class: StructureClass::Balanced,
            down_payment: base_dp.max(pct_of_value(dec!(0.20))),
            term_years: baseline.term_years,
            annual_rate: (baseline.annual_rate - dec!(0.1)).max(RATE_FLOOR),
            tier: ApprovalTier::High,
            benefits: &[
                "20% equity avoids mortgage insurance",
                "Keeps the requested term",
            ],
            considerations: &["Moderate cash outlay at closing"],
        },
        Structure {
            class: StructureClass::GrowthFocused,
            down_payment: (base_dp - DOWN_PAYMENT_STEP).max(pct_of_value(dec!(0.10))),
            term_years: baseline.term_years.max(GROWTH_TERM),
            annual_rate: baseline.annual_rate + dec!(0.2),
            tier: ApprovalTier::Moderate,
            benefits: &[
                "Lowest upfront cash requirement",
                "Preserves liquidity for other investments",
            ],
            considerations: &[
                "Highest lifetime interest cost",
                "Thin equity buffer against price declines",
            ],
        },
    ]
}

fn build_candidate(
    s: Structure,
    borrower: &BorrowerProfile,
    property: &PropertyProfile,
    preferences: &Preferences,
    config: &EngineConfig,
) -> MortgageRiskResult<Option<LoanCandidate>> {
    if s.down_payment >= property.value {
        warn!("{} structure needs no loan; skipped", s.class);
        return Ok(None);
    }

    let loan = LoanParameters::new(property.value - s.down_payment, s.annual_rate, s.term_years);
    let monthly_payment = loan_payment(&loan)?;
    let total_interest = monthly_payment * Decimal::from(loan.num_payments()) - loan.principal;
    let ltv_ratio = ratios::ltv(loan.principal, property.value)?;
    let dti_ratio = ratios::dti(borrower.monthly_income, borrower.monthly_debt, monthly_payment)?;

    let mut considerations: Vec<String> = s.considerations.iter().map(|c| c.to_string()).collect();
    if s.down_payment > borrower.assets {
        considerations.push(format!(
            "Down payment exceeds available assets by {}",
            (s.down_payment - borrower.assets).round_dp(2)
        ));
    }
    if ltv_ratio > config.ltv_tiers.low {
        considerations.push(format!(
            "LTV above {}% typically requires mortgage insurance",
            config.ltv_tiers.low
        ));
    }

    let mut rejection_reasons = Vec::new();
    if monthly_payment > preferences.max_monthly_payment {
        rejection_reasons.push(format!(
            "Payment {} exceeds the maximum of {}",
            monthly_payment.round_dp(2),
            preferences.max_monthly_payment
        ));
    }
    if !preferences.target_approval.accepts(s.tier) {
        rejection_reasons.push(format!(
            "Approval tier {:?} does not match target {:?}",
            s.tier, preferences.target_approval
        ));
    }
    if ltv_ratio > config.max_ltv {
        rejection_reasons.push(format!(
            "LTV {}% exceeds the {}% cap",
            ltv_ratio.round_dp(2),
            config.max_ltv
        ));
    }

    Ok(Some(LoanCandidate {
        structure: s.class,
        loan,
        down_payment: s.down_payment,
        monthly_payment,
        total_interest,
        ltv_ratio,
        dti_ratio,
        approval_tier: s.tier,
        benefits: s.benefits.iter().map(|b| b.to_string()).collect(),
        considerations,
        rejection_reasons,
    }))
}

/// Generate, filter and select a loan structure.
pub fn recommend(
    borrower: &BorrowerProfile,
    baseline_loan: &LoanParameters,
    property: &PropertyProfile,
    preferences: &Preferences,
    config: &EngineConfig,
) -> MortgageRiskResult<Recommendation> {
    preferences.validate()?;
    borrower.validate()?;
    property.validate()?;

    let mut candidates = Vec::with_capacity(3);
    for s in structures(baseline_loan, property.value) {
        if let Some(c) = build_candidate(s, borrower, property, preferences, config)? {
            candidates.push(c);
        }
    }

    let feasible: Vec<&LoanCandidate> = candidates.iter().filter(|c| c.is_feasible()).collect();
    if feasible.is_empty() {
        let reasons: Vec<String> = candidates
            .iter()
            .map(|c| format!("{}: {}", c.structure, c.rejection_reasons.join("; ")))
            .collect();
        return Err(MortgageRiskError::NoFeasibleCandidate {
            evaluated: candidates.len(),
            reason: if reasons.is_empty() {
                "no structure requires a loan".into()
            } else {
                reasons.join(" | ")
            },
        });
    }

    let selection_rule = SelectionRule::for_priority(preferences.payment_priority);
    let selected = match selection_rule {
        SelectionRule::LowestPayment => feasible
            .iter()
            .min_by(|a, b| a.monthly_payment.cmp(&b.monthly_payment)),
        SelectionRule::LowestTotalInterest => feasible
            .iter()
            .min_by(|a, b| a.total_interest.cmp(&b.total_interest)),
        SelectionRule::RiskTolerance => {
            let idx = usize::from(preferences.risk_tolerance - 1).min(feasible.len() - 1);
            feasible.get(idx)
        }
    }
    .map(|c| (*c).clone())
    .ok_or_else(|| MortgageRiskError::NoFeasibleCandidate {
        evaluated: candidates.len(),
        reason: "selection produced no candidate".into(),
    })?;
    debug!(
        "selected {} structure via {:?} out of {} feasible",
        selected.structure,
        selection_rule,
        feasible.len()
    );

    Ok(Recommendation {
        selected,
        selection_rule,
        candidates,
    })
}

pub fn recommend_structure(
    input: &RecommendationInput,
) -> MortgageRiskResult<ComputationOutput<Recommendation>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();
    input.config.validate()?;

    let rec = recommend(
        &input.borrower,
        &input.loan,
        &input.property,
        &input.preferences,
        &input.config,
    )?;

    if rec.selected.down_payment > input.borrower.assets {
        warnings.push(format!(
            "Selected {} structure needs a down payment of {} against assets of {}",
            rec.selected.structure,
            rec.selected.down_payment.round_dp(2),
            input.borrower.assets
        ));
    }

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Rule-Based Loan Structure Recommendation",
        &input.preferences,
        warnings,
        elapsed,
        rec,
    ))
}
