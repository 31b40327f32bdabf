//! Stress-test scenarios and their evaluation against a baseline loan.

use log::{debug, warn};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use super::life_events::build_life_event_scenarios;
use crate::config::EngineConfig;
use crate::error::MortgageRiskError;
use crate::risk::{self, RiskCategory};
use crate::types::{
    with_metadata, BorrowerProfile, ComputationOutput, LoanParameters, Money, Percent, Points,
    PropertyProfile,
};
use crate::MortgageRiskResult;

/// Qualitative severity attached to a scenario by its catalogue rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ImpactLevel {
    Low,
    Medium,
    High,
}

fn neutral_multiplier() -> Decimal {
    Decimal::ONE
}

/// A named perturbation of the baseline inputs. Omitted fields are neutral.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scenario {
    pub name: String,
    /// Added to the annual rate, in percent points
    #[serde(default)]
    pub rate_delta: Percent,
    #[serde(default = "neutral_multiplier")]
    pub property_value_multiplier: Decimal,
    #[serde(default = "neutral_multiplier")]
    pub income_multiplier: Decimal,
    /// Applied to the borrower's existing monthly debt
    #[serde(default = "neutral_multiplier")]
    pub expense_multiplier: Decimal,
    pub impact: ImpactLevel,
    #[serde(default)]
    pub description: String,
}

impl Scenario {
    pub fn new(name: impl Into<String>, impact: ImpactLevel) -> Self {
        Self {
            name: name.into(),
            rate_delta: Decimal::ZERO,
            property_value_multiplier: Decimal::ONE,
            income_multiplier: Decimal::ONE,
            expense_multiplier: Decimal::ONE,
            impact,
            description: String::new(),
        }
    }

    pub fn rate_delta(mut self, delta: Percent) -> Self {
        self.rate_delta = delta;
        self
    }

    pub fn property_value(mut self, multiplier: Decimal) -> Self {
        self.property_value_multiplier = multiplier;
        self
    }

    pub fn income(mut self, multiplier: Decimal) -> Self {
        self.income_multiplier = multiplier;
        self
    }

    pub fn expenses(mut self, multiplier: Decimal) -> Self {
        self.expense_multiplier = multiplier;
        self
    }

    pub fn describe(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }
}

/// Figures for the unmodified loan.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BaselineMetrics {
    pub monthly_payment: Money,
    pub dti_ratio: Percent,
    pub ltv_ratio: Percent,
    pub risk_score: Points,
    pub risk_category: RiskCategory,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScenarioResult {
    pub name: String,
    pub impact: ImpactLevel,
    pub description: String,
    pub annual_rate: Percent,
    pub monthly_income: Money,
    pub property_value: Money,
    pub monthly_payment: Money,
    pub payment_change: Money,
    /// Relative to the baseline payment
    pub payment_change_pct: Percent,
    pub dti_ratio: Percent,
    pub dti_change: Percent,
    pub ltv_ratio: Percent,
    pub ltv_change: Percent,
    pub risk_score: Points,
    pub risk_score_change: Points,
    pub risk_category: RiskCategory,
}

fn default_true() -> bool {
    true
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StressTestInput {
    pub loan: LoanParameters,
    pub borrower: BorrowerProfile,
    pub property: PropertyProfile,
    #[serde(default = "default_true")]
    pub include_market_scenarios: bool,
    #[serde(default)]
    pub include_life_events: bool,
    #[serde(default)]
    pub custom_scenarios: Vec<Scenario>,
    #[serde(default)]
    pub config: EngineConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StressTestOutput {
    pub baseline: BaselineMetrics,
    pub results: Vec<ScenarioResult>,
    pub worst_payment_scenario: Option<String>,
    pub worst_dti_scenario: Option<String>,
}

/// Market stress catalogue. Impact tags are fixed per scenario.
pub fn build_stress_scenarios(
    base_rate: Percent,
    base_property_value: Money,
    base_income: Money,
) -> Vec<Scenario> {
    let value_at = |m: Decimal| (base_property_value * m).round_dp(0);
    let income_at = |m: Decimal| (base_income * m).round_dp(0);

    vec![
        Scenario::new("Interest Rate +1%", ImpactLevel::High)
            .rate_delta(dec!(1))
            .describe(format!("Rate rises from {}% to {}%", base_rate, base_rate + dec!(1))),
        Scenario::new("Interest Rate +2%", ImpactLevel::High)
            .rate_delta(dec!(2))
            .describe(format!("Rate rises from {}% to {}%", base_rate, base_rate + dec!(2))),
        Scenario::new("Property Value -10%", ImpactLevel::Medium)
            .property_value(dec!(0.9))
            .describe(format!("Property value falls to {}", value_at(dec!(0.9)))),
        Scenario::new("Property Value -20%", ImpactLevel::High)
            .property_value(dec!(0.8))
            .describe(format!("Property value falls to {}", value_at(dec!(0.8)))),
        Scenario::new("Income -15%", ImpactLevel::Medium)
            .income(dec!(0.85))
            .describe(format!("Monthly income falls to {}", income_at(dec!(0.85)))),
        Scenario::new("Interest +1%, Property -10%", ImpactLevel::High)
            .rate_delta(dec!(1))
            .property_value(dec!(0.9))
            .describe(format!(
                "Rate {}% with property value {}",
                base_rate + dec!(1),
                value_at(dec!(0.9))
            )),
        Scenario::new("Interest +1%, Income -15%", ImpactLevel::High)
            .rate_delta(dec!(1))
            .income(dec!(0.85))
            .describe(format!(
                "Rate {}% with monthly income {}",
                base_rate + dec!(1),
                income_at(dec!(0.85))
            )),
    ]
}

pub fn baseline(
    loan: &LoanParameters,
    borrower: &BorrowerProfile,
    property: &PropertyProfile,
    config: &EngineConfig,
) -> MortgageRiskResult<BaselineMetrics> {
    let a = risk::score(loan, property.value, borrower, config)?;
    Ok(BaselineMetrics {
        monthly_payment: a.monthly_payment,
        dti_ratio: a.dti_ratio,
        ltv_ratio: a.ltv_ratio,
        risk_score: a.score,
        risk_category: a.category,
    })
}

fn evaluate_against(
    base: &BaselineMetrics,
    scenario: &Scenario,
    loan: &LoanParameters,
    borrower: &BorrowerProfile,
    property: &PropertyProfile,
    config: &EngineConfig,
) -> MortgageRiskResult<ScenarioResult> {
    let income = borrower.monthly_income * scenario.income_multiplier;
    if income <= Decimal::ZERO {
        return Err(MortgageRiskError::UndefinedRatio {
            ratio: "DTI".into(),
            reason: format!(
                "scenario '{}' drives monthly income to {}",
                scenario.name, income
            ),
        });
    }
    if scenario.expense_multiplier < Decimal::ZERO {
        return Err(MortgageRiskError::InvalidInput {
            field: "expense_multiplier".into(),
            reason: format!(
                "scenario '{}' has a negative expense multiplier {}",
                scenario.name, scenario.expense_multiplier
            ),
        });
    }
    let value = property.value * scenario.property_value_multiplier;
    if value <= Decimal::ZERO {
        return Err(MortgageRiskError::UndefinedRatio {
            ratio: "LTV".into(),
            reason: format!(
                "scenario '{}' drives property value to {}",
                scenario.name, value
            ),
        });
    }

    let stressed_rate = loan.annual_rate + scenario.rate_delta;
    if stressed_rate < Decimal::ZERO {
        return Err(MortgageRiskError::InvalidInput {
            field: "rate_delta".into(),
            reason: format!(
                "scenario '{}' drives the interest rate to {}%",
                scenario.name, stressed_rate
            ),
        });
    }
    let stressed_loan = LoanParameters {
        annual_rate: stressed_rate,
        ..loan.clone()
    };
    let stressed_borrower = BorrowerProfile {
        monthly_income: income,
        monthly_debt: borrower.monthly_debt * scenario.expense_multiplier,
        ..borrower.clone()
    };

    let a = risk::score(&stressed_loan, value, &stressed_borrower, config)?;
    let payment_change = a.monthly_payment - base.monthly_payment;

    Ok(ScenarioResult {
        name: scenario.name.clone(),
        impact: scenario.impact,
        description: scenario.description.clone(),
        annual_rate: stressed_loan.annual_rate,
        monthly_income: income,
        property_value: value,
        monthly_payment: a.monthly_payment,
        payment_change,
        payment_change_pct: payment_change / base.monthly_payment * Decimal::ONE_HUNDRED,
        dti_ratio: a.dti_ratio,
        dti_change: a.dti_ratio - base.dti_ratio,
        ltv_ratio: a.ltv_ratio,
        ltv_change: a.ltv_ratio - base.ltv_ratio,
        risk_score: a.score,
        risk_score_change: a.score - base.risk_score,
        risk_category: a.category,
    })
}

/// Apply a scenario to the baseline inputs and report new values and deltas.
///
/// Scenarios that push income or property value to zero or below fail with
/// [`MortgageRiskError::UndefinedRatio`]; a negative stressed rate or expense
/// multiplier fails with [`MortgageRiskError::InvalidInput`].
pub fn evaluate(
    scenario: &Scenario,
    loan: &LoanParameters,
    borrower: &BorrowerProfile,
    property: &PropertyProfile,
    config: &EngineConfig,
) -> MortgageRiskResult<ScenarioResult> {
    let base = baseline(loan, borrower, property, config)?;
    evaluate_against(&base, scenario, loan, borrower, property, config)
}

pub fn run_stress_test(
    input: &StressTestInput,
) -> MortgageRiskResult<ComputationOutput<StressTestOutput>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    input.config.validate()?;
    input.borrower.validate()?;
    input.property.validate()?;

    let mut scenarios = Vec::new();
    if input.include_market_scenarios {
        scenarios.extend(build_stress_scenarios(
            input.loan.annual_rate,
            input.property.value,
            input.borrower.monthly_income,
        ));
    }
    if input.include_life_events {
        scenarios.extend(build_life_event_scenarios());
    }
    scenarios.extend(input.custom_scenarios.iter().cloned());

    if scenarios.is_empty() {
        return Err(MortgageRiskError::InvalidInput {
            field: "scenarios".into(),
            reason: "No scenarios selected".into(),
        });
    }
    debug!("running {} stress scenarios", scenarios.len());

    let base = baseline(&input.loan, &input.borrower, &input.property, &input.config)?;

    let mut results = Vec::with_capacity(scenarios.len());
    for scenario in &scenarios {
        let result = evaluate_against(
            &base,
            scenario,
            &input.loan,
            &input.borrower,
            &input.property,
            &input.config,
        )
        .inspect_err(|e| warn!("scenario '{}' rejected: {e}", scenario.name))?;

        if result.ltv_ratio > Decimal::ONE_HUNDRED {
            warnings.push(format!(
                "{}: loan exceeds property value (LTV {}%)",
                result.name,
                result.ltv_ratio.round_dp(1)
            ));
        }
        results.push(result);
    }

    let worst_payment_scenario = results
        .iter()
        .max_by(|a, b| a.payment_change.cmp(&b.payment_change))
        .map(|r| r.name.clone());
    let worst_dti_scenario = results
        .iter()
        .max_by(|a, b| a.dti_ratio.cmp(&b.dti_ratio))
        .map(|r| r.name.clone());

    let output = StressTestOutput {
        baseline: base,
        results,
        worst_payment_scenario,
        worst_dti_scenario,
    };

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Deterministic Stress Test (rate, property value, income, life events)",
        &serde_json::json!({
            "num_scenarios": scenarios.len(),
            "include_market_scenarios": input.include_market_scenarios,
            "include_life_events": input.include_life_events,
        }),
        warnings,
        elapsed,
        output,
    ))
}
