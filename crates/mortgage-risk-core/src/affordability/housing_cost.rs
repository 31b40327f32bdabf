//! Affordability picture for a borrower/property pair.
//!
//! Covers:
//! 1. **Housing cost** -- mortgage payment plus estimated tax, insurance,
//!    maintenance and a linear renovation reserve.
//! 2. **Ratios** -- front-end housing ratio, DTI and LTV with their tiers.
//! 3. **Income allocation** -- housing / other debt / remaining income.
//! 4. **Emergency fund** -- 3/6/12-month targets and asset coverage.

use log::debug;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use super::ratios::{self, RatioTier};
use crate::amortization::loan_payment;
use crate::config::EngineConfig;
use crate::error::MortgageRiskError;
use crate::types::{
    with_metadata, BorrowerProfile, ComputationOutput, LoanParameters, Money, Percent,
    PropertyProfile,
};
use crate::MortgageRiskResult;

const MONTHS_PER_YEAR: Decimal = dec!(12);

/// Monthly cost of owning the property.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HousingCost {
    pub mortgage_payment: Money,
    pub property_tax: Money,
    pub insurance: Money,
    pub maintenance_fee: Money,
    pub renovation_reserve: Money,
    pub total: Money,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IncomeAllocation {
    pub housing: Money,
    pub other_debt: Money,
    pub remaining: Money,
    pub housing_pct: Percent,
    pub other_debt_pct: Percent,
    pub remaining_pct: Percent,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmergencyFund {
    pub minimum: Money,
    pub recommended: Money,
    pub strong: Money,
    /// Borrower assets as a percent of the recommended target
    pub coverage_pct: Percent,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AffordabilityInput {
    pub loan: LoanParameters,
    pub borrower: BorrowerProfile,
    pub property: PropertyProfile,
    #[serde(default)]
    pub config: EngineConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AffordabilityOutput {
    pub housing_cost: HousingCost,
    pub housing_ratio: Percent,
    pub housing_tier: RatioTier,
    pub dti_ratio: Percent,
    pub dti_tier: RatioTier,
    pub ltv_ratio: Percent,
    pub ltv_tier: RatioTier,
    pub income_allocation: IncomeAllocation,
    pub emergency_fund: EmergencyFund,
}

/// Monthly renovation reserve: total planned cost spread evenly over the
/// configured horizon.
pub fn renovation_reserve(
    property: &PropertyProfile,
    horizon_years: u32,
) -> MortgageRiskResult<Money> {
    if horizon_years == 0 {
        return Err(MortgageRiskError::InvalidInput {
            field: "renovation_horizon_years".into(),
            reason: "Renovation horizon must be at least one year".into(),
        });
    }
    Ok(property.total_renovation_cost() / (Decimal::from(horizon_years) * MONTHS_PER_YEAR))
}

pub fn housing_cost(
    loan: &LoanParameters,
    property: &PropertyProfile,
    config: &EngineConfig,
) -> MortgageRiskResult<HousingCost> {
    let mortgage_payment = loan_payment(loan)?;
    let property_tax =
        property.value * config.property_tax_rate / Decimal::ONE_HUNDRED / MONTHS_PER_YEAR;
    let insurance =
        property.value * config.insurance_rate / Decimal::ONE_HUNDRED / MONTHS_PER_YEAR;
    let renovation_reserve = renovation_reserve(property, config.renovation_horizon_years)?;

    Ok(HousingCost {
        mortgage_payment,
        property_tax,
        insurance,
        maintenance_fee: property.maintenance_fee,
        renovation_reserve,
        total: mortgage_payment
            + property_tax
            + insurance
            + property.maintenance_fee
            + renovation_reserve,
    })
}

fn emergency_fund(total_housing: Money, assets: Money, months: &[u32; 3]) -> EmergencyFund {
    let [min, rec, strong] = *months;
    let recommended = total_housing * Decimal::from(rec);
    let coverage_pct = if recommended.is_zero() {
        Decimal::ZERO
    } else {
        assets / recommended * Decimal::ONE_HUNDRED
    };
    EmergencyFund {
        minimum: total_housing * Decimal::from(min),
        recommended,
        strong: total_housing * Decimal::from(strong),
        coverage_pct,
    }
}

pub fn analyze_affordability(
    input: &AffordabilityInput,
) -> MortgageRiskResult<ComputationOutput<AffordabilityOutput>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();
    debug!(
        "affordability for loan {} against income {}",
        input.loan.principal, input.borrower.monthly_income
    );

    input.config.validate()?;
    input.borrower.validate()?;
    input.property.validate()?;

    let cost = housing_cost(&input.loan, &input.property, &input.config)?;
    let income = input.borrower.monthly_income;

    let housing_ratio = ratios::housing_ratio(income, cost.total)?;
    let dti_ratio = ratios::dti(income, input.borrower.monthly_debt, cost.mortgage_payment)?;
    let ltv_ratio = ratios::ltv(input.loan.principal, input.property.value)?;

    let remaining = income - cost.total - input.borrower.monthly_debt;
    if remaining < Decimal::ZERO {
        warnings.push(format!(
            "Housing cost and existing debt exceed monthly income by {}",
            (-remaining).round_dp(2)
        ));
    }
    let income_allocation = IncomeAllocation {
        housing: cost.total,
        other_debt: input.borrower.monthly_debt,
        remaining,
        housing_pct: housing_ratio,
        other_debt_pct: input.borrower.monthly_debt / income * Decimal::ONE_HUNDRED,
        remaining_pct: remaining / income * Decimal::ONE_HUNDRED,
    };

    let fund = emergency_fund(
        cost.total,
        input.borrower.assets,
        &input.config.emergency_fund_months,
    );
    if fund.coverage_pct < dec!(50) {
        warnings.push(format!(
            "Assets cover only {}% of the recommended emergency fund",
            fund.coverage_pct.round_dp(1)
        ));
    }

    let output = AffordabilityOutput {
        housing_tier: ratios::housing_tier(housing_ratio, &input.config.housing_limits),
        housing_ratio,
        dti_tier: ratios::dti_tier(dti_ratio, &input.config.dti_tiers),
        dti_ratio,
        ltv_tier: ratios::ltv_tier(ltv_ratio, &input.config.ltv_tiers),
        ltv_ratio,
        housing_cost: cost,
        income_allocation,
        emergency_fund: fund,
    };

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Housing Cost, DTI/LTV and Emergency Fund Affordability Analysis",
        &serde_json::json!({
            "property_tax_rate": input.config.property_tax_rate.to_string(),
            "insurance_rate": input.config.insurance_rate.to_string(),
            "renovation_horizon_years": input.config.renovation_horizon_years,
        }),
        warnings,
        elapsed,
        output,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Renovation;

    fn assert_close(actual: Decimal, expected: Decimal, tol: Decimal, msg: &str) {
        let diff = (actual - expected).abs();
        assert!(
            diff <= tol,
            "{}: expected ~{}, got {} (diff = {})",
            msg,
            expected,
            actual,
            diff
        );
    }

    fn sample_input() -> AffordabilityInput {
        AffordabilityInput {
            loan: LoanParameters::new(dec!(360_000), dec!(4.5), 30),
            borrower: BorrowerProfile {
                monthly_income: dec!(6500),
                monthly_debt: dec!(1800),
                assets: dec!(40_000),
                credit_score: None,
            },
            property: PropertyProfile {
                value: dec!(450_000),
                maintenance_fee: dec!(150),
                renovations: vec![
                    Renovation {
                        year: 2028,
                        cost: dec!(6000),
                        kind: "Roof".into(),
                    },
                    Renovation {
                        year: 2031,
                        cost: dec!(12_000),
                        kind: "Kitchen".into(),
                    },
                ],
            },
            config: EngineConfig::default(),
        }
    }

    #[test]
    fn test_renovation_reserve_over_ten_years() {
        let input = sample_input();
        // 18,000 over 120 months
        assert_eq!(renovation_reserve(&input.property, 10).unwrap(), dec!(150));
    }

    #[test]
    fn test_renovation_reserve_respects_horizon() {
        let input = sample_input();
        assert_eq!(renovation_reserve(&input.property, 5).unwrap(), dec!(300));
        assert!(renovation_reserve(&input.property, 0).is_err());
    }

    #[test]
    fn test_housing_cost_components() {
        let input = sample_input();
        let cost = housing_cost(&input.loan, &input.property, &input.config).unwrap();
        assert_eq!(cost.property_tax, dec!(375));
        assert_eq!(cost.insurance, dec!(131.25));
        assert_eq!(cost.renovation_reserve, dec!(150));
        assert_close(
            cost.total,
            dec!(1824.07) + dec!(375) + dec!(131.25) + dec!(150) + dec!(150),
            dec!(0.01),
            "total housing cost",
        );
    }

    #[test]
    fn test_affordability_ratios_and_tiers() {
        let out = analyze_affordability(&sample_input()).unwrap().result;
        assert_close(out.dti_ratio, dec!(55.75), dec!(0.01), "DTI");
        assert_eq!(out.dti_tier, RatioTier::VeryHigh);
        assert_eq!(out.ltv_ratio, dec!(80));
        assert_eq!(out.ltv_tier, RatioTier::Low);
        assert_eq!(out.housing_tier, RatioTier::High);
    }

    #[test]
    fn test_income_allocation_sums_to_income() {
        let out = analyze_affordability(&sample_input()).unwrap().result;
        let a = &out.income_allocation;
        assert_close(
            a.housing + a.other_debt + a.remaining,
            dec!(6500),
            dec!(0.000001),
            "allocation sum",
        );
        assert!(a.remaining < Decimal::ZERO);
    }

    #[test]
    fn test_negative_remaining_income_warns() {
        let out = analyze_affordability(&sample_input()).unwrap();
        assert!(out.warnings.iter().any(|w| w.contains("exceed monthly income")));
    }

    #[test]
    fn test_emergency_fund_targets() {
        let out = analyze_affordability(&sample_input()).unwrap().result;
        let total = out.housing_cost.total;
        assert_eq!(out.emergency_fund.minimum, total * dec!(3));
        assert_eq!(out.emergency_fund.recommended, total * dec!(6));
        assert_eq!(out.emergency_fund.strong, total * dec!(12));
        // 40,000 / (6 * ~2630) ≈ 253%
        assert!(out.emergency_fund.coverage_pct > dec!(250));
    }

    #[test]
    fn test_zero_income_is_reported() {
        let mut input = sample_input();
        input.borrower.monthly_income = Decimal::ZERO;
        assert!(matches!(
            analyze_affordability(&input),
            Err(MortgageRiskError::DivisionByZero { .. })
        ));
    }

    #[test]
    fn test_zero_property_value_is_rejected() {
        let mut input = sample_input();
        input.property.value = Decimal::ZERO;
        assert!(matches!(
            analyze_affordability(&input),
            Err(MortgageRiskError::InvalidInput { .. })
        ));
    }
}
