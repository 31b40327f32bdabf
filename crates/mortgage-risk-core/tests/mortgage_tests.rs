use mortgage_risk_core::affordability::{analyze_affordability, AffordabilityInput, RatioTier};
use mortgage_risk_core::amortization::{analyze_amortization, compare_payment, AmortizationInput};
use mortgage_risk_core::recommendation::{recommend_structure, RecommendationInput, StructureClass};
use mortgage_risk_core::risk::{assess_risk, RiskCategory, RiskInput};
use mortgage_risk_core::stress_testing::{run_stress_test, ImpactLevel, Scenario, StressTestInput};
use mortgage_risk_core::{
    BorrowerProfile, EngineConfig, LoanParameters, MortgageRiskError, PropertyProfile,
};
use pretty_assertions::assert_eq;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

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

// ===========================================================================
// Reference borrower: 6,500 income, 1,800 debt, 360k @ 4.5% / 30y, 450k home
// ===========================================================================

fn reference_loan() -> LoanParameters {
    LoanParameters::new(dec!(360_000), dec!(4.5), 30)
}

fn reference_borrower() -> BorrowerProfile {
    BorrowerProfile {
        monthly_income: dec!(6500),
        monthly_debt: dec!(1800),
        assets: dec!(60_000),
        credit_score: None,
    }
}

fn reference_property() -> PropertyProfile {
    PropertyProfile::with_value(dec!(450_000))
}

#[test]
fn test_amortization_envelope() {
    let out = analyze_amortization(&AmortizationInput {
        loan: reference_loan(),
        summary_only: false,
        config: EngineConfig::default(),
    })
    .unwrap();
    let r = &out.result;

    assert_close(r.monthly_payment, dec!(1824.07), dec!(0.01), "payment");
    assert_eq!(r.num_payments, 360);
    assert_eq!(r.schedule.len(), 360);
    assert_eq!(r.yearly.len(), 30);
    assert_close(r.total_interest, dec!(296_664.16), dec!(0.01), "total interest");
    assert_eq!(out.metadata.precision, "rust_decimal_128bit");
}

#[test]
fn test_amortization_summary_only_drops_rows() {
    let out = analyze_amortization(&AmortizationInput {
        loan: reference_loan(),
        summary_only: true,
        config: EngineConfig::default(),
    })
    .unwrap();
    assert!(out.result.schedule.is_empty());
    assert_eq!(out.result.yearly.len(), 30);
}

#[test]
fn test_term_above_configured_maximum() {
    let cfg = EngineConfig {
        max_term_years: 25,
        ..EngineConfig::default()
    };
    let err = analyze_amortization(&AmortizationInput {
        loan: reference_loan(),
        summary_only: true,
        config: cfg,
    })
    .unwrap_err();
    assert!(matches!(err, MortgageRiskError::InvalidInput { .. }));
}

#[test]
fn test_what_if_rate_cut() {
    let alt = LoanParameters::new(dec!(360_000), dec!(4), 30);
    let cmp = compare_payment(&reference_loan(), &alt).unwrap();
    assert_close(cmp.difference, dec!(-105.37), dec!(0.01), "difference");
    assert!(cmp.alternative_total_interest < cmp.base_total_interest);
}

#[test]
fn test_reference_risk_assessment() {
    let out = assess_risk(&RiskInput {
        loan: reference_loan(),
        borrower: reference_borrower(),
        property_value: dec!(450_000),
        config: EngineConfig::default(),
    })
    .unwrap();
    assert_eq!(out.result.score, dec!(70));
    assert_eq!(out.result.category, RiskCategory::MediumHigh);
    assert_eq!(out.result.ltv_ratio, dec!(80));
}

#[test]
fn test_affordability_from_json() {
    let json = r#"{
        "loan": { "principal": "360000", "annual_rate": "4.5", "term_years": 30 },
        "borrower": { "monthly_income": "6500", "monthly_debt": "1800", "assets": "60000" },
        "property": {
            "value": "450000",
            "maintenance_fee": "150",
            "renovations": [{ "year": 2030, "cost": "12000", "type": "Kitchen" }]
        }
    }"#;
    let input: AffordabilityInput = serde_json::from_str(json).unwrap();
    assert_eq!(input.config.renovation_horizon_years, 10);

    let out = analyze_affordability(&input).unwrap().result;
    assert_eq!(out.housing_cost.renovation_reserve, dec!(100));
    assert_eq!(out.dti_tier, RatioTier::VeryHigh);
    assert_eq!(out.ltv_tier, RatioTier::Low);
}

#[test]
fn test_stress_test_with_life_events_and_custom_scenario() {
    let input = StressTestInput {
        loan: reference_loan(),
        borrower: reference_borrower(),
        property: reference_property(),
        include_market_scenarios: true,
        include_life_events: true,
        custom_scenarios: vec![Scenario::new("Rate +3%", ImpactLevel::High).rate_delta(dec!(3))],
        config: EngineConfig::default(),
    };
    let out = run_stress_test(&input).unwrap().result;
    assert_eq!(out.results.len(), 15);
    assert_eq!(out.worst_payment_scenario.as_deref(), Some("Rate +3%"));
    assert_eq!(out.worst_dti_scenario.as_deref(), Some("Job Loss"));

    let job_loss = out.results.iter().find(|r| r.name == "Job Loss").unwrap();
    assert_eq!(job_loss.monthly_income, dec!(2600));
    assert_eq!(job_loss.payment_change, Decimal::ZERO);
}

#[test]
fn test_stress_test_requires_a_scenario() {
    let input = StressTestInput {
        loan: reference_loan(),
        borrower: reference_borrower(),
        property: reference_property(),
        include_market_scenarios: false,
        include_life_events: false,
        custom_scenarios: Vec::new(),
        config: EngineConfig::default(),
    };
    assert!(matches!(
        run_stress_test(&input),
        Err(MortgageRiskError::InvalidInput { .. })
    ));
}

#[test]
fn test_recommendation_from_json() {
    let json = r#"{
        "borrower": { "monthly_income": "9000", "monthly_debt": "800", "assets": "150000" },
        "loan": { "principal": "360000", "annual_rate": "4.5", "term_years": 30 },
        "property": { "value": "450000" },
        "preferences": {
            "risk_tolerance": 2,
            "payment_priority": 3,
            "max_monthly_payment": "2500",
            "target_approval": "Flexible"
        }
    }"#;
    let input: RecommendationInput = serde_json::from_str(json).unwrap();
    let out = recommend_structure(&input).unwrap();
    assert_eq!(out.result.selected.structure, StructureClass::Balanced);
    assert_eq!(out.result.candidates.len(), 3);
    assert!(out.warnings.is_empty());

    let serialized = serde_json::to_value(&out.result.candidates[2]).unwrap();
    assert_eq!(serialized["structure"], "Growth-Focused");
}
