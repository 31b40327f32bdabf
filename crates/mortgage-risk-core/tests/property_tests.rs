use mortgage_risk_core::affordability::{dti, ltv};
use mortgage_risk_core::amortization::{monthly_payment, schedule};
use mortgage_risk_core::risk::score;
use mortgage_risk_core::{BorrowerProfile, EngineConfig, LoanParameters};
use proptest::prelude::{prop_assert, prop_assert_eq, proptest};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

/// Rate in basis points to percent points.
fn rate_from_bp(bp: u32) -> Decimal {
    Decimal::from(bp) / dec!(100)
}

proptest! {
    #![proptest_config(proptest::test_runner::Config::with_cases(64))]

    #[test]
    fn prop_dti_non_decreasing_in_payment(
        income in 1_000u32..50_000,
        debt in 0u32..10_000,
        p1 in 0u32..20_000,
        extra in 0u32..5_000,
    ) {
        let income = Decimal::from(income);
        let debt = Decimal::from(debt);
        let lo = dti(income, debt, Decimal::from(p1)).unwrap();
        let hi = dti(income, debt, Decimal::from(p1 + extra)).unwrap();
        prop_assert!(hi >= lo);
    }

    #[test]
    fn prop_ltv_non_decreasing_in_loan(
        value in 50_000u32..2_000_000,
        loan in 0u32..2_000_000,
        extra in 0u32..100_000,
    ) {
        let value = Decimal::from(value);
        let lo = ltv(Decimal::from(loan), value).unwrap();
        let hi = ltv(Decimal::from(loan + extra), value).unwrap();
        prop_assert!(hi >= lo);
    }

    #[test]
    fn prop_dti_non_increasing_in_income(
        income in 1_000u32..50_000,
        extra in 0u32..50_000,
        debt in 0u32..10_000,
        payment in 0u32..20_000,
    ) {
        let debt = Decimal::from(debt);
        let payment = Decimal::from(payment);
        let lo_income = dti(Decimal::from(income), debt, payment).unwrap();
        let hi_income = dti(Decimal::from(income + extra), debt, payment).unwrap();
        prop_assert!(hi_income <= lo_income);
    }

    #[test]
    fn prop_ltv_non_increasing_in_value(
        value in 50_000u32..2_000_000,
        extra in 0u32..1_000_000,
        loan in 0u32..2_000_000,
    ) {
        let loan = Decimal::from(loan);
        let lo_value = ltv(loan, Decimal::from(value)).unwrap();
        let hi_value = ltv(loan, Decimal::from(value + extra)).unwrap();
        prop_assert!(hi_value <= lo_value);
    }

    #[test]
    fn prop_score_within_bounds(
        principal in 10_000u32..1_500_000,
        rate_bp in 0u32..1_200,
        term in 5u32..41,
        value in 50_000u32..2_000_000,
        income in 500u32..40_000,
        debt in 0u32..8_000,
        credit in proptest::option::of(300u32..851),
    ) {
        let loan = LoanParameters::new(Decimal::from(principal), rate_from_bp(rate_bp), term);
        let borrower = BorrowerProfile {
            monthly_income: Decimal::from(income),
            monthly_debt: Decimal::from(debt),
            assets: Decimal::ZERO,
            credit_score: credit,
        };
        let a = score(&loan, Decimal::from(value), &borrower, &EngineConfig::default()).unwrap();
        prop_assert!(a.score >= Decimal::ZERO && a.score <= dec!(100));
    }

    #[test]
    fn prop_score_non_decreasing_in_debt(
        principal in 50_000u32..800_000,
        rate_bp in 250u32..800,
        income in 2_000u32..30_000,
        debt in 0u32..5_000,
        extra in 0u32..5_000,
    ) {
        let loan = LoanParameters::new(Decimal::from(principal), rate_from_bp(rate_bp), 30);
        let cfg = EngineConfig::default();
        let value = dec!(1_000_000);
        let mk = |d: u32| BorrowerProfile {
            monthly_income: Decimal::from(income),
            monthly_debt: Decimal::from(d),
            assets: Decimal::ZERO,
            credit_score: Some(700),
        };
        let lo = score(&loan, value, &mk(debt), &cfg).unwrap();
        let hi = score(&loan, value, &mk(debt + extra), &cfg).unwrap();
        prop_assert!(hi.score >= lo.score);
    }

    #[test]
    fn prop_schedule_pays_off_principal(
        principal in 1_000u32..1_000_000,
        rate_bp in 0u32..1_500,
        term in 1u32..31,
    ) {
        let principal = Decimal::from(principal);
        let rate = rate_from_bp(rate_bp);
        let rows = schedule(principal, rate, term).unwrap();
        prop_assert_eq!(rows.len() as u32, term * 12);

        let last = rows.last().unwrap();
        prop_assert!(last.remaining_balance < dec!(0.01));

        let principal_paid: Decimal = rows.iter().map(|r| r.principal_component).sum();
        let rel = ((principal_paid - principal) / principal).abs();
        prop_assert!(rel <= dec!(0.000001), "relative error {}", rel);

        let payment = monthly_payment(principal, rate, term).unwrap();
        prop_assert!(rows
            .iter()
            .all(|r| (r.principal_component + r.interest_component - payment).abs() < dec!(0.0000001)));
        prop_assert!(rows.windows(2).all(|w| w[1].remaining_balance <= w[0].remaining_balance));
    }
}
