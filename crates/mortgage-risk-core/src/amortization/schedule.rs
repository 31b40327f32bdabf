//! Full amortisation schedule with an annual roll-up.

use log::debug;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use super::payment::{monthly_payment, monthly_rate, payment_count};
use crate::config::EngineConfig;
use crate::error::MortgageRiskError;
use crate::types::{with_metadata, ComputationOutput, LoanParameters, Money, Percent};
use crate::MortgageRiskResult;

/// One monthly row of an amortisation schedule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaymentRecord {
    /// 1-based payment number
    pub period: u32,
    pub payment: Money,
    pub principal_component: Money,
    pub interest_component: Money,
    /// Balance after this payment, never below zero
    pub remaining_balance: Money,
}

/// Totals for one loan year (12 payments).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct YearlySummary {
    pub year: u32,
    pub principal_paid: Money,
    pub interest_paid: Money,
    pub closing_balance: Money,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AmortizationInput {
    pub loan: LoanParameters,
    /// Omit the monthly rows and keep only the annual roll-up
    #[serde(default)]
    pub summary_only: bool,
    #[serde(default)]
    pub config: EngineConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AmortizationOutput {
    pub monthly_payment: Money,
    pub num_payments: u32,
    pub total_paid: Money,
    pub total_interest: Money,
    /// Share of every payment that goes to interest over the life of the loan
    pub interest_share_pct: Percent,
    pub yearly: Vec<YearlySummary>,
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub schedule: Vec<PaymentRecord>,
}

/// Period-by-period schedule for a level-payment loan.
///
/// Produces exactly `term_years * 12` records. Arithmetic drift that would
/// leave the final balance fractionally negative is floored at zero.
pub fn schedule(
    principal: Money,
    annual_rate_pct: Percent,
    term_years: u32,
) -> MortgageRiskResult<Vec<PaymentRecord>> {
    let payment = monthly_payment(principal, annual_rate_pct, term_years)?;
    let r = monthly_rate(annual_rate_pct);
    let n = payment_count(term_years)?;

    let mut balance = principal;
    let mut records = Vec::with_capacity(n as usize);
    for period in 1..=n {
        let interest = balance * r;
        let principal_component = payment - interest;
        balance -= principal_component;

        records.push(PaymentRecord {
            period,
            payment,
            principal_component,
            interest_component: interest,
            remaining_balance: balance.max(Decimal::ZERO),
        });
    }

    Ok(records)
}

/// Roll monthly rows up into loan years.
pub fn yearly_summary(records: &[PaymentRecord]) -> Vec<YearlySummary> {
    records
        .chunks(12)
        .enumerate()
        .map(|(i, year)| YearlySummary {
            year: i as u32 + 1,
            principal_paid: year.iter().map(|r| r.principal_component).sum(),
            interest_paid: year.iter().map(|r| r.interest_component).sum(),
            closing_balance: year
                .last()
                .map(|r| r.remaining_balance)
                .unwrap_or(Decimal::ZERO),
        })
        .collect()
}

pub fn analyze_amortization(
    input: &AmortizationInput,
) -> MortgageRiskResult<ComputationOutput<AmortizationOutput>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();
    debug!(
        "amortizing {} at {}% over {} years",
        input.loan.principal, input.loan.annual_rate, input.loan.term_years
    );

    if input.loan.term_years > input.config.max_term_years {
        return Err(MortgageRiskError::InvalidInput {
            field: "term_years".into(),
            reason: format!(
                "Term exceeds the maximum of {} years",
                input.config.max_term_years
            ),
        });
    }

    let records = schedule(
        input.loan.principal,
        input.loan.annual_rate,
        input.loan.term_years,
    )?;
    let payment = records[0].payment;
    let num_payments = input.loan.num_payments();
    let total_paid = payment * Decimal::from(num_payments);
    let total_interest: Money = records.iter().map(|r| r.interest_component).sum();

    if total_interest > input.loan.principal {
        warnings.push(format!(
            "Total interest {} exceeds the amount borrowed",
            total_interest.round_dp(2)
        ));
    }

    let output = AmortizationOutput {
        monthly_payment: payment,
        num_payments,
        total_paid,
        total_interest,
        interest_share_pct: total_interest / total_paid * Decimal::ONE_HUNDRED,
        yearly: yearly_summary(&records),
        schedule: if input.summary_only {
            Vec::new()
        } else {
            records
        },
    };

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Fixed-Rate Level-Payment Amortisation",
        &input.loan,
        warnings,
        elapsed,
        output,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    const TOL: Decimal = dec!(0.01);

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

    fn reference_schedule() -> Vec<PaymentRecord> {
        schedule(dec!(360_000), dec!(4.5), 30).unwrap()
    }

    #[test]
    fn test_record_count_matches_term() {
        assert_eq!(reference_schedule().len(), 360);
        assert_eq!(schedule(dec!(50_000), dec!(3), 7).unwrap().len(), 84);
    }

    #[test]
    fn test_first_period_split() {
        let first = &reference_schedule()[0];
        assert_eq!(first.period, 1);
        assert_eq!(first.interest_component, dec!(1350));
        assert_close(first.principal_component, dec!(474.07), TOL, "first principal");
    }

    #[test]
    fn test_components_sum_to_payment() {
        for rec in reference_schedule() {
            assert_close(
                rec.principal_component + rec.interest_component,
                rec.payment,
                dec!(0.0000001),
                "component sum",
            );
        }
    }

    #[test]
    fn test_balance_non_increasing_and_ends_at_zero() {
        let rows = reference_schedule();
        for pair in rows.windows(2) {
            assert!(pair[1].remaining_balance <= pair[0].remaining_balance);
        }
        let last = rows.last().unwrap();
        assert_close(last.remaining_balance, Decimal::ZERO, TOL, "final balance");
        assert!(last.remaining_balance >= Decimal::ZERO);
    }

    #[test]
    fn test_principal_components_repay_principal() {
        let rows = reference_schedule();
        let repaid: Decimal = rows.iter().map(|r| r.principal_component).sum();
        let relative = ((repaid - dec!(360_000)) / dec!(360_000)).abs();
        assert!(relative < dec!(0.000001), "relative error {relative}");
    }

    #[test]
    fn test_zero_rate_schedule_has_no_interest() {
        let rows = schedule(dec!(12_000), Decimal::ZERO, 1).unwrap();
        assert_eq!(rows.len(), 12);
        assert!(rows.iter().all(|r| r.interest_component.is_zero()));
        assert_eq!(rows[11].remaining_balance, Decimal::ZERO);
    }

    #[test]
    fn test_yearly_summary_rolls_up_twelve_months() {
        let rows = reference_schedule();
        let years = yearly_summary(&rows);
        assert_eq!(years.len(), 30);
        let first_year_interest: Decimal =
            rows[..12].iter().map(|r| r.interest_component).sum();
        assert_eq!(years[0].interest_paid, first_year_interest);
        assert_eq!(years[0].closing_balance, rows[11].remaining_balance);
    }

    #[test]
    fn test_analyze_amortization_envelope() {
        let input = AmortizationInput {
            loan: LoanParameters::new(dec!(360_000), dec!(4.5), 30),
            summary_only: true,
            config: EngineConfig::default(),
        };
        let out = analyze_amortization(&input).unwrap();
        assert!(out.result.schedule.is_empty());
        assert_eq!(out.result.yearly.len(), 30);
        assert_close(out.result.total_interest, dec!(296_664.16), dec!(0.05), "interest");
        // interest is ~82% of principal, below the warning threshold
        assert!(out.warnings.is_empty());
    }

    #[test]
    fn test_analyze_rejects_term_above_cap() {
        let input = AmortizationInput {
            loan: LoanParameters::new(dec!(100_000), dec!(4), 60),
            summary_only: false,
            config: EngineConfig::default(),
        };
        assert!(matches!(
            analyze_amortization(&input),
            Err(MortgageRiskError::InvalidInput { .. })
        ));
    }

    #[test]
    fn test_schedule_rejects_term_beyond_limit() {
        assert!(matches!(
            schedule(dec!(100_000), dec!(4), 80_000_000),
            Err(MortgageRiskError::InvalidInput { .. })
        ));
    }
}
