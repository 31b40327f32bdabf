use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::error::MortgageRiskError;
use crate::types::{LoanParameters, Money, Percent};
use crate::MortgageRiskResult;

/// Longest term any entry point accepts. Keeps schedules at 600 rows or fewer.
pub const MAX_TERM_YEARS: u32 = 50;

pub(crate) fn validate_terms(
    principal: Money,
    annual_rate_pct: Percent,
    term_years: u32,
) -> MortgageRiskResult<()> {
    if principal <= Decimal::ZERO {
        return Err(MortgageRiskError::InvalidInput {
            field: "principal".into(),
            reason: "Principal must be positive".into(),
        });
    }
    if annual_rate_pct < Decimal::ZERO {
        return Err(MortgageRiskError::InvalidInput {
            field: "annual_rate".into(),
            reason: "Interest rate cannot be negative".into(),
        });
    }
    if term_years == 0 {
        return Err(MortgageRiskError::InvalidInput {
            field: "term_years".into(),
            reason: "Term must be at least one year".into(),
        });
    }
    if term_years > MAX_TERM_YEARS {
        return Err(MortgageRiskError::InvalidInput {
            field: "term_years".into(),
            reason: format!("Term of {term_years} years exceeds the {MAX_TERM_YEARS}-year limit"),
        });
    }
    Ok(())
}

/// Number of monthly payments for a term already checked by [`validate_terms`].
pub(crate) fn payment_count(term_years: u32) -> MortgageRiskResult<u32> {
    term_years
        .checked_mul(12)
        .ok_or_else(|| MortgageRiskError::InvalidInput {
            field: "term_years".into(),
            reason: format!("Term of {term_years} years overflows the payment count"),
        })
}

/// Monthly rate as a fraction, from an annual percentage.
pub(crate) fn monthly_rate(annual_rate_pct: Percent) -> Decimal {
    annual_rate_pct / dec!(100) / dec!(12)
}

/// (1 + r)^n by repeated multiplication, failing instead of panicking when
/// the factor leaves Decimal range.
fn growth_factor(monthly_rate: Decimal, periods: u32) -> MortgageRiskResult<Decimal> {
    let base = Decimal::ONE + monthly_rate;
    let mut result = Decimal::ONE;
    for _ in 0..periods {
        result = result.checked_mul(base).ok_or_else(|| {
            MortgageRiskError::FinancialImpossibility(format!(
                "Annuity factor overflows at a monthly rate of {monthly_rate} over {periods} periods"
            ))
        })?;
    }
    Ok(result)
}

/// Level monthly payment of a fixed-rate loan.
///
/// `payment = P * r * (1+r)^n / ((1+r)^n - 1)` with `r` the monthly rate and
/// `n` the number of monthly payments. A zero rate repays the principal in
/// equal instalments.
pub fn monthly_payment(
    principal: Money,
    annual_rate_pct: Percent,
    term_years: u32,
) -> MortgageRiskResult<Money> {
    validate_terms(principal, annual_rate_pct, term_years)?;

    let n = payment_count(term_years)?;
    if annual_rate_pct.is_zero() {
        return Ok(principal / Decimal::from(n));
    }

    let r = monthly_rate(annual_rate_pct);
    let factor = growth_factor(r, n)?;
    let denominator = factor - Decimal::ONE;
    if denominator.is_zero() {
        return Err(MortgageRiskError::DivisionByZero {
            context: "annuity factor".into(),
        });
    }

    principal
        .checked_mul(r)
        .and_then(|v| v.checked_mul(factor))
        .map(|v| v / denominator)
        .ok_or_else(|| {
            MortgageRiskError::FinancialImpossibility(
                "Monthly payment exceeds representable range".into(),
            )
        })
}

/// Payment for a [`LoanParameters`] value.
pub fn loan_payment(loan: &LoanParameters) -> MortgageRiskResult<Money> {
    monthly_payment(loan.principal, loan.annual_rate, loan.term_years)
}

/// Total interest paid over the full term at the level payment.
pub fn total_interest(loan: &LoanParameters) -> MortgageRiskResult<Money> {
    let payment = loan_payment(loan)?;
    Ok(payment * Decimal::from(loan.num_payments()) - loan.principal)
}

/// What-if comparison between the current loan and an alternative.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentComparison {
    pub base_payment: Money,
    pub alternative_payment: Money,
    /// alternative - base; positive means the alternative costs more
    pub difference: Money,
    pub difference_pct: Percent,
    pub base_total_interest: Money,
    pub alternative_total_interest: Money,
}

pub fn compare_payment(
    base: &LoanParameters,
    alternative: &LoanParameters,
) -> MortgageRiskResult<PaymentComparison> {
    let base_payment = loan_payment(base)?;
    let alternative_payment = loan_payment(alternative)?;
    let difference = alternative_payment - base_payment;

    Ok(PaymentComparison {
        base_payment,
        alternative_payment,
        difference,
        difference_pct: difference / base_payment * dec!(100),
        base_total_interest: base_payment * Decimal::from(base.num_payments()) - base.principal,
        alternative_total_interest: alternative_payment
            * Decimal::from(alternative.num_payments())
            - alternative.principal,
    })
}
