use clap::Args;
use rust_decimal::Decimal;
use serde_json::json;

use mortgage_risk_core::amortization::{compare_payment, loan_payment, total_interest};
use mortgage_risk_core::LoanParameters;

use super::{CommandResult, LoanArgs};

/// Arguments for the monthly payment calculator
#[derive(Args)]
pub struct PaymentArgs {
    #[command(flatten)]
    pub loan: LoanArgs,

    /// What-if rate to compare against
    #[arg(long)]
    pub compare_rate: Option<Decimal>,

    /// What-if term to compare against
    #[arg(long)]
    pub compare_years: Option<u32>,
}

pub fn run_payment(args: PaymentArgs) -> CommandResult {
    let loan = args.loan.to_loan()?;

    if args.compare_rate.is_none() && args.compare_years.is_none() {
        let payment = loan_payment(&loan)?;
        return Ok(json!({
            "result": {
                "monthly_payment": payment.round_dp(2),
                "num_payments": loan.num_payments(),
                "total_interest": total_interest(&loan)?.round_dp(2),
            }
        }));
    }

    let alternative = LoanParameters::new(
        loan.principal,
        args.compare_rate.unwrap_or(loan.annual_rate),
        args.compare_years.unwrap_or(loan.term_years),
    );
    let cmp = compare_payment(&loan, &alternative)?;
    Ok(json!({ "result": cmp }))
}
