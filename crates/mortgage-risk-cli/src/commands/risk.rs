use clap::Args;
use rust_decimal::Decimal;

use mortgage_risk_core::risk::{assess_risk, RiskInput};
use mortgage_risk_core::EngineConfig;

use super::{resolve_config, BorrowerArgs, CommandResult, LoanArgs};
use crate::input;

/// Arguments for the composite risk score
#[derive(Args)]
pub struct RiskArgs {
    /// Path to JSON input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,

    #[command(flatten)]
    pub loan: LoanArgs,

    #[command(flatten)]
    pub borrower: BorrowerArgs,

    /// Property value
    #[arg(long)]
    pub value: Option<Decimal>,
}

pub fn run_risk(args: RiskArgs, config: Option<&EngineConfig>) -> CommandResult {
    let mut request: RiskInput = match input::load(args.input.as_deref())? {
        Some(req) => req,
        None => RiskInput {
            loan: args.loan.to_loan()?,
            borrower: args.borrower.to_borrower()?,
            property_value: args.value.ok_or("--value is required (or provide --input)")?,
            config: EngineConfig::default(),
        },
    };
    request.config = resolve_config(request.config, config);

    let result = assess_risk(&request)?;
    Ok(serde_json::to_value(result)?)
}
