use clap::Args;
use rust_decimal::Decimal;

use mortgage_risk_core::affordability::{analyze_affordability, AffordabilityInput};
use mortgage_risk_core::{EngineConfig, PropertyProfile};

use super::{resolve_config, BorrowerArgs, CommandResult, LoanArgs};
use crate::input;

/// Arguments for the affordability analysis
#[derive(Args)]
pub struct AffordabilityArgs {
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

    /// Monthly maintenance or association fee
    #[arg(long)]
    pub maintenance_fee: Option<Decimal>,
}

pub fn run_affordability(args: AffordabilityArgs, config: Option<&EngineConfig>) -> CommandResult {
    let mut request: AffordabilityInput = match input::load(args.input.as_deref())? {
        Some(req) => req,
        None => AffordabilityInput {
            loan: args.loan.to_loan()?,
            borrower: args.borrower.to_borrower()?,
            property: PropertyProfile {
                maintenance_fee: args.maintenance_fee.unwrap_or(Decimal::ZERO),
                ..PropertyProfile::with_value(
                    args.value.ok_or("--value is required (or provide --input)")?,
                )
            },
            config: EngineConfig::default(),
        },
    };
    request.config = resolve_config(request.config, config);

    let result = analyze_affordability(&request)?;
    Ok(serde_json::to_value(result)?)
}
