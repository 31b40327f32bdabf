use clap::Args;

use mortgage_risk_core::amortization::{analyze_amortization, AmortizationInput};
use mortgage_risk_core::EngineConfig;

use super::{resolve_config, CommandResult, LoanArgs};
use crate::input;

/// Arguments for the amortisation schedule
#[derive(Args)]
pub struct AmortizationArgs {
    /// Path to JSON input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,

    #[command(flatten)]
    pub loan: LoanArgs,

    /// Only print the annual roll-up
    #[arg(long)]
    pub summary_only: bool,
}

pub fn run_amortization(args: AmortizationArgs, config: Option<&EngineConfig>) -> CommandResult {
    let mut request: AmortizationInput = match input::load(args.input.as_deref())? {
        Some(req) => req,
        None => AmortizationInput {
            loan: args.loan.to_loan()?,
            summary_only: args.summary_only,
            config: EngineConfig::default(),
        },
    };
    request.summary_only |= args.summary_only;
    request.config = resolve_config(request.config, config);

    let result = analyze_amortization(&request)?;
    Ok(serde_json::to_value(result)?)
}
