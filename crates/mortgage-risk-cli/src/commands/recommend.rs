use clap::Args;

use mortgage_risk_core::recommendation::{recommend_structure, RecommendationInput};
use mortgage_risk_core::EngineConfig;

use super::{resolve_config, CommandResult};
use crate::input;

/// Arguments for the loan-structure recommender
#[derive(Args)]
pub struct RecommendArgs {
    /// Path to JSON input file with borrower, loan, property and preferences
    #[arg(long)]
    pub input: Option<String>,
}

pub fn run_recommend(args: RecommendArgs, config: Option<&EngineConfig>) -> CommandResult {
    let mut request: RecommendationInput = input::load(args.input.as_deref())?
        .ok_or("--input file (or piped JSON) is required for recommendations")?;
    request.config = resolve_config(request.config, config);

    let result = recommend_structure(&request)?;
    Ok(serde_json::to_value(result)?)
}
