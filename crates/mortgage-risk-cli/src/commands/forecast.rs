use chrono::{Datelike, Local, NaiveDate};
use clap::Args;

use mortgage_risk_core::forecast::market::{DEFAULT_FORECAST_MONTHS, DEFAULT_HISTORY_MONTHS};
use mortgage_risk_core::forecast::neighborhood::DEFAULT_PROJECTION_YEARS;
use mortgage_risk_core::forecast::{
    analyze_market_trends, analyze_neighborhood, MarketTrendsInput, NeighborhoodInput,
};

use super::CommandResult;

/// Arguments for the synthetic market history and rate forecast
#[derive(Args)]
pub struct MarketTrendsArgs {
    /// Last month of history (YYYY-MM-DD); defaults to today
    #[arg(long)]
    pub end_date: Option<NaiveDate>,

    /// Months of history
    #[arg(long, default_value_t = DEFAULT_HISTORY_MONTHS)]
    pub months: usize,

    /// Months to forecast
    #[arg(long, default_value_t = DEFAULT_FORECAST_MONTHS)]
    pub horizon: usize,

    /// Seed for reproducible output
    #[arg(long)]
    pub seed: Option<u64>,
}

/// Arguments for the neighborhood indicators
#[derive(Args)]
pub struct NeighborhoodArgs {
    /// Postal code or area name
    #[arg(long, alias = "zipcode")]
    pub area: String,

    /// Property value to project
    #[arg(long)]
    pub value: f64,

    /// Last year of data; defaults to the current year
    #[arg(long)]
    pub end_year: Option<i32>,

    /// Years to project forward
    #[arg(long, default_value_t = DEFAULT_PROJECTION_YEARS)]
    pub years: u32,
}

pub fn run_market_trends(args: MarketTrendsArgs) -> CommandResult {
    let input = MarketTrendsInput {
        end_date: args.end_date.unwrap_or_else(|| Local::now().date_naive()),
        history_months: args.months,
        forecast_months: args.horizon,
        seed: args.seed,
    };
    let result = analyze_market_trends(&input)?;
    Ok(serde_json::to_value(result)?)
}

pub fn run_neighborhood(args: NeighborhoodArgs) -> CommandResult {
    let input = NeighborhoodInput {
        identifier: args.area,
        end_year: args.end_year.unwrap_or_else(|| Local::now().year()),
        property_value: args.value,
        projection_years: args.years,
    };
    let result = analyze_neighborhood(&input)?;
    Ok(serde_json::to_value(result)?)
}
