//! Synthetic market and neighborhood data.
//!
//! Everything here samples from normal distributions, so it works in `f64`
//! rather than `Decimal` and reports `ieee754_f64` precision. Generators take
//! any `Rng`; the envelope functions own the seeding.

pub mod market;
pub mod neighborhood;

use serde::Serialize;
use statrs::distribution::Normal;

use crate::error::MortgageRiskError;
use crate::types::{ComputationMetadata, ComputationOutput};
use crate::MortgageRiskResult;

pub use market::{
    analyze_market_trends, forecast_rates, generate_market_history, summarize_market,
    ForecastPoint, MarketPoint, MarketSummary, MarketTrendsInput, MarketTrendsOutput,
    RateForecast, RateTrend,
};
pub use neighborhood::{
    analyze_neighborhood, generate_neighborhood, neighborhood_insights, project_property_value,
    seed_from, MarketRisk, MarketTemperature, NeighborhoodInput, NeighborhoodInsights,
    NeighborhoodOutput, NeighborhoodYear, ValueProjection,
};

fn with_metadata_f64<T: Serialize>(
    methodology: &str,
    assumptions: &impl Serialize,
    warnings: Vec<String>,
    elapsed_us: u64,
    result: T,
) -> ComputationOutput<T> {
    ComputationOutput {
        result,
        methodology: methodology.to_string(),
        assumptions: serde_json::to_value(assumptions).unwrap_or_default(),
        warnings,
        metadata: ComputationMetadata {
            version: env!("CARGO_PKG_VERSION").to_string(),
            computation_time_us: elapsed_us,
            precision: "ieee754_f64".to_string(),
        },
    }
}

/// `n` evenly spaced values from `start` to `end` inclusive.
fn linspace(start: f64, end: f64, n: usize) -> Vec<f64> {
    match n {
        0 => Vec::new(),
        1 => vec![start],
        _ => {
            let step = (end - start) / (n - 1) as f64;
            (0..n).map(|i| start + step * i as f64).collect()
        }
    }
}

fn normal(mean: f64, std_dev: f64) -> MortgageRiskResult<Normal> {
    Normal::new(mean, std_dev).map_err(|e| MortgageRiskError::InvalidInput {
        field: "distribution".into(),
        reason: format!("Invalid normal({mean}, {std_dev}): {e}"),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_linspace_endpoints() {
        let v = linspace(100.0, 120.0, 60);
        assert_eq!(v.len(), 60);
        assert_eq!(v[0], 100.0);
        assert!((v[59] - 120.0).abs() < 1e-9);
        assert_eq!(linspace(1.0, 2.0, 1), vec![1.0]);
        assert!(linspace(1.0, 2.0, 0).is_empty());
    }

    #[test]
    fn test_normal_rejects_negative_sd() {
        assert!(normal(0.0, -1.0).is_err());
    }
}
