use log::debug;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use std::time::Instant;

use super::{linspace, normal, with_metadata_f64};
use crate::error::MortgageRiskError;
use crate::types::ComputationOutput;
use crate::MortgageRiskResult;

const HISTORY_YEARS: i32 = 6;
const SEED_MODULUS: u64 = 100;
pub const DEFAULT_PROJECTION_YEARS: u32 = 10;

const FNV_OFFSET: u64 = 0xcbf2_9ce4_8422_2325;
const FNV_PRIME: u64 = 0x0000_0100_0000_01b3;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NeighborhoodYear {
    pub year: i32,
    /// Annual appreciation in percent
    pub appreciation_pct: f64,
    pub median_sale_price: f64,
    pub days_on_market: f64,
    pub sales_volume: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MarketTemperature {
    Hot,
    Cooling,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MarketRisk {
    Low,
    Medium,
    High,
}

/// Summary statistics and market strength read off the yearly rows.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NeighborhoodInsights {
    pub average_median_price: f64,
    pub average_appreciation_pct: f64,
    pub latest_appreciation_pct: f64,
    /// Property value as a percent of the average median sale price
    pub price_vs_average_pct: Option<f64>,
    pub temperature: MarketTemperature,
    pub sales_rising: bool,
    pub market_risk: MarketRisk,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValueProjection {
    pub year_offset: u32,
    pub pessimistic: f64,
    pub expected: f64,
    pub optimistic: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NeighborhoodInput {
    /// Postal code or any other area identifier
    pub identifier: String,
    pub end_year: i32,
    pub property_value: f64,
    #[serde(default = "default_projection_years")]
    pub projection_years: u32,
}

fn default_projection_years() -> u32 {
    DEFAULT_PROJECTION_YEARS
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NeighborhoodOutput {
    pub seed: u64,
    pub years: Vec<NeighborhoodYear>,
    pub insights: NeighborhoodInsights,
    pub projection: Vec<ValueProjection>,
}

/// Deterministic seed for an area identifier.
///
/// Numeric identifiers map to `value % 100`; anything else is hashed with
/// 64-bit FNV-1a first. The same identifier always yields the same data.
pub fn seed_from(identifier: &str) -> u64 {
    let trimmed = identifier.trim();
    if let Ok(n) = trimmed.parse::<u64>() {
        return n % SEED_MODULUS;
    }
    let hash = trimmed.bytes().fold(FNV_OFFSET, |h, b| {
        (h ^ u64::from(b)).wrapping_mul(FNV_PRIME)
    });
    hash % SEED_MODULUS
}

/// Six yearly rows ending at `end_year`.
pub fn generate_neighborhood<R: Rng + ?Sized>(
    rng: &mut R,
    end_year: i32,
) -> MortgageRiskResult<Vec<NeighborhoodYear>> {
    let n = HISTORY_YEARS as usize;
    let appreciation = normal(3.5, 2.0)?;
    let price_noise = normal(0.0, 0.05)?;
    let dom = normal(45.0, 15.0)?;
    let volume = normal(120.0, 30.0)?;

    let appreciation_draws: Vec<f64> = (0..n)
        .map(|_| rng.sample(appreciation).clamp(-2.0, 8.0))
        .collect();
    let base_prices = linspace(250_000.0, 320_000.0, n);
    let prices: Vec<f64> = base_prices
        .iter()
        .map(|p| p * (1.0 + rng.sample(price_noise)))
        .collect();
    let dom_draws: Vec<f64> = (0..n).map(|_| rng.sample(dom).clamp(10.0, 90.0)).collect();
    let volume_draws: Vec<f64> = (0..n)
        .map(|_| rng.sample(volume).clamp(50.0, 200.0))
        .collect();

    Ok((0..n)
        .map(|i| NeighborhoodYear {
            year: end_year - (HISTORY_YEARS - 1) + i as i32,
            appreciation_pct: appreciation_draws[i],
            median_sale_price: prices[i],
            days_on_market: dom_draws[i],
            sales_volume: volume_draws[i],
        })
        .collect())
}

pub fn neighborhood_insights(
    years: &[NeighborhoodYear],
    property_value: f64,
) -> MortgageRiskResult<NeighborhoodInsights> {
    let (latest, previous) = match years {
        [.., prev, last] => (last, prev),
        _ => {
            return Err(MortgageRiskError::InvalidInput {
                field: "years".into(),
                reason: "At least two years of neighborhood data are required".into(),
            })
        }
    };
    let n = years.len() as f64;
    let average_median_price = years.iter().map(|y| y.median_sale_price).sum::<f64>() / n;
    let average_appreciation_pct = years.iter().map(|y| y.appreciation_pct).sum::<f64>() / n;
    let average_dom = years.iter().map(|y| y.days_on_market).sum::<f64>() / n;

    let hot = latest.days_on_market < average_dom;
    let market_risk = if latest.appreciation_pct > 2.0 && hot {
        MarketRisk::Low
    } else if latest.appreciation_pct > 0.0 {
        MarketRisk::Medium
    } else {
        MarketRisk::High
    };

    Ok(NeighborhoodInsights {
        average_median_price,
        average_appreciation_pct,
        latest_appreciation_pct: latest.appreciation_pct,
        price_vs_average_pct: (average_median_price > 0.0)
            .then(|| property_value / average_median_price * 100.0),
        temperature: if hot {
            MarketTemperature::Hot
        } else {
            MarketTemperature::Cooling
        },
        sales_rising: latest.sales_volume > previous.sales_volume,
        market_risk,
    })
}

/// Compound value paths at `a - 2` (floored at 0), `a` and `a + 1` percent.
/// Includes year 0.
pub fn project_property_value(
    value: f64,
    latest_appreciation_pct: f64,
    years: u32,
) -> Vec<ValueProjection> {
    let pessimistic = 1.0 + (latest_appreciation_pct - 2.0).max(0.0) / 100.0;
    let expected = 1.0 + latest_appreciation_pct / 100.0;
    let optimistic = 1.0 + (latest_appreciation_pct + 1.0) / 100.0;

    (0..=years)
        .map(|t| {
            let t_i = t as i32;
            ValueProjection {
                year_offset: t,
                pessimistic: value * pessimistic.powi(t_i),
                expected: value * expected.powi(t_i),
                optimistic: value * optimistic.powi(t_i),
            }
        })
        .collect()
}

pub fn analyze_neighborhood(
    input: &NeighborhoodInput,
) -> MortgageRiskResult<ComputationOutput<NeighborhoodOutput>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    if input.identifier.trim().is_empty() {
        return Err(MortgageRiskError::InvalidInput {
            field: "identifier".into(),
            reason: "Area identifier cannot be empty".into(),
        });
    }
    if input.property_value.is_nan() || input.property_value <= 0.0 {
        return Err(MortgageRiskError::InvalidInput {
            field: "property_value".into(),
            reason: "Property value must be positive".into(),
        });
    }

    let seed = seed_from(&input.identifier);
    let mut rng = StdRng::seed_from_u64(seed);
    let years = generate_neighborhood(&mut rng, input.end_year)?;
    let insights = neighborhood_insights(&years, input.property_value)?;
    let projection = project_property_value(
        input.property_value,
        insights.latest_appreciation_pct,
        input.projection_years,
    );
    debug!(
        "neighborhood '{}' seeded with {}, latest appreciation {:.2}%",
        input.identifier, seed, insights.latest_appreciation_pct
    );

    if insights.market_risk == MarketRisk::High {
        warnings.push("Property values declined over the latest year".into());
    }

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata_f64(
        "Synthetic Neighborhood Indicators with Compound Value Projection",
        input,
        warnings,
        elapsed,
        NeighborhoodOutput {
            seed,
            years,
            insights,
            projection,
        },
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_numeric_identifier_seed() {
        assert_eq!(seed_from("90210"), 10);
        assert_eq!(seed_from(" 1017 "), 17);
        assert_eq!(seed_from("42"), 42);
    }

    #[test]
    fn test_text_identifier_seed_is_stable() {
        let a = seed_from("SW1A 1AA");
        assert_eq!(a, seed_from("SW1A 1AA"));
        assert!(a < 100);
    }

    #[test]
    fn test_fnv_hash_of_empty_input() {
        // FNV-1a offset basis mod 100
        assert_eq!(seed_from(""), 14_695_981_039_346_656_037 % 100);
    }

    #[test]
    fn test_neighborhood_rows() {
        let mut rng = StdRng::seed_from_u64(seed_from("90210"));
        let rows = generate_neighborhood(&mut rng, 2024).unwrap();
        assert_eq!(rows.len(), 6);
        assert_eq!(rows[0].year, 2019);
        assert_eq!(rows[5].year, 2024);
        for r in &rows {
            assert!((-2.0..=8.0).contains(&r.appreciation_pct));
            assert!((10.0..=90.0).contains(&r.days_on_market));
            assert!((50.0..=200.0).contains(&r.sales_volume));
            assert!(r.median_sale_price > 0.0);
        }
    }

    #[test]
    fn test_same_identifier_same_data() {
        let input = NeighborhoodInput {
            identifier: "90210".into(),
            end_year: 2024,
            property_value: 450_000.0,
            projection_years: 10,
        };
        let a = analyze_neighborhood(&input).unwrap().result;
        let b = analyze_neighborhood(&input).unwrap().result;
        assert!(a
            .years
            .iter()
            .zip(&b.years)
            .all(|(x, y)| x.median_sale_price == y.median_sale_price));
        assert_eq!(a.projection.len(), 11);
    }

    #[test]
    fn test_projection_paths() {
        let p = project_property_value(100_000.0, 3.0, 2);
        assert_eq!(p.len(), 3);
        assert_eq!(p[0].expected, 100_000.0);
        assert!((p[1].pessimistic - 101_000.0).abs() < 1e-6);
        assert!((p[1].expected - 103_000.0).abs() < 1e-6);
        assert!((p[2].optimistic - 100_000.0 * 1.04 * 1.04).abs() < 1e-6);
    }

    #[test]
    fn test_pessimistic_growth_floored_at_zero() {
        let p = project_property_value(200_000.0, 1.0, 5);
        assert!(p.iter().all(|row| row.pessimistic == 200_000.0));
        assert!(p[5].expected > p[5].pessimistic);
    }

    #[test]
    fn test_insights_market_risk() {
        let mk = |appr: f64, dom: f64, vol: f64| NeighborhoodYear {
            year: 2024,
            appreciation_pct: appr,
            median_sale_price: 300_000.0,
            days_on_market: dom,
            sales_volume: vol,
        };
        let hot = vec![mk(3.0, 50.0, 100.0), mk(4.0, 30.0, 120.0)];
        let i = neighborhood_insights(&hot, 300_000.0).unwrap();
        assert_eq!(i.market_risk, MarketRisk::Low);
        assert_eq!(i.temperature, MarketTemperature::Hot);
        assert!(i.sales_rising);
        assert_eq!(i.price_vs_average_pct, Some(100.0));

        let falling = vec![mk(3.0, 30.0, 120.0), mk(-1.0, 50.0, 100.0)];
        let i = neighborhood_insights(&falling, 300_000.0).unwrap();
        assert_eq!(i.market_risk, MarketRisk::High);
        assert_eq!(i.temperature, MarketTemperature::Cooling);
    }
}
