use chrono::{Months, NaiveDate};
use log::debug;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use statrs::distribution::Normal;
use std::time::Instant;

use super::{linspace, normal, with_metadata_f64};
use crate::error::MortgageRiskError;
use crate::types::ComputationOutput;
use crate::MortgageRiskResult;

pub const DEFAULT_HISTORY_MONTHS: usize = 60;
pub const DEFAULT_FORECAST_MONTHS: usize = 12;

/// Lowest rate the Falling path can reach.
const FALLING_RATE_FLOOR: f64 = 2.5;
const RISING_STEP: f64 = 0.125;
const FALLING_STEP: f64 = 0.1;
/// Index offset of the point six months before the latest one.
const SIX_MONTHS_BACK: usize = 7;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MarketPoint {
    pub date: NaiveDate,
    pub housing_index: f64,
    /// Average mortgage rate in percent
    pub mortgage_rate: f64,
    /// Inflation in percent
    pub inflation: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RateTrend {
    Rising,
    Steady,
    Falling,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RateForecast {
    pub trend: RateTrend,
    pub points: Vec<ForecastPoint>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ForecastPoint {
    pub date: NaiveDate,
    pub rate: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MarketSummary {
    pub latest_housing_index: f64,
    pub latest_rate: f64,
    pub latest_inflation: f64,
    /// Housing index change over six months, percent
    pub housing_change_6m_pct: f64,
    /// Rate change over six months, percentage points
    pub rate_change_6m_pp: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MarketTrendsInput {
    pub end_date: NaiveDate,
    #[serde(default = "default_history_months")]
    pub history_months: usize,
    #[serde(default = "default_forecast_months")]
    pub forecast_months: usize,
    /// Optional seed for reproducibility.
    #[serde(default)]
    pub seed: Option<u64>,
}

fn default_history_months() -> usize {
    DEFAULT_HISTORY_MONTHS
}

fn default_forecast_months() -> usize {
    DEFAULT_FORECAST_MONTHS
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MarketTrendsOutput {
    pub history: Vec<MarketPoint>,
    pub summary: MarketSummary,
    pub forecasts: Vec<RateForecast>,
}

fn months_offset(date: NaiveDate, back: usize, forward: bool) -> MortgageRiskResult<NaiveDate> {
    let months = u32::try_from(back).map_err(|_| MortgageRiskError::InvalidInput {
        field: "periods".into(),
        reason: format!("{back} months is out of range"),
    })?;
    let shifted = if forward {
        date.checked_add_months(Months::new(months))
    } else {
        date.checked_sub_months(Months::new(months))
    };
    shifted.ok_or_else(|| MortgageRiskError::InvalidInput {
        field: "end_date".into(),
        reason: format!("{date} shifted by {months} months is out of range"),
    })
}

/// Synthetic monthly market history ending at `end_date`.
///
/// Housing index follows a linear trend with a three-cycle seasonal wave and
/// unit noise; mortgage rate and inflation are noisy linear trends clipped
/// to plausible bands.
pub fn generate_market_history<R: Rng + ?Sized>(
    rng: &mut R,
    end_date: NaiveDate,
    periods: usize,
) -> MortgageRiskResult<Vec<MarketPoint>> {
    if periods < SIX_MONTHS_BACK {
        return Err(MortgageRiskError::InvalidInput {
            field: "history_months".into(),
            reason: format!("At least {SIX_MONTHS_BACK} months of history are required"),
        });
    }

    let trend = linspace(100.0, 120.0, periods);
    let wave = linspace(0.0, 6.0 * std::f64::consts::PI, periods);
    let rate_trend = linspace(3.5, 5.2, periods);
    let inflation_trend = linspace(2.5, 3.8, periods);

    let unit = normal(0.0, 1.0)?;
    let rate_noise = normal(0.0, 0.3)?;
    let inflation_noise = normal(0.0, 0.5)?;

    // Each series is drawn in full before the next
    let index_draws: Vec<f64> = (0..periods).map(|_| rng.sample(unit)).collect();
    let rate_draws: Vec<f64> = (0..periods).map(|_| rng.sample(rate_noise)).collect();
    let inflation_draws: Vec<f64> = (0..periods).map(|_| rng.sample(inflation_noise)).collect();

    let mut history = Vec::with_capacity(periods);
    for i in 0..periods {
        history.push(MarketPoint {
            date: months_offset(end_date, periods - 1 - i, false)?,
            housing_index: trend[i] + 5.0 * wave[i].sin() + index_draws[i],
            mortgage_rate: (rate_trend[i] + rate_draws[i]).clamp(2.8, 6.5),
            inflation: (inflation_trend[i] + inflation_draws[i]).clamp(1.5, 5.5),
        });
    }
    Ok(history)
}

/// Rising, Steady and Falling rate paths starting after `last_date`.
pub fn forecast_rates<R: Rng + ?Sized>(
    rng: &mut R,
    last_rate: f64,
    last_date: NaiveDate,
    horizon: usize,
) -> MortgageRiskResult<Vec<RateForecast>> {
    let jitter: Normal = normal(0.0, 0.05)?;
    let dates = (1..=horizon)
        .map(|i| months_offset(last_date, i, true))
        .collect::<MortgageRiskResult<Vec<_>>>()?;

    let path = |rates: Vec<f64>| -> Vec<ForecastPoint> {
        dates
            .iter()
            .zip(rates)
            .map(|(date, rate)| ForecastPoint { date: *date, rate })
            .collect()
    };

    let rising = (1..=horizon)
        .map(|i| last_rate + RISING_STEP * i as f64)
        .collect();
    let steady = (0..horizon).map(|_| last_rate + rng.sample(jitter)).collect();
    let falling = (1..=horizon)
        .map(|i| (last_rate - FALLING_STEP * i as f64).max(FALLING_RATE_FLOOR))
        .collect();

    Ok(vec![
        RateForecast {
            trend: RateTrend::Rising,
            points: path(rising),
        },
        RateForecast {
            trend: RateTrend::Steady,
            points: path(steady),
        },
        RateForecast {
            trend: RateTrend::Falling,
            points: path(falling),
        },
    ])
}

/// Latest values and six-month changes of a market history.
pub fn summarize_market(history: &[MarketPoint]) -> MortgageRiskResult<MarketSummary> {
    let n = history.len();
    if n < SIX_MONTHS_BACK {
        return Err(MortgageRiskError::InvalidInput {
            field: "history".into(),
            reason: format!("Need at least {SIX_MONTHS_BACK} points, got {n}"),
        });
    }
    let latest = &history[n - 1];
    let earlier = &history[n - SIX_MONTHS_BACK];
    if earlier.housing_index == 0.0 {
        return Err(MortgageRiskError::DivisionByZero {
            context: "six-month housing index change".into(),
        });
    }

    Ok(MarketSummary {
        latest_housing_index: latest.housing_index,
        latest_rate: latest.mortgage_rate,
        latest_inflation: latest.inflation,
        housing_change_6m_pct: (latest.housing_index / earlier.housing_index - 1.0) * 100.0,
        rate_change_6m_pp: latest.mortgage_rate - earlier.mortgage_rate,
    })
}

pub fn analyze_market_trends(
    input: &MarketTrendsInput,
) -> MortgageRiskResult<ComputationOutput<MarketTrendsOutput>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    let mut rng = match input.seed {
        Some(s) => StdRng::seed_from_u64(s),
        None => StdRng::from_entropy(),
    };

    let history = generate_market_history(&mut rng, input.end_date, input.history_months)?;
    let summary = summarize_market(&history)?;
    let forecasts = forecast_rates(
        &mut rng,
        summary.latest_rate,
        input.end_date,
        input.forecast_months,
    )?;
    debug!(
        "market history of {} months, latest rate {:.3}",
        history.len(),
        summary.latest_rate
    );

    if input.seed.is_none() {
        warnings.push("No seed supplied; results are not reproducible".into());
    }
    if summary.rate_change_6m_pp > 0.5 {
        warnings.push(format!(
            "Rates rose {:.2} points over six months",
            summary.rate_change_6m_pp
        ));
    }

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata_f64(
        "Synthetic Market History with Rising/Steady/Falling Rate Paths",
        &serde_json::json!({
            "end_date": input.end_date,
            "history_months": input.history_months,
            "forecast_months": input.forecast_months,
            "seed": input.seed,
        }),
        warnings,
        elapsed,
        MarketTrendsOutput {
            history,
            summary,
            forecasts,
        },
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn end() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 30).unwrap()
    }

    #[test]
    fn test_history_shape_and_bounds() {
        let mut rng = StdRng::seed_from_u64(7);
        let h = generate_market_history(&mut rng, end(), 60).unwrap();
        assert_eq!(h.len(), 60);
        assert_eq!(h.last().unwrap().date, end());
        assert_eq!(h[0].date, NaiveDate::from_ymd_opt(2019, 7, 30).unwrap());
        for p in &h {
            assert!((2.8..=6.5).contains(&p.mortgage_rate));
            assert!((1.5..=5.5).contains(&p.inflation));
        }
    }

    #[test]
    fn test_history_is_deterministic_per_seed() {
        let a = generate_market_history(&mut StdRng::seed_from_u64(42), end(), 60).unwrap();
        let b = generate_market_history(&mut StdRng::seed_from_u64(42), end(), 60).unwrap();
        let c = generate_market_history(&mut StdRng::seed_from_u64(43), end(), 60).unwrap();
        assert!(a
            .iter()
            .zip(&b)
            .all(|(x, y)| x.housing_index == y.housing_index && x.mortgage_rate == y.mortgage_rate));
        assert!(a
            .iter()
            .zip(&c)
            .any(|(x, y)| x.housing_index != y.housing_index));
    }

    #[test]
    fn test_short_history_rejected() {
        let mut rng = StdRng::seed_from_u64(1);
        assert!(generate_market_history(&mut rng, end(), 3).is_err());
    }

    #[test]
    fn test_rate_paths() {
        let mut rng = StdRng::seed_from_u64(3);
        let f = forecast_rates(&mut rng, 3.0, end(), 12).unwrap();
        assert_eq!(f.len(), 3);

        let rising = &f[0];
        assert_eq!(rising.trend, RateTrend::Rising);
        assert_eq!(rising.points.len(), 12);
        assert!((rising.points[0].rate - 3.125).abs() < 1e-12);
        assert!((rising.points[11].rate - 4.5).abs() < 1e-12);
        assert_eq!(
            rising.points[0].date,
            NaiveDate::from_ymd_opt(2024, 7, 30).unwrap()
        );

        let steady = &f[1];
        assert!(steady.points.iter().all(|p| (p.rate - 3.0).abs() < 0.5));

        let falling = &f[2];
        assert!((falling.points[0].rate - 2.9).abs() < 1e-12);
        // 3.0 - 0.6 falls below the floor by month 6
        assert!(falling.points[5..].iter().all(|p| p.rate == 2.5));
    }

    #[test]
    fn test_summary_six_month_change() {
        let mut h = generate_market_history(&mut StdRng::seed_from_u64(9), end(), 12).unwrap();
        let n = h.len();
        h[n - 7].housing_index = 100.0;
        h[n - 1].housing_index = 104.0;
        h[n - 7].mortgage_rate = 4.0;
        h[n - 1].mortgage_rate = 4.75;
        let s = summarize_market(&h).unwrap();
        assert!((s.housing_change_6m_pct - 4.0).abs() < 1e-9);
        assert!((s.rate_change_6m_pp - 0.75).abs() < 1e-9);
    }

    #[test]
    fn test_envelope_reports_f64_precision() {
        let input = MarketTrendsInput {
            end_date: end(),
            history_months: 60,
            forecast_months: 12,
            seed: Some(11),
        };
        let out = analyze_market_trends(&input).unwrap();
        assert_eq!(out.metadata.precision, "ieee754_f64");
        assert_eq!(out.result.forecasts.len(), 3);
        assert_eq!(out.result.history.len(), 60);
    }
}
