//! Piecewise-linear point tables used by the composite risk score.
//!
//! Lookup semantics: values at or below the first breakpoint take the first
//! point value, values at or above the last breakpoint take the last point
//! value, and anything in between is interpolated linearly between the two
//! surrounding breakpoints. Category thresholds sit close to table outputs,
//! so the lookup is exact Decimal arithmetic with no rounding.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::error::MortgageRiskError;
use crate::types::Points;
use crate::MortgageRiskResult;

/// Ordered breakpoints mapped to point values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InterpolationTable {
    pub breakpoints: Vec<Decimal>,
    pub points: Vec<Points>,
}

impl InterpolationTable {
    pub fn new(breakpoints: Vec<Decimal>, points: Vec<Points>) -> MortgageRiskResult<Self> {
        let table = Self {
            breakpoints,
            points,
        };
        table.validate("table")?;
        Ok(table)
    }

    pub fn validate(&self, name: &str) -> MortgageRiskResult<()> {
        if self.breakpoints.is_empty() {
            return Err(MortgageRiskError::InvalidInput {
                field: name.into(),
                reason: "Interpolation table needs at least one breakpoint".into(),
            });
        }
        if self.breakpoints.len() != self.points.len() {
            return Err(MortgageRiskError::InvalidInput {
                field: name.into(),
                reason: format!(
                    "{} breakpoints but {} point values",
                    self.breakpoints.len(),
                    self.points.len()
                ),
            });
        }
        if self.breakpoints.windows(2).any(|w| w[0] >= w[1]) {
            return Err(MortgageRiskError::InvalidInput {
                field: name.into(),
                reason: "Breakpoints must be strictly increasing".into(),
            });
        }
        Ok(())
    }

    /// Look up the point value for `x`.
    ///
    /// Tables arrive through deserializable config, so the shape is checked
    /// on every lookup rather than trusted.
    pub fn interpolate(&self, x: Decimal) -> MortgageRiskResult<Points> {
        self.validate("interpolation_table")?;
        let xs = &self.breakpoints;
        let ys = &self.points;
        let last = xs.len() - 1;

        if x <= xs[0] {
            return Ok(ys[0]);
        }
        if x >= xs[last] {
            return Ok(ys[last]);
        }

        // First breakpoint strictly above x; guaranteed to exist and be > 0.
        let upper = xs.partition_point(|b| *b <= x);
        let lower = upper - 1;
        let span = xs[upper] - xs[lower];
        Ok(ys[lower] + (x - xs[lower]) * (ys[upper] - ys[lower]) / span)
    }
}

/// The full set of risk point tables. Lower points are better.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskTables {
    pub dti: InterpolationTable,
    pub ltv: InterpolationTable,
    pub rate: InterpolationTable,
    pub term: InterpolationTable,
    pub credit_score: InterpolationTable,
}

impl Default for RiskTables {
    fn default() -> Self {
        Self {
            dti: InterpolationTable {
                breakpoints: vec![dec!(20), dec!(28), dec!(36), dec!(43), dec!(50)],
                points: vec![dec!(0), dec!(10), dec!(20), dec!(30), dec!(40)],
            },
            ltv: InterpolationTable {
                breakpoints: vec![dec!(60), dec!(75), dec!(80), dec!(90), dec!(95)],
                points: vec![dec!(0), dec!(5), dec!(10), dec!(20), dec!(30)],
            },
            rate: InterpolationTable {
                breakpoints: vec![dec!(3.5), dec!(4.0), dec!(4.5), dec!(5.0), dec!(6.0)],
                points: vec![dec!(0), dec!(5), dec!(10), dec!(15), dec!(20)],
            },
            term: InterpolationTable {
                breakpoints: vec![dec!(10), dec!(15), dec!(20), dec!(30)],
                points: vec![dec!(0), dec!(3), dec!(5), dec!(10)],
            },
            credit_score: InterpolationTable {
                breakpoints: vec![dec!(580), dec!(620), dec!(680), dec!(720), dec!(760)],
                points: vec![dec!(30), dec!(20), dec!(10), dec!(5), dec!(0)],
            },
        }
    }
}

impl RiskTables {
    pub fn validate(&self) -> MortgageRiskResult<()> {
        self.dti.validate("risk_tables.dti")?;
        self.ltv.validate("risk_tables.ltv")?;
        self.rate.validate("risk_tables.rate")?;
        self.term.validate("risk_tables.term")?;
        self.credit_score.validate("risk_tables.credit_score")
    }
}
