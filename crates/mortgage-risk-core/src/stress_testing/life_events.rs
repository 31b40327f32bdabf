//! Household life-event catalogue expressed as income/expense multipliers.

use rust_decimal_macros::dec;

use super::scenario::{ImpactLevel, Scenario};

pub fn build_life_event_scenarios() -> Vec<Scenario> {
    vec![
        Scenario::new("Job Loss", ImpactLevel::High)
            .income(dec!(0.40))
            .describe("Primary income replaced by unemployment benefits at about 40% of salary"),
        Scenario::new("Reduced Working Hours", ImpactLevel::Medium)
            .income(dec!(0.75))
            .describe("Hours cut to three quarters of full time"),
        Scenario::new("Medical Emergency", ImpactLevel::Medium)
            .expenses(dec!(1.35))
            .describe("Treatment costs add 35% to existing monthly obligations"),
        Scenario::new("Divorce or Separation", ImpactLevel::High)
            .income(dec!(0.55))
            .expenses(dec!(1.15))
            .describe("Household income drops to one earner while support payments begin"),
        Scenario::new("New Child", ImpactLevel::Medium)
            .income(dec!(0.95))
            .expenses(dec!(1.25))
            .describe("Parental leave trims income and childcare raises monthly costs"),
        Scenario::new("Career Advancement", ImpactLevel::Low)
            .income(dec!(1.20))
            .describe("Promotion raises monthly income by 20%"),
        Scenario::new("Rate Reset at Renewal", ImpactLevel::Medium)
            .rate_delta(dec!(1.5))
            .describe("Fixed period ends and the loan renews 1.5 points higher"),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;

    #[test]
    fn test_every_event_has_a_description() {
        for s in build_life_event_scenarios() {
            assert!(!s.description.is_empty(), "{} lacks a description", s.name);
        }
    }

    #[test]
    fn test_no_event_zeroes_income() {
        assert!(build_life_event_scenarios()
            .iter()
            .all(|s| s.income_multiplier > Decimal::ZERO));
    }

    #[test]
    fn test_only_rate_reset_moves_rate() {
        let moved: Vec<_> = build_life_event_scenarios()
            .into_iter()
            .filter(|s| !s.rate_delta.is_zero())
            .map(|s| s.name)
            .collect();
        assert_eq!(moved, vec!["Rate Reset at Renewal".to_string()]);
    }
}
