pub mod affordability;
pub mod amortization;
pub mod forecast;
pub mod payment;
pub mod recommend;
pub mod risk;

use clap::Args;
use rust_decimal::Decimal;

use mortgage_risk_core::{BorrowerProfile, EngineConfig, LoanParameters};

pub type CommandResult = Result<serde_json::Value, Box<dyn std::error::Error>>;

/// Loan terms shared by most commands
#[derive(Args, Debug, Clone)]
pub struct LoanArgs {
    /// Loan principal
    #[arg(long)]
    pub principal: Option<Decimal>,

    /// Annual interest rate in percent (4.5 = 4.5%)
    #[arg(long)]
    pub rate: Option<Decimal>,

    /// Loan term in years
    #[arg(long, alias = "term")]
    pub years: Option<u32>,
}

impl LoanArgs {
    pub fn to_loan(&self) -> Result<LoanParameters, Box<dyn std::error::Error>> {
        Ok(LoanParameters::new(
            self.principal
                .ok_or("--principal is required (or provide --input)")?,
            self.rate.ok_or("--rate is required (or provide --input)")?,
            self.years.ok_or("--years is required (or provide --input)")?,
        ))
    }
}

/// Borrower position shared by the ratio-based commands
#[derive(Args, Debug, Clone)]
pub struct BorrowerArgs {
    /// Gross monthly income
    #[arg(long)]
    pub income: Option<Decimal>,

    /// Existing monthly debt payments
    #[arg(long)]
    pub debt: Option<Decimal>,

    /// Liquid assets
    #[arg(long)]
    pub assets: Option<Decimal>,

    /// Credit score (300-850)
    #[arg(long)]
    pub credit_score: Option<u32>,
}

impl BorrowerArgs {
    pub fn to_borrower(&self) -> Result<BorrowerProfile, Box<dyn std::error::Error>> {
        Ok(BorrowerProfile {
            monthly_income: self
                .income
                .ok_or("--income is required (or provide --input)")?,
            monthly_debt: self.debt.unwrap_or(Decimal::ZERO),
            assets: self.assets.unwrap_or(Decimal::ZERO),
            credit_score: self.credit_score,
        })
    }
}

/// `--config` wins over a config embedded in the request file.
pub fn resolve_config(embedded: EngineConfig, global: Option<&EngineConfig>) -> EngineConfig {
    match global {
        Some(cfg) => cfg.clone(),
        None => embedded,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_loan_flags_build_parameters() {
        let args = LoanArgs {
            principal: Some(dec!(360_000)),
            rate: Some(dec!(4.5)),
            years: Some(30),
        };
        let loan = args.to_loan().unwrap();
        assert_eq!(loan.num_payments(), 360);
    }

    #[test]
    fn test_missing_flag_names_the_flag() {
        let args = LoanArgs {
            principal: Some(dec!(360_000)),
            rate: None,
            years: Some(30),
        };
        let err = args.to_loan().unwrap_err();
        assert!(err.to_string().contains("--rate"));
    }

    #[test]
    fn test_borrower_debt_defaults_to_zero() {
        let args = BorrowerArgs {
            income: Some(dec!(6500)),
            debt: None,
            assets: None,
            credit_score: None,
        };
        assert_eq!(args.to_borrower().unwrap().monthly_debt, Decimal::ZERO);
    }

    #[test]
    fn test_global_config_overrides_embedded() {
        let embedded = EngineConfig {
            max_term_years: 40,
            ..EngineConfig::default()
        };
        let global = EngineConfig {
            max_term_years: 35,
            ..EngineConfig::default()
        };
        assert_eq!(resolve_config(embedded.clone(), Some(&global)).max_term_years, 35);
        assert_eq!(resolve_config(embedded, None).max_term_years, 40);
    }
}
