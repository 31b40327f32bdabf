mod commands;
mod input;
mod output;

use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use log::debug;
use std::process;

use mortgage_risk_core::EngineConfig;

use commands::affordability::AffordabilityArgs;
use commands::amortization::AmortizationArgs;
use commands::forecast::{MarketTrendsArgs, NeighborhoodArgs};
use commands::payment::PaymentArgs;
use commands::recommend::RecommendArgs;
use commands::risk::RiskArgs;
use commands::stress_test::StressTestArgs;

/// Mortgage affordability and risk analysis
#[derive(Parser)]
#[command(
    name = "mra",
    version,
    about = "Mortgage affordability and risk analysis",
    long_about = "A CLI for mortgage affordability and risk analysis with decimal precision. \
                  Supports payment and amortisation schedules, DTI/LTV affordability, \
                  composite risk scoring, stress testing, loan-structure recommendations \
                  and synthetic market and neighborhood data."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output format
    #[arg(long, default_value = "json", global = true)]
    output: OutputFormat,

    /// Engine configuration file (YAML or JSON); overrides any embedded config
    #[arg(long, global = true)]
    config: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Monthly payment, optionally against a what-if rate or term
    Payment(PaymentArgs),
    /// Full amortisation schedule with an annual roll-up
    Amortization(AmortizationArgs),
    /// Housing cost, DTI/LTV tiers, income allocation and emergency fund
    Affordability(AffordabilityArgs),
    /// Composite 0-100 risk score
    Risk(RiskArgs),
    /// Run market stress and life-event scenarios
    StressTest(StressTestArgs),
    /// Recommend a loan structure from borrower preferences
    Recommend(RecommendArgs),
    /// Synthetic market history and rate forecast
    MarketTrends(MarketTrendsArgs),
    /// Synthetic neighborhood indicators and value projection
    Neighborhood(NeighborhoodArgs),
    /// Print version information
    Version,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    Json,
    Table,
    Csv,
    Minimal,
}

fn load_config(path: Option<&str>) -> Result<Option<EngineConfig>, Box<dyn std::error::Error>> {
    let Some(path) = path else {
        return Ok(None);
    };
    let config: EngineConfig = input::file::read_yaml_or_json(path)?;
    config.validate()?;
    debug!("loaded engine config from {path}");
    Ok(Some(config))
}

fn main() {
    env_logger::init();
    let cli = Cli::parse();

    let config = match load_config(cli.config.as_deref()) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("{}: {}", "error".red().bold(), e);
            process::exit(1);
        }
    };
    let config = config.as_ref();

    let result: commands::CommandResult = match cli.command {
        Commands::Payment(args) => commands::payment::run_payment(args),
        Commands::Amortization(args) => commands::amortization::run_amortization(args, config),
        Commands::Affordability(args) => commands::affordability::run_affordability(args, config),
        Commands::Risk(args) => commands::risk::run_risk(args, config),
        Commands::StressTest(args) => commands::stress_test::run_stress(args, config),
        Commands::Recommend(args) => commands::recommend::run_recommend(args, config),
        Commands::MarketTrends(args) => commands::forecast::run_market_trends(args),
        Commands::Neighborhood(args) => commands::forecast::run_neighborhood(args),
        Commands::Version => {
            println!("mra {}", env!("CARGO_PKG_VERSION"));
            return;
        }
    };

    match result {
        Ok(value) => {
            output::format_output(&cli.output, &value);
            process::exit(0);
        }
        Err(e) => {
            eprintln!("{}: {}", "error".red().bold(), e);
            process::exit(1);
        }
    }
}
