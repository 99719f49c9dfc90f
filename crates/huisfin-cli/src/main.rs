mod commands;
mod input;
mod output;

use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use std::process;

use commands::gifts::GiftTaxArgs;
use commands::mortgage::{AmortizeArgs, MortgageArgs, RateArgs};
use huisfin_core::config::HouseholdConfig;

/// Dutch household mortgage and gift-tax calculations
#[derive(Parser)]
#[command(
    name = "huisfin",
    version,
    about = "Dutch household mortgage and gift-tax calculations",
    long_about = "Size a mortgage from a house purchase, look up the applicable rate \
                  by term and loan-to-value, and compare linear and annuity repayment \
                  including mortgage interest deduction. Decimal precision throughout."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output format
    #[arg(long, default_value = "json", global = true)]
    output: OutputFormat,

    /// Configuration file (JSON or YAML) overriding rates, deduction and gift tax
    #[arg(long, global = true)]
    config: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Plan a mortgage: net the gift, price the loan, run both schedules
    Mortgage(MortgageArgs),
    /// Look up the annual rate for a term and loan-to-value
    Rate(RateArgs),
    /// Linear amortization of a loan at a given rate
    Linear(AmortizeArgs),
    /// Annuity amortization of a loan at a given rate
    Annuity(AmortizeArgs),
    /// Gift tax on a home-acquisition gift
    GiftTax(GiftTaxArgs),
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

fn main() {
    env_logger::init();
    let cli = Cli::parse();

    let config = match cli.config {
        Some(ref path) => match input::file::read_config(path) {
            Ok(config) => config,
            Err(e) => fail(e),
        },
        None => HouseholdConfig::default(),
    };

    let result: Result<serde_json::Value, Box<dyn std::error::Error>> = match cli.command {
        Commands::Mortgage(args) => commands::mortgage::run_mortgage(args, &config),
        Commands::Rate(args) => commands::mortgage::run_rate(args, &config),
        Commands::Linear(args) => commands::mortgage::run_linear(args, &config),
        Commands::Annuity(args) => commands::mortgage::run_annuity(args, &config),
        Commands::GiftTax(args) => commands::gifts::run_gift_tax(args, &config),
        Commands::Version => {
            println!("huisfin {}", env!("CARGO_PKG_VERSION"));
            return;
        }
    };

    match result {
        Ok(value) => {
            output::format_output(&cli.output, &value);
            process::exit(0);
        }
        Err(e) => fail(e),
    }
}

fn fail(e: Box<dyn std::error::Error>) -> ! {
    eprintln!("{}: {}", "error".red().bold(), e);
    process::exit(1);
}
