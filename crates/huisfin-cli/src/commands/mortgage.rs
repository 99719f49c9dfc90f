use clap::Args;
use log::debug;
use rust_decimal::Decimal;
use serde_json::Value;

use huisfin_core::config::HouseholdConfig;
use huisfin_core::mortgage::rates::{self, LtvInput, RateLookupInput};
use huisfin_core::mortgage::{
    self, Amortizer, AnnuityAmortizer, LinearAmortizer, LoanTerms, MortgageInput,
};

use crate::input;

/// Arguments for a full mortgage plan
#[derive(Args)]
pub struct MortgageArgs {
    /// Purchase price of the house
    #[arg(long)]
    pub house_price: Option<Decimal>,

    /// Buyer's own contribution towards the purchase
    #[arg(long)]
    pub own_contribution: Option<Decimal>,

    /// Cash gift received for the purchase (netted for gift tax)
    #[arg(long)]
    pub gift: Option<Decimal>,

    /// Mortgage term in years
    #[arg(long)]
    pub years: Option<u32>,

    /// Loan carries the NHG guarantee
    #[arg(long)]
    pub nhg: bool,

    /// Path to JSON input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,
}

/// Arguments for a rate table lookup
#[derive(Args)]
#[command(allow_hyphen_values = true)]
pub struct RateArgs {
    /// Fixed-rate period in years (fractions are truncated)
    #[arg(long)]
    pub years: Option<Decimal>,

    /// Loan-to-value ratio (e.g. 0.8) or NHG
    #[arg(long)]
    pub ltv: Option<LtvInput>,

    /// Path to JSON input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,
}

/// Arguments for a single amortization schedule
#[derive(Args)]
pub struct AmortizeArgs {
    /// Amount borrowed
    #[arg(long)]
    pub principal: Option<Decimal>,

    /// Annual interest rate as a decimal (e.g. 0.0398 for 3.98%)
    #[arg(long)]
    pub rate: Option<Decimal>,

    /// Term in years
    #[arg(long)]
    pub years: Option<u32>,

    /// Include the month-by-month schedule
    #[arg(long)]
    pub schedule: bool,

    /// Path to JSON input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,
}

pub fn run_mortgage(
    args: MortgageArgs,
    config: &HouseholdConfig,
) -> Result<Value, Box<dyn std::error::Error>> {
    let mortgage_input: MortgageInput = if let Some(ref path) = args.input {
        input::file::read_json(path)?
    } else if args.house_price.is_none() {
        input::stdin::read_stdin()?
            .ok_or("--house-price is required (or provide --input or JSON on stdin)")?
    } else {
        MortgageInput {
            house_price: args
                .house_price
                .ok_or("--house-price is required (or provide --input)")?,
            own_contribution: args
                .own_contribution
                .ok_or("--own-contribution is required (or provide --input)")?,
            gift_amount: args.gift.unwrap_or(Decimal::ZERO),
            term_years: args
                .years
                .ok_or("--years is required (or provide --input)")?,
            government_backed: args.nhg,
        }
    };
    let result = mortgage::plan_mortgage(&mortgage_input, config)?;
    Ok(serde_json::to_value(result)?)
}

pub fn run_rate(
    args: RateArgs,
    config: &HouseholdConfig,
) -> Result<Value, Box<dyn std::error::Error>> {
    let lookup: RateLookupInput = if let Some(ref path) = args.input {
        input::file::read_json(path)?
    } else if args.years.is_none() {
        input::stdin::read_stdin()?
            .ok_or("--years is required (or provide --input or JSON on stdin)")?
    } else {
        RateLookupInput {
            term_years: args
                .years
                .ok_or("--years is required (or provide --input)")?,
            ltv: args.ltv.ok_or("--ltv is required (or provide --input)")?,
        }
    };
    let result = rates::lookup_rate(&lookup, &config.rate_table)?;
    Ok(serde_json::to_value(result)?)
}

pub fn run_linear(
    args: AmortizeArgs,
    config: &HouseholdConfig,
) -> Result<Value, Box<dyn std::error::Error>> {
    let amortizer = LinearAmortizer::new(config.interest_deduction_pct);
    run_amortizer(&amortizer, args)
}

pub fn run_annuity(
    args: AmortizeArgs,
    config: &HouseholdConfig,
) -> Result<Value, Box<dyn std::error::Error>> {
    let amortizer = AnnuityAmortizer::new(config.interest_deduction_pct);
    run_amortizer(&amortizer, args)
}

fn run_amortizer(
    amortizer: &dyn Amortizer,
    args: AmortizeArgs,
) -> Result<Value, Box<dyn std::error::Error>> {
    let terms: LoanTerms = if let Some(ref path) = args.input {
        input::file::read_json(path)?
    } else if args.principal.is_none() {
        input::stdin::read_stdin()?
            .ok_or("--principal is required (or provide --input or JSON on stdin)")?
    } else {
        LoanTerms {
            principal: args
                .principal
                .ok_or("--principal is required (or provide --input)")?,
            annual_rate: args.rate.ok_or("--rate is required (or provide --input)")?,
            years: args
                .years
                .ok_or("--years is required (or provide --input)")?,
        }
    };

    debug!("{:?} amortization of {}", amortizer.kind(), terms.principal);
    let summary = amortizer.amortize(&terms)?;
    if args.schedule {
        let rows = amortizer.schedule(&terms)?;
        return Ok(serde_json::json!({
            "result": summary,
            "results": rows,
        }));
    }
    Ok(serde_json::json!({ "result": summary }))
}
