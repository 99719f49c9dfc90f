use clap::Args;
use rust_decimal::Decimal;
use serde_json::Value;

use huisfin_core::config::HouseholdConfig;
use huisfin_core::gifts::{self, GiftTaxInput};

use crate::input;

/// Arguments for the gift tax calculation
#[derive(Args)]
pub struct GiftTaxArgs {
    /// Gift amount in euros
    #[arg(long)]
    pub amount: Option<Decimal>,

    /// Path to JSON input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,
}

pub fn run_gift_tax(
    args: GiftTaxArgs,
    config: &HouseholdConfig,
) -> Result<Value, Box<dyn std::error::Error>> {
    let gift_input: GiftTaxInput = if let Some(ref path) = args.input {
        input::file::read_json(path)?
    } else if let Some(amount) = args.amount {
        GiftTaxInput {
            gift_amount: amount,
        }
    } else {
        input::stdin::read_stdin()?
            .ok_or("--amount is required (or provide --input or JSON on stdin)")?
    };
    let result = gifts::calculate_gift_tax(&gift_input, &config.gift_tax)?;
    Ok(serde_json::to_value(result)?)
}
