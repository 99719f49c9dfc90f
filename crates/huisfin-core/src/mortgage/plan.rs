//! Size a mortgage from a house purchase and run both repayment schemes.
//!
//! Flow: net the cash gift, finance what the buyer and the gift do not
//! cover, price the loan from the rate table, then amortize it linearly and
//! as an annuity with the same rounded rate.

use log::debug;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use super::rates::{resolve, LtvBucket, LtvInput, TermBucket};
use super::{AmortizationResult, Amortizer, AnnuityAmortizer, LinearAmortizer, LoanTerms};
use crate::config::HouseholdConfig;
use crate::error::HuisfinError;
use crate::gifts::{GiftNet, GiftNetting};
use crate::types::{with_metadata, ComputationOutput, Money, Rate};
use crate::HuisfinResult;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MortgageInput {
    pub house_price: Money,
    pub own_contribution: Money,
    #[serde(default)]
    pub gift_amount: Money,
    pub term_years: u32,
    /// Price the loan at the NHG rate instead of by loan-to-value.
    #[serde(default)]
    pub government_backed: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MortgagePlan {
    pub gift: GiftNet,
    pub principal: Money,
    pub loan_to_value: Rate,
    pub term_bucket: TermBucket,
    pub ltv_bucket: LtvBucket,
    /// Table rate in percentage points.
    pub table_rate_pct: Rate,
    /// Table rate as a fraction, rounded to 4 decimals; used by both schedules.
    pub annual_rate: Rate,
    pub linear: AmortizationResult,
    pub annuity: AmortizationResult,
}

/// Plan a mortgage with the configured gift tax policy.
pub fn plan_mortgage(
    input: &MortgageInput,
    config: &HouseholdConfig,
) -> HuisfinResult<ComputationOutput<MortgagePlan>> {
    plan_mortgage_with(input, config, &config.gift_tax)
}

/// Plan a mortgage, netting the gift through `gifts`.
pub fn plan_mortgage_with<G: GiftNetting + ?Sized>(
    input: &MortgageInput,
    config: &HouseholdConfig,
    gifts: &G,
) -> HuisfinResult<ComputationOutput<MortgagePlan>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    validate_mortgage_input(input)?;

    let gift = gifts.net_gift(input.gift_amount)?;
    if gift.tax > Decimal::ZERO {
        warnings.push(format!(
            "Gift of {} is taxed {}; only {} reduces the loan",
            gift.gift_amount, gift.tax, gift.net_amount
        ));
    }

    let principal = input.house_price - input.own_contribution - gift.net_amount;
    if principal <= Decimal::ZERO {
        return Err(HuisfinError::invalid(
            "principal",
            "Financed amount must be positive",
        ));
    }

    let loan_to_value = principal / input.house_price;
    if loan_to_value > Decimal::ONE {
        return Err(HuisfinError::invalid(
            "loan_to_value",
            format!("Financing {principal} exceeds the house price {}", input.house_price),
        ));
    }

    let ltv = if input.government_backed {
        LtvInput::GovernmentBacked
    } else {
        LtvInput::Ratio(loan_to_value)
    };
    let resolution = resolve(
        &config.rate_table,
        Decimal::from(input.term_years),
        &ltv,
    )?;
    let annual_rate = (resolution.annual_rate_pct / dec!(100)).round_dp(4);

    if resolution.ltv_bucket == LtvBucket::Above90 {
        warnings.push(format!(
            "Loan-to-value of {}% is above 90%",
            (loan_to_value * dec!(100)).round_dp(2)
        ));
    }
    if resolution.term_bucket == TermBucket::Variable {
        warnings.push("Term of one year or less is priced at the variable rate".into());
    }

    let terms = LoanTerms {
        principal,
        annual_rate,
        years: input.term_years,
    };
    debug!(
        "financing {principal} ({loan_to_value} LTV) at {annual_rate} for {} years",
        input.term_years
    );

    let linear = LinearAmortizer::new(config.interest_deduction_pct).amortize(&terms)?;
    let annuity = AnnuityAmortizer::new(config.interest_deduction_pct).amortize(&terms)?;

    let output = MortgagePlan {
        gift,
        principal,
        loan_to_value,
        term_bucket: resolution.term_bucket,
        ltv_bucket: resolution.ltv_bucket,
        table_rate_pct: resolution.annual_rate_pct,
        annual_rate,
        linear,
        annuity,
    };

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Dutch mortgage: gift netting, rate table lookup, linear and annuity amortization",
        input,
        warnings,
        elapsed,
        output,
    ))
}

fn validate_mortgage_input(input: &MortgageInput) -> HuisfinResult<()> {
    if input.house_price <= Decimal::ZERO {
        return Err(HuisfinError::invalid(
            "house_price",
            "House price must be positive",
        ));
    }
    if input.own_contribution < Decimal::ZERO {
        return Err(HuisfinError::invalid(
            "own_contribution",
            "Own contribution cannot be negative",
        ));
    }
    if input.term_years == 0 {
        return Err(HuisfinError::invalid(
            "term_years",
            "Term must be at least one year",
        ));
    }
    Ok(())
}
