//! Dutch gift tax for a parental gift used towards buying a home.
//!
//! The policy applies the one-off home acquisition exemption plus the
//! annual parental exemption, then taxes the remainder in two brackets.
//! The mortgage planner only consumes the net amount, through the
//! [`GiftNetting`] trait.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::error::HuisfinError;
use crate::types::{with_metadata, ComputationOutput, Money, Rate};
use crate::HuisfinResult;

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// One-off exemption for a gift spent on the recipient's own home.
pub const HOME_ACQUISITION_EXEMPTION: Money = dec!(114_318);

/// Regular annual exemption for a gift from a parent to a child.
pub const ANNUAL_PARENTAL_EXEMPTION: Money = dec!(6_035);

/// Upper bound of the first tax bracket, applied to the taxable amount.
pub const FIRST_BRACKET_LIMIT: Money = dec!(138_642);

pub const FIRST_BRACKET_RATE: Rate = dec!(0.10);
pub const SECOND_BRACKET_RATE: Rate = dec!(0.20);

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// A gift split into the tax owed and what the recipient keeps.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GiftNet {
    pub gift_amount: Money,
    pub tax: Money,
    pub net_amount: Money,
}

/// Anything that can net a cash gift into (tax, net).
pub trait GiftNetting {
    fn net_gift(&self, gift_amount: Money) -> HuisfinResult<GiftNet>;
}

/// Exemptions and brackets of the gift tax.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GiftTaxPolicy {
    pub home_acquisition_exemption: Money,
    pub annual_parental_exemption: Money,
    pub first_bracket_limit: Money,
    pub first_bracket_rate: Rate,
    pub second_bracket_rate: Rate,
}

impl Default for GiftTaxPolicy {
    fn default() -> Self {
        GiftTaxPolicy {
            home_acquisition_exemption: HOME_ACQUISITION_EXEMPTION,
            annual_parental_exemption: ANNUAL_PARENTAL_EXEMPTION,
            first_bracket_limit: FIRST_BRACKET_LIMIT,
            first_bracket_rate: FIRST_BRACKET_RATE,
            second_bracket_rate: SECOND_BRACKET_RATE,
        }
    }
}

impl GiftTaxPolicy {
    pub fn total_exemption(&self) -> Money {
        self.home_acquisition_exemption + self.annual_parental_exemption
    }

    /// Tax owed on a gift. Amounts at or below the exemption are untaxed.
    pub fn tax_on(&self, gift_amount: Money) -> Money {
        let taxable = (gift_amount - self.total_exemption()).max(Decimal::ZERO);

        if taxable <= self.first_bracket_limit {
            taxable * self.first_bracket_rate
        } else {
            self.first_bracket_limit * self.first_bracket_rate
                + (taxable - self.first_bracket_limit) * self.second_bracket_rate
        }
    }
}

impl GiftNetting for GiftTaxPolicy {
    fn net_gift(&self, gift_amount: Money) -> HuisfinResult<GiftNet> {
        if gift_amount < Decimal::ZERO {
            return Err(HuisfinError::invalid(
                "gift_amount",
                "Gift amount cannot be negative",
            ));
        }
        let tax = self.tax_on(gift_amount);
        Ok(GiftNet {
            gift_amount,
            tax,
            net_amount: gift_amount - tax,
        })
    }
}

/// Input for a standalone gift tax calculation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GiftTaxInput {
    pub gift_amount: Money,
}

/// Gift tax result including the effective rate on the whole gift.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GiftTaxOutput {
    pub gift_amount: Money,
    pub exemption: Money,
    pub taxable_amount: Money,
    pub tax: Money,
    pub net_amount: Money,
    pub effective_rate: Rate,
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Calculate the gift tax and net amount of a home-acquisition gift.
pub fn calculate_gift_tax(
    input: &GiftTaxInput,
    policy: &GiftTaxPolicy,
) -> HuisfinResult<ComputationOutput<GiftTaxOutput>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    let netted = policy.net_gift(input.gift_amount)?;
    let exemption = policy.total_exemption();
    let taxable_amount = (input.gift_amount - exemption).max(Decimal::ZERO);

    if taxable_amount > policy.first_bracket_limit {
        warnings.push(format!(
            "Taxable amount {} exceeds the first bracket; the excess is taxed at {}%",
            taxable_amount,
            policy.second_bracket_rate * dec!(100)
        ));
    }

    let effective_rate = if input.gift_amount.is_zero() {
        Decimal::ZERO
    } else {
        netted.tax / input.gift_amount
    };

    let output = GiftTaxOutput {
        gift_amount: netted.gift_amount,
        exemption,
        taxable_amount,
        tax: netted.tax,
        net_amount: netted.net_amount,
        effective_rate,
    };

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Dutch gift tax (home acquisition exemption, two brackets)",
        input,
        warnings,
        elapsed,
        output,
    ))
}
