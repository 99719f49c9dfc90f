//! Process-wide figures: the rate table, the interest deduction and the
//! gift tax policy. Loaded once and passed by reference.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::HuisfinError;
use crate::gifts::GiftTaxPolicy;
use crate::mortgage::{RateTable, INTEREST_DEDUCTION_PCT};
use crate::HuisfinResult;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HouseholdConfig {
    pub rate_table: RateTable,
    /// Deductible share of mortgage interest, in percent.
    pub interest_deduction_pct: Decimal,
    pub gift_tax: GiftTaxPolicy,
}

impl Default for HouseholdConfig {
    fn default() -> Self {
        HouseholdConfig {
            rate_table: RateTable::default(),
            interest_deduction_pct: INTEREST_DEDUCTION_PCT,
            gift_tax: GiftTaxPolicy::default(),
        }
    }
}

impl HouseholdConfig {
    /// Parse a JSON document; absent fields keep their defaults.
    pub fn from_json_str(json: &str) -> HuisfinResult<Self> {
        let config: HouseholdConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> HuisfinResult<()> {
        if self.interest_deduction_pct < Decimal::ZERO
            || self.interest_deduction_pct > Decimal::ONE_HUNDRED
        {
            return Err(HuisfinError::invalid(
                "interest_deduction_pct",
                "Interest deduction must be between 0 and 100 percent",
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mortgage::{LtvBucket, TermBucket};
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    #[test]
    fn test_empty_document_is_default() {
        let config = HouseholdConfig::from_json_str("{}").unwrap();
        assert_eq!(config, HouseholdConfig::default());
    }

    #[test]
    fn test_partial_override() {
        let config = HouseholdConfig::from_json_str(
            r#"{ "interest_deduction_pct": "37.48", "gift_tax": { "first_bracket_rate": "0.12" } }"#,
        )
        .unwrap();
        assert_eq!(config.interest_deduction_pct, dec!(37.48));
        assert_eq!(config.gift_tax.first_bracket_rate, dec!(0.12));
        assert_eq!(
            config.gift_tax.home_acquisition_exemption,
            GiftTaxPolicy::default().home_acquisition_exemption
        );
        assert_eq!(config.rate_table, RateTable::default());
    }

    #[test]
    fn test_rate_table_override() {
        let mut table = serde_json::to_value(RateTable::default()).unwrap();
        table["10"]["NHG"] = serde_json::json!("2.95");
        let doc = serde_json::json!({ "rate_table": table }).to_string();
        let config = HouseholdConfig::from_json_str(&doc).unwrap();
        assert_eq!(
            config.rate_table.rate(TermBucket::Ten, LtvBucket::Nhg),
            dec!(2.95)
        );
    }

    #[test]
    fn test_invalid_documents_rejected() {
        assert!(matches!(
            HouseholdConfig::from_json_str("not json"),
            Err(HuisfinError::SerializationError(_))
        ));
        assert!(matches!(
            HouseholdConfig::from_json_str(r#"{ "interest_deduction_pct": 120 }"#),
            Err(HuisfinError::InvalidInput { .. })
        ));
        assert!(HouseholdConfig::from_json_str(r#"{ "rate_table": { "5": {} } }"#).is_err());
    }
}
