use huisfin_core::gifts::{
    calculate_gift_tax, GiftNetting, GiftTaxInput, GiftTaxPolicy, FIRST_BRACKET_LIMIT,
};
use huisfin_core::HuisfinError;
use pretty_assertions::assert_eq;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

#[test]
fn test_gift_below_exemption_is_untaxed() {
    let out = calculate_gift_tax(
        &GiftTaxInput {
            gift_amount: dec!(100_000),
        },
        &GiftTaxPolicy::default(),
    )
    .unwrap();
    assert_eq!(out.result.tax, Decimal::ZERO);
    assert_eq!(out.result.net_amount, dec!(100_000));
    assert_eq!(out.result.taxable_amount, Decimal::ZERO);
    assert_eq!(out.result.exemption, dec!(120_353));
}

#[test]
fn test_gift_in_second_bracket() {
    let policy = GiftTaxPolicy::default();
    let gift = dec!(120_353) + FIRST_BRACKET_LIMIT + dec!(50_000);
    let net = policy.net_gift(gift).unwrap();
    assert_eq!(net.tax, dec!(13_864.20) + dec!(10_000));
    assert_eq!(net.net_amount + net.tax, gift);
}

#[test]
fn test_custom_policy_from_json() {
    let policy: GiftTaxPolicy =
        serde_json::from_str(r#"{ "home_acquisition_exemption": "0", "annual_parental_exemption": "0" }"#)
            .unwrap();
    let net = policy.net_gift(dec!(10_000)).unwrap();
    assert_eq!(net.tax, dec!(1_000));
}

#[test]
fn test_negative_gift_is_invalid() {
    let err = calculate_gift_tax(
        &GiftTaxInput {
            gift_amount: dec!(-5),
        },
        &GiftTaxPolicy::default(),
    )
    .unwrap_err();
    assert!(matches!(err, HuisfinError::InvalidInput { .. }));
}
