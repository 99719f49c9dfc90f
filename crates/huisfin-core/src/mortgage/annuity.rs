//! Annuity repayment: a level monthly payment whose interest share shrinks
//! while the principal share grows.

use log::debug;
use rust_decimal::Decimal;

use super::{
    column_total, tax_relief, too_large, AmortizationKind, AmortizationResult, Amortizer,
    INTEREST_DEDUCTION_PCT, LoanTerms, ScheduleRow,
};
use crate::error::HuisfinError;
use crate::types::Money;
use crate::HuisfinResult;

#[derive(Debug, Clone, PartialEq)]
pub struct AnnuityAmortizer {
    /// Deductible share of paid interest, in percent.
    pub interest_deduction_pct: Decimal,
}

impl Default for AnnuityAmortizer {
    fn default() -> Self {
        AnnuityAmortizer {
            interest_deduction_pct: INTEREST_DEDUCTION_PCT,
        }
    }
}

impl AnnuityAmortizer {
    pub fn new(interest_deduction_pct: Decimal) -> Self {
        AnnuityAmortizer {
            interest_deduction_pct,
        }
    }
}

/// Level monthly payment that repays `terms.principal` in `terms.months()`.
///
/// `P * r(1+r)^N / ((1+r)^N - 1)`, or `P / N` when the monthly rate is zero.
pub fn annuity_payment(terms: &LoanTerms) -> HuisfinResult<Money> {
    terms.validate()?;

    let n = terms.months();
    let monthly_rate = terms.monthly_rate();
    let level_principal = terms.principal / Decimal::from(n);
    if monthly_rate.is_zero() {
        return Ok(level_principal);
    }

    let factor = checked_pow(Decimal::ONE + monthly_rate, n).ok_or_else(|| overflow(terms))?;
    let denom = factor - Decimal::ONE;
    if denom.is_zero() {
        // (1+r)^N is indistinguishable from 1: the r -> 0 limit.
        return Ok(level_principal);
    }

    let numer = terms
        .principal
        .checked_mul(monthly_rate)
        .and_then(|x| x.checked_mul(factor))
        .ok_or_else(|| overflow(terms))?;
    Ok(numer / denom)
}

fn overflow(terms: &LoanTerms) -> HuisfinError {
    HuisfinError::invalid(
        "years",
        format!(
            "Annuity factor overflows for {} years at an annual rate of {}",
            terms.years, terms.annual_rate
        ),
    )
}

/// base^n by repeated multiplication; `None` on overflow.
fn checked_pow(base: Decimal, n: u32) -> Option<Decimal> {
    let mut result = Decimal::ONE;
    for _ in 0..n {
        result = result.checked_mul(base)?;
    }
    Some(result)
}

impl Amortizer for AnnuityAmortizer {
    fn kind(&self) -> AmortizationKind {
        AmortizationKind::Annuity
    }

    fn schedule(&self, terms: &LoanTerms) -> HuisfinResult<Vec<ScheduleRow>> {
        let payment = annuity_payment(terms)?;

        let mut remaining = terms.principal;
        let mut rows = Vec::with_capacity(terms.months() as usize);

        for month in 1..=terms.months() {
            let interest = remaining * terms.monthly_rate();
            let principal = payment - interest;
            remaining -= principal;
            rows.push(ScheduleRow {
                month,
                payment,
                interest,
                principal,
                tax_relief: tax_relief(interest, self.interest_deduction_pct),
                balance: remaining,
            });
        }

        Ok(rows)
    }

    fn amortize(&self, terms: &LoanTerms) -> HuisfinResult<AmortizationResult> {
        let payment = annuity_payment(terms)?;
        let total_paid = payment
            .checked_mul(Decimal::from(terms.months()))
            .ok_or_else(|| too_large(terms))?;
        let total_interest = total_paid - terms.principal;

        // Relief depends on the interest mix per month, so walk the schedule.
        let rows = self.schedule(terms)?;
        let total_tax_relief = column_total(&rows, terms, |r| r.tax_relief)?;
        let ending_balance = rows.last().map(|r| r.balance).unwrap_or(terms.principal);

        debug!(
            "annuity {} over {} months: payment {payment}, interest {total_interest}, residual {ending_balance}",
            terms.principal,
            terms.months()
        );

        AmortizationResult::summarise(
            AmortizationKind::Annuity,
            terms,
            payment,
            None,
            None,
            total_interest,
            total_tax_relief,
            ending_balance,
        )
    }
}

/// Annuity amortization with the statutory interest deduction.
pub fn amortize_annuity(terms: &LoanTerms) -> HuisfinResult<AmortizationResult> {
    AnnuityAmortizer::default().amortize(terms)
}
