//! Linear repayment: a constant slice of principal each month, so interest
//! and the total payment fall as the balance shrinks.

use log::debug;
use rust_decimal::Decimal;

use super::{
    column_total, tax_relief, AmortizationKind, AmortizationResult, Amortizer, LoanTerms,
    ScheduleRow, INTEREST_DEDUCTION_PCT,
};
use crate::HuisfinResult;

#[derive(Debug, Clone, PartialEq)]
pub struct LinearAmortizer {
    /// Deductible share of paid interest, in percent.
    pub interest_deduction_pct: Decimal,
}

impl Default for LinearAmortizer {
    fn default() -> Self {
        LinearAmortizer {
            interest_deduction_pct: INTEREST_DEDUCTION_PCT,
        }
    }
}

impl LinearAmortizer {
    pub fn new(interest_deduction_pct: Decimal) -> Self {
        LinearAmortizer {
            interest_deduction_pct,
        }
    }
}

fn monthly_principal(terms: &LoanTerms) -> Decimal {
    terms.principal / Decimal::from(terms.months())
}

impl Amortizer for LinearAmortizer {
    fn kind(&self) -> AmortizationKind {
        AmortizationKind::Linear
    }

    fn schedule(&self, terms: &LoanTerms) -> HuisfinResult<Vec<ScheduleRow>> {
        terms.validate()?;

        let principal_slice = monthly_principal(terms);
        let mut remaining = terms.principal;
        let mut rows = Vec::with_capacity(terms.months() as usize);

        for month in 1..=terms.months() {
            let interest = remaining * terms.monthly_rate();
            remaining -= principal_slice;
            rows.push(ScheduleRow {
                month,
                payment: principal_slice + interest,
                interest,
                principal: principal_slice,
                tax_relief: tax_relief(interest, self.interest_deduction_pct),
                balance: remaining,
            });
        }

        Ok(rows)
    }

    fn amortize(&self, terms: &LoanTerms) -> HuisfinResult<AmortizationResult> {
        let rows = self.schedule(terms)?;

        let principal_slice = monthly_principal(terms);
        let initial_payment = principal_slice + terms.principal * terms.monthly_rate();
        // Interest on the last slice only, not the simulated last month.
        let final_payment = principal_slice + principal_slice * terms.monthly_rate();

        let total_interest = column_total(&rows, terms, |r| r.interest)?;
        let total_tax_relief = column_total(&rows, terms, |r| r.tax_relief)?;
        let ending_balance = rows.last().map(|r| r.balance).unwrap_or(terms.principal);

        debug!(
            "linear {} over {} months: initial {initial_payment}, final {final_payment}, interest {total_interest}",
            terms.principal,
            terms.months()
        );

        AmortizationResult::summarise(
            AmortizationKind::Linear,
            terms,
            initial_payment,
            Some(final_payment),
            Some(principal_slice),
            total_interest,
            total_tax_relief,
            ending_balance,
        )
    }
}

/// Linear amortization with the statutory interest deduction.
pub fn amortize_linear(terms: &LoanTerms) -> HuisfinResult<AmortizationResult> {
    LinearAmortizer::default().amortize(terms)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::HuisfinError;
    use rust_decimal_macros::dec;

    const TOL: Decimal = dec!(0.000001);

    fn assert_close(actual: Decimal, expected: Decimal, tol: Decimal, msg: &str) {
        let diff = (actual - expected).abs();
        assert!(
            diff <= tol,
            "{}: expected ~{}, got {} (diff = {})",
            msg,
            expected,
            actual,
            diff
        );
    }

    fn terms(principal: Decimal, annual_rate: Decimal, years: u32) -> LoanTerms {
        LoanTerms {
            principal,
            annual_rate,
            years,
        }
    }

    #[test]
    fn test_linear_payment_formulas() {
        let t = terms(dec!(100_000), dec!(0.04), 10);
        let r = amortize_linear(&t).unwrap();

        let mp = dec!(100_000) / dec!(120);
        assert_eq!(r.monthly_principal, Some(mp));
        assert_eq!(r.initial_payment, mp + dec!(100_000) * t.monthly_rate());
        assert_eq!(r.final_payment, Some(mp + mp * t.monthly_rate()));
        assert_close(r.initial_payment, dec!(1166.666667), TOL, "initial payment");
    }

    #[test]
    fn test_linear_end_to_end_200k_5pct_10y() {
        let t = terms(dec!(200_000), dec!(0.05), 10);
        let r = amortize_linear(&t).unwrap();
        let mp = r.monthly_principal.unwrap();
        let final_payment = r.final_payment.unwrap();

        assert!(r.total_interest > Decimal::ZERO);
        assert!(r.initial_payment > final_payment);
        assert_close(
            final_payment - mp,
            mp * dec!(0.05) / dec!(12),
            TOL,
            "final payment interest",
        );
        assert_close(
            r.initial_payment - final_payment,
            (dec!(200_000) - mp) * dec!(0.05) / dec!(12),
            TOL,
            "payment decrease",
        );
        // Sum of interest on a linearly falling balance: P * r/12 * (N + 1) / 2
        assert_close(
            r.total_interest,
            dec!(200_000) * dec!(0.05) / dec!(12) * dec!(121) / dec!(2),
            dec!(0.0001),
            "total interest",
        );
    }

    #[test]
    fn test_linear_tax_relief_is_share_of_interest() {
        let t = terms(dec!(200_000), dec!(0.05), 10);
        let r = amortize_linear(&t).unwrap();
        assert!(r.total_tax_relief > Decimal::ZERO);
        assert!(r.total_tax_relief < r.total_interest);
        assert_close(
            r.total_tax_relief,
            r.total_interest * INTEREST_DEDUCTION_PCT / dec!(100),
            TOL,
            "tax relief",
        );
        assert_eq!(r.net_interest, r.total_interest - r.total_tax_relief);
        assert_eq!(r.total_paid, dec!(200_000) + r.total_interest);
    }

    #[test]
    fn test_linear_zero_rate() {
        let t = terms(dec!(100_000), Decimal::ZERO, 10);
        let r = amortize_linear(&t).unwrap();
        assert_eq!(r.total_interest, Decimal::ZERO);
        assert_eq!(r.total_tax_relief, Decimal::ZERO);
        assert_eq!(Some(r.initial_payment), r.final_payment);
        assert_eq!(r.payment_decrease, Some(Decimal::ZERO));
    }

    #[test]
    fn test_linear_initial_at_least_final() {
        for (rate, years) in [
            (dec!(0.001), 10),
            (dec!(0.03), 5),
            (dec!(0.05), 1),
            (dec!(0.04), 30),
            (dec!(0.12), 20),
        ] {
            let r = amortize_linear(&terms(dec!(250_000), rate, years)).unwrap();
            assert!(
                r.initial_payment > r.final_payment.unwrap(),
                "rate {rate}, years {years}"
            );
        }
    }

    #[test]
    fn test_linear_schedule_payments_non_increasing() {
        let t = terms(dec!(180_000), dec!(0.045), 15);
        let rows = LinearAmortizer::default().schedule(&t).unwrap();
        assert_eq!(rows.len(), 180);
        assert!(rows.windows(2).all(|w| w[1].payment <= w[0].payment));
        assert_close(rows[179].balance, Decimal::ZERO, TOL, "ending balance");
    }

    #[test]
    fn test_linear_simulated_last_payment_matches_final_formula() {
        let t = terms(dec!(200_000), dec!(0.05), 10);
        let rows = LinearAmortizer::default().schedule(&t).unwrap();
        let r = amortize_linear(&t).unwrap();
        assert_close(
            rows[119].payment,
            r.final_payment.unwrap(),
            TOL,
            "last month payment",
        );
        assert_eq!(rows[0].payment, r.initial_payment);
    }

    #[test]
    fn test_linear_custom_deduction() {
        let t = terms(dec!(100_000), dec!(0.04), 10);
        let none = LinearAmortizer::new(Decimal::ZERO).amortize(&t).unwrap();
        assert_eq!(none.total_tax_relief, Decimal::ZERO);
        assert_eq!(none.net_paid, none.total_paid);
    }

    #[test]
    fn test_linear_huge_principal_is_invalid_input() {
        // Fits a Decimal, but 30 years of interest at 50% does not.
        let t = terms(dec!(70_000_000_000_000_000_000_000_000_000), dec!(0.5), 30);
        let err = amortize_linear(&t).unwrap_err();
        assert!(matches!(err, HuisfinError::InvalidInput { ref field, .. } if field == "principal"));
    }

    #[test]
    fn test_linear_rejects_zero_term() {
        let err = amortize_linear(&terms(dec!(100_000), dec!(0.04), 0)).unwrap_err();
        assert!(matches!(err, HuisfinError::InvalidInput { .. }));
    }
}
