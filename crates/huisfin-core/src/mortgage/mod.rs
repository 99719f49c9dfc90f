pub mod annuity;
pub mod linear;
pub mod plan;
pub mod rates;

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::error::HuisfinError;
use crate::types::{Money, Rate, MONTHS_IN_YEAR};
use crate::HuisfinResult;

pub use annuity::{amortize_annuity, AnnuityAmortizer};
pub use linear::{amortize_linear, LinearAmortizer};
pub use plan::{plan_mortgage, plan_mortgage_with, MortgageInput, MortgagePlan};
pub use rates::{resolve, LtvBucket, LtvInput, RateResolution, RateTable, TermBucket};

/// Share of paid mortgage interest deductible from income tax, in percent.
pub const INTEREST_DEDUCTION_PCT: Decimal = dec!(36.97);

/// Longest term accepted by the amortizers.
pub const MAX_TERM_YEARS: u32 = 100;

/// Principal, rate and term of a single loan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoanTerms {
    pub principal: Money,
    /// Annual rate as a decimal fraction (0.05 = 5%).
    pub annual_rate: Rate,
    pub years: u32,
}

impl LoanTerms {
    pub fn months(&self) -> u32 {
        self.years * MONTHS_IN_YEAR
    }

    pub fn monthly_rate(&self) -> Rate {
        self.annual_rate / Decimal::from(MONTHS_IN_YEAR)
    }

    pub(crate) fn validate(&self) -> HuisfinResult<()> {
        if self.principal <= Decimal::ZERO {
            return Err(HuisfinError::invalid(
                "principal",
                "Financed amount must be positive",
            ));
        }
        if self.annual_rate < Decimal::ZERO || self.annual_rate > Decimal::ONE {
            return Err(HuisfinError::invalid(
                "annual_rate",
                "Annual rate must be between 0 and 1",
            ));
        }
        if self.years == 0 || self.years > MAX_TERM_YEARS {
            return Err(HuisfinError::invalid(
                "years",
                format!("Term must be between 1 and {MAX_TERM_YEARS} years"),
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AmortizationKind {
    Linear,
    Annuity,
}

/// Summary of a full amortization schedule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AmortizationResult {
    pub kind: AmortizationKind,
    pub principal: Money,
    pub annual_rate: Rate,
    pub term_years: u32,
    pub months: u32,
    /// First monthly payment; the constant payment for an annuity.
    pub initial_payment: Money,
    /// Last monthly payment. Linear only.
    pub final_payment: Option<Money>,
    /// Constant principal part of every payment. Linear only.
    pub monthly_principal: Option<Money>,
    /// Drop from the first to the last payment. Linear only.
    pub payment_decrease: Option<Money>,
    pub total_interest: Money,
    pub total_tax_relief: Money,
    /// Interest after tax relief.
    pub net_interest: Money,
    /// Principal plus interest.
    pub total_paid: Money,
    /// Total paid after tax relief.
    pub net_paid: Money,
    /// Simulated balance after the last month.
    pub ending_balance: Money,
}

impl AmortizationResult {
    #[allow(clippy::too_many_arguments)]
    pub(crate) fn summarise(
        kind: AmortizationKind,
        terms: &LoanTerms,
        initial_payment: Money,
        final_payment: Option<Money>,
        monthly_principal: Option<Money>,
        total_interest: Money,
        total_tax_relief: Money,
        ending_balance: Money,
    ) -> HuisfinResult<Self> {
        let total_paid = terms
            .principal
            .checked_add(total_interest)
            .ok_or_else(|| too_large(terms))?;
        let net_paid = total_paid
            .checked_sub(total_tax_relief)
            .ok_or_else(|| too_large(terms))?;
        Ok(AmortizationResult {
            kind,
            principal: terms.principal,
            annual_rate: terms.annual_rate,
            term_years: terms.years,
            months: terms.months(),
            initial_payment,
            final_payment,
            monthly_principal,
            payment_decrease: final_payment.map(|f| initial_payment - f),
            total_interest,
            total_tax_relief,
            net_interest: total_interest - total_tax_relief,
            total_paid,
            net_paid,
            ending_balance,
        })
    }
}

/// One month of a repayment schedule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduleRow {
    /// 1-based month number.
    pub month: u32,
    pub payment: Money,
    pub interest: Money,
    pub principal: Money,
    pub tax_relief: Money,
    /// Balance left after this month's principal.
    pub balance: Money,
}

/// A repayment scheme that turns loan terms into a schedule summary.
pub trait Amortizer {
    fn kind(&self) -> AmortizationKind;

    /// Month-by-month rows of the schedule.
    fn schedule(&self, terms: &LoanTerms) -> HuisfinResult<Vec<ScheduleRow>>;

    fn amortize(&self, terms: &LoanTerms) -> HuisfinResult<AmortizationResult>;
}

/// Sum one column of a schedule. Overflow is reported against the principal.
pub(crate) fn column_total(
    rows: &[ScheduleRow],
    terms: &LoanTerms,
    column: impl Fn(&ScheduleRow) -> Money,
) -> HuisfinResult<Money> {
    rows.iter()
        .try_fold(Decimal::ZERO, |acc, row| acc.checked_add(column(row)))
        .ok_or_else(|| too_large(terms))
}

pub(crate) fn too_large(terms: &LoanTerms) -> HuisfinError {
    HuisfinError::invalid(
        "principal",
        format!(
            "Totals for a principal of {} over {} years exceed decimal range",
            terms.principal, terms.years
        ),
    )
}

/// Tax relief on one month of interest.
pub(crate) fn tax_relief(interest: Money, deduction_pct: Decimal) -> Money {
    interest * (deduction_pct / dec!(100))
}
