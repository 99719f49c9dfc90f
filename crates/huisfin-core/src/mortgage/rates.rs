//! Mortgage interest rate lookup by fixed-rate term and loan-to-value.
//!
//! The table is a complete 6×5 matrix in percentage points. Raw inputs are
//! first classified into a [`TermBucket`] and an [`LtvBucket`]; the lookup
//! itself cannot fail once both buckets are known.

use log::{debug, warn};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use std::time::Instant;

use crate::error::HuisfinError;
use crate::types::{with_metadata, ComputationOutput, Rate};
use crate::HuisfinResult;

// ---------------------------------------------------------------------------
// Buckets
// ---------------------------------------------------------------------------

/// Fixed-rate period a rate applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum TermBucket {
    Variable,
    #[serde(rename = "5")]
    Five,
    #[serde(rename = "10")]
    Ten,
    #[serde(rename = "15")]
    Fifteen,
    #[serde(rename = "20")]
    Twenty,
    #[serde(rename = "30")]
    Thirty,
}

impl TermBucket {
    pub const ALL: [TermBucket; 6] = [
        TermBucket::Variable,
        TermBucket::Five,
        TermBucket::Ten,
        TermBucket::Fifteen,
        TermBucket::Twenty,
        TermBucket::Thirty,
    ];

    /// Classify a term in years. The value is truncated towards zero first;
    /// anything up to one year, including zero and negative terms, is
    /// `Variable`.
    pub fn classify(years: Decimal) -> TermBucket {
        let whole = years.trunc();
        if whole <= dec!(1) {
            TermBucket::Variable
        } else if whole <= dec!(5) {
            TermBucket::Five
        } else if whole <= dec!(10) {
            TermBucket::Ten
        } else if whole <= dec!(15) {
            TermBucket::Fifteen
        } else if whole <= dec!(20) {
            TermBucket::Twenty
        } else {
            TermBucket::Thirty
        }
    }

    pub fn key(&self) -> &'static str {
        match self {
            TermBucket::Variable => "Variable",
            TermBucket::Five => "5",
            TermBucket::Ten => "10",
            TermBucket::Fifteen => "15",
            TermBucket::Twenty => "20",
            TermBucket::Thirty => "30",
        }
    }

    fn index(&self) -> usize {
        *self as usize
    }
}

impl fmt::Display for TermBucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// Loan-to-value risk class, ordered from least to most risky.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum LtvBucket {
    #[serde(rename = "NHG")]
    Nhg,
    #[serde(rename = "≤65%")]
    UpTo65,
    #[serde(rename = "≤85%")]
    UpTo85,
    #[serde(rename = "≤90%")]
    UpTo90,
    #[serde(rename = ">90%")]
    Above90,
}

impl LtvBucket {
    pub const ALL: [LtvBucket; 5] = [
        LtvBucket::Nhg,
        LtvBucket::UpTo65,
        LtvBucket::UpTo85,
        LtvBucket::UpTo90,
        LtvBucket::Above90,
    ];

    /// Classify a financed fraction. Only (0, 1] is accepted.
    pub fn classify_ratio(ratio: Decimal) -> HuisfinResult<LtvBucket> {
        if ratio <= Decimal::ZERO || ratio > Decimal::ONE {
            return Err(HuisfinError::invalid(
                "ltv",
                format!("Loan-to-value must be in (0, 1] or NHG, got {ratio}"),
            ));
        }
        let bucket = if ratio <= dec!(0.65) {
            LtvBucket::UpTo65
        } else if ratio <= dec!(0.85) {
            LtvBucket::UpTo85
        } else if ratio <= dec!(0.90) {
            LtvBucket::UpTo90
        } else {
            LtvBucket::Above90
        };
        Ok(bucket)
    }

    pub fn classify(ltv: &LtvInput) -> HuisfinResult<LtvBucket> {
        match ltv {
            LtvInput::GovernmentBacked => Ok(LtvBucket::Nhg),
            LtvInput::Ratio(ratio) => LtvBucket::classify_ratio(*ratio),
        }
    }

    pub fn key(&self) -> &'static str {
        match self {
            LtvBucket::Nhg => "NHG",
            LtvBucket::UpTo65 => "≤65%",
            LtvBucket::UpTo85 => "≤85%",
            LtvBucket::UpTo90 => "≤90%",
            LtvBucket::Above90 => ">90%",
        }
    }

    fn index(&self) -> usize {
        *self as usize
    }
}

impl fmt::Display for LtvBucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

// ---------------------------------------------------------------------------
// LTV input
// ---------------------------------------------------------------------------

/// Either a financed fraction of the house price or the NHG guarantee.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "LtvToken", into = "String")]
pub enum LtvInput {
    Ratio(Decimal),
    GovernmentBacked,
}

/// Literal markers accepted for a government-backed loan. Matched exactly.
pub const GOVERNMENT_BACKED_MARKERS: [&str; 2] = ["NHG", "government-backed"];

impl FromStr for LtvInput {
    type Err = HuisfinError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if GOVERNMENT_BACKED_MARKERS.contains(&s) {
            return Ok(LtvInput::GovernmentBacked);
        }
        Decimal::from_str(s).map(LtvInput::Ratio).map_err(|_| {
            HuisfinError::invalid(
                "ltv",
                format!("Unrecognised loan-to-value '{s}'; expected a ratio, NHG or government-backed"),
            )
        })
    }
}

impl From<LtvInput> for String {
    fn from(ltv: LtvInput) -> Self {
        match ltv {
            LtvInput::Ratio(r) => r.to_string(),
            LtvInput::GovernmentBacked => "NHG".to_string(),
        }
    }
}

/// Wire form of [`LtvInput`]: a number, a numeric string or a marker.
#[derive(Deserialize)]
#[serde(untagged)]
enum LtvToken {
    Ratio(Decimal),
    Marker(String),
}

impl TryFrom<LtvToken> for LtvInput {
    type Error = HuisfinError;

    fn try_from(token: LtvToken) -> Result<Self, Self::Error> {
        match token {
            LtvToken::Ratio(r) => Ok(LtvInput::Ratio(r)),
            LtvToken::Marker(s) => s.parse(),
        }
    }
}

// ---------------------------------------------------------------------------
// Rate table
// ---------------------------------------------------------------------------

type RateGrid = BTreeMap<TermBucket, BTreeMap<LtvBucket, Rate>>;

/// Annual mortgage rates in percentage points (3.45 = 3.45%).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RateGrid", into = "RateGrid")]
pub struct RateTable {
    rates: [[Rate; 5]; 6],
}

/// Rates offered on Dutch owner-occupied mortgages.
pub static DUTCH_RATE_TABLE: RateTable = RateTable {
    rates: [
        // NHG, ≤65%, ≤85%, ≤90%, >90%
        [dec!(4.40), dec!(4.52), dec!(4.64), dec!(4.76), dec!(4.88)],
        [dec!(3.45), dec!(3.58), dec!(3.70), dec!(3.82), dec!(3.94)],
        [dec!(3.52), dec!(3.66), dec!(3.79), dec!(3.91), dec!(4.03)],
        [dec!(3.70), dec!(3.84), dec!(3.96), dec!(4.08), dec!(4.20)],
        [dec!(3.75), dec!(3.89), dec!(4.01), dec!(4.13), dec!(4.25)],
        [dec!(3.85), dec!(3.98), dec!(4.10), dec!(4.22), dec!(4.34)],
    ],
};

impl Default for RateTable {
    fn default() -> Self {
        DUTCH_RATE_TABLE.clone()
    }
}

impl RateTable {
    pub fn rate(&self, term: TermBucket, ltv: LtvBucket) -> Rate {
        self.rates[term.index()][ltv.index()]
    }

    /// Whether rates never decrease as LTV risk increases, for every term.
    /// Reported only; lookups do not depend on it.
    pub fn is_risk_monotone(&self) -> bool {
        self.rates
            .iter()
            .all(|row| row.windows(2).all(|w| w[0] <= w[1]))
    }
}

impl TryFrom<RateGrid> for RateTable {
    type Error = HuisfinError;

    fn try_from(grid: RateGrid) -> Result<Self, Self::Error> {
        let mut rates = [[Decimal::ZERO; 5]; 6];
        for term in TermBucket::ALL {
            let row = grid.get(&term).ok_or_else(|| {
                HuisfinError::invalid("rate_table", format!("Missing term bucket '{term}'"))
            })?;
            for ltv in LtvBucket::ALL {
                let rate = row.get(&ltv).ok_or_else(|| {
                    HuisfinError::invalid(
                        "rate_table",
                        format!("Missing rate for term '{term}' and LTV '{ltv}'"),
                    )
                })?;
                if *rate < Decimal::ZERO {
                    return Err(HuisfinError::invalid(
                        "rate_table",
                        format!("Negative rate for term '{term}' and LTV '{ltv}'"),
                    ));
                }
                rates[term.index()][ltv.index()] = *rate;
            }
        }
        Ok(RateTable { rates })
    }
}

impl From<RateTable> for RateGrid {
    fn from(table: RateTable) -> Self {
        TermBucket::ALL
            .iter()
            .map(|term| {
                let row = LtvBucket::ALL
                    .iter()
                    .map(|ltv| (*ltv, table.rate(*term, *ltv)))
                    .collect();
                (*term, row)
            })
            .collect()
    }
}

// ---------------------------------------------------------------------------
// Resolution
// ---------------------------------------------------------------------------

/// Buckets selected for a loan and the rate they map to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RateResolution {
    pub term_bucket: TermBucket,
    pub ltv_bucket: LtvBucket,
    /// Annual rate in percentage points.
    pub annual_rate_pct: Rate,
}

/// Resolve the annual rate (percentage points) for a term and LTV.
///
/// LTV classification is the only failure point; every term maps to a bucket.
pub fn resolve(
    table: &RateTable,
    term_years: Decimal,
    ltv: &LtvInput,
) -> HuisfinResult<RateResolution> {
    let ltv_bucket = LtvBucket::classify(ltv)?;
    let term_bucket = TermBucket::classify(term_years);
    if falls_back_to_variable(term_years) {
        warn!("non-positive term of {term_years} years classified as Variable");
    }

    let annual_rate_pct = table.rate(term_bucket, ltv_bucket);
    debug!("resolved term {term_bucket} / LTV {ltv_bucket} to {annual_rate_pct}%");

    Ok(RateResolution {
        term_bucket,
        ltv_bucket,
        annual_rate_pct,
    })
}

/// Non-positive terms have no fixed-rate period and are priced as Variable.
fn falls_back_to_variable(term_years: Decimal) -> bool {
    term_years <= Decimal::ZERO
}

/// Input for a standalone rate lookup.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RateLookupInput {
    pub term_years: Decimal,
    pub ltv: LtvInput,
}

/// Look up a rate and wrap it in the standard output envelope.
pub fn lookup_rate(
    input: &RateLookupInput,
    table: &RateTable,
) -> HuisfinResult<ComputationOutput<RateResolution>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    let resolution = resolve(table, input.term_years, &input.ltv)?;
    if falls_back_to_variable(input.term_years) {
        warnings.push(format!(
            "Term of {} years is not positive and uses the variable rate",
            input.term_years
        ));
    }

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Rate table lookup by fixed-rate term and loan-to-value",
        input,
        warnings,
        elapsed,
        resolution,
    ))
}
