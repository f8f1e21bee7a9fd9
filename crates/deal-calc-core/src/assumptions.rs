//! Default underwriting assumptions.
//!
//! Every number the calculators fall back to lives here as a named constant,
//! and every constant can be overridden through [`Assumptions`], which
//! deserializes with `#[serde(default)]` so a partial config file only needs
//! the fields it changes.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::error::{ensure_percent, DealCalcError};
use crate::quick::RentEstimateCoefficients;
use crate::types::{Money, Percent, Ratio};
use crate::DealCalcResult;

/// Annual property tax as a percentage of purchase price.
pub const DEFAULT_TAX_RATE_PERCENT: Percent = dec!(1.25);
/// Annual hazard insurance premium as a percentage of purchase price.
pub const DEFAULT_INSURANCE_RATE_PERCENT: Percent = dec!(0.5);
/// Coverage at or above this is reported as Strong.
pub const STRONG_DSCR: Ratio = dec!(1.25);
/// Lender minimum; coverage below this fails qualification.
pub const MIN_QUALIFYING_DSCR: Ratio = dec!(1.10);
pub const DEFAULT_DOWN_PAYMENT_PERCENT: Percent = dec!(25);
pub const DEFAULT_INTEREST_RATE_PERCENT: Percent = dec!(7.5);
pub const DEFAULT_LOAN_TERM_YEARS: u32 = 30;
/// Largest amount any money field accepts (one trillion). Keeps every
/// intermediate product well inside `Decimal` range.
pub const MAX_AMOUNT: Money = dec!(1000000000000);
/// Longest loan term, and longest flip holding period, in years.
pub const MAX_TERM_YEARS: u32 = 100;

/// Classification breakpoints for DSCR. Both bounds are inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DscrThresholds {
    /// `dscr >= strong` is Strong
    pub strong: Ratio,
    /// `minimum <= dscr < strong` is Acceptable; also the qualification line
    pub minimum: Ratio,
}

impl Default for DscrThresholds {
    fn default() -> Self {
        DscrThresholds {
            strong: STRONG_DSCR,
            minimum: MIN_QUALIFYING_DSCR,
        }
    }
}

impl DscrThresholds {
    pub fn validate(&self) -> DealCalcResult<()> {
        if self.minimum <= Decimal::ZERO {
            return Err(DealCalcError::invalid(
                "thresholds.minimum",
                "Qualifying DSCR must be positive",
            ));
        }
        if self.strong < self.minimum {
            return Err(DealCalcError::invalid(
                "thresholds.strong",
                format!(
                    "Strong breakpoint {} is below the qualifying minimum {}",
                    self.strong, self.minimum
                ),
            ));
        }
        Ok(())
    }
}

/// Loan terms assumed when a property has no financing entered yet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoanDefaults {
    pub down_payment_percent: Percent,
    pub interest_rate: Percent,
    pub loan_term_years: u32,
}

impl Default for LoanDefaults {
    fn default() -> Self {
        LoanDefaults {
            down_payment_percent: DEFAULT_DOWN_PAYMENT_PERCENT,
            interest_rate: DEFAULT_INTEREST_RATE_PERCENT,
            loan_term_years: DEFAULT_LOAN_TERM_YEARS,
        }
    }
}

/// The full set of tunable business parameters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Assumptions {
    pub tax_rate_percent: Percent,
    pub insurance_rate_percent: Percent,
    pub thresholds: DscrThresholds,
    pub loan: LoanDefaults,
    pub rent: RentEstimateCoefficients,
}

impl Default for Assumptions {
    fn default() -> Self {
        Assumptions {
            tax_rate_percent: DEFAULT_TAX_RATE_PERCENT,
            insurance_rate_percent: DEFAULT_INSURANCE_RATE_PERCENT,
            thresholds: DscrThresholds::default(),
            loan: LoanDefaults::default(),
            rent: RentEstimateCoefficients::default(),
        }
    }
}

impl Assumptions {
    pub fn validate(&self) -> DealCalcResult<()> {
        ensure_percent("tax_rate_percent", self.tax_rate_percent)?;
        ensure_percent("insurance_rate_percent", self.insurance_rate_percent)?;
        self.thresholds.validate()?;
        ensure_percent("loan.down_payment_percent", self.loan.down_payment_percent)?;
        ensure_percent("loan.interest_rate", self.loan.interest_rate)?;
        if self.loan.loan_term_years == 0 || self.loan.loan_term_years > MAX_TERM_YEARS {
            return Err(DealCalcError::invalid(
                "loan.loan_term_years",
                format!("Loan term must be between 1 and {MAX_TERM_YEARS} years"),
            ));
        }
        self.rent.validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_defaults_validate() {
        assert!(Assumptions::default().validate().is_ok());
    }

    #[test]
    fn test_partial_json_keeps_other_defaults() {
        let json = r#"{ "tax_rate_percent": "2.1", "thresholds": { "minimum": "1.2" } }"#;
        let a: Assumptions = serde_json::from_str(json).unwrap();

        assert_eq!(a.tax_rate_percent, dec!(2.1));
        assert_eq!(a.insurance_rate_percent, DEFAULT_INSURANCE_RATE_PERCENT);
        assert_eq!(a.thresholds.minimum, dec!(1.2));
        assert_eq!(a.thresholds.strong, STRONG_DSCR);
        assert_eq!(a.loan, LoanDefaults::default());
    }

    #[test]
    fn test_inverted_thresholds_rejected() {
        let t = DscrThresholds {
            strong: dec!(1.0),
            minimum: dec!(1.2),
        };
        assert!(t.validate().is_err());
    }

    #[test]
    fn test_zero_default_term_rejected() {
        let mut a = Assumptions::default();
        a.loan.loan_term_years = 0;
        assert!(matches!(
            a.validate(),
            Err(DealCalcError::InvalidInput { ref field, .. }) if field == "loan.loan_term_years"
        ));
    }

    #[test]
    fn test_century_plus_default_term_rejected() {
        let mut a = Assumptions::default();
        a.loan.loan_term_years = MAX_TERM_YEARS + 1;
        assert!(a.validate().is_err());
    }
}
