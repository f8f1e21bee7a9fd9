use rust_decimal::{Decimal, MathematicalOps};
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::assumptions::MAX_TERM_YEARS;
use crate::error::{ensure_amount, ensure_non_negative, DealCalcError};
use crate::types::{percent_to_fraction, Money, Percent};
use crate::DealCalcResult;

const MONTHS_PER_YEAR: u32 = 12;

/// One year of a fixed-rate amortization schedule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AmortizationYear {
    pub year: u32,
    pub principal_paid: Money,
    pub interest_paid: Money,
    pub ending_balance: Money,
}

/// Yearly amortization summary for a fully amortizing loan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AmortizationSchedule {
    pub monthly_payment: Money,
    pub total_interest: Money,
    pub total_paid: Money,
    pub years: Vec<AmortizationYear>,
}

/// Monthly rate as a fraction: 7.5 (% per year) -> 0.00625.
pub fn monthly_rate(annual_rate_percent: Percent) -> Decimal {
    percent_to_fraction(annual_rate_percent) / dec!(12)
}

/// Number of monthly payments for a term in years. Terms outside
/// 1..=[`MAX_TERM_YEARS`] are rejected.
pub fn payment_count(term_years: u32) -> DealCalcResult<u32> {
    if term_years == 0 {
        return Err(DealCalcError::invalid(
            "loan_term_years",
            "Loan term must be a positive number of years",
        ));
    }
    if term_years > MAX_TERM_YEARS {
        return Err(DealCalcError::invalid(
            "loan_term_years",
            format!("Loan term must not exceed {MAX_TERM_YEARS} years, got {term_years}"),
        ));
    }
    Ok(term_years * MONTHS_PER_YEAR)
}

/// Standard fixed-rate mortgage payment (principal and interest):
/// `P * r(1+r)^n / ((1+r)^n - 1)`, or `P / n` when the rate is zero.
pub fn monthly_payment(
    principal: Money,
    annual_rate_percent: Percent,
    term_years: u32,
) -> DealCalcResult<Money> {
    ensure_amount("principal", principal)?;
    ensure_non_negative("interest_rate", annual_rate_percent)?;
    let n = payment_count(term_years)?;
    let r = monthly_rate(annual_rate_percent);

    if r.is_zero() {
        return Ok(principal / Decimal::from(n));
    }

    let compound = compound_factor(r, n)?;
    let denominator = compound - Decimal::ONE;
    if denominator.is_zero() {
        return Err(DealCalcError::FinancialImpossibility(
            "mortgage payment denominator underflowed to zero".into(),
        ));
    }

    principal
        .checked_mul(r)
        .and_then(|v| v.checked_mul(compound))
        .map(|v| v / denominator)
        .ok_or_else(|| {
            DealCalcError::FinancialImpossibility(format!(
                "mortgage payment on {principal} at {annual_rate_percent}% overflows"
            ))
        })
}

/// Outstanding balance after `months_paid` scheduled payments.
pub fn remaining_balance(
    principal: Money,
    annual_rate_percent: Percent,
    term_years: u32,
    months_paid: u32,
) -> DealCalcResult<Money> {
    let n = payment_count(term_years)?;
    let payment = monthly_payment(principal, annual_rate_percent, term_years)?;
    if months_paid >= n {
        return Ok(Decimal::ZERO);
    }

    let r = monthly_rate(annual_rate_percent);
    let mut balance = principal;
    for _ in 0..months_paid {
        balance -= payment - balance * r;
        if balance < Decimal::ZERO {
            return Ok(Decimal::ZERO);
        }
    }
    Ok(balance)
}

/// Build a year-by-year schedule. The final payment absorbs any residual so
/// the closing balance is exactly zero.
pub fn amortization_schedule(
    principal: Money,
    annual_rate_percent: Percent,
    term_years: u32,
) -> DealCalcResult<AmortizationSchedule> {
    let n = payment_count(term_years)?;
    let payment = monthly_payment(principal, annual_rate_percent, term_years)?;
    let r = monthly_rate(annual_rate_percent);

    let mut balance = principal;
    let mut years = Vec::with_capacity(term_years as usize);
    let mut total_interest = Decimal::ZERO;
    let mut total_paid = Decimal::ZERO;
    let mut year_principal = Decimal::ZERO;
    let mut year_interest = Decimal::ZERO;

    for month in 1..=n {
        let interest = balance * r;
        let principal_part = if month == n {
            balance
        } else {
            (payment - interest).min(balance)
        };
        balance -= principal_part;

        year_principal += principal_part;
        year_interest += interest;
        total_interest += interest;
        total_paid += principal_part + interest;

        if month % MONTHS_PER_YEAR == 0 {
            years.push(AmortizationYear {
                year: month / MONTHS_PER_YEAR,
                principal_paid: year_principal,
                interest_paid: year_interest,
                ending_balance: balance,
            });
            year_principal = Decimal::ZERO;
            year_interest = Decimal::ZERO;
        }
    }

    Ok(AmortizationSchedule {
        monthly_payment: payment,
        total_interest,
        total_paid,
        years,
    })
}

/// (1 + r)^n, failing on overflow.
fn compound_factor(r: Decimal, n: u32) -> DealCalcResult<Decimal> {
    (Decimal::ONE + r)
        .checked_powu(u64::from(n))
        .ok_or_else(|| DealCalcError::overflow(&format!("compounding {r} over {n} periods")))
}
