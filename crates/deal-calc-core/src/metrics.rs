use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use crate::assumptions::{DEFAULT_INSURANCE_RATE_PERCENT, DEFAULT_TAX_RATE_PERCENT};
use crate::error::{ensure_amount, ensure_non_negative, ensure_percent, DealCalcError};
use crate::types::{percent_to_fraction, Money, Percent};
use crate::DealCalcResult;

/// Monthly property tax at the default annual rate (1.25% of price).
pub fn estimate_monthly_taxes(purchase_price: Money) -> DealCalcResult<Money> {
    estimate_monthly_taxes_with(purchase_price, DEFAULT_TAX_RATE_PERCENT)
}

pub fn estimate_monthly_taxes_with(
    purchase_price: Money,
    annual_tax_rate_percent: Percent,
) -> DealCalcResult<Money> {
    ensure_amount("purchase_price", purchase_price)?;
    ensure_percent("tax_rate_percent", annual_tax_rate_percent)?;
    Ok(purchase_price * percent_to_fraction(annual_tax_rate_percent) / dec!(12))
}

/// Monthly insurance premium at the default annual rate (0.5% of price).
pub fn estimate_monthly_insurance(purchase_price: Money) -> DealCalcResult<Money> {
    estimate_monthly_insurance_with(purchase_price, DEFAULT_INSURANCE_RATE_PERCENT)
}

pub fn estimate_monthly_insurance_with(
    purchase_price: Money,
    annual_insurance_rate_percent: Percent,
) -> DealCalcResult<Money> {
    ensure_amount("purchase_price", purchase_price)?;
    ensure_percent("insurance_rate_percent", annual_insurance_rate_percent)?;
    Ok(purchase_price * percent_to_fraction(annual_insurance_rate_percent) / dec!(12))
}

/// Loan-to-value as a percentage, rounded to one decimal place.
/// Zero when there is no purchase price to measure against.
pub fn calculate_ltv(loan_amount: Money, purchase_price: Money) -> DealCalcResult<Percent> {
    ensure_amount("loan_amount", loan_amount)?;
    ensure_amount("purchase_price", purchase_price)?;
    if purchase_price.is_zero() {
        return Ok(Decimal::ZERO);
    }
    percent_of(loan_amount, purchase_price, "loan-to-value").map(|ltv| ltv.round_dp(1))
}

/// Cash-on-cash return as a percentage. The cash flow may be negative;
/// the cash invested may not.
pub fn calculate_cash_on_cash(
    annual_net_cash_flow: Money,
    cash_invested: Money,
) -> DealCalcResult<Percent> {
    ensure_non_negative("cash_invested", cash_invested)?;
    if cash_invested.is_zero() {
        return Ok(Decimal::ZERO);
    }
    percent_of(annual_net_cash_flow, cash_invested, "cash-on-cash return")
}

/// `part / whole * 100`, failing instead of panicking on overflow.
pub(crate) fn percent_of(part: Decimal, whole: Decimal, what: &str) -> DealCalcResult<Percent> {
    part.checked_div(whole)
        .and_then(|v| v.checked_mul(Decimal::ONE_HUNDRED))
        .ok_or_else(|| DealCalcError::overflow(what))
}
