use rust_decimal::{Decimal, RoundingStrategy};
use tracing::warn;

use crate::error::DealCalcError;
use crate::types::{Currency, Money, Percent};
use crate::DealCalcResult;

/// Whole-unit USD with thousands separators: `1835.44` -> `"$1,835"`.
pub fn format_currency(amount: Money) -> String {
    format_currency_in(amount, &Currency::USD, 0)
}

/// Format an amount in `currency` with `decimals` places. Midpoints round
/// away from zero, so `2.5` shows as `3` the way the deal pages do.
pub fn format_currency_in(amount: Money, currency: &Currency, decimals: u32) -> String {
    let rounded = amount.round_dp_with_strategy(decimals, RoundingStrategy::MidpointAwayFromZero);
    let sign = if rounded < Decimal::ZERO { "-" } else { "" };

    let digits = format!("{:.*}", decimals as usize, rounded.abs());
    let (whole, frac) = match digits.split_once('.') {
        Some((w, f)) => (w, Some(f)),
        None => (digits.as_str(), None),
    };

    let mut out = format!("{sign}{}{}", currency.symbol(), group_thousands(whole));
    if let Some(f) = frac {
        out.push('.');
        out.push_str(f);
    }
    out
}

/// `7.456` -> `"7.5%"` at one decimal place.
pub fn format_percent(value: Percent, decimals: u32) -> String {
    let rounded = value.round_dp_with_strategy(decimals, RoundingStrategy::MidpointAwayFromZero);
    format!("{:.*}%", decimals as usize, rounded)
}

/// Parse a form field such as `"$1,234.56"`. Blank input is zero.
pub fn parse_amount(s: &str) -> DealCalcResult<Money> {
    let normalized: String = s
        .trim()
        .chars()
        .filter(|c| !matches!(c, ',' | '$' | ' '))
        .collect();
    if normalized.is_empty() {
        return Ok(Decimal::ZERO);
    }
    normalized.parse().map_err(|e| {
        warn!(input = %s, "invalid amount: {}", e);
        DealCalcError::invalid("amount", format!("'{s}' is not a number"))
    })
}

fn group_thousands(whole: &str) -> String {
    let len = whole.len();
    let mut out = String::with_capacity(len + len / 3);
    for (i, ch) in whole.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_whole_dollars() {
        assert_eq!(format_currency(dec!(1835.44)), "$1,835");
        assert_eq!(format_currency(dec!(262500)), "$262,500");
        assert_eq!(format_currency(dec!(999)), "$999");
        assert_eq!(format_currency(dec!(1234567.5)), "$1,234,568");
    }

    #[test]
    fn test_negative_and_zero() {
        assert_eq!(format_currency(dec!(-154.5)), "-$155");
        assert_eq!(format_currency(Decimal::ZERO), "$0");
        assert_eq!(format_currency(dec!(-0.4)), "$0");
    }

    #[test]
    fn test_other_currency_with_cents() {
        assert_eq!(format_currency_in(dec!(1234.5), &Currency::EUR, 2), "€1,234.50");
        assert_eq!(format_currency_in(dec!(12), &Currency::GBP, 2), "£12.00");
    }

    #[test]
    fn test_percent() {
        assert_eq!(format_percent(dec!(7.456), 1), "7.5%");
        assert_eq!(format_percent(dec!(75), 1), "75.0%");
    }

    #[test]
    fn test_parse_amount() {
        assert_eq!(parse_amount("$1,234.56").unwrap(), dec!(1234.56));
        assert_eq!(parse_amount("  ").unwrap(), Decimal::ZERO);
        assert!(parse_amount("abc").is_err());
    }
}
