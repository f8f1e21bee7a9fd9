use rust_decimal::Decimal;
use thiserror::Error;

use crate::assumptions::MAX_AMOUNT;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DealCalcError {
    #[error("Invalid input: {field} — {reason}")]
    InvalidInput { field: String, reason: String },

    #[error("Financial impossibility: {0}")]
    FinancialImpossibility(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

impl DealCalcError {
    pub(crate) fn invalid(field: &str, reason: impl Into<String>) -> Self {
        DealCalcError::InvalidInput {
            field: field.into(),
            reason: reason.into(),
        }
    }

    pub(crate) fn overflow(what: &str) -> Self {
        DealCalcError::FinancialImpossibility(format!("{what} overflows"))
    }
}

impl From<serde_json::Error> for DealCalcError {
    fn from(e: serde_json::Error) -> Self {
        DealCalcError::SerializationError(e.to_string())
    }
}

/// Reject negative amounts and rates with a field-tagged error.
pub(crate) fn ensure_non_negative(field: &str, value: Decimal) -> Result<(), DealCalcError> {
    if value < Decimal::ZERO {
        return Err(DealCalcError::invalid(
            field,
            format!("must not be negative, got {value}"),
        ));
    }
    Ok(())
}

/// Money fields: non-negative and no larger than [`MAX_AMOUNT`].
pub(crate) fn ensure_amount(field: &str, value: Decimal) -> Result<(), DealCalcError> {
    ensure_non_negative(field, value)?;
    if value > MAX_AMOUNT {
        return Err(DealCalcError::invalid(
            field,
            format!("must not exceed {MAX_AMOUNT}, got {value}"),
        ));
    }
    Ok(())
}

/// Reject percentages outside [0, 100].
pub(crate) fn ensure_percent(field: &str, value: Decimal) -> Result<(), DealCalcError> {
    if value < Decimal::ZERO || value > Decimal::ONE_HUNDRED {
        return Err(DealCalcError::invalid(
            field,
            format!("must be between 0 and 100, got {value}"),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_non_negative_accepts_zero() {
        assert!(ensure_non_negative("rent", Decimal::ZERO).is_ok());
    }

    #[test]
    fn test_non_negative_names_field() {
        let err = ensure_non_negative("monthly_hoa", dec!(-0.01)).unwrap_err();
        match err {
            DealCalcError::InvalidInput { field, .. } => assert_eq!(field, "monthly_hoa"),
            other => panic!("Expected InvalidInput, got {other:?}"),
        }
    }

    #[test]
    fn test_amount_upper_bound() {
        assert!(ensure_amount("rent", MAX_AMOUNT).is_ok());
        assert!(matches!(
            ensure_amount("rent", MAX_AMOUNT + dec!(0.01)),
            Err(DealCalcError::InvalidInput { .. })
        ));
        assert!(ensure_amount("rent", dec!(-1)).is_err());
    }

    #[test]
    fn test_percent_bounds_inclusive() {
        assert!(ensure_percent("down", dec!(0)).is_ok());
        assert!(ensure_percent("down", dec!(100)).is_ok());
        assert!(ensure_percent("down", dec!(100.01)).is_err());
    }
}
