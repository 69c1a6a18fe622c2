//! Money helpers with decimal precision.
//!
//! CRITICAL: Never use floating-point for money calculations.
//! The school operates in a single currency; amounts are plain `Decimal`s
//! carried at two decimal places.

use rust_decimal::{Decimal, RoundingStrategy};
use thiserror::Error;

/// Number of decimal places stored for every amount.
pub const MONEY_SCALE: u32 = 2;

/// Errors raised while parsing user-supplied amounts.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MoneyError {
    /// The text is not a decimal number.
    #[error("invalid amount: {0}")]
    Malformed(String),

    /// More fractional digits than the currency supports.
    #[error("amount {0} has more than 2 decimal places")]
    TooPrecise(Decimal),

    /// Negative amounts are never valid input.
    #[error("amount {0} must not be negative")]
    Negative(Decimal),
}

/// Rounds to the currency scale using Banker's Rounding.
#[must_use]
pub fn round_money(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(MONEY_SCALE, RoundingStrategy::MidpointNearestEven)
}

/// Parses a non-negative amount with at most two decimal places.
///
/// Zero is accepted here; callers decide whether zero is meaningful.
///
/// # Errors
///
/// Returns `MoneyError` if the text is malformed, negative, or too precise.
pub fn parse_amount(raw: &str) -> Result<Decimal, MoneyError> {
    let amount: Decimal = raw
        .trim()
        .parse()
        .map_err(|_| MoneyError::Malformed(raw.to_string()))?;

    if amount.is_sign_negative() && !amount.is_zero() {
        return Err(MoneyError::Negative(amount));
    }
    if amount.normalize().scale() > MONEY_SCALE {
        return Err(MoneyError::TooPrecise(amount));
    }
    Ok(amount)
}

/// Formats an amount with exactly two decimal places.
#[must_use]
pub fn format_money(amount: Decimal) -> String {
    format!("{:.2}", round_money(amount))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_parse_amount() {
        assert_eq!(parse_amount("5000").unwrap(), dec!(5000));
        assert_eq!(parse_amount(" 250.50 ").unwrap(), dec!(250.50));
        assert_eq!(parse_amount("0").unwrap(), Decimal::ZERO);
        assert_eq!(parse_amount("10.500").unwrap(), dec!(10.5));
    }

    #[test]
    fn test_parse_amount_rejects_bad_input() {
        assert!(matches!(parse_amount("abc"), Err(MoneyError::Malformed(_))));
        assert!(matches!(parse_amount(""), Err(MoneyError::Malformed(_))));
        assert!(matches!(parse_amount("-1"), Err(MoneyError::Negative(_))));
        assert!(matches!(parse_amount("1.005"), Err(MoneyError::TooPrecise(_))));
    }

    #[test]
    fn test_round_money_bankers() {
        assert_eq!(round_money(dec!(1.005)), dec!(1.00));
        assert_eq!(round_money(dec!(1.015)), dec!(1.02));
        assert_eq!(round_money(dec!(33.333)), dec!(33.33));
    }

    #[test]
    fn test_format_money() {
        assert_eq!(format_money(dec!(5000)), "5000.00");
        assert_eq!(format_money(dec!(12.5)), "12.50");
        assert_eq!(format_money(Decimal::ZERO), "0.00");
    }
}
