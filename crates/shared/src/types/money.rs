//! Decimal helpers for monetary amounts and quantities.
//!
//! CRITICAL: Never use floating-point for money calculations.
//! Amounts and quantities are `rust_decimal::Decimal` everywhere; text coming
//! from a form or a fixture is parsed here, at the boundary, and never deeper.

use std::str::FromStr;

use rust_decimal::Decimal;
use thiserror::Error;

/// Tolerance used when checking that journal debits equal credits.
pub const BALANCE_TOLERANCE: Decimal = Decimal::from_parts(1, 0, 0, false, 9);

/// Tolerance used when checking the balance sheet identity.
pub const STATEMENT_TOLERANCE: Decimal = Decimal::from_parts(1, 0, 0, false, 6);

/// Errors raised while parsing user-entered numbers.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MoneyError {
    /// Input was empty or whitespace.
    #[error("Value is required")]
    Empty,

    /// Input is not a decimal number.
    #[error("Not a number: {0:?}")]
    NotANumber(String),

    /// Input is negative where only non-negative values are allowed.
    #[error("Value cannot be negative: {0}")]
    Negative(Decimal),

    /// Input is zero where a strictly positive value is required.
    #[error("Value must be greater than zero")]
    Zero,

    /// A product or sum does not fit in a decimal.
    #[error("Value is out of range")]
    OutOfRange,
}

/// Parses a non-negative monetary amount (prices, payments, opening balances).
///
/// # Errors
///
/// Returns an error for empty, non-numeric, or negative input.
pub fn parse_amount(input: &str) -> Result<Decimal, MoneyError> {
    let value = parse_decimal(input)?;
    if value.is_sign_negative() && !value.is_zero() {
        return Err(MoneyError::Negative(value));
    }
    Ok(value)
}

/// Parses a strictly positive quantity.
///
/// # Errors
///
/// Returns an error for empty, non-numeric, zero, or negative input.
pub fn parse_quantity(input: &str) -> Result<Decimal, MoneyError> {
    let value = parse_amount(input)?;
    if value.is_zero() {
        return Err(MoneyError::Zero);
    }
    Ok(value)
}

/// Parses a signed decimal (opening balances may be credit-side).
///
/// # Errors
///
/// Returns an error for empty or non-numeric input.
pub fn parse_signed(input: &str) -> Result<Decimal, MoneyError> {
    parse_decimal(input)
}

fn parse_decimal(input: &str) -> Result<Decimal, MoneyError> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(MoneyError::Empty);
    }
    Decimal::from_str(trimmed).map_err(|_| MoneyError::NotANumber(trimmed.to_string()))
}

/// Multiplies two decimals, rejecting a result that does not fit.
///
/// # Errors
///
/// Returns `OutOfRange` on overflow.
pub fn checked_product(a: Decimal, b: Decimal) -> Result<Decimal, MoneyError> {
    a.checked_mul(b).ok_or(MoneyError::OutOfRange)
}

/// Sums decimals, rejecting a total that does not fit.
///
/// # Errors
///
/// Returns `OutOfRange` on overflow.
pub fn checked_sum<I>(values: I) -> Result<Decimal, MoneyError>
where
    I: IntoIterator<Item = Decimal>,
{
    values.into_iter().try_fold(Decimal::ZERO, |total, value| {
        total.checked_add(value).ok_or(MoneyError::OutOfRange)
    })
}

/// Returns true if `a` and `b` differ by strictly less than `tolerance`.
#[must_use]
pub fn within_tolerance(a: Decimal, b: Decimal, tolerance: Decimal) -> bool {
    (a - b).abs() < tolerance
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use rust_decimal_macros::dec;

    #[test]
    fn test_tolerance_constants() {
        assert_eq!(BALANCE_TOLERANCE, dec!(0.000000001));
        assert_eq!(STATEMENT_TOLERANCE, dec!(0.000001));
    }

    #[rstest]
    #[case("0", dec!(0))]
    #[case("12.50", dec!(12.50))]
    #[case("  7 ", dec!(7))]
    fn test_parse_amount_accepts(#[case] input: &str, #[case] expected: Decimal) {
        assert_eq!(parse_amount(input).unwrap(), expected);
    }

    #[rstest]
    #[case("", MoneyError::Empty)]
    #[case("   ", MoneyError::Empty)]
    #[case("abc", MoneyError::NotANumber("abc".to_string()))]
    #[case("-1", MoneyError::Negative(dec!(-1)))]
    fn test_parse_amount_rejects(#[case] input: &str, #[case] expected: MoneyError) {
        assert_eq!(parse_amount(input).unwrap_err(), expected);
    }

    #[test]
    fn test_parse_quantity_rejects_zero() {
        assert_eq!(parse_quantity("0").unwrap_err(), MoneyError::Zero);
        assert_eq!(parse_quantity("0.000").unwrap_err(), MoneyError::Zero);
        assert_eq!(parse_quantity("2.5").unwrap(), dec!(2.5));
    }

    #[test]
    fn test_parse_signed_keeps_sign() {
        assert_eq!(parse_signed("-250.75").unwrap(), dec!(-250.75));
    }

    #[test]
    fn test_checked_arithmetic_rejects_overflow() {
        assert_eq!(checked_product(dec!(12.5), dec!(4)).unwrap(), dec!(50));
        assert_eq!(
            checked_product(Decimal::MAX, dec!(2)).unwrap_err(),
            MoneyError::OutOfRange
        );
        assert_eq!(checked_sum([dec!(1), dec!(2.5)]).unwrap(), dec!(3.5));
        assert_eq!(
            checked_sum([Decimal::MAX, dec!(1)]).unwrap_err(),
            MoneyError::OutOfRange
        );
    }

    #[test]
    fn test_within_tolerance() {
        assert!(within_tolerance(dec!(100), dec!(100.0000000001), BALANCE_TOLERANCE));
        assert!(!within_tolerance(dec!(100), dec!(100.01), BALANCE_TOLERANCE));
    }
}
