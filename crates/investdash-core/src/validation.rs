//! Typed parsing of form input.
//!
//! Each parser returns the value or the specific [`InputIssue`] so the caller
//! decides between surfacing a correction hint and coercing to zero.

use std::str::FromStr;

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::Serialize;
use thiserror::Error;

use crate::currency::Currency;
use crate::types::{Money, Percent};

#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
#[serde(tag = "kind", content = "input", rename_all = "snake_case")]
pub enum InputIssue {
    #[error("value is empty")]
    Empty,
    #[error("'{0}' is not a number")]
    NotANumber(String),
    #[error("value must not be negative")]
    Negative,
    #[error("discount rate must be greater than -100%")]
    RateAtOrBelowFloor,
    #[error("'{0}' is not a supported currency")]
    UnknownCurrency(String),
}

impl InputIssue {
    /// Short correction hint for the user.
    pub fn hint(&self) -> &'static str {
        match self {
            InputIssue::Empty => "enter a number, e.g. 1500000",
            InputIssue::NotANumber(_) => "use digits with an optional '.' or ',' decimal mark, e.g. 1500000.50",
            InputIssue::Negative => "the initial investment is an outflow amount; enter it as a positive number",
            InputIssue::RateAtOrBelowFloor => "enter the rate as a percentage above -100, e.g. 15 for 15%",
            InputIssue::UnknownCurrency(_) => "choose one of AOA, USD, EUR, BRL",
        }
    }
}

/// Parse a signed amount. Accepts a single ',' as decimal mark and
/// scientific notation.
pub fn parse_amount(raw: &str) -> Result<Money, InputIssue> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(InputIssue::Empty);
    }
    let normalized = if trimmed.matches(',').count() == 1 && !trimmed.contains('.') {
        trimmed.replace(',', ".")
    } else {
        trimmed.to_string()
    };

    Decimal::from_str(&normalized)
        .or_else(|_| Decimal::from_scientific(&normalized))
        .map_err(|_| InputIssue::NotANumber(trimmed.to_string()))
}

/// Parse the initial investment: a non-negative amount.
pub fn parse_investment(raw: &str) -> Result<Money, InputIssue> {
    let value = parse_amount(raw)?;
    if value.is_sign_negative() && !value.is_zero() {
        return Err(InputIssue::Negative);
    }
    Ok(value)
}

/// Parse a discount rate given as a percentage. Rates at or below -100%
/// make the discount factor zero or negative.
pub fn parse_discount_rate(raw: &str) -> Result<Percent, InputIssue> {
    let value = parse_amount(raw)?;
    if value <= dec!(-100) {
        return Err(InputIssue::RateAtOrBelowFloor);
    }
    Ok(value)
}

pub fn parse_currency(raw: &str) -> Result<Currency, InputIssue> {
    Currency::from_str(raw).map_err(|_| InputIssue::UnknownCurrency(raw.trim().to_string()))
}

/// Lenient path: whatever `parse` rejects becomes 0, including values
/// that are numeric but out of range for the field.
pub fn coerce_or_zero(raw: &str, parse: impl Fn(&str) -> Result<Money, InputIssue>) -> Money {
    parse(raw).unwrap_or(Decimal::ZERO)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_parse_amount_variants() {
        assert_eq!(parse_amount("1500000"), Ok(dec!(1500000)));
        assert_eq!(parse_amount(" -250.5 "), Ok(dec!(-250.5)));
        assert_eq!(parse_amount("1250,75"), Ok(dec!(1250.75)));
        assert_eq!(parse_amount("1.5e6"), Ok(dec!(1500000)));
    }

    #[test]
    fn test_parse_amount_issues() {
        assert_eq!(parse_amount("   "), Err(InputIssue::Empty));
        assert_eq!(parse_amount("abc"), Err(InputIssue::NotANumber("abc".into())));
        assert_eq!(parse_amount("1,000,000"), Err(InputIssue::NotANumber("1,000,000".into())));
    }

    #[test]
    fn test_investment_rejects_negative() {
        assert_eq!(parse_investment("-1"), Err(InputIssue::Negative));
        assert_eq!(parse_investment("0"), Ok(Decimal::ZERO));
    }

    #[test]
    fn test_rate_floor() {
        assert_eq!(parse_discount_rate("-100"), Err(InputIssue::RateAtOrBelowFloor));
        assert_eq!(parse_discount_rate("-99.5"), Ok(dec!(-99.5)));
    }

    #[test]
    fn test_currency_issue() {
        assert_eq!(parse_currency("eur"), Ok(Currency::EUR));
        assert_eq!(parse_currency("JPY"), Err(InputIssue::UnknownCurrency("JPY".into())));
    }

    #[test]
    fn test_coerce_or_zero() {
        assert_eq!(coerce_or_zero("oops", parse_amount), Decimal::ZERO);
        assert_eq!(coerce_or_zero("42", parse_amount), dec!(42));
        assert_eq!(coerce_or_zero("-7", parse_amount), dec!(-7));
    }

    #[test]
    fn test_coerce_or_zero_applies_field_range() {
        assert_eq!(coerce_or_zero("-5", parse_investment), Decimal::ZERO);
        assert_eq!(coerce_or_zero("-150", parse_discount_rate), Decimal::ZERO);
        assert_eq!(coerce_or_zero("-99", parse_discount_rate), dec!(-99));
    }

    #[test]
    fn test_every_issue_has_hint() {
        for issue in [
            InputIssue::Empty,
            InputIssue::NotANumber("x".into()),
            InputIssue::Negative,
            InputIssue::RateAtOrBelowFloor,
            InputIssue::UnknownCurrency("x".into()),
        ] {
            assert!(!issue.hint().is_empty());
        }
    }
}
