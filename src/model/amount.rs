//! Amount type for handling monetary values stored as decimal strings.
//!
//! This module provides the `Amount` type which wraps `Decimal`. Amounts are written to the
//! document as plain decimal strings that keep their scale (`"250.00"`), and they can be read
//! back from either a string or a JSON number because older documents stored numbers.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::error::Error;
use std::fmt;
use std::fmt::{Debug, Display, Formatter};
use std::iter::Sum;
use std::ops::Add;
use std::str::FromStr;

/// Represents an amount of money in the document's currency.
///
/// # Examples
///
/// Parsing keeps the scale the user typed:
/// ```
/// # use expense_store::model::Amount;
/// # use std::str::FromStr;
/// let amount = Amount::from_str("250.00").unwrap();
/// assert_eq!(amount.to_string(), "250.00");
/// ```
///
/// A leading currency symbol and thousands separators are accepted:
/// ```
/// # use expense_store::model::Amount;
/// # use std::str::FromStr;
/// let amount = Amount::from_str("₹1,250.50").unwrap();
/// assert_eq!(amount.to_string(), "1250.50");
/// assert_eq!(amount.display_with("₹"), "₹1,250.50");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Amount {
    value: Decimal,
}

impl Amount {
    pub const ZERO: Amount = Amount::new(Decimal::ZERO);

    /// Creates a new Amount from a Decimal value.
    pub const fn new(value: Decimal) -> Self {
        Self { value }
    }

    /// Returns the underlying Decimal value.
    pub fn value(&self) -> Decimal {
        self.value
    }

    /// Returns true if the amount is zero.
    pub fn is_zero(&self) -> bool {
        self.value().is_zero()
    }

    /// Returns true if the amount is negative.
    pub fn is_negative(&self) -> bool {
        !self.is_zero() && self.value().is_sign_negative()
    }

    /// Formats the amount for people: currency symbol, thousands separators, two decimals.
    /// e.g. `-₹60,000.00`
    pub fn display_with(&self, currency: &str) -> String {
        let (sign, num) = if self.is_negative() {
            ("-", self.value().abs())
        } else {
            ("", self.value())
        };
        format!(
            "{sign}{currency}{}",
            format_num::format_num!(",.2", num.to_f64().unwrap_or_default())
        )
    }
}

/// An error that can occur when parsing strings into `Decimal` values.
pub struct AmountError(rust_decimal::Error);

impl Debug for AmountError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        Debug::fmt(&self.0, f)
    }
}

impl Display for AmountError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        Display::fmt(&self.0, f)
    }
}

impl std::error::Error for AmountError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        Some(&self.0)
    }
}

impl FromStr for Amount {
    type Err = AmountError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();

        // Handle empty string
        if trimmed.is_empty() {
            return Ok(Amount::default());
        }

        // Strip a currency symbol that appears before the number, either "₹50" or "-₹50". Only
        // symbols are stripped; leading letters such as "lunch5" are an error.
        let (negative, rest) = match trimmed.strip_prefix('-') {
            Some(after_minus) => (true, after_minus),
            None => (false, trimmed),
        };
        let digits = rest
            .trim_start_matches(|c: char| !(c.is_alphanumeric() || c == '.' || c == '-'));

        // Remove commas (thousand separators)
        let without_commas = digits.replace(',', "");
        let text = if negative {
            format!("-{without_commas}")
        } else {
            without_commas
        };

        let value = Decimal::from_str(&text)
            .or_else(|_| Decimal::from_scientific(&text))
            .map_err(AmountError)?;
        Ok(Amount { value })
    }
}

impl Display for Amount {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        Display::fmt(&self.value, f)
    }
}

impl Serialize for Amount {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

/// The shapes an amount may take in a stored document.
#[derive(Deserialize)]
#[serde(untagged)]
enum RawAmount {
    Text(String),
    Number(serde_json::Number),
}

impl<'de> Deserialize<'de> for Amount {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = match RawAmount::deserialize(deserializer)? {
            RawAmount::Text(s) => s,
            RawAmount::Number(n) => n.to_string(),
        };
        Amount::from_str(&s).map_err(serde::de::Error::custom)
    }
}

impl From<Decimal> for Amount {
    fn from(value: Decimal) -> Self {
        Amount::new(value)
    }
}

impl From<Amount> for Decimal {
    fn from(amount: Amount) -> Self {
        amount.value()
    }
}

impl Add for Amount {
    type Output = Amount;

    fn add(self, rhs: Self) -> Self::Output {
        Amount::new(self.value + rhs.value)
    }
}

impl Sum for Amount {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Amount::ZERO, Add::add)
    }
}

impl<'a> Sum<&'a Amount> for Amount {
    fn sum<I: Iterator<Item = &'a Amount>>(iter: I) -> Self {
        iter.copied().sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn test_parse_plain() {
        let amount = Amount::from_str("50.00").unwrap();
        assert_eq!(amount.value(), dec("50.00"));
        assert_eq!(amount.to_string(), "50.00");
    }

    #[test]
    fn test_parse_with_currency_symbol() {
        let amount = Amount::from_str("₹50.00").unwrap();
        assert_eq!(amount.value(), dec("50.00"));
    }

    #[test]
    fn test_parse_negative_with_currency_symbol() {
        let amount = Amount::from_str("-$50.00").unwrap();
        assert_eq!(amount.value(), dec("-50.00"));
    }

    #[test]
    fn test_parse_empty_string() {
        let amount = Amount::from_str("").unwrap();
        assert_eq!(amount.value(), Decimal::ZERO);
    }

    #[test]
    fn test_parse_whitespace() {
        let amount = Amount::from_str("  50.00  ").unwrap();
        assert_eq!(amount.value(), dec("50.00"));
    }

    #[test]
    fn test_parse_multiple_commas() {
        let amount = Amount::from_str("1,234,567.89").unwrap();
        assert_eq!(amount.value(), dec("1234567.89"));
    }

    #[test]
    fn test_parse_garbage() {
        assert!(Amount::from_str("lunch").is_err());
    }

    #[test]
    fn test_leading_text_is_not_stripped() {
        assert!(Amount::from_str("lunch5").is_err());
        assert!(Amount::from_str("abc12").is_err());
        assert!(Amount::from_str("Rs12").is_err());
        assert_eq!(Amount::from_str("€ 12").unwrap().value(), dec("12"));
        assert_eq!(Amount::from_str("$-5").unwrap().value(), dec("-5"));
    }

    #[test]
    fn test_serialize_keeps_scale() {
        let amount = Amount::from_str("250.00").unwrap();
        let json = serde_json::to_string(&amount).unwrap();
        assert_eq!(json, "\"250.00\"");
    }

    #[test]
    fn test_deserialize_from_string() {
        let amount: Amount = serde_json::from_str("\"123.45\"").unwrap();
        assert_eq!(amount.value(), dec("123.45"));
    }

    #[test]
    fn test_deserialize_from_number() {
        let amount: Amount = serde_json::from_str("99.5").unwrap();
        assert_eq!(amount.value(), dec("99.5"));
        let amount: Amount = serde_json::from_str("120").unwrap();
        assert_eq!(amount.value(), dec("120"));
    }

    #[test]
    fn test_display_with_currency() {
        let amount = Amount::from_str("60000").unwrap();
        assert_eq!(amount.display_with("₹"), "₹60,000.00");
        let negative = Amount::from_str("-12.5").unwrap();
        assert_eq!(negative.display_with("$"), "-$12.50");
    }

    #[test]
    fn test_sum() {
        let amounts = [
            Amount::from_str("10.50").unwrap(),
            Amount::from_str("0.25").unwrap(),
            Amount::from_str("100").unwrap(),
        ];
        let total: Amount = amounts.iter().sum();
        assert_eq!(total.value(), dec("110.75"));
    }

    #[test]
    fn test_ordering() {
        let a1 = Amount::from_str("30.00").unwrap();
        let a2 = Amount::from_str("50.00").unwrap();
        assert!(a1 < a2);
    }

    #[test]
    fn test_zero_is_not_negative() {
        let zero = Amount::from_str("-0.00").unwrap();
        assert!(zero.is_zero());
        assert!(!zero.is_negative());
    }
}
