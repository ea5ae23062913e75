//! Amount type for handling monetary values entered as text.
//!
//! This module provides the `Amount` type which wraps `Decimal` and handles parsing values that
//! may include a leading currency symbol or thousands separators.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::error::Error;
use std::fmt;
use std::fmt::{Debug, Display, Formatter};
use std::str::FromStr;

/// Currency symbols that are tolerated (and dropped) at the start of an amount.
const CURRENCY_SYMBOLS: [char; 4] = ['€', '$', '£', '¥'];

/// Represents a monetary amount.
///
/// The ledger stores amounts as plain numbers, so `Display` writes the bare value. Use
/// `Amount::format_with` to render it for people.
///
/// # Examples
///
/// ```
/// # use expense_tracker::model::Amount;
/// # use std::str::FromStr;
/// let amount = Amount::from_str("€1,250.5").unwrap();
/// assert_eq!(amount.to_string(), "1250.5");
/// assert_eq!(amount.format_with("€", false), "€1250.50");
/// assert_eq!(amount.format_with("€", true), "€1,250.50");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Amount {
    value: Decimal,
}

impl Amount {
    pub const fn new(value: Decimal) -> Self {
        Self { value }
    }

    /// Returns the underlying Decimal value.
    pub fn value(&self) -> Decimal {
        self.value
    }

    pub fn is_zero(&self) -> bool {
        self.value.is_zero()
    }

    pub fn is_negative(&self) -> bool {
        !self.is_zero() && self.value.is_sign_negative()
    }

    /// Renders the amount with `symbol` and exactly two decimal places, e.g. `-€1,250.00`.
    pub fn format_with(&self, symbol: &str, thousands_separator: bool) -> String {
        let sign = if self.is_negative() { "-" } else { "" };
        let num = self.value.abs().round_dp(2);
        if thousands_separator {
            format!(
                "{sign}{symbol}{}",
                format_num::format_num!(",.2", num.to_f64().unwrap_or_default())
            )
        } else {
            format!("{sign}{symbol}{num:.2}")
        }
    }
}

/// An error that can occur when parsing strings into `Amount` values.
pub enum AmountError {
    Empty,
    /// More than one sign, as in `--5` or `-€-5`.
    Sign(String),
    Invalid(String, rust_decimal::Error),
}

impl Debug for AmountError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        Display::fmt(self, f)
    }
}

impl Display for AmountError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            AmountError::Empty => write!(f, "The amount is empty"),
            AmountError::Sign(s) => write!(f, "The amount '{s}' has more than one sign"),
            AmountError::Invalid(s, e) => write!(f, "The amount '{s}' is not a number: {e}"),
        }
    }
}

impl std::error::Error for AmountError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            AmountError::Empty | AmountError::Sign(_) => None,
            AmountError::Invalid(_, e) => Some(e),
        }
    }
}

impl FromStr for Amount {
    type Err = AmountError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(AmountError::Empty);
        }

        // Drop a currency symbol, which may come before or after a minus sign.
        let (negative, rest) = match trimmed.strip_prefix('-') {
            Some(after_minus) => (true, after_minus),
            None => (false, trimmed),
        };
        let rest = rest.trim_start_matches(CURRENCY_SYMBOLS.as_slice()).trim();
        let (negative, digits) = match rest.strip_prefix('-') {
            Some(_) if negative => return Err(AmountError::Sign(trimmed.to_string())),
            Some(after_minus) => (true, after_minus),
            None => (negative, rest),
        };
        let digits = match digits.strip_prefix('+') {
            Some(_) if negative => return Err(AmountError::Sign(trimmed.to_string())),
            Some(after_plus) => after_plus,
            None => digits,
        };
        if digits.starts_with(['-', '+']) {
            return Err(AmountError::Sign(trimmed.to_string()));
        }
        let without_commas = digits.replace(',', "");

        let value = Decimal::from_str(&without_commas)
            .or_else(|_| Decimal::from_scientific(&without_commas))
            .map_err(|e| AmountError::Invalid(trimmed.to_string(), e))?;
        Ok(Amount::new(if negative { -value } else { value }))
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

impl<'de> Deserialize<'de> for Amount {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
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
