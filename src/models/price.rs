use crate::errors::{ErrorKind, Result};
use rust_decimal::{Decimal, RoundingStrategy};
use serde::Deserialize;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

/// An exact decimal monetary amount.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Deserialize)]
#[serde(transparent)]
pub struct Price(Decimal);

impl Price {
    pub fn new(value: Decimal) -> Self {
        Self(value)
    }
    pub fn value(&self) -> Decimal {
        self.0
    }
    /// Parses user input the way an invariant-culture decimal parse would:
    /// optional sign, digits with `,` group separators, at most one `.`.
    /// Input that cannot be held without losing digits is rejected.
    pub fn parse(input: &str) -> Result<Self> {
        let invalid = || ErrorKind::Parse(input.to_string());
        let trimmed = input.trim();
        let (sign, body) = match trimmed.as_bytes().first() {
            Some(b'-') => ("-", &trimmed[1..]),
            Some(b'+') => ("", &trimmed[1..]),
            _ => ("", trimmed),
        };
        let mut integral = String::with_capacity(body.len());
        let mut fraction = String::new();
        let mut seen_point = false;
        for ch in body.chars() {
            match ch {
                '0'..='9' if seen_point => fraction.push(ch),
                '0'..='9' => integral.push(ch),
                ',' if !seen_point => {}
                '.' if !seen_point => seen_point = true,
                _ => return Err(invalid()),
            }
        }
        if integral.is_empty() && fraction.is_empty() {
            return Err(invalid());
        }
        if integral.is_empty() {
            integral.push('0');
        }
        let normalized = if fraction.is_empty() {
            format!("{sign}{integral}")
        } else {
            format!("{sign}{integral}.{fraction}")
        };
        Decimal::from_str_exact(&normalized)
            .map(Self)
            .map_err(|_| invalid())
    }
    /// Two fraction digits, midpoints rounded away from zero.
    fn rounded(&self) -> Decimal {
        self.0
            .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
    }
}

impl From<i64> for Price {
    fn from(value: i64) -> Self {
        Self(Decimal::from(value))
    }
}

impl FromStr for Price {
    type Err = ErrorKind;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl Display for Price {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.2}", self.rounded())
    }
}

/// Renders prices with two fraction digits behind an optional symbol.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CurrencyFormat {
    symbol: String,
}

impl CurrencyFormat {
    pub fn new(symbol: impl Into<String>) -> Self {
        Self {
            symbol: symbol.into(),
        }
    }
    pub fn format(&self, price: Price) -> String {
        let rounded = price.rounded();
        if rounded.is_sign_negative() && !rounded.is_zero() {
            format!("-{}{:.2}", self.symbol, rounded.abs())
        } else {
            format!("{}{:.2}", self.symbol, rounded.abs())
        }
    }
}
