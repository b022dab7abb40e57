//! Money type for transaction amounts and bucket totals
//!
//! Amounts are stored as integer cents so that totals accumulated over many
//! aggregation passes never drift the way binary floats do.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, AddAssign};

/// A monetary amount stored as cents (hundredths of the currency unit)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Money(i64);

impl Money {
    /// Create a Money amount from cents
    ///
    /// # Examples
    /// ```
    /// use tally_chart::models::Money;
    /// let amount = Money::from_cents(1050); // 10.50
    /// assert_eq!(amount.units(), 10);
    /// ```
    pub const fn from_cents(cents: i64) -> Self {
        Self(cents)
    }

    /// Create a Money amount from whole currency units
    pub const fn from_units(units: i64) -> Self {
        Self(units * 100)
    }

    /// Create a zero Money amount
    pub const fn zero() -> Self {
        Self(0)
    }

    /// Get the amount in cents
    pub const fn cents(&self) -> i64 {
        self.0
    }

    /// Whole currency units, truncated toward zero
    pub const fn units(&self) -> i64 {
        self.0 / 100
    }

    /// Whole currency units, rounded up for positive amounts
    ///
    /// Used by the axis scale so that a total of 10.01 still fits under a
    /// top label of 11.
    pub const fn units_ceil(&self) -> i64 {
        if self.0 > 0 {
            (self.0 + 99) / 100
        } else {
            self.0 / 100
        }
    }

    /// Get the cents portion (0-99)
    pub const fn cents_part(&self) -> i64 {
        (self.0 % 100).abs()
    }

    /// Check if the amount is negative
    pub const fn is_negative(&self) -> bool {
        self.0 < 0
    }

    /// Parse an amount such as "500", "500.5", "1 250,75" or "$12.00"
    ///
    /// Both `.` and `,` are accepted as the decimal separator and spaces are
    /// ignored, so exports from locales that group thousands still load. At
    /// most two decimal digits are allowed.
    pub fn parse(s: &str) -> Result<Self, MoneyParseError> {
        let cleaned: String = s.trim().chars().filter(|c| !c.is_whitespace()).collect();
        let invalid = || MoneyParseError::InvalidFormat(s.trim().to_string());

        let (negative, body) = match cleaned.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, cleaned.as_str()),
        };
        let body = body.strip_prefix('$').unwrap_or(body);
        if body.is_empty() {
            return Err(invalid());
        }

        let (whole, fraction) = match body.find(['.', ',']) {
            Some(pos) => (&body[..pos], &body[pos + 1..]),
            None => (body, ""),
        };
        if fraction.contains(['.', ',']) {
            return Err(invalid());
        }

        let digits_only = |part: &str| part.chars().all(|c| c.is_ascii_digit());
        if !digits_only(whole) || !digits_only(fraction) || fraction.len() > 2 {
            return Err(invalid());
        }

        let whole: i64 = if whole.is_empty() {
            0
        } else {
            whole.parse().map_err(|_| invalid())?
        };
        let fraction_cents: i64 = match fraction.len() {
            0 => 0,
            1 => fraction.parse::<i64>().map_err(|_| invalid())? * 10,
            _ => fraction.parse().map_err(|_| invalid())?,
        };

        let cents = whole
            .checked_mul(100)
            .and_then(|c| c.checked_add(fraction_cents))
            .ok_or_else(invalid)?;
        Ok(Self(if negative { -cents } else { cents }))
    }

    /// Format with a currency symbol prefix
    pub fn format_with_symbol(&self, symbol: &str) -> String {
        if self.is_negative() {
            format!("-{}{}.{:02}", symbol, self.units().abs(), self.cents_part())
        } else {
            format!("{}{}.{:02}", symbol, self.units(), self.cents_part())
        }
    }
}

impl Default for Money {
    fn default() -> Self {
        Self::zero()
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.format_with_symbol(""))
    }
}

impl Add for Money {
    type Output = Self;

    fn add(self, other: Self) -> Self {
        Self(self.0 + other.0)
    }
}

impl AddAssign for Money {
    fn add_assign(&mut self, other: Self) {
        self.0 += other.0;
    }
}

impl std::iter::Sum for Money {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Money::zero(), |acc, m| acc + m)
    }
}

/// Error type for money parsing
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MoneyParseError {
    InvalidFormat(String),
}

impl fmt::Display for MoneyParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MoneyParseError::InvalidFormat(s) => write!(f, "Invalid money format: {}", s),
        }
    }
}

impl std::error::Error for MoneyParseError {}
