//! Game price with two fractional digits
//!
//! Prices are kept as integer cents so they round-trip through `DECIMAL(5,2)`
//! without floating point drift. The JSON form is a plain number (`26.95`).

use std::fmt;
use std::str::FromStr;

use serde::{Serialize, Serializer};

use super::ValidationError;

/// Largest value a `DECIMAL(5,2)` column holds, in cents
pub const MAX_PRICE_CENTS: i32 = 99_999;

/// Non-negative price, at most 999.99
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Price(i32);

impl Price {
    /// Create a price from a cent amount.
    ///
    /// # Example
    /// ```
    /// use gamecat_server::models::Price;
    ///
    /// assert_eq!(Price::from_cents(2695).unwrap().to_string(), "26.95");
    /// assert!(Price::from_cents(-1).is_err());
    /// ```
    pub fn from_cents(cents: i32) -> Result<Self, ValidationError> {
        if !(0..=MAX_PRICE_CENTS).contains(&cents) {
            return Err(out_of_range());
        }
        Ok(Self(cents))
    }

    /// Values read back from a `DECIMAL(5,2)` column are in range by construction.
    pub(crate) fn from_stored_cents(cents: i32) -> Self {
        Self(cents)
    }

    pub fn cents(self) -> i32 {
        self.0
    }

    pub fn as_f64(self) -> f64 {
        f64::from(self.0) / 100.0
    }
}

fn out_of_range() -> ValidationError {
    ValidationError::OutOfRange {
        field: "price",
        max: "999.99",
    }
}

impl FromStr for Price {
    type Err = ValidationError;

    /// Parse `"26.95"`, `"14.9"` or `"3"`. At most two fractional digits.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() {
            return Err(ValidationError::Empty { field: "price" });
        }
        if s.starts_with('-') {
            return Err(out_of_range());
        }

        let (whole, frac) = match s.split_once('.') {
            Some((whole, frac)) => (whole, frac),
            None => (s, ""),
        };

        let all_digits = |part: &str| part.bytes().all(|b| b.is_ascii_digit());
        if whole.is_empty() || !all_digits(whole) || !all_digits(frac) {
            return Err(ValidationError::InvalidFormat {
                field: "price",
                reason: "expected a decimal number such as 26.95",
            });
        }
        if frac.len() > 2 {
            return Err(ValidationError::InvalidFormat {
                field: "price",
                reason: "at most two fractional digits are allowed",
            });
        }

        let whole: i64 = whole.parse().map_err(|_| out_of_range())?;
        let frac: i64 = match frac.len() {
            0 => 0,
            1 => i64::from(frac.as_bytes()[0] - b'0') * 10,
            _ => frac.parse().map_err(|_| out_of_range())?,
        };

        let cents = whole
            .checked_mul(100)
            .and_then(|c| c.checked_add(frac))
            .filter(|c| *c <= i64::from(MAX_PRICE_CENTS))
            .ok_or_else(out_of_range)?;

        // In range after the filter above
        Self::from_cents(cents as i32)
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{:02}", self.0 / 100, self.0 % 100)
    }
}

impl Serialize for Price {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_f64(self.as_f64())
    }
}
