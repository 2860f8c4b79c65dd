use std::{fmt, str::FromStr};

use crate::EngineError;

/// Monetary amount represented as **integer minor units**.
///
/// Use this type at the input/output boundary for all monetary values to
/// avoid floating-point drift; storage and arithmetic inside the engine work
/// on the raw `i64` it wraps.
///
/// # Examples
///
/// ```rust
/// use engine::Money;
///
/// let amount = Money::new(1500);
/// assert_eq!(amount.minor_units(), 1500);
/// assert_eq!(amount.to_string(), "Rp 1.500");
/// ```
///
/// Parsing is deliberately forgiving about presentation: every non-digit
/// character is stripped, so `"Rp 1.500"` and `"1500"` read the same. An
/// input with no digits, or one that collapses to zero, is rejected because
/// the parser exists to take in positive amounts:
///
/// ```rust
/// use engine::Money;
///
/// assert_eq!("Rp 1.500".parse::<Money>().unwrap().minor_units(), 1500);
/// assert_eq!("12,000".parse::<Money>().unwrap().minor_units(), 12000);
/// assert!("".parse::<Money>().is_err());
/// assert!("0".parse::<Money>().is_err());
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(transparent)]
pub struct Money(i64);

impl Money {
    pub const ZERO: Money = Money(0);

    /// Creates a new amount from integer minor units.
    #[must_use]
    pub const fn new(minor_units: i64) -> Self {
        Self(minor_units)
    }

    /// Returns the raw value in minor units.
    #[must_use]
    pub const fn minor_units(self) -> i64 {
        self.0
    }

    /// Returns `true` if the amount is 0.
    #[must_use]
    pub const fn is_zero(self) -> bool {
        self.0 == 0
    }

    /// Returns `true` if the amount is positive.
    #[must_use]
    pub const fn is_positive(self) -> bool {
        self.0 > 0
    }

    /// Returns `true` if the amount is negative.
    #[must_use]
    pub const fn is_negative(self) -> bool {
        self.0 < 0
    }

    /// Checked addition (returns `None` on overflow).
    #[must_use]
    pub fn checked_add(self, rhs: Money) -> Option<Money> {
        self.0.checked_add(rhs.0).map(Money)
    }

    /// Checked subtraction (returns `None` on overflow).
    #[must_use]
    pub fn checked_sub(self, rhs: Money) -> Option<Money> {
        self.0.checked_sub(rhs.0).map(Money)
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let digits = self.0.unsigned_abs().to_string();
        let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
        for (index, digit) in digits.chars().enumerate() {
            if index > 0 && (digits.len() - index) % 3 == 0 {
                grouped.push('.');
            }
            grouped.push(digit);
        }
        write!(f, "{sign}Rp {grouped}")
    }
}

impl From<i64> for Money {
    fn from(value: i64) -> Self {
        Self(value)
    }
}

impl From<Money> for i64 {
    fn from(value: Money) -> Self {
        value.0
    }
}

impl FromStr for Money {
    type Err = EngineError;

    /// Parses user input into minor units.
    ///
    /// Strips every non-digit character, then requires the remainder to be a
    /// positive integer:
    /// - rejects empty input and input without digits
    /// - rejects amounts that collapse to zero
    /// - rejects amounts that overflow `i64`
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let digits: String = s.chars().filter(char::is_ascii_digit).collect();
        if digits.is_empty() {
            return Err(EngineError::InvalidAmount("amount has no digits".to_string()));
        }

        let minor_units: i64 = digits
            .parse()
            .map_err(|_| EngineError::InvalidAmount("amount too large".to_string()))?;
        if minor_units == 0 {
            return Err(EngineError::InvalidAmount(
                "amount must be positive".to_string(),
            ));
        }

        Ok(Money(minor_units))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_groups_thousands() {
        assert_eq!(Money::new(0).to_string(), "Rp 0");
        assert_eq!(Money::new(75).to_string(), "Rp 75");
        assert_eq!(Money::new(1500).to_string(), "Rp 1.500");
        assert_eq!(Money::new(2_500_000).to_string(), "Rp 2.500.000");
        assert_eq!(Money::new(-1500).to_string(), "-Rp 1.500");
    }

    #[test]
    fn parse_strips_presentation_characters() {
        assert_eq!("1500".parse::<Money>().unwrap().minor_units(), 1500);
        assert_eq!("Rp 1.500".parse::<Money>().unwrap().minor_units(), 1500);
        assert_eq!("12,000".parse::<Money>().unwrap().minor_units(), 12000);
        assert_eq!("  75 ".parse::<Money>().unwrap().minor_units(), 75);
        assert_eq!("0075".parse::<Money>().unwrap().minor_units(), 75);
    }

    #[test]
    fn parse_rejects_empty_and_zero() {
        assert!("".parse::<Money>().is_err());
        assert!("   ".parse::<Money>().is_err());
        assert!("Rp".parse::<Money>().is_err());
        assert!("0".parse::<Money>().is_err());
        assert!("0.000".parse::<Money>().is_err());
    }

    #[test]
    fn parse_rejects_overflow() {
        let err = "99999999999999999999".parse::<Money>().unwrap_err();
        assert_eq!(err, EngineError::InvalidAmount("amount too large".to_string()));
    }

    #[test]
    fn checked_arithmetic() {
        assert_eq!(
            Money::new(1000).checked_add(Money::new(500)),
            Some(Money::new(1500))
        );
        assert_eq!(Money::new(i64::MAX).checked_add(Money::new(1)), None);
        assert_eq!(
            Money::new(1000).checked_sub(Money::new(500)),
            Some(Money::new(500))
        );
    }
}
