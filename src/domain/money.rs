use std::fmt;

use serde::{Deserialize, Serialize};

use crate::errors::TallyError;

/// Monetary amount held as integer minor units (cents).
///
/// Aggregation sums with saturating arithmetic so a recompute pass can never
/// fail, even over extreme or corrupt upstream values.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Money(i64);

impl Money {
    pub const ZERO: Money = Money(0);

    pub fn from_minor(minor: i64) -> Self {
        Self(minor)
    }

    pub fn minor(&self) -> i64 {
        self.0
    }

    pub fn is_positive(&self) -> bool {
        self.0 > 0
    }

    pub fn saturating_add(self, other: Money) -> Money {
        Money(self.0.saturating_add(other.0))
    }

    pub fn saturating_sub(self, other: Money) -> Money {
        Money(self.0.saturating_sub(other.0))
    }

    /// Parses decimal text with at most two fraction digits.
    ///
    /// Amounts are recorded to cent precision; anything finer is rejected
    /// rather than silently rounded.
    pub fn parse(input: &str) -> Result<Self, TallyError> {
        let text = input.trim();
        let (negative, digits) = match text.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, text),
        };
        let (whole, fraction) = match digits.split_once('.') {
            Some((whole, fraction)) => (whole, fraction),
            None => (digits, ""),
        };
        if whole.is_empty() && fraction.is_empty() {
            return Err(TallyError::InvalidInput(format!(
                "`{input}` is not a number"
            )));
        }
        if !whole.chars().all(|c| c.is_ascii_digit())
            || !fraction.chars().all(|c| c.is_ascii_digit())
        {
            return Err(TallyError::InvalidInput(format!(
                "`{input}` is not a number"
            )));
        }
        if fraction.len() > 2 {
            return Err(TallyError::InvalidInput(format!(
                "`{input}` has more than two fraction digits"
            )));
        }

        let out_of_range = || TallyError::InvalidInput(format!("`{input}` is out of range"));
        let whole: i64 = if whole.is_empty() {
            0
        } else {
            whole.parse().map_err(|_| out_of_range())?
        };
        let fraction_minor = match fraction.len() {
            0 => 0,
            1 => fraction.parse::<i64>().map_err(|_| out_of_range())? * 10,
            _ => fraction.parse::<i64>().map_err(|_| out_of_range())?,
        };
        let minor = whole
            .checked_mul(100)
            .and_then(|cents| cents.checked_add(fraction_minor))
            .ok_or_else(out_of_range)?;

        Ok(Self(if negative { -minor } else { minor }))
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let abs = self.0.unsigned_abs();
        write!(f, "{sign}{}.{:02}", abs / 100, abs % 100)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_whole_and_fractional_amounts() {
        assert_eq!(Money::parse("1000").unwrap(), Money::from_minor(100_000));
        assert_eq!(Money::parse("10.5").unwrap(), Money::from_minor(1_050));
        assert_eq!(Money::parse(".75").unwrap(), Money::from_minor(75));
        assert_eq!(Money::parse(" 3.25 ").unwrap(), Money::from_minor(325));
        assert_eq!(Money::parse("-3.25").unwrap(), Money::from_minor(-325));
    }

    #[test]
    fn rejects_malformed_amounts() {
        for input in ["", "abc", "1,5", "10.555", "-", "1.2.3"] {
            assert!(Money::parse(input).is_err(), "`{input}` should be rejected");
        }
    }

    #[test]
    fn displays_two_fraction_digits() {
        assert_eq!(Money::from_minor(100_000).to_string(), "1000.00");
        assert_eq!(Money::from_minor(5).to_string(), "0.05");
        assert_eq!(Money::from_minor(-1_234).to_string(), "-12.34");
    }

    #[test]
    fn summation_saturates_instead_of_overflowing() {
        let nearly_max = Money::from_minor(i64::MAX - 1);
        assert_eq!(
            nearly_max.saturating_add(Money::from_minor(100)),
            Money::from_minor(i64::MAX)
        );
    }
}
