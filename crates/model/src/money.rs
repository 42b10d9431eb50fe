use std::{
    fmt,
    iter::Sum,
    ops::{Add, AddAssign, Neg, Sub, SubAssign},
    str::FromStr,
};

use crate::ModelError;

/// Signed money amount in **integer centavos**.
///
/// All in-process monetary values (balances, transaction magnitudes, goal
/// and budget amounts) use this type so that folds and aggregates never
/// accumulate floating-point drift. The wire carries decimal numbers; the
/// store boundary converts with [`Money::from_decimal`] / [`Money::to_decimal`].
///
/// # Examples
///
/// ```rust
/// use model::Money;
///
/// let amount = Money::new(12_34);
/// assert_eq!(amount.cents(), 1234);
/// assert_eq!(amount.to_string(), "R$ 12,34");
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(transparent)]
pub struct Money(i64);

impl Money {
    pub const ZERO: Money = Money(0);

    /// Creates a new amount from integer centavos.
    #[must_use]
    pub const fn new(cents: i64) -> Self {
        Self(cents)
    }

    /// Returns the raw value in centavos.
    #[must_use]
    pub const fn cents(self) -> i64 {
        self.0
    }

    /// Converts a wire-side decimal value, rounding to the nearest centavo.
    #[must_use]
    pub fn from_decimal(value: f64) -> Self {
        Self((value * 100.0).round() as i64)
    }

    /// Converts back to the wire-side decimal representation.
    #[must_use]
    pub fn to_decimal(self) -> f64 {
        self.0 as f64 / 100.0
    }

    #[must_use]
    pub const fn is_zero(self) -> bool {
        self.0 == 0
    }

    #[must_use]
    pub const fn is_negative(self) -> bool {
        self.0 < 0
    }

    /// Ratio of `self` over `total` as a plain fraction; `None` when
    /// `total` is zero.
    #[must_use]
    pub fn ratio_of(self, total: Money) -> Option<f64> {
        if total.is_zero() {
            return None;
        }
        Some(self.0 as f64 / total.0 as f64)
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let abs = self.0.unsigned_abs();
        write!(f, "{sign}R$ {},{:02}", abs / 100, abs % 100)
    }
}

impl From<i64> for Money {
    fn from(cents: i64) -> Self {
        Self(cents)
    }
}

impl From<Money> for i64 {
    fn from(value: Money) -> Self {
        value.0
    }
}

impl Add for Money {
    type Output = Money;

    fn add(self, rhs: Money) -> Self::Output {
        Money(self.0 + rhs.0)
    }
}

impl AddAssign for Money {
    fn add_assign(&mut self, rhs: Money) {
        self.0 += rhs.0;
    }
}

impl Sub for Money {
    type Output = Money;

    fn sub(self, rhs: Money) -> Self::Output {
        Money(self.0 - rhs.0)
    }
}

impl SubAssign for Money {
    fn sub_assign(&mut self, rhs: Money) {
        self.0 -= rhs.0;
    }
}

impl Neg for Money {
    type Output = Money;

    fn neg(self) -> Self::Output {
        Money(-self.0)
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Money {
        iter.fold(Money::ZERO, Add::add)
    }
}

impl<'a> Sum<&'a Money> for Money {
    fn sum<I: Iterator<Item = &'a Money>>(iter: I) -> Money {
        iter.copied().sum()
    }
}

impl FromStr for Money {
    type Err = ModelError;

    /// Parses a decimal string into centavos.
    ///
    /// Accepts `,` or `.` as the decimal separator, an optional leading
    /// `-`, and at most two fractional digits.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || ModelError::InvalidAmount(s.to_string());

        let trimmed = s.trim();
        let (negative, digits) = match trimmed.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, trimmed),
        };
        if digits.is_empty() {
            return Err(invalid());
        }

        let normalized = digits.replace(',', ".");
        let (whole, frac) = match normalized.split_once('.') {
            Some((whole, frac)) => (whole, frac),
            None => (normalized.as_str(), ""),
        };
        if whole.is_empty()
            || frac.len() > 2
            || !whole.chars().all(|c| c.is_ascii_digit())
            || !frac.chars().all(|c| c.is_ascii_digit())
        {
            return Err(invalid());
        }

        let whole: i64 = whole.parse().map_err(|_| invalid())?;
        let frac: i64 = match frac.len() {
            0 => 0,
            1 => frac.parse::<i64>().map_err(|_| invalid())? * 10,
            _ => frac.parse().map_err(|_| invalid())?,
        };

        let cents = whole
            .checked_mul(100)
            .and_then(|v| v.checked_add(frac))
            .ok_or_else(|| ModelError::InvalidAmount("amount too large".to_string()))?;

        Ok(Money(if negative { -cents } else { cents }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_formats_brl() {
        assert_eq!(Money::new(0).to_string(), "R$ 0,00");
        assert_eq!(Money::new(5).to_string(), "R$ 0,05");
        assert_eq!(Money::new(123_456).to_string(), "R$ 1234,56");
        assert_eq!(Money::new(-1050).to_string(), "-R$ 10,50");
    }

    #[test]
    fn decimal_round_trips_at_two_places() {
        assert_eq!(Money::from_decimal(150.0).cents(), 15_000);
        assert_eq!(Money::from_decimal(25.5).cents(), 2550);
        assert_eq!(Money::from_decimal(-0.01).cents(), -1);
        assert_eq!(Money::new(2550).to_decimal(), 25.5);
    }

    #[test]
    fn parse_accepts_comma_or_dot() {
        assert_eq!("10".parse::<Money>().unwrap().cents(), 1000);
        assert_eq!("10,5".parse::<Money>().unwrap().cents(), 1050);
        assert_eq!("10.50".parse::<Money>().unwrap().cents(), 1050);
        assert_eq!("-0,01".parse::<Money>().unwrap().cents(), -1);
    }

    #[test]
    fn parse_rejects_junk() {
        assert!("".parse::<Money>().is_err());
        assert!("-".parse::<Money>().is_err());
        assert!("12.345".parse::<Money>().is_err());
        assert!("abc".parse::<Money>().is_err());
        assert!("1,2,3".parse::<Money>().is_err());
    }

    #[test]
    fn sums_iterators() {
        let values = [Money::new(100), Money::new(-30), Money::new(5)];
        assert_eq!(values.iter().sum::<Money>(), Money::new(75));
    }

    #[test]
    fn ratio_handles_zero_total() {
        assert_eq!(Money::new(50).ratio_of(Money::new(200)), Some(0.25));
        assert_eq!(Money::new(50).ratio_of(Money::ZERO), None);
    }
}
