//! Money type in integer minor currency units.
//!
//! CRITICAL: Never use floating-point for money calculations.
//! Every amount in the ledger is an `i64` count of öre (1/100 SEK).

use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Neg, Sub, SubAssign};

use serde::{Deserialize, Serialize};

/// Number of minor units in one major unit (öre per krona).
pub const MINOR_UNITS_PER_MAJOR: i64 = 100;

/// A signed monetary amount in minor units.
///
/// Positive values credit an account, negative values debit it.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Money(i64);

impl Money {
    /// The zero amount.
    pub const ZERO: Self = Self(0);

    /// Creates an amount from a count of minor units.
    #[must_use]
    pub const fn from_minor(minor: i64) -> Self {
        Self(minor)
    }

    /// Creates an amount from whole major units (kronor).
    #[must_use]
    pub const fn from_major(major: i64) -> Self {
        Self(major * MINOR_UNITS_PER_MAJOR)
    }

    /// Returns the amount in minor units.
    #[must_use]
    pub const fn minor_units(self) -> i64 {
        self.0
    }

    /// Returns true if the amount is zero.
    #[must_use]
    pub const fn is_zero(self) -> bool {
        self.0 == 0
    }

    /// Returns true if the amount is strictly positive.
    #[must_use]
    pub const fn is_positive(self) -> bool {
        self.0 > 0
    }

    /// Returns true if the amount is negative.
    #[must_use]
    pub const fn is_negative(self) -> bool {
        self.0 < 0
    }

    /// Returns the absolute amount.
    #[must_use]
    pub const fn abs(self) -> Self {
        Self(self.0.abs())
    }

    /// Negates the amount, or `None` for `i64::MIN` öre.
    #[must_use]
    pub const fn checked_neg(self) -> Option<Self> {
        match self.0.checked_neg() {
            Some(v) => Some(Self(v)),
            None => None,
        }
    }
}

impl From<i64> for Money {
    fn from(minor: i64) -> Self {
        Self(minor)
    }
}

impl From<Money> for i64 {
    fn from(money: Money) -> Self {
        money.0
    }
}

impl Add for Money {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self(self.0 + rhs.0)
    }
}

impl AddAssign for Money {
    fn add_assign(&mut self, rhs: Self) {
        self.0 += rhs.0;
    }
}

impl Sub for Money {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        Self(self.0 - rhs.0)
    }
}

impl SubAssign for Money {
    fn sub_assign(&mut self, rhs: Self) {
        self.0 -= rhs.0;
    }
}

impl Neg for Money {
    type Output = Self;

    fn neg(self) -> Self {
        Self(-self.0)
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::ZERO, Add::add)
    }
}

/// Swedish currency formatting, e.g. `12,50 kr` or `-3,05 kr`.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let abs = self.0.unsigned_abs();
        let per_major = MINOR_UNITS_PER_MAJOR.unsigned_abs();
        write!(f, "{sign}{},{:02} kr", abs / per_major, abs % per_major)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_money_constructors() {
        assert_eq!(Money::from_minor(1250).minor_units(), 1250);
        assert_eq!(Money::from_major(12).minor_units(), 1200);
        assert!(Money::ZERO.is_zero());
        assert_eq!(Money::default(), Money::ZERO);
    }

    #[test]
    fn test_money_sign() {
        assert!(Money::from_minor(1).is_positive());
        assert!(Money::from_minor(-1).is_negative());
        assert!(!Money::ZERO.is_positive());
        assert!(!Money::ZERO.is_negative());
        assert_eq!(Money::from_minor(-500).abs(), Money::from_minor(500));
    }

    #[test]
    fn test_money_arithmetic() {
        let mut balance = Money::from_minor(1000);
        balance -= Money::from_minor(1500);
        assert_eq!(balance, Money::from_minor(-500));
        balance += Money::from_minor(200);
        assert_eq!(balance, Money::from_minor(-300));
        assert_eq!(-balance, Money::from_minor(300));

        let total: Money = [100, -40, 15].into_iter().map(Money::from_minor).sum();
        assert_eq!(total, Money::from_minor(75));
    }

    #[test]
    fn test_money_checked_neg_at_boundary() {
        assert_eq!(Money::from_minor(-1000).checked_neg(), Some(Money::from_minor(1000)));
        assert_eq!(
            Money::from_minor(i64::MAX).checked_neg(),
            Some(Money::from_minor(-i64::MAX))
        );
        assert_eq!(Money::from_minor(i64::MIN).checked_neg(), None);
    }

    #[test]
    fn test_money_display() {
        assert_eq!(Money::from_minor(1250).to_string(), "12,50 kr");
        assert_eq!(Money::from_minor(5).to_string(), "0,05 kr");
        assert_eq!(Money::from_minor(-305).to_string(), "-3,05 kr");
        assert_eq!(Money::ZERO.to_string(), "0,00 kr");
    }

    #[test]
    fn test_money_serializes_as_integer() {
        assert_eq!(serde_json::to_string(&Money::from_minor(-42)).unwrap(), "-42");
        let parsed: Money = serde_json::from_str("1000").unwrap();
        assert_eq!(parsed, Money::from_minor(1000));
    }
}
