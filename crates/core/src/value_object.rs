//! Value objects: equality by value, not identity.
//!
//! Value objects are domain objects that have **no identity** - they are defined entirely
//! by their attribute values. Two value objects with the same values are considered equal.

use core::iter::Sum;
use core::ops::{Add, AddAssign, Neg, Sub, SubAssign};
use core::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{DomainError, DomainResult};

/// Marker trait for value objects.
///
/// Value objects are **immutable** and **compared by value**. To "modify" one,
/// build a new one.
pub trait ValueObject: Clone + PartialEq + core::fmt::Debug {}

/// Monetary amount in minor units (cents).
///
/// All ledger arithmetic is exact integer arithmetic: `15420.75` is stored as
/// `1_542_075`. Serialized as a bare JSON integer.
///
/// Stored amounts are kept within [`Money::MAX_AMOUNT`] by the domain
/// constructors. The operators saturate at the `i64` bounds instead of
/// panicking; use the `checked_*` methods where an exact result is required.
#[derive(
    Debug, Copy, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Money(i64);

impl ValueObject for Money {}

impl Money {
    pub const ZERO: Money = Money(0);

    /// Largest magnitude accepted for a single stored amount or balance
    /// (10 trillion in major units).
    pub const MAX_AMOUNT: Money = Money(1_000_000_000_000_000);

    pub const fn from_minor(minor_units: i64) -> Self {
        Self(minor_units)
    }

    pub const fn minor_units(self) -> i64 {
        self.0
    }

    pub const fn is_zero(self) -> bool {
        self.0 == 0
    }

    pub const fn is_negative(self) -> bool {
        self.0 < 0
    }

    pub const fn is_positive(self) -> bool {
        self.0 > 0
    }

    pub const fn abs(self) -> Self {
        Self(self.0.saturating_abs())
    }

    pub fn checked_add(self, rhs: Money) -> Option<Money> {
        self.0.checked_add(rhs.0).map(Money)
    }

    pub fn checked_sub(self, rhs: Money) -> Option<Money> {
        self.0.checked_sub(rhs.0).map(Money)
    }

    /// Sum that fails instead of saturating.
    pub fn checked_sum<I: IntoIterator<Item = Money>>(iter: I) -> Option<Money> {
        iter.into_iter().try_fold(Money::ZERO, Money::checked_add)
    }

    /// `true` when `|self| <= MAX_AMOUNT`.
    pub const fn is_within_limit(self) -> bool {
        self.0 >= -Self::MAX_AMOUNT.0 && self.0 <= Self::MAX_AMOUNT.0
    }

    /// Validation error naming `what` when the amount exceeds [`Money::MAX_AMOUNT`].
    pub fn ensure_within_limit(self, what: &str) -> DomainResult<Money> {
        if self.is_within_limit() {
            Ok(self)
        } else {
            Err(DomainError::validation(format!(
                "{what} must be between -{max} and {max}",
                max = Self::MAX_AMOUNT
            )))
        }
    }

    pub fn checked_mul(self, quantity: i64) -> Option<Money> {
        self.0.checked_mul(quantity).map(Money)
    }

    /// Apply a rate expressed in basis points (1/100 of a percent), rounding
    /// half away from zero to the nearest minor unit.
    pub fn apply_rate_bps(self, bps: u32) -> Money {
        let scaled = self.0 as i128 * bps as i128;
        let half = 5_000i128;
        let rounded = if scaled >= 0 {
            (scaled + half) / 10_000
        } else {
            (scaled - half) / 10_000
        };
        Money(rounded.clamp(i64::MIN as i128, i64::MAX as i128) as i64)
    }
}

impl Add for Money {
    type Output = Money;

    fn add(self, rhs: Money) -> Money {
        Money(self.0.saturating_add(rhs.0))
    }
}

impl AddAssign for Money {
    fn add_assign(&mut self, rhs: Money) {
        self.0 = self.0.saturating_add(rhs.0);
    }
}

impl Sub for Money {
    type Output = Money;

    fn sub(self, rhs: Money) -> Money {
        Money(self.0.saturating_sub(rhs.0))
    }
}

impl SubAssign for Money {
    fn sub_assign(&mut self, rhs: Money) {
        self.0 = self.0.saturating_sub(rhs.0);
    }
}

impl Neg for Money {
    type Output = Money;

    fn neg(self) -> Money {
        Money(self.0.saturating_neg())
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

impl core::fmt::Display for Money {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let abs = self.0.unsigned_abs();
        write!(f, "{sign}{}.{:02}", abs / 100, abs % 100)
    }
}

/// Parses decimal notation: `"15420.75"`, `"-3.5"`, `"12"`.
impl FromStr for Money {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || DomainError::validation(format!("invalid amount: {s:?}"));

        let trimmed = s.trim();
        let (negative, digits) = match trimmed.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, trimmed),
        };
        let (units, fraction) = digits.split_once('.').unwrap_or((digits, ""));

        if units.is_empty() || fraction.len() > 2 {
            return Err(invalid());
        }
        if !units.bytes().chain(fraction.bytes()).all(|b| b.is_ascii_digit()) {
            return Err(invalid());
        }

        let units: i64 = units.parse().map_err(|_| invalid())?;
        let cents: i64 = match fraction.len() {
            0 => 0,
            1 => fraction.parse::<i64>().map_err(|_| invalid())? * 10,
            _ => fraction.parse().map_err(|_| invalid())?,
        };

        let minor = units
            .checked_mul(100)
            .and_then(|v| v.checked_add(cents))
            .ok_or_else(invalid)?;
        Ok(Money(if negative { -minor } else { minor }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn parses_and_displays_decimal_amounts() {
        let m: Money = "15420.75".parse().unwrap();
        assert_eq!(m.minor_units(), 1_542_075);
        assert_eq!(m.to_string(), "15420.75");

        assert_eq!("-3.5".parse::<Money>().unwrap().minor_units(), -350);
        assert_eq!("12".parse::<Money>().unwrap().to_string(), "12.00");
        assert_eq!(Money::from_minor(-5).to_string(), "-0.05");
    }

    #[test]
    fn serializes_as_minor_units() {
        let m = Money::from_minor(1_542_075);
        assert_eq!(serde_json::to_string(&m).unwrap(), "1542075");
        let back: Money = serde_json::from_str("-250").unwrap();
        assert_eq!(back, Money::from_minor(-250));
    }

    #[test]
    fn rejects_malformed_amounts() {
        for bad in ["", "-", "1.234", "abc", "1,00", ".5", "1.-5"] {
            assert!(bad.parse::<Money>().is_err(), "{bad:?} should not parse");
        }
    }

    #[test]
    fn rate_rounds_half_away_from_zero() {
        // 10% of 0.05 = 0.005 -> 0.01
        assert_eq!(Money::from_minor(5).apply_rate_bps(1_000), Money::from_minor(1));
        assert_eq!(Money::from_minor(-5).apply_rate_bps(1_000), Money::from_minor(-1));
        assert_eq!(Money::from_minor(10_000).apply_rate_bps(825), Money::from_minor(825));
    }

    #[test]
    fn operators_saturate_instead_of_overflowing() {
        let max = Money::from_minor(i64::MAX);
        let min = Money::from_minor(i64::MIN);
        assert_eq!(max + Money::from_minor(1), max);
        assert_eq!(min - Money::from_minor(1), min);
        assert_eq!(-min, max);
        assert_eq!(min.abs(), max);
        assert_eq!([max, max, Money::from_minor(3)].into_iter().sum::<Money>(), max);
    }

    #[test]
    fn checked_helpers_report_overflow() {
        let max = Money::from_minor(i64::MAX);
        assert_eq!(max.checked_add(Money::from_minor(1)), None);
        assert_eq!(Money::from_minor(i64::MIN).checked_sub(Money::from_minor(1)), None);
        assert_eq!(Money::checked_sum([max, Money::from_minor(1)]), None);
        assert_eq!(
            Money::checked_sum([Money::from_minor(2), Money::from_minor(3)]),
            Some(Money::from_minor(5))
        );
    }

    #[test]
    fn limit_bounds_both_signs() {
        assert!(Money::MAX_AMOUNT.ensure_within_limit("amount").is_ok());
        assert!((-Money::MAX_AMOUNT).ensure_within_limit("amount").is_ok());

        let err = (Money::MAX_AMOUNT + Money::from_minor(1))
            .ensure_within_limit("opening balance")
            .unwrap_err();
        assert!(matches!(err, DomainError::Validation(msg) if msg.starts_with("opening balance")));
        assert!(!Money::from_minor(i64::MIN).is_within_limit());
    }

    proptest! {
        #[test]
        fn display_then_parse_is_identity(minor in -1_000_000_000i64..1_000_000_000i64) {
            let m = Money::from_minor(minor);
            prop_assert_eq!(m.to_string().parse::<Money>().unwrap(), m);
        }
    }
}
