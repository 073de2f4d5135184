use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Currency amount stored as minor units (cents).
///
/// On the wire it is a plain decimal number such as `150.25`; rounding to two
/// fractional digits happens once, when a decimal is converted in.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Money(i64);

impl Money {
    pub const ZERO: Money = Money(0);

    /// Largest amount whose decimal form survives the trip through a JSON
    /// number (15 significant digits).
    pub const MAX_EXACT: Money = Money(999_999_999_999_999);

    pub const fn from_cents(cents: i64) -> Self {
        Self(cents)
    }

    pub const fn cents(self) -> i64 {
        self.0
    }

    /// Convert a decimal amount, rounding half away from zero to whole cents.
    /// Returns `None` for NaN, infinities and values outside the `i64` range.
    pub fn from_decimal(value: f64) -> Option<Self> {
        if !value.is_finite() {
            return None;
        }
        let cents = (value * 100.0).round();
        if cents < i64::MIN as f64 || cents > i64::MAX as f64 {
            return None;
        }
        Some(Self(cents as i64))
    }

    pub fn to_decimal(self) -> f64 {
        self.0 as f64 / 100.0
    }

    /// Multiply by a quantity, `None` when the product is beyond
    /// [`Money::MAX_EXACT`] in either direction.
    pub fn checked_mul(self, quantity: i64) -> Option<Self> {
        self.0
            .checked_mul(quantity)
            .filter(|cents| cents.unsigned_abs() <= Self::MAX_EXACT.0.unsigned_abs())
            .map(Self)
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let abs = self.0.unsigned_abs();
        write!(f, "{sign}{}.{:02}", abs / 100, abs % 100)
    }
}

impl Serialize for Money {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_f64(self.to_decimal())
    }
}

impl<'de> Deserialize<'de> for Money {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = f64::deserialize(deserializer)?;
        Money::from_decimal(value)
            .ok_or_else(|| serde::de::Error::custom(format!("amount `{value}` is out of range")))
    }
}
