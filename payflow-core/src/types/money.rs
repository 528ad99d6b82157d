//! [`Money`] represents a transaction amount on the Payflow wire.
//!
//! This module holds its type definition and implementations.

use std::{fmt::Display, str::FromStr};

use rust_decimal::{Decimal, RoundingStrategy, prelude::FromPrimitive};
use serde::{Deserialize, Serialize};

use crate::errors::{Error, Result};

/// A non-negative amount, always held at exactly two decimal places.
///
/// Values are rounded half away from zero when constructed, so `19.999`
/// becomes `20.00` and `15.5` becomes `15.50`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Money(Decimal);

impl Money {
    pub const ZERO: Money = Money(Decimal::from_parts(0, 0, 0, false, 2));

    /// Create a new amount from a decimal value.
    pub fn new(value: Decimal) -> Result<Self> {
        if value.is_sign_negative() && !value.is_zero() {
            return Err(Error::NegativeAmount(value.to_string()));
        }
        if value.is_zero() {
            return Ok(Money::ZERO);
        }

        let mut rounded = value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
        rounded.rescale(2);
        // `rescale` lowers the scale when the mantissa has no room left.
        if rounded.scale() != 2 {
            return Err(Error::InvalidAmount(value.to_string()));
        }
        Ok(Money(rounded))
    }

    /// Create an amount from a whole number of cents.
    pub fn from_cents(cents: u64) -> Self {
        Money(Decimal::from_i128_with_scale(i128::from(cents), 2))
    }

    pub fn as_decimal(&self) -> Decimal {
        self.0
    }

    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    pub fn is_positive(&self) -> bool {
        self.0 > Decimal::ZERO
    }
}

impl Display for Money {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for Money {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let value =
            Decimal::from_str(s.trim()).map_err(|_| Error::InvalidAmount(s.to_string()))?;
        Money::new(value)
    }
}

impl TryFrom<&str> for Money {
    type Error = Error;

    fn try_from(value: &str) -> Result<Self> {
        value.parse()
    }
}

impl TryFrom<f64> for Money {
    type Error = Error;

    fn try_from(value: f64) -> Result<Self> {
        let decimal =
            Decimal::from_f64(value).ok_or_else(|| Error::InvalidAmount(value.to_string()))?;
        Money::new(decimal)
    }
}

impl TryFrom<Decimal> for Money {
    type Error = Error;

    fn try_from(value: Decimal) -> Result<Self> {
        Money::new(value)
    }
}

impl From<u32> for Money {
    fn from(value: u32) -> Self {
        Money::from_cents(u64::from(value) * 100)
    }
}

impl From<u16> for Money {
    fn from(value: u16) -> Self {
        Money::from(u32::from(value))
    }
}

impl From<u8> for Money {
    fn from(value: u8) -> Self {
        Money::from(u32::from(value))
    }
}

impl Serialize for Money {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for Money {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn whole_amounts_get_two_decimals() {
        assert_eq!(Money::from(1u32).to_string(), "1.00");
        assert_eq!(Money::from(250u32).to_string(), "250.00");
    }

    #[test]
    fn rounds_half_away_from_zero() {
        assert_eq!(Money::try_from(19.999).unwrap().to_string(), "20.00");
        assert_eq!(Money::try_from("10.005").unwrap().to_string(), "10.01");
        assert_eq!(Money::try_from("10.004").unwrap().to_string(), "10.00");
    }

    #[test]
    fn parses_strings() {
        assert_eq!(Money::try_from("15.5").unwrap().to_string(), "15.50");
        assert_eq!(" 7 ".parse::<Money>().unwrap().to_string(), "7.00");
        assert_eq!(
            "abc".parse::<Money>(),
            Err(Error::InvalidAmount("abc".to_string()))
        );
    }

    #[test]
    fn rejects_negative_amounts() {
        assert!(matches!(
            Money::try_from("-1.00"),
            Err(Error::NegativeAmount(_))
        ));
        assert!(Money::try_from("-0").unwrap().is_zero());
    }

    #[test]
    fn cents_cover_the_full_u64_range() {
        let largest = Money::from_cents(u64::MAX);
        assert!(largest.is_positive());
        assert_eq!(largest.to_string(), "184467440737095516.15");
        assert_eq!(
            Money::from_cents(1 << 63).to_string(),
            "92233720368547758.08"
        );
    }

    #[test]
    fn rejects_amounts_without_room_for_cents() {
        assert_eq!(
            "79228162514264337593543950335".parse::<Money>(),
            Err(Error::InvalidAmount(
                "79228162514264337593543950335".to_string()
            ))
        );
        assert_eq!(
            "792281625142643375935439503.35"
                .parse::<Money>()
                .unwrap()
                .to_string(),
            "792281625142643375935439503.35"
        );
    }

    #[test]
    fn serializes_as_string() {
        let money = Money::from_cents(1234);
        assert_eq!(serde_json::to_string(&money).unwrap(), "\"12.34\"");
        let back: Money = serde_json::from_str("\"12.34\"").unwrap();
        assert_eq!(back, money);
    }
}
