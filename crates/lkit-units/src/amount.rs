use std::fmt;
use std::str::FromStr;

use primitive_types::U256;
use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::{UnitError, UnitResult};

/// A non-negative quantity in the ledger's indivisible base unit.
///
/// Backed by a 256-bit unsigned integer, the native word size of the target
/// ledger. Amounts never pass through floating point: they are parsed from
/// and rendered to decimal strings, and every arithmetic helper is checked.
#[derive(Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Amount(U256);

impl Amount {
    /// The zero amount.
    pub const ZERO: Self = Self(U256([0; 4]));

    /// The largest representable amount, 2^256 - 1.
    pub const MAX: Self = Self(U256::MAX);

    /// Wrap a raw 256-bit integer.
    pub const fn from_u256(value: U256) -> Self {
        Self(value)
    }

    /// The underlying 256-bit integer.
    pub fn as_u256(&self) -> U256 {
        self.0
    }

    /// Returns `true` if the amount is zero.
    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    /// Parse a decimal integer string.
    ///
    /// Surrounding whitespace and a leading `+` are accepted. A leading `-`
    /// is rejected: base units are never negative.
    pub fn from_dec_str(input: &str) -> UnitResult<Self> {
        let trimmed = input.trim();
        let digits = trimmed.strip_prefix('+').unwrap_or(trimmed);
        if digits.starts_with('-') {
            return Err(UnitError::invalid(input, "negative amounts are not allowed"));
        }
        if digits.is_empty() {
            return Err(UnitError::invalid(input, "no digits"));
        }
        if !digits.bytes().all(|b| b.is_ascii_digit()) {
            return Err(UnitError::invalid(input, "not a decimal integer"));
        }
        U256::from_dec_str(digits)
            .map(Self)
            .map_err(|_| UnitError::invalid(input, "exceeds 2^256 - 1"))
    }

    /// Parse either a `0x`-prefixed hex integer or a decimal integer.
    pub fn parse(input: &str) -> UnitResult<Self> {
        let trimmed = input.trim();
        match trimmed
            .strip_prefix("0x")
            .or_else(|| trimmed.strip_prefix("0X"))
        {
            Some(hex) => {
                if hex.is_empty() || hex.len() > 64 {
                    return Err(UnitError::invalid(input, "hex amount must have 1 to 64 digits"));
                }
                if !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
                    return Err(UnitError::invalid(input, "not a hex integer"));
                }
                U256::from_str_radix(hex, 16)
                    .map(Self)
                    .map_err(|_| UnitError::invalid(input, "not a hex integer"))
            }
            None => Self::from_dec_str(trimmed),
        }
    }

    pub fn checked_add(self, other: Self) -> Option<Self> {
        self.0.checked_add(other.0).map(Self)
    }

    pub fn checked_sub(self, other: Self) -> Option<Self> {
        self.0.checked_sub(other.0).map(Self)
    }

    pub fn checked_mul(self, other: Self) -> Option<Self> {
        self.0.checked_mul(other.0).map(Self)
    }

    /// Sum an iterator of amounts, returning `None` on overflow.
    pub fn checked_sum<I>(amounts: I) -> Option<Self>
    where
        I: IntoIterator<Item = Self>,
    {
        amounts
            .into_iter()
            .try_fold(Self::ZERO, |acc, amount| acc.checked_add(amount))
    }
}

impl From<u64> for Amount {
    fn from(value: u64) -> Self {
        Self(U256::from(value))
    }
}

impl From<u128> for Amount {
    fn from(value: u128) -> Self {
        Self(U256::from(value))
    }
}

impl From<U256> for Amount {
    fn from(value: U256) -> Self {
        Self(value)
    }
}

impl From<Amount> for U256 {
    fn from(amount: Amount) -> Self {
        amount.0
    }
}

impl FromStr for Amount {
    type Err = UnitError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_dec_str(s)
    }
}

impl fmt::Debug for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Amount({})", self.0)
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl Serialize for Amount {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for Amount {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(AmountVisitor)
    }
}

struct AmountVisitor;

impl<'de> Visitor<'de> for AmountVisitor {
    type Value = Amount;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a non-negative integer, decimal string, or 0x-prefixed hex string")
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<Amount, E> {
        Ok(Amount::from(v))
    }

    fn visit_u128<E: de::Error>(self, v: u128) -> Result<Amount, E> {
        Ok(Amount::from(v))
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<Amount, E> {
        u64::try_from(v)
            .map(Amount::from)
            .map_err(|_| E::custom(format!("negative amount: {v}")))
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<Amount, E> {
        Amount::parse(v).map_err(E::custom)
    }
}
