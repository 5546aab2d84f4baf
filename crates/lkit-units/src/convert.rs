use std::fmt;
use std::str::FromStr;

use primitive_types::U256;
use serde::{Deserialize, Serialize};

use crate::amount::Amount;
use crate::error::{UnitError, UnitResult};
use crate::unit::{Unit, MAX_SCALE};

/// How to treat fractional digits finer than the target scale.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConversionMode {
    /// Drop them, rounding toward zero.
    #[default]
    Truncate,
    /// Reject the input unless every dropped digit is zero.
    Strict,
}

/// A validated, canonical, non-negative decimal amount in display units.
///
/// Canonical form has no leading zeros in the integer part (except a lone
/// `0`), no trailing zeros in the fraction, and no `.` when the fraction is
/// empty. Two display amounts are equal exactly when they denote the same
/// value.
#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct DisplayAmount(String);

impl DisplayAmount {
    /// Validate and canonicalize a decimal string.
    pub fn parse(input: &str) -> UnitResult<Self> {
        let parts = DecimalParts::parse(input)?;
        Ok(Self::from_parts(parts.integer, parts.fraction))
    }

    fn from_parts(integer: &str, fraction: &str) -> Self {
        let integer = integer.trim_start_matches('0');
        let fraction = fraction.trim_end_matches('0');
        let integer = if integer.is_empty() { "0" } else { integer };
        if fraction.is_empty() {
            Self(integer.to_string())
        } else {
            Self(format!("{integer}.{fraction}"))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }

    /// Integer part of the amount.
    pub fn integer_part(&self) -> &str {
        self.0.split_once('.').map_or(self.0.as_str(), |(int, _)| int)
    }

    /// Fractional digits, empty when the amount is whole.
    pub fn fraction_part(&self) -> &str {
        self.0.split_once('.').map_or("", |(_, frac)| frac)
    }
}

impl fmt::Debug for DisplayAmount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "DisplayAmount({})", self.0)
    }
}

impl fmt::Display for DisplayAmount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for DisplayAmount {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl FromStr for DisplayAmount {
    type Err = UnitError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for DisplayAmount {
    type Error = UnitError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<DisplayAmount> for String {
    fn from(amount: DisplayAmount) -> Self {
        amount.0
    }
}

impl PartialEq<str> for DisplayAmount {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for DisplayAmount {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

/// Borrowed integer and fraction digits of a syntactically valid decimal.
struct DecimalParts<'a> {
    integer: &'a str,
    fraction: &'a str,
}

impl<'a> DecimalParts<'a> {
    fn parse(input: &'a str) -> UnitResult<Self> {
        let trimmed = input.trim();
        if trimmed.starts_with('-') {
            return Err(UnitError::invalid(input, "negative amounts are not allowed"));
        }
        let body = trimmed.strip_prefix('+').unwrap_or(trimmed);
        let (integer, fraction) = body.split_once('.').unwrap_or((body, ""));
        if integer.is_empty() && fraction.is_empty() {
            return Err(UnitError::invalid(input, "no digits"));
        }
        let all_digits = |s: &str| s.bytes().all(|b| b.is_ascii_digit());
        if !all_digits(integer) || !all_digits(fraction) {
            return Err(UnitError::invalid(input, "not a decimal number"));
        }
        Ok(Self { integer, fraction })
    }
}

fn check_scale(scale: u32) -> UnitResult<usize> {
    if scale > MAX_SCALE {
        return Err(UnitError::ScaleTooLarge {
            scale,
            max: MAX_SCALE,
        });
    }
    Ok(scale as usize)
}

/// Convert a display amount to base units, truncating excess fractional
/// digits toward zero.
///
/// `to_base_units("1.5", 18)` is `1500000000000000000`.
pub fn to_base_units(display: impl AsRef<str>, scale: u32) -> UnitResult<Amount> {
    to_base_units_with(display, scale, ConversionMode::Truncate)
}

/// Convert a display amount to base units under an explicit
/// [`ConversionMode`].
pub fn to_base_units_with(
    display: impl AsRef<str>,
    scale: u32,
    mode: ConversionMode,
) -> UnitResult<Amount> {
    let input = display.as_ref();
    let width = check_scale(scale)?;
    let parts = DecimalParts::parse(input)?;

    let keep = parts.fraction.len().min(width);
    let (kept, dropped) = parts.fraction.split_at(keep);
    if mode == ConversionMode::Strict && dropped.bytes().any(|b| b != b'0') {
        return Err(UnitError::invalid(
            input,
            format!("more than {scale} fractional digits"),
        ));
    }

    let mut digits = String::with_capacity(parts.integer.len() + width);
    digits.push_str(parts.integer.trim_start_matches('0'));
    digits.push_str(kept);
    digits.extend(std::iter::repeat('0').take(width - keep));

    let digits = digits.trim_start_matches('0');
    if digits.is_empty() {
        return Ok(Amount::ZERO);
    }
    U256::from_dec_str(digits)
        .map(Amount::from_u256)
        .map_err(|_| UnitError::invalid(input, "exceeds 2^256 - 1 base units"))
}

/// Convert a base-unit amount to its exact display representation.
///
/// `from_base_units(1000000000000000000, 18)` is `"1"`.
pub fn from_base_units(amount: Amount, scale: u32) -> UnitResult<DisplayAmount> {
    let width = check_scale(scale)?;
    let value = amount.as_u256();
    if width == 0 {
        return Ok(DisplayAmount(value.to_string()));
    }
    let (integer, remainder) = value.div_mod(U256::exp10(width));
    let fraction = format!("{:0>width$}", remainder.to_string());
    Ok(DisplayAmount::from_parts(&integer.to_string(), &fraction))
}

/// Parse a decimal integer string of base units, then convert it.
///
/// Fails with [`UnitError::InvalidAmount`] when the input is negative or not
/// an integer.
pub fn from_base_units_str(amount: &str, scale: u32) -> UnitResult<DisplayAmount> {
    from_base_units(Amount::from_dec_str(amount)?, scale)
}

/// [`to_base_units`] for a named unit.
pub fn to_base_units_in(display: impl AsRef<str>, unit: Unit) -> UnitResult<Amount> {
    to_base_units(display, unit.scale())
}

/// [`from_base_units`] for a named unit.
pub fn from_base_units_in(amount: Amount, unit: Unit) -> UnitResult<DisplayAmount> {
    from_base_units(amount, unit.scale())
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const ETHER: u32 = 18;

    #[test]
    fn one_ether_displays_as_one() {
        let one = Amount::from(1_000_000_000_000_000_000u64);
        assert_eq!(from_base_units(one, ETHER).unwrap(), "1");
    }

    #[test]
    fn one_and_a_half_ether() {
        assert_eq!(
            to_base_units("1.5", ETHER).unwrap(),
            Amount::from(1_500_000_000_000_000_000u64)
        );
    }

    #[test]
    fn negative_display_is_rejected() {
        let err = to_base_units("-1", ETHER).unwrap_err();
        assert!(matches!(err, UnitError::InvalidAmount { .. }));
    }

    #[test]
    fn negative_base_units_are_rejected() {
        let err = from_base_units_str("-1", ETHER).unwrap_err();
        assert!(matches!(err, UnitError::InvalidAmount { .. }));
    }

    #[test]
    fn max_word_is_exact() {
        let display = from_base_units(Amount::MAX, ETHER).unwrap();
        assert_eq!(
            display,
            "115792089237316195423570985008687907853269984665640564039457.584007913129639935"
        );
        assert_eq!(to_base_units(&display, ETHER).unwrap(), Amount::MAX);
    }

    #[test]
    fn overflow_is_invalid_amount() {
        let err = to_base_units("115792089237316195423570985008687907853269984665640564039458", ETHER)
            .unwrap_err();
        assert!(matches!(err, UnitError::InvalidAmount { .. }));
    }

    #[test]
    fn small_fractions_keep_leading_zeros() {
        assert_eq!(from_base_units(Amount::from(1u64), ETHER).unwrap(), "0.000000000000000001");
        assert_eq!(from_base_units(Amount::from(1_050u64), 3).unwrap(), "1.05");
        assert_eq!(from_base_units(Amount::ZERO, ETHER).unwrap(), "0");
    }

    #[test]
    fn scale_zero_is_identity() {
        assert_eq!(from_base_units(Amount::from(42u64), 0).unwrap(), "42");
        assert_eq!(to_base_units("42", 0).unwrap(), Amount::from(42u64));
        assert_eq!(to_base_units("42.9", 0).unwrap(), Amount::from(42u64));
    }

    #[test]
    fn truncates_toward_zero() {
        assert_eq!(to_base_units("0.0000009", 6).unwrap(), Amount::ZERO);
        assert_eq!(to_base_units("1.2345678", 6).unwrap(), Amount::from(1_234_567u64));
    }

    #[test]
    fn strict_mode_rejects_lost_digits() {
        let err = to_base_units_with("1.2345678", 6, ConversionMode::Strict).unwrap_err();
        assert!(matches!(err, UnitError::InvalidAmount { .. }));
        // Trailing zeros beyond the scale lose nothing.
        assert_eq!(
            to_base_units_with("1.2345670000", 6, ConversionMode::Strict).unwrap(),
            Amount::from(1_234_567u64)
        );
    }

    #[test]
    fn accepts_loose_decimal_forms() {
        assert_eq!(to_base_units(".5", 1).unwrap(), Amount::from(5u64));
        assert_eq!(to_base_units("2.", 1).unwrap(), Amount::from(20u64));
        assert_eq!(to_base_units(" +007 ", 2).unwrap(), Amount::from(700u64));
    }

    #[test]
    fn rejects_malformed_input() {
        for bad in ["", ".", "abc", "1.2.3", "1e18", "0x10", "1,5", "- 1"] {
            assert!(to_base_units(bad, ETHER).is_err(), "{bad:?} should be rejected");
        }
    }

    #[test]
    fn scale_limit() {
        assert!(to_base_units("1", MAX_SCALE).is_ok());
        assert_eq!(
            to_base_units("1", 78).unwrap_err(),
            UnitError::ScaleTooLarge { scale: 78, max: MAX_SCALE }
        );
        assert!(from_base_units(Amount::from(1u64), 78).is_err());
    }

    #[test]
    fn named_units() {
        assert_eq!(
            to_base_units_in("50", Unit::Gwei).unwrap(),
            Amount::from(50_000_000_000u64)
        );
        assert_eq!(
            from_base_units_in(Amount::from(21_000_000_000u64), Unit::Gwei).unwrap(),
            "21"
        );
    }

    #[test]
    fn display_amount_is_canonical() {
        assert_eq!(DisplayAmount::parse("007.500").unwrap(), "7.5");
        assert_eq!(DisplayAmount::parse("0.000").unwrap(), "0");
        assert_eq!(DisplayAmount::parse(".25").unwrap(), "0.25");
        let d = DisplayAmount::parse("12.034").unwrap();
        assert_eq!(d.integer_part(), "12");
        assert_eq!(d.fraction_part(), "034");
    }

    #[test]
    fn display_amount_serde() {
        let d: DisplayAmount = serde_json::from_str("\"3.10\"").unwrap();
        assert_eq!(d, "3.1");
        assert_eq!(serde_json::to_string(&d).unwrap(), "\"3.1\"");
        assert!(serde_json::from_str::<DisplayAmount>("\"-3\"").is_err());
    }

    fn any_amount() -> impl Strategy<Value = Amount> {
        any::<[u64; 4]>().prop_map(|words| Amount::from_u256(U256(words)))
    }

    proptest! {
        #[test]
        fn base_units_roundtrip(amount in any_amount(), scale in prop::sample::select(vec![0u32, 6, 18])) {
            let display = from_base_units(amount, scale).unwrap();
            prop_assert_eq!(to_base_units(&display, scale).unwrap(), amount);
        }

        #[test]
        fn strict_accepts_own_output(amount in any_amount(), scale in 0u32..=MAX_SCALE) {
            let display = from_base_units(amount, scale).unwrap();
            prop_assert_eq!(
                to_base_units_with(&display, scale, ConversionMode::Strict).unwrap(),
                amount
            );
        }
    }
}
