//! Exact unit conversion for LedgerKit.
//!
//! Ledger values are tracked in an indivisible base unit (wei) and shown to
//! humans in a display unit scaled by a fixed power of ten. This crate
//! converts between the two with 256-bit integer arithmetic only; no value
//! ever passes through floating point.
//!
//! # Key Types
//!
//! - [`Amount`] — Non-negative base-unit quantity (up to 2^256 - 1)
//! - [`DisplayAmount`] — Canonical decimal string in display units
//! - [`Unit`] — Named denominations (`wei` through `ether`)
//! - [`ConversionMode`] — Truncating or strict handling of excess precision

pub mod amount;
pub mod convert;
pub mod error;
pub mod unit;

pub use amount::Amount;
pub use convert::{
    from_base_units, from_base_units_in, from_base_units_str, to_base_units, to_base_units_in,
    to_base_units_with, ConversionMode, DisplayAmount,
};
pub use error::{UnitError, UnitResult};
pub use unit::{Unit, MAX_SCALE};
