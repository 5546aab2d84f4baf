//! Test-assertion helpers for LedgerKit.
//!
//! Everything here talks to a ledger through the [`LedgerClient`] and
//! [`TokenReader`] traits, so the same assertions run against a live node
//! adapter or the bundled [`InMemoryLedger`].
//!
//! - [`GasPricing`] — transaction gas cost from the resolved gas price
//! - [`account_balances`] — concurrent balance snapshot keyed by account index
//! - [`check_token`] — total supply and holder balance assertions
//! - [`wait_blocks`] — block-height polling with a timeout
//! - [`is_invalid_opcode`] / [`has_wrong_arguments`] — revert classification

pub mod address;
pub mod assertions;
pub mod balances;
pub mod client;
pub mod error;
pub mod gas;
pub mod logging;
pub mod memory;
pub mod wait;

pub use address::Address;
pub use assertions::{
    check_token, has_wrong_arguments, is_invalid_opcode, TokenExpectation, TokenSnapshot,
};
pub use balances::{account_balances, balance_decreases, balance_increases};
pub use client::{LedgerClient, TokenReader, TxReceipt};
pub use error::{TestkitError, TestkitResult};
pub use gas::GasPricing;
pub use logging::init_logging;
pub use memory::InMemoryLedger;
pub use wait::{wait_blocks, wait_to_block, WaitOptions};

// Re-export the value and codec layers so tests need one dependency.
pub use lkit_codec::{decode_hex, encode_hex, EncodedPayload};
pub use lkit_config::HarnessConfig;
pub use lkit_units::{from_base_units, to_base_units, Amount, DisplayAmount, Unit};
