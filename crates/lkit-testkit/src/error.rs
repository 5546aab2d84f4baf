use lkit_units::{Amount, UnitError};
use thiserror::Error;

use crate::address::Address;

/// Errors produced by ledger clients and assertion helpers.
#[derive(Debug, Error)]
pub enum TestkitError {
    #[error("unit error: {0}")]
    Unit(#[from] UnitError),

    #[error("invalid address: {0}")]
    InvalidAddress(String),

    #[error("ledger client error: {0}")]
    Client(String),

    #[error("{subject}: expected {expected}, got {actual}")]
    Mismatch {
        subject: String,
        expected: String,
        actual: String,
    },

    #[error("expected {expected} balances, got {actual} holders")]
    ExpectationLength { expected: usize, actual: usize },

    #[error("insufficient balance in {account}: need {needed}, have {available}")]
    InsufficientBalance {
        account: Address,
        needed: Amount,
        available: Amount,
    },

    #[error("arithmetic overflow: {0}")]
    Overflow(String),

    #[error("timed out waiting for block {target}; chain is at {reached}")]
    Timeout { target: u64, reached: u64 },
}

pub type TestkitResult<T> = Result<T, TestkitError>;
