use std::fmt;

use futures::future::try_join_all;
use lkit_units::{from_base_units, to_base_units, Amount, DisplayAmount, Unit};
use tracing::debug;

use crate::address::Address;
use crate::client::TokenReader;
use crate::error::{TestkitError, TestkitResult};

/// Expected token state, in display units of `unit`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TokenExpectation {
    pub unit: Unit,
    pub total_supply: Option<DisplayAmount>,
    /// One entry per holder passed to [`check_token`], in the same order.
    pub balances: Option<Vec<DisplayAmount>>,
}

impl TokenExpectation {
    /// An expectation that checks nothing yet.
    pub fn in_unit(unit: Unit) -> Self {
        Self {
            unit,
            total_supply: None,
            balances: None,
        }
    }

    pub fn total_supply(mut self, display: &str) -> TestkitResult<Self> {
        self.total_supply = Some(DisplayAmount::parse(display)?);
        Ok(self)
    }

    pub fn balances(mut self, displays: &[&str]) -> TestkitResult<Self> {
        let parsed = displays
            .iter()
            .map(|d| DisplayAmount::parse(d))
            .collect::<Result<Vec<_>, _>>()?;
        self.balances = Some(parsed);
        Ok(self)
    }
}

/// Token state observed by [`check_token`], in base units.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TokenSnapshot {
    pub total_supply: Amount,
    pub balances: Vec<Amount>,
}

/// Read total supply and every holder's balance, log them, and compare
/// against `expected`.
///
/// Expected display amounts are converted to base units before comparison,
/// so `"1.50"` and `"1.5"` are the same expectation.
pub async fn check_token<T>(
    token: &T,
    holders: &[Address],
    expected: &TokenExpectation,
) -> TestkitResult<TokenSnapshot>
where
    T: TokenReader + ?Sized,
{
    if let Some(balances) = &expected.balances {
        if balances.len() != holders.len() {
            return Err(TestkitError::ExpectationLength {
                expected: balances.len(),
                actual: holders.len(),
            });
        }
    }

    let (total_supply, balances) = tokio::try_join!(
        token.total_supply(),
        try_join_all(holders.iter().map(|holder| token.balance_of(holder))),
    )?;

    let scale = expected.unit.scale();
    let supply_display = from_base_units(total_supply, scale)?;
    debug!(total_supply = %supply_display, unit = %expected.unit, "token total supply");
    for (index, (holder, balance)) in holders.iter().zip(&balances).enumerate() {
        let shown = from_base_units(*balance, scale)?;
        debug!(index, account = %holder, balance = %shown, "token balance");
    }

    if let Some(supply) = &expected.total_supply {
        ensure_equal("total supply".to_string(), supply, total_supply, scale)?;
    }
    if let Some(expected_balances) = &expected.balances {
        for ((holder, want), got) in holders.iter().zip(expected_balances).zip(&balances) {
            ensure_equal(format!("balance of {holder}"), want, *got, scale)?;
        }
    }

    Ok(TokenSnapshot {
        total_supply,
        balances,
    })
}

fn ensure_equal(
    subject: String,
    expected: &DisplayAmount,
    actual: Amount,
    scale: u32,
) -> TestkitResult<()> {
    if to_base_units(expected, scale)? == actual {
        return Ok(());
    }
    Err(TestkitError::Mismatch {
        subject,
        expected: expected.to_string(),
        actual: from_base_units(actual, scale)?.into_string(),
    })
}

/// Returns `true` if a failed call reverted on an invalid opcode.
pub fn is_invalid_opcode<E: fmt::Display + ?Sized>(err: &E) -> bool {
    err.to_string().contains("invalid opcode")
}

/// Returns `true` if a deployment failed on constructor arguments.
pub fn has_wrong_arguments<E: fmt::Display + ?Sized>(err: &E) -> bool {
    err.to_string().contains("contract constructor expected")
}
