use std::collections::BTreeMap;

use futures::future::try_join_all;
use lkit_units::Amount;

use crate::address::Address;
use crate::client::LedgerClient;
use crate::error::TestkitResult;

/// Native balance of every account, keyed by its position in `accounts`.
///
/// All lookups run concurrently; the first failure aborts the whole query.
pub async fn account_balances<C>(
    client: &C,
    accounts: &[Address],
) -> TestkitResult<BTreeMap<usize, Amount>>
where
    C: LedgerClient + ?Sized,
{
    let balances = try_join_all(accounts.iter().map(|account| client.balance(account))).await?;
    Ok(balances.into_iter().enumerate().collect())
}

/// Per-account change between two snapshots, as `after - before`.
///
/// Returns `None` for accounts whose balance decreased or that are missing
/// from `after`; see [`balance_decreases`] for the other direction.
pub fn balance_increases(
    before: &BTreeMap<usize, Amount>,
    after: &BTreeMap<usize, Amount>,
) -> BTreeMap<usize, Option<Amount>> {
    before
        .iter()
        .map(|(index, old)| {
            let delta = after.get(index).and_then(|new| new.checked_sub(*old));
            (*index, delta)
        })
        .collect()
}

/// Per-account change between two snapshots, as `before - after`.
pub fn balance_decreases(
    before: &BTreeMap<usize, Amount>,
    after: &BTreeMap<usize, Amount>,
) -> BTreeMap<usize, Option<Amount>> {
    before
        .iter()
        .map(|(index, old)| {
            let delta = after.get(index).and_then(|new| old.checked_sub(*new));
            (*index, delta)
        })
        .collect()
}
