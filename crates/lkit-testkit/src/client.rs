use async_trait::async_trait;
use lkit_units::Amount;
use serde::{Deserialize, Serialize};

use crate::address::Address;
use crate::error::TestkitResult;

/// The parts of a transaction receipt the harness inspects.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TxReceipt {
    pub tx_hash: [u8; 32],
    pub block_number: u64,
    pub gas_used: u64,
}

impl TxReceipt {
    pub fn short_hash(&self) -> String {
        hex::encode(&self.tx_hash[..4])
    }
}

/// Native-value queries against a ledger node.
#[async_trait]
pub trait LedgerClient: Send + Sync {
    async fn balance(&self, account: &Address) -> TestkitResult<Amount>;
    async fn block_number(&self) -> TestkitResult<u64>;
    async fn receipt(&self, tx_hash: &[u8; 32]) -> TestkitResult<Option<TxReceipt>>;
}

/// Read side of a fungible token contract.
#[async_trait]
pub trait TokenReader: Send + Sync {
    async fn total_supply(&self) -> TestkitResult<Amount>;
    async fn balance_of(&self, holder: &Address) -> TestkitResult<Amount>;
}
