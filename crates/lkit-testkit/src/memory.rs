use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;
use lkit_units::Amount;
use tracing::debug;

use crate::address::Address;
use crate::client::{LedgerClient, TokenReader, TxReceipt};
use crate::error::{TestkitError, TestkitResult};
use crate::gas::GasPricing;

/// Gas charged for a plain value transfer.
pub const TRANSFER_GAS: u64 = 21_000;
/// Gas charged for a token mint.
pub const MINT_GAS: u64 = 68_000;
/// Gas charged for a token transfer.
pub const TOKEN_TRANSFER_GAS: u64 = 51_000;

#[derive(Default)]
struct LedgerState {
    block_number: u64,
    nonce: u64,
    balances: HashMap<Address, Amount>,
    token_balances: HashMap<Address, Amount>,
    total_supply: Amount,
    receipts: HashMap<[u8; 32], TxReceipt>,
}

impl LedgerState {
    fn balance(&self, account: &Address) -> Amount {
        self.balances.get(account).copied().unwrap_or_default()
    }

    fn token_balance(&self, holder: &Address) -> Amount {
        self.token_balances.get(holder).copied().unwrap_or_default()
    }

    /// Debit `from` by `value` plus gas, mine a block, and record a receipt.
    fn execute(
        &mut self,
        pricing: &GasPricing,
        from: &Address,
        to: &Address,
        value: Amount,
        gas_used: u64,
    ) -> TestkitResult<TxReceipt> {
        let cost = pricing.cost_of(gas_used)?;
        let needed = value
            .checked_add(cost)
            .ok_or_else(|| TestkitError::Overflow("value plus gas".into()))?;
        let available = self.balance(from);
        let remaining = available
            .checked_sub(needed)
            .ok_or(TestkitError::InsufficientBalance {
                account: *from,
                needed,
                available,
            })?;
        let credited = if value.is_zero() {
            None
        } else {
            let base = if to == from { remaining } else { self.balance(to) };
            let credited = base
                .checked_add(value)
                .ok_or_else(|| TestkitError::Overflow(format!("balance of {to}")))?;
            Some(credited)
        };

        self.balances.insert(*from, remaining);
        if let Some(credited) = credited {
            self.balances.insert(*to, credited);
        }

        self.nonce += 1;
        self.block_number += 1;
        let receipt = TxReceipt {
            tx_hash: tx_hash(self.nonce, from, to, value),
            block_number: self.block_number,
            gas_used,
        };
        self.receipts.insert(receipt.tx_hash, receipt.clone());
        Ok(receipt)
    }
}

fn tx_hash(nonce: u64, from: &Address, to: &Address, value: Amount) -> [u8; 32] {
    let mut hasher = blake3::Hasher::new();
    hasher.update(b"lkit-tx-v1:");
    hasher.update(&nonce.to_le_bytes());
    hasher.update(from.as_bytes());
    hasher.update(to.as_bytes());
    hasher.update(value.to_string().as_bytes());
    *hasher.finalize().as_bytes()
}

/// In-memory ledger with native balances and a single token.
///
/// Intended for tests. Every transaction charges gas to its sender at the
/// configured price and mines exactly one block.
pub struct InMemoryLedger {
    pricing: GasPricing,
    state: RwLock<LedgerState>,
}

impl InMemoryLedger {
    pub fn new(pricing: GasPricing) -> Self {
        Self {
            pricing,
            state: RwLock::new(LedgerState::default()),
        }
    }

    pub fn pricing(&self) -> GasPricing {
        self.pricing
    }

    /// Set an account's native balance directly, outside any transaction.
    pub fn fund(&self, account: Address, amount: Amount) {
        self.state
            .write()
            .expect("lock poisoned")
            .balances
            .insert(account, amount);
    }

    /// Advance the chain by `blocks` empty blocks.
    pub fn mine(&self, blocks: u64) -> u64 {
        let mut state = self.state.write().expect("lock poisoned");
        state.block_number += blocks;
        state.block_number
    }

    /// Transfer native value.
    pub fn send(&self, from: Address, to: Address, value: Amount) -> TestkitResult<TxReceipt> {
        let mut state = self.state.write().expect("lock poisoned");
        let receipt = state.execute(&self.pricing, &from, &to, value, TRANSFER_GAS)?;
        debug!(tx = %receipt.short_hash(), %from, %to, %value, "value transfer");
        Ok(receipt)
    }

    /// Mint tokens to `to`, paid for by `minter`.
    pub fn mint(&self, minter: Address, to: Address, amount: Amount) -> TestkitResult<TxReceipt> {
        let mut state = self.state.write().expect("lock poisoned");
        let supply = state
            .total_supply
            .checked_add(amount)
            .ok_or_else(|| TestkitError::Overflow("total supply".into()))?;
        let credited = state
            .token_balance(&to)
            .checked_add(amount)
            .ok_or_else(|| TestkitError::Overflow(format!("token balance of {to}")))?;
        let receipt = state.execute(&self.pricing, &minter, &to, Amount::ZERO, MINT_GAS)?;
        state.total_supply = supply;
        state.token_balances.insert(to, credited);
        debug!(tx = %receipt.short_hash(), %to, %amount, "token mint");
        Ok(receipt)
    }

    /// Move tokens between holders; `from` pays the gas.
    pub fn transfer_tokens(
        &self,
        from: Address,
        to: Address,
        amount: Amount,
    ) -> TestkitResult<TxReceipt> {
        let mut state = self.state.write().expect("lock poisoned");
        let available = state.token_balance(&from);
        let debited = available
            .checked_sub(amount)
            .ok_or(TestkitError::InsufficientBalance {
                account: from,
                needed: amount,
                available,
            })?;
        let receipt = state.execute(&self.pricing, &from, &to, Amount::ZERO, TOKEN_TRANSFER_GAS)?;
        state.token_balances.insert(from, debited);
        // Bounded by total supply.
        let credited = state.token_balance(&to).checked_add(amount).unwrap_or(Amount::MAX);
        state.token_balances.insert(to, credited);
        debug!(tx = %receipt.short_hash(), %from, %to, %amount, "token transfer");
        Ok(receipt)
    }
}

impl std::fmt::Debug for InMemoryLedger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.state.read().expect("lock poisoned");
        f.debug_struct("InMemoryLedger")
            .field("block_number", &state.block_number)
            .field("accounts", &state.balances.len())
            .field("total_supply", &state.total_supply)
            .finish()
    }
}

#[async_trait]
impl LedgerClient for InMemoryLedger {
    async fn balance(&self, account: &Address) -> TestkitResult<Amount> {
        Ok(self.state.read().expect("lock poisoned").balance(account))
    }

    async fn block_number(&self) -> TestkitResult<u64> {
        Ok(self.state.read().expect("lock poisoned").block_number)
    }

    async fn receipt(&self, tx_hash: &[u8; 32]) -> TestkitResult<Option<TxReceipt>> {
        Ok(self
            .state
            .read()
            .expect("lock poisoned")
            .receipts
            .get(tx_hash)
            .cloned())
    }
}

#[async_trait]
impl TokenReader for InMemoryLedger {
    async fn total_supply(&self) -> TestkitResult<Amount> {
        Ok(self.state.read().expect("lock poisoned").total_supply)
    }

    async fn balance_of(&self, holder: &Address) -> TestkitResult<Amount> {
        Ok(self.state.read().expect("lock poisoned").token_balance(holder))
    }
}
