use lkit_config::HarnessConfig;
use lkit_units::Amount;

use crate::client::TxReceipt;
use crate::error::{TestkitError, TestkitResult};

/// Gas price resolved from configuration, passed to whatever computes
/// transaction costs.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GasPricing {
    gas_price: Amount,
}

impl GasPricing {
    pub fn new(gas_price: Amount) -> Self {
        Self { gas_price }
    }

    /// The harness-wide gas price.
    pub fn from_config(config: &HarnessConfig) -> Self {
        Self::new(config.gas_price)
    }

    /// The gas price in effect on a named network.
    pub fn for_network(config: &HarnessConfig, network: &str) -> TestkitResult<Self> {
        let price = config
            .effective_gas_price(network)
            .map_err(|e| TestkitError::Client(e.to_string()))?;
        Ok(Self::new(price))
    }

    pub fn gas_price(&self) -> Amount {
        self.gas_price
    }

    /// Cost of `gas` units at this price.
    pub fn cost_of(&self, gas: u64) -> TestkitResult<Amount> {
        self.gas_price
            .checked_mul(Amount::from(gas))
            .ok_or_else(|| TestkitError::Overflow(format!("{gas} gas at {}", self.gas_price)))
    }

    /// Amount a transaction's sender paid for gas.
    pub fn tx_gas_cost(&self, receipt: &TxReceipt) -> TestkitResult<Amount> {
        self.cost_of(receipt.gas_used)
    }
}
