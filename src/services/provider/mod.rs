//! Blockchain provider collaborators.
//!
//! The pipeline does not own an RPC client; it consumes two narrow
//! interfaces. `EvmProviderTrait` answers the "pending" transaction count
//! (the provider's view of the next nonce including unconfirmed mempool
//! transactions). `ChainWriter` signs one contract write with the selected
//! relayer key and broadcasts it with the nonce chosen by the submitter
//! merged into its overrides.

use alloy::primitives::U256;
use async_trait::async_trait;

use crate::models::{ProviderError, RelayerKey};

#[cfg(test)]
use mockall::automock;

#[cfg_attr(test, automock)]
#[async_trait]
pub trait EvmProviderTrait: Send + Sync {
    /// Transaction count for `address` at the "pending" tag.
    async fn get_pending_transaction_count(&self, address: &str) -> Result<u64, ProviderError>;
}

/// Gas and nonce overrides merged into a contract write.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TxOverrides {
    pub nonce: Option<u64>,
    pub gas_limit: Option<u64>,
    pub gas_price: Option<u128>,
    pub max_fee_per_gas: Option<u128>,
    pub max_priority_fee_per_gas: Option<u128>,
    pub value: Option<U256>,
}

/// One contract write: method name, JSON-encoded arguments and overrides.
#[derive(Debug, Clone, PartialEq)]
pub struct WriteCall {
    pub method: String,
    pub args: Vec<serde_json::Value>,
    pub overrides: TxOverrides,
}

impl WriteCall {
    pub fn new(method: &str, args: Vec<serde_json::Value>) -> Self {
        Self {
            method: method.to_string(),
            args,
            overrides: TxOverrides::default(),
        }
    }

    pub fn with_overrides(mut self, overrides: TxOverrides) -> Self {
        self.overrides = overrides;
        self
    }
}

/// Handle for a broadcast transaction.
#[derive(Debug, Clone, PartialEq)]
pub struct TxHandle {
    /// Transaction hash as reported by the provider.
    pub hash: String,
    /// Nonce the transaction was broadcast with.
    pub nonce: u64,
}

#[cfg_attr(test, automock)]
#[async_trait]
pub trait ChainWriter: Send + Sync {
    /// Signs with `relayer` and broadcasts `call`. The submitter guarantees
    /// `call.overrides.nonce` is set.
    async fn invoke(&self, relayer: &RelayerKey, call: &WriteCall)
        -> Result<TxHandle, ProviderError>;
}
