//! Transaction submission with nonce reconciliation and bounded retry.
//!
//! One submission attempt observes the provider's pending count, pushes it
//! forward with the process-local hint and (when enabled) the shared
//! allocator, broadcasts through the `ChainWriter`, and advances the
//! bookkeeping on success. Nonce-conflict failures advance the hint past
//! the contested slot and retry after a short backoff; anything else is
//! re-raised untouched on the first attempt.
//!
//! The local hint cache compensates for provider pending-count lag right
//! after a broadcast. It is a same-process optimization only; safety
//! across instances comes from the allocator.

use std::sync::Arc;

use dashmap::DashMap;
use log::{debug, warn};
use tokio::time::sleep;

use crate::config::RelayerConfig;
use crate::constants::DEFAULT_MAX_SUBMIT_ATTEMPTS;
use crate::models::{ProviderError, RelayerKey};
use crate::services::{ChainWriter, EvmProviderTrait, NonceAllocatorTrait, TxHandle, WriteCall};

mod retry;
pub use retry::*;

/// Process-local "next nonce to use" per `(chain_id, address)`. Values
/// only move forward: after a successful broadcast to `nonce + 1`, after a
/// detected conflict to at least `conflicting nonce + 1`.
#[derive(Debug, Default)]
pub struct NonceHintCache {
    hints: DashMap<(u64, String), u64>,
}

impl NonceHintCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// The hinted next nonce, 0 when nothing was recorded yet.
    pub fn next(&self, chain_id: u64, address: &str) -> u64 {
        self.hints
            .get(&(chain_id, address.to_string()))
            .map(|entry| *entry)
            .unwrap_or(0)
    }

    /// Raises the hint to `next` unless it is already higher.
    pub fn advance_to(&self, chain_id: u64, address: &str, next: u64) {
        let mut entry = self
            .hints
            .entry((chain_id, address.to_string()))
            .or_insert(0);
        *entry = (*entry).max(next);
    }
}

/// One submission order for the pipeline.
#[derive(Debug, Clone)]
pub struct SubmitRequest {
    /// The selected signing key. Its checksummed address keys the nonce
    /// bookkeeping; the writer signs with it.
    pub relayer: RelayerKey,
    pub chain_id: u64,
    pub call: WriteCall,
    /// Send attempts before the last error is re-raised.
    pub max_attempts: u32,
    /// Human-readable tag for logs and allocator records.
    pub label: String,
}

impl SubmitRequest {
    pub fn new(relayer: RelayerKey, chain_id: u64, call: WriteCall, label: &str) -> Self {
        Self {
            relayer,
            chain_id,
            call,
            max_attempts: DEFAULT_MAX_SUBMIT_ATTEMPTS,
            label: label.to_string(),
        }
    }

    pub fn with_max_attempts(mut self, max_attempts: u32) -> Self {
        self.max_attempts = max_attempts;
        self
    }
}

pub struct TransactionSubmitter {
    hints: NonceHintCache,
    allocator: Option<Arc<dyn NonceAllocatorTrait>>,
    allocator_enabled: bool,
    is_production: bool,
}

impl TransactionSubmitter {
    pub fn new(config: &RelayerConfig) -> Self {
        Self {
            hints: NonceHintCache::new(),
            allocator: None,
            allocator_enabled: config.allocator_enabled,
            is_production: config.is_production,
        }
    }

    pub fn with_allocator(mut self, allocator: Arc<dyn NonceAllocatorTrait>) -> Self {
        self.allocator = Some(allocator);
        self
    }

    fn active_allocator(&self) -> Option<&Arc<dyn NonceAllocatorTrait>> {
        if self.allocator_enabled {
            self.allocator.as_ref()
        } else {
            None
        }
    }

    /// The local hint for an account; exposed for inspection.
    pub fn next_nonce_hint(&self, chain_id: u64, address: &str) -> u64 {
        self.hints.next(chain_id, address)
    }

    /// Runs the full send protocol for one request. The caller must hold
    /// the serialization gate for `request.relayer.address`.
    pub async fn submit(
        &self,
        provider: &dyn EvmProviderTrait,
        writer: &dyn ChainWriter,
        request: &SubmitRequest,
    ) -> Result<TxHandle, ProviderError> {
        let address = request.relayer.address.as_str();
        let max_attempts = request.max_attempts.max(1);
        let mut last_error: Option<ProviderError> = None;

        for attempt in 1..=max_attempts {
            let observed = provider.get_pending_transaction_count(address).await?;
            let hinted = self.hints.next(request.chain_id, address);
            let mut nonce = observed.max(hinted);

            if let Some(allocator) = self.active_allocator() {
                match allocator
                    .allocate(address, request.chain_id, nonce, &request.label)
                    .await
                {
                    Ok(assigned) => nonce = assigned,
                    Err(e) => {
                        if !self.is_production {
                            warn!(
                                "nonce allocator degraded for '{}', continuing with observed nonce {}: {}",
                                request.label, nonce, e
                            );
                        }
                    }
                }
            }

            let mut call = request.call.clone();
            call.overrides.nonce = Some(nonce);

            debug!(
                "submitting '{}' from {} with nonce {} (attempt {}/{})",
                request.label, address, nonce, attempt, max_attempts
            );

            match writer.invoke(&request.relayer, &call).await {
                Ok(handle) => {
                    self.hints
                        .advance_to(request.chain_id, address, nonce + 1);
                    if let Some(allocator) = self.active_allocator() {
                        if let Err(e) = allocator
                            .mark_broadcasted(address, request.chain_id, nonce, &handle.hash)
                            .await
                        {
                            debug!("failed to record broadcast {}: {}", handle.hash, e);
                        }
                    }
                    return Ok(handle);
                }
                Err(error) => match classify(&error) {
                    Some(conflict) => {
                        self.hints
                            .advance_to(request.chain_id, address, nonce + 1);
                        warn!(
                            "nonce conflict ({:?}) for '{}' at nonce {}: {}",
                            conflict, request.label, nonce, error
                        );
                        last_error = Some(error);
                        if attempt < max_attempts {
                            sleep(conflict.backoff()).await;
                        }
                    }
                    None => return Err(error),
                },
            }
        }

        Err(last_error.unwrap_or_else(|| {
            ProviderError::RpcError(format!(
                "submission of '{}' exhausted {} attempts",
                request.label, max_attempts
            ))
        }))
    }
}
