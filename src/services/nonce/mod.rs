//! Shared nonce allocation.
//!
//! When several server instances broadcast through the same relayer
//! address, the provider's pending count alone is not enough: two
//! instances can observe the same count and collide. The allocator is the
//! one collaborator that hands out unique nonces across instances; it must
//! provide an atomic allocate-and-advance per `(relayer address, chain)`,
//! typically via a transactional data store.
//!
//! The pipeline treats the allocator as optional. It can be disabled at
//! runtime, and any allocator failure degrades to the locally observed
//! nonce; an unreachable allocator never blocks a submission.

use async_trait::async_trait;
use dashmap::DashMap;
use log::debug;

use crate::models::NonceAllocatorError;

#[cfg(test)]
use mockall::automock;

#[cfg_attr(test, automock)]
#[async_trait]
pub trait NonceAllocatorTrait: Send + Sync {
    /// Returns the nonce to use for the next transaction from
    /// `relayer_address` on `chain_id`. Must be monotonic and atomic
    /// across concurrent callers for the same `(relayer_address,
    /// chain_id)`; `observed_pending_nonce` is the caller's floor.
    /// `label` identifies the submission for observability.
    async fn allocate(
        &self,
        relayer_address: &str,
        chain_id: u64,
        observed_pending_nonce: u64,
        label: &str,
    ) -> Result<u64, NonceAllocatorError>;

    /// Records that `nonce` was broadcast as `tx_hash`. Observability
    /// only; callers ignore failures.
    async fn mark_broadcasted(
        &self,
        relayer_address: &str,
        chain_id: u64,
        nonce: u64,
        tx_hash: &str,
    ) -> Result<(), NonceAllocatorError>;
}

/// Allocator backed by process memory.
///
/// Suitable for single-instance deployments and tests; it provides the
/// atomicity contract only within one process. Multi-instance deployments
/// need an implementation over a shared transactional store.
#[derive(Debug, Default)]
pub struct InMemoryNonceAllocator {
    next: DashMap<(String, u64), u64>,
    broadcasted: DashMap<(String, u64), (u64, String)>,
}

impl InMemoryNonceAllocator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Last `(nonce, tx_hash)` recorded for an account, if any.
    pub fn last_broadcasted(&self, relayer_address: &str, chain_id: u64) -> Option<(u64, String)> {
        self.broadcasted
            .get(&(relayer_address.to_string(), chain_id))
            .map(|entry| entry.clone())
    }
}

#[async_trait]
impl NonceAllocatorTrait for InMemoryNonceAllocator {
    async fn allocate(
        &self,
        relayer_address: &str,
        chain_id: u64,
        observed_pending_nonce: u64,
        label: &str,
    ) -> Result<u64, NonceAllocatorError> {
        let mut entry = self
            .next
            .entry((relayer_address.to_string(), chain_id))
            .or_insert(0);
        let assigned = (*entry).max(observed_pending_nonce);
        *entry = assigned + 1;
        debug!(
            "allocated nonce {} to '{}' for {} on chain {}",
            assigned, label, relayer_address, chain_id
        );
        Ok(assigned)
    }

    async fn mark_broadcasted(
        &self,
        relayer_address: &str,
        chain_id: u64,
        nonce: u64,
        tx_hash: &str,
    ) -> Result<(), NonceAllocatorError> {
        self.broadcasted.insert(
            (relayer_address.to_string(), chain_id),
            (nonce, tx_hash.to_string()),
        );
        Ok(())
    }
}
