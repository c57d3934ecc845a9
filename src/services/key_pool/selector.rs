//! Pool key selection.
//!
//! Resolves one signing key from a pool's key list. Three policies:
//!
//! - **Round-robin**: per-pool counter, cyclic order within one process.
//!   A load-distribution hint only; no cross-process guarantee.
//! - **Sticky**: deterministic hash of a caller-supplied string, so a
//!   multi-step flow keeps hitting the same key without shared state.
//! - **Required address**: the caller pins an exact signer, e.g. because an
//!   on-chain artifact was generated for it.

use std::sync::atomic::{AtomicU64, Ordering};

use dashmap::DashMap;
use sha2::{Digest, Sha256};

use crate::models::{to_checksum_address, RelayerError, RelayerKey};

#[derive(Debug, Clone, PartialEq)]
pub enum SelectionMode {
    RoundRobin,
    /// Deterministic selection keyed by the contained string.
    Sticky(String),
    /// Exact signer address, any hex casing.
    RequiredAddress(String),
}

#[derive(Debug, Default)]
pub struct PoolSelector {
    /// Per-pool round-robin counters. Process-lifetime state; wraps via
    /// modulo against the current pool size.
    counters: DashMap<String, AtomicU64>,
}

impl PoolSelector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolves one key for the request. Fails with `NoKeysConfigured`
    /// when `keys` is empty, regardless of mode.
    pub fn select(
        &self,
        pool: &str,
        keys: &[RelayerKey],
        mode: &SelectionMode,
    ) -> Result<RelayerKey, RelayerError> {
        if keys.is_empty() {
            return Err(RelayerError::NoKeysConfigured(pool.to_string()));
        }

        match mode {
            SelectionMode::RoundRobin => {
                let ticket = {
                    let counter = self
                        .counters
                        .entry(pool.to_string())
                        .or_insert_with(|| AtomicU64::new(0));
                    counter.fetch_add(1, Ordering::Relaxed)
                };
                Ok(keys[(ticket % keys.len() as u64) as usize].clone())
            }
            SelectionMode::Sticky(sticky) => Ok(keys[sticky_index(sticky, keys.len())].clone()),
            SelectionMode::RequiredAddress(address) => {
                let wanted = to_checksum_address(address)?;
                keys.iter()
                    .find(|key| key.address == wanted)
                    .cloned()
                    .ok_or_else(|| RelayerError::RequiredRelayerNotInPool {
                        pool: pool.to_string(),
                        address: wanted,
                    })
            }
        }
    }
}

/// SHA-256 of the lowercased sticky string, reduced modulo the key count.
/// Pure function of its inputs, so the same sticky string maps to the same
/// key for a fixed pool size.
fn sticky_index(sticky: &str, len: usize) -> usize {
    let digest = Sha256::digest(sticky.to_lowercase().as_bytes());
    let mut prefix = [0u8; 8];
    prefix.copy_from_slice(&digest[..8]);
    (u64::from_be_bytes(prefix) % len as u64) as usize
}
