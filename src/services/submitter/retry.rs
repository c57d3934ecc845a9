//! Nonce-conflict error classification.
//!
//! A nonce that the network already holds is recoverable: skip forward and
//! resend. Most other failures (reverts, insufficient funds, malformed
//! arguments) are not nonce problems, and retrying them wastes time and
//! can mask a real bug, so they are propagated on the first attempt.
//!
//! Classification matches lowercased substrings of the provider's error
//! text. That is fragile coupling to a third party's wording, which is why
//! it lives behind this one function: the matching rules can be unit
//! tested and swapped per provider without touching the retry loop.

use std::time::Duration;

use crate::constants::{NONCE_STALE_BACKOFF_MS, REPLACEMENT_CONFLICT_BACKOFF_MS};
use crate::models::ProviderError;

/// Provider phrasings meaning the nonce slot is already consumed or the
/// transaction is already in the mempool.
const STALE_NONCE_PATTERNS: [&str; 4] = [
    "nonce has already been used",
    "nonce too low",
    "already known",
    "known transaction",
];

/// A different pending transaction occupies the slot with a sufficient fee.
const REPLACEMENT_PATTERN: &str = "replacement transaction underpriced";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NonceConflict {
    /// The network already holds a transaction at this nonce.
    Stale,
    /// The nonce slot is occupied and our fee does not displace it.
    Replacement,
}

impl NonceConflict {
    /// How long to wait before the next attempt. Replacement conflicts get
    /// a longer pause to let the mempool settle.
    pub fn backoff(&self) -> Duration {
        match self {
            NonceConflict::Stale => Duration::from_millis(NONCE_STALE_BACKOFF_MS),
            NonceConflict::Replacement => Duration::from_millis(REPLACEMENT_CONFLICT_BACKOFF_MS),
        }
    }
}

/// Classifies a chain-write failure. `None` means not a nonce conflict:
/// propagate immediately, never retry.
pub fn classify(error: &ProviderError) -> Option<NonceConflict> {
    let text = error.to_string().to_lowercase();
    if text.contains(REPLACEMENT_PATTERN) {
        return Some(NonceConflict::Replacement);
    }
    if STALE_NONCE_PATTERNS
        .iter()
        .any(|pattern| text.contains(pattern))
    {
        return Some(NonceConflict::Stale);
    }
    None
}
