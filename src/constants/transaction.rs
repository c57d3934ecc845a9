//! Submission retry constants.

/// Default number of send attempts before the last error is re-raised.
pub const DEFAULT_MAX_SUBMIT_ATTEMPTS: u32 = 4;

/// Backoff after a stale-nonce conflict ("nonce too low", "already known").
pub const NONCE_STALE_BACKOFF_MS: u64 = 700;

/// Backoff after a "replacement transaction underpriced" conflict. Longer
/// than the stale backoff so the mempool can settle around the occupied
/// nonce slot.
pub const REPLACEMENT_CONFLICT_BACKOFF_MS: u64 = 1200;
