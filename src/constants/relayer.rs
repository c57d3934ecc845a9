//! Key pool discovery constants.

/// Upper bound for scanning indexed single-key sources (`<prefix>0` up to
/// `<prefix>{limit - 1}`). Empty slots within the bound are skipped, not
/// treated as the end of the list.
pub const DEFAULT_INDEXED_KEY_SCAN_LIMIT: u32 = 50;

/// Source name for the global JSON key array used when a pool's direct
/// source is empty.
pub const GLOBAL_KEYS_SOURCE: &str = "RELAYER_KEYS_GLOBAL";

/// Source name for the legacy single-key fallback.
pub const LEGACY_KEY_SOURCE: &str = "RELAYER_PRIVATE_KEY";
