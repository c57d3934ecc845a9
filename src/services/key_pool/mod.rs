//! Key pool loading.
//!
//! `KeyPoolLoader` turns a [`PoolConfig`] into the pool's list of
//! [`RelayerKey`]s: it gathers raw key strings from the configured sources
//! in priority order, normalizes and validates each one, filters out keys
//! reserved for other pools, and derives each survivor's address.
//!
//! Loading never fails: malformed sources and invalid keys are dropped and
//! an empty pool is reported by the selector, not here.

use std::collections::HashSet;

use log::{debug, warn};

use crate::config::{KeySource, PoolConfig};
use crate::models::RelayerKey;

mod selector;
pub use selector::*;

/// Normalizes a raw private-key string to `0x` + 64 lowercase hex
/// characters. Returns `None` for anything else.
pub fn normalize_private_key(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    let hex_part = trimmed
        .strip_prefix("0x")
        .or_else(|| trimmed.strip_prefix("0X"))
        .unwrap_or(trimmed);
    if hex_part.len() != 64 || !hex_part.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }
    Some(format!("0x{}", hex_part.to_lowercase()))
}

pub struct KeyPoolLoader<S: KeySource> {
    source: S,
}

impl<S: KeySource> KeyPoolLoader<S> {
    pub fn new(source: S) -> Self {
        Self { source }
    }

    /// Loads the pool's keys in discovery order.
    ///
    /// Source priority: the direct JSON array; if that yields nothing, the
    /// shared/global JSON array; then every indexed entry within the scan
    /// bound (sparse indices are skipped, not treated as the end); finally
    /// the legacy single key, only when everything else was empty and the
    /// pool allows the fallback.
    ///
    /// Ids are `pool:index` where the index counts accepted keys, so a
    /// dropped candidate does not leave a gap. Duplicate raw keys are kept
    /// as distinct entries.
    pub fn load(&self, config: &PoolConfig) -> Vec<RelayerKey> {
        let mut raw = self.json_keys(config.json_source.as_deref());
        if raw.is_empty() {
            raw = self.json_keys(config.shared_json_source.as_deref());
        }

        if let Some(prefix) = config.indexed_prefix.as_deref() {
            for index in 0..config.indexed_scan_limit {
                if let Some(value) = self.source.get(&format!("{}{}", prefix, index)) {
                    raw.push(value);
                }
            }
        }

        if raw.is_empty() && config.allow_legacy_fallback {
            if let Some(legacy) = config
                .legacy_source
                .as_deref()
                .and_then(|name| self.source.get(name))
            {
                raw.push(legacy);
            }
        }

        let excluded: HashSet<String> = config
            .exclusion_sources
            .iter()
            .flat_map(|name| self.json_keys(Some(name)))
            .filter_map(|key| normalize_private_key(&key))
            .collect();

        let mut keys = Vec::new();
        for candidate in raw {
            let Some(normalized) = normalize_private_key(&candidate) else {
                debug!(
                    "dropping malformed key entry for pool '{}'",
                    config.pool
                );
                continue;
            };
            if excluded.contains(&normalized) {
                debug!("dropping excluded key for pool '{}'", config.pool);
                continue;
            }
            match RelayerKey::new(&config.pool, keys.len(), &normalized) {
                Ok(key) => keys.push(key),
                Err(e) => {
                    debug!(
                        "dropping underivable key for pool '{}': {}",
                        config.pool, e
                    );
                }
            }
        }

        if keys.is_empty() {
            debug!("pool '{}' resolved to zero keys", config.pool);
        }
        keys
    }

    /// Parses a JSON array of strings from the named source. Malformed
    /// JSON yields an empty list.
    fn json_keys(&self, source: Option<&str>) -> Vec<String> {
        let Some(name) = source else {
            return Vec::new();
        };
        let Some(value) = self.source.get(name) else {
            return Vec::new();
        };
        match serde_json::from_str::<Vec<String>>(&value) {
            Ok(keys) => keys,
            Err(e) => {
                warn!("source '{}' is not a JSON array of strings: {}", name, e);
                Vec::new()
            }
        }
    }
}
