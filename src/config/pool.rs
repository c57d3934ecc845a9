//! Per-pool key-source configuration.
//!
//! A pool is a named group of relayer keys dedicated to one traffic class.
//! Each pool draws raw keys from up to four kinds of sources, in priority
//! order: a direct JSON array, a shared/global JSON array (only when the
//! direct source is empty), indexed single-key entries scanned up to a
//! bound, and a legacy single-key fallback. Exclusion sources name JSON
//! arrays whose keys must never appear in this pool, so keys reserved for
//! a higher-risk pool cannot leak into a lower-trust one.

use std::collections::HashMap;
use std::env;

use serde::{Deserialize, Serialize};

use crate::constants::{DEFAULT_INDEXED_KEY_SCAN_LIMIT, GLOBAL_KEYS_SOURCE, LEGACY_KEY_SOURCE};

/// Read access to named configuration values.
///
/// Production code uses [`EnvKeySource`]; tests construct a
/// [`MapKeySource`] so pool loading never touches process environment.
pub trait KeySource: Send + Sync {
    /// Returns the value for `name`, or `None` when unset or empty.
    fn get(&self, name: &str) -> Option<String>;
}

/// `KeySource` backed by process environment variables.
#[derive(Debug, Clone, Default)]
pub struct EnvKeySource;

impl KeySource for EnvKeySource {
    fn get(&self, name: &str) -> Option<String> {
        env::var(name).ok().filter(|v| !v.trim().is_empty())
    }
}

/// `KeySource` backed by an in-memory map.
#[derive(Debug, Clone, Default)]
pub struct MapKeySource {
    values: HashMap<String, String>,
}

impl MapKeySource {
    pub fn new(values: HashMap<String, String>) -> Self {
        Self { values }
    }

    pub fn set(&mut self, name: &str, value: &str) {
        self.values.insert(name.to_string(), value.to_string());
    }
}

impl KeySource for MapKeySource {
    fn get(&self, name: &str) -> Option<String> {
        self.values
            .get(name)
            .filter(|v| !v.trim().is_empty())
            .cloned()
    }
}

/// Static descriptor of a pool's key sources. Loaded once per pool and
/// cached for the process lifetime (keyed by pool name).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PoolConfig {
    /// Logical pool name, e.g. `hub_trade_small`.
    pub pool: String,
    /// Source holding a JSON array of hex private keys.
    pub json_source: Option<String>,
    /// Shared JSON-array source, consulted only when `json_source` yields
    /// nothing.
    pub shared_json_source: Option<String>,
    /// Prefix for indexed single-key sources (`<prefix><index>`).
    pub indexed_prefix: Option<String>,
    /// Scan bound for indexed sources. Empty indices within the bound are
    /// skipped; scanning never stops early.
    pub indexed_scan_limit: u32,
    /// Whether the legacy single-key source may be used when every other
    /// source is empty.
    pub allow_legacy_fallback: bool,
    /// Source name for the legacy single-key fallback.
    pub legacy_source: Option<String>,
    /// JSON-array sources whose keys are filtered out of this pool.
    pub exclusion_sources: Vec<String>,
}

impl PoolConfig {
    /// Standard source naming for a pool: `RELAYER_KEYS_<POOL>` for the
    /// JSON array and `RELAYER_KEY_<POOL>_<i>` for indexed entries, with
    /// the global array and legacy single key as fallbacks.
    pub fn for_pool(name: &str) -> Self {
        let upper = name.to_uppercase();
        Self {
            pool: name.to_string(),
            json_source: Some(format!("RELAYER_KEYS_{}", upper)),
            shared_json_source: Some(GLOBAL_KEYS_SOURCE.to_string()),
            indexed_prefix: Some(format!("RELAYER_KEY_{}_", upper)),
            indexed_scan_limit: DEFAULT_INDEXED_KEY_SCAN_LIMIT,
            allow_legacy_fallback: true,
            legacy_source: Some(LEGACY_KEY_SOURCE.to_string()),
            exclusion_sources: Vec::new(),
        }
    }

    /// Adds exclusion sources. Exclusion is opt-in per pool; pools holding
    /// lower-trust traffic should list every higher-risk pool's sources
    /// here.
    pub fn with_exclusions<I, S>(mut self, sources: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.exclusion_sources
            .extend(sources.into_iter().map(Into::into));
        self
    }
}
