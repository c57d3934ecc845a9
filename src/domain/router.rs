//! Relayer router.
//!
//! `RelayerRouter` is the entry point callers use to send a transaction
//! through a pool. It owns every piece of process-wide mutable state the
//! pipeline needs (key cache, round-robin counters, serialization gate,
//! nonce hints) as ordinary fields, so tests construct isolated routers
//! instead of sharing hidden globals.
//!
//! Flow per request: resolve the pool's keys (loaded lazily, cached for
//! the process lifetime), select a signer, then run the submission under
//! the signer's serialization gate.

use std::sync::Arc;

use dashmap::DashMap;

use crate::config::{KeySource, PoolConfig, RelayerConfig};
use crate::models::{RelayerError, RelayerKey};
use crate::services::{
    ChainWriter, EvmProviderTrait, KeyPoolLoader, NonceAllocatorTrait, PoolSelector,
    SelectionMode, SerializationGate, SubmitRequest, TransactionSubmitter, TxHandle, WriteCall,
};

/// One transaction order against a pool.
#[derive(Debug, Clone)]
pub struct SendRequest {
    pub pool: String,
    pub mode: SelectionMode,
    pub chain_id: u64,
    pub call: WriteCall,
    /// Tag for logs and allocator records.
    pub label: String,
}

pub struct RelayerRouter<S: KeySource> {
    loader: KeyPoolLoader<S>,
    selector: PoolSelector,
    gate: SerializationGate,
    submitter: TransactionSubmitter,
    config: RelayerConfig,
    pool_configs: DashMap<String, PoolConfig>,
    pools: DashMap<String, Arc<Vec<RelayerKey>>>,
}

impl<S: KeySource> RelayerRouter<S> {
    pub fn new(source: S, config: RelayerConfig) -> Self {
        Self {
            loader: KeyPoolLoader::new(source),
            selector: PoolSelector::new(),
            gate: SerializationGate::new(),
            submitter: TransactionSubmitter::new(&config),
            config,
            pool_configs: DashMap::new(),
            pools: DashMap::new(),
        }
    }

    /// Attaches the shared nonce allocator. Without one, submissions rely
    /// on provider-observed nonces and the local hint cache only.
    pub fn with_allocator(mut self, allocator: Arc<dyn NonceAllocatorTrait>) -> Self {
        self.submitter = self.submitter.with_allocator(allocator);
        self
    }

    /// Registers a non-standard pool descriptor (extra exclusions, custom
    /// sources). Pools without a registration use
    /// [`PoolConfig::for_pool`] naming. Must happen before the pool's
    /// first use; the key cache is not invalidated.
    pub fn register_pool(&self, config: PoolConfig) {
        self.pool_configs.insert(config.pool.clone(), config);
    }

    /// The pool's keys, loaded on first use and cached for the process
    /// lifetime.
    pub fn keys(&self, pool: &str) -> Arc<Vec<RelayerKey>> {
        if let Some(cached) = self.pools.get(pool) {
            return Arc::clone(&cached);
        }
        let config = self
            .pool_configs
            .get(pool)
            .map(|entry| entry.clone())
            .unwrap_or_else(|| PoolConfig::for_pool(pool));
        let loaded = Arc::new(self.loader.load(&config));
        Arc::clone(&self.pools.entry(pool.to_string()).or_insert(loaded))
    }

    /// Resolves one signing key for a request.
    pub fn select_relayer(
        &self,
        pool: &str,
        mode: &SelectionMode,
    ) -> Result<RelayerKey, RelayerError> {
        let keys = self.keys(pool);
        self.selector.select(pool, &keys, mode)
    }

    pub fn submitter(&self) -> &TransactionSubmitter {
        &self.submitter
    }

    /// Sends one transaction through the pool: select a signer, then run
    /// the nonce-safe submission under that signer's gate.
    pub async fn send_transaction(
        &self,
        provider: &dyn EvmProviderTrait,
        writer: &dyn ChainWriter,
        request: SendRequest,
    ) -> Result<TxHandle, RelayerError> {
        let key = self.select_relayer(&request.pool, &request.mode)?;
        let address = key.address.clone();
        let submit_request =
            SubmitRequest::new(key, request.chain_id, request.call, &request.label)
                .with_max_attempts(self.config.max_attempts);

        let handle = self
            .gate
            .run_exclusive(
                &address,
                self.submitter.submit(provider, writer, &submit_request),
            )
            .await?;
        Ok(handle)
    }
}
