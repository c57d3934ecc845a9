//! End-to-end pipeline scenarios: pool loading, selection, gated
//! submission and nonce bookkeeping through the public API.

use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use relayer_pool::config::{MapKeySource, PoolConfig, RelayerConfig};
use relayer_pool::domain::{RelayerRouter, SendRequest};
use relayer_pool::models::{ProviderError, RelayerError, RelayerKey};
use relayer_pool::services::{
    ChainWriter, EvmProviderTrait, InMemoryNonceAllocator, NonceAllocatorTrait, SelectionMode,
    TxHandle, WriteCall,
};

const K1: &str = "0x0000000000000000000000000000000000000000000000000000000000000001";
const K2: &str = "0x0000000000000000000000000000000000000000000000000000000000000002";

/// Provider double with a fixed pending count.
struct FakeProvider {
    pending: AtomicU64,
}

impl FakeProvider {
    fn reporting(pending: u64) -> Self {
        Self {
            pending: AtomicU64::new(pending),
        }
    }
}

#[async_trait]
impl EvmProviderTrait for FakeProvider {
    async fn get_pending_transaction_count(&self, _address: &str) -> Result<u64, ProviderError> {
        Ok(self.pending.load(Ordering::SeqCst))
    }
}

/// Writer double that rejects nonces below a floor with the provider's
/// stale-nonce wording and records every accepted broadcast with the
/// signer it was handed.
struct FakeWriter {
    stale_below: u64,
    broadcasts: Mutex<Vec<u64>>,
    signers: Mutex<Vec<String>>,
    active: AtomicUsize,
    max_active: AtomicUsize,
}

impl FakeWriter {
    fn accepting_from(stale_below: u64) -> Self {
        Self {
            stale_below,
            broadcasts: Mutex::new(Vec::new()),
            signers: Mutex::new(Vec::new()),
            active: AtomicUsize::new(0),
            max_active: AtomicUsize::new(0),
        }
    }
}

#[async_trait]
impl ChainWriter for FakeWriter {
    async fn invoke(
        &self,
        relayer: &RelayerKey,
        call: &WriteCall,
    ) -> Result<TxHandle, ProviderError> {
        let nonce = call.overrides.nonce.expect("submitter must set a nonce");

        let current = self.active.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_active.fetch_max(current, Ordering::SeqCst);
        tokio::task::yield_now().await;
        self.active.fetch_sub(1, Ordering::SeqCst);

        if nonce < self.stale_below {
            return Err(ProviderError::RpcError(format!(
                "nonce too low: next nonce {}, tx nonce {}",
                self.stale_below, nonce
            )));
        }
        self.broadcasts.lock().unwrap().push(nonce);
        self.signers.lock().unwrap().push(relayer.address.clone());
        Ok(TxHandle {
            hash: format!("0xhash{}", nonce),
            nonce,
        })
    }
}

fn router_for(pool: &str, keys: &[&str]) -> RelayerRouter<MapKeySource> {
    let mut source = MapKeySource::default();
    source.set(
        &format!("RELAYER_KEYS_{}", pool.to_uppercase()),
        &serde_json::to_string(keys).unwrap(),
    );
    RelayerRouter::new(source, RelayerConfig::default())
}

fn send(pool: &str, mode: SelectionMode, label: &str) -> SendRequest {
    SendRequest {
        pool: pool.to_string(),
        mode,
        chain_id: 8453,
        call: WriteCall::new("fillOrder", vec![serde_json::json!("0xorder")]),
        label: label.to_string(),
    }
}

#[test]
fn test_required_address_selection_end_to_end() {
    let router = router_for("hub_trade_small", &[K1, K2]);
    let keys = router.keys("hub_trade_small");
    assert_eq!(keys.len(), 2);

    // Asking for K2's address yields exactly K2's key.
    let selected = router
        .select_relayer(
            "hub_trade_small",
            &SelectionMode::RequiredAddress(keys[1].address.clone()),
        )
        .unwrap();
    assert_eq!(selected.id, keys[1].id);

    // An address outside the pool is refused with remediation text.
    let absent = "0x00000000000000000000000000000000000000aa".to_string();
    let error = router
        .select_relayer("hub_trade_small", &SelectionMode::RequiredAddress(absent))
        .unwrap_err();
    assert!(matches!(
        error,
        RelayerError::RequiredRelayerNotInPool { .. }
    ));
    assert!(error.to_string().contains("hub_trade_small"));
}

#[test]
fn test_round_robin_full_cycle() {
    let router = router_for("hub_trade_small", &[K1, K2]);
    let first = router
        .select_relayer("hub_trade_small", &SelectionMode::RoundRobin)
        .unwrap();
    let second = router
        .select_relayer("hub_trade_small", &SelectionMode::RoundRobin)
        .unwrap();
    let third = router
        .select_relayer("hub_trade_small", &SelectionMode::RoundRobin)
        .unwrap();

    assert_eq!(first.id, "hub_trade_small:0");
    assert_eq!(second.id, "hub_trade_small:1");
    assert_eq!(third.id, first.id);
}

#[test]
fn test_sticky_selection_is_stable() {
    let router = router_for("hub_trade_small", &[K1, K2]);
    let mode = SelectionMode::Sticky("session:0xuser".to_string());
    let first = router.select_relayer("hub_trade_small", &mode).unwrap();
    for _ in 0..5 {
        let again = router.select_relayer("hub_trade_small", &mode).unwrap();
        assert_eq!(first.id, again.id);
    }
}

#[test]
fn test_exclusions_apply_through_router() {
    let mut source = MapKeySource::default();
    source.set(
        "RELAYER_KEYS_HUB_TRADE_SMALL",
        &serde_json::to_string(&[K1, K2]).unwrap(),
    );
    source.set(
        "RELAYER_KEYS_HUB_TRADE_LARGE",
        &serde_json::to_string(&[K2]).unwrap(),
    );
    let router = RelayerRouter::new(source, RelayerConfig::default());
    router.register_pool(
        PoolConfig::for_pool("hub_trade_small")
            .with_exclusions(["RELAYER_KEYS_HUB_TRADE_LARGE"]),
    );

    // K2 is reserved for the large pool and must not appear here.
    let keys = router.keys("hub_trade_small");
    assert_eq!(keys.len(), 1);
}

#[tokio::test]
async fn test_send_transaction_with_allocator_bookkeeping() {
    let allocator = Arc::new(InMemoryNonceAllocator::new());
    let router = router_for("hub_trade_small", &[K1])
        .with_allocator(allocator.clone() as Arc<dyn NonceAllocatorTrait>);
    let key_address = router.keys("hub_trade_small")[0].address.clone();

    let provider = FakeProvider::reporting(0);
    let writer = FakeWriter::accepting_from(0);

    let handle = router
        .send_transaction(
            &provider,
            &writer,
            send("hub_trade_small", SelectionMode::RoundRobin, "fill-1"),
        )
        .await
        .unwrap();
    assert_eq!(handle.nonce, 0);

    // Provider still reports 0, but the hint and allocator both push the
    // next submission forward.
    let handle = router
        .send_transaction(
            &provider,
            &writer,
            send("hub_trade_small", SelectionMode::RoundRobin, "fill-2"),
        )
        .await
        .unwrap();
    assert_eq!(handle.nonce, 1);

    assert_eq!(*writer.broadcasts.lock().unwrap(), vec![0, 1]);
    assert_eq!(
        allocator.last_broadcasted(&key_address, 8453),
        Some((1, "0xhash1".to_string()))
    );
    assert_eq!(router.submitter().next_nonce_hint(8453, &key_address), 2);
}

#[tokio::test]
async fn test_writer_signs_with_each_selected_relayer() {
    let router = router_for("hub_trade_small", &[K1, K2]);
    let expected: Vec<String> = router
        .keys("hub_trade_small")
        .iter()
        .map(|key| key.address.clone())
        .collect();

    let provider = FakeProvider::reporting(0);
    let writer = FakeWriter::accepting_from(0);

    for i in 0..2 {
        router
            .send_transaction(
                &provider,
                &writer,
                send(
                    "hub_trade_small",
                    SelectionMode::RoundRobin,
                    &format!("fill-{}", i),
                ),
            )
            .await
            .unwrap();
    }

    // Round-robin walked both keys and the writer was handed each selected
    // signer in turn, not just gating metadata.
    assert_eq!(*writer.signers.lock().unwrap(), expected);
    // Distinct signers each start from nonce 0.
    assert_eq!(*writer.broadcasts.lock().unwrap(), vec![0, 0]);
}

#[tokio::test(start_paused = true)]
async fn test_send_transaction_recovers_from_stale_nonces() {
    let router = router_for("hub_trade_small", &[K1]);
    let provider = FakeProvider::reporting(5);
    // The network already holds transactions at nonces 5 and 6.
    let writer = FakeWriter::accepting_from(7);

    let handle = router
        .send_transaction(
            &provider,
            &writer,
            send("hub_trade_small", SelectionMode::RoundRobin, "fill-racy"),
        )
        .await
        .unwrap();

    assert_eq!(handle.nonce, 7);
    assert_eq!(*writer.broadcasts.lock().unwrap(), vec![7]);
}

#[tokio::test]
async fn test_non_nonce_failure_surfaces_original_message() {
    struct RevertingWriter;

    #[async_trait]
    impl ChainWriter for RevertingWriter {
        async fn invoke(
            &self,
            _relayer: &RelayerKey,
            _call: &WriteCall,
        ) -> Result<TxHandle, ProviderError> {
            Err(ProviderError::RpcError(
                "execution reverted: order already filled".to_string(),
            ))
        }
    }

    let router = router_for("hub_trade_small", &[K1]);
    let provider = FakeProvider::reporting(0);

    let error = router
        .send_transaction(
            &provider,
            &RevertingWriter,
            send("hub_trade_small", SelectionMode::RoundRobin, "fill-bad"),
        )
        .await
        .unwrap_err();
    assert_eq!(
        error.to_string(),
        "execution reverted: order already filled"
    );
}

#[tokio::test]
async fn test_same_signer_submissions_are_serialized() {
    let router = Arc::new(router_for("hub_trade_small", &[K1]));
    let provider = Arc::new(FakeProvider::reporting(0));
    let writer = Arc::new(FakeWriter::accepting_from(0));

    let mut handles = Vec::new();
    for i in 0..4 {
        let router = Arc::clone(&router);
        let provider = Arc::clone(&provider);
        let writer = Arc::clone(&writer);
        handles.push(tokio::spawn(async move {
            router
                .send_transaction(
                    provider.as_ref(),
                    writer.as_ref(),
                    send(
                        "hub_trade_small",
                        SelectionMode::RoundRobin,
                        &format!("fill-{}", i),
                    ),
                )
                .await
                .unwrap()
        }));
    }
    for handle in handles {
        handle.await.unwrap();
    }

    // The gate admitted one write at a time for the single signer, and the
    // hint cache kept nonces strictly increasing despite the provider
    // reporting 0 throughout.
    assert_eq!(writer.max_active.load(Ordering::SeqCst), 1);
    let mut broadcasts = writer.broadcasts.lock().unwrap().clone();
    broadcasts.sort_unstable();
    assert_eq!(broadcasts, vec![0, 1, 2, 3]);
}
