//! Shared test harness: the engine assembled over nullable infrastructure.

// Each test binary uses a different subset of the harness.
#![allow(dead_code)]

use std::sync::Arc;

use tempfile::TempDir;

use ohana_chain::{ChainClient, ContentFetcher};
use ohana_engine::{EngineConfig, Session, VouchEngine};
use ohana_nullables::{NullChainClient, NullContentFetcher};
use ohana_types::Address;

pub struct Harness {
    pub chain: Arc<NullChainClient>,
    pub fetcher: Arc<NullContentFetcher>,
    pub engine: VouchEngine,
    pub local: Address,
    pub registry: Address,
    _data_dir: TempDir,
}

pub fn addr(byte: u8) -> Address {
    Address::new([byte; 20])
}

/// Engine with a signing-capable session for account `addr(0x0a)`.
pub fn harness() -> Harness {
    harness_with_signing(true)
}

pub fn harness_with_signing(signing: bool) -> Harness {
    ohana_engine::init_tracing();
    let chain = Arc::new(NullChainClient::new());
    let fetcher = Arc::new(NullContentFetcher::new());
    let data_dir = tempfile::tempdir().unwrap();
    let local = addr(0x0a);
    let registry = addr(0xcc);

    let config = EngineConfig {
        rpc_url: "http://unused.invalid".to_string(),
        fallback_rpc_url: None,
        registry_address: registry,
        account: Some(local),
        ipfs_gateway: "https://gw.test/ipfs/".to_string(),
        window_blocks: 100_000,
        read_attempts: 3,
        retry_base_delay_ms: 10,
        data_dir: data_dir.path().to_path_buf(),
    };

    let session = Session::with_client(
        Arc::clone(&chain) as Arc<dyn ChainClient>,
        Some(local),
        signing,
    );
    let engine = VouchEngine::assemble(
        session,
        Arc::clone(&fetcher) as Arc<dyn ContentFetcher>,
        &config,
    )
    .unwrap();

    Harness {
        chain,
        fetcher,
        engine,
        local,
        registry,
        _data_dir: data_dir,
    }
}

/// Raw profile storage value: 40-byte verifiable-URI header + payload.
pub fn profile_value(payload: &str) -> Vec<u8> {
    let mut value = vec![0u8; 40];
    value.extend_from_slice(payload.as_bytes());
    value
}
