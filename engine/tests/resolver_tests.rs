//! Profile resolver behavior: placeholders, fallback fetch, degradation.

mod common;

use std::sync::atomic::Ordering;
use std::sync::Arc;
use std::time::Duration;

use common::{addr, profile_value};
use ohana_chain::{ChainClient, ContentFetcher};
use ohana_engine::ProfileResolver;
use ohana_nullables::{NullChainClient, NullContentFetcher};
use ohana_types::{ProfileKind, ProfileRecord};

fn resolver(
    chain: &Arc<NullChainClient>,
    fetcher: &Arc<NullContentFetcher>,
) -> ProfileResolver {
    ProfileResolver::new(
        Arc::clone(chain) as Arc<dyn ChainClient>,
        Arc::clone(fetcher) as Arc<dyn ContentFetcher>,
        "https://gw.test/ipfs/",
        3,
        Duration::from_millis(10),
    )
}

#[tokio::test(start_paused = true)]
async fn eoa_resolves_with_single_code_check() {
    let chain = Arc::new(NullChainClient::new());
    let fetcher = Arc::new(NullContentFetcher::new());

    let record = resolver(&chain, &fetcher).resolve(addr(0x0b)).await;
    assert_eq!(record, ProfileRecord::eoa());
    assert_eq!(chain.read_calls.load(Ordering::SeqCst), 1);
    assert_eq!(fetcher.fetch_calls.load(Ordering::SeqCst), 0);
}

#[tokio::test(start_paused = true)]
async fn contract_without_profile_data_is_unnamed() {
    let chain = Arc::new(NullChainClient::new());
    let fetcher = Arc::new(NullContentFetcher::new());
    chain.mark_contract(addr(0x0c));

    let record = resolver(&chain, &fetcher).resolve(addr(0x0c)).await;
    assert_eq!(record, ProfileRecord::unnamed());
}

#[tokio::test(start_paused = true)]
async fn inline_document_resolves_fields_and_rewrites_picture() {
    let chain = Arc::new(NullChainClient::new());
    let fetcher = Arc::new(NullContentFetcher::new());
    chain.set_profile_value(
        addr(0x0c),
        profile_value(
            r#"{"LSP3Profile":{"name":"Kai","description":"Aloha","profileImage":[{"url":"ipfs://QmPic"}]}}"#,
        ),
    );

    let record = resolver(&chain, &fetcher).resolve(addr(0x0c)).await;
    assert_eq!(record.name, "Kai");
    assert_eq!(record.description, "Aloha");
    assert_eq!(record.picture, "https://gw.test/ipfs/QmPic");
    assert_eq!(record.kind, ProfileKind::ContractBacked);
    assert_eq!(fetcher.fetch_calls.load(Ordering::SeqCst), 0);
}

#[tokio::test(start_paused = true)]
async fn bare_document_without_wrapper_also_resolves() {
    let chain = Arc::new(NullChainClient::new());
    let fetcher = Arc::new(NullContentFetcher::new());
    chain.set_profile_value(addr(0x0c), profile_value(r#"{"name":"Nalu"}"#));

    let record = resolver(&chain, &fetcher).resolve(addr(0x0c)).await;
    assert_eq!(record.name, "Nalu");
}

#[tokio::test(start_paused = true)]
async fn content_addressed_pointer_is_fetched_once() {
    let chain = Arc::new(NullChainClient::new());
    let fetcher = Arc::new(NullContentFetcher::new());
    chain.set_profile_value(addr(0x0c), profile_value("ipfs://QmDoc"));
    fetcher.set_document("QmDoc", r#"{"LSP3Profile":{"name":"Moana"}}"#);

    let record = resolver(&chain, &fetcher).resolve(addr(0x0c)).await;
    assert_eq!(record.name, "Moana");
    assert_eq!(fetcher.fetch_calls.load(Ordering::SeqCst), 1);
}

#[tokio::test(start_paused = true)]
async fn gateway_miss_degrades_without_retry() {
    let chain = Arc::new(NullChainClient::new());
    let fetcher = Arc::new(NullContentFetcher::new());
    chain.set_profile_value(addr(0x0c), profile_value("ipfs://QmMissing"));

    let record = resolver(&chain, &fetcher).resolve(addr(0x0c)).await;
    assert_eq!(record, ProfileRecord::degraded());
    // Content fetch is a single attempt by contract.
    assert_eq!(fetcher.fetch_calls.load(Ordering::SeqCst), 1);
}

#[tokio::test(start_paused = true)]
async fn malformed_json_degrades_to_placeholder() {
    let chain = Arc::new(NullChainClient::new());
    let fetcher = Arc::new(NullContentFetcher::new());
    chain.set_profile_value(addr(0x0c), profile_value("{not json"));

    let record = resolver(&chain, &fetcher).resolve(addr(0x0c)).await;
    assert_eq!(record.name, "Universal Profile");
    assert_eq!(record.description, "Error loading profile");
    assert!(record.picture.is_empty());
}

#[tokio::test(start_paused = true)]
async fn storage_read_is_retried_then_succeeds() {
    let chain = Arc::new(NullChainClient::new());
    let fetcher = Arc::new(NullContentFetcher::new());
    chain.set_profile_value(addr(0x0c), profile_value(r#"{"name":"Kai"}"#));
    chain.fail_next_profile_reads(2);

    let record = resolver(&chain, &fetcher).resolve(addr(0x0c)).await;
    assert_eq!(record.name, "Kai");
}

#[tokio::test(start_paused = true)]
async fn storage_read_exhaustion_degrades() {
    let chain = Arc::new(NullChainClient::new());
    let fetcher = Arc::new(NullContentFetcher::new());
    chain.set_profile_value(addr(0x0c), profile_value(r#"{"name":"Kai"}"#));
    chain.fail_next_profile_reads(3);

    let record = resolver(&chain, &fetcher).resolve(addr(0x0c)).await;
    assert_eq!(record, ProfileRecord::degraded());
}
