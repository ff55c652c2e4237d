//! Programmable in-memory chain client.

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicU32, AtomicU64, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;

use ohana_chain::abi;
use ohana_chain::{ChainClient, ChainError, LogEntry, LogFilter, TransactionRequest, TxReceipt};
use ohana_types::params::PROFILE_STORAGE_KEY;
use ohana_types::{Address, VouchStatus};

/// In-memory [`ChainClient`] with programmable state and call counters.
///
/// Contract reads are dispatched on the calldata selector, so the client
/// behaves like a real registry: `fee()`, `getVouch(address,address)` and
/// `getData(bytes32)` answer from the configured maps.
#[derive(Default)]
pub struct NullChainClient {
    block_number: AtomicU64,
    fee_wei: AtomicU64,
    logs: Mutex<Vec<LogEntry>>,
    statuses: Mutex<HashMap<(Address, Address), VouchStatus>>,
    profile_values: Mutex<HashMap<Address, Vec<u8>>>,
    contracts: Mutex<HashSet<Address>>,
    /// Number of upcoming read calls to fail with a network error.
    fail_reads: AtomicU32,
    /// Number of upcoming `getData` reads to fail, leaving other reads
    /// untouched (exercises profile-read degradation in isolation).
    fail_profile_reads: AtomicU32,
    /// Artificial latency per read, so tests can interleave passes.
    read_delay: Mutex<Duration>,
    /// Outcome override for the next submission.
    submit_failure: Mutex<Option<ChainError>>,
    pub read_calls: AtomicU32,
    pub submit_calls: AtomicU32,
}

impl NullChainClient {
    pub fn new() -> Self {
        let client = Self::default();
        client.block_number.store(500_000, Ordering::SeqCst);
        client
    }

    // ── Programming the double ──────────────────────────────────────────

    pub fn set_block_number(&self, height: u64) {
        self.block_number.store(height, Ordering::SeqCst);
    }

    pub fn set_fee(&self, fee_wei: u64) {
        self.fee_wei.store(fee_wei, Ordering::SeqCst);
    }

    /// Append a creation event for the pair, built the way the registry
    /// emits it: topic0 = signature hash, topic1 = target, topic2 = voucher.
    pub fn push_creation_event(&self, contract: Address, target: Address, voucher: Address) {
        let block = self.block_number.load(Ordering::SeqCst);
        self.logs.lock().unwrap().push(LogEntry {
            address: contract,
            topics: vec![
                abi::event_topic(ohana_types::params::VOUCH_CREATED_SIGNATURE),
                target.to_topic(),
                voucher.to_topic(),
            ],
            data: Vec::new(),
            block_number: block,
        });
    }

    pub fn set_status(&self, target: Address, voucher: Address, status: VouchStatus) {
        self.statuses
            .lock()
            .unwrap()
            .insert((target, voucher), status);
    }

    /// Set the raw profile storage value for an address and mark it as
    /// contract-backed.
    pub fn set_profile_value(&self, address: Address, value: Vec<u8>) {
        self.mark_contract(address);
        self.profile_values.lock().unwrap().insert(address, value);
    }

    pub fn mark_contract(&self, address: Address) {
        self.contracts.lock().unwrap().insert(address);
    }

    /// Fail the next `count` read calls with a network error.
    pub fn fail_next_reads(&self, count: u32) {
        self.fail_reads.store(count, Ordering::SeqCst);
    }

    /// Fail the next `count` profile storage reads only.
    pub fn fail_next_profile_reads(&self, count: u32) {
        self.fail_profile_reads.store(count, Ordering::SeqCst);
    }

    /// Delay every read, so overlapping passes interleave deterministically
    /// under a paused test clock.
    pub fn set_read_delay(&self, delay: Duration) {
        *self.read_delay.lock().unwrap() = delay;
    }

    /// Fail the next submission with the given error.
    pub fn fail_next_submit(&self, error: ChainError) {
        *self.submit_failure.lock().unwrap() = Some(error);
    }

    pub fn total_calls(&self) -> u32 {
        self.read_calls.load(Ordering::SeqCst) + self.submit_calls.load(Ordering::SeqCst)
    }

    // ── Internals ───────────────────────────────────────────────────────

    async fn record_read(&self) -> Result<(), ChainError> {
        self.read_calls.fetch_add(1, Ordering::SeqCst);
        let delay = *self.read_delay.lock().unwrap();
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
        let remaining = self.fail_reads.load(Ordering::SeqCst);
        if remaining > 0 {
            self.fail_reads.store(remaining - 1, Ordering::SeqCst);
            return Err(ChainError::network("injected read failure"));
        }
        Ok(())
    }

    fn matches(filter: &LogFilter, log: &LogEntry) -> bool {
        if log.address != filter.address {
            return false;
        }
        if log.block_number < filter.from_block {
            return false;
        }
        if let Some(to) = filter.to_block {
            if log.block_number > to {
                return false;
            }
        }
        for (position, wanted) in filter.topics.iter().enumerate() {
            if let Some(topic) = wanted {
                if log.topics.get(position) != Some(topic) {
                    return false;
                }
            }
        }
        true
    }

    fn dispatch_call(&self, to: Address, data: &[u8]) -> Result<Vec<u8>, ChainError> {
        if data.len() < 4 {
            return Err(ChainError::network("calldata shorter than a selector"));
        }
        let selector: [u8; 4] = data[..4].try_into().unwrap();

        if selector == abi::selector("fee()") {
            let mut word = [0u8; 32];
            word[16..].copy_from_slice(&u128::from(self.fee_wei.load(Ordering::SeqCst)).to_be_bytes());
            return Ok(word.to_vec());
        }

        if selector == abi::selector("getVouch(address,address)") {
            if data.len() < 4 + 64 {
                return Err(ChainError::network("getVouch calldata too short"));
            }
            let target_word: [u8; 32] = data[4..36].try_into().unwrap();
            let voucher_word: [u8; 32] = data[36..68].try_into().unwrap();
            let target = Address::from_topic(&target_word);
            let voucher = Address::from_topic(&voucher_word);
            let status = self
                .statuses
                .lock()
                .unwrap()
                .get(&(target, voucher))
                .copied()
                .unwrap_or(VouchStatus::None);
            let mut word = [0u8; 32];
            word[31] = status.code();
            return Ok(word.to_vec());
        }

        if selector == abi::selector("getData(bytes32)") {
            let remaining = self.fail_profile_reads.load(Ordering::SeqCst);
            if remaining > 0 {
                self.fail_profile_reads.store(remaining - 1, Ordering::SeqCst);
                return Err(ChainError::network("injected profile read failure"));
            }
            if data.len() < 4 + 32 || data[4..36] != PROFILE_STORAGE_KEY {
                return Err(ChainError::network("getData: unexpected storage key"));
            }
            let value = self
                .profile_values
                .lock()
                .unwrap()
                .get(&to)
                .cloned()
                .unwrap_or_default();
            return Ok(encode_dyn_bytes(&value));
        }

        Err(ChainError::network("unknown selector in null client"))
    }
}

/// ABI-encode a dynamic `bytes` return (offset word, length word, payload).
pub fn encode_dyn_bytes(value: &[u8]) -> Vec<u8> {
    let mut out = Vec::new();
    let mut offset = [0u8; 32];
    offset[31] = 0x20;
    out.extend_from_slice(&offset);
    let mut length = [0u8; 32];
    length[24..].copy_from_slice(&(value.len() as u64).to_be_bytes());
    out.extend_from_slice(&length);
    out.extend_from_slice(value);
    // pad to a word boundary, as real nodes do
    let rem = value.len() % 32;
    if rem != 0 {
        out.extend(std::iter::repeat(0u8).take(32 - rem));
    }
    out
}

#[async_trait]
impl ChainClient for NullChainClient {
    async fn block_number(&self) -> Result<u64, ChainError> {
        self.record_read().await?;
        Ok(self.block_number.load(Ordering::SeqCst))
    }

    async fn get_logs(&self, filter: &LogFilter) -> Result<Vec<LogEntry>, ChainError> {
        self.record_read().await?;
        let logs = self.logs.lock().unwrap();
        Ok(logs
            .iter()
            .filter(|log| Self::matches(filter, log))
            .cloned()
            .collect())
    }

    async fn call(&self, to: Address, data: Vec<u8>) -> Result<Vec<u8>, ChainError> {
        self.record_read().await?;
        self.dispatch_call(to, &data)
    }

    async fn send_transaction(&self, tx: TransactionRequest) -> Result<TxReceipt, ChainError> {
        self.submit_calls.fetch_add(1, Ordering::SeqCst);
        if let Some(error) = self.submit_failure.lock().unwrap().take() {
            return Err(error);
        }
        let block = self.block_number.fetch_add(1, Ordering::SeqCst) + 1;
        Ok(TxReceipt {
            tx_hash: format!("0xnull{:x}{}", block, tx.to),
            block_number: block,
        })
    }

    async fn has_code(&self, address: Address) -> Result<bool, ChainError> {
        self.record_read().await?;
        Ok(self.contracts.lock().unwrap().contains(&address))
    }
}
