//! The abstract chain client every consumer depends on.
//!
//! Real deployments use [`crate::rpc::RpcClient`]; tests use the nullable
//! client from `ohana-nullables`.

use async_trait::async_trait;

use ohana_types::Address;

use crate::error::ChainError;

/// Filter for a creation-event log query.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LogFilter {
    /// Emitting contract address.
    pub address: Address,
    pub from_block: u64,
    /// `None` means latest.
    pub to_block: Option<u64>,
    /// Per-position indexed topic filter; `None` is the match-any wildcard.
    pub topics: Vec<Option<[u8; 32]>>,
}

/// One entry returned by a log query.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LogEntry {
    pub address: Address,
    pub topics: Vec<[u8; 32]>,
    pub data: Vec<u8>,
    pub block_number: u64,
}

/// A state-changing call to submit.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TransactionRequest {
    pub from: Address,
    pub to: Address,
    pub data: Vec<u8>,
    /// Payment attached to the call, in wei.
    pub value: u128,
}

/// Confirmation of a mined, successful transaction.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TxReceipt {
    pub tx_hash: String,
    pub block_number: u64,
}

/// Read and write surface of an RPC endpoint.
///
/// Stateless apart from the connection handle. `send_transaction` suspends
/// until the transaction is mined or fails; a mined-but-reverted
/// transaction surfaces as [`ChainError::Reverted`].
#[async_trait]
pub trait ChainClient: Send + Sync {
    /// Current block height.
    async fn block_number(&self) -> Result<u64, ChainError>;

    /// Query logs matching the filter over its block range.
    async fn get_logs(&self, filter: &LogFilter) -> Result<Vec<LogEntry>, ChainError>;

    /// Pure contract read (`eth_call`); returns the raw return data.
    async fn call(&self, to: Address, data: Vec<u8>) -> Result<Vec<u8>, ChainError>;

    /// Submit a transaction and wait for its receipt.
    async fn send_transaction(&self, tx: TransactionRequest) -> Result<TxReceipt, ChainError>;

    /// Whether the address has code (contract-backed vs externally owned).
    async fn has_code(&self, address: Address) -> Result<bool, ChainError>;
}
