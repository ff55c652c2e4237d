//! JSON-RPC 2.0 implementation of [`ChainClient`] over HTTP.

use std::time::Duration;

use async_trait::async_trait;
use serde_json::{json, Value};

use ohana_types::Address;

use crate::client::{ChainClient, LogEntry, LogFilter, TransactionRequest, TxReceipt};
use crate::error::ChainError;

/// How often to poll for a transaction receipt.
const RECEIPT_POLL_INTERVAL: Duration = Duration::from_secs(2);
/// Poll bound before giving up on confirmation (~5 minutes).
const RECEIPT_POLL_LIMIT: u32 = 150;

/// HTTP client for an Ethereum-style JSON-RPC endpoint.
///
/// Wraps `reqwest::Client` with the endpoint URL and provides the typed
/// [`ChainClient`] surface the engine needs.
#[derive(Clone)]
pub struct RpcClient {
    http: reqwest::Client,
    endpoint: String,
}

impl RpcClient {
    /// Create a client targeting the given endpoint URL.
    pub fn new(endpoint: impl Into<String>) -> Result<Self, ChainError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .connect_timeout(Duration::from_secs(10))
            .build()
            .map_err(|e| ChainError::network(format!("failed to create HTTP client: {e}")))?;
        Ok(Self {
            http,
            endpoint: endpoint.into(),
        })
    }

    /// The configured endpoint URL.
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Send a JSON-RPC request and return the `result` field.
    async fn request(&self, method: &str, params: Value) -> Result<Value, ChainError> {
        let body = json!({
            "jsonrpc": "2.0",
            "id": 1,
            "method": method,
            "params": params,
        });

        let response = self
            .http
            .post(&self.endpoint)
            .json(&body)
            .send()
            .await
            .map_err(|e| ChainError::network(format!("{method} request failed: {e}")))?;

        if !response.status().is_success() {
            return Err(ChainError::network(format!(
                "{method}: endpoint returned HTTP {}",
                response.status()
            )));
        }

        let envelope: Value = response
            .json()
            .await
            .map_err(|e| ChainError::network(format!("{method}: invalid JSON response: {e}")))?;

        if let Some(err) = envelope.get("error") {
            let message = err
                .get("message")
                .and_then(|m| m.as_str())
                .unwrap_or("unknown RPC error");
            return Err(ChainError::network(format!("{method}: {message}")));
        }

        envelope
            .get("result")
            .cloned()
            .ok_or_else(|| ChainError::network(format!("{method}: response missing result")))
    }
}

#[async_trait]
impl ChainClient for RpcClient {
    async fn block_number(&self) -> Result<u64, ChainError> {
        let result = self.request("eth_blockNumber", json!([])).await?;
        parse_quantity(&result, "eth_blockNumber")
    }

    async fn get_logs(&self, filter: &LogFilter) -> Result<Vec<LogEntry>, ChainError> {
        let result = self
            .request("eth_getLogs", json!([filter_params(filter)]))
            .await?;

        let raw = result
            .as_array()
            .ok_or_else(|| ChainError::network("eth_getLogs: result is not an array"))?;
        raw.iter().map(parse_log).collect()
    }

    async fn call(&self, to: Address, data: Vec<u8>) -> Result<Vec<u8>, ChainError> {
        let params = json!([{ "to": to.to_string(), "data": to_hex(&data) }, "latest"]);
        let result = self.request("eth_call", params).await?;
        let hex_str = result
            .as_str()
            .ok_or_else(|| ChainError::network("eth_call: result is not a string"))?;
        from_hex(hex_str).map_err(|e| ChainError::network(format!("eth_call: {e}")))
    }

    async fn send_transaction(&self, tx: TransactionRequest) -> Result<TxReceipt, ChainError> {
        let params = json!([{
            "from": tx.from.to_string(),
            "to": tx.to.to_string(),
            "data": to_hex(&tx.data),
            "value": quantity_hex(tx.value),
        }]);
        let result = self.request("eth_sendTransaction", params).await?;
        let tx_hash = result
            .as_str()
            .ok_or_else(|| ChainError::network("eth_sendTransaction: result is not a string"))?
            .to_string();

        tracing::info!(%tx_hash, to = %tx.to, "transaction submitted, awaiting confirmation");
        self.wait_for_receipt(&tx_hash).await
    }

    async fn has_code(&self, address: Address) -> Result<bool, ChainError> {
        let result = self
            .request("eth_getCode", json!([address.to_string(), "latest"]))
            .await?;
        let code = result
            .as_str()
            .ok_or_else(|| ChainError::network("eth_getCode: result is not a string"))?;
        Ok(code != "0x" && !code.is_empty())
    }
}

impl RpcClient {
    async fn wait_for_receipt(&self, tx_hash: &str) -> Result<TxReceipt, ChainError> {
        for _ in 0..RECEIPT_POLL_LIMIT {
            let result = self
                .request("eth_getTransactionReceipt", json!([tx_hash]))
                .await?;

            if result.is_null() {
                tokio::time::sleep(RECEIPT_POLL_INTERVAL).await;
                continue;
            }

            let status = result
                .get("status")
                .and_then(|s| s.as_str())
                .unwrap_or("0x1");
            if status == "0x0" {
                let reason = result
                    .get("revertReason")
                    .and_then(|r| r.as_str())
                    .unwrap_or("execution reverted")
                    .to_string();
                return Err(ChainError::Reverted { reason });
            }

            let block_number = result
                .get("blockNumber")
                .map(|b| parse_quantity(b, "receipt blockNumber"))
                .transpose()?
                .unwrap_or(0);

            tracing::info!(%tx_hash, block_number, "transaction confirmed");
            return Ok(TxReceipt {
                tx_hash: tx_hash.to_string(),
                block_number,
            });
        }

        Err(ChainError::network(format!(
            "transaction {tx_hash} not confirmed after {RECEIPT_POLL_LIMIT} polls"
        )))
    }
}

/// Build the `eth_getLogs` parameter object for a filter.
fn filter_params(filter: &LogFilter) -> Value {
    let topics: Vec<Value> = filter
        .topics
        .iter()
        .map(|t| match t {
            Some(topic) => json!(to_hex(topic)),
            None => Value::Null,
        })
        .collect();

    json!({
        "address": filter.address.to_string(),
        "fromBlock": quantity_hex(filter.from_block as u128),
        "toBlock": match filter.to_block {
            Some(block) => json!(quantity_hex(block as u128)),
            None => json!("latest"),
        },
        "topics": topics,
    })
}

fn parse_log(raw: &Value) -> Result<LogEntry, ChainError> {
    let address_str = raw
        .get("address")
        .and_then(|a| a.as_str())
        .ok_or_else(|| ChainError::network("log entry missing address"))?;
    let address = Address::parse(address_str)
        .map_err(|e| ChainError::network(format!("log entry address: {e}")))?;

    let raw_topics = raw
        .get("topics")
        .and_then(|t| t.as_array())
        .ok_or_else(|| ChainError::network("log entry missing topics"))?;
    let mut topics = Vec::with_capacity(raw_topics.len());
    for topic in raw_topics {
        let s = topic
            .as_str()
            .ok_or_else(|| ChainError::network("log topic is not a string"))?;
        let bytes = from_hex(s).map_err(|e| ChainError::network(format!("log topic: {e}")))?;
        let word: [u8; 32] = bytes
            .try_into()
            .map_err(|_| ChainError::network("log topic is not 32 bytes"))?;
        topics.push(word);
    }

    let data = match raw.get("data").and_then(|d| d.as_str()) {
        Some(s) => from_hex(s).map_err(|e| ChainError::network(format!("log data: {e}")))?,
        None => Vec::new(),
    };

    let block_number = raw
        .get("blockNumber")
        .map(|b| parse_quantity(b, "log blockNumber"))
        .transpose()?
        .unwrap_or(0);

    Ok(LogEntry {
        address,
        topics,
        data,
        block_number,
    })
}

fn parse_quantity(value: &Value, context: &str) -> Result<u64, ChainError> {
    let s = value
        .as_str()
        .ok_or_else(|| ChainError::network(format!("{context}: quantity is not a string")))?;
    u64::from_str_radix(s.trim_start_matches("0x"), 16)
        .map_err(|e| ChainError::network(format!("{context}: invalid quantity {s}: {e}")))
}

fn to_hex(bytes: &[u8]) -> String {
    format!("0x{}", hex::encode(bytes))
}

fn from_hex(s: &str) -> Result<Vec<u8>, String> {
    hex::decode(s.trim_start_matches("0x")).map_err(|e| e.to_string())
}

fn quantity_hex(value: u128) -> String {
    format!("0x{value:x}")
}
