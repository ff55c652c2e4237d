//! Chain client adapter for the Ohana vouch engine.
//!
//! Everything that touches the network lives here: the [`ChainClient`] trait
//! and its JSON-RPC implementation, the minimal ABI encode/decode helpers
//! the contract surface needs, the content-addressed document fetcher, and
//! the typed [`VouchRegistry`] wrapper over the raw client.

pub mod abi;
pub mod client;
pub mod content;
pub mod error;
pub mod registry;
pub mod rpc;

pub use client::{ChainClient, LogEntry, LogFilter, TransactionRequest, TxReceipt};
pub use content::{rewrite_ipfs_url, ContentFetcher, GatewayFetcher};
pub use error::ChainError;
pub use registry::{profile_data, VouchRegistry};
pub use rpc::RpcClient;
