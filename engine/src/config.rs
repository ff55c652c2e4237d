//! Engine configuration, loadable from TOML.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use ohana_types::params::{
    DEFAULT_IPFS_GATEWAY, DISCOVERY_WINDOW_BLOCKS, MAX_READ_ATTEMPTS, RETRY_BASE_DELAY_MS,
};
use ohana_types::Address;

use crate::error::EngineError;

/// Engine configuration.
///
/// Constructed once at startup; every tunable the engine consults lives
/// here rather than in ambient globals.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Primary, signing-capable RPC endpoint.
    pub rpc_url: String,

    /// Read-only fallback endpoint, tried once if the primary probe fails.
    #[serde(default)]
    pub fallback_rpc_url: Option<String>,

    /// Vouch registry contract address.
    pub registry_address: Address,

    /// The local profile account the engine synchronizes for.
    #[serde(default)]
    pub account: Option<Address>,

    /// Gateway base URL for content-addressed profile documents.
    #[serde(default = "default_gateway")]
    pub ipfs_gateway: String,

    /// Recent-block window scanned for creation events. Relationships
    /// created before the window are invisible to discovery.
    #[serde(default = "default_window")]
    pub window_blocks: u64,

    /// Attempts for transient reads before the failure is final.
    #[serde(default = "default_attempts")]
    pub read_attempts: u32,

    /// Base delay for linear retry backoff, in milliseconds.
    #[serde(default = "default_base_delay_ms")]
    pub retry_base_delay_ms: u64,

    /// Directory for the hidden-overlay files.
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
}

fn default_gateway() -> String {
    DEFAULT_IPFS_GATEWAY.to_string()
}

fn default_window() -> u64 {
    DISCOVERY_WINDOW_BLOCKS
}

fn default_attempts() -> u32 {
    MAX_READ_ATTEMPTS
}

fn default_base_delay_ms() -> u64 {
    RETRY_BASE_DELAY_MS
}

fn default_data_dir() -> PathBuf {
    PathBuf::from("ohana-data")
}

impl EngineConfig {
    /// Load a TOML config file.
    pub fn load(path: &Path) -> Result<Self, EngineError> {
        let raw = std::fs::read_to_string(path)
            .map_err(|e| EngineError::Config(format!("failed to read {}: {e}", path.display())))?;
        toml::from_str(&raw)
            .map_err(|e| EngineError::Config(format!("failed to parse {}: {e}", path.display())))
    }

    /// Retry backoff base as a `Duration`.
    pub fn retry_base_delay(&self) -> Duration {
        Duration::from_millis(self.retry_base_delay_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn minimal_toml_fills_defaults() {
        let config: EngineConfig = toml::from_str(
            r#"
            rpc_url = "https://rpc.example"
            registry_address = "0xcccccccccccccccccccccccccccccccccccccccc"
            "#,
        )
        .unwrap();

        assert_eq!(config.window_blocks, DISCOVERY_WINDOW_BLOCKS);
        assert_eq!(config.read_attempts, MAX_READ_ATTEMPTS);
        assert_eq!(config.ipfs_gateway, DEFAULT_IPFS_GATEWAY);
        assert!(config.fallback_rpc_url.is_none());
        assert!(config.account.is_none());
    }

    #[test]
    fn full_toml_roundtrip() {
        let config: EngineConfig = toml::from_str(
            r#"
            rpc_url = "https://rpc.example"
            fallback_rpc_url = "https://ro.example"
            registry_address = "0xcccccccccccccccccccccccccccccccccccccccc"
            account = "0x0101010101010101010101010101010101010101"
            ipfs_gateway = "https://gw.example/ipfs/"
            window_blocks = 5000
            read_attempts = 5
            retry_base_delay_ms = 250
            data_dir = "/tmp/ohana"
            "#,
        )
        .unwrap();

        assert_eq!(config.window_blocks, 5000);
        assert_eq!(config.retry_base_delay(), Duration::from_millis(250));
        assert_eq!(
            config.account,
            Some(Address::new([0x01; 20])),
        );
    }
}
