//! Explicit session handle, constructed once at startup.
//!
//! Replaces ambient connection/account globals: the engine's entry points
//! receive this by reference. Two-tier endpoint strategy — primary
//! (signing-capable) probed first under bounded retry, then the read-only
//! fallback — selected once at construction, never swapped mid-session.

use std::sync::Arc;

use ohana_chain::{ChainClient, ChainError, RpcClient};
use ohana_types::Address;

use crate::config::EngineConfig;
use crate::error::EngineError;
use crate::retry::with_retry;

/// A connected session: chain client handle, local account, and whether
/// the endpoint can sign and submit transactions.
#[derive(Clone)]
pub struct Session {
    client: Arc<dyn ChainClient>,
    account: Option<Address>,
    signing: bool,
}

impl Session {
    /// Probe and select an endpoint per the config's two-tier strategy.
    pub async fn connect(config: &EngineConfig) -> Result<Self, EngineError> {
        Self::connect_with(config, |endpoint| {
            RpcClient::new(endpoint).map(|client| Arc::new(client) as Arc<dyn ChainClient>)
        })
        .await
    }

    /// Endpoint selection with a caller-supplied client constructor
    /// (tests, embedders with their own transport).
    pub async fn connect_with<F>(
        config: &EngineConfig,
        make_client: F,
    ) -> Result<Self, EngineError>
    where
        F: Fn(&str) -> Result<Arc<dyn ChainClient>, ChainError>,
    {
        let primary = make_client(&config.rpc_url)?;
        let probe = with_retry(config.read_attempts, config.retry_base_delay(), || {
            primary.block_number()
        })
        .await;

        match probe {
            Ok(height) => {
                tracing::info!(endpoint = %config.rpc_url, height, "session connected");
                Ok(Self {
                    client: primary,
                    account: config.account,
                    signing: true,
                })
            }
            Err(e) => {
                let fallback_url = config
                    .fallback_rpc_url
                    .as_ref()
                    .ok_or_else(|| EngineError::from(e.clone()))?;
                tracing::warn!(
                    endpoint = %config.rpc_url,
                    error = %e,
                    "primary endpoint unreachable, falling back to read-only"
                );
                let fallback = make_client(fallback_url)?;
                fallback.block_number().await?;
                Ok(Self {
                    client: fallback,
                    account: config.account,
                    signing: false,
                })
            }
        }
    }

    /// Build a session around an existing client (tests, embedders).
    pub fn with_client(
        client: Arc<dyn ChainClient>,
        account: Option<Address>,
        signing: bool,
    ) -> Self {
        Self {
            client,
            account,
            signing,
        }
    }

    pub fn client(&self) -> Arc<dyn ChainClient> {
        Arc::clone(&self.client)
    }

    /// The local account, if one is configured.
    pub fn account(&self) -> Option<Address> {
        self.account
    }

    /// Whether the session can submit transactions.
    pub fn can_sign(&self) -> bool {
        self.signing
    }

    /// The local account for read operations.
    pub fn require_account(&self) -> Result<Address, EngineError> {
        self.account.ok_or(EngineError::NoActiveSession)
    }

    /// The local account for write operations; read-only sessions fail.
    pub fn require_signer(&self) -> Result<Address, EngineError> {
        if !self.signing {
            return Err(EngineError::NoActiveSession);
        }
        self.require_account()
    }
}
