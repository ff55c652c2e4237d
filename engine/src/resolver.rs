//! Profile resolution with graceful degradation.
//!
//! Resolution never fails: whatever goes wrong past the code check, the
//! caller gets a placeholder record. Identity metadata is cosmetic;
//! relationship synchronization must not block on it.

use std::sync::Arc;
use std::time::Duration;

use serde::Deserialize;
use thiserror::Error;

use ohana_chain::{profile_data, rewrite_ipfs_url, ChainClient, ChainError, ContentFetcher};
use ohana_types::params::{IPFS_SCHEME, PROFILE_VALUE_HEADER_LEN};
use ohana_types::{Address, ProfileKind, ProfileRecord};

use crate::retry::with_retry;

/// Resolves display metadata for counterparty addresses.
pub struct ProfileResolver {
    client: Arc<dyn ChainClient>,
    fetcher: Arc<dyn ContentFetcher>,
    gateway: String,
    attempts: u32,
    base_delay: Duration,
}

#[derive(Debug, Error)]
enum ResolveError {
    #[error(transparent)]
    Chain(#[from] ChainError),

    #[error("profile decode failed: {0}")]
    Decode(String),
}

impl ProfileResolver {
    pub fn new(
        client: Arc<dyn ChainClient>,
        fetcher: Arc<dyn ContentFetcher>,
        gateway: impl Into<String>,
        attempts: u32,
        base_delay: Duration,
    ) -> Self {
        Self {
            client,
            fetcher,
            gateway: gateway.into(),
            attempts,
            base_delay,
        }
    }

    /// Resolve the profile record for an address.
    ///
    /// Addresses without code resolve to the EOA placeholder with no further
    /// I/O. Contract-backed addresses whose profile cannot be read or
    /// decoded resolve to the degraded placeholder.
    pub async fn resolve(&self, address: Address) -> ProfileRecord {
        match self.client.has_code(address).await {
            Ok(true) => {}
            Ok(false) => return ProfileRecord::eoa(),
            Err(e) => {
                tracing::warn!(%address, error = %e, "code check failed, treating as EOA");
                return ProfileRecord::eoa();
            }
        }

        match self.resolve_contract(address).await {
            Ok(record) => record,
            Err(e) => {
                tracing::warn!(%address, error = %e, "profile resolution degraded to placeholder");
                ProfileRecord::degraded()
            }
        }
    }

    async fn resolve_contract(&self, address: Address) -> Result<ProfileRecord, ResolveError> {
        // The storage read is the only retried step; content fetch is a
        // single attempt.
        let value = with_retry(self.attempts, self.base_delay, || {
            profile_data(self.client.as_ref(), address)
        })
        .await?;

        if value.is_empty() {
            return Ok(ProfileRecord::unnamed());
        }
        if value.len() <= PROFILE_VALUE_HEADER_LEN {
            return Err(ResolveError::Decode(format!(
                "profile value shorter than its {PROFILE_VALUE_HEADER_LEN}-byte header"
            )));
        }

        let text = std::str::from_utf8(&value[PROFILE_VALUE_HEADER_LEN..])
            .map_err(|e| ResolveError::Decode(format!("payload is not UTF-8: {e}")))?;

        let body = match text.strip_prefix(IPFS_SCHEME) {
            Some(hash) => self.fetcher.fetch(hash).await?,
            None => text.to_string(),
        };

        self.parse_document(&body)
    }

    fn parse_document(&self, body: &str) -> Result<ProfileRecord, ResolveError> {
        let root: serde_json::Value = serde_json::from_str(body)
            .map_err(|e| ResolveError::Decode(format!("invalid profile JSON: {e}")))?;

        // Documents may wrap the fields under "LSP3Profile" or carry them
        // at the top level.
        let fields_value = root.get("LSP3Profile").unwrap_or(&root).clone();
        let fields: ProfileFields = serde_json::from_value(fields_value)
            .map_err(|e| ResolveError::Decode(format!("unexpected profile shape: {e}")))?;

        let picture = fields
            .profile_image
            .first()
            .map(|image| rewrite_ipfs_url(&image.url, &self.gateway))
            .unwrap_or_default();

        Ok(ProfileRecord {
            name: fields
                .name
                .unwrap_or_else(|| "Universal Profile".to_string()),
            description: fields.description.unwrap_or_default(),
            picture,
            kind: ProfileKind::ContractBacked,
        })
    }
}

#[derive(Debug, Deserialize)]
struct ProfileFields {
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    description: Option<String>,
    #[serde(default, rename = "profileImage")]
    profile_image: Vec<ProfileImage>,
}

#[derive(Debug, Deserialize)]
struct ProfileImage {
    #[serde(default)]
    url: String,
}
