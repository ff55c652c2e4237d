//! Content-addressed document fetch through an HTTP gateway.

use std::time::Duration;

use async_trait::async_trait;

use ohana_types::params::IPFS_SCHEME;

use crate::error::ChainError;

/// Fetches an off-chain document body by content hash.
///
/// Single attempt by contract: callers that want the placeholder-on-failure
/// behavior get it from the profile resolver, not from retries here.
#[async_trait]
pub trait ContentFetcher: Send + Sync {
    /// Fetch the document body for a content hash.
    async fn fetch(&self, hash: &str) -> Result<String, ChainError>;
}

/// [`ContentFetcher`] backed by an HTTP gateway (`GET <base><hash>`).
#[derive(Clone)]
pub struct GatewayFetcher {
    http: reqwest::Client,
    base: String,
}

impl GatewayFetcher {
    /// Create a fetcher for the given gateway base URL.
    pub fn new(base: impl Into<String>) -> Result<Self, ChainError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .connect_timeout(Duration::from_secs(10))
            .build()
            .map_err(|e| ChainError::network(format!("failed to create HTTP client: {e}")))?;
        Ok(Self {
            http,
            base: base.into(),
        })
    }

    /// The gateway URL for a content hash.
    pub fn url_for(&self, hash: &str) -> String {
        format!("{}{}", self.base, hash)
    }
}

#[async_trait]
impl ContentFetcher for GatewayFetcher {
    async fn fetch(&self, hash: &str) -> Result<String, ChainError> {
        let url = self.url_for(hash);
        let response = self
            .http
            .get(&url)
            .send()
            .await
            .map_err(|e| ChainError::network(format!("content fetch failed: {e}")))?;

        if !response.status().is_success() {
            return Err(ChainError::network(format!(
                "content fetch for {hash}: gateway returned HTTP {}",
                response.status()
            )));
        }

        response
            .text()
            .await
            .map_err(|e| ChainError::network(format!("content fetch body: {e}")))
    }
}

/// Rewrite an `ipfs://` URL through the gateway; other URLs pass unchanged.
pub fn rewrite_ipfs_url(url: &str, gateway_base: &str) -> String {
    match url.strip_prefix(IPFS_SCHEME) {
        Some(hash) => format!("{gateway_base}{hash}"),
        None => url.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rewrites_ipfs_scheme() {
        assert_eq!(
            rewrite_ipfs_url("ipfs://QmHash", "https://gw.example/ipfs/"),
            "https://gw.example/ipfs/QmHash"
        );
    }

    #[test]
    fn leaves_http_urls_alone() {
        assert_eq!(
            rewrite_ipfs_url("https://img.example/a.png", "https://gw.example/ipfs/"),
            "https://img.example/a.png"
        );
    }

    #[test]
    fn gateway_url_concatenates() {
        let fetcher = GatewayFetcher::new("https://gw.example/ipfs/").unwrap();
        assert_eq!(fetcher.url_for("QmHash"), "https://gw.example/ipfs/QmHash");
    }
}
