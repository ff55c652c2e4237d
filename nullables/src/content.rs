//! Programmable in-memory content fetcher.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;

use ohana_chain::{ChainError, ContentFetcher};

/// In-memory [`ContentFetcher`]: a hash-to-document map with call counting.
///
/// Unconfigured hashes fail with a network error, matching a gateway miss.
#[derive(Default)]
pub struct NullContentFetcher {
    documents: Mutex<HashMap<String, String>>,
    pub fetch_calls: AtomicU32,
}

impl NullContentFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_document(&self, hash: impl Into<String>, body: impl Into<String>) {
        self.documents
            .lock()
            .unwrap()
            .insert(hash.into(), body.into());
    }
}

#[async_trait]
impl ContentFetcher for NullContentFetcher {
    async fn fetch(&self, hash: &str) -> Result<String, ChainError> {
        self.fetch_calls.fetch_add(1, Ordering::SeqCst);
        self.documents
            .lock()
            .unwrap()
            .get(hash)
            .cloned()
            .ok_or_else(|| ChainError::network(format!("no document for hash {hash}")))
    }
}
