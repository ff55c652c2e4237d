//! Vouch relationship synchronization.
//!
//! Reconstructs the local view of pairwise vouch relationships from the
//! creation-event log plus live contract state. Events are discovery only —
//! they record that a relationship was once created, not its current
//! status — so every discovered pair is cross-checked against
//! `getVouch(target, voucher)` before it enters a list.
//!
//! Discovery is bounded to a recent block window. Relationships created
//! before the window are invisible even when still active on-chain; that
//! is a documented cost/completeness trade-off, tunable via config.

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use futures_util::future::join_all;

use ohana_chain::{LogEntry, VouchRegistry};
use ohana_types::{Address, RelationshipKey, VouchEntry};

use crate::error::EngineError;
use crate::overlay::HiddenOverlayStore;
use crate::resolver::ProfileResolver;
use crate::retry::with_retry;

/// Which role the local account plays in the scanned relationships.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Direction {
    /// Local account is the target; counterparties are vouchers.
    Received,
    /// Local account is the voucher; counterparties are targets.
    Given,
}

/// Reconciles event-log discovery, live status, profile metadata, and the
/// hidden overlay into received/given lists.
pub struct Synchronizer {
    registry: VouchRegistry,
    resolver: ProfileResolver,
    overlay: Arc<HiddenOverlayStore>,
    generation: AtomicU64,
    window_blocks: u64,
    attempts: u32,
    base_delay: Duration,
}

impl Synchronizer {
    pub fn new(
        registry: VouchRegistry,
        resolver: ProfileResolver,
        overlay: Arc<HiddenOverlayStore>,
        window_blocks: u64,
        attempts: u32,
        base_delay: Duration,
    ) -> Self {
        Self {
            registry,
            resolver,
            overlay,
            generation: AtomicU64::new(0),
            window_blocks,
            attempts,
            base_delay,
        }
    }

    /// Synchronize the received list: vouches where `local` is the target.
    ///
    /// Applies the hidden-overlay filter. Entries keep event-log discovery
    /// order; cancelled (status `None`) relationships are retained for the
    /// caller to filter.
    pub async fn sync_received(&self, local: Address) -> Result<Vec<VouchEntry>, EngineError> {
        self.sync_pass(local, Direction::Received).await
    }

    /// Synchronize the given list: vouches where `local` is the voucher.
    ///
    /// The hidden overlay never applies here — hiding only affects the
    /// received perspective.
    pub async fn sync_given(&self, local: Address) -> Result<Vec<VouchEntry>, EngineError> {
        self.sync_pass(local, Direction::Given).await
    }

    async fn sync_pass(
        &self,
        local: Address,
        direction: Direction,
    ) -> Result<Vec<VouchEntry>, EngineError> {
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        tracing::debug!(%local, ?direction, generation, "starting synchronization pass");

        let client = self.registry.client();
        let head = with_retry(self.attempts, self.base_delay, || client.block_number()).await?;
        let from_block = head.saturating_sub(self.window_blocks);

        let filter = match direction {
            Direction::Received => self.registry.creation_filter(Some(local), None, from_block),
            Direction::Given => self.registry.creation_filter(None, Some(local), from_block),
        };
        let logs =
            with_retry(self.attempts, self.base_delay, || client.get_logs(&filter)).await?;
        tracing::debug!(count = logs.len(), from_block, "creation events discovered");

        // Per-entry fan-out: status reads and profile resolution for
        // independent pairs run concurrently. A status read failure (after
        // retries) fails the whole pass — no silently truncated lists.
        // Profile resolution degrades to a placeholder instead.
        let resolutions = join_all(
            logs.iter()
                .map(|log| self.resolve_entry(local, direction, log)),
        )
        .await;

        // Deduplicate by relationship key (re-indexed logs can repeat a
        // pair), keeping the latest resolved status in first-seen position.
        let mut order: Vec<Address> = Vec::new();
        let mut by_counterparty: HashMap<Address, VouchEntry> = HashMap::new();
        for resolution in resolutions {
            let entry = resolution?;
            if by_counterparty
                .insert(entry.counterparty, entry.clone())
                .is_none()
            {
                order.push(entry.counterparty);
            }
        }
        let mut entries: Vec<VouchEntry> = order
            .into_iter()
            .filter_map(|counterparty| by_counterparty.remove(&counterparty))
            .collect();

        if direction == Direction::Received {
            let hidden: HashSet<RelationshipKey> = self
                .overlay
                .list_hidden(local)?
                .into_iter()
                .map(|h| h.key)
                .collect();
            entries.retain(|e| !hidden.contains(&RelationshipKey::new(local, e.counterparty)));
        }

        // A pass that was overlapped by a newer one must be discarded by
        // the caller; its view may already be stale.
        if self.generation.load(Ordering::SeqCst) != generation {
            tracing::debug!(generation, "pass superseded, discarding result");
            return Err(EngineError::Superseded);
        }

        Ok(entries)
    }

    async fn resolve_entry(
        &self,
        local: Address,
        direction: Direction,
        log: &LogEntry,
    ) -> Result<VouchEntry, EngineError> {
        let topic_index = match direction {
            Direction::Received => 2,
            Direction::Given => 1,
        };
        let topic = log.topics.get(topic_index).ok_or_else(|| {
            EngineError::Network("creation event missing indexed address topics".to_string())
        })?;
        let counterparty = Address::from_topic(topic);

        let (target, voucher) = match direction {
            Direction::Received => (local, counterparty),
            Direction::Given => (counterparty, local),
        };

        // Mandatory live-status cross-check.
        let status = with_retry(self.attempts, self.base_delay, || {
            self.registry.get_vouch(target, voucher)
        })
        .await?;

        let profile = self.resolver.resolve(counterparty).await;

        Ok(VouchEntry {
            counterparty,
            name: profile.name,
            status,
        })
    }
}
