//! State-changing vouch operations.
//!
//! Each operation validates local preconditions, submits through the chain
//! client, waits for confirmation, then triggers a fresh synchronization
//! pass of the affected list(s). Writes are never retried: a financial
//! operation must not be silently duplicated.

use std::sync::Arc;
use std::time::Duration;

use ohana_types::{Address, VouchEntry};

use ohana_chain::VouchRegistry;

use crate::error::EngineError;
use crate::retry::with_retry;
use crate::session::Session;
use crate::sync::Synchronizer;

/// Result of a confirmed action plus the refreshed list snapshot(s).
///
/// A refresh that loses the generation race to a newer pass (or fails
/// transiently) reports `None` for that list; the confirmed transaction is
/// still reported.
#[derive(Clone, Debug)]
pub struct VouchReceipt {
    pub tx_hash: String,
    pub received: Option<Vec<VouchEntry>>,
    pub given: Option<Vec<VouchEntry>>,
}

/// Issues create/accept/deny/cancel operations against the registry.
pub struct ActionExecutor {
    registry: VouchRegistry,
    synchronizer: Arc<Synchronizer>,
    attempts: u32,
    base_delay: Duration,
}

impl ActionExecutor {
    pub fn new(
        registry: VouchRegistry,
        synchronizer: Arc<Synchronizer>,
        attempts: u32,
        base_delay: Duration,
    ) -> Self {
        Self {
            registry,
            synchronizer,
            attempts,
            base_delay,
        }
    }

    /// Vouch for `target`, paying the current fee.
    ///
    /// Rejects self-vouching before any chain I/O. Resynchronizes both
    /// lists on success — the local account's given list changed, and the
    /// counterparty relationship may surface on the received side.
    pub async fn vouch(
        &self,
        session: &Session,
        target: Address,
    ) -> Result<VouchReceipt, EngineError> {
        let local = session.require_signer()?;
        if target == local {
            return Err(EngineError::SelfVouchRejected);
        }

        let fee = with_retry(self.attempts, self.base_delay, || self.registry.fee()).await?;
        let receipt = self.registry.vouch(local, target, fee).await?;
        tracing::info!(%target, fee, tx_hash = %receipt.tx_hash, "vouch confirmed");

        Ok(VouchReceipt {
            tx_hash: receipt.tx_hash,
            received: self.refresh(self.synchronizer.sync_received(local).await),
            given: self.refresh(self.synchronizer.sync_given(local).await),
        })
    }

    /// Accept a pending vouch from `voucher`. The contract enforces that a
    /// pending relationship exists; no local pre-check beyond the session.
    pub async fn accept_vouch(
        &self,
        session: &Session,
        voucher: Address,
    ) -> Result<VouchReceipt, EngineError> {
        let local = session.require_signer()?;
        let receipt = self.registry.accept_vouch(local, voucher).await?;
        tracing::info!(%voucher, tx_hash = %receipt.tx_hash, "vouch accepted");

        Ok(VouchReceipt {
            tx_hash: receipt.tx_hash,
            received: self.refresh(self.synchronizer.sync_received(local).await),
            given: None,
        })
    }

    /// Deny a pending vouch from `voucher`.
    pub async fn deny_vouch(
        &self,
        session: &Session,
        voucher: Address,
    ) -> Result<VouchReceipt, EngineError> {
        let local = session.require_signer()?;
        let receipt = self.registry.deny_vouch(local, voucher).await?;
        tracing::info!(%voucher, tx_hash = %receipt.tx_hash, "vouch denied");

        Ok(VouchReceipt {
            tx_hash: receipt.tx_hash,
            received: self.refresh(self.synchronizer.sync_received(local).await),
            given: None,
        })
    }

    /// Cancel a vouch previously given to `target`.
    pub async fn cancel_vouch(
        &self,
        session: &Session,
        target: Address,
    ) -> Result<VouchReceipt, EngineError> {
        let local = session.require_signer()?;
        let receipt = self.registry.cancel_vouch(local, target).await?;
        tracing::info!(%target, tx_hash = %receipt.tx_hash, "vouch cancelled");

        Ok(VouchReceipt {
            tx_hash: receipt.tx_hash,
            received: None,
            given: self.refresh(self.synchronizer.sync_given(local).await),
        })
    }

    fn refresh(&self, result: Result<Vec<VouchEntry>, EngineError>) -> Option<Vec<VouchEntry>> {
        match result {
            Ok(entries) => Some(entries),
            Err(EngineError::Superseded) => None,
            Err(e) => {
                tracing::warn!(error = %e, "post-action refresh failed, caller should resync");
                None
            }
        }
    }
}
