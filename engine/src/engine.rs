//! The engine facade an embedding application talks to.

use std::sync::Arc;

use ohana_chain::{ContentFetcher, GatewayFetcher, VouchRegistry};
use ohana_types::{Address, HiddenVouch, RelationshipKey, VouchEntry};

use crate::config::EngineConfig;
use crate::error::EngineError;
use crate::executor::{ActionExecutor, VouchReceipt};
use crate::overlay::HiddenOverlayStore;
use crate::resolver::ProfileResolver;
use crate::session::Session;
use crate::sync::Synchronizer;

/// Owns the session and every engine component; resolves the local account
/// from the session for each operation.
pub struct VouchEngine {
    session: Session,
    synchronizer: Arc<Synchronizer>,
    overlay: Arc<HiddenOverlayStore>,
    executor: ActionExecutor,
}

impl VouchEngine {
    /// Connect a session per the config's endpoint strategy and assemble
    /// the engine around it.
    pub async fn connect(config: &EngineConfig) -> Result<Self, EngineError> {
        let session = Session::connect(config).await?;
        let fetcher: Arc<dyn ContentFetcher> = Arc::new(GatewayFetcher::new(&config.ipfs_gateway)?);
        Self::assemble(session, fetcher, config)
    }

    /// Assemble the engine around an existing session and fetcher.
    ///
    /// Embedders with their own transport (and tests with nullables) enter
    /// here.
    pub fn assemble(
        session: Session,
        fetcher: Arc<dyn ContentFetcher>,
        config: &EngineConfig,
    ) -> Result<Self, EngineError> {
        let registry = VouchRegistry::new(session.client(), config.registry_address);
        let resolver = ProfileResolver::new(
            session.client(),
            fetcher,
            config.ipfs_gateway.clone(),
            config.read_attempts,
            config.retry_base_delay(),
        );
        let overlay = Arc::new(HiddenOverlayStore::open(&config.data_dir)?);
        let synchronizer = Arc::new(Synchronizer::new(
            registry.clone(),
            resolver,
            Arc::clone(&overlay),
            config.window_blocks,
            config.read_attempts,
            config.retry_base_delay(),
        ));
        let executor = ActionExecutor::new(
            registry,
            Arc::clone(&synchronizer),
            config.read_attempts,
            config.retry_base_delay(),
        );

        Ok(Self {
            session,
            synchronizer,
            overlay,
            executor,
        })
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Synchronize the received list for the session account.
    pub async fn sync_received(&self) -> Result<Vec<VouchEntry>, EngineError> {
        let local = self.session.require_account()?;
        self.synchronizer.sync_received(local).await
    }

    /// Synchronize the given list for the session account.
    pub async fn sync_given(&self) -> Result<Vec<VouchEntry>, EngineError> {
        let local = self.session.require_account()?;
        self.synchronizer.sync_given(local).await
    }

    /// Hide a received vouch locally. Takes effect on the next
    /// `sync_received` pass; remote state is untouched.
    pub fn hide(&self, entry: &VouchEntry) -> Result<(), EngineError> {
        let local = self.session.require_account()?;
        self.overlay.hide(local, HiddenVouch::from_entry(local, entry))
    }

    /// Unhide a previously hidden vouch by its voucher address.
    pub fn unhide(&self, voucher: Address) -> Result<(), EngineError> {
        let local = self.session.require_account()?;
        self.overlay
            .unhide(local, &RelationshipKey::new(local, voucher))
    }

    /// The hidden entries for the session account, with their snapshots.
    pub fn list_hidden(&self) -> Result<Vec<HiddenVouch>, EngineError> {
        let local = self.session.require_account()?;
        self.overlay.list_hidden(local)
    }

    /// Vouch for `target`, paying the current fee.
    pub async fn vouch(&self, target: Address) -> Result<VouchReceipt, EngineError> {
        self.executor.vouch(&self.session, target).await
    }

    /// Accept a pending received vouch from `voucher`.
    pub async fn accept_vouch(&self, voucher: Address) -> Result<VouchReceipt, EngineError> {
        self.executor.accept_vouch(&self.session, voucher).await
    }

    /// Deny a pending received vouch from `voucher`.
    pub async fn deny_vouch(&self, voucher: Address) -> Result<VouchReceipt, EngineError> {
        self.executor.deny_vouch(&self.session, voucher).await
    }

    /// Cancel a vouch previously given to `target`.
    pub async fn cancel_vouch(&self, target: Address) -> Result<VouchReceipt, EngineError> {
        self.executor.cancel_vouch(&self.session, target).await
    }
}
