use thiserror::Error;

use ohana_chain::ChainError;

/// Errors surfaced by the vouch engine.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum EngineError {
    /// RPC or content-fetch transport failure, after retry exhaustion.
    #[error("network error: {0}")]
    Network(String),

    /// The contract rejected a submitted transaction. Never retried.
    #[error("transaction reverted: {reason}")]
    TransactionReverted { reason: String },

    /// Attempted to vouch for the session's own profile.
    #[error("cannot vouch for your own profile")]
    SelfVouchRejected,

    /// No usable account or signing capability for this operation.
    #[error("no active session for this operation")]
    NoActiveSession,

    /// A newer synchronization pass was started while this one was in
    /// flight; the stale result must be discarded.
    #[error("synchronization pass superseded by a newer one")]
    Superseded,

    /// Hidden-overlay persistence failure (local disk, never the chain).
    #[error("overlay store error: {0}")]
    Store(String),

    /// Configuration file could not be read or parsed.
    #[error("config error: {0}")]
    Config(String),
}

impl From<ChainError> for EngineError {
    fn from(e: ChainError) -> Self {
        match e {
            ChainError::Network(msg) => Self::Network(msg),
            ChainError::Reverted { reason } => Self::TransactionReverted { reason },
        }
    }
}
