use thiserror::Error;

/// Errors from the chain and content-fetch boundary.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ChainError {
    /// RPC or content-fetch transport failure, including malformed
    /// responses. Transient; callers may retry reads.
    #[error("network error: {0}")]
    Network(String),

    /// The contract rejected a submitted transaction. Never retried.
    #[error("transaction reverted: {reason}")]
    Reverted { reason: String },
}

impl ChainError {
    /// Shorthand for a network error with context.
    pub fn network(msg: impl Into<String>) -> Self {
        Self::Network(msg.into())
    }
}
