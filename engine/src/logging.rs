//! Logging initialization for embedders without their own subscriber.

use tracing_subscriber::EnvFilter;

/// Default filter: engine crates at `info`, everything else at `warn`.
const DEFAULT_DIRECTIVES: &str = "warn,ohana_engine=info,ohana_chain=info";

/// Install a `tracing` subscriber with the engine's default filter.
///
/// `RUST_LOG` overrides the defaults. Safe to call more than once (and
/// alongside a subscriber the embedder already installed): later calls
/// are no-ops.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_DIRECTIVES));
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}

/// Same defaults, JSON-formatted output for log collectors.
pub fn init_tracing_json() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_DIRECTIVES));
    let _ = tracing_subscriber::fmt()
        .json()
        .with_env_filter(filter)
        .try_init();
}
