//! Nullable infrastructure for deterministic testing.
//!
//! The engine's external dependencies (chain RPC, content gateway) are
//! abstracted behind traits in `ohana-chain`. This crate provides
//! test-friendly implementations that:
//! - Return deterministic, programmable values
//! - Inject transport failures on demand
//! - Count every call, so tests can assert on I/O behavior
//! - Never touch the filesystem or network
//!
//! Usage: swap real implementations for nullables in tests.

pub mod chain;
pub mod content;

pub use chain::NullChainClient;
pub use content::NullContentFetcher;
