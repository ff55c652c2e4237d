//! Vouch relationship synchronization engine.
//!
//! Provides everything an embedding application needs:
//! - Received/given list synchronization from the creation-event log,
//!   cross-checked against live contract status
//! - Profile resolution with content-addressed fallback and graceful
//!   degradation to placeholders
//! - A locally persisted hidden overlay on the received list
//! - Vouch actions (create, accept, deny, cancel) with post-confirmation
//!   resynchronization
//! - An explicit session with a two-tier endpoint strategy

pub mod config;
pub mod engine;
pub mod error;
pub mod executor;
pub mod logging;
pub mod overlay;
pub mod resolver;
pub mod retry;
pub mod session;
pub mod sync;

pub use config::EngineConfig;
pub use engine::VouchEngine;
pub use error::EngineError;
pub use executor::{ActionExecutor, VouchReceipt};
pub use logging::{init_tracing, init_tracing_json};
pub use overlay::HiddenOverlayStore;
pub use resolver::ProfileResolver;
pub use session::Session;
pub use sync::Synchronizer;
