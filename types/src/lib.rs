//! Fundamental types for the Ohana vouch engine.
//!
//! This crate defines the types shared across every other crate in the
//! workspace: account addresses, vouch statuses, relationship keys, resolved
//! profile records, and protocol constants.

pub mod address;
pub mod params;
pub mod profile;
pub mod relationship;
pub mod status;

pub use address::{Address, AddressError};
pub use profile::{ProfileKind, ProfileRecord};
pub use relationship::{HiddenVouch, RelationshipKey, VouchEntry};
pub use status::VouchStatus;
