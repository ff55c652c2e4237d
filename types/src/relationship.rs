//! Relationship keys and synchronized list entries.

use serde::{Deserialize, Serialize};

use crate::address::Address;
use crate::status::VouchStatus;

/// Ordered pair identifying a vouch relationship.
///
/// `target` is the profile being vouched for; `voucher` is the profile
/// giving the vouch. At most one active relationship exists per pair.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RelationshipKey {
    pub target: Address,
    pub voucher: Address,
}

impl RelationshipKey {
    pub fn new(target: Address, voucher: Address) -> Self {
        Self { target, voucher }
    }
}

/// One entry of a synchronized received or given list.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct VouchEntry {
    /// The counterparty: the voucher on a received list, the target on a
    /// given list.
    pub counterparty: Address,
    /// Resolved display name (placeholder when resolution degraded).
    pub name: String,
    /// Live on-chain status at synchronization time.
    pub status: VouchStatus,
}

/// A hidden received vouch, persisted in the local overlay.
///
/// Carries a snapshot of the entry as last seen, so the settings view can
/// render it without a chain round-trip.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct HiddenVouch {
    pub key: RelationshipKey,
    pub name: String,
    pub status: VouchStatus,
}

impl HiddenVouch {
    /// Snapshot a received-list entry for the given owner.
    pub fn from_entry(owner: Address, entry: &VouchEntry) -> Self {
        Self {
            key: RelationshipKey::new(owner, entry.counterparty),
            name: entry.name.clone(),
            status: entry.status,
        }
    }
}
