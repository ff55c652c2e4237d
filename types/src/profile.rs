//! Resolved profile metadata for an address.

use serde::{Deserialize, Serialize};

/// Classification of an address on the identity surface.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ProfileKind {
    /// Plain key-pair account with no code; carries no on-chain metadata.
    ExternallyOwned,
    /// Contract-backed identity with a readable profile storage slot.
    ContractBacked,
}

/// Resolved display attributes for an address.
///
/// Resolution never fails: unresolvable profiles come back as one of the
/// placeholder constructors below.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfileRecord {
    pub name: String,
    pub description: String,
    pub picture: String,
    pub kind: ProfileKind,
}

impl ProfileRecord {
    /// Placeholder for an address with no code.
    pub fn eoa() -> Self {
        Self {
            name: "EOA Address".to_string(),
            description: String::new(),
            picture: String::new(),
            kind: ProfileKind::ExternallyOwned,
        }
    }

    /// Placeholder for a contract-backed identity with no profile data set.
    pub fn unnamed() -> Self {
        Self {
            name: "Universal Profile".to_string(),
            description: String::new(),
            picture: String::new(),
            kind: ProfileKind::ContractBacked,
        }
    }

    /// Placeholder when profile resolution failed (bad data, fetch error).
    pub fn degraded() -> Self {
        Self {
            name: "Universal Profile".to_string(),
            description: "Error loading profile".to_string(),
            picture: String::new(),
            kind: ProfileKind::ContractBacked,
        }
    }
}
