//! Vouch relationship status.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The current status of a vouch relationship.
///
/// Authoritative on-chain via `getVouch(target, voucher)`. Creation events
/// only record that a relationship once existed; current status must always
/// be read live.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum VouchStatus {
    /// No relationship record exists, or it was cancelled.
    None,
    /// Vouch created, awaiting the target's accept or deny.
    Pending,
    /// Target accepted the vouch.
    Accepted,
    /// Target denied the vouch.
    Denied,
}

impl VouchStatus {
    /// Decode the on-chain status code. Codes outside `0..=3` return `None`
    /// (the `Option`, not the variant).
    pub fn from_code(code: u8) -> Option<Self> {
        match code {
            0 => Some(Self::None),
            1 => Some(Self::Pending),
            2 => Some(Self::Accepted),
            3 => Some(Self::Denied),
            _ => None,
        }
    }

    /// The on-chain status code for this variant.
    pub fn code(&self) -> u8 {
        match self {
            Self::None => 0,
            Self::Pending => 1,
            Self::Accepted => 2,
            Self::Denied => 3,
        }
    }

    /// Display word, as rendered to users.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::None => "None",
            Self::Pending => "Pending",
            Self::Accepted => "Accepted",
            Self::Denied => "Denied",
        }
    }

    /// Whether the target can still act on this vouch (accept or deny).
    pub fn is_actionable(&self) -> bool {
        matches!(self, Self::Pending)
    }
}

impl fmt::Display for VouchStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
