//! Hidden overlay store: locally persisted received-vouch suppression.
//!
//! Purely a display filter over the received list — never sent to the
//! chain, never affecting the given list. One JSON file per owning
//! account under the configured data directory.

use std::path::{Path, PathBuf};

use ohana_types::{Address, HiddenVouch, RelationshipKey};

use crate::error::EngineError;

/// Per-account persisted set of hidden received vouches.
pub struct HiddenOverlayStore {
    dir: PathBuf,
}

impl HiddenOverlayStore {
    /// Open the store, creating the data directory if needed.
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self, EngineError> {
        let dir = dir.into();
        std::fs::create_dir_all(&dir)
            .map_err(|e| EngineError::Store(format!("failed to create {}: {e}", dir.display())))?;
        Ok(Self { dir })
    }

    fn path_for(&self, owner: Address) -> PathBuf {
        self.dir.join(format!("hidden_{owner}.json"))
    }

    /// All hidden entries for the owner. A missing file is the empty set.
    pub fn list_hidden(&self, owner: Address) -> Result<Vec<HiddenVouch>, EngineError> {
        load_entries(&self.path_for(owner))
    }

    /// Hide a received vouch. Hiding an already-hidden key is a no-op.
    pub fn hide(&self, owner: Address, entry: HiddenVouch) -> Result<(), EngineError> {
        let path = self.path_for(owner);
        let mut entries = load_entries(&path)?;
        if entries.iter().any(|e| e.key == entry.key) {
            return Ok(());
        }
        entries.push(entry);
        save_entries(&path, &entries)
    }

    /// Unhide by relationship key. Unhiding a non-hidden key is a no-op.
    pub fn unhide(&self, owner: Address, key: &RelationshipKey) -> Result<(), EngineError> {
        let path = self.path_for(owner);
        let mut entries = load_entries(&path)?;
        let before = entries.len();
        entries.retain(|e| e.key != *key);
        if entries.len() == before {
            return Ok(());
        }
        save_entries(&path, &entries)
    }
}

fn load_entries(path: &Path) -> Result<Vec<HiddenVouch>, EngineError> {
    if !path.exists() {
        return Ok(Vec::new());
    }
    let json = std::fs::read_to_string(path)
        .map_err(|e| EngineError::Store(format!("failed to read {}: {e}", path.display())))?;
    serde_json::from_str(&json)
        .map_err(|e| EngineError::Store(format!("invalid overlay JSON in {}: {e}", path.display())))
}

fn save_entries(path: &Path, entries: &[HiddenVouch]) -> Result<(), EngineError> {
    let json = serde_json::to_string_pretty(entries)
        .map_err(|e| EngineError::Store(format!("overlay serialization failed: {e}")))?;
    std::fs::write(path, json)
        .map_err(|e| EngineError::Store(format!("failed to write {}: {e}", path.display())))
}

#[cfg(test)]
mod tests {
    use super::*;
    use ohana_types::{VouchEntry, VouchStatus};

    fn entry(owner: Address, voucher: Address) -> HiddenVouch {
        HiddenVouch::from_entry(
            owner,
            &VouchEntry {
                counterparty: voucher,
                name: "Kai".to_string(),
                status: VouchStatus::Pending,
            },
        )
    }

    #[test]
    fn hide_then_list_then_unhide() {
        let dir = tempfile::tempdir().unwrap();
        let store = HiddenOverlayStore::open(dir.path()).unwrap();
        let owner = Address::new([1u8; 20]);
        let voucher = Address::new([2u8; 20]);

        assert!(store.list_hidden(owner).unwrap().is_empty());

        store.hide(owner, entry(owner, voucher)).unwrap();
        let hidden = store.list_hidden(owner).unwrap();
        assert_eq!(hidden.len(), 1);
        assert_eq!(hidden[0].key, RelationshipKey::new(owner, voucher));

        store
            .unhide(owner, &RelationshipKey::new(owner, voucher))
            .unwrap();
        assert!(store.list_hidden(owner).unwrap().is_empty());
    }

    #[test]
    fn hide_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let store = HiddenOverlayStore::open(dir.path()).unwrap();
        let owner = Address::new([1u8; 20]);
        let voucher = Address::new([2u8; 20]);

        store.hide(owner, entry(owner, voucher)).unwrap();
        store.hide(owner, entry(owner, voucher)).unwrap();
        assert_eq!(store.list_hidden(owner).unwrap().len(), 1);
    }

    #[test]
    fn unhide_missing_key_is_noop() {
        let dir = tempfile::tempdir().unwrap();
        let store = HiddenOverlayStore::open(dir.path()).unwrap();
        let owner = Address::new([1u8; 20]);
        store
            .unhide(owner, &RelationshipKey::new(owner, Address::new([9u8; 20])))
            .unwrap();
        assert!(store.list_hidden(owner).unwrap().is_empty());
    }

    #[test]
    fn entries_are_namespaced_by_owner() {
        let dir = tempfile::tempdir().unwrap();
        let store = HiddenOverlayStore::open(dir.path()).unwrap();
        let owner_a = Address::new([1u8; 20]);
        let owner_b = Address::new([2u8; 20]);
        let voucher = Address::new([3u8; 20]);

        store.hide(owner_a, entry(owner_a, voucher)).unwrap();
        assert_eq!(store.list_hidden(owner_a).unwrap().len(), 1);
        assert!(store.list_hidden(owner_b).unwrap().is_empty());
    }

    #[test]
    fn persists_across_store_instances() {
        let dir = tempfile::tempdir().unwrap();
        let owner = Address::new([1u8; 20]);
        let voucher = Address::new([4u8; 20]);

        {
            let store = HiddenOverlayStore::open(dir.path()).unwrap();
            store.hide(owner, entry(owner, voucher)).unwrap();
        }
        let reopened = HiddenOverlayStore::open(dir.path()).unwrap();
        assert_eq!(reopened.list_hidden(owner).unwrap().len(), 1);
    }
}
