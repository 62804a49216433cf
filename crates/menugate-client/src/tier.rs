//! Cache tiers
//!
//! `MemoryTier` lives for the process; `PersistentTier` survives restarts.
//! Both hold at most one snapshot and only support whole-value replacement.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use menugate_core::CacheSnapshot;
use menugate_shared::config::CacheSettings;
use parking_lot::RwLock;
use tracing::debug;

use crate::error::TierError;

/// Process-lifetime copy of the latest snapshot.
#[derive(Debug, Default)]
pub struct MemoryTier {
    slot: RwLock<Option<Arc<CacheSnapshot>>>,
}

impl MemoryTier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self) -> Option<Arc<CacheSnapshot>> {
        self.slot.read().clone()
    }

    pub fn set(&self, snapshot: Arc<CacheSnapshot>) {
        *self.slot.write() = Some(snapshot);
    }

    pub fn clear(&self) {
        *self.slot.write() = None;
    }
}

/// Durable single-key store for the serialized snapshot.
///
/// Calls are synchronous: `peek` runs during render and must not await.
pub trait PersistentTier: Send + Sync {
    fn load(&self) -> Result<Option<CacheSnapshot>, TierError>;
    fn store(&self, snapshot: &CacheSnapshot) -> Result<(), TierError>;
    /// Removing a missing snapshot is not an error.
    fn clear(&self) -> Result<(), TierError>;
}

/// One JSON file per storage key: `<dir>/<key>.json`.
#[derive(Debug, Clone)]
pub struct FileTier {
    path: PathBuf,
}

impl FileTier {
    pub fn new<P: AsRef<Path>>(dir: P, key: &str) -> Self {
        Self {
            path: dir.as_ref().join(format!("{key}.json")),
        }
    }

    pub fn from_settings(settings: &CacheSettings) -> Self {
        Self::new(&settings.storage_dir, &settings.storage_key)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl PersistentTier for FileTier {
    fn load(&self) -> Result<Option<CacheSnapshot>, TierError> {
        let raw = match fs::read(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        let snapshot: CacheSnapshot = serde_json::from_slice(&raw)?;
        debug!(
            "Loaded {} menu entries from {}",
            snapshot.entries.len(),
            self.path.display()
        );
        Ok(Some(snapshot))
    }

    fn store(&self, snapshot: &CacheSnapshot) -> Result<(), TierError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        // Write-then-rename so a crash never leaves half a snapshot behind.
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, serde_json::to_vec(snapshot)?)?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }

    fn clear(&self) -> Result<(), TierError> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}
