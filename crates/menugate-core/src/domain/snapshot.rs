// ============================================================================
// Menugate Core - Cache Snapshot
// File: crates/menugate-core/src/domain/snapshot.rs
// Description: Whole-catalog copy held by the cache tiers
// ============================================================================

use std::collections::HashSet;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::warn;

use super::menu_entry::MenuEntry;
use crate::error::DomainError;

/// Catalog snapshot. Always replaced wholesale, never patched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CacheSnapshot {
    pub entries: Vec<MenuEntry>,
    pub fetched_at: DateTime<Utc>,
}

impl CacheSnapshot {
    pub fn new(entries: Vec<MenuEntry>) -> Self {
        Self::with_timestamp(entries, Utc::now())
    }

    pub fn with_timestamp(entries: Vec<MenuEntry>, fetched_at: DateTime<Utc>) -> Self {
        Self { entries, fetched_at }
    }

    /// Build a fresh snapshot from a raw catalog response.
    pub fn from_catalog(entries: Vec<MenuEntry>) -> Result<Self, DomainError> {
        Ok(Self::new(sanitize_catalog(entries)?))
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn age(&self, now: DateTime<Utc>) -> Duration {
        (now - self.fetched_at).to_std().unwrap_or(Duration::ZERO)
    }

    /// Snapshots stamped in the future (clock skew) count as fresh.
    pub fn is_fresh(&self, ttl: Duration, now: DateTime<Utc>) -> bool {
        self.age(now) < ttl
    }

    pub fn find(&self, route_path: &str) -> Option<&MenuEntry> {
        self.entries.iter().find(|e| e.route_path == route_path)
    }

    /// Order-insensitive comparison of the entry sets, ignoring `fetched_at`.
    pub fn same_entries(&self, other: &CacheSnapshot) -> bool {
        if self.entries.len() != other.entries.len() {
            return false;
        }
        let mut ours: Vec<&MenuEntry> = self.entries.iter().collect();
        let mut theirs: Vec<&MenuEntry> = other.entries.iter().collect();
        ours.sort_by(|a, b| a.route_path.cmp(&b.route_path));
        theirs.sort_by(|a, b| a.route_path.cmp(&b.route_path));
        ours == theirs
    }
}

/// Sanitize every entry and reject duplicate route paths. One bad entry
/// rejects the whole catalog.
pub fn sanitize_catalog(entries: Vec<MenuEntry>) -> Result<Vec<MenuEntry>, DomainError> {
    let mut seen = HashSet::with_capacity(entries.len());
    let mut clean = Vec::with_capacity(entries.len());
    for entry in entries {
        let entry = entry.sanitize().inspect_err(|e| warn!("Rejecting menu catalog: {}", e))?;
        if !seen.insert(entry.route_path.clone()) {
            warn!("Rejecting menu catalog: duplicate route {}", entry.route_path);
            return Err(DomainError::DuplicateRoutePath(entry.route_path));
        }
        clean.push(entry);
    }
    Ok(clean)
}
