//! Two-tier stale-while-revalidate menu cache.
//!
//! `peek` is synchronous and never touches the network: memory first, then
//! the persistent tier (promoting a hit into memory). `refresh` is the only
//! suspension point; concurrent callers share one in-flight request.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use futures::future::{BoxFuture, FutureExt, Shared};
use menugate_core::{BootstrapPolicy, CacheSnapshot, CatalogError, MenuCatalog};
use menugate_shared::config::{CacheSettings, GatingSettings};
use menugate_shared::constants::DEFAULT_CACHE_TTL_SECS;
use parking_lot::Mutex;
use tracing::{debug, info, warn};

use crate::session::SessionToken;
use crate::tier::{MemoryTier, PersistentTier};

type RefreshFuture = Shared<BoxFuture<'static, Result<Arc<CacheSnapshot>, CatalogError>>>;

/// Freshness window and the empty-catalog policy handed to resolvers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CachePolicy {
    pub ttl: Duration,
    pub bootstrap: BootstrapPolicy,
}

impl Default for CachePolicy {
    fn default() -> Self {
        Self {
            ttl: Duration::from_secs(DEFAULT_CACHE_TTL_SECS),
            bootstrap: BootstrapPolicy::ShowAll,
        }
    }
}

impl CachePolicy {
    pub fn from_settings(cache: &CacheSettings, gating: &GatingSettings) -> Self {
        Self {
            ttl: cache.ttl(),
            bootstrap: if gating.bootstrap_show_all {
                BootstrapPolicy::ShowAll
            } else {
                BootstrapPolicy::HideAll
            },
        }
    }
}

/// Cache statistics
#[derive(Debug, Clone, Default)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    pub refreshes: u64,
    pub coalesced: u64,
    pub refresh_failures: u64,
    pub invalidations: u64,
}

impl CacheStats {
    /// Fresh-peek hit rate (0.0 - 100.0)
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            (self.hits as f64 / total as f64) * 100.0
        }
    }
}

#[derive(Default)]
struct Counters {
    hits: AtomicU64,
    misses: AtomicU64,
    refreshes: AtomicU64,
    coalesced: AtomicU64,
    refresh_failures: AtomicU64,
    invalidations: AtomicU64,
}

#[derive(Default)]
struct Written {
    seq: u64,
    snapshot: Option<Arc<CacheSnapshot>>,
}

struct CacheInner {
    catalog: Arc<dyn MenuCatalog>,
    memory: MemoryTier,
    persistent: Arc<dyn PersistentTier>,
    policy: CachePolicy,
    session: SessionToken,
    in_flight: Mutex<Option<RefreshFuture>>,
    /// Sequence handed to each network refresh, in start order.
    next_seq: AtomicU64,
    /// Newest refresh result written to the tiers, with its sequence.
    latest: Mutex<Written>,
    counters: Counters,
}

/// Constructible cache service, injected into consumers. Cheap to clone.
#[derive(Clone)]
pub struct MenuCache {
    inner: Arc<CacheInner>,
}

/// Handle that can only clear the cache; given to the admin side.
#[derive(Clone)]
pub struct CacheInvalidator {
    inner: Arc<CacheInner>,
}

impl CacheInvalidator {
    pub fn invalidate(&self) {
        self.inner.invalidate();
    }
}

impl MenuCache {
    pub fn new(
        catalog: Arc<dyn MenuCatalog>,
        persistent: Arc<dyn PersistentTier>,
        policy: CachePolicy,
        session: SessionToken,
    ) -> Self {
        info!(
            "Initializing menu cache (ttl: {}s, bootstrap: {:?})",
            policy.ttl.as_secs(),
            policy.bootstrap
        );
        Self {
            inner: Arc::new(CacheInner {
                catalog,
                memory: MemoryTier::new(),
                persistent,
                policy,
                session,
                in_flight: Mutex::new(None),
                next_seq: AtomicU64::new(0),
                latest: Mutex::new(Written::default()),
                counters: Counters::default(),
            }),
        }
    }

    pub fn policy(&self) -> CachePolicy {
        self.inner.policy
    }

    /// Fresh snapshot or `None`. Never blocks on I/O beyond a local read.
    pub fn peek(&self) -> Option<Arc<CacheSnapshot>> {
        let counters = &self.inner.counters;
        match self.inner.lookup() {
            Some(snapshot) if snapshot.is_fresh(self.inner.policy.ttl, Utc::now()) => {
                counters.hits.fetch_add(1, Ordering::Relaxed);
                Some(snapshot)
            }
            Some(snapshot) => {
                counters.misses.fetch_add(1, Ordering::Relaxed);
                debug!(
                    "Menu snapshot expired (age: {:?})",
                    snapshot.age(Utc::now())
                );
                None
            }
            None => {
                counters.misses.fetch_add(1, Ordering::Relaxed);
                None
            }
        }
    }

    /// Same check as `peek` without touching the hit/miss counters.
    pub fn is_fresh(&self) -> bool {
        self.inner
            .lookup()
            .is_some_and(|s| s.is_fresh(self.inner.policy.ttl, Utc::now()))
    }

    /// Whatever the tiers hold, ignoring the TTL. First-paint and
    /// failure fallback only.
    pub fn peek_stale(&self) -> Option<Arc<CacheSnapshot>> {
        self.inner.lookup()
    }

    /// Fetch the catalog and replace both tiers. Joins a request already in
    /// flight instead of issuing a second one. On failure the tiers are left
    /// untouched.
    pub async fn refresh(&self) -> Result<Arc<CacheSnapshot>, CatalogError> {
        let future = {
            let mut slot = self.inner.in_flight.lock();
            match slot.as_ref() {
                Some(pending) if pending.peek().is_none() => {
                    self.inner.counters.coalesced.fetch_add(1, Ordering::Relaxed);
                    debug!("Joining in-flight menu refresh");
                    pending.clone()
                }
                _ => {
                    let seq = self.inner.next_seq.fetch_add(1, Ordering::SeqCst) + 1;
                    let inner = Arc::clone(&self.inner);
                    let future = async move { inner.fetch_and_store(seq).await }
                        .boxed()
                        .shared();
                    *slot = Some(future.clone());
                    future
                }
            }
        };
        future.await
    }

    /// Fresh snapshot from the tiers, or a blocking refresh when there is none.
    pub async fn get_or_refresh(&self) -> Result<Arc<CacheSnapshot>, CatalogError> {
        match self.peek() {
            Some(snapshot) => Ok(snapshot),
            None => self.refresh().await,
        }
    }

    /// Clear both tiers. Idempotent. A refresh already in flight still lands.
    pub fn invalidate(&self) {
        self.inner.invalidate();
    }

    pub fn invalidator(&self) -> CacheInvalidator {
        CacheInvalidator {
            inner: Arc::clone(&self.inner),
        }
    }

    pub fn stats(&self) -> CacheStats {
        let c = &self.inner.counters;
        CacheStats {
            hits: c.hits.load(Ordering::Relaxed),
            misses: c.misses.load(Ordering::Relaxed),
            refreshes: c.refreshes.load(Ordering::Relaxed),
            coalesced: c.coalesced.load(Ordering::Relaxed),
            refresh_failures: c.refresh_failures.load(Ordering::Relaxed),
            invalidations: c.invalidations.load(Ordering::Relaxed),
        }
    }
}

impl CacheInner {
    fn lookup(&self) -> Option<Arc<CacheSnapshot>> {
        if let Some(snapshot) = self.memory.get() {
            return Some(snapshot);
        }
        match self.persistent.load() {
            Ok(Some(snapshot)) => {
                let snapshot = Arc::new(snapshot);
                self.memory.set(Arc::clone(&snapshot));
                debug!("Promoted persisted menu snapshot into memory");
                Some(snapshot)
            }
            Ok(None) => None,
            Err(e) => {
                warn!("Ignoring unreadable persisted menu snapshot: {}", e);
                None
            }
        }
    }

    async fn fetch_and_store(&self, seq: u64) -> Result<Arc<CacheSnapshot>, CatalogError> {
        self.counters.refreshes.fetch_add(1, Ordering::Relaxed);

        let result = self
            .catalog
            .user_menus()
            .await
            .and_then(|entries| CacheSnapshot::from_catalog(entries).map_err(CatalogError::from));

        let snapshot = match result {
            Ok(snapshot) => Arc::new(snapshot),
            Err(e) => {
                self.counters.refresh_failures.fetch_add(1, Ordering::Relaxed);
                if e.is_unauthorized() {
                    warn!("Menu refresh unauthorized, clearing session token");
                    self.session.clear();
                } else {
                    warn!("Menu refresh failed: {}", e);
                }
                return Err(e);
            }
        };

        Ok(self.store(seq, snapshot))
    }

    /// Last writer wins, except that an older request never overwrites the
    /// result of one that started after it. Returns the snapshot callers
    /// should use: the newer one when this result was discarded.
    fn store(&self, seq: u64, snapshot: Arc<CacheSnapshot>) -> Arc<CacheSnapshot> {
        let mut latest = self.latest.lock();
        if seq < latest.seq {
            debug!(
                "Discarding menu refresh #{} (superseded by #{})",
                seq, latest.seq
            );
            if let Some(newer) = &latest.snapshot {
                return Arc::clone(newer);
            }
        }
        latest.seq = seq;
        latest.snapshot = Some(Arc::clone(&snapshot));

        if let Err(e) = self.persistent.store(&snapshot) {
            warn!("Failed to persist menu snapshot: {}", e);
        }
        info!(
            "Menu snapshot refreshed ({} entries, refresh #{})",
            snapshot.entries.len(),
            seq
        );
        self.memory.set(Arc::clone(&snapshot));
        snapshot
    }

    fn invalidate(&self) {
        self.counters.invalidations.fetch_add(1, Ordering::Relaxed);
        self.memory.clear();
        if let Err(e) = self.persistent.clear() {
            warn!("Failed to clear persisted menu snapshot: {}", e);
        }
        // Detach so the next refresh issues a new request; the old one keeps
        // running and may still write.
        self.in_flight.lock().take();
        info!("Menu cache invalidated");
    }
}
