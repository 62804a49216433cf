//! Consumer-facing visibility handle and route guard.
//!
//! Consumers render from whatever snapshot is at hand (stale included) and
//! kick off a background revalidation. Subscribers are only woken when the
//! entry set actually changes, so a refresh that returns the same catalog
//! does not make the sidebar flicker.

use std::sync::Arc;

use menugate_core::{CacheSnapshot, CatalogError, VisibilityResolver};
use menugate_shared::constants::DEFAULT_GUARD_REDIRECT;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::cache::MenuCache;

/// Result of one revalidation pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RevalidateOutcome {
    /// The cache already held a fresh snapshot; no request was made.
    Fresh,
    /// A refresh landed with a different entry set.
    Updated,
    /// A refresh landed with the entries already on screen.
    Unchanged,
    /// The refresh failed; the last snapshot on screen stays in use.
    Failed(CatalogError),
}

#[derive(Clone)]
pub struct MenuVisibility {
    cache: MenuCache,
    current: Arc<watch::Sender<Option<Arc<CacheSnapshot>>>>,
}

impl MenuVisibility {
    /// Seeds the handle with the stored snapshot, expired or not, for first
    /// paint.
    pub fn new(cache: MenuCache) -> Self {
        let (tx, _) = watch::channel(cache.peek_stale());
        Self {
            cache,
            current: Arc::new(tx),
        }
    }

    pub fn cache(&self) -> &MenuCache {
        &self.cache
    }

    pub fn snapshot(&self) -> Option<Arc<CacheSnapshot>> {
        self.current.borrow().clone()
    }

    pub fn with_resolver<R>(&self, f: impl FnOnce(&VisibilityResolver<'_>) -> R) -> R {
        let snapshot = self.snapshot();
        let resolver =
            VisibilityResolver::with_policy(snapshot.as_deref(), self.cache.policy().bootstrap);
        f(&resolver)
    }

    pub fn is_visible(&self, path: &str) -> bool {
        self.with_resolver(|r| r.is_visible(path))
    }

    pub fn is_top_level_visible(&self, path: &str) -> bool {
        self.with_resolver(|r| r.is_top_level_visible(path))
    }

    pub fn is_child_visible(&self, path: &str) -> bool {
        self.with_resolver(|r| r.is_child_visible(path))
    }

    pub fn has_visible_children(&self, parent_path: &str) -> bool {
        self.with_resolver(|r| r.has_visible_children(parent_path))
    }

    /// Receiver woken whenever the rendered entry set changes.
    pub fn subscribe(&self) -> watch::Receiver<Option<Arc<CacheSnapshot>>> {
        self.current.subscribe()
    }

    /// True when the cache has no fresh snapshot.
    pub fn needs_refresh(&self) -> bool {
        !self.cache.is_fresh()
    }

    /// Refresh when stale, publish the result. Errors are swallowed into
    /// `RevalidateOutcome::Failed`. A failure never drops what is already on
    /// screen: bootstrap only applies when no snapshot was ever seen.
    pub async fn revalidate(&self) -> RevalidateOutcome {
        if let Some(fresh) = self.cache.peek() {
            self.publish(Some(fresh));
            return RevalidateOutcome::Fresh;
        }

        match self.cache.refresh().await {
            Ok(snapshot) => {
                if self.publish(Some(snapshot)) {
                    RevalidateOutcome::Updated
                } else {
                    RevalidateOutcome::Unchanged
                }
            }
            Err(e) => {
                warn!("Menu revalidation failed, keeping stored menus: {}", e);
                if let Some(stale) = self.cache.peek_stale() {
                    self.publish(Some(stale));
                }
                RevalidateOutcome::Failed(e)
            }
        }
    }

    /// Fire-and-forget revalidation for render paths.
    pub fn spawn_revalidate(&self) -> JoinHandle<RevalidateOutcome> {
        let this = self.clone();
        tokio::spawn(async move { this.revalidate().await })
    }

    fn publish(&self, next: Option<Arc<CacheSnapshot>>) -> bool {
        self.current.send_if_modified(|current| {
            let changed = match (current.as_deref(), next.as_deref()) {
                (Some(a), Some(b)) => !a.same_entries(b),
                (None, None) => false,
                _ => true,
            };
            if changed {
                debug!("Publishing changed menu snapshot");
                *current = next;
            }
            changed
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuardDecision {
    Allow,
    Deny { path: String, redirect: String },
}

impl GuardDecision {
    pub fn is_allowed(&self) -> bool {
        matches!(self, GuardDecision::Allow)
    }
}

/// Page-level gate: a hidden route is refused even when typed in directly.
#[derive(Clone)]
pub struct RouteGuard {
    visibility: MenuVisibility,
    redirect: String,
}

impl RouteGuard {
    pub fn new(visibility: MenuVisibility) -> Self {
        Self {
            visibility,
            redirect: DEFAULT_GUARD_REDIRECT.to_string(),
        }
    }

    pub fn with_redirect(mut self, redirect: impl Into<String>) -> Self {
        self.redirect = redirect.into();
        self
    }

    pub fn check(&self, path: &str) -> GuardDecision {
        if self.visibility.is_visible(path) {
            GuardDecision::Allow
        } else {
            debug!("Route {} is hidden, redirecting to {}", path, self.redirect);
            GuardDecision::Deny {
                path: path.to_string(),
                redirect: self.redirect.clone(),
            }
        }
    }
}
