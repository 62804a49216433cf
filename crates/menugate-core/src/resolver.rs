//! Visibility resolver
//!
//! Pure read-side computation of whether a navigation path renders. The
//! effective visibility of a child is its own flag AND its parent's flag; the
//! combination is computed here on every read and never stored.

use std::collections::HashMap;

use menugate_shared::constants::PATH_DELIMITER;

use crate::domain::{normalize_route_path, CacheSnapshot, MenuEntry};

/// What to do while no menu catalog has been configured.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BootstrapPolicy {
    /// Installs without menu gating keep showing everything.
    #[default]
    ShowAll,
    /// Treat an empty catalog as "everything disabled".
    HideAll,
}

/// Whether decisions come from a loaded catalog or the bootstrap fallback.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolverMode {
    /// No snapshot, or a snapshot with zero entries, under `ShowAll`.
    Bootstrap,
    /// A catalog is loaded; absent entries are hidden.
    Configured,
}

/// Resolver over one snapshot, borrowed for the duration of a render.
#[derive(Debug, Clone)]
pub struct VisibilityResolver<'a> {
    mode: ResolverMode,
    entries: &'a [MenuEntry],
    by_path: HashMap<&'a str, &'a MenuEntry>,
}

impl<'a> VisibilityResolver<'a> {
    pub fn new(snapshot: Option<&'a CacheSnapshot>) -> Self {
        Self::with_policy(snapshot, BootstrapPolicy::default())
    }

    pub fn with_policy(snapshot: Option<&'a CacheSnapshot>, policy: BootstrapPolicy) -> Self {
        let entries: &'a [MenuEntry] = snapshot.map(|s| s.entries.as_slice()).unwrap_or(&[]);
        let mode = if entries.is_empty() && policy == BootstrapPolicy::ShowAll {
            ResolverMode::Bootstrap
        } else {
            ResolverMode::Configured
        };
        let by_path = entries
            .iter()
            .map(|e| (e.route_path.as_str(), e))
            .collect();

        Self { mode, entries, by_path }
    }

    pub fn mode(&self) -> ResolverMode {
        self.mode
    }

    pub fn is_bootstrap(&self) -> bool {
        self.mode == ResolverMode::Bootstrap
    }

    /// Exact entry exists and is enabled, or bootstrap mode.
    pub fn is_top_level_visible(&self, path: &str) -> bool {
        if self.is_bootstrap() {
            return true;
        }
        self.by_path
            .get(normalize_route_path(path))
            .is_some_and(|e| e.is_enabled)
    }

    /// Parent visible AND the full-path entry exists and is enabled. A path
    /// without a delimiter resolves as top-level.
    pub fn is_child_visible(&self, path: &str) -> bool {
        let path = normalize_route_path(path);
        let Some((parent, _)) = path.split_once(PATH_DELIMITER) else {
            return self.is_top_level_visible(path);
        };
        if !self.is_top_level_visible(parent) {
            return false;
        }
        if self.is_bootstrap() {
            return true;
        }
        self.by_path
            .get(path)
            .is_some_and(|e| self.effective_visibility(e))
    }

    /// Parent visible AND at least one enabled child. Used to drop the
    /// disclosure affordance of a section whose children are all disabled.
    pub fn has_visible_children(&self, parent_path: &str) -> bool {
        let parent = normalize_route_path(parent_path);
        if !self.is_top_level_visible(parent) {
            return false;
        }
        if self.is_bootstrap() {
            return true;
        }
        self.entries
            .iter()
            .any(|e| e.is_child_of(parent) && e.is_enabled)
    }

    /// Route-guard entry point: dispatches on the presence of a delimiter.
    pub fn is_visible(&self, path: &str) -> bool {
        let path = normalize_route_path(path);
        if path.contains(PATH_DELIMITER) {
            self.is_child_visible(path)
        } else {
            self.is_top_level_visible(path)
        }
    }

    /// Own flag AND parent's flag. Orphans (parent missing) are hidden.
    pub fn effective_visibility(&self, entry: &MenuEntry) -> bool {
        if !entry.is_enabled {
            return false;
        }
        match entry.parent() {
            None => true,
            Some(parent) => self.by_path.get(parent).is_some_and(|p| p.is_enabled),
        }
    }

    pub fn entry(&self, path: &str) -> Option<&'a MenuEntry> {
        self.by_path.get(normalize_route_path(path)).copied()
    }

    /// Enabled top-level entries, in sidebar order.
    pub fn visible_roots(&self) -> Vec<&'a MenuEntry> {
        let mut roots: Vec<&'a MenuEntry> = self
            .entries
            .iter()
            .filter(|e| e.is_root_menu() && e.is_enabled)
            .collect();
        sort_for_display(&mut roots);
        roots
    }

    /// Effectively visible children of `parent_path`, in sidebar order.
    pub fn visible_children(&self, parent_path: &str) -> Vec<&'a MenuEntry> {
        let parent = normalize_route_path(parent_path);
        let mut children: Vec<&'a MenuEntry> = self
            .entries
            .iter()
            .filter(|e| e.is_child_of(parent) && self.effective_visibility(e))
            .collect();
        sort_for_display(&mut children);
        children
    }
}

fn sort_for_display(entries: &mut [&MenuEntry]) {
    entries.sort_by(|a, b| {
        a.sort_order
            .cmp(&b.sort_order)
            .then_with(|| a.display_name.cmp(&b.display_name))
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(path: &str, parent: Option<&str>, enabled: bool) -> MenuEntry {
        MenuEntry::new(path, path, parent, enabled).unwrap()
    }

    fn trading_catalog(analysis_enabled: bool) -> CacheSnapshot {
        CacheSnapshot::new(vec![
            entry("dashboard", None, true),
            entry("analysis", None, analysis_enabled),
            entry("analysis/signal-centre", Some("analysis"), false),
            entry("analysis/market-news", Some("analysis"), true),
        ])
    }

    #[test]
    fn test_end_to_end_scenario() {
        let snapshot = trading_catalog(true);
        let resolver = VisibilityResolver::new(Some(&snapshot));

        assert_eq!(resolver.mode(), ResolverMode::Configured);
        assert!(resolver.is_top_level_visible("dashboard"));
        assert!(resolver.has_visible_children("analysis"));
        assert!(!resolver.is_child_visible("analysis/signal-centre"));
        assert!(resolver.is_child_visible("analysis/market-news"));
    }

    #[test]
    fn test_disabling_parent_hides_descendants_without_touching_children() {
        let snapshot = trading_catalog(false);
        let resolver = VisibilityResolver::new(Some(&snapshot));

        assert!(!resolver.is_top_level_visible("analysis"));
        assert!(!resolver.has_visible_children("analysis"));
        assert!(!resolver.is_child_visible("analysis/signal-centre"));
        assert!(!resolver.is_child_visible("analysis/market-news"));

        let news = snapshot.find("analysis/market-news").unwrap();
        assert!(news.is_enabled);
        assert!(!resolver.effective_visibility(news));
        assert!(resolver.is_top_level_visible("dashboard"));
    }

    #[test]
    fn test_child_hidden_whenever_parent_hidden() {
        for parent_enabled in [true, false] {
            for child_enabled in [true, false] {
                let snapshot = CacheSnapshot::new(vec![
                    entry("reports", None, parent_enabled),
                    entry("reports/daily", Some("reports"), child_enabled),
                ]);
                let resolver = VisibilityResolver::new(Some(&snapshot));
                let child = resolver.is_child_visible("reports/daily");
                let has_children = resolver.has_visible_children("reports");

                if !resolver.is_top_level_visible("reports") {
                    assert!(!child);
                    assert!(!has_children);
                }
                assert_eq!(child, parent_enabled && child_enabled);
            }
        }
    }

    #[test]
    fn test_bootstrap_shows_everything() {
        let empty = CacheSnapshot::new(vec![]);
        for resolver in [VisibilityResolver::new(None), VisibilityResolver::new(Some(&empty))] {
            assert!(resolver.is_bootstrap());
            assert!(resolver.is_top_level_visible("dashboard"));
            assert!(resolver.is_child_visible("analysis/signal-centre"));
            assert!(resolver.has_visible_children("analysis"));
            assert!(resolver.is_visible("/kyc/"));
        }
    }

    #[test]
    fn test_configured_catalog_hides_absent_paths() {
        let snapshot = CacheSnapshot::new(vec![entry("promotions", None, false)]);
        let resolver = VisibilityResolver::new(Some(&snapshot));

        assert_eq!(resolver.mode(), ResolverMode::Configured);
        assert!(!resolver.is_top_level_visible("promotions"));
        // Catalog loaded but entry absent: hidden, not bootstrap.
        assert!(!resolver.is_top_level_visible("dashboard"));
        assert!(!resolver.is_visible("analysis/market-news"));
    }

    #[test]
    fn test_hide_all_policy_on_empty_catalog() {
        let empty = CacheSnapshot::new(vec![]);
        let resolver = VisibilityResolver::with_policy(Some(&empty), BootstrapPolicy::HideAll);
        assert_eq!(resolver.mode(), ResolverMode::Configured);
        assert!(!resolver.is_top_level_visible("dashboard"));
        assert!(!resolver.is_visible("analysis/market-news"));
    }

    #[test]
    fn test_orphan_child_hidden() {
        let snapshot = CacheSnapshot::new(vec![
            entry("dashboard", None, true),
            entry("x/y", Some("x"), true),
        ]);
        let resolver = VisibilityResolver::new(Some(&snapshot));

        assert!(!resolver.is_child_visible("x/y"));
        assert!(!resolver.has_visible_children("x"));
        assert!(!resolver.effective_visibility(snapshot.find("x/y").unwrap()));
    }

    #[test]
    fn test_all_children_disabled_suppresses_section() {
        let snapshot = CacheSnapshot::new(vec![
            entry("wallet", None, true),
            entry("wallet/deposit", Some("wallet"), false),
            entry("wallet/withdraw", Some("wallet"), false),
        ]);
        let resolver = VisibilityResolver::new(Some(&snapshot));

        assert!(resolver.is_top_level_visible("wallet"));
        assert!(!resolver.has_visible_children("wallet"));
        assert!(resolver.visible_children("wallet").is_empty());
    }

    #[test]
    fn test_path_normalisation_and_dispatch() {
        let snapshot = trading_catalog(true);
        let resolver = VisibilityResolver::new(Some(&snapshot));

        assert!(resolver.is_visible("/dashboard"));
        assert!(resolver.is_visible("/analysis/market-news/"));
        assert!(!resolver.is_visible("analysis/signal-centre"));
        assert!(resolver.is_child_visible("dashboard"));
    }

    #[test]
    fn test_visible_children_sorted() {
        let mut late = entry("analysis/b-late", Some("analysis"), true);
        late.sort_order = 2;
        let mut early = entry("analysis/z-early", Some("analysis"), true);
        early.sort_order = 1;
        let snapshot = CacheSnapshot::new(vec![entry("analysis", None, true), late, early]);
        let resolver = VisibilityResolver::new(Some(&snapshot));

        let paths: Vec<&str> = resolver
            .visible_children("analysis")
            .iter()
            .map(|e| e.route_path.as_str())
            .collect();
        assert_eq!(paths, vec!["analysis/z-early", "analysis/b-late"]);
        assert_eq!(resolver.visible_roots().len(), 1);
    }
}
