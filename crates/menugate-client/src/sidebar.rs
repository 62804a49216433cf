//! Sidebar navigation built from the resolver.

use menugate_core::{normalize_route_path, VisibilityResolver};
use serde::Serialize;

/// Static navigation definition shipped with the dashboard.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavItem {
    pub path: String,
    pub label: String,
    pub children: Vec<NavItem>,
}

impl NavItem {
    pub fn leaf(path: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            label: label.into(),
            children: Vec::new(),
        }
    }

    pub fn section(path: impl Into<String>, label: impl Into<String>, children: Vec<NavItem>) -> Self {
        Self {
            path: path.into(),
            label: label.into(),
            children,
        }
    }
}

/// Rendered sidebar row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SidebarItem {
    pub path: String,
    pub label: String,
    /// Whether to draw a disclosure affordance.
    pub expandable: bool,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<SidebarItem>,
}

/// Filter a static tree down to what the resolver lets through.
///
/// A section whose children are all hidden keeps its own row but loses the
/// disclosure affordance. Items are ordered by catalog `sortOrder` where the
/// catalog knows them, otherwise definition order is kept.
pub fn build_sidebar(definitions: &[NavItem], resolver: &VisibilityResolver<'_>) -> Vec<SidebarItem> {
    let mut roots: Vec<&NavItem> = definitions
        .iter()
        .filter(|item| resolver.is_top_level_visible(&item.path))
        .collect();
    order_by_catalog(&mut roots, resolver);

    roots
        .into_iter()
        .map(|item| {
            let children = if item.children.is_empty() || !resolver.has_visible_children(&item.path) {
                Vec::new()
            } else {
                let mut visible: Vec<&NavItem> = item
                    .children
                    .iter()
                    .filter(|child| resolver.is_child_visible(&child.path))
                    .collect();
                order_by_catalog(&mut visible, resolver);
                visible.into_iter().map(leaf_row).collect()
            };
            SidebarItem {
                path: normalize_route_path(&item.path).to_string(),
                label: item.label.clone(),
                expandable: !children.is_empty(),
                children,
            }
        })
        .collect()
}

/// Sidebar straight from the catalog, labelled with display names. Empty in
/// bootstrap mode, where there is nothing to enumerate.
pub fn sidebar_from_catalog(resolver: &VisibilityResolver<'_>) -> Vec<SidebarItem> {
    resolver
        .visible_roots()
        .into_iter()
        .map(|root| {
            let children: Vec<SidebarItem> = resolver
                .visible_children(&root.route_path)
                .into_iter()
                .map(|child| SidebarItem {
                    path: child.route_path.clone(),
                    label: child.display_name.clone(),
                    expandable: false,
                    children: Vec::new(),
                })
                .collect();
            SidebarItem {
                path: root.route_path.clone(),
                label: root.display_name.clone(),
                expandable: !children.is_empty(),
                children,
            }
        })
        .collect()
}

fn leaf_row(item: &NavItem) -> SidebarItem {
    SidebarItem {
        path: normalize_route_path(&item.path).to_string(),
        label: item.label.clone(),
        expandable: false,
        children: Vec::new(),
    }
}

fn order_by_catalog(items: &mut [&NavItem], resolver: &VisibilityResolver<'_>) {
    // Stable: unknown entries sort last and keep definition order.
    items.sort_by_key(|item| {
        resolver
            .entry(&item.path)
            .map(|e| e.sort_order)
            .unwrap_or(i32::MAX)
    });
}
