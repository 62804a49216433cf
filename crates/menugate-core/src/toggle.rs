//! Cascade toggle planning (admin side)
//!
//! A toggle only ever flips the targeted entry's own flag. Disabling a parent
//! hides its children through the resolver, so their stored flags stay as
//! they are; the plan only tells the operator what will disappear.

use uuid::Uuid;

use crate::domain::MenuEntry;
use crate::error::DomainError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToggleDirection {
    Enable,
    Disable,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TogglePlan {
    pub entry: MenuEntry,
    pub direction: ToggleDirection,
    /// Children hidden by this toggle through the parent flag.
    pub children: Vec<MenuEntry>,
}

impl TogglePlan {
    /// Only Enabled -> Disabled on an entry with children needs sign-off.
    pub fn requires_confirmation(&self) -> bool {
        self.direction == ToggleDirection::Disable && !self.children.is_empty()
    }

    /// Flag the server should report after the toggle.
    pub fn target_state(&self) -> bool {
        self.direction == ToggleDirection::Enable
    }

    /// Children whose own flag is on, i.e. the ones that actually disappear.
    pub fn hidden_children(&self) -> impl Iterator<Item = &MenuEntry> {
        self.children.iter().filter(|c| c.is_enabled)
    }
}

pub fn plan_toggle(catalog: &[MenuEntry], id: Uuid) -> Result<TogglePlan, DomainError> {
    let entry = catalog
        .iter()
        .find(|e| e.id == id)
        .ok_or(DomainError::MenuNotFound(id))?;

    let direction = if entry.is_enabled {
        ToggleDirection::Disable
    } else {
        ToggleDirection::Enable
    };

    let children = if entry.is_root_menu() {
        catalog
            .iter()
            .filter(|c| c.is_child_of(&entry.route_path))
            .cloned()
            .collect()
    } else {
        Vec::new()
    };

    Ok(TogglePlan {
        entry: entry.clone(),
        direction,
        children,
    })
}

/// Replace one entry in a catalog list with the server's updated copy.
pub fn apply_toggled(catalog: &mut [MenuEntry], updated: MenuEntry) -> Result<(), DomainError> {
    let slot = catalog
        .iter_mut()
        .find(|e| e.id == updated.id)
        .ok_or(DomainError::MenuNotFound(updated.id))?;
    *slot = updated;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn catalog() -> Vec<MenuEntry> {
        vec![
            MenuEntry::new("dashboard", "Dashboard", None, true).unwrap(),
            MenuEntry::new("analysis", "Analysis", None, true).unwrap(),
            MenuEntry::new("analysis/signal-centre", "Signal Centre", Some("analysis"), false).unwrap(),
            MenuEntry::new("analysis/market-news", "Market News", Some("analysis"), true).unwrap(),
        ]
    }

    #[test]
    fn test_disabling_parent_with_children_needs_confirmation() {
        let catalog = catalog();
        let plan = plan_toggle(&catalog, catalog[1].id).unwrap();

        assert_eq!(plan.direction, ToggleDirection::Disable);
        assert!(plan.requires_confirmation());
        assert_eq!(plan.children.len(), 2);
        assert_eq!(plan.hidden_children().count(), 1);
        assert!(!plan.target_state());
    }

    #[test]
    fn test_leaf_toggle_never_needs_confirmation() {
        let catalog = catalog();
        let leaf = plan_toggle(&catalog, catalog[3].id).unwrap();
        assert_eq!(leaf.direction, ToggleDirection::Disable);
        assert!(!leaf.requires_confirmation());

        let root_without_children = plan_toggle(&catalog, catalog[0].id).unwrap();
        assert!(!root_without_children.requires_confirmation());
    }

    #[test]
    fn test_enabling_never_needs_confirmation() {
        let mut catalog = catalog();
        catalog[1].is_enabled = false;
        let plan = plan_toggle(&catalog, catalog[1].id).unwrap();

        assert_eq!(plan.direction, ToggleDirection::Enable);
        assert!(!plan.requires_confirmation());
        assert!(plan.target_state());
    }

    #[test]
    fn test_unknown_id() {
        let missing = Uuid::new_v4();
        assert_eq!(
            plan_toggle(&catalog(), missing).unwrap_err(),
            DomainError::MenuNotFound(missing)
        );
    }

    #[test]
    fn test_apply_toggled_only_touches_target() {
        let mut catalog = catalog();
        let mut updated = catalog[1].clone();
        updated.is_enabled = false;
        apply_toggled(&mut catalog, updated).unwrap();

        assert!(!catalog[1].is_enabled);
        assert!(catalog[3].is_enabled);
        assert!(!catalog[2].is_enabled);
    }
}
