// ============================================================================
// Menugate Core - Menu Entry Entity
// File: crates/menugate-core/src/domain/menu_entry.rs
// Description: One navigable feature in the menu catalog
// ============================================================================

use menugate_shared::constants::PATH_DELIMITER;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::{Validate, ValidationError};

use crate::error::DomainError;

/// Menu entry as served by the catalog
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
#[validate(schema(function = "validate_hierarchy"))]
pub struct MenuEntry {
    pub id: Uuid,

    #[validate(
        length(min = 1, max = 255, message = "Route path must be between 1 and 255 characters"),
        custom(function = "validate_route_path")
    )]
    pub route_path: String,

    #[validate(length(min = 1, max = 100, message = "Display name must be between 1 and 100 characters"))]
    pub display_name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(custom(function = "validate_route_path"))]
    pub parent_path: Option<String>,

    pub is_enabled: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(length(max = 100, message = "Menu icon too long"))]
    pub icon: Option<String>,

    #[serde(default)]
    pub sort_order: i32,
}

impl MenuEntry {
    pub fn new(
        route_path: &str,
        display_name: &str,
        parent_path: Option<&str>,
        is_enabled: bool,
    ) -> Result<Self, DomainError> {
        Self {
            id: Uuid::new_v4(),
            route_path: route_path.to_string(),
            display_name: display_name.to_string(),
            parent_path: parent_path.map(str::to_string),
            is_enabled,
            icon: None,
            sort_order: 0,
        }
        .sanitize()
    }

    /// Normalise paths and trim text, then validate. Used on everything that
    /// crosses the catalog boundary.
    pub fn sanitize(mut self) -> Result<Self, DomainError> {
        self.route_path = normalize_route_path(&self.route_path).to_string();
        self.display_name = self.display_name.trim().to_string();
        self.parent_path = self
            .parent_path
            .map(|p| normalize_route_path(&p).to_string())
            .filter(|p| !p.is_empty());
        self.icon = self.icon.map(|i| i.trim().to_string());

        self.validate().map_err(|e| DomainError::InvalidMenuEntry {
            route_path: self.route_path.clone(),
            reason: e.to_string(),
        })?;
        Ok(self)
    }

    /// Declared parent, or the prefix of a slash-delimited route path.
    pub fn parent(&self) -> Option<&str> {
        self.parent_path
            .as_deref()
            .or_else(|| parent_of_path(&self.route_path))
    }

    pub fn is_root_menu(&self) -> bool {
        self.parent().is_none()
    }

    pub fn is_child_of(&self, parent_path: &str) -> bool {
        self.parent() == Some(parent_path)
    }
}

/// Strip surrounding whitespace and slashes: `" /analysis/ "` -> `"analysis"`.
pub fn normalize_route_path(path: &str) -> &str {
    path.trim().trim_matches(PATH_DELIMITER)
}

/// Parent segment of a child path, `None` for top-level paths.
pub fn parent_of_path(path: &str) -> Option<&str> {
    normalize_route_path(path)
        .split_once(PATH_DELIMITER)
        .map(|(parent, _)| parent)
}

fn validate_route_path(path: &str) -> Result<(), ValidationError> {
    if path.is_empty() {
        return Err(ValidationError::new("empty_route_path"));
    }
    if path.chars().any(char::is_whitespace) {
        return Err(ValidationError::new("route_path_whitespace"));
    }
    let depth = path.matches(PATH_DELIMITER).count();
    if depth > 1 {
        return Err(ValidationError::new("route_path_too_deep"));
    }
    if path.split(PATH_DELIMITER).any(str::is_empty) {
        return Err(ValidationError::new("route_path_empty_segment"));
    }
    Ok(())
}

fn validate_hierarchy(entry: &MenuEntry) -> Result<(), ValidationError> {
    let Some(parent) = entry.parent_path.as_deref() else {
        return Ok(());
    };
    if parent.contains(PATH_DELIMITER) {
        return Err(ValidationError::new("parent_path_not_top_level"));
    }
    match parent_of_path(&entry.route_path) {
        Some(prefix) if prefix == parent => Ok(()),
        _ => Err(ValidationError::new("parent_path_mismatch")),
    }
}
