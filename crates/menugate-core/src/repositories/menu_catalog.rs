//! Menu catalog port

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::MenuEntry;
use crate::error::CatalogError;

/// Server-side source of truth for menu entries.
///
/// Implementations must hand back entries that already passed
/// [`MenuEntry::sanitize`]; a response with any invalid entry is an error,
/// never a partial list.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MenuCatalog: Send + Sync {
    /// Entries visible to the current caller (drives the sidebar).
    async fn user_menus(&self) -> Result<Vec<MenuEntry>, CatalogError>;

    /// Full catalog including disabled entries.
    async fn admin_menus(&self) -> Result<Vec<MenuEntry>, CatalogError>;

    /// Ask the server to discover newly added routes; returns the full catalog.
    async fn discover_menus(&self) -> Result<Vec<MenuEntry>, CatalogError>;

    /// Flip one entry's flag. Children are left alone: their effective
    /// visibility is computed on read.
    async fn toggle_menu(&self, id: Uuid) -> Result<MenuEntry, CatalogError>;
}
