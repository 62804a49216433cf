//! Admin-side menu management: list, discover and cascade toggle.
//!
//! Every successful mutation invalidates the local cache so this client's
//! next peek misses. Other already-open clients stay stale until their own
//! TTL runs out.

use std::sync::Arc;

use menugate_core::{plan_toggle, CatalogError, MenuCatalog, MenuEntry, TogglePlan};
use tracing::{info, warn};
use uuid::Uuid;

use crate::cache::CacheInvalidator;
use crate::error::AdminError;
use crate::session::SessionToken;

/// Operator sign-off for a toggle that hides children.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Confirmation {
    Confirmed,
    Unconfirmed,
}

#[derive(Clone)]
pub struct MenuAdmin {
    catalog: Arc<dyn MenuCatalog>,
    invalidator: CacheInvalidator,
    session: SessionToken,
}

impl MenuAdmin {
    pub fn new(catalog: Arc<dyn MenuCatalog>, invalidator: CacheInvalidator, session: SessionToken) -> Self {
        Self {
            catalog,
            invalidator,
            session,
        }
    }

    /// Full catalog, including disabled entries.
    pub async fn list(&self) -> Result<Vec<MenuEntry>, AdminError> {
        self.catalog
            .admin_menus()
            .await
            .map_err(|e| self.surface(e))
    }

    /// Have the server pick up newly added routes.
    pub async fn discover(&self) -> Result<Vec<MenuEntry>, AdminError> {
        let entries = self
            .catalog
            .discover_menus()
            .await
            .map_err(|e| self.surface(e))?;
        self.invalidator.invalidate();
        info!("Menu discovery returned {} entries", entries.len());
        Ok(entries)
    }

    /// What toggling `id` would do, against the current server catalog.
    pub async fn plan(&self, id: Uuid) -> Result<TogglePlan, AdminError> {
        let catalog = self.list().await?;
        Ok(plan_toggle(&catalog, id)?)
    }

    pub async fn toggle(&self, id: Uuid, confirmation: Confirmation) -> Result<MenuEntry, AdminError> {
        let plan = self.plan(id).await?;
        self.apply(&plan, confirmation).await
    }

    /// Execute a previously computed plan. Refuses an unconfirmed cascade.
    pub async fn apply(&self, plan: &TogglePlan, confirmation: Confirmation) -> Result<MenuEntry, AdminError> {
        if plan.requires_confirmation() && confirmation != Confirmation::Confirmed {
            return Err(AdminError::ConfirmationRequired {
                route_path: plan.entry.route_path.clone(),
                hidden_children: plan
                    .hidden_children()
                    .map(|c| c.route_path.clone())
                    .collect(),
            });
        }

        let updated = self
            .catalog
            .toggle_menu(plan.entry.id)
            .await
            .map_err(|e| self.surface(e))?;

        if updated.is_enabled != plan.target_state() {
            warn!(
                "Toggle of {} reported is_enabled={} (expected {})",
                updated.route_path,
                updated.is_enabled,
                plan.target_state()
            );
        }

        self.invalidator.invalidate();
        info!(
            "Menu {} toggled to {} ({} children affected)",
            updated.route_path,
            if updated.is_enabled { "enabled" } else { "disabled" },
            plan.children.len()
        );
        Ok(updated)
    }

    fn surface(&self, err: CatalogError) -> AdminError {
        if err.is_unauthorized() {
            self.session.clear();
        }
        AdminError::Catalog(err)
    }
}
