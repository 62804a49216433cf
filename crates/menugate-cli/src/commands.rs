use std::sync::Arc;

use anyhow::bail;
use menugate_client::{
    sidebar_from_catalog, AdminError, CachePolicy, Confirmation, FileTier, GuardDecision,
    HttpMenuCatalog, MenuAdmin, MenuCache, MenuVisibility, RevalidateOutcome, RouteGuard,
    SessionToken, SidebarItem,
};
use menugate_core::{MenuCatalog, ResolverMode};
use menugate_shared::AppConfig;
use tracing::warn;
use uuid::Uuid;

/// Wiring shared by every command.
pub struct Context {
    pub cache: MenuCache,
    pub visibility: MenuVisibility,
    pub admin: MenuAdmin,
}

impl Context {
    pub fn new(config: &AppConfig, token: Option<String>) -> anyhow::Result<Self> {
        let session = SessionToken::new(token);
        let catalog: Arc<dyn MenuCatalog> =
            Arc::new(HttpMenuCatalog::from_settings(&config.api, session.clone())?);
        let tier = Arc::new(FileTier::from_settings(&config.cache));
        let policy = CachePolicy::from_settings(&config.cache, &config.gating);

        let cache = MenuCache::new(catalog.clone(), tier, policy, session.clone());
        let visibility = MenuVisibility::new(cache.clone());
        let admin = MenuAdmin::new(catalog, cache.invalidator(), session);

        Ok(Self {
            cache,
            visibility,
            admin,
        })
    }

    async fn revalidate(&self) {
        if let RevalidateOutcome::Failed(e) = self.visibility.revalidate().await {
            warn!("Using stored menus: {}", e);
            println!("(catalog unavailable, showing stored menus)");
        }
    }
}

pub async fn check(ctx: &Context, paths: &[String]) -> anyhow::Result<()> {
    ctx.revalidate().await;

    let mode = ctx.visibility.with_resolver(|r| r.mode());
    if mode == ResolverMode::Bootstrap {
        println!("No menu catalog configured: every route is visible.");
    }

    let guard = RouteGuard::new(ctx.visibility.clone());
    for path in paths {
        match guard.check(path) {
            GuardDecision::Allow => println!("  visible  {}", path),
            GuardDecision::Deny { .. } => println!("  hidden   {}", path),
        }
    }
    Ok(())
}

pub async fn sidebar(ctx: &Context) -> anyhow::Result<()> {
    ctx.revalidate().await;

    let items = ctx.visibility.with_resolver(sidebar_from_catalog);
    if items.is_empty() {
        println!("Sidebar is empty.");
    }
    for item in &items {
        print_item(item, 0);
    }
    Ok(())
}

fn print_item(item: &SidebarItem, depth: usize) {
    let marker = if item.expandable { "▸" } else { " " };
    println!(
        "{}{} {} ({})",
        "  ".repeat(depth),
        marker,
        item.label,
        item.path
    );
    for child in &item.children {
        print_item(child, depth + 1);
    }
}

pub fn invalidate(ctx: &Context) -> anyhow::Result<()> {
    ctx.cache.invalidate();
    println!("Menu cache cleared.");
    Ok(())
}

pub async fn admin_list(ctx: &Context) -> anyhow::Result<()> {
    let entries = ctx.admin.list().await?;
    println!("{:<38} {:<8} {:<32} NAME", "ID", "STATE", "PATH");
    for entry in entries {
        println!(
            "{:<38} {:<8} {:<32} {}",
            entry.id,
            if entry.is_enabled { "enabled" } else { "disabled" },
            entry.route_path,
            entry.display_name
        );
    }
    Ok(())
}

pub async fn admin_discover(ctx: &Context) -> anyhow::Result<()> {
    let entries = ctx.admin.discover().await?;
    println!("Discovery complete: {} menu entries.", entries.len());
    Ok(())
}

pub async fn admin_toggle(ctx: &Context, id: Uuid, yes: bool) -> anyhow::Result<()> {
    let plan = ctx.admin.plan(id).await?;
    let confirmation = if yes {
        Confirmation::Confirmed
    } else {
        Confirmation::Unconfirmed
    };

    match ctx.admin.apply(&plan, confirmation).await {
        Ok(updated) => {
            println!(
                "{} is now {}.",
                updated.route_path,
                if updated.is_enabled { "enabled" } else { "disabled" }
            );
            Ok(())
        }
        Err(AdminError::ConfirmationRequired {
            route_path,
            hidden_children,
        }) => {
            if hidden_children.is_empty() {
                println!("Disabling {} hides a section whose children are already disabled.", route_path);
            } else {
                println!("Disabling {} will also hide:", route_path);
                for child in &hidden_children {
                    println!("  - {}", child);
                }
            }
            bail!("re-run with --yes to confirm");
        }
        Err(e) => Err(e.into()),
    }
}
