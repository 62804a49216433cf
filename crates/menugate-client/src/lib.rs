//! # Menugate Client
//!
//! Client side of menu gating: the HTTP catalog, the two-tier
//! stale-while-revalidate cache, the admin toggle service and the consumer
//! handles used by navigation and route guards.

pub mod admin;
pub mod cache;
pub mod error;
pub mod http;
pub mod session;
pub mod sidebar;
pub mod tier;
pub mod visibility;

#[cfg(test)]
mod testing;

pub use admin::{Confirmation, MenuAdmin};
pub use cache::{CacheInvalidator, CachePolicy, CacheStats, MenuCache};
pub use error::{AdminError, TierError};
pub use http::HttpMenuCatalog;
pub use session::SessionToken;
pub use sidebar::{build_sidebar, sidebar_from_catalog, NavItem, SidebarItem};
pub use tier::{FileTier, MemoryTier, PersistentTier};
pub use visibility::{GuardDecision, MenuVisibility, RevalidateOutcome, RouteGuard};
