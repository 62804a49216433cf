//! # Menugate Core - Domain Module
//! 
//! Menu entries and the cached catalog snapshot.

pub mod menu_entry;
pub mod snapshot;

pub use menu_entry::{normalize_route_path, parent_of_path, MenuEntry};
pub use snapshot::{sanitize_catalog, CacheSnapshot};
