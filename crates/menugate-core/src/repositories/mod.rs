//! Repository traits (ports)

pub mod menu_catalog;

pub use menu_catalog::MenuCatalog;
#[cfg(test)]
pub use menu_catalog::MockMenuCatalog;
