//! # Menugate Core
//! 
//! Menu entities, the visibility resolver, cascade-toggle planning and the
//! catalog port for the menu gating subsystem.

pub mod domain;
pub mod resolver;
pub mod toggle;
pub mod repositories;
pub mod error;

// Re-export domain entities
pub use domain::*;
pub use error::{CatalogError, DomainError};
pub use repositories::MenuCatalog;
pub use resolver::{BootstrapPolicy, ResolverMode, VisibilityResolver};
pub use toggle::{apply_toggled, plan_toggle, ToggleDirection, TogglePlan};
