//! Client errors

use menugate_core::{CatalogError, DomainError};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum TierError {
    #[error("Storage I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Stored snapshot is corrupt: {0}")]
    Corrupt(#[from] serde_json::Error),
}

/// Errors surfaced to the admin operator. Never retried automatically.
#[derive(Error, Debug)]
pub enum AdminError {
    #[error(transparent)]
    Catalog(#[from] CatalogError),

    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error("Disabling {route_path} hides its children ({}); confirmation required", hidden_children.join(", "))]
    ConfirmationRequired {
        route_path: String,
        hidden_children: Vec<String>,
    },
}
