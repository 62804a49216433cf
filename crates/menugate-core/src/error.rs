//! Domain and catalog errors

use thiserror::Error;
use uuid::Uuid;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("Menu not found: {0}")]
    MenuNotFound(Uuid),

    #[error("Invalid menu entry {route_path}: {reason}")]
    InvalidMenuEntry { route_path: String, reason: String },

    #[error("Duplicate route path: {0}")]
    DuplicateRoutePath(String),
}

/// Failures talking to the menu catalog.
///
/// `Clone` so one failed in-flight refresh can be handed to every caller
/// that joined it.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CatalogError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("Unauthorized")]
    Unauthorized,

    #[error("HTTP error: status {status}: {message}")]
    Http { status: u16, message: String },

    #[error("Malformed catalog response: {0}")]
    Malformed(String),

    #[error("Catalog rejected request: {0}")]
    Rejected(String),
}

impl CatalogError {
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, CatalogError::Unauthorized)
    }
}

impl From<DomainError> for CatalogError {
    fn from(err: DomainError) -> Self {
        CatalogError::Malformed(err.to_string())
    }
}
