//! Session token hand-off

use std::sync::Arc;

use parking_lot::RwLock;

/// Bearer token shared between the caller and the catalog client. Cleared on
/// the first 401 so the caller can send the user back to login.
#[derive(Debug, Clone, Default)]
pub struct SessionToken {
    inner: Arc<RwLock<Option<String>>>,
}

impl SessionToken {
    pub fn new(token: Option<String>) -> Self {
        Self {
            inner: Arc::new(RwLock::new(token.filter(|t| !t.trim().is_empty()))),
        }
    }

    pub fn get(&self) -> Option<String> {
        self.inner.read().clone()
    }

    pub fn set(&self, token: String) {
        *self.inner.write() = Some(token);
    }

    pub fn clear(&self) {
        *self.inner.write() = None;
    }

    pub fn is_present(&self) -> bool {
        self.inner.read().is_some()
    }
}
