//! Test doubles shared by the client tests.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use menugate_core::{CatalogError, MenuCatalog, MenuEntry};
use mockall::mock;
use tokio::sync::Notify;
use uuid::Uuid;

mock! {
    pub Catalog {}

    #[async_trait]
    impl MenuCatalog for Catalog {
        async fn user_menus(&self) -> Result<Vec<MenuEntry>, CatalogError>;
        async fn admin_menus(&self) -> Result<Vec<MenuEntry>, CatalogError>;
        async fn discover_menus(&self) -> Result<Vec<MenuEntry>, CatalogError>;
        async fn toggle_menu(&self, id: Uuid) -> Result<MenuEntry, CatalogError>;
    }
}

/// Catalog that parks the n-th `user_menus` call until `release(n)`.
pub struct GatedCatalog {
    calls: AtomicUsize,
    gates: Vec<Notify>,
    responses: Vec<Vec<MenuEntry>>,
}

impl GatedCatalog {
    pub fn new(responses: Vec<Vec<MenuEntry>>) -> Arc<Self> {
        Arc::new(Self {
            calls: AtomicUsize::new(0),
            gates: responses.iter().map(|_| Notify::new()).collect(),
            responses,
        })
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub async fn wait_for_calls(&self, n: usize) {
        while self.calls() < n {
            tokio::task::yield_now().await;
        }
    }

    /// Stores a permit, so releasing before the call parks is fine.
    pub fn release(&self, call: usize) {
        self.gates[call].notify_one();
    }
}

#[async_trait]
impl MenuCatalog for GatedCatalog {
    async fn user_menus(&self) -> Result<Vec<MenuEntry>, CatalogError> {
        let call = self.calls.fetch_add(1, Ordering::SeqCst);
        self.gates[call].notified().await;
        Ok(self.responses[call].clone())
    }
    async fn admin_menus(&self) -> Result<Vec<MenuEntry>, CatalogError> {
        unimplemented!()
    }
    async fn discover_menus(&self) -> Result<Vec<MenuEntry>, CatalogError> {
        unimplemented!()
    }
    async fn toggle_menu(&self, _id: Uuid) -> Result<MenuEntry, CatalogError> {
        unimplemented!()
    }
}

pub fn trading_entries(analysis_enabled: bool) -> Vec<MenuEntry> {
    vec![
        MenuEntry::new("dashboard", "Dashboard", None, true).unwrap(),
        MenuEntry::new("analysis", "Analysis", None, analysis_enabled).unwrap(),
        MenuEntry::new("analysis/signal-centre", "Signal Centre", Some("analysis"), false).unwrap(),
        MenuEntry::new("analysis/market-news", "Market News", Some("analysis"), true).unwrap(),
    ]
}
