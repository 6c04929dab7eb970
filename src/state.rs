//! Application State
//!
//! Shared between all request handlers: the upstream catalog client and the
//! cart store with its storage backend.

use crate::cart::{CartStore, JsonFileStore, KeyValueStore, MemoryStore};
use crate::catalog::CatalogClient;
use crate::config::Config;
use std::sync::Arc;
use tracing::info;

/// Shared application state that can be safely passed between threads
pub type SharedState = Arc<AppState>;

/// Core application state
#[derive(Debug)]
pub struct AppState {
    pub catalog: CatalogClient,
    pub cart: CartStore,
}

impl AppState {
    pub fn new(catalog: CatalogClient, cart: CartStore) -> Self {
        Self { catalog, cart }
    }

    /// Wires the catalog client and picks the cart backend from `config`
    pub fn from_config(config: &Config) -> Self {
        let storage: Arc<dyn KeyValueStore> = match &config.cart.store_dir {
            Some(dir) => {
                info!(dir = %dir.display(), "Persisting carts as JSON files");
                Arc::new(JsonFileStore::new(dir.clone()))
            }
            None => {
                info!("Persisting carts in memory");
                Arc::new(MemoryStore::new())
            }
        };

        if config.catalog.api_key.is_none() {
            tracing::warn!("SERPAPI_API_KEY not set; search and product pages will report failures");
        }

        Self::new(
            CatalogClient::new(config.catalog.clone()),
            CartStore::new(storage, config.cart.storage_key.clone()),
        )
    }
}
