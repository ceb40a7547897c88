//! Application state shared across handlers.

use std::sync::Arc;

use crate::config::StorefrontConfig;
use crate::persist::{FileStore, KeyValueStore, MemoryStore, PersistError};
use crate::registry::ShopperRegistry;

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc` and provides access to
/// shared resources like the shopper registry and configuration.
#[derive(Clone, Debug)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

#[derive(Debug)]
struct AppStateInner {
    config: StorefrontConfig,
    shoppers: ShopperRegistry,
}

impl AppState {
    /// Create a new application state.
    ///
    /// Shopper state is written under `config.data_dir` when set, otherwise
    /// it is kept in memory for the life of the process.
    ///
    /// # Errors
    ///
    /// Returns an error if the data directory cannot be created.
    pub fn new(config: StorefrontConfig) -> Result<Self, PersistError> {
        let store: Arc<dyn KeyValueStore> = match &config.data_dir {
            Some(dir) => {
                tracing::info!(data_dir = %dir.display(), "Persisting shopper state to disk");
                Arc::new(FileStore::open(dir)?)
            }
            None => {
                tracing::warn!("MARCHE_DATA_DIR not set, shopper state will not survive restarts");
                Arc::new(MemoryStore::new())
            }
        };

        Ok(Self::with_store(config, store))
    }

    /// Create application state over an explicit key-value store.
    #[must_use]
    pub fn with_store(config: StorefrontConfig, store: Arc<dyn KeyValueStore>) -> Self {
        let shoppers = ShopperRegistry::new(store, config.shopper_settings(), config.shopper_idle);
        Self {
            inner: Arc::new(AppStateInner { config, shoppers }),
        }
    }

    /// Get a reference to the storefront configuration.
    #[must_use]
    pub fn config(&self) -> &StorefrontConfig {
        &self.inner.config
    }

    /// Get a reference to the shopper registry.
    #[must_use]
    pub fn shoppers(&self) -> &ShopperRegistry {
        &self.inner.shoppers
    }
}
