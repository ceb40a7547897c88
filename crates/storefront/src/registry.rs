//! In-memory registry of active shoppers.
//!
//! Shoppers are loaded from the key-value store on first access and kept in a
//! moka cache until they go idle. Eviction drops the cache's handle; once no
//! request holds the [`Shopper`] either, it is dropped and its timers are
//! cancelled. Its persisted slices stay in the store and are loaded again on
//! the next request.
//!
//! At most one `Shopper` exists per id. A shopper evicted while a request
//! still holds it is found through a weak index and put back in the cache
//! instead of being loaded a second time, so two copies never write the same
//! keys.

use std::collections::HashMap;
use std::sync::{Arc, Weak};
use std::time::Duration;

use marche_core::ShopperId;
use moka::notification::RemovalCause;
use moka::sync::Cache;
use parking_lot::Mutex;

use crate::persist::KeyValueStore;
use crate::shopper::{Shopper, ShopperSettings};

/// Maximum number of shoppers held in memory at once.
const MAX_ACTIVE_SHOPPERS: u64 = 10_000;

/// Cache of loaded shoppers keyed by id.
pub struct ShopperRegistry {
    shoppers: Cache<ShopperId, Arc<Shopper>>,
    /// Every shopper still alive, cached or not.
    live: Mutex<HashMap<ShopperId, Weak<Shopper>>>,
    store: Arc<dyn KeyValueStore>,
    settings: ShopperSettings,
}

impl ShopperRegistry {
    /// Create a registry that unloads shoppers after `idle` without access.
    #[must_use]
    pub fn new(store: Arc<dyn KeyValueStore>, settings: ShopperSettings, idle: Duration) -> Self {
        let shoppers = Cache::builder()
            .max_capacity(MAX_ACTIVE_SHOPPERS)
            .time_to_idle(idle)
            .eviction_listener(|id: Arc<ShopperId>, _shopper, cause: RemovalCause| {
                tracing::debug!(shopper_id = %id, ?cause, "Shopper unloaded");
            })
            .build();

        Self {
            shoppers,
            live: Mutex::new(HashMap::new()),
            store,
            settings,
        }
    }

    /// Get a shopper, loading it from the store if no copy is alive.
    pub fn get(&self, id: ShopperId) -> Arc<Shopper> {
        self.shoppers.get_with(id, || self.revive_or_open(id))
    }

    fn revive_or_open(&self, id: ShopperId) -> Arc<Shopper> {
        let mut live = self.live.lock();
        if let Some(shopper) = live.get(&id).and_then(Weak::upgrade) {
            tracing::debug!(shopper_id = %id, "Reusing shopper still in use");
            return shopper;
        }

        live.retain(|_, shopper| shopper.strong_count() > 0);
        let shopper = Arc::new(Shopper::open(id, Arc::clone(&self.store), self.settings));
        live.insert(id, Arc::downgrade(&shopper));
        shopper
    }

    /// Unload a shopper now. Its persisted state is kept.
    pub fn evict(&self, id: ShopperId) {
        self.shoppers.invalidate(&id);
    }

    /// Number of shoppers currently loaded.
    #[must_use]
    pub fn active_count(&self) -> u64 {
        self.shoppers.run_pending_tasks();
        self.shoppers.entry_count()
    }

    #[must_use]
    pub const fn settings(&self) -> &ShopperSettings {
        &self.settings
    }
}

impl std::fmt::Debug for ShopperRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ShopperRegistry")
            .field("active", &self.shoppers.entry_count())
            .field("settings", &self.settings)
            .finish_non_exhaustive()
    }
}
