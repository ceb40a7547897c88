//! Persisted key-value storage for shopper state.
//!
//! # Contract
//!
//! A [`KeyValueStore`] maps fixed string keys to JSON text. Every slice of
//! shopper state (cart, wishlist, compare) lives under its own key, so no
//! two slices ever write the same entry.
//!
//! [`Persisted`] is the subscriber that sits between a pure reducer from
//! `marche-core` and the store:
//! - a missing key loads as the slice's `Default`
//! - a malformed payload is logged and also loads as `Default`
//! - a payload that parses but breaks the slice's invariants is repaired
//!   through [`Normalize`] and rewritten on the next mutation
//! - after each mutation the slice is serialized and written if it changed
//! - a failed write is logged and the slice keeps working in memory

use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use marche_core::Normalize;
use parking_lot::Mutex;
use serde::Serialize;
use serde::de::DeserializeOwned;
use thiserror::Error;

/// Errors raised by a storage backend.
#[derive(Debug, Error)]
pub enum PersistError {
    #[error("I/O error for key {key}: {source}")]
    Io {
        key: String,
        #[source]
        source: io::Error,
    },

    #[error("Invalid storage key: {0}")]
    InvalidKey(String),
}

/// Durable key-value medium for serialized state.
pub trait KeyValueStore: Send + Sync {
    /// Read the value stored under `key`, or `None` if nothing was written yet.
    ///
    /// # Errors
    ///
    /// Returns `PersistError` if the medium cannot be read.
    fn load(&self, key: &str) -> Result<Option<String>, PersistError>;

    /// Write `value` under `key`, replacing any previous value.
    ///
    /// # Errors
    ///
    /// Returns `PersistError` if the medium cannot be written.
    fn save(&self, key: &str, value: &str) -> Result<(), PersistError>;
}

// =============================================================================
// Backends
// =============================================================================

/// In-process store. State is lost when the process exits.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn load(&self, key: &str) -> Result<Option<String>, PersistError> {
        Ok(self.entries.lock().get(key).cloned())
    }

    fn save(&self, key: &str, value: &str) -> Result<(), PersistError> {
        self.entries.lock().insert(key.to_owned(), value.to_owned());
        Ok(())
    }
}

/// One JSON file per key inside a data directory.
///
/// Writes go to a temporary file that is renamed over the target, so a crash
/// mid-write leaves the previous value intact.
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    /// Open a store rooted at `dir`, creating the directory if needed.
    ///
    /// # Errors
    ///
    /// Returns `PersistError::Io` if the directory cannot be created.
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self, PersistError> {
        let dir = dir.into();
        fs::create_dir_all(&dir).map_err(|source| PersistError::Io {
            key: dir.display().to_string(),
            source,
        })?;
        Ok(Self { dir })
    }

    /// The directory holding the files.
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> Result<PathBuf, PersistError> {
        let valid = !key.is_empty()
            && !key.starts_with('.')
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'));
        if !valid {
            return Err(PersistError::InvalidKey(key.to_owned()));
        }
        Ok(self.dir.join(format!("{key}.json")))
    }
}

impl KeyValueStore for FileStore {
    fn load(&self, key: &str) -> Result<Option<String>, PersistError> {
        let path = self.path_for(key)?;
        match fs::read_to_string(&path) {
            Ok(raw) => Ok(Some(raw)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(source) => Err(PersistError::Io {
                key: key.to_owned(),
                source,
            }),
        }
    }

    fn save(&self, key: &str, value: &str) -> Result<(), PersistError> {
        let path = self.path_for(key)?;
        let tmp = self.dir.join(format!(".{key}.json.tmp"));
        fs::write(&tmp, value)
            .and_then(|()| fs::rename(&tmp, &path))
            .map_err(|source| PersistError::Io {
                key: key.to_owned(),
                source,
            })
    }
}

// =============================================================================
// Persistence subscriber
// =============================================================================

/// A slice of state kept in memory and mirrored to a [`KeyValueStore`].
pub struct Persisted<S> {
    key: String,
    store: Arc<dyn KeyValueStore>,
    slot: Mutex<Slot<S>>,
}

struct Slot<S> {
    state: S,
    /// Last JSON successfully written (or loaded); used to skip no-op writes.
    last_written: Option<String>,
}

impl<S> Persisted<S>
where
    S: Serialize + DeserializeOwned + Default + Normalize,
{
    /// Load the slice stored under `key`, falling back to `S::default()`.
    pub fn load(store: Arc<dyn KeyValueStore>, key: impl Into<String>) -> Self {
        let key = key.into();
        let (state, last_written) = match store.load(&key) {
            Ok(Some(raw)) => match serde_json::from_str::<S>(&raw) {
                Ok(mut state) => match state.normalize() {
                    0 => (state, Some(raw)),
                    dropped => {
                        tracing::warn!(key = %key, dropped, "Repaired persisted state");
                        (state, None)
                    }
                },
                Err(e) => {
                    tracing::warn!(key = %key, error = %e, "Malformed persisted state, starting empty");
                    (S::default(), None)
                }
            },
            Ok(None) => (S::default(), None),
            Err(e) => {
                tracing::warn!(key = %key, error = %e, "Failed to read persisted state, starting empty");
                (S::default(), None)
            }
        };

        Self {
            key,
            store,
            slot: Mutex::new(Slot {
                state,
                last_written,
            }),
        }
    }

    /// Storage key of this slice.
    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Read the current state.
    pub fn read<R>(&self, f: impl FnOnce(&S) -> R) -> R {
        f(&self.slot.lock().state)
    }

    /// Mutate the state, then write it through if its persisted form changed.
    ///
    /// The closure and the write run under one lock, so each call is atomic
    /// with respect to other callers of the same slice.
    pub fn update<R>(&self, f: impl FnOnce(&mut S) -> R) -> R {
        let mut slot = self.slot.lock();
        let result = f(&mut slot.state);
        slot.flush(&self.key, self.store.as_ref());
        result
    }
}

impl<S: Serialize> Slot<S> {
    fn flush(&mut self, key: &str, store: &dyn KeyValueStore) {
        let json = match serde_json::to_string(&self.state) {
            Ok(json) => json,
            Err(e) => {
                tracing::error!(key = %key, error = %e, "Failed to serialize state");
                return;
            }
        };

        if self.last_written.as_deref() == Some(json.as_str()) {
            return;
        }

        match store.save(key, &json) {
            Ok(()) => {
                tracing::trace!(key = %key, bytes = json.len(), "Persisted state");
                self.last_written = Some(json);
            }
            Err(e) => {
                tracing::error!(key = %key, error = %e, "Failed to persist state, keeping in-memory copy");
            }
        }
    }
}

impl<S: std::fmt::Debug> std::fmt::Debug for Persisted<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Persisted")
            .field("key", &self.key)
            .field("state", &self.slot.lock().state)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use marche_core::{
        CART_STORAGE_KEY, COMPARE_STORAGE_KEY, Cart, CompareList, ProductId, WISHLIST_STORAGE_KEY,
        Wishlist,
    };
    use rust_decimal::Decimal;

    use super::*;
    use crate::test_support::product;

    /// Counts writes and can be switched to fail them.
    #[derive(Default)]
    struct FlakyStore {
        inner: MemoryStore,
        writes: AtomicUsize,
        fail: std::sync::atomic::AtomicBool,
    }

    impl KeyValueStore for FlakyStore {
        fn load(&self, key: &str) -> Result<Option<String>, PersistError> {
            self.inner.load(key)
        }

        fn save(&self, key: &str, value: &str) -> Result<(), PersistError> {
            if self.fail.load(Ordering::SeqCst) {
                return Err(PersistError::Io {
                    key: key.to_owned(),
                    source: io::Error::other("disk full"),
                });
            }
            self.writes.fetch_add(1, Ordering::SeqCst);
            self.inner.save(key, value)
        }
    }

    fn scratch_dir() -> PathBuf {
        std::env::temp_dir().join(format!("marche-persist-{}", uuid::Uuid::new_v4()))
    }

    #[test]
    fn test_missing_key_loads_default() {
        let store: Arc<dyn KeyValueStore> = Arc::new(MemoryStore::new());
        let cart = Persisted::<Cart>::load(store, CART_STORAGE_KEY);
        assert!(cart.read(Cart::is_empty));
    }

    #[test]
    fn test_state_survives_reload() {
        let store: Arc<dyn KeyValueStore> = Arc::new(MemoryStore::new());
        let cart = Persisted::<Cart>::load(Arc::clone(&store), CART_STORAGE_KEY);
        cart.update(|c| c.add(&product("p1", 1000), None, 2).is_some());

        let reloaded = Persisted::<Cart>::load(store, CART_STORAGE_KEY);
        assert_eq!(reloaded.read(Cart::total_items), 2);
        assert_eq!(reloaded.read(Cart::subtotal), Decimal::from(2000));
    }

    #[test]
    fn test_malformed_payload_loads_default() {
        let store = Arc::new(MemoryStore::new());
        store.save(CART_STORAGE_KEY, "{not json").unwrap();

        let cart = Persisted::<Cart>::load(store.clone(), CART_STORAGE_KEY);
        assert!(cart.read(Cart::is_empty));

        // The next mutation overwrites the bad payload.
        cart.update(|c| c.add(&product("p1", 1000), None, 1).is_some());
        let raw = store.load(CART_STORAGE_KEY).unwrap().unwrap();
        assert!(raw.contains("\"p1\""));
    }

    #[test]
    fn test_unchanged_state_is_not_rewritten() {
        let store = Arc::new(FlakyStore::default());
        let cart = Persisted::<Cart>::load(store.clone(), CART_STORAGE_KEY);

        cart.update(|c| c.add(&product("p1", 1000), None, 1).is_some());
        assert_eq!(store.writes.load(Ordering::SeqCst), 1);

        // Panel state and no-op removals do not touch the persisted form.
        cart.update(Cart::open);
        cart.update(|c| c.remove("missing"));
        assert_eq!(store.writes.load(Ordering::SeqCst), 1);

        cart.update(|c| c.update_quantity("p1", 4));
        assert_eq!(store.writes.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_failed_write_keeps_memory_state() {
        let store = Arc::new(FlakyStore::default());
        store.fail.store(true, Ordering::SeqCst);
        let cart = Persisted::<Cart>::load(store.clone(), CART_STORAGE_KEY);

        cart.update(|c| c.add(&product("p1", 1000), None, 3).is_some());
        assert_eq!(cart.read(Cart::total_items), 3);
        assert!(store.load(CART_STORAGE_KEY).unwrap().is_none());

        // Once the medium recovers the pending state is written.
        store.fail.store(false, Ordering::SeqCst);
        cart.update(|c| c.update_quantity("p1", 3));
        assert!(store.load(CART_STORAGE_KEY).unwrap().is_some());
    }

    #[test]
    fn test_file_store_round_trip() {
        let dir = scratch_dir();
        let store = FileStore::open(&dir).unwrap();

        assert!(store.load("cart-storage").unwrap().is_none());
        store.save("cart-storage", "{\"items\":[]}").unwrap();
        assert_eq!(
            store.load("cart-storage").unwrap().as_deref(),
            Some("{\"items\":[]}")
        );
        assert!(dir.join("cart-storage.json").exists());
        assert!(!dir.join(".cart-storage.json.tmp").exists());

        fs::remove_dir_all(dir).unwrap();
    }

    #[test]
    fn test_file_store_rejects_path_like_keys() {
        let dir = scratch_dir();
        let store = FileStore::open(&dir).unwrap();

        for key in ["../escape", "a/b", "", ".hidden"] {
            assert!(matches!(
                store.save(key, "{}"),
                Err(PersistError::InvalidKey(_))
            ));
        }

        fs::remove_dir_all(dir).unwrap();
    }

    #[test]
    fn test_invalid_lines_are_repaired_on_load() {
        let store = Arc::new(MemoryStore::new());
        let seed = Persisted::<Cart>::load(store.clone(), CART_STORAGE_KEY);
        seed.update(|c| c.add(&product("p1", 1000), None, 2).is_some());
        seed.update(|c| c.add(&product("p2", 500), None, 1).is_some());

        let raw = store.load(CART_STORAGE_KEY).unwrap().unwrap();
        let mut payload: serde_json::Value = serde_json::from_str(&raw).unwrap();
        let items = payload["items"].as_array_mut().unwrap();
        items[1]["quantity"] = serde_json::json!(0);
        let duplicate = items[0].clone();
        items.push(duplicate);
        store.save(CART_STORAGE_KEY, &payload.to_string()).unwrap();

        let cart = Persisted::<Cart>::load(store.clone(), CART_STORAGE_KEY);
        let quantities: Vec<u32> = cart.read(|c| c.items().iter().map(|i| i.quantity).collect());
        assert_eq!(quantities, vec![4]);
        assert!(!cart.read(|c| c.is_in_cart(&ProductId::new("p2"), None)));

        // The repaired form replaces the stored one on the next write.
        cart.update(Cart::open);
        cart.update(|c| c.update_quantity("p1", 4));
        let stored: Cart = serde_json::from_str(&store.load(CART_STORAGE_KEY).unwrap().unwrap()).unwrap();
        assert_eq!(stored.items().len(), 1);
    }

    #[test]
    fn test_duplicate_list_entries_are_dropped_on_load() {
        let store = Arc::new(MemoryStore::new());
        let wishlist = Persisted::<Wishlist>::load(store.clone(), WISHLIST_STORAGE_KEY);
        wishlist.update(|w| w.add(&product("p1", 1000), None));
        let compare = Persisted::<CompareList>::load(store.clone(), COMPARE_STORAGE_KEY);
        compare.update(|c| c.add(&product("p1", 1000)).is_ok());

        for key in [WISHLIST_STORAGE_KEY, COMPARE_STORAGE_KEY] {
            let raw = store.load(key).unwrap().unwrap();
            let mut payload: serde_json::Value = serde_json::from_str(&raw).unwrap();
            let items = payload["items"].as_array_mut().unwrap();
            let duplicate = items[0].clone();
            items.push(duplicate);
            store.save(key, &payload.to_string()).unwrap();
        }

        let wishlist = Persisted::<Wishlist>::load(store.clone(), WISHLIST_STORAGE_KEY);
        assert_eq!(wishlist.read(Wishlist::len), 1);
        let compare = Persisted::<CompareList>::load(store, COMPARE_STORAGE_KEY);
        assert_eq!(compare.read(CompareList::len), 1);
    }
}
