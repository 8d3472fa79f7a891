//! Persistent entity caches
//!
//! Both flavours store a single [`CacheEnvelope`] under one storage key, so a
//! cached value survives restarts for as long as it stays within its TTL.
//! Every storage or decode failure is a cache miss; these caches never return
//! errors.

use std::collections::BTreeMap;
use std::marker::PhantomData;
use std::sync::Arc;
use std::time::Duration;

use carelink_common::{CacheEnvelope, Clock, SystemClock};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, warn};

use crate::storage::ports::KeyValueStore;

/// Storage access shared by both cache flavours.
#[derive(Clone)]
struct EnvelopeSlot {
    store: Arc<dyn KeyValueStore>,
    key: String,
    ttl: Duration,
    clock: Arc<dyn Clock>,
}

impl EnvelopeSlot {
    fn now(&self) -> u64 {
        self.clock.millis_since_epoch()
    }

    fn load<T: DeserializeOwned>(&self) -> Option<CacheEnvelope<T>> {
        match self.store.get(&self.key) {
            Ok(Some(raw)) => CacheEnvelope::parse(&raw),
            Ok(None) => None,
            Err(err) => {
                warn!(key = %self.key, error = %err, "cache read failed");
                None
            }
        }
    }

    fn load_fresh<T: DeserializeOwned>(&self) -> Option<CacheEnvelope<T>> {
        self.load().filter(|envelope: &CacheEnvelope<T>| envelope.is_fresh(self.now(), self.ttl))
    }

    fn save<T: Serialize>(&self, envelope: &CacheEnvelope<T>) {
        let Some(raw) = envelope.to_json() else {
            warn!(key = %self.key, "cache entry could not be serialized");
            return;
        };
        if let Err(err) = self.store.set(&self.key, &raw) {
            warn!(key = %self.key, error = %err, "cache write failed");
        }
    }

    fn clear(&self) {
        if let Err(err) = self.store.remove(&self.key) {
            warn!(key = %self.key, error = %err, "cache invalidation failed");
        }
    }
}

/// Cache holding one value under a fixed storage key.
pub struct EntityCache<T> {
    slot: EnvelopeSlot,
    _marker: PhantomData<fn() -> T>,
}

impl<T> EntityCache<T>
where
    T: Serialize + DeserializeOwned,
{
    /// Cache stored under `key` using the system clock.
    pub fn new(store: Arc<dyn KeyValueStore>, key: impl Into<String>, ttl: Duration) -> Self {
        Self::with_clock(store, key, ttl, Arc::new(SystemClock))
    }

    /// Cache stored under `key` using `clock` for freshness.
    pub fn with_clock(
        store: Arc<dyn KeyValueStore>,
        key: impl Into<String>,
        ttl: Duration,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            slot: EnvelopeSlot { store, key: key.into(), ttl, clock },
            _marker: PhantomData,
        }
    }

    /// Cached value if it was written less than one TTL ago.
    pub fn read(&self) -> Option<T> {
        let value = self.slot.load_fresh::<T>().map(|envelope| envelope.data);
        debug!(key = %self.slot.key, hit = value.is_some(), "cache lookup");
        value
    }

    /// Store `value` stamped with the current time.
    pub fn write(&self, value: &T) {
        self.slot.save(&CacheEnvelope::new(self.slot.now(), value));
    }

    /// Drop the cached value. A no-op when nothing was cached.
    pub fn invalidate(&self) {
        self.slot.clear();
    }

    /// Freshness window.
    pub fn ttl(&self) -> Duration {
        self.slot.ttl
    }
}

/// Cache holding a map of values under one storage key.
///
/// Freshness is tracked for the whole map: writing any key restamps the
/// envelope, and entries written while the envelope was stale are discarded
/// on the next write.
pub struct KeyedEntityCache<V> {
    slot: EnvelopeSlot,
    _marker: PhantomData<fn() -> V>,
}

impl<V> KeyedEntityCache<V>
where
    V: Serialize + DeserializeOwned,
{
    /// Cache stored under `key` using the system clock.
    pub fn new(store: Arc<dyn KeyValueStore>, key: impl Into<String>, ttl: Duration) -> Self {
        Self::with_clock(store, key, ttl, Arc::new(SystemClock))
    }

    /// Cache stored under `key` using `clock` for freshness.
    pub fn with_clock(
        store: Arc<dyn KeyValueStore>,
        key: impl Into<String>,
        ttl: Duration,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            slot: EnvelopeSlot { store, key: key.into(), ttl, clock },
            _marker: PhantomData,
        }
    }

    /// Fresh entry for `key`.
    pub fn read(&self, key: &str) -> Option<V> {
        let value = self
            .slot
            .load_fresh::<BTreeMap<String, V>>()
            .and_then(|mut envelope| envelope.data.remove(key));
        debug!(cache = %self.slot.key, entry = key, hit = value.is_some(), "keyed cache lookup");
        value
    }

    /// Store `value` under `key`, keeping siblings only while the envelope is
    /// still fresh.
    pub fn write(&self, key: &str, value: V) {
        let mut entries = self
            .slot
            .load_fresh::<BTreeMap<String, V>>()
            .map(|envelope| envelope.data)
            .unwrap_or_default();
        entries.insert(key.to_string(), value);
        self.slot.save(&CacheEnvelope::new(self.slot.now(), entries));
    }

    /// Remove one entry. The envelope keeps its timestamp.
    pub fn invalidate(&self, key: &str) {
        let Some(mut envelope) = self.slot.load::<BTreeMap<String, V>>() else {
            return;
        };
        if envelope.data.remove(key).is_some() {
            self.slot.save(&envelope);
        }
    }

    /// Drop every entry.
    pub fn invalidate_all(&self) {
        self.slot.clear();
    }

    /// Freshness window.
    pub fn ttl(&self) -> Duration {
        self.slot.ttl
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use carelink_common::MockClock;
    use parking_lot::Mutex;

    use super::*;
    use crate::storage::ports::StorageError;

    const TTL: Duration = Duration::from_millis(40_000);

    #[derive(Default)]
    struct MapStore {
        entries: Mutex<HashMap<String, String>>,
    }

    impl MapStore {
        fn raw(&self, key: &str) -> Option<String> {
            self.entries.lock().get(key).cloned()
        }
    }

    impl KeyValueStore for MapStore {
        fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
            Ok(self.entries.lock().get(key).cloned())
        }

        fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
            self.entries.lock().insert(key.to_string(), value.to_string());
            Ok(())
        }

        fn remove(&self, key: &str) -> Result<(), StorageError> {
            self.entries.lock().remove(key);
            Ok(())
        }
    }

    struct BrokenStore;

    impl KeyValueStore for BrokenStore {
        fn get(&self, _key: &str) -> Result<Option<String>, StorageError> {
            Err(StorageError::Unavailable("disk gone".into()))
        }

        fn set(&self, _key: &str, _value: &str) -> Result<(), StorageError> {
            Err(StorageError::Unavailable("disk gone".into()))
        }

        fn remove(&self, _key: &str) -> Result<(), StorageError> {
            Err(StorageError::Unavailable("disk gone".into()))
        }
    }

    fn single(store: &Arc<MapStore>, clock: &MockClock) -> EntityCache<Vec<String>> {
        EntityCache::with_clock(store.clone(), "list", TTL, Arc::new(clock.clone()))
    }

    fn keyed(store: &Arc<MapStore>, clock: &MockClock) -> KeyedEntityCache<Option<u32>> {
        KeyedEntityCache::with_clock(store.clone(), "latest", TTL, Arc::new(clock.clone()))
    }

    #[test]
    fn write_then_read_until_ttl() {
        let store = Arc::new(MapStore::default());
        let clock = MockClock::new();
        let cache = single(&store, &clock);

        cache.write(&vec!["a".to_string()]);
        assert_eq!(cache.read(), Some(vec!["a".to_string()]));

        clock.advance_millis(39_999);
        assert!(cache.read().is_some());

        clock.advance_millis(1);
        assert!(cache.read().is_none());
    }

    #[test]
    fn persisted_shape_is_ts_and_data() {
        let store = Arc::new(MapStore::default());
        let clock = MockClock::new();
        single(&store, &clock).write(&vec!["a".to_string()]);

        let raw: serde_json::Value = serde_json::from_str(&store.raw("list").unwrap()).unwrap();
        assert_eq!(raw["ts"].as_u64(), Some(clock.millis_since_epoch()));
        assert_eq!(raw["data"], serde_json::json!(["a"]));
    }

    #[test]
    fn invalidate_without_entry_is_noop() {
        let store = Arc::new(MapStore::default());
        let cache = single(&store, &MockClock::new());
        cache.invalidate();
        assert!(cache.read().is_none());
        assert!(store.raw("list").is_none());
    }

    #[test]
    fn corrupt_or_unstamped_entries_are_misses() {
        let store = Arc::new(MapStore::default());
        let cache = single(&store, &MockClock::new());

        store.set("list", "{not json").unwrap();
        assert!(cache.read().is_none());

        store.set("list", r#"{"ts": 0, "data": ["a"]}"#).unwrap();
        assert!(cache.read().is_none());
    }

    #[test]
    fn storage_failures_are_misses() {
        let cache: EntityCache<Vec<String>> = EntityCache::new(Arc::new(BrokenStore), "list", TTL);
        cache.write(&vec![]);
        cache.invalidate();
        assert!(cache.read().is_none());
    }

    #[test]
    fn keyed_entries_share_freshness() {
        let store = Arc::new(MapStore::default());
        let clock = MockClock::new();
        let cache = keyed(&store, &clock);

        cache.write("c1", Some(1));
        clock.advance_millis(10_000);
        cache.write("c2", None);

        assert_eq!(cache.read("c1"), Some(Some(1)));
        assert_eq!(cache.read("c2"), Some(None));
        assert_eq!(cache.read("c3"), None);

        clock.advance_millis(40_000);
        assert_eq!(cache.read("c1"), None);
    }

    #[test]
    fn keyed_write_drops_stale_siblings() {
        let store = Arc::new(MapStore::default());
        let clock = MockClock::new();
        let cache = keyed(&store, &clock);

        cache.write("c1", Some(1));
        clock.advance_millis(41_000);
        cache.write("c2", Some(2));

        assert_eq!(cache.read("c1"), None);
        assert_eq!(cache.read("c2"), Some(Some(2)));
    }

    #[test]
    fn keyed_invalidate_keeps_timestamp_and_siblings() {
        let store = Arc::new(MapStore::default());
        let clock = MockClock::new();
        let cache = keyed(&store, &clock);

        cache.write("c1", Some(1));
        cache.write("c2", Some(2));
        let stamped = clock.millis_since_epoch();
        clock.advance_millis(5_000);

        cache.invalidate("c1");
        cache.invalidate("missing");

        assert_eq!(cache.read("c1"), None);
        assert_eq!(cache.read("c2"), Some(Some(2)));
        let raw: serde_json::Value = serde_json::from_str(&store.raw("latest").unwrap()).unwrap();
        assert_eq!(raw["ts"].as_u64(), Some(stamped));

        cache.invalidate_all();
        assert!(store.raw("latest").is_none());
    }
}
