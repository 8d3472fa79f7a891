//! TTL-bounded caches persisted through the key-value port

mod entity_cache;

pub use entity_cache::{EntityCache, KeyedEntityCache};
