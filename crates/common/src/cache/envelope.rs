//! Timestamped cache envelope
//!
//! Cached entities are persisted as `{ "ts": <epoch millis>, "data": ... }`.
//! Freshness is decided by the reader against its own TTL, so the envelope
//! itself carries no expiry.

use std::time::Duration;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

/// A value stamped with the wall-clock time it was written.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheEnvelope<T> {
    /// Write time in milliseconds since the UNIX epoch. Zero means unknown.
    #[serde(default)]
    pub ts: u64,
    /// Cached payload
    pub data: T,
}

impl<T> CacheEnvelope<T> {
    /// Wrap `data` with the given write time.
    pub fn new(ts: u64, data: T) -> Self {
        Self { ts, data }
    }

    /// Milliseconds elapsed since the envelope was written.
    ///
    /// A timestamp in the future yields zero.
    pub fn age_millis(&self, now_ms: u64) -> u64 {
        now_ms.saturating_sub(self.ts)
    }

    /// `true` when the envelope has a timestamp and `now - ts < ttl`.
    #[allow(clippy::cast_possible_truncation)]
    pub fn is_fresh(&self, now_ms: u64, ttl: Duration) -> bool {
        self.ts != 0 && self.age_millis(now_ms) < ttl.as_millis() as u64
    }

    /// Return the payload when fresh.
    pub fn into_fresh(self, now_ms: u64, ttl: Duration) -> Option<T> {
        self.is_fresh(now_ms, ttl).then_some(self.data)
    }
}

impl<T: DeserializeOwned> CacheEnvelope<T> {
    /// Parse a persisted envelope, returning `None` for any malformed input.
    pub fn parse(raw: &str) -> Option<Self> {
        match serde_json::from_str(raw) {
            Ok(envelope) => Some(envelope),
            Err(err) => {
                tracing::debug!(error = %err, "discarding unparsable cache envelope");
                None
            }
        }
    }
}

impl<T: Serialize> CacheEnvelope<T> {
    /// Serialize the envelope for persistence.
    pub fn to_json(&self) -> Option<String> {
        serde_json::to_string(self).ok()
    }
}
