//! Shared utilities for the CareLink crates.
//!
//! - [`time`]: clock abstraction with a controllable mock for TTL tests
//! - [`cache`]: timestamped envelope used by the persistent entity caches
//! - [`lifecycle`]: liveness flags guarding late asynchronous writes

#![forbid(unsafe_code)]
#![warn(rust_2018_idioms)]
#![warn(clippy::all, clippy::perf, clippy::complexity, clippy::suspicious)]

pub mod cache;
pub mod lifecycle;
pub mod time;

pub use cache::CacheEnvelope;
pub use lifecycle::Liveness;
pub use time::{Clock, MockClock, SystemClock};
