//! Cache primitives shared by the persistent entity caches

mod envelope;

pub use envelope::CacheEnvelope;
