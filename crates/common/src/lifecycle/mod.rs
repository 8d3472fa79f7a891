//! Lifecycle helpers for work that may outlive its owner

mod liveness;

pub use liveness::Liveness;
